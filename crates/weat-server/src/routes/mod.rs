// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP handlers, one module per resource.

pub mod health;
pub mod menus;
pub mod places;
pub mod tag_types;
pub mod tags;
