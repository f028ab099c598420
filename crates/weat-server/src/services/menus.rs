// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read access to a place's menus.

use std::collections::HashMap;

use tracing::instrument;
use uuid::Uuid;
use weat_server_db::{
	Dish, DishCategory, Entity, Menu, Place, Select, SortOrder, UnitOfWork,
};

use super::{apply_sort, load, Result, SortOptions};

/// A menu with its categories and dishes, each ordered by name.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuDetail {
	pub menu: Menu,
	pub categories: Vec<DishCategory>,
	pub dishes: Vec<Dish>,
}

pub fn build_menus_query(place_id: Uuid) -> Result<Select> {
	apply_sort::<Menu>(
		Menu::for_place(Menu::select(), place_id),
		Some(&SortOptions::new("created_at", SortOrder::Asc)),
	)
}

pub fn build_categories_query(menu_ids: Vec<Uuid>) -> Result<Select> {
	apply_sort::<DishCategory>(
		DishCategory::for_menus(DishCategory::select(), menu_ids),
		Some(&SortOptions::new("name", SortOrder::Asc)),
	)
}

pub fn build_dishes_query(menu_ids: Vec<Uuid>) -> Result<Select> {
	apply_sort::<Dish>(
		Dish::for_menus(Dish::select(), menu_ids),
		Some(&SortOptions::new("name", SortOrder::Asc)),
	)
}

/// Menus of the place, oldest first. Fails with not-found for an unknown place.
#[instrument(skip(uow))]
pub async fn list_menus(uow: &mut UnitOfWork, place_id: Uuid) -> Result<Vec<MenuDetail>> {
	load::<Place>(uow, place_id).await?;

	let menus = uow.get_all::<Menu>(&build_menus_query(place_id)?).await?;
	if menus.is_empty() {
		return Ok(Vec::new());
	}

	let ids: Vec<Uuid> = menus.iter().map(|m| m.id).collect();
	let categories = uow
		.get_all::<DishCategory>(&build_categories_query(ids.clone())?)
		.await?;
	let dishes = uow.get_all::<Dish>(&build_dishes_query(ids)?).await?;
	tracing::debug!(
		menus = menus.len(),
		categories = categories.len(),
		dishes = dishes.len(),
		"menus loaded"
	);

	Ok(assemble(menus, categories, dishes))
}

fn assemble(menus: Vec<Menu>, categories: Vec<DishCategory>, dishes: Vec<Dish>) -> Vec<MenuDetail> {
	let mut categories_by_menu: HashMap<Uuid, Vec<DishCategory>> = HashMap::new();
	for category in categories {
		categories_by_menu.entry(category.menu_id).or_default().push(category);
	}
	let mut dishes_by_menu: HashMap<Uuid, Vec<Dish>> = HashMap::new();
	for dish in dishes {
		dishes_by_menu.entry(dish.menu_id).or_default().push(dish);
	}

	menus
		.into_iter()
		.map(|menu| MenuDetail {
			categories: categories_by_menu.remove(&menu.id).unwrap_or_default(),
			dishes: dishes_by_menu.remove(&menu.id).unwrap_or_default(),
			menu,
		})
		.collect()
}
