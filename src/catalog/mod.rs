//! Fixed list of common meals with their nutrition facts, used to pre-fill
//! new diary entries from a name typed by the user.

pub mod handlers;

use serde::Serialize;

use crate::entries::dto::NutritionalInfo;
use crate::state::AppState;
use axum::Router;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealCatalogEntry {
    pub name: &'static str,
    #[serde(flatten)]
    pub nutrition: NutritionalInfo,
}

const fn meal(
    name: &'static str,
    calories: f64,
    carbohydrates: f64,
    sugar: f64,
    fat: f64,
    protein: f64,
) -> MealCatalogEntry {
    MealCatalogEntry {
        name,
        nutrition: NutritionalInfo {
            calories,
            carbohydrates,
            sugar,
            fat,
            protein,
        },
    }
}

pub static MEALS: [MealCatalogEntry; 20] = [
    meal("Chicken Shawarma", 350.0, 25.0, 2.0, 15.0, 30.0),
    meal("Grilled Chicken Breast", 231.0, 0.0, 0.0, 5.0, 43.0),
    meal("Salmon Fillet", 206.0, 0.0, 0.0, 12.0, 22.0),
    meal("Pasta with Marinara", 220.0, 43.0, 6.0, 1.0, 8.0),
    meal("Beef Burger", 354.0, 33.0, 6.0, 15.0, 17.0),
    meal("Caesar Salad", 470.0, 26.0, 4.0, 36.0, 17.0),
    meal("Greek Salad", 200.0, 10.0, 6.0, 15.0, 8.0),
    meal("Chicken Wrap", 320.0, 30.0, 3.0, 12.0, 20.0),
    meal("Tuna Salad Sandwich", 350.0, 35.0, 5.0, 12.0, 22.0),
    meal("Vegetable Stir Fry", 150.0, 20.0, 8.0, 5.0, 6.0),
    meal("Oatmeal with Berries", 200.0, 35.0, 12.0, 4.0, 6.0),
    meal("Scrambled Eggs", 196.0, 1.0, 1.0, 15.0, 13.0),
    meal("Avocado Toast", 320.0, 30.0, 2.0, 20.0, 10.0),
    meal("Grilled Salmon", 206.0, 0.0, 0.0, 12.0, 22.0),
    meal("Chicken Caesar Wrap", 380.0, 32.0, 4.0, 18.0, 24.0),
    meal("Turkey Sandwich", 280.0, 28.0, 4.0, 8.0, 20.0),
    meal("Quinoa Bowl", 222.0, 39.0, 0.0, 4.0, 8.0),
    meal("Sushi Roll", 200.0, 28.0, 3.0, 2.0, 6.0),
    meal("Pizza Slice", 285.0, 36.0, 4.0, 10.0, 12.0),
    meal("Chicken Teriyaki", 300.0, 35.0, 15.0, 8.0, 25.0),
];

/// Case-insensitive substring match on the trimmed query, in catalog order.
/// A blank query matches nothing.
pub fn search(query: &str) -> Vec<&'static MealCatalogEntry> {
    search_in(&MEALS, query)
}

pub fn search_in<'a>(catalog: &'a [MealCatalogEntry], query: &str) -> Vec<&'a MealCatalogEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .collect()
}

pub fn router() -> Router<AppState> {
    handlers::catalog_routes()
}
