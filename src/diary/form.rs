//! Presentation-side model of the "add entry" form.
//!
//! No route reads it: a front end holds one per screen, fills it from typing
//! or a catalog pick, and turns it into an [`EntryDraft`] for the gateway.

use time::UtcOffset;

use super::day::SelectedDay;
use crate::catalog::MealCatalogEntry;
use crate::entries::dto::{EntryDraft, MealSlot, NutritionalInfo};
use crate::entries::validate::local_midnight;
use crate::error::{DiaryError, FieldIssue};

/// In-progress "add entry" form.
///
/// Nutrition is either typed in or copied from a catalog suggestion; it is
/// all-or-nothing, so clearing the name drops the copied values as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryForm {
    name: String,
    meal: Option<MealSlot>,
    nutrition: Option<NutritionalInfo>,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meal(&self) -> Option<MealSlot> {
        self.meal
    }

    pub fn nutrition(&self) -> Option<NutritionalInfo> {
        self.nutrition
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if self.name.trim().is_empty() {
            self.nutrition = None;
        }
    }

    pub fn set_meal(&mut self, meal: MealSlot) {
        self.meal = Some(meal);
    }

    pub fn set_nutrition(&mut self, nutrition: NutritionalInfo) {
        self.nutrition = Some(nutrition);
    }

    pub fn apply_suggestion(&mut self, suggestion: &MealCatalogEntry) {
        self.name = suggestion.name.to_string();
        self.nutrition = Some(suggestion.nutrition);
    }

    /// Builds a draft dated local midnight of `day`.
    pub fn to_draft(&self, day: SelectedDay, offset: UtcOffset) -> Result<EntryDraft, DiaryError> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(FieldIssue::new("name", "Please select or enter a food name!"));
        }
        if self.meal.is_none() {
            issues.push(FieldIssue::new("meal", "Please select a meal!"));
        }
        if self.nutrition.is_none() {
            issues.push(FieldIssue::new("nutritional_info", "Required"));
        }
        let (Some(meal), Some(nutritional_info)) = (self.meal, self.nutrition) else {
            return Err(DiaryError::Validation(issues));
        };
        if !issues.is_empty() {
            return Err(DiaryError::Validation(issues));
        }

        let draft = EntryDraft {
            name: self.name.trim().to_string(),
            meal,
            date: local_midnight(day.date(), offset),
            nutritional_info,
        };
        draft.check()?;
        Ok(draft)
    }
}
