use std::{
    fmt,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};
use uuid::Uuid;

use crate::error::{DiaryError, FieldIssue};

const WALL_CLOCK: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const WALL_CLOCK_FRACTION: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// When in the day an entry was eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            other => Err(format!(
                "Invalid enum value. Expected 'breakfast' | 'lunch' | 'dinner', received '{other}'"
            )),
        }
    }
}

/// The five tracked metrics. Also used for daily totals, goals and what remains of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: f64,
    pub carbohydrates: f64,
    pub sugar: f64,
    pub fat: f64,
    pub protein: f64,
}

impl NutritionalInfo {
    pub const FIELDS: [&'static str; 5] = ["calories", "carbohydrates", "sugar", "fat", "protein"];

    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("calories", self.calories),
            ("carbohydrates", self.carbohydrates),
            ("sugar", self.sugar),
            ("fat", self.fat),
            ("protein", self.protein),
        ]
    }

    pub(crate) fn issues(&self) -> Vec<FieldIssue> {
        self.fields()
            .into_iter()
            .filter_map(|(name, value)| {
                let field = format!("nutritional_info.{name}");
                if !value.is_finite() {
                    Some(FieldIssue::new(field, "Expected a finite number"))
                } else if value < 0.0 {
                    Some(FieldIssue::new(
                        field,
                        "Number must be greater than or equal to 0",
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Add for NutritionalInfo {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            carbohydrates: self.carbohydrates + rhs.carbohydrates,
            sugar: self.sugar + rhs.sugar,
            fat: self.fat + rhs.fat,
            protein: self.protein + rhs.protein,
        }
    }
}

impl AddAssign for NutritionalInfo {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for NutritionalInfo {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            calories: self.calories - rhs.calories,
            carbohydrates: self.carbohydrates - rhs.carbohydrates,
            sugar: self.sugar - rhs.sugar,
            fat: self.fat - rhs.fat,
            protein: self.protein - rhs.protein,
        }
    }
}

/// A persisted diary record, in the document store's wire shape.
///
/// `meal` and `date` stay as text: records written by older clients may carry
/// a meal outside the known slots or a date without an offset, and those are
/// tolerated on read rather than failing the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub id: String,
    pub name: String,
    pub meal: String,
    pub date: String,
    pub nutritional_info: NutritionalInfo,
}

impl DiaryEntry {
    /// `None` for legacy records whose meal is not one of the three slots.
    /// Case is ignored here, so stored `"Lunch"` still reads as lunch.
    pub fn meal_slot(&self) -> Option<MealSlot> {
        self.meal.to_ascii_lowercase().parse().ok()
    }

    /// Calendar day of the entry as seen from `offset`.
    ///
    /// Instants carrying an offset are shifted into `offset` first, so a
    /// midnight stored as `2024-03-09T23:00:00Z` by a `+01:00` viewer still
    /// lands on the 10th for that viewer. Offset-less timestamps are taken as
    /// wall-clock time in the viewer's zone.
    pub fn local_date(&self, offset: UtcOffset) -> Option<Date> {
        if let Ok(instant) = OffsetDateTime::parse(&self.date, &Rfc3339) {
            return Some(instant.to_offset(offset).date());
        }
        PrimitiveDateTime::parse(&self.date, WALL_CLOCK)
            .or_else(|_| PrimitiveDateTime::parse(&self.date, WALL_CLOCK_FRACTION))
            .ok()
            .map(|dt| dt.date())
    }
}

/// A validated entry that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub name: String,
    pub meal: MealSlot,
    pub date: OffsetDateTime,
    pub nutritional_info: NutritionalInfo,
}

impl EntryDraft {
    pub fn check(&self) -> Result<(), DiaryError> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push(FieldIssue::new("name", "Required"));
        }
        issues.extend(self.nutritional_info.issues());
        if issues.is_empty() {
            Ok(())
        } else {
            Err(DiaryError::Validation(issues))
        }
    }

    /// Dates are written as UTC instants.
    pub fn into_entry(self, id: Uuid) -> Result<DiaryEntry, DiaryError> {
        let date = self
            .date
            .to_offset(UtcOffset::UTC)
            .format(&Rfc3339)
            .map_err(|e| DiaryError::Unknown(anyhow::anyhow!("format entry date: {e}")))?;
        Ok(DiaryEntry {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            meal: self.meal.as_str().to_string(),
            date,
            nutritional_info: self.nutritional_info,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[cfg(test)]
pub(crate) fn entry(id: &str, meal: &str, date: &str, calories: f64) -> DiaryEntry {
    DiaryEntry {
        id: id.to_string(),
        name: format!("item {id}"),
        meal: meal.to_string(),
        date: date.to_string(),
        nutritional_info: NutritionalInfo {
            calories,
            carbohydrates: 10.0,
            sugar: 2.0,
            fat: 5.0,
            protein: 7.0,
        },
    }
}
