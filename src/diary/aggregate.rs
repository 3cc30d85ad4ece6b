use serde::Serialize;
use time::{Date, UtcOffset};

use crate::entries::dto::{DiaryEntry, MealSlot, NutritionalInfo};

/// One day's entries, bucketed by meal slot in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealGroups {
    pub breakfast: Vec<DiaryEntry>,
    pub lunch: Vec<DiaryEntry>,
    pub dinner: Vec<DiaryEntry>,
}

impl MealGroups {
    pub fn get(&self, slot: MealSlot) -> &[DiaryEntry] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }

    fn bucket_mut(&mut self, slot: MealSlot) -> &mut Vec<DiaryEntry> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    /// Breakfast, then lunch, then dinner.
    pub fn iter(&self) -> impl Iterator<Item = &DiaryEntry> {
        MealSlot::ALL.into_iter().flat_map(|slot| self.get(slot).iter())
    }

    pub fn len(&self) -> usize {
        self.breakfast.len() + self.lunch.len() + self.dinner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entries whose local calendar day is `target`, grouped by meal slot.
///
/// Entries with an unrecognised meal or an unreadable date are left out.
pub fn group_by_meal(entries: &[DiaryEntry], target: Date, offset: UtcOffset) -> MealGroups {
    let mut groups = MealGroups::default();
    for entry in entries {
        if entry.local_date(offset) != Some(target) {
            continue;
        }
        if let Some(slot) = entry.meal_slot() {
            groups.bucket_mut(slot).push(entry.clone());
        }
    }
    groups
}

pub fn sum_totals<'a, I>(entries: I) -> NutritionalInfo
where
    I: IntoIterator<Item = &'a DiaryEntry>,
{
    entries
        .into_iter()
        .fold(NutritionalInfo::default(), |acc, e| acc + e.nutritional_info)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySummary {
    pub totals: NutritionalInfo,
    pub goals: NutritionalInfo,
    /// `goals - totals`; negative once a goal is exceeded.
    pub remaining: NutritionalInfo,
}

impl DailySummary {
    pub fn new(totals: NutritionalInfo, goals: NutritionalInfo) -> Self {
        Self {
            totals,
            goals,
            remaining: goals - totals,
        }
    }
}
