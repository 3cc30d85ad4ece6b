use std::{fmt::Display, str::FromStr, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use time::{macros::format_description, UtcOffset};
use tracing::warn;

use crate::entries::dto::NutritionalInfo;

pub const DEFAULT_GOALS: NutritionalInfo = NutritionalInfo {
    calories: 2500.0,
    carbohydrates: 125.0,
    sugar: 38.0,
    fat: 111.0,
    protein: 250.0,
};

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub api_url: String,
    pub engine_id: String,
    pub pat: String,
    pub ingest_url: String,
    pub ingest_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub page_size: u32,
    pub ingest_settle: Duration,
    /// Offset of the person reading the diary; decides which day an entry falls on.
    pub utc_offset: UtcOffset,
    pub goals: NutritionalInfo,
}

impl AppConfig {
    /// Must run before any worker thread is spawned: the system offset
    /// lookup refuses to answer in a multi-threaded process.
    pub fn from_env() -> anyhow::Result<Self> {
        let store = StoreConfig {
            api_url: required("RAILENGINE_API_URL")?,
            engine_id: required("RAILENGINE_ENGINE_ID")?,
            pat: required("RAILENGINE_PAT")?,
            ingest_url: required("RAILENGINE_INGEST_URL")?,
            ingest_key: required("RAILENGINE_INGEST_KEY")?,
        };

        let utc_offset = match std::env::var("DIARY_UTC_OFFSET") {
            Ok(raw) => parse_offset(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "invalid DIARY_UTC_OFFSET, using UTC");
                UtcOffset::UTC
            }),
            Err(_) => UtcOffset::current_local_offset().unwrap_or_else(|e| {
                warn!(error = %e, "local offset unavailable, using UTC");
                UtcOffset::UTC
            }),
        };

        Ok(Self {
            store,
            page_size: or_default("RETRIEVE_PAGE_SIZE", 100),
            ingest_settle: Duration::from_millis(or_default("INGEST_SETTLE_MS", 2000)),
            utc_offset,
            goals: NutritionalInfo {
                calories: or_default("GOAL_CALORIES", DEFAULT_GOALS.calories),
                carbohydrates: or_default("GOAL_CARBOHYDRATES", DEFAULT_GOALS.carbohydrates),
                sugar: or_default("GOAL_SUGAR", DEFAULT_GOALS.sugar),
                fat: or_default("GOAL_FAT", DEFAULT_GOALS.fat),
                protein: or_default("GOAL_PROTEIN", DEFAULT_GOALS.protein),
            },
        })
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("{key} must be set"))
}

fn or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(error = %e, "invalid {key} value {raw:?}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Accepts `Z`, `+HH:MM` and `-HH:MM`.
pub fn parse_offset(raw: &str) -> Option<UtcOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(UtcOffset::UTC);
    }
    UtcOffset::parse(
        raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn offsets_parse_in_common_spellings() {
        assert_eq!(parse_offset("Z"), Some(UtcOffset::UTC));
        assert_eq!(parse_offset("utc"), Some(UtcOffset::UTC));
        assert_eq!(parse_offset("+02:00"), Some(offset!(+2)));
        assert_eq!(parse_offset(" -05:30 "), Some(offset!(-5:30)));
        assert_eq!(parse_offset("5"), None);
        assert_eq!(parse_offset("Europe/Paris"), None);
    }

    #[test]
    fn default_goals_match_the_diary_defaults() {
        assert_eq!(DEFAULT_GOALS.calories, 2500.0);
        assert_eq!(DEFAULT_GOALS.carbohydrates, 125.0);
        assert_eq!(DEFAULT_GOALS.sugar, 38.0);
        assert_eq!(DEFAULT_GOALS.fat, 111.0);
        assert_eq!(DEFAULT_GOALS.protein, 250.0);
    }

    #[test]
    fn unset_optional_values_fall_back() {
        assert_eq!(or_default("FOOD_DIARY_TEST_UNSET_VALUE", 42u32), 42);
    }
}
