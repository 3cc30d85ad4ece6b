use serde_json::{Map, Value};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    Time, UtcOffset,
};

use super::dto::{EntryDraft, MealSlot, NutritionalInfo};
use crate::error::{DiaryError, FieldIssue};

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expected(field: &str, want: &str, got: &Value) -> FieldIssue {
    FieldIssue::new(field, format!("Expected {want}, received {}", kind(got)))
}

fn string_field<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<&'a str> {
    match obj.get(field) {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new(field, "Required"));
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            issues.push(expected(field, "string", other));
            None
        }
    }
}

/// Local midnight of `day` in the viewer's offset.
pub fn local_midnight(day: Date, offset: UtcOffset) -> OffsetDateTime {
    day.with_time(Time::MIDNIGHT).assume_offset(offset)
}

/// An RFC 3339 instant, or a bare `YYYY-MM-DD` taken as local midnight.
pub fn parse_entry_date(raw: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(instant);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|day| local_midnight(day, offset))
}

fn nutrition(value: Option<&Value>, issues: &mut Vec<FieldIssue>) -> Option<NutritionalInfo> {
    let obj = match value {
        None | Some(Value::Null) => {
            issues.push(FieldIssue::new("nutritional_info", "Required"));
            return None;
        }
        Some(Value::Object(obj)) => obj,
        Some(other) => {
            issues.push(expected("nutritional_info", "object", other));
            return None;
        }
    };

    let mut values = [0.0_f64; 5];
    let mut ok = true;
    for (slot, name) in values.iter_mut().zip(NutritionalInfo::FIELDS) {
        let field = format!("nutritional_info.{name}");
        match obj.get(name) {
            None | Some(Value::Null) => {
                issues.push(FieldIssue::new(field, "Required"));
                ok = false;
            }
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) => *slot = v,
                None => {
                    issues.push(FieldIssue::new(field, "Expected a finite number"));
                    ok = false;
                }
            },
            Some(other) => {
                issues.push(expected(&field, "number", other));
                ok = false;
            }
        }
    }
    if !ok {
        return None;
    }

    let [calories, carbohydrates, sugar, fat, protein] = values;
    let info = NutritionalInfo {
        calories,
        carbohydrates,
        sugar,
        fat,
        protein,
    };
    let range = info.issues();
    if range.is_empty() {
        Some(info)
    } else {
        issues.extend(range);
        None
    }
}

/// Validates an ingest body field by field. Any client-sent `id` is ignored;
/// the gateway assigns one.
pub fn parse_draft(body: &Value, offset: UtcOffset) -> Result<EntryDraft, DiaryError> {
    let Some(obj) = body.as_object() else {
        return Err(DiaryError::Validation(vec![expected("", "object", body)]));
    };
    let mut issues = Vec::new();

    let name = string_field(obj, "name", &mut issues).and_then(|s| {
        if s.trim().is_empty() {
            issues.push(FieldIssue::new("name", "Required"));
            None
        } else {
            Some(s.trim().to_string())
        }
    });

    let meal = string_field(obj, "meal", &mut issues).and_then(|s| match s.parse::<MealSlot>() {
        Ok(slot) => Some(slot),
        Err(msg) => {
            issues.push(FieldIssue::new("meal", msg));
            None
        }
    });

    let date = string_field(obj, "date", &mut issues).and_then(|s| {
        let parsed = parse_entry_date(s, offset);
        if parsed.is_none() {
            issues.push(FieldIssue::new(
                "date",
                "Expected an ISO-8601 instant or a YYYY-MM-DD date",
            ));
        }
        parsed
    });

    let nutritional_info = nutrition(obj.get("nutritional_info"), &mut issues);

    match (name, meal, date, nutritional_info) {
        (Some(name), Some(meal), Some(date), Some(nutritional_info)) if issues.is_empty() => {
            Ok(EntryDraft {
                name,
                meal,
                date,
                nutritional_info,
            })
        }
        _ => Err(DiaryError::Validation(issues)),
    }
}
