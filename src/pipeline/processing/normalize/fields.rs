use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Field extraction helpers shared by normalizers.
///
/// Every helper is total: unexpected shapes yield `None`, zero or an empty
/// collection, never an error.
pub struct FieldUtils;

impl FieldUtils {
    /// First key holding a non-empty string
    pub fn first_string(data: &Value, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| data.get(*key).and_then(|v| v.as_str()))
            .find(|s| !s.is_empty())
            .map(|s| s.to_string())
    }

    /// Year component of a date-like value
    pub fn parse_year(value: &Value) -> Option<i32> {
        match value {
            Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Value::String(s) => Self::parse_year_str(s),
            _ => None,
        }
    }

    pub fn parse_year_str(raw: &str) -> Option<i32> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(date.year());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.year());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Some(dt.year());
        }
        // Bare year, e.g. the awards catalog's "1994"
        if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
            return s.parse().ok();
        }
        None
    }

    /// Numeric value, or `None` when absent or not a JSON number
    pub fn number(data: &Value, key: &str) -> Option<f64> {
        data.get(key).and_then(|v| v.as_f64())
    }

    pub fn integer(data: &Value, key: &str) -> Option<i64> {
        let v = data.get(key)?;
        v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
    }

    /// Display label of one element of a multi-valued field.
    /// Accepts plain strings, numbers (e.g. `genre_ids`) or `{id, name}` objects.
    fn label(value: &Value) -> Option<String> {
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(map) => map
                .get("name")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            _ => None,
        }
    }

    fn labels(value: &Value) -> Vec<String> {
        match value {
            Value::Array(items) => items.iter().filter_map(Self::label).collect(),
            other => Self::label(other).into_iter().collect(),
        }
    }

    /// Flat set of display strings from the first non-null key, source order kept
    pub fn string_set(data: &Value, keys: &[&str]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        if let Some(value) = keys
            .iter()
            .filter_map(|key| data.get(*key))
            .find(|v| !v.is_null())
        {
            for label in Self::labels(value) {
                if !out.contains(&label) {
                    out.push(label);
                }
            }
        }
        out
    }

    /// Ordered sequence of display strings; duplicates are kept
    pub fn string_list(data: &Value, key: &str) -> Vec<String> {
        data.get(key).map(Self::labels).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_year_shapes() {
        assert_eq!(FieldUtils::parse_year_str("2019-05-30"), Some(2019));
        assert_eq!(FieldUtils::parse_year_str("2021-03-04T12:00:00Z"), Some(2021));
        assert_eq!(FieldUtils::parse_year_str("1994"), Some(1994));
        assert_eq!(FieldUtils::parse_year_str(""), None);
        assert_eq!(FieldUtils::parse_year_str("not a date"), None);
        assert_eq!(FieldUtils::parse_year_str("2019-13-45"), None);
        assert_eq!(FieldUtils::parse_year(&json!(2001)), Some(2001));
        assert_eq!(FieldUtils::parse_year(&json!(null)), None);
    }

    #[test]
    fn test_string_set_accepts_both_shapes() {
        let plain = json!({ "genre": ["Drama", "Crime", "Drama"] });
        assert_eq!(FieldUtils::string_set(&plain, &["genres", "genre"]), vec!["Drama", "Crime"]);

        let pairs = json!({ "genres": [{ "id": 18, "name": "Drama" }, { "id": 80, "name": "Crime" }] });
        assert_eq!(FieldUtils::string_set(&pairs, &["genres", "genre"]), vec!["Drama", "Crime"]);

        let single = json!({ "original_language": "ja" });
        assert_eq!(FieldUtils::string_set(&single, &["language", "original_language"]), vec!["ja"]);

        let ids = json!({ "genre_ids": [28, 12] });
        assert_eq!(FieldUtils::string_set(&ids, &["genres", "genre_ids"]), vec!["28", "12"]);
    }

    #[test]
    fn test_string_set_skips_null_keys() {
        let data = json!({ "country": null, "origin_country": ["US"] });
        assert_eq!(FieldUtils::string_set(&data, &["country", "origin_country"]), vec!["US"]);
        assert!(FieldUtils::string_set(&json!({}), &["country"]).is_empty());
    }

    #[test]
    fn test_numbers_ignore_non_numeric() {
        let data = json!({ "vote_average": "8.1", "vote_count": 120, "oscar_nominations": 3.0 });
        assert_eq!(FieldUtils::number(&data, "vote_average"), None);
        assert_eq!(FieldUtils::integer(&data, "vote_count"), Some(120));
        assert_eq!(FieldUtils::integer(&data, "oscar_nominations"), Some(3));
        assert_eq!(FieldUtils::integer(&data, "missing"), None);
    }
}
