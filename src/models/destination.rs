use serde_json::Value;

use crate::config::Config;

use super::submission::{scalar_text, Submission, CHAT_IDS_KEY, CHAT_ID_KEY};

/// Splits a comma-separated list into trimmed, non-empty ids.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts a single id, a comma-separated string or a list of either.
pub fn ids_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().flat_map(ids_from_value).collect(),
        other => scalar_text(other)
            .map(|text| split_ids(&text))
            .unwrap_or_default(),
    }
}

/// Ordered chat ids for one request: payload `chat_id`, payload `chat_ids`,
/// then the configured defaults. Repeats keep their first position.
pub fn resolve(submission: &Submission, config: &Config) -> Vec<String> {
    let payload = [CHAT_ID_KEY, CHAT_IDS_KEY]
        .into_iter()
        .filter_map(|key| submission.get(key))
        .flat_map(ids_from_value);

    let mut destinations: Vec<String> = Vec::new();

    for id in payload.chain(config.default_chat_ids()) {
        if !destinations.contains(&id) {
            destinations.push(id);
        }
    }

    destinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with(chat_ids: Option<&str>, chat_id: Option<&str>) -> Config {
        Config {
            telegram_chat_ids: chat_ids.map(str::to_string),
            telegram_chat_id: chat_id.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn test_sources_concatenate_in_precedence_order() {
        let submission = Submission::from_json(json!({
            "chat_ids": "B,C",
            "chat_id": "A",
        }))
        .unwrap();

        let destinations = resolve(&submission, &config_with(Some("D,E"), None));

        assert_eq!(destinations, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_configured_singular_comes_last() {
        let submission = Submission::default();

        let destinations = resolve(&submission, &config_with(Some("1, 2"), Some("3")));

        assert_eq!(destinations, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_accepts_lists_numbers_and_blank_entries() {
        let submission = Submission::from_json(json!({
            "chat_id": -100123,
            "chat_ids": ["5", " ", "6,7", 8, null],
        }))
        .unwrap();

        let destinations = resolve(&submission, &Config::default());

        assert_eq!(destinations, vec!["-100123", "5", "6", "7", "8"]);
    }

    #[test]
    fn test_repeats_keep_first_position() {
        let submission = Submission::from_json(json!({
            "chat_id": "B",
            "chat_ids": "A,B",
        }))
        .unwrap();

        let destinations = resolve(&submission, &config_with(Some("A,C"), Some("B")));

        assert_eq!(destinations, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_nothing_resolvable() {
        let submission = Submission::from_json(json!({ "chat_id": "", "chat_ids": [] })).unwrap();

        assert!(resolve(&submission, &config_with(Some(" , "), None)).is_empty());
    }
}
