use std::collections::HashMap;

use serde_json::Value;

/// Logical fields of a consultation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
    Note,
    Slot,
}

impl Field {
    /// Candidate keys in lookup order: the Latin id, then the form label.
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "نام و نام خانوادگی"],
            Field::Phone => &["phone", "شماره تماس"],
            Field::Note => &["note", "توضیحات (اختیاری)"],
            Field::Slot => &["slot", "زمان انتخابی"],
        }
    }
}

pub const CHAT_ID_KEY: &str = "chat_id";
pub const CHAT_IDS_KEY: &str = "chat_ids";
pub const SECRET_KEY: &str = "secret";

/// Raw form data as posted by the page builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    fields: HashMap<String, Value>,
}

impl Submission {
    pub fn from_json(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => Ok(Submission {
                fields: map.into_iter().collect(),
            }),
            Value::Null => Ok(Submission::default()),
            other => Err(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )),
        }
    }

    /// Repeated keys are collected into a list.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut fields: HashMap<String, Value> = HashMap::new();

        for (key, value) in pairs {
            match fields.get_mut(&key) {
                Some(Value::Array(values)) => values.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    fields.insert(key, Value::String(value));
                }
            }
        }

        Submission { fields }
    }

    pub fn from_form(body: &[u8]) -> Result<Self, String> {
        let pairs = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .map_err(|err| err.to_string())?;

        Ok(Self::from_pairs(pairs))
    }

    /// Adds keys from `other` that this submission does not carry.
    pub fn fill_missing(mut self, other: Submission) -> Self {
        for (key, value) in other.fields {
            self.fields.entry(key).or_insert(value);
        }

        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// First non-empty text among `keys`, or an empty string.
    pub fn lookup(&self, keys: &[&str]) -> String {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .filter_map(scalar_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    pub fn field(&self, field: Field) -> String {
        self.lookup(field.keys())
    }

    /// Taken verbatim, the secret is compared exactly. Empty counts as absent.
    pub fn secret(&self) -> Option<String> {
        let secret = match self.fields.get(SECRET_KEY)? {
            Value::String(secret) => secret.clone(),
            Value::Number(number) => number.to_string(),
            _ => return None,
        };

        Some(secret).filter(|secret| !secret.is_empty())
    }
}

/// Strings and numbers as trimmed text; anything else has no text form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_latin_and_label_keys_resolve_the_same() {
        let latin = Submission::from_json(json!({
            "name": "Ali",
            "phone": "0912",
            "note": "call after 5",
            "slot": "Mon 10:00",
        }))
        .unwrap();
        let labelled = Submission::from_json(json!({
            "نام و نام خانوادگی": "Ali",
            "شماره تماس": "0912",
            "توضیحات (اختیاری)": "call after 5",
            "زمان انتخابی": "Mon 10:00",
        }))
        .unwrap();

        for field in [Field::Name, Field::Phone, Field::Note, Field::Slot] {
            assert_eq!(latin.field(field), labelled.field(field));
        }
    }

    #[test]
    fn test_latin_key_wins_over_label() {
        let submission = Submission::from_json(json!({
            "name": "Latin",
            "نام و نام خانوادگی": "Label",
        }))
        .unwrap();

        assert_eq!(submission.field(Field::Name), "Latin");
    }

    #[test]
    fn test_empty_latin_key_falls_back_to_label() {
        let submission = Submission::from_json(json!({
            "phone": "  ",
            "شماره تماس": "0912",
        }))
        .unwrap();

        assert_eq!(submission.field(Field::Phone), "0912");
        assert_eq!(submission.field(Field::Note), "");
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(Submission::from_json(json!(["a", "b"])).is_err());
        assert!(Submission::from_json(json!("text")).is_err());
        assert_eq!(Submission::from_json(Value::Null).unwrap(), Submission::default());
    }

    #[test]
    fn test_form_collects_repeated_keys() {
        let submission =
            Submission::from_form(b"name=Ali&chat_ids=1&chat_ids=2&chat_ids=3").unwrap();

        assert_eq!(submission.field(Field::Name), "Ali");
        assert_eq!(submission.get(CHAT_IDS_KEY), Some(&json!(["1", "2", "3"])));
    }

    #[test]
    fn test_fill_missing_keeps_existing_keys() {
        let body = Submission::from_json(json!({ "chat_id": "1" })).unwrap();
        let query = Submission::from_pairs(vec![
            ("chat_id".to_string(), "2".to_string()),
            ("secret".to_string(), "x".to_string()),
        ]);

        let merged = body.fill_missing(query);

        assert_eq!(merged.get(CHAT_ID_KEY), Some(&json!("1")));
        assert_eq!(merged.secret().as_deref(), Some("x"));
    }

    #[test]
    fn test_empty_secret_is_absent() {
        let submission = Submission::from_pairs(vec![("secret".to_string(), String::new())]);

        assert_eq!(submission.secret(), None);
    }
}
