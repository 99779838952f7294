use super::submission::{Field, Submission};

/// Telegram `parse_mode` the rendered text is written for.
pub const PARSE_MODE: &str = "Markdown";

const TITLE: &str = "*ثبت مشاوره جدید* 📞";

/// Sent by `GET /hook` to check the whole path end to end.
pub const TEST_MESSAGE: &str = "*Webhook test* ✅\nThe relay is reachable.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedMessage {
    pub name: String,
    pub phone: String,
    pub note: String,
    pub slot: String,
}

impl NormalizedMessage {
    pub fn from_submission(submission: &Submission) -> Self {
        NormalizedMessage {
            name: submission.field(Field::Name),
            phone: submission.field(Field::Phone),
            note: submission.field(Field::Note),
            slot: submission.field(Field::Slot),
        }
    }

    /// Title, then one line per non-empty field: name, phone, slot, note.
    pub fn render(&self) -> String {
        let fields = [
            ("نام", &self.name),
            ("شماره", &self.phone),
            ("زمان", &self.slot),
            ("توضیح", &self.note),
        ];

        let mut lines = vec![TITLE.to_string()];
        lines.extend(
            fields
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(label, value)| format!("*{}:* {}", label, escape_markdown(value))),
        );

        lines.join("\n")
    }
}

/// Escapes the characters legacy Markdown treats as entity markers.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(payload: serde_json::Value) -> String {
        let submission = Submission::from_json(payload).unwrap();
        NormalizedMessage::from_submission(&submission).render()
    }

    #[test]
    fn test_absent_note_has_no_line() {
        let text = render(json!({
            "name": "Ali",
            "phone": "0912...",
            "slot": "Mon 10:00",
        }));

        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], TITLE);
        assert_eq!(
            &lines[1..],
            &["*نام:* Ali", "*شماره:* 0912...", "*زمان:* Mon 10:00"]
        );
        assert!(!text.contains("توضیح"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_line_order_ignores_input_order() {
        let text = render(json!({
            "note": "n",
            "slot": "s",
            "phone": "p",
            "name": "a",
        }));

        assert_eq!(
            text,
            format!("{}\n*نام:* a\n*شماره:* p\n*زمان:* s\n*توضیح:* n", TITLE)
        );
    }

    #[test]
    fn test_empty_submission_renders_title_only() {
        assert_eq!(render(json!({})), TITLE);
    }

    #[test]
    fn test_user_text_is_escaped() {
        let text = render(json!({ "name": "snake_case *bold* `code` [link]" }));

        assert!(text.ends_with(r"snake\_case \*bold\* \`code\` \[link]"));
    }

    #[test]
    fn test_escape_leaves_plain_text_alone() {
        assert_eq!(escape_markdown("علی 0912-555"), "علی 0912-555");
    }
}
