//! Stylesheet field mutation.
//!
//! Option toggles are written straight into the style configuration no
//! matter which document is bound to the surface.

use crate::document::{DocumentKind, DocumentStore, EditingSurface};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

pub const HIDE_CODE_KEY: &str = "hideCode";

/// Set `key` to `value` in `style_text`.
///
/// Unparseable or empty text is replaced by an empty object rather than
/// rejected. The result is pretty-printed with four-space indentation.
pub fn set_style_field(style_text: &str, key: &str, value: Value) -> String {
    let mut parsed = match serde_json::from_str::<Map<String, Value>>(style_text) {
        Ok(parsed) => parsed,
        Err(e) => {
            if !style_text.is_empty() {
                tracing::warn!("Style configuration is not a JSON object ({}), starting from {{}}", e);
            }
            Map::new()
        }
    };

    parsed.insert(key.to_string(), value);
    to_stylesheet_json(&Value::Object(parsed))
}

pub(crate) fn to_stylesheet_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));

    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }

    String::from_utf8(buf).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

impl DocumentStore {
    /// Write the `hideCode` flag into the style configuration, mirroring it
    /// onto the surface when the style configuration is active
    pub fn set_hide_code(&mut self, value: bool, surface: &mut dyn EditingSurface) {
        let current = self.read_style_config(surface);
        let updated = set_style_field(&current, HIDE_CODE_KEY, Value::Bool(value));

        tracing::debug!("Set {} = {}", HIDE_CODE_KEY, value);
        self.store(DocumentKind::StyleConfig, updated, surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BufferSurface;
    use serde_json::json;

    #[test]
    fn test_hide_code_preserves_unrelated_fields() {
        let style = r#"{"variables":{"arr":{"color":"blue"}},"hideCode":false,"codeTracking":"stepOver"}"#;

        let updated = set_style_field(style, HIDE_CODE_KEY, Value::Bool(true));
        let parsed: Value = serde_json::from_str(&updated).unwrap();

        assert_eq!(
            parsed,
            json!({
                "variables": { "arr": { "color": "blue" } },
                "hideCode": true,
                "codeTracking": "stepOver",
            })
        );
    }

    #[test]
    fn test_four_space_indentation() {
        let updated = set_style_field("", HIDE_CODE_KEY, Value::Bool(true));
        assert_eq!(updated, "{\n    \"hideCode\": true\n}");
    }

    #[test]
    fn test_unparseable_style_falls_back_to_empty_object() {
        let updated = set_style_field("not json", HIDE_CODE_KEY, Value::Bool(false));
        assert_eq!(updated, "{\n    \"hideCode\": false\n}");
    }

    #[test]
    fn test_set_hide_code_while_program_active() {
        let mut store = DocumentStore::new("code.manimdsl", "test.json");
        let mut surface = BufferSurface::new();
        surface.write("let x = 1");

        store.set_hide_code(true, &mut surface);

        assert_eq!(surface.text(), "let x = 1");
        assert_eq!(store.document(DocumentKind::StyleConfig).text(), "{\n    \"hideCode\": true\n}");
    }

    #[test]
    fn test_set_hide_code_updates_live_surface() {
        let mut store = DocumentStore::new("code.manimdsl", "test.json");
        let mut surface = BufferSurface::new();
        store.switch_active_to(DocumentKind::StyleConfig, &mut surface);
        surface.write(r#"{"positions":{}}"#);

        store.set_hide_code(true, &mut surface);

        let expected = "{\n    \"positions\": {},\n    \"hideCode\": true\n}";
        assert_eq!(surface.text(), expected);
        assert_eq!(store.document(DocumentKind::StyleConfig).text(), expected);
    }

    #[test]
    fn test_unrelated_floats_keep_their_digits() {
        let updated = set_style_field(r#"{"scale":0.20317460317460317}"#, HIDE_CODE_KEY, json!(true));
        assert_eq!(
            updated,
            "{\n    \"scale\": 0.20317460317460317,\n    \"hideCode\": true\n}"
        );
    }
}
