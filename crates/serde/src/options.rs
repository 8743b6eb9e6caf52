//! Serializer configuration.

use serde::{Deserialize, Serialize};

/// Options applied to every serialize and deserialize call.
///
/// Options are plain data and can be loaded from JSON:
///
/// ```
/// use dfe_serde::SerializerOptions;
///
/// let options = SerializerOptions::from_json(r#"{ "remove_accents": true }"#).unwrap();
/// assert!(options.remove_accents);
/// assert!(options.trim_text);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Fold Portuguese diacritics in string fields.
    pub remove_accents: bool,

    /// Trim surrounding whitespace in string fields.
    pub trim_text: bool,

    /// Indent XML text output.
    pub format_xml: bool,

    /// Spaces per level when `format_xml` is set.
    pub indent: usize,

    /// Omit the `<?xml ...?>` declaration.
    pub omit_declaration: bool,

    /// Declared encoding. Only UTF-8 is written.
    pub encoding: String,

    /// Record non-fatal alerts.
    pub collect_alerts: bool,

    /// Fail deserialization when a required node is absent instead of defaulting it.
    pub strict_required: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            remove_accents: false,
            trim_text: true,
            format_xml: false,
            indent: 2,
            omit_declaration: false,
            encoding: "UTF-8".to_string(),
            collect_alerts: true,
            strict_required: false,
        }
    }
}

impl SerializerOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_remove_accents(mut self, value: bool) -> Self {
        self.remove_accents = value;
        self
    }

    pub fn with_format_xml(mut self, value: bool) -> Self {
        self.format_xml = value;
        self
    }

    pub fn with_omit_declaration(mut self, value: bool) -> Self {
        self.omit_declaration = value;
        self
    }

    pub fn with_strict_required(mut self, value: bool) -> Self {
        self.strict_required = value;
        self
    }

    /// Validates the options and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.encoding.eq_ignore_ascii_case("UTF-8") {
            errors.push(format!("Unsupported encoding: {}", self.encoding));
        }

        if self.format_xml && self.indent == 0 {
            errors.push("Indent cannot be 0 when formatting XML".to_string());
        }

        if self.indent > 16 {
            errors.push("Indent cannot exceed 16 spaces".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
