use serde::{Deserialize, Serialize};

use super::{Basesnippet, Field, Snippet};

/// A text entry in a logbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(flatten)]
    pub base: Basesnippet,
    /// Rendered body, HTML or plain text.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub textcontent: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub is_message: Field<bool>,
}

impl Default for Paragraph {
    fn default() -> Self {
        Self {
            base: Basesnippet::of_type("paragraph"),
            textcontent: Field::Absent,
            is_message: Field::Absent,
        }
    }
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            textcontent: Field::Value(text.into()),
            ..Default::default()
        }
    }
}

impl Snippet for Paragraph {
    const SNIPPET_TYPE: Option<&'static str> = Some("paragraph");
    const FIELDS: &'static [&'static str] = &["textcontent", "isMessage"];

    fn base(&self) -> &Basesnippet {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Basesnippet {
        &mut self.base
    }
}
