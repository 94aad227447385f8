use serde::{Deserialize, Serialize};

use super::{Basesnippet, Field, Snippet};

/// A logbook: the parent of entries and the source of their default ACLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Logbook {
    #[serde(flatten)]
    pub base: Basesnippet,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    /// Id of the [`Location`](super::Location) snippet.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub location: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub thumbnail: Field<String>,
}

impl Default for Logbook {
    fn default() -> Self {
        Self {
            base: Basesnippet::of_type("logbook"),
            name: Field::Absent,
            description: Field::Absent,
            location: Field::Absent,
            thumbnail: Field::Absent,
        }
    }
}

impl Snippet for Logbook {
    const SNIPPET_TYPE: Option<&'static str> = Some("logbook");
    const FIELDS: &'static [&'static str] = &["name", "description", "location", "thumbnail"];

    fn base(&self) -> &Basesnippet {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Basesnippet {
        &mut self.base
    }
}
