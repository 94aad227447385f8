use serde::{Deserialize, Serialize};

use super::{Basesnippet, Field, Snippet};

/// A physical location (beamline, lab, instrument) that logbooks refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(flatten)]
    pub base: Basesnippet,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub contact: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub thumbnail: Field<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            base: Basesnippet::of_type("location"),
            name: Field::Absent,
            contact: Field::Absent,
            thumbnail: Field::Absent,
        }
    }
}

impl Snippet for Location {
    const SNIPPET_TYPE: Option<&'static str> = Some("location");
    const FIELDS: &'static [&'static str] = &["name", "contact", "thumbnail"];

    fn base(&self) -> &Basesnippet {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Basesnippet {
        &mut self.base
    }
}
