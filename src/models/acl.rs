//! Access-control lists and the `"default"` inheritance placeholder.
//!
//! On the wire every ACL field is an array of group names. Callers describing
//! a snippet may instead write `"default"` (inherit the pinned value) or a list
//! containing `"default"` (inherit and add explicit groups). Both forms are
//! parsed into [`AclValue`] and must be resolved before a payload is sent.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::Field;
use crate::error::{Error, Result};

/// Token marking an inherited ACL.
pub const PLACEHOLDER: &str = "default";

/// A set of group names. Ordering is not significant.
pub type GroupSet = BTreeSet<String>;

/// The six ACL fields every snippet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclKind {
    Create,
    Read,
    Update,
    Delete,
    Share,
    Admin,
}

impl AclKind {
    pub const ALL: [AclKind; 6] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::Share,
        Self::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "createACL",
            Self::Read => "readACL",
            Self::Update => "updateACL",
            Self::Delete => "deleteACL",
            Self::Share => "shareACL",
            Self::Admin => "adminACL",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

/// Value of one ACL field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclValue {
    /// Concrete groups; the only shape allowed on the wire.
    Explicit(GroupSet),
    /// `"default"`: take the inherited groups verbatim.
    Inherit,
    /// `["default", ...]`: inherited groups plus the listed ones.
    InheritPlus(GroupSet),
}

impl AclValue {
    pub fn groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(groups.into_iter().map(Into::into).collect())
    }

    /// Parse the JSON shape a caller used for `field`.
    pub fn parse(field: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(s) if s == PLACEHOLDER => Ok(Self::Inherit),
            Value::Array(items) => {
                let mut inherit = false;
                let mut groups = GroupSet::new();
                for item in items {
                    match item {
                        Value::String(s) if s == PLACEHOLDER => inherit = true,
                        Value::String(s) if s.is_empty() => {}
                        Value::String(s) => {
                            groups.insert(s.clone());
                        }
                        other => return Err(unsupported(field, other)),
                    }
                }
                Ok(if inherit {
                    Self::InheritPlus(groups)
                } else {
                    Self::Explicit(groups)
                })
            }
            other => Err(unsupported(field, other)),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Self::Explicit(_))
    }

    /// True for a concrete, non-empty group set.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Explicit(groups) => !groups.is_empty(),
            Self::Inherit | Self::InheritPlus(_) => true,
        }
    }

    /// Substitute `inherited` for the placeholder part of this value.
    pub fn resolve(self, inherited: &GroupSet) -> GroupSet {
        match self {
            Self::Explicit(groups) => groups,
            Self::Inherit => inherited.clone(),
            Self::InheritPlus(mut groups) => {
                groups.extend(inherited.iter().cloned());
                groups
            }
        }
    }
}

fn unsupported(field: &str, value: &Value) -> Error {
    Error::UnsupportedPlaceholder {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Resolve a placeholder ACL field in place against `inherited`.
///
/// Absent and null fields are left untouched.
pub fn resolve_placeholder(field: &mut Field<AclValue>, inherited: &GroupSet) {
    if let Field::Value(value) = field {
        let groups = std::mem::replace(value, AclValue::Explicit(GroupSet::new())).resolve(inherited);
        *value = AclValue::Explicit(groups);
    }
}

impl Serialize for AclValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Placeholders keep their caller-facing shape so a merge round-trips.
        // Facade operations reject them before anything is transmitted.
        match self {
            Self::Explicit(groups) => groups.serialize(serializer),
            Self::Inherit => serializer.serialize_str(PLACEHOLDER),
            Self::InheritPlus(groups) => {
                let mut items = vec![PLACEHOLDER];
                items.extend(groups.iter().map(String::as_str));
                items.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for AclValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::parse("ACL", &value).map_err(serde::de::Error::custom)
    }
}
