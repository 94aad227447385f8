use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use super::acl::{AclKind, AclValue};
use super::{Field, FileDescriptor};
use crate::error::{Error, Result};

/// Field names shared by every snippet kind.
pub const BASE_FIELDS: &[&str] = &[
    "id",
    "snippetType",
    "parentId",
    "ownerGroup",
    "accessGroups",
    "isPrivate",
    "tags",
    "linkType",
    "defaultOrder",
    "versionable",
    "deleted",
    "files",
    "createACL",
    "readACL",
    "updateACL",
    "deleteACL",
    "shareACL",
    "adminACL",
    "createdAt",
    "createdBy",
    "updatedAt",
    "updatedBy",
    "expiresAt",
];

/// The common part of every logbook entry.
///
/// Concrete kinds embed it with `#[serde(flatten)]` and add their own fields.
/// `id` and the audit timestamps are owned by the server: they are filled from
/// responses and stripped from every create and patch payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basesnippet {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub id: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub snippet_type: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub parent_id: Field<String>,
    /// Group used for server-side filtering. Not an ACL.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub owner_group: Field<String>,
    /// Deprecated: superseded by the six ACL fields.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub access_groups: Field<Vec<String>>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub is_private: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub tags: Field<Vec<String>>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub link_type: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub default_order: Field<i64>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub versionable: Field<bool>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub deleted: Field<bool>,
    /// Attachments in display order.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub files: Field<Vec<FileDescriptor>>,
    #[serde(rename = "createACL", default, skip_serializing_if = "Field::is_absent")]
    pub create_acl: Field<AclValue>,
    #[serde(rename = "readACL", default, skip_serializing_if = "Field::is_absent")]
    pub read_acl: Field<AclValue>,
    #[serde(rename = "updateACL", default, skip_serializing_if = "Field::is_absent")]
    pub update_acl: Field<AclValue>,
    #[serde(rename = "deleteACL", default, skip_serializing_if = "Field::is_absent")]
    pub delete_acl: Field<AclValue>,
    #[serde(rename = "shareACL", default, skip_serializing_if = "Field::is_absent")]
    pub share_acl: Field<AclValue>,
    #[serde(rename = "adminACL", default, skip_serializing_if = "Field::is_absent")]
    pub admin_acl: Field<AclValue>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub created_at: Field<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub created_by: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub updated_at: Field<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub updated_by: Field<String>,
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub expires_at: Field<DateTime<Utc>>,
}

impl Basesnippet {
    pub fn of_type(snippet_type: &str) -> Self {
        Self {
            snippet_type: Field::Value(snippet_type.to_string()),
            ..Default::default()
        }
    }

    pub fn acl(&self, kind: AclKind) -> &Field<AclValue> {
        match kind {
            AclKind::Create => &self.create_acl,
            AclKind::Read => &self.read_acl,
            AclKind::Update => &self.update_acl,
            AclKind::Delete => &self.delete_acl,
            AclKind::Share => &self.share_acl,
            AclKind::Admin => &self.admin_acl,
        }
    }

    pub fn acl_mut(&mut self, kind: AclKind) -> &mut Field<AclValue> {
        match kind {
            AclKind::Create => &mut self.create_acl,
            AclKind::Read => &mut self.read_acl,
            AclKind::Update => &mut self.update_acl,
            AclKind::Delete => &mut self.delete_acl,
            AclKind::Share => &mut self.share_acl,
            AclKind::Admin => &mut self.admin_acl,
        }
    }

    /// Remove the fields a client must never send back.
    pub fn clear_server_owned(&mut self) {
        self.id.clear();
        self.created_at.clear();
        self.created_by.clear();
        self.expires_at.clear();
    }

    /// Fail if any ACL field still holds a `"default"` placeholder.
    pub fn ensure_resolved(&self) -> Result<()> {
        for kind in AclKind::ALL {
            if let Field::Value(value) = self.acl(kind) {
                if value.is_placeholder() {
                    return Err(Error::UnresolvedPlaceholder(kind.as_str().to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Uniform import/export contract of every snippet kind.
pub trait Snippet: Clone + Serialize + DeserializeOwned {
    /// Fixed `snippetType`, or `None` for the untyped base record.
    const SNIPPET_TYPE: Option<&'static str>;

    /// Kind-specific field names, in addition to [`BASE_FIELDS`].
    const FIELDS: &'static [&'static str];

    fn base(&self) -> &Basesnippet;

    fn base_mut(&mut self) -> &mut Basesnippet;

    /// Kind-specific checks, run after every import.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn kind_name() -> &'static str {
        Self::SNIPPET_TYPE.unwrap_or("basesnippet")
    }

    fn knows_field(name: &str) -> bool {
        BASE_FIELDS.contains(&name) || Self::FIELDS.contains(&name)
    }

    /// Merge `fields` into this snippet, leaving unmentioned fields untouched.
    ///
    /// Unknown keys, malformed values and unsupported ACL shapes are rejected
    /// and leave the snippet unchanged.
    fn import_fields(&mut self, fields: Map<String, Value>) -> Result<()> {
        let mut merged = self.to_fields(false)?;
        for (key, value) in fields {
            if !Self::knows_field(&key) {
                return Err(Error::UnknownField {
                    kind: Self::kind_name(),
                    field: key,
                });
            }
            if AclKind::from_str(&key).is_some() && !value.is_null() {
                AclValue::parse(&key, &value)?;
            }
            merged.insert(key, value);
        }

        let mut snippet: Self = serde_json::from_value(Value::Object(merged))
            .map_err(|e| Error::Validation(format!("{} snippet: {}", Self::kind_name(), e)))?;
        snippet.check_snippet_type()?;
        snippet.validate()?;
        *self = snippet;
        Ok(())
    }

    /// Serialize to a flat field map.
    ///
    /// With `include_absent` every known field is present, absent ones as `null`.
    fn to_fields(&self, include_absent: bool) -> Result<Map<String, Value>> {
        let mut map = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::Validation(format!(
                    "{} snippet serialized to {}",
                    Self::kind_name(),
                    other
                )))
            }
        };
        if include_absent {
            for name in BASE_FIELDS.iter().chain(Self::FIELDS) {
                map.entry(name.to_string()).or_insert(Value::Null);
            }
        }
        Ok(map)
    }

    fn check_snippet_type(&mut self) -> Result<()> {
        let Some(expected) = Self::SNIPPET_TYPE else {
            return Ok(());
        };
        let base = self.base_mut();
        match &base.snippet_type {
            Field::Value(actual) if actual == expected => Ok(()),
            Field::Value(actual) => Err(Error::Validation(format!(
                "snippetType '{}' does not match {} snippet",
                actual, expected
            ))),
            Field::Absent | Field::Null => {
                base.snippet_type.set(expected.to_string());
                Ok(())
            }
        }
    }

    /// Build from a server response object.
    ///
    /// Fields the server reports as `null` come back absent, so a later patch
    /// does not send them.
    fn from_response(value: Value) -> Result<Self> {
        let value = match value {
            Value::Object(mut fields) => {
                fields.retain(|_, v| !v.is_null());
                Value::Object(fields)
            }
            other => other,
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Build from a server response that may be one object or an array.
    fn list_from_response(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::Array(items) => items.into_iter().map(Self::from_response).collect(),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![Self::from_response(other)?]),
        }
    }
}

impl Snippet for Basesnippet {
    const SNIPPET_TYPE: Option<&'static str> = None;
    const FIELDS: &'static [&'static str] = &[];

    fn base(&self) -> &Basesnippet {
        self
    }

    fn base_mut(&mut self) -> &mut Basesnippet {
        self
    }
}
