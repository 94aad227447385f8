use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Basesnippet, Field, Snippet};
use crate::error::{Error, Result};

/// Extensions rendered inline as images.
pub const IMAGE_TYPES: [&str; 3] = ["png", "jpg", "jpeg"];

const IMAGE_WIDTH: &str = "82.25%";

/// Legacy field names and the ACL group they now alias.
///
/// Fields aliasing `"ACLS"` are forwarded with the six ACLs when a file's own
/// snippet is created.
pub const DEPRECATED_BY: &[(&str, &str)] = &[("accessGroups", "ACLS")];

/// Server-side record of an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filesnippet {
    #[serde(flatten)]
    pub base: Basesnippet,
    /// Lower-cased extension without the leading dot.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub file_extension: Field<String>,
    /// Token allowing the file to be referenced inline without re-auth.
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    pub access_hash: Field<String>,
}

impl Default for Filesnippet {
    fn default() -> Self {
        Self {
            base: Basesnippet::of_type("file"),
            file_extension: Field::Absent,
            access_hash: Field::Absent,
        }
    }
}

impl Snippet for Filesnippet {
    const SNIPPET_TYPE: Option<&'static str> = Some("file");
    const FIELDS: &'static [&'static str] = &["fileExtension", "accessHash"];

    fn base(&self) -> &Basesnippet {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Basesnippet {
        &mut self.base
    }

    fn validate(&self) -> Result<()> {
        match &self.file_extension {
            Field::Value(ext) if ext.is_empty() => Err(Error::Validation(
                "fileExtension must not be empty".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl Filesnippet {
    /// Legacy fields forwarded alongside the ACLs.
    pub fn acl_aliases() -> impl Iterator<Item = &'static str> {
        DEPRECATED_BY
            .iter()
            .filter(|(_, group)| *group == "ACLS")
            .map(|(name, _)| *name)
    }
}

/// Reference from a snippet to one of its attachments.
///
/// `file_hash` ties the descriptor to the inline markup that displays it.
/// Keys this client does not model are kept in `extra` and sent back as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub file_hash: String,
    /// Local path; dropped once the file has been uploaded on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    /// Content class and extension, e.g. `image/png` or `file/pdf`.
    pub file_extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<FileStyle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileDescriptor {
    pub fn is_uploaded(&self) -> bool {
        self.file_id.is_some()
    }
}

/// Display size of an inline image.
///
/// The web editor stores more keys here (e.g. `ratio`); they live in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileStyle {
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Lower-cased extension of `path`, without the dot.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn is_image(extension: &str) -> bool {
    IMAGE_TYPES.contains(&extension.to_lowercase().as_str())
}

/// `image/<ext>` for inline images, `file/<ext>` for everything else.
pub fn content_type(extension: &str) -> String {
    let extension = extension.to_lowercase();
    let class = if is_image(&extension) { "image" } else { "file" };
    format!("{}/{}", class, extension)
}

/// Build the descriptor and inline markup for `path` under a fresh hash.
pub fn prepare_file_content(
    path: &Path,
    filesnippet: Option<&Filesnippet>,
) -> (FileDescriptor, String) {
    render_file_content(path, filesnippet, &Uuid::new_v4().to_string())
}

/// Build the descriptor and inline markup for `path` under `file_hash`.
pub fn render_file_content(
    path: &Path,
    filesnippet: Option<&Filesnippet>,
    file_hash: &str,
) -> (FileDescriptor, String) {
    let extension = file_extension(path).unwrap_or_default();

    let mut descriptor = FileDescriptor {
        file_hash: file_hash.to_string(),
        filepath: Some(path.to_string_lossy().into_owned()),
        file_extension: content_type(&extension),
        file_id: filesnippet.and_then(|f| f.base.id.value().cloned()),
        access_hash: filesnippet.and_then(|f| f.access_hash.value().cloned()),
        ..Default::default()
    };

    let markup = if is_image(&extension) {
        descriptor.style = Some(FileStyle {
            width: IMAGE_WIDTH.to_string(),
            ..Default::default()
        });
        format!(
            r#"<figure class="image image_resized"><img src="" title="{}"></figure>"#,
            file_hash
        )
    } else {
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            r#"<p><a class="fileLink" target="_blank" href="file:{}">{}</a></p>"#,
            file_hash, basename
        )
    };

    (descriptor, markup)
}
