//! Upload preparation for file attachments.
//!
//! An attachment appears twice in its parent snippet: as inline markup in
//! `textcontent` and as a [`FileDescriptor`](crate::models::FileDescriptor) in
//! `files`; both are rendered by
//! [`prepare_file_content`](crate::models::prepare_file_content). This module
//! checks paths and builds the multipart upload that creates the file's own
//! snippet.

use std::path::Path;

use super::client::FileUpload;
use crate::error::{Error, Result};
use crate::models::{content_type, file_extension, Filesnippet, Snippet};

/// Check that `path` can be uploaded and return its extension.
///
/// Runs before any request is made.
pub fn check_upload_path(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    file_extension(path).ok_or_else(|| Error::MissingExtension(path.to_path_buf()))
}

/// Read `path` and pair it with the JSON sidecar of `snippet`.
///
/// `extension` is the one returned by [`check_upload_path`].
pub async fn build_upload(
    path: &Path,
    extension: &str,
    snippet: &Filesnippet,
) -> Result<FileUpload> {
    let content = tokio::fs::read(path).await?;
    let basename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileUpload {
        file_name: format!("{}.{}", basename, extension),
        content_type: content_type(extension),
        content,
        fields: snippet.to_fields(false)?,
    })
}
