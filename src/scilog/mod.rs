//! Client facade for the SciLog logbook service.
//!
//! [`SciLog`] wraps a [`Transport`] and the currently selected logbook. Every
//! operation that creates or lists entries builds a [`RequestContext`] from
//! that selection, so new entries land under the logbook and inherit its ACLs
//! unless the caller set them.
//!
//! Requests are issued one at a time; uploads for a snippet run in the order
//! the files were given.

pub mod attachments;
pub mod client;
pub mod context;

use std::path::Path;

use serde_json::{Map, Value};

pub use client::{make_filter, ClientError, FileUpload, HttpTransport, Transport};
pub use context::{AclOverrides, PinnedDefaults, RequestContext};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::*;
use attachments::{build_upload, check_upload_path};

const SNIPPETS_PATH: &str = "/basesnippets";
const FILES_PATH: &str = "/filesnippet/files";

/// Session with a SciLog server.
#[derive(Debug)]
pub struct SciLog<T = HttpTransport> {
    transport: T,
    logbook: Option<Logbook>,
}

impl SciLog<HttpTransport> {
    /// Create a client over HTTP from a loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }

    /// Log in with a password and keep the token for this session.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.transport.login(username, password).await?;
        Ok(())
    }
}

impl<T: Transport> SciLog<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            logbook: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pin `logbook` as parent and ACL source for subsequent entries.
    ///
    /// The logbook is trusted as given; nothing is checked against the server.
    pub fn select_logbook(&mut self, logbook: Logbook) {
        let label = logbook.name.value().or(logbook.base.id.value());
        tracing::info!("Selected logbook {}", label.map_or("<unnamed>", |s| s.as_str()));
        self.logbook = Some(logbook);
    }

    pub fn logbook(&self) -> Option<&Logbook> {
        self.logbook.as_ref()
    }

    pub fn context(&self) -> RequestContext<'_> {
        RequestContext::new(self.logbook.as_ref())
    }

    // ============================================================
    // Queries
    // ============================================================

    /// List logbooks matching `filter`. The caller picks among the results.
    pub async fn get_logbooks(&self, filter: Logbook) -> Result<Vec<Logbook>> {
        let mut filter = filter;
        filter.base.snippet_type.set("logbook".to_string());
        let conditions = filter.to_fields(false)?;

        let response = self
            .transport
            .get(SNIPPETS_PATH, Some(&make_filter(&conditions)))
            .await?;
        Logbook::list_from_response(response)
    }

    /// List entries matching `filter` under the selected logbook.
    pub async fn get_snippets(&self, filter: Basesnippet) -> Result<Vec<Paragraph>> {
        let mut filter = filter;
        self.context().apply(&mut filter);
        filter.ensure_resolved()?;
        let conditions = filter.to_fields(false)?;

        let response = self
            .transport
            .get(SNIPPETS_PATH, Some(&make_filter(&conditions)))
            .await?;
        Paragraph::list_from_response(response)
    }

    // ============================================================
    // Creates
    // ============================================================

    /// Create a paragraph with `text` as its body.
    ///
    /// Fields set on `fields` take precedence over the pinned logbook's.
    pub async fn send_message(
        &self,
        text: impl Into<String>,
        fields: Paragraph,
    ) -> Result<Paragraph> {
        self.send_message_in(self.context(), text.into(), fields)
            .await
    }

    async fn send_message_in(
        &self,
        ctx: RequestContext<'_>,
        text: String,
        mut fields: Paragraph,
    ) -> Result<Paragraph> {
        fields.textcontent.set(text);
        self.post_snippet_in(ctx, fields).await
    }

    /// Create a paragraph from a caller-described field map.
    ///
    /// `textcontent` is required. ACL placeholders resolve against
    /// `acl_overrides`, falling back to the selected logbook's ACLs.
    pub async fn import_from_dict(
        &self,
        snippet: Map<String, Value>,
        acl_overrides: &AclOverrides,
    ) -> Result<Paragraph> {
        let ctx = self.context();
        let mut fields = snippet;
        let text = match fields.remove("textcontent") {
            Some(Value::String(text)) => text,
            Some(other) => {
                return Err(Error::Validation(format!(
                    "textcontent must be a string, got {}",
                    other
                )))
            }
            None => return Err(Error::Validation("textcontent is required".to_string())),
        };

        let mut paragraph = Paragraph::default();
        paragraph.import_fields(fields)?;
        for kind in AclKind::ALL {
            let inherited = ctx.inherited(kind, acl_overrides);
            resolve_placeholder(paragraph.base.acl_mut(kind), &inherited);
        }

        self.send_message_in(ctx, text, paragraph).await
    }

    /// Create any snippet kind under the selected logbook.
    ///
    /// Attachments without a `fileId` are uploaded first.
    pub async fn post_snippet<S: Snippet>(&self, snippet: S) -> Result<S> {
        self.post_snippet_in(self.context(), snippet).await
    }

    pub async fn post_location(&self, location: Location) -> Result<Location> {
        self.post_snippet(location).await
    }

    async fn post_snippet_in<S: Snippet>(
        &self,
        ctx: RequestContext<'_>,
        mut snippet: S,
    ) -> Result<S> {
        ctx.apply(snippet.base_mut());
        snippet.base().ensure_resolved()?;
        self.upload_pending_files(ctx, snippet.base_mut()).await?;

        let payload = wire_payload(&snippet)?;
        tracing::info!(
            "Creating {} snippet under {}",
            S::kind_name(),
            snippet.base().parent_id.value().map_or("<no parent>", |s| s.as_str())
        );
        tracing::debug!("Payload: {}", serde_json::Value::Object(payload.clone()));

        let response = self
            .transport
            .post(SNIPPETS_PATH, &Value::Object(payload))
            .await?;
        S::from_response(response)
    }

    /// Upload every attachment of `base` that has no `fileId` yet.
    async fn upload_pending_files(
        &self,
        ctx: RequestContext<'_>,
        base: &mut Basesnippet,
    ) -> Result<()> {
        let pending = base
            .files
            .value()
            .is_some_and(|files| files.iter().any(|f| !f.is_uploaded()));
        if !pending {
            return Ok(());
        }

        // The file snippets get the same access rules as their parent.
        let forwarded: Map<String, Value> = base
            .to_fields(false)?
            .into_iter()
            .filter(|(key, _)| {
                AclKind::from_str(key).is_some()
                    || Filesnippet::acl_aliases().any(|alias| key.as_str() == alias)
            })
            .collect();

        let Some(files) = base.files.value_mut() else {
            return Ok(());
        };
        for descriptor in files.iter_mut().filter(|f| !f.is_uploaded()) {
            let filepath = descriptor.filepath.take().ok_or_else(|| {
                Error::Validation("file descriptor has neither fileId nor filepath".to_string())
            })?;
            tracing::info!("Posting from filepath: {}", filepath);

            let mut fields = Filesnippet::default();
            fields.import_fields(forwarded.clone())?;
            let fsnippet = self
                .post_filesnippet(ctx, Path::new(&filepath), fields)
                .await?;

            descriptor.file_id = fsnippet.base.id.into_value();
            descriptor.access_hash = fsnippet.access_hash.into_value();
        }
        Ok(())
    }

    // ============================================================
    // Files
    // ============================================================

    /// Upload a file as its own snippet.
    ///
    /// Fails with [`Error::FileNotFound`] or [`Error::MissingExtension`]
    /// before any request is made. The returned snippet carries the `id` and
    /// `accessHash` needed to reference the file.
    pub async fn post_file(
        &self,
        filepath: impl AsRef<Path>,
        fields: Filesnippet,
    ) -> Result<Filesnippet> {
        let filepath = filepath.as_ref();
        check_upload_path(filepath)?;
        self.post_filesnippet(self.context(), filepath, fields).await
    }

    async fn post_filesnippet(
        &self,
        ctx: RequestContext<'_>,
        filepath: &Path,
        mut fields: Filesnippet,
    ) -> Result<Filesnippet> {
        let extension = check_upload_path(filepath)?;
        ctx.apply_acls(&mut fields.base);
        fields.file_extension.set(extension.clone());
        fields.base.clear_server_owned();
        fields.base.ensure_resolved()?;

        let upload = build_upload(filepath, &extension, &fields).await?;
        tracing::info!(
            "Uploading {} as {} ({} bytes)",
            filepath.display(),
            upload.content_type,
            upload.content.len()
        );

        let response = self.transport.post_file(FILES_PATH, upload).await?;
        Filesnippet::from_response(response)
    }

    /// Upload `filepaths` in order and append them to an existing snippet.
    ///
    /// Each file's markup is appended to `textcontent` and its descriptor to
    /// `files`, then the snippet is patched once. If an upload fails, files
    /// uploaded before it stay on the server and the snippet is not patched.
    pub async fn append_files_to_snippet<P: AsRef<Path>>(
        &self,
        snippet: Paragraph,
        filepaths: &[P],
    ) -> Result<Paragraph> {
        if snippet.base.id.value().is_none() {
            return Err(Error::MissingId);
        }
        let ctx = self.context();
        let mut snippet = snippet;

        for filepath in filepaths {
            let filepath = filepath.as_ref();
            check_upload_path(filepath)?;
            let fsnippet = self
                .post_filesnippet(ctx, filepath, Filesnippet::default())
                .await?;

            let (descriptor, markup) = prepare_file_content(filepath, Some(&fsnippet));
            snippet
                .textcontent
                .get_or_insert_with(String::new)
                .push_str(&markup);
            snippet
                .base
                .files
                .get_or_insert_with(Vec::new)
                .push(descriptor);
        }

        self.patch_snippet(&snippet, Map::new()).await?;
        Ok(snippet)
    }

    // ============================================================
    // Updates
    // ============================================================

    /// Merge `fields` into `snippet` and PATCH it on the server.
    ///
    /// Server-owned fields are never sent. Returns the server's copy when the
    /// response has a body.
    pub async fn patch_snippet<S: Snippet>(
        &self,
        snippet: &S,
        fields: Map<String, Value>,
    ) -> Result<Option<S>> {
        let id = snippet.base().id.value().cloned().ok_or(Error::MissingId)?;
        let mut patched = snippet.clone();
        patched.import_fields(fields)?;
        let payload = wire_payload(&patched)?;

        tracing::info!("Patching snippet {}", id);
        let response = self
            .transport
            .patch(&format!("{}/{}", SNIPPETS_PATH, id), &Value::Object(payload))
            .await?;
        match response {
            Value::Null => Ok(None),
            other => Ok(Some(S::from_response(other)?)),
        }
    }

    /// Post a message built with [`LogbookMessage`].
    ///
    /// A missing logbook selection is not reported as a warning here.
    pub async fn send_logbook_message(&self, message: LogbookMessage) -> Result<Paragraph> {
        let mut paragraph = message.into_paragraph();
        paragraph.base.link_type.set("paragraph".to_string());
        self.post_snippet_in(self.context().quiet(), paragraph)
            .await
    }
}

/// Field map sent on create and patch: server-owned fields stripped, no
/// placeholders left.
fn wire_payload<S: Snippet>(snippet: &S) -> Result<Map<String, Value>> {
    let mut snippet = snippet.clone();
    snippet.base_mut().clear_server_owned();
    snippet.base().ensure_resolved()?;
    snippet.to_fields(false)
}
