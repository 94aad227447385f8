//! Snippet model for the SciLog service.
//!
//! # Kinds
//!
//! Every logbook entry is a snippet. [`Basesnippet`] holds the fields all kinds
//! share (parent, owner group, ACLs, tags, attachments, audit stamps); the
//! concrete kinds embed it and fix `snippetType`:
//!
//! - [`Logbook`]: a logbook, the parent and ACL source of its entries.
//! - [`Paragraph`]: a text entry.
//! - [`Filesnippet`]: an uploaded file, referenced from other snippets through
//!   a [`FileDescriptor`].
//! - [`Location`]: a physical location logbooks belong to.
//!
//! Caller-supplied field maps go through [`Snippet::import_fields`], which
//! rejects unknown fields. Server responses deserialize leniently.
//!
//! [`LogbookMessage`] is a client-side builder, not a server entity.

pub mod acl;
mod field;
mod file;
mod location;
mod logbook;
mod message;
mod paragraph;
mod snippet;

pub use acl::{resolve_placeholder, AclKind, AclValue, GroupSet};
pub use field::*;
pub use file::*;
pub use location::*;
pub use logbook::*;
pub use message::*;
pub use paragraph::*;
pub use snippet::*;
