//! Logbook pinning.
//!
//! Operations that create or list snippets under the selected logbook take a
//! [`RequestContext`]. It fills `parentId` and the six ACL fields a caller left
//! absent from the pinned logbook; anything the caller set, including an
//! explicit null, is kept.

use crate::models::{AclKind, AclValue, Basesnippet, Field, GroupSet, Logbook};

/// Per-call view of the pinned logbook.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    logbook: Option<&'a Logbook>,
    quiet: bool,
}

/// Values a pinned logbook contributes to a snippet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PinnedDefaults {
    pub parent_id: Option<String>,
    /// Only the logbook's non-empty ACLs.
    pub acls: Vec<(AclKind, AclValue)>,
}

impl<'a> RequestContext<'a> {
    pub fn new(logbook: Option<&'a Logbook>) -> Self {
        Self {
            logbook,
            quiet: false,
        }
    }

    /// Report a missing pin at debug level instead of as a warning.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn logbook(&self) -> Option<&'a Logbook> {
        self.logbook
    }

    pub fn is_pinned(&self) -> bool {
        self.logbook.is_some()
    }

    pub fn defaults(&self) -> Option<PinnedDefaults> {
        let logbook = self.logbook?;
        let acls = AclKind::ALL
            .into_iter()
            .filter_map(|kind| match logbook.base.acl(kind) {
                Field::Value(value) if value.is_truthy() => Some((kind, value.clone())),
                _ => None,
            })
            .collect();
        Some(PinnedDefaults {
            parent_id: logbook.base.id.value().cloned(),
            acls,
        })
    }

    /// Fill absent `parentId` and ACL fields from the pinned logbook.
    ///
    /// Returns false when no logbook is pinned; nothing is injected then.
    pub fn apply(&self, base: &mut Basesnippet) -> bool {
        self.inject(base, true)
    }

    /// Like [`apply`](Self::apply) but leaves `parentId` alone.
    pub fn apply_acls(&self, base: &mut Basesnippet) -> bool {
        self.inject(base, false)
    }

    fn inject(&self, base: &mut Basesnippet, with_parent: bool) -> bool {
        let Some(defaults) = self.defaults() else {
            if self.quiet {
                tracing::debug!("No logbook selected.");
            } else {
                tracing::warn!("No logbook selected.");
            }
            return false;
        };

        if with_parent && base.parent_id.is_absent() {
            if let Some(parent_id) = defaults.parent_id {
                base.parent_id.set(parent_id);
            }
        }
        for (kind, value) in defaults.acls {
            let field = base.acl_mut(kind);
            if field.is_absent() {
                field.set(value);
            }
        }
        true
    }

    /// Groups a `"default"` placeholder on `kind` stands for: the caller's
    /// override, else the pinned logbook's concrete groups, else nothing.
    pub fn inherited(&self, kind: AclKind, overrides: &AclOverrides) -> GroupSet {
        if let Some(groups) = overrides.get(&kind) {
            return groups.clone();
        }
        match self.logbook.map(|logbook| logbook.base.acl(kind)) {
            Some(Field::Value(AclValue::Explicit(groups))) => groups.clone(),
            _ => GroupSet::new(),
        }
    }
}

/// Caller-supplied inherited values for placeholder resolution.
pub type AclOverrides = std::collections::HashMap<AclKind, GroupSet>;
