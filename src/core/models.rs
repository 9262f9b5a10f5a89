use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/*
 * Core data units of the association catalog: file-name extensions and the
 * metadata-display profiles that can be bound to them. The catalog owns both;
 * the rest of the application only holds shared handles. Extension records
 * carry mutable handler-binding state (written exclusively by the
 * handler-registration operations), so their handle is `Rc<RefCell<_>>`;
 * profile records are immutable once constructed, so a plain `Rc` suffices.
 */

/* Shared handle to an extension record owned by the catalog. */
pub type ExtensionHandle = Rc<RefCell<ExtensionRecord>>;

/* Shared handle to an immutable profile record. */
pub type ProfileHandle = Rc<ProfileRecord>;

// One file-name extension and its current handler binding.
// `is_our_handler` is meaningful only while `has_handler` is set, and
// `bound_profile` only while `is_our_handler` is set.
#[derive(Debug, Clone)]
pub struct ExtensionRecord {
    pub extension: String,
    pub has_handler: bool,
    pub is_our_handler: bool,
    pub bound_profile: Option<ProfileHandle>,
}

impl ExtensionRecord {
    /// Creates a record for an extension with no property handler at all.
    pub fn unhandled(extension: impl Into<String>) -> Self {
        ExtensionRecord {
            extension: extension.into(),
            has_handler: false,
            is_our_handler: false,
            bound_profile: None,
        }
    }

    /// Creates a record for an extension owned by another application's handler.
    pub fn foreign(extension: impl Into<String>) -> Self {
        ExtensionRecord {
            extension: extension.into(),
            has_handler: true,
            is_our_handler: false,
            bound_profile: None,
        }
    }

    /// Creates a record for an extension already bound to one of our profiles.
    pub fn bound(extension: impl Into<String>, profile: ProfileHandle) -> Self {
        ExtensionRecord {
            extension: extension.into(),
            has_handler: true,
            is_our_handler: true,
            bound_profile: Some(profile),
        }
    }

    pub fn into_handle(self) -> ExtensionHandle {
        Rc::new(RefCell::new(self))
    }
}

// A node of a profile's full-details display tree: either a property group
// (label with children) or a leaf property (label only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailNode {
    pub label: String,
    #[serde(default)]
    pub children: Vec<DetailNode>,
}

impl DetailNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        DetailNode {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn group(label: impl Into<String>, children: Vec<DetailNode>) -> Self {
        DetailNode {
            label: label.into(),
            children,
        }
    }
}

// A named metadata-display configuration. Built-in profiles are constructed
// in code at startup; custom profiles are the only ones that persist to disk,
// which is why `is_built_in` is skipped during (de)serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    #[serde(skip)]
    pub is_built_in: bool,
    #[serde(default)]
    pub full_details: Vec<DetailNode>,
    #[serde(default)]
    pub preview_details: Vec<String>,
}

impl ProfileRecord {
    /// Creates a new, empty custom profile with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        ProfileRecord {
            name: name.into(),
            is_built_in: false,
            full_details: Vec::new(),
            preview_details: Vec::new(),
        }
    }

    pub(crate) fn built_in(
        name: impl Into<String>,
        full_details: Vec<DetailNode>,
        preview_details: Vec<String>,
    ) -> Self {
        ProfileRecord {
            name: name.into(),
            is_built_in: true,
            full_details,
            preview_details,
        }
    }

    pub fn into_handle(self) -> ProfileHandle {
        Rc::new(self)
    }
}
