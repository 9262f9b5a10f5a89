/*
 * This module consolidates the core, platform-agnostic logic of the
 * application. It re-exports the catalog data model, the selection
 * classifier, and the collaborator abstractions (`CatalogOperations`,
 * `HandlerRegistryOperations`) together with their concrete implementations,
 * plus the path utilities the catalog persists custom profiles with.
 */
pub mod catalog;
pub mod classifier;
pub mod models;
pub mod path_utils;
pub mod registration;

// Re-export key structures and enums
pub use models::{DetailNode, ExtensionHandle, ExtensionRecord, ProfileHandle, ProfileRecord};

// Re-export classifier items
pub use classifier::{Classification, classify};

// Re-export catalog related items
pub use catalog::{CatalogOperations, CoreCatalog, sanitize_profile_name};

#[cfg(test)]
pub use catalog::CatalogError;

// Re-export handler-registration related items
pub use registration::{CoreHandlerRegistry, HandlerRegistryOperations};
