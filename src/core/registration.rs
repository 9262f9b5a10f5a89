/*
 * Handler-registration operations: the two atomic mutations that change an
 * extension's handler binding, plus the capability flag that gates
 * assignment. The controller only ever talks to the
 * `HandlerRegistryOperations` trait; `CoreHandlerRegistry` is the in-process
 * implementation that performs the record mutations (the OS-level
 * registration mechanics live behind it and are out of scope here).
 */
use super::models::{ExtensionHandle, ProfileHandle};
use std::rc::Rc;

pub trait HandlerRegistryOperations {
    /// Binds `profile` to `extension`. Idempotent when the extension is
    /// already bound to the same profile. Returns `false` on failure (e.g.
    /// the capability is unavailable, or a foreign handler owns the
    /// extension); never panics.
    fn bind_profile(&self, extension: &ExtensionHandle, profile: &ProfileHandle) -> bool;

    /// Removes our handler binding from `extension`. A no-op unless the
    /// extension is currently bound to our handler; failures are silent.
    fn unbind_profile(&self, extension: &ExtensionHandle);

    /// Whether handler registration is available at all in this process
    /// (e.g. the property-handler component is installed and registerable).
    fn registration_available(&self) -> bool;
}

pub struct CoreHandlerRegistry {
    available: bool,
}

impl CoreHandlerRegistry {
    pub fn new() -> Self {
        CoreHandlerRegistry { available: true }
    }

    /// Builds a registry with an explicit capability flag, for sessions where
    /// the handler component is known to be unregisterable.
    pub fn with_availability(available: bool) -> Self {
        CoreHandlerRegistry { available }
    }
}

impl Default for CoreHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistryOperations for CoreHandlerRegistry {
    fn bind_profile(&self, extension: &ExtensionHandle, profile: &ProfileHandle) -> bool {
        let mut record = extension.borrow_mut();
        if !self.available {
            log::debug!(
                "CoreHandlerRegistry: Registration unavailable, cannot bind '{}' for {}.",
                profile.name,
                record.extension
            );
            return false;
        }
        if record.has_handler && !record.is_our_handler {
            log::debug!(
                "CoreHandlerRegistry: {} is owned by a foreign handler, refusing to bind.",
                record.extension
            );
            return false;
        }
        if record.has_handler
            && record.is_our_handler
            && let Some(bound) = &record.bound_profile
            && Rc::ptr_eq(bound, profile)
        {
            log::trace!(
                "CoreHandlerRegistry: {} already bound to '{}'.",
                record.extension,
                profile.name
            );
            return true;
        }
        record.has_handler = true;
        record.is_our_handler = true;
        record.bound_profile = Some(Rc::clone(profile));
        log::debug!(
            "CoreHandlerRegistry: Bound '{}' to {}.",
            profile.name,
            record.extension
        );
        true
    }

    fn unbind_profile(&self, extension: &ExtensionHandle) {
        let mut record = extension.borrow_mut();
        if !record.has_handler || !record.is_our_handler {
            log::trace!(
                "CoreHandlerRegistry: {} has no handler of ours, unbind is a no-op.",
                record.extension
            );
            return;
        }
        record.has_handler = false;
        record.is_our_handler = false;
        record.bound_profile = None;
        log::debug!("CoreHandlerRegistry: Unbound {}.", record.extension);
    }

    fn registration_available(&self) -> bool {
        self.available
    }
}
