use super::notifications::{ChangeNotificationHub, ChangeObserver, ControllerProperty};
use crate::core::{
    CatalogOperations, Classification, DetailNode, ExtensionHandle, HandlerRegistryOperations,
    ProfileHandle, classify,
};
use std::rc::Rc;

/*
 * The association controller: reacts to selection changes reported by the
 * presentation layer, keeps the active profile in sync with the selection's
 * handler-state consensus, and gates the assign/remove/choose actions. It
 * depends on `CatalogOperations` for the profile and extension collections
 * and on `HandlerRegistryOperations` for the bind/unbind operations; both
 * are injected so the controller can be driven against mocks.
 *
 * One controller instance serves one top-level window. All entry points are
 * synchronous and must be serialized by the caller (the UI event loop);
 * nothing here is thread-safe by design.
 */
pub struct AssociationController {
    catalog: Rc<dyn CatalogOperations>,
    registry: Rc<dyn HandlerRegistryOperations>,
    selection: Vec<ExtensionHandle>,
    active_profile: Option<ProfileHandle>,
    classification: Classification,
    sort_required: bool,
    hub: ChangeNotificationHub,
}

impl AssociationController {
    /*
     * Builds a controller with an empty selection. The construction-time
     * defaults (classification `Other`, no active profile, all gates false)
     * are not announced through the hub; observers registered later start
     * from their first real recomputation.
     */
    pub fn new(
        catalog: Rc<dyn CatalogOperations>,
        registry: Rc<dyn HandlerRegistryOperations>,
    ) -> Self {
        AssociationController {
            catalog,
            registry,
            selection: Vec::new(),
            active_profile: None,
            classification: Classification::Other,
            sort_required: false,
            hub: ChangeNotificationHub::new(),
        }
    }

    pub fn register_observer(&mut self, observer: Rc<dyn ChangeObserver>) {
        self.hub.register(observer);
    }

    pub fn unregister_observer(&mut self, observer: &Rc<dyn ChangeObserver>) {
        self.hub.unregister(observer);
    }

    pub fn selection(&self) -> &[ExtensionHandle] {
        &self.selection
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn active_profile(&self) -> Option<ProfileHandle> {
        self.active_profile.clone()
    }

    /// The active profile's full-details tree; empty when no profile is active.
    pub fn full_details(&self) -> Vec<DetailNode> {
        self.active_profile
            .as_ref()
            .map(|p| p.full_details.clone())
            .unwrap_or_default()
    }

    /// The active profile's preview list; empty when no profile is active.
    pub fn preview_details(&self) -> Vec<String> {
        self.active_profile
            .as_ref()
            .map(|p| p.preview_details.clone())
            .unwrap_or_default()
    }

    /// Catalog enumeration for the profile picker: built-ins first, then
    /// customs, each in catalog order.
    pub fn profiles(&self) -> Vec<ProfileHandle> {
        let mut profiles = self.catalog.built_in_profiles();
        profiles.extend(self.catalog.custom_profiles());
        profiles
    }

    pub fn can_choose_profile(&self) -> bool {
        self.classification == Classification::None
    }

    pub fn can_assign_handlers(&self) -> bool {
        self.registry.registration_available()
            && self.active_profile.is_some()
            && self.classification == Classification::None
    }

    pub fn can_remove_handlers(&self) -> bool {
        self.classification == Classification::Ours
    }

    pub fn sort_required(&self) -> bool {
        self.sort_required
    }

    /// Consumes the one-shot re-sort signal after the presentation layer has
    /// regrouped the extension list.
    pub fn clear_sort_required(&mut self) {
        self.set_sort_required(false);
    }

    /*
     * Single entry point for selection changes: replaces the selection
     * wholesale (order preserved exactly as received) and recomputes the
     * derived state. There is no incremental update path.
     */
    pub fn set_selection(&mut self, selection: Vec<ExtensionHandle>) {
        log::debug!(
            "AssociationController: Selection replaced with {} extensions.",
            selection.len()
        );
        self.selection = selection;
        self.recompute_derived_state();
    }

    /*
     * Picks the profile shown and assigned while the whole selection is
     * unhandled. Callers must respect `can_choose_profile`; the controller
     * does not second-guess them here, it only skips the no-op case.
     */
    pub fn choose_profile(&mut self, profile: ProfileHandle) {
        let changed = match &self.active_profile {
            Some(current) => !Rc::ptr_eq(current, &profile),
            None => true,
        };
        if changed {
            log::debug!(
                "AssociationController: Active profile chosen: '{}'.",
                profile.name
            );
            self.active_profile = Some(profile);
            self.notify_active_profile_changed();
        }
    }

    /*
     * Binds the active profile to every selected extension, aggregating
     * success across the attempts. A partial failure reports overall failure
     * but does not roll back the extensions that succeeded; the recomputation
     * afterwards reflects whatever bindings actually took. Callers gate this
     * through `can_assign_handlers` (empty selection or no active profile is
     * a caller bug, tolerated as a silent success here).
     */
    pub fn assign_handlers(&mut self) -> bool {
        let mut success = true;

        if !self.selection.is_empty()
            && let Some(profile) = self.active_profile.clone()
        {
            for extension in &self.selection {
                success &= self.registry.bind_profile(extension, &profile);
            }
            log::debug!(
                "AssociationController: Assigned '{}' to {} extensions, success={success}.",
                profile.name,
                self.selection.len()
            );
        }

        self.recompute_derived_state();
        self.set_sort_required(true);

        success
    }

    /*
     * Unbinds every selected extension, unconditionally; extensions that
     * have no handler of ours are left untouched by the unbind operation
     * itself. Callers gate this through `can_remove_handlers`.
     */
    pub fn remove_handlers(&mut self) {
        for extension in &self.selection {
            self.registry.unbind_profile(extension);
        }
        log::debug!(
            "AssociationController: Removed handlers from {} extensions.",
            self.selection.len()
        );

        self.recompute_derived_state();
        self.set_sort_required(true);
    }

    /// Announces that the catalog's profile collections changed (a custom
    /// profile was added or removed); observers re-read `profiles()`.
    pub fn refresh_profiles(&mut self) {
        self.hub.notify(ControllerProperty::Profiles);
    }

    /*
     * Recomputes classification, active profile and gates from the current
     * selection. Cases:
     * 1. Every selected extension is unhandled: the profile choice is open,
     *    defaulting to the first built-in profile if nothing is chosen yet.
     * 2. Every selected extension is bound to our handler: the profile of
     *    the first selected extension is forced.
     * 3. Everything else (mixed, foreign, empty): no active profile.
     * Notifications fire unconditionally, active profile and its dependents
     * before the gates, because the assign gate reads the active profile.
     */
    fn recompute_derived_state(&mut self) {
        self.classification = classify(&self.selection);
        match self.classification {
            Classification::None => {
                if self.active_profile.is_none() {
                    self.active_profile = self.catalog.built_in_profiles().first().cloned();
                }
            }
            Classification::Ours => {
                self.active_profile = self
                    .selection
                    .first()
                    .and_then(|extension| extension.borrow().bound_profile.clone());
            }
            Classification::Other => {
                self.active_profile = None;
            }
        }
        log::debug!(
            "AssociationController: Classification {:?}, active profile {:?}.",
            self.classification,
            self.active_profile.as_ref().map(|p| p.name.as_str())
        );

        self.notify_active_profile_changed();
        self.hub.notify(ControllerProperty::CanChooseProfile);
        self.hub.notify(ControllerProperty::CanAssignHandlers);
        self.hub.notify(ControllerProperty::CanRemoveHandlers);
    }

    fn notify_active_profile_changed(&self) {
        self.hub.notify(ControllerProperty::ActiveProfile);
        self.hub.notify(ControllerProperty::FullDetails);
        self.hub.notify(ControllerProperty::PreviewDetails);
    }

    fn set_sort_required(&mut self, value: bool) {
        if value != self.sort_required {
            self.sort_required = value;
            self.hub.notify(ControllerProperty::SortRequired);
        }
    }
}
