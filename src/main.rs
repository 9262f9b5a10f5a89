mod app_logic;
mod core;

use crate::app_logic::{AssociationController, ChangeObserver, ControllerProperty};
use crate::core::{CatalogOperations, CoreCatalog, CoreHandlerRegistry, ExtensionRecord};
use std::rc::Rc;

pub(crate) const APP_NAME: &str = "AssocManager";

/*
 * Initializes terminal logging for the whole process. Tests call this too,
 * so a repeated initialization is silently ignored.
 */
pub fn initialize_logging() {
    use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

    let config = ConfigBuilder::new()
        .set_time_format_custom(time::macros::format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        ))
        .build();
    let _ = TermLogger::init(
        LevelFilter::Debug,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

// Stand-in for the presentation layer: logs every property-change event so a
// console run shows the notification traffic a window would react to.
struct PresentationLogger;

impl ChangeObserver for PresentationLogger {
    fn property_changed(&self, property: ControllerProperty) {
        log::debug!("Presentation: {property:?} changed, re-reading.");
    }
}

fn seed_extensions() -> Vec<ExtensionRecord> {
    vec![
        ExtensionRecord::unhandled(".txt"),
        ExtensionRecord::unhandled(".log"),
        ExtensionRecord::unhandled(".md"),
        ExtensionRecord::foreign(".docx"),
    ]
}

fn main() {
    initialize_logging();

    let catalog = Rc::new(CoreCatalog::new(APP_NAME, seed_extensions()));
    let registry = Rc::new(CoreHandlerRegistry::new());
    let mut controller = AssociationController::new(catalog.clone(), registry.clone());
    controller.register_observer(Rc::new(PresentationLogger));

    for profile in controller.profiles() {
        log::info!(
            "Profile '{}'{}",
            profile.name,
            if profile.is_built_in { " (built-in)" } else { "" }
        );
    }

    // Drive the controller the way the presentation layer would: select the
    // unhandled extensions, assign the default profile, then undo it.
    let unhandled: Vec<_> = catalog
        .extensions()
        .into_iter()
        .filter(|e| !e.borrow().has_handler)
        .collect();
    controller.set_selection(unhandled);
    log::info!(
        "Selection classified as {:?}; assign legal: {}",
        controller.classification(),
        controller.can_assign_handlers()
    );

    if controller.can_assign_handlers() {
        let success = controller.assign_handlers();
        log::info!(
            "Assigned '{}' to selection, success: {success}",
            controller
                .active_profile()
                .map(|p| p.name.clone())
                .unwrap_or_default()
        );
        if controller.sort_required() {
            // A real window would regroup handled/unhandled rows here.
            controller.clear_sort_required();
        }
    }

    if controller.can_remove_handlers() {
        controller.remove_handlers();
        log::info!(
            "Removed handlers; selection classified as {:?}",
            controller.classification()
        );
        controller.clear_sort_required();
    }
}
