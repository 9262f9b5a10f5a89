use super::models::ExtensionHandle;

/*
 * Classifies a selection of extension records by handler-state consensus.
 * The result drives everything the controller derives: which profile is
 * shown and which of the assign/remove/choose actions are legal.
 */

// Consensus over the handler states of a selection. Deliberately a closed
// three-case sum type: a fourth handler state cannot be bolted on without
// revisiting every `match` on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Every selected extension is unhandled; the profile choice is open.
    None,
    /// Every selected extension is bound to our own handler.
    Ours,
    /// Mixed handler states, a foreign handler, or an empty selection.
    Other,
}

/// Computes the three-way consensus over a selection, in selection order.
///
/// A single left-to-right scan keeps a running value that starts
/// undetermined. The first extension fixes it to `None` (unhandled) or
/// `Ours`; any later extension that disagrees, and any extension owned by a
/// foreign handler, collapses the result to `Other` and ends the scan. The
/// short-circuit is only an optimization: a later conflict would produce the
/// same terminal `Other`.
///
/// An empty selection classifies as `Other` so that it never grants
/// profile-choice rights.
pub fn classify(selection: &[ExtensionHandle]) -> Classification {
    let mut running: Option<Classification> = Option::None;
    for handle in selection {
        let record = handle.borrow();
        if !record.has_handler {
            match running {
                Option::None => running = Some(Classification::None),
                Some(Classification::None) => {}
                Some(_) => {
                    running = Some(Classification::Other);
                    break;
                }
            }
        } else if record.is_our_handler {
            match running {
                Option::None => running = Some(Classification::Ours),
                Some(Classification::Ours) => {}
                Some(_) => {
                    running = Some(Classification::Other);
                    break;
                }
            }
        } else {
            running = Some(Classification::Other);
            break;
        }
    }
    running.unwrap_or(Classification::Other)
}
