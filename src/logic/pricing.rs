//! Combo price lookup for a complete selection
//!
//! Local counterpart of the backend's combo price endpoint. Both sides use
//! exact set equality between the selected option ids and a combo's options,
//! so a selection the availability check allowed is never priced differently
//! here than on the server.

use crate::error::{ComboError, Result};
use crate::selection::Selection;
use crate::types::{Combo, VariantOption, VariantType};
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::debug;

/// Number of types with at least one option. A complete selection has
/// exactly this many picks.
pub fn participating_type_count(types: &[VariantType], options: &[VariantOption]) -> usize {
    types
        .iter()
        .filter(|t| options.iter().any(|o| o.type_id == t.id))
        .count()
}

/// The first combo (in list order) whose option set equals the selection's.
///
/// Returns `None` on a miss; shape checks are left to `price_for_selection`.
pub fn find_combo<'a>(selection: &Selection, combos: &'a [Combo]) -> Option<&'a Combo> {
    let wanted = selection.option_ids();
    combos.iter().find(|c| c.matches_exactly(&wanted))
}

/// Price of the combo matching a complete `selection`.
///
/// # Errors
///
/// - `Validation` when the selection is incomplete or picks a type twice
/// - `NotFound` when no registered combo matches (stale UI, concurrent edit)
pub fn price_for_selection(
    selection: &Selection,
    combos: &[Combo],
    participating: usize,
) -> Result<Decimal> {
    check_complete(selection, participating)?;

    match find_combo(selection, combos) {
        Some(combo) => {
            debug!(combo_id = %combo.id, "priced selection");
            Ok(combo.price)
        }
        None => {
            let ids: Vec<String> = selection.option_ids().iter().map(|id| id.to_string()).collect();
            debug!("no combo for options [{}]", ids.join(", "));
            Err(ComboError::not_found(format!("options [{}]", ids.join(", "))))
        }
    }
}

/// Every combo matching the selection exactly, in list order
pub(crate) fn matching_combos<'a>(selection: &Selection, combos: &'a [Combo]) -> Vec<&'a Combo> {
    let wanted = selection.option_ids();
    combos.iter().filter(|c| c.matches_exactly(&wanted)).collect()
}

pub(crate) fn check_complete(selection: &Selection, participating: usize) -> Result<()> {
    if !selection.is_complete(participating) {
        return Err(ComboError::validation(format!(
            "selection has {} of {} types",
            selection.len(),
            participating
        )));
    }

    let distinct: BTreeSet<_> = selection.picks().iter().map(|p| p.type_id).collect();
    if distinct.len() != selection.len() {
        return Err(ComboError::validation("selection picks a type more than once"));
    }
    Ok(())
}
