//! Option availability
//!
//! Decides, per render, whether an option control is enabled.
//!
//! # Rules
//!
//! | Situation                                   | Result |
//! |---------------------------------------------|--------|
//! | An earlier type has no pick                 | locked (`false`) |
//! | No combos registered                        | open (`true`) |
//! | Some combo holds every earlier pick + candidate | `true` |
//! | Otherwise                                   | `false` |
//!
//! Pure functions: re-evaluate on every selection change, never cache.

use crate::error::{ComboError, Result};
use crate::selection::Selection;
use crate::types::{Combo, OptionId, VariantType};
use tracing::debug;

/// Index of the first type before `type_index` that has no pick yet.
///
/// `None` means every earlier type is chosen and `types[type_index]` is open
/// for selection.
pub fn first_locked_type(
    types: &[VariantType],
    selection: &Selection,
    type_index: usize,
) -> Option<usize> {
    types
        .iter()
        .take(type_index)
        .position(|t| selection.option_for(t.id).is_none())
}

/// Is `candidate` selectable as the next pick for `types[type_index]`?
///
/// Only picks for types before `type_index` are considered; anything the
/// selection holds for later types is ignored.
pub fn is_option_available(
    types: &[VariantType],
    combos: &[Combo],
    selection: &Selection,
    type_index: usize,
    candidate: OptionId,
) -> Result<bool> {
    check_type_index(types, type_index)?;

    if let Some(locked) = first_locked_type(types, selection, type_index) {
        debug!(
            type_index,
            locked_by = locked,
            "option {} locked until earlier type is chosen",
            candidate
        );
        return Ok(false);
    }

    if combos.is_empty() {
        return Ok(true);
    }

    Ok(supported_by_any(types, combos.iter(), selection, type_index, candidate))
}

/// Existence check without the lock and empty-list rules: does any combo in
/// `combos` hold every pick before `type_index` together with `candidate`?
pub(crate) fn supported_by_any<'a, I>(
    types: &[VariantType],
    combos: I,
    selection: &Selection,
    type_index: usize,
    candidate: OptionId,
) -> bool
where
    I: IntoIterator<Item = &'a Combo>,
{
    let mut required: Vec<OptionId> = types
        .iter()
        .take(type_index)
        .filter_map(|t| selection.option_for(t.id))
        .collect();
    required.push(candidate);

    combos.into_iter().any(|c| c.contains_all(&required))
}

pub(crate) fn check_type_index(types: &[VariantType], type_index: usize) -> Result<()> {
    if type_index >= types.len() {
        return Err(ComboError::validation(format!(
            "type index {} out of range for {} types",
            type_index,
            types.len()
        )));
    }
    Ok(())
}
