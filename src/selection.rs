//! Caller-held option selection
//!
//! A `Selection` is an ordered list of picks in the display order of the
//! product's types. It is created empty when a purchase flow opens and thrown
//! away when it closes; the resolver only ever reads it.

use crate::error::{ComboError, Result};
use crate::types::{OptionId, VariantOption, VariantType, VariantTypeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One chosen option for one type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub type_id: VariantTypeId,
    pub option_id: OptionId,
}

impl Pick {
    pub fn new(type_id: VariantTypeId, option_id: OptionId) -> Self {
        Self { type_id, option_id }
    }
}

/// Ordered, partial-or-complete assignment of type -> option
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    picks: Vec<Pick>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from picks as-is; order and uniqueness are the caller's concern.
    pub fn from_picks(picks: impl IntoIterator<Item = Pick>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// The option chosen for `type_id`, if any
    pub fn option_for(&self, type_id: VariantTypeId) -> Option<OptionId> {
        self.picks
            .iter()
            .find(|p| p.type_id == type_id)
            .map(|p| p.option_id)
    }

    /// Order-independent set of chosen option ids
    pub fn option_ids(&self) -> BTreeSet<OptionId> {
        self.picks.iter().map(|p| p.option_id).collect()
    }

    /// Complete iff one pick exists per participating type
    pub fn is_complete(&self, participating: usize) -> bool {
        self.picks.len() == participating
    }

    /// Record `option_id` for `types[type_index]`.
    ///
    /// Picks for every later type are dropped: a changed earlier choice
    /// re-locks everything after it.
    pub fn choose(
        &mut self,
        types: &[VariantType],
        type_index: usize,
        option_id: OptionId,
    ) -> Result<()> {
        let ty = types.get(type_index).ok_or_else(|| {
            ComboError::validation(format!(
                "type index {} out of range for {} types",
                type_index,
                types.len()
            ))
        })?;

        self.clear_from(types, type_index);
        self.picks.push(Pick {
            type_id: ty.id,
            option_id,
        });
        self.sort_by_display_order(types);
        Ok(())
    }

    /// Drop picks for `types[type_index..]`
    pub fn clear_from(&mut self, types: &[VariantType], type_index: usize) {
        let cleared: Vec<VariantTypeId> = types.iter().skip(type_index).map(|t| t.id).collect();
        self.picks.retain(|p| !cleared.contains(&p.type_id));
    }

    /// Build a display-ordered selection from an unordered option id list,
    /// the shape a combo price request carries.
    pub fn from_option_ids(
        types: &[VariantType],
        options: &[VariantOption],
        ids: &[OptionId],
    ) -> Result<Self> {
        let mut picks = Vec::with_capacity(ids.len());
        for id in ids {
            let option = options
                .iter()
                .find(|o| o.id == *id)
                .ok_or_else(|| ComboError::orphaned(*id))?;

            if picks.iter().any(|p: &Pick| p.type_id == option.type_id) {
                return Err(ComboError::validation(format!(
                    "more than one option given for type {}",
                    option.type_id
                )));
            }
            picks.push(Pick {
                type_id: option.type_id,
                option_id: option.id,
            });
        }

        let mut selection = Self { picks };
        selection.sort_by_display_order(types);
        Ok(selection)
    }

    fn sort_by_display_order(&mut self, types: &[VariantType]) {
        let position = |id: VariantTypeId| {
            types
                .iter()
                .position(|t| t.id == id)
                .unwrap_or(usize::MAX)
        };
        self.picks.sort_by_key(|p| position(p.type_id));
    }
}
