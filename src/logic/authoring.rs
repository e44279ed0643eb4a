//! Combo authoring for the admin back-office
//!
//! Proposes option tuples not yet registered as combos, and flags registered
//! combos whose options were deleted after the combo was created.

use crate::error::{ComboError, Result};
use crate::types::{Combo, ComboAction, ComboId, ComboStatus, OptionId, VariantOption, VariantTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// An option tuple the admin may register; one option per included type, in
/// type display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialCombo {
    pub options: Vec<OptionId>,
}

/// A priced combo ready to submit to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCombo {
    pub options: Vec<OptionId>,
    pub price: Decimal,
}

impl PotentialCombo {
    /// Attach a price; prices must be non-negative.
    pub fn priced(self, price: Decimal) -> Result<NewCombo> {
        if price < Decimal::ZERO {
            return Err(ComboError::validation(format!(
                "combo price must be non-negative, got {}",
                price
            )));
        }
        Ok(NewCombo {
            options: self.options,
            price,
        })
    }
}

/// Audit line for one registered combo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboAudit {
    pub combo_id: ComboId,
    pub status: ComboStatus,
    /// Referenced option ids that no longer exist
    pub missing: Vec<OptionId>,
    pub actions: Vec<ComboAction>,
}

/// Cartesian product of the admin's chosen options, minus tuples already
/// registered.
///
/// `chosen` holds, per type in display order, the options the admin ticked
/// for inclusion. Types with nothing ticked are skipped. Iteration order is
/// the usual nested-loop order: the first included type is the outer loop.
pub fn expand_potential_combos(
    chosen: &[(VariantTypeId, Vec<OptionId>)],
    existing: &[Combo],
) -> Vec<PotentialCombo> {
    let included: Vec<&[OptionId]> = chosen
        .iter()
        .filter(|(_, opts)| !opts.is_empty())
        .map(|(_, opts)| opts.as_slice())
        .collect();

    if included.is_empty() {
        return Vec::new();
    }

    let registered: BTreeSet<BTreeSet<OptionId>> =
        existing.iter().map(Combo::option_set).collect();

    let mut tuples: Vec<Vec<OptionId>> = vec![Vec::new()];
    for opts in included {
        tuples = tuples
            .into_iter()
            .flat_map(move |prefix| {
                opts.iter().map(move |opt| {
                    let mut next = prefix.clone();
                    next.push(*opt);
                    next
                })
            })
            .collect();
    }

    let total = tuples.len();
    let proposed: Vec<PotentialCombo> = tuples
        .into_iter()
        .filter(|t| !registered.contains(&t.iter().copied().collect::<BTreeSet<_>>()))
        .map(|options| PotentialCombo { options })
        .collect();

    debug!(
        total,
        proposed = proposed.len(),
        "expanded potential combos"
    );
    proposed
}

/// A combo is valid iff every option it references still exists.
pub fn is_combo_valid(combo: &Combo, current_options: &[VariantOption]) -> bool {
    combo
        .options
        .iter()
        .all(|id| current_options.iter().any(|o| o.id == *id))
}

/// Status and allowed admin actions for every combo, in list order
pub fn audit_combos(combos: &[Combo], current_options: &[VariantOption]) -> Vec<ComboAudit> {
    combos
        .iter()
        .map(|combo| {
            let missing: Vec<OptionId> = combo
                .options
                .iter()
                .copied()
                .filter(|id| !current_options.iter().any(|o| o.id == *id))
                .collect();

            let status = if missing.is_empty() {
                ComboStatus::Valid
            } else {
                warn!(combo_id = %combo.id, "combo references deleted options");
                ComboStatus::Orphaned
            };

            ComboAudit {
                combo_id: combo.id,
                status,
                missing,
                actions: status.allowed_actions().to_vec(),
            }
        })
        .collect()
}

/// Groups of combo ids (two or more) registered for the same option set
pub fn duplicate_option_sets(combos: &[Combo]) -> Vec<Vec<ComboId>> {
    let mut groups: BTreeMap<BTreeSet<OptionId>, Vec<ComboId>> = BTreeMap::new();
    for combo in combos {
        groups.entry(combo.option_set()).or_default().push(combo.id);
    }
    groups.into_values().filter(|ids| ids.len() > 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<OptionId> {
        raw.iter().copied().map(OptionId).collect()
    }

    fn combo(id: u64, options: &[u64]) -> Combo {
        Combo {
            id: ComboId(id),
            options: ids(options),
            price: Decimal::TEN,
        }
    }

    fn option(id: u64, type_id: u64) -> VariantOption {
        VariantOption {
            id: OptionId(id),
            name: format!("opt-{}", id),
            type_id: VariantTypeId(type_id),
        }
    }

    #[test]
    fn test_expand_full_cartesian_order() {
        let chosen = vec![
            (VariantTypeId(1), ids(&[10, 11])),
            (VariantTypeId(2), ids(&[20, 21])),
        ];
        let proposed = expand_potential_combos(&chosen, &[]);
        let tuples: Vec<Vec<OptionId>> = proposed.into_iter().map(|p| p.options).collect();
        assert_eq!(
            tuples,
            vec![ids(&[10, 20]), ids(&[10, 21]), ids(&[11, 20]), ids(&[11, 21])]
        );
    }

    #[test]
    fn test_expand_excludes_registered_sets() {
        let chosen = vec![
            (VariantTypeId(1), ids(&[10, 11])),
            (VariantTypeId(2), ids(&[20, 21])),
        ];
        // registered in reverse order, still excluded
        let existing = vec![combo(100, &[20, 10]), combo(101, &[10, 21])];
        let proposed = expand_potential_combos(&chosen, &existing);
        let tuples: Vec<Vec<OptionId>> = proposed.into_iter().map(|p| p.options).collect();
        assert_eq!(tuples, vec![ids(&[11, 20]), ids(&[11, 21])]);
    }

    #[test]
    fn test_expand_skips_types_with_nothing_chosen() {
        let chosen = vec![
            (VariantTypeId(1), ids(&[10])),
            (VariantTypeId(2), Vec::new()),
            (VariantTypeId(3), ids(&[30, 31])),
        ];
        let proposed = expand_potential_combos(&chosen, &[]);
        assert_eq!(proposed.len(), 2);
        assert_eq!(proposed[0].options, ids(&[10, 30]));
    }

    #[test]
    fn test_expand_nothing_chosen() {
        let chosen = vec![(VariantTypeId(1), Vec::new())];
        assert!(expand_potential_combos(&chosen, &[]).is_empty());
        assert!(expand_potential_combos(&[], &[]).is_empty());
    }

    #[test]
    fn test_expand_everything_registered() {
        let chosen = vec![(VariantTypeId(1), ids(&[10]))];
        assert!(expand_potential_combos(&chosen, &[combo(1, &[10])]).is_empty());
    }

    #[test]
    fn test_priced_rejects_negative() {
        let p = PotentialCombo { options: ids(&[10]) };
        assert!(p.clone().priced(Decimal::new(-1, 0)).is_err());
        let new = p.priced(Decimal::ZERO).unwrap();
        assert_eq!(new.price, Decimal::ZERO);
    }

    #[test]
    fn test_is_combo_valid() {
        let options = vec![option(10, 1), option(20, 2)];
        assert!(is_combo_valid(&combo(1, &[10, 20]), &options));
        assert!(!is_combo_valid(&combo(2, &[10, 21]), &options));
    }

    #[test]
    fn test_audit_flags_orphans_delete_only() {
        let options = vec![option(10, 1), option(20, 2)];
        let audit = audit_combos(&[combo(1, &[10, 20]), combo(2, &[10, 21])], &options);

        assert_eq!(audit[0].status, ComboStatus::Valid);
        assert!(audit[0].missing.is_empty());
        assert_eq!(audit[1].status, ComboStatus::Orphaned);
        assert_eq!(audit[1].missing, ids(&[21]));
        assert_eq!(audit[1].actions, vec![ComboAction::Delete]);
    }

    #[test]
    fn test_duplicate_option_sets() {
        let combos = vec![combo(1, &[10, 20]), combo(2, &[20, 10]), combo(3, &[11, 20])];
        assert_eq!(duplicate_option_sets(&combos), vec![vec![ComboId(1), ComboId(2)]]);
    }
}
