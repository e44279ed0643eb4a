//! Property-Based Tests for the combo resolver
//!
//! Uses proptest to check resolver invariants over generated catalogs:
//! - Sequential lock and the empty-combo fallback
//! - Price lookup agrees with exact-set combo existence
//! - Availability only narrows along a pick sequence
//! - Proposed combos never duplicate registered ones
//! - Orphaned combos never enable an option

use std::collections::BTreeSet;

use combo_resolver::{
    expand_potential_combos, is_combo_valid, is_option_available, price_for_selection, Combo,
    ComboError, ComboId, ComboResolver, OptionId, Pick, ProductCatalog, ProductId, Selection,
    VariantOption, VariantType, VariantTypeId,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Strategies
// =============================================================================

/// Every full tuple over `n_types` types with `n_opts` options each
fn all_tuples(n_types: usize, n_opts: usize) -> Vec<Vec<OptionId>> {
    let mut tuples: Vec<Vec<OptionId>> = vec![Vec::new()];
    for t in 1..=n_types as u64 {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                (0..n_opts as u64).map(move |k| {
                    let mut next = prefix.clone();
                    next.push(OptionId(t * 10 + k));
                    next
                })
            })
            .collect();
    }
    tuples
}

/// Catalog of 1-3 types with 1-3 options each and a random subset of the
/// cartesian product registered as combos. Type `t` owns options `t*10 + k`.
fn catalog_strategy() -> impl Strategy<Value = ProductCatalog> {
    (1usize..=3, 1usize..=3)
        .prop_flat_map(|(n_types, n_opts)| {
            let len = n_opts.pow(n_types as u32);
            (
                Just(n_types),
                Just(n_opts),
                proptest::collection::vec(any::<bool>(), len),
                proptest::collection::vec(0i64..50_000, len),
            )
        })
        .prop_map(|(n_types, n_opts, keep, prices)| {
            let types: Vec<VariantType> = (1..=n_types as u64)
                .map(|t| VariantType { id: VariantTypeId(t), name: format!("type-{}", t) })
                .collect();
            let options: Vec<VariantOption> = types
                .iter()
                .flat_map(|t| {
                    (0..n_opts as u64).map(move |k| VariantOption {
                        id: OptionId(t.id.0 * 10 + k),
                        name: format!("opt-{}-{}", t.id, k),
                        type_id: t.id,
                    })
                })
                .collect();
            let combos: Vec<Combo> = all_tuples(n_types, n_opts)
                .into_iter()
                .zip(keep)
                .zip(prices)
                .enumerate()
                .filter(|(_, ((_, kept), _))| *kept)
                .map(|(i, ((options, _), price))| Combo {
                    id: ComboId(100 + i as u64),
                    options,
                    price: Decimal::new(price, 2),
                })
                .collect();

            ProductCatalog { product_id: ProductId(1), types, options, combos }
        })
}

/// One pick per type that still has options, chosen by
/// `choices[i] % options-per-type`
fn full_picks(catalog: &ProductCatalog, choices: &[usize]) -> Vec<Pick> {
    catalog
        .types
        .iter()
        .enumerate()
        .filter_map(|(i, t)| {
            let opts = catalog.options_for_type(t.id);
            let option = opts.get(choices[i] % opts.len().max(1))?;
            Some(Pick::new(t.id, option.id))
        })
        .collect()
}

fn choices_strategy() -> impl Strategy<Value = Vec<usize>> {
    proptest::collection::vec(0usize..3, 3)
}

// =============================================================================
// Availability
// =============================================================================

proptest! {
    /// Any unselected earlier type locks every candidate
    #[test]
    fn sequential_lock(catalog in catalog_strategy(), choices in choices_strategy(), gap in 0usize..3) {
        let picks = full_picks(&catalog, &choices);
        let n = catalog.types.len();
        prop_assume!(n >= 2);
        let gap = gap % (n - 1);
        let type_index = n - 1;

        // Every prior except `gap`
        let selection = Selection::from_picks(
            picks[..type_index].iter().enumerate().filter(|(j, _)| *j != gap).map(|(_, p)| *p),
        );
        for option in catalog.options_for_type(catalog.types[type_index].id) {
            let ok = is_option_available(&catalog.types, &catalog.combos, &selection, type_index, option.id);
            prop_assert!(!ok.unwrap());
        }
    }

    /// With no combos, every candidate after complete priors is open
    #[test]
    fn no_combos_means_open(catalog in catalog_strategy(), choices in choices_strategy()) {
        let picks = full_picks(&catalog, &choices);
        for type_index in 0..catalog.types.len() {
            let selection = Selection::from_picks(picks[..type_index].iter().copied());
            for option in catalog.options_for_type(catalog.types[type_index].id) {
                let ok = is_option_available(&catalog.types, &[], &selection, type_index, option.id);
                prop_assert!(ok.unwrap());
            }
        }
    }

    /// Along one pick sequence, once a pick is unavailable every later pick is too.
    ///
    /// Narrowing with the type and candidate held fixed while one more prior
    /// pick is added cannot be observed directly: the sequential lock keeps
    /// every candidate closed until all earlier types are picked. This checks
    /// the reachable form of it instead.
    #[test]
    fn monotonic_narrowing(catalog in catalog_strategy(), choices in choices_strategy()) {
        prop_assume!(!catalog.combos.is_empty());
        let picks = full_picks(&catalog, &choices);

        let mut closed = false;
        for k in 0..picks.len() {
            let selection = Selection::from_picks(picks[..k].iter().copied());
            let ok = is_option_available(&catalog.types, &catalog.combos, &selection, k, picks[k].option_id)
                .unwrap();
            if closed {
                prop_assert!(!ok, "pick {} reopened after an earlier pick closed", k);
            }
            closed |= !ok;
        }
    }
}

// =============================================================================
// Pricing
// =============================================================================

proptest! {
    /// Pricing succeeds iff some combo has exactly the selected option set,
    /// and returns the first such combo's price
    #[test]
    fn price_matches_existence(catalog in catalog_strategy(), choices in choices_strategy()) {
        let picks = full_picks(&catalog, &choices);
        let selection = Selection::from_picks(picks.iter().copied());
        let wanted: BTreeSet<OptionId> = picks.iter().map(|p| p.option_id).collect();
        let expected = catalog.combos.iter().find(|c| c.option_set() == wanted);

        match (price_for_selection(&selection, &catalog.combos, catalog.types.len()), expected) {
            (Ok(price), Some(combo)) => prop_assert_eq!(price, combo.price),
            (Err(ComboError::NotFound(_)), None) => {}
            (other, expected) => prop_assert!(false, "got {:?}, expected {:?}", other, expected),
        }
    }

    /// A complete sequence of available picks is always priceable
    #[test]
    fn available_path_is_priceable(catalog in catalog_strategy(), choices in choices_strategy()) {
        prop_assume!(!catalog.combos.is_empty());
        let picks = full_picks(&catalog, &choices);
        let all_available = (0..picks.len()).all(|k| {
            let selection = Selection::from_picks(picks[..k].iter().copied());
            is_option_available(&catalog.types, &catalog.combos, &selection, k, picks[k].option_id)
                .unwrap()
        });
        if all_available {
            let selection = Selection::from_picks(picks.iter().copied());
            prop_assert!(price_for_selection(&selection, &catalog.combos, catalog.types.len()).is_ok());
        }
    }
}

// =============================================================================
// Authoring
// =============================================================================

proptest! {
    /// Proposals never repeat a registered option set, and together with the
    /// registered combos they cover the whole cartesian product
    #[test]
    fn potential_combo_exclusion(catalog in catalog_strategy()) {
        let chosen: Vec<(VariantTypeId, Vec<OptionId>)> = catalog
            .types
            .iter()
            .map(|t| (t.id, catalog.options_for_type(t.id).iter().map(|o| o.id).collect()))
            .collect();
        let registered: BTreeSet<BTreeSet<OptionId>> =
            catalog.combos.iter().map(Combo::option_set).collect();

        let proposed = expand_potential_combos(&chosen, &catalog.combos);
        for p in &proposed {
            let set: BTreeSet<OptionId> = p.options.iter().copied().collect();
            prop_assert!(!registered.contains(&set));
        }

        let total: usize = chosen.iter().map(|(_, opts)| opts.len()).product();
        prop_assert_eq!(proposed.len() + catalog.combos.len(), total);
    }

    /// Deleting an option orphans every combo holding it, and orphaned combos
    /// never enable an option through the resolver
    #[test]
    fn orphan_exclusion(catalog in catalog_strategy(), choices in choices_strategy(), victim in 0usize..9) {
        let mut catalog = catalog;
        let removed = catalog.options.remove(victim % catalog.options.len()).id;

        for combo in catalog.combos.iter().filter(|c| c.options.contains(&removed)) {
            prop_assert!(!is_combo_valid(combo, &catalog.options));
        }

        let resolver = ComboResolver::new(&catalog);
        let picks = full_picks(&catalog, &choices);
        let mut all_available = true;
        for k in 0..picks.len() {
            let type_index = catalog.type_index(picks[k].type_id).unwrap();
            let selection = Selection::from_picks(picks[..k].iter().copied());
            let ok = resolver.is_option_available(&selection, type_index, picks[k].option_id).unwrap();
            all_available &= ok;
            if ok && !catalog.combos.is_empty() {
                let mut required: Vec<OptionId> = picks[..k].iter().map(|p| p.option_id).collect();
                required.push(picks[k].option_id);
                let backed = catalog.combos.iter().any(|c| {
                    is_combo_valid(c, &catalog.options) && required.iter().all(|id| c.options.contains(id))
                });
                prop_assert!(backed, "pick {} enabled only by an orphaned combo", k);
            }
        }

        // Types emptied by the deletion take no part in the path
        if all_available && !picks.is_empty() && !catalog.combos.is_empty() {
            let selection = Selection::from_picks(picks.iter().copied());
            prop_assert!(resolver.price_for_selection(&selection).is_ok());
        }
    }
}
