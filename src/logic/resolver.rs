//! Combo Resolver
//!
//! One entry point for every purchase flow (cart, buy-now, product page) and
//! the admin combo editor. Each call site keeps its own `Selection` and asks
//! the resolver what to enable and what to charge.
//!
//! # Design
//!
//! - **Borrowed snapshot**: The resolver reads one `ProductCatalog` for its
//!   whole lifetime; build a new resolver after every refetch
//! - **Live combos only**: Combos referencing a deleted option never enable an
//!   option and are never priced
//! - **Participating types only**: A type whose options were all deleted
//!   neither locks later types nor counts toward a complete selection
//! - **Pure logic**: No I/O, no caching, no interior state
//!
//! # What This Explicitly Refuses To Do
//!
//! - Fetch or refresh catalog data: That's the data layer's job
//! - Persist selections: The calling flow owns and discards them
//! - Deduplicate combos: Duplicates are reported, see `DuplicateComboPolicy`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{ComboPriceRequest, ComboPriceResponse, ProductCatalog};
use crate::config::{DuplicateComboPolicy, EmptyComboPolicy, ResolverConfig};
use crate::error::{ComboError, Result};
use crate::logic::authoring::{self, ComboAudit, PotentialCombo};
use crate::logic::availability::{self, check_type_index, first_locked_type, supported_by_any};
use crate::logic::pricing::{self, check_complete, matching_combos};
use crate::selection::Selection;
use crate::types::{Combo, OptionId, VariantType, VariantTypeId};

/// Render state of one option control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionState {
    pub option_id: OptionId,
    pub name: String,
    pub available: bool,
}

/// Resolver over one consistent catalog snapshot
#[derive(Debug, Clone)]
pub struct ComboResolver<'a> {
    catalog: &'a ProductCatalog,
    config: ResolverConfig,
    live: Vec<Combo>,
    /// Types with at least one option, in display order
    participating: Vec<VariantType>,
}

impl<'a> ComboResolver<'a> {
    /// Resolver with default policies
    pub fn new(catalog: &'a ProductCatalog) -> Self {
        Self::with_config(catalog, ResolverConfig::default())
    }

    pub fn with_config(catalog: &'a ProductCatalog, config: ResolverConfig) -> Self {
        let live: Vec<Combo> = catalog
            .combos
            .iter()
            .filter(|c| authoring::is_combo_valid(c, &catalog.options))
            .cloned()
            .collect();

        let orphaned = catalog.combos.len() - live.len();
        if orphaned > 0 {
            warn!(
                product_id = %catalog.product_id,
                orphaned,
                "ignoring combos that reference deleted options"
            );
        }

        let participating: Vec<VariantType> = catalog
            .types
            .iter()
            .filter(|t| catalog.options.iter().any(|o| o.type_id == t.id))
            .cloned()
            .collect();

        if participating.len() < catalog.types.len() {
            debug!(
                product_id = %catalog.product_id,
                skipped = catalog.types.len() - participating.len(),
                "types without options do not take part in selection"
            );
        }

        Self {
            catalog,
            config,
            live,
            participating,
        }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        self.catalog
    }

    pub fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Registered combos whose options all still exist
    pub fn live_combos(&self) -> &[Combo] {
        &self.live
    }

    // ========================================================================
    // Storefront
    // ========================================================================

    /// Is `candidate` selectable next for the type at `type_index`?
    ///
    /// The candidate must be an option of that type. `type_index` indexes the
    /// catalog's types; the lock and the combo check only look at earlier
    /// types that still have options.
    pub fn is_option_available(
        &self,
        selection: &Selection,
        type_index: usize,
        candidate: OptionId,
    ) -> Result<bool> {
        let types = &self.catalog.types;
        check_type_index(types, type_index)?;

        let owner = self
            .catalog
            .option(candidate)
            .ok_or_else(|| ComboError::orphaned(candidate))?;
        if owner.type_id != types[type_index].id {
            return Err(ComboError::validation(format!(
                "option {} belongs to type {}, not {}",
                candidate, owner.type_id, types[type_index].id
            )));
        }

        // The candidate's own type has an option, so it always participates
        let position = self
            .participating
            .iter()
            .position(|t| t.id == owner.type_id)
            .ok_or_else(|| {
                ComboError::validation(format!("type {} has no options", owner.type_id))
            })?;

        if let Some(locked) = first_locked_type(&self.participating, selection, position) {
            debug!(
                type_index,
                locked_by = %self.participating[locked].id,
                "option {} locked until earlier type is chosen",
                candidate
            );
            return Ok(false);
        }

        // Decided on the registered list: a product whose combos are all
        // orphaned is closed, not open.
        if self.catalog.combos.is_empty() {
            return Ok(self.config.empty_combos == EmptyComboPolicy::Open);
        }

        Ok(supported_by_any(&self.participating, &self.live, selection, position, candidate))
    }

    /// Every option of `types[type_index]` with its availability, in catalog
    /// order.
    pub fn option_states(&self, selection: &Selection, type_index: usize) -> Result<Vec<OptionState>> {
        check_type_index(&self.catalog.types, type_index)?;
        let type_id = self.catalog.types[type_index].id;

        self.catalog
            .options_for_type(type_id)
            .into_iter()
            .map(|o| {
                Ok(OptionState {
                    option_id: o.id,
                    name: o.name.clone(),
                    available: self.is_option_available(selection, type_index, o.id)?,
                })
            })
            .collect()
    }

    /// Number of types with at least one option
    pub fn participating_types(&self) -> usize {
        self.participating.len()
    }

    /// Price of the live combo matching a complete selection
    pub fn price_for_selection(&self, selection: &Selection) -> Result<Decimal> {
        let participating = self.participating_types();

        if self.config.duplicate_combos == DuplicateComboPolicy::Reject {
            check_complete(selection, participating)?;
            let matches = matching_combos(selection, &self.live);
            if matches.len() > 1 {
                let ids: Vec<String> = matches.iter().map(|c| c.id.to_string()).collect();
                return Err(ComboError::duplicate_combo(format!(
                    "combos [{}] share the selected options",
                    ids.join(", ")
                )));
            }
        }

        pricing::price_for_selection(selection, &self.live, participating)
    }

    /// Answer a combo price request locally, with the backend's semantics
    pub fn answer_price_request(&self, request: &ComboPriceRequest) -> Result<ComboPriceResponse> {
        if request.product_id != self.catalog.product_id {
            return Err(ComboError::validation(format!(
                "request for product {} sent to resolver for product {}",
                request.product_id, self.catalog.product_id
            )));
        }

        let selection =
            Selection::from_option_ids(&self.catalog.types, &self.catalog.options, &request.options)?;
        let combo_price = self.price_for_selection(&selection)?;
        debug!(product_id = %request.product_id, %combo_price, "answered price request");
        Ok(ComboPriceResponse { combo_price })
    }

    // ========================================================================
    // Admin
    // ========================================================================

    /// Unregistered tuples from the admin's per-type option picks
    ///
    /// # Errors
    ///
    /// - `Validation` when a type is unknown or listed twice, or an option is
    ///   listed under a type it does not belong to
    /// - `OrphanedReference` when an option no longer exists
    pub fn expand_potential_combos(
        &self,
        chosen: &[(VariantTypeId, Vec<OptionId>)],
    ) -> Result<Vec<PotentialCombo>> {
        self.check_chosen(chosen)?;
        Ok(authoring::expand_potential_combos(chosen, &self.catalog.combos))
    }

    /// Every chosen option must exist and sit under its own type
    fn check_chosen(&self, chosen: &[(VariantTypeId, Vec<OptionId>)]) -> Result<()> {
        let mut seen: Vec<VariantTypeId> = Vec::with_capacity(chosen.len());

        for (type_id, opts) in chosen {
            if self.catalog.type_index(*type_id).is_none() {
                return Err(ComboError::validation(format!("unknown type {}", type_id)));
            }
            if seen.contains(type_id) {
                return Err(ComboError::validation(format!("type {} chosen twice", type_id)));
            }
            seen.push(*type_id);

            for id in opts {
                let option = self.catalog.option(*id).ok_or_else(|| ComboError::orphaned(*id))?;
                if option.type_id != *type_id {
                    return Err(ComboError::validation(format!(
                        "option {} belongs to type {}, not {}",
                        id, option.type_id, type_id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn is_combo_valid(&self, combo: &Combo) -> bool {
        authoring::is_combo_valid(combo, &self.catalog.options)
    }

    /// Status and allowed actions for every registered combo
    pub fn audit(&self) -> Vec<ComboAudit> {
        authoring::audit_combos(&self.catalog.combos, &self.catalog.options)
    }

    /// Availability over the registered combo list as-is: no orphan
    /// filtering, empty list always open. The admin editor previews with this.
    pub fn is_option_available_raw(
        &self,
        selection: &Selection,
        type_index: usize,
        candidate: OptionId,
    ) -> Result<bool> {
        availability::is_option_available(
            &self.catalog.types,
            &self.catalog.combos,
            selection,
            type_index,
            candidate,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
