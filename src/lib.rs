//! Combo Resolver Library
//!
//! Decides which option combinations of a product can be picked and bought,
//! prices complete selections, and helps the admin author new combos.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logic;
pub mod selection;
pub mod types;

// Re-export main types for convenience
pub use catalog::{ComboFetch, ComboPriceRequest, ComboPriceResponse, ProductCatalog, ProductFetch};
pub use config::{DuplicateComboPolicy, EmptyComboPolicy, ResolverConfig};
pub use error::ComboError;
pub use selection::{Pick, Selection};
pub use types::{
    Combo, ComboAction, ComboId, ComboStatus, OptionId, ProductId, VariantOption, VariantType,
    VariantTypeId,
};

// Resolver operations
pub use logic::authoring::{
    audit_combos, expand_potential_combos, is_combo_valid, ComboAudit, NewCombo, PotentialCombo,
};
pub use logic::availability::{first_locked_type, is_option_available};
pub use logic::pricing::{find_combo, participating_type_count, price_for_selection};
pub use logic::resolver::{ComboResolver, OptionState};
