//! Product catalog snapshot handling
//!
//! A `ProductCatalog` is one consistent snapshot of a product's types,
//! options and registered combos, assembled from the product and combo
//! fetches. It can be saved to and loaded from JSON so the CLI can answer
//! resolver questions offline.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::logic::authoring::duplicate_option_sets;
use crate::types::{Combo, OptionId, ProductId, VariantOption, VariantType, VariantTypeId};

/// Product fetch payload: types and options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFetch {
    pub types: Vec<VariantType>,
    pub options: Vec<VariantOption>,
}

/// Combo fetch payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboFetch {
    pub combos: Vec<Combo>,
}

/// Combo price request, as the checkout flow sends it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPriceRequest {
    pub product_id: ProductId,
    pub options: Vec<OptionId>,
}

/// Combo price response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPriceResponse {
    pub combo_price: Decimal,
}

/// One product's variant data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub product_id: ProductId,
    /// Types in display order
    pub types: Vec<VariantType>,
    #[serde(default)]
    pub options: Vec<VariantOption>,
    #[serde(default)]
    pub combos: Vec<Combo>,
}

impl ProductCatalog {
    /// Assemble a snapshot from the two collaborator fetches
    pub fn from_fetches(product_id: ProductId, product: ProductFetch, combos: ComboFetch) -> Self {
        Self {
            product_id,
            types: product.types,
            options: product.options,
            combos: combos.combos,
        }
    }

    /// Load a catalog snapshot from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

        let catalog: Self =
            serde_json::from_str(&content).context("Failed to parse catalog JSON")?;

        Ok(catalog)
    }

    /// Save the catalog snapshot to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize catalog to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write catalog to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Structural validation.
    ///
    /// Orphaned combo references and duplicate option sets are data the admin
    /// has to clean up, not malformed input; they are logged and left to the
    /// audit.
    pub fn validate(&self) -> Result<()> {
        let mut type_ids = BTreeSet::new();
        for ty in &self.types {
            if !type_ids.insert(ty.id) {
                anyhow::bail!("Duplicate type id {}", ty.id);
            }
        }

        let mut option_ids = BTreeSet::new();
        for option in &self.options {
            if !option_ids.insert(option.id) {
                anyhow::bail!("Duplicate option id {}", option.id);
            }
            if !type_ids.contains(&option.type_id) {
                anyhow::bail!(
                    "Option {} ({}) belongs to unknown type {}",
                    option.id,
                    option.name,
                    option.type_id
                );
            }
        }

        let mut combo_ids = BTreeSet::new();
        for combo in &self.combos {
            if !combo_ids.insert(combo.id) {
                anyhow::bail!("Duplicate combo id {}", combo.id);
            }
            if combo.price < Decimal::ZERO {
                anyhow::bail!("Combo {} has a negative price {}", combo.id, combo.price);
            }

            let mut seen_types = BTreeSet::new();
            for id in &combo.options {
                match self.option(*id) {
                    Some(option) => {
                        if !seen_types.insert(option.type_id) {
                            anyhow::bail!(
                                "Combo {} holds more than one option of type {}",
                                combo.id,
                                option.type_id
                            );
                        }
                    }
                    None => tracing::warn!(
                        combo_id = %combo.id,
                        "combo references deleted option {}",
                        id
                    ),
                }
            }
        }

        for group in duplicate_option_sets(&self.combos) {
            let ids: Vec<String> = group.iter().map(|id| id.to_string()).collect();
            tracing::warn!("combos [{}] share one option set", ids.join(", "));
        }

        Ok(())
    }

    /// Look up an option by id
    pub fn option(&self, id: OptionId) -> Option<&VariantOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Options of one type, in catalog order
    pub fn options_for_type(&self, type_id: VariantTypeId) -> Vec<&VariantOption> {
        self.options.iter().filter(|o| o.type_id == type_id).collect()
    }

    /// Display position of a type
    pub fn type_index(&self, type_id: VariantTypeId) -> Option<usize> {
        self.types.iter().position(|t| t.id == type_id)
    }
}
