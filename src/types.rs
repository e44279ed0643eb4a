//! Type-safe data model for product variants
//!
//! Identifiers are opaque newtypes so a type id can never be passed where an
//! option id is expected. Shapes match the JSON the storefront backend serves
//! for product and combo fetches.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum::{Display, EnumIter, EnumString};

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_newtype!(
    /// Identifier of a variant dimension, unique within a product
    VariantTypeId
);
id_newtype!(
    /// Identifier of an option value, unique within a product
    OptionId
);
id_newtype!(
    /// Identifier of a registered combo
    ComboId
);
id_newtype!(
    /// Identifier of a product
    ProductId
);

/// A variant dimension of a product (e.g. "Size")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantType {
    pub id: VariantTypeId,
    pub name: String,
}

/// A value belonging to exactly one variant type (e.g. "Large")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub id: OptionId,
    pub name: String,
    pub type_id: VariantTypeId,
}

/// A registered, purchasable combination of options.
///
/// Combos are the only source of truth for what can be sold; the cartesian
/// product of all options is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub id: ComboId,
    pub options: Vec<OptionId>,
    pub price: Decimal,
}

impl Combo {
    /// Order-independent view of the combo's options
    pub fn option_set(&self) -> BTreeSet<OptionId> {
        self.options.iter().copied().collect()
    }

    /// Exact set equality against `ids`
    pub fn matches_exactly(&self, ids: &BTreeSet<OptionId>) -> bool {
        self.option_set() == *ids
    }

    /// True if every id in `ids` is part of this combo
    pub fn contains_all<'a, I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a OptionId>,
    {
        ids.into_iter().all(|id| self.options.contains(id))
    }
}

/// Health of a registered combo against the live option list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComboStatus {
    /// Every referenced option still exists
    Valid,
    /// At least one referenced option was deleted
    Orphaned,
}

/// Admin action on a registered combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComboAction {
    Edit,
    Delete,
}

impl ComboStatus {
    /// Orphaned combos are delete-only
    pub fn allowed_actions(self) -> &'static [ComboAction] {
        match self {
            Self::Valid => &[ComboAction::Edit, ComboAction::Delete],
            Self::Orphaned => &[ComboAction::Delete],
        }
    }
}
