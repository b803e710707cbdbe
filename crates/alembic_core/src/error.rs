//! # Error Taxonomy
//!
//! All failures a caller can observe, as twelve stable kinds. The set is
//! closed: integration layers switch on [`LabError::code`] and the contract
//! is that no new kind appears without a major version bump.
//!
//! Every kind belongs to one of three classes:
//!
//! - **Validation**: the input itself is malformed. Safe to retry with a
//!   corrected input.
//! - **State**: the input is well formed but a precondition does not hold in
//!   the current state.
//! - **Resource**: a capacity or value mismatch. Requests are never
//!   partially honored.

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::catalog::Category;
use crate::Timestamp;

/// Errors that can occur in the accounting engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabError {
    /// Identifier is malformed or encodes an out-of-range field.
    #[error("invalid token identifier: {0}")]
    InvalidIdentifier(String),

    /// Drug type index out of the catalog range `0..19`.
    #[error("invalid drug type {requested}, valid range is 0..19")]
    InvalidDrugType {
        /// The rejected index.
        requested: u8,
    },

    /// Molecule type index out of range, or a presented token unusable as a
    /// brewing ingredient.
    #[error("invalid molecule: {0}")]
    InvalidMolecule(String),

    /// Presented tokens do not cover every slot of the recipe.
    #[error("recipe for drug type {drug} not satisfied by presented tokens")]
    RecipeNotSatisfied {
        /// The drug whose recipe failed to match.
        drug: u8,
    },

    /// Decomposition was requested for a token that is not a drug.
    #[error("token {0} is not a drug")]
    NotDrug(U256),

    /// Caller neither holds nor is approved for the token.
    #[error("account {caller} does not control token {token}")]
    NotOwner {
        /// The token in question.
        token: U256,
        /// The rejected caller.
        caller: Address,
    },

    /// Decomposition is already scheduled for this instance.
    #[error("decomposition already scheduled for token {0}")]
    AlreadyLocked(U256),

    /// The decomposition delay has not elapsed yet.
    #[error("decomposition matures at {matures_at}, current time {now}")]
    NotMatured {
        /// When finalization becomes possible.
        matures_at: Timestamp,
        /// The submitted current time.
        now: Timestamp,
    },

    /// No decomposable instance is recorded for this token.
    #[error("no decomposable instance recorded for token {0}")]
    UnknownInstance(U256),

    /// The per-type remaining supply cannot cover the request.
    #[error("supply exhausted for {category} type {type_index}")]
    SupplyExhausted {
        /// Which catalog half ran dry.
        category: Category,
        /// The drained type index.
        type_index: u8,
    },

    /// Fewer units are mintable than the caller's stated minimum.
    #[error("cannot fulfill request: minimum {minimum}, only {mintable} mintable")]
    CannotFulfillRequest {
        /// The caller's minimum acceptable count.
        minimum: u32,
        /// How many units could actually be minted.
        mintable: u32,
    },

    /// Payment does not match the price of the actually minted count.
    #[error("incorrect payment: provided {provided}, required {required}")]
    IncorrectPayment {
        /// The value the caller attached.
        provided: U256,
        /// The exact value owed.
        required: U256,
    },
}

/// Coarse classification of the twelve error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed input. Retry with corrected input.
    Validation,
    /// Precondition does not hold in the current state.
    State,
    /// Capacity or value mismatch.
    Resource,
}

impl core::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::State => write!(f, "state"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

impl LabError {
    /// The class this kind belongs to.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidIdentifier(_)
            | Self::InvalidDrugType { .. }
            | Self::InvalidMolecule(_) => ErrorClass::Validation,
            Self::RecipeNotSatisfied { .. }
            | Self::NotDrug(_)
            | Self::NotOwner { .. }
            | Self::AlreadyLocked(_)
            | Self::NotMatured { .. }
            | Self::UnknownInstance(_) => ErrorClass::State,
            Self::SupplyExhausted { .. }
            | Self::CannotFulfillRequest { .. }
            | Self::IncorrectPayment { .. } => ErrorClass::Resource,
        }
    }

    /// Stable machine-readable kind name.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier(_) => "InvalidIdentifier",
            Self::InvalidDrugType { .. } => "InvalidDrugType",
            Self::InvalidMolecule(_) => "InvalidMolecule",
            Self::RecipeNotSatisfied { .. } => "RecipeNotSatisfied",
            Self::NotDrug(_) => "NotDrug",
            Self::NotOwner { .. } => "NotOwner",
            Self::AlreadyLocked(_) => "AlreadyLocked",
            Self::NotMatured { .. } => "NotMatured",
            Self::UnknownInstance(_) => "UnknownInstance",
            Self::SupplyExhausted { .. } => "SupplyExhausted",
            Self::CannotFulfillRequest { .. } => "CannotFulfillRequest",
            Self::IncorrectPayment { .. } => "IncorrectPayment",
        }
    }
}

/// Result type for engine operations.
pub type LabResult<T> = Result<T, LabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_class_and_code() {
        let samples = [
            LabError::InvalidIdentifier("bad".into()),
            LabError::InvalidDrugType { requested: 19 },
            LabError::InvalidMolecule("type index 63 out of range".into()),
            LabError::RecipeNotSatisfied { drug: 3 },
            LabError::NotDrug(U256::from(7u8)),
            LabError::NotOwner {
                token: U256::from(7u8),
                caller: Address::ZERO,
            },
            LabError::AlreadyLocked(U256::from(7u8)),
            LabError::NotMatured {
                matures_at: 864_000,
                now: 10,
            },
            LabError::UnknownInstance(U256::from(7u8)),
            LabError::SupplyExhausted {
                category: Category::Drug,
                type_index: 13,
            },
            LabError::CannotFulfillRequest {
                minimum: 5,
                mintable: 3,
            },
            LabError::IncorrectPayment {
                provided: U256::ZERO,
                required: U256::from(200u8),
            },
        ];

        let mut codes = Vec::new();
        for error in &samples {
            codes.push(error.code());
        }
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 12, "codes must be distinct and stable");

        assert_eq!(samples[0].class(), ErrorClass::Validation);
        assert_eq!(samples[3].class(), ErrorClass::State);
        assert_eq!(samples[9].class(), ErrorClass::Resource);
    }

    #[test]
    fn test_messages_carry_context() {
        let error = LabError::CannotFulfillRequest {
            minimum: 80,
            mintable: 12,
        };
        assert_eq!(
            error.to_string(),
            "cannot fulfill request: minimum 80, only 12 mintable"
        );

        let error = LabError::SupplyExhausted {
            category: Category::Molecule,
            type_index: 0,
        };
        assert_eq!(error.to_string(), "supply exhausted for molecule type 0");
    }
}
