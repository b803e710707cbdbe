//! # ALEMBIC Core
//!
//! Identity codec, static catalog, and error taxonomy for the ALEMBIC
//! collectible set. This crate is pure: no counters, no clocks, no
//! randomness of its own. Everything here can run off-line against nothing
//! but an identifier.
//!
//! ## Design Principles
//!
//! 1. **Identity is the identifier** - a token's type, seed and appearance
//!    are bit-packed into its 256-bit id; there is no side table
//! 2. **Total decoding** - every out-of-range field is rejected, never
//!    clamped
//! 3. **Compiled-in catalog** - supplies, recipes and names are constants,
//!    not configuration
//! 4. **Closed error set** - twelve kinds, three classes, stable codes
//!
//! ## Example
//!
//! ```rust,ignore
//! use alembic_core::{TokenIdentity, TokenKind, MoleculeType};
//!
//! let identity = TokenIdentity::sample(
//!     TokenKind::Molecule(MoleculeType::WATER),
//!     &mut rng,
//! );
//! let id = identity.encode();
//! assert_eq!(TokenIdentity::decode(id)?, identity);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod attributes;
pub mod catalog;
pub mod error;
pub mod identity;

pub use attributes::{
    Appearance, Blob, Deformation, Integrity, Lighting, Palette, StripeAmount, StripeShift,
};
pub use catalog::{
    Category, DrugType, MoleculeType, DRUG_MAX_SUPPLIES, DRUG_NAMES, DRUG_TYPE_COUNT,
    MOLECULE_MAX_SUPPLIES, MOLECULE_NAMES, MOLECULE_TYPE_COUNT, RECIPES, SPECIAL_WATER_BASE,
    TOTAL_DRUG_SUPPLY, TOTAL_MOLECULE_SUPPLY, WATER_INDEX,
};
pub use error::{ErrorClass, LabError, LabResult};
pub use identity::{
    parse_token_id, TokenHandle, TokenId, TokenIdentity, TokenKind, DRUG_GLOBAL_BASE,
    GLOBAL_TYPE_MAX,
};

/// Engine time in whole seconds since an arbitrary epoch.
///
/// The engine never reads a clock; time always arrives as data.
pub type Timestamp = u64;
