//! Operation events emitted by the Laboratory.
//!
//! Events accumulate in an internal buffer and are drained by the host after
//! each batch of operations. They mirror what an external ownership ledger
//! would broadcast, so integrations can reconcile without re-deriving state.

use alloy_primitives::Address;

use alembic_core::catalog::{DrugType, MoleculeType};
use alembic_core::identity::TokenId;
use alembic_core::Timestamp;

/// Everything an operation can announce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabEvent {
    /// A molecule was minted by purchase or grant.
    MoleculeMinted {
        /// The new token.
        token: TokenId,
        /// Its molecule type.
        molecule: MoleculeType,
        /// The recipient.
        owner: Address,
    },

    /// A drug was brewed from a matched ingredient set.
    DrugBrewed {
        /// The new drug token.
        token: TokenId,
        /// Its drug type.
        drug: DrugType,
        /// The recipient.
        owner: Address,
        /// The ingredient tokens burned, one per recipe slot.
        consumed: Vec<TokenId>,
        /// Whether the scarcest slot was filled by special water.
        substituted: bool,
    },

    /// A drug entered the locked decomposition phase.
    DecompositionScheduled {
        /// The locked token.
        token: TokenId,
        /// When finalization becomes possible.
        matures_at: Timestamp,
    },

    /// A locked drug was destroyed and its ingredients credited back.
    DecompositionFinalized {
        /// The destroyed token.
        token: TokenId,
        /// Its drug type.
        drug: DrugType,
        /// Molecule types returned to pool availability.
        credited: Vec<MoleculeType>,
    },
}
