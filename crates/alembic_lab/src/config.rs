//! # Laboratory Configuration
//!
//! The deployment-time constants a [`crate::lab::Laboratory`] is
//! constructed from. Values arrive as plain data; the engine never reads
//! configuration from the environment on its own.

use alembic_core::Timestamp;

/// Deployment-time constants for one Laboratory instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabConfig {
    /// Price charged per minted molecule, in payment base units.
    pub price_per_token: u128,
    /// Seconds a scheduled decomposition stays locked before it matures.
    pub decomposition_delay: Timestamp,
    /// Seed for the engine's deterministic random number generator.
    pub rng_seed: u64,
}
