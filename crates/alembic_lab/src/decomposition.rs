//! # Decomposition Engine
//!
//! Two-phase, time-delayed destruction of brewed drugs:
//!
//! ```text
//!               schedule                 finalize (now >= maturity)
//! NotStarted ------------> Locked ----------------------------------> gone
//!     |                      |
//!     |                      +-- schedule again -> AlreadyLocked
//!     +-- finalize -> UnknownInstance
//! ```
//!
//! The engine owns every [`DrugInstance`] created by brewing, keyed by token
//! identifier. Finalization is terminal: the record is removed and handed
//! back to the caller, which burns the token and credits the recorded
//! ingredient types to pool availability. Exactly one finalize can ever
//! succeed per instance.
//!
//! Maturity is a non-blocking precondition. An early finalize reports
//! [`LabError::NotMatured`] and the caller re-submits after the deadline; a
//! locked instance nobody finalizes stays locked indefinitely.

use std::collections::HashMap;

use alembic_core::catalog::{DrugType, MoleculeType};
use alembic_core::error::{LabError, LabResult};
use alembic_core::identity::TokenId;
use alembic_core::Timestamp;

/// Where an instance is in its decomposition lifecycle. The terminal
/// "finalized" state is represented by removal of the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecompositionState {
    /// Brewed, never scheduled.
    NotStarted,
    /// Scheduled and waiting out the delay.
    Locked {
        /// When finalization becomes possible.
        matures_at: Timestamp,
    },
}

/// The engine's record of one brewed drug.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrugInstance {
    /// The drug token.
    pub token: TokenId,
    /// Its drug type.
    pub drug: DrugType,
    /// Molecule types actually burned to brew it, one per recipe slot. When
    /// the scarcest slot was substituted this holds the special-water type,
    /// not the recipe's nominal requirement.
    pub consumed: Vec<MoleculeType>,
    /// Whether the scarcest slot was substituted.
    pub substituted: bool,
    /// Current lifecycle state.
    pub state: DecompositionState,
}

/// What a successful finalization returns to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompositionReceipt {
    /// The destroyed token.
    pub token: TokenId,
    /// Its drug type.
    pub drug: DrugType,
    /// Molecule types credited back to pool availability.
    pub credited: Vec<MoleculeType>,
}

/// Owns all brewed-drug records and drives their state machine.
#[derive(Debug, Clone)]
pub struct Decomposer {
    instances: HashMap<TokenId, DrugInstance>,
    delay: Timestamp,
}

impl Decomposer {
    /// An empty engine with the given lock delay in seconds.
    #[must_use]
    pub fn new(delay: Timestamp) -> Self {
        Self {
            instances: HashMap::new(),
            delay,
        }
    }

    /// The configured lock delay.
    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Timestamp {
        self.delay
    }

    /// Records a freshly brewed drug in the `NotStarted` state.
    pub fn record_brew(
        &mut self,
        token: TokenId,
        drug: DrugType,
        consumed: Vec<MoleculeType>,
        substituted: bool,
    ) {
        self.instances.insert(
            token,
            DrugInstance {
                token,
                drug,
                consumed,
                substituted,
                state: DecompositionState::NotStarted,
            },
        );
    }

    /// Current lifecycle state, `None` for tokens with no record.
    #[must_use]
    pub fn state_of(&self, token: TokenId) -> Option<DecompositionState> {
        self.instances.get(&token).map(|instance| instance.state)
    }

    /// The full record, `None` for tokens with no record.
    #[must_use]
    pub fn instance(&self, token: TokenId) -> Option<&DrugInstance> {
        self.instances.get(&token)
    }

    /// Number of live records, locked or not.
    #[must_use]
    pub fn recorded_count(&self) -> usize {
        self.instances.len()
    }

    /// Locks an instance and returns its maturity time.
    ///
    /// # Errors
    ///
    /// [`LabError::UnknownInstance`] when no record exists for the token,
    /// [`LabError::AlreadyLocked`] when it is already locked. Nothing
    /// changes on failure.
    pub fn schedule(&mut self, token: TokenId, now: Timestamp) -> LabResult<Timestamp> {
        let instance = self
            .instances
            .get_mut(&token)
            .ok_or(LabError::UnknownInstance(token))?;

        match instance.state {
            DecompositionState::Locked { .. } => Err(LabError::AlreadyLocked(token)),
            DecompositionState::NotStarted => {
                let matures_at = now.saturating_add(self.delay);
                instance.state = DecompositionState::Locked { matures_at };
                Ok(matures_at)
            }
        }
    }

    /// Removes and returns a matured instance.
    ///
    /// # Errors
    ///
    /// [`LabError::UnknownInstance`] when no locked record exists (never
    /// brewed, never scheduled, or already finalized),
    /// [`LabError::NotMatured`] before the maturity time. The record stays
    /// in place on failure.
    pub fn finalize(&mut self, token: TokenId, now: Timestamp) -> LabResult<DrugInstance> {
        let instance = self
            .instances
            .get(&token)
            .ok_or(LabError::UnknownInstance(token))?;

        match instance.state {
            // A record that was never scheduled is not in the finalizable
            // set; callers cannot distinguish it from no record at all.
            DecompositionState::NotStarted => Err(LabError::UnknownInstance(token)),
            DecompositionState::Locked { matures_at } => {
                if now < matures_at {
                    return Err(LabError::NotMatured { matures_at, now });
                }

                match self.instances.remove(&token) {
                    Some(instance) => Ok(instance),
                    None => Err(LabError::UnknownInstance(token)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    const DELAY: Timestamp = 864_000;

    fn sample_token(tag: u64) -> TokenId {
        U256::from(tag)
    }

    fn recorded(decomposer: &mut Decomposer, tag: u64) -> TokenId {
        let token = sample_token(tag);
        let drug = DrugType::new(10).unwrap();
        let consumed = vec![
            MoleculeType::WATER,
            MoleculeType::new(9).unwrap(),
            MoleculeType::new(13).unwrap(),
        ];
        decomposer.record_brew(token, drug, consumed, false);
        token
    }

    #[test]
    fn test_full_lifecycle() {
        let mut decomposer = Decomposer::new(DELAY);
        let token = recorded(&mut decomposer, 1);

        assert_eq!(
            decomposer.state_of(token),
            Some(DecompositionState::NotStarted)
        );

        let matures_at = decomposer.schedule(token, 1000).unwrap();
        assert_eq!(matures_at, 1000 + DELAY);
        assert_eq!(
            decomposer.state_of(token),
            Some(DecompositionState::Locked { matures_at })
        );

        let instance = decomposer.finalize(token, matures_at).unwrap();
        assert_eq!(instance.token, token);
        assert_eq!(instance.consumed.len(), 3);

        // Terminal: the record is gone.
        assert_eq!(decomposer.state_of(token), None);
        assert_eq!(decomposer.recorded_count(), 0);
    }

    #[test]
    fn test_schedule_twice_reports_already_locked() {
        let mut decomposer = Decomposer::new(DELAY);
        let token = recorded(&mut decomposer, 2);

        let matures_at = decomposer.schedule(token, 500).unwrap();
        let error = decomposer.schedule(token, 600).unwrap_err();

        assert_eq!(error, LabError::AlreadyLocked(token));
        // The original maturity is untouched.
        assert_eq!(
            decomposer.state_of(token),
            Some(DecompositionState::Locked { matures_at })
        );
    }

    #[test]
    fn test_schedule_unknown_token() {
        let mut decomposer = Decomposer::new(DELAY);
        let stranger = sample_token(404);

        assert_eq!(
            decomposer.schedule(stranger, 0).unwrap_err(),
            LabError::UnknownInstance(stranger)
        );
    }

    #[test]
    fn test_finalize_before_maturity_reports_not_matured() {
        let mut decomposer = Decomposer::new(DELAY);
        let token = recorded(&mut decomposer, 3);

        let matures_at = decomposer.schedule(token, 100).unwrap();
        let error = decomposer.finalize(token, matures_at - 1).unwrap_err();

        assert_eq!(
            error,
            LabError::NotMatured {
                matures_at,
                now: matures_at - 1,
            }
        );
        // Still locked, still finalizable later.
        assert!(decomposer.finalize(token, matures_at).is_ok());
    }

    #[test]
    fn test_finalize_without_schedule_is_unknown() {
        let mut decomposer = Decomposer::new(DELAY);
        let token = recorded(&mut decomposer, 4);

        assert_eq!(
            decomposer.finalize(token, u64::MAX).unwrap_err(),
            LabError::UnknownInstance(token)
        );
        // The record survives and can still be scheduled.
        assert!(decomposer.schedule(token, 0).is_ok());
    }

    #[test]
    fn test_exactly_one_finalize_succeeds() {
        let mut decomposer = Decomposer::new(DELAY);
        let token = recorded(&mut decomposer, 5);

        let matures_at = decomposer.schedule(token, 0).unwrap();
        decomposer.finalize(token, matures_at + 10).unwrap();

        assert_eq!(
            decomposer.finalize(token, matures_at + 20).unwrap_err(),
            LabError::UnknownInstance(token)
        );
    }

    #[test]
    fn test_maturity_saturates_instead_of_wrapping() {
        let mut decomposer = Decomposer::new(DELAY);
        let token = recorded(&mut decomposer, 6);

        let matures_at = decomposer.schedule(token, u64::MAX - 5).unwrap();
        assert_eq!(matures_at, u64::MAX);
    }
}
