//! # Purchase Engine
//!
//! Supply-weighted random selection of molecule types. A uniform roll in
//! `[0, molecules_available)` walks the cumulative remaining counts, so a
//! type's chance of being drawn is exactly `remaining / total` and a
//! drained type can never be drawn at all. The ledger is decremented once
//! per planned unit before any token exists, which is what makes oversell
//! impossible.
//!
//! Planning is separated from minting: [`plan_weighted_batch`] commits the
//! ledger debits and returns the chosen types, and the caller mints
//! identifiers for them afterwards. A planning failure rolls the ledger
//! back to its checkpoint, keeping the operation all-or-nothing.

use rand::Rng;

use alembic_core::catalog::{MoleculeType, MOLECULE_TYPE_COUNT};
use alembic_core::error::{LabError, LabResult};

use crate::ledger::SupplyLedger;

/// Maps a uniform roll onto a molecule type by walking the cumulative
/// remaining counts. Callers draw `roll` below the sum of `availabilities`;
/// a roll at or past the sum falls back to water.
#[must_use]
pub fn select_weighted(availabilities: &[u16; MOLECULE_TYPE_COUNT], roll: u32) -> MoleculeType {
    let mut remaining_roll = roll;

    for (index, &remaining) in availabilities.iter().enumerate() {
        let weight = u32::from(remaining);
        if remaining_roll < weight {
            if let Some(molecule) = MoleculeType::new(index as u8) {
                return molecule;
            }
        }
        remaining_roll -= remaining_roll.min(weight);
    }

    MoleculeType::WATER
}

/// Debits the ledger for `count` weighted draws and returns the chosen
/// types in draw order.
///
/// # Errors
///
/// [`LabError::CannotFulfillRequest`] when the pool runs out mid-plan. The
/// ledger is rolled back to its state at entry on any failure.
pub fn plan_weighted_batch<R: Rng + ?Sized>(
    ledger: &mut SupplyLedger,
    rng: &mut R,
    count: u32,
) -> LabResult<Vec<MoleculeType>> {
    let checkpoint = ledger.snapshot();
    let mut plan = Vec::with_capacity(count as usize);

    for drawn in 0..count {
        let available = ledger.molecules_available();
        if available == 0 {
            ledger.restore(&checkpoint);
            return Err(LabError::CannotFulfillRequest {
                minimum: count,
                mintable: drawn,
            });
        }

        let roll = rng.gen_range(0..available);
        let molecule = select_weighted(ledger.molecule_availabilities(), roll);

        if let Err(error) = ledger.try_decrement_molecule(molecule, 1) {
            ledger.restore(&checkpoint);
            return Err(error);
        }
        plan.push(molecule);
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_select_weighted_walks_cumulative_counts() {
        let mut availabilities = [0u16; MOLECULE_TYPE_COUNT];
        availabilities[3] = 10;
        availabilities[7] = 5;
        availabilities[62] = 1;

        assert_eq!(select_weighted(&availabilities, 0).index(), 3);
        assert_eq!(select_weighted(&availabilities, 9).index(), 3);
        assert_eq!(select_weighted(&availabilities, 10).index(), 7);
        assert_eq!(select_weighted(&availabilities, 14).index(), 7);
        assert_eq!(select_weighted(&availabilities, 15).index(), 62);
    }

    #[test]
    fn test_select_weighted_never_picks_a_drained_type() {
        let mut ledger = SupplyLedger::new();
        let water = MoleculeType::WATER;
        let remaining = ledger.molecule_availability(water);
        ledger.try_decrement_molecule(water, remaining).unwrap();

        for roll in (0..ledger.molecules_available()).step_by(97) {
            let chosen = select_weighted(ledger.molecule_availabilities(), roll);
            assert_ne!(chosen, water);
        }
    }

    #[test]
    fn test_plan_debits_exactly_what_it_returns() {
        let mut ledger = SupplyLedger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let before = ledger.molecules_available();

        let plan = plan_weighted_batch(&mut ledger, &mut rng, 120).unwrap();

        assert_eq!(plan.len(), 120);
        assert_eq!(ledger.molecules_available(), before - 120);
        assert!(ledger.is_conserved());

        // Per-type debits match the plan's multiset.
        let mut expected = SupplyLedger::new();
        for molecule in &plan {
            expected.try_decrement_molecule(*molecule, 1).unwrap();
        }
        assert_eq!(
            expected.molecule_availabilities(),
            ledger.molecule_availabilities()
        );
    }

    #[test]
    fn test_plan_is_deterministic_for_a_fixed_seed() {
        let mut first_ledger = SupplyLedger::new();
        let mut second_ledger = SupplyLedger::new();
        let mut first_rng = ChaCha8Rng::seed_from_u64(1134);
        let mut second_rng = ChaCha8Rng::seed_from_u64(1134);

        let first = plan_weighted_batch(&mut first_ledger, &mut first_rng, 50).unwrap();
        let second = plan_weighted_batch(&mut second_ledger, &mut second_rng, 50).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_past_the_pool_rolls_back() {
        let mut ledger = SupplyLedger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let total = ledger.molecules_available();

        let error = plan_weighted_batch(&mut ledger, &mut rng, total + 1).unwrap_err();

        assert_eq!(
            error,
            LabError::CannotFulfillRequest {
                minimum: total + 1,
                mintable: total,
            }
        );
        // Fully rolled back.
        assert_eq!(ledger.molecules_available(), total);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_draining_the_entire_pool_is_exact() {
        let mut ledger = SupplyLedger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let total = ledger.molecules_available();

        let plan = plan_weighted_batch(&mut ledger, &mut rng, total).unwrap();

        assert_eq!(plan.len() as u32, total);
        assert_eq!(ledger.molecules_available(), 0);
        assert!(ledger.is_conserved());
        assert!(ledger
            .molecule_availabilities()
            .iter()
            .all(|&remaining| remaining == 0));
    }
}
