//! # Supply Ledger
//!
//! Bounds-checked remaining-supply counters for both catalog halves, plus
//! the two running aggregates. Every debit and credit in the engine routes
//! through this type, which is what keeps the conservation invariant
//! checkable at any moment:
//!
//! - `sum(per_type) == aggregate`, for molecules and for drugs
//! - `per_type[t] <= static_max[t]` for every type
//!
//! Each call is all-or-nothing. A decrement that cannot be covered fails
//! without touching anything; credits only ever return units previously
//! decremented and are clamped at the static ceiling.

use alembic_core::catalog::{
    Category, DrugType, MoleculeType, DRUG_MAX_SUPPLIES, DRUG_TYPE_COUNT, MOLECULE_MAX_SUPPLIES,
    MOLECULE_TYPE_COUNT,
};
use alembic_core::error::{LabError, LabResult};

/// Remaining mintable units per type, with aggregates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupplyLedger {
    molecules: [u16; MOLECULE_TYPE_COUNT],
    drugs: [u16; DRUG_TYPE_COUNT],
    molecules_available: u32,
    drugs_available: u32,
}

/// A full copy of the ledger counters for rollback.
#[derive(Clone, Debug)]
pub struct LedgerSnapshot {
    molecules: [u16; MOLECULE_TYPE_COUNT],
    drugs: [u16; DRUG_TYPE_COUNT],
    molecules_available: u32,
    drugs_available: u32,
}

impl SupplyLedger {
    /// A fresh ledger with every type at its static maximum.
    #[must_use]
    pub fn new() -> Self {
        let molecules_available = MOLECULE_MAX_SUPPLIES.iter().map(|&s| u32::from(s)).sum();
        let drugs_available = DRUG_MAX_SUPPLIES.iter().map(|&s| u32::from(s)).sum();

        Self {
            molecules: MOLECULE_MAX_SUPPLIES,
            drugs: DRUG_MAX_SUPPLIES,
            molecules_available,
            drugs_available,
        }
    }

    // =========================================================================
    // DEBITS
    // =========================================================================

    /// Removes `count` units of one molecule type from availability.
    ///
    /// # Errors
    ///
    /// [`LabError::SupplyExhausted`] when fewer than `count` remain. The
    /// ledger is untouched on failure.
    pub fn try_decrement_molecule(&mut self, molecule: MoleculeType, count: u16) -> LabResult<()> {
        let index = molecule.index() as usize;
        let remaining = self.molecules[index];

        if remaining < count {
            return Err(LabError::SupplyExhausted {
                category: Category::Molecule,
                type_index: molecule.index(),
            });
        }

        self.molecules[index] = remaining - count;
        self.molecules_available -= u32::from(count);
        Ok(())
    }

    /// Removes one unit of a drug type from availability.
    ///
    /// # Errors
    ///
    /// [`LabError::SupplyExhausted`] when none remain.
    pub fn try_decrement_drug(&mut self, drug: DrugType) -> LabResult<()> {
        let index = drug.index() as usize;
        let remaining = self.drugs[index];

        if remaining == 0 {
            return Err(LabError::SupplyExhausted {
                category: Category::Drug,
                type_index: drug.index(),
            });
        }

        self.drugs[index] = remaining - 1;
        self.drugs_available -= 1;
        Ok(())
    }

    // =========================================================================
    // CREDITS
    // =========================================================================

    /// Returns `count` units of one molecule type to availability.
    ///
    /// Callers only ever return units previously decremented, so the result
    /// can never legitimately exceed the static ceiling. That is checked by
    /// a debug assertion and clamped in release builds, keeping the
    /// conservation invariant true either way.
    pub fn credit_molecule(&mut self, molecule: MoleculeType, count: u16) {
        let index = molecule.index() as usize;
        let ceiling = molecule.max_supply();
        let current = self.molecules[index];

        debug_assert!(
            u32::from(current) + u32::from(count) <= u32::from(ceiling),
            "credit past ceiling for molecule type {}",
            molecule.index()
        );

        let next = current.saturating_add(count).min(ceiling);
        self.molecules_available += u32::from(next - current);
        self.molecules[index] = next;
    }

    /// Returns one unit of a drug type to availability.
    ///
    /// No engine path currently credits drugs back (drug supply acts as a
    /// lifetime mint cap), but the operation is part of the ledger contract
    /// and follows the same clamping rules as molecule credits.
    pub fn credit_drug(&mut self, drug: DrugType) {
        let index = drug.index() as usize;
        let ceiling = drug.max_supply();
        let current = self.drugs[index];

        debug_assert!(
            current < ceiling,
            "credit past ceiling for drug type {}",
            drug.index()
        );

        let next = current.saturating_add(1).min(ceiling);
        self.drugs_available += u32::from(next - current);
        self.drugs[index] = next;
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Total molecule units still mintable.
    #[inline]
    #[must_use]
    pub const fn molecules_available(&self) -> u32 {
        self.molecules_available
    }

    /// Total drug units still mintable.
    #[inline]
    #[must_use]
    pub const fn drugs_available(&self) -> u32 {
        self.drugs_available
    }

    /// Remaining units of one molecule type.
    #[inline]
    #[must_use]
    pub const fn molecule_availability(&self, molecule: MoleculeType) -> u16 {
        self.molecules[molecule.index() as usize]
    }

    /// Remaining units of one drug type.
    #[inline]
    #[must_use]
    pub const fn drug_availability(&self, drug: DrugType) -> u16 {
        self.drugs[drug.index() as usize]
    }

    /// Remaining units for all molecule types, indexed by type.
    #[inline]
    #[must_use]
    pub const fn molecule_availabilities(&self) -> &[u16; MOLECULE_TYPE_COUNT] {
        &self.molecules
    }

    /// Remaining units for all drug types, indexed by type.
    #[inline]
    #[must_use]
    pub const fn drug_availabilities(&self) -> &[u16; DRUG_TYPE_COUNT] {
        &self.drugs
    }

    /// Verifies the conservation invariant over the whole ledger.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        let molecule_sum: u32 = self.molecules.iter().map(|&c| u32::from(c)).sum();
        let drug_sum: u32 = self.drugs.iter().map(|&c| u32::from(c)).sum();

        molecule_sum == self.molecules_available
            && drug_sum == self.drugs_available
            && self
                .molecules
                .iter()
                .zip(MOLECULE_MAX_SUPPLIES.iter())
                .all(|(remaining, max)| remaining <= max)
            && self
                .drugs
                .iter()
                .zip(DRUG_MAX_SUPPLIES.iter())
                .all(|(remaining, max)| remaining <= max)
    }

    // =========================================================================
    // ROLLBACK
    // =========================================================================

    /// Creates a snapshot of all counters for rollback.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            molecules: self.molecules,
            drugs: self.drugs,
            molecules_available: self.molecules_available,
            drugs_available: self.drugs_available,
        }
    }

    /// Restores all counters from a snapshot (rollback).
    pub fn restore(&mut self, snapshot: &LedgerSnapshot) {
        self.molecules = snapshot.molecules;
        self.drugs = snapshot.drugs;
        self.molecules_available = snapshot.molecules_available;
        self.drugs_available = snapshot.drugs_available;
    }
}

impl Default for SupplyLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alembic_core::catalog::{TOTAL_DRUG_SUPPLY, TOTAL_MOLECULE_SUPPLY};

    fn molecule(index: u8) -> MoleculeType {
        MoleculeType::new(index).unwrap()
    }

    fn drug(index: u8) -> DrugType {
        DrugType::new(index).unwrap()
    }

    #[test]
    fn test_fresh_ledger_is_full_and_conserved() {
        let ledger = SupplyLedger::new();

        assert_eq!(ledger.molecules_available(), TOTAL_MOLECULE_SUPPLY);
        assert_eq!(ledger.drugs_available(), TOTAL_DRUG_SUPPLY);
        assert_eq!(ledger.molecule_availability(MoleculeType::WATER), 1134);
        assert_eq!(ledger.drug_availability(drug(0)), 250);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_decrement_updates_type_and_aggregate() {
        let mut ledger = SupplyLedger::new();

        ledger.try_decrement_molecule(molecule(2), 3).unwrap();
        assert_eq!(ledger.molecule_availability(molecule(2)), 142 - 3);
        assert_eq!(ledger.molecules_available(), TOTAL_MOLECULE_SUPPLY - 3);

        ledger.try_decrement_drug(drug(13)).unwrap();
        assert_eq!(ledger.drug_availability(drug(13)), 1);
        assert_eq!(ledger.drugs_available(), TOTAL_DRUG_SUPPLY - 1);

        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_decrement_past_remaining_fails_and_leaves_ledger_untouched() {
        let mut ledger = SupplyLedger::new();

        // Type 62 has a single unit.
        ledger.try_decrement_molecule(molecule(62), 1).unwrap();
        let before = ledger.clone();

        let error = ledger.try_decrement_molecule(molecule(62), 1).unwrap_err();
        assert_eq!(
            error,
            LabError::SupplyExhausted {
                category: Category::Molecule,
                type_index: 62,
            }
        );
        assert_eq!(ledger, before);

        // A multi-unit request that cannot be fully covered takes nothing.
        let error = ledger.try_decrement_molecule(molecule(34), 13).unwrap_err();
        assert!(matches!(error, LabError::SupplyExhausted { .. }));
        assert_eq!(ledger.molecule_availability(molecule(34)), 12);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_drug_exhaustion() {
        let mut ledger = SupplyLedger::new();

        // Drug 13 has two units.
        ledger.try_decrement_drug(drug(13)).unwrap();
        ledger.try_decrement_drug(drug(13)).unwrap();

        let error = ledger.try_decrement_drug(drug(13)).unwrap_err();
        assert_eq!(
            error,
            LabError::SupplyExhausted {
                category: Category::Drug,
                type_index: 13,
            }
        );
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_credit_returns_units() {
        let mut ledger = SupplyLedger::new();

        ledger.try_decrement_molecule(molecule(8), 5).unwrap();
        ledger.credit_molecule(molecule(8), 5);
        assert_eq!(ledger.molecule_availability(molecule(8)), 107);
        assert_eq!(ledger.molecules_available(), TOTAL_MOLECULE_SUPPLY);

        ledger.try_decrement_drug(drug(4)).unwrap();
        ledger.credit_drug(drug(4));
        assert_eq!(ledger.drug_availability(drug(4)), 50);
        assert_eq!(ledger.drugs_available(), TOTAL_DRUG_SUPPLY);

        assert!(ledger.is_conserved());
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_credit_is_clamped_at_the_ceiling_in_release() {
        let mut ledger = SupplyLedger::new();

        ledger.credit_molecule(molecule(8), 3);
        assert_eq!(ledger.molecule_availability(molecule(8)), 107);
        assert_eq!(ledger.molecules_available(), TOTAL_MOLECULE_SUPPLY);
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut ledger = SupplyLedger::new();
        let snapshot = ledger.snapshot();

        ledger.try_decrement_molecule(molecule(0), 100).unwrap();
        ledger.try_decrement_drug(drug(6)).unwrap();
        assert_ne!(ledger.molecules_available(), TOTAL_MOLECULE_SUPPLY);

        ledger.restore(&snapshot);
        assert_eq!(ledger, SupplyLedger::new());
        assert!(ledger.is_conserved());
    }

    #[test]
    fn test_full_drain_reaches_exactly_zero() {
        let mut ledger = SupplyLedger::new();

        for index in 0..MoleculeType::COUNT {
            let m = molecule(index);
            let remaining = ledger.molecule_availability(m);
            ledger.try_decrement_molecule(m, remaining).unwrap();
        }

        assert_eq!(ledger.molecules_available(), 0);
        assert!(ledger.is_conserved());
        assert!(matches!(
            ledger.try_decrement_molecule(molecule(0), 1),
            Err(LabError::SupplyExhausted { .. })
        ));
    }
}
