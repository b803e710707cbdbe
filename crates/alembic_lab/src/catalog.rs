//! # Recipe Catalog View
//!
//! Runtime lookups over the compiled-in recipe data: raw-index validation
//! for the public boundary, the reverse ingredient index, and the
//! special-water reverse mapping. The recipe definitions themselves live in
//! `alembic_core::catalog` and never change at runtime.

use alembic_core::catalog::{
    DrugType, MoleculeType, MOLECULE_TYPE_COUNT, RECIPES, SPECIAL_WATER_BASE,
};
use alembic_core::error::{LabError, LabResult};

/// Read-only recipe lookups, including a reverse ingredient index built
/// once at construction.
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    by_ingredient: Vec<Vec<DrugType>>,
}

impl RecipeCatalog {
    /// Builds the reverse index over all 19 recipes.
    #[must_use]
    pub fn new() -> Self {
        let mut by_ingredient = vec![Vec::new(); MOLECULE_TYPE_COUNT];

        for (drug_index, recipe) in RECIPES.iter().enumerate() {
            // Recipe indices are in range by construction.
            if let Some(drug) = DrugType::new(drug_index as u8) {
                for ingredient in *recipe {
                    by_ingredient[ingredient.index() as usize].push(drug);
                }
            }
        }

        Self { by_ingredient }
    }

    /// Validates a raw drug type index from the public boundary.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidDrugType`] for `raw >= 19`.
    pub fn validate_drug(raw: u8) -> LabResult<DrugType> {
        DrugType::new(raw).ok_or(LabError::InvalidDrugType { requested: raw })
    }

    /// Validates a raw molecule type index from the public boundary.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidMolecule`] for `raw >= 63`.
    pub fn validate_molecule(raw: u8) -> LabResult<MoleculeType> {
        MoleculeType::new(raw).ok_or_else(|| {
            LabError::InvalidMolecule(format!(
                "type index {raw} out of range, valid range is 0..{MOLECULE_TYPE_COUNT}"
            ))
        })
    }

    /// Every drug whose recipe requires the given molecule type.
    #[must_use]
    pub fn drugs_requiring(&self, molecule: MoleculeType) -> &[DrugType] {
        &self.by_ingredient[molecule.index() as usize]
    }

    /// The drug a molecule type is the reserved special water for, if any.
    #[must_use]
    pub fn special_water_for(molecule: MoleculeType) -> Option<DrugType> {
        molecule
            .index()
            .checked_sub(SPECIAL_WATER_BASE)
            .and_then(DrugType::new)
    }
}

impl Default for RecipeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alembic_core::catalog::DRUG_TYPE_COUNT;

    #[test]
    fn test_validators_accept_and_reject_boundaries() {
        assert_eq!(RecipeCatalog::validate_drug(18).unwrap().index(), 18);
        assert!(matches!(
            RecipeCatalog::validate_drug(19),
            Err(LabError::InvalidDrugType { requested: 19 })
        ));

        assert_eq!(RecipeCatalog::validate_molecule(62).unwrap().index(), 62);
        assert!(matches!(
            RecipeCatalog::validate_molecule(63),
            Err(LabError::InvalidMolecule(_))
        ));
    }

    #[test]
    fn test_water_is_required_by_every_drug() {
        let catalog = RecipeCatalog::new();
        assert_eq!(
            catalog.drugs_requiring(MoleculeType::WATER).len(),
            DRUG_TYPE_COUNT
        );
    }

    #[test]
    fn test_reverse_index_matches_recipes() {
        let catalog = RecipeCatalog::new();

        // THC (13) appears only in Cannabis (10).
        let thc = MoleculeType::new(13).unwrap();
        let users = catalog.drugs_requiring(thc);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].index(), 10);

        // Morphine (14) is needed by Morphine (Isolated) (7) and Opium (17).
        let morphine = MoleculeType::new(14).unwrap();
        let users: Vec<u8> = catalog.drugs_requiring(morphine).iter().map(|d| d.index()).collect();
        assert_eq!(users, vec![7, 17]);

        // MDMA (49) only appears in Love Elixir (13).
        let mdma = MoleculeType::new(49).unwrap();
        assert_eq!(catalog.drugs_requiring(mdma).len(), 1);
    }

    #[test]
    fn test_special_water_reverse_mapping() {
        // 44 is drug 0's reserved water, 62 is drug 18's.
        let m44 = MoleculeType::new(44).unwrap();
        assert_eq!(RecipeCatalog::special_water_for(m44).unwrap().index(), 0);

        let m62 = MoleculeType::new(62).unwrap();
        assert_eq!(RecipeCatalog::special_water_for(m62).unwrap().index(), 18);

        // Below the base there is no mapping.
        let m43 = MoleculeType::new(43).unwrap();
        assert!(RecipeCatalog::special_water_for(m43).is_none());
    }

    #[test]
    fn test_forward_and_reverse_agree() {
        let catalog = RecipeCatalog::new();

        for drug_index in 0..DrugType::COUNT {
            let drug = DrugType::new(drug_index).unwrap();
            for ingredient in drug.recipe() {
                assert!(
                    catalog.drugs_requiring(*ingredient).contains(&drug),
                    "reverse index misses drug {drug_index}"
                );
            }
        }
    }
}
