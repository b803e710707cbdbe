//! # Static Catalog
//!
//! The compiled-in description of the collectible set: 63 molecule types and
//! 19 drug types, each with a hard maximum supply, plus the 19 brewing
//! recipes and the display names.
//!
//! Nothing in this module is mutable at runtime. The ledger in `alembic_lab`
//! tracks *remaining* counts; this module is the authority on the ceilings.
//!
//! ## Recipe ordering
//!
//! Every recipe lists water (type 0) first and then its ingredients in
//! non-increasing order of maximum supply, so the final slot is always the
//! scarcest requirement. The substitution rule in the brewing engine leans
//! on that ordering: only the final slot may be satisfied by the drug's
//! reserved special water.

use core::fmt;

// =============================================================================
// DIMENSIONS
// =============================================================================

/// Number of distinct molecule types.
pub const MOLECULE_TYPE_COUNT: usize = 63;

/// Number of distinct drug types.
pub const DRUG_TYPE_COUNT: usize = 19;

/// Total mintable molecule units across all types.
pub const TOTAL_MOLECULE_SUPPLY: u32 = 5748;

/// Total mintable drug units across all types.
pub const TOTAL_DRUG_SUPPLY: u32 = 1134;

/// Molecule type index of plain water, the universal first ingredient.
pub const WATER_INDEX: u8 = 0;

/// A drug's reserved special water is molecule type `SPECIAL_WATER_BASE + drug`.
pub const SPECIAL_WATER_BASE: u8 = 44;

// =============================================================================
// MAXIMUM SUPPLIES
// =============================================================================

/// Maximum mintable units per molecule type. Sums to [`TOTAL_MOLECULE_SUPPLY`].
pub const MOLECULE_MAX_SUPPLIES: [u16; MOLECULE_TYPE_COUNT] = [
    1134, 250, 142, 121, 121, 120, 120, 120, 107, 97, 95, 95, 95, 95, 82, 50,
    36, 36, 36, 34, 34, 34, 32, 32, 32, 29, 29, 29, 29, 24, 24, 21, 20, 18,
    12, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 2, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1,
];

/// Maximum mintable units per drug type. Sums to [`TOTAL_DRUG_SUPPLY`].
pub const DRUG_MAX_SUPPLIES: [u16; DRUG_TYPE_COUNT] = [
    250, 18, 100, 21, 50, 20, 142, 50, 7, 24, 95, 120, 34, 2, 29, 12, 121,
    32, 7,
];

// =============================================================================
// NAMES
// =============================================================================

/// Display names per molecule type.
pub const MOLECULE_NAMES: [&str; MOLECULE_TYPE_COUNT] = [
    "Water",
    "Alcohol",
    "Methamphetamine",
    "Caffeine",
    "Theobromine",
    "Cathine",
    "Cathinone",
    "Methcathinone",
    "Cocaine",
    "CBD",
    "CBC",
    "CBG",
    "CBN",
    "THC",
    "Morphine",
    "Ketamine",
    "Atropine",
    "Hyoscyamine",
    "Scopolamine",
    "Lactucine",
    "Lactucopicrin",
    "Lactuside-A",
    "Codeine",
    "Noscapine",
    "Papaverine",
    "Baeocystin",
    "Norbaeocystin",
    "Psilocin",
    "Psilocybin",
    "Belladonnine",
    "Scopoletol",
    "GHB",
    "LSD",
    "Chloroquine",
    "Mandragorin",
    "Divinatorin-A",
    "Divinatorin-B",
    "DMT",
    "Harmol",
    "Nicotine",
    "Salvidivin-B",
    "Salvinicin-A",
    "Salvinorin-A",
    "Telepathine",
    "Tetrahydroharmine",
    "Acetylcholine",
    "Dopamine",
    "Dynorphin",
    "Enkephalin",
    "MDMA",
    "Oxytocin",
    "Phenethylamine",
    "Water (Ayahuasca)",
    "Water (Belladonna)",
    "Water (Cannabis)",
    "Water (Khat)",
    "Water (Lactuca Virosa)",
    "Water (Love Elixir)",
    "Water (Magic Truffle)",
    "Water (Mandrake)",
    "Water (Mate)",
    "Water (Opium)",
    "Water (Salvia Divinorum)",
];

/// Display names per drug type.
pub const DRUG_NAMES: [&str; DRUG_TYPE_COUNT] = [
    "Alcohol (Isolated)",
    "Chloroquine (Isolated)",
    "Cocaine (Isolated)",
    "GHB (Isolated)",
    "Ketamine (Isolated)",
    "LSD (Isolated)",
    "Methamphetamine (Isolated)",
    "Morphine (Isolated)",
    "Ayahuasca",
    "Belladonna",
    "Cannabis",
    "Khat",
    "Lactuca Virosa",
    "Love Elixir",
    "Magic Truffle",
    "Mandrake",
    "Mate",
    "Opium",
    "Salvia Divinorum",
];

// =============================================================================
// TYPE INDICES
// =============================================================================

/// Validated molecule type index in `0..63`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoleculeType(u8);

impl MoleculeType {
    /// Number of molecule types.
    pub const COUNT: u8 = MOLECULE_TYPE_COUNT as u8;

    /// Plain water, the first slot of every recipe.
    pub const WATER: Self = Self(WATER_INDEX);

    /// Validates a raw index. Returns `None` for `index >= 63`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The raw type index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Hard ceiling on mintable units of this type.
    #[inline]
    #[must_use]
    pub const fn max_supply(self) -> u16 {
        MOLECULE_MAX_SUPPLIES[self.0 as usize]
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        MOLECULE_NAMES[self.0 as usize]
    }
}

impl fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Validated drug type index in `0..19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DrugType(u8);

impl DrugType {
    /// Number of drug types.
    pub const COUNT: u8 = DRUG_TYPE_COUNT as u8;

    /// Validates a raw index. Returns `None` for `index >= 19`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The raw type index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Hard ceiling on mintable units of this type.
    #[inline]
    #[must_use]
    pub const fn max_supply(self) -> u16 {
        DRUG_MAX_SUPPLIES[self.0 as usize]
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        DRUG_NAMES[self.0 as usize]
    }

    /// The reserved special-water molecule for this drug.
    ///
    /// Always a valid molecule type: `44 + 18 == 62`, the final index.
    #[inline]
    #[must_use]
    pub const fn special_water(self) -> MoleculeType {
        MoleculeType(SPECIAL_WATER_BASE + self.0)
    }

    /// Required ingredient types, water first, scarcest last.
    #[must_use]
    pub const fn recipe(self) -> &'static [MoleculeType] {
        RECIPES[self.0 as usize]
    }
}

impl fmt::Display for DrugType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The two halves of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Base ingredient tokens.
    Molecule,
    /// Brewed tokens.
    Drug,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Molecule => write!(f, "molecule"),
            Self::Drug => write!(f, "drug"),
        }
    }
}

// =============================================================================
// RECIPES
// =============================================================================

/// Shorthand for building the recipe table below.
const fn m(index: u8) -> MoleculeType {
    MoleculeType(index)
}

/// Ingredient lists per drug type. Water first, scarcest ingredient last.
pub const RECIPES: [&[MoleculeType]; DRUG_TYPE_COUNT] = [
    // 0: Alcohol (Isolated)
    &[m(0), m(1)],
    // 1: Chloroquine (Isolated)
    &[m(0), m(33)],
    // 2: Cocaine (Isolated)
    &[m(0), m(8)],
    // 3: GHB (Isolated)
    &[m(0), m(31)],
    // 4: Ketamine (Isolated)
    &[m(0), m(15)],
    // 5: LSD (Isolated)
    &[m(0), m(32)],
    // 6: Methamphetamine (Isolated)
    &[m(0), m(2)],
    // 7: Morphine (Isolated)
    &[m(0), m(14)],
    // 8: Ayahuasca
    &[m(0), m(8), m(37), m(38), m(39), m(43), m(44)],
    // 9: Belladonna
    &[m(0), m(16), m(17), m(18), m(29), m(30)],
    // 10: Cannabis
    &[m(0), m(9), m(10), m(11), m(12), m(13)],
    // 11: Khat
    &[m(0), m(5), m(6), m(7)],
    // 12: Lactuca Virosa
    &[m(0), m(19), m(20), m(21)],
    // 13: Love Elixir
    &[m(0), m(9), m(45), m(46), m(47), m(48), m(49), m(50), m(51)],
    // 14: Magic Truffle
    &[m(0), m(25), m(26), m(27), m(28)],
    // 15: Mandrake
    &[m(0), m(16), m(17), m(18), m(34)],
    // 16: Mate
    &[m(0), m(3), m(4)],
    // 17: Opium
    &[m(0), m(14), m(22), m(23), m(24)],
    // 18: Salvia Divinorum
    &[m(0), m(35), m(36), m(40), m(41), m(42)],
];

/// Shortest recipe length (including the water slot).
pub const MIN_RECIPE_LEN: usize = 2;

/// Longest recipe length (including the water slot).
pub const MAX_RECIPE_LEN: usize = 9;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_tables_sum_to_totals() {
        let molecule_sum: u32 = MOLECULE_MAX_SUPPLIES.iter().map(|&s| u32::from(s)).sum();
        let drug_sum: u32 = DRUG_MAX_SUPPLIES.iter().map(|&s| u32::from(s)).sum();

        assert_eq!(molecule_sum, TOTAL_MOLECULE_SUPPLY);
        assert_eq!(drug_sum, TOTAL_DRUG_SUPPLY);
    }

    #[test]
    fn test_water_backs_the_whole_drug_supply() {
        // Every brew consumes one water, so water's ceiling equals the
        // total drug ceiling.
        assert_eq!(
            u32::from(MoleculeType::WATER.max_supply()),
            TOTAL_DRUG_SUPPLY
        );
    }

    #[test]
    fn test_type_index_validation() {
        assert!(MoleculeType::new(0).is_some());
        assert!(MoleculeType::new(62).is_some());
        assert!(MoleculeType::new(63).is_none());
        assert!(MoleculeType::new(255).is_none());

        assert!(DrugType::new(0).is_some());
        assert!(DrugType::new(18).is_some());
        assert!(DrugType::new(19).is_none());
    }

    #[test]
    fn test_every_recipe_starts_with_water() {
        for recipe in RECIPES {
            assert_eq!(recipe[0], MoleculeType::WATER);
        }
    }

    #[test]
    fn test_recipe_lengths_within_bounds() {
        for recipe in RECIPES {
            assert!(recipe.len() >= MIN_RECIPE_LEN);
            assert!(recipe.len() <= MAX_RECIPE_LEN);
        }
    }

    #[test]
    fn test_recipes_ordered_scarcest_last() {
        // Past the water slot, ingredient ceilings never increase, so the
        // final slot is always a scarcest ingredient.
        for recipe in RECIPES {
            let supplies: Vec<u16> = recipe[1..].iter().map(|t| t.max_supply()).collect();
            for pair in supplies.windows(2) {
                assert!(pair[0] >= pair[1], "recipe out of order: {supplies:?}");
            }
        }
    }

    #[test]
    fn test_special_waters_are_valid_and_distinct_from_own_recipe() {
        for index in 0..DrugType::COUNT {
            let drug = DrugType::new(index).unwrap();
            let special = drug.special_water();

            assert!(special.index() >= SPECIAL_WATER_BASE);
            assert!(special.index() < MoleculeType::COUNT);
            assert!(special.max_supply() >= 1);
            assert!(
                !drug.recipe().contains(&special),
                "drug {index} requires its own special water"
            );
        }
    }

    #[test]
    fn test_names_are_nonempty_and_unique() {
        for name in MOLECULE_NAMES.iter().chain(DRUG_NAMES.iter()) {
            assert!(!name.is_empty());
        }
        for (i, a) in MOLECULE_NAMES.iter().enumerate() {
            for b in MOLECULE_NAMES.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        for (i, a) in DRUG_NAMES.iter().enumerate() {
            for b in DRUG_NAMES.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_display_uses_catalog_names() {
        let thc = MoleculeType::new(13).unwrap();
        assert_eq!(thc.to_string(), "THC");

        let mate = DrugType::new(16).unwrap();
        assert_eq!(mate.to_string(), "Mate");

        assert_eq!(Category::Molecule.to_string(), "molecule");
        assert_eq!(Category::Drug.to_string(), "drug");
    }
}
