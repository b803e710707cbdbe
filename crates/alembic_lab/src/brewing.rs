//! # Brewing Engine
//!
//! Multiset matching of presented tokens against a drug's recipe.
//!
//! Assessment is tolerant: a presented token that fails to decode, or that
//! decodes to a drug, simply never matches a slot. The substitution rule is
//! narrow by design - a drug's reserved special water may stand in for the
//! scarcest (final) slot only, only when no ordinary match covers it, and
//! at most once per brew.
//!
//! [`assess`] is the pure read-only check behind the public possibility
//! query; [`select_burn_set`] turns a positive assessment into the exact
//! tokens to burn, one per slot, first match wins.

use alembic_core::catalog::{DrugType, MoleculeType};
use alembic_core::identity::{TokenHandle, TokenId, TokenKind};

/// The result of matching presented tokens against one recipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrewPossibility {
    /// Whether a brew would succeed with these tokens.
    pub can_brew: bool,
    /// The special-water token that would fill the scarcest slot, present
    /// only when that slot has no ordinary match and a substitute was
    /// offered.
    pub usable_special_water: Option<TokenId>,
    /// Presented tokens matching each recipe slot, in recipe order.
    pub requirement_matches: Vec<Vec<TokenId>>,
}

/// The exact burn plan extracted from a positive assessment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchedSet {
    /// One `(token, molecule type)` pair per recipe slot, in recipe order.
    /// The type is what actually burns, so a substituted final slot carries
    /// the special-water type rather than the nominal requirement.
    pub burns: Vec<(TokenId, MoleculeType)>,
    /// Whether the final slot was filled by special water.
    pub substituted: bool,
}

/// Matches presented tokens against the drug's recipe.
#[must_use]
pub fn assess(drug: DrugType, presented: &[TokenHandle]) -> BrewPossibility {
    let recipe = drug.recipe();
    let special = drug.special_water();

    let mut requirement_matches = vec![Vec::new(); recipe.len()];
    let mut special_candidate = None;

    for handle in presented {
        let Ok(identity) = handle.resolve() else {
            continue;
        };
        let TokenKind::Molecule(molecule) = identity.kind else {
            continue;
        };
        let id = handle.id();

        if molecule == special && special_candidate.is_none() {
            special_candidate = Some(id);
        }
        for (slot, &required) in recipe.iter().enumerate() {
            if required == molecule {
                requirement_matches[slot].push(id);
            }
        }
    }

    let final_slot_covered = requirement_matches
        .last()
        .is_some_and(|matches| !matches.is_empty());
    let usable_special_water = if final_slot_covered {
        None
    } else {
        special_candidate
    };

    let ordinary_slots_covered = requirement_matches
        .iter()
        .take(recipe.len().saturating_sub(1))
        .all(|matches| !matches.is_empty());
    let can_brew =
        ordinary_slots_covered && (final_slot_covered || usable_special_water.is_some());

    BrewPossibility {
        can_brew,
        usable_special_water,
        requirement_matches,
    }
}

/// Extracts the burn plan from an assessment: the first match of every
/// slot, with the final slot falling back to the usable special water.
/// Returns `None` exactly when the assessment says the brew cannot happen.
#[must_use]
pub fn select_burn_set(drug: DrugType, possibility: &BrewPossibility) -> Option<MatchedSet> {
    if !possibility.can_brew {
        return None;
    }

    let recipe = drug.recipe();
    let mut burns = Vec::with_capacity(recipe.len());
    let mut substituted = false;

    for (slot, &required) in recipe.iter().enumerate() {
        if let Some(&token) = possibility.requirement_matches.get(slot).and_then(|m| m.first()) {
            burns.push((token, required));
        } else if slot + 1 == recipe.len() {
            let token = possibility.usable_special_water?;
            burns.push((token, drug.special_water()));
            substituted = true;
        } else {
            return None;
        }
    }

    Some(MatchedSet { burns, substituted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alembic_core::attributes::{
        Appearance, Blob, Deformation, Integrity, Lighting, Palette, StripeAmount, StripeShift,
    };
    use alembic_core::identity::TokenIdentity;
    use alloy_primitives::U256;

    fn appearance() -> Appearance {
        Appearance {
            hue: 100,
            saturation: 200,
            brightness: 300,
            lighting: Lighting::Matte,
            integrity: Integrity::Pristine,
            deformation: Deformation::Intact,
            stripe_shift: StripeShift::Aligned,
            stripe_amount: StripeAmount::Sparse,
            blob: Blob::Fine,
            palette: Palette::Classic,
        }
    }

    fn molecule_token(index: u8, seed: u32) -> TokenHandle {
        let identity = TokenIdentity {
            kind: TokenKind::Molecule(MoleculeType::new(index).unwrap()),
            seed,
            appearance: appearance(),
        };
        TokenHandle::Raw(identity.encode())
    }

    fn drug_token(index: u8, seed: u32) -> TokenHandle {
        let identity = TokenIdentity {
            kind: TokenKind::Drug(DrugType::new(index).unwrap()),
            seed,
            appearance: appearance(),
        };
        TokenHandle::Raw(identity.encode())
    }

    fn exact_ingredients(drug: DrugType) -> Vec<TokenHandle> {
        drug.recipe()
            .iter()
            .enumerate()
            .map(|(slot, required)| molecule_token(required.index(), slot as u32))
            .collect()
    }

    #[test]
    fn test_exact_ingredients_satisfy_all_nineteen_recipes() {
        for index in 0..DrugType::COUNT {
            let drug = DrugType::new(index).unwrap();
            let presented = exact_ingredients(drug);

            let possibility = assess(drug, &presented);
            assert!(possibility.can_brew, "drug {index} should be brewable");
            assert_eq!(possibility.usable_special_water, None);

            let matched = select_burn_set(drug, &possibility).unwrap();
            assert_eq!(matched.burns.len(), drug.recipe().len());
            assert!(!matched.substituted);
        }
    }

    #[test]
    fn test_missing_any_ingredient_fails() {
        let drug = DrugType::new(10).unwrap(); // Cannabis, 6 slots

        for missing_slot in 0..drug.recipe().len() {
            let presented: Vec<TokenHandle> = exact_ingredients(drug)
                .into_iter()
                .enumerate()
                .filter(|(slot, _)| *slot != missing_slot)
                .map(|(_, handle)| handle)
                .collect();

            let possibility = assess(drug, &presented);
            assert!(!possibility.can_brew, "slot {missing_slot} was not required");
            assert!(select_burn_set(drug, &possibility).is_none());
        }
    }

    #[test]
    fn test_special_water_substitutes_the_final_slot_for_every_drug() {
        for index in 0..DrugType::COUNT {
            let drug = DrugType::new(index).unwrap();
            let slots = drug.recipe().len();

            // Everything except the scarcest ingredient, plus special water.
            let mut presented: Vec<TokenHandle> =
                exact_ingredients(drug).into_iter().take(slots - 1).collect();
            presented.push(molecule_token(drug.special_water().index(), 999));

            let possibility = assess(drug, &presented);
            assert!(possibility.can_brew, "substitution failed for drug {index}");
            assert!(possibility.usable_special_water.is_some());

            let matched = select_burn_set(drug, &possibility).unwrap();
            assert!(matched.substituted);
            assert_eq!(matched.burns.len(), slots);
            assert_eq!(matched.burns[slots - 1].1, drug.special_water());
        }
    }

    #[test]
    fn test_special_water_cannot_cover_a_non_final_slot() {
        let drug = DrugType::new(10).unwrap(); // Cannabis: 0, 9, 10, 11, 12, 13
        let slots = drug.recipe().len();

        // Drop a middle ingredient, offer special water instead.
        let mut presented: Vec<TokenHandle> = exact_ingredients(drug)
            .into_iter()
            .enumerate()
            .filter(|(slot, _)| *slot != 2)
            .map(|(_, handle)| handle)
            .collect();
        presented.push(molecule_token(drug.special_water().index(), 999));

        let possibility = assess(drug, &presented);
        assert!(!possibility.can_brew);
        // The final slot is ordinarily covered, so the substitute is idle.
        assert_eq!(possibility.usable_special_water, None);
        assert_eq!(possibility.requirement_matches.len(), slots);
    }

    #[test]
    fn test_at_most_one_substitution() {
        let drug = DrugType::new(16).unwrap(); // Mate: 0, 3, 4

        // Water plus two special waters cannot cover both missing slots.
        let presented = vec![
            molecule_token(0, 1),
            molecule_token(drug.special_water().index(), 2),
            molecule_token(drug.special_water().index(), 3),
        ];

        let possibility = assess(drug, &presented);
        assert!(!possibility.can_brew);
    }

    #[test]
    fn test_ordinary_match_wins_over_substitute() {
        let drug = DrugType::new(16).unwrap(); // Mate: 0, 3, 4

        let mut presented = exact_ingredients(drug);
        presented.push(molecule_token(drug.special_water().index(), 50));

        let possibility = assess(drug, &presented);
        assert!(possibility.can_brew);
        assert_eq!(possibility.usable_special_water, None);

        let matched = select_burn_set(drug, &possibility).unwrap();
        assert!(!matched.substituted);
        assert_eq!(matched.burns[2].1.index(), 4);
    }

    #[test]
    fn test_junk_and_drugs_never_match() {
        let drug = DrugType::new(0).unwrap(); // Alcohol (Isolated): 0, 1

        let presented = vec![
            TokenHandle::Raw(U256::MAX), // undecodable
            drug_token(5, 1),            // a drug, not an ingredient
            molecule_token(2, 2),        // wrong molecule type
        ];

        let possibility = assess(drug, &presented);
        assert!(!possibility.can_brew);
        assert!(possibility.requirement_matches.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_surplus_tokens_do_not_hurt() {
        let drug = DrugType::new(6).unwrap(); // Methamphetamine (Isolated): 0, 2

        let mut presented = exact_ingredients(drug);
        presented.push(molecule_token(40, 9));
        presented.push(molecule_token(2, 10)); // duplicate of a required type
        presented.push(TokenHandle::Raw(U256::MAX));

        let possibility = assess(drug, &presented);
        assert!(possibility.can_brew);

        // Burn plan still takes exactly one token per slot.
        let matched = select_burn_set(drug, &possibility).unwrap();
        assert_eq!(matched.burns.len(), 2);

        let mut burned: Vec<TokenId> = matched.burns.iter().map(|(id, _)| *id).collect();
        burned.sort_unstable();
        burned.dedup();
        assert_eq!(burned.len(), 2, "burn plan reused a token");
    }

    #[test]
    fn test_duplicate_matches_recorded_in_slot_order() {
        let drug = DrugType::new(7).unwrap(); // Morphine (Isolated): 0, 14

        let presented = vec![
            molecule_token(0, 1),
            molecule_token(14, 2),
            molecule_token(14, 3),
        ];

        let possibility = assess(drug, &presented);
        assert_eq!(possibility.requirement_matches[1].len(), 2);

        // First match wins.
        let matched = select_burn_set(drug, &possibility).unwrap();
        assert_eq!(matched.burns[1].0, molecule_token(14, 2).id());
    }
}
