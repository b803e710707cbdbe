//! # The Laboratory
//!
//! The single-writer engine object. It owns the supply ledger, the recipe
//! catalog view, the decomposition records, the seeded RNG and the event
//! buffer; ownership bookkeeping stays behind the [`TokenRegistry`] trait
//! and time always arrives as an explicit `now` argument.
//!
//! ## Operation pipeline
//!
//! ```text
//! caller -> validate inputs        (raw indices, identifiers, ownership)
//!        -> check preconditions    (supply, recipe match, state machine)
//!        -> commit                 (ledger debits, registry calls, events)
//! ```
//!
//! Every fallible check runs before the first mutation, so an error means
//! nothing changed. Commits end with a conservation debug assertion; the
//! ledger invariant holds at every return.

use alloy_primitives::{Address, U256};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use alembic_core::catalog::{Category, DrugType, MoleculeType};
use alembic_core::error::{LabError, LabResult};
use alembic_core::identity::{TokenHandle, TokenId, TokenIdentity, TokenKind};
use alembic_core::Timestamp;

use crate::brewing::{assess, select_burn_set, BrewPossibility};
use crate::catalog::RecipeCatalog;
use crate::collab::{PaymentValidator, TokenRegistry};
use crate::config::LabConfig;
use crate::decomposition::{Decomposer, DecompositionReceipt, DecompositionState};
use crate::events::LabEvent;
use crate::ledger::SupplyLedger;
use crate::purchase::plan_weighted_batch;

/// The accounting engine. One logical writer; see the service layer for the
/// thread-safe wrapper.
#[derive(Debug)]
pub struct Laboratory {
    ledger: SupplyLedger,
    catalog: RecipeCatalog,
    decomposer: Decomposer,
    rng: ChaCha8Rng,
    custodian: Address,
    events: Vec<LabEvent>,
}

impl Laboratory {
    /// A fresh engine: full supplies, empty decomposition table, RNG seeded
    /// from config. `custodian` is the account that holds drugs while they
    /// are locked for decomposition.
    #[must_use]
    pub fn new(config: &LabConfig, custodian: Address) -> Self {
        Self {
            ledger: SupplyLedger::new(),
            catalog: RecipeCatalog::new(),
            decomposer: Decomposer::new(config.decomposition_delay),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            custodian,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // PURCHASE
    // =========================================================================

    /// Mints `min(max_amount, available)` supply-weighted random molecules
    /// to `recipient` against an exact payment.
    ///
    /// Payment covers the count actually minted, not the count requested:
    /// when the pool is nearly drained a caller asking for more than
    /// remains pays only for the remainder.
    ///
    /// # Errors
    ///
    /// [`LabError::CannotFulfillRequest`] when fewer than `min_amount`
    /// units are mintable, [`LabError::IncorrectPayment`] when `payment`
    /// differs from the price of the actual count.
    pub fn purchase<R, P>(
        &mut self,
        registry: &mut R,
        pricing: &P,
        recipient: Address,
        max_amount: u32,
        min_amount: u32,
        payment: U256,
    ) -> LabResult<Vec<TokenId>>
    where
        R: TokenRegistry + ?Sized,
        P: PaymentValidator + ?Sized,
    {
        let mintable = max_amount.min(self.ledger.molecules_available());
        if mintable < min_amount {
            return Err(LabError::CannotFulfillRequest {
                minimum: min_amount,
                mintable,
            });
        }

        let required = pricing.required_payment(mintable);
        if payment != required {
            return Err(LabError::IncorrectPayment {
                provided: payment,
                required,
            });
        }

        let plan = plan_weighted_batch(&mut self.ledger, &mut self.rng, mintable)?;
        let minted = self.mint_molecules(registry, recipient, &plan);

        debug_assert!(self.ledger.is_conserved());
        tracing::info!("purchase minted {} molecules for {}", minted.len(), recipient);
        Ok(minted)
    }

    // =========================================================================
    // BREWING
    // =========================================================================

    /// Read-only matching of presented tokens against a drug's recipe.
    ///
    /// Tolerant of junk: tokens that fail to decode or decode to drugs
    /// simply never match.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidDrugType`] for an out-of-range drug index.
    pub fn brew_possibility(
        &self,
        drug: u8,
        tokens: &[TokenHandle],
    ) -> LabResult<BrewPossibility> {
        let drug = RecipeCatalog::validate_drug(drug)?;
        Ok(assess(drug, tokens))
    }

    /// Burns one matched ingredient per recipe slot and mints the drug to
    /// `recipient`.
    ///
    /// Unlike the possibility check this path is strict: every presented
    /// token must decode to a molecule controlled by `caller`, whether the
    /// match uses it or not.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidDrugType`] for an out-of-range index,
    /// [`LabError::InvalidIdentifier`] for an undecodable token,
    /// [`LabError::InvalidMolecule`] for drugs or uncontrolled tokens,
    /// [`LabError::SupplyExhausted`] when the drug type is drained,
    /// [`LabError::RecipeNotSatisfied`] when the match fails.
    pub fn brew<R>(
        &mut self,
        registry: &mut R,
        caller: Address,
        tokens: &[TokenHandle],
        drug: u8,
        recipient: Address,
    ) -> LabResult<TokenId>
    where
        R: TokenRegistry + ?Sized,
    {
        let drug_raw = drug;
        let drug = RecipeCatalog::validate_drug(drug_raw)?;

        for handle in tokens {
            let identity = handle.resolve()?;
            let id = handle.id();

            if !identity.is_molecule() {
                return Err(LabError::InvalidMolecule(format!(
                    "token {id} is a drug, not an ingredient"
                )));
            }
            if !registry.is_approved_or_owner(caller, id) {
                return Err(LabError::InvalidMolecule(format!(
                    "token {id} is not controlled by {caller}"
                )));
            }
        }

        if self.ledger.drug_availability(drug) == 0 {
            return Err(LabError::SupplyExhausted {
                category: Category::Drug,
                type_index: drug.index(),
            });
        }

        let possibility = assess(drug, tokens);
        let Some(matched) = select_burn_set(drug, &possibility) else {
            return Err(LabError::RecipeNotSatisfied { drug: drug_raw });
        };

        // Commit. The decrement is the first mutation; everything after it
        // is infallible.
        self.ledger.try_decrement_drug(drug)?;

        for (token, _) in &matched.burns {
            registry.burn_token(*token);
        }

        let identity = TokenIdentity::sample(TokenKind::Drug(drug), &mut self.rng);
        let brewed = identity.encode();
        registry.create_token(recipient, brewed);

        let consumed_types: Vec<MoleculeType> = matched.burns.iter().map(|(_, t)| *t).collect();
        let consumed_ids: Vec<TokenId> = matched.burns.iter().map(|(id, _)| *id).collect();
        self.decomposer
            .record_brew(brewed, drug, consumed_types, matched.substituted);

        self.events.push(LabEvent::DrugBrewed {
            token: brewed,
            drug,
            owner: recipient,
            consumed: consumed_ids,
            substituted: matched.substituted,
        });

        debug_assert!(self.ledger.is_conserved());
        tracing::info!("brewed {} for {}", drug, recipient);
        Ok(brewed)
    }

    // =========================================================================
    // DECOMPOSITION
    // =========================================================================

    /// Locks a drug for decomposition and moves it to the custodian.
    /// Returns the maturity time.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidIdentifier`] for an undecodable token,
    /// [`LabError::NotDrug`] for molecules, [`LabError::NotOwner`] when
    /// `caller` does not control the token, [`LabError::UnknownInstance`]
    /// when no brew record exists, [`LabError::AlreadyLocked`] on a second
    /// schedule.
    pub fn schedule_decomposition<R>(
        &mut self,
        registry: &mut R,
        caller: Address,
        token: TokenHandle,
        now: Timestamp,
    ) -> LabResult<Timestamp>
    where
        R: TokenRegistry + ?Sized,
    {
        let identity = token.resolve()?;
        let id = token.id();

        if !identity.is_drug() {
            return Err(LabError::NotDrug(id));
        }
        if !registry.is_approved_or_owner(caller, id) {
            return Err(LabError::NotOwner { token: id, caller });
        }

        let matures_at = self.decomposer.schedule(id, now)?;

        // The holder keeps no transfer rights while the token is locked.
        registry.transfer_custody(id, self.custodian);

        self.events.push(LabEvent::DecompositionScheduled {
            token: id,
            matures_at,
        });
        tracing::info!("decomposition of {} locked until {}", id, matures_at);
        Ok(matures_at)
    }

    /// Destroys a matured drug and credits its recorded ingredients back to
    /// pool availability.
    ///
    /// The credit replenishes *availability*; the burned ingredient tokens
    /// themselves are never resurrected, and the drug's own supply stays
    /// spent.
    ///
    /// # Errors
    ///
    /// [`LabError::UnknownInstance`] when no locked record exists,
    /// [`LabError::NotMatured`] before the maturity time.
    pub fn finalize_decomposition<R>(
        &mut self,
        registry: &mut R,
        token: TokenHandle,
        now: Timestamp,
    ) -> LabResult<DecompositionReceipt>
    where
        R: TokenRegistry + ?Sized,
    {
        let id = token.id();
        let instance = self.decomposer.finalize(id, now)?;

        registry.burn_token(id);
        for molecule in &instance.consumed {
            self.ledger.credit_molecule(*molecule, 1);
        }

        self.events.push(LabEvent::DecompositionFinalized {
            token: id,
            drug: instance.drug,
            credited: instance.consumed.clone(),
        });

        debug_assert!(self.ledger.is_conserved());
        tracing::info!(
            "decomposition of {} credited {} molecules",
            id,
            instance.consumed.len()
        );

        Ok(DecompositionReceipt {
            token: id,
            drug: instance.drug,
            credited: instance.consumed,
        })
    }

    // =========================================================================
    // GRANTS
    // =========================================================================

    /// Mints plain water to each recipient, no payment. All-or-nothing
    /// across the whole batch.
    ///
    /// # Errors
    ///
    /// [`LabError::SupplyExhausted`] when water cannot cover the batch.
    pub fn give_waters<R>(
        &mut self,
        registry: &mut R,
        grants: &[(Address, u16)],
    ) -> LabResult<Vec<TokenId>>
    where
        R: TokenRegistry + ?Sized,
    {
        let total: u32 = grants.iter().map(|(_, count)| u32::from(*count)).sum();
        if total > u32::from(self.ledger.molecule_availability(MoleculeType::WATER)) {
            return Err(LabError::SupplyExhausted {
                category: Category::Molecule,
                type_index: MoleculeType::WATER.index(),
            });
        }

        let checkpoint = self.ledger.snapshot();
        for (_, count) in grants {
            if let Err(error) = self.ledger.try_decrement_molecule(MoleculeType::WATER, *count) {
                self.ledger.restore(&checkpoint);
                return Err(error);
            }
        }

        let mut minted = Vec::with_capacity(total as usize);
        for (recipient, count) in grants {
            let plan = vec![MoleculeType::WATER; usize::from(*count)];
            minted.extend(self.mint_molecules(registry, *recipient, &plan));
        }

        debug_assert!(self.ledger.is_conserved());
        tracing::info!("granted {} waters across {} recipients", total, grants.len());
        Ok(minted)
    }

    /// Mints supply-weighted random molecules to each recipient, no
    /// payment. All-or-nothing across the whole batch.
    ///
    /// # Errors
    ///
    /// [`LabError::CannotFulfillRequest`] when the pool cannot cover the
    /// batch.
    pub fn give_molecules<R>(
        &mut self,
        registry: &mut R,
        grants: &[(Address, u32)],
    ) -> LabResult<Vec<TokenId>>
    where
        R: TokenRegistry + ?Sized,
    {
        let total = grants
            .iter()
            .fold(0u32, |acc, (_, count)| acc.saturating_add(*count));
        let available = self.ledger.molecules_available();
        if total > available {
            return Err(LabError::CannotFulfillRequest {
                minimum: total,
                mintable: available,
            });
        }

        let checkpoint = self.ledger.snapshot();
        let mut plans = Vec::with_capacity(grants.len());
        for (recipient, count) in grants {
            match plan_weighted_batch(&mut self.ledger, &mut self.rng, *count) {
                Ok(plan) => plans.push((*recipient, plan)),
                Err(error) => {
                    self.ledger.restore(&checkpoint);
                    return Err(error);
                }
            }
        }

        let mut minted = Vec::with_capacity(total as usize);
        for (recipient, plan) in plans {
            minted.extend(self.mint_molecules(registry, recipient, &plan));
        }

        debug_assert!(self.ledger.is_conserved());
        tracing::info!(
            "granted {} random molecules across {} recipients",
            total,
            grants.len()
        );
        Ok(minted)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Total molecule units still mintable.
    #[must_use]
    pub fn molecules_available(&self) -> u32 {
        self.ledger.molecules_available()
    }

    /// Total drug units still mintable.
    #[must_use]
    pub fn drugs_available(&self) -> u32 {
        self.ledger.drugs_available()
    }

    /// Remaining units of one molecule type.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidMolecule`] for `molecule >= 63`.
    pub fn molecule_availability(&self, molecule: u8) -> LabResult<u16> {
        let molecule = RecipeCatalog::validate_molecule(molecule)?;
        Ok(self.ledger.molecule_availability(molecule))
    }

    /// Remaining units of one drug type.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidDrugType`] for `drug >= 19`.
    pub fn drug_availability(&self, drug: u8) -> LabResult<u16> {
        let drug = RecipeCatalog::validate_drug(drug)?;
        Ok(self.ledger.drug_availability(drug))
    }

    /// The whole ledger, for reconciliation and tests.
    #[must_use]
    pub fn ledger(&self) -> &SupplyLedger {
        &self.ledger
    }

    /// A drug's required ingredient types, water first, scarcest last.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidDrugType`] for `drug >= 19`.
    pub fn recipe(&self, drug: u8) -> LabResult<&'static [MoleculeType]> {
        Ok(RecipeCatalog::validate_drug(drug)?.recipe())
    }

    /// A drug's reserved special-water molecule type.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidDrugType`] for `drug >= 19`.
    pub fn special_water(&self, drug: u8) -> LabResult<MoleculeType> {
        Ok(RecipeCatalog::validate_drug(drug)?.special_water())
    }

    /// Every drug whose recipe requires the given molecule type.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidMolecule`] for `molecule >= 63`.
    pub fn drugs_requiring(&self, molecule: u8) -> LabResult<&[DrugType]> {
        let molecule = RecipeCatalog::validate_molecule(molecule)?;
        Ok(self.catalog.drugs_requiring(molecule))
    }

    /// Decomposition state of a drug token, `None` when no record exists.
    #[must_use]
    pub fn decomposition_state(&self, token: TokenHandle) -> Option<DecompositionState> {
        self.decomposer.state_of(token.id())
    }

    /// The configured decomposition delay in seconds.
    #[must_use]
    pub fn decomposition_delay(&self) -> Timestamp {
        self.decomposer.delay()
    }

    /// The account holding drugs locked for decomposition.
    #[must_use]
    pub const fn custodian(&self) -> Address {
        self.custodian
    }

    /// Removes and returns every buffered event in emission order.
    pub fn drain_events(&mut self) -> Vec<LabEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Mints one token per planned type. Ledger debits already happened;
    /// this step is infallible.
    fn mint_molecules<R>(
        &mut self,
        registry: &mut R,
        recipient: Address,
        plan: &[MoleculeType],
    ) -> Vec<TokenId>
    where
        R: TokenRegistry + ?Sized,
    {
        let mut minted = Vec::with_capacity(plan.len());

        for &molecule in plan {
            let identity = TokenIdentity::sample(TokenKind::Molecule(molecule), &mut self.rng);
            let id = identity.encode();

            registry.create_token(recipient, id);
            self.events.push(LabEvent::MoleculeMinted {
                token: id,
                molecule,
                owner: recipient,
            });
            minted.push(id);
        }

        minted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{FlatPrice, MemoryRegistry};

    const PRICE: u64 = 200;

    fn setup() -> (Laboratory, MemoryRegistry, FlatPrice) {
        let config = LabConfig {
            price_per_token: u128::from(PRICE),
            decomposition_delay: 1_000,
            rng_seed: 1134,
        };
        let lab = Laboratory::new(&config, Address::repeat_byte(0xCC));
        (lab, MemoryRegistry::new(), FlatPrice::new(U256::from(PRICE)))
    }

    fn pay(count: u32) -> U256 {
        U256::from(count) * U256::from(PRICE)
    }

    fn buyer() -> Address {
        Address::repeat_byte(0xB1)
    }

    #[test]
    fn test_purchase_mints_and_registers() {
        let (mut lab, mut registry, pricing) = setup();

        let minted = lab
            .purchase(&mut registry, &pricing, buyer(), 10, 1, pay(10))
            .unwrap();

        assert_eq!(minted.len(), 10);
        assert_eq!(registry.token_count(), 10);
        assert_eq!(lab.molecules_available(), 5748 - 10);
        for id in &minted {
            assert_eq!(registry.owner_of(*id), Some(buyer()));
            assert!(TokenIdentity::decode(*id).unwrap().is_molecule());
        }

        let events = lab.drain_events();
        assert_eq!(events.len(), 10);
        assert!(events
            .iter()
            .all(|event| matches!(event, LabEvent::MoleculeMinted { owner, .. } if *owner == buyer())));
        // Drained means drained.
        assert!(lab.drain_events().is_empty());
    }

    #[test]
    fn test_purchase_rejects_wrong_payment() {
        let (mut lab, mut registry, pricing) = setup();

        let error = lab
            .purchase(&mut registry, &pricing, buyer(), 5, 1, pay(4))
            .unwrap_err();

        assert_eq!(
            error,
            LabError::IncorrectPayment {
                provided: pay(4),
                required: pay(5),
            }
        );
        assert_eq!(lab.molecules_available(), 5748);
        assert_eq!(registry.token_count(), 0);
    }

    #[test]
    fn test_purchase_below_minimum_fails() {
        let (mut lab, mut registry, pricing) = setup();

        let error = lab
            .purchase(&mut registry, &pricing, buyer(), 3, 4, pay(3))
            .unwrap_err();

        assert_eq!(
            error,
            LabError::CannotFulfillRequest {
                minimum: 4,
                mintable: 3,
            }
        );
    }

    #[test]
    fn test_purchase_of_zero_is_a_paid_nothing() {
        let (mut lab, mut registry, pricing) = setup();

        let minted = lab
            .purchase(&mut registry, &pricing, buyer(), 0, 0, U256::ZERO)
            .unwrap();

        assert!(minted.is_empty());
        assert_eq!(lab.molecules_available(), 5748);
    }

    fn stock_ingredients(
        lab: &mut Laboratory,
        registry: &mut MemoryRegistry,
        owner: Address,
        drug: u8,
    ) -> Vec<TokenHandle> {
        let recipe = lab.recipe(drug).unwrap();
        let plan: Vec<MoleculeType> = recipe.to_vec();
        lab.mint_molecules(registry, owner, &plan)
            .into_iter()
            .map(TokenHandle::Raw)
            .collect()
    }

    #[test]
    fn test_brew_burns_ingredients_and_mints_drug() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();
        // Direct mint bypasses the ledger; debit it to keep conservation
        // observable in the assertions below.
        let handles = stock_ingredients(&mut lab, &mut registry, alice, 16);
        for handle in &handles {
            let identity = handle.resolve().unwrap();
            if let TokenKind::Molecule(m) = identity.kind {
                lab.ledger.try_decrement_molecule(m, 1).unwrap();
            }
        }
        lab.drain_events();

        let drugs_before = lab.drug_availability(16).unwrap();
        let brewed = lab.brew(&mut registry, alice, &handles, 16, alice).unwrap();

        // Ingredients burned, drug minted.
        assert_eq!(registry.token_count(), 1);
        assert_eq!(registry.owner_of(brewed), Some(alice));
        assert_eq!(lab.drug_availability(16).unwrap(), drugs_before - 1);
        assert!(TokenIdentity::decode(brewed).unwrap().is_drug());
        assert!(lab.ledger().is_conserved());

        // A brew record exists, not yet scheduled.
        assert_eq!(
            lab.decomposition_state(TokenHandle::Raw(brewed)),
            Some(DecompositionState::NotStarted)
        );

        let events = lab.drain_events();
        assert!(matches!(
            events.as_slice(),
            [LabEvent::DrugBrewed { token, substituted: false, .. }] if *token == brewed
        ));
    }

    #[test]
    fn test_brew_rejects_foreign_and_junk_tokens() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();
        let mallory = Address::repeat_byte(0xEE);

        let handles = stock_ingredients(&mut lab, &mut registry, alice, 0);

        // Not the controller.
        let error = lab
            .brew(&mut registry, mallory, &handles, 0, mallory)
            .unwrap_err();
        assert!(matches!(error, LabError::InvalidMolecule(_)));

        // Undecodable identifier is a validation failure in the strict path.
        let mut with_junk = handles.clone();
        with_junk.push(TokenHandle::Raw(U256::MAX));
        let error = lab.brew(&mut registry, alice, &with_junk, 0, alice).unwrap_err();
        assert!(matches!(error, LabError::InvalidIdentifier(_)));

        // Out-of-range drug index.
        let error = lab.brew(&mut registry, alice, &handles, 19, alice).unwrap_err();
        assert_eq!(error, LabError::InvalidDrugType { requested: 19 });

        // Nothing was mutated along the way.
        assert_eq!(registry.token_count(), handles.len());
        assert!(lab.drain_events().is_empty());
    }

    #[test]
    fn test_brew_rejects_drug_ingredients() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();

        let handles = stock_ingredients(&mut lab, &mut registry, alice, 16);
        let brewed = lab.brew(&mut registry, alice, &handles, 16, alice).unwrap();

        let error = lab
            .brew(
                &mut registry,
                alice,
                &[TokenHandle::Raw(brewed)],
                16,
                alice,
            )
            .unwrap_err();
        assert!(matches!(error, LabError::InvalidMolecule(_)));
    }

    #[test]
    fn test_brew_unsatisfied_recipe() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();

        // Water alone does not brew Mate.
        let water = lab.mint_molecules(&mut registry, alice, &[MoleculeType::WATER]);
        let handles = vec![TokenHandle::Raw(water[0])];

        let error = lab.brew(&mut registry, alice, &handles, 16, alice).unwrap_err();
        assert_eq!(error, LabError::RecipeNotSatisfied { drug: 16 });
        assert_eq!(registry.token_count(), 1);
    }

    #[test]
    fn test_schedule_and_finalize_full_path() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();

        let handles = stock_ingredients(&mut lab, &mut registry, alice, 16);
        for handle in &handles {
            if let TokenKind::Molecule(m) = handle.resolve().unwrap().kind {
                lab.ledger.try_decrement_molecule(m, 1).unwrap();
            }
        }
        let brewed = lab.brew(&mut registry, alice, &handles, 16, alice).unwrap();
        let molecules_before = lab.molecules_available();
        lab.drain_events();

        // Schedule: custody moves to the custodian, maturity respects the
        // configured delay.
        let matures_at = lab
            .schedule_decomposition(&mut registry, alice, TokenHandle::Raw(brewed), 500)
            .unwrap();
        assert_eq!(matures_at, 1_500);
        assert_eq!(registry.owner_of(brewed), Some(lab.custodian()));

        // Too early.
        let error = lab
            .finalize_decomposition(&mut registry, TokenHandle::Raw(brewed), 1_499)
            .unwrap_err();
        assert!(matches!(error, LabError::NotMatured { .. }));

        // Matured: burned, credited, record gone.
        let receipt = lab
            .finalize_decomposition(&mut registry, TokenHandle::Raw(brewed), 1_500)
            .unwrap();
        assert_eq!(receipt.token, brewed);
        assert_eq!(receipt.credited.len(), 3);
        assert_eq!(registry.owner_of(brewed), None);
        assert_eq!(lab.molecules_available(), molecules_before + 3);
        assert_eq!(lab.decomposition_state(TokenHandle::Raw(brewed)), None);
        assert!(lab.ledger().is_conserved());

        let events = lab.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], LabEvent::DecompositionScheduled { .. }));
        assert!(matches!(events[1], LabEvent::DecompositionFinalized { .. }));
    }

    #[test]
    fn test_schedule_rejections() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();
        let mallory = Address::repeat_byte(0xEE);

        let handles = stock_ingredients(&mut lab, &mut registry, alice, 16);
        let molecule_id = handles[0].id();
        let brewed = lab.brew(&mut registry, alice, &handles, 16, alice).unwrap();

        // Molecules do not decompose.
        let error = lab
            .schedule_decomposition(&mut registry, alice, TokenHandle::Raw(molecule_id), 0)
            .unwrap_err();
        assert_eq!(error, LabError::NotDrug(molecule_id));

        // Only the controller may schedule.
        let error = lab
            .schedule_decomposition(&mut registry, mallory, TokenHandle::Raw(brewed), 0)
            .unwrap_err();
        assert_eq!(
            error,
            LabError::NotOwner {
                token: brewed,
                caller: mallory,
            }
        );

        // Second schedule is refused.
        lab.schedule_decomposition(&mut registry, alice, TokenHandle::Raw(brewed), 0)
            .unwrap();
        let error = lab
            .schedule_decomposition(&mut registry, lab.custodian(), TokenHandle::Raw(brewed), 1)
            .unwrap_err();
        assert_eq!(error, LabError::AlreadyLocked(brewed));
    }

    #[test]
    fn test_finalize_unknown_token() {
        let (mut lab, mut registry, _) = setup();

        let stranger = U256::from(9_999u32);
        let error = lab
            .finalize_decomposition(&mut registry, TokenHandle::Raw(stranger), u64::MAX)
            .unwrap_err();
        assert_eq!(error, LabError::UnknownInstance(stranger));
    }

    #[test]
    fn test_give_waters_batch() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();
        let bob = Address::repeat_byte(0xB2);

        let minted = lab
            .give_waters(&mut registry, &[(alice, 3), (bob, 2)])
            .unwrap();

        assert_eq!(minted.len(), 5);
        assert_eq!(registry.tokens_of(alice).len(), 3);
        assert_eq!(registry.tokens_of(bob).len(), 2);
        assert_eq!(lab.molecule_availability(0).unwrap(), 1134 - 5);
        for id in &minted {
            let identity = TokenIdentity::decode(*id).unwrap();
            assert_eq!(identity.kind, TokenKind::Molecule(MoleculeType::WATER));
        }
        assert!(lab.ledger().is_conserved());
    }

    #[test]
    fn test_give_molecules_batch_respects_pool() {
        let (mut lab, mut registry, _) = setup();
        let alice = buyer();

        let minted = lab.give_molecules(&mut registry, &[(alice, 25)]).unwrap();
        assert_eq!(minted.len(), 25);
        assert_eq!(lab.molecules_available(), 5748 - 25);

        // A batch the pool cannot cover fails whole.
        let error = lab
            .give_molecules(&mut registry, &[(alice, 5_000), (alice, 1_000)])
            .unwrap_err();
        assert_eq!(
            error,
            LabError::CannotFulfillRequest {
                minimum: 6_000,
                mintable: 5_723,
            }
        );
        assert_eq!(lab.molecules_available(), 5_723);
        assert!(lab.ledger().is_conserved());
    }

    #[test]
    fn test_availability_queries_validate_indices() {
        let (lab, _, _) = setup();

        assert_eq!(lab.molecule_availability(0).unwrap(), 1134);
        assert!(matches!(
            lab.molecule_availability(63),
            Err(LabError::InvalidMolecule(_))
        ));

        assert_eq!(lab.drug_availability(0).unwrap(), 250);
        assert!(matches!(
            lab.drug_availability(19),
            Err(LabError::InvalidDrugType { .. })
        ));

        assert_eq!(lab.recipe(16).unwrap().len(), 3);
        assert_eq!(lab.special_water(18).unwrap().index(), 62);
        assert_eq!(lab.drugs_requiring(0).unwrap().len(), 19);
    }
}
