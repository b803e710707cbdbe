//! # External Collaborators
//!
//! The engine owns counting and matching; everything else is delegated
//! through the traits here. Ownership and transfer live in a
//! [`TokenRegistry`], pricing in a [`PaymentValidator`], administrative
//! flags in an [`AdminGate`], and wall time in a [`Clock`]. None of these
//! traits are implemented by engine logic itself.
//!
//! Reference implementations ship alongside for tests, benchmarks and the
//! simulation binary. Production integrations substitute their own.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, U256};

use alembic_core::identity::TokenId;
use alembic_core::Timestamp;

// =============================================================================
// TRAITS
// =============================================================================

/// The external non-fungible ownership ledger.
///
/// Contract: the engine calls [`TokenRegistry::create_token`] only with
/// identifiers it has never minted before, and [`TokenRegistry::burn_token`]
/// / [`TokenRegistry::transfer_custody`] only for identifiers it has just
/// verified to exist. Implementations may therefore treat violations as
/// programming errors rather than recoverable conditions.
pub trait TokenRegistry {
    /// Records a freshly minted token under `to`.
    fn create_token(&mut self, to: Address, id: TokenId);

    /// Destroys a token. It can never be owned again.
    fn burn_token(&mut self, id: TokenId);

    /// Moves a token to `to`, clearing any operator approval.
    fn transfer_custody(&mut self, id: TokenId, to: Address);

    /// Current holder, if the token exists.
    fn owner_of(&self, id: TokenId) -> Option<Address>;

    /// Whether `operator` holds or is approved for the token. `false` for
    /// unknown tokens.
    fn is_approved_or_owner(&self, operator: Address, id: TokenId) -> bool;
}

/// Prices a purchase batch.
pub trait PaymentValidator {
    /// The exact payment owed for `count` freshly minted molecules.
    fn required_payment(&self, count: u32) -> U256;
}

/// Administrative flags, evaluated outside the engine.
pub trait AdminGate {
    /// Whether purchase and brew are open for business.
    fn brewing_enabled(&self) -> bool;

    /// Whether `caller` may use the promotional grant paths.
    fn caller_authorized(&self, caller: Address) -> bool;
}

/// Source of the current time for the decomposition schedule.
pub trait Clock {
    /// Seconds since the epoch the deployment agreed on.
    fn now(&self) -> Timestamp;
}

// =============================================================================
// REFERENCE IMPLEMENTATIONS
// =============================================================================

/// In-memory [`TokenRegistry`] with per-token operator approvals.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    owners: HashMap<TokenId, Address>,
    approvals: HashMap<TokenId, Address>,
}

impl MemoryRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Approves `operator` for a single token.
    pub fn approve(&mut self, operator: Address, id: TokenId) {
        if self.owners.contains_key(&id) {
            self.approvals.insert(id, operator);
        }
    }

    /// Number of live tokens.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.owners.len()
    }

    /// All live tokens held by `owner`.
    #[must_use]
    pub fn tokens_of(&self, owner: Address) -> Vec<TokenId> {
        let mut tokens: Vec<TokenId> = self
            .owners
            .iter()
            .filter(|(_, holder)| **holder == owner)
            .map(|(id, _)| *id)
            .collect();
        tokens.sort_unstable();
        tokens
    }
}

impl TokenRegistry for MemoryRegistry {
    fn create_token(&mut self, to: Address, id: TokenId) {
        let previous = self.owners.insert(id, to);
        debug_assert!(previous.is_none(), "duplicate token identifier minted");
    }

    fn burn_token(&mut self, id: TokenId) {
        self.owners.remove(&id);
        self.approvals.remove(&id);
    }

    fn transfer_custody(&mut self, id: TokenId, to: Address) {
        if let Some(holder) = self.owners.get_mut(&id) {
            *holder = to;
        }
        self.approvals.remove(&id);
    }

    fn owner_of(&self, id: TokenId) -> Option<Address> {
        self.owners.get(&id).copied()
    }

    fn is_approved_or_owner(&self, operator: Address, id: TokenId) -> bool {
        match self.owners.get(&id) {
            Some(holder) => *holder == operator || self.approvals.get(&id) == Some(&operator),
            None => false,
        }
    }
}

/// Flat per-token pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatPrice {
    price_per_token: U256,
}

impl FlatPrice {
    /// A validator charging `price_per_token` per minted molecule.
    #[must_use]
    pub const fn new(price_per_token: U256) -> Self {
        Self { price_per_token }
    }

    /// The configured unit price.
    #[must_use]
    pub const fn unit_price(&self) -> U256 {
        self.price_per_token
    }
}

impl PaymentValidator for FlatPrice {
    fn required_payment(&self, count: u32) -> U256 {
        self.price_per_token
            .checked_mul(U256::from(count))
            .unwrap_or(U256::MAX)
    }
}

/// Fixed [`AdminGate`] with an explicit allow list.
#[derive(Debug, Clone, Default)]
pub struct StaticGate {
    /// Master switch for purchase and brew.
    pub brewing_enabled: bool,
    /// Accounts allowed to use the grant paths.
    pub authorized: Vec<Address>,
}

impl AdminGate for StaticGate {
    fn brewing_enabled(&self) -> bool {
        self.brewing_enabled
    }

    fn caller_authorized(&self, caller: Address) -> bool {
        self.authorized.contains(&caller)
    }
}

/// Wall-clock [`Clock`] in whole seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    }
}

/// Manually advanced [`Clock`] for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    /// A clock starting at `start`.
    #[must_use]
    pub const fn new(start: Timestamp) -> Self {
        Self(AtomicU64::new(start))
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Jumps the clock to an absolute time.
    pub fn set(&self, now: Timestamp) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_memory_registry_ownership_and_approval() {
        let mut registry = MemoryRegistry::new();
        let alice = account(0xA1);
        let bob = account(0xB2);
        let id = U256::from(1234u32);

        registry.create_token(alice, id);
        assert_eq!(registry.owner_of(id), Some(alice));
        assert!(registry.is_approved_or_owner(alice, id));
        assert!(!registry.is_approved_or_owner(bob, id));

        registry.approve(bob, id);
        assert!(registry.is_approved_or_owner(bob, id));

        // Transfer clears the approval.
        registry.transfer_custody(id, bob);
        assert_eq!(registry.owner_of(id), Some(bob));
        assert!(!registry.is_approved_or_owner(alice, id));

        registry.burn_token(id);
        assert_eq!(registry.owner_of(id), None);
        assert!(!registry.is_approved_or_owner(bob, id));
    }

    #[test]
    fn test_tokens_of_lists_only_the_holder() {
        let mut registry = MemoryRegistry::new();
        let alice = account(0xA1);
        let bob = account(0xB2);

        registry.create_token(alice, U256::from(1u8));
        registry.create_token(bob, U256::from(2u8));
        registry.create_token(alice, U256::from(3u8));

        assert_eq!(
            registry.tokens_of(alice),
            vec![U256::from(1u8), U256::from(3u8)]
        );
        assert_eq!(registry.token_count(), 3);
    }

    #[test]
    fn test_flat_price_scales_with_count() {
        let pricing = FlatPrice::new(U256::from(200u32));

        assert_eq!(pricing.required_payment(0), U256::ZERO);
        assert_eq!(pricing.required_payment(1), U256::from(200u32));
        assert_eq!(pricing.required_payment(120), U256::from(24_000u32));
    }

    #[test]
    fn test_flat_price_saturates_instead_of_wrapping() {
        let pricing = FlatPrice::new(U256::MAX);
        assert_eq!(pricing.required_payment(2), U256::MAX);
    }

    #[test]
    fn test_static_gate() {
        let gate = StaticGate {
            brewing_enabled: true,
            authorized: vec![account(0xA1)],
        };

        assert!(gate.brewing_enabled());
        assert!(gate.caller_authorized(account(0xA1)));
        assert!(!gate.caller_authorized(account(0xB2)));

        let closed = StaticGate::default();
        assert!(!closed.brewing_enabled());
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now(), 100);

        clock.advance(50);
        assert_eq!(clock.now(), 150);

        clock.set(864_000);
        assert_eq!(clock.now(), 864_000);
    }
}
