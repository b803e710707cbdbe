//! # Token Identity Codec
//!
//! A token's entire identity lives inside its 256-bit identifier. Encoding
//! and decoding are pure and total over the valid range; there is no
//! identity storage anywhere else in the system.
//!
//! ## Bit layout (least-significant bit first)
//!
//! ```text
//! offset  width  field
//! ------  -----  --------------------------------------
//!      0     32  seed
//!     32     16  brightness band
//!     48     16  saturation band
//!     64     16  hue band
//!     80      1  lighting        (cardinality 2)
//!     81      2  integrity       (cardinality 4)
//!     83      2  deformation     (cardinality 3)
//!     85      1  stripe shift    (cardinality 2)
//!     86      2  stripe amount   (cardinality 3)
//!     88      2  blob            (cardinality 3)
//!     90      3  palette         (cardinality 6)
//!     93    163  global type     (0..=62 molecule, 63..=81 drug)
//! ```
//!
//! The global type field is read as the *entire* high part of the
//! identifier, so any stray bit above offset 93 pushes it past 81 and the
//! identifier is rejected. Rejection is also total for enumerated fields
//! whose raw value exceeds the cardinality (a 2-bit field can hold 3 while
//! only 0..=2 are meaningful, and so on).
//!
//! Substitution provenance for brewed drugs is deliberately *not* encoded
//! here; the decomposition engine records consumed ingredients out of band.

use alloy_primitives::U256;
use rand::Rng;

use crate::attributes::{
    Appearance, Blob, Deformation, Integrity, Lighting, Palette, StripeAmount, StripeShift,
};
use crate::catalog::{Category, DrugType, MoleculeType};
use crate::error::{LabError, LabResult};

/// A 256-bit token identifier.
pub type TokenId = U256;

/// Highest legal global type value.
pub const GLOBAL_TYPE_MAX: u8 = 81;

/// Global type values at and above this encode drugs.
pub const DRUG_GLOBAL_BASE: u8 = 63;

const SEED_OFFSET: usize = 0;
const BRIGHTNESS_OFFSET: usize = 32;
const SATURATION_OFFSET: usize = 48;
const HUE_OFFSET: usize = 64;
const LIGHTING_OFFSET: usize = 80;
const INTEGRITY_OFFSET: usize = 81;
const DEFORMATION_OFFSET: usize = 83;
const STRIPE_SHIFT_OFFSET: usize = 85;
const STRIPE_AMOUNT_OFFSET: usize = 86;
const BLOB_OFFSET: usize = 88;
const PALETTE_OFFSET: usize = 90;
const GLOBAL_TYPE_OFFSET: usize = 93;

/// Extracts `width` bits at `offset`. Callers keep `width < 64`.
#[inline]
fn bits(id: TokenId, offset: usize, width: u32) -> u64 {
    (id >> offset).as_limbs()[0] & ((1u64 << width) - 1)
}

fn field_error(name: &str, raw: u64) -> LabError {
    LabError::InvalidIdentifier(format!("{name} field value {raw} out of range"))
}

/// Which type a token is, across both catalog halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An ingredient token of the given molecule type.
    Molecule(MoleculeType),
    /// A brewed token of the given drug type.
    Drug(DrugType),
}

impl TokenKind {
    /// The catalog half this kind belongs to.
    #[inline]
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::Molecule(_) => Category::Molecule,
            Self::Drug(_) => Category::Drug,
        }
    }

    /// The value stored in the identifier's global type field.
    #[inline]
    #[must_use]
    pub const fn global_type(self) -> u8 {
        match self {
            Self::Molecule(molecule) => molecule.index(),
            Self::Drug(drug) => DRUG_GLOBAL_BASE + drug.index(),
        }
    }

    /// Splits a global type value back into a kind. `None` above 81.
    #[must_use]
    pub const fn from_global_type(global: u8) -> Option<Self> {
        if global < DRUG_GLOBAL_BASE {
            match MoleculeType::new(global) {
                Some(molecule) => Some(Self::Molecule(molecule)),
                None => None,
            }
        } else if global <= GLOBAL_TYPE_MAX {
            match DrugType::new(global - DRUG_GLOBAL_BASE) {
                Some(drug) => Some(Self::Drug(drug)),
                None => None,
            }
        } else {
            None
        }
    }
}

/// The decoded form of a token identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenIdentity {
    /// Molecule or drug type.
    pub kind: TokenKind,
    /// Cosmetic seed, no economic meaning.
    pub seed: u32,
    /// The visual attribute fields.
    pub appearance: Appearance,
}

impl TokenIdentity {
    /// Packs this identity into its canonical 256-bit identifier.
    #[must_use]
    pub fn encode(&self) -> TokenId {
        let a = &self.appearance;

        let mut id = U256::from(self.seed) << SEED_OFFSET;
        id |= U256::from(a.brightness) << BRIGHTNESS_OFFSET;
        id |= U256::from(a.saturation) << SATURATION_OFFSET;
        id |= U256::from(a.hue) << HUE_OFFSET;
        id |= U256::from(a.lighting.raw()) << LIGHTING_OFFSET;
        id |= U256::from(a.integrity.raw()) << INTEGRITY_OFFSET;
        id |= U256::from(a.deformation.raw()) << DEFORMATION_OFFSET;
        id |= U256::from(a.stripe_shift.raw()) << STRIPE_SHIFT_OFFSET;
        id |= U256::from(a.stripe_amount.raw()) << STRIPE_AMOUNT_OFFSET;
        id |= U256::from(a.blob.raw()) << BLOB_OFFSET;
        id |= U256::from(a.palette.raw()) << PALETTE_OFFSET;
        id |= U256::from(self.kind.global_type()) << GLOBAL_TYPE_OFFSET;
        id
    }

    /// Unpacks an identifier, rejecting any out-of-range field.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidIdentifier`] when the global type exceeds 81 or an
    /// enumerated field holds a value outside its cardinality.
    pub fn decode(id: TokenId) -> LabResult<Self> {
        let global_word = id >> GLOBAL_TYPE_OFFSET;
        if global_word > U256::from(GLOBAL_TYPE_MAX) {
            return Err(LabError::InvalidIdentifier(format!(
                "global type {global_word} exceeds {GLOBAL_TYPE_MAX}"
            )));
        }

        // The range check above proves the value fits in the low limb.
        let global = global_word.as_limbs()[0] as u8;
        let Some(kind) = TokenKind::from_global_type(global) else {
            return Err(field_error("global type", u64::from(global)));
        };

        let lighting_raw = bits(id, LIGHTING_OFFSET, 1);
        let integrity_raw = bits(id, INTEGRITY_OFFSET, 2);
        let deformation_raw = bits(id, DEFORMATION_OFFSET, 2);
        let stripe_shift_raw = bits(id, STRIPE_SHIFT_OFFSET, 1);
        let stripe_amount_raw = bits(id, STRIPE_AMOUNT_OFFSET, 2);
        let blob_raw = bits(id, BLOB_OFFSET, 2);
        let palette_raw = bits(id, PALETTE_OFFSET, 3);

        let appearance = Appearance {
            hue: bits(id, HUE_OFFSET, 16) as u16,
            saturation: bits(id, SATURATION_OFFSET, 16) as u16,
            brightness: bits(id, BRIGHTNESS_OFFSET, 16) as u16,
            lighting: Lighting::from_raw(lighting_raw as u8)
                .ok_or_else(|| field_error("lighting", lighting_raw))?,
            integrity: Integrity::from_raw(integrity_raw as u8)
                .ok_or_else(|| field_error("integrity", integrity_raw))?,
            deformation: Deformation::from_raw(deformation_raw as u8)
                .ok_or_else(|| field_error("deformation", deformation_raw))?,
            stripe_shift: StripeShift::from_raw(stripe_shift_raw as u8)
                .ok_or_else(|| field_error("stripe shift", stripe_shift_raw))?,
            stripe_amount: StripeAmount::from_raw(stripe_amount_raw as u8)
                .ok_or_else(|| field_error("stripe amount", stripe_amount_raw))?,
            blob: Blob::from_raw(blob_raw as u8).ok_or_else(|| field_error("blob", blob_raw))?,
            palette: Palette::from_raw(palette_raw as u8)
                .ok_or_else(|| field_error("palette", palette_raw))?,
        };

        Ok(Self {
            kind,
            seed: bits(id, SEED_OFFSET, 32) as u32,
            appearance,
        })
    }

    /// Draws a fresh identity of the given kind: new seed, new appearance.
    pub fn sample<R: Rng + ?Sized>(kind: TokenKind, rng: &mut R) -> Self {
        Self {
            kind,
            seed: rng.gen(),
            appearance: Appearance::sample(rng),
        }
    }

    /// True when this identity is a molecule.
    #[inline]
    #[must_use]
    pub const fn is_molecule(&self) -> bool {
        matches!(self.kind, TokenKind::Molecule(_))
    }

    /// True when this identity is a drug.
    #[inline]
    #[must_use]
    pub const fn is_drug(&self) -> bool {
        matches!(self.kind, TokenKind::Drug(_))
    }
}

/// A token reference accepted at public boundaries: either a raw identifier
/// or an already-decoded identity. Resolved exactly once per operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenHandle {
    /// An undecoded 256-bit identifier.
    Raw(TokenId),
    /// A decoded identity.
    Decoded(TokenIdentity),
}

impl TokenHandle {
    /// The 256-bit identifier, re-encoding if necessary.
    #[must_use]
    pub fn id(self) -> TokenId {
        match self {
            Self::Raw(id) => id,
            Self::Decoded(identity) => identity.encode(),
        }
    }

    /// The decoded identity, decoding if necessary.
    ///
    /// # Errors
    ///
    /// [`LabError::InvalidIdentifier`] when a raw identifier fails to
    /// decode.
    pub fn resolve(self) -> LabResult<TokenIdentity> {
        match self {
            Self::Raw(id) => TokenIdentity::decode(id),
            Self::Decoded(identity) => Ok(identity),
        }
    }
}

impl From<TokenId> for TokenHandle {
    fn from(id: TokenId) -> Self {
        Self::Raw(id)
    }
}

impl From<TokenIdentity> for TokenHandle {
    fn from(identity: TokenIdentity) -> Self {
        Self::Decoded(identity)
    }
}

/// Parses a decimal or `0x`-prefixed hex identifier string.
///
/// # Errors
///
/// [`LabError::InvalidIdentifier`] on malformed digits or values beyond 256
/// bits.
pub fn parse_token_id(input: &str) -> LabResult<TokenId> {
    let trimmed = input.trim();
    let (digits, radix) = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => (hex, 16u64),
        None => (trimmed, 10u64),
    };

    U256::from_str_radix(digits, radix)
        .map_err(|parse| LabError::InvalidIdentifier(format!("cannot parse {trimmed:?}: {parse}")))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat_appearance() -> Appearance {
        Appearance {
            hue: 0x1234,
            saturation: 0x5678,
            brightness: 0x9ABC,
            lighting: Lighting::Luminous,
            integrity: Integrity::Cracked,
            deformation: Deformation::Warped,
            stripe_shift: StripeShift::Offset,
            stripe_amount: StripeAmount::Dense,
            blob: Blob::Beaded,
            palette: Palette::Neon,
        }
    }

    #[test]
    fn test_encode_places_fields_at_documented_offsets() {
        let identity = TokenIdentity {
            kind: TokenKind::Molecule(MoleculeType::new(5).unwrap()),
            seed: 0xDEAD_BEEF,
            appearance: flat_appearance(),
        };
        let id = identity.encode();

        assert_eq!(bits(id, 0, 32), 0xDEAD_BEEF);
        assert_eq!(bits(id, 32, 16), 0x9ABC);
        assert_eq!(bits(id, 48, 16), 0x5678);
        assert_eq!(bits(id, 64, 16), 0x1234);
        assert_eq!(bits(id, 80, 1), 1); // Luminous
        assert_eq!(bits(id, 81, 2), 2); // Cracked
        assert_eq!(bits(id, 83, 2), 1); // Warped
        assert_eq!(bits(id, 85, 1), 1); // Offset
        assert_eq!(bits(id, 86, 2), 2); // Dense
        assert_eq!(bits(id, 88, 2), 1); // Beaded
        assert_eq!(bits(id, 90, 3), 3); // Neon
        assert_eq!(id >> 93, U256::from(5u8));
    }

    #[test]
    fn test_round_trip_across_every_global_type() {
        let appearance = flat_appearance();

        for global in 0..=GLOBAL_TYPE_MAX {
            let kind = TokenKind::from_global_type(global).unwrap();
            let identity = TokenIdentity {
                kind,
                seed: u32::from(global) * 7919,
                appearance,
            };

            let decoded = TokenIdentity::decode(identity.encode()).unwrap();
            assert_eq!(decoded, identity);
            assert_eq!(decoded.kind.global_type(), global);
        }
    }

    #[test]
    fn test_round_trip_of_sampled_identities() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for index in 0..200u32 {
            let kind = if index % 3 == 0 {
                TokenKind::Drug(DrugType::new((index % 19) as u8).unwrap())
            } else {
                TokenKind::Molecule(MoleculeType::new((index % 63) as u8).unwrap())
            };

            let identity = TokenIdentity::sample(kind, &mut rng);
            assert_eq!(TokenIdentity::decode(identity.encode()).unwrap(), identity);
        }
    }

    #[test]
    fn test_global_type_boundaries() {
        assert!(matches!(
            TokenKind::from_global_type(62),
            Some(TokenKind::Molecule(m)) if m.index() == 62
        ));
        assert!(matches!(
            TokenKind::from_global_type(63),
            Some(TokenKind::Drug(d)) if d.index() == 0
        ));
        assert!(matches!(
            TokenKind::from_global_type(81),
            Some(TokenKind::Drug(d)) if d.index() == 18
        ));
        assert!(TokenKind::from_global_type(82).is_none());
        assert!(TokenKind::from_global_type(255).is_none());
    }

    #[test]
    fn test_decode_rejects_global_type_beyond_81() {
        let bad = U256::from(82u8) << 93;
        assert!(matches!(
            TokenIdentity::decode(bad),
            Err(LabError::InvalidIdentifier(_))
        ));

        // A single stray bit far above the layout also lands in the global
        // type field and moves it out of range.
        let stray = (U256::from(1u8) << 255) | (U256::from(3u8) << 93);
        assert!(matches!(
            TokenIdentity::decode(stray),
            Err(LabError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_cardinality_enum_fields() {
        let base = TokenIdentity {
            kind: TokenKind::Molecule(MoleculeType::WATER),
            seed: 1,
            appearance: Appearance {
                hue: 0,
                saturation: 0,
                brightness: 0,
                lighting: Lighting::Matte,
                integrity: Integrity::Pristine,
                deformation: Deformation::Intact,
                stripe_shift: StripeShift::Aligned,
                stripe_amount: StripeAmount::Sparse,
                blob: Blob::Fine,
                palette: Palette::Classic,
            },
        }
        .encode();

        // Raw 3 in a 2-bit field with cardinality 3, raw 6/7 in the 3-bit
        // palette field with cardinality 6.
        for (offset, bad_raw) in [(83usize, 3u8), (86, 3), (88, 3), (90, 6), (90, 7)] {
            let poisoned = base | (U256::from(bad_raw) << offset);
            assert!(
                matches!(
                    TokenIdentity::decode(poisoned),
                    Err(LabError::InvalidIdentifier(_))
                ),
                "raw {bad_raw} at offset {offset} must be rejected"
            );
        }
    }

    #[test]
    fn test_handle_resolution() {
        let identity = TokenIdentity {
            kind: TokenKind::Drug(DrugType::new(8).unwrap()),
            seed: 77,
            appearance: flat_appearance(),
        };
        let id = identity.encode();

        assert_eq!(TokenHandle::from(id).resolve().unwrap(), identity);
        assert_eq!(TokenHandle::from(identity).resolve().unwrap(), identity);
        assert_eq!(TokenHandle::from(identity).id(), id);
        assert_eq!(TokenHandle::from(id).id(), id);

        let junk = U256::MAX;
        assert!(TokenHandle::from(junk).resolve().is_err());
    }

    #[test]
    fn test_parse_token_id_accepts_decimal_and_hex() {
        let identity = TokenIdentity {
            kind: TokenKind::Molecule(MoleculeType::new(13).unwrap()),
            seed: 0xC0FFEE,
            appearance: flat_appearance(),
        };
        let id = identity.encode();

        assert_eq!(parse_token_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_token_id(&format!("{id:#x}")).unwrap(), id);
    }

    #[test]
    fn test_parse_token_id_rejects_garbage_and_overflow() {
        assert!(matches!(
            parse_token_id("not a number"),
            Err(LabError::InvalidIdentifier(_))
        ));

        // 65 hex digits = 260 bits, past the identifier width.
        let overflow = format!("0x1{}", "0".repeat(64));
        assert!(matches!(
            parse_token_id(&overflow),
            Err(LabError::InvalidIdentifier(_))
        ));
    }
}
