//! # Visual Attribute Model
//!
//! The seven enumerated fields of a token's appearance, each with a fixed
//! cardinality dictated by the identity bit layout, plus the three wide
//! color fields (hue, saturation, brightness).
//!
//! Rendering itself lives outside this system. These types exist so the
//! codec can reject out-of-range field values and so fresh identities can be
//! sampled uniformly. Attribute values are cosmetic and carry no economic
//! weight.
//!
//! Each enum exposes `ALL` (variants in encoding order), a strict `from_raw`
//! for decoding, and `raw` for encoding. Cardinalities: lighting 2,
//! integrity 4, deformation 3, stripe shift 2, stripe amount 3, blob 3,
//! palette 6.

use rand::Rng;

/// Light treatment of the rendered piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Lighting {
    /// Flat unlit shading.
    Matte = 0,
    /// Emissive rim light.
    Luminous = 1,
}

impl Lighting {
    /// Variants in encoding order.
    pub const ALL: [Self; 2] = [Self::Matte, Self::Luminous];

    /// Decodes a raw field value. Rejects values outside the cardinality.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Matte),
            1 => Some(Self::Luminous),
            _ => None,
        }
    }

    /// Raw field value for encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Surface condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Integrity {
    /// Untouched surface.
    Pristine = 0,
    /// Light surface wear.
    Worn = 1,
    /// Visible fracture lines.
    Cracked = 2,
    /// Broken into shards.
    Shattered = 3,
}

impl Integrity {
    /// Variants in encoding order.
    pub const ALL: [Self; 4] = [Self::Pristine, Self::Worn, Self::Cracked, Self::Shattered];

    /// Decodes a raw field value. Rejects values outside the cardinality.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Pristine),
            1 => Some(Self::Worn),
            2 => Some(Self::Cracked),
            3 => Some(Self::Shattered),
            _ => None,
        }
    }

    /// Raw field value for encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Shape distortion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Deformation {
    /// True to the base mesh.
    Intact = 0,
    /// Twisted around the vertical axis.
    Warped = 1,
    /// Softened, drooping edges.
    Molten = 2,
}

impl Deformation {
    /// Variants in encoding order.
    pub const ALL: [Self; 3] = [Self::Intact, Self::Warped, Self::Molten];

    /// Decodes a raw field value. Rejects values outside the cardinality.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Intact),
            1 => Some(Self::Warped),
            2 => Some(Self::Molten),
            _ => None,
        }
    }

    /// Raw field value for encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Phase offset of the stripe pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StripeShift {
    /// Stripes anchored to the mesh origin.
    Aligned = 0,
    /// Stripes shifted by half a period.
    Offset = 1,
}

impl StripeShift {
    /// Variants in encoding order.
    pub const ALL: [Self; 2] = [Self::Aligned, Self::Offset];

    /// Decodes a raw field value. Rejects values outside the cardinality.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Aligned),
            1 => Some(Self::Offset),
            _ => None,
        }
    }

    /// Raw field value for encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Density of the stripe pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StripeAmount {
    /// A few wide bands.
    Sparse = 0,
    /// Medium banding.
    Banded = 1,
    /// Tight pinstripes.
    Dense = 2,
}

impl StripeAmount {
    /// Variants in encoding order.
    pub const ALL: [Self; 3] = [Self::Sparse, Self::Banded, Self::Dense];

    /// Decodes a raw field value. Rejects values outside the cardinality.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Sparse),
            1 => Some(Self::Banded),
            2 => Some(Self::Dense),
            _ => None,
        }
    }

    /// Raw field value for encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Size of the inner blob inclusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Blob {
    /// Fine suspended grains.
    Fine = 0,
    /// Pea-sized beads.
    Beaded = 1,
    /// One large mass.
    Massed = 2,
}

impl Blob {
    /// Variants in encoding order.
    pub const ALL: [Self; 3] = [Self::Fine, Self::Beaded, Self::Massed];

    /// Decodes a raw field value. Rejects values outside the cardinality.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Fine),
            1 => Some(Self::Beaded),
            2 => Some(Self::Massed),
            _ => None,
        }
    }

    /// Raw field value for encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Base color scheme the hue/saturation/brightness bands modulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Palette {
    /// Saturated primaries.
    Classic = 0,
    /// Dark, desaturated.
    Noir = 1,
    /// Washed-out lights.
    Pastel = 2,
    /// High-saturation glow.
    Neon = 3,
    /// Ochres and umbers.
    Earthen = 4,
    /// Grayscale only.
    Achromatic = 5,
}

impl Palette {
    /// Variants in encoding order.
    pub const ALL: [Self; 6] = [
        Self::Classic,
        Self::Noir,
        Self::Pastel,
        Self::Neon,
        Self::Earthen,
        Self::Achromatic,
    ];

    /// Decodes a raw field value. Rejects values outside the cardinality.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Classic),
            1 => Some(Self::Noir),
            2 => Some(Self::Pastel),
            3 => Some(Self::Neon),
            4 => Some(Self::Earthen),
            5 => Some(Self::Achromatic),
            _ => None,
        }
    }

    /// Raw field value for encoding.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// The full visual description carried inside a token identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Appearance {
    /// Hue band, full `u16` range.
    pub hue: u16,
    /// Saturation band, full `u16` range.
    pub saturation: u16,
    /// Brightness band, full `u16` range.
    pub brightness: u16,
    /// Light treatment.
    pub lighting: Lighting,
    /// Surface condition.
    pub integrity: Integrity,
    /// Shape distortion.
    pub deformation: Deformation,
    /// Stripe phase.
    pub stripe_shift: StripeShift,
    /// Stripe density.
    pub stripe_amount: StripeAmount,
    /// Inner blob size.
    pub blob: Blob,
    /// Color scheme.
    pub palette: Palette,
}

impl Appearance {
    /// Draws every field uniformly within its cardinality.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            hue: rng.gen(),
            saturation: rng.gen(),
            brightness: rng.gen(),
            lighting: Lighting::ALL[rng.gen_range(0..Lighting::ALL.len())],
            integrity: Integrity::ALL[rng.gen_range(0..Integrity::ALL.len())],
            deformation: Deformation::ALL[rng.gen_range(0..Deformation::ALL.len())],
            stripe_shift: StripeShift::ALL[rng.gen_range(0..StripeShift::ALL.len())],
            stripe_amount: StripeAmount::ALL[rng.gen_range(0..StripeAmount::ALL.len())],
            blob: Blob::ALL[rng.gen_range(0..Blob::ALL.len())],
            palette: Palette::ALL[rng.gen_range(0..Palette::ALL.len())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_raw_round_trips_for_every_variant() {
        for v in Lighting::ALL {
            assert_eq!(Lighting::from_raw(v.raw()), Some(v));
        }
        for v in Integrity::ALL {
            assert_eq!(Integrity::from_raw(v.raw()), Some(v));
        }
        for v in Deformation::ALL {
            assert_eq!(Deformation::from_raw(v.raw()), Some(v));
        }
        for v in StripeShift::ALL {
            assert_eq!(StripeShift::from_raw(v.raw()), Some(v));
        }
        for v in StripeAmount::ALL {
            assert_eq!(StripeAmount::from_raw(v.raw()), Some(v));
        }
        for v in Blob::ALL {
            assert_eq!(Blob::from_raw(v.raw()), Some(v));
        }
        for v in Palette::ALL {
            assert_eq!(Palette::from_raw(v.raw()), Some(v));
        }
    }

    #[test]
    fn test_from_raw_rejects_out_of_cardinality_values() {
        assert_eq!(Lighting::from_raw(2), None);
        assert_eq!(Integrity::from_raw(4), None);
        assert_eq!(Deformation::from_raw(3), None);
        assert_eq!(StripeShift::from_raw(2), None);
        assert_eq!(StripeAmount::from_raw(3), None);
        assert_eq!(Blob::from_raw(3), None);
        assert_eq!(Palette::from_raw(6), None);
        assert_eq!(Palette::from_raw(255), None);
    }

    #[test]
    fn test_sampling_is_deterministic_for_a_fixed_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..32 {
            assert_eq!(Appearance::sample(&mut a), Appearance::sample(&mut b));
        }
    }

    #[test]
    fn test_sampling_eventually_hits_every_palette() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = [false; Palette::ALL.len()];

        for _ in 0..512 {
            let appearance = Appearance::sample(&mut rng);
            seen[appearance.palette.raw() as usize] = true;
        }

        assert!(seen.iter().all(|&s| s), "palette sampling is biased: {seen:?}");
    }
}
