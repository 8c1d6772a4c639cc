//! Compiled-in defaults and the jumper override.

use bit_field::BitField;
use strum::IntoEnumIterator;

use crate::settings::layout::{
    BOB_480I, DEBLUR, DEBLUR_FORCED_OFF, GAMMA_DEFAULT, IMAGE_240P, IMAGE_480I, LINE_DOUBLING,
    MODE_15BIT, QUICK_CHANGE, RGSB, USE_IGR, YPBPR,
};
use crate::settings::{Category, Configuration};

/// Bits cleared in each word before the default pattern is ORed in.
///
/// Category order, see [`Category`].
const RESET_CLEAR_MASKS: [u8; 4] = [
    MODE_15BIT.clear_mask() & DEBLUR.clear_mask() & QUICK_CHANGE.clear_mask(),
    USE_IGR.clear_mask() & LINE_DOUBLING.clear_mask() & BOB_480I.clear_mask(),
    IMAGE_240P.reset_clear_mask(),
    IMAGE_480I.reset_clear_mask(),
];

/// Default bits ORed into each word after the reset mask was applied.
const DEFAULT_PATTERNS: [u8; 4] = [
    DEBLUR.encode(DEBLUR_FORCED_OFF),
    0,
    IMAGE_240P.gamma.encode(GAMMA_DEFAULT),
    IMAGE_480I.gamma.encode(GAMMA_DEFAULT),
];

/// Reset the defaultable fields of every word to their compiled-in values.
///
/// Bits outside the reset masks (menu flags, the output format) are preserved.
/// Stored data and jumpers are not consulted.
pub fn load_defaults(config: &mut Configuration) {
    for category in Category::iter() {
        let index = category.index();
        let word = config.word(category) & RESET_CLEAR_MASKS[index];
        config.set_word(category, word | DEFAULT_PATTERNS[index]);
    }
}

/// A reading of the six configuration jumpers.
///
/// Bit 0 RGsB, bit 1 YPbPr, bits 2-3 scanline strength, bit 4 480i bob and bit 5
/// line doubling. The scanline strength sits two bits higher than in the image
/// words.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Jumpers(u8);

impl Jumpers {
    /// Bits read from the jumper register.
    pub const MASK: u8 = 0x3F;
    const SCANLINE_OFFSET: usize = 2;

    /// Wrap a raw register value, dropping bits beyond the six jumpers.
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & Self::MASK)
    }

    /// The masked jumper bits.
    pub const fn raw(&self) -> u8 {
        self.0
    }

    /// Sync-on-green jumper fitted.
    pub fn rgsb(&self) -> bool {
        self.0.get_bit(0)
    }

    /// Component output jumper fitted.
    pub fn ypbpr(&self) -> bool {
        self.0.get_bit(1)
    }

    /// Scanline strength, already shifted back to image word position 0.
    pub fn scanline_strength(&self) -> u8 {
        self.0
            .get_bits(Self::SCANLINE_OFFSET..=Self::SCANLINE_OFFSET + 1)
    }

    /// 480i bob jumper fitted.
    pub fn bob_480i(&self) -> bool {
        self.0.get_bit(4)
    }

    /// Line doubling jumper fitted.
    pub fn line_doubling(&self) -> bool {
        self.0.get_bit(5)
    }
}

/// Layer the jumper reading over the configuration.
///
/// Only the scanline strength of both image words and the four video flags are
/// touched: each is cleared, then set from the jumpers. With both output format
/// jumpers fitted YPbPr wins and RGsB stays clear.
pub fn apply_jumpers(config: &mut Configuration, jumpers: Jumpers) {
    for image in [IMAGE_240P, IMAGE_480I] {
        // Jumper strength is at most 3, the field maximum.
        let word = image.scanline_strength.clear_mask() & config.word(image.category());
        config.set_word(
            image.category(),
            word | image.scanline_strength.encode(jumpers.scanline_strength()),
        );
    }

    for (flag, fitted) in [
        (RGSB, jumpers.rgsb() && !jumpers.ypbpr()),
        (YPBPR, jumpers.ypbpr()),
        (BOB_480I, jumpers.bob_480i()),
        (LINE_DOUBLING, jumpers.line_doubling()),
    ] {
        config.clear_flag(flag);
        if fitted {
            config.set_flag(flag);
        }
    }
}
