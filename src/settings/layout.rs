//! Where each setting lives inside the configuration words.
//!
//! | Word        | Bits | Setting                                          |
//! |-------------|------|--------------------------------------------------|
//! | `MiscMenu`  | 0    | 15-bit colour mode                               |
//! |             | 1-2  | deblur (auto, forced off, forced on)             |
//! |             | 3-4  | quick change (bit 3 deblur, bit 4 15-bit mode)   |
//! |             | 5    | menu mute latch                                  |
//! |             | 6    | show logo                                        |
//! |             | 7    | show on-screen display                           |
//! | `Video`     | 0-1  | output format (bit 0 RGsB, bit 1 YPbPr)          |
//! |             | 2    | in-game reset                                    |
//! |             | 4    | 480i bob deinterlacing                           |
//! |             | 5    | line doubling                                    |
//! | `Image*`    | 0-1  | scanline strength                                |
//! |             | 2    | scanline id                                      |
//! |             | 4-7  | gamma table                                      |

use crate::settings::{Category, Field, FlagField, ValueField};

/// 15-bit colour mode.
pub const MODE_15BIT: FlagField = FlagField::new(Category::MiscMenu, 0);
/// Deblur setting, one of [`DEBLUR_AUTO`], [`DEBLUR_FORCED_OFF`], [`DEBLUR_FORCED_ON`].
pub const DEBLUR: ValueField = ValueField::new(Category::MiscMenu, 1, 2, 2);
/// Both quick-change enables read as one value.
pub const QUICK_CHANGE: ValueField = ValueField::new(Category::MiscMenu, 3, 2, 3);
/// Quick deblur controller shortcuts enabled.
pub const QUICK_DEBLUR: FlagField = FlagField::new(Category::MiscMenu, 3);
/// Quick 15-bit mode controller shortcuts enabled.
pub const QUICK_15BIT: FlagField = FlagField::new(Category::MiscMenu, 4);
/// Overlay temporarily hidden while the menu stays open.
pub const MUTE_LATCH: FlagField = FlagField::new(Category::MiscMenu, 5);
/// Logo shown in the overlay header.
pub const SHOW_LOGO: FlagField = FlagField::new(Category::MiscMenu, 6);
/// On-screen menu open.
pub const SHOW_OSD: FlagField = FlagField::new(Category::MiscMenu, 7);

/// Deblur chosen by the video logic.
pub const DEBLUR_AUTO: u8 = 0;
/// Deblur always off.
pub const DEBLUR_FORCED_OFF: u8 = 1;
/// Deblur always on.
pub const DEBLUR_FORCED_ON: u8 = 2;

/// Output format: 0 RGBS, 1 RGsB, 2 YPbPr.
pub const VIDEO_FORMAT: ValueField = ValueField::new(Category::Video, 0, 2, 2);
/// Sync on green.
pub const RGSB: FlagField = FlagField::new(Category::Video, 0);
/// Component output.
pub const YPBPR: FlagField = FlagField::new(Category::Video, 1);
/// Reset the console from a controller button combination.
pub const USE_IGR: FlagField = FlagField::new(Category::Video, 2);
/// Bob deinterlacing for 480i/576i input.
pub const BOB_480I: FlagField = FlagField::new(Category::Video, 4);
/// Line doubling of 240p/288p input.
pub const LINE_DOUBLING: FlagField = FlagField::new(Category::Video, 5);

/// Gamma table index applied when no gamma correction is wanted.
pub const GAMMA_DEFAULT: u8 = 5;

/// The fields shared by both image words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFields {
    /// Scanline strength, 0 to 3.
    pub scanline_strength: ValueField,
    /// Scanline id.
    pub scanline_id: FlagField,
    /// Gamma table index, 0 to 8.
    pub gamma: ValueField,
}

impl ImageFields {
    const fn new(category: Category) -> Self {
        Self {
            scanline_strength: ValueField::new(category, 0, 2, 3),
            scanline_id: FlagField::new(category, 2),
            gamma: ValueField::new(category, 4, 4, 8),
        }
    }

    /// Word these fields live in.
    pub const fn category(&self) -> Category {
        self.gamma.category()
    }

    /// Category mask with every image field removed.
    pub const fn reset_clear_mask(&self) -> u8 {
        self.gamma.clear_mask()
            & self.scanline_strength.clear_mask()
            & self.scanline_id.clear_mask()
    }
}

/// Image settings for 240p/288p input.
pub const IMAGE_240P: ImageFields = ImageFields::new(Category::Image240p);
/// Image settings for 480i/576i input.
pub const IMAGE_480I: ImageFields = ImageFields::new(Category::Image480i);

/// Every field descriptor, overlapping ones included.
pub const FIELDS: &[Field] = &[
    Field::Flag(MODE_15BIT),
    Field::Value(DEBLUR),
    Field::Value(QUICK_CHANGE),
    Field::Flag(QUICK_DEBLUR),
    Field::Flag(QUICK_15BIT),
    Field::Flag(MUTE_LATCH),
    Field::Flag(SHOW_LOGO),
    Field::Flag(SHOW_OSD),
    Field::Value(VIDEO_FORMAT),
    Field::Flag(RGSB),
    Field::Flag(YPBPR),
    Field::Flag(USE_IGR),
    Field::Flag(BOB_480I),
    Field::Flag(LINE_DOUBLING),
    Field::Value(IMAGE_240P.scanline_strength),
    Field::Flag(IMAGE_240P.scanline_id),
    Field::Value(IMAGE_240P.gamma),
    Field::Value(IMAGE_480I.scanline_strength),
    Field::Flag(IMAGE_480I.scanline_id),
    Field::Value(IMAGE_480I.gamma),
];
