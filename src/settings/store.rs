use core::ops::Index;

use strum::{EnumCount, EnumIter, FromRepr, IntoEnumIterator};

use crate::Error;
use crate::settings::layout::FIELDS;
use crate::settings::{Field, FieldOp, FlagField, ValueField};

/// The four configuration words.
///
/// The discriminant is the word's position in a [`Snapshot`], in the persisted
/// record and in the packed forced-state register (byte `n` is category `n`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCount, EnumIter, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Category {
    /// Miscellaneous behaviour and menu state.
    MiscMenu = 0,
    /// Output format, in-game reset, line doubling and 480i deinterlacing.
    Video = 1,
    /// Image processing applied to 240p/288p input.
    Image240p = 2,
    /// Image processing applied to 480i/576i input.
    Image480i = 3,
}

impl Category {
    /// Bits of the word that carry meaning. All others are always zero.
    pub const fn mask(self) -> u8 {
        match self {
            Category::MiscMenu => 0xFF,
            Category::Video => 0x37,
            Category::Image240p | Category::Image480i => 0xF7,
        }
    }

    /// Position of the word in a snapshot.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Category masks packed into one 32-bit value, byte `n` for category `n`.
    pub const fn packed_mask() -> u32 {
        u32::from_le_bytes([
            Category::MiscMenu.mask(),
            Category::Video.mask(),
            Category::Image240p.mask(),
            Category::Image480i.mask(),
        ])
    }
}

/// The four category words, each masked to its category with every value field
/// at most its maximum.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot([u8; Category::COUNT]);

impl Snapshot {
    /// All words zero.
    pub const fn zeroed() -> Self {
        Self([0; Category::COUNT])
    }

    /// Build from raw words in category order, normalizing each one.
    pub fn from_words(words: [u8; Category::COUNT]) -> Self {
        let mut snapshot = Self::zeroed();
        for category in Category::iter() {
            snapshot.set_word(category, words[category.index()]);
        }
        snapshot
    }

    /// Unpack a 32-bit register value, byte `n` for category `n`.
    pub fn from_packed(packed: u32) -> Self {
        Self::from_words(packed.to_le_bytes())
    }

    /// Words in category order.
    pub const fn words(&self) -> [u8; Category::COUNT] {
        self.0
    }

    /// Words packed into 32 bits, byte `n` for category `n`.
    pub const fn packed(&self) -> u32 {
        u32::from_le_bytes(self.0)
    }

    /// Word for `category`.
    pub const fn word(&self, category: Category) -> u8 {
        self.0[category.index()]
    }

    /// Replace the word for `category`.
    ///
    /// Bits outside the category mask are dropped and value fields above their
    /// maximum are clamped to it. An output format with both the RGsB and YPbPr
    /// bits set reads as YPbPr.
    pub fn set_word(&mut self, category: Category, word: u8) {
        self.0[category.index()] = FIELDS
            .iter()
            .fold(word & category.mask(), |word, field| match field {
                Field::Value(value) if value.category() == category => value.clamp(word),
                _ => word,
            });
    }
}

impl Index<Category> for Snapshot {
    type Output = u8;

    fn index(&self, category: Category) -> &Self::Output {
        &self.0[category.index()]
    }
}

/// Live configuration words plus the reference copy of each.
///
/// The reference is taken by [`Configuration::mark_reference`] after a successful
/// load or save. Edits only touch the live words and reach the hardware when the
/// control loop pushes a [`Snapshot`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Configuration {
    current: Snapshot,
    reference: Snapshot,
}

impl Configuration {
    /// All words and references zero.
    pub const fn new() -> Self {
        Self {
            current: Snapshot::zeroed(),
            reference: Snapshot::zeroed(),
        }
    }

    /// Zero every word and its reference.
    pub fn clear_all(&mut self) {
        self.current = Snapshot::zeroed();
        self.reference = Snapshot::zeroed();
    }

    /// Copy each live word into its reference.
    pub fn mark_reference(&mut self) {
        self.reference = self.current;
    }

    /// The live words.
    pub fn snapshot(&self) -> Snapshot {
        self.current
    }

    /// The reference words.
    pub fn reference(&self) -> Snapshot {
        self.reference
    }

    /// Replace every live word. References are left alone.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.current = snapshot;
    }

    /// Live word for `category`.
    pub fn word(&self, category: Category) -> u8 {
        self.current.word(category)
    }

    /// Replace the live word for `category`, normalized as by [`Snapshot::set_word`].
    pub fn set_word(&mut self, category: Category, word: u8) {
        self.current.set_word(category, word);
    }

    /// Apply `op` to the word that `field` lives in.
    ///
    /// Returns whether the word changed.
    ///
    /// # Errors
    ///
    /// See [`Field::apply`]. On error the word is unchanged.
    pub fn apply(&mut self, field: impl Into<Field>, op: FieldOp) -> Result<bool, Error> {
        let field = field.into();
        let category = field.category();
        let before = self.word(category);
        let after = field.apply(before, op)?;
        self.set_word(category, after);
        Ok(self.word(category) != before)
    }

    /// Current value of `field` (0 or 1 for flags).
    pub fn value(&self, field: impl Into<Field>) -> u8 {
        let field = field.into();
        field.get(self.current.word(field.category()))
    }

    /// Reference value of `field` (0 or 1 for flags).
    pub fn reference_value(&self, field: impl Into<Field>) -> u8 {
        let field = field.into();
        field.get(self.reference.word(field.category()))
    }

    /// Whether `flag` is set in the live words.
    pub fn is_set(&self, flag: FlagField) -> bool {
        flag.is_set(self.word(flag.category()))
    }

    /// Set `flag`.
    pub fn set_flag(&mut self, flag: FlagField) {
        let category = flag.category();
        self.set_word(category, flag.set(self.word(category)));
    }

    /// Clear `flag`.
    pub fn clear_flag(&mut self, flag: FlagField) {
        let category = flag.category();
        self.set_word(category, flag.clear(self.word(category)));
    }

    /// Invert `flag`.
    pub fn toggle_flag(&mut self, flag: FlagField) {
        let category = flag.category();
        self.set_word(category, flag.toggle(self.word(category)));
    }

    /// Replace the value of `field`.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] above the field maximum, leaving the word unchanged.
    pub fn set_value(&mut self, field: ValueField, value: u8) -> Result<(), Error> {
        let category = field.category();
        let word = field.set(self.word(category), value)?;
        self.set_word(category, word);
        Ok(())
    }

    /// Whether `field` differs from its reference value.
    pub fn field_changed(&self, field: impl Into<Field>) -> bool {
        let field = field.into();
        self.value(field) != self.reference_value(field)
    }

    /// Whether any live word differs from its reference.
    pub fn has_changes(&self) -> bool {
        self.current != self.reference
    }
}
