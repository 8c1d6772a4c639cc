//! Field descriptors and the bit-level operations on configuration words.

use core::ops::RangeInclusive;

use bit_field::BitField;

use crate::Error;
use crate::settings::Category;

/// A single-bit setting.
///
/// The set mask has exactly the field's bit set. The clear mask is the category
/// mask with that bit removed, so clearing a flag also drops any stray bit outside
/// the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlagField {
    category: Category,
    offset: u8,
    set_mask: u8,
    clear_mask: u8,
}

impl FlagField {
    /// Describe the flag at bit `offset` of the word for `category`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if the bit is not covered by
    /// the category mask.
    pub const fn new(category: Category, offset: u8) -> Self {
        assert!(offset < 8, "Flag offset outside an 8-bit word.");
        let set_mask = 1 << offset;
        assert!(
            set_mask & category.mask() != 0,
            "Flag bit outside the category mask."
        );
        Self {
            category,
            offset,
            set_mask,
            clear_mask: category.mask() & !set_mask,
        }
    }

    /// Word this flag lives in.
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Bit position of the flag.
    pub const fn offset(&self) -> u8 {
        self.offset
    }

    /// Mask ORed in to set the flag.
    pub const fn set_mask(&self) -> u8 {
        self.set_mask
    }

    /// Mask ANDed in to clear the flag.
    pub const fn clear_mask(&self) -> u8 {
        self.clear_mask
    }

    /// Whether the flag is set in `word`.
    pub fn is_set(&self, word: u8) -> bool {
        word.get_bit(self.offset as usize)
    }

    /// `word` with the flag set.
    pub const fn set(&self, word: u8) -> u8 {
        word | self.set_mask
    }

    /// `word` with the flag cleared.
    pub const fn clear(&self, word: u8) -> u8 {
        word & self.clear_mask
    }

    /// `word` with the flag inverted.
    pub const fn toggle(&self, word: u8) -> u8 {
        word ^ self.set_mask
    }
}

/// A multi-bit setting holding a value in `0..=max`.
///
/// Increment and decrement saturate at the bounds rather than wrapping. Values
/// above `max` are rejected by [`ValueField::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueField {
    category: Category,
    offset: u8,
    width: u8,
    max: u8,
    get_mask: u8,
}

impl ValueField {
    /// Describe the `width`-bit field starting at bit `offset` of the word for
    /// `category`, holding values up to `max`.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if the field leaves the
    /// category mask or `max` does not fit in `width` bits.
    pub const fn new(category: Category, offset: u8, width: u8, max: u8) -> Self {
        assert!(width > 0 && offset + width <= 8, "Field outside an 8-bit word.");
        let get_mask = (((1u16 << width) - 1) as u8) << offset;
        assert!(
            get_mask & !category.mask() == 0,
            "Field bits outside the category mask."
        );
        assert!((max as u16) < (1u16 << width), "Maximum does not fit the field.");
        Self {
            category,
            offset,
            width,
            max,
            get_mask,
        }
    }

    /// Word this field lives in.
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Bit position of the field's least significant bit.
    pub const fn offset(&self) -> u8 {
        self.offset
    }

    /// Largest value the field accepts.
    pub const fn max(&self) -> u8 {
        self.max
    }

    /// Mask covering the field's bits within the word.
    pub const fn get_mask(&self) -> u8 {
        self.get_mask
    }

    /// Category mask with the field's bits removed.
    pub const fn clear_mask(&self) -> u8 {
        self.category.mask() & !self.get_mask
    }

    /// The field's bits of `value`, in place. Bits beyond the field are dropped.
    pub const fn encode(&self, value: u8) -> u8 {
        (value << self.offset) & self.get_mask
    }

    fn bits(&self) -> RangeInclusive<usize> {
        let low = self.offset as usize;
        low..=(low + self.width as usize - 1)
    }

    /// Extract the field from `word` (a current or reference value).
    pub fn get(&self, word: u8) -> u8 {
        word.get_bits(self.bits())
    }

    /// `word` with the field replaced by `value`.
    ///
    /// # Errors
    ///
    /// [`Error::ValueOutOfRange`] if `value` is greater than the field maximum.
    pub fn set(&self, word: u8, value: u8) -> Result<u8, Error> {
        if value > self.max {
            return Err(Error::ValueOutOfRange {
                value,
                max: self.max,
            });
        }
        let mut word = word;
        word.set_bits(self.bits(), value);
        Ok(word)
    }

    /// `word` with the field lowered to the maximum if it holds more.
    pub fn clamp(&self, word: u8) -> u8 {
        if self.get(word) > self.max {
            (word & !self.get_mask) | self.encode(self.max)
        } else {
            word
        }
    }

    /// `word` with the field stepped up by one, unless already at the maximum.
    pub fn increment(&self, word: u8) -> u8 {
        let current = self.get(word);
        if current < self.max {
            let mut word = word;
            word.set_bits(self.bits(), current + 1);
            word
        } else {
            word
        }
    }

    /// `word` with the field stepped down by one, unless already zero.
    pub fn decrement(&self, word: u8) -> u8 {
        let current = self.get(word);
        if current > 0 {
            let mut word = word;
            word.set_bits(self.bits(), current - 1);
            word
        } else {
            word
        }
    }
}

/// Any configuration field: either a flag or a bounded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Single-bit setting.
    Flag(FlagField),
    /// Multi-bit bounded setting.
    Value(ValueField),
}

impl Field {
    /// Word the field lives in.
    pub const fn category(&self) -> Category {
        match self {
            Field::Flag(flag) => flag.category(),
            Field::Value(value) => value.category(),
        }
    }

    /// Largest value [`Field::get`] can return (1 for flags).
    pub const fn max(&self) -> u8 {
        match self {
            Field::Flag(_) => 1,
            Field::Value(value) => value.max(),
        }
    }

    /// Mask of the bits the field occupies.
    pub const fn get_mask(&self) -> u8 {
        match self {
            Field::Flag(flag) => flag.set_mask(),
            Field::Value(value) => value.get_mask(),
        }
    }

    /// The field's value in `word`, with flags reading as 0 or 1.
    pub fn get(&self, word: u8) -> u8 {
        match self {
            Field::Flag(flag) => flag.is_set(word) as u8,
            Field::Value(value) => value.get(word),
        }
    }

    /// Apply `op` to `word`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAFlag`] for a flag operation on a value field.
    /// - [`Error::NotAValue`] for a value operation on a flag field.
    /// - [`Error::ValueOutOfRange`] for [`FieldOp::Set`] above the maximum.
    pub fn apply(&self, word: u8, op: FieldOp) -> Result<u8, Error> {
        match (self, op) {
            (Field::Flag(flag), FieldOp::SetFlag) => Ok(flag.set(word)),
            (Field::Flag(flag), FieldOp::ClearFlag) => Ok(flag.clear(word)),
            (Field::Flag(flag), FieldOp::Toggle) => Ok(flag.toggle(word)),
            (Field::Flag(_), _) => Err(Error::NotAValue),
            (Field::Value(value), FieldOp::Increment) => Ok(value.increment(word)),
            (Field::Value(value), FieldOp::Decrement) => Ok(value.decrement(word)),
            (Field::Value(value), FieldOp::Set(v)) => value.set(word, v),
            (Field::Value(_), _) => Err(Error::NotAFlag),
        }
    }
}

impl From<FlagField> for Field {
    fn from(value: FlagField) -> Self {
        Self::Flag(value)
    }
}

impl From<ValueField> for Field {
    fn from(value: ValueField) -> Self {
        Self::Value(value)
    }
}

/// An edit to apply to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldOp {
    /// Set a flag.
    SetFlag,
    /// Clear a flag.
    ClearFlag,
    /// Invert a flag.
    Toggle,
    /// Step a value up by one, saturating at its maximum.
    Increment,
    /// Step a value down by one, saturating at zero.
    Decrement,
    /// Replace a value.
    Set(u8),
}
