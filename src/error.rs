use thiserror::Error;

/// Problems raised while editing, persisting or restoring the configuration.
///
/// None of these are fatal to the controller. The control loop skips invalid field
/// operations and turns storage problems into the "failed" or "aborted" banner.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// A flag operation (set, clear, toggle) was applied to a multi-bit value field.
    #[error("flag operation on a value field")]
    NotAFlag,
    /// A value operation (increment, decrement, set) was applied to a flag field.
    #[error("value operation on a flag field")]
    NotAValue,
    /// Attempt to store a value larger than the field's maximum.
    ///
    /// The configuration word is left unchanged.
    #[error("value {value} exceeds field maximum {max}")]
    ValueOutOfRange {
        /// The rejected value.
        value: u8,
        /// Largest value the field accepts.
        max: u8,
    },
    /// No usable flash device, or its configuration slots could not be read.
    #[error("configuration storage unavailable")]
    StorageUnavailable,
    /// The flash device returned an error while reading, erasing or writing.
    #[error("flash access failed")]
    FlashError,
    /// A freshly written record did not read back identically.
    #[error("flash record verification failed")]
    VerifyFailed,
}
