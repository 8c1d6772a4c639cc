//! Live video information read from the converter logic.

use bit_field::BitField;

/// Television standard of the incoming video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VideoMode {
    /// 60 Hz, 240p or 480i.
    Ntsc,
    /// 50 Hz, 288p or 576i.
    Pal,
}

/// Video info register.
///
/// Bit 0 is set for interlaced input, bit 1 for PAL and bit 2 while the logic
/// runs in fallback mode (configuration forced by the reset button at power-up).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VideoInfo {
    raw: u8,
}

impl VideoInfo {
    /// Bits of the register that carry information.
    pub const MASK: u8 = 0x07;

    /// Decode a raw register value.
    pub const fn from_register(raw: u8) -> Self {
        Self {
            raw: raw & Self::MASK,
        }
    }

    /// The masked register value.
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// Input is 480i or 576i.
    pub fn interlaced(&self) -> bool {
        self.raw.get_bit(0)
    }

    /// Input is 50 Hz.
    pub fn pal(&self) -> bool {
        self.raw.get_bit(1)
    }

    /// The logic was started in fallback mode.
    pub fn fallback(&self) -> bool {
        self.raw.get_bit(2)
    }

    /// Television standard of the input.
    pub fn mode(&self) -> VideoMode {
        if self.pal() {
            VideoMode::Pal
        } else {
            VideoMode::Ntsc
        }
    }
}

/// What the HDMI transmitter needs to know to generate output timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VideoTiming {
    /// Television standard of the input.
    pub mode: VideoMode,
    /// Line doubling is enabled in the configuration.
    pub line_doubling: bool,
}

impl VideoTiming {
    /// Combine the info register with the configured line doubling.
    pub fn new(info: VideoInfo, line_doubling: bool) -> Self {
        Self {
            mode: info.mode(),
            line_doubling,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_register() {
        let info = VideoInfo::from_register(0b1111_1011);
        assert_eq!(info.raw(), 0b011);
        assert!(info.interlaced());
        assert!(info.pal());
        assert!(!info.fallback());
        assert_eq!(info.mode(), VideoMode::Pal);

        let info = VideoInfo::from_register(0b100);
        assert!(info.fallback());
        assert_eq!(info.mode(), VideoMode::Ntsc);
    }
}
