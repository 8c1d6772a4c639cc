//! Exchange with the converter logic's configuration registers.

use crate::info::VideoInfo;
use crate::settings::{Category, Jumpers, Snapshot};

use strum::IntoEnumIterator;

/// Registers shared with the converter logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Output register holding one configuration word.
    Config(Category),
    /// Packed forced configuration, byte `n` for category `n`. Read at boot.
    ForcedState,
    /// The six configuration jumpers. Read at boot.
    Jumpers,
    /// Live video information, see [`VideoInfo`].
    VideoInfo,
}

/// Memory-mapped access to the logic's registers.
///
/// Accesses never fail: an unresponsive logic core simply reads back stale
/// values, which the control loop rewrites every frame anyway.
pub trait RegisterBus {
    /// Read `register`. Only the low byte is meaningful except for
    /// [`Register::ForcedState`].
    fn read(&mut self, register: Register) -> u32;
    /// Write `value` to `register`.
    fn write(&mut self, register: Register, value: u32);
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    fn read(&mut self, register: Register) -> u32 {
        B::read(self, register)
    }

    fn write(&mut self, register: Register, value: u32) {
        B::write(self, register, value)
    }
}

/// Projects configuration snapshots onto the register bus and reads the inputs.
#[derive(Debug)]
pub struct HardwareSync<B> {
    bus: B,
}

impl<B: RegisterBus> HardwareSync<B> {
    /// Wrap a register bus.
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Write every configuration word to its output register.
    pub fn push(&mut self, snapshot: &Snapshot) {
        for category in Category::iter() {
            self.bus.write(
                Register::Config(category),
                (snapshot[category] & category.mask()) as u32,
            );
        }
    }

    /// The forced configuration, masked to the packed category layout.
    ///
    /// A non-zero value at boot means the configuration must not come from
    /// storage.
    pub fn pull_forced_state(&mut self) -> u32 {
        self.bus.read(Register::ForcedState) & Category::packed_mask()
    }

    /// The jumper reading.
    pub fn read_jumpers(&mut self) -> Jumpers {
        Jumpers::from_raw(self.bus.read(Register::Jumpers) as u8)
    }

    /// The live video info register.
    pub fn read_video_info(&mut self) -> VideoInfo {
        VideoInfo::from_register(self.bus.read(Register::VideoInfo) as u8)
    }

    /// The wrapped bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the wrapped bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Release the wrapped bus.
    pub fn into_inner(self) -> B {
        self.bus
    }
}
