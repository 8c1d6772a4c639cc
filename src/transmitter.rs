//! The HDMI transmitter behind the converter logic.

use crate::info::VideoTiming;

/// HDMI transmitter driver.
///
/// Calls are fire-and-forget: the control loop has no way to recover from a
/// failed transfer other than trying again on a later frame.
pub trait Transmitter {
    /// Whether the chip answers on its control bus.
    fn is_ready(&mut self) -> bool;
    /// Load the chip's power-up register set.
    fn init(&mut self);
    /// Program output timing for `timing`.
    fn setup_timing(&mut self, timing: VideoTiming);
    /// Whether a monitor is connected (hot plug detect).
    fn monitor_present(&mut self) -> bool;
}

impl<T: Transmitter + ?Sized> Transmitter for &mut T {
    fn is_ready(&mut self) -> bool {
        T::is_ready(self)
    }

    fn init(&mut self) {
        T::init(self)
    }

    fn setup_timing(&mut self, timing: VideoTiming) {
        T::setup_timing(self, timing)
    }

    fn monitor_present(&mut self) -> bool {
        T::monitor_present(self)
    }
}
