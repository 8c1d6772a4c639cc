//! Waiting for the next video frame.

use embedded_hal::digital::InputPin;

/// Something that blocks until the next frame starts.
pub trait FrameSync {
    /// Return once the next vertical sync pulse has passed.
    fn wait_for_frame(&mut self);
}

impl<S: FrameSync + ?Sized> FrameSync for &mut S {
    fn wait_for_frame(&mut self) {
        S::wait_for_frame(self)
    }
}

/// Frame sync on the active-low vertical sync input.
///
/// A frame boundary is nVSYNC going high (end of the sync pulse) and then low
/// again (start of the next one). A pin read error counts as the level being
/// reached so a faulty pin cannot stall the loop forever.
#[derive(Debug)]
pub struct VsyncPin<P> {
    pin: P,
}

impl<P> VsyncPin<P> {
    /// Wrap the nVSYNC input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Release the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> FrameSync for VsyncPin<P> {
    fn wait_for_frame(&mut self) {
        while let Ok(false) = self.pin.is_high() {}
        while let Ok(true) = self.pin.is_high() {}
    }
}

#[cfg(feature = "async")]
impl<P: embedded_hal_async::digital::Wait> VsyncPin<P> {
    /// Await the same edge pair as [`FrameSync::wait_for_frame`].
    ///
    /// # Errors
    ///
    /// The pin's error if waiting for either edge fails.
    pub async fn wait_for_frame_async(&mut self) -> Result<(), P::Error> {
        self.pin.wait_for_high().await?;
        self.pin.wait_for_low().await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Replays a fixed sequence of levels, then stays low.
    struct Levels {
        levels: &'static [bool],
        reads: usize,
    }

    impl ErrorType for Levels {
        type Error = Infallible;
    }

    impl InputPin for Levels {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            let level = self.levels.get(self.reads).copied().unwrap_or(false);
            self.reads += 1;
            Ok(level)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    #[test]
    fn waits_for_high_then_low() {
        let mut sync = VsyncPin::new(Levels {
            levels: &[false, false, true, true, true, false],
            reads: 0,
        });
        sync.wait_for_frame();
        assert_eq!(sync.into_inner().reads, 6);
    }

    #[test]
    fn already_high_waits_only_for_low() {
        let mut sync = VsyncPin::new(Levels {
            levels: &[true, false],
            reads: 0,
        });
        sync.wait_for_frame();
        assert_eq!(sync.into_inner().reads, 2);
    }
}
