//! User commands decoded from the game controller.

/// A command the control loop acts on.
///
/// Button combinations are decoded elsewhere; the loop only sees the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Open the on-screen menu.
    OpenMenu,
    /// Close the on-screen menu.
    CloseMenu,
    /// Hide the menu overlay while it stays open.
    MuteMenu,
    /// Show the overlay again.
    UnmuteMenu,
    /// Move the selection up.
    MenuUp,
    /// Move the selection down.
    MenuDown,
    /// Decrement a value, or go back from a text or info page.
    MenuLeft,
    /// Increment a value, or enter the selection.
    MenuRight,
    /// Toggle a flag, enter a submenu or run an action.
    MenuEnter,
    /// Leave the current page.
    MenuBack,
    /// Shortcut: force deblur on.
    DeblurQuickOn,
    /// Shortcut: force deblur off.
    DeblurQuickOff,
    /// Shortcut: enable 15-bit colour mode.
    Mode15BitQuickOn,
    /// Shortcut: disable 15-bit colour mode.
    Mode15BitQuickOff,
}

/// One reading of the controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerSample {
    /// Raw controller word, shown by the controller state indicator.
    pub raw: u32,
    /// Decoded command, if the buttons held form one.
    pub command: Option<Command>,
}

/// Source of controller readings.
pub trait ControllerPort {
    /// Whether a new controller reading arrived since the last sample.
    fn new_data_available(&mut self) -> bool;
    /// Take the latest controller reading.
    fn sample(&mut self) -> ControllerSample;
}
