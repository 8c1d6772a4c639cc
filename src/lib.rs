#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod boot;
pub mod command;
pub mod control;
mod error;
pub mod flash;
pub mod info;
pub mod menu;
pub mod registers;
pub mod render;
pub mod settings;
pub mod transmitter;
pub mod vsync;

pub use boot::BootSource;
pub use control::{ControlLoop, Peripherals};
pub use error::Error;
pub use flash::{ConfigStorage, FlashStorage, LoadOutcome};
pub use settings::{Category, Configuration, Snapshot};
