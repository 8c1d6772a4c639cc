use std::path::PathBuf;

use crate::util;

use clap::Parser;

/// Simulator for the N64Adv controller
///
/// Runs the controller's boot sequence and frame loop against simulated
/// converter logic, printing every register write, transmitter call and
/// on-screen draw.
///
/// The configuration flash can be backed by a file, which is created on the
/// first save and can be decoded with the show command.
#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Debug, Parser)]
pub(crate) enum Commands {
    /// Boot the controller and run the frame loop.
    Run(RunArgs),
    /// Decode the configuration records in a flash image.
    Show {
        /// Flash image written by the run command.
        image: PathBuf,
    },
    /// Print the default configuration words.
    Defaults,
}

#[derive(Debug, clap::Args)]
pub(crate) struct RunArgs {
    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 16)]
    pub(crate) frames: u32,
    /// Jumper reading in hexadecimal (6 bits)
    #[arg(short, long, default_value = "0x00", value_parser = util::u8_from_hex)]
    pub(crate) jumpers: u8,
    /// Forced-state register in hexadecimal
    #[arg(long, default_value = "0x00", value_parser = util::u32_from_hex)]
    pub(crate) forced_state: u32,
    /// Start the logic in fallback mode.
    #[arg(long)]
    pub(crate) fallback: bool,
    /// Simulate PAL input.
    #[arg(long)]
    pub(crate) pal: bool,
    /// Switch to interlaced input at this frame.
    #[arg(long)]
    pub(crate) interlaced_from: Option<u32>,
    /// Flash image backing the configuration storage
    ///
    /// Without it the controller runs without storage.
    #[arg(long)]
    pub(crate) flash: Option<PathBuf>,
    /// Controller command to issue, as FRAME:COMMAND (e.g. 2:open-menu)
    ///
    /// May be given several times.
    #[arg(short = 'c', long = "command", value_parser = util::scripted_command)]
    pub(crate) commands: Vec<util::ScriptedCommand>,
}
