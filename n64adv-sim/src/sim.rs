//! Simulated converter logic, peripherals and flash.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};
use n64adv_controller::command::{Command, ControllerPort, ControllerSample};
use n64adv_controller::info::VideoTiming;
use n64adv_controller::menu::MenuNode;
use n64adv_controller::registers::{Register, RegisterBus};
use n64adv_controller::render::{BackgroundColor, FontColor, Renderer, TextArea};
use n64adv_controller::transmitter::Transmitter;
use n64adv_controller::vsync::FrameSync;

use crate::util::ScriptedCommand;

const SECTOR_SIZE: usize = 4096;
const FLASH_SIZE: usize = 2 * SECTOR_SIZE;

/// Converter logic registers. Config writes are printed when they change a value.
#[derive(Debug, Default)]
pub(crate) struct SimBus {
    pub(crate) config: [u32; 4],
    pub(crate) forced_state: u32,
    pub(crate) jumpers: u32,
    pub(crate) video_info: u32,
}

impl RegisterBus for SimBus {
    fn read(&mut self, register: Register) -> u32 {
        match register {
            Register::Config(category) => self.config[category.index()],
            Register::ForcedState => self.forced_state,
            Register::Jumpers => self.jumpers,
            Register::VideoInfo => self.video_info,
        }
    }

    fn write(&mut self, register: Register, value: u32) {
        if let Register::Config(category) = register {
            let slot = &mut self.config[category.index()];
            if *slot != value {
                println!("    logic: {category:?} = {value:#04x}");
                *slot = value;
            }
        }
    }
}

/// Controller replaying commands at fixed frames.
#[derive(Debug)]
pub(crate) struct ScriptedController {
    script: BTreeMap<u32, Command>,
    frame: u32,
}

impl ScriptedController {
    pub(crate) fn new(commands: &[ScriptedCommand]) -> Self {
        Self {
            script: commands.iter().map(|c| (c.frame, c.command)).collect(),
            frame: 1,
        }
    }
}

impl ControllerPort for ScriptedController {
    fn new_data_available(&mut self) -> bool {
        self.frame += 1;
        true
    }

    fn sample(&mut self) -> ControllerSample {
        let command = self.script.get(&self.frame).copied();
        if let Some(command) = command {
            println!("    controller: {command:?}");
        }
        ControllerSample {
            raw: command.map_or(0, |c| c as u32 + 1),
            command,
        }
    }
}

/// Transmitter printing every call.
#[derive(Debug, Default)]
pub(crate) struct ConsoleTransmitter {
    pub(crate) monitor_present: bool,
}

impl Transmitter for ConsoleTransmitter {
    fn is_ready(&mut self) -> bool {
        true
    }

    fn init(&mut self) {
        println!("    hdmi: init");
        self.monitor_present = true;
    }

    fn setup_timing(&mut self, timing: VideoTiming) {
        println!(
            "    hdmi: timing {:?}, line doubling {}",
            timing.mode, timing.line_doubling
        );
    }

    fn monitor_present(&mut self) -> bool {
        self.monitor_present
    }
}

/// Renderer printing every draw.
#[derive(Debug, Default)]
pub(crate) struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn draw_overlay(&mut self, node: &MenuNode) {
        println!("    osd: page {:?} ({:?})", node.title, node.kind);
        for entry in node.entries {
            println!("    osd:   {}", entry.label);
        }
        for line in node.text {
            println!("    osd:   {line}");
        }
    }

    fn draw_selection(&mut self, node: &MenuNode, selection: u8) {
        if let Some(entry) = node.entry(selection) {
            println!("    osd: > {}", entry.label);
        }
    }

    fn draw_text(
        &mut self,
        column: u8,
        row: u8,
        _background: BackgroundColor,
        color: FontColor,
        text: &str,
    ) {
        println!("    osd: [{column},{row}] {text} ({color:?})");
    }

    fn clear_area(&mut self, _area: TextArea) {}

    fn draw_controller_state(&mut self, _raw: u32) {}
}

/// Frame sync that counts frames instead of waiting.
#[derive(Debug, Default)]
pub(crate) struct CountingVsync {
    pub(crate) frames: u32,
}

impl FrameSync for CountingVsync {
    fn wait_for_frame(&mut self) {
        self.frames += 1;
    }
}

/// NOR flash held in memory and backed by a file.
#[derive(Debug)]
pub(crate) struct FileFlash {
    path: PathBuf,
    buf: Vec<u8>,
}

impl FileFlash {
    /// Load `path`, or start erased if it does not exist yet.
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let mut buf = if path.exists() {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
        } else {
            Vec::new()
        };
        buf.resize(FLASH_SIZE, 0xFF);
        Ok(Self {
            path: path.to_owned(),
            buf,
        })
    }

    /// Write the contents back to the backing file.
    pub(crate) fn persist(&self) -> anyhow::Result<()> {
        std::fs::write(&self.path, &self.buf)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

#[derive(Debug)]
pub(crate) struct OutOfBounds;

impl NorFlashError for OutOfBounds {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::OutOfBounds
    }
}

impl ErrorType for FileFlash {
    type Error = OutOfBounds;
}

impl ReadNorFlash for FileFlash {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let offset = offset as usize;
        let src = self
            .buf
            .get(offset..offset + bytes.len())
            .ok_or(OutOfBounds)?;
        bytes.copy_from_slice(src);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl NorFlash for FileFlash {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = SECTOR_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        self.buf
            .get_mut(from as usize..to as usize)
            .ok_or(OutOfBounds)?
            .fill(0xFF);
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let offset = offset as usize;
        let dst = self
            .buf
            .get_mut(offset..offset + bytes.len())
            .ok_or(OutOfBounds)?;
        // NOR flash can only clear bits.
        for (d, s) in dst.iter_mut().zip(bytes) {
            *d &= s;
        }
        Ok(())
    }
}
