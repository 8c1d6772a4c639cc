#![allow(dead_code)]

// filename according to https://doc.rust-lang.org/book/ch11-03-test-organization.html
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
};
use n64adv_controller::command::{Command, ControllerPort, ControllerSample};
use n64adv_controller::flash::{FlashStorage, crc32};
use n64adv_controller::info::VideoTiming;
use n64adv_controller::menu::MenuNode;
use n64adv_controller::registers::{Register, RegisterBus};
use n64adv_controller::render::{BackgroundColor, FontColor, Renderer, TextArea};
use n64adv_controller::transmitter::Transmitter;
use n64adv_controller::vsync::FrameSync;
use n64adv_controller::{Category, ConfigStorage, Configuration, Peripherals, Snapshot};

pub const FLASH_SECTOR_SIZE: usize = 4096;
pub const WORD_SIZE: usize = 4;
/// Record length padded to [`WORD_SIZE`].
pub const RECORD_SPAN: usize = 12;

#[derive(Debug)]
pub struct Flash {
    pub buf: Vec<u8>,
    pub fail_after_operation: usize,
    /// ANDed into every written byte, simulating stuck bits.
    pub write_mask: u8,
    pub operations: Vec<Operation>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operation {
    Read { offset: u32, len: usize },
    Write { offset: u32, len: usize },
    Erase { offset: u32, len: usize },
}

impl Flash {
    pub fn new(sectors: usize) -> Self {
        Self {
            buf: vec![0xffu8; FLASH_SECTOR_SIZE * sectors],
            fail_after_operation: usize::MAX,
            write_mask: 0xff,
            operations: Vec::new(),
        }
    }

    pub fn new_with_fault(sectors: usize, fail_after_operation: usize) -> Self {
        Self {
            fail_after_operation,
            ..Self::new(sectors)
        }
    }

    /// Fail the `n`th operation from now (0 is the next one).
    pub fn fail_in(&mut self, n: usize) {
        self.fail_after_operation = self.operations.len() + n;
    }

    pub fn disable_faults(&mut self) {
        self.fail_after_operation = usize::MAX;
    }

    pub fn erases(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Erase { .. }))
            .count()
    }

    /// Place a hand-made record at the start of sector `slot`.
    pub fn put_record(&mut self, slot: usize, version: u8, sequence: u16, words: [u8; 4]) {
        let mut record = [0xffu8; RECORD_SPAN];
        record[0] = version;
        record[1..5].copy_from_slice(&words);
        record[5..7].copy_from_slice(&sequence.to_le_bytes());
        let checksum = crc32(&record[..7]);
        record[7..11].copy_from_slice(&checksum.to_le_bytes());
        let offset = slot * FLASH_SECTOR_SIZE;
        self.buf[offset..offset + RECORD_SPAN].copy_from_slice(&record);
    }

    fn fault(&self) -> bool {
        self.operations.len() >= self.fail_after_operation
    }
}

#[derive(Debug)]
pub struct FlashError;

impl NorFlashError for FlashError {
    fn kind(&self) -> NorFlashErrorKind {
        NorFlashErrorKind::Other
    }
}

impl ErrorType for Flash {
    type Error = FlashError;
}

impl ReadNorFlash for Flash {
    const READ_SIZE: usize = WORD_SIZE;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        assert_eq!(offset % Self::READ_SIZE as u32, 0);
        assert_eq!(bytes.len() % Self::READ_SIZE, 0);

        if self.fault() {
            return Err(FlashError);
        }
        self.operations.push(Operation::Read {
            offset,
            len: bytes.len(),
        });

        let offset = offset as usize;
        bytes.copy_from_slice(&self.buf[offset..offset + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl NorFlash for Flash {
    const WRITE_SIZE: usize = WORD_SIZE;

    const ERASE_SIZE: usize = FLASH_SECTOR_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        assert_eq!(from % Self::ERASE_SIZE as u32, 0);
        assert_eq!(to % Self::ERASE_SIZE as u32, 0);

        if self.fault() {
            return Err(FlashError);
        }
        self.operations.push(Operation::Erase {
            offset: from,
            len: (to - from) as usize,
        });

        for addr in from..to {
            self.buf[addr as usize] = 0xff;
        }
        Ok(())
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        assert_eq!(offset % Self::WRITE_SIZE as u32, 0);
        assert_eq!(bytes.len() % Self::WRITE_SIZE, 0);
        assert!(!bytes.is_empty());

        if self.fault() {
            return Err(FlashError);
        }
        self.operations.push(Operation::Write {
            offset,
            len: bytes.len(),
        });

        let offset = offset as usize;
        for (i, &val) in bytes.iter().enumerate() {
            // NOR flash can only flip bits from 1 to 0
            self.buf[offset + i] &= val & self.write_mask;
        }
        Ok(())
    }
}

/// Flash storage on a fresh two-sector device.
pub fn storage() -> FlashStorage<Flash> {
    FlashStorage::new(Flash::new(2), 0).expect("two sectors hold both slots")
}

/// Flash storage holding one saved record of `words`.
pub fn storage_with(words: [u8; 4]) -> FlashStorage<Flash> {
    let mut storage = storage();
    storage
        .save(&config_with(words))
        .expect("saving to a healthy flash");
    storage
}

pub fn config_with(words: [u8; 4]) -> Configuration {
    let mut config = Configuration::new();
    config.load_snapshot(Snapshot::from_words(words));
    config
}

/// Everything the mocks report, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// An output register changed value.
    ConfigWrite(Category, u32),
    TransmitterInit,
    SetupTiming(VideoTiming),
    Overlay(&'static str),
    Selection(u8),
    Text(String, FontColor),
    Clear(TextArea),
    ControllerState(u32),
    Frame,
}

pub type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Default)]
pub struct MockBus {
    pub config: [u32; 4],
    pub forced_state: u32,
    pub jumpers: u32,
    pub video_info: u32,
    log: Log,
}

impl RegisterBus for MockBus {
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
            if self.config[category.index()] != value {
                self.config[category.index()] = value;
                self.log
                    .borrow_mut()
                    .push(Event::ConfigWrite(category, value));
            }
        }
    }
}

#[derive(Debug)]
pub struct MockController {
    pub queue: VecDeque<Command>,
    pub ready: bool,
    pub samples: usize,
}

impl MockController {
    pub fn press(&mut self, command: Command) {
        self.queue.push_back(command);
    }
}

impl ControllerPort for MockController {
    fn new_data_available(&mut self) -> bool {
        self.ready
    }

    fn sample(&mut self) -> ControllerSample {
        self.samples += 1;
        let command = self.queue.pop_front();
        ControllerSample {
            raw: command.map_or(0, |c| 0x100 + c as u32),
            command,
        }
    }
}

#[derive(Debug)]
pub struct MockTransmitter {
    pub monitor: Rc<Cell<bool>>,
    log: Log,
}

impl Transmitter for MockTransmitter {
    fn is_ready(&mut self) -> bool {
        true
    }

    fn init(&mut self) {
        self.log.borrow_mut().push(Event::TransmitterInit);
    }

    fn setup_timing(&mut self, timing: VideoTiming) {
        self.log.borrow_mut().push(Event::SetupTiming(timing));
    }

    fn monitor_present(&mut self) -> bool {
        self.monitor.get()
    }
}

#[derive(Debug)]
pub struct MockRenderer {
    log: Log,
}

impl Renderer for MockRenderer {
    fn draw_overlay(&mut self, node: &MenuNode) {
        self.log.borrow_mut().push(Event::Overlay(node.title));
    }

    fn draw_selection(&mut self, _node: &MenuNode, selection: u8) {
        self.log.borrow_mut().push(Event::Selection(selection));
    }

    fn draw_text(
        &mut self,
        _column: u8,
        _row: u8,
        _background: BackgroundColor,
        color: FontColor,
        text: &str,
    ) {
        self.log
            .borrow_mut()
            .push(Event::Text(text.to_string(), color));
    }

    fn clear_area(&mut self, area: TextArea) {
        self.log.borrow_mut().push(Event::Clear(area));
    }

    fn draw_controller_state(&mut self, raw: u32) {
        self.log.borrow_mut().push(Event::ControllerState(raw));
    }
}

/// Frame sync that returns at once.
#[derive(Debug)]
pub struct InstantVsync {
    log: Log,
}

impl FrameSync for InstantVsync {
    fn wait_for_frame(&mut self) {
        self.log.borrow_mut().push(Event::Frame);
    }
}

/// Register inputs seen at boot.
#[derive(Debug, Default, Clone, Copy)]
pub struct Inputs {
    pub forced_state: u32,
    pub jumpers: u32,
    pub video_info: u32,
}

/// Handles kept by a test after the peripherals were moved into the loop.
#[derive(Debug, Default)]
pub struct Board {
    pub log: Log,
    pub monitor: Rc<Cell<bool>>,
}

impl Board {
    pub fn new() -> Self {
        let board = Self::default();
        board.monitor.set(true);
        board
    }

    pub fn peripherals<S: ConfigStorage>(
        &self,
        inputs: Inputs,
        storage: S,
    ) -> Peripherals<MockBus, MockController, MockTransmitter, MockRenderer, InstantVsync, S> {
        Peripherals {
            registers: MockBus {
                forced_state: inputs.forced_state,
                jumpers: inputs.jumpers,
                video_info: inputs.video_info,
                log: self.log.clone(),
                ..Default::default()
            },
            controller: MockController {
                queue: VecDeque::new(),
                ready: true,
                samples: 0,
            },
            transmitter: MockTransmitter {
                monitor: self.monitor.clone(),
                log: self.log.clone(),
            },
            renderer: MockRenderer {
                log: self.log.clone(),
            },
            vsync: InstantVsync {
                log: self.log.clone(),
            },
            storage,
        }
    }

    /// Events since the last call.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

/// The events of `events` that are draws of text.
pub fn texts(events: &[Event]) -> Vec<(String, FontColor)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Text(text, color) => Some((text.clone(), *color)),
            _ => None,
        })
        .collect()
}
