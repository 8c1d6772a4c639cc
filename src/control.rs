//! The per-frame control loop.

use crate::boot::{self, BootSource};
use crate::command::{Command, ControllerPort};
use crate::flash::ConfigStorage;
use crate::info::{VideoInfo, VideoTiming};
use crate::menu::{MenuAction, MenuTree, Navigator, NodeKind};
use crate::registers::{HardwareSync, RegisterBus};
use crate::render::{self, BANNER_AREA, BANNER_FRAMES, Renderer};
use crate::settings::layout::{
    DEBLUR, DEBLUR_FORCED_OFF, DEBLUR_FORCED_ON, LINE_DOUBLING, MODE_15BIT, MUTE_LATCH,
    QUICK_15BIT, QUICK_DEBLUR, SHOW_OSD,
};
use crate::settings::{Configuration, Field, FieldOp};
use crate::transmitter::Transmitter;
use crate::vsync::FrameSync;

/// Everything the control loop talks to.
#[derive(Debug)]
pub struct Peripherals<B, C, T, R, V, S> {
    /// Registers of the converter logic.
    pub registers: B,
    /// Controller readings.
    pub controller: C,
    /// HDMI transmitter.
    pub transmitter: T,
    /// On-screen display.
    pub renderer: R,
    /// Vertical sync wait.
    pub vsync: V,
    /// Configuration storage. `Option::None` if there is no flash.
    pub storage: S,
}

/// Owner of the configuration, the menu cursor and last frame's state.
pub struct ControlLoop<B, C, T, R, V, S> {
    registers: HardwareSync<B>,
    controller: C,
    transmitter: T,
    renderer: R,
    vsync: V,
    storage: S,
    config: Configuration,
    navigator: Navigator,
    boot_source: BootSource,
    new_controller_data: bool,
    controller_state: u32,
    previous_info: VideoInfo,
    previous_timing: VideoTiming,
    banner_frames: u16,
}

impl<B, C, T, R, V, S> ControlLoop<B, C, T, R, V, S>
where
    B: RegisterBus,
    C: ControllerPort,
    T: Transmitter,
    R: Renderer,
    V: FrameSync,
    S: ConfigStorage,
{
    /// Resolve the boot configuration, push it and bring up the transmitter.
    ///
    /// Blocks until the transmitter answers.
    pub fn boot(peripherals: Peripherals<B, C, T, R, V, S>, menu: MenuTree) -> Self {
        let Peripherals {
            registers,
            controller,
            mut transmitter,
            renderer,
            vsync,
            mut storage,
        } = peripherals;
        let mut registers = HardwareSync::new(registers);

        let info = registers.read_video_info();
        let forced_state = registers.pull_forced_state();
        let jumpers = registers.read_jumpers();
        let mut config = Configuration::new();
        let boot_source = boot::resolve(&mut config, &mut storage, info, forced_state, jumpers);
        registers.push(&config.snapshot());

        while !transmitter.is_ready() {}
        transmitter.init();
        let timing = VideoTiming::new(info, config.is_set(LINE_DOUBLING));
        transmitter.setup_timing(timing);

        Self {
            registers,
            controller,
            transmitter,
            renderer,
            vsync,
            storage,
            config,
            navigator: Navigator::new(menu),
            boot_source,
            new_controller_data: true,
            controller_state: 0,
            previous_info: VideoInfo::default(),
            previous_timing: timing,
            banner_frames: 0,
        }
    }

    /// Run forever, one iteration per video frame.
    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// Handle one frame, ending with the wait for the next vertical sync.
    ///
    /// Returns what the menu did with this frame's command.
    pub fn step(&mut self) -> MenuAction {
        let command = if self.new_controller_data {
            let sample = self.controller.sample();
            self.controller_state = sample.raw;
            sample.command
        } else {
            None
        };

        let info = self.registers.read_video_info();
        let timing = VideoTiming::new(info, self.config.is_set(LINE_DOUBLING));
        if timing != self.previous_timing {
            #[cfg(feature = "defmt")]
            defmt::info!("video timing changed to {}", timing);
            self.transmitter.setup_timing(timing);
        }

        let action = if self.config.is_set(SHOW_OSD) {
            self.menu_frame(command, info)
        } else {
            self.closed_frame(command, info);
            MenuAction::None
        };

        if self.navigator.node().kind != NodeKind::Text {
            self.renderer.draw_controller_state(self.controller_state);
        }

        self.previous_info = info;
        self.previous_timing = timing;
        self.registers.push(&self.config.snapshot());

        if !self.transmitter.monitor_present() {
            #[cfg(feature = "defmt")]
            defmt::warn!("monitor lost, reinitialising transmitter");
            self.transmitter.init();
        }

        self.vsync.wait_for_frame();
        self.new_controller_data = self.controller.new_data_available();
        action
    }

    fn menu_frame(&mut self, command: Option<Command>, info: VideoInfo) -> MenuAction {
        let mut command = command;
        if self.banner_frames > 0 {
            // Any command only dismisses the banner.
            if command.is_some() {
                command = None;
                self.banner_frames = 1;
            }
            if self.banner_frames == 1 {
                self.renderer.clear_area(BANNER_AREA);
            }
            self.banner_frames -= 1;
        }

        let action = self
            .navigator
            .navigate(command, &mut self.config, &mut self.storage);
        match action {
            MenuAction::Mute => self.config.set_flag(MUTE_LATCH),
            MenuAction::Unmute => self.config.clear_flag(MUTE_LATCH),
            MenuAction::Close => self.config.clear_flag(SHOW_OSD),
            MenuAction::NewOverlay => {
                self.draw_page();
                self.banner_frames = 0;
            }
            MenuAction::NewSelection => {
                self.renderer
                    .draw_selection(self.navigator.node(), self.navigator.selection());
            }
            MenuAction::Banner(outcome) => {
                render::draw_banner(&mut self.renderer, outcome);
                self.banner_frames = BANNER_FRAMES;
            }
            MenuAction::NewConfigValue | MenuAction::None => {}
        }

        self.refresh_page(
            info,
            action == MenuAction::NewOverlay,
            matches!(
                action,
                MenuAction::NewConfigValue | MenuAction::NewSelection
            ),
        );
        action
    }

    fn closed_frame(&mut self, command: Option<Command>, info: VideoInfo) {
        let Some(command) = command else { return };

        if command == Command::OpenMenu {
            self.draw_page();
            self.config.set_flag(SHOW_OSD);
            self.config.clear_flag(MUTE_LATCH);
            self.banner_frames = 0;
            self.refresh_page(info, true, false);
        }

        if self.config.is_set(QUICK_DEBLUR) && !info.interlaced() {
            match command {
                Command::DeblurQuickOn => self.edit(DEBLUR, FieldOp::Set(DEBLUR_FORCED_ON)),
                Command::DeblurQuickOff => self.edit(DEBLUR, FieldOp::Set(DEBLUR_FORCED_OFF)),
                _ => {}
            }
        }

        if self.config.is_set(QUICK_15BIT) {
            match command {
                Command::Mode15BitQuickOn => self.config.set_flag(MODE_15BIT),
                Command::Mode15BitQuickOff => self.config.clear_flag(MODE_15BIT),
                _ => {}
            }
        }
    }

    fn draw_page(&mut self) {
        let node = self.navigator.node();
        render::draw_page(&mut self.renderer, node, &mut self.config);
        self.renderer
            .draw_selection(node, self.navigator.selection());
    }

    fn refresh_page(&mut self, info: VideoInfo, new_overlay: bool, edited: bool) {
        let node = self.navigator.node();
        match node.kind {
            NodeKind::Info if new_overlay || info != self.previous_info => {
                render::draw_video_info(&mut self.renderer, node, info, &self.config);
            }
            NodeKind::Config if new_overlay || edited => {
                render::draw_config_values(&mut self.renderer, node, &self.config);
            }
            _ => {}
        }
    }

    fn edit(&mut self, field: impl Into<Field>, op: FieldOp) {
        if let Err(_e) = self.config.apply(field, op) {
            #[cfg(feature = "defmt")]
            defmt::debug!("skipping configuration edit: {}", _e);
        }
    }

    /// The live configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The menu cursor.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Where the boot configuration came from.
    pub fn boot_source(&self) -> BootSource {
        self.boot_source
    }

    /// Whether the menu is open.
    pub fn menu_open(&self) -> bool {
        self.config.is_set(SHOW_OSD)
    }

    /// Frames left before the action banner is cleared.
    pub fn banner_frames(&self) -> u16 {
        self.banner_frames
    }

    /// The register bus.
    pub fn registers(&self) -> &B {
        self.registers.bus()
    }

    /// Mutable access to the register bus.
    pub fn registers_mut(&mut self) -> &mut B {
        self.registers.bus_mut()
    }

    /// The controller port.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// The transmitter.
    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }

    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The configuration storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
