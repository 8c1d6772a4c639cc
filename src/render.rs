//! Turning menu pages and configuration into draw calls.
//!
//! The text renderer itself lives in the logic core and is reached through
//! [`Renderer`]. This module decides what goes where.

use core::fmt::Write;

use heapless::String;

use crate::info::{VideoInfo, VideoMode};
use crate::menu::{EntryTarget, MenuNode, Outcome};
use crate::settings::Configuration;
use crate::settings::layout::SHOW_LOGO;

/// Text colours of the on-screen display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontColor {
    /// Regular text.
    White,
    /// Settings that differ from the stored configuration.
    Yellow,
    /// Successful action.
    Green,
    /// Failed action.
    Red,
    /// Aborted action.
    Magenta,
    /// Inactive text.
    Grey,
}

/// Background colours of the on-screen display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackgroundColor {
    /// The overlay's usual translucent background.
    Standard,
    /// No background.
    Transparent,
}

/// A rectangle of character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextArea {
    /// Leftmost column.
    pub column: u8,
    /// Top row.
    pub row: u8,
    /// Width in characters.
    pub width: u8,
    /// Height in rows.
    pub height: u8,
}

/// On-screen display renderer.
pub trait Renderer {
    /// Draw the frame, title, header, footer and entry labels of `node`.
    fn draw_overlay(&mut self, node: &MenuNode);
    /// Move the selection cursor to entry `selection` of `node`.
    fn draw_selection(&mut self, node: &MenuNode, selection: u8);
    /// Print `text` starting at `column`, `row`.
    fn draw_text(
        &mut self,
        column: u8,
        row: u8,
        background: BackgroundColor,
        color: FontColor,
        text: &str,
    );
    /// Blank `area`.
    fn clear_area(&mut self, area: TextArea);
    /// Update the controller state indicator.
    fn draw_controller_state(&mut self, raw: u32);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw_overlay(&mut self, node: &MenuNode) {
        R::draw_overlay(self, node)
    }

    fn draw_selection(&mut self, node: &MenuNode, selection: u8) {
        R::draw_selection(self, node, selection)
    }

    fn draw_text(
        &mut self,
        column: u8,
        row: u8,
        background: BackgroundColor,
        color: FontColor,
        text: &str,
    ) {
        R::draw_text(self, column, row, background, color, text)
    }

    fn clear_area(&mut self, area: TextArea) {
        R::clear_area(self, area)
    }

    fn draw_controller_state(&mut self, raw: u32) {
        R::draw_controller_state(self, raw)
    }
}

/// Row of the first entry or body line.
pub const FIRST_ROW: u8 = 3;
/// Column where setting values and info values start.
pub const VALUE_COLUMN: u8 = 22;
/// Width of the value column.
pub const VALUE_WIDTH: u8 = 12;
/// Where action results are shown.
pub const BANNER_AREA: TextArea = TextArea {
    column: 22,
    row: 12,
    width: 12,
    height: 1,
};
/// Frames an action result stays on screen.
pub const BANNER_FRAMES: u16 = 256;

/// Draw the overlay of `node` and show the logo if the page has a header.
pub fn draw_page<R: Renderer>(renderer: &mut R, node: &MenuNode, config: &mut Configuration) {
    renderer.draw_overlay(node);
    if node.header.is_some() {
        config.set_flag(SHOW_LOGO);
    } else {
        config.clear_flag(SHOW_LOGO);
    }
}

/// Show the result of a menu action.
pub fn draw_banner<R: Renderer>(renderer: &mut R, outcome: Outcome) {
    let (color, text) = match outcome {
        Outcome::Done => (FontColor::Green, "< Success >"),
        Outcome::Failed => (FontColor::Red, "< Failed >"),
        Outcome::Aborted => (FontColor::Magenta, "< Aborted >"),
    };
    renderer.clear_area(BANNER_AREA);
    renderer.draw_text(
        BANNER_AREA.column,
        BANNER_AREA.row,
        BackgroundColor::Standard,
        color,
        text,
    );
}

/// Print the current value of each setting on a config page.
///
/// Settings that differ from the stored configuration are highlighted.
pub fn draw_config_values<R: Renderer>(renderer: &mut R, node: &MenuNode, config: &Configuration) {
    renderer.clear_area(TextArea {
        column: VALUE_COLUMN,
        row: FIRST_ROW,
        width: VALUE_WIDTH,
        height: node.entries.len() as u8,
    });
    for (row, entry) in (FIRST_ROW..).zip(node.entries) {
        let EntryTarget::Config(setting) = entry.target else {
            continue;
        };
        let value = config.value(setting.field);
        let color = if config.field_changed(setting.field) {
            FontColor::Yellow
        } else {
            FontColor::White
        };
        let mut text: String<8> = String::new();
        let label = match setting.label(value) {
            Some(label) => label,
            None => {
                if write!(&mut text, "{value}").is_err() {
                    continue;
                }
                text.as_str()
            }
        };
        renderer.draw_text(VALUE_COLUMN, row, BackgroundColor::Standard, color, label);
    }
}

/// Print the live video status on an info page.
pub fn draw_video_info<R: Renderer>(
    renderer: &mut R,
    node: &MenuNode,
    info: VideoInfo,
    config: &Configuration,
) {
    use crate::settings::layout::LINE_DOUBLING;

    let mut mode: String<12> = String::new();
    let lines = match (info.mode(), info.interlaced()) {
        (VideoMode::Ntsc, false) => "240p",
        (VideoMode::Ntsc, true) => "480i",
        (VideoMode::Pal, false) => "288p",
        (VideoMode::Pal, true) => "576i",
    };
    let standard = match info.mode() {
        VideoMode::Ntsc => "NTSC",
        VideoMode::Pal => "PAL",
    };
    if write!(&mut mode, "{standard} {lines}").is_err() {
        mode.clear();
    }

    let yes_no = |b: bool| if b { "Yes" } else { "No" };
    let values = [
        mode.as_str(),
        yes_no(info.interlaced()),
        if config.is_set(LINE_DOUBLING) {
            "On"
        } else {
            "Off"
        },
        yes_no(info.fallback()),
    ];

    renderer.clear_area(TextArea {
        column: VALUE_COLUMN,
        row: FIRST_ROW,
        width: VALUE_WIDTH,
        height: values.len() as u8,
    });
    for (row, value) in (FIRST_ROW..).zip(values).take(node.text.len()) {
        renderer.draw_text(
            VALUE_COLUMN,
            row,
            BackgroundColor::Standard,
            FontColor::White,
            value,
        );
    }
}
