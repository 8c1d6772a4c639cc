use crate::menu::{
    ConfigEntry, Entry, EntryTarget, MenuFunction, MenuNode, MenuTree, NodeId, NodeKind,
};
use crate::settings::Field;
use crate::settings::layout::{
    BOB_480I, DEBLUR, IMAGE_240P, IMAGE_480I, ImageFields, LINE_DOUBLING, MODE_15BIT,
    QUICK_15BIT, QUICK_DEBLUR, USE_IGR, VIDEO_FORMAT,
};

const HOME: NodeId = NodeId::new(0);
const VIDEO_INFO: NodeId = NodeId::new(1);
const OUTPUT: NodeId = NodeId::new(2);
const IMAGE_240P_PAGE: NodeId = NodeId::new(3);
const IMAGE_480I_PAGE: NodeId = NodeId::new(4);
const MISC: NodeId = NodeId::new(5);
const SAVE_LOAD: NodeId = NodeId::new(6);
const ABOUT: NodeId = NodeId::new(7);

const HEADER: Option<&str> = Some("N64 Advanced");
const NAV_FOOTER: Option<&str> = Some("A: enter  B: back  Start: close");
const EDIT_FOOTER: Option<&str> = Some("Left/Right: change  B: back");

const OFF_ON: &[&str] = &["Off", "On"];
const VIDEO_FORMATS: &[&str] = &["RGBS", "RGsB", "YPbPr"];
const DEBLUR_MODES: &[&str] = &["Auto", "Off", "On"];
const SCANLINE_STRENGTHS: &[&str] = &["Off", "25%", "50%", "100%"];
const SCANLINE_IDS: &[&str] = &["Even", "Odd"];
const GAMMA_VALUES: &[&str] = &[
    "0.75", "0.80", "0.85", "0.90", "0.95", "1.00", "1.05", "1.10", "1.15",
];

const fn config(label: &'static str, field: Field, labels: &'static [&'static str]) -> Entry {
    Entry {
        label,
        target: EntryTarget::Config(ConfigEntry { field, labels }),
    }
}

const fn submenu(label: &'static str, node: NodeId) -> Entry {
    Entry {
        label,
        target: EntryTarget::Submenu(node),
    }
}

const fn function(label: &'static str, function: MenuFunction) -> Entry {
    Entry {
        label,
        target: EntryTarget::Function(function),
    }
}

const fn image_entries(image: ImageFields) -> [Entry; 3] {
    [
        config(
            "Scanline strength",
            Field::Value(image.scanline_strength),
            SCANLINE_STRENGTHS,
        ),
        config("Scanline id", Field::Flag(image.scanline_id), SCANLINE_IDS),
        config("Gamma", Field::Value(image.gamma), GAMMA_VALUES),
    ]
}

const HOME_ENTRIES: &[Entry] = &[
    submenu("Video info", VIDEO_INFO),
    submenu("Output config", OUTPUT),
    submenu("240p image", IMAGE_240P_PAGE),
    submenu("480i image", IMAGE_480I_PAGE),
    submenu("Miscellaneous", MISC),
    submenu("Save / load", SAVE_LOAD),
    submenu("About", ABOUT),
];

const OUTPUT_ENTRIES: &[Entry] = &[
    config("Video format", Field::Value(VIDEO_FORMAT), VIDEO_FORMATS),
    config("Line doubling", Field::Flag(LINE_DOUBLING), OFF_ON),
    config("480i bob", Field::Flag(BOB_480I), OFF_ON),
];

const IMAGE_240P_ENTRIES: &[Entry] = &image_entries(IMAGE_240P);
const IMAGE_480I_ENTRIES: &[Entry] = &image_entries(IMAGE_480I);

const MISC_ENTRIES: &[Entry] = &[
    config("15bit mode", Field::Flag(MODE_15BIT), OFF_ON),
    config("Deblur", Field::Value(DEBLUR), DEBLUR_MODES),
    config("Quick deblur", Field::Flag(QUICK_DEBLUR), OFF_ON),
    config("Quick 15bit mode", Field::Flag(QUICK_15BIT), OFF_ON),
    config("In-game reset", Field::Flag(USE_IGR), OFF_ON),
];

const SAVE_LOAD_ENTRIES: &[Entry] = &[
    function("Save configuration", MenuFunction::SaveConfig),
    function("Load configuration", MenuFunction::LoadConfig),
    function("Load defaults", MenuFunction::LoadDefaults),
];

const NODES: &[MenuNode] = &[
    MenuNode {
        header: HEADER,
        footer: NAV_FOOTER,
        entries: HOME_ENTRIES,
        ..MenuNode::new(NodeKind::Listing, "Main menu")
    },
    MenuNode {
        footer: Some("B: back"),
        parent: Some(HOME),
        text: &["Input mode", "Interlaced", "Line doubling", "Fallback mode"],
        ..MenuNode::new(NodeKind::Info, "Video info")
    },
    MenuNode {
        footer: EDIT_FOOTER,
        parent: Some(HOME),
        entries: OUTPUT_ENTRIES,
        ..MenuNode::new(NodeKind::Config, "Output config")
    },
    MenuNode {
        footer: EDIT_FOOTER,
        parent: Some(HOME),
        entries: IMAGE_240P_ENTRIES,
        ..MenuNode::new(NodeKind::Config, "240p/288p image")
    },
    MenuNode {
        footer: EDIT_FOOTER,
        parent: Some(HOME),
        entries: IMAGE_480I_ENTRIES,
        ..MenuNode::new(NodeKind::Config, "480i/576i image")
    },
    MenuNode {
        footer: EDIT_FOOTER,
        parent: Some(HOME),
        entries: MISC_ENTRIES,
        ..MenuNode::new(NodeKind::Config, "Miscellaneous")
    },
    MenuNode {
        footer: NAV_FOOTER,
        parent: Some(HOME),
        entries: SAVE_LOAD_ENTRIES,
        ..MenuNode::new(NodeKind::Listing, "Save / load")
    },
    MenuNode {
        header: HEADER,
        footer: Some("B: back"),
        parent: Some(HOME),
        text: &[
            "N64 video converter",
            "controller firmware",
            "",
            "Hold reset at power-up",
            "to start in fallback mode.",
        ],
        ..MenuNode::new(NodeKind::Text, "About")
    },
];

/// The converter's menu.
pub static STANDARD_MENU: MenuTree = MenuTree::new(NODES);
