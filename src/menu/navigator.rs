use crate::Error;
use crate::command::Command;
use crate::flash::{ConfigStorage, LoadOutcome};
use crate::menu::{EntryTarget, MAX_NODES, MenuFunction, MenuNode, MenuTree, NodeId, NodeKind};
use crate::settings::layout::{MUTE_LATCH, SHOW_LOGO, SHOW_OSD};
use crate::settings::{Category, Configuration, Field, FieldOp, load_defaults};

/// Result shown in the banner after running a [`MenuFunction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The action completed.
    Done,
    /// Storage works but the action did not succeed.
    Failed,
    /// There is no storage to act on.
    Aborted,
}

/// What the control loop has to do after a command was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Nothing changed.
    None,
    /// Hide the overlay.
    Mute,
    /// Show the overlay again.
    Unmute,
    /// Close the menu.
    Close,
    /// The page changed: redraw everything.
    NewOverlay,
    /// The selection moved: redraw the cursor.
    NewSelection,
    /// A setting on the current page changed.
    NewConfigValue,
    /// Show the result of an action.
    Banner(Outcome),
}

/// The menu cursor: the current page and the selection remembered for each page.
#[derive(Debug, Clone)]
pub struct Navigator {
    tree: MenuTree,
    current: NodeId,
    selections: [u8; MAX_NODES],
}

impl Navigator {
    /// Start at the root of `tree` with every selection on the first entry.
    pub fn new(tree: MenuTree) -> Self {
        Self {
            tree,
            current: NodeId::ROOT,
            selections: [0; MAX_NODES],
        }
    }

    /// The tree being navigated.
    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    /// Id of the current page.
    pub fn current(&self) -> NodeId {
        self.current
    }

    /// The current page.
    pub fn node(&self) -> &MenuNode {
        self.tree.node(self.current)
    }

    /// Selected entry on the current page.
    pub fn selection(&self) -> u8 {
        self.selections[self.current.index()]
    }

    fn enter(&mut self, node: NodeId) -> MenuAction {
        self.current = node;
        MenuAction::NewOverlay
    }

    fn back(&mut self) -> MenuAction {
        match self.node().parent {
            Some(parent) => self.enter(parent),
            None => MenuAction::Close,
        }
    }

    fn step_selection(&mut self, down: bool) -> MenuAction {
        let count = self.node().entries.len() as u8;
        if count == 0 {
            return MenuAction::None;
        }
        let selection = &mut self.selections[self.current.index()];
        *selection = match (down, *selection) {
            (true, s) if s + 1 >= count => 0,
            (true, s) => s + 1,
            (false, 0) => count - 1,
            (false, s) => (s - 1).min(count - 1),
        };
        MenuAction::NewSelection
    }

    /// Handle one command while the menu is open.
    ///
    /// Settings are edited in `config` directly. Save and load actions go to
    /// `storage`; a successful one marks the configuration's reference.
    pub fn navigate<S: ConfigStorage>(
        &mut self,
        command: Option<Command>,
        config: &mut Configuration,
        storage: &mut S,
    ) -> MenuAction {
        let Some(command) = command else {
            return MenuAction::None;
        };

        match command {
            Command::MuteMenu => return MenuAction::Mute,
            Command::UnmuteMenu => return MenuAction::Unmute,
            Command::CloseMenu => return MenuAction::Close,
            _ => {}
        }

        if matches!(self.node().kind, NodeKind::Text | NodeKind::Info) {
            return match command {
                Command::MenuBack | Command::MenuLeft => self.back(),
                _ => MenuAction::None,
            };
        }

        match command {
            Command::MenuUp => return self.step_selection(false),
            Command::MenuDown => return self.step_selection(true),
            Command::MenuBack => return self.back(),
            _ => {}
        }

        let Some(entry) = self.node().entry(self.selection()).copied() else {
            return MenuAction::None;
        };
        match (entry.target, command) {
            (EntryTarget::Submenu(child), Command::MenuEnter | Command::MenuRight) => {
                self.enter(child)
            }
            (EntryTarget::Config(setting), _) => edit(config, setting.field, command),
            (EntryTarget::Function(function), Command::MenuEnter | Command::MenuRight) => {
                MenuAction::Banner(run(function, config, storage))
            }
            _ => MenuAction::None,
        }
    }
}

fn edit(config: &mut Configuration, field: Field, command: Command) -> MenuAction {
    let op = match (field, command) {
        (Field::Flag(_), Command::MenuLeft | Command::MenuRight | Command::MenuEnter) => {
            FieldOp::Toggle
        }
        (Field::Value(_), Command::MenuRight) => FieldOp::Increment,
        (Field::Value(_), Command::MenuLeft) => FieldOp::Decrement,
        _ => return MenuAction::None,
    };
    match config.apply(field, op) {
        Ok(true) => MenuAction::NewConfigValue,
        Ok(false) | Err(_) => MenuAction::None,
    }
}

fn run<S: ConfigStorage>(
    function: MenuFunction,
    config: &mut Configuration,
    storage: &mut S,
) -> Outcome {
    match function {
        MenuFunction::SaveConfig => match storage.save(config) {
            Ok(()) => {
                config.mark_reference();
                Outcome::Done
            }
            Err(Error::StorageUnavailable) => Outcome::Aborted,
            Err(_) => Outcome::Failed,
        },
        MenuFunction::LoadConfig => {
            let menu_state = config.word(Category::MiscMenu) & MENU_STATE_MASK;
            match storage.load(config) {
                LoadOutcome::Loaded => {
                    // The stored menu flags describe the menu at save time.
                    let word = config.word(Category::MiscMenu) & !MENU_STATE_MASK;
                    config.set_word(Category::MiscMenu, word | menu_state);
                    config.mark_reference();
                    Outcome::Done
                }
                LoadOutcome::NoValidData => Outcome::Failed,
                LoadOutcome::Unavailable => Outcome::Aborted,
            }
        }
        MenuFunction::LoadDefaults => {
            load_defaults(config);
            Outcome::Done
        }
    }
}

const MENU_STATE_MASK: u8 = SHOW_OSD.set_mask() | SHOW_LOGO.set_mask() | MUTE_LATCH.set_mask();
