//! The on-screen menu: a fixed tree of pages and the cursor moving through it.
//!
//! Pages are stored in an arena ([`MenuTree`]) and refer to each other by
//! [`NodeId`]. The tree never changes at runtime; only the [`Navigator`]'s cursor
//! does.

mod navigator;
mod tree;

pub use navigator::{MenuAction, Navigator, Outcome};
pub use tree::STANDARD_MENU;

use crate::settings::Field;

/// Most pages a tree can hold.
pub const MAX_NODES: usize = 16;

/// Index of a page in its [`MenuTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(u8);

impl NodeId {
    /// The page shown when the menu is first opened.
    pub const ROOT: NodeId = NodeId(0);

    /// Page number `index`.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Position in the arena.
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// What a page shows and how it reacts to commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeKind {
    /// A list of entries leading to other pages or actions.
    Listing,
    /// A list of settings with their current values.
    Config,
    /// Live video status.
    Info,
    /// Static text.
    Text,
}

/// Actions run from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuFunction {
    /// Store the configuration.
    SaveConfig,
    /// Restore the stored configuration.
    LoadConfig,
    /// Reset the configuration to its defaults, without storing it.
    LoadDefaults,
}

/// A setting edited from a [`NodeKind::Config`] page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEntry {
    /// The edited field.
    pub field: Field,
    /// Display text for each value, indexed by value.
    pub labels: &'static [&'static str],
}

impl ConfigEntry {
    /// Display text for `value`, if there is one.
    pub fn label(&self, value: u8) -> Option<&'static str> {
        self.labels.get(value as usize).copied()
    }
}

/// Where selecting an entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTarget {
    /// Another page.
    Submenu(NodeId),
    /// A setting edited in place.
    Config(ConfigEntry),
    /// An action.
    Function(MenuFunction),
}

/// One selectable line of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    /// Text shown for the entry.
    pub label: &'static str,
    /// What the entry does.
    pub target: EntryTarget,
}

/// A page of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuNode {
    /// Page type.
    pub kind: NodeKind,
    /// Title line.
    pub title: &'static str,
    /// Header line. Pages with a header show the logo.
    pub header: Option<&'static str>,
    /// Footer line, usually a navigation hint.
    pub footer: Option<&'static str>,
    /// Page that [`crate::command::Command::MenuBack`] returns to.
    pub parent: Option<NodeId>,
    /// Selectable entries.
    pub entries: &'static [Entry],
    /// Body lines of text and info pages.
    pub text: &'static [&'static str],
}

impl MenuNode {
    /// An empty page of `kind`, to be filled in with struct update syntax.
    pub const fn new(kind: NodeKind, title: &'static str) -> Self {
        Self {
            kind,
            title,
            header: None,
            footer: None,
            parent: None,
            entries: &[],
            text: &[],
        }
    }

    /// Entry number `selection`, if the page has that many.
    pub fn entry(&self, selection: u8) -> Option<&Entry> {
        self.entries.get(selection as usize)
    }
}

/// The pages of a menu, rooted at [`NodeId::ROOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTree {
    nodes: &'static [MenuNode],
}

impl MenuTree {
    /// Wrap a page arena.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `nodes` is empty or
    /// longer than [`MAX_NODES`], or if a parent or submenu link points outside
    /// `nodes`.
    pub const fn new(nodes: &'static [MenuNode]) -> Self {
        assert!(
            !nodes.is_empty() && nodes.len() <= MAX_NODES,
            "Menu tree must hold between 1 and MAX_NODES pages."
        );
        let mut i = 0;
        while i < nodes.len() {
            if let Some(parent) = nodes[i].parent {
                assert!(parent.index() < nodes.len(), "Parent link outside the menu tree.");
            }
            let entries = nodes[i].entries;
            let mut e = 0;
            while e < entries.len() {
                if let EntryTarget::Submenu(child) = entries[e].target {
                    assert!(child.index() < nodes.len(), "Submenu link outside the menu tree.");
                }
                e += 1;
            }
            i += 1;
        }
        Self { nodes }
    }

    /// Page `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a page of this tree. Ids reached through the tree's
    /// own links always are.
    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.index()]
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every page with its id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MenuNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u8), node))
    }
}
