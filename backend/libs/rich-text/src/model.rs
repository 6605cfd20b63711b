use serde::{Deserialize, Serialize};
use std::fmt;

/// Inline formatting carried by every character atom
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

/// A single inline mark, used when toggling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl Marks {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strikethrough => self.strikethrough,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
            Mark::Strikethrough => self.strikethrough = on,
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Marks::default()
    }
}

/// Block-level structure of a line in the buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading(u8),
    BulletItem,
    OrderedItem,
}

/// Image embedded inline as a data reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub src: String,
    pub alt: String,
}

impl InlineImage {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// Smallest editable unit; caret offsets count atoms, not bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Char { ch: char, marks: Marks },
    Image(InlineImage),
}

impl Atom {
    pub fn marks(&self) -> Option<Marks> {
        match self {
            Atom::Char { marks, .. } => Some(*marks),
            Atom::Image(_) => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            Atom::Char { ch, .. } => !ch.is_whitespace(),
            Atom::Image(_) => true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub atoms: Vec<Atom>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            atoms: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn text(&self) -> String {
        self.atoms
            .iter()
            .filter_map(|atom| match atom {
                Atom::Char { ch, .. } => Some(*ch),
                Atom::Image(_) => None,
            })
            .collect()
    }
}

/// Caret location: block index and atom offset inside that block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

/// Anchor/focus pair; collapsed when both are equal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Start and end in document order
    pub fn ordered(&self) -> (Position, Position) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }
}
