use std::fmt;
use std::str::FromStr;

use crate::error::BufferError;
use crate::model::{BlockKind, Mark};

/// Heading level produced by the heading command
pub const HEADING_LEVEL: u8 = 3;

/// Composer toolbar commands
///
/// Names follow the browser `execCommand` vocabulary so toolbars written
/// against the browser keep working: `bold`, `italic`, `underline`,
/// `strikeThrough`, `insertUnorderedList`, `insertOrderedList`, `heading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    BulletList,
    NumberedList,
    Heading,
}

pub(crate) enum CommandTarget {
    Inline(Mark),
    Block(BlockKind),
}

impl FormatCommand {
    pub const ALL: [FormatCommand; 7] = [
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::StrikeThrough,
        FormatCommand::BulletList,
        FormatCommand::NumberedList,
        FormatCommand::Heading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::StrikeThrough => "strikeThrough",
            FormatCommand::BulletList => "insertUnorderedList",
            FormatCommand::NumberedList => "insertOrderedList",
            FormatCommand::Heading => "heading",
        }
    }

    pub(crate) fn target(&self) -> CommandTarget {
        match self {
            FormatCommand::Bold => CommandTarget::Inline(Mark::Bold),
            FormatCommand::Italic => CommandTarget::Inline(Mark::Italic),
            FormatCommand::Underline => CommandTarget::Inline(Mark::Underline),
            FormatCommand::StrikeThrough => CommandTarget::Inline(Mark::Strikethrough),
            FormatCommand::BulletList => CommandTarget::Block(BlockKind::BulletItem),
            FormatCommand::NumberedList => CommandTarget::Block(BlockKind::OrderedItem),
            FormatCommand::Heading => CommandTarget::Block(BlockKind::Heading(HEADING_LEVEL)),
        }
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatCommand {
    type Err = BufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(FormatCommand::Bold),
            "italic" => Ok(FormatCommand::Italic),
            "underline" => Ok(FormatCommand::Underline),
            "strikeThrough" | "strikethrough" => Ok(FormatCommand::StrikeThrough),
            "insertUnorderedList" => Ok(FormatCommand::BulletList),
            "insertOrderedList" => Ok(FormatCommand::NumberedList),
            "heading" | "formatBlock" => Ok(FormatCommand::Heading),
            other => Err(BufferError::UnknownCommand(other.to_string())),
        }
    }
}
