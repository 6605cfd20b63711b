//! Rich-text buffer for the board composer.
//!
//! Browsers give `contenteditable` plus `execCommand`; outside a browser the
//! same authoring surface needs an explicit document model. This crate keeps
//! the document as blocks of atoms (marked characters and inline images),
//! tracks a caret/selection, applies the composer command set and
//! serializes the result to an HTML fragment.
//!
//! # Example
//!
//! ```
//! use rich_text::{FormatCommand, Position, RichTextBuffer};
//!
//! let mut buffer = RichTextBuffer::new();
//! buffer.insert_text("Hello world");
//! buffer.select(Position::new(0, 0), Position::new(0, 5)).unwrap();
//! buffer.apply(FormatCommand::Bold);
//! assert_eq!(buffer.to_html(), "<p><b>Hello</b> world</p>");
//! ```

mod buffer;
mod command;
mod error;
pub mod html;
mod model;

pub use buffer::RichTextBuffer;
pub use command::FormatCommand;
pub use error::BufferError;
pub use model::{Atom, Block, BlockKind, InlineImage, Mark, Marks, Position, Selection};
