use std::ops::Range;

use crate::command::{CommandTarget, FormatCommand};
use crate::error::BufferError;
use crate::html;
use crate::model::{Atom, Block, BlockKind, InlineImage, Mark, Marks, Position, Selection};

/// Editable rich-text document with a caret
///
/// The buffer always holds at least one block. Offsets are counted in
/// atoms, so an inline image occupies exactly one caret step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextBuffer {
    blocks: Vec<Block>,
    selection: Selection,
    /// Marks for the next typed text after a toggle on a collapsed caret
    pending_marks: Option<Marks>,
}

impl Default for RichTextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextBuffer {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::default()],
            selection: Selection::default(),
            pending_marks: None,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn caret(&self) -> Position {
        self.selection.focus
    }

    /// Position just after the last atom of the last block
    pub fn end_position(&self) -> Position {
        let last = self.blocks.len() - 1;
        Position::new(last, self.blocks[last].len())
    }

    /// True when nothing visible would be published: no images and no
    /// non-whitespace characters
    pub fn is_blank(&self) -> bool {
        self.blocks
            .iter()
            .all(|block| block.atoms.iter().all(|atom| !atom.is_visible()))
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_html(&self) -> String {
        html::serialize(&self.blocks)
    }

    /// Marks that typed text would receive at the caret
    pub fn active_marks(&self) -> Marks {
        self.typing_marks()
    }

    pub fn set_caret(&mut self, at: Position) -> Result<(), BufferError> {
        self.check(at)?;
        self.selection = Selection::caret(at);
        self.pending_marks = None;
        Ok(())
    }

    pub fn select(&mut self, anchor: Position, focus: Position) -> Result<(), BufferError> {
        self.check(anchor)?;
        self.check(focus)?;
        self.selection = Selection { anchor, focus };
        self.pending_marks = None;
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.selection = Selection {
            anchor: Position::default(),
            focus: self.end_position(),
        };
        self.pending_marks = None;
    }

    /// Insert text at the caret, replacing any selection. `\n` starts a
    /// new block the way Enter does.
    pub fn insert_text(&mut self, text: &str) {
        self.delete_selection();
        let marks = self.typing_marks();

        for ch in text.chars() {
            match ch {
                '\r' => {}
                '\n' => self.split_block(),
                _ => {
                    let caret = self.caret();
                    self.blocks[caret.block]
                        .atoms
                        .insert(caret.offset, Atom::Char { ch, marks });
                    self.selection = Selection::caret(Position::new(caret.block, caret.offset + 1));
                }
            }
        }

        self.pending_marks = Some(marks);
    }

    pub fn insert_paragraph_break(&mut self) {
        self.delete_selection();
        self.split_block();
    }

    /// Splice an image at the caret, replacing any selection
    pub fn insert_image(&mut self, image: InlineImage) {
        self.delete_selection();
        let caret = self.caret();
        self.blocks[caret.block]
            .atoms
            .insert(caret.offset, Atom::Image(image));
        self.selection = Selection::caret(Position::new(caret.block, caret.offset + 1));
    }

    /// Backspace: removes the selection, or the atom before the caret.
    /// At the start of a list item or heading it resets the block to a
    /// paragraph; at the start of a paragraph it joins with the previous
    /// block.
    pub fn delete_backward(&mut self) {
        self.pending_marks = None;
        if self.delete_selection() {
            return;
        }

        let caret = self.caret();
        if caret.offset > 0 {
            self.blocks[caret.block].atoms.remove(caret.offset - 1);
            self.selection = Selection::caret(Position::new(caret.block, caret.offset - 1));
        } else if self.blocks[caret.block].kind != BlockKind::Paragraph {
            self.blocks[caret.block].kind = BlockKind::Paragraph;
        } else if caret.block > 0 {
            let removed = self.blocks.remove(caret.block);
            let previous = &mut self.blocks[caret.block - 1];
            let joined_at = previous.len();
            previous.atoms.extend(removed.atoms);
            self.selection = Selection::caret(Position::new(caret.block - 1, joined_at));
        }
    }

    /// Remove the selected range; returns false for a collapsed selection
    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_collapsed() {
            return false;
        }

        let (start, end) = self.selection.ordered();
        if start.block == end.block {
            self.blocks[start.block]
                .atoms
                .drain(start.offset..end.offset);
        } else {
            let tail = self.blocks[end.block].atoms.split_off(end.offset);
            let head = &mut self.blocks[start.block].atoms;
            head.truncate(start.offset);
            head.extend(tail);
            self.blocks.drain(start.block + 1..=end.block);
        }

        self.selection = Selection::caret(start);
        true
    }

    pub fn apply(&mut self, command: FormatCommand) {
        match command.target() {
            CommandTarget::Inline(mark) => self.toggle_mark(mark),
            CommandTarget::Block(kind) => self.toggle_block(kind),
        }
    }

    fn check(&self, at: Position) -> Result<(), BufferError> {
        match self.blocks.get(at.block) {
            Some(block) if at.offset <= block.len() => Ok(()),
            _ => Err(BufferError::OutOfRange(at)),
        }
    }

    fn typing_marks(&self) -> Marks {
        if let Some(marks) = self.pending_marks {
            return marks;
        }

        let caret = self.caret();
        let atoms = &self.blocks[caret.block].atoms;
        atoms[..caret.offset]
            .iter()
            .rev()
            .find_map(Atom::marks)
            .or_else(|| atoms[caret.offset..].iter().find_map(Atom::marks))
            .unwrap_or_default()
    }

    fn split_block(&mut self) {
        let caret = self.caret();
        let block = &mut self.blocks[caret.block];
        let is_list = matches!(block.kind, BlockKind::BulletItem | BlockKind::OrderedItem);

        // Enter on an empty list item leaves the list
        if is_list && block.is_empty() {
            block.kind = BlockKind::Paragraph;
            return;
        }

        let tail = block.atoms.split_off(caret.offset);
        let kind = match block.kind {
            BlockKind::Heading(_) => BlockKind::Paragraph,
            other => other,
        };

        self.blocks
            .insert(caret.block + 1, Block { kind, atoms: tail });
        self.selection = Selection::caret(Position::new(caret.block + 1, 0));
    }

    fn spans(&self, start: Position, end: Position) -> Vec<(usize, Range<usize>)> {
        (start.block..=end.block)
            .map(|index| {
                let from = if index == start.block { start.offset } else { 0 };
                let to = if index == end.block {
                    end.offset
                } else {
                    self.blocks[index].len()
                };
                (index, from..to)
            })
            .collect()
    }

    fn toggle_mark(&mut self, mark: Mark) {
        if self.selection.is_collapsed() {
            let mut marks = self.typing_marks();
            marks.set(mark, !marks.has(mark));
            self.pending_marks = Some(marks);
            return;
        }

        let (start, end) = self.selection.ordered();
        let spans = self.spans(start, end);
        let all_marked = spans
            .iter()
            .flat_map(|(index, range)| self.blocks[*index].atoms[range.clone()].iter())
            .filter_map(Atom::marks)
            .all(|marks| marks.has(mark));

        for (index, range) in spans {
            for atom in &mut self.blocks[index].atoms[range] {
                if let Atom::Char { marks, .. } = atom {
                    marks.set(mark, !all_marked);
                }
            }
        }
    }

    fn toggle_block(&mut self, kind: BlockKind) {
        let (start, end) = self.selection.ordered();
        let touched = &mut self.blocks[start.block..=end.block];
        let next = if touched.iter().all(|block| block.kind == kind) {
            BlockKind::Paragraph
        } else {
            kind
        };

        for block in touched {
            block.kind = next;
        }
    }
}
