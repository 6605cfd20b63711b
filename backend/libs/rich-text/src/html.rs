//! HTML fragment serialization.
//!
//! Output uses the same tags a browser's formatting commands produce:
//! `<p>`, `<hN>`, `<ul>/<ol>` with `<li>`, inline `<b>`, `<i>`, `<u>`, `<s>`
//! and `<img>`. Text and attribute values are escaped.

use crate::model::{Atom, Block, BlockKind, InlineImage, Marks};

/// Escape text content
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value
pub fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize blocks; a document without atoms yields an empty string
pub fn serialize(blocks: &[Block]) -> String {
    if blocks.iter().all(Block::is_empty) {
        return String::new();
    }

    let mut out = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in blocks {
        let list_tag = match block.kind {
            BlockKind::BulletItem => Some("ul"),
            BlockKind::OrderedItem => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                out.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        let tag = match block.kind {
            BlockKind::Paragraph => "p".to_string(),
            BlockKind::Heading(level) => format!("h{}", level.clamp(1, 6)),
            BlockKind::BulletItem | BlockKind::OrderedItem => "li".to_string(),
        };

        out.push_str(&format!("<{}>", tag));
        if block.is_empty() {
            out.push_str("<br>");
        } else {
            write_inlines(&mut out, &block.atoms);
        }
        out.push_str(&format!("</{}>", tag));
    }

    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

fn write_inlines(out: &mut String, atoms: &[Atom]) {
    let mut index = 0;
    while index < atoms.len() {
        match &atoms[index] {
            Atom::Image(image) => {
                write_image(out, image);
                index += 1;
            }
            Atom::Char { marks, .. } => {
                let run_marks = *marks;
                let mut text = String::new();
                while let Some(Atom::Char { ch, marks }) = atoms.get(index) {
                    if *marks != run_marks {
                        break;
                    }
                    text.push(*ch);
                    index += 1;
                }
                write_run(out, run_marks, &text);
            }
        }
    }
}

fn mark_tags(marks: Marks) -> Vec<&'static str> {
    let mut tags = Vec::with_capacity(4);
    if marks.bold {
        tags.push("b");
    }
    if marks.italic {
        tags.push("i");
    }
    if marks.underline {
        tags.push("u");
    }
    if marks.strikethrough {
        tags.push("s");
    }
    tags
}

fn write_run(out: &mut String, marks: Marks, text: &str) {
    let tags = mark_tags(marks);
    for tag in &tags {
        out.push_str(&format!("<{}>", tag));
    }
    out.push_str(&escape_text(text));
    for tag in tags.iter().rev() {
        out.push_str(&format!("</{}>", tag));
    }
}

fn write_image(out: &mut String, image: &InlineImage) {
    out.push_str(&format!(
        "<img src=\"{}\" alt=\"{}\">",
        escape_attr(&image.src),
        escape_attr(&image.alt)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;
    use crate::RichTextBuffer;

    #[test]
    fn test_text_is_escaped() {
        let mut buffer = RichTextBuffer::new();
        buffer.insert_text("<script>alert(1)</script> & co");
        assert_eq!(
            buffer.to_html(),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt; &amp; co</p>"
        );
    }

    #[test]
    fn test_attributes_are_escaped() {
        let mut out = String::new();
        write_image(&mut out, &InlineImage::new("x\" onerror=\"y", "it's"));
        assert_eq!(out, "<img src=\"x&quot; onerror=&quot;y\" alt=\"it&#39;s\">");
    }

    #[test]
    fn test_empty_block_between_content_keeps_line() {
        let mut buffer = RichTextBuffer::new();
        buffer.insert_text("a\n\nb");
        assert_eq!(buffer.to_html(), "<p>a</p><p><br></p><p>b</p>");
    }

    #[test]
    fn test_switching_list_kinds_closes_previous_list() {
        let mut buffer = RichTextBuffer::new();
        buffer.insert_text("a\nb");
        buffer.set_caret(Position::new(0, 0)).unwrap();
        buffer.apply(crate::FormatCommand::BulletList);
        buffer.set_caret(Position::new(1, 0)).unwrap();
        buffer.apply(crate::FormatCommand::NumberedList);
        assert_eq!(
            buffer.to_html(),
            "<ul><li>a</li></ul><ol><li>b</li></ol>"
        );
    }
}
