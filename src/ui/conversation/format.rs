//! Markdown-ish formatting for chat bubbles.
//!
//! Each line is classified on its own: a line containing `**` becomes a
//! paragraph with bold runs, `•`/`-` lines become bullets, `1.` lines become
//! numbered items, blank lines become breaks and anything else a paragraph.
//! Adjacent items of the same kind are then grouped into a single list.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Inline run of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Numbered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Nesting level derived from the leading indentation
    pub depth: usize,
    pub text: String,
}

/// Renderable unit produced from the message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    List { kind: ListKind, items: Vec<ListItem> },
    Break,
}

enum LineKind {
    Paragraph(Vec<Inline>),
    Item(ListKind, ListItem),
    Break,
}

fn classify_line(line: &str) -> LineKind {
    if line.contains("**") {
        let spans = line
            .split("**")
            .enumerate()
            .filter(|(_, part)| !part.is_empty())
            .map(|(i, part)| {
                if i % 2 == 1 {
                    Inline::Strong(part.to_string())
                } else {
                    Inline::Text(part.to_string())
                }
            })
            .collect();
        return LineKind::Paragraph(spans);
    }

    let trimmed = line.trim_start();
    let depth = (line.len() - trimmed.len()) / 2;

    if let Some(rest) = trimmed
        .strip_prefix('•')
        .or_else(|| trimmed.strip_prefix('-'))
    {
        return LineKind::Item(
            ListKind::Bullet,
            ListItem {
                depth,
                text: rest.trim().to_string(),
            },
        );
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix('.') {
            return LineKind::Item(
                ListKind::Numbered,
                ListItem {
                    depth,
                    text: rest.trim().to_string(),
                },
            );
        }
    }

    if trimmed.is_empty() {
        return LineKind::Break;
    }

    LineKind::Paragraph(vec![Inline::Text(line.trim_end().to_string())])
}

/// Split message text into blocks
pub fn format_content(content: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in content.split('\n') {
        match classify_line(line) {
            LineKind::Paragraph(spans) => blocks.push(Block::Paragraph(spans)),
            LineKind::Break => blocks.push(Block::Break),
            LineKind::Item(kind, item) => match blocks.last_mut() {
                Some(Block::List { kind: open, items }) if *open == kind => items.push(item),
                _ => blocks.push(Block::List {
                    kind,
                    items: vec![item],
                }),
            },
        }
    }

    blocks
}

/// A word plus whether it touches the previous word without whitespace
struct Piece {
    text: String,
    style: Style,
    joined: bool,
}

fn split_pieces(spans: &[(String, Style)]) -> Vec<Piece> {
    let mut pieces: Vec<Piece> = Vec::new();
    let mut after_space = true;

    for (text, style) in spans {
        let mut word = String::new();
        let mut joined = false;
        for ch in text.chars() {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    pieces.push(Piece {
                        text: std::mem::take(&mut word),
                        style: *style,
                        joined,
                    });
                }
                after_space = true;
            } else {
                if word.is_empty() {
                    joined = !after_space && !pieces.is_empty();
                    after_space = false;
                }
                word.push(ch);
            }
        }
        if !word.is_empty() {
            pieces.push(Piece {
                text: word,
                style: *style,
                joined,
            });
        }
    }

    pieces
}

/// Word-wrap styled spans, putting `first_prefix` on the first line and
/// `rest_prefix` on continuation lines
fn wrap_spans(
    spans: &[(String, Style)],
    width: usize,
    first_prefix: Span<'static>,
    rest_prefix: Span<'static>,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = vec![first_prefix.clone()];
    let mut used = 0usize;
    let mut avail = width
        .saturating_sub(first_prefix.content.chars().count())
        .max(1);

    for piece in split_pieces(spans) {
        let len = piece.text.chars().count();
        if piece.joined {
            used += len;
            current.push(Span::styled(piece.text, piece.style));
            continue;
        }

        let needed = if used == 0 { len } else { len + 1 };
        if used > 0 && used + needed > avail {
            lines.push(Line::from(std::mem::take(&mut current)));
            current.push(rest_prefix.clone());
            avail = width.saturating_sub(rest_prefix.content.chars().count()).max(1);
            used = 0;
        }

        if used > 0 {
            current.push(Span::raw(" "));
            used += 1;
        }
        used += len;
        current.push(Span::styled(piece.text, piece.style));
    }

    lines.push(Line::from(current));
    lines
}

/// Lay blocks out as terminal lines no wider than `width`
pub fn render_blocks(blocks: &[Block], width: u16, style: Style) -> Vec<Line<'static>> {
    let width = width as usize;
    let strong = style.add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for block in blocks {
        match block {
            Block::Break => lines.push(Line::from("")),
            Block::Paragraph(inlines) => {
                let spans: Vec<(String, Style)> = inlines
                    .iter()
                    .map(|inline| match inline {
                        Inline::Text(text) => (text.clone(), style),
                        Inline::Strong(text) => (text.clone(), strong),
                    })
                    .collect();
                lines.extend(wrap_spans(&spans, width, Span::raw(""), Span::raw("")));
            }
            Block::List { kind, items } => {
                for (index, item) in items.iter().enumerate() {
                    let indent = "  ".repeat(item.depth);
                    let marker = match kind {
                        ListKind::Bullet if item.depth == 0 => "• ".to_string(),
                        ListKind::Bullet => "◦ ".to_string(),
                        ListKind::Numbered => format!("{}. ", index + 1),
                    };
                    let continuation = " ".repeat(indent.chars().count() + marker.chars().count());
                    lines.extend(wrap_spans(
                        &[(item.text.clone(), style)],
                        width,
                        Span::styled(format!("{indent}{marker}"), style),
                        Span::raw(continuation),
                    ));
                }
            }
        }
    }

    lines
}

/// Flatten rendered lines into plain text, one line per row
pub fn to_plain_text(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
