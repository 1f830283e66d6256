//! Conversation history display component

use crate::events::Role;
use crate::ui::conversation::format::{format_content, render_blocks};
use crate::ui::conversation::store::Message;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub const WELCOME_TITLE: &str = "Welcome to your Real Estate AI Assistant";
pub const WELCOME_BODY: &str = "Get instant help with listings, client qualification, market analysis, and more. Select a quick action above or type your question below.";

/// Inert buttons under every assistant message
pub const MESSAGE_ACTIONS: [&str; 4] = ["Copy", "Helpful", "Not helpful", "Regenerate"];

/// Message list widget. `scroll` counts rows up from the newest line.
pub struct ConversationHistory<'a> {
    pub messages: &'a [Message],
    pub scroll: usize,
    /// Animation frame of the typing indicator, `None` when no reply is pending
    pub typing: Option<usize>,
}

impl<'a> ConversationHistory<'a> {
    /// All rows for the current messages at `width`
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut all_lines: Vec<Line<'static>> = Vec::new();
        for message in self.messages {
            all_lines.extend(render_message(message, width));
            all_lines.push(Line::from(""));
        }

        if let Some(frame) = self.typing {
            let dots = match frame % 4 {
                0 => ".",
                1 => "..",
                2 => "...",
                _ => "",
            };
            all_lines.push(Line::from(vec![
                Span::styled(" ⌂ ", Style::default().fg(Color::White).bg(Color::Blue)),
                Span::styled(" Kukan is typing", Style::default().fg(Color::Gray)),
                Span::styled(dots.to_string(), Style::default().fg(Color::Yellow)),
            ]));
        }

        all_lines
    }

    /// Largest useful scroll offset for a view of `height` rows
    pub fn max_scroll(&self, width: u16, height: u16) -> usize {
        self.lines(width).len().saturating_sub(height as usize)
    }
}

fn render_message(message: &Message, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let timestamp = message
        .created_at
        .with_timezone(&chrono::Local)
        .format("%H:%M")
        .to_string();

    let (author, badge, body_style, rule) = match message.role {
        Role::Ai => (
            "Kukan",
            Span::styled(" ⌂ ", Style::default().fg(Color::White).bg(Color::Blue)),
            Style::default().fg(Color::White),
            Color::Blue,
        ),
        Role::User => (
            "You",
            Span::styled(" ● ", Style::default().fg(Color::Black).bg(Color::Gray)),
            Style::default().fg(Color::Gray),
            Color::DarkGray,
        ),
    };

    lines.push(Line::from(vec![
        badge,
        Span::raw(" "),
        Span::styled(author, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {timestamp}"), Style::default().fg(Color::DarkGray)),
    ]));

    let body_width = width.saturating_sub(4);
    for line in render_blocks(&format_content(&message.content), body_width, body_style) {
        let mut spans = vec![Span::styled(" │ ", Style::default().fg(rule))];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }

    if message.role == Role::Ai {
        let mut spans = vec![Span::raw("   ")];
        for (i, action) in MESSAGE_ACTIONS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(*action, Style::default().fg(Color::DarkGray)));
        }
        lines.push(Line::from(spans));
    }

    lines
}

impl Widget for ConversationHistory<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.messages.is_empty() && self.typing.is_none() {
            let mut welcome = vec![
                Line::from(""),
                Line::from(Span::styled(" ⌂ ", Style::default().fg(Color::White).bg(Color::Blue))),
                Line::from(""),
                Line::from(Span::styled(WELCOME_TITLE, Style::default().add_modifier(Modifier::BOLD))),
                Line::from(""),
            ];
            welcome.extend(render_blocks(
                &format_content(WELCOME_BODY),
                area.width.saturating_sub(4).min(70),
                Style::default().fg(Color::Gray),
            ));

            let top = area.height.saturating_sub(welcome.len() as u16) / 2;
            for (i, line) in welcome.iter().enumerate() {
                let y = top + i as u16;
                if y >= area.height {
                    break;
                }
                let width = line.width() as u16;
                let x = area.x + area.width.saturating_sub(width) / 2;
                buf.set_line(x, area.y + y, line, area.width);
            }
            return;
        }

        let all_lines = self.lines(area.width);

        // Show the window ending `scroll` rows above the newest line
        let height = area.height as usize;
        let scroll = self.scroll.min(all_lines.len().saturating_sub(height));
        let end = all_lines.len() - scroll;
        let start = end.saturating_sub(height);

        for (i, line) in all_lines[start..end].iter().enumerate() {
            buf.set_line(area.x, area.y + i as u16, line, area.width);
        }

        if scroll > 0 {
            let marker = format!("↓ {scroll} more");
            let x = area.x + area.width.saturating_sub(marker.chars().count() as u16);
            buf.set_string(x, area.y + area.height - 1, marker, Style::default().fg(Color::Yellow));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(buf: &Buffer) -> String {
        buf.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn empty_history_shows_welcome() {
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        ConversationHistory { messages: &[], scroll: 0, typing: None }.render(area, &mut buf);
        assert!(text_of(&buf).contains("Welcome to your Real Estate AI Assistant"));
    }

    #[test]
    fn assistant_messages_get_actions_and_formatting() {
        let messages = vec![
            Message::user("Hello"),
            Message::ai("**Tip:** call first\n• bring keys"),
        ];
        let history = ConversationHistory { messages: &messages, scroll: 0, typing: None };
        let rendered: Vec<String> = history
            .lines(60)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert!(rendered.iter().any(|l| l.contains("You")));
        assert!(rendered.iter().any(|l| l.contains("Tip: call first")));
        assert!(rendered.iter().any(|l| l.contains("• bring keys")));
        assert_eq!(rendered.iter().filter(|l| l.contains("Regenerate")).count(), 1);
    }

    #[test]
    fn user_messages_use_the_same_formatting() {
        let messages = vec![Message::user("Compare:\n- **garden** size\n3. parking")];
        let history = ConversationHistory { messages: &messages, scroll: 0, typing: None };
        let lines = history.lines(60);
        let rendered: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert!(rendered.iter().any(|l| l.contains("- garden size")));
        assert!(rendered.iter().any(|l| l.contains("1. parking")));
        assert!(!rendered.iter().any(|l| l.contains("**")));
        assert!(!rendered.iter().any(|l| l.contains("Regenerate")));
        let bold = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .find(|span| span.content == "garden")
            .unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn newest_lines_stay_visible() {
        let messages: Vec<Message> = (0..20).map(|i| Message::user(format!("line {i}"))).collect();
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        ConversationHistory { messages: &messages, scroll: 0, typing: Some(2) }.render(area, &mut buf);

        let text = text_of(&buf);
        assert!(text.contains("line 19"));
        assert!(text.contains("Kukan is typing..."));
        assert!(!text.contains("line 0 "));
    }

    #[test]
    fn scroll_reveals_older_lines() {
        let messages: Vec<Message> = (0..20).map(|i| Message::user(format!("line {i}"))).collect();
        let history = ConversationHistory { messages: &messages, scroll: 0, typing: None };
        let max = history.max_scroll(40, 6);

        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        ConversationHistory { messages: &messages, scroll: max, typing: None }.render(area, &mut buf);
        assert!(text_of(&buf).contains("line 0"));
    }
}
