use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use strum::{EnumIter, IntoEnumIterator};

pub const TITLE: &str = "Kukan Home Assistant";
pub const SUBTITLE: &str = "Learn everything about this home";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum HeaderButton {
    Share,
    Minimize,
    Close,
}

impl HeaderButton {
    pub fn all() -> Vec<HeaderButton> {
        HeaderButton::iter().collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            HeaderButton::Share => "Share",
            HeaderButton::Minimize => "Minimize",
            HeaderButton::Close => "Close",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            HeaderButton::Share => "⇪",
            HeaderButton::Minimize => "▁",
            HeaderButton::Close => "✕",
        }
    }
}

/// Title bar of the expanded widget
pub struct HeaderBar {
    /// Highlighted button while the header has focus
    pub focused: Option<HeaderButton>,
}

impl HeaderBar {
    pub const HEIGHT: u16 = 4;
}

impl Widget for HeaderBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width < 2 {
            return;
        }

        let title = Line::from(vec![
            Span::styled(" ⌂ ", Style::default().fg(Color::White).bg(Color::Blue)),
            Span::raw(" "),
            Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
        ]);
        buf.set_line(inner.x + 1, inner.y, &title, inner.width.saturating_sub(1));

        if inner.height > 1 && inner.width > 5 {
            let subtitle = Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::Gray)));
            buf.set_line(inner.x + 5, inner.y + 1, &subtitle, inner.width.saturating_sub(5));
        }

        let mut spans = Vec::new();
        for button in HeaderButton::all() {
            let style = if self.focused == Some(button) {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", button.glyph()), style));
        }
        let width: u16 = spans.iter().map(|span| span.width() as u16).sum();
        if inner.width > width + 1 {
            let x = inner.x + inner.width - width - 1;
            buf.set_line(x, inner.y, &Line::from(spans), width);
        }
    }
}
