//! Prompt shortcuts shown before the first message

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickActionIcon {
    Document,
    Users,
    TrendingUp,
    Calendar,
    Mail,
    MapPin,
    Dollar,
    Image,
}

impl QuickActionIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            QuickActionIcon::Document => "📄",
            QuickActionIcon::Users => "👥",
            QuickActionIcon::TrendingUp => "📈",
            QuickActionIcon::Calendar => "📅",
            QuickActionIcon::Mail => "✉️",
            QuickActionIcon::MapPin => "📍",
            QuickActionIcon::Dollar => "💲",
            QuickActionIcon::Image => "🖼️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTag {
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
    Cyan,
    Emerald,
    Indigo,
}

impl ColorTag {
    pub fn color(self) -> Color {
        match self {
            ColorTag::Blue => Color::Blue,
            ColorTag::Green => Color::Green,
            ColorTag::Purple => Color::Magenta,
            ColorTag::Orange => Color::Rgb(234, 88, 12),
            ColorTag::Pink => Color::LightMagenta,
            ColorTag::Cyan => Color::Cyan,
            ColorTag::Emerald => Color::LightGreen,
            ColorTag::Indigo => Color::Rgb(79, 70, 229),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
    pub icon: QuickActionIcon,
    pub color: ColorTag,
}

pub const QUICK_ACTIONS: [QuickAction; 8] = [
    QuickAction {
        label: "Write Listing Description",
        prompt: "Help me write a compelling listing description for a property",
        icon: QuickActionIcon::Document,
        color: ColorTag::Blue,
    },
    QuickAction {
        label: "Qualify Buyer",
        prompt: "What questions should I ask to qualify a potential buyer?",
        icon: QuickActionIcon::Users,
        color: ColorTag::Green,
    },
    QuickAction {
        label: "Market Analysis",
        prompt: "Help me prepare a market analysis for a client",
        icon: QuickActionIcon::TrendingUp,
        color: ColorTag::Purple,
    },
    QuickAction {
        label: "Schedule Showing",
        prompt: "Create a professional showing schedule response template",
        icon: QuickActionIcon::Calendar,
        color: ColorTag::Orange,
    },
    QuickAction {
        label: "Follow-Up Email",
        prompt: "Write a follow-up email for a client who viewed a property yesterday",
        icon: QuickActionIcon::Mail,
        color: ColorTag::Pink,
    },
    QuickAction {
        label: "Neighborhood Info",
        prompt: "Help me describe the key features and amenities of a neighborhood",
        icon: QuickActionIcon::MapPin,
        color: ColorTag::Cyan,
    },
    QuickAction {
        label: "Price Negotiation",
        prompt: "Give me strategies for negotiating price with a seller/buyer",
        icon: QuickActionIcon::Dollar,
        color: ColorTag::Emerald,
    },
    QuickAction {
        label: "Social Media Post",
        prompt: "Create an engaging social media post for a new listing",
        icon: QuickActionIcon::Image,
        color: ColorTag::Indigo,
    },
];

pub const PRO_TIPS: [&str; 4] = [
    "Use the room selector to get more relevant responses",
    "Include specific property details for better descriptions",
    "Ask for templates to save time on repetitive tasks",
    "Request multiple versions to find the perfect wording",
];

const CARD_HEIGHT: u16 = 4;

/// Grid columns for a given width, mirroring a responsive 1/2/4 layout
pub fn columns_for(width: u16) -> usize {
    match width {
        w if w >= 96 => 4,
        w if w >= 48 => 2,
        _ => 1,
    }
}

/// Cursor over the quick action grid
#[derive(Debug, Clone, Default)]
pub struct QuickActionPicker {
    selected: usize,
    columns: Cell<usize>,
}

impl QuickActionPicker {
    pub fn new() -> Self {
        Self {
            selected: 0,
            columns: Cell::new(4),
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Remember the column count from the last layout so Up/Down move by rows
    pub fn set_width(&self, width: u16) {
        self.columns.set(columns_for(width));
    }

    pub fn move_by(&mut self, delta: isize) {
        let len = QUICK_ACTIONS.len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }

    pub fn move_rows(&mut self, rows: isize) {
        self.move_by(rows * self.columns.get().max(1) as isize);
    }

    /// Rows needed to draw the card grid at `width`
    pub fn required_height(width: u16, show_tips: bool) -> u16 {
        let tips = if show_tips { PRO_TIPS.len() as u16 + 3 } else { 0 };
        1 + grid_rows(width) * CARD_HEIGHT + tips
    }

    /// Rows needed for the one-line-per-action layout, tips left out
    pub fn compact_height(width: u16) -> u16 {
        1 + grid_rows(width)
    }
}

fn grid_rows(width: u16) -> u16 {
    QUICK_ACTIONS.len().div_ceil(columns_for(width)) as u16
}

/// Grid widget; `selected` is `None` while the grid is not focused.
/// `compact` draws one line per action and scrolls to the selected row.
pub struct QuickActionsPanel {
    pub selected: Option<usize>,
    pub show_tips: bool,
    pub compact: bool,
}

impl QuickActionsPanel {
    fn render_compact(&self, area: Rect, buf: &mut Buffer) {
        let columns = columns_for(area.width);
        let cell_width = area.width / columns as u16;
        let visible_rows = area.height.saturating_sub(1) as usize;
        if visible_rows == 0 || cell_width < 2 {
            return;
        }

        let selected_row = self.selected.map_or(0, |index| index / columns);
        let first_row = (selected_row + 1).saturating_sub(visible_rows);

        for (index, action) in QUICK_ACTIONS.iter().enumerate() {
            let row = index / columns;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }

            let label_style = if self.selected == Some(index) {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let line = Line::from(vec![
                Span::styled(action.icon.glyph(), Style::default().fg(action.color.color())),
                Span::raw(" "),
                Span::styled(action.label, label_style),
            ]);
            let x = area.x + (index % columns) as u16 * cell_width;
            let y = area.y + 1 + (row - first_row) as u16;
            buf.set_line(x, y, &line, cell_width - 1);
        }
    }
}

impl Widget for QuickActionsPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let heading = Line::from(Span::styled(
            "Quick Actions",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        buf.set_line(area.x, area.y, &heading, area.width);

        if self.compact {
            self.render_compact(area, buf);
            return;
        }

        let columns = columns_for(area.width);
        let card_width = area.width / columns as u16;
        let grid_top = area.y + 1;
        let bottom = area.y + area.height;

        for (index, action) in QUICK_ACTIONS.iter().enumerate() {
            let row = (index / columns) as u16;
            let col = (index % columns) as u16;
            let y = grid_top + row * CARD_HEIGHT;
            if y + CARD_HEIGHT > bottom {
                break;
            }

            let card = Rect::new(area.x + col * card_width, y, card_width, CARD_HEIGHT);
            let focused = self.selected == Some(index);
            let border = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let block = Block::default().borders(Borders::ALL).border_style(border);
            let inner = block.inner(card);
            block.render(card, buf);
            if inner.width == 0 || inner.height < 2 {
                continue;
            }

            let title = Line::from(vec![
                Span::styled(action.icon.glyph(), Style::default().fg(action.color.color())),
                Span::raw(" "),
                Span::styled(action.label, Style::default().add_modifier(Modifier::BOLD)),
            ]);
            buf.set_line(inner.x, inner.y, &title, inner.width);

            let prompt = Line::from(Span::styled(action.prompt, Style::default().fg(Color::Gray)));
            buf.set_line(inner.x, inner.y + 1, &prompt, inner.width);
        }

        if !self.show_tips {
            return;
        }

        let tips_top = grid_top + grid_rows(area.width) * CARD_HEIGHT;
        let tips_height = PRO_TIPS.len() as u16 + 3;
        if tips_top + tips_height > bottom {
            return;
        }

        let tips_area = Rect::new(area.x, tips_top, area.width, tips_height);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" 💡 Pro Tips ")
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(tips_area);
        block.render(tips_area, buf);
        if inner.width == 0 {
            return;
        }

        for (i, tip) in PRO_TIPS.iter().enumerate() {
            let line = Line::from(vec![
                Span::styled("• ", Style::default().fg(Color::Blue)),
                Span::raw(*tip),
            ]);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_columns_follow_width() {
        assert_eq!(columns_for(120), 4);
        assert_eq!(columns_for(60), 2);
        assert_eq!(columns_for(30), 1);
    }

    #[test]
    fn picker_moves_by_rows_and_wraps() {
        let mut picker = QuickActionPicker::new();
        picker.set_width(120);
        picker.move_rows(1);
        assert_eq!(QUICK_ACTIONS[picker.selected()].label, "Follow-Up Email");
        picker.move_by(4);
        assert_eq!(picker.selected(), 0);
        picker.move_by(-1);
        assert_eq!(QUICK_ACTIONS[picker.selected()].label, "Social Media Post");
    }

    #[test]
    fn panel_draws_labels_and_tips() {
        let width = 120;
        let area = Rect::new(0, 0, width, QuickActionPicker::required_height(width, true));
        let mut buf = Buffer::empty(area);
        QuickActionsPanel {
            selected: Some(1),
            show_tips: true,
            compact: false,
        }
        .render(area, &mut buf);

        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Quick Actions"));
        assert!(text.contains("Qualify Buyer"));
        assert!(text.contains("Social Media Post"));
        assert!(text.contains("Ask for templates"));
    }

    #[test]
    fn compact_panel_lists_every_action_in_few_rows() {
        let width = 80;
        let area = Rect::new(0, 0, width, QuickActionPicker::compact_height(width));
        assert_eq!(area.height, 5);
        let mut buf = Buffer::empty(area);
        QuickActionsPanel {
            selected: None,
            show_tips: true,
            compact: true,
        }
        .render(area, &mut buf);

        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        for action in QUICK_ACTIONS {
            assert!(text.contains(action.label), "{} missing", action.label);
        }
        assert!(!text.contains("Pro Tips"));
    }

    #[test]
    fn compact_panel_scrolls_to_the_selected_action() {
        let area = Rect::new(0, 0, 120, 2);
        let mut buf = Buffer::empty(area);
        QuickActionsPanel {
            selected: Some(7),
            show_tips: false,
            compact: true,
        }
        .render(area, &mut buf);

        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Social Media Post"));
        assert!(!text.contains("Write Listing Description"));
    }
}
