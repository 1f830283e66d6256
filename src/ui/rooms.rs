use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::events::Room;

/// Single-select row of room chips
#[derive(Debug, Clone)]
pub struct RoomSelector {
    selected: Room,
    focused: bool,
}

impl RoomSelector {
    pub fn new(selected: Room) -> Self {
        Self {
            selected,
            focused: false,
        }
    }

    pub fn selected(&self) -> Room {
        self.selected
    }

    pub fn select(&mut self, room: Room) {
        if room != self.selected {
            tracing::debug!(%room, "room selected");
        }
        self.selected = room;
    }

    pub fn select_next(&mut self) {
        self.select(self.selected.next());
    }

    pub fn select_previous(&mut self) {
        self.select(self.selected.previous());
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }
}

impl Widget for &RoomSelector {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 2 {
            return;
        }

        let mut spans = Vec::new();
        for room in Room::all() {
            let style = if room == self.selected {
                let style = Style::default().fg(Color::White).bg(Color::Blue);
                if self.focused {
                    style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    style
                }
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {room} "), style));
            spans.push(Span::raw(" "));
        }

        let y = area.y + area.height.saturating_sub(1) / 2;
        buf.set_line(area.x + 1, y, &Line::from(spans), area.width.saturating_sub(1));
    }
}
