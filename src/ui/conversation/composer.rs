use crate::events::ViewMode;
use crate::ui::conversation::commands::{command_entries, parse_slash_command, CommandEntry, ParsedCommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};
use strum::{EnumIter, IntoEnumIterator};

pub const PLACEHOLDER: &str = "Ask Anything, e.g. nearby schools, grocery stores, features of this room";

/// Result returned when the user interacts with the conversation composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    Submitted(String),
    Command(ParsedCommand),
    /// Buffer content changed
    Edited,
    None,
}

/// Buttons under the expanded input. Everything except Send is decorative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum ToolbarButton {
    Attach,
    Photos,
    Floorplan,
    BookViewing,
    Daylight,
    Microphone,
    Send,
}

impl ToolbarButton {
    pub fn all() -> Vec<ToolbarButton> {
        ToolbarButton::iter().collect()
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ToolbarButton::Attach => "+",
            ToolbarButton::Photos => "▣",
            ToolbarButton::Floorplan => "⌗",
            ToolbarButton::BookViewing => "▦",
            ToolbarButton::Daylight => "☼",
            ToolbarButton::Microphone => "♪",
            ToolbarButton::Send => "Send ➤",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            ToolbarButton::Attach => "Attach",
            ToolbarButton::Photos => "View Photos",
            ToolbarButton::Floorplan => "View Floorplan",
            ToolbarButton::BookViewing => "Book a Viewing",
            ToolbarButton::Daylight => "Adjust daylight",
            ToolbarButton::Microphone => "Voice input",
            ToolbarButton::Send => "Send message",
        }
    }
}

/// State for the text area within the composer
#[derive(Debug, Clone, Default)]
pub struct TextAreaState {
    pub content: String,
    /// Cursor position in characters
    pub cursor_position: usize,
}

impl TextAreaState {
    fn byte_index(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_position);
        self.content.insert(at, c);
        self.cursor_position += 1;
    }

    /// Delete character before cursor
    fn backspace(&mut self) -> bool {
        if self.cursor_position == 0 {
            return false;
        }
        self.cursor_position -= 1;
        let at = self.byte_index(self.cursor_position);
        self.content.remove(at);
        true
    }

    /// Delete character at cursor
    fn delete(&mut self) -> bool {
        if self.cursor_position >= self.char_len() {
            return false;
        }
        let at = self.byte_index(self.cursor_position);
        self.content.remove(at);
        true
    }
}

/// Input area plus toolbar and slash command palette
pub struct ConversationComposer {
    state: TextAreaState,
    mode: ViewMode,
    has_focus: bool,
    toolbar_focus: Option<usize>,
    command_entries: Vec<CommandEntry>,
    filtered_commands: Vec<CommandEntry>,
    show_command_palette: bool,
    selected_command: Option<usize>,
}

impl ConversationComposer {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            state: TextAreaState::default(),
            mode,
            has_focus: true,
            toolbar_focus: None,
            command_entries: command_entries(),
            filtered_commands: Vec::new(),
            show_command_palette: false,
            selected_command: None,
        }
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                let newline = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
                // a fully typed command runs straight away
                if self.show_command_palette
                    && !self.is_complete_command()
                    && self.apply_selected_command()
                {
                    return ComposerResult::Edited;
                }
                if newline && !self.mode.is_minimized() {
                    self.state.insert_char('\n');
                    return ComposerResult::Edited;
                }
                return self.submit();
            }
            KeyCode::Up if self.show_command_palette => {
                self.move_command_selection(-1);
            }
            KeyCode::Down if self.show_command_palette => {
                self.move_command_selection(1);
            }
            KeyCode::Esc if self.show_command_palette => {
                self.close_command_palette();
            }
            KeyCode::Tab if self.show_command_palette => {
                if self.apply_selected_command() {
                    return ComposerResult::Edited;
                }
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return ComposerResult::None;
                }
                self.state.insert_char(c);
                self.sync_command_palette();
                return ComposerResult::Edited;
            }
            KeyCode::Backspace => {
                if self.state.backspace() {
                    self.sync_command_palette();
                    return ComposerResult::Edited;
                }
            }
            KeyCode::Delete => {
                if self.state.delete() {
                    self.sync_command_palette();
                    return ComposerResult::Edited;
                }
            }
            KeyCode::Left => {
                self.state.cursor_position = self.state.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.state.cursor_position < self.state.char_len() {
                    self.state.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                self.state.cursor_position = 0;
            }
            KeyCode::End => {
                self.state.cursor_position = self.state.char_len();
            }
            _ => {}
        }

        ComposerResult::None
    }

    /// Take the buffer if it holds something other than whitespace
    pub fn submit(&mut self) -> ComposerResult {
        if !self.can_send() {
            return ComposerResult::None;
        }

        let content = std::mem::take(&mut self.state.content);
        self.state.cursor_position = 0;
        self.close_command_palette();

        match parse_slash_command(&content) {
            Some(command) => ComposerResult::Command(command),
            None => ComposerResult::Submitted(content),
        }
    }

    pub fn can_send(&self) -> bool {
        !self.state.content.trim().is_empty()
    }

    fn sync_command_palette(&mut self) {
        let content = &self.state.content;
        let is_command = content.starts_with('/') && !content.contains(char::is_whitespace);
        if is_command {
            if !self.show_command_palette {
                self.show_command_palette = true;
                self.selected_command = Some(0);
            }
            self.refresh_command_palette();
        } else {
            self.close_command_palette();
        }
    }

    fn close_command_palette(&mut self) {
        self.show_command_palette = false;
        self.filtered_commands.clear();
        self.selected_command = None;
    }

    fn refresh_command_palette(&mut self) {
        let query = self.state.content.trim_start_matches('/').to_lowercase();
        self.filtered_commands = self
            .command_entries
            .iter()
            .filter(|entry| query.is_empty() || entry.keyword.starts_with(&query))
            .copied()
            .collect();

        if self.filtered_commands.is_empty() {
            self.selected_command = None;
        } else {
            let index = self.selected_command.unwrap_or(0);
            self.selected_command = Some(index.min(self.filtered_commands.len() - 1));
        }
    }

    fn move_command_selection(&mut self, delta: isize) {
        if self.filtered_commands.is_empty() {
            self.selected_command = None;
            return;
        }

        let current = self.selected_command.unwrap_or(0) as isize;
        let len = self.filtered_commands.len() as isize;
        let next = (current + delta).rem_euclid(len);
        self.selected_command = Some(next as usize);
    }

    fn is_complete_command(&self) -> bool {
        let typed = self.state.content.trim().trim_start_matches('/');
        self.command_entries.iter().any(|entry| entry.keyword == typed)
    }

    fn apply_selected_command(&mut self) -> bool {
        let Some(entry) = self
            .selected_command
            .and_then(|index| self.filtered_commands.get(index))
            .copied()
        else {
            return false;
        };

        self.state.content = format!("/{} ", entry.keyword);
        self.state.cursor_position = self.state.char_len();
        self.close_command_palette();
        true
    }

    /// Replace the buffer, e.g. with a quick action prompt
    pub fn set_content(&mut self, content: &str) {
        self.state.content = content.to_string();
        self.state.cursor_position = self.state.char_len();
        self.close_command_palette();
    }

    #[cfg(test)]
    pub fn content(&self) -> &str {
        &self.state.content
    }

    pub fn is_empty(&self) -> bool {
        self.state.content.is_empty()
    }

    pub fn is_palette_open(&self) -> bool {
        self.show_command_palette
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        if mode.is_minimized() {
            self.toolbar_focus = None;
        }
    }

    /// Highlight a toolbar button, or none
    pub fn set_toolbar_focus(&mut self, index: Option<usize>) {
        let count = ToolbarButton::all().len();
        self.toolbar_focus = index.map(|i| i.min(count - 1));
    }

    pub fn toolbar_focus(&self) -> Option<usize> {
        self.toolbar_focus
    }

    pub fn move_toolbar_focus(&mut self, delta: isize) {
        let len = ToolbarButton::all().len() as isize;
        let current = self.toolbar_focus.unwrap_or(0) as isize;
        self.toolbar_focus = Some((current + delta).rem_euclid(len) as usize);
    }

    pub fn focused_button(&self) -> Option<ToolbarButton> {
        self.toolbar_focus
            .and_then(|index| ToolbarButton::all().get(index).copied())
    }

    /// Rows needed for the current mode, borders included
    pub fn height(&self) -> u16 {
        if self.mode.is_minimized() { 3 } else { 6 }
    }

    fn title(&self) -> &'static str {
        match self.mode {
            ViewMode::Minimized => " Kukan ",
            ViewMode::Expanded => " Message ",
        }
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer, rows: u16) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.state.content.is_empty() {
            let placeholder = Line::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)));
            let mut x = area.x;
            if self.has_focus && self.toolbar_focus.is_none() {
                buf.set_string(x, area.y, "▌", Style::default().fg(Color::Green));
                x += 1;
            }
            if x < area.x + area.width {
                buf.set_line(x, area.y, &placeholder, area.width - (x - area.x));
            }
            return;
        }

        let mut content = self.state.content.clone();
        if self.has_focus && self.toolbar_focus.is_none() {
            content.insert(self.state.byte_index(self.state.cursor_position), '▌');
        }

        let text_lines: Vec<&str> = if self.mode.is_minimized() {
            vec![content.lines().last().unwrap_or("")]
        } else {
            content.split('\n').collect()
        };

        // keep the line with the cursor visible
        let rows = rows.min(area.height);
        let skip = text_lines.len().saturating_sub(rows as usize);
        for (i, line_text) in text_lines.iter().skip(skip).take(rows as usize).enumerate() {
            let width = area.width as usize;
            let chars = line_text.chars().count();
            let visible: String = if chars > width {
                line_text.chars().skip(chars - width).collect()
            } else {
                line_text.to_string()
            };
            let line = Line::from(Span::raw(visible));
            buf.set_line(area.x, area.y + i as u16, &line, area.width);
        }
    }

    fn render_toolbar(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut spans = Vec::new();
        let buttons = ToolbarButton::all();
        let (send, decorative) = buttons.split_last().unwrap_or((&ToolbarButton::Send, &[]));

        for (index, button) in decorative.iter().enumerate() {
            spans.push(Span::styled(
                format!(" {} ", button.glyph()),
                self.button_style(index, Style::default().fg(Color::Gray)),
            ));
            spans.push(Span::raw(" "));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        let base = if self.can_send() {
            Style::default().fg(Color::White).bg(Color::Blue)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let label = format!(" {} ", send.glyph());
        let width = label.chars().count() as u16;
        if area.width > width {
            let send_line = Line::from(Span::styled(label, self.button_style(buttons.len() - 1, base)));
            buf.set_line(area.x + area.width - width, area.y, &send_line, width);
        }
    }

    fn button_style(&self, index: usize, base: Style) -> Style {
        if self.toolbar_focus == Some(index) {
            base.fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            base
        }
    }
}

impl Widget for &ConversationComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let border = if self.has_focus {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .border_style(border);

        let inner_area = block.inner(area);
        block.render(area, buf);
        if inner_area.height == 0 || inner_area.width == 0 {
            return;
        }

        if self.mode.is_minimized() {
            self.render_input(inner_area, buf, 1);
        } else {
            let input_rows = inner_area.height.saturating_sub(2).max(1);
            let input_area = Rect { height: input_rows, ..inner_area };
            self.render_input(input_area, buf, input_rows);

            if inner_area.height > input_rows {
                let toolbar_area = Rect {
                    y: inner_area.y + inner_area.height - 1,
                    height: 1,
                    ..inner_area
                };
                self.render_toolbar(toolbar_area, buf);
            }
        }

        // Render command palette above the composer
        if self.show_command_palette {
            let palette_height = (self.filtered_commands.len().min(6) + 2) as u16;
            let palette_area = Rect {
                x: area.x,
                y: area.y.saturating_sub(palette_height),
                width: area.width,
                height: palette_height.min(area.y),
            };
            if palette_area.height < 3 {
                return;
            }

            Clear.render(palette_area, buf);
            let block = Block::default()
                .borders(Borders::ALL)
                .title("Commands")
                .border_style(Style::default().fg(Color::Blue));
            let inner = block.inner(palette_area);
            block.render(palette_area, buf);

            for (index, entry) in self.filtered_commands.iter().enumerate() {
                if index >= inner.height as usize {
                    break;
                }

                let style = if self.selected_command == Some(index) {
                    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled(format!("/{}", entry.keyword), style),
                    Span::styled(" — ", Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.description, Style::default().fg(Color::Gray)),
                ]);

                buf.set_line(inner.x, inner.y + index as u16, &line, inner.width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::conversation::commands::SlashCommand;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(composer: &mut ConversationComposer, text: &str) {
        for c in text.chars() {
            composer.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut composer = ConversationComposer::new(ViewMode::Expanded);
        type_text(&mut composer, "Hello");
        assert_eq!(
            composer.handle_key(press(KeyCode::Enter)),
            ComposerResult::Submitted("Hello".to_string())
        );
        assert!(composer.is_empty());
    }

    #[test]
    fn whitespace_is_not_sent() {
        let mut composer = ConversationComposer::new(ViewMode::Expanded);
        assert_eq!(composer.handle_key(press(KeyCode::Enter)), ComposerResult::None);
        type_text(&mut composer, "   ");
        assert_eq!(composer.handle_key(press(KeyCode::Enter)), ComposerResult::None);
        assert_eq!(composer.content(), "   ");
    }

    #[test]
    fn shift_enter_adds_newline_only_when_expanded() {
        let mut composer = ConversationComposer::new(ViewMode::Expanded);
        type_text(&mut composer, "a");
        composer.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut composer, "b");
        assert_eq!(composer.content(), "a\nb");

        let mut compact = ConversationComposer::new(ViewMode::Minimized);
        type_text(&mut compact, "a");
        assert_eq!(
            compact.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT)),
            ComposerResult::Submitted("a".to_string())
        );
    }

    #[test]
    fn cursor_editing_handles_multibyte_text() {
        let mut composer = ConversationComposer::new(ViewMode::Expanded);
        type_text(&mut composer, "Straße");
        composer.handle_key(press(KeyCode::Left));
        composer.handle_key(press(KeyCode::Backspace));
        assert_eq!(composer.content(), "Strae");
        composer.handle_key(press(KeyCode::Home));
        composer.handle_key(press(KeyCode::Delete));
        assert_eq!(composer.content(), "trae");
    }

    #[test]
    fn slash_palette_completes_commands() {
        let mut composer = ConversationComposer::new(ViewMode::Expanded);
        type_text(&mut composer, "/cl");
        assert!(composer.is_palette_open());

        composer.handle_key(press(KeyCode::Tab));
        assert_eq!(composer.content(), "/clear ");
        assert!(!composer.is_palette_open());

        let ComposerResult::Command(command) = composer.handle_key(press(KeyCode::Enter)) else {
            panic!("expected a command");
        };
        assert_eq!(command.command, SlashCommand::Clear);
    }

    #[test]
    fn unknown_slash_text_is_sent_as_message() {
        let mut composer = ConversationComposer::new(ViewMode::Expanded);
        type_text(&mut composer, "/nope");
        composer.handle_key(press(KeyCode::Esc));
        assert_eq!(
            composer.handle_key(press(KeyCode::Enter)),
            ComposerResult::Submitted("/nope".to_string())
        );
    }

    #[test]
    fn toolbar_focus_wraps() {
        let mut composer = ConversationComposer::new(ViewMode::Expanded);
        composer.set_toolbar_focus(Some(0));
        composer.move_toolbar_focus(-1);
        assert_eq!(composer.focused_button(), Some(ToolbarButton::Send));
        composer.move_toolbar_focus(1);
        assert_eq!(composer.focused_button(), Some(ToolbarButton::Attach));
    }

    #[test]
    fn placeholder_shows_when_empty() {
        let composer = ConversationComposer::new(ViewMode::Minimized);
        let area = Rect::new(0, 0, 90, 3);
        let mut buf = Buffer::empty(area);
        (&composer).render(area, &mut buf);
        let text: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Ask Anything"));
    }
}
