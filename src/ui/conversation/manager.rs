use crate::config::{Config, UiConfig};
use crate::events::{AppEvent, Room, ViewMode};
use crate::ui::conversation::commands::{get_help_text, ParsedCommand, SlashCommand};
use crate::ui::conversation::composer::{ComposerResult, ConversationComposer, ToolbarButton};
use crate::ui::conversation::history::ConversationHistory;
use crate::ui::conversation::reply::{ReplyReady, ReplyScheduler, ReplyTicket};
use crate::ui::conversation::store::{ConversationStore, Message};
use crate::ui::header::{HeaderBar, HeaderButton};
use crate::ui::quick_actions::{QuickActionPicker, QuickActionsPanel, QUICK_ACTIONS};
use crate::ui::rooms::RoomSelector;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use std::cell::Cell;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const SCROLL_STEP: usize = 5;

const DEMO_CONVERSATION: [(bool, &str); 2] = [
    (
        true,
        "Where is the nearest sandy beach to my house (Brunnenstrasse 41, 10115 Berlin)?",
    ),
    (
        false,
        "I'll help you find the nearest sandy beach to that address in Berlin. Let me search for information about beaches near Brunnenstrasse 41 in Berlin.

Based on the search results, the nearest sandy beaches to Brunnenstrasse 41 in Berlin (which is in the Mitte district) are quite close! Here are your best options:

**Closest options in/near central Berlin:**

**Strandbar Mitte** - This is right in the heart of Berlin, located on the Spree River just across from Museum Island. It's only a short walk from Alexanderplatz and the Brandenburg Gate, offering a sandy beach atmosphere with real palm trees and beach bars. It's the oldest beach bar operating in the city itself, founded in 2002.",
    ),
];

/// Actions that can be requested by the conversation manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
}

/// Area of the widget that receives arrow keys and Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    Toolbar,
    Rooms,
    QuickActions,
    Header,
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    expires_at: Instant,
}

/// Owns one widget instance: its conversation, pending replies and view state
pub struct ConversationManager {
    store: ConversationStore,
    replies: ReplyScheduler,
    composer: ConversationComposer,
    rooms: RoomSelector,
    quick_actions: QuickActionPicker,
    header_focus: usize,
    mode: ViewMode,
    focus: Focus,
    scroll: usize,
    /// Message area from the last draw, used to clamp scrolling
    viewport: Cell<Rect>,
    notice: Option<Notice>,
    show_help: bool,
    frame: usize,
    ui: UiConfig,
}

impl ConversationManager {
    pub fn new(config: &Config, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        let mode = if config.start_minimized {
            ViewMode::Minimized
        } else {
            ViewMode::Expanded
        };

        let mut manager = Self {
            store: ConversationStore::new(),
            replies: ReplyScheduler::new(config.reply_delay(), events),
            composer: ConversationComposer::new(mode),
            rooms: RoomSelector::new(config.default_room),
            quick_actions: QuickActionPicker::new(),
            header_focus: 0,
            mode,
            focus: Focus::Composer,
            scroll: 0,
            viewport: Cell::new(Rect::default()),
            notice: None,
            show_help: false,
            frame: 0,
            ui: config.ui.clone(),
        };

        if config.seed_demo {
            manager.seed_demo();
        }
        manager
    }

    /// Load the sample beach conversation
    pub fn seed_demo(&mut self) {
        for (from_user, content) in DEMO_CONVERSATION {
            let message = if from_user {
                Message::user(content)
            } else {
                Message::ai(content)
            };
            self.store.append(message);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> ConversationAction {
        match event {
            AppEvent::Key(key) => return self.handle_key(key),
            AppEvent::Resize(width, height) => tracing::debug!(width, height, "terminal resized"),
            AppEvent::Tick => self.tick(Instant::now()),
            AppEvent::Reply(reply) => self.deliver_reply(reply),
        }
        ConversationAction::None
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ConversationAction {
        if key.kind != KeyEventKind::Press {
            return ConversationAction::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return ConversationAction::Exit,
                KeyCode::Char('l') => {
                    self.clear();
                    return ConversationAction::None;
                }
                _ => {}
            }
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return ConversationAction::None;
        }

        match key.code {
            KeyCode::PageUp => {
                self.scroll_by(SCROLL_STEP as isize);
                return ConversationAction::None;
            }
            KeyCode::PageDown => {
                self.scroll_by(-(SCROLL_STEP as isize));
                return ConversationAction::None;
            }
            KeyCode::Tab if !self.composer.is_palette_open() => {
                self.cycle_focus(1);
                return ConversationAction::None;
            }
            KeyCode::BackTab => {
                self.cycle_focus(-1);
                return ConversationAction::None;
            }
            _ => {}
        }

        if self.focus != Focus::Composer {
            match key.code {
                KeyCode::Esc => {
                    self.set_focus(Focus::Composer);
                    return ConversationAction::None;
                }
                KeyCode::Char(c) if c != ' ' => {
                    self.set_focus(Focus::Composer);
                    return self.handle_composer_key(key);
                }
                _ => {}
            }
        }

        match self.focus {
            Focus::Composer => self.handle_composer_key(key),
            Focus::Toolbar => self.handle_toolbar_key(key),
            Focus::Rooms => {
                match key.code {
                    KeyCode::Left | KeyCode::Up => self.rooms.select_previous(),
                    KeyCode::Right | KeyCode::Down => self.rooms.select_next(),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        self.set_notice(format!("Room: {}", self.rooms.selected()));
                    }
                    _ => {}
                }
                ConversationAction::None
            }
            Focus::QuickActions => {
                match key.code {
                    KeyCode::Left => self.quick_actions.move_by(-1),
                    KeyCode::Right => self.quick_actions.move_by(1),
                    KeyCode::Up => self.quick_actions.move_rows(-1),
                    KeyCode::Down => self.quick_actions.move_rows(1),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        self.use_quick_action(self.quick_actions.selected());
                    }
                    _ => {}
                }
                ConversationAction::None
            }
            Focus::Header => self.handle_header_key(key),
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent) -> ConversationAction {
        if key.code == KeyCode::Esc
            && self.composer.is_empty()
            && !self.composer.is_palette_open()
            && !self.mode.is_minimized()
        {
            self.minimize();
            return ConversationAction::None;
        }

        let result = self.composer.handle_key(key);
        self.apply_composer_result(result)
    }

    fn apply_composer_result(&mut self, result: ComposerResult) -> ConversationAction {
        match result {
            ComposerResult::Submitted(input) => {
                self.submit(input);
                ConversationAction::None
            }
            ComposerResult::Command(command) => self.run_command(command),
            ComposerResult::Edited => {
                self.after_edit();
                ConversationAction::None
            }
            ComposerResult::None => ConversationAction::None,
        }
    }

    fn handle_toolbar_key(&mut self, key: KeyEvent) -> ConversationAction {
        match key.code {
            KeyCode::Left => self.composer.move_toolbar_focus(-1),
            KeyCode::Right => self.composer.move_toolbar_focus(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(button) = self.composer.focused_button() {
                    return self.activate_toolbar(button);
                }
            }
            _ => {}
        }
        ConversationAction::None
    }

    fn handle_header_key(&mut self, key: KeyEvent) -> ConversationAction {
        let buttons = HeaderButton::all();
        match key.code {
            KeyCode::Left => {
                self.header_focus = (self.header_focus + buttons.len() - 1) % buttons.len();
            }
            KeyCode::Right => {
                self.header_focus = (self.header_focus + 1) % buttons.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') => match buttons[self.header_focus] {
                HeaderButton::Share => {
                    tracing::debug!("share pressed");
                    self.set_notice(format!("{} is not available in this preview", HeaderButton::Share.label()));
                }
                HeaderButton::Minimize => self.minimize(),
                HeaderButton::Close => return ConversationAction::Exit,
            },
            _ => {}
        }
        ConversationAction::None
    }

    /// Press a toolbar button. Only Send does anything.
    pub fn activate_toolbar(&mut self, button: ToolbarButton) -> ConversationAction {
        if button == ToolbarButton::Send {
            let result = self.composer.submit();
            return self.apply_composer_result(result);
        }

        tracing::debug!(button = button.tooltip(), "inert toolbar button pressed");
        self.set_notice(format!("{} is not available in this preview", button.tooltip()));
        ConversationAction::None
    }

    /// Append `input` as a user message and schedule its canned reply.
    /// Blank input is ignored.
    pub fn submit(&mut self, input: String) -> bool {
        if input.trim().is_empty() {
            return false;
        }

        let epoch = self.store.epoch();
        let message = self.store.append(Message::user(input.clone()));
        let ticket = ReplyTicket {
            epoch,
            request_id: message.id,
        };
        tracing::info!(request = %ticket.request_id, room = %self.rooms.selected(), "message sent");

        self.replies.schedule(ticket, input);
        self.scroll = 0;
        if self.focus == Focus::QuickActions {
            self.set_focus(Focus::Composer);
        }
        true
    }

    /// Append a finished reply unless it belongs to a cleared conversation
    pub fn deliver_reply(&mut self, reply: ReplyReady) {
        self.replies.complete(&reply.ticket);
        if self.store.accept_reply(&reply.ticket, reply.content).is_some() {
            self.scroll = 0;
        }
    }

    /// Empty the conversation and drop pending replies
    pub fn clear(&mut self) {
        self.replies.cancel_all();
        self.store.clear();
        self.scroll = 0;
        self.quick_actions.reset();
        self.set_notice("Conversation cleared".to_string());
    }

    pub fn minimize(&mut self) {
        self.set_mode(ViewMode::Minimized);
    }

    pub fn expand(&mut self) {
        self.set_mode(ViewMode::Expanded);
    }

    fn set_mode(&mut self, mode: ViewMode) {
        tracing::debug!(mode = mode.display_name(), "view mode changed");
        self.mode = mode;
        self.composer.set_mode(mode);
        self.set_focus(Focus::Composer);
    }

    /// Typing into the minimized composer brings the full widget back
    fn after_edit(&mut self) {
        if self.mode.is_minimized() && !self.composer.is_empty() {
            self.expand();
        }
    }

    /// Copy a quick action prompt into the composer without sending it
    pub fn use_quick_action(&mut self, index: usize) {
        let Some(action) = QUICK_ACTIONS.get(index) else {
            return;
        };
        tracing::debug!(action = action.label, "quick action selected");
        self.composer.set_content(action.prompt);
        self.set_focus(Focus::Composer);
        self.after_edit();
    }

    fn run_command(&mut self, command: ParsedCommand) -> ConversationAction {
        tracing::debug!(command = command.command.command(), "slash command");
        match command.command {
            SlashCommand::Clear => self.clear(),
            SlashCommand::Minimize => self.minimize(),
            SlashCommand::Expand => self.expand(),
            SlashCommand::Room => match command.room_target() {
                Ok(Some(room)) => {
                    self.select_room(room);
                    self.set_notice(format!("Room: {room}"));
                }
                Ok(None) => self.set_notice(format!("Room: {}", self.rooms.selected())),
                Err(err) => {
                    tracing::warn!(%err, "room command rejected");
                    self.set_notice(err.to_string());
                }
            },
            SlashCommand::Help => self.show_help = true,
            SlashCommand::Quit => return ConversationAction::Exit,
        }
        ConversationAction::None
    }

    pub fn select_room(&mut self, room: Room) {
        self.rooms.select(room);
    }

    fn focus_ring(&self) -> Vec<Focus> {
        if self.mode.is_minimized() {
            return vec![Focus::Composer];
        }

        let mut ring = vec![Focus::Composer, Focus::Toolbar, Focus::Rooms];
        if self.quick_actions_visible() {
            ring.push(Focus::QuickActions);
        }
        ring.push(Focus::Header);
        ring
    }

    fn cycle_focus(&mut self, delta: isize) {
        let ring = self.focus_ring();
        let current = ring.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(ring.len() as isize) as usize;
        self.set_focus(ring[next]);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.composer
            .set_focus(matches!(focus, Focus::Composer | Focus::Toolbar));
        if focus == Focus::Toolbar {
            let current = self.composer.toolbar_focus().unwrap_or(0);
            self.composer.set_toolbar_focus(Some(current));
        } else {
            self.composer.set_toolbar_focus(None);
        }
        self.rooms.set_focus(focus == Focus::Rooms);
    }

    fn scroll_by(&mut self, delta: isize) {
        let viewport = self.viewport.get();
        let history = ConversationHistory {
            messages: self.messages(),
            scroll: 0,
            typing: self.typing_frame(),
        };
        let max = history.max_scroll(viewport.width, viewport.height);
        self.scroll = (self.scroll as isize + delta).clamp(0, max as isize) as usize;
    }

    pub fn set_notice(&mut self, text: String) {
        self.notice = Some(Notice {
            text,
            expires_at: Instant::now() + Duration::from_secs(self.ui.notice_secs),
        });
    }

    /// Advance the typing animation and expire old notices
    pub fn tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);
        if self.notice.as_ref().is_some_and(|notice| notice.expires_at <= now) {
            self.notice = None;
        }
    }

    fn typing_frame(&self) -> Option<usize> {
        self.has_pending_reply().then_some(self.frame)
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn quick_actions_visible(&self) -> bool {
        self.store.is_empty() && !self.mode.is_minimized()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selected_room(&self) -> Room {
        self.rooms.selected()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.text.as_str())
    }

    pub fn is_help_open(&self) -> bool {
        self.show_help
    }

    pub fn has_pending_reply(&self) -> bool {
        self.replies.has_pending()
    }
}

#[cfg(test)]
impl ConversationManager {
    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn input(&self) -> &str {
        self.composer.content()
    }
}

/// Centre a `width` x `height` box inside `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl ConversationManager {
    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 2 {
            return;
        }

        let left = match self.notice() {
            Some(text) => Span::styled(text.to_string(), Style::default().fg(Color::Yellow)),
            None => Span::styled(
                "Enter send · Tab focus · /help · Ctrl+C quit",
                Style::default().fg(Color::DarkGray),
            ),
        };
        buf.set_line(area.x + 1, area.y, &Line::from(left), area.width.saturating_sub(1));

        if !self.mode.is_minimized() {
            let room = format!("Room: {} ", self.rooms.selected());
            let width = room.chars().count() as u16;
            if area.width > width + 30 {
                buf.set_string(
                    area.x + area.width - width,
                    area.y,
                    room,
                    Style::default().fg(Color::Blue),
                );
            }
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let text = get_help_text();
        let height = text.lines().count() as u16 + 2;
        let popup = centered(area, 72, height);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help (Esc to close) ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .render(popup, buf);
    }

    fn render_minimized(&self, area: Rect, buf: &mut Buffer) {
        let width = self.ui.minimized_width.min(area.width);
        let height = self.composer.height() + 1;
        let column = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height.saturating_sub(height),
            width,
            height: height.min(area.height),
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(column);

        (&self.composer).render(chunks[0], buf);
        self.render_status(chunks[1], buf);
    }

    fn render_expanded(&self, area: Rect, buf: &mut Buffer) {
        let width = self.ui.max_width.min(area.width);
        let column = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };

        let fixed = HeaderBar::HEIGHT + 1 + self.composer.height() + 1;
        let available = column.height.saturating_sub(fixed + 3);
        let (quick_height, compact) = if self.quick_actions_visible() {
            let full = QuickActionPicker::required_height(column.width, self.ui.show_pro_tips);
            if full <= available {
                (full, false)
            } else {
                (QuickActionPicker::compact_height(column.width).min(available), true)
            }
        } else {
            (0, false)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HeaderBar::HEIGHT),
                Constraint::Length(quick_height),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(self.composer.height()),
                Constraint::Length(1),
            ])
            .split(column);

        let header_focus = (self.focus == Focus::Header)
            .then(|| HeaderButton::all()[self.header_focus]);
        HeaderBar { focused: header_focus }.render(chunks[0], buf);

        if quick_height > 0 {
            self.quick_actions.set_width(chunks[1].width);
            QuickActionsPanel {
                selected: (self.focus == Focus::QuickActions).then(|| self.quick_actions.selected()),
                show_tips: self.ui.show_pro_tips,
                compact,
            }
            .render(chunks[1], buf);
        }

        let history_area = Rect {
            x: chunks[2].x + 1,
            width: chunks[2].width.saturating_sub(2),
            ..chunks[2]
        };
        self.viewport.set(history_area);
        ConversationHistory {
            messages: self.messages(),
            scroll: self.scroll,
            typing: self.typing_frame(),
        }
        .render(history_area, buf);

        (&self.rooms).render(chunks[3], buf);
        (&self.composer).render(chunks[4], buf);
        self.render_status(chunks[5], buf);
    }
}

impl Widget for &ConversationManager {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.mode.is_minimized() {
            self.render_minimized(area, buf);
        } else {
            self.render_expanded(area, buf);
        }

        if self.is_help_open() {
            self.render_help(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Role;

    fn manager() -> (ConversationManager, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ConversationManager::new(&Config::default(), tx), rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(manager: &mut ConversationManager, text: &str) {
        for c in text.chars() {
            manager.handle_key(press(KeyCode::Char(c)));
        }
    }

    async fn next_reply(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> ReplyReady {
        match rx.recv().await {
            Some(AppEvent::Reply(reply)) => reply,
            other => panic!("expected reply, got {other:?}"),
        }
    }

    fn screen(manager: &ConversationManager, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        manager.render(area, &mut buf);
        buf.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn send_appends_user_then_reply_after_delay() {
        let (mut manager, mut rx) = manager();
        type_text(&mut manager, "Can you schedule a showing?");
        manager.handle_key(press(KeyCode::Enter));

        assert_eq!(manager.messages().len(), 1);
        assert_eq!(manager.messages()[0].role, Role::User);
        assert!(manager.has_pending_reply());
        assert_eq!(manager.input(), "");

        let started = tokio::time::Instant::now();
        let reply = next_reply(&mut rx).await;
        assert!(started.elapsed() >= Duration::from_secs(1));
        manager.deliver_reply(reply);

        let messages = manager.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Ai);
        assert!(messages[1].content.starts_with("I can help you manage showings efficiently:"));
        assert!(!manager.has_pending_reply());
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_sends_nothing() {
        let (mut manager, mut rx) = manager();
        type_text(&mut manager, "   ");
        manager.handle_key(press(KeyCode::Enter));
        assert!(!manager.submit("\n\t".to_string()));

        assert!(manager.messages().is_empty());
        assert!(!manager.has_pending_reply());
        let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_drops_pending_reply_and_restores_quick_actions() {
        let (mut manager, mut rx) = manager();
        assert!(manager.submit("What's the market like?".to_string()));
        assert!(!manager.quick_actions_visible());

        manager.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert!(manager.messages().is_empty());
        assert!(manager.quick_actions_visible());
        assert_eq!(manager.notice(), Some("Conversation cleared"));

        let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn reply_from_before_clear_is_ignored() {
        let (mut manager, mut rx) = manager();
        manager.submit("Hello".to_string());
        let reply = next_reply(&mut rx).await;

        manager.clear();
        manager.deliver_reply(reply);
        assert!(manager.messages().is_empty());
    }

    #[tokio::test]
    async fn typing_while_minimized_expands() {
        let (mut manager, _rx) = manager();
        manager.handle_key(press(KeyCode::Esc));
        assert_eq!(manager.mode(), ViewMode::Minimized);
        assert!(!manager.quick_actions_visible());

        type_text(&mut manager, "a");
        assert_eq!(manager.mode(), ViewMode::Expanded);
        assert_eq!(manager.input(), "a");
    }

    #[tokio::test]
    async fn quick_action_fills_composer_without_sending() {
        let (mut manager, _rx) = manager();
        manager.handle_key(press(KeyCode::Tab));
        manager.handle_key(press(KeyCode::Tab));
        manager.handle_key(press(KeyCode::Tab));
        assert_eq!(manager.focus(), Focus::QuickActions);

        manager.handle_key(press(KeyCode::Right));
        manager.handle_key(press(KeyCode::Enter));
        assert_eq!(manager.focus(), Focus::Composer);
        assert_eq!(
            manager.input(),
            "What questions should I ask to qualify a potential buyer?"
        );
        assert!(manager.messages().is_empty());
    }

    #[tokio::test]
    async fn slash_commands_drive_the_view() {
        let (mut manager, _rx) = manager();
        type_text(&mut manager, "/room kitchen");
        manager.handle_key(press(KeyCode::Enter));
        assert_eq!(manager.selected_room(), Room::Kitchen);
        assert!(manager.messages().is_empty());

        type_text(&mut manager, "/room attic");
        manager.handle_key(press(KeyCode::Enter));
        assert_eq!(manager.selected_room(), Room::Kitchen);
        assert!(manager.notice().unwrap().contains("attic"));

        type_text(&mut manager, "/help");
        manager.handle_key(press(KeyCode::Enter));
        assert!(manager.is_help_open());
        manager.handle_key(press(KeyCode::Esc));
        assert!(!manager.is_help_open());

        type_text(&mut manager, "/quit");
        assert_eq!(manager.handle_key(press(KeyCode::Enter)), ConversationAction::Exit);
    }

    #[tokio::test]
    async fn inert_toolbar_buttons_only_show_a_notice() {
        let (mut manager, _rx) = manager();
        manager.handle_key(press(KeyCode::Tab));
        assert_eq!(manager.focus(), Focus::Toolbar);
        manager.handle_key(press(KeyCode::Right));
        manager.handle_key(press(KeyCode::Enter));

        assert_eq!(
            manager.notice(),
            Some("View Photos is not available in this preview")
        );
        assert!(manager.messages().is_empty());
    }

    #[tokio::test]
    async fn notices_expire_on_tick() {
        let (mut manager, _rx) = manager();
        manager.set_notice("hello".to_string());
        manager.tick(Instant::now());
        assert_eq!(manager.notice(), Some("hello"));
        manager.tick(Instant::now() + Duration::from_secs(10));
        assert_eq!(manager.notice(), None);
    }

    #[tokio::test]
    async fn layout_follows_view_mode() {
        let (mut manager, _rx) = manager();
        let expanded = screen(&manager, 120, 50);
        assert!(expanded.contains("Kukan Home Assistant"));
        assert!(expanded.contains("Quick Actions"));
        assert!(expanded.contains("Livingroom"));

        manager.minimize();
        let minimized = screen(&manager, 120, 50);
        assert!(!minimized.contains("Kukan Home Assistant"));
        assert!(!minimized.contains("Quick Actions"));
        assert!(minimized.contains("Ask Anything"));
    }

    #[tokio::test]
    async fn standard_terminal_shows_every_quick_action() {
        let (mut manager, _rx) = manager();
        let screen_text = screen(&manager, 80, 24);
        for action in QUICK_ACTIONS {
            assert!(screen_text.contains(action.label), "{} not drawn", action.label);
        }

        // walk the focus to the last card and check it is still drawn
        for _ in 0..3 {
            manager.handle_key(press(KeyCode::Tab));
        }
        assert_eq!(manager.focus(), Focus::QuickActions);
        manager.handle_key(press(KeyCode::Left));
        let screen_text = screen(&manager, 80, 24);
        assert!(screen_text.contains("Social Media Post"));
    }

    #[tokio::test]
    async fn tiny_terminals_render_without_panicking() {
        let (mut manager, _rx) = manager();
        for (width, height) in [(80, 3), (30, 2), (10, 1)] {
            screen(&manager, width, height);
        }

        manager.submit("Hello".to_string());
        manager.minimize();
        for (width, height) in [(80, 3), (30, 2), (10, 1)] {
            screen(&manager, width, height);
        }
    }

    #[tokio::test]
    async fn demo_seed_hides_quick_actions() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let config = Config {
            seed_demo: true,
            ..Config::default()
        };
        let manager = ConversationManager::new(&config, tx);
        assert_eq!(manager.messages().len(), 2);
        assert!(!manager.quick_actions_visible());
        assert!(screen(&manager, 120, 50).contains("Strandbar Mitte"));
    }
}
