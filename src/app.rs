use anyhow::Result;
use std::time::Duration;

use crate::config::Config;
use crate::tui::{self, EventHandler, Tui};
use crate::ui::conversation::{ConversationAction, ConversationManager};

const TICK_RATE: Duration = Duration::from_millis(300);

/// Run the widget until the user quits
pub async fn run(config: Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new(TICK_RATE);
    let mut manager = ConversationManager::new(&config, events.sender());
    tracing::info!(mode = manager.mode().display_name(), room = %manager.selected_room(), "widget started");

    let result = event_loop(&mut terminal, &mut events, &mut manager).await;

    // drops the reply scheduler, aborting replies still in flight
    drop(manager);
    tui::restore()?;
    tracing::info!("widget closed");
    result
}

async fn event_loop(
    terminal: &mut Tui,
    events: &mut EventHandler,
    manager: &mut ConversationManager,
) -> Result<()> {
    loop {
        terminal.draw(|frame| frame.render_widget(&*manager, frame.size()))?;

        let Some(event) = events.next().await else {
            break;
        };
        if manager.handle_event(event) == ConversationAction::Exit {
            break;
        }
    }
    Ok(())
}
