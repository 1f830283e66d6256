//! Deferred canned replies

use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::events::AppEvent;
use crate::responses::select_response;
use crate::ui::conversation::store::MessageId;

/// Identifies one scheduled reply and the store generation it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyTicket {
    pub epoch: u64,
    pub request_id: MessageId,
}

/// Sent back to the main loop once the delay has elapsed
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyReady {
    pub ticket: ReplyTicket,
    pub content: String,
}

/// Spawns one sleeping task per reply and keeps the handles so they can be
/// aborted on clear or teardown
pub struct ReplyScheduler {
    delay: Duration,
    tx: mpsc::UnboundedSender<AppEvent>,
    pending: HashMap<MessageId, JoinHandle<()>>,
}

impl ReplyScheduler {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            delay,
            tx,
            pending: HashMap::new(),
        }
    }

    /// Queue the canned reply to `prompt`
    pub fn schedule(&mut self, ticket: ReplyTicket, prompt: String) {
        let delay = self.delay;
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let content = select_response(&prompt).to_string();
            if tx.send(AppEvent::Reply(ReplyReady { ticket, content })).is_err() {
                tracing::warn!(request = %ticket.request_id, "event channel closed before reply");
            }
        });

        tracing::debug!(request = %ticket.request_id, delay_ms = delay.as_millis() as u64, "reply scheduled");
        self.pending.insert(ticket.request_id, handle);
    }

    /// Forget a reply that has been delivered
    pub fn complete(&mut self, ticket: &ReplyTicket) {
        self.pending.remove(&ticket.request_id);
    }

    /// Abort every outstanding reply
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "cancelling pending replies");
        }
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.values().any(|handle| !handle.is_finished())
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> ReplyTicket {
        ReplyTicket {
            epoch: 0,
            request_id: MessageId::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reply_arrives_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(Duration::from_secs(1), tx);
        let t = ticket();
        scheduler.schedule(t, "Hello".to_string());

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());

        let Some(AppEvent::Reply(reply)) = rx.recv().await else {
            panic!("expected a reply event");
        };
        assert_eq!(reply.ticket, t);
        assert!(reply.content.starts_with("I'm here to help"));

        scheduler.complete(&t);
        assert!(scheduler.pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_replies_never_arrive() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ReplyScheduler::new(Duration::from_secs(1), tx);
        scheduler.schedule(ticket(), "market".to_string());
        scheduler.schedule(ticket(), "buyer".to_string());
        assert!(scheduler.has_pending());

        scheduler.cancel_all();
        assert!(!scheduler.has_pending());

        let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_scheduler_aborts_tasks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let keep_open = tx.clone();
        {
            let mut scheduler = ReplyScheduler::new(Duration::from_secs(1), tx);
            scheduler.schedule(ticket(), "schedule".to_string());
        }

        let waited = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err());
        drop(keep_open);
    }
}
