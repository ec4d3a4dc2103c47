//! Reminder lifecycle: create → (fire | delete), plus re-arming at boot.
//!
//! The store is the source of truth. The scheduler only holds timers for
//! reminders that are still pending and due in the future.

pub mod scheduler;


use crate::i18n;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use minitats_core::{
    error::MinitatsError,
    message::OutgoingMessage,
    traits::{Channel, DateResolver},
};
use minitats_memory::{Reminder, Store};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub use scheduler::Scheduler;

/// Why a reminder could not be created.
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("no date expression found")]
    DateNotUnderstood,

    #[error(transparent)]
    Storage(#[from] MinitatsError),
}

/// A freshly stored reminder and whether a timer was set for it.
///
/// `armed` is false when the resolved time is not in the future ("hoy" with
/// no hour, an explicit time that already passed today): the record is kept
/// but will never fire on its own.
#[derive(Debug, Clone)]
pub struct Created {
    pub reminder: Reminder,
    pub armed: bool,
}

/// Owns everything a reminder needs between creation and delivery.
#[derive(Clone)]
pub struct ReminderManager {
    store: Store,
    scheduler: Scheduler,
    resolver: Arc<dyn DateResolver>,
    channel: Arc<dyn Channel>,
    lang: String,
    tz: Tz,
}

impl ReminderManager {
    pub fn new(
        store: Store,
        scheduler: Scheduler,
        resolver: Arc<dyn DateResolver>,
        channel: Arc<dyn Channel>,
        lang: &str,
        tz: Tz,
    ) -> Self {
        Self {
            store,
            scheduler,
            resolver,
            channel,
            lang: lang.to_string(),
            tz,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Create a reminder from free text, resolving dates against the current time.
    pub async fn create(&self, chat_id: &str, raw: &str) -> Result<Created, ReminderError> {
        self.create_at(chat_id, raw, Utc::now()).await
    }

    /// Create a reminder from free text, resolving dates against `now`.
    ///
    /// The first date expression sets the due time and is cut out of the
    /// text; whatever remains becomes the reminder body.
    pub async fn create_at(
        &self,
        chat_id: &str,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<Created, ReminderError> {
        let matches = self.resolver.resolve(raw, now);
        let Some(first) = matches.first() else {
            debug!("reminders: no date in {raw:?}");
            return Err(ReminderError::DateNotUnderstood);
        };

        let mut text = strip_span(raw, first.start, first.end);
        if text.is_empty() {
            text = i18n::t("reminder_placeholder", &self.lang).to_string();
        }

        let id = self.store.next_id();
        let reminder = Reminder::new(&id, chat_id, first.at, &text);
        self.store.append_reminder(reminder.clone()).await?;
        info!(
            "reminders: created {} for chat {chat_id} at {}",
            reminder.id, reminder.due_at
        );

        let armed = self.arm(&reminder);
        if !armed {
            warn!(
                "reminders: {} is due at {}, not in the future; stored but not armed",
                reminder.id, reminder.due_at
            );
        }
        Ok(Created { reminder, armed })
    }

    fn arm(&self, reminder: &Reminder) -> bool {
        let manager = self.clone();
        let owned = reminder.clone();
        self.scheduler.arm(&reminder.id, reminder.due_at, async move {
            manager.fire(&owned).await;
        })
    }

    /// Re-arm a stored reminder. Sent reminders are skipped.
    pub fn arm_existing(&self, reminder: &Reminder) -> bool {
        if reminder.sent {
            return false;
        }
        self.arm(reminder)
    }

    /// Deliver a reminder and flag it as sent. Returns whether it was delivered.
    ///
    /// A failed send leaves the record pending; there is no retry.
    pub async fn fire(&self, reminder: &Reminder) -> bool {
        let text = i18n::reminder_fired(&self.lang, &reminder.text);
        if let Err(e) = self
            .channel
            .send(OutgoingMessage::to(&reminder.chat_id, text))
            .await
        {
            error!(
                "reminders: delivery of {} to chat {} failed: {e}",
                reminder.id, reminder.chat_id
            );
            return false;
        }

        match self.store.mark_sent(&reminder.id).await {
            Ok(true) => info!("reminders: fired {}", reminder.id),
            Ok(false) => warn!("reminders: fired {} but it is no longer stored", reminder.id),
            Err(e) => error!("reminders: failed to mark {} as sent: {e}", reminder.id),
        }
        true
    }

    /// Delete this chat's reminders whose text contains `query`, ignoring case.
    /// Returns how many were removed.
    pub async fn delete(&self, chat_id: &str, query: &str) -> Result<usize, MinitatsError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(0);
        }

        let removed = self
            .store
            .remove_reminders_where(|r| r.chat_id == chat_id && r.text.to_lowercase().contains(&needle))
            .await?;
        for reminder in &removed {
            self.scheduler.cancel(&reminder.id);
        }
        if !removed.is_empty() {
            info!("reminders: deleted {} for chat {chat_id}", removed.len());
        }
        Ok(removed.len())
    }

    /// Pending reminders of one chat, soonest first.
    pub async fn list_pending(&self, chat_id: &str) -> Vec<Reminder> {
        let mut pending = self.store.pending_for_chat(chat_id).await;
        pending.sort_by_key(|r| r.due_at);
        pending
    }
}

/// Cut `raw[start..end]` out and tidy what is left.
fn strip_span(raw: &str, start: usize, end: usize) -> String {
    let (Some(before), Some(after)) = (raw.get(..start), raw.get(end..)) else {
        return raw.trim().to_string();
    };
    let joined = format!("{before} {after}");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '-' | ';'))
        .to_string()
}
