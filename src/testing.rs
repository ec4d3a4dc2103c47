//! Shared test doubles.

use crate::reminders::{ReminderManager, Scheduler};
use async_trait::async_trait;
use chrono_tz::Europe::Madrid;
use minitats_core::{
    error::MinitatsError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use minitats_dates::SpanishDateParser;
use minitats_memory::Store;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A channel that records sent messages for assertion.
#[derive(Default)]
pub struct MockChannel {
    sent: Mutex<Vec<OutgoingMessage>>,
    /// When true, every `send()` fails.
    pub fail_send: AtomicBool,
    /// Chats whose sends fail.
    failing_targets: Mutex<HashSet<String>>,
}

impl MockChannel {
    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_for(&self, target: &str) {
        self.failing_targets.lock().unwrap().insert(target.to_string());
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_send.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Channel for MockChannel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, MinitatsError> {
        let (_tx, rx) = tokio::sync::mpsc::channel(1);
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), MinitatsError> {
        let target = message.reply_target.clone().unwrap_or_default();
        if self.fail_send.load(Ordering::SeqCst)
            || self.failing_targets.lock().unwrap().contains(&target)
        {
            return Err(MinitatsError::Channel("chat not found".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn stop(&self) -> Result<(), MinitatsError> {
        Ok(())
    }
}

/// A Spanish, Madrid-time manager over a fresh temp store.
pub async fn manager() -> (TempDir, Store, ReminderManager, Arc<MockChannel>) {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path()).await.unwrap();
    let channel = Arc::new(MockChannel::default());
    let manager = ReminderManager::new(
        store.clone(),
        Scheduler::new(),
        Arc::new(SpanishDateParser::new(Madrid).unwrap()),
        channel.clone(),
        "Spanish",
        Madrid,
    );
    (dir, store, manager, channel)
}
