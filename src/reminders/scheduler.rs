//! In-memory one-shot timers keyed by reminder id.
//!
//! The scheduler is a cache over the store: losing it (a restart) loses only
//! timeliness, and startup recovery rebuilds it.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Default)]
struct Registry {
    next_generation: u64,
    timers: HashMap<String, (u64, JoinHandle<()>)>,
}

/// Timer registry. Cheap to clone; clones share the same timers.
#[derive(Clone, Default)]
pub struct Scheduler {
    registry: Arc<Mutex<Registry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `on_fire` at `due_at`.
    ///
    /// Returns false (and does nothing) when `due_at` is not strictly in the
    /// future. Arming an id that is already armed replaces the old timer.
    pub fn arm<F>(&self, id: &str, due_at: DateTime<Utc>, on_fire: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let now = Utc::now();
        if due_at <= now {
            debug!("scheduler: {id} is due at {due_at}, not in the future; not armed");
            return false;
        }
        let Ok(delay) = (due_at - now).to_std() else {
            return false;
        };

        let mut registry = self.registry();
        registry.next_generation += 1;
        let generation = registry.next_generation;

        let shared = Arc::clone(&self.registry);
        let key = id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut registry = shared.lock().unwrap_or_else(|e| e.into_inner());
                match registry.timers.get(&key) {
                    Some((g, _)) if *g == generation => {
                        registry.timers.remove(&key);
                    }
                    _ => return,
                }
            }
            debug!("scheduler: firing {key}");
            on_fire.await;
        });

        if let Some((_, previous)) = registry.timers.insert(id.to_string(), (generation, handle)) {
            debug!("scheduler: replaced existing timer for {id}");
            previous.abort();
        }
        true
    }

    /// Forget and abort a timer. Returns whether one was armed.
    pub fn cancel(&self, id: &str) -> bool {
        match self.registry().timers.remove(id) {
            Some((_, handle)) => {
                handle.abort();
                debug!("scheduler: cancelled {id}");
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.registry().timers.contains_key(id)
    }

    pub fn armed_count(&self) -> usize {
        self.registry().timers.len()
    }
}
