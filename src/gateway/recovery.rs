//! Startup recovery: re-arm stored reminders and tell users we are back.

use crate::i18n;
use crate::reminders::ReminderManager;
use chrono::{DateTime, Duration, Utc};
use minitats_core::{message::OutgoingMessage, traits::Channel};
use minitats_memory::{Status, Store};
use tracing::{error, info, warn};

/// Knobs for one recovery pass.
pub struct RecoveryOptions<'a> {
    pub threshold: Duration,
    pub notify_on_restart: bool,
    pub admin_id: Option<&'a str>,
    pub lang: &'a str,
    pub bot_name: &'a str,
}

/// What happened during boot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootReport {
    pub is_restart: bool,
    pub previous_start: Option<DateTime<Utc>>,
    /// Unsent reminders now armed.
    pub rearmed: usize,
    /// Unsent reminders whose time already passed; left stored, not armed.
    pub overdue: usize,
    /// Restart notices delivered.
    pub notified: usize,
    /// Restart notices that failed.
    pub failed: usize,
}

/// A boot is a restart when the previous one was more than `threshold` ago.
pub fn detect_restart(
    previous: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> bool {
    previous.is_some_and(|prev| now - prev > threshold)
}

/// Rebuild timers from the store, broadcast the restart notice if needed and
/// record this boot.
pub async fn recover(
    store: &Store,
    manager: &ReminderManager,
    channel: &dyn Channel,
    opts: &RecoveryOptions<'_>,
    now: DateTime<Utc>,
) -> BootReport {
    let previous_start = store.load_status().await.last_start;
    let is_restart = detect_restart(previous_start, now, opts.threshold);

    let mut report = BootReport {
        is_restart,
        previous_start,
        ..BootReport::default()
    };

    for reminder in store.unsent_reminders().await {
        if manager.arm_existing(&reminder) {
            report.rearmed += 1;
        } else {
            report.overdue += 1;
        }
    }
    if report.overdue > 0 {
        warn!(
            "recovery: {} overdue reminders left pending and not armed",
            report.overdue
        );
    }

    if is_restart && opts.notify_on_restart {
        let notice = i18n::t("restart_notice", opts.lang);
        for user in store.load_users().await {
            match channel.send(OutgoingMessage::to(&user, notice)).await {
                Ok(()) => report.notified += 1,
                Err(e) => {
                    warn!("recovery: restart notice to {user} failed: {e}");
                    report.failed += 1;
                }
            }
        }
    }

    let status = Status {
        last_start: Some(now),
    };
    if let Err(e) = store.save_status(&status).await {
        error!("recovery: failed to save status: {e}");
    }

    info!(
        "recovery: restart={} rearmed={} overdue={} notified={} failed={}",
        report.is_restart, report.rearmed, report.overdue, report.notified, report.failed
    );

    if let Some(admin) = opts.admin_id {
        let summary = i18n::boot_summary(
            opts.lang,
            opts.bot_name,
            report.is_restart,
            report.rearmed,
            report.overdue,
            report.notified,
        );
        if let Err(e) = channel.send(OutgoingMessage::to(admin, summary)).await {
            warn!("recovery: boot summary to admin {admin} failed: {e}");
        }
    }

    report
}
