//! Timer loop that moves one queued record through its simulated upload.
//!
//! Each scheduled record gets its own task: it sleeps for its stagger delay,
//! flips the record to `Uploading`, then advances it once per tick until the
//! queue reports it finished. The task only holds a weak reference so a
//! dropped queue stops every driver on its next wake-up.

use super::queue::{Shared, Tick};
use super::types::UploadId;
use crate::config::UploadConfig;
use std::sync::Weak;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    pub stagger_interval: Duration,
    pub tick_interval: Duration,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self::from(&UploadConfig::default())
    }
}

impl From<&UploadConfig> for DriverSettings {
    fn from(config: &UploadConfig) -> Self {
        Self {
            stagger_interval: config.stagger_interval(),
            // interval_at panics on a zero period
            tick_interval: config.tick_interval().max(Duration::from_millis(1)),
        }
    }
}

impl DriverSettings {
    /// Start delay of the k-th record scheduled by one `start_all` call.
    pub fn stagger_for(&self, position: usize) -> Duration {
        self.stagger_interval
            .saturating_mul(u32::try_from(position).unwrap_or(u32::MAX))
    }
}

pub(crate) async fn drive(queue: Weak<Shared>, id: UploadId, delay: Duration, tick: Duration) {
    tokio::time::sleep(delay).await;

    match queue.upgrade() {
        Some(shared) if shared.begin(id) => {}
        _ => return,
    }

    let mut ticker = interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(shared) = queue.upgrade() else {
            return;
        };
        if shared.advance(id) == Tick::Finished {
            return;
        }
    }
}
