//! Cosmetic "real-time" dashboard numbers: a periodic task perturbs the
//! counters with bounded random jitter and publishes a tick. The numbers
//! carry no consistency guarantee; a missed tick is simply lost.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::events::{EventHub, StoreEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStats {
    pub online_students: u32,
    pub active_sessions: u32,
}

impl Default for LiveStats {
    fn default() -> Self {
        Self {
            online_students: 120,
            active_sessions: 40,
        }
    }
}

impl LiveStats {
    /// Random walk step, clamped so the counters stay plausible.
    fn perturb(&mut self, rng: &mut StdRng) {
        let online_jitter: i32 = rng.random_range(-5..=5);
        let session_jitter: i32 = rng.random_range(-3..=3);
        self.online_students = add_jitter(self.online_students, online_jitter);
        self.active_sessions = add_jitter(self.active_sessions, session_jitter);
    }
}

fn add_jitter(value: u32, jitter: i32) -> u32 {
    value.saturating_add_signed(jitter)
}

pub struct StatsTicker {
    hub: EventHub,
    interval: Duration,
    stats: LiveStats,
    rng: StdRng,
}

impl StatsTicker {
    pub fn new(hub: EventHub, interval: Duration) -> Self {
        Self::with_rng(hub, interval, StdRng::from_os_rng())
    }

    pub fn seeded(hub: EventHub, interval: Duration, seed: u64) -> Self {
        Self::with_rng(hub, interval, StdRng::seed_from_u64(seed))
    }

    fn with_rng(hub: EventHub, interval: Duration, rng: StdRng) -> Self {
        Self {
            hub,
            interval,
            stats: LiveStats::default(),
            rng,
        }
    }

    /// Run until stopped, publishing a perturbed tick per interval.
    pub fn spawn(mut self) -> StatsTickerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.stats.perturb(&mut self.rng);
                        self.hub.publish(StoreEvent::StatsTick(self.stats));
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("stats ticker stopped");
        });

        StatsTickerHandle {
            stop: stop_tx,
            task: handle,
        }
    }
}

pub struct StatsTickerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl StatsTickerHandle {
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}
