use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use shared::SpinGeneration;
use tokio::{
    sync::mpsc::WeakUnboundedSender,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::trace;

use crate::events::EngineEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    pub interval: Duration,
    pub ticks: u32,
}

impl TickPlan {
    pub fn for_duration(duration: Duration, interval: Duration) -> Self {
        let interval_ms = interval.as_millis().max(1);
        let ticks = u32::try_from(duration.as_millis() / interval_ms).unwrap_or(u32::MAX);
        Self { interval, ticks }
    }

    pub fn total(&self) -> Duration {
        self.interval.saturating_mul(self.ticks)
    }
}

/// Delivers `ticks` tick callbacks followed by exactly one expiry callback.
/// Scheduling again replaces whatever was active.
pub trait TickScheduler: Send + Sync {
    fn schedule_ticks(&self, generation: SpinGeneration, plan: TickPlan);
    fn cancel(&self);
}

pub struct TokioTickScheduler {
    events: WeakUnboundedSender<EngineEvent>,
    active: Mutex<Option<JoinHandle<()>>>,
}

impl TokioTickScheduler {
    pub fn new(events: WeakUnboundedSender<EngineEvent>) -> Self {
        Self {
            events,
            active: Mutex::new(None),
        }
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule_ticks(&self, generation: SpinGeneration, plan: TickPlan) {
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let period = plan.interval.max(Duration::from_millis(1));
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            for _ in 0..plan.ticks {
                interval.tick().await;
                let Some(tx) = events.upgrade() else {
                    return;
                };
                if tx.send(EngineEvent::Tick { generation }).is_err() {
                    return;
                }
            }

            if let Some(tx) = events.upgrade() {
                let _ = tx.send(EngineEvent::SpinExpired { generation });
            }
        });

        let previous = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn cancel(&self) {
        let active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = active {
            trace!("cancelling tick task");
            task.abort();
        }
    }
}

impl Drop for TokioTickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Clone, Default)]
pub struct ManualTickScheduler {
    inner: Arc<Mutex<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    active: Option<(SpinGeneration, TickPlan)>,
    scheduled: Vec<(SpinGeneration, TickPlan)>,
    cancellations: usize,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<(SpinGeneration, TickPlan)> {
        self.lock().active
    }

    pub fn scheduled(&self) -> Vec<(SpinGeneration, TickPlan)> {
        self.lock().scheduled.clone()
    }

    pub fn cancellations(&self) -> usize {
        self.lock().cancellations
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule_ticks(&self, generation: SpinGeneration, plan: TickPlan) {
        let mut state = self.lock();
        state.active = Some((generation, plan));
        state.scheduled.push((generation, plan));
    }

    fn cancel(&self) {
        let mut state = self.lock();
        state.active = None;
        state.cancellations += 1;
    }
}
