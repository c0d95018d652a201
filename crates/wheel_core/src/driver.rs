use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use shared::{FetchError, ResultPayload, SpinGeneration, WheelSnapshot};
use thiserror::Error;
use tokio::{
    sync::{
        mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender},
        oneshot,
    },
    task::JoinHandle,
};
use tracing::{debug, trace, warn};

use crate::{
    engine::{EngineConfig, PendingFetch, RotationEngine, SpinDurationPicker},
    events::{EngineEvent, HostCommand},
    render::RenderPort,
    resolver::OutcomeResolver,
    scheduler::TokioTickScheduler,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    #[error("wheel driver has stopped")]
    Stopped,
}

#[derive(Clone)]
pub struct WheelHandle {
    events: UnboundedSender<EngineEvent>,
}

impl WheelHandle {
    pub fn start_spin(&self) -> Result<(), DriverError> {
        self.send(EngineEvent::Host(HostCommand::StartSpin))
    }

    pub fn reset(&self) -> Result<(), DriverError> {
        self.send(EngineEvent::Host(HostCommand::Reset))
    }

    pub fn resize(&self, size: i64) -> Result<(), DriverError> {
        self.send(EngineEvent::Host(HostCommand::Resize(size)))
    }

    pub async fn snapshot(&self) -> Result<WheelSnapshot, DriverError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(EngineEvent::Host(HostCommand::Snapshot(reply_tx)))?;
        reply_rx.await.map_err(|_| DriverError::Stopped)
    }

    pub fn shutdown(&self) -> Result<(), DriverError> {
        self.send(EngineEvent::Shutdown)
    }

    fn send(&self, event: EngineEvent) -> Result<(), DriverError> {
        self.events.send(event).map_err(|_| DriverError::Stopped)
    }
}

pub struct WheelDriver;

impl WheelDriver {
    pub fn spawn(
        config: EngineConfig,
        render: Arc<dyn RenderPort>,
        resolver: OutcomeResolver,
        durations: Box<dyn SpinDurationPicker>,
    ) -> (WheelHandle, JoinHandle<()>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let weak_tx = events_tx.downgrade();
        let scheduler = TokioTickScheduler::new(weak_tx.clone());
        let engine = RotationEngine::new(config, Box::new(scheduler), render, resolver, durations);

        let task = tokio::spawn(run_event_loop(engine, weak_tx, events_rx));
        (WheelHandle { events: events_tx }, task)
    }
}

async fn run_event_loop(
    mut engine: RotationEngine,
    events_tx: WeakUnboundedSender<EngineEvent>,
    mut events_rx: UnboundedReceiver<EngineEvent>,
) {
    debug!("wheel driver started");
    let mut in_flight: Option<(SpinGeneration, JoinHandle<()>)> = None;

    while let Some(event) = events_rx.recv().await {
        let name = event.name();
        let outcome = match event {
            EngineEvent::Host(HostCommand::StartSpin) => engine.start_spin().map(|_| ()),
            EngineEvent::Host(HostCommand::Reset) => {
                engine.reset();
                Ok(())
            }
            EngineEvent::Host(HostCommand::Resize(size)) => engine.resize(size),
            EngineEvent::Host(HostCommand::Snapshot(reply)) => {
                let _ = reply.send(engine.snapshot());
                Ok(())
            }
            EngineEvent::Tick { generation } => engine.on_tick(generation),
            EngineEvent::SpinExpired { generation } => engine.on_spin_timer_expire(generation),
            EngineEvent::FetchCompleted {
                generation,
                payload,
            } => engine.resolution_complete(generation, payload),
            EngineEvent::Shutdown => break,
        };

        match outcome {
            Ok(()) => {}
            Err(err) if err.is_stale() => trace!(event = name, "discarding stale event: {err}"),
            Err(err) => debug!(event = name, "engine ignored event: {err}"),
        }

        if let Some((generation, task)) = in_flight.take() {
            if generation == engine.generation() && !task.is_finished() {
                in_flight = Some((generation, task));
            } else if !task.is_finished() {
                debug!(generation = generation.0, "aborting superseded image fetch");
                task.abort();
            }
        }

        if let Some(fetch) = engine.take_pending_fetch() {
            let generation = fetch.generation;
            in_flight = Some((generation, spawn_fetch(fetch, events_tx.clone())));
        }
    }

    if let Some((_, task)) = in_flight {
        task.abort();
    }
    engine.halt();
    debug!("wheel driver stopped");
}

fn spawn_fetch(fetch: PendingFetch, events_tx: WeakUnboundedSender<EngineEvent>) -> JoinHandle<()> {
    let PendingFetch { generation, future } = fetch;
    tokio::spawn(async move {
        let payload = match AssertUnwindSafe(future).catch_unwind().await {
            Ok(payload) => payload,
            Err(_) => {
                warn!(generation = generation.0, "image fetch panicked");
                ResultPayload::Failed(FetchError::Unavailable)
            }
        };

        if let Some(tx) = events_tx.upgrade() {
            let _ = tx.send(EngineEvent::FetchCompleted {
                generation,
                payload,
            });
        }
    })
}
