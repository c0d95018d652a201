use std::{fmt, sync::Arc, time::Duration};

use futures::future::BoxFuture;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::{
    domain::normalize_angle, EngineError, ResultPayload, RotationState, Sector, SectorColor,
    SectorTable, SpinGeneration, SpinPhase, WheelLayout, WheelSnapshot,
};
use tracing::{debug, info, trace, warn};

use crate::{
    render::RenderPort,
    resolver::{OutcomeResolver, Resolution},
    scheduler::{TickPlan, TickScheduler},
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_ANGLE_STEP: f64 = 10.0;
pub const DEFAULT_MIN_SPIN_SECS: u64 = 1;
pub const DEFAULT_MAX_SPIN_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    pub angle_step: f64,
    pub min_spin_secs: u64,
    pub max_spin_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            angle_step: DEFAULT_ANGLE_STEP,
            min_spin_secs: DEFAULT_MIN_SPIN_SECS,
            max_spin_secs: DEFAULT_MAX_SPIN_SECS,
        }
    }
}

pub trait SpinDurationPicker: Send {
    fn pick(&mut self) -> Duration;
}

pub struct RandomSpinDuration {
    rng: StdRng,
    min_secs: u64,
    max_secs: u64,
}

impl RandomSpinDuration {
    pub fn new(min_secs: u64, max_secs: u64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            min_secs: min_secs.min(max_secs),
            max_secs: max_secs.max(min_secs),
        }
    }

    pub fn from_config(config: &EngineConfig, seed: Option<u64>) -> Self {
        Self::new(config.min_spin_secs, config.max_spin_secs, seed)
    }
}

impl SpinDurationPicker for RandomSpinDuration {
    fn pick(&mut self) -> Duration {
        Duration::from_secs(self.rng.gen_range(self.min_secs..=self.max_secs))
    }
}

pub struct FixedSpinDuration(pub Duration);

impl SpinDurationPicker for FixedSpinDuration {
    fn pick(&mut self) -> Duration {
        self.0
    }
}

pub struct PendingFetch {
    pub generation: SpinGeneration,
    pub future: BoxFuture<'static, ResultPayload>,
}

impl fmt::Debug for PendingFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFetch")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

pub struct RotationEngine {
    config: EngineConfig,
    table: SectorTable,
    rotation: RotationState,
    payload: ResultPayload,
    layout: WheelLayout,
    generation: SpinGeneration,
    ticks_delivered: u32,
    cached_winner: &'static Sector,
    resolving_sector: Option<&'static Sector>,
    pending_fetch: Option<PendingFetch>,
    scheduler: Box<dyn TickScheduler>,
    render: Arc<dyn RenderPort>,
    resolver: OutcomeResolver,
    durations: Box<dyn SpinDurationPicker>,
}

impl RotationEngine {
    pub fn new(
        config: EngineConfig,
        scheduler: Box<dyn TickScheduler>,
        render: Arc<dyn RenderPort>,
        resolver: OutcomeResolver,
        durations: Box<dyn SpinDurationPicker>,
    ) -> Self {
        let table = SectorTable::standard();
        let rotation = RotationState::default();
        let cached_winner = table
            .sector_at(rotation.start_angle)
            .unwrap_or_else(|| table.get(SectorColor::Red));

        Self {
            config,
            table,
            rotation,
            payload: ResultPayload::Empty,
            layout: WheelLayout::default(),
            generation: SpinGeneration::default(),
            ticks_delivered: 0,
            cached_winner,
            resolving_sector: None,
            pending_fetch: None,
            scheduler,
            render,
            resolver,
            durations,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> SpinPhase {
        self.rotation.phase
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    pub fn payload(&self) -> &ResultPayload {
        &self.payload
    }

    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    pub fn generation(&self) -> SpinGeneration {
        self.generation
    }

    pub fn ticks_delivered(&self) -> u32 {
        self.ticks_delivered
    }

    pub fn snapshot(&self) -> WheelSnapshot {
        WheelSnapshot {
            generation: self.generation,
            rotation: self.rotation,
            payload: self.payload.clone(),
            layout: self.layout,
        }
    }

    /// Starts a new spin and returns its duration.
    ///
    /// Rejected while the wheel is already spinning. Starting from `Resolving`
    /// abandons the outstanding image fetch.
    pub fn start_spin(&mut self) -> Result<Duration, EngineError> {
        if self.rotation.phase == SpinPhase::Spinning {
            return Err(EngineError::SpinInProgress);
        }

        let duration = self.durations.pick();
        let plan = TickPlan::for_duration(duration, self.config.tick_interval);

        self.scheduler.cancel();
        self.begin_generation();
        self.rotation.phase = SpinPhase::Spinning;
        self.scheduler.schedule_ticks(self.generation, plan);

        info!(
            generation = self.generation.0,
            duration_secs = duration.as_secs_f32(),
            ticks = plan.ticks,
            start_angle = self.rotation.start_angle,
            "spin started"
        );
        self.notify();
        Ok(duration)
    }

    pub fn on_tick(&mut self, generation: SpinGeneration) -> Result<(), EngineError> {
        self.ensure_current(generation)?;
        if self.rotation.phase != SpinPhase::Spinning {
            return Err(EngineError::NotSpinning(self.rotation.phase));
        }

        self.rotation.start_angle = normalize_angle(self.rotation.start_angle + self.config.angle_step);
        self.ticks_delivered += 1;
        trace!(
            generation = generation.0,
            tick = self.ticks_delivered,
            start_angle = self.rotation.start_angle,
            "tick"
        );
        self.notify();
        Ok(())
    }

    pub fn on_spin_timer_expire(&mut self, generation: SpinGeneration) -> Result<(), EngineError> {
        self.ensure_current(generation)?;
        if self.rotation.phase != SpinPhase::Spinning {
            return Err(EngineError::NotSpinning(self.rotation.phase));
        }

        self.scheduler.cancel();
        self.rotation.phase = SpinPhase::Resolving;
        self.notify();

        let winner = match self.table.sector_at(self.rotation.start_angle) {
            Some(sector) => {
                self.cached_winner = sector;
                sector
            }
            None => {
                warn!(
                    start_angle = self.rotation.start_angle,
                    fallback = self.cached_winner.display_text,
                    "no sector under indicator; using previous winner"
                );
                self.cached_winner
            }
        };
        self.resolving_sector = Some(winner);

        info!(
            generation = generation.0,
            ticks = self.ticks_delivered,
            start_angle = self.rotation.start_angle,
            sector = winner.display_text,
            "spin stopped"
        );

        match self.resolver.resolve(winner) {
            Resolution::Ready(payload) => self.settle(payload),
            Resolution::Pending(future) => {
                self.payload = ResultPayload::ImagePending;
                self.pending_fetch = Some(PendingFetch { generation, future });
                debug!(generation = generation.0, "image fetch pending");
                self.notify();
            }
        }
        Ok(())
    }

    pub fn resolution_complete(
        &mut self,
        generation: SpinGeneration,
        payload: ResultPayload,
    ) -> Result<(), EngineError> {
        self.ensure_current(generation)?;
        if self.rotation.phase != SpinPhase::Resolving {
            return Err(EngineError::NotResolving(self.rotation.phase));
        }
        if !payload.is_terminal() {
            return Err(EngineError::NonTerminalPayload);
        }

        self.settle(payload);
        Ok(())
    }

    pub fn take_pending_fetch(&mut self) -> Option<PendingFetch> {
        self.pending_fetch.take()
    }

    pub fn reset(&mut self) {
        self.scheduler.cancel();
        self.begin_generation();
        self.rotation = RotationState::default();
        info!(generation = self.generation.0, "wheel reset");
        self.notify();
    }

    pub fn resize(&mut self, size: i64) -> Result<(), EngineError> {
        self.layout = WheelLayout::from_size(size)?;
        debug!(
            size,
            drum_radius = self.layout.drum_radius,
            text_size = self.layout.text_size,
            "wheel resized"
        );
        self.notify();
        Ok(())
    }

    pub fn halt(&mut self) {
        self.scheduler.cancel();
        self.pending_fetch = None;
    }

    fn begin_generation(&mut self) {
        self.generation = self.generation.next();
        self.payload = ResultPayload::Empty;
        self.rotation.winning_sector = None;
        self.resolving_sector = None;
        self.pending_fetch = None;
        self.ticks_delivered = 0;
    }

    fn settle(&mut self, payload: ResultPayload) {
        self.payload = payload;
        self.rotation.phase = SpinPhase::Settled;
        self.rotation.winning_sector = self.resolving_sector.take();
        info!(
            generation = self.generation.0,
            sector = self.rotation.winning_sector.map(|sector| sector.display_text),
            result = payload_label(&self.payload),
            "spin settled"
        );
        self.notify();
    }

    fn ensure_current(&self, generation: SpinGeneration) -> Result<(), EngineError> {
        if generation == self.generation {
            Ok(())
        } else {
            Err(EngineError::StaleGeneration {
                expected: self.generation,
                got: generation,
            })
        }
    }

    fn notify(&self) {
        self.render.on_state_changed(&self.snapshot());
    }
}

fn payload_label(payload: &ResultPayload) -> &'static str {
    match payload {
        ResultPayload::Empty => "empty",
        ResultPayload::Text(_) => "text",
        ResultPayload::ImagePending => "image_pending",
        ResultPayload::Image(_) => "image",
        ResultPayload::Failed(_) => "failed",
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
