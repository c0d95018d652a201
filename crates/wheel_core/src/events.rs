use shared::{ResultPayload, SpinGeneration, WheelSnapshot};
use tokio::sync::oneshot;

pub enum HostCommand {
    StartSpin,
    Reset,
    Resize(i64),
    Snapshot(oneshot::Sender<WheelSnapshot>),
}

pub enum EngineEvent {
    Host(HostCommand),
    Tick {
        generation: SpinGeneration,
    },
    SpinExpired {
        generation: SpinGeneration,
    },
    FetchCompleted {
        generation: SpinGeneration,
        payload: ResultPayload,
    },
    Shutdown,
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Host(HostCommand::StartSpin) => "start_spin",
            EngineEvent::Host(HostCommand::Reset) => "reset",
            EngineEvent::Host(HostCommand::Resize(_)) => "resize",
            EngineEvent::Host(HostCommand::Snapshot(_)) => "snapshot",
            EngineEvent::Tick { .. } => "tick",
            EngineEvent::SpinExpired { .. } => "spin_expired",
            EngineEvent::FetchCompleted { .. } => "fetch_completed",
            EngineEvent::Shutdown => "shutdown",
        }
    }
}
