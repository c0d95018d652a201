pub mod domain;
pub mod error;
pub mod layout;
pub mod state;

pub use domain::{ResultKind, Sector, SectorArc, SectorColor, SectorTable};
pub use error::{EngineError, FetchError};
pub use layout::{Rect, WheelFrame, WheelLayout};
pub use state::{ImageHandle, ResultPayload, RotationState, SpinGeneration, SpinPhase, WheelSnapshot};
