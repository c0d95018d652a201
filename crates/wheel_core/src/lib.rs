pub mod driver;
pub mod engine;
pub mod events;
pub mod fetch;
pub mod render;
pub mod resolver;
pub mod scheduler;

pub use driver::{DriverError, WheelDriver, WheelHandle};
pub use engine::{
    EngineConfig, FixedSpinDuration, PendingFetch, RandomSpinDuration, RotationEngine,
    SpinDurationPicker,
};
pub use events::{EngineEvent, HostCommand};
pub use fetch::{
    decode_image, FetcherConfigError, HttpImageFetcher, ImageFetcher, UnavailableImageFetcher,
    DEFAULT_FETCH_TIMEOUT, DEFAULT_IMAGE_URL, DEFAULT_MAX_IMAGE_BYTES,
};
pub use render::{FanoutRenderPort, NullRenderPort, RecordingRenderPort, RenderPort};
pub use resolver::{OutcomeResolver, Resolution};
pub use scheduler::{ManualTickScheduler, TickPlan, TickScheduler, TokioTickScheduler};
