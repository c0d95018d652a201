use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize, Serializer};

use crate::{
    domain::{Sector, SectorColor, SectorTable},
    error::FetchError,
    layout::WheelLayout,
};

pub const DEFAULT_START_ANGLE: f64 = 270.0;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(SpinGeneration);

impl SpinGeneration {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPhase {
    #[default]
    Idle,
    Spinning,
    Resolving,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationState {
    pub start_angle: f64,
    pub phase: SpinPhase,
    #[serde(serialize_with = "serialize_sector_color")]
    pub winning_sector: Option<&'static Sector>,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            start_angle: DEFAULT_START_ANGLE,
            phase: SpinPhase::Idle,
            winning_sector: None,
        }
    }
}

impl RotationState {
    pub fn winning_color(&self) -> Option<SectorColor> {
        self.winning_sector.map(|sector| sector.color)
    }

    pub fn arcs(&self) -> impl Iterator<Item = crate::domain::SectorArc> {
        SectorTable::standard().arcs(self.start_angle)
    }
}

fn serialize_sector_color<S: Serializer>(
    sector: &Option<&'static Sector>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    sector.map(|sector| sector.color).serialize(serializer)
}

#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    inner: Arc<DecodedImage>,
}

#[derive(PartialEq, Eq)]
struct DecodedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageHandle {
    /// Returns `None` when `rgba` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if rgba.len() != expected {
            return None;
        }
        Some(Self {
            inner: Arc::new(DecodedImage {
                width,
                height,
                rgba,
            }),
        })
    }

    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.inner.rgba
    }

    pub fn scale_to(&self, width: u32, height: u32) -> (f32, f32) {
        let sx = width as f32 / self.inner.width.max(1) as f32;
        let sy = height as f32 / self.inner.height.max(1) as f32;
        (sx, sy)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.inner.width)
            .field("height", &self.inner.height)
            .finish_non_exhaustive()
    }
}

impl Serialize for ImageHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ImageHandle", 2)?;
        state.serialize_field("width", &self.inner.width)?;
        state.serialize_field("height", &self.inner.height)?;
        state.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResultPayload {
    #[default]
    Empty,
    Text(String),
    ImagePending,
    Image(ImageHandle),
    Failed(FetchError),
}

impl ResultPayload {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResultPayload::Text(_) | ResultPayload::Image(_) | ResultPayload::Failed(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelSnapshot {
    pub generation: SpinGeneration,
    pub rotation: RotationState,
    pub payload: ResultPayload,
    pub layout: WheelLayout,
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
