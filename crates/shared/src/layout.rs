use serde::Serialize;

use crate::error::EngineError;

pub const DEFAULT_WHEEL_SIZE: i64 = 50;
pub const MAX_WHEEL_SIZE: i64 = 1000;

const DRUM_RADIUS_COEFFICIENT: f32 = 5.0;
const INDICATOR_RADIUS_COEFFICIENT: f32 = 0.4;
const TEXT_SIZE_COEFFICIENT: f32 = 1.8;
const IMAGE_WIDTH_COEFFICIENT: f64 = 6.4;
const IMAGE_HEIGHT_COEFFICIENT: f64 = 4.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelLayout {
    pub size: i64,
    pub drum_radius: f32,
    pub indicator_radius: f32,
    pub text_size: f32,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for WheelLayout {
    fn default() -> Self {
        Self {
            size: DEFAULT_WHEEL_SIZE,
            drum_radius: 250.0,
            indicator_radius: 20.0,
            text_size: 90.0,
            image_width: 320,
            image_height: 240,
        }
    }
}

impl WheelLayout {
    pub fn from_size(size: i64) -> Result<Self, EngineError> {
        if size <= 0 || size > MAX_WHEEL_SIZE {
            return Err(EngineError::InvalidSize(size));
        }

        let scale = size as f32;
        Ok(Self {
            size,
            drum_radius: scale * DRUM_RADIUS_COEFFICIENT,
            indicator_radius: scale * INDICATOR_RADIUS_COEFFICIENT,
            text_size: scale * TEXT_SIZE_COEFFICIENT,
            image_width: (size as f64 * IMAGE_WIDTH_COEFFICIENT) as u32,
            image_height: (size as f64 * IMAGE_HEIGHT_COEFFICIENT) as u32,
        })
    }

    pub fn frame(&self) -> WheelFrame {
        let width = self.drum_radius * 2.0;
        let height = self.drum_radius * 4.0;
        let center = (self.drum_radius, self.drum_radius);

        WheelFrame {
            width,
            height,
            drum_bounds: Rect {
                left: center.0 - self.drum_radius,
                top: center.1 - self.drum_radius,
                right: center.0 + self.drum_radius,
                bottom: center.1 + self.drum_radius,
            },
            drum_center: center,
            indicator_center: (width / 2.0, 0.0),
            text_origin: (width / 2.0, height / 4.0 * 3.0),
            image_origin: (
                (width - self.image_width as f32) / 2.0,
                (height / 2.0 - self.image_height as f32) / 2.0 + height / 2.0,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelFrame {
    pub width: f32,
    pub height: f32,
    pub drum_bounds: Rect,
    pub drum_center: (f32, f32),
    pub indicator_center: (f32, f32),
    pub text_origin: (f32, f32),
    pub image_origin: (f32, f32),
}
