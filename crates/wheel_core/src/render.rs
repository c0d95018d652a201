use std::sync::{Arc, Mutex, PoisonError};

use shared::WheelSnapshot;

/// Called after every tick, phase change and resize. Implementations must be cheap.
pub trait RenderPort: Send + Sync {
    fn on_state_changed(&self, snapshot: &WheelSnapshot);
}

pub struct NullRenderPort;

impl RenderPort for NullRenderPort {
    fn on_state_changed(&self, _snapshot: &WheelSnapshot) {}
}

#[derive(Clone, Default)]
pub struct RecordingRenderPort {
    frames: Arc<Mutex<Vec<WheelSnapshot>>>,
}

impl RecordingRenderPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<WheelSnapshot> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<WheelSnapshot> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl RenderPort for RecordingRenderPort {
    fn on_state_changed(&self, snapshot: &WheelSnapshot) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot.clone());
    }
}

pub struct FanoutRenderPort {
    ports: Vec<Arc<dyn RenderPort>>,
}

impl FanoutRenderPort {
    pub fn new(ports: Vec<Arc<dyn RenderPort>>) -> Self {
        Self { ports }
    }
}

impl RenderPort for FanoutRenderPort {
    fn on_state_changed(&self, snapshot: &WheelSnapshot) {
        for port in &self.ports {
            port.on_state_changed(snapshot);
        }
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
