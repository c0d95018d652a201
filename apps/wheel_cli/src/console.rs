use std::sync::{Mutex, PoisonError};

use shared::{ResultPayload, SpinPhase, WheelSnapshot};
use wheel_core::RenderPort;

pub struct ConsoleRenderPort {
    json: bool,
    last: Mutex<Option<(SpinPhase, bool, i64)>>,
}

impl ConsoleRenderPort {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last: Mutex::new(None),
        }
    }
}

impl ConsoleRenderPort {
    fn admit(&self, snapshot: &WheelSnapshot) -> bool {
        let key = (
            snapshot.rotation.phase,
            snapshot.payload == ResultPayload::ImagePending,
            snapshot.layout.size,
        );
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if *last == Some(key) {
            return false;
        }
        *last = Some(key);
        true
    }
}

impl RenderPort for ConsoleRenderPort {
    fn on_state_changed(&self, snapshot: &WheelSnapshot) {
        if !self.admit(snapshot) {
            return;
        }

        if self.json {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!("failed to encode snapshot: {err}"),
            }
        } else {
            println!("{}", describe(snapshot));
        }
    }
}

pub fn describe(snapshot: &WheelSnapshot) -> String {
    let rotation = &snapshot.rotation;
    match rotation.phase {
        SpinPhase::Idle => format!(
            "wheel ready (size {}, radius {:.0})",
            snapshot.layout.size, snapshot.layout.drum_radius
        ),
        SpinPhase::Spinning => format!("spinning from {:.0} degrees...", rotation.start_angle),
        SpinPhase::Resolving => match snapshot.payload {
            ResultPayload::ImagePending => "wheel stopped, fetching image...".to_string(),
            _ => "wheel stopped".to_string(),
        },
        SpinPhase::Settled => {
            let sector = rotation.winning_sector;
            let label = sector.map(|s| s.display_text).unwrap_or("?");
            match &snapshot.payload {
                ResultPayload::Text(text) => {
                    let rgb = sector.map(|s| s.color.rgb()).unwrap_or(0xFF_FF_FF);
                    format!("result: {}", paint(text, rgb))
                }
                ResultPayload::Image(image) => {
                    let frame = snapshot.layout.frame();
                    let (sx, sy) =
                        image.scale_to(snapshot.layout.image_width, snapshot.layout.image_height);
                    format!(
                        "result: {label} image {}x{} shown at ({:.0}, {:.0}) scaled {sx:.2}x{sy:.2}",
                        image.width(),
                        image.height(),
                        frame.image_origin.0,
                        frame.image_origin.1,
                    )
                }
                ResultPayload::Failed(reason) => format!("result: {label} image unavailable ({reason})"),
                ResultPayload::Empty | ResultPayload::ImagePending => format!("result: {label}"),
            }
        }
    }
}

pub fn describe_wheel(snapshot: &WheelSnapshot) -> String {
    let mut out = format!(
        "generation {} | phase {:?} | start angle {:.1}\n",
        snapshot.generation.0, snapshot.rotation.phase, snapshot.rotation.start_angle
    );
    for arc in snapshot.rotation.arcs() {
        let marker = if snapshot.rotation.winning_sector == Some(arc.sector) {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "{marker} {:<10} {:>6.1} +{:.1}\n",
            arc.sector.display_text, arc.start, arc.sweep
        ));
    }
    out.push_str(&describe(snapshot));
    out
}

pub fn frame_summary(frames: &[WheelSnapshot]) -> String {
    let mut counts: Vec<(SpinPhase, usize)> = Vec::new();
    for frame in frames {
        match counts.iter_mut().find(|(phase, _)| *phase == frame.rotation.phase) {
            Some((_, count)) => *count += 1,
            None => counts.push((frame.rotation.phase, 1)),
        }
    }

    let mut out = format!("{} frames", frames.len());
    for (phase, count) in counts {
        out.push_str(&format!(", {phase:?} {count}"));
    }
    out
}

fn paint(text: &str, rgb: u32) -> String {
    let (r, g, b) = ((rgb >> 16) & 0xFF, (rgb >> 8) & 0xFF, rgb & 0xFF);
    format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
}
