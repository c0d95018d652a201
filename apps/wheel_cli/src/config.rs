use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use shared::WheelLayout;
use wheel_core::{EngineConfig, DEFAULT_FETCH_TIMEOUT, DEFAULT_IMAGE_URL};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub image_url: String,
    pub fetch_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub angle_step: f64,
    pub min_spin_secs: u64,
    pub max_spin_secs: u64,
    pub wheel_size: i64,
    pub spin_seed: Option<u64>,
    pub log_filter: String,
    pub ignored: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            image_url: DEFAULT_IMAGE_URL.into(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            tick_interval_ms: engine.tick_interval.as_millis() as u64,
            angle_step: engine.angle_step,
            min_spin_secs: engine.min_spin_secs,
            max_spin_secs: engine.max_spin_secs,
            wheel_size: shared::layout::DEFAULT_WHEEL_SIZE,
            spin_seed: None,
            log_filter: "info".into(),
            ignored: Vec::new(),
        }
    }
}

/// `(settings file key, environment variable names)` in ascending priority.
const OVERRIDES: &[(&str, &[&str])] = &[
    ("image_url", &["WHEEL_IMAGE_URL", "APP__IMAGE_URL"]),
    ("fetch_timeout_secs", &["APP__FETCH_TIMEOUT_SECS"]),
    ("tick_interval_ms", &["APP__TICK_INTERVAL_MS"]),
    ("angle_step", &["APP__ANGLE_STEP"]),
    ("min_spin_secs", &["APP__MIN_SPIN_SECS"]),
    ("max_spin_secs", &["APP__MAX_SPIN_SECS"]),
    ("wheel_size", &["APP__WHEEL_SIZE"]),
    ("spin_seed", &["APP__SPIN_SEED"]),
    ("log_filter", &["APP__LOG_FILTER"]),
];

pub fn load_settings(path: &Path) -> Settings {
    load_settings_from(path, |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match raw.parse::<toml::Table>() {
            Ok(table) => {
                for (key, value) in &table {
                    let Some(raw_value) = scalar_to_string(value) else {
                        settings.ignored.push(format!("{}: '{key}' is not a scalar", path.display()));
                        continue;
                    };
                    settings.apply(key, &raw_value, &path.display().to_string());
                }
            }
            Err(err) => settings
                .ignored
                .push(format!("{}: not valid toml: {err}", path.display())),
        }
    }

    for &(key, env_names) in OVERRIDES {
        for &env_name in env_names {
            if let Some(value) = env(env_name) {
                settings.apply(key, &value, env_name);
            }
        }
    }

    settings
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(v) => Some(v.clone()),
        toml::Value::Integer(v) => Some(v.to_string()),
        toml::Value::Float(v) => Some(v.to_string()),
        toml::Value::Boolean(v) => Some(v.to_string()),
        _ => None,
    }
}

impl Settings {
    fn apply(&mut self, key: &str, raw: &str, source: &str) {
        let raw = raw.trim();
        let applied = match key {
            "image_url" => {
                self.image_url = raw.to_string();
                true
            }
            "log_filter" => {
                self.log_filter = raw.to_string();
                true
            }
            "fetch_timeout_secs" => set_parsed(&mut self.fetch_timeout_secs, raw),
            "tick_interval_ms" => set_parsed(&mut self.tick_interval_ms, raw),
            "angle_step" => set_parsed(&mut self.angle_step, raw),
            "min_spin_secs" => set_parsed(&mut self.min_spin_secs, raw),
            "max_spin_secs" => set_parsed(&mut self.max_spin_secs, raw),
            "wheel_size" => set_parsed(&mut self.wheel_size, raw),
            "spin_seed" => {
                let mut seed = 0u64;
                let ok = set_parsed(&mut seed, raw);
                if ok {
                    self.spin_seed = Some(seed);
                }
                ok
            }
            _ => {
                self.ignored.push(format!("{source}: unknown setting '{key}'"));
                return;
            }
        };

        if !applied {
            self.ignored
                .push(format!("{source}: invalid value '{raw}' for '{key}'"));
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        if self.min_spin_secs == 0 {
            bail!("min_spin_secs must be at least 1");
        }
        if self.min_spin_secs > self.max_spin_secs {
            bail!(
                "min_spin_secs ({}) exceeds max_spin_secs ({})",
                self.min_spin_secs,
                self.max_spin_secs
            );
        }
        if !self.angle_step.is_finite() {
            bail!("angle_step must be a finite number of degrees");
        }
        WheelLayout::from_size(self.wheel_size)
            .with_context(|| format!("wheel_size {} is out of range", self.wheel_size))?;
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            angle_step: self.angle_step,
            min_spin_secs: self.min_spin_secs,
            max_spin_secs: self.max_spin_secs,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn settle_deadline(&self) -> Duration {
        Duration::from_secs(self.max_spin_secs + self.fetch_timeout_secs + 5)
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, raw: &str) -> bool {
    match raw.parse::<T>() {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
