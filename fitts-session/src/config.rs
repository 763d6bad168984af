use crate::error::ConfigError;
use fitts_core::{Axis, AxisMap, Bounds};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Which acquisition task a session runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Targets on a ring, presented in the alternating-stride order.
    #[default]
    Ring,
    /// Seeded random bars along the horizontal axis.
    Linear,
}

/// How base velocity is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// Canvas units per tick at intensity 1.
    #[default]
    PerTick,
    /// Canvas units per second at intensity 1, scaled by measured tick interval.
    PerSecond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    pub target_count: usize,
    pub ring_radius: f32,
    pub target_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    pub seed: u64,
    pub min_width: f32,
    pub max_width: f32,
    pub target_height: f32,
}

/// Construction-time parameters of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub variant: Variant,
    /// Local address the command socket binds to.
    pub bind_addr: String,
    pub tick_rate_hz: u32,
    pub canvas: Bounds,
    pub dwell_secs: f64,
    pub base_velocity: f32,
    pub cursor_size: f32,
    /// Widens every containment test by this much.
    pub tolerance: f32,
    pub motion: MotionMode,
    /// Confirmations that end the session (ring) or targets to present (linear).
    pub trials: u32,
    pub axis_map: AxisMap,
    pub ring: RingConfig,
    pub linear: LinearConfig,
}

impl SessionConfig {
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Ring => Self::ring(),
            Variant::Linear => Self::linear(),
        }
    }

    pub fn ring() -> Self {
        Self {
            variant: Variant::Ring,
            bind_addr: "127.0.0.1:12346".into(),
            tick_rate_hz: 60,
            canvas: Bounds::new(1250.0, 750.0),
            dwell_secs: 3.0,
            base_velocity: 20.0,
            cursor_size: 14.0,
            tolerance: 7.0,
            motion: MotionMode::PerTick,
            trials: 16,
            axis_map: [
                (1, Axis::NegX),
                (2, Axis::PosX),
                (3, Axis::PosY),
                (4, Axis::NegY),
            ]
            .into_iter()
            .collect(),
            ring: RingConfig::default(),
            linear: LinearConfig::default(),
        }
    }

    pub fn linear() -> Self {
        Self {
            variant: Variant::Linear,
            bind_addr: "127.0.0.1:12346".into(),
            tick_rate_hz: 240,
            canvas: Bounds::new(1000.0, 400.0),
            dwell_secs: 0.5,
            base_velocity: 4.0,
            cursor_size: 16.0,
            tolerance: 0.0,
            motion: MotionMode::PerTick,
            trials: 50,
            axis_map: [(1, Axis::PosX), (2, Axis::NegX)].into_iter().collect(),
            ring: RingConfig::default(),
            linear: LinearConfig::default(),
        }
    }

    /// Parses a TOML document on top of the preset for the variant it names.
    ///
    /// Keys absent from the document keep the preset's value; nested tables
    /// merge key by key, arrays (such as `axis_map`) replace wholesale.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let overlay: toml::Table = raw.parse()?;
        let variant: Variant = match overlay.get("variant") {
            Some(v) => v.clone().try_into()?,
            None => Variant::default(),
        };

        let toml::Value::Table(mut merged) = toml::Value::try_from(Self::preset(variant))? else {
            return Err(ConfigError::Invalid("preset did not encode as a table".into()));
        };
        merge_tables(&mut merged, overlay);

        let config: Self = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_for(self.variant)
    }

    /// Checks the shared fields plus the section `variant` runs from, whatever
    /// `self.variant` names.
    pub fn validate_for(&self, variant: Variant) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.tick_rate_hz == 0 {
            return invalid("tick_rate_hz must be positive".into());
        }
        if Duration::try_from_secs_f64(self.dwell_secs).is_err() {
            return invalid(format!(
                "dwell_secs must be a non-negative duration, got {}",
                self.dwell_secs
            ));
        }
        if !(self.base_velocity.is_finite() && self.base_velocity > 0.0) {
            return invalid(format!("base_velocity must be positive, got {}", self.base_velocity));
        }
        if !(self.cursor_size.is_finite() && self.cursor_size >= 0.0) {
            return invalid(format!("cursor_size must be non-negative, got {}", self.cursor_size));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return invalid(format!("tolerance must be non-negative, got {}", self.tolerance));
        }
        if self.canvas.width < self.cursor_size || self.canvas.height < self.cursor_size {
            return invalid(format!(
                "canvas {}x{} cannot hold a cursor of size {}",
                self.canvas.width, self.canvas.height, self.cursor_size
            ));
        }

        let mut seen = HashSet::new();
        for binding in self.axis_map.bindings() {
            if binding.class == 0 {
                return invalid("class 0 is rest and cannot be bound to an axis".into());
            }
            if !seen.insert(binding.class) {
                return invalid(format!("class {} is bound more than once", binding.class));
            }
        }

        let half_cursor = self.cursor_size / 2.0;
        match variant {
            Variant::Ring => {
                let RingConfig {
                    target_count,
                    ring_radius,
                    target_radius,
                } = self.ring;
                if target_count < 3 {
                    return invalid(format!(
                        "ring.target_count must be at least 3, got {target_count}"
                    ));
                }
                if !(ring_radius.is_finite() && ring_radius > 0.0) {
                    return invalid(format!("ring.ring_radius must be positive, got {ring_radius}"));
                }
                if !(target_radius.is_finite() && target_radius > 0.0) {
                    return invalid(format!(
                        "ring.target_radius must be positive, got {target_radius}"
                    ));
                }
                // Reach of the cursor centre from the canvas centre along the shorter side.
                let reach = self.canvas.width.min(self.canvas.height) / 2.0 - half_cursor;
                if ring_radius - target_radius - self.tolerance > reach {
                    return invalid(format!(
                        "ring targets at radius {ring_radius} lie beyond the cursor's reach of {reach}"
                    ));
                }
            }
            Variant::Linear => {
                let LinearConfig {
                    min_width,
                    max_width,
                    target_height,
                    ..
                } = self.linear;
                if !(min_width.is_finite() && max_width.is_finite() && min_width > 0.0) {
                    return invalid("linear widths must be positive".into());
                }
                if min_width > max_width {
                    return invalid(format!(
                        "linear.min_width {min_width} exceeds linear.max_width {max_width}"
                    ));
                }
                if !(target_height.is_finite() && target_height > 0.0) {
                    return invalid("linear.target_height must be positive".into());
                }
                // Bars pushed off the left edge start at `max_width + 10`.
                let reach = self.canvas.width - half_cursor;
                if max_width + 10.0 + min_width > reach {
                    return invalid(format!(
                        "linear bars up to {max_width} wide do not fit within the cursor's reach of {reach}"
                    ));
                }
                if max_width + self.tolerance < half_cursor {
                    return invalid(format!(
                        "linear.max_width {max_width} leaves bars at the right edge out of reach"
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_secs_f64(self.dwell_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::ring()
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            target_count: 8,
            ring_radius: 275.0,
            target_radius: 40.0,
        }
    }
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            min_width: 30.0,
            max_width: 30.0,
            target_height: 150.0,
        }
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        SessionConfig::ring().validate().unwrap();
        SessionConfig::linear().validate().unwrap();
    }

    #[test]
    fn empty_document_yields_ring_preset() {
        assert_eq!(SessionConfig::from_toml_str("").unwrap(), SessionConfig::ring());
    }

    #[test]
    fn overlay_keeps_unset_preset_values() {
        let config = SessionConfig::from_toml_str(
            r#"
            variant = "linear"
            dwell_secs = 1.5

            [linear]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.variant, Variant::Linear);
        assert_eq!(config.dwell_secs, 1.5);
        assert_eq!(config.linear.seed, 42);
        assert_eq!(config.linear.max_width, 30.0);
        assert_eq!(config.tick_rate_hz, 240);
        assert_eq!(config.axis_map.lookup(1), Some(Axis::PosX));
    }

    #[test]
    fn axis_map_replaces_wholesale() {
        let config = SessionConfig::from_toml_str(
            r#"
            [[axis_map]]
            class = 5
            axis = "-y"
            "#,
        )
        .unwrap();
        assert_eq!(config.axis_map.bindings().len(), 1);
        assert_eq!(config.axis_map.lookup(5), Some(Axis::NegY));
        assert_eq!(config.axis_map.lookup(1), None);
    }

    #[test]
    fn rejects_bad_values() {
        for doc in [
            "tick_rate_hz = 0",
            "dwell_secs = -1.0",
            "base_velocity = 0.0",
            "canvas = { width = 5.0, height = 750.0 }",
            "[ring]\ntarget_count = 0",
            "[ring]\ntarget_count = 2",
            "dwell_secs = 1e30",
            "dwell_secs = nan",
            "[ring]\nring_radius = -275.0",
            "[ring]\ntarget_radius = nan",
            "[ring]\nring_radius = 900.0",
            "variant = \"linear\"\n[linear]\nmin_width = 990.0\nmax_width = 990.0",
            "variant = \"linear\"\ncursor_size = 16.0\n[linear]\nmin_width = 2.0\nmax_width = 2.0",
            "variant = \"linear\"\n[linear]\nmin_width = 40.0\nmax_width = 30.0",
            "[[axis_map]]\nclass = 0\naxis = \"+x\"",
            "[[axis_map]]\nclass = 1\naxis = \"+x\"\n[[axis_map]]\nclass = 1\naxis = \"-x\"",
        ] {
            assert!(
                matches!(SessionConfig::from_toml_str(doc), Err(ConfigError::Invalid(_))),
                "{doc}"
            );
        }
    }

    #[test]
    fn unparsable_documents_are_parse_errors() {
        assert!(matches!(
            SessionConfig::from_toml_str("variant = \"spiral\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("dwell_secs = \"long\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SessionConfig::load(Path::new("/nonexistent/fitts.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fitts.toml"));
    }
}
