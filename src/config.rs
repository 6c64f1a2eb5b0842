use crate::dispatch::{DEFAULT_DISPATCH_THREADS, set_num_dispatch_threads};
use crate::filters::FilterDropShadow;
use crate::foundation::core::{Rect, Rgba32};
use crate::foundation::error::{RasterFxError, RasterFxResult};

/// Environment variable read by [`EngineConfig::from_env`].
pub const DISPATCH_THREADS_ENV: &str = "RASTERFX_DISPATCH_THREADS";

/// Process-wide engine settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Threads taking part in a dispatch, the calling thread included.
    pub dispatch_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dispatch_threads: DEFAULT_DISPATCH_THREADS,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> RasterFxResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| RasterFxError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read [`DISPATCH_THREADS_ENV`]; unset means the default.
    pub fn from_env() -> RasterFxResult<Self> {
        let value = std::env::var(DISPATCH_THREADS_ENV).ok();
        Self::from_env_value(value.as_deref())
    }

    fn from_env_value(value: Option<&str>) -> RasterFxResult<Self> {
        let Some(raw) = value else {
            return Ok(Self::default());
        };
        let dispatch_threads = raw.trim().parse::<usize>().map_err(|_| {
            RasterFxError::validation(format!(
                "{DISPATCH_THREADS_ENV} must be a positive integer, got '{raw}'"
            ))
        })?;
        let cfg = Self { dispatch_threads };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> RasterFxResult<()> {
        if self.dispatch_threads == 0 {
            return Err(RasterFxError::validation("dispatch_threads must be > 0"));
        }
        Ok(())
    }

    /// Validate, then make these settings current for the process.
    pub fn apply(&self) -> RasterFxResult<()> {
        self.validate()?;
        set_num_dispatch_threads(self.dispatch_threads);
        tracing::debug!(dispatch_threads = self.dispatch_threads, "engine config applied");
        Ok(())
    }
}

/// Drop shadow attributes as authored, before clamping.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DropShadowParams {
    /// Horizontal offset.
    pub dx: f64,
    /// Vertical offset.
    pub dy: f64,
    /// Blur deviation.
    #[serde(alias = "stdDeviation")]
    pub std_deviation: f64,
    /// Shadow color as `#RRGGBB` or `#RRGGBBAA`.
    #[serde(alias = "flood-color", with = "hex_color")]
    pub flood_color: Rgba32,
    /// Shadow opacity.
    #[serde(alias = "flood-opacity")]
    pub flood_opacity: f64,
}

impl Default for DropShadowParams {
    fn default() -> Self {
        Self {
            dx: 2.0,
            dy: 2.0,
            std_deviation: 2.0,
            flood_color: Rgba32::BLACK,
            flood_opacity: 1.0,
        }
    }
}

impl DropShadowParams {
    /// Parse a JSON object of drop shadow attributes.
    pub fn from_json_str(s: &str) -> RasterFxResult<Self> {
        let params: Self =
            serde_json::from_str(s).map_err(|e| RasterFxError::serde(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Every number must be finite; range limits are left to the primitive's setters.
    pub fn validate(&self) -> RasterFxResult<()> {
        for (name, value) in [
            ("dx", self.dx),
            ("dy", self.dy),
            ("std_deviation", self.std_deviation),
            ("flood_opacity", self.flood_opacity),
        ] {
            if !value.is_finite() {
                return Err(RasterFxError::validation(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// A primitive configured through its clamping setters.
    pub fn build(&self) -> FilterDropShadow {
        let mut primitive = FilterDropShadow::new();
        primitive.set_dx(self.dx);
        primitive.set_dy(self.dy);
        primitive.set_std_deviation(self.std_deviation);
        primitive.set_flood_color(self.flood_color);
        primitive.set_flood_opacity(self.flood_opacity);
        primitive
    }

    /// Filter region needed around `region` (user space): `3 * stdDeviation + |offset|` on
    /// every side.
    pub fn calculate_region(&self, region: Rect) -> Rect {
        let blur = 3.0 * self.std_deviation.max(0.0);
        region.inflate(blur + self.dx.abs(), blur + self.dy.abs())
    }
}

mod hex_color {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::foundation::core::Rgba32;

    pub(super) fn serialize<S: Serializer>(color: &Rgba32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("#{:08x}", color.0))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Rgba32, D::Error> {
        let raw = String::deserialize(d)?;
        Rgba32::parse_hex(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
