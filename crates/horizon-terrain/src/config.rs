use serde::Deserialize;

use crate::height::HeightParams;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TerrainConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub height: HeightConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            height: HeightConfig::default(),
        }
    }
}

fn default_seed() -> i32 {
    0
}

/// Fractal sum parameters. `step` is the quantization applied after summing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HeightConfig {
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_amplitude_decay")]
    pub amplitude_decay: f32,
    #[serde(default = "default_frequency_decay")]
    pub frequency_decay: f32,
    #[serde(default = "default_step")]
    pub step: f32,
}
fn default_amplitude() -> f32 {
    100.0
}
fn default_frequency() -> f32 {
    0.0015974
}
fn default_amplitude_decay() -> f32 {
    6.0
}
fn default_frequency_decay() -> f32 {
    0.5
}
fn default_step() -> f32 {
    60.0
}
impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            amplitude_decay: default_amplitude_decay(),
            frequency_decay: default_frequency_decay(),
            step: default_step(),
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), String> {
        let h = &self.height;
        let fields = [
            ("height.amplitude", h.amplitude),
            ("height.frequency", h.frequency),
            ("height.amplitude_decay", h.amplitude_decay),
            ("height.frequency_decay", h.frequency_decay),
            ("height.step", h.step),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(format!("{name} must be finite (got {v})"));
            }
        }
        if h.step <= 0.0 {
            return Err(format!("height.step must be > 0 (got {})", h.step));
        }
        Ok(())
    }

    pub fn height_params(&self) -> HeightParams {
        HeightParams {
            amplitude: self.height.amplitude,
            frequency: self.height.frequency,
            amplitude_decay: self.height.amplitude_decay,
            frequency_decay: self.height.frequency_decay,
            step: self.height.step,
        }
    }
}
