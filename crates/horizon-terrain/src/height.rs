use crate::config::TerrainConfig;
use crate::noise::NoiseField;

/// Number of noise octaves summed per height sample.
pub const OCTAVES: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub amplitude_decay: f32,
    pub frequency_decay: f32,
    pub step: f32,
}

impl Default for HeightParams {
    fn default() -> Self {
        TerrainConfig::default().height_params()
    }
}

/// Snap `n` to the nearest multiple of `step`. Ties round half away from zero
/// (`f32::round`), so the terrain is symmetric around height 0.
#[inline]
pub fn quantize(n: f32, step: f32) -> f32 {
    (n / step).round() * step
}

/// Two-octave fractal height over a [`NoiseField`], quantized to `params.step`.
#[derive(Debug)]
pub struct HeightSampler {
    noise: NoiseField,
    params: HeightParams,
}

impl HeightSampler {
    pub fn new(seed: i32, params: HeightParams) -> Self {
        debug_assert!(params.step > 0.0);
        log::debug!(
            target: "terrain",
            "height sampler seed {} amp {} freq {} step {}",
            seed,
            params.amplitude,
            params.frequency,
            params.step
        );
        Self {
            noise: NoiseField::new(seed),
            params,
        }
    }

    pub fn from_config(cfg: &TerrainConfig) -> Self {
        Self::new(cfg.seed, cfg.height_params())
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.noise.seed()
    }

    #[inline]
    pub fn params(&self) -> &HeightParams {
        &self.params
    }

    /// Unquantized fractal sum.
    pub fn fbm(&self, x: f32, z: f32) -> f32 {
        let mut amp = self.params.amplitude;
        let mut f = self.params.frequency;
        let mut n = 0.0;
        for _ in 0..OCTAVES {
            n += amp * self.noise.sample(x * f, z * f);
            amp *= self.params.amplitude_decay;
            f *= self.params.frequency_decay;
        }
        n
    }

    #[inline]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        quantize(self.fbm(x, z), self.params.step)
    }

    /// Upper bound on `|height|` implied by the noise range and octave amplitudes.
    pub fn max_abs_height(&self) -> f32 {
        let mut amp = self.params.amplitude.abs();
        let mut total = 0.0;
        for _ in 0..OCTAVES {
            total += amp;
            amp *= self.params.amplitude_decay.abs();
        }
        quantize(total, self.params.step).abs() + self.params.step
    }
}
