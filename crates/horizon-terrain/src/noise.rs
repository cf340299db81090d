use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Deterministic 2D scalar noise over continuous coordinates.
///
/// Backed by OpenSimplex2 at unit frequency, so callers scale coordinates
/// themselves. Output is clamped to `[-1, 1]`; the raw generator already
/// stays within that range up to float error, the clamp makes the bound exact.
pub struct NoiseField {
    noise: FastNoiseLite,
    seed: i32,
}

impl NoiseField {
    pub const MIN: f32 = -1.0;
    pub const MAX: f32 = 1.0;

    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(1.0));
        Self { noise, seed }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    #[inline]
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        self.noise.get_noise_2d(x, z).clamp(Self::MIN, Self::MAX)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
