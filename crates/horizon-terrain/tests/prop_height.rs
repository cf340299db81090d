use horizon_terrain::{HeightParams, HeightSampler, TerrainConfig};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -1.0e6f32..1.0e6f32
}

fn step() -> impl Strategy<Value = f32> {
    prop_oneof![Just(60.0f32), Just(1.0f32), Just(25.0f32), 1.0f32..200.0]
}

proptest! {
    // Same inputs, same output, on the same sampler and on an independently built one
    #[test]
    fn height_is_deterministic(seed in any::<i32>(), x in coord(), z in coord()) {
        let a = HeightSampler::new(seed, HeightParams::default());
        let b = HeightSampler::new(seed, HeightParams::default());
        let h = a.height(x, z);
        prop_assert_eq!(h, a.height(x, z));
        prop_assert_eq!(h, b.height(x, z));
    }

    // Every height is a whole multiple of the quantization step
    #[test]
    fn height_is_multiple_of_step(seed in any::<i32>(), x in coord(), z in coord(), step in step()) {
        let params = HeightParams { step, ..HeightParams::default() };
        let s = HeightSampler::new(seed, params);
        let h = s.height(x, z);
        let k = h / step;
        prop_assert!((k - k.round()).abs() < 1e-4, "h={} step={}", h, step);
        prop_assert!(h.is_finite());
    }

    // With the reference step the remainder is exactly zero
    #[test]
    fn reference_step_remainder_is_zero(seed in any::<i32>(), x in coord(), z in coord()) {
        let s = HeightSampler::new(seed, HeightParams::default());
        prop_assert_eq!(s.height(x, z) % 60.0, 0.0);
    }

    // Quantization never moves a value by more than half a step
    #[test]
    fn quantized_close_to_fbm(seed in any::<i32>(), x in coord(), z in coord()) {
        let s = HeightSampler::from_config(&TerrainConfig { seed, ..TerrainConfig::default() });
        let raw = s.fbm(x, z);
        let h = s.height(x, z);
        prop_assert!((h - raw).abs() <= s.params().step * 0.5 + 1e-3);
    }
}
