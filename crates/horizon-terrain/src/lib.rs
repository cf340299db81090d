//! Heightfield synthesis: noise field, fractal height sampler, and terrain parameters.
#![forbid(unsafe_code)]

pub mod config;
pub mod height;
pub mod noise;

pub use config::{HeightConfig, TerrainConfig};
pub use height::{HeightParams, HeightSampler, OCTAVES, quantize};
pub use noise::NoiseField;
