use horizon_geom::Vec3;

use crate::config::CameraConfig;

/// Scripted viewer that glides along `-z` at a constant speed per frame.
#[derive(Clone, Debug)]
pub struct FlyThrough {
    cfg: CameraConfig,
    tick: u64,
}

impl FlyThrough {
    pub fn new(cfg: CameraConfig) -> Self {
        Self { cfg, tick: 0 }
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    fn travelled(&self) -> f64 {
        self.tick as f64 * f64::from(self.cfg.speed)
    }

    /// Viewer depth handed to the streamer.
    pub fn depth(&self) -> f32 {
        (f64::from(self.cfg.start_z) - self.travelled()) as f32
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, self.cfg.height, self.depth())
    }

    pub fn target(&self) -> Vec3 {
        let z = -f64::from(self.cfg.start_z) - self.travelled();
        Vec3::new(0.0, self.cfg.look_down, z as f32)
    }
}
