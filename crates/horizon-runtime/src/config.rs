use horizon_chunk::GridSpec;
use serde::Deserialize;

/// Streaming window and lattice layout.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StreamConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_render_n")]
    pub render_n: usize,
    /// Retire every crossed chunk in one step instead of at most one.
    #[serde(default = "default_catch_up")]
    pub catch_up: bool,
    /// Upper bound on retirements per step when catching up.
    #[serde(default = "default_max_catch_up")]
    pub max_catch_up: usize,
    #[serde(default)]
    pub prefetch: bool,
    #[serde(default)]
    pub parallel_fill: bool,
}

fn default_rows() -> usize {
    80
}
fn default_cols() -> usize {
    60
}
fn default_cell_size() -> f32 {
    100.0
}
fn default_render_n() -> usize {
    10
}
fn default_catch_up() -> bool {
    true
}
fn default_max_catch_up() -> usize {
    64
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            cell_size: default_cell_size(),
            render_n: default_render_n(),
            catch_up: default_catch_up(),
            max_catch_up: default_max_catch_up(),
            prefetch: false,
            parallel_fill: false,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.rows == 0 || self.cols == 0 {
            return Err(format!(
                "stream.rows and stream.cols must be > 0 (got {}x{})",
                self.rows, self.cols
            ));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(format!("stream.cell_size must be > 0 (got {})", self.cell_size));
        }
        if self.render_n == 0 {
            return Err("stream.render_n must be > 0".to_string());
        }
        if self.catch_up && self.max_catch_up == 0 {
            return Err("stream.max_catch_up must be > 0 when catch_up is enabled".to_string());
        }
        Ok(())
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec::from_cell_size(self.rows, self.cols, self.cell_size)
    }

    /// Most chunks a single step may retire.
    pub fn retire_limit(&self) -> usize {
        if self.catch_up { self.max_catch_up } else { 1 }
    }

    /// Without catch-up a viewer moving a full chunk depth between steps can
    /// skip a chunk. Errors when `speed` (depth units per step) is too fast for
    /// the configured chunk depth and retire limit.
    pub fn check_viewer_speed(&self, speed: f32) -> Result<(), String> {
        let depth = self.grid().depth_span();
        let limit = if self.catch_up {
            depth * self.max_catch_up as f32
        } else {
            depth
        };
        if speed.abs() >= limit {
            return Err(format!(
                "viewer speed {speed} per step reaches the streaming limit {limit} (chunk depth {depth})"
            ));
        }
        Ok(())
    }
}
