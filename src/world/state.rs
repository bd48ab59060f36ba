use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Simulation bookkeeping published alongside the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub sim_step: u64,
    pub n_devices: u32,
    pub graphics_loop_freq: f64,
    pub dynamic_loop_freq: f64,
    /// Seconds since UNIX epoch at the last step.
    pub wall_time: f64,
    pub step_sim: bool,
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            sim_step: 0,
            n_devices: 0,
            graphics_loop_freq: 0.0,
            dynamic_loop_freq: 0.0,
            wall_time: 0.0,
            step_sim: true,
        }
    }
}

impl WorldState {
    pub fn set_num_devices(&mut self, n: u32) {
        self.n_devices = n;
    }

    pub fn set_graphics_loop_freq(&mut self, freq: f64) {
        self.graphics_loop_freq = freq;
    }

    pub fn set_physics_loop_freq(&mut self, freq: f64) {
        self.dynamic_loop_freq = freq;
    }

    pub fn increment_sim_step(&mut self) {
        self.sim_step += 1;
        self.wall_time = Utc::now().timestamp_micros() as f64 / 1e6;
    }

    pub fn step_sim(&self) -> bool {
        self.step_sim
    }

    pub fn set_step_sim(&mut self, step: bool) {
        self.step_sim = step;
    }
}
