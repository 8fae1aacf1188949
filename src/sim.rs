//! Ground-truth simulator and measurement generation.
//!
//! Simulates straight-line targets observed by a noisy 2D position sensor
//! with Bernoulli detection and optional uniform clutter. All randomness
//! comes from one seedable stream, and the draw order per step is fixed
//! (detection coin, then x/y noise per detected target, then x/y per
//! clutter point), so a seed pins the whole measurement sequence.

use serde::{Deserialize, Serialize};

use crate::common::linalg::Vec2;
use crate::common::rng::{Rng, Xorshift64Star};

/// A simulated target moving at constant velocity.
#[derive(Debug, Clone)]
pub struct TrueTarget {
    /// Truth identifier (1-based; 0 is reserved for clutter)
    pub id: u32,
    /// Position in meters
    pub pos: Vec2,
    /// Velocity in meters per second
    pub vel: Vec2,
}

/// Simulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of targets for random initialization
    pub num_targets: usize,
    /// Step length in seconds
    pub dt: f64,
    /// Position measurement noise standard deviation (meters)
    pub sigma_z: f64,
    /// Detection probability per target per step
    pub p_detect: f64,
    /// Half-extent of the uniform spawn square for random targets
    pub spawn_half: f64,
    /// Half-extent of the uniform velocity square for random targets
    pub vel_half: f64,
    /// Use the two-target crossing scenario instead of random targets
    pub scenario_cross: bool,
    /// Generate clutter measurements
    pub enable_clutter: bool,
    /// Clutter points per step
    pub clutter_per_step: usize,
    /// Half-extent of the uniform clutter square
    pub clutter_area_half: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_targets: 3,
            dt: 0.05,
            sigma_z: 3.0,
            p_detect: 0.90,
            spawn_half: 120.0,
            vel_half: 8.0,
            scenario_cross: false,
            enable_clutter: false,
            clutter_per_step: 4,
            clutter_area_half: 300.0,
        }
    }
}

/// A single sensor return.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Step index at which the measurement was produced
    pub step: usize,
    /// Originating truth target (0 for clutter)
    pub true_id: u32,
    /// Measured position
    pub z: Vec2,
}

/// Constant-velocity 2D target simulator.
pub struct TargetSim2D {
    rng: Xorshift64Star,
    cfg: SimConfig,
    step_idx: usize,
    truth: Vec<TrueTarget>,
    meas: Vec<Measurement>,
}

impl TargetSim2D {
    /// Create a simulator; targets are placed by the configured scenario.
    pub fn new(seed: u64, cfg: SimConfig) -> Self {
        let mut sim = Self {
            rng: Xorshift64Star::new(seed),
            cfg,
            step_idx: 0,
            truth: Vec::new(),
            meas: Vec::new(),
        };
        if sim.cfg.scenario_cross {
            sim.init_cross();
        } else {
            sim.init_random();
        }
        sim
    }

    /// Create a simulator with explicit truth targets, bypassing scenario
    /// initialization. Useful for scripted test scenarios.
    pub fn with_targets(seed: u64, cfg: SimConfig, targets: Vec<TrueTarget>) -> Self {
        Self {
            rng: Xorshift64Star::new(seed),
            cfg,
            step_idx: 0,
            truth: targets,
            meas: Vec::new(),
        }
    }

    fn init_random(&mut self) {
        self.truth.reserve(self.cfg.num_targets);
        for i in 0..self.cfg.num_targets {
            let half = self.cfg.spawn_half;
            let vhalf = self.cfg.vel_half;
            let pos = Vec2::new(self.rng.uniform(-half, half), self.rng.uniform(-half, half));
            let vel = Vec2::new(
                self.rng.uniform(-vhalf, vhalf),
                self.rng.uniform(-vhalf, vhalf),
            );
            self.truth.push(TrueTarget {
                id: i as u32 + 1,
                pos,
                vel,
            });
        }
    }

    fn init_cross(&mut self) {
        // Two targets cross near the origin to create association ambiguity.
        self.truth.push(TrueTarget {
            id: 1,
            pos: Vec2::new(-80.0, 0.0),
            vel: Vec2::new(6.0, 0.0),
        });
        self.truth.push(TrueTarget {
            id: 2,
            pos: Vec2::new(80.0, 0.0),
            vel: Vec2::new(-6.0, 0.0),
        });
    }

    fn gen_measurements(&mut self) {
        self.meas.clear();

        for t in &self.truth {
            if self.rng.uniform01() > self.cfg.p_detect {
                continue;
            }
            let nx = self.rng.normal(0.0, self.cfg.sigma_z);
            let ny = self.rng.normal(0.0, self.cfg.sigma_z);
            self.meas.push(Measurement {
                step: self.step_idx,
                true_id: t.id,
                z: t.pos + Vec2::new(nx, ny),
            });
        }

        if self.cfg.enable_clutter {
            let half = self.cfg.clutter_area_half;
            for _ in 0..self.cfg.clutter_per_step {
                let x = self.rng.uniform(-half, half);
                let y = self.rng.uniform(-half, half);
                self.meas.push(Measurement {
                    step: self.step_idx,
                    true_id: 0,
                    z: Vec2::new(x, y),
                });
            }
        }
    }

    /// Advance the truth by one step and generate its measurements.
    pub fn step(&mut self) {
        let dt = self.cfg.dt;
        for t in &mut self.truth {
            t.pos += t.vel * dt;
        }
        self.gen_measurements();
        self.step_idx += 1;
    }

    /// Number of completed steps.
    pub fn step_index(&self) -> usize {
        self.step_idx
    }

    /// Current true target states.
    pub fn truth(&self) -> &[TrueTarget] {
        &self.truth
    }

    /// Measurements from the most recent step.
    pub fn last_measurements(&self) -> &[Measurement] {
        &self.meas
    }
}
