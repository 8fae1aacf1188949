/*!
# radtrack - deterministic 2D multi-target tracking

Discrete-time multi-target tracker for a noisy 2D position sensor (e.g. a
radar). Each step consumes a variable-length set of position measurements,
some from real targets and some from clutter, and maintains a set of tracks:
smoothed position/velocity estimates with stable identifiers and an M-of-N
confirmation state.

## Pipeline

Per step: predict every track with a constant-velocity Kalman filter, gate
(track, measurement) pairs by squared Mahalanobis distance, solve the global
association (greedily or optimally via a min-cost assignment solver), update
the matched tracks, feed leftover measurements to a clutter-resistant
candidate pool, then re-evaluate confirmation and prune stale tracks.

## Determinism

The bundled simulator draws from a seedable xorshift64* stream and the
tracker draws nothing, so a seed and a configuration pin every diagnostic
bit-for-bit across runs.

## Example

```rust,no_run
use radtrack::{MultiTargetTracker, TargetSim2D, SimConfig, TrackerConfig};

let mut sim = TargetSim2D::new(12345, SimConfig::default());
let mut tracker = MultiTargetTracker::new(TrackerConfig::default());

for _ in 0..400 {
    sim.step();
    let z: Vec<_> = sim.last_measurements().iter().map(|m| m.z).collect();
    tracker.step(&z, 0.05, 1.5, 3.0).unwrap();
}

for track in tracker.tracks() {
    println!("track {} confirmed={} at {:?}", track.id, track.confirmed, track.kf.x);
}
```
*/

/// Low-level utilities: RNG, linear algebra aliases, assignment solver
pub mod common;

/// Error types
pub mod errors;

/// Constant-velocity Kalman filter
pub mod kalman;

/// CSV run logging
pub mod reporter;

/// Ground-truth simulator
pub mod sim;

/// Multi-target tracker
pub mod tracker;

pub use common::assignment::assign_min_cost;
pub use common::linalg::{Mat2, Mat2x4, Mat4, Mat4x2, Vec2, Vec4};
pub use common::rng::{Rng, Xorshift64Star};
pub use errors::TrackerError;
pub use kalman::KalmanCv2d;
pub use reporter::CsvRunReporter;
pub use sim::{Measurement, SimConfig, TargetSim2D, TrueTarget};
pub use tracker::types::{AssociationResult, Candidate, Track};
pub use tracker::{MultiTargetTracker, TrackerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
