//! Multi-target tracker: per-track Kalman filtering, gated global
//! association, candidate-pool initiation, M-of-N confirmation, and miss
//! pruning, driven by a single step orchestrator.

pub mod association;
pub mod initiation;
pub mod types;

use serde::{Deserialize, Serialize};

use crate::common::linalg::{Mat2, Vec2};
use crate::errors::TrackerError;
use crate::tracker::association::{associate_greedy, associate_optimal};
use crate::tracker::initiation::initiate_from_unassigned;
use crate::tracker::types::{AssociationResult, Candidate, Track};

/// Tracker configuration.
///
/// Treated as immutable once the first step has run; in particular the
/// confirmation window length is fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Association gate on squared Mahalanobis distance
    /// (9.21 is the 99% quantile of chi-square with 2 dof)
    pub gate_maha2: f64,
    /// Consecutive misses after which a track is dropped
    pub max_misses: u32,
    /// Hits required within the confirmation window
    pub confirm_m: u32,
    /// Confirmation window length
    pub confirm_n: u32,
    /// Euclidean gate for merging a measurement into a candidate (meters)
    pub init_gate_dist: f64,
    /// Candidate hits required for promotion to a track
    pub init_required_hits: u32,
    /// Steps a candidate may go unseen before it is discarded
    pub init_max_age: u32,
    /// Initial velocity standard deviation for promoted tracks
    pub init_vel_sigma: f64,
    /// Solve association optimally (false selects the greedy variant)
    pub use_hungarian: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            gate_maha2: 9.21,
            max_misses: 8,
            confirm_m: 3,
            confirm_n: 5,
            init_gate_dist: 12.0,
            init_required_hits: 2,
            init_max_age: 2,
            init_vel_sigma: 40.0,
            use_hungarian: true,
        }
    }
}

/// Deterministic discrete-time multi-target tracker.
///
/// Owns its tracks and candidates exclusively; a step is an atomic unit of
/// work and two trackers given identical inputs and configuration produce
/// bit-identical output.
#[derive(Debug, Clone)]
pub struct MultiTargetTracker {
    cfg: TrackerConfig,
    next_id: u32,
    tracks: Vec<Track>,
    cands: Vec<Candidate>,

    // Per-step diagnostics, parallel to `tracks` after each step.
    last_assoc: AssociationResult,
    last_innovs: Vec<Vec2>,
    last_s: Vec<Mat2>,
}

impl MultiTargetTracker {
    /// Create a tracker. Out-of-range confirmation parameters are clamped
    /// silently: the window length is at least 1 and the required hit count
    /// is clamped into `[1, confirm_n]`.
    pub fn new(cfg: TrackerConfig) -> Self {
        let mut cfg = cfg;
        cfg.confirm_n = cfg.confirm_n.max(1);
        cfg.confirm_m = cfg.confirm_m.clamp(1, cfg.confirm_n);

        Self {
            cfg,
            next_id: 1,
            tracks: Vec::new(),
            cands: Vec::new(),
            last_assoc: AssociationResult::default(),
            last_innovs: Vec::new(),
            last_s: Vec::new(),
        }
    }

    /// The active configuration after construction-time clamping.
    pub fn config(&self) -> &TrackerConfig {
        &self.cfg
    }

    /// Live tracks in creation order, as of the end of the last step.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Pending initiation candidates.
    pub fn candidates(&self) -> &[Candidate] {
        &self.cands
    }

    /// Innovations from the last step, parallel to [`tracks`](Self::tracks).
    /// Zero for tracks that were not associated and for tracks created this
    /// step.
    pub fn last_innovations(&self) -> &[Vec2] {
        &self.last_innovs
    }

    /// Innovation covariances from the last step, parallel to
    /// [`tracks`](Self::tracks), zero under the same conditions as
    /// [`last_innovations`](Self::last_innovations).
    pub fn last_s(&self) -> &[Mat2] {
        &self.last_s
    }

    /// The association computed in the last step. Indices refer to the
    /// track list as it stood at association time, before initiation and
    /// pruning.
    pub fn last_association(&self) -> &AssociationResult {
        &self.last_assoc
    }

    /// Advance the tracker by one step.
    ///
    /// Runs the fixed pipeline: predict every track, associate measurements,
    /// update the matched tracks, feed leftovers to the initiator, then
    /// re-evaluate confirmation and prune. An empty measurement set is
    /// valid; every track misses.
    pub fn step(
        &mut self,
        measurements: &[Vec2],
        dt: f64,
        sigma_a: f64,
        sigma_z: f64,
    ) -> Result<(), TrackerError> {
        // 1) Predict. Parameters are re-applied every step so they may vary
        // across steps without reconstructing tracks.
        for t in &mut self.tracks {
            t.kf.dt = dt;
            t.kf.sigma_a = sigma_a;
            t.kf.sigma_z = sigma_z;
            t.kf.predict();
            t.age += 1;
            t.last_maha2 = 0.0;
        }

        // 2) Associate.
        self.last_assoc = if self.cfg.use_hungarian {
            associate_optimal(&mut self.tracks, measurements, self.cfg.gate_maha2)?
        } else {
            associate_greedy(&mut self.tracks, measurements, self.cfg.gate_maha2)?
        };

        self.last_innovs.clear();
        self.last_innovs.resize(self.tracks.len(), Vec2::zeros());
        self.last_s.clear();
        self.last_s.resize(self.tracks.len(), Mat2::zeros());

        // 3) Update matched tracks; slide every hit window.
        for (ti, track) in self.tracks.iter_mut().enumerate() {
            let mi = self.last_assoc.track_to_meas[ti];
            track.push_hit(mi != -1);

            if mi == -1 {
                track.misses += 1;
                continue;
            }

            let (innov, s) = track.kf.update(&measurements[mi as usize])?;
            self.last_innovs[ti] = innov;
            self.last_s[ti] = s;
            track.misses = 0;
        }

        // 4) Initiate from unassigned measurements.
        let before = self.tracks.len();
        initiate_from_unassigned(
            &self.cfg,
            &mut self.tracks,
            &mut self.cands,
            &mut self.next_id,
            measurements,
            &self.last_assoc,
            dt,
            sigma_a,
            sigma_z,
        );
        if self.tracks.len() > before {
            self.last_innovs.resize(self.tracks.len(), Vec2::zeros());
            self.last_s.resize(self.tracks.len(), Mat2::zeros());
        }

        // 5) Confirm and prune. The diagnostic vectors are pruned in
        // lockstep so they stay parallel to the surviving track list.
        let confirm_m = self.cfg.confirm_m;
        for t in &mut self.tracks {
            t.confirmed = t.hits_in_window() >= confirm_m;
        }
        let max_misses = self.cfg.max_misses;
        let mut ti = 0;
        while ti < self.tracks.len() {
            if self.tracks[ti].misses > max_misses {
                self.tracks.remove(ti);
                self.last_innovs.remove(ti);
                self.last_s.remove(ti);
            } else {
                ti += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_one(tracker: &mut MultiTargetTracker, meas: &[Vec2]) {
        tracker.step(meas, 0.1, 1.0, 1.0).unwrap();
    }

    #[test]
    fn test_confirmation_parameters_are_clamped() {
        let tracker = MultiTargetTracker::new(TrackerConfig {
            confirm_m: 0,
            confirm_n: 0,
            ..TrackerConfig::default()
        });
        assert_eq!(tracker.config().confirm_n, 1);
        assert_eq!(tracker.config().confirm_m, 1);

        let tracker = MultiTargetTracker::new(TrackerConfig {
            confirm_m: 9,
            confirm_n: 5,
            ..TrackerConfig::default()
        });
        assert_eq!(tracker.config().confirm_m, 5);
    }

    #[test]
    fn test_track_is_born_after_required_hits() {
        let mut tracker = MultiTargetTracker::new(TrackerConfig::default());

        step_one(&mut tracker, &[Vec2::new(10.0, -5.0)]);
        assert!(tracker.tracks().is_empty());
        assert_eq!(tracker.candidates().len(), 1);

        step_one(&mut tracker, &[Vec2::new(10.2, -5.1)]);
        assert_eq!(tracker.tracks().len(), 1);
        assert!(tracker.candidates().is_empty());
        assert_eq!(tracker.tracks()[0].id, 1);

        // Diagnostics are parallel and zero for the newly created track.
        assert_eq!(tracker.last_innovations().len(), 1);
        assert_eq!(tracker.last_innovations()[0], Vec2::zeros());
        assert_eq!(tracker.last_s()[0], Mat2::zeros());
    }

    #[test]
    fn test_track_confirms_and_then_drops_out() {
        let mut tracker = MultiTargetTracker::new(TrackerConfig::default());

        // Two sightings to initiate, then enough hits to confirm.
        for _ in 0..5 {
            step_one(&mut tracker, &[Vec2::new(10.0, -5.0)]);
        }
        assert_eq!(tracker.tracks().len(), 1);
        assert!(tracker.tracks()[0].confirmed);

        // Starve the track; confirmation is a function of the window, so it
        // toggles off before the track is pruned.
        for _ in 0..3 {
            step_one(&mut tracker, &[]);
        }
        assert_eq!(tracker.tracks().len(), 1);
        assert!(!tracker.tracks()[0].confirmed);
        assert_eq!(tracker.tracks()[0].misses, 3);
    }

    #[test]
    fn test_track_is_pruned_after_max_misses() {
        let cfg = TrackerConfig {
            max_misses: 2,
            ..TrackerConfig::default()
        };
        let mut tracker = MultiTargetTracker::new(cfg);

        step_one(&mut tracker, &[Vec2::new(0.0, 0.0)]);
        step_one(&mut tracker, &[Vec2::new(0.1, 0.0)]);
        assert_eq!(tracker.tracks().len(), 1);

        step_one(&mut tracker, &[]);
        step_one(&mut tracker, &[]);
        assert_eq!(tracker.tracks().len(), 1);
        step_one(&mut tracker, &[]);
        assert!(tracker.tracks().is_empty());
        assert!(tracker.last_innovations().is_empty());
        assert!(tracker.last_s().is_empty());
    }

    #[test]
    fn test_identifiers_are_never_reused() {
        let cfg = TrackerConfig {
            max_misses: 0,
            init_required_hits: 1,
            ..TrackerConfig::default()
        };
        let mut tracker = MultiTargetTracker::new(cfg);

        step_one(&mut tracker, &[Vec2::new(0.0, 0.0)]);
        assert_eq!(tracker.tracks()[0].id, 1);

        // Lose the track, then re-initiate at the same spot: fresh id.
        step_one(&mut tracker, &[]);
        assert!(tracker.tracks().is_empty());
        step_one(&mut tracker, &[Vec2::new(0.0, 0.0)]);
        assert_eq!(tracker.tracks()[0].id, 2);
    }

    #[test]
    fn test_singular_innovation_covariance_surfaces_from_step() {
        // A zero measurement-noise sensor plus a zero-variance birth prior
        // leaves the promoted track with a zero covariance, so the next
        // association sees a singular S and the step must fail loudly.
        let cfg = TrackerConfig {
            init_required_hits: 1,
            init_vel_sigma: 0.0,
            ..TrackerConfig::default()
        };
        let mut tracker = MultiTargetTracker::new(cfg);

        tracker.step(&[Vec2::new(5.0, 5.0)], 0.1, 0.0, 0.0).unwrap();
        assert_eq!(tracker.tracks().len(), 1);

        let err = tracker
            .step(&[Vec2::new(5.0, 5.0)], 0.1, 0.0, 0.0)
            .unwrap_err();
        assert_eq!(err, TrackerError::SingularInnovationCovariance);
    }

    #[test]
    fn test_empty_steps_are_valid_from_the_start() {
        let mut tracker = MultiTargetTracker::new(TrackerConfig::default());
        for _ in 0..10 {
            step_one(&mut tracker, &[]);
        }
        assert!(tracker.tracks().is_empty());
        assert!(tracker.last_association().track_to_meas.is_empty());
    }
}
