//! Track, candidate, and association result types.

use smallvec::SmallVec;

use crate::common::linalg::Vec2;
use crate::kalman::KalmanCv2d;

/// Hit-history window storage. The confirmation window is short (default 5),
/// so the inline capacity keeps tracks heap-allocation free.
pub type HitHistory = SmallVec<[u8; 8]>;

/// An estimated target with stable identity and kinematic state.
#[derive(Debug, Clone)]
pub struct Track {
    /// Stable identifier; monotonically increasing, never reused
    pub id: u32,
    /// Kinematic state and covariance
    pub kf: KalmanCv2d,
    /// Steps the track has existed
    pub age: u32,
    /// Consecutive steps without an association
    pub misses: u32,
    /// Whether the M-of-N confirmation rule currently holds
    pub confirmed: bool,
    /// Mahalanobis-squared of the most recent association (0 when none this step)
    pub last_maha2: f64,
    /// Sliding hit/miss window of length `confirm_n` (1 = associated)
    pub hit_hist: HitHistory,
}

impl Track {
    /// Create a track at the given position with zero initial velocity.
    pub fn new(id: u32, model: KalmanCv2d, z_init: &Vec2, confirm_n: u32) -> Self {
        let mut kf = model;
        kf.x[0] = z_init[0];
        kf.x[1] = z_init[1];
        kf.x[2] = 0.0;
        kf.x[3] = 0.0;

        let window = confirm_n.max(1) as usize;
        Self {
            id,
            kf,
            age: 0,
            misses: 0,
            confirmed: false,
            last_maha2: 0.0,
            hit_hist: smallvec::smallvec![0; window],
        }
    }

    /// Number of hits in the confirmation window.
    pub fn hits_in_window(&self) -> u32 {
        self.hit_hist.iter().map(|&h| h as u32).sum()
    }

    /// Rotate the window left by one and record this step's outcome in the
    /// newest slot.
    pub fn push_hit(&mut self, hit: bool) {
        self.hit_hist.rotate_left(1);
        if let Some(tail) = self.hit_hist.last_mut() {
            *tail = hit as u8;
        }
    }
}

/// Pre-track accumulator used to suppress clutter-initiated tracks.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Last observed position
    pub z: Vec2,
    /// Accumulated spatially-consistent hits
    pub hits: u32,
    /// Steps since the last hit
    pub age: u32,
}

/// Measurement-to-track association for one step.
///
/// `track_to_meas[i]` is the measurement index assigned to track `i` and
/// `meas_to_track[j]` the track index assigned to measurement `j`; `-1`
/// means unassigned. The two arrays are consistent inverses on their
/// assigned subsets, and the indices refer to the track list as it stood at
/// association time (before initiation and pruning).
#[derive(Debug, Clone, Default)]
pub struct AssociationResult {
    /// Measurement index per track (-1 if none)
    pub track_to_meas: Vec<isize>,
    /// Track index per measurement (-1 if none)
    pub meas_to_track: Vec<isize>,
}
