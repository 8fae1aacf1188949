//! Gating and measurement-to-track association.
//!
//! Admissibility of a (track, measurement) pair is decided by squared
//! Mahalanobis distance against the chi-square gate. The global assignment
//! is solved either greedily (best-first claiming) or optimally through the
//! assignment solver; the optimal variant minimizes the summed distance
//! across the step instead of making best-first local choices.

use crate::common::assignment::assign_min_cost;
use crate::common::linalg::{position_observation, Mat2, Vec2};
use crate::errors::TrackerError;
use crate::tracker::types::{AssociationResult, Track};

/// Sentinel cost for out-of-gate pairs. Kept large but finite so the
/// solver's potential arithmetic never sees an infinity; picks at or above
/// half this value are discarded afterwards.
pub const BIG_COST: f64 = 1e9;

/// Squared Mahalanobis distance of a measurement to a track's predicted
/// position.
///
/// Fails only when the innovation covariance is singular, which indicates a
/// numerical fault rather than a data event.
pub fn maha2_for(track: &Track, z: &Vec2) -> Result<f64, TrackerError> {
    let h = position_observation();
    let r = Mat2::identity() * (track.kf.sigma_z * track.kf.sigma_z);

    let innov = z - h * track.kf.x;
    let s = h * track.kf.p * h.transpose() + r;

    let s_inv = s
        .try_inverse()
        .ok_or(TrackerError::SingularInnovationCovariance)?;

    Ok(innov.dot(&(s_inv * innov)))
}

/// Greedy association: claim in-gate pairs best-first.
///
/// All in-gate pairs are sorted ascending by distance, with ties broken by
/// track index then measurement index, and claimed first-come-first-served.
pub fn associate_greedy(
    tracks: &mut [Track],
    meas: &[Vec2],
    gate_maha2: f64,
) -> Result<AssociationResult, TrackerError> {
    let mut ar = AssociationResult {
        track_to_meas: vec![-1; tracks.len()],
        meas_to_track: vec![-1; meas.len()],
    };

    struct Edge {
        ti: usize,
        mi: usize,
        m2: f64,
    }

    let mut edges = Vec::with_capacity(tracks.len() * meas.len());
    for (ti, track) in tracks.iter().enumerate() {
        for (mi, z) in meas.iter().enumerate() {
            let m2 = maha2_for(track, z)?;
            if m2 <= gate_maha2 {
                edges.push(Edge { ti, mi, m2 });
            }
        }
    }

    edges.sort_by(|a, b| {
        a.m2.total_cmp(&b.m2)
            .then(a.ti.cmp(&b.ti))
            .then(a.mi.cmp(&b.mi))
    });

    for e in &edges {
        if ar.track_to_meas[e.ti] != -1 || ar.meas_to_track[e.mi] != -1 {
            continue;
        }
        ar.track_to_meas[e.ti] = e.mi as isize;
        ar.meas_to_track[e.mi] = e.ti as isize;
        tracks[e.ti].last_maha2 = e.m2;
    }

    Ok(ar)
}

/// Optimal association: solve the global assignment on the gated cost
/// matrix, then drop picks that only existed to complete the matching.
pub fn associate_optimal(
    tracks: &mut [Track],
    meas: &[Vec2],
    gate_maha2: f64,
) -> Result<AssociationResult, TrackerError> {
    let mut ar = AssociationResult {
        track_to_meas: vec![-1; tracks.len()],
        meas_to_track: vec![-1; meas.len()],
    };

    if tracks.is_empty() || meas.is_empty() {
        return Ok(ar);
    }

    let mut cost = vec![vec![BIG_COST; meas.len()]; tracks.len()];
    for (ti, track) in tracks.iter().enumerate() {
        for (mi, z) in meas.iter().enumerate() {
            let m2 = maha2_for(track, z)?;
            if m2 <= gate_maha2 {
                cost[ti][mi] = m2;
            }
        }
    }

    let assign = assign_min_cost(&cost);

    for (ti, &mi) in assign.iter().enumerate() {
        if mi < 0 || mi as usize >= meas.len() {
            continue;
        }
        let mi = mi as usize;
        let c = cost[ti][mi];
        if c >= BIG_COST * 0.5 {
            continue; // out-of-gate pick, only taken to complete the matching
        }
        if ar.meas_to_track[mi] != -1 {
            continue;
        }
        ar.track_to_meas[ti] = mi as isize;
        ar.meas_to_track[mi] = ti as isize;
        tracks[ti].last_maha2 = c;
    }

    Ok(ar)
}
