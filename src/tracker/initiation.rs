//! Clutter-resistant track initiation via a candidate pool.
//!
//! Unassigned measurements feed a pool of pre-track candidates. A candidate
//! is promoted to a real track only after accumulating enough spatially
//! consistent hits, so isolated clutter returns die in the pool instead of
//! becoming tracks.

use crate::common::linalg::{Mat4, Vec2, Vec4};
use crate::kalman::KalmanCv2d;
use crate::tracker::types::{AssociationResult, Candidate, Track};
use crate::tracker::TrackerConfig;

/// Feed unassigned measurements into the candidate pool and promote mature
/// candidates to tracks.
///
/// Measurements are processed in index order. Each one merges into the
/// closest unmatched candidate within the initiation gate (ties favour the
/// lowest candidate index) or opens a new candidate. Candidates that go
/// unmatched age by one and are discarded past `init_max_age`; candidates
/// reaching `init_required_hits` become tracks with a fresh identifier.
///
/// Newly promoted tracks are appended to `tracks` with their hit window
/// pre-seeded from the candidate's hit count.
pub fn initiate_from_unassigned(
    cfg: &TrackerConfig,
    tracks: &mut Vec<Track>,
    cands: &mut Vec<Candidate>,
    next_id: &mut u32,
    meas: &[Vec2],
    ar: &AssociationResult,
    dt: f64,
    sigma_a: f64,
    sigma_z: f64,
) {
    let gate2 = cfg.init_gate_dist * cfg.init_gate_dist;

    let mut cand_used = vec![false; cands.len()];

    for (mi, z) in meas.iter().enumerate() {
        if ar.meas_to_track[mi] != -1 {
            continue;
        }

        let mut best_ci: Option<usize> = None;
        let mut best_d2 = f64::INFINITY;
        for (ci, cand) in cands.iter().enumerate() {
            if cand_used[ci] {
                continue;
            }
            let d = z - cand.z;
            let d2 = d.norm_squared();
            if d2 <= gate2 && d2 < best_d2 {
                best_d2 = d2;
                best_ci = Some(ci);
            }
        }

        match best_ci {
            Some(ci) => {
                cand_used[ci] = true;
                cands[ci].z = *z;
                cands[ci].hits += 1;
                cands[ci].age = 0;
            }
            None => {
                cands.push(Candidate {
                    z: *z,
                    hits: 1,
                    age: 0,
                });
                cand_used.push(true);
            }
        }
    }

    for (ci, cand) in cands.iter_mut().enumerate() {
        if !cand_used[ci] {
            cand.age += 1;
        }
    }
    cands.retain(|c| c.age <= cfg.init_max_age);

    let model = KalmanCv2d::new(dt, sigma_a, sigma_z);

    let mut keep = Vec::with_capacity(cands.len());
    for cand in cands.drain(..) {
        if cand.hits < cfg.init_required_hits {
            keep.push(cand);
            continue;
        }

        let mut t = Track::new(*next_id, model.clone(), &cand.z, cfg.confirm_n);
        *next_id += 1;

        // Position uncertainty matches the sensor; velocity is unobserved
        // at birth and deliberately wide.
        t.kf.p = Mat4::from_diagonal(&Vec4::new(
            sigma_z * sigma_z,
            sigma_z * sigma_z,
            cfg.init_vel_sigma * cfg.init_vel_sigma,
            cfg.init_vel_sigma * cfg.init_vel_sigma,
        ));
        t.age = 1;
        t.misses = 0;

        let seed = (cand.hits as usize).min(t.hit_hist.len());
        for slot in t.hit_hist.iter_mut().take(seed) {
            *slot = 1;
        }
        t.confirmed = t.hits_in_window() >= cfg.confirm_m;

        tracks.push(t);
    }

    *cands = keep;
}
