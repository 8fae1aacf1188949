//! Error types for the tracker
//!
//! The tracker has no recoverable errors for valid inputs; the variants here
//! surface arithmetic pathologies that indicate a configuration or numerical
//! bug rather than a data event.

use std::fmt;

/// Errors that can occur during a tracker step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// The innovation covariance `S = H*P*H' + R` could not be inverted.
    ///
    /// With any positive measurement noise this is expected never to occur;
    /// it is surfaced rather than masked.
    SingularInnovationCovariance,
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::SingularInnovationCovariance => {
                write!(f, "innovation covariance is singular")
            }
        }
    }
}

impl std::error::Error for TrackerError {}
