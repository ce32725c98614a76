//! Outcome of a single shift.

use std::fmt;

use super::error::ResourceError;

/// How a forward or inverse shift was answered.
///
/// Only [`Fatal`](Self::Fatal) signals an error; the other non-success
/// variants accompany a usable point and let callers decide how much to
/// trust it.
#[derive(Debug)]
pub enum ShiftStatus {
    /// Shifted by a grid
    Success,
    /// A grid claiming coverage, or the fallback, could not be used
    Fatal(ResourceError),
    /// No grid covers the point and there is no fallback; point returned unshifted
    NoCoverage,
    /// Shifted by the analytic fallback at reduced accuracy
    FallbackUsed,
    /// Inverse only: iteration limit reached before convergence
    ConvergenceWarning,
}

impl ShiftStatus {
    /// Numeric status code: 0 success, -1 fatal, 1 no coverage, 2 fallback
    /// used, 3 convergence warning.
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Fatal(_) => -1,
            Self::NoCoverage => 1,
            Self::FallbackUsed => 2,
            Self::ConvergenceWarning => 3,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// The error behind a fatal status.
    pub fn error(&self) -> Option<&ResourceError> {
        match self {
            Self::Fatal(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Fatal(e) => write!(f, "fatal: {}", e),
            Self::NoCoverage => write!(f, "no coverage"),
            Self::FallbackUsed => write!(f, "fallback used"),
            Self::ConvergenceWarning => write!(f, "did not converge"),
        }
    }
}
