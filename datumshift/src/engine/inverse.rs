//! Fixed-point inverse solver.
//!
//! Starting from the target point as the guess, each iteration shifts the
//! guess forward and moves it by the residual on every axis that is not yet
//! within the convergence threshold. Grid shifts vary slowly, so the residual
//! shrinks geometrically and a handful of iterations suffice.

use crate::coord::GeoPoint;
use crate::{log_debug, log_trace};

use super::error::ResourceError;
use super::status::ShiftStatus;
use super::Engine;

impl Engine {
    /// Shifts `target` from the target datum back to the source datum.
    ///
    /// At most `max_iterations` forward evaluations are made. Outcomes:
    ///
    /// * converged: the source point with [`ShiftStatus::Success`]
    /// * iteration limit reached: the last guess with
    ///   [`ShiftStatus::ConvergenceWarning`]
    /// * the guess left grid coverage and the fallback has an inverse: the
    ///   fallback's own inverse of `target` with [`ShiftStatus::FallbackUsed`]
    /// * the guess left coverage otherwise: the current guess with
    ///   `NoCoverage` or `FallbackUsed`
    /// * fatal error: `target` unchanged with [`ShiftStatus::Fatal`]
    ///
    /// Height is carried through unchanged on the grid path.
    pub fn inverse(&self, target: &GeoPoint) -> (GeoPoint, ShiftStatus) {
        let epsilon = self.settings.convergence_epsilon;
        let mut guess = *target;

        for iteration in 0..self.settings.max_iterations {
            let (shifted, status) = self.forward(&guess);
            match status {
                ShiftStatus::Success | ShiftStatus::ConvergenceWarning => {}
                ShiftStatus::Fatal(error) => return (*target, ShiftStatus::Fatal(error)),
                ShiftStatus::NoCoverage => return (guess, ShiftStatus::NoCoverage),
                ShiftStatus::FallbackUsed => return self.fallback_inverse(target, guess),
            }

            let dlon = target.lon - shifted.lon;
            let dlat = target.lat - shifted.lat;
            let lon_done = dlon.abs() <= epsilon;
            let lat_done = dlat.abs() <= epsilon;

            if lon_done && lat_done {
                log_trace!(
                    self.logger,
                    "Inverse of {} converged after {} iteration(s)",
                    target,
                    iteration + 1
                );
                return (guess, ShiftStatus::Success);
            }
            if !lon_done {
                guess.lon += dlon;
            }
            if !lat_done {
                guess.lat += dlat;
            }
        }

        log_debug!(
            self.logger,
            "Inverse of {} did not converge in {} iterations",
            target,
            self.settings.max_iterations
        );
        (guess, ShiftStatus::ConvergenceWarning)
    }

    /// Hands the whole inverse to the fallback once iteration has left grid
    /// coverage.
    fn fallback_inverse(&self, target: &GeoPoint, guess: GeoPoint) -> (GeoPoint, ShiftStatus) {
        match &self.fallback {
            Some(fallback) if fallback.has_inverse() => match fallback.inverse_shift(target) {
                Ok(source) => (source, ShiftStatus::FallbackUsed),
                Err(source) => {
                    let error = ResourceError::Fallback {
                        name: fallback.name().to_string(),
                        source,
                    };
                    (*target, ShiftStatus::Fatal(error))
                }
            },
            _ => (guess, ShiftStatus::FallbackUsed),
        }
    }
}
