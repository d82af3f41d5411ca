//! Chaining of propagation modules and parallel simulation of candidates.

use crate::{
    error::{ConfigError, ConfigResult},
    io::Verbosity,
    particle::candidate::Candidate,
    propagation::fpr,
    units::{EEV, KPC},
};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use std::{fmt, sync::Arc};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Defines the properties of a step in the simulation of a candidate.
pub trait Module: Send + Sync {
    /// Applies the module to the given candidate.
    fn process(&self, candidate: &mut Candidate);

    /// Returns a short human-readable description of the module.
    fn description(&self) -> String;
}

/// Ordered sequence of modules applied to candidates.
#[derive(Clone, Default)]
pub struct ModuleList {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleList {
    /// Largest number of passes through the modules for a single candidate
    /// before it is forcibly deactivated.
    pub const DEFAULT_MAX_ITERATIONS: usize = 100_000_000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the given module to the list.
    pub fn add<M: Module + 'static>(&mut self, module: M) -> &mut Self {
        self.modules.push(Arc::new(module));
        self
    }

    /// Appends the given shared module to the list.
    pub fn add_shared(&mut self, module: Arc<dyn Module>) -> &mut Self {
        self.modules.push(module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Applies every module once, in order.
    pub fn process(&self, candidate: &mut Candidate) {
        for module in &self.modules {
            module.process(candidate);
        }
    }

    /// Repeatedly applies the modules until the candidate is deactivated.
    ///
    /// # Returns
    ///
    /// The number of passes through the modules.
    pub fn run(&self, candidate: &mut Candidate) -> usize {
        let mut n_iterations = 0;
        while candidate.is_active() {
            if n_iterations == Self::DEFAULT_MAX_ITERATIONS {
                candidate.set_active(false);
                break;
            }
            self.process(candidate);
            n_iterations += 1;
        }
        n_iterations
    }

    /// Runs all the given candidates to completion in parallel.
    pub fn run_batch(&self, candidates: &mut [Candidate], verbosity: &Verbosity) -> BatchSummary {
        if verbosity.print_messages() {
            println!(
                "Propagating {} candidates through {} modules",
                candidates.len(),
                self.len()
            );
        }
        let progress_bar = verbosity.create_progress_bar(candidates.len());
        candidates
            .par_iter_mut()
            .progress_with(progress_bar)
            .for_each(|candidate| {
                self.run(candidate);
            });
        BatchSummary::from_candidates(candidates)
    }

    /// Returns a description of every module, one per line.
    pub fn description(&self) -> String {
        self.modules
            .iter()
            .enumerate()
            .map(|(idx, module)| format!("  {}. {}", idx + 1, module.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for ModuleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.modules.iter().map(|module| module.description()))
            .finish()
    }
}

/// Deactivates candidates once they have travelled a given distance.
#[derive(Clone, Debug, PartialEq)]
pub struct MaximumTrajectoryLength {
    max_length: fpr,
}

impl MaximumTrajectoryLength {
    pub fn new(max_length: fpr) -> ConfigResult<Self> {
        if !max_length.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "Maximum trajectory length",
                value: max_length,
            });
        }
        if max_length <= 0.0 {
            return Err(ConfigError::NotPositive {
                name: "Maximum trajectory length",
                value: max_length,
            });
        }
        Ok(Self { max_length })
    }

    pub fn max_length(&self) -> fpr {
        self.max_length
    }
}

impl Module for MaximumTrajectoryLength {
    fn process(&self, candidate: &mut Candidate) {
        let remaining_length = self.max_length - candidate.trajectory_length();
        if remaining_length <= 0.0 {
            candidate.set_active(false);
        } else {
            candidate.limit_next_step(remaining_length);
        }
    }

    fn description(&self) -> String {
        format!("Maximum trajectory length {} kpc", self.max_length / KPC)
    }
}

/// Aggregate properties of a batch of finished candidates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct BatchSummary {
    pub n_candidates: usize,
    /// Mean final energy [J].
    pub mean_energy: fpr,
    /// Energy radiated by all candidates [J].
    pub total_radiation: fpr,
    /// Mean trajectory length [m].
    pub mean_trajectory_length: fpr,
    /// Number of candidates whose state is no longer finite.
    pub n_non_finite: usize,
}

impl BatchSummary {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let n_candidates = candidates.len();
        let (energy_sum, radiation_sum, length_sum, n_non_finite) = candidates.iter().fold(
            (0.0, 0.0, 0.0, 0),
            |(energy_sum, radiation_sum, length_sum, n_non_finite), candidate| {
                let is_finite = candidate.current.energy().is_finite()
                    && candidate.current.position().is_finite();
                (
                    energy_sum + candidate.current.energy(),
                    radiation_sum + candidate.total_radiation(),
                    length_sum + candidate.trajectory_length(),
                    n_non_finite + usize::from(!is_finite),
                )
            },
        );
        let normalization = if n_candidates > 0 {
            1.0 / (n_candidates as fpr)
        } else {
            0.0
        };
        Self {
            n_candidates,
            mean_energy: energy_sum * normalization,
            total_radiation: radiation_sum,
            mean_trajectory_length: length_sum * normalization,
            n_non_finite,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Candidates: {}", self.n_candidates)?;
        writeln!(f, "Mean final energy: {} EeV", self.mean_energy / EEV)?;
        writeln!(f, "Total radiated energy: {} EeV", self.total_radiation / EEV)?;
        write!(
            f,
            "Mean trajectory length: {} kpc",
            self.mean_trajectory_length / KPC
        )?;
        if self.n_non_finite > 0 {
            write!(f, "\nCandidates with non-finite state: {}", self.n_non_finite)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{
        geometry::{Point3, Vec3},
        particle::ParticleState,
        propagation::rectilinear::RectilinearPropagator,
    };
    use approx::assert_abs_diff_eq;

    fn candidate() -> Candidate {
        let state = ParticleState::monopole(
            411,
            EEV,
            Point3::origin(),
            Vec3::new(0.0, 1.0, 0.0),
            1e-20,
            0.0,
        );
        Candidate::new(state, 0.0)
    }

    #[test]
    fn trajectory_length_limit_stops_candidate_exactly() {
        let mut modules = ModuleList::new();
        modules
            .add(RectilinearPropagator::new(0.0, 3.0).unwrap())
            .add(MaximumTrajectoryLength::new(10.0).unwrap());

        let mut candidate = candidate();
        candidate.set_next_step(3.0);
        let n_iterations = modules.run(&mut candidate);

        assert!(!candidate.is_active());
        assert_eq!(candidate.trajectory_length(), 10.0);
        assert_eq!(candidate.current.position(), &Point3::new(0.0, 10.0, 0.0));
        assert_eq!(n_iterations, 4);
    }

    #[test]
    fn invalid_trajectory_length_is_rejected() {
        assert!(MaximumTrajectoryLength::new(0.0).is_err());
        assert!(MaximumTrajectoryLength::new(fpr::NAN).is_err());
    }

    #[test]
    fn batch_runs_all_candidates() {
        let mut modules = ModuleList::new();
        modules
            .add(RectilinearPropagator::new(1.0, 2.0).unwrap())
            .add(MaximumTrajectoryLength::new(7.0).unwrap());
        let mut candidates = vec![candidate(); 16];
        let summary = modules.run_batch(&mut candidates, &Verbosity::Quiet);

        assert!(candidates.iter().all(|candidate| !candidate.is_active()));
        assert_eq!(summary.n_candidates, 16);
        assert_eq!(summary.mean_trajectory_length, 7.0);
        assert_abs_diff_eq!(summary.mean_energy, EEV, epsilon = 1e-12 * EEV);
        assert_eq!(summary.n_non_finite, 0);
    }

    #[test]
    fn summary_of_empty_batch_is_zero() {
        let summary = BatchSummary::from_candidates(&[]);
        assert_eq!(summary.n_candidates, 0);
        assert_eq!(summary.mean_energy, 0.0);
    }
}
