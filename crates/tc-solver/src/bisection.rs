//! Bounded bisection over a property lookup.

use crate::error::{SolverError, SolverResult};
use crate::problem::{RecoveryPolicy, SolverProblem};
use crate::solution::{PropertySolution, Status};
use tc_core::relative_error;
use tc_fluids::{FluidError, FluidResult, PropertyService, StateInput};
use tracing::debug;

/// Outcome of one lookup during the search.
#[derive(Debug, Clone, Copy)]
pub enum Evaluation<'a> {
    Value { actual: f64, relative_error: f64 },
    Failed(&'a FluidError),
}

/// Progress report emitted after every lookup.
#[derive(Debug, Clone, Copy)]
pub struct IterationEvent<'a> {
    /// 1-based lookup counter, endpoint probes included.
    pub iteration: usize,
    pub guess: f64,
    /// Bracket in effect when `guess` was evaluated.
    pub bracket: (f64, f64),
    pub evaluation: Evaluation<'a>,
}

type Progress<'p> = Option<&'p mut dyn FnMut(&IterationEvent<'_>)>;

/// Solve `problem` against `service`.
///
/// See [`solve_with_progress`] for the algorithm.
pub fn solve(
    service: &dyn PropertyService,
    problem: &SolverProblem,
) -> SolverResult<PropertySolution> {
    solve_with_progress(service, problem, None)
}

/// Solve `problem`, reporting every lookup to `progress`.
///
/// 1. Probe `low`, then `high`. An endpoint that already meets the tolerance
///    is returned as is (iteration 1 or 2). Probe failures are logged and
///    otherwise ignored.
/// 2. Bisect: `actual < target` moves `low` up, anything else moves `high`
///    down. The target must increase monotonically with the unknown.
/// 3. A failed lookup at the first midpoint is fatal. Later failures either
///    steer by the last successful value ([`RecoveryPolicy::BestEffort`]) or
///    abort ([`RecoveryPolicy::FailFast`]).
/// 4. When the budget runs out the final midpoint is evaluated and returned
///    with [`Status::MaxIterations`].
pub fn solve_with_progress(
    service: &dyn PropertyService,
    problem: &SolverProblem,
    mut progress: Progress<'_>,
) -> SolverResult<PropertySolution> {
    problem.validate()?;

    let target = problem.target_value;
    let budget = problem.max_iterations;
    let mut low = problem.low;
    let mut high = problem.high;
    let mut iterations = 0;

    for guess in [problem.low, problem.high] {
        if iterations == budget {
            break;
        }
        iterations += 1;
        match evaluate(service, problem, guess) {
            Ok(actual) => {
                let rel = relative_error(actual, target)?;
                report(
                    &mut progress,
                    iterations,
                    guess,
                    (low, high),
                    Evaluation::Value {
                        actual,
                        relative_error: rel,
                    },
                );
                if rel < problem.tolerance {
                    debug!(guess, actual, iterations, "bracket endpoint meets tolerance");
                    return Ok(PropertySolution {
                        value: guess,
                        achieved: actual,
                        iterations,
                        status: Status::Converged,
                    });
                }
            }
            Err(e) => {
                debug!(guess, error = %e, "endpoint probe failed");
                report(&mut progress, iterations, guess, (low, high), Evaluation::Failed(&e));
            }
        }
    }

    // Last successful midpoint as (guess, actual).
    let mut last: Option<(f64, f64)> = None;

    while iterations < budget {
        iterations += 1;
        let guess = 0.5 * (low + high);
        let bracket = (low, high);

        match evaluate(service, problem, guess) {
            Ok(actual) => {
                let rel = relative_error(actual, target)?;
                report(
                    &mut progress,
                    iterations,
                    guess,
                    bracket,
                    Evaluation::Value {
                        actual,
                        relative_error: rel,
                    },
                );
                debug!(
                    iteration = iterations,
                    guess, actual, relative_error = rel, "bisection step"
                );
                if rel < problem.tolerance {
                    return Ok(PropertySolution {
                        value: guess,
                        achieved: actual,
                        iterations,
                        status: Status::Converged,
                    });
                }
                last = Some((guess, actual));
                if actual < target {
                    low = guess;
                } else {
                    high = guess;
                }
            }
            Err(source) => {
                report(&mut progress, iterations, guess, bracket, Evaluation::Failed(&source));
                match (problem.recovery, last) {
                    (RecoveryPolicy::BestEffort, Some((_, previous))) => {
                        debug!(
                            guess,
                            previous,
                            error = %source,
                            "lookup failed, steering by previous value"
                        );
                        if previous < target {
                            low = guess;
                        } else {
                            high = guess;
                        }
                    }
                    _ => return Err(lookup_error(problem, guess, source)),
                }
            }
        }
    }

    let guess = 0.5 * (low + high);
    match evaluate(service, problem, guess) {
        Ok(actual) => {
            debug!(guess, actual, budget, "iteration budget exhausted");
            Ok(PropertySolution {
                value: guess,
                achieved: actual,
                iterations: budget,
                status: Status::MaxIterations,
            })
        }
        Err(source) => match (problem.recovery, last) {
            (RecoveryPolicy::BestEffort, Some((value, achieved))) => {
                debug!(guess, error = %source, "final midpoint failed, keeping last estimate");
                Ok(PropertySolution {
                    value,
                    achieved,
                    iterations: budget,
                    status: Status::MaxIterations,
                })
            }
            _ => Err(lookup_error(problem, guess, source)),
        },
    }
}

fn evaluate(
    service: &dyn PropertyService,
    problem: &SolverProblem,
    guess: f64,
) -> FluidResult<f64> {
    let input = StateInput::new(problem.known, problem.known_value, problem.unknown, guess);
    let value = service.query(problem.target, input, problem.fluid)?;
    if !value.is_finite() {
        return Err(FluidError::lookup(
            problem.target,
            input,
            problem.fluid,
            "backend returned a non-finite value",
        ));
    }
    Ok(value)
}

fn lookup_error(problem: &SolverProblem, guess: f64, source: FluidError) -> SolverError {
    SolverError::Lookup {
        target: problem.target,
        unknown: problem.unknown,
        guess,
        source,
    }
}

fn report(
    progress: &mut Progress<'_>,
    iteration: usize,
    guess: f64,
    bracket: (f64, f64),
    evaluation: Evaluation<'_>,
) {
    if let Some(callback) = progress {
        callback(&IterationEvent {
            iteration,
            guess,
            bracket,
            evaluation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tc_core::FailureKind;
    use tc_fluids::{Property, Species};

    /// `T -> H = T` with a call counter and an optional failing call.
    struct Identity {
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
    }

    impl Identity {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: Some(call),
            }
        }
    }

    impl PropertyService for Identity {
        fn name(&self) -> &str {
            "identity"
        }

        fn query(&self, output: Property, input: StateInput, fluid: Species) -> FluidResult<f64> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if Some(call) == self.fail_on_call {
                return Err(FluidError::lookup(output, input, fluid, "synthetic failure"));
            }
            Ok(input.value_of(Property::Temperature).unwrap_or(f64::NAN))
        }
    }

    fn problem(target: f64) -> SolverProblem {
        SolverProblem::new(
            Species::Water,
            Property::Enthalpy,
            target,
            Property::Pressure,
            1.0e5,
            Property::Temperature,
            10.0,
            90.0,
        )
    }

    #[test]
    fn endpoints_converge_immediately() {
        let low = solve(&Identity::new(), &problem(10.0)).unwrap();
        assert_eq!(low.value, 10.0);
        assert_eq!(low.iterations, 1);
        assert!(low.is_converged());

        let high = solve(&Identity::new(), &problem(90.0)).unwrap();
        assert_eq!(high.value, 90.0);
        assert_eq!(high.iterations, 2);
    }

    #[test]
    fn first_midpoint_failure_is_fatal() {
        // Calls 1 and 2 are the endpoint probes.
        let err = solve(&Identity::failing_on(3), &problem(33.0)).unwrap_err();
        assert!(matches!(err, SolverError::Lookup { guess, .. } if guess == 50.0));
        assert_eq!(err.kind(), FailureKind::LookupFailure);
    }

    #[test]
    fn endpoint_probe_failure_is_tolerated() {
        let solution = solve(&Identity::failing_on(1), &problem(33.0)).unwrap();
        assert!(solution.is_converged());
        assert!((solution.value - 33.0).abs() / 33.0 < 1e-3);
    }

    #[test]
    fn best_effort_recovers_toward_the_root() {
        // Midpoint 50 (< 80) moves low; midpoint 70 fails and is steered by 50.
        let solution = solve(&Identity::failing_on(4), &problem(80.0)).unwrap();
        assert!(solution.is_converged());
        assert!((solution.value - 80.0).abs() / 80.0 < 1e-3);
    }

    #[test]
    fn best_effort_can_bias_the_bracket() {
        // Midpoint 50 (>= 33) moves high; midpoint 30 fails and is also steered
        // by 50, which discards the root.
        let solution = solve(&Identity::failing_on(4), &problem(33.0)).unwrap();
        assert_eq!(solution.status, Status::MaxIterations);
        assert_eq!(solution.iterations, 50);
        assert!((solution.value - 30.0).abs() < 1e-6);
    }

    #[test]
    fn fail_fast_aborts_on_any_midpoint_failure() {
        let p = problem(80.0).with_recovery(RecoveryPolicy::FailFast);
        let err = solve(&Identity::failing_on(4), &p).unwrap_err();
        assert!(matches!(err, SolverError::Lookup { guess, .. } if guess == 70.0));
    }

    #[test]
    fn exhaustion_returns_best_midpoint() {
        let p = problem(33.0).with_tolerance(1e-15).with_max_iterations(6);
        let solution = solve(&Identity::new(), &p).unwrap();
        assert_eq!(solution.status, Status::MaxIterations);
        assert_eq!(solution.iterations, 6);
        assert!(solution.value > 10.0 && solution.value < 90.0);

        let err = solution.into_converged(Property::Temperature).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NonConvergence);
    }

    #[test]
    fn zero_target_rejected_before_lookup() {
        let service = Identity::new();
        let err = solve(&service, &problem(0.0)).unwrap_err();
        assert_eq!(err.kind(), FailureKind::DegenerateInput);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn progress_sees_every_lookup() {
        let mut events = Vec::new();
        let mut record = |event: &IterationEvent<'_>| {
            events.push((event.iteration, event.guess));
        };
        let solution = solve_with_progress(&Identity::new(), &problem(45.0), Some(&mut record))
            .unwrap();
        assert_eq!(events.len(), solution.iterations);
        assert_eq!(events[0], (1, 10.0));
        assert_eq!(events[1], (2, 90.0));
        assert_eq!(events[2], (3, 50.0));
    }
}
