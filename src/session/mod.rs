//! The simulation session
//!
//! A [SessionController] owns everything one open simulator page works on:
//! the live form, the dosing inputs, the two stored runs and the charts.
//! Submitting sends either the form or a canned [Scenario] to a [Solver];
//! a successful answer is stored in the selected run slot and every chart is
//! redrawn. Failures leave the stored runs as they were.

pub mod config;
mod scenario;
pub mod solver;

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::dosing::DosingRegistry;
use crate::form::{validate, FormState, ValidationError};
use crate::graph::{ChartController, ChartRenderer, RunSlot, RunStore};
use crate::settings::Variant;

pub use config::{ConfigError, SessionConfig};
pub use scenario::Scenario;
#[cfg(feature = "http")]
pub use solver::HttpSolver;
pub use solver::{CompartmentData, Solver, SolverError, SolverResponse};

/// What gets sent to the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The live form and dosing inputs, after validation
    Form,
    /// A canned experiment; the form is rewritten to match it
    Scenario(Scenario),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{source} (after {secs}s)", secs = .elapsed.as_secs())]
    Solver {
        source: SolverError,
        elapsed: Duration,
    },
}

impl SessionError {
    /// The message shown to the user for this failure
    pub fn notification(&self) -> Notification {
        match self {
            SessionError::Validation(_) => Notification {
                kind: NotificationKind::Failure,
                message: "Error! Form validation failed.".to_string(),
            },
            SessionError::Solver { source, elapsed } => {
                let secs = elapsed.as_secs();
                let message = match source {
                    SolverError::Timeout => format!("Error! Operation timed out (sec): {secs}"),
                    _ => format!("Error! Simulation failed (sec): {secs}"),
                };
                Notification {
                    kind: NotificationKind::Failure,
                    message,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// Outcome message of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn success(elapsed: Duration) -> Self {
        Notification {
            kind: NotificationKind::Success,
            message: format!("Success! Execution time (sec): {}", elapsed.as_secs()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Owns the state of one simulation session
pub struct SessionController<S: Solver, R: ChartRenderer> {
    solver: S,
    charts: ChartController<R>,
    runs: RunStore,
    registry: DosingRegistry,
    form: FormState,
    next_slot: RunSlot,
    timeout: Duration,
}

impl<S: Solver, R: ChartRenderer> SessionController<S, R> {
    /// Start a session and draw the empty charts
    pub fn new(config: &SessionConfig, solver: S, renderer: R) -> Self {
        Self::with_state(
            config,
            solver,
            renderer,
            RunStore::new(config.variant),
            DosingRegistry::new(),
        )
    }

    /// Start a session over existing runs and dosing inputs and draw them.
    ///
    /// The form takes its variant from `runs`.
    pub fn with_state(
        config: &SessionConfig,
        solver: S,
        renderer: R,
        runs: RunStore,
        registry: DosingRegistry,
    ) -> Self {
        let form = FormState::new(runs.variant()).with_parameters(
            config
                .parameters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        let mut session = SessionController {
            solver,
            charts: ChartController::new(renderer),
            runs,
            registry,
            form,
            next_slot: RunSlot::Primary,
            timeout: config.timeout(),
        };
        session.charts.render_all(&session.runs);
        session
    }

    pub fn runs(&self) -> &RunStore {
        &self.runs
    }

    pub fn charts(&self) -> &ChartController<R> {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut ChartController<R> {
        &mut self.charts
    }

    pub fn registry(&self) -> &DosingRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DosingRegistry {
        &mut self.registry
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Slot the next successful run is stored in
    pub fn next_slot(&self) -> RunSlot {
        self.next_slot
    }

    pub fn select_slot(&mut self, slot: RunSlot) {
        self.next_slot = slot;
    }

    /// Switch the simulator variant; the charts' floors and ranges follow
    pub fn set_variant(&mut self, variant: Variant) {
        self.form.set_variant(variant);
        self.runs.set_variant(variant);
        self.charts.render_all(&self.runs);
    }

    /// Erase the run in `slot` and redraw
    pub fn reset_run(&mut self, slot: RunSlot) {
        tracing::debug!(%slot, "resetting run");
        self.runs.set_run(slot, None);
        self.charts.render_all(&self.runs);
    }

    /// Flip the normal-range band on every chart
    pub fn toggle_range(&mut self) -> bool {
        self.charts.toggle_range()
    }

    /// Send the form or a scenario to the solver and store the result.
    ///
    /// On success the run lands in [Self::next_slot], the selection moves to
    /// the other slot and all charts are redrawn. A scenario always runs in
    /// the primary slot and erases the secondary one. An answer arriving after
    /// the configured timeout counts as a timeout.
    pub fn submit(&mut self, submission: Submission) -> Result<Notification, SessionError> {
        let request = match submission {
            Submission::Form => {
                validate(&mut self.form, &mut self.registry)?;
                self.form.snapshot(&self.registry)
            }
            Submission::Scenario(scenario) => {
                scenario.apply(&mut self.form, &mut self.registry);
                self.next_slot = RunSlot::Primary;
                scenario.request()
            }
        };
        let slot = self.next_slot;

        let started = Instant::now();
        let outcome = self
            .solver
            .solve(&request)
            .and_then(SolverResponse::into_payload);
        let elapsed = started.elapsed();
        let outcome = match outcome {
            Ok(_) if elapsed >= self.timeout => Err(SolverError::Timeout),
            other => other,
        };

        match outcome {
            Ok(payload) => {
                tracing::info!(
                    %slot,
                    elapsed_secs = elapsed.as_secs(),
                    days = payload.simulation_duration(),
                    "simulation finished"
                );
                self.runs.set_variant(self.form.variant());
                if let Submission::Scenario(_) = submission {
                    self.runs.set_run(RunSlot::Secondary, None);
                }
                self.runs.set_run(slot, Some(payload));
                self.next_slot = slot.next();
                self.charts.render_all(&self.runs);
                Ok(Notification::success(elapsed))
            }
            Err(source) => {
                tracing::warn!(
                    error = %source,
                    elapsed_secs = elapsed.as_secs(),
                    "simulation failed"
                );
                Err(SessionError::Solver { source, elapsed })
            }
        }
    }
}
