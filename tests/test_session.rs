//! Integration tests for the simulation session
//!
//! A scripted solver stands in for the remote endpoint; a recording renderer
//! captures what the charts were asked to draw.

use std::collections::{HashMap, VecDeque};

use approx::assert_relative_eq;
use thyrosim_client::prelude::graph::ChartState;
use thyrosim_client::prelude::*;
use thyrosim_client::session::{CompartmentData, NotificationKind};

/// Answers each request with the next scripted outcome
#[derive(Default)]
struct ScriptedSolver {
    outcomes: VecDeque<Result<SolverResponse, SolverError>>,
    requests: Vec<FormSnapshot>,
}

impl ScriptedSolver {
    fn answering(outcomes: impl IntoIterator<Item = Result<SolverResponse, SolverError>>) -> Self {
        ScriptedSolver {
            outcomes: outcomes.into_iter().collect(),
            requests: Vec::new(),
        }
    }
}

impl Solver for ScriptedSolver {
    fn solve(&mut self, request: &FormSnapshot) -> Result<SolverResponse, SolverError> {
        self.requests.push(request.clone());
        self.outcomes
            .pop_front()
            .unwrap_or(Err(SolverError::Transport("no scripted answer".into())))
    }
}

#[derive(Default)]
struct Recorder {
    inits: usize,
    updates: Vec<ChartFrame>,
}

impl ChartRenderer for Recorder {
    fn init(&mut self, _frame: &ChartFrame) {
        self.inits += 1;
    }

    fn update(&mut self, frame: &ChartFrame) {
        self.updates.push(frame.clone());
    }

    fn set_range_visible(&mut self, _visible: bool) {}
}

/// A response of `days` simulated days where every quantity peaks at `peak`
fn response(days: f64, peak: f64) -> SolverResponse {
    let mut data = HashMap::new();
    data.insert(
        "t".to_string(),
        CompartmentData {
            values: vec![0.0, 12.0, days * 24.0],
            max: None,
        },
    );
    for quantity in Quantity::ALL {
        data.insert(
            quantity.compartment().to_string(),
            CompartmentData {
                values: vec![peak / 2.0, peak, peak / 4.0],
                max: Some(peak),
            },
        );
    }
    SolverResponse {
        sim_time: days,
        data,
    }
}

fn session(
    outcomes: impl IntoIterator<Item = Result<SolverResponse, SolverError>>,
) -> SessionController<ScriptedSolver, Recorder> {
    SessionController::new(
        &SessionConfig::default(),
        ScriptedSolver::answering(outcomes),
        Recorder::default(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════════════

mod scenarios {
    use super::*;

    #[test]
    fn test_default_scenario() {
        let mut session = session([Ok(response(5.0, 20.0))]);
        session.form_mut().set_simtime("40");
        session.registry_mut().add(Route::IV, Hormone::T4);

        let notification = session
            .submit(Submission::Scenario(Scenario::Default))
            .unwrap();
        assert_eq!(notification.kind, NotificationKind::Success);
        assert!(notification.message.starts_with("Success! Execution time (sec): "));

        assert_eq!(session.form().simtime().text(), "5");
        assert_eq!(
            session.form().dial_values(),
            [Some(100.0), Some(88.0), Some(100.0), Some(88.0)]
        );
        assert!(session.registry().is_empty());

        let request = &session.solver().requests[0];
        assert_eq!(
            request.encode(),
            "experiment=experiment-default&thysim=Thyrosim"
        );
    }

    #[test]
    fn test_dijo19_scenario() {
        let mut session = session([Ok(response(30.0, 20.0))]);
        session
            .submit(Submission::Scenario(Scenario::DiJo19Example1))
            .unwrap();

        assert_eq!(session.form().simtime().text(), "30");
        assert_eq!(
            session.form().dial_values(),
            [Some(25.0), Some(88.0), Some(25.0), Some(88.0)]
        );

        let registry = session.registry();
        assert_eq!(registry.len(), 2);
        let expected = [(Hormone::T4, 123.0), (Hormone::T3, 6.5)];
        for ((_, event), (hormone, dose)) in registry.iter().zip(expected) {
            assert_eq!(event.route(), Route::Oral);
            assert_eq!(event.hormone(), hormone);
            assert_eq!(event.dose(), Some(dose));
            assert_eq!(event.interval_days(), Some(1.0));
            assert_eq!(event.start_day(), Some(1.0));
            assert_eq!(event.end_day(), Some(30.0));
            assert!(!event.single_dose());
        }
        assert_eq!(
            session.solver().requests[0].get("experiment"),
            Some("experiment-DiJo19-1")
        );
    }

    #[test]
    fn test_scenario_replaces_both_runs() {
        let mut session = session([
            Ok(response(5.0, 20.0)),
            Ok(response(5.0, 30.0)),
            Ok(response(5.0, 10.0)),
        ]);
        session.submit(Submission::Form).unwrap();
        session.submit(Submission::Form).unwrap();
        assert!(session.runs().is_present(RunSlot::Secondary));

        session
            .submit(Submission::Scenario(Scenario::DefaultJunior))
            .unwrap();
        assert!(session.runs().is_present(RunSlot::Primary));
        assert!(!session.runs().is_present(RunSlot::Secondary));
        assert_eq!(session.runs().variant(), Variant::Junior);
        assert_eq!(session.next_slot(), RunSlot::Secondary);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Run slots
// ═══════════════════════════════════════════════════════════════════════════════

mod run_slots {
    use super::*;

    #[test]
    fn test_round_robin_over_two_slots() {
        let mut session = session([
            Ok(response(5.0, 20.0)),
            Ok(response(10.0, 30.0)),
            Ok(response(5.0, 12.0)),
        ]);

        assert_eq!(session.next_slot(), RunSlot::Primary);
        session.submit(Submission::Form).unwrap();
        assert!(session.runs().is_present(RunSlot::Primary));
        assert!(!session.runs().is_present(RunSlot::Secondary));

        session.submit(Submission::Form).unwrap();
        assert!(session.runs().is_present(RunSlot::Secondary));
        assert_relative_eq!(session.runs().max_simulation_duration(), 10.0);
        assert_relative_eq!(session.runs().max_observed(Quantity::FT4), 30.0);

        session.submit(Submission::Form).unwrap();
        assert_eq!(session.next_slot(), RunSlot::Secondary);
        assert_eq!(
            session.runs().values(RunSlot::Primary, Quantity::TSH),
            &[6.0, 12.0, 3.0]
        );
    }

    #[test]
    fn test_timeout_leaves_runs_untouched() {
        let mut session = session([Ok(response(5.0, 20.0)), Err(SolverError::Timeout)]);
        session.submit(Submission::Form).unwrap();
        let before = session.runs().clone();

        let err = session.submit(Submission::Form).unwrap_err();
        let notification = err.notification();
        assert_eq!(notification.kind, NotificationKind::Failure);
        assert!(notification
            .message
            .starts_with("Error! Operation timed out (sec): "));

        assert_eq!(session.runs(), &before);
        assert_eq!(session.next_slot(), RunSlot::Secondary);
    }

    #[test]
    fn test_failed_scenario_keeps_variant_of_stored_runs() {
        let mut session = session([Ok(response(5.0, 10.0)), Err(SolverError::Timeout)]);
        session.submit(Submission::Form).unwrap();
        let before = session.runs().clone();
        assert_relative_eq!(before.max_observed(Quantity::FT4), 17.0);

        session
            .submit(Submission::Scenario(Scenario::DefaultJunior))
            .unwrap_err();

        assert_eq!(session.runs(), &before);
        assert_eq!(session.runs().variant(), Variant::Standard);
        assert_relative_eq!(session.runs().max_observed(Quantity::FT4), 17.0);
        // the form already shows the preset
        assert_eq!(session.form().variant(), Variant::Junior);
    }

    #[test]
    fn test_late_answer_counts_as_timeout() {
        let mut session = SessionController::new(
            &SessionConfig::default().with_timeout_secs(0),
            ScriptedSolver::answering([Ok(response(5.0, 20.0))]),
            Recorder::default(),
        );
        let err = session.submit(Submission::Form).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Solver {
                source: SolverError::Timeout,
                ..
            }
        ));
        assert!(!session.runs().is_present(RunSlot::Primary));
    }

    #[test]
    fn test_incomplete_response_is_a_failure() {
        let mut incomplete = response(5.0, 20.0);
        incomplete.data.remove("7");
        let mut session = session([Ok(incomplete)]);

        let err = session.submit(Submission::Form).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Solver {
                source: SolverError::MissingCompartment(_),
                ..
            }
        ));
        assert_eq!(
            err.notification().message.split(':').next(),
            Some("Error! Simulation failed (sec)")
        );
        assert!(session.runs().present_slots().next().is_none());
    }

    #[test]
    fn test_reset_run_redraws_without_submitting() {
        let mut session = session([Ok(response(5.0, 20.0))]);
        session.submit(Submission::Form).unwrap();
        let updates = session.charts().renderer().updates.len();

        session.reset_run(RunSlot::Primary);
        assert!(!session.runs().is_present(RunSlot::Primary));
        assert_eq!(session.solver().requests.len(), 1);

        let recorder = session.charts().renderer();
        assert_eq!(recorder.updates.len(), updates + Quantity::ALL.len());
        let last = recorder.updates.last().unwrap();
        assert!(last.lines.iter().all(|line| line.points.is_empty()));
        assert_relative_eq!(last.domain.x_max, 5.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Form submission
// ═══════════════════════════════════════════════════════════════════════════════

mod form_submission {
    use super::*;

    #[test]
    fn test_invalid_form_is_not_sent() {
        let mut session = session([Ok(response(5.0, 20.0))]);
        session.form_mut().set_dial(1, "120");

        let err = session.submit(Submission::Form).unwrap_err();
        assert!(matches!(err, SessionError::Validation(ref v) if v.flags("dialinput2")));
        assert_eq!(err.notification().message, "Error! Form validation failed.");
        assert!(session.solver().requests.is_empty());
        assert_eq!(session.next_slot(), RunSlot::Primary);
    }

    #[test]
    fn test_form_snapshot_is_sent() {
        let mut session = session([Ok(response(40.0, 20.0))]);
        let index = session.registry_mut().add(Route::Oral, Hormone::T3);
        let registry = session.registry_mut();
        registry.set_field(index, Field::Dose, "25").unwrap();
        registry.set_field(index, Field::Start, "1").unwrap();
        registry.set_field(index, Field::Interval, "1").unwrap();
        registry.set_field(index, Field::End, "40").unwrap();

        session.submit(Submission::Form).unwrap();

        let request = &session.solver().requests[0];
        assert_eq!(request.get("thysim"), Some("Thyrosim"));
        // the end day pushed the simulation out
        assert_eq!(request.get("simtime"), Some("40"));
        assert_eq!(request.get("dose-1"), Some("25"));
        assert_eq!(request.get("type-1"), Some("1"));
        assert_eq!(request.get("hormone-1"), Some("3"));
    }

    #[test]
    fn test_charts_initialize_once() {
        let mut session = session([Ok(response(5.0, 20.0))]);
        for quantity in Quantity::ALL {
            assert_eq!(session.charts().state(quantity), ChartState::Live);
        }
        session.submit(Submission::Form).unwrap();

        let recorder = session.charts().renderer();
        assert_eq!(recorder.inits, Quantity::ALL.len());
        let ft4 = recorder
            .updates
            .iter()
            .find(|frame| frame.quantity == Quantity::FT4)
            .unwrap();
        assert_relative_eq!(ft4.domain.y_max, 30.0);
        assert!(!ft4.show_time_labels);
    }

    #[test]
    fn test_variant_switch_changes_floor() {
        let mut session = session([]);
        session.set_variant(Variant::Junior);
        assert_eq!(session.form().variant(), Variant::Junior);
        let frame = session.charts().renderer().updates.last().unwrap();
        assert_eq!(frame.quantity, Quantity::TSH);

        let ft3 = session.charts().frame(session.runs(), Quantity::FT3);
        // junior floor of 7 rounds up to 8
        assert_relative_eq!(ft3.domain.y_max, 8.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Injected state
// ═══════════════════════════════════════════════════════════════════════════════

mod injected_state {
    use super::*;

    #[test]
    fn test_with_state_draws_existing_runs() {
        let mut runs = RunStore::new(Variant::Junior);
        runs.set_run(
            RunSlot::Secondary,
            Some(response(10.0, 20.0).into_payload().unwrap()),
        );
        let mut registry = DosingRegistry::new();
        registry.add(Route::IV, Hormone::T4);

        let session = SessionController::with_state(
            &SessionConfig::default(),
            ScriptedSolver::default(),
            Recorder::default(),
            runs.clone(),
            registry,
        );

        assert_eq!(session.runs(), &runs);
        assert_eq!(session.registry().len(), 1);
        assert_eq!(session.form().variant(), Variant::Junior);
        assert_eq!(session.next_slot(), RunSlot::Primary);
        assert_eq!(session.charts().renderer().inits, Quantity::ALL.len());

        let tsh = session.charts().frame(session.runs(), Quantity::TSH);
        assert_relative_eq!(tsh.domain.x_max, 10.0);
        assert_eq!(tsh.lines[1].points.len(), 3);
        assert!(tsh.lines[0].points.is_empty());
    }
}
