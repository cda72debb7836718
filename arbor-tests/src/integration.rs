//! Integration tests for the statechart engine with std features enabled

use crate::common::*;
use arbor_core::core::Machine;
use arbor_core::{DispatchResult, MachineError, StateMachine};

#[test]
fn history_scenario_end_to_end() -> anyhow::Result<()> {
    setup_tracing();
    let _span = tracing::info_span!("history_scenario").entered();

    let mut machine = Machine::new(&WORKBENCH, TestVars::default())?;
    machine.start()?;
    tracing::info!(state = ?machine.state(), "workbench started");
    assert_eq!(machine.state(), Some(TestState::A1));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["enter ROOT", "enter A", "enter A1"]
    );

    assert_eq!(machine.dispatch(TestEvent::X)?, DispatchResult::Transitioned);
    assert_eq!(machine.state(), Some(TestState::A2));
    assert_eq!(machine.vars_mut().take_log(), ["exit A1", "enter A2"]);

    assert_eq!(machine.dispatch(TestEvent::Y)?, DispatchResult::Transitioned);
    assert_eq!(machine.recorded_history(A_HISTORY), Some(TestState::A2));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["exit A2", "exit A", "enter B", "enter B2"]
    );

    assert_eq!(machine.dispatch(TestEvent::Z)?, DispatchResult::Transitioned);
    tracing::info!(
        restored = ?machine.state(),
        recorded = ?machine.recorded_history(A_HISTORY),
        "returned through history"
    );
    assert_eq!(machine.state(), Some(TestState::A2));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["exit B2", "exit B", "enter A", "enter A2"]
    );
    Ok(())
}

#[test]
fn do_handler_leaves_after_enough_ticks() -> anyhow::Result<()> {
    setup_tracing();

    let mut machine = started_workbench();
    machine.dispatch(TestEvent::X)?;
    machine.vars_mut().take_log();

    for _ in 1..A2_PATIENCE {
        assert_eq!(machine.dispatch(TestEvent::Do)?, DispatchResult::Handled);
        assert_eq!(machine.state(), Some(TestState::A2));
    }
    assert_eq!(machine.dispatch(TestEvent::Do)?, DispatchResult::Transitioned);
    assert_eq!(machine.state(), Some(TestState::B2));
    assert_eq!(machine.vars().ticks, 0);
    assert_eq!(
        machine.vars_mut().take_log(),
        ["exit A2", "exit A", "enter B", "enter B2"]
    );
    Ok(())
}

#[test]
fn action_only_handler_feeds_the_entry_choice() -> anyhow::Result<()> {
    let mut machine = started_workbench();
    assert_eq!(machine.dispatch(TestEvent::Toggle)?, DispatchResult::Handled);
    assert!(machine.vars().flag);
    assert!(machine.vars().log.is_empty());

    machine.dispatch(TestEvent::Y)?;
    assert_eq!(machine.state(), Some(TestState::B1));
    Ok(())
}

#[test]
fn history_survives_a_detour_through_other_states() -> anyhow::Result<()> {
    let mut machine = started_workbench();
    for event in [TestEvent::X, TestEvent::Y, TestEvent::Park] {
        machine.dispatch(event)?;
    }
    assert_eq!(machine.state(), Some(TestState::C));

    machine.dispatch(TestEvent::Y)?;
    assert_eq!(machine.state(), Some(TestState::A2));

    machine.dispatch(TestEvent::Y)?;
    machine.dispatch(TestEvent::Park)?;
    machine.dispatch(TestEvent::Z)?;
    assert_eq!(
        machine.state(),
        Some(TestState::A1),
        "plain transition to A follows its initial, not its history"
    );
    Ok(())
}

#[test]
fn lifecycle_errors_surface_through_anyhow() {
    let mut machine =
        Machine::new(&WORKBENCH, TestVars::default()).expect("workbench definition is valid");
    let err = anyhow::Error::from(
        machine
            .dispatch(TestEvent::X)
            .expect_err("dispatch before start"),
    );
    assert_eq!(err.downcast_ref::<MachineError>(), Some(&MachineError::NotStarted));
    assert!(!err.to_string().is_empty());
}

#[test]
fn state_names_come_from_the_definition() {
    let machine = started_workbench();
    let names: Vec<_> = TestState::ALL
        .iter()
        .map(|state| machine.state_name(*state))
        .collect();
    assert_eq!(names, ["ROOT", "A", "A1", "A2", "B", "B1", "B2", "C"]);
}

#[test]
fn machines_run_independently_on_separate_threads() {
    let handles: Vec<_> = (0..4)
        .map(|n| {
            std::thread::spawn(move || {
                let mut machine = started_workbench();
                for _ in 0..n {
                    machine.dispatch(TestEvent::X).expect("started");
                }
                machine.state()
            })
        })
        .collect();
    let states: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread finished"))
        .collect();
    assert_eq!(
        states,
        [
            Some(TestState::A1),
            Some(TestState::A2),
            Some(TestState::A1),
            Some(TestState::A2)
        ]
    );
}

#[test]
fn generic_driver_through_state_machine_trait() {
    fn drain<M: StateMachine>(machine: &mut M, events: &[M::Event]) -> Vec<DispatchResult> {
        events
            .iter()
            .map(|event| machine.dispatch(*event).expect("started"))
            .collect()
    }

    let mut machine = started_workbench();
    let results = drain(&mut machine, &[TestEvent::Unused, TestEvent::Toggle, TestEvent::X]);
    assert_eq!(
        results,
        [
            DispatchResult::Unhandled,
            DispatchResult::Handled,
            DispatchResult::Transitioned
        ]
    );
}

#[test]
fn diagram_export_describes_the_workbench() {
    let json = serde_json::to_value(WORKBENCH.diagram()).expect("diagram serializes");
    let states = json["states"].as_array().expect("states array");
    assert_eq!(states.len(), TestState::ALL.len());
    assert_eq!(states[TestState::A2 as usize]["has_do"], true);
    assert_eq!(states[TestState::B as usize]["initial"]["kind"], "choice");
    assert_eq!(json["histories"][0]["deep"], true);
    assert_eq!(json["choices"][0]["default"]["index"], TestState::B2 as usize);
}
