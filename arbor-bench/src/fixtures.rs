//! Benchmark fixtures: a flat two-state toggle and a deep ladder whose leaf
//! sits seven levels below the root.

use arbor_core::core::{Handler, HistoryId, HistoryPoint, MachineDefinition, StateNode, Target};
use arbor_core::{EventIdentity, StateIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    Root,
    Off,
    On,
}

impl StateIdentity for ToggleState {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderState {
    Root,
    Rung1,
    Rung2,
    Rung3,
    Rung4,
    Rung5,
    Rung6,
    Rung7,
    Side,
}

impl StateIdentity for LadderState {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchEvent {
    Do,
    Toggle,
    Jump,
    Back,
}

impl EventIdentity for BenchEvent {
    const DO: Self = BenchEvent::Do;
}

fn count(n: &mut u64) {
    *n = n.wrapping_add(1);
}

type ToggleNode = StateNode<ToggleState, BenchEvent, u64>;

const TOGGLE_STATES: &[ToggleNode] = &[
    ToggleNode::new(ToggleState::Root, "ROOT", None).initial(Target::State(ToggleState::Off)),
    ToggleNode::new(ToggleState::Off, "OFF", Some(ToggleState::Root)).handlers(&[Handler::on(
        BenchEvent::Toggle,
    )
    .action(count)
    .to(Target::State(ToggleState::On))]),
    ToggleNode::new(ToggleState::On, "ON", Some(ToggleState::Root))
        .handlers(&[Handler::on(BenchEvent::Toggle).to(Target::State(ToggleState::Off))]),
];

pub static TOGGLE: MachineDefinition<ToggleState, BenchEvent, u64> =
    MachineDefinition::new(TOGGLE_STATES, &[], &[]);

type LadderNode = StateNode<LadderState, BenchEvent, u64>;

const LADDER_HISTORY: HistoryId = HistoryId(0);

const LADDER_STATES: &[LadderNode] = &[
    LadderNode::new(LadderState::Root, "ROOT", None)
        .initial(Target::State(LadderState::Rung1))
        .do_action(count)
        .handlers(&[Handler::on(BenchEvent::Toggle).action(count)]),
    LadderNode::new(LadderState::Rung1, "RUNG1", Some(LadderState::Root))
        .initial(Target::History(LADDER_HISTORY))
        .entry(&[count])
        .exit(&[count])
        .do_action(count)
        .handlers(&[Handler::on(BenchEvent::Jump).to(Target::State(LadderState::Side))]),
    LadderNode::new(LadderState::Rung2, "RUNG2", Some(LadderState::Rung1))
        .initial(Target::State(LadderState::Rung3))
        .entry(&[count])
        .exit(&[count])
        .do_action(count),
    LadderNode::new(LadderState::Rung3, "RUNG3", Some(LadderState::Rung2))
        .initial(Target::State(LadderState::Rung4))
        .entry(&[count])
        .exit(&[count])
        .do_action(count),
    LadderNode::new(LadderState::Rung4, "RUNG4", Some(LadderState::Rung3))
        .initial(Target::State(LadderState::Rung5))
        .entry(&[count])
        .exit(&[count])
        .do_action(count),
    LadderNode::new(LadderState::Rung5, "RUNG5", Some(LadderState::Rung4))
        .initial(Target::State(LadderState::Rung6))
        .entry(&[count])
        .exit(&[count])
        .do_action(count),
    LadderNode::new(LadderState::Rung6, "RUNG6", Some(LadderState::Rung5))
        .initial(Target::State(LadderState::Rung7))
        .entry(&[count])
        .exit(&[count])
        .do_action(count),
    LadderNode::new(LadderState::Rung7, "RUNG7", Some(LadderState::Rung6))
        .entry(&[count])
        .exit(&[count])
        .do_action(count),
    LadderNode::new(LadderState::Side, "SIDE", Some(LadderState::Root))
        .handlers(&[Handler::on(BenchEvent::Back).to(Target::History(LADDER_HISTORY))]),
];

const LADDER_HISTORIES: &[HistoryPoint<LadderState>] = &[HistoryPoint::deep(
    LadderState::Rung1,
    Target::State(LadderState::Rung2),
)];

pub static LADDER: MachineDefinition<LadderState, BenchEvent, u64> =
    MachineDefinition::new(LADDER_STATES, LADDER_HISTORIES, &[]);
