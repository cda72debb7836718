//! Small machine shared by the unit tests:
//! `ROOT -> { A (deep history H0) -> { A1, A2 }, B }`.

use super::{Handler, HistoryId, HistoryPoint, MachineDefinition, StateNode, StateTree, Target};
use crate::{EventIdentity, StateIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Id {
    Root,
    A,
    A1,
    A2,
    B,
}

impl StateIdentity for Id {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ev {
    Do,
    X,
    Y,
    Z,
    Unused,
}

impl EventIdentity for Ev {
    const DO: Self = Ev::Do;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    pub log: heapless::Vec<&'static str, 64>,
}

impl Vars {
    pub fn record(&mut self, line: &'static str) {
        self.log.push(line).expect("fixture log overflow");
    }

    pub fn take_log(&mut self) -> std::vec::Vec<&'static str> {
        let lines = self.log.iter().copied().collect();
        self.log.clear();
        lines
    }
}

type Node = StateNode<Id, Ev, Vars>;

fn enter_root(v: &mut Vars) {
    v.record("enter ROOT");
}
fn enter_a(v: &mut Vars) {
    v.record("enter A");
}
fn exit_a(v: &mut Vars) {
    v.record("exit A");
}
fn enter_a1(v: &mut Vars) {
    v.record("enter A1");
}
fn exit_a1(v: &mut Vars) {
    v.record("exit A1");
}
fn enter_a2(v: &mut Vars) {
    v.record("enter A2");
}
fn exit_a2(v: &mut Vars) {
    v.record("exit A2");
}
fn enter_b(v: &mut Vars) {
    v.record("enter B");
}
fn exit_b(v: &mut Vars) {
    v.record("exit B");
}

pub const STATES: &[Node] = &[
    Node::new(Id::Root, "ROOT", None)
        .initial(Target::State(Id::A))
        .entry(&[enter_root]),
    Node::new(Id::A, "A", Some(Id::Root))
        .initial(Target::State(Id::A1))
        .entry(&[enter_a])
        .exit(&[exit_a])
        .handlers(&[Handler::on(Ev::Y).to(Target::State(Id::B))]),
    Node::new(Id::A1, "A1", Some(Id::A))
        .entry(&[enter_a1])
        .exit(&[exit_a1])
        .handlers(&[Handler::on(Ev::X).to(Target::State(Id::A2))]),
    Node::new(Id::A2, "A2", Some(Id::A))
        .entry(&[enter_a2])
        .exit(&[exit_a2]),
    Node::new(Id::B, "B", Some(Id::Root))
        .entry(&[enter_b])
        .exit(&[exit_b])
        .handlers(&[Handler::on(Ev::Z).to(Target::History(HistoryId(0)))]),
];

pub const TREE: StateTree<Id, Ev, Vars> = StateTree::new(STATES);

pub static SCENARIO: MachineDefinition<Id, Ev, Vars> = MachineDefinition::new(
    STATES,
    &[HistoryPoint::deep(Id::A, Target::State(Id::A1))],
    &[],
);
