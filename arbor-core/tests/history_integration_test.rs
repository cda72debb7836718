// arbor-core/tests/history_integration_test.rs

use arbor_core::core::{
    Branch, ChoiceId, ChoicePoint, Handler, HistoryId, HistoryPoint, Machine, MachineDefinition,
    StateNode, Target,
};
use arbor_core::{DispatchResult, EventIdentity, StateIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Id {
    Root,
    Idle,
    Shelf,
    Left,
    LeftA,
    LeftB,
    Right,
    RightA,
    RightB,
    Vault,
    Upper,
    UpperA,
    UpperB,
    Lower,
}

impl StateIdentity for Id {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ev {
    Do,
    Next,
    Swap,
    Leave,
    ToShelf,
    ToVault,
    Bump,
    Home,
}

impl EventIdentity for Ev {
    const DO: Self = Ev::Do;
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Vars {
    log: Vec<&'static str>,
    count: u32,
}

impl Vars {
    fn take_log(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.log)
    }
}

macro_rules! logger {
    ($name:ident, $text:literal) => {
        fn $name(v: &mut Vars) {
            v.log.push($text);
        }
    };
}

logger!(enter_shelf, "enter SHELF");
logger!(exit_shelf, "exit SHELF");
logger!(enter_left, "enter LEFT");
logger!(exit_left, "exit LEFT");
logger!(enter_left_a, "enter LEFT_A");
logger!(exit_left_a, "exit LEFT_A");
logger!(enter_left_b, "enter LEFT_B");
logger!(exit_left_b, "exit LEFT_B");
logger!(enter_right, "enter RIGHT");
logger!(exit_right, "exit RIGHT");
logger!(enter_right_a, "enter RIGHT_A");
logger!(exit_right_a, "exit RIGHT_A");
logger!(enter_right_b, "enter RIGHT_B");
logger!(exit_right_b, "exit RIGHT_B");
logger!(enter_vault, "enter VAULT");
logger!(exit_vault, "exit VAULT");
logger!(enter_upper, "enter UPPER");
logger!(exit_upper, "exit UPPER");
logger!(enter_upper_a, "enter UPPER_A");
logger!(exit_upper_a, "exit UPPER_A");
logger!(enter_upper_b, "enter UPPER_B");
logger!(exit_upper_b, "exit UPPER_B");
logger!(enter_lower, "enter LOWER");
logger!(exit_lower, "exit LOWER");

fn bump(v: &mut Vars) {
    v.count += 1;
}

fn counted(v: &Vars) -> bool {
    v.count > 0
}

const SHELF_HISTORY: HistoryId = HistoryId(0);
const VAULT_HISTORY: HistoryId = HistoryId(1);
const VAULT_DEFAULT: ChoiceId = ChoiceId(0);

type Node = StateNode<Id, Ev, Vars>;

const STATES: &[Node] = &[
    Node::new(Id::Root, "ROOT", None)
        .initial(Target::State(Id::Idle))
        .handlers(&[Handler::on(Ev::Bump).action(bump)]),
    Node::new(Id::Idle, "IDLE", Some(Id::Root)).handlers(&[
        Handler::on(Ev::ToShelf).to(Target::History(SHELF_HISTORY)),
        Handler::on(Ev::ToVault).to(Target::History(VAULT_HISTORY)),
    ]),
    Node::new(Id::Shelf, "SHELF", Some(Id::Root))
        .initial(Target::History(SHELF_HISTORY))
        .entry(&[enter_shelf])
        .exit(&[exit_shelf])
        .handlers(&[Handler::on(Ev::Leave).to(Target::State(Id::Idle))]),
    Node::new(Id::Left, "LEFT", Some(Id::Shelf))
        .initial(Target::State(Id::LeftA))
        .entry(&[enter_left])
        .exit(&[exit_left])
        .handlers(&[Handler::on(Ev::Swap).to(Target::State(Id::Right))]),
    Node::new(Id::LeftA, "LEFT_A", Some(Id::Left))
        .entry(&[enter_left_a])
        .exit(&[exit_left_a])
        .handlers(&[Handler::on(Ev::Next).to(Target::State(Id::LeftB))]),
    Node::new(Id::LeftB, "LEFT_B", Some(Id::Left))
        .entry(&[enter_left_b])
        .exit(&[exit_left_b]),
    Node::new(Id::Right, "RIGHT", Some(Id::Shelf))
        .initial(Target::State(Id::RightA))
        .entry(&[enter_right])
        .exit(&[exit_right])
        .handlers(&[Handler::on(Ev::Swap).to(Target::State(Id::Left))]),
    Node::new(Id::RightA, "RIGHT_A", Some(Id::Right))
        .entry(&[enter_right_a])
        .exit(&[exit_right_a])
        .handlers(&[Handler::on(Ev::Next).to(Target::State(Id::RightB))]),
    Node::new(Id::RightB, "RIGHT_B", Some(Id::Right))
        .entry(&[enter_right_b])
        .exit(&[exit_right_b]),
    Node::new(Id::Vault, "VAULT", Some(Id::Root))
        .initial(Target::History(VAULT_HISTORY))
        .entry(&[enter_vault])
        .exit(&[exit_vault])
        .handlers(&[
            Handler::on(Ev::Leave).to(Target::State(Id::Idle)),
            Handler::on(Ev::Home).to(Target::History(VAULT_HISTORY)),
        ]),
    Node::new(Id::Upper, "UPPER", Some(Id::Vault))
        .initial(Target::State(Id::UpperA))
        .entry(&[enter_upper])
        .exit(&[exit_upper]),
    Node::new(Id::UpperA, "UPPER_A", Some(Id::Upper))
        .entry(&[enter_upper_a])
        .exit(&[exit_upper_a])
        .handlers(&[Handler::on(Ev::Next).to(Target::State(Id::UpperB))]),
    Node::new(Id::UpperB, "UPPER_B", Some(Id::Upper))
        .entry(&[enter_upper_b])
        .exit(&[exit_upper_b]),
    Node::new(Id::Lower, "LOWER", Some(Id::Vault))
        .entry(&[enter_lower])
        .exit(&[exit_lower])
        .handlers(&[Handler::on(Ev::Next).to(Target::State(Id::Upper))]),
];

const HISTORIES: &[HistoryPoint<Id>] = &[
    HistoryPoint::shallow(Id::Shelf, Target::State(Id::Left)),
    HistoryPoint::deep(Id::Vault, Target::Choice(VAULT_DEFAULT)),
];

const CHOICES: &[ChoicePoint<Id, Vars>] = &[ChoicePoint::new(
    &[Branch::new(counted, Target::State(Id::Upper))],
    Target::State(Id::Lower),
)];

static ARCHIVE: MachineDefinition<Id, Ev, Vars> =
    MachineDefinition::new(STATES, HISTORIES, CHOICES);

fn started(count: u32) -> Machine<Id, Ev, Vars> {
    let vars = Vars {
        count,
        ..Vars::default()
    };
    let mut machine = Machine::new(&ARCHIVE, vars).expect("valid definition");
    machine.start().expect("first start");
    machine
}

fn run(machine: &mut Machine<Id, Ev, Vars>, events: &[Ev]) {
    for event in events {
        assert_eq!(
            machine.dispatch(*event),
            Ok(DispatchResult::Transitioned),
            "{event:?} should transition from {:?}",
            machine.state()
        );
    }
    machine.vars_mut().take_log();
}

#[test]
fn first_entry_through_shallow_history_uses_default() {
    let mut machine = started(0);
    assert_eq!(machine.state(), Some(Id::Idle));

    machine.dispatch(Ev::ToShelf).expect("started");
    assert_eq!(machine.state(), Some(Id::LeftA));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["enter SHELF", "enter LEFT", "enter LEFT_A"]
    );
}

#[test]
fn shallow_history_restores_child_and_reruns_its_initial() {
    let mut machine = started(0);
    run(&mut machine, &[Ev::ToShelf, Ev::Swap, Ev::Next]);
    assert_eq!(machine.state(), Some(Id::RightB));

    machine.dispatch(Ev::Leave).expect("started");
    assert_eq!(machine.recorded_history(SHELF_HISTORY), Some(Id::Right));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["exit RIGHT_B", "exit RIGHT", "exit SHELF"]
    );

    machine.dispatch(Ev::ToShelf).expect("started");
    assert_eq!(machine.state(), Some(Id::RightA));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["enter SHELF", "enter RIGHT", "enter RIGHT_A"]
    );
}

#[test]
fn deep_history_restores_exact_leaf() {
    let mut machine = started(1);
    run(&mut machine, &[Ev::ToVault, Ev::Next, Ev::Leave]);
    assert_eq!(machine.recorded_history(VAULT_HISTORY), Some(Id::UpperB));

    machine.dispatch(Ev::ToVault).expect("started");
    assert_eq!(machine.state(), Some(Id::UpperB));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["enter VAULT", "enter UPPER", "enter UPPER_B"]
    );
}

#[test]
fn history_default_can_be_a_choice() {
    let mut machine = started(0);
    machine.dispatch(Ev::ToVault).expect("started");
    assert_eq!(machine.state(), Some(Id::Lower));

    let mut machine = started(0);
    assert_eq!(machine.dispatch(Ev::Bump), Ok(DispatchResult::Handled));
    machine.dispatch(Ev::ToVault).expect("started");
    assert_eq!(machine.state(), Some(Id::UpperA));
}

#[test]
fn recorded_value_wins_over_default_choice() {
    let mut machine = started(0);
    run(&mut machine, &[Ev::ToVault, Ev::Leave]);
    assert_eq!(machine.recorded_history(VAULT_HISTORY), Some(Id::Lower));

    machine.dispatch(Ev::Bump).expect("started");
    machine.dispatch(Ev::ToVault).expect("started");
    assert_eq!(machine.state(), Some(Id::Lower));
}

#[test]
fn history_of_the_active_owner_returns_to_the_current_leaf() {
    let mut machine = started(1);
    run(&mut machine, &[Ev::ToVault, Ev::Next]);
    assert_eq!(machine.state(), Some(Id::UpperB));

    assert_eq!(machine.dispatch(Ev::Home), Ok(DispatchResult::Transitioned));
    assert_eq!(machine.state(), Some(Id::UpperB));
    assert_eq!(
        machine.vars_mut().take_log(),
        ["exit UPPER_B", "exit UPPER", "enter UPPER", "enter UPPER_B"]
    );
}

#[test]
fn history_points_are_independent() {
    let mut machine = started(1);
    run(
        &mut machine,
        &[Ev::ToShelf, Ev::Swap, Ev::Leave, Ev::ToVault, Ev::Next, Ev::Leave],
    );
    assert_eq!(machine.recorded_history(SHELF_HISTORY), Some(Id::Right));
    assert_eq!(machine.recorded_history(VAULT_HISTORY), Some(Id::UpperB));

    machine.dispatch(Ev::ToShelf).expect("started");
    assert_eq!(machine.state(), Some(Id::RightA));
}

#[test]
fn machines_from_one_definition_do_not_share_history() {
    let mut first = started(1);
    run(&mut first, &[Ev::ToVault, Ev::Next, Ev::Leave]);

    let second = started(1);
    assert_eq!(first.recorded_history(VAULT_HISTORY), Some(Id::UpperB));
    assert_eq!(second.recorded_history(VAULT_HISTORY), None);
}

mod pseudostates_leaving_their_owner {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Cell {
        Root,
        Room,
        Desk,
        Hall,
        Closet,
        Shelf,
    }

    impl StateIdentity for Cell {
        fn index(self) -> usize {
            self as usize
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Move {
        Do,
        Back,
        Open,
    }

    impl EventIdentity for Move {
        const DO: Self = Move::Do;
    }

    fn never(_: &u32) -> bool {
        false
    }

    const ROOM_HISTORY: HistoryId = HistoryId(0);

    const CELLS: &[StateNode<Cell, Move, u32>] = &[
        StateNode::new(Cell::Root, "ROOT", None).initial(Target::State(Cell::Hall)),
        StateNode::new(Cell::Room, "ROOM", Some(Cell::Root)).initial(Target::State(Cell::Desk)),
        StateNode::new(Cell::Desk, "DESK", Some(Cell::Room)),
        StateNode::new(Cell::Hall, "HALL", Some(Cell::Root)).handlers(&[
            Handler::on(Move::Back).to(Target::History(ROOM_HISTORY)),
            Handler::on(Move::Open).to(Target::State(Cell::Closet)),
        ]),
        StateNode::new(Cell::Closet, "CLOSET", Some(Cell::Root))
            .initial(Target::Choice(ChoiceId(1))),
        StateNode::new(Cell::Shelf, "SHELF", Some(Cell::Closet)),
    ];

    const ROOM_HISTORIES: &[HistoryPoint<Cell>] =
        &[HistoryPoint::deep(Cell::Room, Target::Choice(ChoiceId(0)))];

    // both defaults land on HALL, outside the state that owns the pseudostate
    const ROOM_CHOICES: &[ChoicePoint<Cell, u32>] = &[
        ChoicePoint::new(
            &[Branch::new(never, Target::State(Cell::Desk))],
            Target::State(Cell::Hall),
        ),
        ChoicePoint::new(
            &[Branch::new(never, Target::State(Cell::Shelf))],
            Target::State(Cell::Hall),
        ),
    ];

    static HOUSE: MachineDefinition<Cell, Move, u32> =
        MachineDefinition::new(CELLS, ROOM_HISTORIES, ROOM_CHOICES);

    fn in_hall() -> Machine<Cell, Move, u32> {
        let mut machine = Machine::new(&HOUSE, 0).expect("tables pass validation");
        machine.start().expect("first start");
        assert_eq!(machine.state(), Some(Cell::Hall));
        machine
    }

    #[test]
    #[should_panic(expected = "history resolves outside its owner")]
    fn history_default_choice_escaping_owner_fails_fast() {
        let mut machine = in_hall();
        let _ = machine.dispatch(Move::Back);
    }

    #[test]
    #[should_panic(expected = "initial transition resolves outside its state")]
    fn initial_choice_escaping_composite_fails_fast() {
        let mut machine = in_hall();
        let _ = machine.dispatch(Move::Open);
    }
}
