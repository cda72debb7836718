//! A desk lamp statechart.
//!
//! ```text
//! ROOT                      drain / charge: battery flag, no transition
//! ├── OFF                   power -> ON
//! └── ON (deep history)     power -> OFF, do: counts ticks, auto-off
//!     ├── DIM               plus -> BRIGHT
//!     └── BRIGHT            minus -> DIM
//!         ├── WARM          tint -> COOL
//!         └── COOL          tint -> WARM
//! ```
//!
//! `ON` is entered through its history. The first time (nothing recorded)
//! the default is a choice point: `DIM` when the battery is low, `BRIGHT`
//! otherwise.

use ::core::fmt;
use ::core::str::FromStr;

use crate::core::{
    Branch, ChoiceId, ChoicePoint, Handler, HistoryId, HistoryPoint, Machine, MachineDefinition,
    StateNode, Target,
};
use crate::{DefinitionError, EventIdentity, StateIdentity};

/// Number of `do` ticks `ON` stays lit before switching itself off.
pub const AUTO_OFF_TICKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LampState {
    Root,
    Off,
    On,
    Dim,
    Bright,
    Warm,
    Cool,
}

impl StateIdentity for LampState {
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LampEvent {
    Do,
    Power,
    Plus,
    Minus,
    Tint,
    Drain,
    Charge,
}

impl LampEvent {
    pub const ALL: [LampEvent; 7] = [
        LampEvent::Do,
        LampEvent::Power,
        LampEvent::Plus,
        LampEvent::Minus,
        LampEvent::Tint,
        LampEvent::Drain,
        LampEvent::Charge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LampEvent::Do => "do",
            LampEvent::Power => "power",
            LampEvent::Plus => "plus",
            LampEvent::Minus => "minus",
            LampEvent::Tint => "tint",
            LampEvent::Drain => "drain",
            LampEvent::Charge => "charge",
        }
    }
}

impl EventIdentity for LampEvent {
    const DO: Self = LampEvent::Do;
}

impl fmt::Display for LampEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown lamp event (expected one of: do, power, plus, minus, tint, drain, charge)")]
pub struct UnknownEvent;

impl FromStr for LampEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LampEvent::ALL
            .into_iter()
            .find(|event| event.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(UnknownEvent)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LampVars {
    pub battery_low: bool,
    pub on_ticks: u32,
    pub power_cycles: u32,
    pub auto_offs: u32,
}

fn switched_on(v: &mut LampVars) {
    v.on_ticks = 0;
    v.power_cycles += 1;
}

fn tick(v: &mut LampVars) {
    v.on_ticks += 1;
}

fn timer_expired(v: &LampVars) -> bool {
    v.on_ticks >= AUTO_OFF_TICKS
}

fn count_auto_off(v: &mut LampVars) {
    v.auto_offs += 1;
}

fn drain(v: &mut LampVars) {
    v.battery_low = true;
}

fn charge(v: &mut LampVars) {
    v.battery_low = false;
}

fn battery_low(v: &LampVars) -> bool {
    v.battery_low
}

pub const ON_HISTORY: HistoryId = HistoryId(0);
const FIRST_BRIGHTNESS: ChoiceId = ChoiceId(0);

type Node = StateNode<LampState, LampEvent, LampVars>;

const STATES: &[Node] = &[
    Node::new(LampState::Root, "ROOT", None)
        .initial(Target::State(LampState::Off))
        .handlers(&[
            Handler::on(LampEvent::Drain).action(drain),
            Handler::on(LampEvent::Charge).action(charge),
        ]),
    Node::new(LampState::Off, "OFF", Some(LampState::Root))
        .handlers(&[Handler::on(LampEvent::Power).to(Target::State(LampState::On))]),
    Node::new(LampState::On, "ON", Some(LampState::Root))
        .initial(Target::History(ON_HISTORY))
        .entry(&[switched_on])
        .do_action(tick)
        .handlers(&[
            Handler::on(LampEvent::Power).to(Target::State(LampState::Off)),
            Handler::on(LampEvent::Do)
                .guard(timer_expired)
                .action(count_auto_off)
                .to(Target::State(LampState::Off)),
        ]),
    Node::new(LampState::Dim, "DIM", Some(LampState::On))
        .handlers(&[Handler::on(LampEvent::Plus).to(Target::State(LampState::Bright))]),
    Node::new(LampState::Bright, "BRIGHT", Some(LampState::On))
        .initial(Target::State(LampState::Warm))
        .handlers(&[Handler::on(LampEvent::Minus).to(Target::State(LampState::Dim))]),
    Node::new(LampState::Warm, "WARM", Some(LampState::Bright))
        .handlers(&[Handler::on(LampEvent::Tint).to(Target::State(LampState::Cool))]),
    Node::new(LampState::Cool, "COOL", Some(LampState::Bright))
        .handlers(&[Handler::on(LampEvent::Tint).to(Target::State(LampState::Warm))]),
];

const HISTORIES: &[HistoryPoint<LampState>] = &[HistoryPoint::deep(
    LampState::On,
    Target::Choice(FIRST_BRIGHTNESS),
)];

const CHOICES: &[ChoicePoint<LampState, LampVars>] = &[ChoicePoint::new(
    &[Branch::new(battery_low, Target::State(LampState::Dim))],
    Target::State(LampState::Bright),
)];

pub static LAMP: MachineDefinition<LampState, LampEvent, LampVars> =
    MachineDefinition::new(STATES, HISTORIES, CHOICES);

pub type Lamp = Machine<LampState, LampEvent, LampVars>;

/// Builds an unstarted lamp.
///
/// # Errors
/// Only if the static tables above are inconsistent.
pub fn lamp(vars: LampVars) -> Result<Lamp, DefinitionError> {
    Machine::new(&LAMP, vars)
}
