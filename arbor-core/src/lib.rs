// Copyright 2025 0xjcf
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! # arbor-core
//! Execution engine for hierarchical, history-aware statecharts.
//!
//! The engine does not parse diagrams. It runs machines described by static
//! tables (`StateNode`, `HistoryPoint`, `ChoicePoint`) that a generator emits as
//! `const` items, and exposes a small runtime API: construct, start, dispatch.
//!
//! ```rust
//! use arbor_core::core::{Handler, Machine, MachineDefinition, StateNode, Target};
//! use arbor_core::{EventIdentity, StateIdentity};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Id { Root, Off, On }
//!
//! impl StateIdentity for Id {
//!     fn index(self) -> usize { self as usize }
//! }
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Ev { Do, Toggle }
//!
//! impl EventIdentity for Ev {
//!     const DO: Self = Ev::Do;
//! }
//!
//! type Node = StateNode<Id, Ev, u32>;
//!
//! fn count(presses: &mut u32) { *presses += 1; }
//!
//! const STATES: &[Node] = &[
//!     Node::new(Id::Root, "ROOT", None).initial(Target::State(Id::Off)),
//!     Node::new(Id::Off, "OFF", Some(Id::Root))
//!         .handlers(&[Handler::on(Ev::Toggle).action(count).to(Target::State(Id::On))]),
//!     Node::new(Id::On, "ON", Some(Id::Root))
//!         .handlers(&[Handler::on(Ev::Toggle).to(Target::State(Id::Off))]),
//! ];
//!
//! static LIGHT: MachineDefinition<Id, Ev, u32> = MachineDefinition::new(STATES, &[], &[]);
//!
//! let mut light = Machine::new(&LIGHT, 0).expect("valid definition");
//! light.start().expect("first start");
//! light.dispatch(Ev::Toggle).expect("started");
//! assert_eq!(light.state(), Some(Id::On));
//! assert_eq!(*light.vars(), 1);
//! ```

pub mod core;
#[cfg(feature = "diagram")]
pub mod diagram;

pub use crate::core::{DefinitionError, DispatchResult, Machine, MachineError};

pub mod prelude {
    pub use crate::core::{
        ChoiceId, ChoicePoint, Branch, Handler, HistoryId, HistoryKind, HistoryPoint, Machine,
        MachineDefinition, StateNode, Target,
    };
    pub use crate::{EventIdentity, StateIdentity, StateMachine};
}

/// Deepest nesting (root included) a definition may use.
pub const MAX_DEPTH: usize = 16;

/// Number of history pseudostates a single definition may declare.
pub const MAX_HISTORY_POINTS: usize = 16;

/// Upper bound on choice/history hops while resolving one target.
pub const MAX_RESOLUTION_STEPS: usize = 32;

/// Identity of a state in a generated state enumeration.
///
/// Identities are dense and zero-based. Index 0 is the root, and numbering
/// follows a depth-first walk of the hierarchy, so a parent always has a lower
/// index than its children.
pub trait StateIdentity: Copy + Eq + ::core::fmt::Debug + 'static {
    fn index(self) -> usize;
}

/// Identity of an event. `DO` is the background poll event.
pub trait EventIdentity: Copy + Eq + ::core::fmt::Debug + 'static {
    const DO: Self;

    fn is_do(self) -> bool {
        self == Self::DO
    }
}

pub trait StateMachine {
    type State: Copy + Clone + PartialEq + ::core::fmt::Debug;
    type Event: Copy + Clone + PartialEq + ::core::fmt::Debug;
    type Vars;

    /// Runs one event to completion.
    ///
    /// # Errors
    /// Returns `MachineError::NotStarted` if the machine was never started.
    fn dispatch(&mut self, event: Self::Event) -> Result<DispatchResult, MachineError>;
    fn state(&self) -> Option<Self::State>;
    fn vars(&self) -> &Self::Vars;
    fn vars_mut(&mut self) -> &mut Self::Vars;
}
