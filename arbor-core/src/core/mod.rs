//! Runtime types and the execution engine.
//!
//! Static description: [`StateNode`], [`Handler`], [`HistoryPoint`],
//! [`ChoicePoint`] collected in a [`MachineDefinition`]. Runtime: [`Machine`].

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        tracing::trace!($($arg)*);
        #[cfg(all(feature = "debug-log", not(feature = "std")))]
        log::trace!($($arg)*);
        #[cfg(not(any(feature = "std", feature = "debug-log")))]
        if false {
            ::core::mem::drop(::core::format_args!($($arg)*));
        }
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "std")]
        tracing::debug!($($arg)*);
        #[cfg(all(feature = "debug-log", not(feature = "std")))]
        log::debug!($($arg)*);
        #[cfg(not(any(feature = "std", feature = "debug-log")))]
        if false {
            ::core::mem::drop(::core::format_args!($($arg)*));
        }
    }};
}

pub(crate) use debug;
pub(crate) use trace;

mod choice;
mod definition;
mod error;
mod history;
mod machine;
mod router;
mod transition;
mod tree;

#[cfg(test)]
pub(crate) mod fixtures;

pub use choice::{Branch, ChoiceId, ChoicePoint};
pub use definition::MachineDefinition;
pub use error::{DefinitionError, MachineError};
pub use history::{HistoryId, HistoryKind, HistoryPoint, HistoryStore};
pub use machine::{DispatchResult, Machine};
pub use tree::{Ancestors, StateNode, StateTree};

/// Entry, exit, do and transition actions.
pub type ActionFn<V> = fn(&mut V);

/// Handler and choice guards. Guards only read the variables.
pub type GuardFn<V> = fn(&V) -> bool;

/// Where a transition or initial transition points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<S> {
    State(S),
    History(HistoryId),
    Choice(ChoiceId),
}

/// One behaviour in a state's handler table.
///
/// A handler without a target is action-only: it consumes the event (unless
/// the event is `do`) but leaves the state unchanged.
#[derive(Debug)]
pub struct Handler<S, E, V> {
    pub event: E,
    pub guard: Option<GuardFn<V>>,
    pub action: Option<ActionFn<V>>,
    pub target: Option<Target<S>>,
}

impl<S: Copy, E, V> Handler<S, E, V> {
    pub const fn on(event: E) -> Self {
        Self {
            event,
            guard: None,
            action: None,
            target: None,
        }
    }

    #[must_use]
    pub const fn guard(mut self, guard: GuardFn<V>) -> Self {
        self.guard = Some(guard);
        self
    }

    #[must_use]
    pub const fn action(mut self, action: ActionFn<V>) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub const fn to(mut self, target: Target<S>) -> Self {
        self.target = Some(target);
        self
    }

    pub(crate) fn is_enabled(&self, vars: &V) -> bool {
        self.guard.is_none_or(|guard| guard(vars))
    }
}
