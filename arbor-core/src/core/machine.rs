use super::definition::MachineDefinition;
use super::error::{DefinitionError, MachineError};
use super::history::{HistoryId, HistoryStore};
use super::router::EventRouter;
use super::transition::TransitionExecutor;
use super::{debug, trace};
use crate::{EventIdentity, StateIdentity, StateMachine};

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    /// A transition ran; the current leaf may have changed.
    Transitioned,
    /// Some behaviour ran but the state did not change.
    Handled,
    /// Nothing in the active configuration reacted to the event.
    Unhandled,
}

/// One running statechart: current leaf, history values and user variables.
///
/// Everything mutable about a machine lives here. Instances built from the
/// same definition are independent of each other.
#[derive(Debug)]
pub struct Machine<S: StateIdentity, E: EventIdentity, V: 'static> {
    definition: &'static MachineDefinition<S, E, V>,
    current: Option<S>,
    history: HistoryStore<S>,
    vars: V,
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> Machine<S, E, V> {
    /// Builds an unstarted machine. No actions run.
    ///
    /// # Errors
    /// Returns the first defect found in `definition`.
    pub fn new(
        definition: &'static MachineDefinition<S, E, V>,
        vars: V,
    ) -> Result<Self, DefinitionError> {
        definition.validate()?;
        Ok(Self {
            definition,
            current: None,
            history: HistoryStore::new(definition.histories().len()),
            vars,
        })
    }

    /// Runs the initial entry chain from the root to the first leaf.
    ///
    /// # Errors
    /// Returns `MachineError::AlreadyStarted` on a second call.
    pub fn start(&mut self) -> Result<(), MachineError> {
        if self.current.is_some() {
            return Err(MachineError::AlreadyStarted);
        }
        let leaf = TransitionExecutor::new(self.definition, &mut self.history, &mut self.vars)
            .start();
        debug!("[START] initial leaf {}", self.definition.state_name(leaf));
        self.current = Some(leaf);
        Ok(())
    }

    /// Runs one event to completion.
    ///
    /// # Errors
    /// Returns `MachineError::NotStarted` before [`start`](Self::start).
    pub fn dispatch(&mut self, event: E) -> Result<DispatchResult, MachineError> {
        let leaf = self.current.ok_or(MachineError::NotStarted)?;
        let routed =
            EventRouter::new(self.definition, &mut self.history, &mut self.vars).dispatch(leaf, event);
        if routed.leaf != leaf {
            trace!(
                "[STATE] {} -> {}",
                self.definition.state_name(leaf),
                self.definition.state_name(routed.leaf)
            );
        }
        self.current = Some(routed.leaf);
        Ok(routed.result)
    }

    /// Current leaf, `None` until started.
    pub fn state(&self) -> Option<S> {
        self.current
    }

    /// True when `state` is the current leaf or one of its ancestors.
    pub fn is_in(&self, state: S) -> bool {
        self.current
            .is_some_and(|leaf| self.definition.tree().is_ancestor(state, leaf))
    }

    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    pub fn vars(&self) -> &V {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut V {
        &mut self.vars
    }

    pub fn into_vars(self) -> V {
        self.vars
    }

    /// What history point `id` currently remembers.
    pub fn recorded_history(&self, id: HistoryId) -> Option<S> {
        self.history.recorded(id)
    }

    pub fn definition(&self) -> &'static MachineDefinition<S, E, V> {
        self.definition
    }

    pub fn state_name(&self, state: S) -> &'static str {
        self.definition.state_name(state)
    }
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> StateMachine for Machine<S, E, V> {
    type State = S;
    type Event = E;
    type Vars = V;

    fn dispatch(&mut self, event: E) -> Result<DispatchResult, MachineError> {
        Machine::dispatch(self, event)
    }

    fn state(&self) -> Option<S> {
        Machine::state(self)
    }

    fn vars(&self) -> &V {
        Machine::vars(self)
    }

    fn vars_mut(&mut self) -> &mut V {
        Machine::vars_mut(self)
    }
}
