use super::definition::MachineDefinition;
use super::history::HistoryStore;
use super::machine::DispatchResult;
use super::transition::TransitionExecutor;
use super::trace;
use crate::{EventIdentity, StateIdentity};

/// Outcome of routing one event: what happened and the leaf afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Routed<S> {
    pub(crate) result: DispatchResult,
    pub(crate) leaf: S,
}

/// Delivers one event to the active state configuration.
///
/// Handler lookup goes through the immutable handler tables on every
/// dispatch, walking parent links outward from the current leaf.
pub(crate) struct EventRouter<'m, S: StateIdentity, E: EventIdentity, V: 'static> {
    definition: &'static MachineDefinition<S, E, V>,
    history: &'m mut HistoryStore<S>,
    vars: &'m mut V,
}

impl<'m, S: StateIdentity, E: EventIdentity, V: 'static> EventRouter<'m, S, E, V> {
    pub(crate) fn new(
        definition: &'static MachineDefinition<S, E, V>,
        history: &'m mut HistoryStore<S>,
        vars: &'m mut V,
    ) -> Self {
        Self {
            definition,
            history,
            vars,
        }
    }

    pub(crate) fn dispatch(&mut self, leaf: S, event: E) -> Routed<S> {
        trace!(
            "[EVENT] {:?} received in state {}",
            event,
            self.definition.state_name(leaf)
        );
        if event.is_do() {
            self.sweep_do(leaf)
        } else {
            self.bubble(leaf, event)
        }
    }

    /// Innermost state with an enabled handler consumes the event.
    fn bubble(&mut self, leaf: S, event: E) -> Routed<S> {
        let tree = self.definition.tree();
        for state in tree.ancestors_of(leaf) {
            let node = tree.node(state);
            let mut consumed = false;
            for handler in node.handlers_for(event) {
                if !handler.is_enabled(self.vars) {
                    trace!("[GUARD FAIL] {:?} blocked in {}", event, node.name);
                    continue;
                }
                trace!("[MATCH] {:?} handled by {}", event, node.name);
                if let Some(target) = handler.target {
                    let next = self.executor().execute(leaf, state, target, handler.action);
                    return Routed {
                        result: DispatchResult::Transitioned,
                        leaf: next,
                    };
                }
                if let Some(action) = handler.action {
                    action(self.vars);
                }
                consumed = true;
            }
            if consumed {
                return Routed {
                    result: DispatchResult::Handled,
                    leaf,
                };
            }
        }
        trace!(
            "[DROP] {:?} not handled from {}",
            event,
            self.definition.state_name(leaf)
        );
        Routed {
            result: DispatchResult::Unhandled,
            leaf,
        }
    }

    /// Every state from the leaf to the root runs its background behaviour.
    /// A transition ends the sweep: the remaining ancestors belong to the old
    /// configuration.
    fn sweep_do(&mut self, leaf: S) -> Routed<S> {
        let tree = self.definition.tree();
        let mut ran = false;
        for state in tree.ancestors_of(leaf) {
            let node = tree.node(state);
            if let Some(action) = node.do_action {
                action(self.vars);
                ran = true;
            }
            for handler in node.handlers_for(E::DO) {
                if !handler.is_enabled(self.vars) {
                    continue;
                }
                ran = true;
                if let Some(target) = handler.target {
                    trace!("[DO] {} transitions, sweep stops", node.name);
                    let next = self.executor().execute(leaf, state, target, handler.action);
                    return Routed {
                        result: DispatchResult::Transitioned,
                        leaf: next,
                    };
                }
                if let Some(action) = handler.action {
                    action(self.vars);
                }
            }
        }
        Routed {
            result: if ran {
                DispatchResult::Handled
            } else {
                DispatchResult::Unhandled
            },
            leaf,
        }
    }

    fn executor(&mut self) -> TransitionExecutor<'_, S, E, V> {
        TransitionExecutor::new(self.definition, self.history, self.vars)
    }
}
