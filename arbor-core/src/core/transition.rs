use super::definition::MachineDefinition;
use super::history::{HistoryId, HistoryStore};
use super::tree::StateTree;
use super::{ActionFn, Target, debug, trace};
use crate::{EventIdentity, MAX_RESOLUTION_STEPS, StateIdentity};

/// Runs transitions against the mutable parts of one machine.
///
/// Built per transition from split borrows of the machine so the static
/// definition, the history slots and the user variables can be used together.
pub(crate) struct TransitionExecutor<'m, S: StateIdentity, E: EventIdentity, V: 'static> {
    definition: &'static MachineDefinition<S, E, V>,
    history: &'m mut HistoryStore<S>,
    vars: &'m mut V,
}

impl<'m, S: StateIdentity, E: EventIdentity, V: 'static> TransitionExecutor<'m, S, E, V> {
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

    fn tree(&self) -> &'static StateTree<S, E, V> {
        self.definition.tree()
    }

    /// Enters the root and follows initial transitions down to a leaf.
    pub(crate) fn start(&mut self) -> S {
        let root = self.tree().root();
        self.enter(root);
        self.descend(root)
    }

    /// Runs the transition declared on `source` while `leaf` is active and
    /// returns the new leaf.
    ///
    /// Order: resolve the target, exit up to the transition scope (writing
    /// history on the way), run the transition action, enter down to the
    /// target, then follow initial transitions.
    pub(crate) fn execute(
        &mut self,
        leaf: S,
        source: S,
        target: Target<S>,
        action: Option<ActionFn<V>>,
    ) -> S {
        let resolved = self.resolve(target, Some(leaf));
        let scope = self.scope(source, resolved);
        debug!(
            "[TRANSITION] {} -> {} (scope {})",
            self.tree().state_name(source),
            self.tree().state_name(resolved),
            self.tree().state_name(scope)
        );

        self.exit_up_to(leaf, scope);
        if let Some(action) = action {
            action(self.vars);
        }
        for state in self.tree().path_below(scope, resolved) {
            self.enter(state);
        }
        self.descend(resolved)
    }

    /// Follows choice and history pseudostates until a state is reached.
    ///
    /// `active_leaf` is the leaf still active while resolving. A history point
    /// whose owner contains it records the live configuration first, so a
    /// transition into the history of an active state returns to where the
    /// machine is now.
    ///
    /// The reached state must lie strictly inside the owner of every history
    /// point passed on the way.
    pub(crate) fn resolve(&mut self, target: Target<S>, active_leaf: Option<S>) -> S {
        let mut target = target;
        let mut owner: Option<S> = None;
        for _ in 0..MAX_RESOLUTION_STEPS {
            match target {
                Target::State(state) => {
                    if let Some(owner) = owner {
                        if !self.tree().is_strict_ancestor(owner, state) {
                            super::error::malformed("history resolves outside its owner");
                        }
                    }
                    return state;
                }
                Target::Choice(id) => {
                    target = self.definition.choice(id).resolve(self.vars);
                    trace!("[CHOICE] choice {} resolved to {:?}", id.0, target);
                }
                Target::History(id) => {
                    let point = self.definition.history(id);
                    owner = Some(self.innermost_owner(owner, point.owner));
                    if let Some(leaf) = active_leaf {
                        if self.tree().is_strict_ancestor(point.owner, leaf) {
                            self.history.record(id, point.value_for(self.tree(), leaf));
                        }
                    }
                    target = self.history.resolve(id, point);
                    trace!("[HISTORY] history {} resolved to {:?}", id.0, target);
                }
            }
        }
        super::error::malformed("pseudostate chain does not reach a state")
    }

    /// Deeper of two nested history owners. Owners on separate branches leave
    /// no state that could satisfy both.
    fn innermost_owner(&self, current: Option<S>, next: S) -> S {
        let tree = self.tree();
        match current {
            None => next,
            Some(current) if tree.is_ancestor(current, next) => next,
            Some(current) if tree.is_ancestor(next, current) => current,
            Some(_) => super::error::malformed("history resolves outside its owner"),
        }
    }

    /// A target on the source's own ancestor chain (the source included) is
    /// exited and re-entered; anything else is scoped by the common ancestor.
    fn scope(&self, source: S, target: S) -> S {
        let tree = self.tree();
        if tree.is_ancestor(target, source) {
            tree.parent_or_defect(target)
        } else {
            tree.least_common_ancestor(source, target)
        }
    }

    fn exit_up_to(&mut self, leaf: S, scope: S) {
        let mut state = leaf;
        while state != scope {
            self.record_histories(state, leaf);
            self.exit(state);
            state = self.tree().parent_or_defect(state);
        }
    }

    fn record_histories(&mut self, owner: S, leaf: S) {
        let tree = self.tree();
        for (index, point) in self.definition.histories().iter().enumerate() {
            if point.owner == owner {
                let value = point.value_for(tree, leaf);
                trace!(
                    "[HISTORY] {} records {}",
                    tree.state_name(owner),
                    tree.state_name(value)
                );
                self.history.record(HistoryId(index), value);
            }
        }
    }

    fn descend(&mut self, from: S) -> S {
        let tree = self.tree();
        let mut current = from;
        while let Some(initial) = tree.node(current).initial {
            let next = self.resolve(initial, None);
            if !tree.is_strict_ancestor(current, next) {
                super::error::malformed("initial transition resolves outside its state");
            }
            for state in tree.path_below(current, next) {
                self.enter(state);
            }
            current = next;
        }
        current
    }

    fn enter(&mut self, state: S) {
        let node = self.tree().node(state);
        trace!("[ENTER] {}", node.name);
        for action in node.entry {
            action(self.vars);
        }
    }

    fn exit(&mut self, state: S) {
        let node = self.tree().node(state);
        trace!("[EXIT] {}", node.name);
        for action in node.exit {
            action(self.vars);
        }
    }
}
