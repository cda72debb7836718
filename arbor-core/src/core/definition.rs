use super::choice::{ChoiceId, ChoicePoint};
use super::error::DefinitionError;
use super::history::{HistoryId, HistoryPoint};
use super::tree::{StateNode, StateTree};
use super::Target;
use crate::{EventIdentity, MAX_DEPTH, MAX_HISTORY_POINTS, StateIdentity};

/// Immutable description of one machine: state table plus the history and
/// choice pseudostate tables the targets refer to.
///
/// Generated code declares one of these as a `static` and hands a reference
/// to every [`Machine`](super::Machine) built from it.
#[derive(Debug)]
pub struct MachineDefinition<S: StateIdentity, E: EventIdentity, V: 'static> {
    tree: StateTree<S, E, V>,
    histories: &'static [HistoryPoint<S>],
    choices: &'static [ChoicePoint<S, V>],
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> MachineDefinition<S, E, V> {
    pub const fn new(
        states: &'static [StateNode<S, E, V>],
        histories: &'static [HistoryPoint<S>],
        choices: &'static [ChoicePoint<S, V>],
    ) -> Self {
        Self {
            tree: StateTree::new(states),
            histories,
            choices,
        }
    }

    pub fn tree(&self) -> &StateTree<S, E, V> {
        &self.tree
    }

    pub fn histories(&self) -> &'static [HistoryPoint<S>] {
        self.histories
    }

    pub fn choices(&self) -> &'static [ChoicePoint<S, V>] {
        self.choices
    }

    /// Diagnostic name of a state. Returns `"?"` for identities outside the table.
    pub fn state_name(&self, state: S) -> &'static str {
        self.tree.state_name(state)
    }

    pub(crate) fn history(&self, id: HistoryId) -> &HistoryPoint<S> {
        match self.histories.get(id.0) {
            Some(point) => point,
            None => super::error::malformed("history id outside the history table"),
        }
    }

    pub(crate) fn choice(&self, id: ChoiceId) -> &ChoicePoint<S, V> {
        match self.choices.get(id.0) {
            Some(point) => point,
            None => super::error::malformed("choice id outside the choice table"),
        }
    }

    /// Checks the structural contract the engine relies on.
    ///
    /// # Errors
    /// Returns the first [`DefinitionError`] found. Checks run in table order:
    /// states, then history points, then choice points.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let nodes = self.tree.nodes();
        let Some(root) = nodes.first() else {
            return Err(DefinitionError::EmptyStateTable);
        };
        if root.parent.is_some() {
            return Err(DefinitionError::RootHasParent);
        }

        for (position, node) in nodes.iter().enumerate() {
            if node.id.index() != position {
                return Err(DefinitionError::IdentityMismatch {
                    position,
                    index: node.id.index(),
                });
            }
            if position == 0 {
                continue;
            }
            // depth-first numbering puts every parent before its children,
            // which also rules out cycles
            match node.parent {
                None => return Err(DefinitionError::SecondRoot { state: position }),
                Some(parent) if parent.index() >= position => {
                    return Err(DefinitionError::DanglingParent {
                        state: position,
                        parent: parent.index(),
                    });
                }
                Some(_) => {}
            }
        }

        for (position, node) in nodes.iter().enumerate() {
            if self.tree.depth(node.id) >= MAX_DEPTH {
                return Err(DefinitionError::TooDeep { state: position });
            }
            let has_children = nodes[position + 1..]
                .iter()
                .any(|child| child.parent == Some(node.id));
            match node.initial {
                None if has_children => {
                    return Err(DefinitionError::MissingInitial { state: position });
                }
                Some(_) if !has_children => {
                    return Err(DefinitionError::InitialOnLeaf { state: position });
                }
                Some(target) => {
                    self.check_target(target)?;
                    if let Target::State(initial) = target {
                        if !self.tree.is_strict_ancestor(node.id, initial) {
                            return Err(DefinitionError::InitialOutsideState { state: position });
                        }
                    }
                }
                None => {}
            }
            for handler in node.handlers {
                if let Some(target) = handler.target {
                    self.check_target(target)?;
                }
            }
        }

        if self.histories.len() > MAX_HISTORY_POINTS {
            return Err(DefinitionError::TooManyHistoryPoints {
                count: self.histories.len(),
            });
        }
        for (history, point) in self.histories.iter().enumerate() {
            self.check_state(point.owner)?;
            if self.tree.is_leaf(point.owner) {
                return Err(DefinitionError::HistoryOwnerNotComposite { history });
            }
            self.check_target(point.default)?;
            if let Target::State(default) = point.default {
                if !self.tree.is_strict_ancestor(point.owner, default) {
                    return Err(DefinitionError::HistoryDefaultOutsideOwner { history });
                }
            }
        }

        for choice in self.choices {
            for target in choice.targets() {
                self.check_target(target)?;
            }
        }
        Ok(())
    }

    fn check_state(&self, state: S) -> Result<(), DefinitionError> {
        if self.tree.contains(state) {
            Ok(())
        } else {
            Err(DefinitionError::UnknownState {
                index: state.index(),
            })
        }
    }

    fn check_target(&self, target: Target<S>) -> Result<(), DefinitionError> {
        match target {
            Target::State(state) => {
                self.check_state(state)?;
                if state == self.tree.root() {
                    return Err(DefinitionError::RootTargeted);
                }
                Ok(())
            }
            Target::History(id) if id.0 >= self.histories.len() => {
                Err(DefinitionError::UnknownHistory { index: id.0 })
            }
            Target::Choice(id) if id.0 >= self.choices.len() => {
                Err(DefinitionError::UnknownChoice { index: id.0 })
            }
            Target::History(_) | Target::Choice(_) => Ok(()),
        }
    }
}
