use heapless::Vec;

use super::{ActionFn, Handler, Target};
use crate::{EventIdentity, MAX_DEPTH, StateIdentity};

/// Static description of one state.
///
/// `initial` is present exactly when the state has children. A generator
/// emits these as a `const` slice ordered by identity index.
#[derive(Debug)]
pub struct StateNode<S: StateIdentity, E: EventIdentity, V: 'static> {
    pub id: S,
    pub name: &'static str,
    pub parent: Option<S>,
    pub initial: Option<Target<S>>,
    pub entry: &'static [ActionFn<V>],
    pub exit: &'static [ActionFn<V>],
    pub do_action: Option<ActionFn<V>>,
    pub handlers: &'static [Handler<S, E, V>],
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> StateNode<S, E, V> {
    pub const fn new(id: S, name: &'static str, parent: Option<S>) -> Self {
        Self {
            id,
            name,
            parent,
            initial: None,
            entry: &[],
            exit: &[],
            do_action: None,
            handlers: &[],
        }
    }

    #[must_use]
    pub const fn initial(mut self, target: Target<S>) -> Self {
        self.initial = Some(target);
        self
    }

    #[must_use]
    pub const fn entry(mut self, actions: &'static [ActionFn<V>]) -> Self {
        self.entry = actions;
        self
    }

    #[must_use]
    pub const fn exit(mut self, actions: &'static [ActionFn<V>]) -> Self {
        self.exit = actions;
        self
    }

    #[must_use]
    pub const fn do_action(mut self, action: ActionFn<V>) -> Self {
        self.do_action = Some(action);
        self
    }

    #[must_use]
    pub const fn handlers(mut self, handlers: &'static [Handler<S, E, V>]) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn is_composite(&self) -> bool {
        self.initial.is_some()
    }

    /// Handler entries declared for `event`, in declaration order.
    pub fn handlers_for(&self, event: E) -> impl Iterator<Item = &Handler<S, E, V>> {
        self.handlers.iter().filter(move |h| h.event == event)
    }
}

/// Read-only view over the state table with the hierarchy queries the
/// engine needs. All queries walk parent links; nothing is cached.
#[derive(Debug)]
pub struct StateTree<S: StateIdentity, E: EventIdentity, V: 'static> {
    nodes: &'static [StateNode<S, E, V>],
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> Clone for StateTree<S, E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> Copy for StateTree<S, E, V> {}

impl<S: StateIdentity, E: EventIdentity, V: 'static> StateTree<S, E, V> {
    pub const fn new(nodes: &'static [StateNode<S, E, V>]) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &'static [StateNode<S, E, V>] {
        self.nodes
    }

    /// Root of a validated tree.
    ///
    /// # Panics
    /// Panics if the table is empty.
    pub fn root(&self) -> S {
        match self.nodes.first() {
            Some(node) => node.id,
            None => super::error::malformed("state table is empty"),
        }
    }

    pub fn contains(&self, state: S) -> bool {
        self.nodes.get(state.index()).is_some_and(|n| n.id == state)
    }

    /// # Panics
    /// Panics if `state` is not part of the table.
    pub fn node(&self, state: S) -> &'static StateNode<S, E, V> {
        match self.nodes.get(state.index()) {
            Some(node) => node,
            None => super::error::malformed("state identity outside the state table"),
        }
    }

    pub fn parent(&self, state: S) -> Option<S> {
        self.node(state).parent
    }

    pub fn is_leaf(&self, state: S) -> bool {
        !self.node(state).is_composite()
    }

    pub fn state_name(&self, state: S) -> &'static str {
        self.nodes.get(state.index()).map_or("?", |n| n.name)
    }

    /// `state` first, then each parent up to and including the root.
    pub fn ancestors_of(&self, state: S) -> Ancestors<S, E, V> {
        Ancestors {
            tree: *self,
            next: Some(state),
        }
    }

    /// Number of edges between `state` and the root.
    pub fn depth(&self, state: S) -> usize {
        self.ancestors_of(state).count() - 1
    }

    /// True when `a` lies on `b`'s ancestor chain. A state is its own ancestor.
    pub fn is_ancestor(&self, a: S, b: S) -> bool {
        self.ancestors_of(b).any(|s| s == a)
    }

    pub fn is_strict_ancestor(&self, a: S, b: S) -> bool {
        a != b && self.is_ancestor(a, b)
    }

    /// Deepest state that is an ancestor of both `a` and `b`.
    pub fn least_common_ancestor(&self, a: S, b: S) -> S {
        let (mut a, mut b) = (a, b);
        let (mut depth_a, mut depth_b) = (self.depth(a), self.depth(b));
        while depth_a > depth_b {
            a = self.parent_or_defect(a);
            depth_a -= 1;
        }
        while depth_b > depth_a {
            b = self.parent_or_defect(b);
            depth_b -= 1;
        }
        while a != b {
            a = self.parent_or_defect(a);
            b = self.parent_or_defect(b);
        }
        a
    }

    /// The child of `ancestor` whose subtree contains `descendant`.
    pub fn child_toward(&self, ancestor: S, descendant: S) -> Option<S> {
        let mut child = None;
        for state in self.ancestors_of(descendant) {
            if state == ancestor {
                return child;
            }
            child = Some(state);
        }
        None
    }

    /// States strictly below `scope` down to `target`, outermost first.
    ///
    /// # Panics
    /// Panics if `scope` is not an ancestor of `target`.
    pub fn path_below(&self, scope: S, target: S) -> Vec<S, MAX_DEPTH> {
        let mut path: Vec<S, MAX_DEPTH> = Vec::new();
        for state in self.ancestors_of(target) {
            if state == scope {
                path.reverse();
                return path;
            }
            if path.push(state).is_err() {
                super::error::malformed("hierarchy deeper than MAX_DEPTH");
            }
        }
        super::error::malformed("transition scope is not an ancestor of its target")
    }

    pub(crate) fn parent_or_defect(&self, state: S) -> S {
        match self.parent(state) {
            Some(parent) => parent,
            None => super::error::malformed("walked above the root"),
        }
    }
}

/// Iterator returned by [`StateTree::ancestors_of`].
#[derive(Debug)]
pub struct Ancestors<S: StateIdentity, E: EventIdentity, V: 'static> {
    tree: StateTree<S, E, V>,
    next: Option<S>,
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> Iterator for Ancestors<S, E, V> {
    type Item = S;

    fn next(&mut self) -> Option<S> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
