use super::{GuardFn, Target};

/// Index of a choice pseudostate in the definition's choice table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChoiceId(pub usize);

/// One guarded outgoing branch of a choice point.
#[derive(Debug)]
pub struct Branch<S, V> {
    pub guard: GuardFn<V>,
    pub target: Target<S>,
}

impl<S, V> Branch<S, V> {
    pub const fn new(guard: GuardFn<V>, target: Target<S>) -> Self {
        Self { guard, target }
    }
}

/// A runtime conditional branch. Branches are tried in declaration order and
/// the first passing guard wins; `default` is the mandatory else branch.
#[derive(Debug)]
pub struct ChoicePoint<S: 'static, V: 'static> {
    pub branches: &'static [Branch<S, V>],
    pub default: Target<S>,
}

impl<S: Copy + 'static, V: 'static> ChoicePoint<S, V> {
    pub const fn new(branches: &'static [Branch<S, V>], default: Target<S>) -> Self {
        Self { branches, default }
    }

    pub fn resolve(&self, vars: &V) -> Target<S> {
        self.branches
            .iter()
            .find(|branch| (branch.guard)(vars))
            .map_or(self.default, |branch| branch.target)
    }

    /// Every target this choice can produce, default last.
    pub fn targets(&self) -> impl Iterator<Item = Target<S>> + '_ {
        self.branches
            .iter()
            .map(|branch| branch.target)
            .chain(::core::iter::once(self.default))
    }
}
