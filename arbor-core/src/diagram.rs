//! Serializable view of a machine's static structure.
//!
//! Enabled by the `diagram` feature. The view borrows the definition and
//! serializes without allocating, so it also works in `no_std` builds.

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::core::{
    Branch, ChoicePoint, HistoryKind, HistoryPoint, MachineDefinition, StateNode, Target,
};
use crate::{EventIdentity, StateIdentity};

impl<S: StateIdentity, E: EventIdentity, V: 'static> MachineDefinition<S, E, V> {
    pub fn diagram(&self) -> Diagram<'_, S, E, V> {
        Diagram { definition: self }
    }
}

/// Returned by [`MachineDefinition::diagram`].
#[derive(Debug)]
pub struct Diagram<'a, S: StateIdentity, E: EventIdentity, V: 'static> {
    definition: &'a MachineDefinition<S, E, V>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
enum TargetView {
    State(usize),
    History(usize),
    Choice(usize),
}

impl<S: StateIdentity> From<Target<S>> for TargetView {
    fn from(target: Target<S>) -> Self {
        match target {
            Target::State(state) => Self::State(state.index()),
            Target::History(id) => Self::History(id.0),
            Target::Choice(id) => Self::Choice(id.0),
        }
    }
}

#[derive(Debug, Serialize)]
struct StateView {
    index: usize,
    name: &'static str,
    parent: Option<usize>,
    initial: Option<TargetView>,
    entry_actions: usize,
    exit_actions: usize,
    has_do: bool,
    handlers: usize,
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> From<&StateNode<S, E, V>> for StateView {
    fn from(node: &StateNode<S, E, V>) -> Self {
        Self {
            index: node.id.index(),
            name: node.name,
            parent: node.parent.map(StateIdentity::index),
            initial: node.initial.map(TargetView::from),
            entry_actions: node.entry.len(),
            exit_actions: node.exit.len(),
            has_do: node.do_action.is_some() || node.handlers.iter().any(|h| h.event.is_do()),
            handlers: node.handlers.len(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HistoryView {
    owner: usize,
    deep: bool,
    default: TargetView,
}

impl<S: StateIdentity> From<&HistoryPoint<S>> for HistoryView {
    fn from(point: &HistoryPoint<S>) -> Self {
        Self {
            owner: point.owner.index(),
            deep: point.kind == HistoryKind::Deep,
            default: point.default.into(),
        }
    }
}

struct BranchTargets<'a, S: 'static, V: 'static>(&'a [Branch<S, V>]);

impl<S: StateIdentity, V: 'static> Serialize for BranchTargets<'_, S, V> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.0.iter().map(|branch| TargetView::from(branch.target)))
    }
}

struct ChoiceView<'a, S: 'static, V: 'static>(&'a ChoicePoint<S, V>);

impl<S: StateIdentity, V: 'static> Serialize for ChoiceView<'_, S, V> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut out = serializer.serialize_struct("Choice", 2)?;
        out.serialize_field("branches", &BranchTargets(self.0.branches))?;
        out.serialize_field("default", &TargetView::from(self.0.default))?;
        out.end()
    }
}

struct Seq<I>(I);

impl<I> Serialize for Seq<I>
where
    I: Iterator + Clone,
    I::Item: Serialize,
{
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.0.clone())
    }
}

impl<S: StateIdentity, E: EventIdentity, V: 'static> Serialize for Diagram<'_, S, E, V> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let definition = self.definition;
        let mut out = serializer.serialize_struct("Diagram", 3)?;
        out.serialize_field(
            "states",
            &Seq(definition.tree().nodes().iter().map(StateView::from)),
        )?;
        out.serialize_field(
            "histories",
            &Seq(definition.histories().iter().map(HistoryView::from)),
        )?;
        out.serialize_field("choices", &Seq(definition.choices().iter().map(ChoiceView)))?;
        out.end()
    }
}
