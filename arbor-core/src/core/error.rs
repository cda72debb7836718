use thiserror::Error;

/// Defects in a static machine description, found by
/// [`MachineDefinition::validate`](super::MachineDefinition::validate).
///
/// Indices refer to positions in the state, history or choice tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("state table is empty")]
    EmptyStateTable,
    #[error("state at position {position} reports identity index {index}")]
    IdentityMismatch { position: usize, index: usize },
    #[error("root state must not have a parent")]
    RootHasParent,
    #[error("state {state} has no parent but is not the root")]
    SecondRoot { state: usize },
    #[error("state {state} names parent {parent}, which does not precede it")]
    DanglingParent { state: usize, parent: usize },
    #[error("composite state {state} has no initial transition")]
    MissingInitial { state: usize },
    #[error("leaf state {state} declares an initial transition")]
    InitialOnLeaf { state: usize },
    #[error("initial transition of state {state} leaves the state")]
    InitialOutsideState { state: usize },
    #[error("state {state} is nested deeper than MAX_DEPTH")]
    TooDeep { state: usize },
    #[error("a target refers to unknown state index {index}")]
    UnknownState { index: usize },
    #[error("a target refers to unknown history point {index}")]
    UnknownHistory { index: usize },
    #[error("a target refers to unknown choice point {index}")]
    UnknownChoice { index: usize },
    #[error("the root state cannot be a transition target")]
    RootTargeted,
    #[error("{count} history points exceed MAX_HISTORY_POINTS")]
    TooManyHistoryPoints { count: usize },
    #[error("history point {history} is owned by a leaf state")]
    HistoryOwnerNotComposite { history: usize },
    #[error("default of history point {history} lies outside its owner")]
    HistoryDefaultOutsideOwner { history: usize },
}

/// Lifecycle misuse of a [`Machine`](super::Machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("machine was already started")]
    AlreadyStarted,
    #[error("machine has not been started")]
    NotStarted,
}

/// Aborts on a defect that validation cannot see ahead of time, such as a
/// choice resolving outside the state being entered.
#[cold]
#[track_caller]
pub(crate) fn malformed(defect: &str) -> ! {
    panic!("malformed machine definition: {defect}")
}
