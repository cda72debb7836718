//! Integration and property tests for arbor
//!
//! This crate contains tests that need std features and heavier dependencies
//! (proptest, tracing-subscriber, serde_json) kept out of the `no_std` core.

#![cfg(test)]

pub mod integration;

/// Common test utilities and fixtures
pub mod common {
    use arbor_core::core::{
        Branch, ChoiceId, ChoicePoint, Handler, HistoryId, HistoryPoint, Machine,
        MachineDefinition, StateNode, Target,
    };
    use arbor_core::{EventIdentity, StateIdentity};

    /// Setup tracing for tests
    pub fn setup_tracing() {
        use tracing_subscriber::{EnvFilter, fmt};

        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Workbench states:
    ///
    /// ```text
    /// ROOT
    /// ├── A (deep history H0, default A1)
    /// │   ├── A1
    /// │   └── A2
    /// ├── B (initial choice: flag ? B1 : B2)
    /// │   ├── B1
    /// │   └── B2
    /// └── C
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TestState {
        Root,
        A,
        A1,
        A2,
        B,
        B1,
        B2,
        C,
    }

    impl TestState {
        pub const ALL: [TestState; 8] = [
            TestState::Root,
            TestState::A,
            TestState::A1,
            TestState::A2,
            TestState::B,
            TestState::B1,
            TestState::B2,
            TestState::C,
        ];
    }

    impl StateIdentity for TestState {
        fn index(self) -> usize {
            self as usize
        }
    }

    /// Common test events for statechart testing
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TestEvent {
        Do,
        X,
        Y,
        Z,
        Toggle,
        Park,
        Unused,
    }

    impl TestEvent {
        pub const ALL: [TestEvent; 7] = [
            TestEvent::Do,
            TestEvent::X,
            TestEvent::Y,
            TestEvent::Z,
            TestEvent::Toggle,
            TestEvent::Park,
            TestEvent::Unused,
        ];
    }

    impl EventIdentity for TestEvent {
        const DO: Self = TestEvent::Do;
    }

    #[derive(Debug, Default, Clone, PartialEq, Eq)]
    pub struct TestVars {
        pub log: Vec<&'static str>,
        pub flag: bool,
        pub ticks: u32,
    }

    impl TestVars {
        pub fn take_log(&mut self) -> Vec<&'static str> {
            std::mem::take(&mut self.log)
        }
    }

    /// Ticks spent in A2 before its do handler moves on to B.
    pub const A2_PATIENCE: u32 = 3;

    macro_rules! logger {
        ($($name:ident => $text:literal),* $(,)?) => {
            $(fn $name(v: &mut TestVars) {
                v.log.push($text);
            })*
        };
    }

    logger! {
        enter_root => "enter ROOT",
        enter_a => "enter A",
        exit_a => "exit A",
        enter_a1 => "enter A1",
        exit_a1 => "exit A1",
        enter_a2 => "enter A2",
        exit_a2 => "exit A2",
        enter_b => "enter B",
        exit_b => "exit B",
        enter_b1 => "enter B1",
        exit_b1 => "exit B1",
        enter_b2 => "enter B2",
        exit_b2 => "exit B2",
        enter_c => "enter C",
        exit_c => "exit C",
    }

    fn toggle_flag(v: &mut TestVars) {
        v.flag = !v.flag;
    }

    fn tick(v: &mut TestVars) {
        v.ticks += 1;
    }

    fn reset_ticks(v: &mut TestVars) {
        v.ticks = 0;
    }

    fn patience_spent(v: &TestVars) -> bool {
        v.ticks >= A2_PATIENCE
    }

    fn flag_set(v: &TestVars) -> bool {
        v.flag
    }

    pub const A_HISTORY: HistoryId = HistoryId(0);
    const B_ENTRY: ChoiceId = ChoiceId(0);

    type Node = StateNode<TestState, TestEvent, TestVars>;

    const STATES: &[Node] = &[
        Node::new(TestState::Root, "ROOT", None)
            .initial(Target::State(TestState::A))
            .entry(&[enter_root])
            .handlers(&[Handler::on(TestEvent::Toggle).action(toggle_flag)]),
        Node::new(TestState::A, "A", Some(TestState::Root))
            .initial(Target::State(TestState::A1))
            .entry(&[enter_a])
            .exit(&[exit_a])
            .handlers(&[Handler::on(TestEvent::Y).to(Target::State(TestState::B))]),
        Node::new(TestState::A1, "A1", Some(TestState::A))
            .entry(&[enter_a1])
            .exit(&[exit_a1])
            .handlers(&[Handler::on(TestEvent::X).to(Target::State(TestState::A2))]),
        Node::new(TestState::A2, "A2", Some(TestState::A))
            .entry(&[enter_a2])
            .exit(&[exit_a2])
            .do_action(tick)
            .handlers(&[
                Handler::on(TestEvent::Do)
                    .guard(patience_spent)
                    .action(reset_ticks)
                    .to(Target::State(TestState::B)),
                Handler::on(TestEvent::X).to(Target::State(TestState::A1)),
            ]),
        Node::new(TestState::B, "B", Some(TestState::Root))
            .initial(Target::Choice(B_ENTRY))
            .entry(&[enter_b])
            .exit(&[exit_b])
            .handlers(&[
                Handler::on(TestEvent::Z).to(Target::History(A_HISTORY)),
                Handler::on(TestEvent::Park).to(Target::State(TestState::C)),
            ]),
        Node::new(TestState::B1, "B1", Some(TestState::B))
            .entry(&[enter_b1])
            .exit(&[exit_b1])
            .handlers(&[Handler::on(TestEvent::X).to(Target::State(TestState::B2))]),
        Node::new(TestState::B2, "B2", Some(TestState::B))
            .entry(&[enter_b2])
            .exit(&[exit_b2])
            .handlers(&[Handler::on(TestEvent::X).to(Target::State(TestState::B1))]),
        Node::new(TestState::C, "C", Some(TestState::Root))
            .entry(&[enter_c])
            .exit(&[exit_c])
            .handlers(&[
                Handler::on(TestEvent::Z).to(Target::State(TestState::A)),
                Handler::on(TestEvent::Y).to(Target::History(A_HISTORY)),
            ]),
    ];

    const HISTORIES: &[HistoryPoint<TestState>] = &[HistoryPoint::deep(
        TestState::A,
        Target::State(TestState::A1),
    )];

    const CHOICES: &[ChoicePoint<TestState, TestVars>] = &[ChoicePoint::new(
        &[Branch::new(flag_set, Target::State(TestState::B1))],
        Target::State(TestState::B2),
    )];

    pub static WORKBENCH: MachineDefinition<TestState, TestEvent, TestVars> =
        MachineDefinition::new(STATES, HISTORIES, CHOICES);

    pub type Workbench = Machine<TestState, TestEvent, TestVars>;

    /// A started workbench machine with an empty log.
    pub fn started_workbench() -> Workbench {
        let mut machine =
            Machine::new(&WORKBENCH, TestVars::default()).expect("workbench definition is valid");
        machine.start().expect("first start");
        machine.vars_mut().log.clear();
        machine
    }
}
