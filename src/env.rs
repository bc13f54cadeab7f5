/// A discrete-time environment with a finite action space of `n` actions indexed `0..n`
///
/// The agent never simulates an environment itself; implementations are supplied by the caller
/// and driven through [`TabularAgent::go`](crate::algo::tabular::expected_sarsa::TabularAgent::go).
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Returns** `(next_state, reward, done)`
    fn step(&mut self, action: usize) -> (Self::State, f64, bool);
}

/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp<S> {
    /// The state of the environment before taking the action
    pub state: S,
    /// The action taken in the given state
    pub action: usize,
    /// The reward received after taking the action
    pub reward: f64,
    /// The state of the environment after the action is taken
    pub next_state: S,
    /// Whether `next_state` is terminal
    pub done: bool,
}
