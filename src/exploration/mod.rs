mod epsilon_greedy;

pub use epsilon_greedy::{probabilities, Epsilon, EpsilonGreedy, Policy};
