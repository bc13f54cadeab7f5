use std::fmt::Debug;

use log::{debug, trace};
use rand::Rng;

use crate::{
    decay::{self, Decay},
    env::{Environment, Exp},
    error::{Error, Result},
    exploration::{probabilities, Epsilon, EpsilonGreedy, Policy},
    util::ensure_interval,
};

use super::{value_table::ValueTable, Hashable};

/// The bootstrap term used when updating a state-action value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateRule {
    /// Value of a next action sampled from the bootstrap policy
    Sarsa,
    /// Maximum value of the next state
    SarsaMax,
    /// Expected value of the next state under the bootstrap policy
    #[default]
    ExpectedSarsa,
}

/// Configuration for the [`TabularAgent`]
#[derive(Debug, Clone)]
pub struct TabularAgentConfig<D> {
    /// Number of discrete actions, must be positive
    ///
    /// **Default**: `6`
    pub n_actions: usize,
    /// Learning rate, must be in `(0,1]`
    ///
    /// **Default**: `0.3`
    pub alpha: f64,
    /// Discount factor, must be in `[0,1]`
    ///
    /// **Default**: `1.0`
    pub gamma: f64,
    /// **Default**: [`UpdateRule::ExpectedSarsa`]
    pub update_rule: UpdateRule,
    /// Fixed exploration rate of the policy bootstrapped from, independent of the episode
    ///
    /// **Default**: `0.001`
    pub bootstrap_epsilon: f64,
    /// Whether transitions into a terminal state bootstrap from it like any other state.
    /// When `false`, the bootstrap term of a terminal transition is zero.
    ///
    /// **Default**: `true`
    pub terminal_bootstrap: bool,
    /// Episode-indexed exploration rate used by [`TabularAgent::go`]
    ///
    /// **Default**: [`decay::Reciprocal`], i.e. `1 / episode`
    pub epsilon_schedule: D,
    /// Step limit for a single episode of [`TabularAgent::go`]
    ///
    /// **Default**: `None`
    pub max_episode_steps: Option<u32>,
}

impl Default for TabularAgentConfig<decay::Reciprocal> {
    fn default() -> Self {
        Self {
            n_actions: 6,
            alpha: 0.3,
            gamma: 1.0,
            update_rule: UpdateRule::ExpectedSarsa,
            bootstrap_epsilon: 0.001,
            terminal_bootstrap: true,
            epsilon_schedule: decay::Reciprocal,
            max_episode_steps: None,
        }
    }
}

/// Summary of one episode run by [`TabularAgent::go`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EpisodeReport {
    pub steps: u32,
    pub total_reward: f64,
    /// Whether the episode reached a terminal state before the step limit
    pub done: bool,
}

/// A tabular agent with an epsilon-greedy behavior policy and a bootstrapped TD update
///
/// Values are updated with
///
/// Q(s,a) ← Q(s,a) + α(R + γB(s') - Q(s,a))
///
/// where the bootstrap term B is chosen by the [`UpdateRule`]. For the default expected SARSA rule,
/// B(s') is the expectation of Q(s',·) under an epsilon-greedy policy with a small fixed epsilon.
///
/// ### Generics
/// - `S` - The state type, used as a key in the value table
/// - `R` - The random source used to sample actions
/// - `D` - The schedule deriving epsilon from an episode index
pub struct TabularAgent<S, R, D = decay::Reciprocal>
where
    S: Hashable,
    R: Rng,
    D: Decay,
{
    q_table: ValueTable<S>,
    exploration: EpsilonGreedy<D>,
    rng: R,
    alpha: f64,
    gamma: f64,
    update_rule: UpdateRule,
    bootstrap_epsilon: f64,
    terminal_bootstrap: bool,
    max_episode_steps: Option<u32>,
}

impl<S, R, D> TabularAgent<S, R, D>
where
    S: Hashable + Debug,
    R: Rng,
    D: Decay,
{
    /// Initialize a new agent with an empty value table
    ///
    /// Fails with [`Error::InvalidArgument`] if any configuration value is out of range.
    pub fn new(config: TabularAgentConfig<D>, rng: R) -> Result<Self> {
        if config.n_actions == 0 {
            return Err(Error::InvalidArgument(String::from(
                "`n_actions` must be positive",
            )));
        }
        if config.alpha <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "Invalid value for `alpha`: {}. Must be in the interval (0, 1].",
                config.alpha
            )));
        }
        ensure_interval!(config.alpha, 0.0, 1.0);
        ensure_interval!(config.gamma, 0.0, 1.0);
        ensure_interval!(config.bootstrap_epsilon, 0.0, 1.0);

        debug!(
            "tabular agent: {} actions, alpha {}, gamma {}, {:?} with bootstrap epsilon {}",
            config.n_actions,
            config.alpha,
            config.gamma,
            config.update_rule,
            config.bootstrap_epsilon
        );

        Ok(Self {
            q_table: ValueTable::new(config.n_actions),
            exploration: EpsilonGreedy::new(config.epsilon_schedule),
            rng,
            alpha: config.alpha,
            gamma: config.gamma,
            update_rule: config.update_rule,
            bootstrap_epsilon: config.bootstrap_epsilon,
            terminal_bootstrap: config.terminal_bootstrap,
            max_episode_steps: config.max_episode_steps,
        })
    }

    pub fn q_table(&self) -> &ValueTable<S> {
        &self.q_table
    }

    pub fn n_actions(&self) -> usize {
        self.q_table.n_actions()
    }

    /// The first action with the highest value in `state`
    pub fn greedy_action(&self, state: &S) -> usize {
        self.q_table.greedy_action(state)
    }

    /// Compute the epsilon greedy distribution over actions in `state`
    ///
    /// The returned [`Policy`] carries the epsilon it was computed with.
    pub fn policy(&mut self, state: S, epsilon: Epsilon) -> Result<Policy> {
        // Resolve epsilon before touching the table so failures leave it unchanged
        let epsilon = self.exploration.epsilon(epsilon)?;
        probabilities(self.q_table.row_mut(state), epsilon)
    }

    /// Sample an action for `state` from the epsilon greedy policy
    pub fn select_action(&mut self, state: S, epsilon: Epsilon) -> Result<usize> {
        let policy = self.policy(state, epsilon)?;
        policy.sample(&mut self.rng)
    }

    /// Update the value of `(state, action)` from one observed transition
    ///
    /// Fails with [`Error::InvalidArgument`] before mutating anything if `action` is out of range
    /// or `reward` is not finite.
    pub fn step(
        &mut self,
        state: S,
        action: usize,
        reward: f64,
        next_state: S,
        done: bool,
    ) -> Result<()> {
        let n_actions = self.n_actions();
        if action >= n_actions {
            return Err(Error::InvalidArgument(format!(
                "action {action} out of range for {n_actions} actions"
            )));
        }
        if !reward.is_finite() {
            return Err(Error::InvalidArgument(format!(
                "reward must be finite, got {reward}"
            )));
        }

        let bootstrap = if done && !self.terminal_bootstrap {
            0.0
        } else {
            self.bootstrap(next_state)?
        };
        let target = reward + self.gamma * bootstrap;

        let q = &mut self.q_table.row_mut(state)[action];
        *q += self.alpha * (target - *q);
        trace!("Q({state:?}, {action}) <- {} (target {target})", *q);

        Ok(())
    }

    /// Learn from a given experience and update the table
    pub fn learn(&mut self, exp: Exp<S>) -> Result<()> {
        let Exp {
            state,
            action,
            reward,
            next_state,
            done,
        } = exp;
        self.step(state, action, reward, next_state, done)
    }

    fn bootstrap(&mut self, next_state: S) -> Result<f64> {
        let row = &*self.q_table.row_mut(next_state);
        let value = match self.update_rule {
            UpdateRule::ExpectedSarsa => {
                probabilities(row, self.bootstrap_epsilon)?.expectation(row)
            }
            UpdateRule::SarsaMax => row.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            UpdateRule::Sarsa => {
                let next_action =
                    probabilities(row, self.bootstrap_epsilon)?.sample(&mut self.rng)?;
                row[next_action]
            }
        };
        Ok(value)
    }

    /// Run the agent for one episode in the given environment
    ///
    /// Actions are selected with the exploration rate the schedule gives for `episode`, so an
    /// `episode` of 0 fails with the default reciprocal schedule.
    pub fn go<E>(&mut self, env: &mut E, episode: u32) -> Result<EpisodeReport>
    where
        E: Environment<State = S>,
    {
        let mut report = EpisodeReport::default();
        let mut state = env.reset();

        while self.max_episode_steps.map_or(true, |limit| report.steps < limit) {
            let action = self.select_action(state, Epsilon::Episode(episode))?;
            let (next_state, reward, done) = env.step(action);
            self.step(state, action, reward, next_state, done)?;

            report.steps += 1;
            report.total_reward += reward;
            if done {
                report.done = true;
                break;
            }
            state = next_state;
        }

        debug!(
            "episode {episode}: {} steps, total reward {}, done {}",
            report.steps, report.total_reward, report.done
        );

        Ok(report)
    }
}
