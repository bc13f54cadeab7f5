use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

use crate::{
    decay::{self, Decay},
    error::{Error, Result},
    util::{argmax, ensure_interval},
};

/// How the exploration rate is derived for a single decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Epsilon {
    /// Evaluate the exploration schedule at this episode index
    Episode(u32),
    /// Override the schedule with a fixed exploration rate
    Fixed(f64),
}

/// A probability distribution over actions, along with the epsilon that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub probs: Vec<f64>,
    pub epsilon: f64,
}

impl Policy {
    /// Sample an action index with the probabilities of this policy
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        let dist: WeightedIndex<f64> = WeightedIndex::new(self.probs.iter().copied())
            .map_err(|e| Error::InvalidArgument(format!("cannot sample from policy: {e}")))?;
        Ok(dist.sample(rng))
    }

    /// Expected value of `values` under this policy
    pub fn expectation(&self, values: &[f64]) -> f64 {
        values.iter().zip(&self.probs).map(|(v, p)| v * p).sum()
    }
}

/// Compute the epsilon-greedy distribution over `values`
///
/// Every action receives `epsilon / n`, and the first action with the maximum value
/// is overwritten with `1 - epsilon + epsilon / n`.
pub fn probabilities(values: &[f64], epsilon: f64) -> Result<Policy> {
    ensure_interval!(epsilon, 0.0, 1.0);
    let best = argmax(values)
        .ok_or_else(|| Error::InvalidArgument(String::from("action values must not be empty")))?;

    let base = epsilon / values.len() as f64;
    let mut probs = vec![base; values.len()];
    probs[best] = 1.0 - epsilon + base;

    Ok(Policy { probs, epsilon })
}

/// Epsilon greedy exploration policy with an episode-indexed epsilon schedule
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonGreedy<D: Decay> {
    schedule: D,
}

impl Default for EpsilonGreedy<decay::Reciprocal> {
    fn default() -> Self {
        Self::new(decay::Reciprocal)
    }
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(schedule: D) -> Self {
        Self { schedule }
    }

    /// Resolve the exploration rate for one decision
    ///
    /// Fails if the schedule fails, or if the result is outside `[0,1]`.
    pub fn epsilon(&self, epsilon: Epsilon) -> Result<f64> {
        let epsilon = match epsilon {
            Epsilon::Episode(i) => self.schedule.evaluate(i as f64)?,
            Epsilon::Fixed(e) => e,
        };
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(epsilon)
    }

    /// Compute the epsilon greedy distribution over `values`
    pub fn policy(&self, values: &[f64], epsilon: Epsilon) -> Result<Policy> {
        probabilities(values, self.epsilon(epsilon)?)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    use super::*;

    const VALUES: [f64; 6] = [0.5, -1.0, 2.0, 2.0, 0.0, 1.5];

    #[test]
    fn probabilities_form_a_distribution() {
        for epsilon in [0.0, 0.001, 0.1, 0.5, 0.9, 1.0] {
            let policy = probabilities(&VALUES, epsilon).unwrap();
            let sum: f64 = policy.probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "Sums to 1 for epsilon {epsilon}");
            assert!(policy.probs.iter().all(|&p| p >= 0.0), "Non-negative");
            assert_eq!(policy.epsilon, epsilon, "Epsilon is reported");
        }
    }

    #[test]
    fn fully_random_is_uniform() {
        let policy = probabilities(&VALUES, 1.0).unwrap();
        assert!(policy.probs.iter().all(|&p| p == 1.0 / 6.0));
    }

    #[test]
    fn fully_greedy_picks_first_max() {
        let policy = probabilities(&VALUES, 0.0).unwrap();
        assert_eq!(policy.probs, [0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn boost_overwrites_rather_than_adds() {
        let policy = probabilities(&[0.0, 1.0], 0.2).unwrap();
        assert_eq!(policy.probs[0], 0.1);
        assert!((policy.probs[1] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn probabilities_are_pure() {
        let a = probabilities(&VALUES, 0.3).unwrap();
        let b = probabilities(&VALUES, 0.3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_inputs_rejected() {
        assert!(matches!(
            probabilities(&[], 0.1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            probabilities(&VALUES, 1.5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            probabilities(&VALUES, -0.1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn epsilon_from_episode() {
        let exploration = EpsilonGreedy::new(decay::Reciprocal);
        assert_eq!(exploration.epsilon(Epsilon::Episode(1)), Ok(1.0));
        assert_eq!(exploration.epsilon(Epsilon::Episode(5)), Ok(0.2));
        assert_eq!(exploration.epsilon(Epsilon::Fixed(0.0)), Ok(0.0));
        assert!(matches!(
            exploration.epsilon(Epsilon::Episode(0)),
            Err(Error::Division(_))
        ));
    }

    #[test]
    fn policy_uses_schedule() {
        let exploration = EpsilonGreedy::<decay::Reciprocal>::default();
        let policy = exploration.policy(&[0.0, 1.0], Epsilon::Episode(2)).unwrap();
        assert_eq!(policy.epsilon, 0.5);
        assert_eq!(policy.probs, [0.25, 0.75]);
    }

    #[test]
    fn schedule_outside_unit_interval_rejected() {
        let exploration = EpsilonGreedy::new(decay::Constant::new(2.0));
        assert!(matches!(
            exploration.epsilon(Epsilon::Episode(3)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn expectation_is_dot_product() {
        let policy = probabilities(&[1.0, 3.0], 0.5).unwrap();
        assert_eq!(policy.expectation(&[1.0, 3.0]), 0.25 * 1.0 + 0.75 * 3.0);
    }

    #[test]
    fn sampling_matches_probabilities() {
        const N: usize = 60_000;
        let policy = probabilities(&VALUES, 0.6).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 6];
        for _ in 0..N {
            counts[policy.sample(&mut rng).unwrap()] += 1;
        }

        let chi2: f64 = counts
            .iter()
            .zip(&policy.probs)
            .map(|(&o, &p)| {
                let e = p * N as f64;
                (o as f64 - e).powi(2) / e
            })
            .sum();
        let critical = ChiSquared::new(5.0).unwrap().inverse_cdf(0.999);
        assert!(chi2 < critical, "chi2 {chi2} exceeds {critical}");
    }

    #[test]
    fn greedy_sampling_is_deterministic() {
        let policy = probabilities(&VALUES, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!((0..100).all(|_| policy.sample(&mut rng) == Ok(2)));
    }
}
