use crate::error::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f64) -> Result<f64>;
}

fn validate(rate: f64, vi: f64, vf: f64) -> Result<()> {
    ((rate >= 0.0 && vi > vf) || (rate < 0.0 && vi < vf))
        .then_some(())
        .ok_or_else(|| {
            Error::InvalidArgument(String::from("`vi - vf` must have same sign as `rate`"))
        })
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f64) -> Result<f64> {
        Ok(self.value)
    }
}

/// v(t) = 1 / t
///
/// Evaluating at `t = 0` is a [`Division`](Error::Division) error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reciprocal;

impl Decay for Reciprocal {
    fn evaluate(&self, t: f64) -> Result<f64> {
        if t == 0.0 {
            return Err(Error::Division("episode index must be nonzero"));
        }
        Ok(1.0 / t)
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exponential {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Exponential {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f64) -> Result<f64> {
        let &Self { rate, vi, vf } = self;
        Ok(vf + (vi - vf) * (-rate * t).exp())
    }
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Linear {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f64) -> Result<f64> {
        let &Self { rate, vi, vf } = self;
        Ok((vi - rate * t).max(vf))
    }
}
