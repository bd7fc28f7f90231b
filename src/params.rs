use crate::protocol::Command;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Hyperparameters the client pushes to the server. They are owned by the client and
/// never read back from snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "ParamsPayload", from = "ParamsPayload")]
pub struct Params {
    pub alpha: f64,
    pub epsilon: f64,
    pub n: u32,
    pub gamma: f64,
    pub is_slippery: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            epsilon: 0.1,
            n: 4,
            gamma: 0.9,
            is_slippery: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParamsPayload {
    agent: AgentParams,
    env: EnvParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AgentParams {
    n: u32,
    epsilon: f64,
    alpha: f64,
    gamma: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnvParams {
    is_slippery: bool,
}

impl From<Params> for ParamsPayload {
    fn from(p: Params) -> Self {
        Self {
            agent: AgentParams {
                n: p.n,
                epsilon: p.epsilon,
                alpha: p.alpha,
                gamma: p.gamma,
            },
            env: EnvParams {
                is_slippery: p.is_slippery,
            },
        }
    }
}

impl From<ParamsPayload> for Params {
    fn from(p: ParamsPayload) -> Self {
        Self {
            alpha: p.agent.alpha,
            epsilon: p.agent.epsilon,
            n: p.agent.n,
            gamma: p.agent.gamma,
            is_slippery: p.env.is_slippery,
        }
    }
}

/// The slider-backed parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    LearningRate,
    Epsilon,
    Steps,
    Discount,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::LearningRate,
        Field::Epsilon,
        Field::Steps,
        Field::Discount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::LearningRate => "Learning Rate",
            Field::Epsilon => "Epsilon",
            Field::Steps => "n-steps",
            Field::Discount => "Discount",
        }
    }

    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Field::Steps => 1.0..=10.0,
            _ => 0.0..=1.0,
        }
    }

    pub fn step(self) -> f64 {
        match self {
            Field::Steps => 1.,
            _ => 0.05,
        }
    }

    pub fn get(self, params: &Params) -> f64 {
        match self {
            Field::LearningRate => params.alpha,
            Field::Epsilon => params.epsilon,
            Field::Steps => params.n as f64,
            Field::Discount => params.gamma,
        }
    }

    /// Clamps `value` to the field's range and snaps it to the field's step.
    pub fn set(self, params: &mut Params, value: f64) {
        let value = self.snap(value);
        match self {
            Field::LearningRate => params.alpha = value,
            Field::Epsilon => params.epsilon = value,
            Field::Steps => params.n = value as u32,
            Field::Discount => params.gamma = value,
        }
    }

    fn snap(self, value: f64) -> f64 {
        let range = self.range();
        let value = if value.is_nan() { *range.start() } else { value };
        let value = value.clamp(*range.start(), *range.end());
        let snapped = (value / self.step()).round() * self.step();

        // Strip the representation noise the multiplication leaves behind, e.g. 0.15000000000000002.
        (snapped * 100.).round() / 100.
    }
}

/// Local parameter state. Adjustments only touch the local copy; the server hears about them
/// once per commit.
#[derive(Debug, Clone, Default)]
pub struct ParamsEditor {
    params: Params,
}

impl ParamsEditor {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn adjust(&mut self, field: Field, value: f64) {
        field.set(&mut self.params, value);
    }

    pub fn commit(&self) -> Command {
        Command::Params(self.params)
    }

    /// Flips `is_slippery` and commits the result right away, there is no drag to wait for.
    pub fn set_slippery(&mut self, is_slippery: bool) -> Command {
        self.params.is_slippery = is_slippery;
        self.commit()
    }
}
