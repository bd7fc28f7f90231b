//! Wire format shared with the training server.
//!
//! Outbound commands are `{"request": <name>, "data": <payload>}` envelopes. Inbound messages are
//! full state snapshots; only those typed `"FrozenLake"` are understood, anything else is ignored.

use crate::params::Params;
use crate::{Action, Tile};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

pub const FROZEN_LAKE: &str = "FrozenLake";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("message is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("invalid FrozenLake snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("cannot encode command: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Advance one timestep.
    Step,
    /// Toggle continuous play on the server.
    Simulate,
    /// Restart the episode.
    Reset,
    /// Push the current parameter set.
    Params(Params),
}

#[derive(Serialize)]
struct Envelope<'a> {
    request: &'a str,
    data: Value,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Step => "step",
            Command::Simulate => "simulate",
            Command::Reset => "reset",
            Command::Params(_) => "params",
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        let data = match self {
            Command::Params(params) => serde_json::to_value(params).map_err(ProtocolError::Encode)?,
            _ => Value::Object(Map::new()),
        };

        serde_json::to_string(&Envelope {
            request: self.name(),
            data,
        })
        .map_err(ProtocolError::Encode)
    }
}

/// What an inbound message turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Snapshot(Box<Snapshot>),
    /// A message for an environment this client does not render.
    Ignored { kind: Option<String> },
}

/// `Q` or `pi` table keyed by the server's stringified `(state, action)` tuples.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ActionValues(HashMap<String, f64>);

impl ActionValues {
    pub fn key(state: usize, action: Action) -> String {
        format!("({state}, {})", action.index())
    }

    pub fn get(&self, state: usize, action: Action) -> Option<f64> {
        self.0.get(&Self::key(state, action)).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for ActionValues {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Algorithm variables reported by the server. `Q` and `pi` are picked out; everything else is
/// kept in server order for display.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentState {
    #[serde(rename = "Q", default)]
    pub q: Option<ActionValues>,
    #[serde(default)]
    pub pi: Option<ActionValues>,
    #[serde(flatten)]
    pub variables: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StepResults {
    #[serde(default)]
    pub obs: Option<usize>,
    #[serde(default, rename = "rew")]
    pub reward: Option<f64>,
    #[serde(default)]
    pub done: Option<bool>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    map: Vec<Vec<String>>,
    #[serde(default, rename = "stepResults")]
    step_results: StepResults,
    #[serde(default, rename = "agentState")]
    agent_state: AgentState,
    #[serde(default, rename = "Terminated")]
    terminated: bool,
}

/// One complete FrozenLake state pushed by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    map_size: usize,
    tiles: Vec<Tile>,
    pub step: StepResults,
    pub terminated: bool,
    pub agent_state: AgentState,
}

impl Snapshot {
    /// Number of rows, which is also the number of columns.
    pub fn map_size(&self) -> usize {
        self.map_size
    }

    /// Tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Linear index of the agent's tile, absent until the first step.
    pub fn obs(&self) -> Option<usize> {
        self.step.obs
    }

    fn from_raw(raw: RawSnapshot) -> Result<Self, ProtocolError> {
        let map_size = raw.map.len();
        if map_size == 0 {
            return Err(ProtocolError::InvalidSnapshot("map is empty".into()));
        }

        if let Some((i, line)) = raw.map.iter().enumerate().find(|(_, l)| l.len() != map_size) {
            return Err(ProtocolError::InvalidSnapshot(format!(
                "map is not square: row {i} has {} tiles, expected {map_size}",
                line.len()
            )));
        }

        let tiles: Vec<Tile> = raw.map.iter().flatten().map(|c| Tile::from_code(c)).collect();

        if let Some(obs) = raw.step_results.obs {
            if obs >= tiles.len() {
                return Err(ProtocolError::InvalidSnapshot(format!(
                    "obs {obs} is outside the {map_size}x{map_size} map"
                )));
            }
        }

        Ok(Self {
            map_size,
            tiles,
            step: raw.step_results,
            terminated: raw.terminated,
            agent_state: raw.agent_state,
        })
    }
}

/// Interprets one inbound text message.
pub fn interpret(text: &str) -> Result<Inbound, ProtocolError> {
    let value: Value = serde_json::from_str(text).map_err(ProtocolError::Malformed)?;

    match value.get("type").and_then(Value::as_str) {
        Some(FROZEN_LAKE) => {}
        kind => {
            return Ok(Inbound::Ignored {
                kind: kind.map(str::to_string),
            })
        }
    }

    let raw: RawSnapshot = serde_json::from_value(value)
        .map_err(|e| ProtocolError::InvalidSnapshot(e.to_string()))?;

    Ok(Inbound::Snapshot(Box::new(Snapshot::from_raw(raw)?)))
}
