use serde_json::{json, Map, Value};

pub const MAP_4X4: [&str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

/// Agent variables in the shape the n-step SARSA server sends, with every `(state, action)` key
/// of a `states`-tile lake present in `Q` and `pi`.
#[allow(dead_code)]
pub fn agent_state(states: usize) -> Value {
    let mut q = Map::new();
    let mut pi = Map::new();
    for s in 0..states {
        for a in 0..4 {
            let greedy = if a == 1 { 0.925 } else { 0.025 };
            q.insert(format!("({s}, {a})"), json!(0.1 * a as f64));
            pi.insert(format!("({s}, {a})"), json!(greedy));
        }
    }

    json!({
        "t": 3,
        "T": "inf",
        "tau": 0,
        "A": [1, 2, 2, 1, 0],
        "S": [0, 4, 8, 9, 0],
        "R": [0, 0, 0, 0, 0],
        "Q": q,
        "pi": pi,
        "epsilon": 0.1,
        "n": 4,
        "alpha": 0.1,
        "gamma": 0.9,
    })
}

/// A full server message for the 4x4 lake.
#[allow(dead_code)]
pub fn frozen_lake_message(obs: Option<usize>, agent_state: Value) -> String {
    let map: Vec<Vec<String>> = MAP_4X4
        .iter()
        .map(|line| line.chars().map(String::from).collect())
        .collect();

    let step_results = match obs {
        Some(obs) => json!({ "obs": obs, "rew": 0.0, "done": false, "info": { "prob": 1.0 } }),
        None => json!({}),
    };

    json!({
        "Terminated": false,
        "stepResults": step_results,
        "agentState": agent_state,
        "type": "FrozenLake",
        "map": map,
        "action_space": [0, 1, 2, 3],
        "observation_space": (0..16).collect::<Vec<_>>(),
    })
    .to_string()
}
