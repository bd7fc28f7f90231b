extern crate frozen_lake_showcase;
extern crate serde_json;
mod common;

use assertor::*;
use common::*;
use frozen_lake_showcase::params::Params;
use frozen_lake_showcase::protocol::{interpret, Command, Inbound, ProtocolError, Snapshot};
use frozen_lake_showcase::{Action, Tile};
use rstest::rstest;
use serde_json::{json, Value};

fn snapshot(text: &str) -> Snapshot {
    match interpret(text).unwrap() {
        Inbound::Snapshot(s) => *s,
        other => panic!("{other:?} is not a snapshot."),
    }
}

#[test]
fn server_snapshot_is_interpreted() {
    let s = snapshot(&frozen_lake_message(Some(6), agent_state(16)));

    assert_eq!(s.map_size(), 4);
    assert_eq!(s.tiles().len(), 16);
    assert_eq!(s.tiles()[0], Tile::Start);
    assert_eq!(s.tiles()[5], Tile::Hole);
    assert_eq!(s.tiles()[6], Tile::Ice);
    assert_eq!(s.tiles()[15], Tile::Goal);
    assert_eq!(s.obs(), Some(6));
    assert_eq!(s.step.reward, Some(0.0));
    assert_eq!(s.step.done, Some(false));
    assert!(!s.terminated);

    let q = s.agent_state.q.as_ref().unwrap();
    assert_eq!(q.len(), 64);
    assert_eq!(q.get(6, Action::Down), Some(0.2));
    let pi = s.agent_state.pi.as_ref().unwrap();
    assert_eq!(pi.get(6, Action::Right), Some(0.925));
}

#[test]
fn residual_variables_keep_server_order() {
    let s = snapshot(&frozen_lake_message(Some(6), agent_state(16)));
    let keys: Vec<_> = s.agent_state.variables.keys().map(String::as_str).collect();

    assert_eq!(
        keys,
        ["t", "T", "tau", "A", "S", "R", "epsilon", "n", "alpha", "gamma"]
    );
}

#[test]
fn position_is_undefined_before_first_step() {
    let s = snapshot(&frozen_lake_message(None, agent_state(16)));
    assert_that!(s.obs()).is_equal_to(None);
}

#[test]
fn agent_state_may_be_absent() {
    let text = json!({ "type": "FrozenLake", "map": [["S", "F"], ["F", "G"]] }).to_string();
    let s = snapshot(&text);

    assert_eq!(s.map_size(), 2);
    assert!(s.agent_state.q.is_none());
    assert!(s.agent_state.pi.is_none());
    assert!(s.agent_state.variables.is_empty());
}

#[rstest]
#[case(json!({ "type": "CartPole", "state": [0.1, 0.2] }), Some("CartPole"))]
#[case(json!({ "map": [["S"]] }), None)]
#[case(json!({ "type": 7 }), None)]
#[case(json!([1, 2, 3]), None)]
fn other_messages_are_ignored(#[case] message: Value, #[case] kind: Option<&str>) {
    assert_eq!(
        interpret(&message.to_string()).unwrap(),
        Inbound::Ignored {
            kind: kind.map(str::to_string)
        }
    );
}

#[rstest]
#[case("")]
#[case("{\"type\": \"FrozenLake\"")]
#[case("not json at all")]
fn malformed_json_is_an_error(#[case] text: &str) {
    assert!(matches!(interpret(text), Err(ProtocolError::Malformed(_))));
}

#[test]
fn wrongly_typed_tables_are_invalid() {
    let text = json!({
        "type": "FrozenLake",
        "map": [["S"]],
        "agentState": { "Q": { "(0, 0)": "high" } },
    })
    .to_string();

    assert!(matches!(
        interpret(&text),
        Err(ProtocolError::InvalidSnapshot(_))
    ));
}

#[test]
fn params_command_wire_format() {
    let text = Command::Params(Params::default()).encode().unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();

    insta::assert_json_snapshot!(value, @r###"
    {
      "request": "params",
      "data": {
        "agent": {
          "n": 4,
          "epsilon": 0.1,
          "alpha": 0.1,
          "gamma": 0.9
        },
        "env": {
          "is_slippery": false
        }
      }
    }
    "###);
}

#[rstest]
#[case(Command::Step, "step")]
#[case(Command::Simulate, "simulate")]
#[case(Command::Reset, "reset")]
fn playback_commands_wire_format(#[case] command: Command, #[case] request: &str) {
    let value: Value = serde_json::from_str(&command.encode().unwrap()).unwrap();
    assert_eq!(value, json!({ "request": request, "data": {} }));
}

/// Decodes a params command the way the server does.
fn server_decode(text: &str) -> Params {
    let envelope: Value = serde_json::from_str(text).unwrap();
    assert_eq!(envelope["request"], "params");
    serde_json::from_value(envelope["data"].clone()).unwrap()
}

#[rstest]
#[case(Params::default())]
#[case(Params { alpha: 0.05, epsilon: 0.95, n: 1, gamma: 1.0, is_slippery: true })]
#[case(Params { alpha: 0.0, epsilon: 0.35, n: 10, gamma: 0.45, is_slippery: false })]
fn params_survive_the_wire(#[case] params: Params) {
    let text = Command::Params(params).encode().unwrap();
    assert_eq!(server_decode(&text), params);
}
