extern crate serde;
extern crate serde_json;

pub mod common;
pub mod connection;
pub mod params;
pub mod projection;
pub mod protocol;
pub mod settings;
pub mod ui;

/// Actions of the FrozenLake environment, in the order the server indexes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Right => "right",
            Action::Down => "down",
            Action::Left => "left",
        }
    }
}

/// Tile kinds of the lake. The server sends each tile as a one character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Start,
    Ice,
    Hole,
    Goal,
}

impl Tile {
    pub fn from_code(code: &str) -> Self {
        match code {
            "H" => Tile::Hole,
            "G" => Tile::Goal,
            "S" => Tile::Start,
            _ => Tile::Ice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_follow_server_indices() {
        let indices: Vec<_> = Action::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(indices, [0, 1, 2, 3]);
    }

    #[test]
    fn unknown_tile_codes_are_ice() {
        assert_eq!(Tile::from_code("H"), Tile::Hole);
        assert_eq!(Tile::from_code("G"), Tile::Goal);
        assert_eq!(Tile::from_code("S"), Tile::Start);
        assert_eq!(Tile::from_code("F"), Tile::Ice);
        assert_eq!(Tile::from_code("?"), Tile::Ice);
        assert_eq!(Tile::from_code(""), Tile::Ice);
    }
}
