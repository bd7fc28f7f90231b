//! Derives everything the UI draws from the latest snapshot.
//!
//! All functions here are pure: the same snapshot and layout always produce the same [`View`].

use crate::common::format::{two_decimals, value_text};
use crate::common::layout::{Layout, INFO_INSET, INFO_OUTSET};
use crate::protocol::{ActionValues, AgentState, Snapshot};
use crate::{Action, Tile};
use iced::{Point, Rectangle, Size};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("{table} has no value for {key}")]
    MissingValue { table: &'static str, key: String },
}

/// One entry of the algorithm values table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRow {
    Scalar { key: String, value: String },
    Sequence { key: String, items: Vec<String> },
}

impl DisplayRow {
    pub fn key(&self) -> &str {
        match self {
            DisplayRow::Scalar { key, .. } | DisplayRow::Sequence { key, .. } => key,
        }
    }
}

/// Flattens the agent's variables for the values table.
///
/// Numbers and strings become scalar rows and arrays become expandable rows. Mappings, booleans
/// and nulls are left out, so `Q` and `pi` only ever show up in the overlays.
pub fn table_rows(state: &AgentState) -> Vec<DisplayRow> {
    state
        .variables
        .iter()
        .filter_map(|(key, value)| match value {
            Value::Number(_) | Value::String(_) => Some(DisplayRow::Scalar {
                key: key.clone(),
                value: value_text(value),
            }),
            Value::Array(items) => Some(DisplayRow::Sequence {
                key: key.clone(),
                items: items.iter().map(value_text).collect(),
            }),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

/// Pixel geometry of a square lake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Board {
    map_size: usize,
    square_size: f32,
    agent_size: f32,
    info_size: f32,
}

impl Board {
    pub fn new(map_size: usize, layout: &Layout) -> Self {
        let map_size = map_size.max(1);
        let square_size = layout.board_size / map_size as f32;

        Self {
            map_size,
            square_size,
            agent_size: square_size / 2.,
            info_size: layout.info_size,
        }
    }

    pub fn map_size(&self) -> usize {
        self.map_size
    }

    pub fn square_size(&self) -> f32 {
        self.square_size
    }

    pub fn agent_size(&self) -> f32 {
        self.agent_size
    }

    pub fn cell(&self, index: usize) -> Cell {
        let row = index / self.map_size;

        Cell {
            row,
            column: index - row * self.map_size,
        }
    }

    /// Top left corner of the tile at `index`.
    pub fn tile_origin(&self, index: usize) -> Point {
        let Cell { row, column } = self.cell(index);

        Point::new(
            column as f32 * self.square_size,
            row as f32 * self.square_size,
        )
    }

    /// Top left corner of the agent marker, centered in its tile. Before the first step the agent
    /// is drawn on tile 0.
    pub fn agent_position(&self, obs: Option<usize>) -> Point {
        let origin = self.tile_origin(obs.unwrap_or_default());
        let offset = self.square_size / 2. - self.agent_size / 2.;

        Point::new(origin.x + offset, origin.y + offset)
    }

    /// Box holding the values for `action`, placed on the matching side of the agent's tile.
    pub fn overlay_bounds(&self, action: Action, obs: Option<usize>) -> Rectangle {
        let Point { x, y } = self.tile_origin(obs.unwrap_or_default());
        let horizontal = Size::new(self.square_size, self.info_size);
        let vertical = Size::new(self.info_size, self.square_size);

        match action {
            Action::Up => Rectangle::new(Point::new(x, y - INFO_OUTSET), horizontal),
            Action::Down => Rectangle::new(
                Point::new(x, y + self.square_size - INFO_INSET),
                horizontal,
            ),
            Action::Right => Rectangle::new(
                Point::new(x + self.square_size - INFO_INSET, y),
                vertical,
            ),
            Action::Left => Rectangle::new(Point::new(x - INFO_OUTSET, y), vertical),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoValue {
    pub label: &'static str,
    pub value: String,
}

fn lookup(
    table: &'static str,
    values: &ActionValues,
    state: usize,
    action: Action,
) -> Result<InfoValue, ProjectionError> {
    let value = values
        .get(state, action)
        .ok_or_else(|| ProjectionError::MissingValue {
            table,
            key: ActionValues::key(state, action),
        })?;

    Ok(InfoValue {
        label: table,
        value: two_decimals(value),
    })
}

/// `Q` and `pi` readouts for taking `action` from the agent's tile.
///
/// Empty until the snapshot has both a position and both tables. A key missing from either table
/// is an error for this direction only.
pub fn overlay(snapshot: &Snapshot, action: Action) -> Result<Vec<InfoValue>, ProjectionError> {
    let state = &snapshot.agent_state;
    let (Some(obs), Some(q), Some(pi)) = (snapshot.obs(), &state.q, &state.pi) else {
        return Ok(Vec::new());
    };

    Ok(vec![
        lookup("Q", q, obs, action)?,
        lookup("pi", pi, obs, action)?,
    ])
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub action: Action,
    pub bounds: Rectangle,
    pub values: Result<Vec<InfoValue>, ProjectionError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub board: Board,
    pub tiles: Vec<Tile>,
    pub current: usize,
    pub agent: Point,
    pub overlays: Vec<Overlay>,
    pub rows: Vec<DisplayRow>,
}

pub fn project(snapshot: &Snapshot, layout: &Layout) -> View {
    let board = Board::new(snapshot.map_size(), layout);
    let obs = snapshot.obs();

    let overlays = Action::ALL
        .into_iter()
        .map(|action| Overlay {
            action,
            bounds: board.overlay_bounds(action, obs),
            values: overlay(snapshot, action),
        })
        .collect();

    View {
        board,
        tiles: snapshot.tiles().to_vec(),
        current: obs.unwrap_or_default(),
        agent: board.agent_position(obs),
        overlays,
        rows: table_rows(&snapshot.agent_state),
    }
}

/// The newest snapshot together with its projection. Starts empty; every snapshot replaces the
/// previous one wholesale.
#[derive(Debug, Default)]
pub struct Latest {
    current: Option<(Snapshot, View)>,
}

impl Latest {
    pub fn replace(&mut self, snapshot: Snapshot, layout: &Layout) -> &View {
        let view = project(&snapshot, layout);
        &self.current.insert((snapshot, view)).1
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.current.as_ref().map(|(snapshot, _)| snapshot)
    }

    pub fn view(&self) -> Option<&View> {
        self.current.as_ref().map(|(_, view)| view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_size_divides_board() {
        let board = Board::new(8, &Layout::default());
        assert_eq!(board.square_size(), 75.);
        assert_eq!(board.agent_size(), 37.5);
    }

    #[test]
    fn agent_sits_in_the_middle_of_its_tile() {
        let board = Board::new(4, &Layout::default());
        // 4x4 on 600px: 150px tiles, 75px agent.
        assert_eq!(board.agent_position(Some(5)), Point::new(187.5, 187.5));
        assert_eq!(board.agent_position(None), Point::new(37.5, 37.5));
    }

    #[test]
    fn overlays_hug_the_matching_edge() {
        let board = Board::new(4, &Layout::default());
        let up = board.overlay_bounds(Action::Up, Some(5));
        let down = board.overlay_bounds(Action::Down, Some(5));
        let right = board.overlay_bounds(Action::Right, Some(5));
        let left = board.overlay_bounds(Action::Left, Some(5));

        assert_eq!((up.x, up.y, up.width, up.height), (150., 122., 150., 38.));
        assert_eq!((down.x, down.y), (150., 285.));
        assert_eq!((right.x, right.y, right.width, right.height), (285., 150., 38., 150.));
        assert_eq!((left.x, left.y), (122., 150.));
    }

    #[test]
    fn zero_map_size_does_not_divide_by_zero() {
        let board = Board::new(0, &Layout::default());
        assert_eq!(board.cell(0), Cell { row: 0, column: 0 });
    }
}
