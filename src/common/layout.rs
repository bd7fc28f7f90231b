/// Side length of the rendered lake in pixels.
pub const BOARD_SIZE: f32 = 600.;

/// Diameter of a single value bubble around the agent.
pub const INFO_SIZE: f32 = 38.;

/// How far the up and left value boxes reach past the tile edge.
pub const INFO_OUTSET: f32 = 28.;

/// How far the down and right value boxes reach into the tile.
pub const INFO_INSET: f32 = 15.;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub board_size: f32,
    pub info_size: f32,
}

impl Layout {
    pub fn with_board_size(board_size: f32) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            info_size: INFO_SIZE,
        }
    }
}
