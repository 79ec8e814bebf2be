//! Orientation in world space
//!
//! North is `-z`, east is `+x`, south is `+z`, west is `-x`.

/// Direction in game world space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up,
    Down,
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// The four orientations that link regions, in link-slot order
    pub const LATERAL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    /// Opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
            Orientation::North => Orientation::South,
            Orientation::East => Orientation::West,
            Orientation::South => Orientation::North,
            Orientation::West => Orientation::East,
        }
    }

    /// Unit step as (dx, dy, dz)
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Orientation::Up => (0, 1, 0),
            Orientation::Down => (0, -1, 0),
            Orientation::North => (0, 0, -1),
            Orientation::East => (1, 0, 0),
            Orientation::South => (0, 0, 1),
            Orientation::West => (-1, 0, 0),
        }
    }

    /// Slot in a 4-entry lateral link table, `None` for up/down
    pub fn lateral_index(self) -> Option<usize> {
        match self {
            Orientation::North => Some(0),
            Orientation::East => Some(1),
            Orientation::South => Some(2),
            Orientation::West => Some(3),
            Orientation::Up | Orientation::Down => None,
        }
    }
}
