use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn step(self, action: Action) -> Self {
        let (dy, dx) = action.delta();
        Self { y: self.y + dy, x: self.x + dx }
    }

    /// Orthogonal neighbors in fixed action order. Searches over this set are
    /// order-independent; the fixed order keeps traces reproducible.
    pub fn neighbors(self) -> [Self; 4] {
        Action::ALL.map(|action| self.step(action))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileKind {
    Empty,
    Wall,
    Start,
    Goal,
    Key,
    Trap,
}

impl TileKind {
    /// Stable wire code used in canonical byte fingerprints.
    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Start => 2,
            Self::Goal => 3,
            Self::Key => 4,
            Self::Trap => 5,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Start => 'S',
            Self::Goal => 'G',
            Self::Key => 'K',
            Self::Trap => 'x',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Action {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Action {
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Unit displacement as `(dy, dx)`; row 0 is the top row.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Right => (0, 1),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Action {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Up,
            1 => Self::Right,
            2 => Self::Down,
            3 => Self::Left,
            _ => return Err("invalid action index (expected 0..=3)"),
        })
    }
}

/// Single-word outcome tag attached to every reset/step result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    Reset,
    Moved,
    NoOp,
    GoalLocked,
    KeyCollected,
    Trap,
    Success,
    Timeout,
}

impl Event {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Moved => "moved",
            Self::NoOp => "no_op",
            Self::GoalLocked => "goal_locked",
            Self::KeyCollected => "key_collected",
            Self::Trap => "trap",
            Self::Success => "success",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepInfo {
    pub event: Event,
    pub keys_collected: u32,
    pub steps: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapGenError {
    /// The grid cannot hold a start, a goal, and the requested keys.
    GridTooSmall { capacity: usize, required: usize },
    /// No attempt validated within the retry budget.
    RetriesExhausted { attempts: u32 },
}

impl fmt::Display for MapGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall { capacity, required } => {
                write!(f, "grid too small: {capacity} cells cannot hold {required} entities")
            }
            Self::RetriesExhausted { attempts } => {
                write!(f, "failed to generate solvable map after {attempts} attempts")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvError {
    /// A caller-supplied grid has no START cell to place the agent on.
    MissingStart,
    Generation(MapGenError),
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "map missing START tile"),
            Self::Generation(cause) => write!(f, "map generation failed: {cause}"),
        }
    }
}
