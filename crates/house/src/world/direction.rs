use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    Up,
    Down,
    In,
    Out,
}

impl Direction {
    pub const ALL: [Direction; 12] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
        Direction::Up,
        Direction::Down,
        Direction::In,
        Direction::Out,
    ];

    /// Exact JSON token for this direction.
    pub fn token(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Northeast => "Northeast",
            Direction::Northwest => "Northwest",
            Direction::Southeast => "Southeast",
            Direction::Southwest => "Southwest",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::In => "In",
            Direction::Out => "Out",
        }
    }

    /// Strict token lookup used by the house loader; case-sensitive.
    pub fn from_token(token: &str) -> Option<Direction> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.token() == token)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Northeast => Direction::Southwest,
            Direction::Southwest => Direction::Northeast,
            Direction::Northwest => Direction::Southeast,
            Direction::Southeast => Direction::Northwest,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }

    /// "Up", "Down", "In" and "Out" read on their own; compass points read "to the North".
    pub fn describe(self) -> String {
        match self {
            Direction::Up | Direction::Down | Direction::In | Direction::Out => {
                self.token().to_string()
            }
            _ => format!("to the {}", self.token()),
        }
    }

    pub(crate) fn describe_lowercase(self) -> String {
        self.describe().to_lowercase()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a direction", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

/// Lenient parse for typed commands: any case, plus the usual abbreviations.
impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        let parsed = match lowered.as_str() {
            "n" => Some(Direction::North),
            "s" => Some(Direction::South),
            "e" => Some(Direction::East),
            "w" => Some(Direction::West),
            "ne" => Some(Direction::Northeast),
            "nw" => Some(Direction::Northwest),
            "se" => Some(Direction::Southeast),
            "sw" => Some(Direction::Southwest),
            "u" => Some(Direction::Up),
            "d" => Some(Direction::Down),
            "i" => Some(Direction::In),
            "o" => Some(Direction::Out),
            other => Self::ALL
                .into_iter()
                .find(|direction| direction.token().eq_ignore_ascii_case(other)),
        };
        parsed.ok_or_else(|| UnknownDirection(raw.trim().to_string()))
    }
}
