use serde::{Deserialize, Serialize};
use std::fmt;

/// A board square as a file (0 = a) and rank (0 = 1) pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Self {
        assert!(file < 8 && rank < 8, "square out of range: {} {}", file, rank);
        Self { file, rank }
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// The same file on the vertically flipped board.
    pub fn mirrored(&self) -> Self {
        Self {
            file: self.file,
            rank: 7 - self.rank,
        }
    }

    /// Parses coordinates like "f3". Panics on malformed input, intended for
    /// literals in fixtures and tests.
    pub fn parse(s: &str) -> Self {
        let mut chars = s.chars();
        let file = chars.next().expect("empty square") as i32 - 'a' as i32;
        let rank = chars.next().expect("missing rank") as i32 - '1' as i32;
        assert!((0..8).contains(&file) && (0..8).contains(&rank), "bad square: {}", s);
        Self::new(file as u8, rank as u8)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file) as char,
            (b'1' + self.rank) as char
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'Q' => Some(Promotion::Queen),
            'R' => Some(Promotion::Rook),
            'B' => Some(Promotion::Bishop),
            'N' => Some(Promotion::Knight),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum CastleSide {
    King,
    Queen,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Builds a move from coordinate literals like "g1" "f3".
    pub fn parse(from: &str, to: &str) -> Self {
        Self::new(Square::parse(from), Square::parse(to))
    }

    pub fn from(&self) -> Square {
        self.from
    }

    pub fn to(&self) -> Square {
        self.to
    }

    pub fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    pub fn set_promotion(&mut self, promotion: Promotion) {
        self.promotion = Some(promotion);
    }

    /// The same move on the vertically flipped board.
    pub fn mirrored(&self) -> Self {
        Self {
            from: self.from.mirrored(),
            to: self.to.mirrored(),
            promotion: self.promotion,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        match self.promotion {
            Some(Promotion::Queen) => write!(f, "q"),
            Some(Promotion::Rook) => write!(f, "r"),
            Some(Promotion::Bishop) => write!(f, "b"),
            Some(Promotion::Knight) => write!(f, "n"),
            None => Ok(()),
        }
    }
}

/// Outcome of a game. Set exactly once, transitions from Undecided to a
/// terminal value and is never reset.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum GameResult {
    #[default]
    Undecided,
    WhiteWon,
    BlackWon,
    Draw,
}

impl GameResult {
    pub fn is_decided(&self) -> bool {
        !matches!(self, GameResult::Undecided)
    }
}
