use engine::{Board, CastleSide, Move, PieceKind, Promotion, Square};
use thiserror::Error;

/// One recorded opening ply: the moving piece, its destination, optional
/// origin disambiguators and promotion, or a castle flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookPly {
    pub piece: PieceKind,
    pub to: Square,
    pub from_file: Option<u8>,
    pub from_rank: Option<u8>,
    pub promotion: Option<Promotion>,
    pub castle: Option<CastleSide>,
}

impl BookPly {
    pub fn new(piece: PieceKind, to: Square) -> Self {
        Self {
            piece,
            to,
            from_file: None,
            from_rank: None,
            promotion: None,
            castle: None,
        }
    }

    pub fn castle(side: CastleSide) -> Self {
        Self {
            castle: Some(side),
            ..Self::new(PieceKind::King, Square::new(4, 0))
        }
    }

    pub fn with_from_file(mut self, file: u8) -> Self {
        self.from_file = Some(file);
        self
    }

    pub fn with_from_rank(mut self, rank: u8) -> Self {
        self.from_rank = Some(rank);
        self
    }

    pub fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// Attaches a promotion recorded as its piece letter. None for a letter
    /// that names no promotable piece.
    pub fn with_promotion_letter(self, letter: char) -> Option<Self> {
        Promotion::from_letter(letter).map(|promotion| self.with_promotion(promotion))
    }
}

/// A recorded move pair; either side may be absent.
#[derive(Clone, Debug, Default)]
pub struct BookMovePair {
    pub white: Option<BookPly>,
    pub black: Option<BookPly>,
}

impl BookMovePair {
    pub fn for_side(&self, black: bool) -> Option<&BookPly> {
        if black {
            self.black.as_ref()
        } else {
            self.white.as_ref()
        }
    }
}

/// An ordered sequence of recorded move pairs from an opening book.
#[derive(Clone, Debug, Default)]
pub struct BookGame {
    pairs: Vec<BookMovePair>,
}

impl BookGame {
    pub fn new(pairs: Vec<BookMovePair>) -> Self {
        Self { pairs }
    }

    pub fn pair(&self, idx: usize) -> Option<&BookMovePair> {
        self.pairs.get(idx)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The recorded ply does not map onto any legal move. Fatal: the book data
/// does not match the position it is being replayed on.
#[derive(Error, Debug)]
#[error("no legal move matches the recorded book ply: {0:?}")]
pub struct UnresolvedBookMove(pub BookPly);

/// Maps a recorded book ply onto a concrete move in the given position.
///
/// Castling synthesizes the king move toward the rook's file directly,
/// bypassing the legality search; everything else filters the legal moves by
/// piece class, destination and origin disambiguators. When `mirror` is set
/// (resolving for the second player) each candidate is mirrored before the
/// destination comparison; the resolved move is returned without mirroring
/// it back. Ambiguous recordings resolve to the first surviving candidate.
pub fn resolve_book_move<B: Board>(
    ply: &BookPly,
    board: &B,
    mirror: bool,
) -> Result<Move, UnresolvedBookMove> {
    if let Some(side) = ply.castle {
        let to_file = match side {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        };
        let rank = if mirror { 7 } else { 0 };
        return Ok(Move::new(Square::new(4, rank), Square::new(to_file, rank)));
    }

    for mut mv in board.legal_moves() {
        // Piece membership is tested in the board's own frame, before the
        // candidate is mirrored.
        let piece_matches = board.has_piece(ply.piece, mv.from());

        if mirror {
            mv = mv.mirrored();
        }

        if mv.to() != ply.to || !piece_matches {
            continue;
        }

        if let Some(file) = ply.from_file {
            if mv.from().file() != file {
                continue;
            }
        }

        if let Some(rank) = ply.from_rank {
            if mv.from().rank() != rank {
                continue;
            }
        }

        if let Some(promotion) = ply.promotion {
            mv.set_promotion(promotion);
        }

        return Ok(mv);
    }

    Err(UnresolvedBookMove(ply.clone()))
}
