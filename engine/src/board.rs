use crate::chess::{Move, PieceKind};
use crate::Square;

/// Board collaborator contract. A board is a single position from the side
/// to move's perspective; legality, piece placement and castling encoding
/// are owned by the implementation.
pub trait Board: Clone {
    /// All legal moves in this position, in the board's own frame.
    fn legal_moves(&self) -> Vec<Move>;

    /// Whether the side to move has a piece of the given class on the square.
    fn has_piece(&self, piece: PieceKind, square: Square) -> bool;

    fn is_black_to_move(&self) -> bool;

    /// Converts a king-takes-rook castling encoding into the legacy
    /// two-square king move. Non-castling moves pass through unchanged.
    fn to_legacy_move(&self, mv: Move) -> Move;

    /// The position after playing the move.
    fn play(&self, mv: Move) -> Self;
}
