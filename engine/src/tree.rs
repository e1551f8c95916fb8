use crate::board::Board;
use crate::chess::{GameResult, Move};

/// Game tree collaborator contract. Implementations are handles to a shared
/// underlying tree: cloning a handle aliases the same tree, and all methods
/// take `&self` with interior mutability.
///
/// The tree holds the move sequence from a fixed starting position plus the
/// accumulated search statistics, with a head at the current actual game
/// position.
pub trait NodeTree: Clone {
    type Board: Board + Send + 'static;
    type History: Clone;

    /// Resets to the given position, discarding all prior state.
    fn reset_to_position(&self, fen: &str, moves: &[Move]);

    /// Appends a move and advances the head.
    fn make_move(&self, mv: Move);

    /// Discards search statistics below the head while keeping history.
    fn trim_at_head(&self);

    /// Number of plies played from the starting position to the head.
    fn ply_count(&self) -> usize;

    fn is_black_to_move(&self) -> bool;

    fn head_board(&self) -> Self::Board;

    fn starting_board(&self) -> Self::Board;

    /// Computes the game result from the position history at the head.
    fn compute_game_result(&self) -> GameResult;

    /// The game result of the position reached by hypothetically playing the
    /// move at the head, without mutating the tree.
    fn result_after(&self, mv: Move) -> GameResult;

    /// Visit counts of every legal reply from the head.
    fn edge_visits(&self) -> Vec<(Move, u32)>;

    /// The applied move sequence, starting position first.
    fn moves_from_start(&self) -> Vec<Move>;

    /// Opaque position-history snapshot for training records.
    fn history(&self) -> Self::History;
}
