use std::sync::Arc;

use engine::{BestMoveInfo, Board, Move, SearchInfo, SearchResponder};

pub type BestMoveCallback = Arc<dyn Fn(&BestMoveInfo) + Send + Sync>;
pub type InfoCallback = Arc<dyn Fn(&SearchInfo) + Send + Sync>;
pub type DiscardedCallback = Arc<dyn Fn(&[Move]) + Send + Sync>;

/// Forwards search output to plain callbacks.
pub struct CallbackResponder {
    best_move: BestMoveCallback,
    info: InfoCallback,
}

impl CallbackResponder {
    pub fn new(best_move: BestMoveCallback, info: InfoCallback) -> Self {
        Self { best_move, info }
    }
}

impl SearchResponder for CallbackResponder {
    fn best_move(&self, best: &BestMoveInfo) {
        (self.best_move)(best);
    }

    fn info(&self, info: &SearchInfo) {
        (self.info)(info);
    }
}

/// Rewrites king-takes-rook castling encodings into the legacy two-square
/// king move before forwarding, using the castling representation of the
/// position the search ran on.
pub struct CastlingNormalizer<B> {
    inner: Box<dyn SearchResponder>,
    board: B,
}

impl<B: Board + Send> CastlingNormalizer<B> {
    pub fn new(inner: Box<dyn SearchResponder>, board: B) -> Self {
        Self { inner, board }
    }
}

impl<B: Board + Send> SearchResponder for CastlingNormalizer<B> {
    fn best_move(&self, best: &BestMoveInfo) {
        let mapped = BestMoveInfo {
            mv: self.board.to_legacy_move(best.mv),
            ponder: best.ponder.map(|mv| self.board.to_legacy_move(mv)),
        };
        self.inner.best_move(&mapped);
    }

    fn info(&self, info: &SearchInfo) {
        let mapped = SearchInfo {
            pv: info
                .pv
                .iter()
                .map(|mv| self.board.to_legacy_move(*mv))
                .collect(),
            ..info.clone()
        };
        self.inner.info(&mapped);
    }
}
