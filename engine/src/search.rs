use std::sync::Arc;

use crate::chess::Move;
use crate::stoppers::StopperChain;
use crate::tree::NodeTree;

#[derive(Clone, Debug, PartialEq)]
pub struct BestMoveInfo {
    pub mv: Move,
    pub ponder: Option<Move>,
}

#[derive(Clone, Debug, Default)]
pub struct SearchInfo {
    pub depth: u32,
    pub visits: u64,
    pub score: f32,
    pub pv: Vec<Move>,
}

/// Protocol-neutral sink for search output.
pub trait SearchResponder: Send {
    fn best_move(&self, best: &BestMoveInfo);
    fn info(&self, info: &SearchInfo);
}

/// Search engine collaborator contract. A search is created against a tree,
/// runs to completion as a blocking call on its own worker pool, and can be
/// cancelled from any thread.
pub trait Search: Send + Sync {
    /// Runs the search until a stopper fires or the search is cancelled.
    fn run_blocking(&self, threads: usize);

    /// The currently preferred move plus an auxiliary ponder move.
    fn best_move(&self) -> (Move, Option<Move>);

    /// Win and draw expectation of the best line, from the side to move.
    fn best_eval(&self) -> (f32, f32);

    fn total_playouts(&self) -> u64;

    /// Discards the current recommendation so the search can offer the next
    /// candidate.
    fn reset_best_move(&self);

    fn abort(&self);
}

/// Per-side handle that starts searches. The factory owns the network; the
/// cache and tablebase handles are opaque to the harness and passed through.
pub trait SearchFactory {
    type Tree: NodeTree;
    type Search: Search + 'static;
    type Cache;
    type Tablebase;

    fn search(
        &self,
        tree: Self::Tree,
        responder: Box<dyn SearchResponder>,
        stoppers: StopperChain,
        cache: &Self::Cache,
        tablebase: Option<&Self::Tablebase>,
    ) -> Arc<Self::Search>;

    /// Layers stop conditions intrinsic to the engine on top of the caller's
    /// limits.
    fn populate_intrinsic_stoppers(&self, _chain: &mut StopperChain) {}
}
