use std::sync::Arc;

use anyhow::{ensure, Result};
use log::{info, warn};

use engine::{
    Board, GameResult, Move, NodeTree, Search, SearchFactory, SearchResponder,
};

use crate::book::{resolve_book_move, BookGame};
use crate::cancel::CancelToken;
use crate::options::{PlayerSettings, SearchLimits};
use crate::resign::{resign_verdict, EvalExtremes, ResignStyle, WdlEval};
use crate::responder::{
    BestMoveCallback, CallbackResponder, CastlingNormalizer, DiscardedCallback, InfoCallback,
};
use crate::training::{backfill_and_write, TrainingDataWriter, TrainingExample};
use crate::tree_pair::{random_backrank_fen, GameTreePair};

/// Safety bound on the minimum-visit refinement loop; the search promises no
/// hard progress guarantee, so refinement gives up and accepts the current
/// recommendation after this many discards.
const MAX_MOVE_REFINEMENTS: usize = 256;

type HistoryOf<F> = <<F as SearchFactory>::Tree as NodeTree>::History;

/// Per-side configuration for one self-play game.
pub struct PlayerOptions<F: SearchFactory> {
    pub factory: F,
    pub cache: F::Cache,
    pub limits: SearchLimits,
    pub settings: PlayerSettings,
    pub best_move_callback: BestMoveCallback,
    pub info_callback: InfoCallback,
    pub discarded_callback: DiscardedCallback,
}

/// Drives one game of self play: runs a search per ply under the side's
/// limits, substitutes book moves where the opening provides them, applies
/// the minimum-visit retry and resignation policies, and records training
/// examples. Abortable from any thread through the cancellation token.
pub struct SelfPlayGame<F: SearchFactory> {
    options: [PlayerOptions<F>; 2],
    trees: GameTreePair<F::Tree>,
    token: Arc<CancelToken>,
    game_result: GameResult,
    extremes: EvalExtremes,
    training_data: Vec<TrainingExample<HistoryOf<F>>>,
    move_count: usize,
    nodes_total: u64,
    alternate_castling: bool,
}

impl<F: SearchFactory> SelfPlayGame<F>
where
    F::Tree: Default,
{
    pub fn new(
        player1: PlayerOptions<F>,
        player2: PlayerOptions<F>,
        shared_tree: bool,
        opening: &[Move],
    ) -> Self {
        let alternate_castling =
            player1.settings.alternate_castling || player2.settings.alternate_castling;
        let trees = GameTreePair::new(shared_tree, &random_backrank_fen(), opening);

        Self {
            options: [player1, player2],
            trees,
            token: Arc::new(CancelToken::new()),
            game_result: GameResult::Undecided,
            extremes: EvalExtremes::default(),
            training_data: Vec::new(),
            move_count: 0,
            nodes_total: 0,
            alternate_castling,
        }
    }
}

impl<F: SearchFactory> SelfPlayGame<F> {
    /// Token for aborting the game from another thread while
    /// [`SelfPlayGame::play`] runs.
    pub fn cancel_token(&self) -> Arc<CancelToken> {
        self.token.clone()
    }

    pub fn abort(&self) {
        self.token.abort();
    }

    pub fn game_result(&self) -> GameResult {
        self.game_result
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn nodes_total(&self) -> u64 {
        self.nodes_total
    }

    pub fn trees(&self) -> &GameTreePair<F::Tree> {
        &self.trees
    }

    /// Plays the game to its end, a resignation, or an abort.
    pub fn play(
        &mut self,
        white_threads: usize,
        black_threads: usize,
        training: bool,
        enable_resign: bool,
        tablebase: Option<&F::Tablebase>,
        opening: Option<&BookGame>,
    ) -> Result<()> {
        let mut blacks_move = self.trees.canonical().ply_count() % 2 == 1;
        let mut book_idx = 0;

        while !self.token.is_aborted() {
            self.game_result = self.trees.canonical().compute_game_result();
            if self.game_result.is_decided() {
                break;
            }

            let idx = blacks_move as usize;
            let player = &self.options[idx];
            let book_ply = opening
                .and_then(|book| book.pair(book_idx))
                .and_then(|pair| pair.for_side(blacks_move))
                .cloned();

            if !player.settings.reuse_tree {
                self.trees.tree(idx).trim_at_head();
            }

            // Setup: the token re-checks the abort flag under its lock, which
            // closes the window between the result check and the search
            // starting.
            if self.token.is_aborted() {
                break;
            }
            let mut stoppers = player.limits.make_search_stopper();
            player.factory.populate_intrinsic_stoppers(&mut stoppers);

            let mut responder: Box<dyn SearchResponder> = Box::new(CallbackResponder::new(
                player.best_move_callback.clone(),
                player.info_callback.clone(),
            ));
            if !self.alternate_castling {
                responder = Box::new(CastlingNormalizer::new(
                    responder,
                    self.trees.tree(idx).head_board(),
                ));
            }

            let search = player.factory.search(
                self.trees.tree(idx).clone(),
                responder,
                stoppers,
                &player.cache,
                tablebase,
            );
            if !self.token.install(search.clone()) {
                break;
            }

            search.run_blocking(if blacks_move {
                black_threads
            } else {
                white_threads
            });
            self.token.clear();
            self.move_count += 1;
            self.nodes_total += search.total_playouts();
            if self.token.is_aborted() {
                break;
            }

            let (best_q, best_d) = search.best_eval();
            if training {
                // Provisional: the result is backfilled once the game ends.
                self.training_data.push(TrainingExample::undecided(
                    self.trees.tree(idx).history(),
                    best_q,
                    best_d,
                    blacks_move,
                ));
            }

            self.extremes.update(best_q, best_d, blacks_move);

            // Move numbering counts positions, not plies, so the start
            // position shifts black's plies up by one.
            let move_number = (self.trees.canonical().ply_count() + 1) / 2 + 1;
            if enable_resign && move_number >= player.settings.resign_earliest_move {
                let fraction = player.settings.resign_percentage / 100.0;
                let style = if player.settings.resign_wdl_style {
                    ResignStyle::Wdl { fraction }
                } else {
                    ResignStyle::SimpleEval { fraction }
                };
                if let Some(result) =
                    resign_verdict(style, WdlEval::from_q_d(best_q, best_d), blacks_move)
                {
                    self.game_result = result;
                    break;
                }
            }

            let best = self.refine_move(idx, search.as_ref());

            // The book move replaces the search's selection; the recorded
            // evaluation and training example stay the search's own.
            let chosen = match &book_ply {
                Some(ply) => resolve_book_move(
                    ply,
                    &self.trees.tree(idx).head_board(),
                    blacks_move,
                )?,
                None => best,
            };

            if blacks_move && opening.is_some_and(|book| book_idx < book.len()) {
                book_idx += 1;
            }

            self.trees.apply_move(chosen);
            blacks_move = !blacks_move;
        }

        if self.token.is_aborted() {
            info!("Game aborted after {} moves", self.move_count);
        }

        Ok(())
    }

    /// Queries the search's preferred move, discarding it while its visit
    /// count is neither the maximum among the legal replies nor at least the
    /// side's minimum allowed visits. A move whose resulting position is
    /// already decided is never discarded, regardless of visits.
    fn refine_move(&self, idx: usize, search: &F::Search) -> Move {
        let player = &self.options[idx];
        let tree = self.trees.tree(idx);

        for _ in 0..MAX_MOVE_REFINEMENTS {
            let (best, _) = search.best_move();

            let edges = tree.edge_visits();
            let max_n = edges.iter().map(|(_, n)| *n).max().unwrap_or(0);
            let cur_n = edges
                .iter()
                .find(|(mv, _)| *mv == best)
                .map(|(_, n)| *n)
                .unwrap_or(0);

            if cur_n == max_n || cur_n >= player.settings.minimum_allowed_visits {
                return best;
            }

            if tree.result_after(best).is_decided() {
                return best;
            }

            let mut discarded = self.moves();
            discarded.push(best);
            (player.discarded_callback)(&discarded);
            search.reset_best_move();
        }

        warn!(
            "Move refinement did not settle within {} discards, accepting the current recommendation",
            MAX_MOVE_REFINEMENTS
        );
        search.best_move().0
    }

    /// The played move sequence in canonical form: legacy castling encoding
    /// unless the alternate notation is active, each move from the mover's
    /// own perspective.
    pub fn moves(&self) -> Vec<Move> {
        let tree = self.trees.canonical();
        let mut board = tree.starting_board();
        let mut result = Vec::new();

        for mut mv in tree.moves_from_start() {
            if !self.alternate_castling {
                mv = board.to_legacy_move(mv);
            }
            board = board.play(mv);
            // The position has already flipped, so mirror the move when
            // white is to move next.
            if !board.is_black_to_move() {
                mv = mv.mirrored();
            }
            result.push(mv);
        }

        result
    }

    /// The worst evaluation the eventual winner saw, or either side's worst
    /// on a draw.
    // TODO: assumes both players use the same resign style; supporting
    // mixed styles would change the meaning of "worst" per side.
    pub fn worst_eval_for_winner_or_draw(&self) -> f32 {
        self.extremes
            .worst_for_winner_or_draw(self.options[0].settings.resign_wdl_style, self.game_result)
    }

    /// Backfills the final result into every recorded example and hands them
    /// to the writer in play order. Valid only once the game is decided.
    pub fn write_training_data<W>(&self, writer: &mut W) -> Result<()>
    where
        HistoryOf<F>: Clone,
        W: TrainingDataWriter<HistoryOf<F>>,
    {
        ensure!(
            self.game_result.is_decided(),
            "training data can only be written for a finished game"
        );

        backfill_and_write(&self.training_data, self.game_result, writer)
    }
}
