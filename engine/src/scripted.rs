//! Scripted implementations of the collaborator contracts, used by the
//! self-play tests. Positions, legal moves, visit counts and search
//! recommendations are all supplied up front instead of computed.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::board::Board;
use crate::chess::{GameResult, Move, PieceKind, Square};
use crate::search::{BestMoveInfo, Search, SearchFactory, SearchResponder};
use crate::stoppers::StopperChain;
use crate::tree::NodeTree;

#[derive(Clone, Debug, Default)]
pub struct ScriptedBoard {
    legal: Vec<Move>,
    pieces: Vec<(PieceKind, Square)>,
    black_to_move: bool,
    legacy: Vec<(Move, Move)>,
}

impl ScriptedBoard {
    pub fn new(black_to_move: bool) -> Self {
        Self {
            black_to_move,
            ..Self::default()
        }
    }

    /// Adds a legal move and registers the moving piece on its origin square.
    pub fn with_legal_move(mut self, piece: PieceKind, from: &str, to: &str) -> Self {
        let mv = Move::parse(from, to);
        if !self.pieces.contains(&(piece, mv.from())) {
            self.pieces.push((piece, mv.from()));
        }
        self.legal.push(mv);
        self
    }

    /// Registers a king-takes-rook to legacy castling rewrite.
    pub fn with_legacy(mut self, frc: Move, legacy: Move) -> Self {
        self.legacy.push((frc, legacy));
        self
    }

    /// The standard chess starting position, white to move: sixteen pawn
    /// moves and four knight moves.
    pub fn standard_opening() -> Self {
        let mut board = Self::new(false);
        for file in 0..8u8 {
            let from = format!("{}2", (b'a' + file) as char);
            let single = format!("{}3", (b'a' + file) as char);
            let double = format!("{}4", (b'a' + file) as char);
            board = board
                .with_legal_move(PieceKind::Pawn, &from, &single)
                .with_legal_move(PieceKind::Pawn, &from, &double);
        }
        board
            .with_legal_move(PieceKind::Knight, "b1", "a3")
            .with_legal_move(PieceKind::Knight, "b1", "c3")
            .with_legal_move(PieceKind::Knight, "g1", "f3")
            .with_legal_move(PieceKind::Knight, "g1", "h3")
    }
}

impl Board for ScriptedBoard {
    fn legal_moves(&self) -> Vec<Move> {
        self.legal.clone()
    }

    fn has_piece(&self, piece: PieceKind, square: Square) -> bool {
        self.pieces.contains(&(piece, square))
    }

    fn is_black_to_move(&self) -> bool {
        self.black_to_move
    }

    fn to_legacy_move(&self, mv: Move) -> Move {
        self.legacy
            .iter()
            .find(|(frc, _)| *frc == mv)
            .map(|(_, legacy)| *legacy)
            .unwrap_or(mv)
    }

    fn play(&self, _mv: Move) -> Self {
        Self::new(!self.black_to_move)
    }
}

/// One position of a scripted game, indexed by ply from the start.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPly {
    pub board: ScriptedBoard,
    pub result: GameResult,
    pub edge_visits: Vec<(Move, u32)>,
    pub result_after: Vec<(Move, GameResult)>,
}

impl ScriptedPly {
    pub fn new(board: ScriptedBoard) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    pub fn with_result(mut self, result: GameResult) -> Self {
        self.result = result;
        self
    }

    pub fn with_edge_visits(mut self, edge_visits: Vec<(Move, u32)>) -> Self {
        self.edge_visits = edge_visits;
        self
    }

    pub fn with_result_after(mut self, mv: Move, result: GameResult) -> Self {
        self.result_after.push((mv, result));
        self
    }
}

#[derive(Default)]
struct TreeInner {
    script: Vec<ScriptedPly>,
    moves: Vec<Move>,
    trims: usize,
    start_fen: String,
}

impl TreeInner {
    fn ply(&self, idx: usize) -> ScriptedPly {
        self.script.get(idx).cloned().unwrap_or_default()
    }
}

/// Handle to a scripted tree. Clones alias the same underlying tree.
#[derive(Clone, Default)]
pub struct ScriptedTree {
    inner: Arc<Mutex<TreeInner>>,
}

impl ScriptedTree {
    pub fn new(script: Vec<ScriptedPly>) -> Self {
        let tree = Self::default();
        tree.load_script(script);
        tree
    }

    /// Replaces the position script without touching applied moves.
    pub fn load_script(&self, script: Vec<ScriptedPly>) {
        self.inner.lock().script = script;
    }

    pub fn applied_moves(&self) -> Vec<Move> {
        self.inner.lock().moves.clone()
    }

    pub fn trim_count(&self) -> usize {
        self.inner.lock().trims
    }

    pub fn start_fen(&self) -> String {
        self.inner.lock().start_fen.clone()
    }

    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl NodeTree for ScriptedTree {
    type Board = ScriptedBoard;
    type History = Vec<Move>;

    fn reset_to_position(&self, fen: &str, moves: &[Move]) {
        let mut inner = self.inner.lock();
        inner.start_fen = fen.to_string();
        inner.moves = moves.to_vec();
        inner.trims = 0;
    }

    fn make_move(&self, mv: Move) {
        self.inner.lock().moves.push(mv);
    }

    fn trim_at_head(&self) {
        self.inner.lock().trims += 1;
    }

    fn ply_count(&self) -> usize {
        self.inner.lock().moves.len()
    }

    fn is_black_to_move(&self) -> bool {
        self.ply_count() % 2 == 1
    }

    fn head_board(&self) -> ScriptedBoard {
        let inner = self.inner.lock();
        let head = inner.moves.len();
        inner.ply(head).board
    }

    fn starting_board(&self) -> ScriptedBoard {
        self.inner.lock().ply(0).board
    }

    fn compute_game_result(&self) -> GameResult {
        let inner = self.inner.lock();
        let head = inner.moves.len();
        inner.ply(head).result
    }

    fn result_after(&self, mv: Move) -> GameResult {
        let inner = self.inner.lock();
        let head = inner.moves.len();
        inner
            .ply(head)
            .result_after
            .iter()
            .find(|(m, _)| *m == mv)
            .map(|(_, r)| *r)
            .unwrap_or(GameResult::Undecided)
    }

    fn edge_visits(&self) -> Vec<(Move, u32)> {
        let inner = self.inner.lock();
        let head = inner.moves.len();
        inner.ply(head).edge_visits
    }

    fn moves_from_start(&self) -> Vec<Move> {
        self.applied_moves()
    }

    fn history(&self) -> Vec<Move> {
        self.applied_moves()
    }
}

/// Recommendations and evaluation a single scripted search will report.
#[derive(Clone, Debug)]
pub struct SearchScript {
    /// Successive preferred moves; `reset_best_move` advances to the next.
    pub best_moves: Vec<Move>,
    /// (win expectation, draw expectation) from the side to move.
    pub eval: (f32, f32),
    pub playouts: u64,
    /// When set, `run_blocking` parks until the search is cancelled.
    pub block_until_cancelled: bool,
}

impl Default for SearchScript {
    fn default() -> Self {
        Self {
            best_moves: vec![],
            eval: (0.0, 0.0),
            playouts: 0,
            block_until_cancelled: false,
        }
    }
}

impl SearchScript {
    pub fn best(mv: Move) -> Self {
        Self {
            best_moves: vec![mv],
            ..Self::default()
        }
    }

    pub fn with_eval(mut self, q: f32, d: f32) -> Self {
        self.eval = (q, d);
        self
    }

    pub fn with_playouts(mut self, playouts: u64) -> Self {
        self.playouts = playouts;
        self
    }
}

struct SearchState {
    running: bool,
    cancelled: bool,
    best_idx: usize,
}

pub struct ScriptedSearch {
    script: SearchScript,
    state: Mutex<SearchState>,
    signal: Condvar,
    responder: Mutex<Box<dyn SearchResponder>>,
}

impl ScriptedSearch {
    fn new(script: SearchScript, responder: Box<dyn SearchResponder>) -> Self {
        Self {
            script,
            state: Mutex::new(SearchState {
                running: false,
                cancelled: false,
                best_idx: 0,
            }),
            signal: Condvar::new(),
            responder: Mutex::new(responder),
        }
    }

    pub fn was_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    /// Blocks until `run_blocking` has started, for cross-thread tests.
    pub fn wait_until_running(&self) {
        let mut state = self.state.lock();
        while !state.running {
            self.signal.wait(&mut state);
        }
    }
}

impl Search for ScriptedSearch {
    fn run_blocking(&self, _threads: usize) {
        {
            let mut state = self.state.lock();
            state.running = true;
            self.signal.notify_all();

            if self.script.block_until_cancelled {
                while !state.cancelled {
                    self.signal.wait(&mut state);
                }
                return;
            }
        }

        let (mv, ponder) = self.best_move();
        self.responder.lock().best_move(&BestMoveInfo { mv, ponder });
    }

    fn best_move(&self) -> (Move, Option<Move>) {
        let state = self.state.lock();
        let idx = state.best_idx.min(self.script.best_moves.len().saturating_sub(1));
        let mv = self
            .script
            .best_moves
            .get(idx)
            .copied()
            .expect("scripted search has no best moves");
        (mv, None)
    }

    fn best_eval(&self) -> (f32, f32) {
        self.script.eval
    }

    fn total_playouts(&self) -> u64 {
        self.script.playouts
    }

    fn reset_best_move(&self) {
        let mut state = self.state.lock();
        if state.best_idx + 1 < self.script.best_moves.len() {
            state.best_idx += 1;
        }
    }

    fn abort(&self) {
        let mut state = self.state.lock();
        state.cancelled = true;
        self.signal.notify_all();
    }
}

/// Hands out scripted searches in order, one per search started. Clones
/// share the script queue and the record of started searches, so a test can
/// keep a handle while the factory itself is moved into the harness.
#[derive(Clone, Default)]
pub struct ScriptedFactory {
    scripts: Arc<Mutex<VecDeque<SearchScript>>>,
    started: Arc<Mutex<Vec<Arc<ScriptedSearch>>>>,
}

impl ScriptedFactory {
    pub fn new(scripts: Vec<SearchScript>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.into())),
            started: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn searches_started(&self) -> usize {
        self.started.lock().len()
    }

    pub fn search_at(&self, idx: usize) -> Arc<ScriptedSearch> {
        self.started.lock()[idx].clone()
    }
}

impl SearchFactory for ScriptedFactory {
    type Tree = ScriptedTree;
    type Search = ScriptedSearch;
    type Cache = ();
    type Tablebase = ();

    fn search(
        &self,
        _tree: ScriptedTree,
        responder: Box<dyn SearchResponder>,
        _stoppers: StopperChain,
        _cache: &(),
        _tablebase: Option<&()>,
    ) -> Arc<ScriptedSearch> {
        let script = self.scripts.lock().pop_front().unwrap_or_default();
        let search = Arc::new(ScriptedSearch::new(script, responder));
        self.started.lock().push(search.clone());
        search
    }
}
