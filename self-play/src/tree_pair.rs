use engine::{Move, NodeTree};
use rand::seq::SliceRandom;
use rand::thread_rng;

/// One or two game trees kept in lockstep: the two sides either search the
/// same underlying tree or each own an independent one. Routing every move
/// through [`GameTreePair::apply_move`] guarantees each tree receives each
/// move exactly once.
pub enum GameTreePair<T: NodeTree> {
    Shared(T),
    Independent([T; 2]),
}

impl<T: NodeTree> GameTreePair<T> {
    pub fn new(shared: bool, start_fen: &str, opening: &[Move]) -> Self
    where
        T: Default,
    {
        let make = || {
            let tree = T::default();
            tree.reset_to_position(start_fen, &[]);
            tree
        };

        let pair = if shared {
            GameTreePair::Shared(make())
        } else {
            GameTreePair::Independent([make(), make()])
        };

        for mv in opening {
            pair.apply_move(*mv);
        }

        pair
    }

    /// The tree the given side searches on.
    pub fn tree(&self, side: usize) -> &T {
        match self {
            GameTreePair::Shared(tree) => tree,
            GameTreePair::Independent(trees) => &trees[side],
        }
    }

    /// The canonical view of the game; both views always hold the same move
    /// sequence.
    pub fn canonical(&self) -> &T {
        self.tree(0)
    }

    /// Applies a move to every tracked tree, exactly once each.
    pub fn apply_move(&self, mv: Move) {
        match self {
            GameTreePair::Shared(tree) => tree.make_move(mv),
            GameTreePair::Independent(trees) => {
                trees[0].make_move(mv);
                trees[1].make_move(mv);
            }
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, GameTreePair::Shared(_))
    }
}

/// A starting position with each side's back rank shuffled. Both sides keep
/// the full piece set, so material stays balanced.
pub fn random_backrank_fen() -> String {
    let mut rng = thread_rng();

    let mut black: Vec<u8> = b"rnbqkbnr".to_vec();
    let mut white: Vec<u8> = b"RNBQKBNR".to_vec();
    black.shuffle(&mut rng);
    white.shuffle(&mut rng);

    format!(
        "{}/pppppppp/8/8/8/8/PPPPPPPP/{} w - - 0 1",
        String::from_utf8(black).unwrap(),
        String::from_utf8(white).unwrap()
    )
}
