pub mod book;
pub mod cancel;
pub mod game;
pub mod options;
pub mod persistance;
pub mod resign;
pub mod responder;
pub mod training;
pub mod tree_pair;

pub use book::*;
pub use cancel::*;
pub use game::*;
pub use options::*;
pub use persistance::*;
pub use resign::*;
pub use responder::*;
pub use training::*;
pub use tree_pair::*;
