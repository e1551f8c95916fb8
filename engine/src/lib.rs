pub mod board;
pub mod chess;
pub mod scripted;
pub mod search;
pub mod stoppers;
pub mod tree;

pub use crate::board::*;
pub use crate::chess::*;
pub use crate::search::*;
pub use crate::stoppers::*;
pub use crate::tree::*;
