use anyhow::{bail, Result};
use engine::GameResult;
use serde::{Deserialize, Serialize};

/// One training example per played ply. Created with the result pending and
/// backfilled exactly once when the game is over.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainingExample<H> {
    history: H,
    best_q: f32,
    best_d: f32,
    side_to_move_black: bool,
    result: Option<i8>,
}

impl<H> TrainingExample<H> {
    pub fn undecided(history: H, best_q: f32, best_d: f32, side_to_move_black: bool) -> Self {
        Self {
            history,
            best_q,
            best_d,
            side_to_move_black,
            result: None,
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn best_q(&self) -> f32 {
        self.best_q
    }

    pub fn best_d(&self) -> f32 {
        self.best_d
    }

    pub fn side_to_move_black(&self) -> bool {
        self.side_to_move_black
    }

    /// +1 for a win, -1 for a loss, 0 for a draw, from the perspective of
    /// the recorded side to move. None while the game is undecided.
    pub fn result(&self) -> Option<i8> {
        self.result
    }
}

/// Persistence collaborator for finished training examples.
pub trait TrainingDataWriter<H> {
    fn write(&mut self, example: &TrainingExample<H>) -> Result<()>;
}

/// Backfills the final outcome into every provisional example, in play
/// order, and hands each to the writer. The assigned result depends only on
/// the outcome and each example's own side to move.
pub fn backfill_and_write<H, W>(
    examples: &[TrainingExample<H>],
    outcome: GameResult,
    writer: &mut W,
) -> Result<()>
where
    H: Clone,
    W: TrainingDataWriter<H>,
{
    for example in examples {
        let result = match outcome {
            GameResult::WhiteWon => {
                if example.side_to_move_black {
                    -1
                } else {
                    1
                }
            }
            GameResult::BlackWon => {
                if example.side_to_move_black {
                    1
                } else {
                    -1
                }
            }
            GameResult::Draw => 0,
            GameResult::Undecided => bail!("cannot backfill an undecided game"),
        };

        let mut finished = example.clone();
        finished.result = Some(result);
        writer.write(&finished)?;
    }

    Ok(())
}
