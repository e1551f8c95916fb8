use engine::GameResult;

/// Win/draw/loss expectations of the best line from the side to move,
/// derived from the search's (q, d) pair.
#[derive(Clone, Copy, Debug)]
pub struct WdlEval {
    pub win: f32,
    pub draw: f32,
    pub loss: f32,
}

impl WdlEval {
    pub fn from_q_d(q: f32, d: f32) -> Self {
        let win = (q + 1.0 - d) / 2.0;
        Self {
            win,
            draw: d,
            loss: win - q,
        }
    }

    /// The win expectation mapped onto [0, 1].
    pub fn normalized(&self) -> f32 {
        (self.win - self.loss + 1.0) / 2.0
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ResignStyle {
    /// Resign (or adjudicate) when any outcome probability rises above
    /// 1 minus the fraction.
    Wdl { fraction: f32 },
    /// Resign when the normalized win expectation drops strictly below the
    /// fraction. A fraction of zero never triggers.
    SimpleEval { fraction: f32 },
}

/// Pure resignation verdict: which outcome, if any, the evaluation crossing
/// its threshold records for the side to move. Wdl checks win, then loss,
/// then draw; the first crossing wins.
pub fn resign_verdict(
    style: ResignStyle,
    eval: WdlEval,
    black_to_move: bool,
) -> Option<GameResult> {
    match style {
        ResignStyle::Wdl { fraction } => {
            let threshold = 1.0 - fraction;
            if eval.win > threshold {
                Some(if black_to_move {
                    GameResult::BlackWon
                } else {
                    GameResult::WhiteWon
                })
            } else if eval.loss > threshold {
                Some(if black_to_move {
                    GameResult::WhiteWon
                } else {
                    GameResult::BlackWon
                })
            } else if eval.draw > threshold {
                Some(GameResult::Draw)
            } else {
                None
            }
        }
        ResignStyle::SimpleEval { fraction } => {
            // Strict comparison keeps a zero fraction from ever firing.
            if eval.normalized() < fraction {
                Some(if black_to_move {
                    GameResult::WhiteWon
                } else {
                    GameResult::BlackWon
                })
            } else {
                None
            }
        }
    }
}

/// Per-side running evaluation extremes, used only for post-game
/// diagnostics. The min slots track the normalized eval per side; the max
/// slots track [white's winning chance, draw chance, black's winning
/// chance] across the whole game.
#[derive(Clone, Debug)]
pub struct EvalExtremes {
    min_eval: [f32; 2],
    max_eval: [f32; 3],
}

impl Default for EvalExtremes {
    fn default() -> Self {
        Self {
            min_eval: [1.0, 1.0],
            max_eval: [0.0, 0.0, 0.0],
        }
    }
}

impl EvalExtremes {
    pub fn update(&mut self, q: f32, d: f32, black_to_move: bool) {
        let eval = WdlEval::from_q_d(q, d);

        let normalized = (q + 1.0) / 2.0;
        let side = black_to_move as usize;
        if normalized < self.min_eval[side] {
            self.min_eval[side] = normalized;
        }

        let (white_wins, black_wins) = if black_to_move {
            (eval.loss, eval.win)
        } else {
            (eval.win, eval.loss)
        };
        self.max_eval[0] = self.max_eval[0].max(white_wins);
        self.max_eval[1] = self.max_eval[1].max(eval.draw);
        self.max_eval[2] = self.max_eval[2].max(black_wins);
    }

    /// The worst evaluation seen for the eventual winner, or for either side
    /// on a draw.
    pub fn worst_for_winner_or_draw(&self, wdl_style: bool, result: GameResult) -> f32 {
        if wdl_style {
            return match result {
                GameResult::WhiteWon => self.max_eval[1].max(self.max_eval[2]),
                GameResult::BlackWon => self.max_eval[1].max(self.max_eval[0]),
                _ => self.max_eval[0].max(self.max_eval[2]),
            };
        }

        match result {
            GameResult::WhiteWon => self.min_eval[0],
            GameResult::BlackWon => self.min_eval[1],
            _ => self.min_eval[0].min(self.min_eval[1]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn zero_fraction_never_resigns_in_either_style() {
        let hopeless = WdlEval::from_q_d(-0.999, 0.0);
        let desperate = [
            hopeless,
            WdlEval::from_q_d(-1.0, 0.0),
            WdlEval::from_q_d(0.0, 1.0),
            WdlEval::from_q_d(1.0, 0.0),
        ];

        for eval in desperate {
            for black in [false, true] {
                assert_eq!(
                    resign_verdict(ResignStyle::SimpleEval { fraction: 0.0 }, eval, black),
                    None
                );
                assert_eq!(
                    resign_verdict(ResignStyle::Wdl { fraction: 0.0 }, eval, black),
                    None
                );
            }
        }
    }

    #[test]
    fn simple_eval_resigns_for_the_opponent() {
        let eval = WdlEval::from_q_d(-0.95, 0.0);
        assert_eq!(
            resign_verdict(ResignStyle::SimpleEval { fraction: 0.1 }, eval, false),
            Some(GameResult::BlackWon)
        );
        assert_eq!(
            resign_verdict(ResignStyle::SimpleEval { fraction: 0.1 }, eval, true),
            Some(GameResult::WhiteWon)
        );
    }

    #[test]
    fn wdl_checks_win_before_loss_before_draw() {
        // Every branch is above threshold; win must take priority.
        let eval = WdlEval {
            win: 0.99,
            draw: 0.98,
            loss: 0.97,
        };
        assert_eq!(
            resign_verdict(ResignStyle::Wdl { fraction: 0.05 }, eval, false),
            Some(GameResult::WhiteWon)
        );
        assert_eq!(
            resign_verdict(ResignStyle::Wdl { fraction: 0.05 }, eval, true),
            Some(GameResult::BlackWon)
        );

        let losing = WdlEval {
            win: 0.0,
            draw: 0.98,
            loss: 0.99,
        };
        assert_eq!(
            resign_verdict(ResignStyle::Wdl { fraction: 0.05 }, losing, false),
            Some(GameResult::BlackWon)
        );

        let drawn = WdlEval {
            win: 0.01,
            draw: 0.98,
            loss: 0.01,
        };
        assert_eq!(
            resign_verdict(ResignStyle::Wdl { fraction: 0.05 }, drawn, false),
            Some(GameResult::Draw)
        );
    }

    #[test]
    fn wdl_below_every_threshold_plays_on() {
        let eval = WdlEval {
            win: 0.5,
            draw: 0.2,
            loss: 0.3,
        };
        assert_eq!(
            resign_verdict(ResignStyle::Wdl { fraction: 0.05 }, eval, false),
            None
        );
    }

    #[test]
    fn extremes_track_both_sides() {
        let mut extremes = EvalExtremes::default();

        // White confident, then black collapsing.
        extremes.update(0.8, 0.1, false);
        extremes.update(-0.8, 0.1, true);

        // White won; worst normalized eval seen for white.
        assert_approx_eq!(
            extremes.worst_for_winner_or_draw(false, engine::GameResult::WhiteWon),
            0.9
        );

        // Wdl style: max of draw chance and black's winning chance.
        let white_eval = WdlEval::from_q_d(0.8, 0.1);
        assert_approx_eq!(
            extremes.worst_for_winner_or_draw(true, engine::GameResult::WhiteWon),
            white_eval.loss.max(0.1)
        );
    }
}
