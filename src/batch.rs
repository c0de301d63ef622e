//! Many seeded battles in parallel, summarized as win/loss/draw counts.

use crate::battle::{simulate_battle_with_options, Outcome, SimulationOptions};
use crate::combatant::Combatant;
use crate::error::BattleError;
use crate::scheduler::Side;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BatchSummary {
    pub battles: u64,
    pub a_wins: u64,
    pub b_wins: u64,
    pub draws: u64,
}

impl BatchSummary {
    /// Side A's score with draws counted as half a win.
    pub fn a_win_rate(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        (self.a_wins as f64 + 0.5 * self.draws as f64) / self.battles as f64
    }

    fn record(&mut self, outcome: &Outcome) {
        self.battles += 1;
        match outcome.winner() {
            Some(Side::A) => self.a_wins += 1,
            Some(Side::B) => self.b_wins += 1,
            None => self.draws += 1,
        }
    }
}

/// Seeds for `count` battles, derived from `seed` up front so results do not
/// depend on how rayon schedules the work.
pub fn battle_seeds(seed: u64, count: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen()).collect()
}

/// Runs `count` independent battles in parallel and tallies the outcomes.
pub fn simulate_many(
    a: &Combatant,
    b: &Combatant,
    count: usize,
    seed: u64,
    options: &SimulationOptions,
) -> Result<BatchSummary, BattleError> {
    let seeds = battle_seeds(seed, count);
    let outcomes: Vec<Outcome> = seeds
        .par_iter()
        .map(|battle_seed| simulate_battle_with_options(a, b, *battle_seed, options).map(|r| r.outcome))
        .collect::<Result<_, _>>()?;
    let mut summary = BatchSummary::default();
    for outcome in &outcomes {
        summary.record(outcome);
    }
    tracing::info!(
        battles = summary.battles,
        a_wins = summary.a_wins,
        b_wins = summary.b_wins,
        draws = summary.draws,
        "batch finished"
    );
    Ok(summary)
}
