//! Turn order and move selection, including the energy-driven Rest fallback.

use crate::combatant::Combatant;
use crate::damage::compute_damage;
use crate::status::effective_speed;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

/// Energy regained by resting.
pub const REST_ENERGY: u32 = 50;

/// Moves that knock out their user. The greedy policy never proposes them.
pub const SACRIFICIAL_MOVES: [&str; 3] = ["self-destruct", "explosion", "final-gambit"];

/// Case-insensitive, and spaces count as hyphens ("Self Destruct").
pub fn is_sacrificial(name: &str) -> bool {
    let normalized = name.trim().to_ascii_lowercase().replace(' ', "-");
    SACRIFICIAL_MOVES.contains(&normalized.as_str())
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    /// Protocol identifier ("p1a" / "p2a").
    pub fn ident(self) -> &'static str {
        match self {
            Side::A => "p1a",
            Side::B => "p2a",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// Acting order for a round: faster effective speed first, side A on ties.
pub fn turn_order(a: &Combatant, b: &Combatant) -> [Side; 2] {
    if effective_speed(a) >= effective_speed(b) {
        [Side::A, Side::B]
    } else {
        [Side::B, Side::A]
    }
}

/// What a combatant does with its action once it is allowed to act.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Move(usize),
    Rest,
}

/// Picks a move for `attacker`. Returning `None`, or a move the attacker cannot
/// afford, makes it rest.
pub trait MovePolicy {
    fn choose_move(&mut self, attacker: &Combatant, defender: &Combatant) -> Option<usize>;
}

/// Resolves the policy's proposal into an action, enforcing energy.
pub fn choose_action(
    policy: &mut dyn MovePolicy,
    attacker: &Combatant,
    defender: &Combatant,
) -> Action {
    match policy.choose_move(attacker, defender) {
        Some(idx) => match attacker.moves.get(idx) {
            Some(mv) if attacker.can_afford(mv) => Action::Move(idx),
            _ => Action::Rest,
        },
        None => Action::Rest,
    }
}

/// Highest predicted damage among affordable, non-sacrificial moves; the first
/// listed wins ties.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl MovePolicy for GreedyPolicy {
    fn choose_move(&mut self, attacker: &Combatant, defender: &Combatant) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, mv) in attacker.moves.iter().enumerate() {
            if !attacker.can_afford(mv) || is_sacrificial(&mv.name) {
                continue;
            }
            let damage = compute_damage(attacker, defender, mv).damage;
            match best {
                Some((_, best_damage)) if damage <= best_damage => {}
                _ => best = Some((idx, damage)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// Always proposes the highest-power move, affordable or not.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighestPowerPolicy;

impl MovePolicy for HighestPowerPolicy {
    fn choose_move(&mut self, attacker: &Combatant, _defender: &Combatant) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, mv) in attacker.moves.iter().enumerate() {
            match best {
                Some((_, power)) if mv.power <= power => {}
                _ => best = Some((idx, mv.power)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// Uniform over the whole moveset with its own seeded generator.
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MovePolicy for RandomPolicy {
    fn choose_move(&mut self, attacker: &Combatant, _defender: &Combatant) -> Option<usize> {
        if attacker.moves.is_empty() {
            return None;
        }
        Some(self.rng.gen_range(0..attacker.moves.len()))
    }
}

/// Policy selector used by configuration and the CLI.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[default]
    Greedy,
    Power,
    Random,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn MovePolicy + Send> {
        match self {
            PolicyKind::Greedy => Box::new(GreedyPolicy),
            PolicyKind::Power => Box::new(HighestPowerPolicy),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}
