//! Damage resolution. Pure functions of attacker, defender and move.

use crate::combatant::{Combatant, Move};
use crate::status::effective_attack;
use crate::types::type_effectiveness;
use serde::Serialize;

/// Constant added to the defending stat. Fixed: never exposed as an option.
pub const DEFENSE_OFFSET: u32 = 50;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    Immune,
    NotVeryEffective,
    Neutral,
    SuperEffective,
}

impl Effectiveness {
    pub fn from_multiplier(multiplier: f32) -> Self {
        if multiplier == 0.0 {
            Effectiveness::Immune
        } else if multiplier < 1.0 {
            Effectiveness::NotVeryEffective
        } else if multiplier > 1.0 {
            Effectiveness::SuperEffective
        } else {
            Effectiveness::Neutral
        }
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            Effectiveness::Immune => Some("It had no effect..."),
            Effectiveness::NotVeryEffective => Some("It's not very effective..."),
            Effectiveness::SuperEffective => Some("It's super effective!"),
            Effectiveness::Neutral => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageOutcome {
    pub damage: u32,
    pub multiplier: f32,
    pub effectiveness: Effectiveness,
}

/// Damage `move_def` would deal if `attacker` used it on `defender`. Pure.
pub fn compute_damage(attacker: &Combatant, defender: &Combatant, move_def: &Move) -> DamageOutcome {
    let multiplier = type_effectiveness(move_def.move_type, defender.types.0, defender.types.1);
    let effectiveness = Effectiveness::from_multiplier(multiplier);
    if move_def.power == 0 {
        return DamageOutcome {
            damage: 0,
            multiplier,
            effectiveness,
        };
    }
    let (offense, defense) = if move_def.is_physical() {
        (effective_attack(attacker), defender.stats.defense)
    } else {
        (attacker.stats.special_attack, defender.stats.special_defense)
    };
    DamageOutcome {
        damage: calculate_damage(move_def.power, offense, defense, multiplier),
        multiplier,
        effectiveness,
    }
}

/// `floor(power * offense / (defense + 50) * multiplier)`, at least 1 unless immune.
pub fn calculate_damage(power: u32, offense: u32, defense: u32, multiplier: f32) -> u32 {
    if multiplier <= 0.0 || power == 0 {
        return 0;
    }
    // Multipliers are powers of two, so only the division can round.
    let raw = (power as f64 * offense as f64) / (defense as f64 + DEFENSE_OFFSET as f64);
    let scaled = (raw * multiplier as f64).floor();
    (scaled as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{BaseStats, Status};
    use crate::types::Type;

    fn mon(types: (Type, Option<Type>), attack: u32, defense: u32) -> Combatant {
        Combatant::new(
            "Dummy",
            types,
            BaseStats {
                hp: 100,
                attack,
                defense,
                special_attack: attack,
                special_defense: defense,
                speed: 50,
            },
            Vec::new(),
        )
    }

    #[test]
    fn matches_hand_computed_value() {
        // 40 * (100 / 100) * 2
        assert_eq!(calculate_damage(40, 100, 50, 2.0), 80);
        // 90 * (120 / 150) = 72, resisted -> 36
        assert_eq!(calculate_damage(90, 120, 100, 0.5), 36);
    }

    #[test]
    fn minimum_one_unless_immune() {
        assert_eq!(calculate_damage(1, 1, 500, 0.25), 1);
        assert_eq!(calculate_damage(250, 500, 1, 0.0), 0);
    }

    #[test]
    fn immune_defender_takes_nothing() {
        let attacker = mon((Type::Electric, None), 200, 50);
        let defender = mon((Type::Ground, Some(Type::Water)), 50, 1);
        let bolt = Move::new("Thunderbolt", Type::Electric, 90);
        let outcome = compute_damage(&attacker, &defender, &bolt);
        assert_eq!(outcome.damage, 0);
        assert_eq!(outcome.effectiveness, Effectiveness::Immune);
    }

    #[test]
    fn monotone_in_offense_and_defense() {
        let mut last = 0;
        for offense in (10..400).step_by(7) {
            let dmg = calculate_damage(70, offense, 80, 1.0);
            assert!(dmg >= last);
            last = dmg;
        }
        let mut last = u32::MAX;
        for defense in (10..400).step_by(7) {
            let dmg = calculate_damage(70, 150, defense, 2.0);
            assert!(dmg <= last);
            last = dmg;
        }
    }

    #[test]
    fn burn_halves_physical_attack_only() {
        let mut attacker = mon((Type::Normal, None), 100, 50);
        let defender = mon((Type::Normal, None), 50, 50);
        let tackle = Move::new("Tackle", Type::Normal, 40);
        let swift = Move::new("Swift", Type::Normal, 40).with_category(crate::model::MoveCategory::Special);
        let healthy = compute_damage(&attacker, &defender, &tackle).damage;
        attacker.status = Status::Burned;
        assert_eq!(compute_damage(&attacker, &defender, &tackle).damage, healthy / 2);
        assert_eq!(compute_damage(&attacker, &defender, &swift).damage, healthy);
    }
}
