//! Persistent status conditions: infliction, action skips, end-of-round damage
//! and the stat penalties they impose.

use crate::combatant::{Combatant, Status, StatusEffect};
use crate::types::Type;
use rand::Rng;

/// Chance that a paralyzed combatant loses its action.
pub const PARALYSIS_SKIP_CHANCE: f64 = 0.25;

/// Poison deals `max_hp / POISON_DIVISOR` per round.
pub const POISON_DIVISOR: u32 = 8;
/// Burn deals `max_hp / BURN_DIVISOR` per round.
pub const BURN_DIVISOR: u32 = 16;

/// Rolls `percent` out of 100. 0 never fires and 100 always fires.
pub fn roll_chance(percent: u8, rng: &mut impl Rng) -> bool {
    let p = (percent.min(100) as f64) / 100.0;
    rng.gen_bool(p)
}

/// Whether `status` can never stick to `target` because of its types.
pub fn is_status_immune(target: &Combatant, status: Status) -> bool {
    match status {
        Status::Poisoned => target.has_type(Type::Poison) || target.has_type(Type::Steel),
        Status::Burned => target.has_type(Type::Fire),
        Status::Paralyzed => target.has_type(Type::Electric),
        Status::None => false,
    }
}

/// Rolls `effect` against `defender` and sets the status on success.
///
/// Returns the status that was applied, if any. An already afflicted defender is
/// never re-afflicted.
pub fn try_inflict(defender: &mut Combatant, effect: StatusEffect, rng: &mut impl Rng) -> Option<Status> {
    if defender.is_fainted() || !defender.status.is_none() || effect.status.is_none() {
        return None;
    }
    if is_status_immune(defender, effect.status) {
        return None;
    }
    if !roll_chance(effect.chance, rng) {
        return None;
    }
    defender.status = effect.status;
    Some(effect.status)
}

/// Start-of-action check. `false` means the combatant is fully paralyzed this round.
pub fn can_act(combatant: &Combatant, rng: &mut impl Rng) -> bool {
    if combatant.status != Status::Paralyzed {
        return true;
    }
    !rng.gen_bool(PARALYSIS_SKIP_CHANCE)
}

/// HP a status removes at the end of a round, or `None` for statuses without residual damage.
pub fn residual_damage(combatant: &Combatant) -> Option<u32> {
    let divisor = match combatant.status {
        Status::Poisoned => POISON_DIVISOR,
        Status::Burned => BURN_DIVISOR,
        Status::Paralyzed | Status::None => return None,
    };
    Some((combatant.stats.hp / divisor).max(1))
}

/// Applies the end-of-round tick and returns the HP lost.
pub fn apply_residual(combatant: &mut Combatant) -> Option<u32> {
    if combatant.is_fainted() {
        return None;
    }
    let damage = residual_damage(combatant)?;
    Some(combatant.take_damage(damage))
}

/// Speed used for turn order; paralysis halves it.
pub fn effective_speed(combatant: &Combatant) -> u32 {
    match combatant.status {
        Status::Paralyzed => combatant.stats.speed / 2,
        _ => combatant.stats.speed,
    }
}

/// Attack used by physical moves; burn halves it.
pub fn effective_attack(combatant: &Combatant) -> u32 {
    match combatant.status {
        Status::Burned => (combatant.stats.attack / 2).max(1),
        _ => combatant.stats.attack,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::BaseStats;
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn mon(ty: Type, hp: u32) -> Combatant {
        Combatant::new(
            "Dummy",
            (ty, None),
            BaseStats {
                hp,
                attack: 80,
                defense: 80,
                special_attack: 80,
                special_defense: 80,
                speed: 91,
            },
            Vec::new(),
        )
    }

    fn effect(status: Status, chance: u8) -> StatusEffect {
        StatusEffect { status, chance }
    }

    #[test]
    fn inflicts_only_on_unafflicted_targets() {
        let mut target = mon(Type::Normal, 100);
        assert_eq!(
            try_inflict(&mut target, effect(Status::Burned, 10), &mut always()),
            Some(Status::Burned)
        );
        assert_eq!(
            try_inflict(&mut target, effect(Status::Poisoned, 100), &mut always()),
            None
        );
        assert_eq!(target.status, Status::Burned);
    }

    #[test]
    fn failed_roll_leaves_status_alone() {
        let mut target = mon(Type::Normal, 100);
        assert_eq!(try_inflict(&mut target, effect(Status::Paralyzed, 99), &mut never()), None);
        assert_eq!(target.status, Status::None);
        assert_eq!(try_inflict(&mut target, effect(Status::Paralyzed, 0), &mut always()), None);
        assert_eq!(
            try_inflict(&mut target, effect(Status::Paralyzed, 100), &mut never()),
            Some(Status::Paralyzed)
        );
    }

    #[test]
    fn type_immunities_block_status() {
        let mut steel = mon(Type::Steel, 100);
        let mut fire = mon(Type::Fire, 100);
        let mut electric = mon(Type::Electric, 100);
        assert_eq!(try_inflict(&mut steel, effect(Status::Poisoned, 100), &mut always()), None);
        assert_eq!(try_inflict(&mut fire, effect(Status::Burned, 100), &mut always()), None);
        assert_eq!(try_inflict(&mut electric, effect(Status::Paralyzed, 100), &mut always()), None);
    }

    #[test]
    fn residual_damage_uses_fractions_with_floor_of_one() {
        let mut poisoned = mon(Type::Normal, 100);
        poisoned.status = Status::Poisoned;
        assert_eq!(residual_damage(&poisoned), Some(12));
        let mut burned = mon(Type::Normal, 10);
        burned.status = Status::Burned;
        assert_eq!(residual_damage(&burned), Some(1));
        let mut paralyzed = mon(Type::Normal, 100);
        paralyzed.status = Status::Paralyzed;
        assert_eq!(apply_residual(&mut paralyzed), None);
        assert_eq!(paralyzed.current_hp, 100);
    }

    #[test]
    fn fainted_combatants_do_not_tick() {
        let mut mon = mon(Type::Normal, 100);
        mon.status = Status::Poisoned;
        mon.current_hp = 0;
        assert_eq!(apply_residual(&mut mon), None);
    }

    #[test]
    fn paralysis_halves_speed_and_sometimes_skips() {
        let mut mon = mon(Type::Normal, 100);
        assert_eq!(effective_speed(&mon), 91);
        assert!(can_act(&mon, &mut always()));
        mon.status = Status::Paralyzed;
        assert_eq!(effective_speed(&mon), 45);
        assert!(!can_act(&mon, &mut always()));
        assert!(can_act(&mon, &mut never()));

        let mut rng = SmallRng::seed_from_u64(11);
        let skipped = (0..4000).filter(|_| !can_act(&mon, &mut rng)).count();
        let rate = skipped as f64 / 4000.0;
        assert!((rate - 0.25).abs() < 0.05, "skip rate {rate}");
    }
}
