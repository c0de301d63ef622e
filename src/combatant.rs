//! Validated combatants: immutable base definition plus mutable battle state.

use crate::error::ValidationError;
use crate::model::{CombatantSpec, MoveCategory, MoveSpec, Stats, StatusKind};
use crate::types::Type;
use serde::Serialize;
use std::fmt;

pub const MAX_ENERGY: u32 = 100;
pub const MAX_MOVES: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    None,
    Poisoned,
    Burned,
    Paralyzed,
}

impl Status {
    pub fn from_kind(kind: StatusKind) -> Self {
        match kind {
            StatusKind::Poison => Status::Poisoned,
            StatusKind::Burn => Status::Burned,
            StatusKind::Paralysis => Status::Paralyzed,
        }
    }

    pub fn is_none(self) -> bool {
        self == Status::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::None => "none",
            Status::Poisoned => "poisoned",
            Status::Burned => "burned",
            Status::Paralyzed => "paralyzed",
        }
    }

    /// Short protocol form ("psn", "brn", "par").
    pub fn to_protocol(self) -> &'static str {
        match self {
            Status::None => "",
            Status::Poisoned => "psn",
            Status::Burned => "brn",
            Status::Paralyzed => "par",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct StatusEffect {
    pub status: Status,
    pub chance: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Move {
    pub name: String,
    pub move_type: Type,
    pub power: u32,
    pub energy_cost: u32,
    pub category: MoveCategory,
    pub effect: Option<StatusEffect>,
}

impl Move {
    /// Builds a move with cost, category and status effect derived from power and type.
    pub fn new(name: impl Into<String>, move_type: Type, power: u32) -> Self {
        Self {
            name: name.into(),
            move_type,
            power,
            energy_cost: default_energy_cost(power),
            category: default_category(move_type),
            effect: default_effect(move_type),
        }
    }

    pub fn with_cost(mut self, energy_cost: u32) -> Self {
        self.energy_cost = energy_cost;
        self
    }

    pub fn with_category(mut self, category: MoveCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_effect(mut self, effect: Option<StatusEffect>) -> Self {
        self.effect = effect;
        self
    }

    pub fn is_physical(&self) -> bool {
        self.category == MoveCategory::Physical
    }

    fn from_spec(owner: &str, spec: &MoveSpec) -> Result<Self, ValidationError> {
        if spec.name.trim().is_empty() {
            return Err(ValidationError::EmptyMoveName {
                combatant: owner.to_string(),
            });
        }
        let move_type = Type::parse(&spec.move_type).ok_or_else(|| ValidationError::UnknownType {
            combatant: owner.to_string(),
            name: spec.move_type.clone(),
        })?;
        let effect = match (&spec.effect, spec.no_effect) {
            (_, true) => None,
            (Some(effect), false) => {
                if effect.chance > 100 {
                    return Err(ValidationError::ChanceOutOfRange {
                        combatant: owner.to_string(),
                        mv: spec.name.clone(),
                        chance: effect.chance,
                    });
                }
                Some(StatusEffect {
                    status: Status::from_kind(effect.status),
                    chance: effect.chance as u8,
                })
            }
            (None, false) => default_effect(move_type),
        };
        Ok(Self {
            name: spec.name.clone(),
            move_type,
            power: spec.power,
            energy_cost: spec
                .energy_cost
                .unwrap_or_else(|| default_energy_cost(spec.power)),
            category: spec.category.unwrap_or_else(|| default_category(move_type)),
            effect,
        })
    }
}

/// Cost tiers by power, used when the input gives no explicit cost.
pub fn default_energy_cost(power: u32) -> u32 {
    match power {
        0..=39 => 10,
        40..=69 => 20,
        70..=99 => 30,
        _ => 40,
    }
}

pub fn default_category(move_type: Type) -> MoveCategory {
    if move_type.is_physical() {
        MoveCategory::Physical
    } else {
        MoveCategory::Special
    }
}

pub fn default_effect(move_type: Type) -> Option<StatusEffect> {
    let (status, chance) = match move_type {
        Type::Poison => (Status::Poisoned, 30),
        Type::Fire => (Status::Burned, 10),
        Type::Electric => (Status::Paralyzed, 10),
        _ => return None,
    };
    Some(StatusEffect { status, chance })
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl BaseStats {
    fn from_spec(owner: &str, stats: &Stats) -> Result<Self, ValidationError> {
        let base = Self {
            hp: stats.hp,
            attack: stats.attack,
            defense: stats.defense,
            special_attack: stats.special_attack,
            special_defense: stats.special_defense,
            speed: stats.speed,
        };
        base.validate(owner)?;
        Ok(base)
    }

    /// Every stat must be positive.
    pub fn validate(&self, owner: &str) -> Result<(), ValidationError> {
        let checks = [
            ("hp", self.hp),
            ("attack", self.attack),
            ("defense", self.defense),
            ("special_attack", self.special_attack),
            ("special_defense", self.special_defense),
            ("speed", self.speed),
        ];
        match checks.iter().find(|(_, value)| *value == 0) {
            Some((stat, _)) => Err(ValidationError::ZeroStat {
                combatant: owner.to_string(),
                stat: *stat,
            }),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Combatant {
    pub name: String,
    pub types: (Type, Option<Type>),
    pub stats: BaseStats,
    pub moves: Vec<Move>,
    pub current_hp: u32,
    pub energy: u32,
    pub status: Status,
}

impl Combatant {
    /// Validates `spec` and builds a combatant at full HP and energy.
    pub fn from_spec(spec: &CombatantSpec) -> Result<Self, ValidationError> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let types = parse_types(name, &spec.types)?;
        let stats = BaseStats::from_spec(name, &spec.stats)?;
        if spec.moves.len() > MAX_MOVES {
            return Err(ValidationError::TooManyMoves {
                combatant: name.to_string(),
                max: MAX_MOVES,
                count: spec.moves.len(),
            });
        }
        let moves = spec
            .moves
            .iter()
            .map(|m| Move::from_spec(name, m))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(name, types, stats, moves))
    }

    /// Builds a combatant from already-typed parts. Callers holding raw input should
    /// go through [`Combatant::from_spec`] instead.
    pub fn new(
        name: impl Into<String>,
        types: (Type, Option<Type>),
        stats: BaseStats,
        moves: Vec<Move>,
    ) -> Self {
        Self {
            name: name.into(),
            types,
            current_hp: stats.hp,
            stats,
            moves,
            energy: MAX_ENERGY,
            status: Status::None,
        }
    }

    /// Re-checks everything [`Combatant::from_spec`] would reject.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.stats.validate(&self.name)?;
        if self.types.1 == Some(self.types.0) {
            return Err(ValidationError::DuplicateType {
                combatant: self.name.clone(),
                name: self.types.0.to_string(),
            });
        }
        if self.moves.len() > MAX_MOVES {
            return Err(ValidationError::TooManyMoves {
                combatant: self.name.clone(),
                max: MAX_MOVES,
                count: self.moves.len(),
            });
        }
        for mv in &self.moves {
            if mv.name.trim().is_empty() {
                return Err(ValidationError::EmptyMoveName {
                    combatant: self.name.clone(),
                });
            }
            if let Some(effect) = mv.effect {
                if effect.chance > 100 {
                    return Err(ValidationError::ChanceOutOfRange {
                        combatant: self.name.clone(),
                        mv: mv.name.clone(),
                        chance: effect.chance as u32,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn has_type(&self, ty: Type) -> bool {
        self.types.0 == ty || self.types.1 == Some(ty)
    }

    pub fn can_afford(&self, mv: &Move) -> bool {
        self.energy >= mv.energy_cost
    }

    /// Applies damage and returns how much HP was actually lost.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_sub(damage);
        before - self.current_hp
    }

    /// Adds energy up to [`MAX_ENERGY`] and returns the amount gained.
    pub fn restore_energy(&mut self, amount: u32) -> u32 {
        let before = self.energy;
        self.energy = self.energy.saturating_add(amount).min(MAX_ENERGY);
        self.energy - before
    }

    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            name: self.name.clone(),
            hp: self.current_hp,
            max_hp: self.stats.hp,
            energy: self.energy,
            status: self.status,
        }
    }
}

fn parse_types(owner: &str, names: &[String]) -> Result<(Type, Option<Type>), ValidationError> {
    if names.is_empty() || names.len() > 2 {
        return Err(ValidationError::TypeCount {
            combatant: owner.to_string(),
            count: names.len(),
        });
    }
    let mut parsed = Vec::with_capacity(names.len());
    for name in names {
        let ty = Type::parse(name).ok_or_else(|| ValidationError::UnknownType {
            combatant: owner.to_string(),
            name: name.clone(),
        })?;
        if parsed.contains(&ty) {
            return Err(ValidationError::DuplicateType {
                combatant: owner.to_string(),
                name: name.clone(),
            });
        }
        parsed.push(ty);
    }
    Ok((parsed[0], parsed.get(1).copied()))
}

/// Point-in-time view of a combatant's mutable state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CombatantSnapshot {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub energy: u32,
    pub status: Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MoveSpec, StatusEffectSpec};

    fn stats() -> Stats {
        Stats {
            hp: 80,
            attack: 90,
            defense: 70,
            special_attack: 60,
            special_defense: 70,
            speed: 100,
        }
    }

    fn move_spec(name: &str, move_type: &str, power: u32) -> MoveSpec {
        MoveSpec {
            name: name.to_string(),
            move_type: move_type.to_string(),
            power,
            energy_cost: None,
            category: None,
            effect: None,
            no_effect: false,
        }
    }

    fn spec(types: &[&str], moves: Vec<MoveSpec>) -> CombatantSpec {
        CombatantSpec {
            name: "Testmon".to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
            stats: stats(),
            moves,
        }
    }

    #[test]
    fn from_spec_starts_at_full_state() {
        let mon = Combatant::from_spec(&spec(&["Fire", "flying"], vec![move_spec("Ember", "fire", 40)]))
            .expect("valid spec");
        assert_eq!(mon.current_hp, 80);
        assert_eq!(mon.energy, MAX_ENERGY);
        assert_eq!(mon.status, Status::None);
        assert_eq!(mon.types, (Type::Fire, Some(Type::Flying)));
    }

    #[test]
    fn derived_move_fields_follow_power_and_type() {
        let mon = Combatant::from_spec(&spec(
            &["normal"],
            vec![
                move_spec("Growl", "normal", 0),
                move_spec("Ember", "fire", 40),
                move_spec("Sludge Bomb", "poison", 90),
                move_spec("Hyper Beam", "normal", 150),
            ],
        ))
        .expect("valid spec");
        let costs: Vec<u32> = mon.moves.iter().map(|m| m.energy_cost).collect();
        assert_eq!(costs, vec![10, 20, 30, 40]);
        assert_eq!(mon.moves[1].category, MoveCategory::Special);
        assert_eq!(mon.moves[2].category, MoveCategory::Physical);
        assert_eq!(
            mon.moves[2].effect,
            Some(StatusEffect {
                status: Status::Poisoned,
                chance: 30
            })
        );
        assert_eq!(mon.moves[3].effect, None);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let mut mv = move_spec("Thunder Wave", "electric", 0);
        mv.energy_cost = Some(15);
        mv.category = Some(MoveCategory::Physical);
        mv.effect = Some(StatusEffectSpec {
            status: StatusKind::Paralysis,
            chance: 100,
        });
        let mut quiet = move_spec("Flame Wheel", "fire", 60);
        quiet.no_effect = true;
        let mon = Combatant::from_spec(&spec(&["electric"], vec![mv, quiet])).expect("valid spec");
        assert_eq!(mon.moves[0].energy_cost, 15);
        assert!(mon.moves[0].is_physical());
        assert_eq!(mon.moves[0].effect.map(|e| e.chance), Some(100));
        assert_eq!(mon.moves[1].effect, None);
    }

    #[test]
    fn rejects_bad_input() {
        let unknown = Combatant::from_spec(&spec(&["plasma"], vec![]));
        assert!(matches!(unknown, Err(ValidationError::UnknownType { .. })));

        let none = Combatant::from_spec(&spec(&[], vec![]));
        assert!(matches!(none, Err(ValidationError::TypeCount { count: 0, .. })));

        let dup = Combatant::from_spec(&spec(&["water", "Water"], vec![]));
        assert!(matches!(dup, Err(ValidationError::DuplicateType { .. })));

        let five = (0..5).map(|i| move_spec(&format!("Move {i}"), "normal", 40)).collect();
        let too_many = Combatant::from_spec(&spec(&["normal"], five));
        assert!(matches!(too_many, Err(ValidationError::TooManyMoves { count: 5, .. })));

        let mut bad_chance = move_spec("Poison Sting", "poison", 15);
        bad_chance.effect = Some(StatusEffectSpec {
            status: StatusKind::Poison,
            chance: 101,
        });
        let chance = Combatant::from_spec(&spec(&["bug"], vec![bad_chance]));
        assert!(matches!(chance, Err(ValidationError::ChanceOutOfRange { chance: 101, .. })));

        let mut zero = spec(&["normal"], vec![]);
        zero.stats.defense = 0;
        assert!(matches!(
            Combatant::from_spec(&zero),
            Err(ValidationError::ZeroStat { stat: "defense", .. })
        ));
    }

    #[test]
    fn hand_built_combatants_get_the_same_stat_check() {
        let mut mon = Combatant::from_spec(&spec(&["normal"], vec![])).expect("valid spec");
        assert_eq!(mon.validate(), Ok(()));
        mon.stats.speed = 0;
        assert_eq!(
            mon.validate(),
            Err(ValidationError::ZeroStat {
                combatant: mon.name.clone(),
                stat: "speed",
            })
        );
    }

    #[test]
    fn energy_and_hp_saturate() {
        let mut mon = Combatant::from_spec(&spec(&["normal"], vec![])).expect("valid spec");
        assert_eq!(mon.take_damage(500), 80);
        assert!(mon.is_fainted());
        mon.energy = 70;
        assert_eq!(mon.restore_energy(50), 30);
        assert_eq!(mon.energy, MAX_ENERGY);
    }
}
