//! Battle file schema as read from JSON.

use crate::battle::BattleOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Poison,
    Burn,
    Paralysis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusEffectSpec {
    pub status: StatusKind,
    /// Trigger chance in percent.
    pub chance: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    #[serde(default)]
    pub power: u32,
    #[serde(default)]
    pub energy_cost: Option<u32>,
    #[serde(default)]
    pub category: Option<MoveCategory>,
    #[serde(default)]
    pub effect: Option<StatusEffectSpec>,
    /// Suppresses the type-driven default status effect.
    #[serde(default)]
    pub no_effect: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CombatantSpec {
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub stats: Stats,
    #[serde(default)]
    pub moves: Vec<MoveSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BattleFile {
    pub combatant_a: CombatantSpec,
    pub combatant_b: CombatantSpec,
    #[serde(default)]
    pub options: Option<BattleOptions>,
}
