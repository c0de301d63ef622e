//! Append-only battle log.

use crate::combatant::{CombatantSnapshot, Status};
use crate::damage::Effectiveness;
use crate::scheduler::Side;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    BattleStart,
    UsedMove {
        name: String,
        target: Side,
        damage: u32,
        energy_cost: u32,
        effectiveness: Effectiveness,
    },
    Rested {
        gained: u32,
    },
    FullyParalyzed,
    StatusInflicted {
        status: Status,
    },
    StatusDamage {
        status: Status,
        damage: u32,
    },
    Fainted,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LogEntry {
    pub round: u32,
    /// Side the event happened to or was caused by. `None` for battle-wide events.
    pub actor: Option<Side>,
    pub event: BattleEvent,
    /// State of both combatants right after the event, indexed by side.
    pub state: [CombatantSnapshot; 2],
}

impl LogEntry {
    pub fn actor_state(&self) -> Option<&CombatantSnapshot> {
        self.actor.map(|side| &self.state[side.index()])
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BattleLog {
    entries: Vec<LogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Human-readable narration, one line per entry with round headers.
    pub fn render_text(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current_round = None;
        for entry in &self.entries {
            if entry.round > 0 && current_round != Some(entry.round) {
                current_round = Some(entry.round);
                lines.push(format!("--- Round {} ---", entry.round));
            }
            lines.push(describe(entry));
        }
        lines
    }

    /// Showdown-style protocol lines (`|move|p1a: Name|Move|p2a: Other`).
    pub fn protocol_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current_round = 0;
        for entry in &self.entries {
            if entry.round != current_round {
                current_round = entry.round;
                lines.push(format!("|turn|{current_round}"));
            }
            let Some(side) = entry.actor else {
                let [a, b] = &entry.state;
                lines.push(format!("|start|{}|{}", a.name, b.name));
                continue;
            };
            let me = ident(side, &entry.state);
            match &entry.event {
                BattleEvent::BattleStart => {}
                BattleEvent::UsedMove { name, target, .. } => {
                    lines.push(format!("|move|{me}|{name}|{}", ident(*target, &entry.state)));
                    let t = &entry.state[target.index()];
                    lines.push(format!("|-damage|{}|{}/{}", ident(*target, &entry.state), t.hp, t.max_hp));
                }
                BattleEvent::Rested { gained } => lines.push(format!("|-rest|{me}|{gained}")),
                BattleEvent::FullyParalyzed => lines.push(format!("|cant|{me}|par")),
                BattleEvent::StatusInflicted { status } => {
                    lines.push(format!("|-status|{me}|{}", status.to_protocol()))
                }
                BattleEvent::StatusDamage { status, .. } => {
                    let s = &entry.state[side.index()];
                    lines.push(format!(
                        "|-damage|{me}|{}/{}|[from] {}",
                        s.hp,
                        s.max_hp,
                        status.to_protocol()
                    ));
                }
                BattleEvent::Fainted => lines.push(format!("|faint|{me}")),
            }
        }
        lines
    }
}

fn ident(side: Side, state: &[CombatantSnapshot; 2]) -> String {
    format!("{}: {}", side.ident(), state[side.index()].name)
}

fn describe(entry: &LogEntry) -> String {
    let [a, b] = &entry.state;
    let Some(side) = entry.actor else {
        return format!("A battle is about to begin between {} and {}!", a.name, b.name);
    };
    let me = &entry.state[side.index()];
    match &entry.event {
        BattleEvent::BattleStart => format!("{} enters the battle!", me.name),
        BattleEvent::UsedMove {
            name,
            target,
            damage,
            energy_cost,
            effectiveness,
        } => {
            let t = &entry.state[target.index()];
            let mut line = format!(
                "{} used {}! It dealt {} damage. [-{} Energy] ({}: {}/{} HP)",
                me.name, name, damage, energy_cost, t.name, t.hp, t.max_hp
            );
            if let Some(msg) = effectiveness.message() {
                line.push(' ');
                line.push_str(msg);
            }
            line
        }
        BattleEvent::Rested { gained } => format!(
            "{} is low on energy and Rests! [+{} Energy] ({}/100)",
            me.name, gained, me.energy
        ),
        BattleEvent::FullyParalyzed => format!("{} is paralyzed! It can't move!", me.name),
        BattleEvent::StatusInflicted { status } => match status {
            Status::Poisoned => format!("{} was poisoned!", me.name),
            Status::Burned => format!("{} was burned!", me.name),
            Status::Paralyzed => format!("{} was paralyzed!", me.name),
            Status::None => format!("{} is healthy.", me.name),
        },
        BattleEvent::StatusDamage { status, damage } => {
            let cause = match status {
                Status::Burned => "its burn",
                _ => "poison",
            };
            format!(
                "{} is hurt by {}! [-{} HP] ({}/{} HP)",
                me.name, cause, damage, me.hp, me.max_hp
            )
        }
        BattleEvent::Fainted => format!("{} has fainted!", me.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(name: &str, hp: u32) -> CombatantSnapshot {
        CombatantSnapshot {
            name: name.to_string(),
            hp,
            max_hp: 100,
            energy: 80,
            status: Status::None,
        }
    }

    fn sample_log() -> BattleLog {
        let mut log = BattleLog::new();
        log.push(LogEntry {
            round: 0,
            actor: None,
            event: BattleEvent::BattleStart,
            state: [snap("Pikachu", 100), snap("Squirtle", 100)],
        });
        log.push(LogEntry {
            round: 1,
            actor: Some(Side::A),
            event: BattleEvent::UsedMove {
                name: "Thunderbolt".to_string(),
                target: Side::B,
                damage: 60,
                energy_cost: 30,
                effectiveness: Effectiveness::SuperEffective,
            },
            state: [snap("Pikachu", 100), snap("Squirtle", 40)],
        });
        log
    }

    #[test]
    fn protocol_lines_follow_showdown_shape() {
        let lines = sample_log().protocol_lines();
        assert_eq!(
            lines,
            vec![
                "|start|Pikachu|Squirtle".to_string(),
                "|turn|1".to_string(),
                "|move|p1a: Pikachu|Thunderbolt|p2a: Squirtle".to_string(),
                "|-damage|p2a: Squirtle|40/100".to_string(),
            ]
        );
    }

    #[test]
    fn text_rendering_adds_round_headers() {
        let lines = sample_log().render_text();
        assert_eq!(lines[0], "A battle is about to begin between Pikachu and Squirtle!");
        assert_eq!(lines[1], "--- Round 1 ---");
        assert!(lines[2].starts_with("Pikachu used Thunderbolt! It dealt 60 damage."));
        assert!(lines[2].ends_with("It's super effective!"));
    }

    #[test]
    fn json_keeps_entry_order() {
        let value = serde_json::to_value(sample_log()).expect("serializable");
        let entries = value.as_array().expect("log array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["event"]["kind"], "used_move");
        assert_eq!(entries[1]["state"][1]["hp"], 40);
    }
}
