//! Deterministic two-combatant battle engine with an energy economy and
//! persistent status effects.
//!
//! The usual entry points are [`battle::simulate_battle`] for a single battle and
//! [`batch::simulate_many`] for win-rate estimates.

pub mod batch;
pub mod battle;
pub mod combatant;
pub mod damage;
pub mod error;
pub mod log;
pub mod model;
pub mod scheduler;
pub mod status;
pub mod types;

use crate::battle::{simulate_battle_with_options, BattleOptions, BattleResult, SimulationOptions};
use crate::combatant::Combatant;
use crate::model::BattleFile;
use crate::scheduler::PolicyKind;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// How a finished battle is printed.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum OutputFormat {
    /// Narrated log followed by a final HP/energy summary.
    #[default]
    Text,
    Json,
    /// Showdown-style `|move|...` lines.
    Protocol,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub battle_path: PathBuf,
    pub seed: u64,
    pub max_rounds: Option<u32>,
    pub policy: PolicyKind,
    pub sims: Option<usize>,
    pub format: OutputFormat,
}

/// A parsed and validated battle file.
#[derive(Debug, Clone)]
pub struct LoadedBattle {
    pub combatant_a: Combatant,
    pub combatant_b: Combatant,
    pub options: BattleOptions,
}

pub fn load_battle_file(path: &Path) -> anyhow::Result<LoadedBattle> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read battle file at {}", path.display()))?;
    parse_battle(&raw).with_context(|| format!("Invalid battle file {}", path.display()))
}

pub fn parse_battle(raw: &str) -> anyhow::Result<LoadedBattle> {
    let parsed: BattleFile = serde_json::from_str(raw).context("Failed to parse battle JSON")?;
    let combatant_a = Combatant::from_spec(&parsed.combatant_a)?;
    let combatant_b = Combatant::from_spec(&parsed.combatant_b)?;
    let options = parsed.options.unwrap_or_default();
    options.validate()?;
    Ok(LoadedBattle {
        combatant_a,
        combatant_b,
        options,
    })
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let loaded = load_battle_file(&opts.battle_path)?;
    let mut battle_options = loaded.options;
    if let Some(max_rounds) = opts.max_rounds {
        battle_options.max_rounds = max_rounds;
    }
    let sim_options = SimulationOptions {
        policy_a: opts.policy,
        policy_b: opts.policy,
        battle: battle_options,
    };

    if let Some(sims) = opts.sims {
        if sims == 0 {
            anyhow::bail!("--sims must be > 0");
        }
        let summary = batch::simulate_many(
            &loaded.combatant_a,
            &loaded.combatant_b,
            sims,
            opts.seed,
            &sim_options,
        )?;
        if opts.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "{} vs {}: {} battles, {} wins / {} losses / {} draws (win rate {:.4})",
                loaded.combatant_a.name,
                loaded.combatant_b.name,
                summary.battles,
                summary.a_wins,
                summary.b_wins,
                summary.draws,
                summary.a_win_rate()
            );
        }
        return Ok(());
    }

    let result = simulate_battle_with_options(
        &loaded.combatant_a,
        &loaded.combatant_b,
        opts.seed,
        &sim_options,
    )?;
    println!("{}", render_result(&result, opts.format)?);
    Ok(())
}

pub fn render_result(result: &BattleResult, format: OutputFormat) -> anyhow::Result<String> {
    let lines = match format {
        OutputFormat::Json => return Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Protocol => {
            let mut lines = result.log.protocol_lines();
            lines.push(match result.outcome.winner() {
                Some(_) => format!("|win|{}", result.winner_name()),
                None => "|tie".to_string(),
            });
            lines
        }
        OutputFormat::Text => {
            let mut lines = result.log.render_text();
            lines.push("--- Battle Over! ---".to_string());
            lines.push(format!("The winner is: {}!", result.winner_name()));
            for snapshot in &result.final_state {
                lines.push(format!(
                    "{}: [{}] {}/{} HP, Energy {}/{}",
                    snapshot.name,
                    hp_bar(snapshot.hp, snapshot.max_hp),
                    snapshot.hp,
                    snapshot.max_hp,
                    snapshot.energy,
                    combatant::MAX_ENERGY
                ));
            }
            lines
        }
    };
    Ok(lines.join("\n"))
}

fn hp_bar(hp: u32, max_hp: u32) -> String {
    let filled = if max_hp == 0 {
        0
    } else {
        (u64::from(hp.min(max_hp)) * 20 / u64::from(max_hp)) as usize
    };
    format!("{}{}", "█".repeat(filled), "-".repeat(20 - filled))
}
