//! The round loop: acting order, actions, end-of-round ticks and termination.

use crate::combatant::{Combatant, CombatantSnapshot, MAX_ENERGY};
use crate::damage::compute_damage;
use crate::error::{BattleError, ValidationError};
use crate::log::{BattleEvent, BattleLog, LogEntry};
use crate::scheduler::{choose_action, turn_order, Action, MovePolicy, PolicyKind, Side, REST_ENERGY};
use crate::status::{apply_residual, can_act, try_inflict};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ROUNDS: u32 = 100;

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct BattleOptions {
    /// Rounds played before the battle is called a draw.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl BattleOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_rounds == 0 {
            return Err(ValidationError::ZeroRoundCap);
        }
        Ok(())
    }
}

/// Everything needed to run a battle besides the combatants and the seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulationOptions {
    pub policy_a: PolicyKind,
    pub policy_b: PolicyKind,
    pub battle: BattleOptions,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum BattlePhase {
    NotStarted,
    InProgress,
    Concluded,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    DoubleKnockout,
    RoundCap,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Winner { side: Side, name: String },
    Draw { reason: DrawReason },
}

impl Outcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Winner { side, .. } => Some(*side),
            Outcome::Draw { .. } => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BattleResult {
    pub outcome: Outcome,
    pub rounds: u32,
    pub log: BattleLog,
    pub final_state: [CombatantSnapshot; 2],
}

impl BattleResult {
    pub fn winner_name(&self) -> &str {
        match &self.outcome {
            Outcome::Winner { name, .. } => name,
            Outcome::Draw { .. } => "Draw",
        }
    }
}

/// One battle between two combatants. Owns its combatants and random source.
pub struct Battle<R: Rng = SmallRng> {
    combatants: [Combatant; 2],
    policies: [Box<dyn MovePolicy + Send>; 2],
    options: BattleOptions,
    rng: R,
    round: u32,
    phase: BattlePhase,
    log: BattleLog,
    outcome: Option<Outcome>,
}

impl Battle<SmallRng> {
    pub fn new(a: Combatant, b: Combatant, seed: u64) -> Result<Self, BattleError> {
        Self::with_rng(a, b, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Battle<R> {
    /// Validates both combatants and resets them to full HP, full energy and no status.
    pub fn with_rng(mut a: Combatant, mut b: Combatant, rng: R) -> Result<Self, BattleError> {
        a.validate()?;
        b.validate()?;
        for combatant in [&mut a, &mut b] {
            combatant.current_hp = combatant.stats.hp;
            combatant.energy = MAX_ENERGY;
            combatant.status = Default::default();
        }
        Ok(Self {
            combatants: [a, b],
            policies: [PolicyKind::Greedy.build(0), PolicyKind::Greedy.build(0)],
            options: BattleOptions::default(),
            rng,
            round: 0,
            phase: BattlePhase::NotStarted,
            log: BattleLog::new(),
            outcome: None,
        })
    }

    pub fn with_options(mut self, options: BattleOptions) -> Result<Self, BattleError> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    pub fn with_policies(
        mut self,
        policy_a: Box<dyn MovePolicy + Send>,
        policy_b: Box<dyn MovePolicy + Send>,
    ) -> Self {
        self.policies = [policy_a, policy_b];
        self
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        &self.combatants[side.index()]
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Plays one round. Returns the outcome once the battle has concluded.
    pub fn step_round(&mut self) -> Result<Option<Outcome>, BattleError> {
        match self.phase {
            BattlePhase::Concluded => return Ok(self.outcome.clone()),
            BattlePhase::NotStarted => self.start()?,
            BattlePhase::InProgress => {}
        }
        self.round += 1;
        let order = turn_order(&self.combatants[0], &self.combatants[1]);
        tracing::debug!(round = self.round, first = %order[0], "round start");

        for side in order {
            if self.any_fainted() {
                break;
            }
            self.take_action(side)?;
        }
        if !self.any_fainted() {
            for side in [Side::A, Side::B] {
                self.end_of_round(side)?;
            }
        }

        let outcome = self.evaluate_outcome();
        if let Some(outcome) = &outcome {
            self.conclude(outcome.clone());
        }
        Ok(outcome)
    }

    /// Runs rounds until the battle concludes and hands back the result.
    pub fn run(mut self) -> Result<BattleResult, BattleError> {
        let outcome = loop {
            if let Some(outcome) = self.step_round()? {
                break outcome;
            }
        };
        let [a, b] = &self.combatants;
        Ok(BattleResult {
            outcome,
            rounds: self.round,
            final_state: [a.snapshot(), b.snapshot()],
            log: self.log,
        })
    }

    fn start(&mut self) -> Result<(), BattleError> {
        self.phase = BattlePhase::InProgress;
        tracing::debug!(
            a = %self.combatants[0].name,
            b = %self.combatants[1].name,
            max_rounds = self.options.max_rounds,
            "battle start"
        );
        self.record(None, BattleEvent::BattleStart)
    }

    fn take_action(&mut self, side: Side) -> Result<(), BattleError> {
        if self.combatants[side.index()].is_fainted() {
            return Err(BattleError::Invariant(format!(
                "{} tried to act while fainted",
                self.combatants[side.index()].name
            )));
        }
        if !can_act(&self.combatants[side.index()], &mut self.rng) {
            tracing::debug!(round = self.round, side = %side, "fully paralyzed");
            return self.record(Some(side), BattleEvent::FullyParalyzed);
        }

        let action = {
            let (actor, target) = pair(&self.combatants, side);
            choose_action(self.policies[side.index()].as_mut(), actor, target)
        };
        let idx = match action {
            Action::Rest => {
                let gained = self.combatants[side.index()].restore_energy(REST_ENERGY);
                tracing::debug!(round = self.round, side = %side, gained, "rest");
                return self.record(Some(side), BattleEvent::Rested { gained });
            }
            Action::Move(idx) => idx,
        };

        let target_side = side.opponent();
        let (move_def, hit, dealt) = {
            let (actor, target) = pair_mut(&mut self.combatants, side);
            let move_def = actor.moves[idx].clone();
            actor.energy = actor.energy.checked_sub(move_def.energy_cost).ok_or_else(|| {
                BattleError::Invariant(format!(
                    "{} used {} without enough energy",
                    actor.name, move_def.name
                ))
            })?;
            let hit = compute_damage(actor, target, &move_def);
            let dealt = target.take_damage(hit.damage);
            (move_def, hit, dealt)
        };
        tracing::debug!(
            round = self.round,
            side = %side,
            mv = %move_def.name,
            damage = dealt,
            "move"
        );
        self.record(
            Some(side),
            BattleEvent::UsedMove {
                name: move_def.name.clone(),
                target: target_side,
                damage: dealt,
                energy_cost: move_def.energy_cost,
                effectiveness: hit.effectiveness,
            },
        )?;

        if self.combatants[target_side.index()].is_fainted() {
            return self.record(Some(target_side), BattleEvent::Fainted);
        }
        let landed = hit.damage > 0 || (move_def.power == 0 && hit.multiplier > 0.0);
        if let (true, Some(effect)) = (landed, move_def.effect) {
            let target = &mut self.combatants[target_side.index()];
            if let Some(status) = try_inflict(target, effect, &mut self.rng) {
                return self.record(Some(target_side), BattleEvent::StatusInflicted { status });
            }
        }
        Ok(())
    }

    fn end_of_round(&mut self, side: Side) -> Result<(), BattleError> {
        let combatant = &mut self.combatants[side.index()];
        let status = combatant.status;
        let Some(damage) = apply_residual(combatant) else {
            return Ok(());
        };
        self.record(Some(side), BattleEvent::StatusDamage { status, damage })?;
        if self.combatants[side.index()].is_fainted() {
            self.record(Some(side), BattleEvent::Fainted)?;
        }
        Ok(())
    }

    fn evaluate_outcome(&self) -> Option<Outcome> {
        let [a, b] = &self.combatants;
        match (a.is_fainted(), b.is_fainted()) {
            (true, true) => Some(Outcome::Draw {
                reason: DrawReason::DoubleKnockout,
            }),
            (true, false) => Some(Outcome::Winner {
                side: Side::B,
                name: b.name.clone(),
            }),
            (false, true) => Some(Outcome::Winner {
                side: Side::A,
                name: a.name.clone(),
            }),
            (false, false) if self.round >= self.options.max_rounds => {
                tracing::warn!(rounds = self.round, "round cap reached, declaring a draw");
                Some(Outcome::Draw {
                    reason: DrawReason::RoundCap,
                })
            }
            (false, false) => None,
        }
    }

    fn conclude(&mut self, outcome: Outcome) {
        self.phase = BattlePhase::Concluded;
        tracing::info!(rounds = self.round, outcome = ?outcome, "battle concluded");
        self.outcome = Some(outcome);
    }

    fn any_fainted(&self) -> bool {
        self.combatants.iter().any(Combatant::is_fainted)
    }

    fn check_invariants(&self) -> Result<(), BattleError> {
        for combatant in &self.combatants {
            if combatant.current_hp > combatant.stats.hp {
                return Err(BattleError::Invariant(format!(
                    "{} has {} HP, above its maximum {}",
                    combatant.name, combatant.current_hp, combatant.stats.hp
                )));
            }
            if combatant.energy > MAX_ENERGY {
                return Err(BattleError::Invariant(format!(
                    "{} has {} energy, above {}",
                    combatant.name, combatant.energy, MAX_ENERGY
                )));
            }
        }
        Ok(())
    }

    fn record(&mut self, actor: Option<Side>, event: BattleEvent) -> Result<(), BattleError> {
        self.check_invariants()?;
        let [a, b] = &self.combatants;
        self.log.push(LogEntry {
            round: self.round,
            actor,
            event,
            state: [a.snapshot(), b.snapshot()],
        });
        Ok(())
    }
}

/// `(actor, opponent)` for `side`.
fn pair(combatants: &[Combatant; 2], side: Side) -> (&Combatant, &Combatant) {
    let [a, b] = combatants;
    match side {
        Side::A => (a, b),
        Side::B => (b, a),
    }
}

fn pair_mut(combatants: &mut [Combatant; 2], side: Side) -> (&mut Combatant, &mut Combatant) {
    let [a, b] = combatants;
    match side {
        Side::A => (a, b),
        Side::B => (b, a),
    }
}

/// Runs a full battle with the default greedy policies.
pub fn simulate_battle(a: &Combatant, b: &Combatant, seed: u64) -> Result<BattleResult, BattleError> {
    simulate_battle_with_options(a, b, seed, &SimulationOptions::default())
}

pub fn simulate_battle_with_options(
    a: &Combatant,
    b: &Combatant,
    seed: u64,
    options: &SimulationOptions,
) -> Result<BattleResult, BattleError> {
    Battle::new(a.clone(), b.clone(), seed)?
        .with_options(options.battle)?
        .with_policies(
            options.policy_a.build(policy_seed(seed, Side::A)),
            options.policy_b.build(policy_seed(seed, Side::B)),
        )
        .run()
}

fn policy_seed(seed: u64, side: Side) -> u64 {
    // Keep policy streams independent from the status rolls.
    let salt = match side {
        Side::A => 0x9E37_79B9_7F4A_7C15,
        Side::B => 0xC2B2_AE3D_27D4_EB4F,
    };
    seed ^ salt
}
