use clap::{Parser, ValueEnum};
use energy_battle::scheduler::PolicyKind;
use energy_battle::{run, CliOptions, OutputFormat};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Highest predicted damage among affordable moves.
    Greedy,
    /// Highest-power move; rests when it cannot be afforded.
    Power,
    /// Uniformly random move.
    Random,
}

impl From<PolicyArg> for PolicyKind {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Greedy => PolicyKind::Greedy,
            PolicyArg::Power => PolicyKind::Power,
            PolicyArg::Random => PolicyKind::Random,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "energy-battle")]
#[command(about = "Simulate a two-combatant energy battle", long_about = None)]
#[command(version)]
struct Args {
    /// Battle definition (JSON).
    #[arg(long, default_value = "battle.json")]
    battle: PathBuf,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Overrides the round cap from the battle file.
    #[arg(long)]
    max_rounds: Option<u32>,

    #[arg(long, value_enum, default_value_t = PolicyArg::Greedy)]
    policy: PolicyArg,

    /// Run this many seeded battles in parallel and print a win-rate summary.
    #[arg(long)]
    sims: Option<usize>,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Print Showdown-style protocol lines instead of text.
    #[arg(long, conflicts_with_all = ["json", "sims"])]
    protocol: bool,
}

impl Args {
    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.protocol {
            OutputFormat::Protocol
        } else {
            OutputFormat::Text
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let format = args.format();
    run(CliOptions {
        battle_path: args.battle,
        seed: args.seed,
        max_rounds: args.max_rounds,
        policy: args.policy.into(),
        sims: args.sims,
        format,
    })
}
