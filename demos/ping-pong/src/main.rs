use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{info, Level};

use bdi_agent::prelude::*;
use bdi_agent::{ActionResult, AgentBuilder};
use bdi_mas::prelude::*;

#[derive(Parser)]
#[command(name = "ping-pong")]
#[command(about = "Two BDI agents passing a ball until the count runs out", long_about = None)]
struct Cli {
    /// How agents are scheduled
    #[arg(short, long, value_enum, default_value_t = StrategyKind::Quiescence)]
    strategy: StrategyKind,

    /// Number of passes before the rally ends
    #[arg(short, long, default_value = "6")]
    balls: i64,

    /// JSON file with system settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop each agent after this many cycles
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Pause between cycles in milliseconds (continuous only)
    #[arg(long)]
    tick_ms: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    /// One cycle per agent per turn, round robin
    Turns,
    /// Each agent runs until it has nothing to do
    Quiescence,
    /// Each agent cycles until stopped
    Continuous,
}

fn ball(n: Term) -> Term {
    Term::structure("ball", [n])
}

/// `decrement(N, M)` binds `M` to `N - 1`.
fn decrement(request: &ActionRequest<'_>) -> ActionResult<ActionResponse> {
    request.expect_arity(2)?;
    let n = match request.argument(0)? {
        Term::Int(n) => *n,
        other => {
            return Err(ActionError::InvalidArguments(format!(
                "expected an integer, got {}",
                other
            )))
        }
    };
    let out = request
        .argument(1)?
        .as_var()
        .cloned()
        .ok_or_else(|| ActionError::InvalidArguments("second argument must be unbound".into()))?;
    Ok(ActionResponse::ok().with_substitution(Substitution::of([(out, Term::int(n - 1))])))
}

fn player(name: &str, peer: &str) -> AgentBuilder {
    Agent::builder(name)
        .belief(Belief::new(Term::structure("other", [Term::atom(peer)])))
        .action(action_fn("decrement", decrement))
        // +!ball(0) <- print("last ball"); broadcast(tell, done).
        .plan(Plan::on(
            Trigger::AchievementGoalInvocation(ball(Term::int(0))),
            [
                Goal::act("print", [Term::string("last ball")]),
                Goal::act("broadcast", [Term::atom("tell"), Term::atom("done")]),
            ],
        ))
        // +!ball(N) : other(Peer) <- print(ball, N); decrement(N, M); send(Peer, achieve, ball(M)).
        .plan(Plan::new(
            Trigger::AchievementGoalInvocation(ball(Term::var("N"))),
            Guard::holds(Term::structure("other", [Term::var("Peer")])),
            [
                Goal::act("print", [Term::atom("ball"), Term::var("N")]),
                Goal::act("decrement", [Term::var("N"), Term::var("M")]),
                Goal::act(
                    "send",
                    [Term::var("Peer"), Term::atom("achieve"), ball(Term::var("M"))],
                ),
            ],
        ))
        // +done <- print("rally over").
        .plan(Plan::on(
            Trigger::BeliefBaseAddition(Term::atom("done")),
            [Goal::act("print", [Term::string("rally over")])],
        ))
}

fn load_config(cli: &Cli) -> Result<MasConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => MasConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => MasConfig::default(),
    };
    if let Some(max) = cli.max_cycles {
        config = config.with_max_cycles(max);
    }
    if let Some(ms) = cli.tick_ms {
        config = config.with_tick_interval(Duration::from_millis(ms));
    }
    if matches!(cli.strategy, StrategyKind::Continuous) && config.max_cycles_per_agent.is_none() {
        // continuous agents never stop on their own
        config = config.with_max_cycles(100);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;
    let agents = [
        player("pinger", "ponger").goal(ball(Term::int(cli.balls))).build(),
        player("ponger", "pinger").build(),
    ];
    let environment = Environment::new();

    let mas = match cli.strategy {
        StrategyKind::Turns => Mas::new(config, OneCyclePerTurn::new(), environment, agents)?,
        StrategyKind::Quiescence => Mas::new(config, RunToQuiescence, environment, agents)?,
        StrategyKind::Continuous => Mas::new(config, Continuous, environment, agents)?,
    };
    info!(strategy = mas.strategy().name(), balls = cli.balls, "Starting rally");

    let report = mas.start().await?;
    for exit in &report.exits {
        info!(
            agent = %exit.agent.name(),
            reason = ?exit.reason,
            cycles = exit.cycles,
            beliefs = exit.agent.beliefs().len(),
            "Agent finished"
        );
    }
    info!(broadcasts = report.environment.broadcast_log().len(), "Rally finished");

    Ok(())
}
