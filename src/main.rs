use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cuedeck::camera::{TransitionPlan, plan_transition};
use cuedeck::config::{ConfigError, EngineConfig};
use cuedeck::doc::{CueWhen, ModelError, PresentationModel, Space};
use cuedeck::engine::{Engine, StepOutcome};
use cuedeck::host::{MemoryHost, SceneHost};
use cuedeck::transform::Resolver;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "cuedeck", about = "Inspect and replay cuedeck presentations")]
struct Cli {
    /// Deck defaults JSON; `CUEDECK_*` environment variables apply when absent.
    #[arg(long, env = "CUEDECK_DEFAULTS")]
    defaults: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the deck from its initial view to the end, printing visibility after each step.
    Replay {
        deck: PathBuf,
        /// Simulated time between steps, in milliseconds.
        #[arg(long, default_value_t = 10_000.0)]
        step_ms: f64,
    },
    /// Print every node's resolved transform in its owning space.
    Inspect { deck: PathBuf },
    /// Print the camera transition between each pair of consecutive views.
    Plan { deck: PathBuf },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.defaults {
        Some(path) => EngineConfig::from_json(&read(path)?)?,
        None => EngineConfig::from_env()?,
    };

    match cli.command {
        Command::Replay { deck, step_ms } => run_replay(&deck, config, step_ms),
        Command::Inspect { deck } => run_inspect(&deck, &config),
        Command::Plan { deck } => run_plan(&deck, &config),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
}

fn load_deck(path: &Path, config: &EngineConfig) -> Result<PresentationModel, CliError> {
    let mut model = PresentationModel::from_json(&read(path)?)?;
    model.sanitize(config.min_world_size, config.min_screen_size);
    tracing::info!(deck = %model.id, nodes = model.nodes.len(), views = model.views.len(), "deck loaded");
    Ok(model)
}

fn run_replay(path: &Path, config: EngineConfig, step_ms: f64) -> Result<(), CliError> {
    let model = load_deck(path, &config)?;
    let host = MemoryHost::new(model, config.design_viewport());
    let mut engine = Engine::new(host, config);
    if !engine.begin_playback(None) {
        println!("deck has no views");
        return Ok(());
    }
    print_state(&engine, "start");

    let mut step = 0usize;
    loop {
        let outcome = engine.step_forward();
        if outcome == StepOutcome::Boundary {
            break;
        }
        step += 1;
        engine.tick(engine.now_ms() + step_ms);
        print_state(&engine, &format!("{step:>3} {}", describe(&engine, &outcome)));
    }
    engine.end_playback();
    engine.dispose();
    Ok(())
}

fn describe(engine: &Engine<MemoryHost>, outcome: &StepOutcome) -> String {
    let when = |w: CueWhen| match w {
        CueWhen::Enter => "enter",
        CueWhen::Exit => "exit",
    };
    match outcome {
        StepOutcome::Played(cue) => format!("{} {}", when(cue.when), cue.node_id),
        StepOutcome::Undone(cue) => format!("undo {} {}", when(cue.when), cue.node_id),
        StepOutcome::ViewChanged(index) => {
            let name = engine.host().model().view(*index).map_or_else(|| index.to_string(), |v| v.id.to_string());
            format!("view {name}")
        }
        StepOutcome::Boundary => "end".to_owned(),
    }
}

fn print_state(engine: &Engine<MemoryHost>, label: &str) {
    let visible: Vec<String> = engine.host().visible_ids().iter().map(ToString::to_string).collect();
    println!("{label}: [{}]", visible.join(", "));
}

fn run_inspect(path: &Path, config: &EngineConfig) -> Result<(), CliError> {
    let model = load_deck(path, config)?;
    let mut resolver = Resolver::new(&model);
    let mut nodes = Vec::new();
    for node in model.stacking() {
        let Some(resolved) = resolver.world_transform(&node.id) else {
            continue;
        };
        let space = match node.space() {
            Space::World => "world",
            Space::Screen => "screen",
        };
        nodes.push(json!({
            "id": node.id,
            "space": space,
            "parentId": node.parent_id(),
            "visible": node.visible,
            "transform": resolved,
        }));
    }
    print_json(&Value::Array(nodes))
}

fn run_plan(path: &Path, config: &EngineConfig) -> Result<(), CliError> {
    let model = load_deck(path, config)?;
    let viewport = config.design_viewport();
    for pair in model.views.windows(2) {
        let [from, to] = pair else {
            continue;
        };
        let duration_ms = to.transition_ms.unwrap_or(config.view_transition_ms);
        let plan = plan_transition(&from.camera, &to.camera, viewport, duration_ms, config.tuning());
        match plan {
            TransitionPlan::Direct { duration_ms, .. } => {
                println!("{} -> {}: direct {duration_ms}ms", from.id, to.id);
            }
            TransitionPlan::TwoStage { mid, first_ms, second_ms, .. } => {
                println!(
                    "{} -> {}: via ({:.1}, {:.1}) zoom {:.4}, {first_ms}ms + {second_ms}ms",
                    from.id, to.id, mid.cx, mid.cy, mid.zoom
                );
            }
        }
    }
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
