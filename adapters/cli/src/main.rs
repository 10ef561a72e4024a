#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Turret Defence headlessly.

mod auto_build;
mod demo_map;
mod headless;
mod stats_file;

use std::{cell::RefCell, fmt, path::PathBuf, rc::Rc};

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use turret_defence_core::{
    components::{ScoreTracker, TurretMachine},
    Assets, InputEvent, ScoreEventKind,
};
use turret_defence_rendering::{Color, DrawList, Frame, Presentation, RenderingBackend};
use turret_defence_system_bootstrap::Session;
use turret_defence_system_spawning::{standard_waves, WaveConfig};
use turret_defence_world::{map::populate, World};

use crate::{
    auto_build::AutoBuilder,
    headless::{step_ms, HeadlessBackend},
};

#[derive(Parser, Debug)]
#[command(name = "turret-defence")]
#[command(about = "Runs a Turret Defence game on the built-in map without a window")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,

    /// Milliseconds simulated per tick
    #[arg(long, default_value_t = 16.0)]
    delta_ms: f32,

    /// Seed for randomised fire effects
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of waves the spawner plays
    #[arg(long, default_value_t = 10)]
    waves: usize,

    /// TOML file overriding the built-in stat sheets
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Scripted player
    #[arg(long, value_enum, default_value_t = Strategy::Greedy)]
    strategy: Strategy,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Never touches the controls
    Idle,
    /// Builds, researches and upgrades whenever it can afford to
    Greedy,
}

/// Outcome printed once the run ends.
#[derive(Clone, Debug, PartialEq)]
struct RunSummary {
    ticks: u64,
    simulated_ms: f64,
    wave: usize,
    wave_progress: u8,
    money: u32,
    kills: u32,
    despawned: u32,
    turrets: usize,
    game_over: bool,
}

impl RunSummary {
    fn collect(session: &Session, simulated_ms: f64) -> Result<Self> {
        let world = session.world();
        let ui = session.ui();
        let tracker = world.player_component::<ScoreTracker>()?;
        Ok(Self {
            ticks: session.ticks(),
            simulated_ms,
            wave: ui.wave_number,
            wave_progress: ui.wave_progress,
            money: world.money()?,
            kills: tracker.count(ScoreEventKind::EnemyKill),
            despawned: tracker.count(ScoreEventKind::EnemyDespawn),
            turrets: world.store().query::<TurretMachine>().count(),
            game_over: session.is_game_over(),
        })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:      {}", self.ticks)?;
        writeln!(f, "simulated:  {:.1} s", self.simulated_ms / 1_000.0)?;
        writeln!(f, "wave:       {} ({}%)", self.wave, self.wave_progress)?;
        writeln!(f, "money:      {}", self.money)?;
        writeln!(f, "kills:      {}", self.kills)?;
        writeln!(f, "despawned:  {}", self.despawned)?;
        writeln!(f, "turrets:    {}", self.turrets)?;
        write!(
            f,
            "game over:  {}",
            if self.game_over { "yes" } else { "no" }
        )
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Entry point for the Turret Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);
    ensure!(args.delta_ms > 0.0, "--delta-ms must be positive");

    let stats = stats_file::load(args.stats.as_deref())?;
    let assets = Assets::placeholder();

    let mut world = World::new(demo_map::BOUNDS, args.seed);
    let waves = standard_waves(&WaveConfig {
        waves: args.waves,
        ..WaveConfig::default()
    });
    let map = populate(&mut world, &demo_map::layout(), waves, &assets);
    info!(
        zones = map.build_zones.len(),
        waves = args.waves,
        seed = args.seed,
        strategy = ?args.strategy,
        "session ready"
    );

    let session = Rc::new(RefCell::new(Session::new(world)));
    let simulated_ms = Rc::new(RefCell::new(0.0_f64));
    let presentation = Presentation::new(
        "Turret Defence",
        Color::from_rgb_u8(24, 32, 24),
        Frame::default(),
    );

    let mut builder = (args.strategy == Strategy::Greedy).then(AutoBuilder::default);
    let mut events: Vec<InputEvent> = Vec::new();
    let update = {
        let session = Rc::clone(&session);
        let simulated_ms = Rc::clone(&simulated_ms);
        move |step, input: &[InputEvent], frame: &mut Frame| -> Result<bool> {
            let mut session = session.borrow_mut();
            events.clear();
            events.extend_from_slice(input);
            if let Some(builder) = builder.as_mut() {
                builder.plan(session.world(), &stats, &mut events)?;
            }

            let delta_ms = step_ms(step);
            session.tick(delta_ms, &events, &assets, &stats)?;
            *simulated_ms.borrow_mut() += f64::from(delta_ms);

            frame.draw_list = DrawList::from_store(session.world().store());
            frame.ui = session.ui().clone();
            Ok(!session.is_game_over())
        }
    };
    HeadlessBackend::new(args.ticks, args.delta_ms).run(presentation, update)?;

    let summary = RunSummary::collect(&session.borrow(), *simulated_ms.borrow())?;
    info!(kills = summary.kills, game_over = summary.game_over, "run finished");
    println!("{summary}");
    Ok(())
}
