//! Mope Arena headless runner
//!
//! Drives the fixed-timestep loop without rendering. The player is steered by
//! a simple autopilot standing in for the pointer.
//!
//! Usage:
//!   mope-arena --ticks 3600 --seed 42
//!   mope-arena --config arena.json --save run.json
//!   mope-arena --load run.json --realtime

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use clap::Parser;
    use glam::Vec2;

    use mope_arena::consts::{MAX_SUBSTEPS, SIM_DT};
    use mope_arena::persistence;
    use mope_arena::sim::{
        Actor, Body, SimEvent, TickInput, World, can_eat, maintain_population, tick,
    };
    use mope_arena::standings::{self, MAX_STANDINGS, RunStats};
    use mope_arena::SimConfig;

    const DEFAULT_SEED: u64 = 42;

    #[derive(Parser, Debug)]
    #[command(name = "mope-arena", version, about = "Headless predator/prey arena simulation")]
    struct Cli {
        /// JSON file overriding the default simulation tuning
        #[arg(long)]
        config: Option<PathBuf>,
        /// Ticks to run before quitting (60 ticks per simulated second)
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
        /// Run seed (a loaded snapshot keeps its own seed unless this is given)
        #[arg(long)]
        seed: Option<u64>,
        /// Resume from a saved snapshot instead of generating a new world
        #[arg(long)]
        load: Option<PathBuf>,
        /// Write a snapshot here when the run ends
        #[arg(long)]
        save: Option<PathBuf>,
        /// Pace ticks against the wall clock
        #[arg(long)]
        realtime: bool,
        /// Log the standings every N ticks (0 disables)
        #[arg(long, default_value_t = 600)]
        report_every: u64,
    }

    /// Pointer offset the autopilot would produce: run from the nearest
    /// stronger creature, else chase the nearest edible food, else circle.
    fn autopilot(world: &World) -> Vec2 {
        let player = &world.player;
        let threat = world
            .creatures
            .iter()
            .filter(|c| c.level() > player.level())
            .map(|c| (c.pos, c.pos.distance(player.pos)))
            .filter(|&(_, d)| d < world.config.flee_range)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((pos, _)) = threat {
            return (player.pos - pos).normalize_or_zero() * 200.0;
        }

        let food = world
            .foods
            .iter()
            .filter(|f| can_eat(player.level(), f.nutrition))
            .min_by(|a, b| a.pos.distance(player.pos).total_cmp(&b.pos.distance(player.pos)));
        if let Some(food) = food {
            return food.pos - player.pos;
        }

        let angle = world.time_ticks as f32 * 0.01;
        Vec2::new(angle.cos(), angle.sin()) * 200.0
    }

    struct Runner {
        world: World,
        accumulator: f32,
        input: TickInput,
        report_every: u64,
    }

    impl Runner {
        fn new(world: World, report_every: u64) -> Self {
            Self {
                world,
                accumulator: 0.0,
                input: TickInput::default(),
                report_every,
            }
        }

        /// One fixed step plus between-tick population upkeep
        fn step(&mut self) {
            self.input.pointer = autopilot(&self.world);
            let result = tick(&mut self.world, &self.input);
            for event in &result.events {
                log_event(event);
            }
            if result.game_over {
                return;
            }

            let report = maintain_population(&mut self.world);
            if report.creatures_spawned > 0 {
                log::debug!("Respawned {} creatures", report.creatures_spawned);
            }

            if self.report_every > 0 && self.world.time_ticks % self.report_every == 0 {
                self.log_standings();
            }
        }

        /// Advance by wall-clock `dt`, capped at `MAX_SUBSTEPS` ticks
        fn update(&mut self, dt: f32) -> u32 {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && !self.world.is_over() {
                self.step();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            substeps
        }

        fn log_standings(&self) {
            let rows = standings::top(&self.world, MAX_STANDINGS);
            let line: Vec<String> = rows.iter().map(|s| s.label()).collect();
            log::info!(
                "tick {}: rank {} | {}",
                self.world.time_ticks,
                standings::player_rank(&self.world),
                line.join(", ")
            );
        }

        fn run(&mut self, ticks: u64, realtime: bool) {
            let target = self.world.time_ticks + ticks;
            if realtime {
                let mut last = Instant::now();
                while self.world.time_ticks < target && !self.world.is_over() {
                    let now = Instant::now();
                    self.update(now.duration_since(last).as_secs_f32());
                    last = now;
                    std::thread::sleep(Duration::from_secs_f32(SIM_DT / 2.0));
                }
            } else {
                while self.world.time_ticks < target && !self.world.is_over() {
                    self.step();
                }
            }
        }
    }

    fn log_event(event: &SimEvent) {
        match event {
            SimEvent::LevelUp {
                who: Actor::Player,
                level,
            } => log::info!("Player reached level {level}"),
            SimEvent::CreatureKilled {
                id,
                level,
                by: Actor::Player,
            } => log::info!("Player killed bot{id} (level {level})"),
            SimEvent::Damaged {
                who: Actor::Player,
                by: Actor::Creature(id),
                hp,
            } => log::warn!("Player hit by bot{id}, hp {hp}"),
            SimEvent::PlayerKilled {
                killer,
                killer_level,
            } => log::warn!("Player killed by bot{killer} (level {killer_level})"),
            other => log::trace!("{other:?}"),
        }
    }

    fn build_world(cli: &Cli) -> Result<World, Box<dyn std::error::Error>> {
        let config = match &cli.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        let world = match &cli.load {
            Some(path) => persistence::load(path, config, cli.seed)?,
            None => World::generate(config, cli.seed.unwrap_or(DEFAULT_SEED)),
        };
        Ok(world)
    }

    pub fn main() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();
        log::info!("Mope Arena (headless) starting");

        let world = match build_world(&cli) {
            Ok(world) => world,
            Err(e) => {
                log::error!("Failed to start: {e}");
                std::process::exit(1);
            }
        };

        log::info!("Running with seed {}", world.seed());
        let mut runner = Runner::new(world, cli.report_every);
        runner.run(cli.ticks, cli.realtime);

        let stats = RunStats::from_world(&runner.world);
        match stats.killer_level {
            Some(level) => log::info!(
                "Game over after {:.1}s: killed by a level {level} creature, max level {}, food eaten {}",
                stats.seconds_survived,
                stats.max_level,
                stats.food_eaten
            ),
            None => log::info!(
                "Run ended after {:.1}s alive: level {}, food eaten {}",
                stats.seconds_survived,
                stats.max_level,
                stats.food_eaten
            ),
        }
        runner.log_standings();

        if let Some(path) = &cli.save {
            if let Err(e) = persistence::save(&runner.world, path) {
                log::error!("{e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation library is usable from wasm; the runner is native only
}
