//! Leaderboard and run summary
//!
//! Pure data for HUD collaborators: the top entities by (level, nutrition)
//! and the game-over statistics of a run.

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::sim::{Actor, Body, Phase, World, level_progress};

/// Number of rows the scoreboard shows
pub const MAX_STANDINGS: usize = 10;

/// Display color of the player's row
pub const PLAYER_COLOR: [u8; 3] = [0, 255, 0];

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub actor: Actor,
    pub level: u32,
    pub nutrition: u32,
    /// Progress toward the next level in `0.0..=1.0`
    pub progress: f32,
    pub color: [u8; 3],
}

impl Standing {
    fn new(actor: Actor, body: &impl Body, color: [u8; 3]) -> Self {
        let stats = body.stats();
        Self {
            actor,
            level: stats.level,
            nutrition: stats.nutrition,
            progress: level_progress(stats.level, stats.nutrition),
            color,
        }
    }

    /// Row label, e.g. "player 3" or "bot12 2"
    pub fn label(&self) -> String {
        match self.actor {
            Actor::Player => format!("player {}", self.level),
            Actor::Creature(id) => format!("bot{id} {}", self.level),
        }
    }
}

/// Top `n` entities ordered by level, then nutrition, highest first.
///
/// Ties keep creature order with the player after all creatures.
pub fn top(world: &World, n: usize) -> Vec<Standing> {
    let mut rows: Vec<Standing> = world
        .creatures
        .iter()
        .map(|c| Standing::new(Actor::Creature(c.id), c, c.color))
        .chain(std::iter::once(Standing::new(
            Actor::Player,
            &world.player,
            PLAYER_COLOR,
        )))
        .collect();
    rows.sort_by(|a, b| (b.level, b.nutrition).cmp(&(a.level, a.nutrition)));
    rows.truncate(n);
    rows
}

/// The player's 1-indexed position on the full leaderboard
pub fn player_rank(world: &World) -> usize {
    top(world, usize::MAX)
        .iter()
        .position(|s| s.actor == Actor::Player)
        .map_or(1, |i| i + 1)
}

/// Game-over summary of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub ticks_survived: u64,
    pub seconds_survived: f32,
    pub max_level: u32,
    pub food_eaten: u32,
    /// Level of the creature that ended the run, if it ended
    pub killer_level: Option<u32>,
}

impl RunStats {
    pub fn from_world(world: &World) -> Self {
        let killer_level = match world.phase {
            Phase::GameOver { killer_level } => Some(killer_level),
            Phase::Running => None,
        };
        Self {
            ticks_survived: world.time_ticks,
            seconds_survived: world.time_ticks as f32 * SIM_DT,
            max_level: world.player.level(),
            food_eaten: world.food_eaten,
            killer_level,
        }
    }
}
