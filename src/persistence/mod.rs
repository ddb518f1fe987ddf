//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Strict validation on load: malformed snapshots are rejected, never patched
//! - Atomic writes (tmp → save)
//!
//! Persisted values are restored verbatim. Radii, polygons and sizes are never
//! re-derived from level or nutrition.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SimConfig;
use crate::consts::MAX_LEVEL;
use crate::sim::{Creature, Food, Obstacle, Player, World};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {found} (expected {})", SNAPSHOT_VERSION)]
    UnsupportedVersion { found: u32 },
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

impl PersistError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Serializable layout of a running world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Seed of the run the snapshot was taken from
    #[serde(default)]
    pub seed: u64,
    pub player: Player,
    pub creatures: Vec<Creature>,
    pub foods: Vec<Food>,
    pub obstacles: Vec<Obstacle>,
    pub next_bot_id: u32,
    pub food_eaten: u32,
}

impl Snapshot {
    /// Capture the persistent parts of `world`
    pub fn capture(world: &World) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            seed: world.seed(),
            player: world.player.clone(),
            creatures: world.creatures.clone(),
            foods: world.foods.clone(),
            obstacles: world.obstacles.clone(),
            next_bot_id: world.peek_bot_id(),
            food_eaten: world.food_eaten,
        }
    }

    /// Reject snapshots the simulation cannot run from
    pub fn validate(&self) -> Result<(), PersistError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistError::UnsupportedVersion { found: self.version });
        }
        if !(1..=MAX_LEVEL).contains(&self.player.stats.level) {
            return Err(PersistError::Invalid(format!(
                "player level {} outside 1-{MAX_LEVEL}",
                self.player.stats.level
            )));
        }
        if self.next_bot_id == u32::MAX {
            return Err(PersistError::Invalid("creature ids exhausted".into()));
        }
        let mut ids = std::collections::HashSet::new();
        for creature in &self.creatures {
            if !(1..=MAX_LEVEL).contains(&creature.stats.level) {
                return Err(PersistError::Invalid(format!(
                    "bot{} level {} outside 1-{MAX_LEVEL}",
                    creature.id, creature.stats.level
                )));
            }
            if creature.id == u32::MAX {
                return Err(PersistError::Invalid(format!("creature id {} out of range", creature.id)));
            }
            if !ids.insert(creature.id) {
                return Err(PersistError::Invalid(format!("duplicate creature id {}", creature.id)));
            }
        }
        for (i, food) in self.foods.iter().enumerate() {
            if !(5..=20).contains(&food.nutrition) {
                return Err(PersistError::Invalid(format!(
                    "food {i} has nutrition {} outside 5-20",
                    food.nutrition
                )));
            }
            if food.points.len() < 3 {
                return Err(PersistError::Invalid(format!(
                    "food {i} polygon has {} vertices",
                    food.points.len()
                )));
            }
        }
        if let Some(o) = self.obstacles.iter().find(|o| o.size <= 0.0) {
            return Err(PersistError::Invalid(format!("obstacle at {} has size {}", o.pos, o.size)));
        }
        Ok(())
    }

    /// Rebuild a world from this snapshot.
    ///
    /// The RNG is reseeded from `seed`, or from the persisted seed when `None`.
    pub fn restore(self, config: SimConfig, seed: Option<u64>) -> Result<World, PersistError> {
        self.validate()?;

        let mut world = World::new(config, seed.unwrap_or(self.seed));
        let next_free = self
            .creatures
            .iter()
            .map(|c| c.id.saturating_add(1))
            .max()
            .unwrap_or(1);
        world.set_next_bot_id(self.next_bot_id.max(next_free));
        world.player = self.player;
        world.creatures = self.creatures;
        world.obstacles = self.obstacles;
        world.food_eaten = self.food_eaten;
        for food in self.foods {
            world.adopt_food(food);
        }
        Ok(world)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write a snapshot of `world` to `path` via a temporary file
pub fn save(world: &World, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let json = Snapshot::capture(world).to_json()?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(|e| PersistError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| PersistError::io(path, e))?;
    log::info!(
        "Saved snapshot to {} ({} creatures, {} foods)",
        path.display(),
        world.creatures.len(),
        world.foods.len()
    );
    Ok(())
}

/// Load a snapshot from `path` and rebuild the world (see `Snapshot::restore`)
pub fn load(path: impl AsRef<Path>, config: SimConfig, seed: Option<u64>) -> Result<World, PersistError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
    let world = Snapshot::from_json(&json)?.restore(config, seed)?;
    log::info!("Loaded snapshot from {}", path.display());
    Ok(world)
}
