//! World state and core simulation types
//!
//! Everything a tick reads or writes lives in `World`. Entity types derive
//! serde so snapshots can carry them verbatim.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{circle_rect_overlap, circles_overlap};
use super::leveling::required_nutrition;
use crate::config::SimConfig;
use crate::consts::{MAX_HP, MAX_LEVEL};

/// Shared capability set of the player and creatures
pub trait Body {
    fn pos(&self) -> Vec2;
    fn set_pos(&mut self, pos: Vec2);
    fn stats(&self) -> &Stats;
    fn stats_mut(&mut self) -> &mut Stats;

    #[inline]
    fn radius(&self) -> f32 {
        self.stats().radius
    }

    #[inline]
    fn level(&self) -> u32 {
        self.stats().level
    }

    #[inline]
    fn hp(&self) -> i32 {
        self.stats().hp
    }
}

/// Level, nutrition, hit points and the level-derived radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub level: u32,
    pub nutrition: u32,
    pub hp: i32,
    pub radius: f32,
}

impl Stats {
    /// Fresh stats for a body at `level` (clamped to `1..=MAX_LEVEL`)
    pub fn new(level: u32, base_radius: f32) -> Self {
        let level = level.clamp(1, MAX_LEVEL);
        Self {
            level,
            nutrition: 0,
            hp: MAX_HP,
            radius: base_radius + level as f32,
        }
    }

    /// Eat food worth `nutrition`: heal, accumulate and level up on threshold.
    ///
    /// Returns true if the body leveled up.
    pub fn eat(&mut self, nutrition: u32, base_radius: f32) -> bool {
        self.add_nutrition(nutrition);
        let heal = i32::try_from(nutrition)
            .unwrap_or(i32::MAX)
            .saturating_mul(crate::consts::HEAL_PER_NUTRITION);
        self.hp = self.hp.saturating_add(heal).min(MAX_HP);
        if self.level < MAX_LEVEL && self.nutrition >= required_nutrition(self.level) {
            self.level_up(base_radius);
            return true;
        }
        false
    }

    /// Accumulate nutrition without a level-up check (kill bonuses)
    pub fn add_nutrition(&mut self, amount: u32) {
        self.nutrition = self.nutrition.saturating_add(amount);
    }

    /// Advance one level, unless already at `MAX_LEVEL`
    pub fn level_up(&mut self, base_radius: f32) {
        if self.level >= MAX_LEVEL {
            return;
        }
        self.level += 1;
        self.nutrition = 0;
        self.radius = base_radius + self.level as f32;
    }

    /// Apply contact damage; returns true if the body is dead afterwards
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.hp <= 0
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// The operator-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    #[serde(flatten)]
    pub stats: Stats,
}

impl Player {
    pub fn new(pos: Vec2, base_radius: f32) -> Self {
        Self {
            pos,
            stats: Stats::new(1, base_radius),
        }
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn stats(&self) -> &Stats {
        &self.stats
    }
    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }
}

/// What a creature is currently steering toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Player,
    Creature(u32),
    Food(u32),
}

/// Transient AI state (not persisted)
#[derive(Debug, Clone, Default)]
pub struct AiState {
    /// Wander heading (radians)
    pub heading: f32,
    /// Ticks until the wander heading is re-randomized
    pub heading_timer: u32,
    /// Target chosen on the last decision, if any
    pub target: Option<Target>,
}

/// An AI-driven creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub color: [u8; 3],
    pub pos: Vec2,
    #[serde(flatten)]
    pub stats: Stats,
    #[serde(skip)]
    pub ai: AiState,
}

impl Creature {
    pub fn new(id: u32, pos: Vec2, level: u32, color: [u8; 3], base_radius: f32) -> Self {
        Self {
            id,
            color,
            pos,
            stats: Stats::new(level, base_radius),
            ai: AiState::default(),
        }
    }
}

impl Body for Creature {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn stats(&self) -> &Stats {
        &self.stats
    }
    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }
}

/// A food item with its cosmetic outline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    /// Runtime handle for AI targeting; reassigned on load
    #[serde(skip)]
    pub id: u32,
    pub pos: Vec2,
    pub nutrition: u32,
    pub size: f32,
    /// Polygon outline in map space, generated once at creation
    pub points: Vec<Vec2>,
}

impl Food {
    /// Create a food item, generating its 3-6 vertex outline
    pub fn new(id: u32, pos: Vec2, nutrition: u32, rng: &mut impl Rng) -> Self {
        let size = 10.0 + nutrition as f32;
        let num_points = rng.random_range(3..=6);
        let points = (0..num_points)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / num_points as f32;
                let r = rng.random_range(0.8..=1.2) * size;
                pos + crate::heading_to_vec(angle) * r
            })
            .collect();
        Self {
            id,
            pos,
            nutrition,
            size,
            points,
        }
    }
}

/// Obstacle shape tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleShape {
    #[default]
    Circle,
    Rectangle,
}

/// A static obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: f32,
    #[serde(default)]
    pub shape: ObstacleShape,
}

impl Obstacle {
    pub fn new(pos: Vec2, size: f32, shape: ObstacleShape) -> Self {
        Self { pos, size, shape }
    }

    pub fn circle(pos: Vec2, size: f32) -> Self {
        Self::new(pos, size, ObstacleShape::Circle)
    }

    pub fn rectangle(pos: Vec2, size: f32) -> Self {
        Self::new(pos, size, ObstacleShape::Rectangle)
    }

    /// Shape-derived width (a circle's is its size)
    pub fn width(&self) -> f32 {
        match self.shape {
            ObstacleShape::Circle => self.size,
            ObstacleShape::Rectangle => self.size * 2.0,
        }
    }

    pub fn height(&self) -> f32 {
        match self.shape {
            ObstacleShape::Circle => self.size,
            ObstacleShape::Rectangle => self.size * 1.5,
        }
    }

    /// Map-space footprint: area used for coverage accounting
    pub fn area(&self) -> f32 {
        match self.shape {
            ObstacleShape::Circle => std::f32::consts::PI * self.size * self.size,
            ObstacleShape::Rectangle => self.width() * self.height(),
        }
    }

    /// Does a circle at `center` with `radius` overlap this obstacle?
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.overlaps_circle_with_margin(center, radius, 0.0)
    }

    /// Overlap test with the obstacle grown by `margin` on every side
    pub fn overlaps_circle_with_margin(&self, center: Vec2, radius: f32, margin: f32) -> bool {
        match self.shape {
            ObstacleShape::Circle => circles_overlap(center, radius, self.pos, self.size + margin),
            ObstacleShape::Rectangle => circle_rect_overlap(
                center,
                radius,
                self.pos,
                self.width() + 2.0 * margin,
                self.height() + 2.0 * margin,
            ),
        }
    }

    /// Distance from `point` to the obstacle's nominal edge (center distance minus size)
    pub fn clearance(&self, point: Vec2) -> f32 {
        point.distance(self.pos) - self.size
    }
}

/// Fixed map rectangle `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: f32,
    pub height: f32,
}

impl MapBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a body center so the whole body stays on the map
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.max(radius).min(self.width - radius),
            pos.y.max(radius).min(self.height - radius),
        )
    }

    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= radius
            && pos.x <= self.width - radius
            && pos.y >= radius
            && pos.y <= self.height - radius
    }

    /// Uniform random point on the map (integer coordinates)
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        let x = rng.random_range(0..=self.width as u32);
        let y = rng.random_range(0..=self.height as u32);
        Vec2::new(x as f32, y as f32)
    }
}

/// Who did something in a `SimEvent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Creature(u32),
}

/// Notable things that happened during a tick.
///
/// Every contact hit is reported: lethal ones as a kill, the rest as `Damaged`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    FoodEaten { by: Actor, nutrition: u32 },
    LevelUp { who: Actor, level: u32 },
    Damaged { who: Actor, by: Actor, hp: i32 },
    CreatureKilled { id: u32, level: u32, by: Actor },
    PlayerKilled { killer: u32, killer_level: u32 },
}

/// Simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    /// Terminal: the player was killed by a creature of `killer_level`
    GameOver { killer_level: u32 },
}

/// RNG state wrapper for reproducible runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

impl World {
    /// Seed the world's RNG was created from
    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimConfig,
    pub bounds: MapBounds,
    pub rng_state: RngState,
    pub rng: Pcg32,
    pub player: Player,
    /// Active creatures in iteration order
    pub creatures: Vec<Creature>,
    pub foods: Vec<Food>,
    pub obstacles: Vec<Obstacle>,
    /// Foods eaten by the player this run
    pub food_eaten: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: Phase,
    next_bot_id: u32,
    next_food_id: u32,
}

impl World {
    /// Create an empty world with the player at the map center
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let bounds = MapBounds::new(config.map_width, config.map_height);
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        let player = Player::new(bounds.center(), config.base_radius);
        Self {
            config,
            bounds,
            rng_state,
            rng,
            player,
            creatures: Vec::new(),
            foods: Vec::new(),
            obstacles: Vec::new(),
            food_eaten: 0,
            time_ticks: 0,
            phase: Phase::Running,
            next_bot_id: 1,
            next_food_id: 1,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    /// Allocate a new creature identity
    pub fn next_bot_id(&mut self) -> u32 {
        let id = self.next_bot_id;
        self.next_bot_id = self.next_bot_id.saturating_add(1);
        id
    }

    /// Next identity that `next_bot_id` would hand out
    pub fn peek_bot_id(&self) -> u32 {
        self.next_bot_id
    }

    pub(crate) fn set_next_bot_id(&mut self, id: u32) {
        self.next_bot_id = id;
    }

    fn next_food_id(&mut self) -> u32 {
        let id = self.next_food_id;
        self.next_food_id = self.next_food_id.wrapping_add(1);
        id
    }

    /// Create a food item at `pos` and add it to the world
    pub fn add_food(&mut self, pos: Vec2, nutrition: u32) -> u32 {
        let id = self.next_food_id();
        let food = Food::new(id, pos, nutrition, &mut self.rng);
        self.foods.push(food);
        id
    }

    /// Adopt a food item (e.g. from a snapshot) as-is, giving it a fresh runtime id
    pub fn adopt_food(&mut self, mut food: Food) {
        food.id = self.next_food_id();
        self.foods.push(food);
    }

    /// Spawn a creature with a fresh identity
    pub fn add_creature(&mut self, pos: Vec2, level: u32, color: [u8; 3]) -> u32 {
        let id = self.next_bot_id();
        let mut creature = Creature::new(id, pos, level, color, self.config.base_radius);
        creature.ai.heading = self.rng.random_range(0.0..std::f32::consts::TAU);
        self.creatures.push(creature);
        id
    }

    pub fn creature(&self, id: u32) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }
}
