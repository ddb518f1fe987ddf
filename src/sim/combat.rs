//! Consumption and combat resolution
//!
//! Runs once per tick after movement, in four passes:
//! 1. creatures eat food
//! 2. the player eats food
//! 3. player vs creature contact damage
//! 4. creature vs creature contact damage (each unordered pair once)
//!
//! Removals are marked during a pass and compacted at its end, so no pass
//! ever iterates a collection it is mutating.

use std::cmp::Ordering;

use super::collision::circles_overlap;
use super::leveling::{can_eat, required_nutrition};
use super::state::{Actor, Body, Phase, SimEvent, World};
use crate::consts::CONTACT_DAMAGE;

/// Summary of one resolver run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Foods eaten by the player
    pub food_eaten: u32,
    /// Set when the player died this tick
    pub killer_level: Option<u32>,
}

/// Apply all interaction passes to the world
pub fn resolve_interactions(world: &mut World, events: &mut Vec<SimEvent>) -> Resolution {
    creatures_eat(world, events);
    let food_eaten = player_eats(world, events);

    if let Some(killer_level) = player_vs_creatures(world, events) {
        world.phase = Phase::GameOver { killer_level };
        return Resolution {
            food_eaten,
            killer_level: Some(killer_level),
        };
    }

    creatures_fight(world, events);

    Resolution {
        food_eaten,
        killer_level: None,
    }
}

/// Drop every element whose flag is set; flags are in collection order
fn compact<T>(items: &mut Vec<T>, removed: &[bool]) {
    let mut flags = removed.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}

fn creatures_eat(world: &mut World, events: &mut Vec<SimEvent>) {
    let base_radius = world.config.base_radius;
    let mut eaten = vec![false; world.foods.len()];

    for creature in world.creatures.iter_mut() {
        for (food, gone) in world.foods.iter().zip(eaten.iter_mut()) {
            if *gone
                || !circles_overlap(creature.pos, creature.radius(), food.pos, food.size)
                || !can_eat(creature.level(), food.nutrition)
            {
                continue;
            }
            *gone = true;
            creature.ai.target = None;
            events.push(SimEvent::FoodEaten {
                by: Actor::Creature(creature.id),
                nutrition: food.nutrition,
            });
            if creature.stats.eat(food.nutrition, base_radius) {
                log::debug!("bot{} reached level {}", creature.id, creature.level());
                events.push(SimEvent::LevelUp {
                    who: Actor::Creature(creature.id),
                    level: creature.level(),
                });
            }
        }
    }

    compact(&mut world.foods, &eaten);
}

fn player_eats(world: &mut World, events: &mut Vec<SimEvent>) -> u32 {
    let base_radius = world.config.base_radius;
    let player = &mut world.player;
    let mut eaten = vec![false; world.foods.len()];
    let mut count = 0;

    for (food, gone) in world.foods.iter().zip(eaten.iter_mut()) {
        if !circles_overlap(player.pos, player.radius(), food.pos, food.size)
            || !can_eat(player.level(), food.nutrition)
        {
            continue;
        }
        *gone = true;
        count += 1;
        events.push(SimEvent::FoodEaten {
            by: Actor::Player,
            nutrition: food.nutrition,
        });
        if player.stats.eat(food.nutrition, base_radius) {
            log::info!("Player reached level {}", player.level());
            events.push(SimEvent::LevelUp {
                who: Actor::Player,
                level: player.level(),
            });
        }
    }

    compact(&mut world.foods, &eaten);
    world.food_eaten += count;
    count
}

/// Returns the killer's level if the player died
fn player_vs_creatures(world: &mut World, events: &mut Vec<SimEvent>) -> Option<u32> {
    let player = &mut world.player;
    let mut killed = vec![false; world.creatures.len()];
    let mut killer_level = None;

    for (i, creature) in world.creatures.iter_mut().enumerate() {
        if !circles_overlap(player.pos, player.radius(), creature.pos, creature.radius()) {
            continue;
        }
        match player.level().cmp(&creature.level()) {
            Ordering::Greater => {
                if creature.stats.take_damage(CONTACT_DAMAGE) {
                    killed[i] = true;
                    // Bonus does not trigger a level-up check here
                    player.stats.add_nutrition(required_nutrition(creature.level()));
                    events.push(SimEvent::CreatureKilled {
                        id: creature.id,
                        level: creature.level(),
                        by: Actor::Player,
                    });
                } else {
                    events.push(SimEvent::Damaged {
                        who: Actor::Creature(creature.id),
                        by: Actor::Player,
                        hp: creature.hp(),
                    });
                }
            }
            Ordering::Less => {
                let dead = player.stats.take_damage(CONTACT_DAMAGE);
                events.push(SimEvent::Damaged {
                    who: Actor::Player,
                    by: Actor::Creature(creature.id),
                    hp: player.hp(),
                });
                if dead {
                    log::info!(
                        "Player killed by bot{} (level {})",
                        creature.id,
                        creature.level()
                    );
                    events.push(SimEvent::PlayerKilled {
                        killer: creature.id,
                        killer_level: creature.level(),
                    });
                    killer_level = Some(creature.level());
                    break;
                }
            }
            Ordering::Equal => {}
        }
    }

    compact(&mut world.creatures, &killed);
    killer_level
}

fn creatures_fight(world: &mut World, events: &mut Vec<SimEvent>) {
    let count = world.creatures.len();
    let mut removed = vec![false; count];

    for i in 0..count {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..count {
            if removed[j] {
                continue;
            }
            let (head, tail) = world.creatures.split_at_mut(j);
            let first = &mut head[i];
            let second = &mut tail[0];
            if !circles_overlap(first.pos, first.radius(), second.pos, second.radius()) {
                continue;
            }

            match first.level().cmp(&second.level()) {
                Ordering::Greater => {
                    if second.stats.take_damage(CONTACT_DAMAGE) {
                        removed[j] = true;
                        first.stats.add_nutrition(required_nutrition(second.level()));
                        events.push(SimEvent::CreatureKilled {
                            id: second.id,
                            level: second.level(),
                            by: Actor::Creature(first.id),
                        });
                    } else {
                        events.push(SimEvent::Damaged {
                            who: Actor::Creature(second.id),
                            by: Actor::Creature(first.id),
                            hp: second.hp(),
                        });
                    }
                }
                Ordering::Less => {
                    if first.stats.take_damage(CONTACT_DAMAGE) {
                        removed[i] = true;
                        second.stats.add_nutrition(required_nutrition(first.level()));
                        events.push(SimEvent::CreatureKilled {
                            id: first.id,
                            level: first.level(),
                            by: Actor::Creature(second.id),
                        });
                        // A dead creature stops fighting this tick
                        break;
                    }
                    events.push(SimEvent::Damaged {
                        who: Actor::Creature(first.id),
                        by: Actor::Creature(second.id),
                        hp: first.hp(),
                    });
                }
                Ordering::Equal => {}
            }
        }
    }

    compact(&mut world.creatures, &removed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use glam::Vec2;

    fn world() -> World {
        let mut world = World::new(SimConfig::default(), 9);
        // Park the player far from everything
        world.player.pos = Vec2::new(5000.0, 5000.0);
        world
    }

    fn spawn(world: &mut World, x: f32, y: f32, level: u32, hp: i32) -> u32 {
        let id = world.add_creature(Vec2::new(x, y), level, [90, 90, 90]);
        if let Some(c) = world.creatures.iter_mut().find(|c| c.id == id) {
            c.stats.hp = hp;
        }
        id
    }

    #[test]
    fn test_higher_level_damages_lower() {
        let mut world = world();
        let a = spawn(&mut world, 500.0, 500.0, 2, 100);
        let b = spawn(&mut world, 520.0, 500.0, 1, 30);
        let mut events = Vec::new();
        resolve_interactions(&mut world, &mut events);

        assert_eq!(world.creature(a).map(|c| c.stats.hp), Some(100));
        assert_eq!(world.creature(b).map(|c| c.stats.hp), Some(10));
        assert_eq!(world.creatures.len(), 2);
        assert_eq!(
            events,
            vec![SimEvent::Damaged {
                who: Actor::Creature(b),
                by: Actor::Creature(a),
                hp: 10,
            }]
        );
    }

    #[test]
    fn test_lower_first_creature_hit_is_reported() {
        let mut world = world();
        let weak = spawn(&mut world, 500.0, 500.0, 1, 100);
        let strong = spawn(&mut world, 520.0, 500.0, 2, 100);
        let mut events = Vec::new();
        resolve_interactions(&mut world, &mut events);

        assert_eq!(world.creature(weak).map(|c| c.stats.hp), Some(80));
        assert_eq!(
            events,
            vec![SimEvent::Damaged {
                who: Actor::Creature(weak),
                by: Actor::Creature(strong),
                hp: 80,
            }]
        );
    }

    #[test]
    fn test_lethal_damage_removes_and_rewards() {
        let mut world = world();
        let a = spawn(&mut world, 500.0, 500.0, 2, 100);
        let b = spawn(&mut world, 520.0, 500.0, 1, 15);
        let mut events = Vec::new();
        resolve_interactions(&mut world, &mut events);

        assert!(world.creature(b).is_none());
        let winner = world.creature(a).expect("winner survives");
        assert_eq!(winner.stats.nutrition, 20);
        assert_eq!(winner.stats.hp, 100);
        assert!(events.contains(&SimEvent::CreatureKilled {
            id: b,
            level: 1,
            by: Actor::Creature(a),
        }));
    }

    #[test]
    fn test_lower_first_creature_dies_and_stops_fighting() {
        let mut world = world();
        let weak = spawn(&mut world, 500.0, 500.0, 2, 10);
        let strong = spawn(&mut world, 520.0, 500.0, 3, 100);
        let bystander = spawn(&mut world, 480.0, 500.0, 1, 100);
        let mut events = Vec::new();
        resolve_interactions(&mut world, &mut events);

        assert!(world.creature(weak).is_none());
        assert_eq!(world.creature(strong).map(|c| c.stats.nutrition), Some(30));
        // The dead creature never got to hit the bystander
        assert_eq!(world.creature(bystander).map(|c| c.stats.hp), Some(100));
    }

    #[test]
    fn test_equal_levels_do_nothing() {
        let mut world = world();
        spawn(&mut world, 500.0, 500.0, 2, 100);
        spawn(&mut world, 510.0, 500.0, 2, 100);
        let mut events = Vec::new();
        resolve_interactions(&mut world, &mut events);
        assert!(world.creatures.iter().all(|c| c.stats.hp == 100));
        assert!(events.is_empty());
    }

    #[test]
    fn test_food_eaten_once() {
        let mut world = world();
        world.player.pos = Vec2::new(300.0, 300.0);
        spawn(&mut world, 310.0, 300.0, 1, 100);
        world.add_food(Vec2::new(305.0, 300.0), 8);
        let mut events = Vec::new();
        let resolution = resolve_interactions(&mut world, &mut events);

        assert!(world.foods.is_empty());
        assert_eq!(resolution.food_eaten, 0);
        assert_eq!(world.food_eaten, 0);
        assert_eq!(world.player.stats.nutrition, 0);
        assert_eq!(world.creatures[0].stats.nutrition, 8);
    }

    #[test]
    fn test_player_eats_and_levels() {
        let mut world = world();
        world.player.pos = Vec2::new(300.0, 300.0);
        world.player.stats.nutrition = 15;
        world.player.stats.hp = 50;
        // Too big for level 1 (threshold 13.33) and checked before the level-up
        world.add_food(Vec2::new(290.0, 300.0), 14);
        world.add_food(Vec2::new(310.0, 300.0), 6);
        let mut events = Vec::new();
        let resolution = resolve_interactions(&mut world, &mut events);

        assert_eq!(resolution.food_eaten, 1);
        assert_eq!(world.food_eaten, 1);
        assert_eq!(world.player.stats.level, 2);
        assert_eq!(world.player.stats.nutrition, 0);
        assert_eq!(world.player.stats.radius, 17.0);
        assert_eq!(world.player.stats.hp, 62);
        assert_eq!(world.foods.len(), 1);
        assert_eq!(world.foods[0].nutrition, 14);
    }

    #[test]
    fn test_creature_eating_clears_target() {
        let mut world = world();
        let id = spawn(&mut world, 300.0, 300.0, 1, 100);
        let food = world.add_food(Vec2::new(300.0, 310.0), 5);
        world.creatures[0].ai.target = Some(crate::sim::Target::Food(food));
        resolve_interactions(&mut world, &mut Vec::new());
        assert_eq!(world.creature(id).and_then(|c| c.ai.target), None);
    }

    #[test]
    fn test_player_kills_creature_without_level_check() {
        let mut world = world();
        world.player.pos = Vec2::new(300.0, 300.0);
        world.player.stats.level = 3;
        world.player.stats.nutrition = 40;
        let id = spawn(&mut world, 310.0, 300.0, 2, 20);
        resolve_interactions(&mut world, &mut Vec::new());

        assert!(world.creature(id).is_none());
        // 40 + N(2) = 70 >= N(3) = 45, yet no level-up this pass
        assert_eq!(world.player.stats.nutrition, 70);
        assert_eq!(world.player.stats.level, 3);
    }

    #[test]
    fn test_player_death_ends_tick() {
        let mut world = world();
        world.player.pos = Vec2::new(300.0, 300.0);
        world.player.stats.hp = 20;
        spawn(&mut world, 310.0, 300.0, 3, 100);
        // An overlapping pair that pass 4 would otherwise resolve
        let victim = spawn(&mut world, 900.0, 900.0, 1, 10);
        spawn(&mut world, 910.0, 900.0, 2, 100);

        let mut events = Vec::new();
        let resolution = resolve_interactions(&mut world, &mut events);

        assert_eq!(resolution.killer_level, Some(3));
        assert_eq!(world.phase, Phase::GameOver { killer_level: 3 });
        assert!(world.player.stats.hp <= 0);
        assert_eq!(world.creature(victim).map(|c| c.stats.hp), Some(10));
    }
}
