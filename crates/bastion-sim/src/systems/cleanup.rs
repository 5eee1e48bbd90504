//! Cleanup system: removes enemies that died or left the world.

use hecs::{Entity, World};
use tracing::debug;

use bastion_core::components::{Enemy, Health};
use bastion_core::constants::WORLD_RADIUS;
use bastion_core::events::SimEvent;
use bastion_core::state::ScoreView;
use bastion_core::types::Position;

/// Despawn dead enemies (scored as destroyed) and enemies beyond
/// `WORLD_RADIUS` from the origin (scored as escaped).
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    events: &mut Vec<SimEvent>,
    score: &mut ScoreView,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;

    for (entity, (enemy, health)) in world.query_mut::<(&Enemy, &Health)>() {
        if !health.is_alive() {
            debug!(enemy_id = enemy.id, "enemy destroyed");
            events.push(SimEvent::EnemyDestroyed { enemy_id: enemy.id });
            score.enemies_destroyed += 1;
            despawn_buffer.push(entity);
        }
    }

    for (entity, (enemy, pos)) in world.query_mut::<(&Enemy, &Position)>() {
        if despawn_buffer.contains(&entity) {
            continue;
        }
        if pos.x * pos.x + pos.y * pos.y > radius_sq {
            debug!(enemy_id = enemy.id, "enemy left the world");
            score.enemies_escaped += 1;
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::enums::TargetType;

    fn enemy(world: &mut World, id: u32, pos: Position, hp: f64) -> Entity {
        let mut health = Health::new(100.0);
        health.current = hp;
        world.spawn((
            Enemy {
                id,
                target_type: TargetType::Ground,
            },
            pos,
            health,
        ))
    }

    #[test]
    fn test_dead_and_escaped_enemies_are_removed() {
        let mut world = World::new();
        let alive = enemy(&mut world, 1, Position::new(10.0, 0.0, 0.0), 50.0);
        let dead = enemy(&mut world, 2, Position::new(10.0, 0.0, 0.0), 0.0);
        let gone = enemy(&mut world, 3, Position::new(WORLD_RADIUS + 1.0, 0.0, 0.0), 50.0);
        let mut events = Vec::new();
        let mut score = ScoreView::default();
        let mut buffer = Vec::new();

        run(&mut world, &mut events, &mut score, &mut buffer);

        assert!(world.contains(alive));
        assert!(!world.contains(dead));
        assert!(!world.contains(gone));
        assert_eq!(events, vec![SimEvent::EnemyDestroyed { enemy_id: 2 }]);
        assert_eq!(score.enemies_destroyed, 1);
        assert_eq!(score.enemies_escaped, 1);
    }
}
