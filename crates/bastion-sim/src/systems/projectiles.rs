//! Projectile flight and impact.
//!
//! Projectiles fly in a straight line toward the impact point captured at
//! launch. On arrival they damage every live enemy of their target type
//! within the damage radius, then disappear. A projectile never follows its
//! target.

use hecs::{Entity, World};
use tracing::debug;

use bastion_core::components::{Enemy, Health, Projectile};
use bastion_core::constants::{DIRECT_HIT_RADIUS, DT, PROJECTILE_IMPACT_TOLERANCE};
use bastion_core::events::SimEvent;
use bastion_core::types::Position;

/// Advance all projectiles and resolve the ones that arrived this tick.
pub fn run(world: &mut World, events: &mut Vec<SimEvent>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let mut arrived: Vec<Projectile> = Vec::new();
    for (entity, (pos, projectile)) in world.query_mut::<(&mut Position, &Projectile)>() {
        *pos = pos.step_toward(&projectile.impact_point, projectile.speed * DT);
        if pos.range_to(&projectile.impact_point) <= PROJECTILE_IMPACT_TOLERANCE {
            arrived.push(*projectile);
            despawn_buffer.push(entity);
        }
    }

    for projectile in &arrived {
        let hits = apply_damage(world, projectile);
        debug!(
            weapon_id = projectile.weapon_id,
            hits, "projectile impact"
        );
        events.push(SimEvent::ProjectileImpact {
            tower_id: projectile.weapon_id,
            position: projectile.impact_point,
            hits,
        });
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Radius around the impact point in which enemies take damage.
pub fn damage_radius(projectile: &Projectile) -> f64 {
    projectile.splash_radius.max(DIRECT_HIT_RADIUS)
}

/// Damage live enemies of the projectile's target type around the impact
/// point. Returns the number of enemies hit.
fn apply_damage(world: &mut World, projectile: &Projectile) -> u32 {
    let radius = damage_radius(projectile);
    let mut hits = 0;
    for (_entity, (pos, enemy, health)) in world.query_mut::<(&Position, &Enemy, &mut Health)>() {
        if enemy.target_type != projectile.target_type || !health.is_alive() {
            continue;
        }
        if pos.range_to(&projectile.impact_point) <= radius {
            health.current = (health.current - projectile.damage).max(0.0);
            hits += 1;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::enums::TargetType;

    fn projectile(impact_point: Position, splash_radius: f64) -> Projectile {
        Projectile {
            weapon_id: 1,
            impact_point,
            speed: 30.0,
            damage: 25.0,
            splash_radius,
            target_type: TargetType::Ground,
        }
    }

    fn enemy(world: &mut World, id: u32, target_type: TargetType, pos: Position) -> Entity {
        world.spawn((Enemy { id, target_type }, pos, Health::new(100.0)))
    }

    #[test]
    fn test_projectile_flies_at_its_speed() {
        let mut world = World::new();
        let shot = world.spawn((
            projectile(Position::new(0.0, 10.0, 0.0), 0.0),
            Position::default(),
        ));
        let mut events = Vec::new();
        let mut buffer = Vec::new();

        run(&mut world, &mut events, &mut buffer);

        let pos = *world.get::<&Position>(shot).unwrap();
        assert!((pos.y - 1.0).abs() < 1e-9, "30 m/s at 30 Hz is 1 m per tick");
        assert!(events.is_empty());
    }

    #[test]
    fn test_impact_damages_matching_enemies_in_radius() {
        let mut world = World::new();
        let impact = Position::new(0.0, 0.5, 0.0);
        let near = enemy(&mut world, 1, TargetType::Ground, Position::new(2.0, 0.5, 0.0));
        let far = enemy(&mut world, 2, TargetType::Ground, Position::new(9.0, 0.5, 0.0));
        let flyer = enemy(&mut world, 3, TargetType::Air, Position::new(0.0, 0.5, 0.0));
        world.spawn((projectile(impact, 3.0), Position::default()));
        let mut events = Vec::new();
        let mut buffer = Vec::new();

        run(&mut world, &mut events, &mut buffer);

        assert_eq!(world.get::<&Health>(near).unwrap().current, 75.0);
        assert_eq!(world.get::<&Health>(far).unwrap().current, 100.0);
        assert_eq!(world.get::<&Health>(flyer).unwrap().current, 100.0);
        assert_eq!(
            events,
            vec![SimEvent::ProjectileImpact {
                tower_id: 1,
                position: impact,
                hits: 1
            }]
        );
        assert_eq!(world.query::<&Projectile>().iter().count(), 0);
    }

    #[test]
    fn test_direct_hit_radius_without_splash() {
        let p = projectile(Position::default(), 0.0);
        assert_eq!(damage_radius(&p), DIRECT_HIT_RADIUS);
        let p = projectile(Position::default(), 4.0);
        assert_eq!(damage_radius(&p), 4.0);
    }
}
