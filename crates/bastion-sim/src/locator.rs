//! Target locators: pick the best target for a weapon and answer range queries.

use glam::DVec3;
use hecs::{Entity, World};

use bastion_core::components::{Enemy, Health};
use bastion_core::definitions::EffectiveWeaponDefinition;
use bastion_core::enums::TargetType;
use bastion_core::types::Position;

/// Selects targets for a weapon.
pub trait TargetLocator: Send + Sync {
    /// Best target of `target_type` for a weapon at `origin`, or `None`.
    fn locate(
        &self,
        world: &World,
        origin: Position,
        forward: DVec3,
        target_type: TargetType,
        effective: &EffectiveWeaponDefinition,
    ) -> Option<Entity>;

    /// Whether `target` can be attacked from `origin`.
    fn is_in_attack_range(
        &self,
        origin: Position,
        target: Position,
        forward: DVec3,
        effective: &EffectiveWeaponDefinition,
    ) -> bool;
}

/// Nearest live enemy inside the range ring and the firing arc.
///
/// Range is measured on the horizontal plane, so height differences between
/// the weapon mount and the target do not matter. Ties go to the lower entity id.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestInArcLocator;

impl TargetLocator for NearestInArcLocator {
    fn locate(
        &self,
        world: &World,
        origin: Position,
        forward: DVec3,
        target_type: TargetType,
        effective: &EffectiveWeaponDefinition,
    ) -> Option<Entity> {
        let mut query = world.query::<(&Enemy, &Position, Option<&Health>)>();
        query
            .iter()
            .filter(|(_, (enemy, _, health))| {
                enemy.target_type == target_type && health.is_none_or(|h| h.is_alive())
            })
            .filter(|(_, (_, pos, _))| self.is_in_attack_range(origin, **pos, forward, effective))
            .map(|(entity, (_, pos, _))| (entity, origin.horizontal_range_to(pos)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.id().cmp(&b.0.id())))
            .map(|(entity, _)| entity)
    }

    fn is_in_attack_range(
        &self,
        origin: Position,
        target: Position,
        forward: DVec3,
        effective: &EffectiveWeaponDefinition,
    ) -> bool {
        let range = origin.horizontal_range_to(&target);
        if range < effective.min_range || range > effective.max_range {
            return false;
        }
        if effective.attack_angle_degrees >= 360.0 {
            return true;
        }

        let to_target = DVec3::new(target.x - origin.x, target.y - origin.y, 0.0);
        let flat_forward = DVec3::new(forward.x, forward.y, 0.0);
        if to_target.length_squared() <= f64::EPSILON || flat_forward.length_squared() <= f64::EPSILON {
            return true;
        }
        let angle = flat_forward.angle_between(to_target).to_degrees();
        angle <= effective.attack_angle_degrees * 0.5
    }
}
