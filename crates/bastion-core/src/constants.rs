//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Convert a duration in seconds to whole ticks (rounded to nearest).
/// Negative durations map to zero.
pub fn secs_to_ticks(secs: f64) -> u64 {
    (secs * TICK_RATE as f64).round().max(0.0) as u64
}

// --- World bounds ---

/// Horizontal radius of the playable area in meters. Anything beyond is despawned.
pub const WORLD_RADIUS: f64 = 2_000.0;

// --- Towers ---

/// Footprint radius used when a placement command does not specify one.
pub const DEFAULT_TOWER_FOOTPRINT: f64 = 1.5;

/// Height of the weapon mount above the tower base (meters).
pub const WEAPON_MOUNT_HEIGHT: f64 = 4.0;

// --- Stat calculation ---

/// Extra range granted per meter of platform height by the elevation calculator.
pub const RANGE_BONUS_PER_METER: f64 = 0.5;

/// Upper bound on the elevation range multiplier.
pub const MAX_ELEVATION_RANGE_BONUS: f64 = 0.5;

// --- Projectiles ---

/// Distance at which a projectile counts as having reached its impact point.
pub const PROJECTILE_IMPACT_TOLERANCE: f64 = 0.25;

/// Damage radius of projectiles without splash.
pub const DIRECT_HIT_RADIUS: f64 = 1.0;

// --- Enemies ---

/// Health assigned to spawned enemies when a wave entry does not specify one.
pub const DEFAULT_ENEMY_HEALTH: f64 = 100.0;

/// Ground enemy speed (m/s).
pub const GROUND_ENEMY_SPEED: f64 = 3.0;

/// Air enemy speed (m/s).
pub const AIR_ENEMY_SPEED: f64 = 6.0;

/// Cruise height of air enemies (meters).
pub const AIR_ENEMY_ALTITUDE: f64 = 25.0;

/// Lateral spawn jitter applied by the wave spawner (meters, +/-).
pub const SPAWN_JITTER: f64 = 5.0;
