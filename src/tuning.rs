//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-tuned from JSON
//! without touching the simulation. Missing fields fall back to defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Wave generator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Clusters every wave starts with (plus 0..=1 random, plus level bonus)
    pub base_clusters: u32,
    /// Horizontal inset of cluster centers from each arena side
    pub center_inset: f32,
    /// Top of the vertical band cluster centers are drawn from
    pub center_band_top: f32,
    /// Height of that band
    pub center_band_height: f32,
    /// Enemies per cluster before the random and level bonus
    pub base_cluster_size: u32,
    /// Placement attempts per slot before the slot is skipped
    pub placement_attempts: u32,
    /// Minimum gap between spawned enemies
    pub min_separation: f32,
    pub spawn_radius_min: f32,
    pub spawn_radius_span: f32,
    pub jitter_x: f32,
    pub jitter_y: f32,
    /// Inset from the arena edges for spawn positions
    pub spawn_margin: f32,
    /// Lowest spawn position as a fraction of arena height
    pub spawn_max_y_fraction: f32,
    pub base_speed_y: f32,
    pub speed_y_jitter: f32,
    pub speed_y_per_level: f32,
    pub base_homing: f32,
    pub homing_jitter: f32,
    pub homing_per_level: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_clusters: 2,
            center_inset: 100.0,
            center_band_top: 30.0,
            center_band_height: 70.0,
            base_cluster_size: 4,
            placement_attempts: 50,
            min_separation: 6.0,
            spawn_radius_min: 10.0,
            spawn_radius_span: 28.0,
            jitter_x: 5.0,
            jitter_y: 3.0,
            spawn_margin: 20.0,
            spawn_max_y_fraction: 0.33,
            base_speed_y: 20.0,
            speed_y_jitter: 10.0,
            speed_y_per_level: 2.5,
            base_homing: 16.0,
            homing_jitter: 16.0,
            homing_per_level: 1.8,
        }
    }
}

/// Separation solver parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationTuning {
    /// Padding added to both boxes before the overlap test
    pub margin: f32,
    /// Relaxation passes per tick
    pub passes: u32,
    /// Cap on the vertical push per pair per pass
    pub max_vertical_push: f32,
    /// Distance of the horizontal bounds from each arena side
    pub side_margin: f32,
}

impl Default for SeparationTuning {
    fn default() -> Self {
        Self {
            margin: 2.0,
            passes: 2,
            max_vertical_push: 2.0,
            side_margin: 20.0,
        }
    }
}

/// Complete balance sheet for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub starting_lives: i32,

    // === Player ===
    pub player_size: Vec2,
    pub player_speed: f32,
    /// Spawn height measured up from the arena bottom
    pub player_spawn_offset: f32,
    /// Inset the player is clamped into
    pub player_margin: f32,
    pub invulnerability: f32,

    // === Player fire ===
    pub shot_size: Vec2,
    pub shot_speed: f32,
    pub single_shot_cooldown: f32,
    pub triple_shot_cooldown: f32,
    /// Horizontal distance between triple-shot lanes
    pub triple_shot_spread: f32,

    // === Enemies ===
    pub enemy_size: Vec2,
    /// Proportional steering factor toward the player
    pub homing_factor: f32,
    pub enemy_shot_speed: f32,
    pub enemy_shot_jitter: f32,
    pub enemy_fire_base: f32,
    pub enemy_fire_per_level: f32,
    pub enemy_fire_min: f32,
    pub score_per_kill: u64,

    // === Power-ups ===
    pub powerup_chance: f32,
    pub powerup_size: Vec2,
    pub powerup_fall_speed: f32,
    pub powerup_fall_jitter: f32,
    pub power_duration: f32,

    // === Cleanup ===
    pub explosion_lifetime: f32,
    /// Distance past the top/bottom edge before projectiles are dropped
    pub projectile_cull_margin: f32,
    pub powerup_cull_margin: f32,

    pub wave: WaveTuning,
    pub separation: SeparationTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            starting_lives: 10,

            player_size: Vec2::new(42.0, 20.0),
            player_speed: 260.0,
            player_spawn_offset: 70.0,
            player_margin: 20.0,
            invulnerability: 1.2,

            shot_size: Vec2::new(4.0, 8.0),
            shot_speed: 380.0,
            single_shot_cooldown: 0.35,
            triple_shot_cooldown: 0.28,
            triple_shot_spread: 10.0,

            enemy_size: Vec2::new(28.0, 18.0),
            homing_factor: 0.6,
            enemy_shot_speed: 150.0,
            enemy_shot_jitter: 50.0,
            enemy_fire_base: 1.2,
            enemy_fire_per_level: 0.08,
            enemy_fire_min: 0.6,
            score_per_kill: 10,

            powerup_chance: 0.06,
            powerup_size: Vec2::new(20.0, 20.0),
            powerup_fall_speed: 90.0,
            powerup_fall_jitter: 20.0,
            power_duration: 8.0,

            explosion_lifetime: 0.35,
            projectile_cull_margin: 20.0,
            powerup_cull_margin: 24.0,

            wave: WaveTuning::default(),
            separation: SeparationTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning sheet
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse a tuning sheet, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning sheet ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Enemy fire interval for a level (faster with level, floored)
    pub fn enemy_fire_interval(&self, level: u32) -> f32 {
        (self.enemy_fire_base - level as f32 * self.enemy_fire_per_level).max(self.enemy_fire_min)
    }
}
