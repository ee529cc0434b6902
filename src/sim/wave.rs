//! Wave generation
//!
//! A wave is a handful of loose clusters near the top of the arena. Each slot
//! samples positions in an annulus around its cluster center and keeps the
//! first one that respects the minimum separation. Placement is best effort:
//! a slot that runs out of attempts is dropped, so the wave can come out
//! smaller than requested.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entities::{Enemy, EnemyKind};
use super::geometry::{Aabb, Arena, Bounded};
use crate::tuning::Tuning;

/// Difficulty scalar, 0 on the first level
#[inline]
pub fn difficulty(level: u32) -> u32 {
    level.saturating_sub(1)
}

/// Number of clusters for a level before the random bonus
pub fn cluster_bonus(level: u32) -> u32 {
    (difficulty(level) / 4).min(1)
}

/// Extra enemies per cluster for a level
pub fn cluster_size_bonus(level: u32) -> u32 {
    (difficulty(level) / 5).min(2)
}

/// Build the formation for `level`
pub fn generate_wave<R: Rng + ?Sized>(
    level: u32,
    arena: Arena,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Enemy> {
    let w = &tuning.wave;
    let l = difficulty(level) as f32;
    let size = tuning.enemy_size;

    let clusters = w.base_clusters + rng.random_range(0..=1) + cluster_bonus(level);
    let mut enemies: Vec<Enemy> = Vec::new();
    let mut requested = 0u32;

    for cluster in 0..clusters {
        let center = Vec2::new(
            w.center_inset + rng.random::<f32>() * (arena.width - 2.0 * w.center_inset),
            w.center_band_top + rng.random::<f32>() * w.center_band_height,
        );
        let count = w.base_cluster_size + rng.random_range(0..=2) + cluster_size_bonus(level);
        requested += count;

        for slot in 0..count {
            let Some(pos) = place(center, &enemies, arena, tuning, rng) else {
                log::trace!("Wave {}: cluster {} slot {} skipped", level, cluster, slot);
                continue;
            };

            enemies.push(Enemy {
                pos,
                size,
                kind: EnemyKind::random(rng),
                cluster,
                speed_y: w.base_speed_y + rng.random::<f32>() * w.speed_y_jitter + l * w.speed_y_per_level,
                homing: w.base_homing + rng.random::<f32>() * w.homing_jitter + l * w.homing_per_level,
                dead: false,
            });
        }
    }

    log::debug!(
        "Wave {}: {} clusters, {}/{} enemies placed",
        level,
        clusters,
        enemies.len(),
        requested
    );
    enemies
}

/// Find a spawn position near `center` that keeps clear of `placed`
fn place<R: Rng + ?Sized>(
    center: Vec2,
    placed: &[Enemy],
    arena: Arena,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<Vec2> {
    let w = &tuning.wave;
    let size = tuning.enemy_size;

    for _ in 0..w.placement_attempts {
        let angle = rng.random::<f32>() * TAU;
        let radius = w.spawn_radius_min + rng.random::<f32>() * w.spawn_radius_span;
        let jitter = Vec2::new(
            (rng.random::<f32>() * 2.0 - 1.0) * w.jitter_x,
            (rng.random::<f32>() * 2.0 - 1.0) * w.jitter_y,
        );
        let raw = center + Vec2::new(angle.cos(), angle.sin()) * radius + jitter;

        let pos = Vec2::new(
            raw.x.min(arena.width - w.spawn_margin - size.x).max(w.spawn_margin),
            raw.y.min(arena.height * w.spawn_max_y_fraction).max(w.spawn_margin),
        );
        let candidate = Aabb::new(pos, size);

        let clear = placed
            .iter()
            .all(|other| !candidate.overlaps_with_margin(&other.bounds(), w.min_separation));
        if clear {
            return Some(pos);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    #[test]
    fn test_level_scaling_helpers() {
        assert_eq!(difficulty(0), 0);
        assert_eq!(difficulty(1), 0);
        assert_eq!(cluster_bonus(4), 0);
        assert_eq!(cluster_bonus(5), 1);
        assert_eq!(cluster_bonus(40), 1);
        assert_eq!(cluster_size_bonus(5), 0);
        assert_eq!(cluster_size_bonus(6), 1);
        assert_eq!(cluster_size_bonus(11), 2);
        assert_eq!(cluster_size_bonus(99), 2);
    }

    #[test]
    fn test_first_level_wave_shape() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let wave = generate_wave(1, arena(), &tuning, &mut rng);

        // 2-3 clusters of 4-6, minus skipped slots
        assert!(!wave.is_empty());
        assert!(wave.len() <= 18);
        for e in &wave {
            assert!(!e.dead);
            assert!(e.cluster < 3);
            assert!(e.speed_y >= 20.0 && e.speed_y <= 30.0);
            assert!(e.homing >= 16.0 && e.homing <= 32.0);
            assert!(e.pos.x >= 20.0 && e.pos.x <= 800.0 - 20.0 - 28.0);
            assert!(e.pos.y >= 20.0 && e.pos.y <= 600.0 * 0.33);
        }
    }

    #[test]
    fn test_speeds_ramp_with_level() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let wave = generate_wave(11, arena(), &tuning, &mut rng);
        for e in &wave {
            assert!(e.speed_y >= 20.0 + 25.0);
            assert!(e.homing >= 16.0 + 18.0 - 1e-3);
        }
    }

    #[test]
    fn test_exhausted_slots_are_skipped() {
        // One attempt per slot in a tiny arena: most slots collide and are dropped
        let mut tuning = Tuning::default();
        tuning.wave.placement_attempts = 1;
        let mut rng = Pcg32::seed_from_u64(3);
        let wave = generate_wave(1, Arena::new(100.0, 100.0), &tuning, &mut rng);
        assert!(!wave.is_empty());
        assert!(wave.len() < 8);
    }

    #[test]
    fn test_same_seed_same_wave() {
        let tuning = Tuning::default();
        let a = generate_wave(3, arena(), &tuning, &mut Pcg32::seed_from_u64(9));
        let b = generate_wave(3, arena(), &tuning, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.kind, y.kind);
        }
    }

    proptest! {
        #[test]
        fn prop_spawned_enemies_keep_min_separation(seed in any::<u64>(), level in 1u32..30) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let wave = generate_wave(level, arena(), &tuning, &mut rng);
            prop_assert!(!wave.is_empty());
            for (i, a) in wave.iter().enumerate() {
                for b in &wave[i + 1..] {
                    prop_assert!(!a.bounds().overlaps_with_margin(&b.bounds(), tuning.wave.min_separation));
                }
            }
        }

        #[test]
        fn prop_wave_never_exceeds_request(seed in any::<u64>(), level in 1u32..30) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let wave = generate_wave(level, arena(), &tuning, &mut rng);
            let max_clusters = 3 + cluster_bonus(level);
            let max_per_cluster = 6 + cluster_size_bonus(level);
            prop_assert!(wave.len() as u32 <= max_clusters * max_per_cluster);
        }
    }
}
