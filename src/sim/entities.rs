//! Gameplay entities
//!
//! Passive data plus per-tick motion. Removal is two-phase: collision code
//! sets `dead`, and the end-of-tick cleanup drops tombstoned entities.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Arena, Bounded};
use crate::tuning::Tuning;

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per second
    pub speed: f32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
    /// Seconds of post-hit flicker remaining
    pub invulnerable: f32,
    /// Seconds of triple shot remaining
    pub power_timer: f32,
}

impl Player {
    /// Spawn centred horizontally near the bottom of the arena
    pub fn new(arena: Arena, tuning: &Tuning) -> Self {
        let size = tuning.player_size;
        Self {
            pos: Vec2::new(
                arena.width / 2.0 - size.x / 2.0,
                arena.height - tuning.player_spawn_offset,
            ),
            size,
            speed: tuning.player_speed,
            cooldown: 0.0,
            invulnerable: 0.0,
            power_timer: 0.0,
        }
    }

    pub fn triple_shot(&self) -> bool {
        self.power_timer > 0.0
    }

    /// Move along `dir` (unnormalised key axes) and clamp into the arena inset
    pub fn advance(&mut self, dir: Vec2, dt: f32, arena: Arena, margin: f32) {
        // Diagonals are not faster than straight moves
        let len = dir.length();
        let len = if len > 0.0 { len } else { 1.0 };
        self.pos += dir / len * self.speed * dt;

        self.pos.x = self.pos.x.min(arena.width - self.size.x - margin).max(margin);
        self.pos.y = self.pos.y.min(arena.height - self.size.y - margin).max(margin);

        if self.invulnerable > 0.0 {
            self.invulnerable -= dt;
        }
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Enemy hull variants (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Fighter,
    Cruiser,
    Scout,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Fighter, EnemyKind::Cruiser, EnemyKind::Scout];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A member of the active wave
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: EnemyKind,
    /// Index of the cluster this enemy spawned in
    pub cluster: u32,
    /// Descent speed (pixels/s)
    pub speed_y: f32,
    /// Horizontal steering budget (pixels/s)
    pub homing: f32,
    pub dead: bool,
}

impl Enemy {
    /// Chase `target_x` horizontally while descending at a fixed rate
    pub fn steer(&mut self, target_x: f32, factor: f32, dt: f32) {
        let center_x = self.pos.x + self.size.x / 2.0;
        let want = (target_x - center_x) * factor;
        let max_step = self.homing * dt;
        self.pos.x += (want * dt).min(max_step).max(-max_step);
        self.pos.y += self.speed_y * dt;
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub owner: Owner,
    pub dead: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, size: Vec2, owner: Owner) -> Self {
        Self {
            pos,
            vel,
            size,
            owner,
            dead: false,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Still live and inside the vertical playfield (plus `cull_margin`)
    pub fn in_play(&self, arena: Arena, cull_margin: f32) -> bool {
        if self.dead {
            return false;
        }
        match self.owner {
            Owner::Player => self.pos.y > -cull_margin,
            Owner::Enemy => self.pos.y < arena.height + cull_margin,
        }
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Expanding ring left behind by a destroyed ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    /// Center of the burst
    pub pos: Vec2,
    pub age: f32,
    pub dead: bool,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            age: 0.0,
            dead: false,
        }
    }

    pub fn advance(&mut self, dt: f32, lifetime: f32) {
        self.age += dt;
        if self.age > lifetime {
            self.dead = true;
        }
    }
}

/// Falling triple-shot pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub fall_speed: f32,
    /// Drives the pulse animation
    pub age: f32,
    pub dead: bool,
}

impl PowerUp {
    /// Drop a pickup centred on `center`
    pub fn spawn_at<R: Rng + ?Sized>(center: Vec2, tuning: &Tuning, rng: &mut R) -> Self {
        let size = tuning.powerup_size;
        Self {
            pos: center - size / 2.0,
            size,
            fall_speed: tuning.powerup_fall_speed + rng.random::<f32>() * tuning.powerup_fall_jitter,
            age: 0.0,
            dead: false,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.age += dt;
        self.pos.y += self.fall_speed * dt;
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player() -> Player {
        Player::new(Arena::new(800.0, 600.0), &Tuning::default())
    }

    #[test]
    fn test_player_spawn() {
        let p = player();
        assert_eq!(p.pos, Vec2::new(379.0, 530.0));
        assert!(!p.triple_shot());
    }

    #[test]
    fn test_player_diagonal_is_normalized() {
        let arena = Arena::new(800.0, 600.0);
        let mut p = player();
        let start = p.pos;
        p.advance(Vec2::new(1.0, -1.0), 0.1, arena, 20.0);
        let moved = (p.pos - start).length();
        assert!((moved - 26.0).abs() < 1e-3, "moved {moved}");
    }

    #[test]
    fn test_player_clamped_to_inset() {
        let arena = Arena::new(800.0, 600.0);
        let mut p = player();
        for _ in 0..100 {
            p.advance(Vec2::new(-1.0, 1.0), 0.1, arena, 20.0);
        }
        assert_eq!(p.pos.x, 20.0);
        assert_eq!(p.pos.y, 600.0 - 20.0 - 20.0);
    }

    #[test]
    fn test_enemy_steering_is_capped() {
        let mut e = Enemy {
            pos: Vec2::new(100.0, 50.0),
            size: Vec2::new(28.0, 18.0),
            kind: EnemyKind::Fighter,
            cluster: 0,
            speed_y: 20.0,
            homing: 10.0,
            dead: false,
        };
        // Target far to the right: proportional want is huge, budget is 10 px/s
        e.steer(700.0, 0.6, 0.5);
        assert!((e.pos.x - 105.0).abs() < 1e-4);
        assert!((e.pos.y - 60.0).abs() < 1e-4);

        // Target close by: proportional step below the budget
        let mut e2 = e.clone();
        let center = e2.pos.x + 14.0;
        e2.steer(center - 2.0, 0.6, 1.0);
        assert!((e2.pos.x - (105.0 - 1.2)).abs() < 1e-4);
    }

    #[test]
    fn test_projectile_in_play() {
        let arena = Arena::new(800.0, 600.0);
        let size = Vec2::new(4.0, 8.0);
        let up = Projectile::new(Vec2::new(0.0, -19.0), Vec2::new(0.0, -380.0), size, Owner::Player);
        assert!(up.in_play(arena, 20.0));
        let gone = Projectile::new(Vec2::new(0.0, -20.0), Vec2::ZERO, size, Owner::Player);
        assert!(!gone.in_play(arena, 20.0));
        let down = Projectile::new(Vec2::new(0.0, 620.0), Vec2::ZERO, size, Owner::Enemy);
        assert!(!down.in_play(arena, 20.0));
        let mut hit = Projectile::new(Vec2::new(0.0, 100.0), Vec2::ZERO, size, Owner::Enemy);
        hit.dead = true;
        assert!(!hit.in_play(arena, 20.0));
    }

    #[test]
    fn test_explosion_expires() {
        let mut e = Explosion::new(Vec2::ZERO);
        e.advance(0.3, 0.35);
        assert!(!e.dead);
        e.advance(0.1, 0.35);
        assert!(e.dead);
    }

    #[test]
    fn test_powerup_spawn_centered() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = Tuning::default();
        let p = PowerUp::spawn_at(Vec2::new(100.0, 100.0), &tuning, &mut rng);
        assert_eq!(p.pos, Vec2::new(90.0, 90.0));
        assert!(p.fall_speed >= 90.0 && p.fall_speed <= 110.0);
    }
}
