//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only (carried in the state)
//! - Side effects reported as events, never performed
//! - No rendering or platform dependencies

pub mod entities;
pub mod geometry;
pub mod separation;
pub mod state;
pub mod tick;
pub mod wave;

pub use entities::{Enemy, EnemyKind, Explosion, Owner, Player, PowerUp, Projectile};
pub use geometry::{Aabb, Arena, Bounded, HorizontalBounds};
pub use separation::separate;
pub use state::{GameEvent, GamePhase, SessionState, Toast};
pub use tick::{TickInput, tick};
pub use wave::generate_wave;
