//! Falling debris
//!
//! Cut-off pieces of a trimmed block tumble away under gravity. Debris is
//! purely decorative: particles never interact with each other or the tower,
//! so they may be integrated in any order.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Axis, Block};
use crate::consts::*;

/// A single tumbling piece of a trimmed block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    /// Stable identity, independent of geometry
    pub id: u32,
    pub block: Block,
    pub velocity: Vec3,
    /// Accumulated Euler rotation (radians)
    pub rotation: Vec3,
    /// Fixed angular velocity (radians/s)
    pub rotation_speed: Vec3,
}

impl Debris {
    /// Create a particle flung toward the cut side
    ///
    /// Lateral speed is `sign * U(0,1)` along `axis`, the vertical pop is
    /// `U(0, DEBRIS_POP_MAX)` and each rotation axis spins at `U(0,1)`.
    pub fn launch<R: Rng + ?Sized>(id: u32, block: Block, axis: Axis, sign: f32, rng: &mut R) -> Self {
        let mut velocity = Vec3::ZERO;
        axis.set(&mut velocity, sign * rng.random::<f32>());
        velocity.y = rng.random_range(0.0..DEBRIS_POP_MAX);

        let rotation_speed = Vec3::new(rng.random(), rng.random(), rng.random());

        Self {
            id,
            block,
            velocity,
            rotation: Vec3::ZERO,
            rotation_speed,
        }
    }

    /// Advance by `dt` seconds
    pub fn integrate(&mut self, dt: f32) {
        self.velocity.y -= GRAVITY * dt;

        let pos = &mut self.block.position;
        pos.x += self.velocity.x * dt * LATERAL_SPEED_SCALE;
        pos.y += self.velocity.y * dt;
        pos.z += self.velocity.z * dt * LATERAL_SPEED_SCALE;

        self.rotation += self.rotation_speed * dt;
    }

    /// Fallen out of view
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.block.position.y < DEBRIS_REMOVAL_Y
    }
}

/// Live debris, in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebrisField {
    particles: Vec<Debris>,
    next_id: u32,
}

impl DebrisField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a particle cut from `block`; returns its id
    pub fn spawn<R: Rng + ?Sized>(&mut self, block: Block, axis: Axis, sign: f32, rng: &mut R) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.particles.push(Debris::launch(id, block, axis, sign, rng));
        id
    }

    /// Integrate every particle, then drop the ones that fell below the
    /// removal altitude. Returns the ids removed this step.
    pub fn step(&mut self, dt: f32) -> Vec<u32> {
        let mut removed = Vec::new();
        for particle in &mut self.particles {
            particle.integrate(dt);
            if particle.is_expired() {
                removed.push(particle.id);
            }
        }
        if !removed.is_empty() {
            self.particles.retain(|p| !p.is_expired());
            log::debug!("Removed {} debris particle(s)", removed.len());
        }
        removed
    }

    /// Discard everything (ids keep counting up)
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Debris> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Debris] {
        &self.particles
    }

    pub fn get(&self, id: u32) -> Option<&Debris> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
