//! Camera follow controller
//!
//! The camera keeps a fixed horizontal offset and eases upward as the tower
//! grows, always looking at the top of the stack.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_HEIGHT, CAMERA_START_POS};
use crate::lerp;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: CAMERA_START_POS,
            look_at: Vec3::ZERO,
        }
    }
}

impl Camera {
    /// Height of the top block's center for a tower of `stack_len` blocks
    #[inline]
    pub fn target_height(stack_len: usize) -> f32 {
        (stack_len.saturating_sub(1) as f32 * BLOCK_HEIGHT).max(0.0)
    }

    /// Snap back to the start pose
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Ease toward the pose for `stack_len` blocks
    ///
    /// The blend factor `rate * dt` is clamped to [0, 1], so the camera
    /// approaches the target monotonically and never passes it.
    pub fn follow(&mut self, stack_len: usize, rate: f32, dt: f32) {
        let height = Self::target_height(stack_len);
        self.position.y = lerp(self.position.y, CAMERA_START_POS.y + height, rate * dt);
        self.position.x = CAMERA_START_POS.x;
        self.position.z = CAMERA_START_POS.z;
        self.look_at = Vec3::new(0.0, height, 0.0);
    }

    /// Jump straight to the pose for `stack_len` blocks
    pub fn snap(&mut self, stack_len: usize) {
        self.follow(stack_len, 1.0, 1.0);
    }
}
