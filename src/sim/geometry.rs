//! Block geometry and the overlap trimmer
//!
//! Blocks are axis-aligned cuboids described by their center and full
//! extents. Each level of the tower slides along a single horizontal axis;
//! landing a block trims it to the footprint it shares with the block
//! beneath and turns the rest into debris.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::BLOCK_HEIGHT;
use crate::palette::Hsl;

/// Horizontal axis a level slides and is trimmed along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Odd levels slide on x, even levels on z (level 1 is the first mover)
    #[inline]
    pub fn for_level(level: u32) -> Self {
        if level % 2 == 1 { Axis::X } else { Axis::Z }
    }

    /// Component index into a `Vec3`
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Z => 2,
        }
    }

    /// The other horizontal axis
    pub fn perpendicular(self) -> Self {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    #[inline]
    pub fn get(self, v: Vec3) -> f32 {
        v[self.index()]
    }

    #[inline]
    pub fn set(self, v: &mut Vec3, value: f32) {
        v[self.index()] = value;
    }
}

/// An axis-aligned cuboid with a cosmetic colour tag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Center of the cuboid
    pub position: Vec3,
    /// Full extents (width, height, depth)
    pub size: Vec3,
    pub color: Hsl,
}

impl Block {
    pub fn new(position: Vec3, size: Vec3, color: Hsl) -> Self {
        Self {
            position,
            size,
            color,
        }
    }

    /// All extents strictly positive and every component finite
    pub fn is_valid(&self) -> bool {
        self.size.is_finite() && self.position.is_finite() && self.size.min_element() > 0.0
    }

    /// Lower corner
    pub fn min(&self) -> Vec3 {
        self.position - self.size / 2.0
    }

    /// Upper corner
    pub fn max(&self) -> Vec3 {
        self.position + self.size / 2.0
    }

    /// Whether this block's footprint along `axis` lies inside `other`'s
    pub fn within_along(&self, other: &Block, axis: Axis, epsilon: f32) -> bool {
        axis.get(self.min()) >= axis.get(other.min()) - epsilon
            && axis.get(self.max()) <= axis.get(other.max()) + epsilon
    }
}

/// The result of landing a block on top of another
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trim {
    /// No shared footprint: the tower collapses
    Collapse,
    /// The block was trimmed and placed
    Cut(Cut),
}

/// Geometry produced by a successful trim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    /// The trimmed block, one level above the block beneath
    pub placed: Block,
    /// The cut-off remainder; `None` when the landing was perfect
    pub debris: Option<Block>,
    /// Signed offset of the landed block from the one beneath
    pub delta: f32,
    /// Shared footprint length along the trim axis
    pub overlap: f32,
}

impl Cut {
    /// The landing was dead-center
    pub fn is_perfect(&self) -> bool {
        self.debris.is_none()
    }

    /// Side of the cut (+1 or -1) along the trim axis
    pub fn sign(&self) -> f32 {
        crate::cut_sign(self.delta)
    }
}

/// Trim `active` against `prev` along `axis`
///
/// Only the active block's position along `axis` and its colour are read;
/// everything else is inherited from `prev`. Malformed input (non-positive
/// or non-finite extents, non-finite positions) is treated as a collapse.
pub fn trim_block(prev: &Block, active: &Block, axis: Axis) -> Trim {
    let landed = axis.get(active.position);
    if !prev.is_valid() || !landed.is_finite() {
        log::warn!(
            "Degenerate placement input (size {:?}, landed {}), treating as collapse",
            prev.size,
            landed
        );
        return Trim::Collapse;
    }

    let prev_extent = axis.get(prev.size);
    let prev_center = axis.get(prev.position);
    let delta = landed - prev_center;
    let overlap = prev_extent - delta.abs();

    if overlap <= 0.0 {
        return Trim::Collapse;
    }

    let mut placed = Block {
        position: prev.position + Vec3::Y * BLOCK_HEIGHT,
        size: prev.size,
        color: active.color,
    };
    axis.set(&mut placed.size, overlap);
    axis.set(&mut placed.position, prev_center + delta / 2.0);

    let debris_extent = prev_extent - overlap;
    let debris = (debris_extent > 0.0).then(|| {
        let mut debris = Block {
            position: placed.position,
            size: prev.size,
            color: active.color,
        };
        axis.set(&mut debris.size, debris_extent);
        axis.set(
            &mut debris.position,
            axis.get(placed.position) + crate::cut_sign(delta) * (overlap / 2.0 + debris_extent / 2.0),
        );
        debris
    });

    Trim::Cut(Cut {
        placed,
        debris,
        delta,
        overlap,
    })
}
