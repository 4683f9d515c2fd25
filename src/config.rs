//! World geometry: grid size, world bounds and depot placement.

use crate::math::Point2d;
use crate::util::Interval;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The integer coordinates of a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The configuration of the simulated world.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// The size of a grid cell in world units.
    pub grid_size: f64,
    /// The horizontal extent of the world.
    pub bounds_x: Interval<f64>,
    /// The vertical extent of the world.
    pub bounds_y: Interval<f64>,
    /// The depot.
    pub depot: DepotConfig,
}

/// The placement and footprint of the depot.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepotConfig {
    /// The centre of the depot in world space.
    pub position: Point2d,
    /// The width of the depot's footprint.
    pub width: f64,
    /// The height of the depot's footprint.
    pub height: f64,
}

/// The reasons a [WorldConfig] may be rejected.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be positive and finite, got {0}")]
    GridSize(f64),

    #[error("world bounds are empty")]
    EmptyBounds,

    #[error("depot footprint must be positive, got {width}x{height}")]
    DepotFootprint { width: f64, height: f64 },

    #[error("depot at ({x}, {y}) lies outside the world")]
    DepotOutOfBounds { x: f64, y: f64 },
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 40.0,
            bounds_x: Interval::new(0.0, 1600.0),
            bounds_y: Interval::new(0.0, 1200.0),
            depot: DepotConfig {
                position: Point2d::new(800.0, 600.0),
                width: 60.0,
                height: 40.0,
            },
        }
    }
}

impl WorldConfig {
    /// Checks that the configuration describes a usable world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if self.bounds_x.is_empty() || self.bounds_y.is_empty() {
            return Err(ConfigError::EmptyBounds);
        }
        let DepotConfig {
            position,
            width,
            height,
        } = self.depot;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::DepotFootprint { width, height });
        }
        if !self.in_bounds(position) {
            return Err(ConfigError::DepotOutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        Ok(())
    }

    /// Converts a world space position to the nearest grid cell.
    pub fn world_to_tile(&self, pos: Point2d) -> GridPos {
        GridPos {
            x: (pos.x / self.grid_size).round() as i32,
            y: (pos.y / self.grid_size).round() as i32,
        }
    }

    /// Gets the world space centre of a grid cell.
    pub fn tile_to_world(&self, tile: GridPos) -> Point2d {
        Point2d::new(
            tile.x as f64 * self.grid_size,
            tile.y as f64 * self.grid_size,
        )
    }

    /// Snaps a world space position to the centre of its grid cell.
    pub fn snap(&self, pos: Point2d) -> Point2d {
        self.tile_to_world(self.world_to_tile(pos))
    }

    /// Whether the world space position lies within the world bounds.
    pub fn in_bounds(&self, pos: Point2d) -> bool {
        self.bounds_x.contains(pos.x) && self.bounds_y.contains(pos.y)
    }

    /// The extent of the given grid cell along the x and y axes.
    pub(crate) fn tile_extent(&self, tile: GridPos) -> [Interval<f64>; 2] {
        let centre = self.tile_to_world(tile);
        let half = 0.5 * self.grid_size;
        [Interval::disc(centre.x, half), Interval::disc(centre.y, half)]
    }
}
