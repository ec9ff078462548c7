//! DDA grid traversal: one ray per screen column, stepping cell by cell
//! until the ray enters a solid cell.

use crate::camera::Camera;
use crate::error::{CastError, Result};
use crate::map::TileMap;
use crate::vec2::Vec2;

/// Stand-in for 1/0 when a ray never crosses grid lines on an axis.
const NEVER: f64 = 1e30;

/// Grid axis crossed when the ray entered the hit cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    X, // crossed a vertical grid line (east/west face)
    Y, // crossed a horizontal grid line (north/south face)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub column: usize,
    pub map_x: i32,
    pub map_y: i32,
    pub cell: u8,
    pub side: Side,
    pub perp_distance: f64,
    pub ray_dir: Vec2,
}

impl RayHit {
    /// World-space point where the ray meets the wall face.
    #[inline]
    pub fn hit_point(&self, camera: &Camera) -> Vec2 {
        camera.pos + self.ray_dir * self.perp_distance
    }
}

/// Cast `width` rays left to right. Results are ordered by column.
pub fn cast_rays(camera: &Camera, map: &TileMap, width: usize) -> Result<Vec<RayHit>> {
    if !map.contains(camera.pos) {
        return Err(CastError::CameraOutsideMap {
            x: camera.pos.x,
            y: camera.pos.y,
        });
    }
    (0..width)
        .map(|column| cast_column(camera, map, column, width))
        .collect()
}

/// Trace the ray through `column` of a `width`-column screen.
pub fn cast_column(camera: &Camera, map: &TileMap, column: usize, width: usize) -> Result<RayHit> {
    let pos = camera.pos;
    let ray_dir = camera.ray_dir(column, width);

    let mut map_x = pos.x.floor() as i32;
    let mut map_y = pos.y.floor() as i32;

    let delta_x = if ray_dir.x == 0.0 { NEVER } else { (1.0 / ray_dir.x).abs() };
    let delta_y = if ray_dir.y == 0.0 { NEVER } else { (1.0 / ray_dir.y).abs() };

    let (step_x, mut side_x) = if ray_dir.x < 0.0 {
        (-1, (pos.x - map_x as f64) * delta_x)
    } else {
        (1, (map_x as f64 + 1.0 - pos.x) * delta_x)
    };
    let (step_y, mut side_y) = if ray_dir.y < 0.0 {
        (-1, (pos.y - map_y as f64) * delta_y)
    } else {
        (1, (map_y as f64 + 1.0 - pos.y) * delta_y)
    };

    // Every step moves one cell along an axis, so any ray leaves the grid
    // (the None arm below) before this is reached. Backs up the bounds check.
    let max_steps = map.width() + map.height();
    let mut steps = 0;
    loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            Side::X
        } else {
            side_y += delta_y;
            map_y += step_y;
            Side::Y
        };
        steps += 1;

        match map.cell(map_x, map_y) {
            Some(0) if steps < max_steps => continue,
            Some(cell) if cell != 0 => {
                // side_* has already run one crossing past the hit boundary
                let perp_distance = match side {
                    Side::X => side_x - delta_x,
                    Side::Y => side_y - delta_y,
                };
                return Ok(RayHit {
                    column,
                    map_x,
                    map_y,
                    cell,
                    side,
                    perp_distance,
                    ray_dir,
                });
            }
            _ => return Err(CastError::RayEscapedBounds { column, steps }),
        }
    }
}
