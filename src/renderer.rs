use crate::camera::Camera;
use crate::map::TileMap;
use crate::raycaster::{RayHit, Side};
use crate::vec2::Vec2;

const PLAYER_SIZE: i32 = 10;
const PLAYER_CENTER: f64 = 5.0; // offset from the player box corner to its middle

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

#[inline]
fn darken(color: u32) -> u32 {
    (color >> 1) & 0x007F7F7F
}

/// Which picture the shell draws from the ray hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    TopDown,
    FirstPerson,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::TopDown => ViewMode::FirstPerson,
            ViewMode::FirstPerson => ViewMode::TopDown,
        }
    }
}

/// Borrowed pixel buffer plus its dimensions; every primitive clips to it.
pub struct Canvas<'a> {
    buf: &'a mut [u32],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut [u32], width: usize, height: usize) -> Self {
        debug_assert!(buf.len() >= width * height);
        Self { buf, width, height }
    }

    pub fn clear(&mut self, color: u32) {
        self.buf[..self.width * self.height].fill(color);
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.buf[y as usize * self.width + x as usize] = color;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let (w_max, h_max) = (self.width as i32, self.height as i32);
        let x0 = x.clamp(0, w_max);
        let x1 = (x + w).clamp(x0, w_max);
        let y0 = y.clamp(0, h_max);
        let y1 = (y + h).min(h_max);
        for yy in y0..y1 {
            let row = yy as usize * self.width;
            self.buf[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    pub fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x1, y1) = (x + w - 1, y + h - 1);
        self.draw_line(x, y, x1, y, color);
        self.draw_line(x, y1, x1, y1, color);
        self.draw_line(x, y, x, y1, color);
        self.draw_line(x1, y, x1, y1, color);
    }

    /// Bresenham line, both endpoints inclusive.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn vline(&mut self, x: usize, y0: usize, y1: usize, color: u32) {
        let mut idx = y0 * self.width + x;
        for _y in y0..=y1 {
            self.buf[idx] = color;
            idx += self.width;
        }
    }
}

fn wall_color(code: u8) -> u32 {
    let palette = [
        pack_rgb(200, 200, 200),
        pack_rgb(180, 180, 250),
        pack_rgb(250, 180, 180),
        pack_rgb(180, 250, 180),
    ];
    palette[(code as usize).saturating_sub(1) % palette.len()]
}

#[inline]
fn to_screen(p: Vec2, cell_size: f64, offset: f64) -> (i32, i32) {
    (
        (p.x * cell_size + offset) as i32,
        (p.y * cell_size + offset) as i32,
    )
}

/// Overhead view: wall cells, the player box, the view plane of the first
/// column and one line per ray out to its wall.
pub fn render_top_down(
    canvas: &mut Canvas,
    map: &TileMap,
    camera: &Camera,
    hits: &[RayHit],
    cell_size: usize,
) {
    canvas.clear(pack_rgb(0, 0, 0));

    let wall = pack_rgb(0, 255, 0);
    let cs = cell_size as i32;
    for (x, y, code) in map.iter() {
        if code != 0 {
            canvas.outline_rect(x as i32 * cs, y as i32 * cs, cs, cs, wall);
        }
    }

    let cell = cell_size as f64;
    let (px, py) = to_screen(camera.pos, cell, 0.0);
    canvas.fill_rect(px, py, PLAYER_SIZE, PLAYER_SIZE, pack_rgb(255, 0, 0));

    let ray_color = pack_rgb(255, 0, 0);
    let (cx, cy) = to_screen(camera.pos, cell, PLAYER_CENTER);
    if !hits.is_empty() {
        let (ex, ey) = to_screen(camera.pos + camera.plane, cell, PLAYER_CENTER);
        canvas.draw_line(cx, cy, ex, ey, ray_color);
    }
    for hit in hits {
        let (hx, hy) = to_screen(hit.hit_point(camera), cell, 0.0);
        canvas.draw_line(cx, cy, hx, hy, ray_color);
    }
}

/// First-person view: one vertical strip per hit, height inversely
/// proportional to the perpendicular distance. Y-side faces are shaded darker.
pub fn render_columns(canvas: &mut Canvas, hits: &[RayHit]) {
    let (width, height) = (canvas.width, canvas.height);
    if width == 0 || height == 0 {
        return;
    }

    // Clear background
    let sky = pack_rgb(30, 30, 70);
    let ground = pack_rgb(40, 40, 40);
    let mid = height / 2;
    canvas.buf[..mid * width].fill(sky);
    canvas.buf[mid * width..width * height].fill(ground);

    let h = height as f64;
    for hit in hits.iter().filter(|hit| hit.column < width) {
        let line_h = if hit.perp_distance > 0.0 {
            (h / hit.perp_distance).min(h)
        } else {
            h
        };
        let top = (0.5 * (h - line_h)).floor().max(0.0) as usize;
        let bottom = ((0.5 * (h + line_h)).floor() as usize).min(height - 1);
        if top > bottom {
            continue;
        }

        let mut color = wall_color(hit.cell);
        if hit.side == Side::Y {
            color = darken(color);
        }
        canvas.vline(hit.column, top, bottom, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raycaster::cast_rays;

    #[test]
    fn fill_rect_clips_to_buffer() {
        let mut buf = vec![0u32; 16];
        let mut canvas = Canvas::new(&mut buf, 4, 4);
        canvas.fill_rect(-2, 2, 4, 10, 7);
        assert_eq!(
            buf,
            vec![0, 0, 0, 0, 0, 0, 0, 0, 7, 7, 0, 0, 7, 7, 0, 0]
        );
    }

    #[test]
    fn line_covers_both_endpoints() {
        let mut buf = vec![0u32; 25];
        let mut canvas = Canvas::new(&mut buf, 5, 5);
        canvas.draw_line(4, 0, 0, 4, 1);
        for i in 0..5 {
            assert_eq!(buf[i * 5 + (4 - i)], 1);
        }
        assert_eq!(buf.iter().filter(|&&p| p == 1).count(), 5);
    }

    #[test]
    fn offscreen_line_does_not_panic() {
        let mut buf = vec![0u32; 9];
        let mut canvas = Canvas::new(&mut buf, 3, 3);
        canvas.draw_line(-10, -10, 20, 20, 3);
        assert_eq!(buf[0], 3);
        assert_eq!(buf[4], 3);
        assert_eq!(buf[8], 3);
    }

    #[test]
    fn top_down_outlines_walls_and_player() {
        let map = TileMap::demo();
        let cam = Camera::new(
            Vec2::new(5.0, 5.0),
            Vec2::new(-1.0, 0.1).normalize(),
            Vec2::new(0.0, 0.66),
        );
        let hits = cast_rays(&cam, &map, 32).unwrap();
        let mut buf = vec![0u32; 320 * 320];
        render_top_down(&mut Canvas::new(&mut buf, 320, 320), &map, &cam, &hits, 32);

        assert_eq!(buf[0], pack_rgb(0, 255, 0));
        assert_eq!(buf[31 * 320 + 31], pack_rgb(0, 255, 0));
        // player box corner at (160, 160)
        assert_eq!(buf[160 * 320 + 160], pack_rgb(255, 0, 0));
        // open floor behind the camera stays black
        assert_eq!(buf[250 * 320 + 200], 0);
        assert_eq!(buf[250 * 320 + 224], pack_rgb(0, 255, 0));
    }

    #[test]
    fn columns_shade_by_side_and_distance() {
        let map = TileMap::bordered_room(10, 10).unwrap();
        let cam = Camera::new(Vec2::new(5.5, 5.5), Vec2::new(-1.0, 0.0), Vec2::new(0.0, 0.66));
        let hits = cast_rays(&cam, &map, 8).unwrap();
        let mut buf = vec![0u32; 8 * 90];
        render_columns(&mut Canvas::new(&mut buf, 8, 90), &hits);

        // distance 4.5 gives a 20 pixel strip centered on row 45
        let wall = wall_color(1);
        assert_eq!(buf[45 * 8 + 4], wall);
        assert_eq!(buf[35 * 8 + 4], wall);
        assert_eq!(buf[34 * 8 + 4], pack_rgb(30, 30, 70));
        assert_eq!(buf[56 * 8 + 4], pack_rgb(40, 40, 40));

        let south = cam.rotated(-std::f64::consts::FRAC_PI_2);
        let hits = cast_rays(&south, &map, 8).unwrap();
        render_columns(&mut Canvas::new(&mut buf, 8, 90), &hits);
        assert_eq!(buf[45 * 8 + 4], darken(wall));
    }
}
