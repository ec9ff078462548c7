use log::LevelFilter;

use crate::vec2::Vec2;

/// Startup settings for the viewer.
#[derive(Clone, Debug)]
pub struct Config {
    pub screen_width: usize,  // internal framebuffer width, one ray per column
    pub screen_height: usize, // internal framebuffer height
    pub cell_size: usize,     // pixels per map cell in the top-down view
    pub window_scale: u32,    // window size = internal size * scale
    pub turn_step: f64,       // radians per input tick
    pub move_step: f64,       // map cells per input tick
    pub tick_hz: f64,         // input ticks per second
    pub start_pos: Vec2,
    pub start_dir: Vec2,
    pub start_plane: Vec2,
    pub log_file: String,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 320,
            screen_height: 320,
            cell_size: 32,
            window_scale: 2,
            turn_step: 0.12,
            move_step: 0.1,
            tick_hz: 60.0,
            start_pos: Vec2::new(5.0, 5.0),
            start_dir: Vec2::new(-1.0, 0.1).normalize(),
            start_plane: Vec2::new(0.0, 0.66),
            log_file: "gridcaster.log".to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn window_size(&self) -> (u32, u32) {
        (
            self.screen_width as u32 * self.window_scale,
            self.screen_height as u32 * self.window_scale,
        )
    }
}
