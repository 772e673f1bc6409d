use std::fmt::Write;
use arrayvec::ArrayString;

use crate::{
    engine::time::{Seconds, UpdateTimer},
    render::{DrawingFacade, TextStyle},
    utils::{self, Color, Rect, Vec2, Vec3},
};

use super::config::StatsConfigs;

// ----------------------------------------------
// FpsPanel
// ----------------------------------------------

pub const FPS_GOOD_COLOR: Color = Color::from_argb(0xFF55FF55);
pub const FPS_OK_COLOR:   Color = Color::from_argb(0xFFFFFF55);
pub const FPS_BAD_COLOR:  Color = Color::from_argb(0xFFFF5555);

pub fn fps_color(fps: u32) -> Color {
    if fps >= 60 {
        FPS_GOOD_COLOR
    } else if fps >= 30 {
        FPS_OK_COLOR
    } else {
        FPS_BAD_COLOR
    }
}

// Shows the host frame rate, sampled at a fixed interval so the number is readable.
pub struct FpsPanel {
    timer: UpdateTimer,
    fps: u32,
    sampled_once: bool,
}

impl FpsPanel {
    pub fn new(update_interval_secs: Seconds) -> Self {
        Self {
            timer: UpdateTimer::new(update_interval_secs),
            fps: 0,
            sampled_once: false,
        }
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn tick(&mut self, delta_time_secs: Seconds, host_fps: u32, configs: &StatsConfigs) {
        if self.timer.frequency_secs() != configs.fps_update_interval_secs {
            self.timer.set_frequency_secs(configs.fps_update_interval_secs);
        }

        if self.timer.tick(delta_time_secs).should_update() || !self.sampled_once {
            self.fps = host_fps;
            self.sampled_once = true;
        }
    }

    // `pos` is the panel's top-left corner.
    pub fn render(&self, surface: &mut dyn DrawingFacade, pos: Vec2, configs: &StatsConfigs) {
        let mut text = ArrayString::<16>::new();
        let _ = write!(text, "{} FPS", self.fps);

        surface.fill_rect(Rect::new(pos.x - 2.0, pos.y - 2.0, 52.0, 14.0), configs.background_color);
        surface.draw_text(&text, pos, TextStyle::new(fps_color(self.fps), true));
    }
}

// ----------------------------------------------
// CoordsPanel
// ----------------------------------------------

pub const COORDS_TEXT_COLOR: Color = Color::WHITE;
pub const FACING_TEXT_COLOR: Color = Color::LIGHT_GRAY;

const COORDS_LINE_SPACING: f32 = 11.0;

// Cardinal direction for a yaw in degrees (0 faces south / +Z).
pub fn facing_name(yaw_degrees: f32) -> &'static str {
    let yaw = utils::wrap_degrees(yaw_degrees);
    if (-45.0..45.0).contains(&yaw) {
        "South"
    } else if (45.0..135.0).contains(&yaw) {
        "West"
    } else if (-135.0..-45.0).contains(&yaw) {
        "East"
    } else {
        "North"
    }
}

pub fn format_coords(position: Vec3) -> ArrayString<64> {
    let mut text = ArrayString::<64>::new();
    let _ = write!(text, "XYZ: {:.1} / {:.1} / {:.1}", position.x, position.y, position.z);
    text
}

pub struct CoordsPanel;

impl CoordsPanel {
    pub fn render(surface: &mut dyn DrawingFacade,
                  pos: Vec2,
                  position: Vec3,
                  yaw_degrees: f32,
                  configs: &StatsConfigs) {
        let box_height = if configs.show_direction { 26.0 } else { 14.0 };
        surface.fill_rect(Rect::new(pos.x - 2.0, pos.y - 2.0, 152.0, box_height), configs.background_color);

        let coords = format_coords(position);
        surface.draw_text(&coords, pos, TextStyle::new(COORDS_TEXT_COLOR, true));

        if configs.show_direction {
            let mut facing = ArrayString::<32>::new();
            let _ = write!(facing, "Facing: {}", facing_name(yaw_degrees));
            surface.draw_text(&facing,
                              Vec2::new(pos.x, pos.y + COORDS_LINE_SPACING),
                              TextStyle::new(FACING_TEXT_COLOR, true));
        }
    }
}
