use crate::utils::{self, Rect, Vec2};

// ----------------------------------------------
// ViewportTransform
// ----------------------------------------------

// Base rotation of the map. With rotation disabled the map is still drawn
// flipped by 180 degrees, so south (+Z) points up.
pub const MAP_FLIP_DEGREES: f32 = 180.0;

// Maps offsets from the observer in world blocks (X, Z) to panel pixels.
// Scale by zoom, rotate, then translate to the panel center.
#[derive(Copy, Clone, Debug)]
pub struct ViewportTransform {
    rotation_degrees: f32,
    sin: f32,
    cos: f32,
    zoom: f32,
    panel_center: Vec2,
}

impl ViewportTransform {
    pub fn new(heading_degrees: f32, rotate_with_heading: bool, zoom: i32, panel_center: Vec2) -> Self {
        let rotation_degrees = Self::rotation_for(heading_degrees, rotate_with_heading);
        let (sin, cos) = utils::sin_cos_degrees(rotation_degrees);
        Self {
            rotation_degrees,
            sin,
            cos,
            zoom: Self::clamp_zoom(zoom) as f32,
            panel_center,
        }
    }

    #[inline]
    pub fn rotation_for(heading_degrees: f32, rotate_with_heading: bool) -> f32 {
        if rotate_with_heading {
            heading_degrees + MAP_FLIP_DEGREES
        } else {
            MAP_FLIP_DEGREES
        }
    }

    #[inline]
    pub fn clamp_zoom(zoom: i32) -> i32 {
        zoom.max(1)
    }

    #[inline]
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn panel_center(&self) -> Vec2 {
        self.panel_center
    }

    #[inline]
    pub fn world_offset_to_screen(&self, dx: f32, dz: f32) -> Vec2 {
        (Vec2::new(dx, dz) * self.zoom).rotated(self.sin, self.cos) + self.panel_center
    }

    // Same as world_offset_to_screen() truncated toward zero.
    #[inline]
    pub fn world_offset_to_pixel(&self, dx: f32, dz: f32) -> Vec2 {
        self.world_offset_to_screen(dx, dz).trunc()
    }

    // Exact inverse of world_offset_to_screen().
    #[inline]
    pub fn screen_to_world_offset(&self, screen_pos: Vec2) -> Vec2 {
        (screen_pos - self.panel_center).rotated(-self.sin, self.cos) / self.zoom
    }

    // Side of the axis-aligned square that covers one rotated world cell.
    #[inline]
    pub fn cell_extent(&self) -> f32 {
        self.zoom * (self.sin.abs() + self.cos.abs())
    }

    // Screen rect covering world cell [dx, dx+1) x [dz, dz+1).
    #[inline]
    pub fn cell_rect(&self, dx: f32, dz: f32) -> Rect {
        let center = self.world_offset_to_screen(dx + 0.5, dz + 0.5);
        Rect::centered_square(center, self.cell_extent())
    }

    // Number of cells from the observer that can touch a square panel of
    // `panel_size` pixels, capped to `max_radius`.
    pub fn visible_radius(&self, panel_size: f32, max_radius: i32) -> i32 {
        let half_extent = (panel_size * 0.5) * (self.sin.abs() + self.cos.abs());
        let radius = (half_extent / self.zoom).ceil() as i32 + 1;
        radius.clamp(0, max_radius.max(0))
    }
}

// Free function form, rotating to `heading_degrees`.
#[inline]
pub fn world_offset_to_screen(dx: f32, dz: f32, heading_degrees: f32, zoom: i32, panel_center: Vec2) -> Vec2 {
    ViewportTransform::new(heading_degrees, true, zoom, panel_center).world_offset_to_screen(dx, dz)
}

// ----------------------------------------------
// HudScale
// ----------------------------------------------

pub const MIN_HUD_SCALE: f32 = 0.1;

// Screen pixels <-> panel-local (unscaled) units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HudScale(f32);

impl HudScale {
    #[inline]
    pub fn new(scale: f32) -> Self {
        if scale.is_finite() {
            Self(scale.max(MIN_HUD_SCALE))
        } else {
            Self(1.0)
        }
    }

    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn screen_to_panel(self, screen_pos: Vec2) -> Vec2 {
        screen_pos / self.0
    }

    #[inline]
    pub fn panel_to_screen(self, panel_pos: Vec2) -> Vec2 {
        panel_pos * self.0
    }

    // Screen width in panel-local units.
    #[inline]
    pub fn panel_width(self, screen_width: f32) -> f32 {
        screen_width / self.0
    }
}

impl Default for HudScale {
    fn default() -> Self {
        Self(1.0)
    }
}
