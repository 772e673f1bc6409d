use std::fmt::Write;
use arrayvec::ArrayString;

use crate::{
    hud::config::WaypointConfigs,
    render::{self, DrawingFacade, TextStyle},
    utils::{Vec2, Vec3},
    waypoint::Waypoint,
    world::Observer,
};


// ----------------------------------------------
// Projection
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    pub x: f32,
    pub y: f32,
    // Distance along the view axis. Always > 0.
    pub depth: f64,
}

impl Projection {
    #[inline]
    pub fn screen_pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

// ----------------------------------------------
// WorldSpaceProjector
// ----------------------------------------------

pub const DEFAULT_MAX_PROJECTION_DISTANCE: f64 = 5000.0;

// Maps world points onto the screen from the observer's eye with plain
// yaw/pitch rotations (no host matrices). Yaw 0 faces +Z, yaw 90 faces -X,
// positive pitch looks down. +X maps to the left of the screen when facing +Z.
#[derive(Copy, Clone, Debug)]
pub struct WorldSpaceProjector {
    max_distance: f64,
}

impl WorldSpaceProjector {
    pub fn new(max_distance: f64) -> Self {
        let max_distance = if max_distance.is_finite() && max_distance > 0.0 {
            max_distance
        } else {
            DEFAULT_MAX_PROJECTION_DISTANCE
        };
        Self { max_distance }
    }

    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    // Observer space coordinates of `point`: x left, y up, z forward.
    pub fn to_view_space(point: Vec3, observer: &Observer) -> Vec3 {
        let rel = point - observer.eye_position();

        // Rotate by -yaw about the vertical axis.
        let (sin_yaw, cos_yaw) = (observer.yaw as f64).to_radians().sin_cos();
        let x = (rel.x * cos_yaw) + (rel.z * sin_yaw);
        let z = (-rel.x * sin_yaw) + (rel.z * cos_yaw);

        // Rotate by -pitch about the horizontal view axis.
        let (sin_pitch, cos_pitch) = (observer.pitch as f64).to_radians().sin_cos();
        let y = (rel.y * cos_pitch) + (z * sin_pitch);
        let z = (-rel.y * sin_pitch) + (z * cos_pitch);

        Vec3::new(x, y, z)
    }

    // None if the point is behind the observer, on the eye plane, or
    // farther than max_distance.
    pub fn project(&self, point: Vec3, observer: &Observer, screen_width: f32, screen_height: f32) -> Option<Projection> {
        if !point.is_finite() || !observer.position.is_finite() {
            return None;
        }

        if (point - observer.eye_position()).length() > self.max_distance {
            return None;
        }

        let view = Self::to_view_space(point, observer);
        let depth = view.z;
        if depth <= 0.0 {
            return None;
        }

        let scale = screen_height as f64 / (2.0 * depth);
        let x = (screen_width as f64 * 0.5) - (view.x * scale);
        let y = (screen_height as f64 * 0.5) - (view.y * scale);

        Some(Projection { x: x as f32, y: y as f32, depth })
    }
}

impl Default for WorldSpaceProjector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROJECTION_DISTANCE)
    }
}

#[inline]
pub fn project_to_screen(point: Vec3, observer: &Observer, screen_width: f32, screen_height: f32) -> Option<Projection> {
    WorldSpaceProjector::default().project(point, observer, screen_width, screen_height)
}

// ----------------------------------------------
// WaypointLabels
// ----------------------------------------------

const LABEL_BOX_PADDING: f32 = 2.0;

pub type LabelText = ArrayString<64>;

// "<name> (<distance>m)". Long names are cut so the distance always fits.
pub fn format_label(name: &str, distance: f64) -> LabelText {
    let mut suffix = ArrayString::<24>::new();
    let _ = write!(suffix, " ({}m)", distance.max(0.0) as i64);

    let mut label = LabelText::new();
    let name_capacity = label.capacity() - suffix.len();
    for ch in name.chars() {
        if label.len() + ch.len_utf8() > name_capacity {
            break;
        }
        label.push(ch);
    }
    label.push_str(&suffix);
    label
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelStats {
    pub drawn: u32,
    pub skipped_entries: u32,
}

// Floating name labels over waypoints, in screen pixels.
pub struct WaypointLabels;

impl WaypointLabels {
    pub fn render(surface: &mut dyn DrawingFacade,
                  observer: &Observer,
                  waypoints: &[Waypoint],
                  screen_size: Vec2,
                  configs: &WaypointConfigs) -> LabelStats {
        let mut stats = LabelStats::default();
        let projector = WorldSpaceProjector::new(configs.max_label_distance);

        for waypoint in waypoints {
            if !waypoint.is_well_formed() {
                stats.skipped_entries += 1;
                continue;
            }
            if !waypoint.is_visible_in(&observer.dimension) {
                continue;
            }

            let center = waypoint.block_center();
            let Some(projection) = projector.project(center, observer, screen_size.x, screen_size.y) else {
                continue;
            };

            let distance = (center - observer.position).length();
            let label = format_label(&waypoint.name, distance);

            render::draw_boxed_text_centered(surface,
                                             &label,
                                             projection.screen_pos(),
                                             TextStyle::new(waypoint.color.with_alpha(0xFF), true),
                                             configs.label_box_color,
                                             LABEL_BOX_PADDING);
            stats.drawn += 1;
        }

        stats
    }
}
