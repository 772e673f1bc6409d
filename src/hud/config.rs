use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{
    log,
    engine::{config::Configs, time::Seconds},
    minimap::{cache::CacheSettings, cell::{DEFAULT_GRID_SIDE, MAX_GRID_SIDE}, viewport::MIN_HUD_SCALE},
    utils::Color,
};

use super::layout::HudLayout;

// ----------------------------------------------
// HudConfigs
// ----------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)] // Missing fields in the config document get defaults from HudConfigs::default().
pub struct HudConfigs {
    pub enabled: bool,
    pub hud_scale: f32,
    pub log_level: log::Level,

    // Panel placement, mutated by the layout editor.
    pub layout: HudLayout,

    pub minimap: MinimapConfigs,
    pub stats: StatsConfigs,
    pub waypoints: WaypointConfigs,
    pub editor: EditorConfigs,
}

impl Default for HudConfigs {
    fn default() -> Self {
        Self { enabled: true,
               hud_scale: 1.0,
               log_level: log::Level::Info,
               layout: HudLayout::default(),
               minimap: MinimapConfigs::default(),
               stats: StatsConfigs::default(),
               waypoints: WaypointConfigs::default(),
               editor: EditorConfigs::default() }
    }
}

impl Configs for HudConfigs {
    fn post_load(&mut self) {
        let mut fixed = Vec::new();

        if !self.hud_scale.is_finite() || self.hud_scale < MIN_HUD_SCALE {
            self.hud_scale = if self.hud_scale.is_finite() { MIN_HUD_SCALE } else { 1.0 };
            fixed.push("hud_scale");
        }

        if self.minimap.zoom < 1 {
            self.minimap.zoom = 1;
            fixed.push("minimap.zoom");
        }

        if self.minimap.max_render_radius < 1 {
            self.minimap.max_render_radius = 1;
            fixed.push("minimap.max_render_radius");
        }

        if self.minimap.grid_side < 2 {
            self.minimap.grid_side = DEFAULT_GRID_SIDE;
            fixed.push("minimap.grid_side");
        } else if self.minimap.grid_side > MAX_GRID_SIDE {
            self.minimap.grid_side = MAX_GRID_SIDE;
            fixed.push("minimap.grid_side");
        }

        let cache = self.minimap.cache.sanitized();
        if cache != self.minimap.cache {
            self.minimap.cache = cache;
            fixed.push("minimap.cache");
        }

        if !self.stats.fps_update_interval_secs.is_finite() || self.stats.fps_update_interval_secs < 0.0 {
            self.stats.fps_update_interval_secs = StatsConfigs::default().fps_update_interval_secs;
            fixed.push("stats.fps_update_interval_secs");
        }

        if !self.waypoints.max_label_distance.is_finite() || self.waypoints.max_label_distance <= 0.0 {
            self.waypoints.max_label_distance = WaypointConfigs::default().max_label_distance;
            fixed.push("waypoints.max_label_distance");
        }

        if self.waypoints.beacon_top_y < self.waypoints.beacon_bottom_y {
            std::mem::swap(&mut self.waypoints.beacon_top_y, &mut self.waypoints.beacon_bottom_y);
            fixed.push("waypoints.beacon_top_y");
        }

        if self.editor.grid_size < 1 {
            self.editor.grid_size = 1;
            fixed.push("editor.grid_size");
        }

        if self.layout.sanitize() {
            fixed.push("layout");
        }

        if !fixed.is_empty() {
            log::warn!(log::channel!("config"), "Fixed out of range config values: {}", fixed.join(", "));
        }
    }
}

// ----------------------------------------------
// Sub Config Categories
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum TerrainDrawMode {
    // One filled square per visible cell.
    #[default]
    Cells,
    // Cache uploaded to a host texture and drawn as one rotated quad.
    Texture,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfigs {
    pub enabled: bool,
    pub zoom: i32,
    pub rotate_with_heading: bool,
    pub show_entities: bool,
    pub show_waypoints: bool,

    // Skip anything outside the circle inscribed in the panel.
    pub circular: bool,

    pub border_color: Color,
    pub background_color: Color,
    pub draw_mode: TerrainDrawMode,

    // In cells from the observer.
    pub max_render_radius: i32,
    pub grid_side: i32,

    pub cache: CacheSettings,
}

impl Default for MinimapConfigs {
    fn default() -> Self {
        Self { enabled: true,
               zoom: 1,
               rotate_with_heading: true,
               show_entities: true,
               show_waypoints: true,
               circular: false,
               border_color: Color::DARK_GRAY,
               background_color: Color::BLACK,
               draw_mode: TerrainDrawMode::Cells,
               max_render_radius: DEFAULT_GRID_SIDE / 2,
               grid_side: DEFAULT_GRID_SIDE,
               cache: CacheSettings::default() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfigs {
    pub fps_enabled: bool,
    pub fps_update_interval_secs: Seconds,

    pub coords_enabled: bool,
    pub show_direction: bool,

    pub background_color: Color,
}

impl Default for StatsConfigs {
    fn default() -> Self {
        Self { fps_enabled: true,
               fps_update_interval_secs: 0.5,
               coords_enabled: true,
               show_direction: true,
               background_color: Color::from_argb(0x80000000) }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfigs {
    // Floating in-world name labels.
    pub show_labels: bool,
    pub max_label_distance: f64,
    pub label_box_color: Color,

    // Vertical in-world beams.
    pub show_beacons: bool,
    pub beacon_bottom_y: i32,
    pub beacon_top_y: i32,
    pub beacon_alpha: u8,

    // Drop a waypoint where the observer died.
    pub death_waypoint: bool,
}

impl Default for WaypointConfigs {
    fn default() -> Self {
        Self { show_labels: true,
               max_label_distance: 5000.0,
               label_box_color: Color::from_argb(0x40000000),
               show_beacons: true,
               beacon_bottom_y: -64,
               beacon_top_y: 320,
               beacon_alpha: 0x80,
               death_waypoint: true }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfigs {
    pub grid_snap: bool,
    pub grid_size: i32,
    pub show_grid_lines: bool,

    pub background_color: Color,
    pub grid_line_color: Color,
    pub outline_color: Color,
    pub hint_color: Color,
}

impl Default for EditorConfigs {
    fn default() -> Self {
        Self { grid_snap: true,
               grid_size: 10,
               show_grid_lines: true,
               background_color: Color::from_argb(0xAA000000),
               grid_line_color: Color::from_argb(0x1FFFFFFF),
               outline_color: Color::WHITE,
               hint_color: Color::from_argb(0xFF00FF00) }
    }
}
