use smallvec::SmallVec;

use crate::{
    log,
    engine::time::Seconds,
    hud::config::{MinimapConfigs, TerrainDrawMode},
    render::{self, DrawingFacade, TextStyle, TextureHandle},
    utils::{Color, Rect, Size, Vec2},
    waypoint::Waypoint,
    world::{EntityKind, EntitySnapshot, Observer, WorldView},
};

pub mod cell;
pub mod sampler;
pub mod cache;
pub mod viewport;

use cache::TerrainCache;
use cell::TerrainGrid;
use viewport::ViewportTransform;


// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const FRAME_THICKNESS: u32 = 2;

const PLAYER_MARKER_COLOR: Color = Color::WHITE;
const OTHER_MARKER_COLOR:  Color = Color::from_argb(0xFFFF0000);
const CENTER_MARKER_COLOR: Color = Color::from_argb(0xFF00FF00);

const ENTITY_MARKER_SIZE:   f32 = 2.0;
const CENTER_MARKER_SIZE:   f32 = 2.0;
const WAYPOINT_MARKER_SIZE: f32 = 4.0;

// ----------------------------------------------
// MinimapFrame / MinimapFrameStats
// ----------------------------------------------

// Per frame inputs, all owned by the host.
pub struct MinimapFrame<'a> {
    pub observer: &'a Observer,
    // None while the world is loading or unavailable; nothing is drawn then.
    pub world: Option<&'a dyn WorldView>,
    pub entities: &'a [EntitySnapshot],
    pub waypoints: &'a [Waypoint],
    pub now: Seconds,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MinimapFrameStats {
    pub refreshed: bool,
    pub cells_drawn: u32,
    pub waypoints_drawn: u32,
    pub entities_drawn: u32,
    // Malformed waypoints or entities.
    pub skipped_entries: u32,
}

// ----------------------------------------------
// MinimapStatus
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MinimapStatus {
    #[default]
    Uninitialized,
    Ready,
    // Resource init failed. Stays off for the rest of the session.
    Disabled,
}

// ----------------------------------------------
// MinimapTexture
// ----------------------------------------------

// CPU copy of the terrain grid uploaded to a host texture for
// TerrainDrawMode::Texture. One pixel per cell.
#[derive(Default)]
struct MinimapTexture {
    size: Size,
    pixels: Vec<Color>,
    handle: TextureHandle,
    uploaded_generation: Option<u64>,
}

impl MinimapTexture {
    fn is_created(&self) -> bool {
        self.handle.is_valid()
    }

    // Returns false if the host could not allocate the texture.
    fn create(&mut self, surface: &mut dyn DrawingFacade, side: i32) -> bool {
        let size = Size::new(side, side);
        self.handle = surface.create_texture("minimap", size);
        self.size = size;
        self.pixels.clear();
        self.pixels.resize((side * side) as usize, Color::TRANSPARENT);
        self.uploaded_generation = None;
        self.handle.is_valid()
    }

    fn update(&mut self, surface: &mut dyn DrawingFacade, cache: &TerrainCache) {
        if self.uploaded_generation == Some(cache.generation()) || !self.size.is_valid() {
            return;
        }

        // Empty cells stay transparent so they are never drawn.
        for (pixel, cell) in self.pixels.iter_mut().zip(cache.grid().cells()) {
            *pixel = cell.color;
        }

        surface.update_texture(self.handle, self.size, &self.pixels);
        self.uploaded_generation = Some(cache.generation());
    }
}

// ----------------------------------------------
// MapMarker
// ----------------------------------------------

#[derive(Copy, Clone)]
struct MapMarker {
    pos: Vec2,
    size: f32,
    color: Color,
    outlined: bool,
}

impl MapMarker {
    fn draw(&self, surface: &mut dyn DrawingFacade) {
        let rect = Rect::centered_square(self.pos, self.size).trunc();
        surface.fill_rect(rect, self.color);
        if self.outlined {
            surface.draw_border(rect.expanded(1.0), Color::BLACK);
        }
    }
}

type MarkerList = SmallVec<[MapMarker; 32]>;

// ----------------------------------------------
// Minimap
// ----------------------------------------------

pub struct Minimap {
    cache: TerrainCache,
    texture: MinimapTexture,
    status: MinimapStatus,
}

impl Minimap {
    pub fn new(configs: &MinimapConfigs) -> Self {
        Self {
            cache: TerrainCache::new(configs.grid_side),
            texture: MinimapTexture::default(),
            status: MinimapStatus::Uninitialized,
        }
    }

    #[inline]
    pub fn status(&self) -> MinimapStatus {
        self.status
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.status == MinimapStatus::Disabled
    }

    #[inline]
    pub fn cache(&self) -> &TerrainCache {
        &self.cache
    }

    // Forces a terrain re-sample on the next render.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    // Idle -> Refreshing (when needed) -> Drawing -> Idle.
    // `panel` is the resolved minimap square in the surface's coordinates.
    pub fn render(&mut self,
                  surface: &mut dyn DrawingFacade,
                  frame: &MinimapFrame,
                  configs: &MinimapConfigs,
                  panel: Rect) -> MinimapFrameStats {
        let mut stats = MinimapFrameStats::default();

        if self.is_disabled() || !panel.is_valid() {
            return stats;
        }

        let Some(world) = frame.world else {
            return stats;
        };

        if !frame.observer.position.is_finite() {
            return stats;
        }

        if self.cache.grid().side() != TerrainGrid::normalized_side(configs.grid_side) {
            log::info!(log::channel!("minimap"), "Terrain grid resized to {} cells.", configs.grid_side);
            self.cache = TerrainCache::new(configs.grid_side);
        }

        if !self.ensure_resources(surface, configs) {
            return stats;
        }

        // Refreshing:
        stats.refreshed = self.cache.refresh_if_needed(world, frame.observer, frame.now, &configs.cache);

        if configs.draw_mode == TerrainDrawMode::Texture {
            self.texture.update(surface, &self.cache);
        }

        // Drawing:
        let transform = ViewportTransform::new(frame.observer.yaw,
                                               configs.rotate_with_heading,
                                               configs.zoom,
                                               panel.center());

        surface.fill_rect(panel, configs.background_color);
        render::draw_frame(surface, panel, configs.border_color, FRAME_THICKNESS);

        surface.enable_scissor(panel);

        stats.cells_drawn = match configs.draw_mode {
            TerrainDrawMode::Cells => self.draw_terrain_cells(surface, frame.observer, configs, &transform, panel),
            TerrainDrawMode::Texture => self.draw_terrain_texture(surface, frame.observer, configs, &transform, panel),
        };

        let mut markers = MarkerList::new();
        let render_radius = transform.visible_radius(panel.width(), configs.max_render_radius);

        if configs.show_waypoints {
            collect_waypoint_markers(frame, configs, &transform, panel, render_radius, &mut markers, &mut stats);
        }
        if configs.show_entities {
            collect_entity_markers(frame, configs, &transform, panel, render_radius, &mut markers, &mut stats);
        }

        for marker in &markers {
            marker.draw(surface);
        }

        // Always at the panel center and never rotated.
        let center_marker = Rect::centered_square(panel.center().trunc(), CENTER_MARKER_SIZE);
        surface.fill_rect(center_marker, CENTER_MARKER_COLOR);

        surface.disable_scissor();

        if !configs.rotate_with_heading {
            let half = (panel.width() * 0.5).trunc();
            let label_pos = Vec2::new(panel.x() + half - 2.0, panel.y() + 4.0);
            surface.draw_text("N", label_pos, TextStyle::new(Color::WHITE, true));
        }

        stats
    }

    // First render checks what the surface can do. Returns false if the
    // minimap is (now) disabled.
    fn ensure_resources(&mut self, surface: &mut dyn DrawingFacade, configs: &MinimapConfigs) -> bool {
        if self.status == MinimapStatus::Uninitialized {
            if !surface.supports_scissor() {
                self.disable("drawing surface cannot clip");
                return false;
            }
            self.status = MinimapStatus::Ready;
        }

        if configs.draw_mode == TerrainDrawMode::Texture
            && (!self.texture.is_created() || self.texture.size.width != self.cache.grid().side())
            && !self.texture.create(surface, self.cache.grid().side())
        {
            self.disable("failed to create the minimap texture");
            return false;
        }

        true
    }

    fn disable(&mut self, reason: &str) {
        log::warn!(log::channel!("minimap"), "Minimap disabled for this session: {reason}.");
        self.status = MinimapStatus::Disabled;
    }

    // Offset from the observer's exact position to the cache origin, in blocks.
    fn cache_origin_offset(&self, observer: &Observer) -> Option<Vec2> {
        let origin = self.cache.origin()?;
        Some(Vec2::new((origin[0] as f64 - observer.position.x) as f32,
                       (origin[2] as f64 - observer.position.z) as f32))
    }

    fn draw_terrain_cells(&self,
                          surface: &mut dyn DrawingFacade,
                          observer: &Observer,
                          configs: &MinimapConfigs,
                          transform: &ViewportTransform,
                          panel: Rect) -> u32 {
        let Some(base) = self.cache_origin_offset(observer) else {
            return 0;
        };

        let grid = self.cache.grid();
        let radius = transform.visible_radius(panel.width(), configs.max_render_radius.min(grid.radius()));
        let circle = configs.circular.then(|| panel.width() * 0.5);

        let mut cells_drawn = 0;

        for dz in -radius..radius {
            for dx in -radius..radius {
                let cell = grid.get(dx, dz);
                if cell.is_empty() {
                    continue;
                }

                let rect = transform.cell_rect(base.x + dx as f32, base.y + dz as f32);
                if !rect.intersects(&panel) {
                    continue;
                }

                if let Some(circle_radius) = circle {
                    if (rect.center() - panel.center()).length() > circle_radius {
                        continue;
                    }
                }

                surface.fill_rect(rect.trunc(), cell.color);
                cells_drawn += 1;
            }
        }

        cells_drawn
    }

    fn draw_terrain_texture(&self,
                            surface: &mut dyn DrawingFacade,
                            observer: &Observer,
                            configs: &MinimapConfigs,
                            transform: &ViewportTransform,
                            panel: Rect) -> u32 {
        let Some(base) = self.cache_origin_offset(observer) else {
            return 0;
        };

        let grid = self.cache.grid();
        let radius = transform.visible_radius(panel.width(), configs.max_render_radius.min(grid.radius()));
        if radius == 0 {
            return 0;
        }

        let r = radius as f32;
        let corners = [
            transform.world_offset_to_screen(base.x - r, base.y - r),
            transform.world_offset_to_screen(base.x + r, base.y - r),
            transform.world_offset_to_screen(base.x + r, base.y + r),
            transform.world_offset_to_screen(base.x - r, base.y + r),
        ];

        let side = grid.side() as f32;
        let uv_min = (grid.offset() - radius) as f32 / side;
        let uv_max = (grid.offset() + radius) as f32 / side;
        let uvs = [
            Vec2::new(uv_min, uv_min),
            Vec2::new(uv_max, uv_min),
            Vec2::new(uv_max, uv_max),
            Vec2::new(uv_min, uv_max),
        ];

        surface.draw_textured_quad(self.texture.handle, corners, uvs);
        (radius * radius * 4) as u32
    }
}

// ----------------------------------------------
// Marker helpers
// ----------------------------------------------

fn is_inside_map(offset: Vec2, screen_pos: Vec2, render_radius: i32, circle: Option<f32>, panel: Rect) -> bool {
    let radius = render_radius as f32;
    if offset.x.abs() >= radius || offset.y.abs() >= radius {
        return false;
    }
    if let Some(circle_radius) = circle {
        if (screen_pos - panel.center()).length() > circle_radius {
            return false;
        }
    }
    true
}

fn collect_waypoint_markers(frame: &MinimapFrame,
                            configs: &MinimapConfigs,
                            transform: &ViewportTransform,
                            panel: Rect,
                            render_radius: i32,
                            markers: &mut MarkerList,
                            stats: &mut MinimapFrameStats) {
    let observer = frame.observer;
    let circle = configs.circular.then(|| panel.width() * 0.5);

    for waypoint in frame.waypoints {
        if !waypoint.is_well_formed() {
            stats.skipped_entries += 1;
            continue;
        }
        if !waypoint.enabled || waypoint.dimension != observer.dimension {
            continue;
        }

        let center = waypoint.block_center();
        let offset = Vec2::new((center.x - observer.position.x) as f32,
                               (center.z - observer.position.z) as f32);
        let screen_pos = transform.world_offset_to_pixel(offset.x, offset.y);

        if !is_inside_map(offset, screen_pos, render_radius, circle, panel) {
            continue;
        }

        markers.push(MapMarker {
            pos: screen_pos,
            size: WAYPOINT_MARKER_SIZE,
            color: waypoint.color.with_alpha(0xFF),
            outlined: true,
        });
        stats.waypoints_drawn += 1;
    }
}

fn collect_entity_markers(frame: &MinimapFrame,
                          configs: &MinimapConfigs,
                          transform: &ViewportTransform,
                          panel: Rect,
                          render_radius: i32,
                          markers: &mut MarkerList,
                          stats: &mut MinimapFrameStats) {
    let observer = frame.observer;
    let circle = configs.circular.then(|| panel.width() * 0.5);

    for entity in frame.entities {
        if entity.is_observer {
            continue;
        }
        if !entity.position.is_finite() {
            stats.skipped_entries += 1;
            continue;
        }

        let offset = Vec2::new((entity.position.x - observer.position.x) as f32,
                               (entity.position.z - observer.position.z) as f32);
        let screen_pos = transform.world_offset_to_pixel(offset.x, offset.y);

        if !is_inside_map(offset, screen_pos, render_radius, circle, panel) {
            continue;
        }

        let color = match entity.kind {
            EntityKind::Player => PLAYER_MARKER_COLOR,
            EntityKind::Other  => OTHER_MARKER_COLOR,
        };

        markers.push(MapMarker {
            pos: screen_pos,
            size: ENTITY_MARKER_SIZE,
            color,
            outlined: false,
        });
        stats.entities_drawn += 1;
    }
}
