use crate::{
    log,
    engine::time::Seconds,
    minimap::{Minimap, MinimapFrame, MinimapFrameStats, MinimapStatus, viewport::HudScale},
    projector::{LabelStats, WaypointLabels},
    render::{DrawingFacade, ScaledSurface},
    utils::Vec2,
    waypoint::{DeathTracker, Waypoint, WaypointList, WaypointStore},
    world::{EntitySnapshot, Observer, WorldView},
};

pub mod config;
pub mod layout;
pub mod editor;
pub mod stats;

use config::HudConfigs;
use editor::HudLayoutEditor;
use layout::{HudElement, LayoutStore};
use stats::{CoordsPanel, FpsPanel};


// ----------------------------------------------
// FrameContext
// ----------------------------------------------

// Everything the HUD reads in one frame. Owned by the host.
pub struct FrameContext<'a> {
    // None when there is no local player yet.
    pub observer: Option<&'a Observer>,
    pub world: Option<&'a dyn WorldView>,
    pub entities: &'a [EntitySnapshot],
    pub waypoints: &'a [Waypoint],
    // Screen size in pixels, before HUD scaling.
    pub screen_size: Vec2,
    pub now: Seconds,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HudFrameStats {
    pub minimap: MinimapFrameStats,
    pub labels: LabelStats,
}

// ----------------------------------------------
// HudRenderer
// ----------------------------------------------

// Owns the per-session HUD state and draws every panel through the host's
// DrawingFacade. Panels are laid out in panel-local units and scaled by
// the HUD scale on the way out.
pub struct HudRenderer {
    fps_panel: FpsPanel,
    minimap: Minimap,
    editor: HudLayoutEditor,
    death_tracker: DeathTracker,
    editor_open: bool,
}

impl HudRenderer {
    pub fn new(configs: &HudConfigs) -> Self {
        log::set_level(configs.log_level);
        log::info!(log::channel!("hud"), "HUD initialized (v{}).", crate::utils::version());

        Self {
            fps_panel: FpsPanel::new(configs.stats.fps_update_interval_secs),
            minimap: Minimap::new(&configs.minimap),
            editor: HudLayoutEditor::new(),
            death_tracker: DeathTracker::default(),
            editor_open: false,
        }
    }

    // Call after the host changed configs at runtime.
    pub fn on_configs_changed(&mut self, configs: &HudConfigs) {
        log::set_level(configs.log_level);
        self.minimap.invalidate();
    }

    #[inline]
    pub fn minimap(&self) -> &Minimap {
        &self.minimap
    }

    #[inline]
    pub fn minimap_status(&self) -> MinimapStatus {
        self.minimap.status()
    }

    #[inline]
    pub fn fps_panel(&self) -> &FpsPanel {
        &self.fps_panel
    }

    // ----------------------
    // Game tick:
    // ----------------------

    // Samples FPS, tracks death and commits queued waypoint edits between
    // frames. Returns true if the waypoint list changed (already saved).
    pub fn tick(&mut self,
                delta_time_secs: Seconds,
                host_fps: u32,
                observer: Option<&Observer>,
                waypoints: &mut WaypointList,
                store: &mut dyn WaypointStore,
                configs: &HudConfigs) -> bool {
        self.fps_panel.tick(delta_time_secs, host_fps, &configs.stats);

        if let Some(observer) = observer {
            self.death_tracker.tick(observer, configs.waypoints.death_waypoint, waypoints);
        }

        waypoints.commit_and_save(store)
    }

    // ----------------------
    // Frame rendering:
    // ----------------------

    pub fn render(&mut self,
                  surface: &mut dyn DrawingFacade,
                  frame: &FrameContext,
                  configs: &HudConfigs) -> HudFrameStats {
        let mut stats = HudFrameStats::default();

        if !configs.enabled {
            return stats;
        }

        let Some(observer) = frame.observer else {
            return stats;
        };

        // World labels are screen-space and not affected by the HUD scale.
        if configs.waypoints.show_labels && !self.editor_open {
            stats.labels = WaypointLabels::render(surface, observer, frame.waypoints, frame.screen_size, &configs.waypoints);
        }

        let scale = HudScale::new(configs.hud_scale);
        let panel_width = scale.panel_width(frame.screen_size.x);
        let layout = &configs.layout;

        let mut scaled = ScaledSurface::new(surface, scale.get());

        if configs.stats.fps_enabled {
            self.fps_panel.render(&mut scaled, layout.rect(HudElement::Fps, panel_width).min, &configs.stats);
        }

        if configs.stats.coords_enabled {
            CoordsPanel::render(&mut scaled,
                                layout.rect(HudElement::Coords, panel_width).min,
                                observer.position,
                                observer.yaw,
                                &configs.stats);
        }

        if configs.minimap.enabled {
            let minimap_frame = MinimapFrame {
                observer,
                world: frame.world,
                entities: frame.entities,
                waypoints: frame.waypoints,
                now: frame.now,
            };
            let panel = layout.rect(HudElement::Minimap, panel_width);
            stats.minimap = self.minimap.render(&mut scaled, &minimap_frame, &configs.minimap, panel);
        }

        if self.editor_open {
            for element in HudElement::hit_test_order() {
                let outline = layout.rect(*element, panel_width).expanded(2.0);
                scaled.draw_border(outline, configs.editor.outline_color);
            }
        }

        stats
    }

    // ----------------------
    // Layout editor:
    // ----------------------

    #[inline]
    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    #[inline]
    pub fn editor(&self) -> &HudLayoutEditor {
        &self.editor
    }

    pub fn open_editor(&mut self) {
        self.editor_open = true;
    }

    // Closing mid-drag still persists the layout.
    pub fn close_editor(&mut self, configs: &HudConfigs, store: &mut dyn LayoutStore) {
        self.editor.mouse_up(&configs.layout, store);
        self.editor_open = false;
    }

    // Overlay first, then the HUD in edit mode (with panel outlines).
    pub fn render_editor(&mut self,
                         surface: &mut dyn DrawingFacade,
                         frame: &FrameContext,
                         configs: &HudConfigs) -> HudFrameStats {
        if !self.editor_open {
            return HudFrameStats::default();
        }

        let scale = HudScale::new(configs.hud_scale);
        self.editor.render_overlay(surface, frame.screen_size, scale, &configs.editor);
        self.render(surface, frame, configs)
    }

    pub fn editor_mouse_down(&mut self, screen_pos: Vec2, screen_width: f32, configs: &HudConfigs) -> Option<HudElement> {
        if !self.editor_open {
            return None;
        }
        self.editor.mouse_down(screen_pos, screen_width, HudScale::new(configs.hud_scale), &configs.layout)
    }

    pub fn editor_mouse_move(&mut self, screen_pos: Vec2, screen_width: f32, configs: &mut HudConfigs) -> bool {
        if !self.editor_open {
            return false;
        }
        let scale = HudScale::new(configs.hud_scale);
        self.editor.mouse_move(screen_pos, screen_width, scale, &mut configs.layout, &configs.editor)
    }

    pub fn editor_mouse_up(&mut self, configs: &HudConfigs, store: &mut dyn LayoutStore) -> bool {
        self.editor.mouse_up(&configs.layout, store)
    }
}
