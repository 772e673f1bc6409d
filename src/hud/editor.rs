use crate::{
    log,
    minimap::viewport::HudScale,
    render::{DrawingFacade, TextStyle},
    utils::{Rect, Vec2},
};

use super::{
    config::EditorConfigs,
    layout::{self, HudElement, HudLayout, LayoutStore},
};

pub const EDITOR_HINT_TEXT: &str = "DRAG ELEMENTS TO MOVE";

// ----------------------------------------------
// DragSession
// ----------------------------------------------

// Exists from mouse-down on a panel until mouse-up. All values are in
// panel-local units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSession {
    pub element: HudElement,
    // Cursor position relative to the panel's top-left at grab time.
    pub grab: Vec2,
    // Panel position when the drag started.
    pub origin: Vec2,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EditorState {
    Idle,
    Dragging(HudElement),
}

// ----------------------------------------------
// HudLayoutEditor
// ----------------------------------------------

#[derive(Default)]
pub struct HudLayoutEditor {
    session: Option<DragSession>,
}

impl HudLayoutEditor {
    pub fn new() -> Self {
        Self { session: None }
    }

    #[inline]
    pub fn state(&self) -> EditorState {
        match &self.session {
            Some(session) => EditorState::Dragging(session.element),
            None => EditorState::Idle,
        }
    }

    #[inline]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    // First panel under `local_pos`, in hit-test order. Edges count as inside.
    pub fn hit_test(local_pos: Vec2, layout: &HudLayout, panel_width: f32) -> Option<HudElement> {
        HudElement::hit_test_order()
            .iter()
            .copied()
            .find(|element| layout.rect(*element, panel_width).contains_point_inclusive(local_pos))
    }

    // Starts a drag if the cursor is over a panel. Returns the grabbed panel.
    pub fn mouse_down(&mut self,
                      screen_pos: Vec2,
                      screen_width: f32,
                      scale: HudScale,
                      layout: &HudLayout) -> Option<HudElement> {
        let panel_width = scale.panel_width(screen_width);
        let local_pos = scale.screen_to_panel(screen_pos);

        let element = Self::hit_test(local_pos, layout, panel_width)?;
        let origin = layout.rect(element, panel_width).min;

        self.session = Some(DragSession {
            element,
            grab: local_pos - origin,
            origin,
        });

        Some(element)
    }

    // Moves the grabbed panel. Returns true if the layout changed.
    pub fn mouse_move(&mut self,
                      screen_pos: Vec2,
                      screen_width: f32,
                      scale: HudScale,
                      layout: &mut HudLayout,
                      configs: &EditorConfigs) -> bool {
        let Some(session) = &self.session else {
            return false;
        };

        let panel_width = scale.panel_width(screen_width);
        let local_pos = scale.screen_to_panel(screen_pos);

        let mut new_pos = local_pos - session.grab;
        if configs.grid_snap {
            new_pos = snap_to_grid(new_pos, configs.grid_size);
        }
        new_pos = new_pos.max(Vec2::zero());

        let x = if HudLayout::is_right_anchorable(session.element) {
            layout::anchor_x(new_pos.x, panel_width)
        } else {
            new_pos.x
        };

        let panel = layout.panel_mut(session.element);
        let changed = panel.x != x || panel.y != new_pos.y;
        panel.x = x;
        panel.y = new_pos.y;
        changed
    }

    // Ends the drag and hands the layout to `store`. Returns true if a drag
    // was in progress.
    pub fn mouse_up(&mut self, layout: &HudLayout, store: &mut dyn LayoutStore) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        log::verbose!(log::channel!("hud"), "Moved {} panel from {} to {}.",
                      session.element, session.origin, Vec2::new(layout.panel(session.element).x,
                                                                 layout.panel(session.element).y));
        store.save_layout(layout);
        true
    }

    // Dim background, grid lines and hint text. Drawn in screen pixels,
    // before the HUD is drawn in edit mode on top.
    pub fn render_overlay(&self,
                          surface: &mut dyn DrawingFacade,
                          screen_size: Vec2,
                          scale: HudScale,
                          configs: &EditorConfigs) {
        surface.fill_rect(Rect::from_pos_and_size(Vec2::zero(), screen_size), configs.background_color);

        if configs.grid_snap && configs.show_grid_lines {
            let spacing = (configs.grid_size.max(1) as f32) * scale.get();
            if spacing >= 2.0 {
                let mut x = 0.0;
                while x < screen_size.x {
                    surface.fill_rect(Rect::new(x, 0.0, 1.0, screen_size.y), configs.grid_line_color);
                    x += spacing;
                }
                let mut y = 0.0;
                while y < screen_size.y {
                    surface.fill_rect(Rect::new(0.0, y, screen_size.x, 1.0), configs.grid_line_color);
                    y += spacing;
                }
            }
        }

        let hint_x = ((screen_size.x - surface.text_width(EDITOR_HINT_TEXT)) * 0.5).trunc();
        surface.draw_text(EDITOR_HINT_TEXT, Vec2::new(hint_x, 10.0), TextStyle::new(configs.hint_color, true));
    }
}

// Floors each axis to a multiple of `grid_size` (which is clamped to >= 1).
pub fn snap_to_grid(pos: Vec2, grid_size: i32) -> Vec2 {
    let grid = grid_size.max(1) as f32;
    Vec2::new((pos.x / grid).floor() * grid, (pos.y / grid).floor() * grid)
}
