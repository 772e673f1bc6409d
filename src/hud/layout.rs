use serde::{Deserialize, Serialize};
use strum::VariantArray;
use strum_macros::{Display, EnumCount, VariantArray};

use crate::utils::Rect;

// ----------------------------------------------
// HudElement
// ----------------------------------------------

// Declaration order is hit-test order in the layout editor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumCount, VariantArray, Serialize, Deserialize)]
pub enum HudElement {
    #[strum(to_string = "FPS")]
    Fps,
    #[strum(to_string = "Coords")]
    Coords,
    #[strum(to_string = "Minimap")]
    Minimap,
}

impl HudElement {
    #[inline]
    pub fn hit_test_order() -> &'static [HudElement] {
        Self::VARIANTS
    }
}

// ----------------------------------------------
// PanelLayout
// ----------------------------------------------

// Panel placement in panel-local (unscaled) units.
// A negative x on a right-anchorable panel is measured from the right edge.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PanelLayout {
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    // Rect in panel-local units for a HUD `panel_width` units wide.
    #[inline]
    pub fn resolved_rect(&self, panel_width: f32) -> Rect {
        Rect::new(resolve_anchored_x(self.x, panel_width), self.y, self.width, self.height)
    }
}

// Stored x -> actual x. Negative values count from the right edge.
#[inline]
pub fn resolve_anchored_x(stored_x: f32, panel_width: f32) -> f32 {
    if stored_x < 0.0 { panel_width + stored_x } else { stored_x }
}

// Actual x -> stored x. Positions in the right half are stored relative to
// the right edge so the panel follows window resizes.
#[inline]
pub fn anchor_x(x: f32, panel_width: f32) -> f32 {
    if x > panel_width * 0.5 && x < panel_width { x - panel_width } else { x }
}

// ----------------------------------------------
// HudLayout
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudLayout {
    pub fps: PanelLayout,
    pub coords: PanelLayout,
    pub minimap: PanelLayout, // Square; width is the minimap size.
}

impl Default for HudLayout {
    fn default() -> Self {
        Self {
            fps: PanelLayout::new(5.0, 5.0, 60.0, 15.0),
            coords: PanelLayout::new(5.0, 20.0, 150.0, 40.0),
            minimap: PanelLayout::new(-110.0, 10.0, 100.0, 100.0),
        }
    }
}

pub const MIN_MINIMAP_SIZE: f32 = 16.0;

impl HudLayout {
    #[inline]
    pub fn panel(&self, element: HudElement) -> &PanelLayout {
        match element {
            HudElement::Fps => &self.fps,
            HudElement::Coords => &self.coords,
            HudElement::Minimap => &self.minimap,
        }
    }

    #[inline]
    pub fn panel_mut(&mut self, element: HudElement) -> &mut PanelLayout {
        match element {
            HudElement::Fps => &mut self.fps,
            HudElement::Coords => &mut self.coords,
            HudElement::Minimap => &mut self.minimap,
        }
    }

    #[inline]
    pub fn is_right_anchorable(element: HudElement) -> bool {
        element == HudElement::Minimap
    }

    // Resolved rect of `element` in panel-local units.
    #[inline]
    pub fn rect(&self, element: HudElement, panel_width: f32) -> Rect {
        self.panel(element).resolved_rect(panel_width)
    }

    // Returns true if anything had to be fixed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();

        for element in HudElement::VARIANTS {
            let panel = self.panel_mut(*element);
            if !panel.x.is_finite() { panel.x = 0.0; }
            if !panel.y.is_finite() { panel.y = 0.0; }
            panel.y = panel.y.max(0.0);
            if !panel.width.is_finite() || panel.width < 1.0 { panel.width = 1.0; }
            if !panel.height.is_finite() || panel.height < 1.0 { panel.height = 1.0; }
        }

        // Only the minimap can be right-anchored.
        self.fps.x = self.fps.x.max(0.0);
        self.coords.x = self.coords.x.max(0.0);

        self.minimap.width = self.minimap.width.max(MIN_MINIMAP_SIZE);
        self.minimap.height = self.minimap.width;

        *self != before
    }
}

// ----------------------------------------------
// LayoutStore
// ----------------------------------------------

// Host side persistence. Fire-and-forget: the editor never waits on it.
pub trait LayoutStore {
    fn save_layout(&mut self, layout: &HudLayout);
}
