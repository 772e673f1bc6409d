use serde::{Deserialize, Serialize};

use crate::{
    utils::Color,
    world::{SurfaceSample, WorldView},
};

use super::cell::{RelativeHeight, TerrainCell, TerrainGrid};

// ----------------------------------------------
// Constants
// ----------------------------------------------

// Used when the world has no color for a material.
pub const FALLBACK_SURFACE_COLOR: Color = Color::from_rgb(0x555555);

// ----------------------------------------------
// SamplerSettings
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    // Columns are scanned from center_y + margin downwards.
    pub vertical_search_margin: i32,
    pub world_floor_y: i32,
    // Per channel brighten/darken for cells above/below the observer.
    pub shading_delta: i32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            vertical_search_margin: 20,
            world_floor_y: -64,
            shading_delta: 20,
        }
    }
}

impl SamplerSettings {
    pub fn sanitized(self) -> Self {
        Self {
            vertical_search_margin: self.vertical_search_margin.max(0),
            world_floor_y: self.world_floor_y,
            shading_delta: self.shading_delta.clamp(0, 255),
        }
    }
}

// ----------------------------------------------
// SampleStats
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleStats {
    pub columns: u32,
    pub filled: u32,
    pub query_failures: u32,
}

// ----------------------------------------------
// TerrainSampler
// ----------------------------------------------

// Turns world columns around a center block into shaded minimap cells.
#[derive(Clone, Default)]
pub struct TerrainSampler {
    settings: SamplerSettings,
}

impl TerrainSampler {
    pub fn new(settings: SamplerSettings) -> Self {
        Self { settings: settings.sanitized() }
    }

    #[inline]
    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SamplerSettings) {
        self.settings = settings.sanitized();
    }

    // Writes every offset (dx, dz) in [-radius, radius)² of `grid`.
    // `radius` is limited to what the grid can hold.
    pub fn sample(&self,
                  world: &dyn WorldView,
                  center_x: i32,
                  center_y: i32,
                  center_z: i32,
                  radius: i32,
                  grid: &mut TerrainGrid) -> SampleStats {
        let radius = radius.clamp(0, grid.radius());
        let mut stats = SampleStats::default();

        for dz in -radius..radius {
            for dx in -radius..radius {
                let (cell, query_failed) = self.sample_column(world, center_x + dx, center_y, center_z + dz);

                stats.columns += 1;
                if !cell.is_empty() {
                    stats.filled += 1;
                }
                if query_failed {
                    stats.query_failures += 1;
                }

                grid.set(dx, dz, cell);
            }
        }

        stats
    }

    // Nearest opaque surface beneath center_y + margin, shaded by height.
    // Second value is true if the world query failed for this column.
    pub fn sample_column(&self, world: &dyn WorldView, x: i32, center_y: i32, z: i32) -> (TerrainCell, bool) {
        let floor_y = self.settings.world_floor_y;
        let mut from_y = center_y.saturating_add(self.settings.vertical_search_margin);

        while from_y >= floor_y {
            match world.surface_at(x, z, from_y, floor_y) {
                Ok(Some(sample)) => {
                    if world.is_opaque(&sample) {
                        return (self.shade(&sample, center_y), false);
                    }
                    // Skip past the rejected block (which sits at sample.y - 1).
                    // Always make progress even if the world misreports.
                    from_y = (sample.y - 2).min(from_y - 1);
                }
                Ok(None) => break,
                Err(_) => return (TerrainCell::EMPTY, true),
            }
        }

        (TerrainCell::EMPTY, false)
    }

    fn shade(&self, sample: &SurfaceSample, center_y: i32) -> TerrainCell {
        let height = RelativeHeight::classify(sample.y, center_y);
        let base_color = sample.color.unwrap_or(FALLBACK_SURFACE_COLOR);

        let color = base_color
            .with_alpha(0xFF)
            .offset_channels(height.shade_delta(self.settings.shading_delta));

        TerrainCell::new(color, height)
    }
}
