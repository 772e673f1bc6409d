use serde::{Deserialize, Serialize};

use crate::{
    log,
    bitflags_with_display,
    engine::time::Seconds,
    world::{DimensionTag, Observer, WorldView},
};

use super::{
    cell::{TerrainCell, TerrainGrid, DEFAULT_GRID_SIDE},
    sampler::{SampleStats, SamplerSettings, TerrainSampler},
};

// ----------------------------------------------
// CacheSettings
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub refresh_interval_secs: Seconds,
    // Blocks the observer must move (on X or Z) before a re-sample.
    pub refresh_distance: i32,
    pub sampler: SamplerSettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 0.25,
            refresh_distance: 1,
            sampler: SamplerSettings::default(),
        }
    }
}

impl CacheSettings {
    pub fn sanitized(self) -> Self {
        Self {
            refresh_interval_secs: if self.refresh_interval_secs.is_finite() {
                self.refresh_interval_secs.max(0.0)
            } else {
                CacheSettings::default().refresh_interval_secs
            },
            refresh_distance: self.refresh_distance.max(1),
            sampler: self.sampler.sanitized(),
        }
    }
}

// ----------------------------------------------
// RefreshReason
// ----------------------------------------------

bitflags_with_display! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct RefreshReason: u8 {
        const NeverFilled      = 1 << 0;
        const DimensionChanged = 1 << 1;
        const Moved            = 1 << 2;
        const IntervalElapsed  = 1 << 3;
        const Invalidated      = 1 << 4;
        const SettingsChanged  = 1 << 5;
    }
}

// ----------------------------------------------
// TerrainCache
// ----------------------------------------------

// Sampled terrain around the last refresh origin. Between refreshes the grid
// stays valid but may be up to one refresh interval/distance stale.
pub struct TerrainCache {
    grid: TerrainGrid,
    sampler: TerrainSampler,
    origin: Option<[i32; 3]>,
    dimension: DimensionTag,
    last_refresh_secs: Seconds,
    invalidated: bool,
    generation: u64,
    last_stats: SampleStats,
}

impl TerrainCache {
    pub fn new(grid_side: i32) -> Self {
        Self {
            grid: TerrainGrid::new(grid_side),
            sampler: TerrainSampler::default(),
            origin: None,
            dimension: DimensionTag::default(),
            last_refresh_secs: 0.0,
            invalidated: false,
            generation: 0,
            last_stats: SampleStats::default(),
        }
    }

    #[inline]
    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    #[inline]
    pub fn cell(&self, dx: i32, dz: i32) -> TerrainCell {
        self.grid.get(dx, dz)
    }

    // Block origin of the last refresh, None if never filled.
    #[inline]
    pub fn origin(&self) -> Option<[i32; 3]> {
        self.origin
    }

    #[inline]
    pub fn dimension(&self) -> &DimensionTag {
        &self.dimension
    }

    #[inline]
    pub fn last_refresh_secs(&self) -> Seconds {
        self.last_refresh_secs
    }

    // Incremented on every refresh. Consumers compare it to detect new data.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn last_stats(&self) -> SampleStats {
        self.last_stats
    }

    // Forces the next refresh_if_needed() call to re-sample.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    pub fn needs_refresh(&self, observer: &Observer, now: Seconds, settings: &CacheSettings) -> RefreshReason {
        let settings = settings.sanitized();
        let mut reasons = RefreshReason::empty();

        if self.invalidated {
            reasons |= RefreshReason::Invalidated;
        }

        if settings.sampler != *self.sampler.settings() {
            reasons |= RefreshReason::SettingsChanged;
        }

        let Some(origin) = self.origin else {
            return reasons | RefreshReason::NeverFilled;
        };

        if observer.dimension != self.dimension {
            reasons |= RefreshReason::DimensionChanged;
        }

        let [block_x, _, block_z] = observer.block_position();
        if (block_x - origin[0]).abs() >= settings.refresh_distance
            || (block_z - origin[2]).abs() >= settings.refresh_distance
        {
            reasons |= RefreshReason::Moved;
        }

        // A clock that went backwards also forces a refresh.
        let elapsed = now - self.last_refresh_secs;
        if elapsed < 0.0 || elapsed >= settings.refresh_interval_secs {
            reasons |= RefreshReason::IntervalElapsed;
        }

        reasons
    }

    // Re-samples the full grid around the observer if any refresh condition
    // holds. Returns true if it did.
    pub fn refresh_if_needed(&mut self,
                             world: &dyn WorldView,
                             observer: &Observer,
                             now: Seconds,
                             settings: &CacheSettings) -> bool {
        if !observer.position.is_finite() {
            return false;
        }

        let reasons = self.needs_refresh(observer, now, settings);
        if reasons.is_empty() {
            return false;
        }

        if reasons.contains(RefreshReason::DimensionChanged) {
            log::info!(log::channel!("minimap"), "Dimension changed: {} -> {}", self.dimension, observer.dimension);
        }

        if reasons.contains(RefreshReason::SettingsChanged) {
            self.sampler.set_settings(settings.sampler);
        }

        self.refresh(world, observer, now);
        true
    }

    fn refresh(&mut self, world: &dyn WorldView, observer: &Observer, now: Seconds) {
        let origin = observer.block_position();
        let radius = self.grid.radius();

        let stats = self.sampler.sample(world, origin[0], origin[1], origin[2], radius, &mut self.grid);

        if stats.query_failures != 0 && stats.query_failures != self.last_stats.query_failures {
            log::verbose!(log::channel!("minimap"),
                          "{} of {} columns failed to sample around {:?}.",
                          stats.query_failures, stats.columns, origin);
        }

        if self.dimension != observer.dimension {
            self.dimension = observer.dimension.clone();
        }

        self.origin = Some(origin);
        self.last_refresh_secs = now;
        self.invalidated = false;
        self.generation += 1;
        self.last_stats = stats;
    }
}

impl Default for TerrainCache {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIDE)
    }
}
