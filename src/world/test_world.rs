use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use super::*;

// ----------------------------------------------
// ScriptedWorld (test double)
// ----------------------------------------------

pub const GRASS: Color = Color::from_rgb(0x2E8B57);
pub const STONE: Color = Color::from_rgb(0x707070);
pub const GLASS: Color = Color::from_rgb(0xC0F0FF);

// Flat ground everywhere unless a column is scripted. Scripted columns list
// their surfaces top-down.
pub struct ScriptedWorld {
    pub ground: Option<SurfaceSample>,
    pub columns: HashMap<(i32, i32), Vec<SurfaceSample>>,
    pub failing: HashSet<(i32, i32)>,
    pub translucent: HashSet<Color>,
    pub queries: Cell<u32>,
}

impl ScriptedWorld {
    pub fn flat(surface_y: i32, color: Color) -> Self {
        Self {
            ground: Some(SurfaceSample { y: surface_y, color: Some(color) }),
            columns: HashMap::new(),
            failing: HashSet::new(),
            translucent: HashSet::new(),
            queries: Cell::new(0),
        }
    }

    pub fn void() -> Self {
        Self { ground: None, ..Self::flat(0, Color::BLACK) }
    }

    pub fn set_column(&mut self, x: i32, z: i32, surfaces: &[SurfaceSample]) {
        self.columns.insert((x, z), surfaces.to_vec());
    }

    pub fn query_count(&self) -> u32 {
        self.queries.get()
    }
}

impl WorldView for ScriptedWorld {
    fn surface_at(&self, x: i32, z: i32, from_y: i32, to_y: i32) -> Result<Option<SurfaceSample>, WorldQueryError> {
        self.queries.set(self.queries.get() + 1);

        if self.failing.contains(&(x, z)) {
            return Err(WorldQueryError::ChunkNotLoaded);
        }

        let surfaces: &[SurfaceSample] = match self.columns.get(&(x, z)) {
            Some(surfaces) => surfaces,
            None => match &self.ground {
                Some(ground) => std::slice::from_ref(ground),
                None => &[],
            },
        };

        // The surface block sits one below the surface height.
        Ok(surfaces.iter()
            .find(|surface| (surface.y - 1) <= from_y && (surface.y - 1) >= to_y)
            .copied())
    }

    fn is_opaque(&self, sample: &SurfaceSample) -> bool {
        match sample.color {
            Some(color) => !self.translucent.contains(&color),
            None => true,
        }
    }
}
