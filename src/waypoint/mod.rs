use std::fmt;
use serde::{Deserialize, Serialize};

use crate::{
    log,
    hud::config::WaypointConfigs,
    utils::{Color, Vec3},
    world::{DimensionTag, Observer},
};

#[cfg(test)]
mod tests;

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const DEATH_WAYPOINT_NAME: &str = "Death Point";
pub const DEATH_WAYPOINT_COLOR: Color = Color::from_rgb(0xFF0000);
pub const DEFAULT_WAYPOINT_COLOR: Color = Color::from_rgb(0xFF0000);

// ----------------------------------------------
// WaypointId
// ----------------------------------------------

// Assigned at creation and never reused within a session.
// Ids are not persisted; a loaded list gets fresh ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaypointId(u32);

impl WaypointId {
    pub const INVALID: Self = Self(0);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ----------------------------------------------
// Waypoint
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Waypoint {
    #[serde(skip)]
    pub id: WaypointId,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub color: Color, // RGB, alpha is ignored.
    pub dimension: DimensionTag,
    pub enabled: bool,
}

impl Default for Waypoint {
    fn default() -> Self {
        Self {
            id: WaypointId::INVALID,
            name: String::new(),
            x: 0,
            y: 0,
            z: 0,
            color: DEFAULT_WAYPOINT_COLOR,
            dimension: DimensionTag::default(),
            enabled: true,
        }
    }
}

impl Waypoint {
    pub fn new(name: &str, block: [i32; 3], color: Color, dimension: DimensionTag) -> Self {
        Self {
            name: name.to_string(),
            x: block[0],
            y: block[1],
            z: block[2],
            color,
            dimension,
            ..Default::default()
        }
    }

    // Entries without a dimension are skipped everywhere.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.dimension.is_valid()
    }

    #[inline]
    pub fn is_visible_in(&self, dimension: &DimensionTag) -> bool {
        self.enabled && self.is_well_formed() && self.dimension == *dimension
    }

    #[inline]
    pub fn block_center(&self) -> Vec3 {
        Vec3::new(self.x as f64 + 0.5, self.y as f64 + 0.5, self.z as f64 + 0.5)
    }
}

// ----------------------------------------------
// WaypointStore
// ----------------------------------------------

// Host side persistence. Fire-and-forget: the list never waits on it.
pub trait WaypointStore {
    fn save_waypoints(&mut self, waypoints: &[Waypoint]);
}

// ----------------------------------------------
// WaypointEdit
// ----------------------------------------------

#[derive(Clone, Debug)]
pub enum WaypointEdit {
    Add(Waypoint),
    Remove(WaypointId),
    Toggle(WaypointId),
    RemoveNamed { name: String, dimension: DimensionTag },
}

// ----------------------------------------------
// WaypointList
// ----------------------------------------------

// Edits are queued and applied by commit_pending() between frames, so a
// render pass always iterates a stable snapshot.
pub struct WaypointList {
    waypoints: Vec<Waypoint>,
    pending: Vec<WaypointEdit>,
    next_id: u32,
}

impl WaypointList {
    pub fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    // Takes ownership of a loaded list and assigns fresh ids.
    pub fn from_loaded(waypoints: Vec<Waypoint>) -> Self {
        let mut list = Self::new();
        for mut waypoint in waypoints {
            waypoint.id = list.allocate_id();
            list.waypoints.push(waypoint);
        }

        let malformed = list.waypoints.iter().filter(|wp| !wp.is_well_formed()).count();
        if malformed != 0 {
            log::warn!(log::channel!("waypoint"), "{malformed} loaded waypoint(s) have no dimension and will be ignored.");
        }

        list
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }
        let waypoints: Vec<Waypoint> = serde_json::from_str(json).map_err(|err| err.to_string())?;
        Ok(Self::from_loaded(waypoints))
    }

    pub fn to_json_string(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.waypoints).map_err(|err| err.to_string())
    }

    #[inline]
    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn find(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|wp| wp.id == id)
    }

    pub fn iter_visible<'a>(&'a self, dimension: &'a DimensionTag) -> impl Iterator<Item = &'a Waypoint> + 'a {
        self.waypoints.iter().filter(move |wp| wp.is_visible_in(dimension))
    }

    // ----------------------
    // Queued edits:
    // ----------------------

    // The id is reserved right away so callers can refer to the new entry
    // before it is committed.
    pub fn queue_add(&mut self, mut waypoint: Waypoint) -> WaypointId {
        let id = self.allocate_id();
        waypoint.id = id;
        self.pending.push(WaypointEdit::Add(waypoint));
        id
    }

    pub fn queue_remove(&mut self, id: WaypointId) {
        self.pending.push(WaypointEdit::Remove(id));
    }

    pub fn queue_toggle(&mut self, id: WaypointId) {
        self.pending.push(WaypointEdit::Toggle(id));
    }

    pub fn queue_remove_named(&mut self, name: &str, dimension: DimensionTag) {
        self.pending.push(WaypointEdit::RemoveNamed { name: name.to_string(), dimension });
    }

    // Applies queued edits in order. Returns true if the list changed.
    // Edits naming unknown ids are dropped.
    pub fn commit_pending(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }

        let mut changed = false;
        let edits = std::mem::take(&mut self.pending);

        for edit in edits {
            changed |= self.apply(edit);
        }

        changed
    }

    // Commits and hands the list to `store` if anything changed.
    pub fn commit_and_save(&mut self, store: &mut dyn WaypointStore) -> bool {
        let changed = self.commit_pending();
        if changed {
            store.save_waypoints(&self.waypoints);
        }
        changed
    }

    fn apply(&mut self, edit: WaypointEdit) -> bool {
        match edit {
            WaypointEdit::Add(waypoint) => {
                log::verbose!(log::channel!("waypoint"), "Added waypoint {} '{}'.", waypoint.id, waypoint.name);
                self.waypoints.push(waypoint);
                true
            }
            WaypointEdit::Remove(id) => {
                let count_before = self.waypoints.len();
                self.waypoints.retain(|wp| wp.id != id);
                self.waypoints.len() != count_before
            }
            WaypointEdit::Toggle(id) => {
                match self.waypoints.iter_mut().find(|wp| wp.id == id) {
                    Some(waypoint) => {
                        waypoint.enabled = !waypoint.enabled;
                        true
                    }
                    None => false,
                }
            }
            WaypointEdit::RemoveNamed { name, dimension } => {
                let count_before = self.waypoints.len();
                self.waypoints.retain(|wp| !(wp.name == name && wp.dimension == dimension));
                self.waypoints.len() != count_before
            }
        }
    }

    fn allocate_id(&mut self) -> WaypointId {
        let id = WaypointId(self.next_id);
        self.next_id += 1;
        id
    }

    // ----------------------
    // Beacons:
    // ----------------------

    // Vertical world-space segments for the host's 3D pass, one per enabled
    // waypoint in the observer's dimension, through the block center.
    // Nothing when beacons are turned off.
    pub fn beacons<'a>(&'a self,
                       observer: &'a Observer,
                       configs: &WaypointConfigs) -> impl Iterator<Item = BeaconSegment> + 'a {
        let bottom_y = configs.beacon_bottom_y as f64;
        let top_y = configs.beacon_top_y as f64;
        let alpha = configs.beacon_alpha;
        let shown = if configs.show_beacons { usize::MAX } else { 0 };

        self.iter_visible(&observer.dimension).take(shown).map(move |waypoint| {
            let x = waypoint.x as f64 + 0.5;
            let z = waypoint.z as f64 + 0.5;
            BeaconSegment {
                id: waypoint.id,
                bottom: Vec3::new(x, bottom_y, z),
                top: Vec3::new(x, top_y, z),
                color: waypoint.color.with_alpha(alpha),
            }
        })
    }
}

impl Default for WaypointList {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeaconSegment {
    pub id: WaypointId,
    pub bottom: Vec3,
    pub top: Vec3,
    pub color: Color,
}

// ----------------------------------------------
// DeathTracker
// ----------------------------------------------

// Queues a death waypoint on the tick the observer transitions to dead.
#[derive(Default)]
pub struct DeathTracker {
    was_dead: bool,
}

impl DeathTracker {
    pub fn tick(&mut self, observer: &Observer, enabled: bool, waypoints: &mut WaypointList) -> Option<WaypointId> {
        if !enabled {
            return None;
        }

        if !observer.is_dead {
            self.was_dead = false;
            return None;
        }

        if self.was_dead {
            return None;
        }

        self.was_dead = true;

        if !observer.position.is_finite() || !observer.dimension.is_valid() {
            return None;
        }

        let waypoint = Waypoint::new(DEATH_WAYPOINT_NAME,
                                     observer.block_position(),
                                     DEATH_WAYPOINT_COLOR,
                                     observer.dimension.clone());

        log::info!(log::channel!("waypoint"), "Death waypoint queued at {:?}.", observer.block_position());
        Some(waypoints.queue_add(waypoint))
    }
}
