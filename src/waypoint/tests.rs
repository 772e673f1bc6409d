use super::*;

fn overworld() -> DimensionTag {
    DimensionTag::new("minecraft:overworld")
}

fn nether() -> DimensionTag {
    DimensionTag::new("minecraft:the_nether")
}

#[derive(Default)]
struct CountingStore {
    saves: u32,
    last_saved: Vec<Waypoint>,
}

impl WaypointStore for CountingStore {
    fn save_waypoints(&mut self, waypoints: &[Waypoint]) {
        self.saves += 1;
        self.last_saved = waypoints.to_vec();
    }
}

// ----------------------------------------------
// WaypointList
// ----------------------------------------------

#[test]
fn test_edits_apply_on_commit_only() {
    let mut list = WaypointList::new();

    let home = list.queue_add(Waypoint::new("Home", [0, 64, 0], Color::from_rgb(0x00FF00), overworld()));
    let mine = list.queue_add(Waypoint::new("Mine", [50, 12, -30], Color::from_rgb(0x0000FF), overworld()));

    // Render passes still see the old snapshot.
    assert!(list.is_empty());
    assert!(list.has_pending());
    assert!(list.find(home).is_none());

    assert!(list.commit_pending());
    assert!(!list.has_pending());
    assert_eq!(list.len(), 2);
    assert_eq!(list.find(home).unwrap().name, "Home");
    assert_eq!(list.find(mine).unwrap().z, -30);

    // Nothing queued, nothing changes.
    assert!(!list.commit_pending());

    list.queue_toggle(mine);
    assert!(list.find(mine).unwrap().enabled);
    assert!(list.commit_pending());
    assert!(!list.find(mine).unwrap().enabled);

    list.queue_remove(home);
    assert!(list.commit_pending());
    assert!(list.find(home).is_none());
    assert_eq!(list.len(), 1);
}

#[test]
fn test_edits_apply_in_queue_order() {
    let mut list = WaypointList::new();

    // Added and removed before anyone saw it.
    let temp = list.queue_add(Waypoint::new("Temp", [1, 2, 3], Color::WHITE, overworld()));
    list.queue_remove(temp);
    assert!(list.commit_pending());
    assert!(list.is_empty());
}

#[test]
fn test_unknown_ids_are_dropped() {
    let mut list = WaypointList::new();
    let id = list.queue_add(Waypoint::new("Home", [0, 64, 0], Color::WHITE, overworld()));
    list.commit_pending();

    list.queue_remove(WaypointId(999));
    list.queue_toggle(WaypointId::INVALID);
    assert!(!list.commit_pending());
    assert!(!list.has_pending());
    assert_eq!(list.len(), 1);
    assert!(list.find(id).unwrap().enabled);
}

#[test]
fn test_remove_named_matches_name_and_dimension() {
    let mut list = WaypointList::new();
    list.queue_add(Waypoint::new("Base", [0, 64, 0], Color::WHITE, overworld()));
    list.queue_add(Waypoint::new("Base", [0, 64, 0], Color::WHITE, nether()));
    list.queue_add(Waypoint::new("Farm", [10, 64, 0], Color::WHITE, overworld()));
    list.commit_pending();

    list.queue_remove_named("Base", overworld());
    assert!(list.commit_pending());
    assert_eq!(list.len(), 2);
    assert!(list.as_slice().iter().any(|wp| wp.name == "Base" && wp.dimension == nether()));
    assert!(list.as_slice().iter().any(|wp| wp.name == "Farm"));

    list.queue_remove_named("Base", DimensionTag::new("minecraft:the_end"));
    assert!(!list.commit_pending());
}

#[test]
fn test_ids_are_unique_and_never_reused() {
    let mut list = WaypointList::new();
    let mut ids = Vec::new();

    for i in 0..20 {
        let id = list.queue_add(Waypoint::new("W", [i, 64, 0], Color::WHITE, overworld()));
        assert!(id.is_valid());
        ids.push(id);
        if i % 3 == 0 {
            list.queue_remove(id);
        }
        list.commit_pending();
    }

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(list.len(), 20 - 7);
}

#[test]
fn test_commit_and_save_only_saves_changes() {
    let mut list = WaypointList::new();
    let mut store = CountingStore::default();

    assert!(!list.commit_and_save(&mut store));
    assert_eq!(store.saves, 0);

    let id = list.queue_add(Waypoint::new("Home", [0, 64, 0], Color::WHITE, overworld()));
    list.queue_toggle(id);
    assert!(list.commit_and_save(&mut store));
    assert_eq!(store.saves, 1);
    assert_eq!(store.last_saved.len(), 1);
    assert!(!store.last_saved[0].enabled);

    list.queue_remove(WaypointId(12345));
    assert!(!list.commit_and_save(&mut store));
    assert_eq!(store.saves, 1);
}

#[test]
fn test_iter_visible_filters() {
    let mut list = WaypointList::new();
    list.queue_add(Waypoint::new("A", [0, 64, 0], Color::WHITE, overworld()));
    let hidden = list.queue_add(Waypoint::new("B", [0, 64, 0], Color::WHITE, overworld()));
    list.queue_add(Waypoint::new("C", [0, 64, 0], Color::WHITE, nether()));
    list.queue_add(Waypoint::new("D", [0, 64, 0], Color::WHITE, DimensionTag::default()));
    list.queue_toggle(hidden);
    list.commit_pending();

    let overworld_tag = overworld();
    let names: Vec<&str> = list.iter_visible(&overworld_tag).map(|wp| wp.name.as_str()).collect();
    assert_eq!(names, ["A"]);
}

// ----------------------------------------------
// JSON
// ----------------------------------------------

#[test]
fn test_json_round_trip_reassigns_ids() {
    let mut list = WaypointList::new();
    list.queue_add(Waypoint::new("Home", [10, 70, -20], Color::from_rgb(0x3366FF), overworld()));
    let fortress = list.queue_add(Waypoint::new("Fortress", [-100, 40, 250], Color::from_rgb(0xAA0000), nether()));
    list.queue_toggle(fortress);
    list.commit_pending();

    let json = list.to_json_string().unwrap();
    assert!(json.contains("\"minecraft:the_nether\""));
    assert!(!json.contains("\"id\""));

    let loaded = WaypointList::from_json_str(&json).unwrap();
    assert_eq!(loaded.len(), 2);

    let first = &loaded.as_slice()[0];
    assert_eq!(first.name, "Home");
    assert_eq!((first.x, first.y, first.z), (10, 70, -20));
    assert_eq!(first.color, Color::from_rgb(0x3366FF));
    assert_eq!(first.dimension, overworld());
    assert!(first.enabled);

    let second = &loaded.as_slice()[1];
    assert_eq!(second.name, "Fortress");
    assert!(!second.enabled);

    // Fresh ids, in load order.
    assert!(first.id.is_valid() && second.id.is_valid());
    assert!(first.id < second.id);
}

#[test]
fn test_json_loading_edge_cases() {
    assert!(WaypointList::from_json_str("").unwrap().is_empty());
    assert!(WaypointList::from_json_str("  \n").unwrap().is_empty());
    assert!(WaypointList::from_json_str("[]").unwrap().is_empty());
    assert!(WaypointList::from_json_str("{ not json").is_err());

    // Missing fields take defaults; a missing dimension makes the entry malformed.
    let loaded = WaypointList::from_json_str(r#"[{ "name": "Old", "x": 1, "y": 2, "z": 3 }]"#).unwrap();
    let waypoint = &loaded.as_slice()[0];
    assert!(waypoint.enabled);
    assert_eq!(waypoint.color, DEFAULT_WAYPOINT_COLOR);
    assert!(!waypoint.is_well_formed());
    assert_eq!(loaded.iter_visible(&overworld()).count(), 0);
}

// ----------------------------------------------
// Beacons
// ----------------------------------------------

#[test]
fn test_beacons_span_world_height_at_block_center() {
    let mut list = WaypointList::new();
    let home = list.queue_add(Waypoint::new("Home", [10, 70, -20], Color::from_rgb(0x3366FF), overworld()));
    let off = list.queue_add(Waypoint::new("Off", [0, 64, 0], Color::WHITE, overworld()));
    list.queue_add(Waypoint::new("Nether", [0, 64, 0], Color::WHITE, nether()));
    list.queue_toggle(off);
    list.commit_pending();

    let observer = Observer::new(Vec3::new(0.0, 64.0, 0.0), 0.0, 0.0, overworld());
    let configs = WaypointConfigs::default();
    let beacons: Vec<BeaconSegment> = list.beacons(&observer, &configs).collect();

    assert_eq!(beacons.len(), 1);
    let beacon = beacons[0];
    assert_eq!(beacon.id, home);
    assert_eq!(beacon.bottom, Vec3::new(10.5, -64.0, -19.5));
    assert_eq!(beacon.top, Vec3::new(10.5, 320.0, -19.5));
    assert_eq!(beacon.color, Color::from_argb(0x803366FF));

    let in_nether = Observer::new(Vec3::new(0.0, 64.0, 0.0), 0.0, 0.0, nether());
    assert_eq!(list.beacons(&in_nether, &configs).count(), 1);
}

#[test]
fn test_beacons_turned_off() {
    let mut list = WaypointList::new();
    list.queue_add(Waypoint::new("Home", [10, 70, -20], Color::WHITE, overworld()));
    list.commit_pending();

    let observer = Observer::new(Vec3::new(0.0, 64.0, 0.0), 0.0, 0.0, overworld());
    let mut configs = WaypointConfigs::default();
    assert_eq!(list.beacons(&observer, &configs).count(), 1);

    configs.show_beacons = false;
    assert_eq!(list.beacons(&observer, &configs).count(), 0);
}

// ----------------------------------------------
// DeathTracker
// ----------------------------------------------

#[test]
fn test_death_waypoint_on_death_edge() {
    let mut list = WaypointList::new();
    let mut tracker = DeathTracker::default();

    let alive = Observer::new(Vec3::new(12.7, 63.0, -4.2), 0.0, 0.0, overworld());
    let dead = alive.clone().with_dead(true);

    assert!(tracker.tick(&alive, true, &mut list).is_none());

    let id = tracker.tick(&dead, true, &mut list).unwrap();
    // Only once while the observer stays dead.
    assert!(tracker.tick(&dead, true, &mut list).is_none());
    assert!(tracker.tick(&dead, true, &mut list).is_none());

    assert!(list.commit_pending());
    let waypoint = list.find(id).unwrap();
    assert_eq!(waypoint.name, DEATH_WAYPOINT_NAME);
    assert_eq!(waypoint.color, DEATH_WAYPOINT_COLOR);
    assert_eq!((waypoint.x, waypoint.y, waypoint.z), (12, 63, -5));
    assert_eq!(waypoint.dimension, overworld());

    // Respawn, then die again.
    assert!(tracker.tick(&alive, true, &mut list).is_none());
    assert!(tracker.tick(&dead, true, &mut list).is_some());
    list.commit_pending();
    assert_eq!(list.len(), 2);
}

#[test]
fn test_death_waypoint_disabled() {
    let mut list = WaypointList::new();
    let mut tracker = DeathTracker::default();

    let dead = Observer::new(Vec3::new(0.0, 64.0, 0.0), 0.0, 0.0, overworld()).with_dead(true);
    assert!(tracker.tick(&dead, false, &mut list).is_none());
    assert!(!list.has_pending());

    let mut no_dimension = dead.clone();
    no_dimension.dimension = DimensionTag::default();
    assert!(tracker.tick(&no_dimension, true, &mut list).is_none());
    assert!(!list.has_pending());
}
