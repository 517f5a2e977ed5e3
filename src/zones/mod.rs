pub mod geometry;
pub mod store;

pub use geometry::{any_zone_contains, contains, locate, BoundaryRule, Location, Point, Zone, ZoneSet};
pub use store::ZoneStore;
