mod resolve;

pub use resolve::{
    center_axis, closest_masked, order_lines, PinchProfiles, PinchRange, ProfileExtents,
    ResolveStations, Station, StationFrames,
};
