mod positions;

pub use positions::TrackPositionManager;
