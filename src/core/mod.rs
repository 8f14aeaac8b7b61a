pub mod geo;
pub mod record;

pub use geo::{Bounds, Coordinate};
pub use record::{labels, PositionRecord};
