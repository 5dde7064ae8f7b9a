pub mod board;
pub mod classifier;
pub mod occupancy;
pub mod set_index;
pub mod slot_resolver;

pub use board::{partition, BoardCycle};
pub use classifier::classify;
pub use occupancy::StationOccupancy;
pub use set_index::SetIndex;
pub use slot_resolver::resolve;
