pub mod board;
pub mod display;
pub mod session;
pub mod set;
pub mod venue;

pub use board::{BracketSnapshot, EventMeta, SchedulerStatus};
pub use display::{Bucket, DisplayMatch, ResolvedSlotInfo};
pub use session::Session;
pub use set::{MatchSlot, MatchSnapshot, Placement, SetState};
pub use venue::VenueLayout;
