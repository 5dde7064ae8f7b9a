pub mod error;
pub mod source;
pub mod startgg;

pub use error::{FetchError, FetchResult};
pub use source::{BracketSource, EventFeed};
pub use startgg::{StartggClient, STARTGG_GRAPHQL_URL};
