//! JQL search: query composition, execution and result projection.

mod builder;
mod executor;
mod projector;

pub use builder::{with_order_by, QueryCriteria};
pub use executor::{search, top_level_fields, SearchOutcome, SearchOutput, SearchRequest};
pub use projector::project;
