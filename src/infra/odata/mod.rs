pub mod endpoint;
pub mod query;
