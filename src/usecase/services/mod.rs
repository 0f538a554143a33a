pub mod filter_builder;
pub mod metadata;
pub mod sort_builder;
pub mod table_query;
