pub mod api_error;
pub mod column;
pub mod expression;
pub mod filter;
pub mod page;
pub mod sorting;
