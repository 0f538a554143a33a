pub mod http;
pub mod memory;
pub mod odata;
pub mod sqlite;
