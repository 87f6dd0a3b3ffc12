pub mod filter_config;
pub mod result;
pub mod schema;

pub use filter_config::*;
pub use result::*;
pub use schema::*;
