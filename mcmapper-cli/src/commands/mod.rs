//! CLI command implementations.

pub mod audit;
pub mod common;
pub mod config;
pub mod layer;
pub mod parse;
pub mod region;
pub mod resolve;

pub use audit::AuditArgs;
pub use config::ConfigCommands;
pub use parse::ParseArgs;
pub use region::RegionArgs;
pub use resolve::ResolveArgs;
