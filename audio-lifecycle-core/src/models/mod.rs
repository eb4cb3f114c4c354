pub mod config;
pub mod error;
pub mod ordering;
pub mod snapshot;
pub mod state;
