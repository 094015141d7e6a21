pub mod config;
pub mod env;
pub mod policy;
pub mod simulation;

pub use env::*;
pub use simulation::*;
