//! Public library modules for the CLI crate
pub mod launch;
pub mod render;
