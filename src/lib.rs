pub mod clock;
pub mod config;
pub mod constants;
pub mod driver;
pub mod effects;
pub mod engine;
pub mod error;
pub mod grid;
pub mod render;
pub mod rng;
pub mod types;
pub mod wanderer;
