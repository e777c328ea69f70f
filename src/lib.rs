pub mod analysis;
pub mod app;
pub mod backend;
pub mod core;
pub mod model;
pub mod pool;
pub mod scoring;
