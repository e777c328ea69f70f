//! Test modules for repository analysis

mod utils;
mod validation;
