//! Test modules for the scoring engine
//!
//! Engine combination and registry rules live in `engine`, the behaviour of
//! each built-in criterion in `criteria`.

mod utils;
