//! Test modules for the backend adapters
