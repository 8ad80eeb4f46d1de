//! Utility functions

pub mod helpers;
