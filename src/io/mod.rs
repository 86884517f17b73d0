//! I/O module - alignment scanning and table export

pub mod alignment;
pub mod export;
