//! Application layer: service orchestration over the pure algorithms

pub mod service;
