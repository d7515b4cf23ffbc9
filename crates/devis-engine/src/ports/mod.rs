//! Ports: the engine's boundary with the CRUD application around it

pub mod inbound;
pub mod outbound;
