//! Core Module
//!
//! Infraestrutura central compartilhada pelos subsistemas: por enquanto,
//! apenas o sistema de logging zero-overhead.

pub mod logging;
