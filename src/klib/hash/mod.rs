//! Funções de hash do kernel.

pub mod fnv;
