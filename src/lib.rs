//! Path Cache Library.
//!
//! Cache de resolução de caminhos do VFS do Redstone OS, com a camada
//! mínima de vnodes e o VFS que o consome.
//!
//! Em `target_os = "none"` compila como `no_std`; os testes rodam no host.

#![cfg_attr(not(test), no_std)]

// Habilitar alocação dinâmica (Vec para slab, nomes e âncoras)
extern crate alloc;

// --- Infraestrutura ---
pub mod core; // Logging
pub mod drivers; // Serial (saída de log)
pub mod klib; // Hash FNV, framework de testes
pub mod sys; // Errno

// --- Subsistemas ---
pub mod fs; // VFS + path cache

pub use fs::vfs::path_cache::{PathCache, PathCacheError};
pub use fs::vfs::{Vfs, VfsError, VnodeId};
