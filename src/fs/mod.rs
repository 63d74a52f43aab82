//! Sistema de Arquivos Virtual (VFS).
//!
//! Submódulos:
//! - `vfs`: Vnodes, path cache e resolução de caminhos.
//! - `test`: Suite de autoteste executada no kernel (feature `self_test`).

pub mod vfs;


#[cfg(test)]
mod tests;

/// Inicializa o subsistema de arquivos.
pub fn init() {
    crate::kinfo!("(FS) Inicializando subsistema de arquivos...");
    vfs::init();
}
