//! Testes para o módulo Filesystem
//!
//! # Como Executar os Testes
//!
//! ```bash
//! # Todos os testes de filesystem
//! cargo test --lib fs::tests
//!
//! # Só o path cache
//! cargo test --lib fs::tests::path_cache
//! ```
//!
//! # Estrutura dos Testes
//!
//! - `path_cache.rs` - Propriedades e cenários do path cache
//! - `vfs.rs` - Resolução de caminhos e ciclo de vida de vnodes
//! - `props.rs` - Sequências aleatórias de operações (proptest)

#![cfg(test)]

pub mod props;
pub mod vfs;

use crate::fs::vfs::path_cache::{EntryHandle, PathCache};
use crate::fs::vfs::{VnodeFlags, VnodeId, VnodeTable, VnodeType};
use alloc::vec::Vec;

/// Helper: aloca `n` diretórios numa tabela nova
pub fn table_with_dirs(n: usize) -> (VnodeTable, Vec<VnodeId>) {
    let mut table = VnodeTable::new();
    let ids = (0..n)
        .map(|_| table.alloc(VnodeType::Directory, VnodeFlags::empty()))
        .collect();
    (table, ids)
}

/// Helper: retrato completo do cache (cadeias + âncoras dos vnodes dados)
#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub rows: Vec<(usize, EntryHandle, Vec<u8>, VnodeId, VnodeId)>,
    pub anchors: Vec<(Vec<EntryHandle>, Vec<EntryHandle>)>,
}

pub fn snapshot<const N: usize>(cache: &PathCache<N>, table: &VnodeTable, ids: &[VnodeId]) -> Snapshot {
    use crate::fs::vfs::path_cache::AnchorTable;

    Snapshot {
        rows: cache
            .entries()
            .map(|r| (r.bucket, r.handle, r.name.to_vec(), r.parent, r.child))
            .collect(),
        anchors: ids
            .iter()
            .map(|id| {
                let a = table.anchors(*id).unwrap();
                (a.children().to_vec(), a.parents().to_vec())
            })
            .collect(),
    }
}
