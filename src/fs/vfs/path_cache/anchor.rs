//! # Âncoras de Vnode
//!
//! Cada objeto que pode ser pai ou filho de uma entrada do cache expõe duas
//! listas que o cache mantém por ele:
//!
//! ```text
//!            children                         parents
//!   Vnode P ─────────► [e1, e2, ...]  Vnode C ────────► [e1, ...]
//!   (entradas onde P é o diretório)   (entradas que resolvem para C)
//! ```
//!
//! O cache é o único dono do conteúdo dessas listas. O dono do objeto só
//! precisa guardá-las e entregá-las via `AnchorTable`.

use super::entry::EntryHandle;
use super::error::{PathCacheError, PathCacheResult};
use crate::fs::vfs::vnode::VnodeId;
use alloc::vec::Vec;

/// As duas listas de pertinência que um vnode empresta ao path cache.
#[derive(Debug, Default)]
pub struct CacheAnchors {
    /// Entradas em que este vnode é o pai
    pub(super) children: Vec<EntryHandle>,
    /// Entradas em que este vnode é o filho
    pub(super) parents: Vec<EntryHandle>,
}

impl CacheAnchors {
    pub const fn new() -> Self {
        Self {
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Entradas cacheadas sob este vnode (papel de diretório pai).
    pub fn children(&self) -> &[EntryHandle] {
        &self.children
    }

    /// Entradas que resolvem para este vnode (papel de filho).
    pub fn parents(&self) -> &[EntryHandle] {
        &self.parents
    }

    /// `true` se nenhuma entrada do cache referencia este vnode.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.parents.is_empty()
    }
}

/// Remove `handle` da posição `slot` com `swap_remove`, em O(1).
///
/// Retorna o handle que passou a ocupar `slot`, para o chamador corrigir o
/// índice reverso dele. Se `handle` não está em `slot` (a varredura já
/// retirou a lista inteira) nada é alterado.
pub(super) fn unlink(
    list: &mut Vec<EntryHandle>,
    slot: usize,
    handle: EntryHandle,
) -> Option<EntryHandle> {
    if list.get(slot) != Some(&handle) {
        return None;
    }
    list.swap_remove(slot);
    list.get(slot).copied()
}

/// Interface consumida do sistema de objetos (vnodes).
///
/// Um id sem âncoras (`None`) é tratado como objeto inexistente/destruído.
pub trait AnchorTable {
    fn anchors(&self, id: VnodeId) -> Option<&CacheAnchors>;
    fn anchors_mut(&mut self, id: VnodeId) -> Option<&mut CacheAnchors>;

    /// Garante espaço para mais uma entrada na lista `children` de `id`.
    fn reserve_child_slot(&mut self, id: VnodeId) -> PathCacheResult<()> {
        let a = self.anchors_mut(id).ok_or(PathCacheError::InvalidArgument)?;
        a.children
            .try_reserve(1)
            .map_err(|_| PathCacheError::AllocationFailure)
    }

    /// Garante espaço para mais uma entrada na lista `parents` de `id`.
    fn reserve_parent_slot(&mut self, id: VnodeId) -> PathCacheResult<()> {
        let a = self.anchors_mut(id).ok_or(PathCacheError::InvalidArgument)?;
        a.parents
            .try_reserve(1)
            .map_err(|_| PathCacheError::AllocationFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlink_reports_moved_handle() {
        let h = |i| EntryHandle::new(i, 1);
        let mut list = alloc::vec![h(0), h(1), h(2)];

        assert_eq!(unlink(&mut list, 0, h(0)), Some(h(2)));
        assert_eq!(list, [h(2), h(1)]);
        // Último da lista: nada se move
        assert_eq!(unlink(&mut list, 1, h(1)), None);
        // Posição desatualizada não altera a lista
        assert_eq!(unlink(&mut list, 0, h(7)), None);
        assert_eq!(list, [h(2)]);
    }
}
