//! Invalidação: liberação individual e varredura por destruição de vnode.

use super::anchor::{self, AnchorTable};
use super::entry::EntryHandle;
use super::error::PathCacheResult;
use super::{hash, PathCache};
use crate::fs::vfs::vnode::VnodeId;
use alloc::vec::Vec;

impl<const N: usize> PathCache<N> {
    /// Remove a entrada das três coleções e libera sua memória.
    ///
    /// # Erros
    ///
    /// - `MalformedEntry`: handle nulo ou fora da tabela
    /// - `StaleEntry`: a entrada já foi liberada
    pub fn free<T: AnchorTable + ?Sized>(
        &mut self,
        anchors: &mut T,
        handle: EntryHandle,
    ) -> PathCacheResult<()> {
        if let Err(e) = self.slab.check(handle) {
            crate::kerror!("(PathCache) free: handle inválido idx=", handle.index());
            return Err(e);
        }
        self.detach(anchors, handle);
        Ok(())
    }

    /// Remove toda entrada que referencia `obj`, como pai e como filho.
    ///
    /// Deve ser chamada pelo dono de `obj` antes de a identidade ser
    /// reutilizada. Retorna quantas entradas foram removidas.
    pub fn notify_destroyed<T: AnchorTable + ?Sized>(&mut self, anchors: &mut T, obj: VnodeId) -> usize {
        let mut swept = 0;

        // Papel de pai: tudo cacheado sob `obj`
        let doomed = match anchors.anchors_mut(obj) {
            Some(a) => core::mem::take(&mut a.children),
            None => return 0,
        };
        for handle in doomed {
            if self.detach(anchors, handle) {
                swept += 1;
            }
        }

        // Papel de filho: tudo que resolve para `obj`
        let doomed = anchors
            .anchors_mut(obj)
            .map(|a| core::mem::take(&mut a.parents))
            .unwrap_or_default();
        for handle in doomed {
            if self.detach(anchors, handle) {
                swept += 1;
            }
        }

        debug_assert!(anchors.anchors(obj).map_or(true, |a| a.is_empty()));
        crate::ktrace!("(PathCache) vnode destruído, entradas removidas=", swept);
        swept
    }

    /// Libera todas as entradas. Retorna quantas foram removidas.
    pub fn clear<T: AnchorTable + ?Sized>(&mut self, anchors: &mut T) -> usize {
        let all: Vec<EntryHandle> = self.slab.handles().collect();
        let mut freed = 0;
        for handle in all {
            if self.detach(anchors, handle) {
                freed += 1;
            }
        }
        crate::kdebug!("(PathCache) clear: entradas removidas=", freed);
        freed
    }

    /// Desliga `handle` da cadeia, da lista do pai e da lista do filho, e
    /// devolve o slot. Tolera a entrada já ter saído de uma lista de âncora
    /// (a varredura retira a lista inteira antes de iterar).
    fn detach<T: AnchorTable + ?Sized>(&mut self, anchors: &mut T, handle: EntryHandle) -> bool {
        let (parent, child, parent_slot, child_slot, bucket) = match self.slab.get(handle) {
            Some(e) => (
                e.parent(),
                e.child(),
                e.parent_slot,
                e.child_slot,
                hash::bucket_index(e.name(), e.parent(), N),
            ),
            None => return false,
        };

        self.buckets.unlink(&mut self.slab, bucket, handle.index());
        if let Some(a) = anchors.anchors_mut(parent) {
            if let Some(moved) = anchor::unlink(&mut a.children, parent_slot, handle) {
                if let Some(e) = self.slab.get_mut(moved) {
                    e.parent_slot = parent_slot;
                }
            }
        }
        if let Some(a) = anchors.anchors_mut(child) {
            if let Some(moved) = anchor::unlink(&mut a.parents, child_slot, handle) {
                if let Some(e) = self.slab.get_mut(moved) {
                    e.child_slot = child_slot;
                }
            }
        }
        self.slab.remove(handle).is_some()
    }
}
