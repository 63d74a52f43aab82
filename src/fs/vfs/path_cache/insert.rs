//! Alocação de entradas (insert).
//!
//! Tudo que pode falhar (validação, pool, memória do nome, capacidade das
//! listas de âncora) acontece antes de qualquer coleção ser tocada; a fase
//! de commit não aloca. Uma falha não deixa rastro em nenhuma das três.

use super::anchor::AnchorTable;
use super::entry::{CacheEntry, EntryHandle};
use super::error::{PathCacheError, PathCacheResult};
use super::{hash, PathCache, NAME_MAX};
use crate::fs::vfs::vnode::VnodeId;

impl<const N: usize> PathCache<N> {
    /// Cacheia o fato `(parent, name) -> child`.
    ///
    /// Pré-condição: não existe entrada viva para `(parent, name)`. O cache
    /// não verifica; o chamador só insere depois de um miss, sob o lock do
    /// VFS. Se a regra for violada, a entrada nova fica na frente da cadeia
    /// e é a que `lookup` encontra; a antiga continua sendo varrida por
    /// `notify_destroyed` e pode ser liberada por `free`.
    ///
    /// # Erros
    ///
    /// - `InvalidArgument`: nome vazio, nome maior que `NAME_MAX`, ou
    ///   `parent`/`child` sem âncoras (vnode inexistente)
    /// - `AllocationFailure`: pool esgotado ou sem memória
    pub fn insert<T: AnchorTable + ?Sized>(
        &mut self,
        anchors: &mut T,
        parent: VnodeId,
        child: VnodeId,
        name: &[u8],
    ) -> PathCacheResult<EntryHandle> {
        if name.is_empty() || name.len() > NAME_MAX {
            crate::kdebug!("(PathCache) insert: tamanho de nome inválido=", name.len());
            return Err(PathCacheError::InvalidArgument);
        }
        if anchors.anchors(parent).is_none() || anchors.anchors(child).is_none() {
            crate::kdebug!("(PathCache) insert: vnode inexistente, pai=", parent.raw());
            return Err(PathCacheError::InvalidArgument);
        }

        // --- Reservas ---
        if let Err(e) = self.slab.reserve_one() {
            crate::kwarn!("(PathCache) insert: sem memória para entrada, total=", self.len());
            return Err(e);
        }
        let mut entry = CacheEntry::new(parent, child, name)?;
        anchors.reserve_child_slot(parent)?;
        anchors.reserve_parent_slot(child)?;

        // --- Commit ---
        if let Some(a) = anchors.anchors(parent) {
            entry.parent_slot = a.children.len();
        }
        if let Some(a) = anchors.anchors(child) {
            entry.child_slot = a.parents.len();
        }
        let handle = self.slab.insert(entry);
        let bucket = hash::bucket_index(name, parent, N);
        self.buckets.push_front(&mut self.slab, bucket, handle.index());
        if let Some(a) = anchors.anchors_mut(parent) {
            a.children.push(handle);
        }
        if let Some(a) = anchors.anchors_mut(child) {
            a.parents.push(handle);
        }

        crate::ktrace!("(PathCache) insert: bucket=", bucket);
        Ok(handle)
    }
}
