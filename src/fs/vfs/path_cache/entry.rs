//! # Entradas do Path Cache
//!
//! Uma `CacheEntry` é um fato `(pai, nome) -> filho` já validado pelo driver.
//! As entradas moram num slab indexado; os três "encadeamentos" da entrada
//! (bucket, lista do pai, lista do filho) guardam índices, nunca ponteiros.
//!
//! Handles carregam índice + generation, como os handles de processo:
//! um handle de uma entrada já liberada nunca volta a resolver.

use super::error::{PathCacheError, PathCacheResult};
use crate::fs::vfs::vnode::VnodeId;
use alloc::vec::Vec;
#[cfg(feature = "hit_stats")]
use core::sync::atomic::{AtomicU32, Ordering};

/// Handle de entrada: índice no slab + generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryHandle {
    index: u32,
    generation: u32,
}

impl EntryHandle {
    /// Handle nulo. Generation 0 nunca é atribuída a uma entrada viva.
    pub const INVALID: Self = Self {
        index: u32::MAX,
        generation: 0,
    };

    pub(super) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(&self) -> u32 {
        self.index
    }

    pub const fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

/// Um fato de resolução `(parent, name) -> child`.
#[derive(Debug)]
pub struct CacheEntry {
    /// Cópia do nome + 1 byte NUL de guarda (comparações usam só `name_len`)
    name: Vec<u8>,
    name_len: usize,
    parent: VnodeId,
    child: VnodeId,
    /// Vizinhos na cadeia do bucket (índices no slab)
    pub(super) prev: Option<u32>,
    pub(super) next: Option<u32>,
    /// Posição na lista `children` do pai e na `parents` do filho
    pub(super) parent_slot: usize,
    pub(super) child_slot: usize,
    #[cfg(feature = "hit_stats")]
    hits: AtomicU32,
}

impl CacheEntry {
    /// Cria a entrada com o nome já copiado. Falha só por falta de memória.
    pub(super) fn new(parent: VnodeId, child: VnodeId, name: &[u8]) -> PathCacheResult<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(name.len() + 1)
            .map_err(|_| PathCacheError::AllocationFailure)?;
        buf.extend_from_slice(name);
        buf.push(0);

        Ok(Self {
            name: buf,
            name_len: name.len(),
            parent,
            child,
            prev: None,
            next: None,
            parent_slot: 0,
            child_slot: 0,
            #[cfg(feature = "hit_stats")]
            hits: AtomicU32::new(0),
        })
    }

    /// Nome do componente (sem o NUL de guarda).
    pub fn name(&self) -> &[u8] {
        &self.name[..self.name_len]
    }

    pub fn name_len(&self) -> usize {
        self.name_len
    }

    pub fn parent(&self) -> VnodeId {
        self.parent
    }

    pub fn child(&self) -> VnodeId {
        self.child
    }

    /// Compara com a chave de lookup: pai, tamanho e bytes do nome.
    #[inline]
    pub(super) fn matches(&self, parent: VnodeId, name: &[u8]) -> bool {
        self.parent == parent && self.name_len == name.len() && self.name() == name
    }

    /// Bytes ocupados pela entrada (cabeçalho + buffer do nome).
    pub fn footprint(&self) -> usize {
        core::mem::size_of::<Self>() + self.name.capacity()
    }

    #[cfg(feature = "hit_stats")]
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::Relaxed)
    }

    #[cfg(feature = "hit_stats")]
    #[inline]
    pub(super) fn touch(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }
}

struct Slot {
    generation: u32,
    entry: Option<CacheEntry>,
}

/// Slab de entradas com lista de slots livres e limite opcional (pool fixo).
pub(super) struct EntrySlab {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    limit: Option<usize>,
}

impl EntrySlab {
    pub(super) const fn new(limit: Option<usize>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            limit,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.len
    }

    /// Garante espaço para mais uma entrada, sem alterar o conteúdo.
    ///
    /// Depois de `Ok`, o próximo `insert` (e o `remove` correspondente)
    /// não alocam.
    pub(super) fn reserve_one(&mut self) -> PathCacheResult<()> {
        if let Some(limit) = self.limit {
            if self.len >= limit {
                return Err(PathCacheError::AllocationFailure);
            }
        }
        if self.free.is_empty() {
            if self.slots.len() >= u32::MAX as usize {
                return Err(PathCacheError::AllocationFailure);
            }
            self.slots
                .try_reserve(1)
                .map_err(|_| PathCacheError::AllocationFailure)?;
            // A lista livre precisa comportar todos os slots
            let needed = self.slots.len() + 1 - self.free.len();
            self.free
                .try_reserve(needed)
                .map_err(|_| PathCacheError::AllocationFailure)?;
        }
        Ok(())
    }

    /// Guarda a entrada. Requer `reserve_one` bem-sucedido antes.
    pub(super) fn insert(&mut self, entry: CacheEntry) -> EntryHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return EntryHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 1,
            entry: Some(entry),
        });
        EntryHandle::new(index, 1)
    }

    /// Valida o handle: `MalformedEntry` se nulo/fora da tabela,
    /// `StaleEntry` se a entrada já foi liberada.
    pub(super) fn check(&self, handle: EntryHandle) -> PathCacheResult<()> {
        if !handle.is_valid() || handle.generation == 0 {
            return Err(PathCacheError::MalformedEntry);
        }
        let slot = self
            .slots
            .get(handle.index as usize)
            .ok_or(PathCacheError::MalformedEntry)?;
        if slot.generation != handle.generation || slot.entry.is_none() {
            return Err(PathCacheError::StaleEntry);
        }
        Ok(())
    }

    pub(super) fn get(&self, handle: EntryHandle) -> Option<&CacheEntry> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    pub(super) fn get_mut(&mut self, handle: EntryHandle) -> Option<&mut CacheEntry> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Acesso por índice bruto (cadeias de bucket guardam só o índice).
    pub(super) fn at(&self, index: u32) -> Option<&CacheEntry> {
        self.slots.get(index as usize)?.entry.as_ref()
    }

    pub(super) fn at_mut(&mut self, index: u32) -> Option<&mut CacheEntry> {
        self.slots.get_mut(index as usize)?.entry.as_mut()
    }

    /// Handle atual de um slot ocupado.
    pub(super) fn handle_at(&self, index: u32) -> Option<EntryHandle> {
        let slot = self.slots.get(index as usize)?;
        slot.entry.as_ref()?;
        Some(EntryHandle::new(index, slot.generation))
    }

    /// Remove a entrada e invalida o handle (generation avança).
    pub(super) fn remove(&mut self, handle: EntryHandle) -> Option<CacheEntry> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let entry = slot.entry.take()?;

        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation == 0 {
            slot.generation = 1;
        }
        // Capacidade reservada em `reserve_one`
        self.free.push(handle.index);
        self.len -= 1;
        Some(entry)
    }

    /// Handles de todas as entradas vivas, em ordem de slot.
    pub(super) fn handles(&self) -> impl Iterator<Item = EntryHandle> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|_| EntryHandle::new(index as u32, slot.generation))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vid(n: u32) -> VnodeId {
        VnodeId::new(n, 1)
    }

    fn entry(name: &[u8]) -> CacheEntry {
        CacheEntry::new(vid(1), vid(2), name).unwrap()
    }

    #[test]
    fn test_name_has_guard_terminator() {
        let e = entry(b"foo.txt");
        assert_eq!(e.name(), b"foo.txt");
        assert_eq!(e.name_len(), 7);
        assert_eq!(e.name.len(), 8);
        assert_eq!(e.name[7], 0);
        assert!(e.matches(vid(1), b"foo.txt"));
        assert!(!e.matches(vid(1), b"foo.tx"));
        assert!(!e.matches(vid(3), b"foo.txt"));
    }

    #[test]
    fn test_slot_reuse_bumps_generation() {
        let mut slab = EntrySlab::new(None);
        slab.reserve_one().unwrap();
        let h1 = slab.insert(entry(b"a"));
        assert!(slab.remove(h1).is_some());
        assert_eq!(slab.check(h1), Err(PathCacheError::StaleEntry));

        slab.reserve_one().unwrap();
        let h2 = slab.insert(entry(b"b"));
        assert_eq!(h2.index(), h1.index());
        assert_ne!(h2.generation(), h1.generation());
        assert!(slab.get(h1).is_none());
        assert_eq!(slab.get(h2).unwrap().name(), b"b");
    }

    #[test]
    fn test_limit_refuses_reservation() {
        let mut slab = EntrySlab::new(Some(1));
        slab.reserve_one().unwrap();
        let h = slab.insert(entry(b"a"));
        assert_eq!(slab.reserve_one(), Err(PathCacheError::AllocationFailure));
        slab.remove(h);
        assert!(slab.reserve_one().is_ok());
    }

    #[test]
    fn test_check_rejects_garbage() {
        let slab = EntrySlab::new(None);
        assert_eq!(
            slab.check(EntryHandle::INVALID),
            Err(PathCacheError::MalformedEntry)
        );
        assert_eq!(
            slab.check(EntryHandle::new(42, 1)),
            Err(PathCacheError::MalformedEntry)
        );
    }
}
