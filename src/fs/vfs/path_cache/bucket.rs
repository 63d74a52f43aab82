//! # Tabela de Buckets
//!
//! `N` cabeças de cadeia (N potência de dois, índice por máscara).
//! As cadeias são duplamente encadeadas por índice dentro do slab de
//! entradas; inserção sempre na cabeça.

use super::entry::EntrySlab;
use super::error::{PathCacheError, PathCacheResult};

pub(super) struct BucketTable<const N: usize> {
    heads: [Option<u32>; N],
}

impl<const N: usize> BucketTable<N> {
    /// Cria a tabela com `N` cadeias vazias. Falha se `N` não é potência de dois.
    pub(super) fn new() -> PathCacheResult<Self> {
        if !N.is_power_of_two() {
            return Err(PathCacheError::InvalidConfig);
        }
        Ok(Self::empty())
    }

    /// Tabela vazia sem validar `N`; só para tamanhos conferidos em tempo de compilação.
    pub(super) const fn empty() -> Self {
        Self { heads: [None; N] }
    }

    /// Empilha a entrada `index` na cabeça da cadeia `bucket`.
    pub(super) fn push_front(&mut self, slab: &mut EntrySlab, bucket: usize, index: u32) {
        let old_head = self.heads[bucket];
        if let Some(entry) = slab.at_mut(index) {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(old) = old_head {
            if let Some(entry) = slab.at_mut(old) {
                entry.prev = Some(index);
            }
        }
        self.heads[bucket] = Some(index);
    }

    /// Desliga a entrada `index` da cadeia `bucket`.
    pub(super) fn unlink(&mut self, slab: &mut EntrySlab, bucket: usize, index: u32) {
        let (prev, next) = match slab.at_mut(index) {
            Some(entry) => {
                let links = (entry.prev, entry.next);
                entry.prev = None;
                entry.next = None;
                links
            }
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(entry) = slab.at_mut(p) {
                    entry.next = next;
                }
            }
            None => self.heads[bucket] = next,
        }
        if let Some(n) = next {
            if let Some(entry) = slab.at_mut(n) {
                entry.prev = prev;
            }
        }
    }

    /// Percorre a cadeia `bucket` em ordem (cabeça primeiro).
    pub(super) fn chain<'a>(&self, slab: &'a EntrySlab, bucket: usize) -> Chain<'a> {
        Chain {
            slab,
            cursor: self.heads[bucket],
        }
    }
}

/// Iterador sobre os índices de uma cadeia.
pub(super) struct Chain<'a> {
    slab: &'a EntrySlab,
    cursor: Option<u32>,
}

impl Iterator for Chain<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let index = self.cursor?;
        self.cursor = self.slab.at(index).and_then(|e| e.next);
        Some(index)
    }
}
