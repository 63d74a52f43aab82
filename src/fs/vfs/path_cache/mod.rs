//! # Path Cache
//!
//! Cache de resolução de componentes de caminho: lembra, para um par
//! `(diretório pai, nome)`, qual vnode filho ele resolve, evitando refazer
//! o lookup no driver a cada travessia de caminho.
//!
//! ```text
//!   BucketTable[N]            EntrySlab                 Vnodes
//!  ┌──────────┐        ┌─────────────────────┐     ┌──────────────┐
//!  │ bucket 0 │──────► │ e3 "bin"  P=1 C=4   │◄────│ P.children   │
//!  │ bucket 1 │        │   │ next             │     │              │
//!  │   ...    │        │   ▼                  │◄────│ C.parents    │
//!  │ bucket k │──────► │ e7 "etc"  P=1 C=9   │     └──────────────┘
//!  └──────────┘        └─────────────────────┘
//! ```
//!
//! Cada entrada viva pertence a exatamente três coleções: a cadeia do seu
//! bucket, a lista `children` do pai e a lista `parents` do filho. Toda
//! operação pública mantém as três em acordo (todas ou nenhuma).
//!
//! ## Concorrência
//!
//! O cache não tem lock próprio. Todas as operações, inclusive `lookup`,
//! devem ser chamadas sob o lock grosso do VFS (`fs::vfs::with_vfs`).
//!
//! ## Invalidação
//!
//! O cache nunca estende a vida de um vnode. Quem destrói um vnode deve
//! chamar `notify_destroyed` antes de liberar sua identidade; depois disso
//! nenhuma entrada referencia o vnode, como pai ou como filho.

pub mod anchor;
mod bucket;
pub mod dump;
pub mod entry;
pub mod error;
pub mod hash;
mod insert;
mod invalidate;
#[cfg(feature = "hit_stats")]
pub mod stats;

pub use anchor::{AnchorTable, CacheAnchors};
pub use dump::{DumpRow, PathCacheMemory};
pub use entry::{CacheEntry, EntryHandle};
pub use error::{PathCacheError, PathCacheResult};

use crate::fs::vfs::vnode::VnodeId;
use bucket::BucketTable;
use entry::EntrySlab;
#[cfg(feature = "hit_stats")]
use stats::HitStats;

// =============================================================================
// CONFIGURAÇÃO
// =============================================================================

/// Tamanho máximo de um componente de caminho, em bytes
pub const NAME_MAX: usize = 255;

/// Número padrão de buckets (precisa ser potência de dois)
pub const PATH_CACHE_BUCKETS: usize = 256;

const _: () = assert!(PATH_CACHE_BUCKETS.is_power_of_two());

/// Configuração de runtime do cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCacheConfig {
    /// Limite do pool de entradas. `None` = limitado só pela memória.
    /// Esgotar o pool é `AllocationFailure`; o cache nunca despeja entradas.
    pub max_entries: Option<usize>,
}

// =============================================================================
// PATH CACHE
// =============================================================================

pub struct PathCache<const N: usize = PATH_CACHE_BUCKETS> {
    buckets: BucketTable<N>,
    slab: EntrySlab,
    #[cfg(feature = "hit_stats")]
    stats: HitStats,
}

impl PathCache {
    /// Cache com o número padrão de buckets e sem limite de entradas.
    pub fn new() -> Self {
        Self {
            buckets: BucketTable::empty(),
            slab: EntrySlab::new(None),
            #[cfg(feature = "hit_stats")]
            stats: HitStats::new(),
        }
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PathCache<N> {
    /// Cria o cache com `N` cadeias vazias.
    ///
    /// Falha com `InvalidConfig` se `N` não é potência de dois.
    pub fn init() -> PathCacheResult<Self> {
        Self::with_config(PathCacheConfig::default())
    }

    pub fn with_config(config: PathCacheConfig) -> PathCacheResult<Self> {
        let buckets = BucketTable::new().map_err(|e| {
            crate::kerror!("(PathCache) init: buckets não é potência de dois: ", N);
            e
        })?;
        crate::ktrace!("(PathCache) init: buckets=", N);
        Ok(Self {
            buckets,
            slab: EntrySlab::new(config.max_entries),
            #[cfg(feature = "hit_stats")]
            stats: HitStats::new(),
        })
    }

    /// Número de buckets da tabela.
    pub const fn bucket_count(&self) -> usize {
        N
    }

    /// Número de entradas vivas.
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slab.len() == 0
    }

    /// Resolve `(parent, name)` pelo cache.
    ///
    /// Retorna o filho da **primeira** entrada da cadeia que casa com pai,
    /// tamanho e bytes do nome. Como `insert` empilha na cabeça, a entrada
    /// mais recente para uma mesma chave é a encontrada. Nunca aloca.
    pub fn lookup(&self, parent: VnodeId, name: &[u8]) -> Option<VnodeId> {
        #[cfg(feature = "hit_stats")]
        self.stats.record_attempt();

        let (_, entry) = self.lookup_entry(parent, name)?;
        #[cfg(feature = "hit_stats")]
        {
            entry.touch();
            self.stats.record_hit();
        }
        Some(entry.child())
    }

    /// Entrada de um handle, se ainda viva.
    pub fn get(&self, handle: EntryHandle) -> Option<&CacheEntry> {
        self.slab.get(handle)
    }

    /// Handle da entrada que `lookup(parent, name)` usaria.
    pub fn find_child(&self, parent: VnodeId, name: &[u8]) -> Option<EntryHandle> {
        let (index, _) = self.lookup_entry(parent, name)?;
        self.slab.handle_at(index)
    }

    /// Primeira entrada da cadeia que casa com a chave. Não conta estatísticas.
    fn lookup_entry(&self, parent: VnodeId, name: &[u8]) -> Option<(u32, &CacheEntry)> {
        if name.is_empty() || name.len() > NAME_MAX {
            return None;
        }

        let bucket = hash::bucket_index(name, parent, N);
        for index in self.buckets.chain(&self.slab, bucket) {
            let entry = self.slab.at(index)?;
            if entry.matches(parent, name) {
                return Some((index, entry));
            }
        }
        None
    }

    /// Entradas em que `parent` é o diretório pai.
    pub fn children_of<'a, T: AnchorTable + ?Sized>(
        &'a self,
        anchors: &'a T,
        parent: VnodeId,
    ) -> impl Iterator<Item = (EntryHandle, &'a CacheEntry)> + 'a {
        let list = anchors.anchors(parent).map(|a| a.children()).unwrap_or(&[]);
        list.iter()
            .filter_map(move |h| self.slab.get(*h).map(|e| (*h, e)))
    }

    /// Entradas que resolvem para `child`.
    pub fn parents_of<'a, T: AnchorTable + ?Sized>(
        &'a self,
        anchors: &'a T,
        child: VnodeId,
    ) -> impl Iterator<Item = (EntryHandle, &'a CacheEntry)> + 'a {
        let list = anchors.anchors(child).map(|a| a.parents()).unwrap_or(&[]);
        list.iter()
            .filter_map(move |h| self.slab.get(*h).map(|e| (*h, e)))
    }

    /// Lê e zera os contadores globais: (hits, attempts).
    #[cfg(feature = "hit_stats")]
    pub fn reset_hit_stats(&self) -> (u64, u64) {
        self.stats.reset()
    }

    #[cfg(feature = "hit_stats")]
    pub fn hit_stats(&self) -> &HitStats {
        &self.stats
    }

    /// Verifica as invariantes do cache; entra em pânico na primeira violação.
    ///
    /// - toda entrada está na cadeia do seu bucket, e na lista do pai e na do
    ///   filho exatamente na posição que guarda
    /// - pai e filho de toda entrada ainda existem em `anchors`
    /// - o bucket de cada entrada é `hash(name, parent) & (N - 1)`
    /// - `1 <= name_len <= NAME_MAX`
    ///
    /// `objects` lista os vnodes cujas âncoras devem ser conferidas no
    /// sentido inverso (toda âncora aponta para uma entrada viva coerente).
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants<T: AnchorTable + ?Sized>(
        &self,
        anchors: &T,
        objects: &[VnodeId],
    ) {
        let mut reachable = 0usize;
        for bucket in 0..N {
            let mut prev = None;
            for index in self.buckets.chain(&self.slab, bucket) {
                let entry = self.slab.at(index).expect("cadeia aponta para slot vazio");
                let handle = self.slab.handle_at(index).expect("slot sem handle");

                assert_eq!(entry.prev, prev, "link prev quebrado no bucket {}", bucket);
                assert_eq!(
                    hash::bucket_index(entry.name(), entry.parent(), N),
                    bucket,
                    "entrada no bucket errado"
                );
                assert!(entry.name_len() >= 1 && entry.name_len() <= NAME_MAX);

                let parent = anchors
                    .anchors(entry.parent())
                    .expect("entrada referencia pai destruído");
                assert_eq!(
                    parent.children().get(entry.parent_slot),
                    Some(&handle),
                    "entrada fora da sua posição na lista do pai"
                );
                let child = anchors
                    .anchors(entry.child())
                    .expect("entrada referencia filho destruído");
                assert_eq!(
                    child.parents().get(entry.child_slot),
                    Some(&handle),
                    "entrada fora da sua posição na lista do filho"
                );

                prev = Some(index);
                reachable += 1;
            }
        }
        assert_eq!(reachable, self.slab.len(), "entrada viva fora das cadeias");

        for &id in objects {
            let Some(a) = anchors.anchors(id) else {
                continue;
            };
            for h in a.children() {
                let e = self.slab.get(*h).expect("âncora children aponta para entrada morta");
                assert_eq!(e.parent(), id);
            }
            for h in a.parents() {
                let e = self.slab.get(*h).expect("âncora parents aponta para entrada morta");
                assert_eq!(e.child(), id);
            }
        }
    }
}
