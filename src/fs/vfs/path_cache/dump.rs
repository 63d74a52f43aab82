//! Introspecção do path cache (diagnóstico).

use super::entry::EntryHandle;
use super::PathCache;
use crate::fs::vfs::vnode::VnodeId;

/// Uma linha do dump: uma entrada e o bucket onde mora.
#[derive(Debug, Clone, Copy)]
pub struct DumpRow<'a> {
    pub bucket: usize,
    pub handle: EntryHandle,
    pub name: &'a [u8],
    pub parent: VnodeId,
    pub child: VnodeId,
    pub name_len: usize,
    #[cfg(feature = "hit_stats")]
    pub hits: u32,
}

/// Uso de memória do cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathCacheMemory {
    pub entries: usize,
    pub bytes: usize,
}

impl<const N: usize> PathCache<N> {
    /// Todas as entradas, bucket a bucket, na ordem de cada cadeia.
    pub fn entries(&self) -> impl Iterator<Item = DumpRow<'_>> + '_ {
        (0..N).flat_map(move |bucket| {
            self.buckets
                .chain(&self.slab, bucket)
                .filter_map(move |index| {
                    let entry = self.slab.at(index)?;
                    Some(DumpRow {
                        bucket,
                        handle: self.slab.handle_at(index)?,
                        name: entry.name(),
                        parent: entry.parent(),
                        child: entry.child(),
                        name_len: entry.name_len(),
                        #[cfg(feature = "hit_stats")]
                        hits: entry.hits(),
                    })
                })
        })
    }

    /// Quantidade de entradas e bytes ocupados (cabeçalho + nome).
    pub fn memory_usage(&self) -> PathCacheMemory {
        self.entries().fold(PathCacheMemory::default(), |acc, row| PathCacheMemory {
            entries: acc.entries + 1,
            bytes: acc.bytes
                + self
                    .slab
                    .get(row.handle)
                    .map_or(0, |entry| entry.footprint()),
        })
    }

    /// Imprime todas as entradas no log.
    pub fn dump(&self) {
        crate::kinfo!("-------->pathCache dump in");
        for row in self.entries() {
            crate::klog!("    bucket=", row.bucket, " parent=", row.parent.raw());
            crate::klog!(" child=", row.child.raw(), " len=", row.name_len);
            #[cfg(feature = "hit_stats")]
            crate::klog!(" hits=", row.hits);
            crate::klog!(" name=");
            crate::klog!(core::str::from_utf8(row.name).unwrap_or("<binário>"));
            crate::knl!();
        }
        let mem = self.memory_usage();
        crate::kinfo!("pathCache number=", mem.entries);
        crate::kinfo!("pathCache memory size(B)=", mem.bytes);
        #[cfg(feature = "hit_stats")]
        crate::kinfo!("pathCache hit rate(%)=", self.stats.hit_rate());
        crate::kinfo!("-------->pathCache dump out");
    }
}
