//! Sequências aleatórias de operações sobre o path cache.
//!
//! Um modelo simples (lista de entradas vivas, na ordem de inserção)
//! acompanha o cache; depois de cada passo as invariantes estruturais são
//! verificadas e todo `lookup` tem que concordar com o modelo.

#![cfg(test)]

use super::table_with_dirs;
use crate::fs::vfs::path_cache::{EntryHandle, PathCache, PathCacheError};
use crate::fs::vfs::VnodeId;
use alloc::vec::Vec;
use proptest::prelude::*;

const VNODES: usize = 6;
const NAMES: [&[u8]; 4] = [b"a", b"b", b"foo.txt", b"system"];

#[derive(Debug, Clone)]
enum Operation {
    Insert(usize, usize, usize),
    Lookup(usize, usize),
    Free(usize),
    FreeStale(usize),
    Destroy(usize),
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (0..VNODES, 0..VNODES, 0..NAMES.len()).prop_map(|(p, c, n)| Operation::Insert(p, c, n)),
        2 => (0..VNODES, 0..NAMES.len()).prop_map(|(p, n)| Operation::Lookup(p, n)),
        1 => (0usize..32).prop_map(Operation::Free),
        1 => (0usize..32).prop_map(Operation::FreeStale),
        1 => (0..VNODES).prop_map(Operation::Destroy),
    ]
}

struct Live {
    handle: EntryHandle,
    parent: VnodeId,
    child: VnodeId,
    name: usize,
}

fn expected(model: &[Live], parent: VnodeId, name: usize) -> Option<VnodeId> {
    model
        .iter()
        .rev()
        .find(|l| l.parent == parent && l.name == name)
        .map(|l| l.child)
}

proptest! {
    /// Operações arbitrárias mantêm as invariantes e concordam com o modelo.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_arbitrary_ops_maintain_invariants(
        ops in prop::collection::vec(operation_strategy(), 0..150)
    ) {
        let (mut table, ids) = table_with_dirs(VNODES);
        let mut cache = PathCache::<4>::init().unwrap();
        let mut model: Vec<Live> = Vec::new();
        let mut dead: Vec<EntryHandle> = Vec::new();

        for op in ops {
            match op {
                Operation::Insert(p, c, n) => {
                    let handle = cache.insert(&mut table, ids[p], ids[c], NAMES[n]).unwrap();
                    model.push(Live { handle, parent: ids[p], child: ids[c], name: n });
                }
                Operation::Lookup(p, n) => {
                    prop_assert_eq!(cache.lookup(ids[p], NAMES[n]), expected(&model, ids[p], n));
                }
                Operation::Free(k) => {
                    if !model.is_empty() {
                        let live = model.remove(k % model.len());
                        prop_assert!(cache.free(&mut table, live.handle).is_ok());
                        dead.push(live.handle);
                    }
                }
                Operation::FreeStale(k) => {
                    if !dead.is_empty() {
                        let handle = dead[k % dead.len()];
                        prop_assert_eq!(cache.free(&mut table, handle), Err(PathCacheError::StaleEntry));
                    }
                }
                Operation::Destroy(v) => {
                    let id = ids[v];
                    let before = model.len();
                    model.retain(|l| {
                        let hit = l.parent == id || l.child == id;
                        if hit {
                            dead.push(l.handle);
                        }
                        !hit
                    });
                    prop_assert_eq!(cache.notify_destroyed(&mut table, id), before - model.len());
                    prop_assert!(cache.entries().all(|r| r.parent != id && r.child != id));
                }
            }

            cache.debug_validate_invariants(&table, &ids);
            prop_assert_eq!(cache.len(), model.len());
        }

        for p in 0..VNODES {
            for n in 0..NAMES.len() {
                prop_assert_eq!(cache.lookup(ids[p], NAMES[n]), expected(&model, ids[p], n));
            }
        }
    }

    /// Com pool limitado, falhas de alocação nunca deixam rastro.
    #[cfg_attr(miri, ignore)]
    #[test]
    fn prop_pool_exhaustion_is_clean(
        limit in 1usize..8,
        inserts in prop::collection::vec((0..VNODES, 0..VNODES, 0..NAMES.len()), 0..40)
    ) {
        use crate::fs::vfs::path_cache::PathCacheConfig;

        let (mut table, ids) = table_with_dirs(VNODES);
        let config = PathCacheConfig { max_entries: Some(limit) };
        let mut cache = PathCache::<2>::with_config(config).unwrap();

        for (p, c, n) in inserts {
            let before = super::snapshot(&cache, &table, &ids);
            match cache.insert(&mut table, ids[p], ids[c], NAMES[n]) {
                Ok(_) => prop_assert!(cache.len() <= limit),
                Err(e) => {
                    prop_assert_eq!(e, PathCacheError::AllocationFailure);
                    prop_assert_eq!(cache.len(), limit);
                    prop_assert_eq!(super::snapshot(&cache, &table, &ids), before);
                }
            }
            cache.debug_validate_invariants(&table, &ids);
        }
    }
}
