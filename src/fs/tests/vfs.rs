//! Testes para VFS (Virtual Filesystem)

#![cfg(test)]

use crate::fs::vfs::path_cache::{PathCacheConfig, NAME_MAX};
use crate::fs::vfs::{
    with_vfs, DirectoryOps, Vfs, VfsError, VfsResult, VnodeFlags, VnodeId, VnodeTable, VnodeType,
};
use alloc::vec::Vec;

/// Driver de teste: árvore fixa descrita por (pai, nome, filho) e contador
/// de chamadas para distinguir hit de miss.
struct FakeDriver {
    tree: Vec<(VnodeId, &'static str, VnodeId)>,
    calls: usize,
}

impl DirectoryOps for FakeDriver {
    fn lookup(&mut self, _vnodes: &mut VnodeTable, dir: VnodeId, name: &[u8]) -> VfsResult<VnodeId> {
        self.calls += 1;
        self.tree
            .iter()
            .find(|(p, n, _)| *p == dir && n.as_bytes() == name)
            .map(|(_, _, c)| *c)
            .ok_or(VfsError::NotFound)
    }
}

/// /system/core/init
fn build() -> (Vfs, FakeDriver, [VnodeId; 3]) {
    let mut vfs = Vfs::new();
    let root = vfs.root();
    let system = vfs.vnodes_mut().alloc(VnodeType::Directory, VnodeFlags::empty());
    let core = vfs.vnodes_mut().alloc(VnodeType::Directory, VnodeFlags::empty());
    let init = vfs.vnodes_mut().alloc(VnodeType::Regular, VnodeFlags::empty());
    let driver = FakeDriver {
        tree: alloc::vec![
            (root, "system", system),
            (system, "core", core),
            (core, "init", init),
        ],
        calls: 0,
    };
    (vfs, driver, [system, core, init])
}

#[test]
fn test_lookup_path_fills_cache() {
    let (mut vfs, mut driver, [system, core, init]) = build();
    let root = vfs.root();

    assert_eq!(vfs.lookup_path(&mut driver, root, "/system/core/init"), Ok(init));
    assert_eq!(driver.calls, 3);
    assert_eq!(vfs.path_cache().lookup(root, b"system"), Some(system));
    assert_eq!(vfs.path_cache().lookup(system, b"core"), Some(core));

    // Segunda travessia vem toda do cache
    assert_eq!(vfs.lookup_path(&mut driver, root, "//system/./core//init/"), Ok(init));
    assert_eq!(driver.calls, 3);

    // Caminho relativo
    assert_eq!(vfs.lookup_path(&mut driver, system, "core/init"), Ok(init));
    assert_eq!(vfs.lookup_path(&mut driver, root, "/"), Ok(root));
}

#[test]
fn test_lookup_errors() {
    let (mut vfs, mut driver, [_, _, init]) = build();
    let root = vfs.root();

    assert_eq!(
        vfs.lookup_path(&mut driver, root, "/system/missing"),
        Err(VfsError::NotFound)
    );
    assert_eq!(
        vfs.lookup_path(&mut driver, root, "/system/core/init/x"),
        Err(VfsError::NotDirectory)
    );
    let long = [b'x'; NAME_MAX + 1];
    assert_eq!(
        vfs.lookup_component(&mut driver, root, &long),
        Err(VfsError::NameTooLong)
    );
    assert_eq!(
        vfs.lookup_component(&mut driver, init, b"a"),
        Err(VfsError::NotDirectory)
    );
    // Miss não é cacheado
    assert_eq!(vfs.path_cache().lookup(root, b"missing"), None);
}

#[test]
fn test_cache_failure_does_not_fail_lookup() {
    let mut vfs = Vfs::with_config(PathCacheConfig {
        max_entries: Some(1),
    })
    .unwrap();
    let root = vfs.root();
    let a = vfs.vnodes_mut().alloc(VnodeType::Directory, VnodeFlags::empty());
    let b = vfs.vnodes_mut().alloc(VnodeType::Regular, VnodeFlags::empty());
    let mut driver = FakeDriver {
        tree: alloc::vec![(root, "a", a), (a, "b", b)],
        calls: 0,
    };

    assert_eq!(vfs.lookup_path(&mut driver, root, "/a/b"), Ok(b));
    assert_eq!(vfs.path_cache().len(), 1);
    assert_eq!(vfs.path_cache().lookup(a, b"b"), None);
}

#[test]
fn test_free_vnode_sweeps_cache() {
    let (mut vfs, mut driver, [system, core, _]) = build();
    let root = vfs.root();
    vfs.lookup_path(&mut driver, root, "/system/core/init").unwrap();

    // `core` é filho de `system` e pai de `init`
    assert_eq!(vfs.free_vnode(core), Ok(2));
    assert!(!vfs.vnodes().contains(core));
    assert_eq!(vfs.path_cache().lookup(system, b"core"), None);
    assert_eq!(vfs.path_cache().len(), 1);

    let ids: Vec<VnodeId> = vfs.vnodes().ids().collect();
    vfs.path_cache().debug_validate_invariants(vfs.vnodes(), &ids);

    assert_eq!(vfs.free_vnode(core), Err(VfsError::NotFound));
}

#[test]
fn test_busy_vnode_is_not_freed() {
    let (mut vfs, mut driver, [system, _, _]) = build();
    let root = vfs.root();
    vfs.lookup_path(&mut driver, root, "/system").unwrap();

    vfs.vnodes_mut().hold(system);
    assert_eq!(vfs.free_vnode(system), Err(VfsError::Busy));
    assert_eq!(vfs.path_cache().lookup(root, b"system"), Some(system));

    vfs.vnodes_mut().drop_ref(system);
    assert_eq!(vfs.free_vnode(system), Ok(1));
    assert_eq!(vfs.free_vnode(root), Err(VfsError::Busy));
}

#[test]
fn test_alloc_dummy() {
    let mut vfs = Vfs::new();
    let root = vfs.root();

    let dev = vfs.alloc_dummy(root, b"dev", VnodeType::Directory).unwrap();
    assert!(vfs.vnodes().get(dev).unwrap().flags.contains(VnodeFlags::VIRTUAL));
    assert_eq!(vfs.path_cache().lookup(root, b"dev"), Some(dev));

    // Mesmo nome devolve o mesmo vnode
    assert_eq!(vfs.alloc_dummy(root, b"dev", VnodeType::Directory), Ok(dev));

    let null = vfs.alloc_dummy(dev, b"null", VnodeType::CharDevice).unwrap();
    assert_eq!(
        vfs.alloc_dummy(null, b"x", VnodeType::Regular),
        Err(VfsError::NotDirectory)
    );
    assert_eq!(vfs.vnodes().len(), 3);
}

#[test]
fn test_alloc_dummy_rolls_back_on_cache_failure() {
    let mut vfs = Vfs::with_config(PathCacheConfig {
        max_entries: Some(1),
    })
    .unwrap();
    let root = vfs.root();

    vfs.alloc_dummy(root, b"proc", VnodeType::Directory).unwrap();
    let before = vfs.vnodes().len();
    assert_eq!(
        vfs.alloc_dummy(root, b"sys", VnodeType::Directory),
        Err(VfsError::NoMemory)
    );
    assert_eq!(vfs.vnodes().len(), before);
    assert_eq!(
        vfs.alloc_dummy(root, b"", VnodeType::Directory),
        Err(VfsError::InvalidArgument)
    );
    assert_eq!(vfs.vnodes().len(), before);
}

#[test]
fn test_readdir_and_invalidate() {
    let mut vfs = Vfs::new();
    let root = vfs.root();
    let a = vfs.alloc_dummy(root, b"a", VnodeType::Regular).unwrap();
    let b = vfs.alloc_dummy(root, b"b", VnodeType::Regular).unwrap();

    let mut listing: Vec<(Vec<u8>, VnodeId)> = vfs
        .readdir_cached(root)
        .map(|(name, id)| (name.to_vec(), id))
        .collect();
    listing.sort();
    assert_eq!(listing, [(b"a".to_vec(), a), (b"b".to_vec(), b)]);

    assert!(vfs.invalidate(root, b"a"));
    assert!(!vfs.invalidate(root, b"a"));
    assert_eq!(vfs.readdir_cached(root).count(), 1);
    // O vnode continua vivo; só o fato cacheado sumiu
    assert!(vfs.vnodes().contains(a));
}

#[test]
fn test_invalidate_removes_visible_duplicate() {
    let mut vfs = Vfs::new();
    let root = vfs.root();
    let old = vfs.vnodes_mut().alloc(VnodeType::Regular, VnodeFlags::empty());
    let new = vfs.vnodes_mut().alloc(VnodeType::Regular, VnodeFlags::empty());

    vfs.cache_insert(root, old, b"dup").unwrap();
    vfs.cache_insert(root, new, b"dup").unwrap();
    assert_eq!(vfs.path_cache().lookup(root, b"dup"), Some(new));

    assert!(vfs.invalidate(root, b"dup"));
    assert_eq!(vfs.path_cache().lookup(root, b"dup"), Some(old));
    assert!(vfs.vnodes().get(new).unwrap().anchors().is_empty());

    assert!(vfs.invalidate(root, b"dup"));
    assert_eq!(vfs.path_cache().lookup(root, b"dup"), None);
    assert!(!vfs.invalidate(root, b"dup"));
}

#[test]
fn test_free_subtree() {
    let mut vfs = Vfs::new();
    let root = vfs.root();
    let usr = vfs.alloc_dummy(root, b"usr", VnodeType::Directory).unwrap();
    let lib = vfs.alloc_dummy(usr, b"lib", VnodeType::Directory).unwrap();
    let so = vfs.alloc_dummy(lib, b"libc.so", VnodeType::Regular).unwrap();
    // Ciclo: ".." aponta de volta
    vfs.cache_insert(lib, usr, b"..").unwrap();

    vfs.vnodes_mut().hold(so);
    assert!(vfs.subtree_in_use(usr));
    assert_eq!(vfs.free_subtree(usr), Err(VfsError::Busy));
    assert!(vfs.vnodes().contains(lib));

    vfs.vnodes_mut().drop_ref(so);
    assert!(!vfs.subtree_in_use(usr));
    assert_eq!(vfs.free_subtree(usr), Ok(3));
    assert_eq!(vfs.vnodes().len(), 1);
    assert!(vfs.path_cache().is_empty());
    assert_eq!(vfs.free_subtree(usr), Err(VfsError::NotFound));
}

#[test]
fn test_global_instance() {
    crate::fs::init();
    let root = with_vfs(|vfs| vfs.root()).unwrap();
    let dev = with_vfs(|vfs| vfs.alloc_dummy(root, b"dev-global", VnodeType::Directory))
        .unwrap()
        .unwrap();

    // Segunda chamada não recria o estado
    crate::fs::vfs::init();
    assert_eq!(
        with_vfs(|vfs| vfs.path_cache().lookup(root, b"dev-global")),
        Some(Some(dev))
    );
}
