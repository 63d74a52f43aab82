//! Virtual File System
//!
//! Núcleo mínimo do VFS: tabela de vnodes, path cache e resolução de
//! caminhos componente a componente. O driver de cada filesystem entra só
//! pelo trait [`DirectoryOps`]; tudo o que ele responde fica cacheado.
//!
//! Todo o estado vive num único [`Vfs`] protegido pelo lock grosso
//! [`ROOT_VFS`]. Nenhuma estrutura interna tem lock próprio.

pub mod error;
pub mod path;
pub mod path_cache;
pub mod vnode;

pub use error::VfsError;
pub use path_cache::{PathCache, PathCacheConfig};
pub use vnode::{Vnode, VnodeFlags, VnodeId, VnodeTable, VnodeType};

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use path_cache::{EntryHandle, NAME_MAX};
use spin::Mutex;

/// Tipo Result do VFS
pub type VfsResult<T> = Result<T, VfsError>;

/// Operações de diretório fornecidas pelo driver.
pub trait DirectoryOps {
    /// Resolve `name` dentro de `dir`, alocando o vnode do filho em `vnodes`
    /// se ainda não existir.
    fn lookup(&mut self, vnodes: &mut VnodeTable, dir: VnodeId, name: &[u8]) -> VfsResult<VnodeId>;
}

/// O VFS: dono dos vnodes e do path cache.
pub struct Vfs {
    vnodes: VnodeTable,
    path_cache: PathCache,
    root: VnodeId,
}

impl Vfs {
    pub fn new() -> Self {
        Self::build(VnodeTable::new(), PathCache::new())
    }

    /// VFS com pool de entradas do cache limitado.
    pub fn with_config(config: PathCacheConfig) -> VfsResult<Self> {
        let cache = PathCache::with_config(config)?;
        Ok(Self::build(VnodeTable::new(), cache))
    }

    fn build(mut vnodes: VnodeTable, path_cache: PathCache) -> Self {
        let root = vnodes.alloc(VnodeType::Directory, VnodeFlags::empty());
        // A raiz nunca é liberada
        vnodes.hold(root);
        Self {
            vnodes,
            path_cache,
            root,
        }
    }

    pub fn root(&self) -> VnodeId {
        self.root
    }

    pub fn vnodes(&self) -> &VnodeTable {
        &self.vnodes
    }

    pub fn vnodes_mut(&mut self) -> &mut VnodeTable {
        &mut self.vnodes
    }

    pub fn path_cache(&self) -> &PathCache {
        &self.path_cache
    }

    /// Cacheia `(parent, name) -> child` diretamente.
    pub fn cache_insert(&mut self, parent: VnodeId, child: VnodeId, name: &[u8]) -> VfsResult<EntryHandle> {
        Ok(self.path_cache.insert(&mut self.vnodes, parent, child, name)?)
    }

    /// Resolve um componente: cache primeiro, driver no miss.
    ///
    /// O resultado do driver é cacheado; falha ao cachear é ignorada.
    pub fn lookup_component<D: DirectoryOps + ?Sized>(
        &mut self,
        ops: &mut D,
        dir: VnodeId,
        name: &[u8],
    ) -> VfsResult<VnodeId> {
        let vnode = self.vnodes.get(dir).ok_or(VfsError::NotFound)?;
        if !vnode.is_dir() {
            return Err(VfsError::NotDirectory);
        }
        if name.is_empty() {
            return Err(VfsError::InvalidArgument);
        }
        if name.len() > NAME_MAX {
            return Err(VfsError::NameTooLong);
        }
        if name == b"." {
            return Ok(dir);
        }

        if let Some(child) = self.path_cache.lookup(dir, name) {
            return Ok(child);
        }

        let child = ops.lookup(&mut self.vnodes, dir, name)?;
        if let Err(e) = self.path_cache.insert(&mut self.vnodes, dir, child, name) {
            crate::kdebug!("(VFS) lookup: resultado não cacheado, errno=", e.as_errno().as_usize());
        }
        Ok(child)
    }

    /// Resolve um caminho. Caminhos absolutos partem da raiz, relativos de `start`.
    pub fn lookup_path<D: DirectoryOps + ?Sized>(
        &mut self,
        ops: &mut D,
        start: VnodeId,
        path: &str,
    ) -> VfsResult<VnodeId> {
        let mut current = if path::is_absolute(path) {
            self.root
        } else {
            start
        };
        if !self.vnodes.contains(current) {
            return Err(VfsError::NotFound);
        }

        for component in path::PathComponents::new(path) {
            if component == "." {
                continue;
            }
            current = self.lookup_component(ops, current, component.as_bytes())?;
        }
        Ok(current)
    }

    /// Cria um vnode virtual (sem backing no driver) sob `(parent, name)`.
    ///
    /// Se o nome já está cacheado devolve o vnode existente. Se o cache não
    /// aceitar a entrada, o vnode novo é liberado e o erro devolvido.
    pub fn alloc_dummy(&mut self, parent: VnodeId, name: &[u8], vtype: VnodeType) -> VfsResult<VnodeId> {
        let dir = self.vnodes.get(parent).ok_or(VfsError::NotFound)?;
        if !dir.is_dir() {
            return Err(VfsError::NotDirectory);
        }
        if name.len() > NAME_MAX {
            return Err(VfsError::NameTooLong);
        }
        if let Some(existing) = self.path_cache.lookup(parent, name) {
            return Ok(existing);
        }

        let child = self.vnodes.alloc(vtype, VnodeFlags::VIRTUAL);
        if let Err(e) = self.path_cache.insert(&mut self.vnodes, parent, child, name) {
            self.vnodes.release(child);
            crate::kwarn!("(VFS) alloc_dummy: entrada recusada pelo cache");
            return Err(e.into());
        }
        crate::ktrace!("(VFS) alloc_dummy: vnode=", child.raw());
        Ok(child)
    }

    /// Libera um vnode, varrendo antes o path cache.
    ///
    /// Retorna quantas entradas do cache foram removidas.
    pub fn free_vnode(&mut self, id: VnodeId) -> VfsResult<usize> {
        let vnode = self.vnodes.get(id).ok_or(VfsError::NotFound)?;
        if vnode.use_count > 0 {
            crate::kdebug!("(VFS) free_vnode: vnode em uso=", id.raw());
            return Err(VfsError::Busy);
        }

        let swept = self.path_cache.notify_destroyed(&mut self.vnodes, id);
        self.vnodes.release(id);
        Ok(swept)
    }

    /// Remove a entrada que `lookup(parent, name)` encontraria, se existir.
    /// Com chave duplicada, a entrada anterior volta a ser a visível.
    pub fn invalidate(&mut self, parent: VnodeId, name: &[u8]) -> bool {
        match self.path_cache.find_child(parent, name) {
            Some(handle) => self.path_cache.free(&mut self.vnodes, handle).is_ok(),
            None => false,
        }
    }

    /// Filhos cacheados de `dir`: (nome, vnode).
    pub fn readdir_cached(&self, dir: VnodeId) -> impl Iterator<Item = (&[u8], VnodeId)> + '_ {
        self.path_cache
            .children_of(&self.vnodes, dir)
            .map(|(_, entry)| (entry.name(), entry.child()))
    }

    /// Algum vnode da subárvore cacheada (incluindo `id`) está em uso?
    pub fn subtree_in_use(&self, id: VnodeId) -> bool {
        self.collect_subtree(id)
            .iter()
            .any(|v| self.vnodes.get(*v).map_or(false, |vn| vn.use_count > 0))
    }

    /// Libera `id` e todos os vnodes cacheados abaixo dele, folhas primeiro.
    ///
    /// Recusa com `Busy` se qualquer um estiver em uso; nesse caso nada é
    /// liberado. Retorna quantos vnodes foram liberados.
    pub fn free_subtree(&mut self, id: VnodeId) -> VfsResult<usize> {
        if !self.vnodes.contains(id) {
            return Err(VfsError::NotFound);
        }
        if self.subtree_in_use(id) {
            return Err(VfsError::Busy);
        }

        let order = self.collect_subtree(id);
        let mut freed = 0;
        for vnode in order.into_iter().rev() {
            self.free_vnode(vnode)?;
            freed += 1;
        }
        crate::kdebug!("(VFS) free_subtree: vnodes liberados=", freed);
        Ok(freed)
    }

    /// Vnodes alcançáveis a partir de `id` pelas listas de filhos, em pré-ordem.
    /// O conjunto de visitados corta ciclos (ex: entradas "..").
    fn collect_subtree(&self, id: VnodeId) -> Vec<VnodeId> {
        let mut visited = BTreeSet::new();
        let mut order = Vec::new();
        let mut stack = Vec::new();

        if self.vnodes.contains(id) {
            stack.push(id);
        }
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            order.push(current);
            for (_, entry) in self.path_cache.children_of(&self.vnodes, current) {
                if !visited.contains(&entry.child()) {
                    stack.push(entry.child());
                }
            }
        }
        order
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// INSTÂNCIA GLOBAL
// =============================================================================

/// VFS global, sob o lock grosso.
pub static ROOT_VFS: Mutex<Option<Vfs>> = Mutex::new(None);

/// Inicializa o VFS global. Chamadas repetidas não recriam o estado.
pub fn init() {
    let mut vfs = ROOT_VFS.lock();
    if vfs.is_some() {
        crate::kwarn!("(VFS) init chamado duas vezes");
        return;
    }
    *vfs = Some(Vfs::new());
    crate::kinfo!("(VFS) Inicializado");
}

/// Executa `f` sob o lock do VFS. `None` se o VFS não foi inicializado.
pub fn with_vfs<R>(f: impl FnOnce(&mut Vfs) -> R) -> Option<R> {
    ROOT_VFS.lock().as_mut().map(f)
}
