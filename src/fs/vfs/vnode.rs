//! # Vnode Table
//!
//! Tabela mínima de vnodes: identidade, tipo, contagem de uso e as âncoras
//! que o path cache usa. Não é o sistema de inodes completo; serve de dono
//! das âncoras e de ponto único de destruição (`Vfs::free_vnode`).
//!
//! Ids são índice + generation, como os handles de processo: depois que um
//! vnode é liberado o id antigo nunca mais resolve, mesmo com o slot reusado.

use super::path_cache::{AnchorTable, CacheAnchors};
use alloc::vec::Vec;
use bitflags::bitflags;

/// Identidade opaca de um vnode: generation nos 32 bits altos, índice nos baixos
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VnodeId(u64);

impl VnodeId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    pub const fn index(&self) -> u32 {
        self.0 as u32
    }

    pub const fn generation(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Valor bruto (usado como identidade no hash do path cache)
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Tipo de vnode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VnodeType {
    Regular,
    Directory,
    CharDevice,
}

bitflags! {
    /// Flags de estado do vnode
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct VnodeFlags: u32 {
        /// Criado pelo VFS sem backing no driver (ex: entrada dummy)
        const VIRTUAL = 1 << 0;
    }
}

/// Vnode
#[derive(Debug)]
pub struct Vnode {
    pub id: VnodeId,
    pub vtype: VnodeType,
    pub flags: VnodeFlags,
    /// Referências ativas (arquivos abertos, cwd, ...). Vnode em uso não é liberado.
    pub use_count: u32,
    anchors: CacheAnchors,
}

impl Vnode {
    pub fn is_dir(&self) -> bool {
        self.vtype == VnodeType::Directory
    }

    pub fn anchors(&self) -> &CacheAnchors {
        &self.anchors
    }
}

struct VnodeSlot {
    generation: u32,
    vnode: Option<Vnode>,
}

/// Tabela de vnodes
#[derive(Default)]
pub struct VnodeTable {
    slots: Vec<VnodeSlot>,
    free: Vec<u32>,
    active: usize,
}

impl VnodeTable {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            active: 0,
        }
    }

    /// Aloca um vnode novo.
    pub fn alloc(&mut self, vtype: VnodeType, flags: VnodeFlags) -> VnodeId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(VnodeSlot {
                    generation: 0,
                    vnode: None,
                });
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation == 0 {
            slot.generation = 1;
        }
        let id = VnodeId::new(index, slot.generation);
        slot.vnode = Some(Vnode {
            id,
            vtype,
            flags,
            use_count: 0,
            anchors: CacheAnchors::new(),
        });
        self.active += 1;

        crate::ktrace!("(Vnode) alloc id=", id.raw());
        id
    }

    /// Obtém vnode por id (validando generation)
    pub fn get(&self, id: VnodeId) -> Option<&Vnode> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.vnode.as_ref()
    }

    pub fn get_mut(&mut self, id: VnodeId) -> Option<&mut Vnode> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.vnode.as_mut()
    }

    pub fn contains(&self, id: VnodeId) -> bool {
        self.get(id).is_some()
    }

    /// Incrementa a contagem de uso. Retorna `false` se o vnode não existe.
    pub fn hold(&mut self, id: VnodeId) -> bool {
        match self.get_mut(id) {
            Some(vnode) => {
                vnode.use_count += 1;
                true
            }
            None => false,
        }
    }

    /// Decrementa a contagem de uso.
    pub fn drop_ref(&mut self, id: VnodeId) -> bool {
        match self.get_mut(id) {
            Some(vnode) if vnode.use_count > 0 => {
                vnode.use_count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Devolve o slot. Só `Vfs::free_vnode` chama, depois da varredura do
    /// path cache.
    pub(super) fn release(&mut self, id: VnodeId) -> Option<Vnode> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        let vnode = slot.vnode.take()?;
        self.free.push(id.index());
        self.active -= 1;
        Some(vnode)
    }

    /// Número de vnodes vivos
    pub fn len(&self) -> usize {
        self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Ids de todos os vnodes vivos
    pub fn ids(&self) -> impl Iterator<Item = VnodeId> + '_ {
        self.slots.iter().filter_map(|slot| slot.vnode.as_ref().map(|v| v.id))
    }
}

impl AnchorTable for VnodeTable {
    fn anchors(&self, id: VnodeId) -> Option<&CacheAnchors> {
        self.get(id).map(|v| &v.anchors)
    }

    fn anchors_mut(&mut self, id: VnodeId) -> Option<&mut CacheAnchors> {
        self.get_mut(id).map(|v| &mut v.anchors)
    }
}
