//! Hash de nome para o path cache.
//!
//! Duas passadas FNV-1a: bytes do nome, depois os bytes da identidade do
//! diretório pai. Puro e determinístico; usado só para escolher o bucket.

use crate::fs::vfs::vnode::VnodeId;
use crate::klib::hash::fnv::{fold, FNV1_32_INIT};

/// Hash de `(name, parent)`.
#[inline]
pub fn name_hash(name: &[u8], parent: VnodeId) -> u32 {
    let hash = fold(FNV1_32_INIT, name);
    fold(hash, &parent.raw().to_ne_bytes())
}

/// Índice do bucket para uma tabela de `buckets` posições (potência de dois).
#[inline]
pub fn bucket_index(name: &[u8], parent: VnodeId, buckets: usize) -> usize {
    debug_assert!(buckets.is_power_of_two());
    (name_hash(name, parent) as usize) & (buckets - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let dir = VnodeId::new(1, 1);
        assert_eq!(name_hash(b"foo.txt", dir), name_hash(b"foo.txt", dir));
        assert_eq!(
            bucket_index(b"foo.txt", dir, 256),
            bucket_index(b"foo.txt", dir, 256)
        );
    }

    #[test]
    fn test_parent_identity_changes_hash() {
        let a = VnodeId::new(1, 1);
        let b = VnodeId::new(2, 1);
        assert_ne!(name_hash(b"etc", a), name_hash(b"etc", b));
    }

    #[test]
    fn test_single_bucket_masks_to_zero() {
        assert_eq!(bucket_index(b"anything", VnodeId::new(9, 3), 1), 0);
    }
}
