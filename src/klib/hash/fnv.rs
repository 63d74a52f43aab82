// Arquivo: klib/hash/fnv.rs
//
// Propósito: Hash FNV-1a de 32 bits.
// Hash não-criptográfico, rápido, sem alocação. Usado para indexar tabelas
// de buckets (ex: path cache do VFS).
//
// Detalhes de Implementação:
// - XOR do byte seguido de multiplicação pelo primo FNV.
// - `fold` permite encadear várias passadas sobre buffers diferentes
//   (ex: nome e depois identidade do diretório pai).

//! FNV-1a (32 bits)

/// Offset basis do FNV de 32 bits
pub const FNV1_32_INIT: u32 = 0x811C_9DC5;

/// Primo do FNV de 32 bits
pub const FNV_32_PRIME: u32 = 0x0100_0193;

/// Continua um hash FNV-1a sobre `bytes`, partindo de `hash`.
#[inline]
pub const fn fold(mut hash: u32, bytes: &[u8]) -> u32 {
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_32_PRIME);
        i += 1;
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        // Vetores de referência do FNV-1a 32
        assert_eq!(fold(FNV1_32_INIT, b""), 0x811C_9DC5);
        assert_eq!(fold(FNV1_32_INIT, b"a"), 0xE40C_292C);
        assert_eq!(fold(FNV1_32_INIT, b"foobar"), 0xBF9C_F968);
    }

    #[test]
    fn test_fold_chains_like_single_pass() {
        let split = fold(fold(FNV1_32_INIT, b"foo"), b"bar");
        assert_eq!(split, fold(FNV1_32_INIT, b"foobar"));
    }
}
