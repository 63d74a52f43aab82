//! # Path Cache Statistics
//!
//! Contadores de tentativas e acertos de lookup (feature `hit_stats`).
//! Usados pelo relatório de caches do procfs, que lê e zera a cada leitura.

use core::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct HitStats {
    attempts: AtomicU64,
    hits: AtomicU64,
}

impl HitStats {
    pub const fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            hits: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Leitura sem zerar: (hits, attempts)
    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.attempts.load(Ordering::Relaxed),
        )
    }

    /// Lê e zera os contadores: (hits, attempts)
    pub fn reset(&self) -> (u64, u64) {
        let hits = self.hits.swap(0, Ordering::Relaxed);
        let attempts = self.attempts.swap(0, Ordering::Relaxed);
        (hits, attempts)
    }

    /// Taxa de acerto em porcentagem (0 se não houve tentativas)
    pub fn hit_rate(&self) -> u64 {
        let (hits, attempts) = self.snapshot();
        if attempts == 0 {
            0
        } else {
            (hits * 100) / attempts
        }
    }
}
