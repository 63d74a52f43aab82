//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno do Kernel.
//! Funciona como uma extensão da `core` library.

pub mod hash;

#[cfg(any(test, feature = "self_test"))]
pub mod test_framework;
