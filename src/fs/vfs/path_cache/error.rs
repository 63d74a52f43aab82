//! Tipos de Erro do Path Cache
//!
//! Um miss em `lookup` não é erro (retorna `None`); estes são os únicos
//! resultados de falha que o cache devolve ao chamador.

use crate::sys::Errno;

/// Erros do path cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCacheError {
    /// Nome vazio, maior que NAME_MAX, ou vnode pai/filho inexistente
    InvalidArgument,
    /// Sem memória (ou pool de entradas esgotado) para uma nova entrada
    AllocationFailure,
    /// Handle nulo ou fora da tabela (erro de programação do chamador)
    MalformedEntry,
    /// Handle de uma entrada que já foi liberada
    StaleEntry,
    /// Número de buckets não é potência de dois
    InvalidConfig,
}

impl PathCacheError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "Argumento inválido (nome ou vnode)",
            Self::AllocationFailure => "Sem memória para entrada do path cache",
            Self::MalformedEntry => "Handle de entrada malformado",
            Self::StaleEntry => "Entrada já liberada",
            Self::InvalidConfig => "Número de buckets não é potência de dois",
        }
    }

    /// Código POSIX equivalente, para retorno ao userspace
    pub fn as_errno(&self) -> Errno {
        match self {
            Self::InvalidArgument | Self::InvalidConfig => Errno::EINVAL,
            Self::AllocationFailure => Errno::ENOMEM,
            Self::MalformedEntry => Errno::EBADF,
            Self::StaleEntry => Errno::ENOENT,
        }
    }
}

impl core::fmt::Display for PathCacheError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tipo Result específico do path cache
pub type PathCacheResult<T> = Result<T, PathCacheError>;
