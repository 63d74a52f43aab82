//! Erros do VFS

use super::path_cache::PathCacheError;
use crate::sys::Errno;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VfsError {
    /// Vnode ou componente inexistente
    NotFound,
    /// Componente intermediário não é diretório
    NotDirectory,
    /// Vnode ainda referenciado
    Busy,
    /// Componente maior que NAME_MAX
    NameTooLong,
    /// Argumento inválido
    InvalidArgument,
    /// Sem memória
    NoMemory,
}

impl VfsError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "Arquivo ou diretório não encontrado",
            Self::NotDirectory => "Não é um diretório",
            Self::Busy => "Vnode em uso",
            Self::NameTooLong => "Nome muito longo",
            Self::InvalidArgument => "Argumento inválido",
            Self::NoMemory => "Sem memória",
        }
    }

    pub fn as_errno(&self) -> Errno {
        match self {
            Self::NotFound => Errno::ENOENT,
            Self::NotDirectory => Errno::ENOTDIR,
            Self::Busy => Errno::EBUSY,
            Self::NameTooLong => Errno::ENAMETOOLONG,
            Self::InvalidArgument => Errno::EINVAL,
            Self::NoMemory => Errno::ENOMEM,
        }
    }
}

impl core::fmt::Display for VfsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<PathCacheError> for VfsError {
    fn from(err: PathCacheError) -> Self {
        match err {
            PathCacheError::AllocationFailure => Self::NoMemory,
            PathCacheError::StaleEntry => Self::NotFound,
            PathCacheError::InvalidArgument
            | PathCacheError::MalformedEntry
            | PathCacheError::InvalidConfig => Self::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_errors_map_to_errno() {
        assert_eq!(
            VfsError::from(PathCacheError::AllocationFailure).as_errno(),
            Errno::ENOMEM
        );
        assert_eq!(VfsError::from(PathCacheError::StaleEntry), VfsError::NotFound);
        assert_eq!(VfsError::Busy.as_errno().as_isize(), -16);
    }
}
