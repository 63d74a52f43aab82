//! # Standard Error Codes (Errno)
//!
//! Códigos de erro retornados pelo VFS aos chamadores.
//! Baseado no padrão POSIX para compatibilidade com ferramentas existentes.
//!
//! Valores negativos são usados em retornos de syscalls (isize).

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    Success = 0,
    ENOENT = 2,        // No such file or directory
    EBADF = 9,         // Bad file number
    ENOMEM = 12,       // Out of memory
    EBUSY = 16,        // Device or resource busy
    ENOTDIR = 20,      // Not a directory
    EINVAL = 22,       // Invalid argument
    ENAMETOOLONG = 36, // File name too long
}

impl Errno {
    pub fn as_usize(self) -> usize {
        self as usize
    }

    pub fn as_isize(self) -> isize {
        -(self as i32) as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_return_convention() {
        assert_eq!(Errno::ENOENT.as_isize(), -2);
        assert_eq!(Errno::EINVAL.as_usize(), 22);
        assert_eq!(Errno::Success.as_isize(), 0);
    }
}
