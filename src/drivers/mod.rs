//! # Driver Layer
//!
//! Só o driver serial sobrevive aqui: é a saída de todo o logging.
//! Em bare-metal escreve na COM1; em host os bytes vão para um sink
//! instalável (usado pelos testes).

pub mod serial;
