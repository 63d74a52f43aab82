// =============================================================================
// SERIAL DRIVER - ZERO OVERHEAD
// =============================================================================
//
// Saída de log do kernel (COM1 em bare-metal, sink instalável no host).
//
// ARQUITETURA:
// - SEM core::fmt - Evita geração de código SSE/AVX
// - SEM alocação - Apenas strings literais e valores imediatos
// - Em x86_64 bare-metal (target_os = "none") escreve direto na COM1 (0x3F8)
// - Em alvos hospedados (testes no host) repassa para um sink instalado com
//   `set_sink`. Sem sink, a saída é descartada.
//
// FUNÇÕES DISPONÍVEIS:
// - emit_str(s)      : Envia string
// - emit_hex(v)      : Envia u64 em hexadecimal
// - emit_nl()        : Envia newline (\r\n)
//
// NOTA IMPORTANTE:
// Este driver NÃO garante exclusão mútua entre CPUs. Em ambiente SMP,
// os logs podem se intercalar. Isso é aceitável para debugging.
//
// =============================================================================

/// Assinatura do sink de log em alvos hospedados.
pub type LogSink = fn(&str);

static SINK: spin::Mutex<Option<LogSink>> = spin::Mutex::new(None);

/// Instala (ou remove, com `None`) o sink de saída.
///
/// Em bare-metal o sink também recebe cópia da saída, útil para capturar
/// logs em buffers de diagnóstico.
pub fn set_sink(sink: Option<LogSink>) {
    *SINK.lock() = sink;
}

#[inline(always)]
fn write(s: &str) {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    for &byte in s.as_bytes() {
        com1::emit(byte);
    }

    // Cópia do ponteiro para não chamar o sink com o lock preso
    let sink = *SINK.lock();
    if let Some(sink) = sink {
        sink(s);
    }
}

// =============================================================================
// FUNÇÕES DE ESCRITA
// =============================================================================

/// Envia uma string para a saída de log.
#[inline(never)]
pub fn emit_str(s: &str) {
    write(s);
}

/// Envia uma nova linha (CRLF).
#[inline(never)]
pub fn emit_nl() {
    write("\r\n");
}

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
#[inline(never)]
pub fn emit_hex(value: u64) {
    let mut buf = [0u8; 18];
    buf[0] = b'0';
    buf[1] = b'x';
    for i in 0..16 {
        let nibble = ((value >> (60 - i * 4)) & 0xF) as u8;
        buf[2 + i] = if nibble < 10 {
            b'0' + nibble
        } else {
            b'A' + (nibble - 10)
        };
    }
    // SAFETY: buffer contém apenas dígitos hexadecimais ASCII
    write(unsafe { core::str::from_utf8_unchecked(&buf) });
}

// =============================================================================
// COM1 (UART 16550) - APENAS BARE-METAL
// =============================================================================

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
mod com1 {
    // Porta de dados da COM1
    const COM1_DATA: u16 = 0x3F8;

    // Porta de status da COM1 (Line Status Register)
    const COM1_STATUS: u16 = 0x3FD;

    /// Envia um único byte para a porta serial.
    ///
    /// Espera pelo buffer de transmissão estar livre (busy wait).
    #[inline(always)]
    pub fn emit(byte: u8) {
        unsafe {
            // Espera o buffer de transmissão estar vazio (bit 5 do LSR)
            loop {
                let status: u8;
                core::arch::asm!(
                    "in al, dx",
                    out("al") status,
                    in("dx") COM1_STATUS,
                    options(nostack, nomem, preserves_flags)
                );
                if (status & 0x20) != 0 {
                    break;
                }
            }

            core::arch::asm!(
                "out dx, al",
                in("al") byte,
                in("dx") COM1_DATA,
                options(nostack, nomem, preserves_flags)
            );
        }
    }
}
