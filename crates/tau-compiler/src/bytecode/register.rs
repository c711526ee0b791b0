//! Machine register names.

use std::fmt;

/// A register of the target machine.
///
/// `FP`, `SP` and `RA` are machine state. `FP1`, `SP1`, `SP2`, `temp` and
/// `curr` are fixed temporaries used only inside the calling sequences and
/// never live across a statement. `zero` always reads 0. Expression values
/// live in the numbered scratch registers `r1, r2, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    /// Frame pointer.
    Fp,
    /// Stack pointer.
    Sp,
    /// Return address, written by `Call`.
    Ra,
    /// New frame base while a frame is being built; also the return slot
    /// address in `return`.
    Fp1,
    /// New stack pointer while a frame is being built.
    Sp1,
    /// Result slot address after a call.
    Sp2,
    /// Header slot address in prologue and epilogue.
    Temp,
    /// Argument slot address while pushing arguments.
    Curr,
    /// Constant zero.
    Zero,
    /// Scratch register `r<n>`, `n >= 1`.
    Scratch(u32),
}

impl Reg {
    /// Whether this is one of the numbered scratch registers.
    pub fn is_scratch(&self) -> bool {
        matches!(self, Reg::Scratch(_))
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::Fp => f.write_str("FP"),
            Reg::Sp => f.write_str("SP"),
            Reg::Ra => f.write_str("RA"),
            Reg::Fp1 => f.write_str("FP1"),
            Reg::Sp1 => f.write_str("SP1"),
            Reg::Sp2 => f.write_str("SP2"),
            Reg::Temp => f.write_str("temp"),
            Reg::Curr => f.write_str("curr"),
            Reg::Zero => f.write_str("zero"),
            Reg::Scratch(n) => write!(f, "r{n}"),
        }
    }
}
