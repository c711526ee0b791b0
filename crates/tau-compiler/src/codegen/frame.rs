//! Frame setup and teardown.
//!
//! The caller has already reserved the argument and return slots below its
//! `SP` and executed `Call`, so `RA` holds the return address. The callee's
//! frame starts at the caller's `SP`.

use super::CodeGenerator;
use crate::bytecode::{Instruction, Reg};

/// Header slot holding the caller's frame pointer.
const SAVED_FP: i64 = 1;
/// Header slot holding the caller's stack pointer.
const SAVED_SP: i64 = 2;

impl CodeGenerator {
    /// Install a frame of `size` words and save the caller's `FP`, `SP` and
    /// `RA` in its header.
    pub(super) fn prologue(&mut self, size: i64) {
        self.emit(Instruction::Move(Reg::Fp1, Reg::Sp));
        self.emit(Instruction::AddImmediate(Reg::Sp1, Reg::Fp1, size));
        self.emit(Instruction::AddImmediate(Reg::Temp, Reg::Fp1, SAVED_FP));
        self.emit(Instruction::Store(Reg::Temp, Reg::Fp));
        self.emit(Instruction::AddImmediate(Reg::Temp, Reg::Fp1, SAVED_SP));
        self.emit(Instruction::Store(Reg::Temp, Reg::Sp));
        self.emit(Instruction::Store(Reg::Fp1, Reg::Ra));
        self.emit(Instruction::Move(Reg::Fp, Reg::Fp1));
        self.emit(Instruction::Move(Reg::Sp, Reg::Sp1));
        self.emit(Instruction::AddImmediate(Reg::Sp, Reg::Sp, 1));
    }

    /// Save `r1..=r<pool>` above the frame so calls made by this function
    /// leave its caller's scratch registers intact.
    pub(super) fn spill(&mut self, size: i64, pool: u32) {
        for i in 1..=pool {
            self.frame_address(Reg::Temp, size + i as i64);
            self.emit(Instruction::Store(Reg::Temp, Reg::Scratch(i)));
        }
        if pool > 0 {
            self.emit(Instruction::AddImmediate(Reg::Sp, Reg::Sp, pool as i64));
        }
    }

    pub(super) fn reload(&mut self, size: i64, pool: u32) {
        for i in 1..=pool {
            self.frame_address(Reg::Temp, size + i as i64);
            self.emit(Instruction::Load(Reg::Scratch(i), Reg::Temp));
        }
    }

    /// Restore the caller's `RA`, `SP` and `FP` and return to it.
    pub(super) fn epilogue(&mut self) {
        self.emit(Instruction::Load(Reg::Ra, Reg::Fp));
        self.frame_address(Reg::Temp, SAVED_SP);
        self.emit(Instruction::Load(Reg::Sp, Reg::Temp));
        self.frame_address(Reg::Temp, SAVED_FP);
        self.emit(Instruction::Load(Reg::Fp, Reg::Temp));
        self.emit(Instruction::JumpIndirect(Reg::Ra));
    }
}
