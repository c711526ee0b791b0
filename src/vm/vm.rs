use log::{debug, trace};
use rustc_hash::FxHashMap;
use tau_compiler::{Instruction, Reg};
use tau_core::RuntimeError;

use super::{Execution, Memory, VmConfig};

/// Named register file. `zero` is not stored: it always reads 0.
#[derive(Debug, Default, Clone)]
struct Registers {
    fp: i64,
    sp: i64,
    ra: i64,
    fp1: i64,
    sp1: i64,
    sp2: i64,
    temp: i64,
    curr: i64,
    scratch: Vec<i64>,
}

impl Registers {
    fn get(&self, reg: Reg) -> i64 {
        match reg {
            Reg::Fp => self.fp,
            Reg::Sp => self.sp,
            Reg::Ra => self.ra,
            Reg::Fp1 => self.fp1,
            Reg::Sp1 => self.sp1,
            Reg::Sp2 => self.sp2,
            Reg::Temp => self.temp,
            Reg::Curr => self.curr,
            Reg::Zero => 0,
            Reg::Scratch(n) => self.scratch.get(n as usize).copied().unwrap_or(0),
        }
    }

    fn set(&mut self, reg: Reg, value: i64) {
        match reg {
            Reg::Fp => self.fp = value,
            Reg::Sp => self.sp = value,
            Reg::Ra => self.ra = value,
            Reg::Fp1 => self.fp1 = value,
            Reg::Sp1 => self.sp1 = value,
            Reg::Sp2 => self.sp2 = value,
            Reg::Temp => self.temp = value,
            Reg::Curr => self.curr = value,
            Reg::Zero => {}
            Reg::Scratch(n) => {
                let index = n as usize;
                if index >= self.scratch.len() {
                    self.scratch.resize(index + 1, 0);
                }
                self.scratch[index] = value;
            }
        }
    }
}

/// Executes one instruction sequence.
pub struct Vm<'code> {
    code: &'code [Instruction],
    labels: FxHashMap<&'code str, usize>,
    registers: Registers,
    memory: Memory,
    pc: usize,
    output: Vec<i64>,
    steps: u64,
    halted: bool,
    step_limit: Option<u64>,
}

impl<'code> Vm<'code> {
    /// Load `code`, resolving every label it defines and checking every
    /// label it refers to.
    pub fn new(code: &'code [Instruction], config: VmConfig) -> Result<Self, RuntimeError> {
        let mut labels = FxHashMap::default();
        for (index, instruction) in code.iter().enumerate() {
            if let Instruction::Label(name) = instruction
                && labels.insert(name.as_str(), index).is_some()
            {
                return Err(RuntimeError::DuplicateLabel(name.clone()));
            }
        }
        if let Some(target) = code
            .iter()
            .filter_map(Instruction::target)
            .find(|target| !labels.contains_key(target))
        {
            return Err(RuntimeError::UnknownLabel(target.to_string()));
        }
        debug!(
            "loaded {} instruction(s), {} label(s)",
            code.len(),
            labels.len()
        );

        let registers = Registers {
            fp: config.stack_base,
            sp: config.stack_base,
            ..Registers::default()
        };
        Ok(Self {
            code,
            labels,
            registers,
            memory: Memory::new(config.memory_size),
            pc: 0,
            output: Vec::new(),
            steps: 0,
            halted: false,
            step_limit: config.step_limit,
        })
    }

    /// Run until `Halt`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while !self.halted {
            self.step()?;
        }
        debug!(
            "halted after {} step(s), {} value(s) printed",
            self.steps,
            self.output.len()
        );
        Ok(())
    }

    /// Execute one instruction. Does nothing once halted.
    pub fn step(&mut self) -> Result<(), RuntimeError> {
        if self.halted {
            return Ok(());
        }
        if let Some(limit) = self.step_limit
            && self.steps >= limit
        {
            return Err(RuntimeError::StepLimitExceeded { limit });
        }
        let code = self.code;
        let instruction = code.get(self.pc).ok_or(RuntimeError::MissingHalt)?;
        trace!("{:>6}  {}", self.pc, instruction);
        self.steps += 1;

        let mut next = self.pc + 1;
        match instruction {
            Instruction::Label(_) => {}
            Instruction::Jump(label) => next = self.resolve(label)?,
            Instruction::JumpIndirect(reg) => {
                let target = self.get(*reg);
                next = usize::try_from(target)
                    .ok()
                    .filter(|&index| index < self.code.len())
                    .ok_or(RuntimeError::BadJumpTarget { target })?;
            }
            Instruction::JumpIfZero(reg, label) => {
                if self.get(*reg) == 0 {
                    next = self.resolve(label)?;
                }
            }
            Instruction::JumpIfNotZero(reg, label) => {
                if self.get(*reg) != 0 {
                    next = self.resolve(label)?;
                }
            }
            Instruction::Call(label) => {
                self.set(Reg::Ra, next as i64);
                next = self.resolve(label)?;
            }
            Instruction::Halt => {
                self.halted = true;
                next = self.pc;
            }
            Instruction::Move(dst, src) => self.set(*dst, self.get(*src)),
            Instruction::Immediate(dst, value) => self.set(*dst, *value),
            Instruction::AddImmediate(dst, src, value) => {
                self.set(*dst, self.get(*src).wrapping_add(*value))
            }
            Instruction::Load(dst, addr) => {
                let value = self.memory.load(self.get(*addr))?;
                self.set(*dst, value);
            }
            Instruction::Store(addr, src) => {
                self.memory.store(self.get(*addr), self.get(*src))?;
            }
            Instruction::Add(d, l, r) => self.binary(*d, *l, *r, i64::wrapping_add),
            Instruction::Sub(d, l, r) => self.binary(*d, *l, *r, i64::wrapping_sub),
            Instruction::Mul(d, l, r) => self.binary(*d, *l, *r, i64::wrapping_mul),
            Instruction::Div(d, l, r) => {
                let divisor = self.get(*r);
                if divisor == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                self.set(*d, self.get(*l).wrapping_div(divisor));
            }
            Instruction::Equal(d, l, r) => self.compare(*d, *l, *r, |a, b| a == b),
            Instruction::NotEqual(d, l, r) => self.compare(*d, *l, *r, |a, b| a != b),
            Instruction::LessThan(d, l, r) => self.compare(*d, *l, *r, |a, b| a < b),
            Instruction::LessThanEqual(d, l, r) => self.compare(*d, *l, *r, |a, b| a <= b),
            Instruction::GreaterThan(d, l, r) => self.compare(*d, *l, *r, |a, b| a > b),
            Instruction::GreaterThanEqual(d, l, r) => self.compare(*d, *l, *r, |a, b| a >= b),
            Instruction::Not(dst, src) => self.set(*dst, (self.get(*src) == 0) as i64),
            Instruction::Print(reg) => self.output.push(self.get(*reg)),
        }
        self.pc = next;
        Ok(())
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Values printed so far.
    pub fn output(&self) -> &[i64] {
        &self.output
    }

    /// Current value of a register.
    pub fn register(&self, reg: Reg) -> i64 {
        self.get(reg)
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Consume the machine, keeping what the run produced.
    pub fn into_execution(self) -> Execution {
        Execution {
            final_sp: self.registers.sp,
            final_fp: self.registers.fp,
            output: self.output,
            steps: self.steps,
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn get(&self, reg: Reg) -> i64 {
        self.registers.get(reg)
    }

    fn set(&mut self, reg: Reg, value: i64) {
        self.registers.set(reg, value);
    }

    fn resolve(&self, label: &str) -> Result<usize, RuntimeError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| RuntimeError::UnknownLabel(label.to_string()))
    }

    fn binary(&mut self, dst: Reg, lhs: Reg, rhs: Reg, op: fn(i64, i64) -> i64) {
        self.set(dst, op(self.get(lhs), self.get(rhs)));
    }

    fn compare(&mut self, dst: Reg, lhs: Reg, rhs: Reg, op: fn(i64, i64) -> bool) {
        self.set(dst, op(self.get(lhs), self.get(rhs)) as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u32) -> Reg {
        Reg::Scratch(n)
    }

    fn run(code: &[Instruction]) -> Result<Execution, RuntimeError> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut vm = Vm::new(code, VmConfig::default())?;
        vm.run()?;
        Ok(vm.into_execution())
    }

    #[test]
    fn arithmetic_and_print() {
        let code = [
            Instruction::Immediate(r(1), 7),
            Instruction::Immediate(r(2), 3),
            Instruction::Sub(r(3), r(1), r(2)),
            Instruction::Mul(r(3), r(3), r(2)),
            Instruction::Div(r(3), r(3), r(2)),
            Instruction::Print(r(3)),
            Instruction::Sub(r(4), Reg::Zero, r(1)),
            Instruction::Print(r(4)),
            Instruction::Halt,
        ];
        assert_eq!(run(&code).unwrap().output, [4, -7]);
    }

    #[test]
    fn comparisons_and_not_produce_zero_or_one() {
        let code = [
            Instruction::Immediate(r(1), 2),
            Instruction::Immediate(r(2), 5),
            Instruction::LessThan(r(3), r(1), r(2)),
            Instruction::Print(r(3)),
            Instruction::GreaterThanEqual(r(3), r(1), r(2)),
            Instruction::Print(r(3)),
            Instruction::Not(r(3), r(2)),
            Instruction::Print(r(3)),
            Instruction::Not(r(3), Reg::Zero),
            Instruction::Print(r(3)),
            Instruction::Halt,
        ];
        assert_eq!(run(&code).unwrap().output, [1, 0, 0, 1]);
    }

    #[test]
    fn call_and_return_through_ra() {
        let code = [
            Instruction::Call("f".into()),
            Instruction::Print(r(1)),
            Instruction::Halt,
            Instruction::Label("f".into()),
            Instruction::Immediate(r(1), 99),
            Instruction::JumpIndirect(Reg::Ra),
        ];
        assert_eq!(run(&code).unwrap().output, [99]);
    }

    #[test]
    fn loop_with_conditional_jumps() {
        let code = [
            Instruction::Immediate(r(1), 3),
            Instruction::Label("top".into()),
            Instruction::JumpIfZero(r(1), "done".into()),
            Instruction::Print(r(1)),
            Instruction::AddImmediate(r(1), r(1), -1),
            Instruction::Jump("top".into()),
            Instruction::Label("done".into()),
            Instruction::Halt,
        ];
        assert_eq!(run(&code).unwrap().output, [3, 2, 1]);
    }

    #[test]
    fn memory_round_trip_relative_to_fp() {
        let code = [
            Instruction::Immediate(r(1), 41),
            Instruction::AddImmediate(Reg::Temp, Reg::Fp, 3),
            Instruction::Store(Reg::Temp, r(1)),
            Instruction::Load(r(2), Reg::Temp),
            Instruction::Print(r(2)),
            Instruction::Halt,
        ];
        let execution = run(&code).unwrap();
        assert_eq!(execution.output, [41]);
        assert_eq!(execution.final_fp, VmConfig::DEFAULT_STACK_BASE);
        assert_eq!(execution.steps, 6);
    }

    #[test]
    fn load_errors() {
        assert_eq!(
            run(&[Instruction::Jump("nowhere".into())]).unwrap_err(),
            RuntimeError::UnknownLabel("nowhere".into())
        );
        assert_eq!(
            run(&[
                Instruction::Label("a".into()),
                Instruction::Label("a".into()),
            ])
            .unwrap_err(),
            RuntimeError::DuplicateLabel("a".into())
        );
    }

    #[test]
    fn runtime_errors() {
        assert_eq!(
            run(&[Instruction::Div(r(1), r(1), r(2))]).unwrap_err(),
            RuntimeError::DivisionByZero
        );
        assert_eq!(
            run(&[Instruction::Immediate(r(1), 0)]).unwrap_err(),
            RuntimeError::MissingHalt
        );
        assert_eq!(
            run(&[
                Instruction::Immediate(Reg::Ra, 40),
                Instruction::JumpIndirect(Reg::Ra),
            ])
            .unwrap_err(),
            RuntimeError::BadJumpTarget { target: 40 }
        );
    }

    #[test]
    fn step_limit_stops_infinite_loops() {
        let code = [Instruction::Label("spin".into()), Instruction::Jump("spin".into())];
        let mut vm = Vm::new(&code, VmConfig::default().with_step_limit(Some(100))).unwrap();
        assert_eq!(
            vm.run().unwrap_err(),
            RuntimeError::StepLimitExceeded { limit: 100 }
        );
        assert_eq!(vm.steps(), 100);
    }

    #[test]
    fn out_of_bounds_access() {
        let code = [
            Instruction::Immediate(r(1), -5),
            Instruction::Load(r(2), r(1)),
            Instruction::Halt,
        ];
        assert_eq!(
            run(&code).unwrap_err(),
            RuntimeError::OutOfBounds {
                address: -5,
                size: VmConfig::DEFAULT_MEMORY_SIZE,
            }
        );
    }

    #[test]
    fn zero_ignores_writes() {
        let code = [
            Instruction::Immediate(Reg::Zero, 5),
            Instruction::Print(Reg::Zero),
            Instruction::Halt,
        ];
        assert_eq!(run(&code).unwrap().output, [0]);
    }
}
