pub mod alu;
pub mod control;
pub mod imm_gen;

mod data_memory;
mod register_file;


pub use data_memory::{DataMemory, MEM_SIZE};
pub use register_file::RegisterFile;

use crate::bits;
use crate::encoder::InstructionMemory;
use alu::{AluOutput, alu_control};
use control::control_unit;

/// Whether the core has more instructions to run after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Running,
    Halted,
}

/// Errors that end a simulation run. Each carries the program counter of
/// the offending tick so the driver can point back at the trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecError {
    /// No instruction stored at the fetch address (reachable only through
    /// a branch past the end of the populated store).
    InstructionFetch { pc: u64 },
    /// The control unit has no entry for this opcode.
    UnsupportedOpcode { opcode: u8, pc: u64 },
    /// The ALU control unit has no entry for this combination.
    UnresolvedAluOp {
        opcode: u8,
        funct3: u8,
        funct7: u8,
        pc: u64,
    },
    /// A load or store address falls outside data memory.
    AddressOutOfRange { address: i64, pc: u64 },
}

impl ExecError {
    pub fn pc(&self) -> u64 {
        match *self {
            ExecError::InstructionFetch { pc }
            | ExecError::UnsupportedOpcode { pc, .. }
            | ExecError::UnresolvedAluOp { pc, .. }
            | ExecError::AddressOutOfRange { pc, .. } => pc,
        }
    }
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ExecError::InstructionFetch { pc } => {
                write!(f, "no instruction at address {pc:#x}")
            }
            ExecError::UnsupportedOpcode { opcode, pc } => {
                write!(f, "unsupported opcode {opcode:#04x} at pc {pc:#x}")
            }
            ExecError::UnresolvedAluOp {
                opcode,
                funct3,
                funct7,
                pc,
            } => {
                write!(
                    f,
                    "no ALU operation for opcode {opcode:#04x} funct3 {funct3:#x} funct7 {funct7:#04x} at pc {pc:#x}"
                )
            }
            ExecError::AddressOutOfRange { address, pc } => {
                write!(f, "data address {address} is out of range at pc {pc:#x}")
            }
        }
    }
}

impl std::error::Error for ExecError {}

/// Architectural state of the single-cycle core: clock, program counter,
/// register file, and data memory. One instance owns one simulation run;
/// the instruction store is borrowed per tick and may be shared between
/// cores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Core {
    pub clk: u64,
    pub pc: u64,
    pub x: RegisterFile,
    pub data_mem: DataMemory,
}

impl Core {
    pub fn new() -> Self {
        Core {
            clk: 0,
            pc: 0,
            x: RegisterFile::default(),
            data_mem: DataMemory::new(),
        }
    }

    /// Runs one complete fetch/decode/execute/memory/write-back/PC-update
    /// transition and increments the clock. State is only mutated once
    /// every combinational result is known, so a tick is atomic: callers
    /// never observe a partially-applied instruction.
    pub fn tick(&mut self, instr_mem: &InstructionMemory) -> Result<TickStatus, ExecError> {
        let Some(last_address) = instr_mem.last_address() else {
            return Ok(TickStatus::Halted);
        };

        // Fetch
        let word = instr_mem
            .fetch(self.pc)
            .ok_or(ExecError::InstructionFetch { pc: self.pc })?;

        // Decode
        let opcode = bits!(word,6;0) as u8;
        let funct3 = bits!(word,14;12) as u8;
        let funct7 = bits!(word,31;25) as u8;
        let rd = bits!(word,11;7) as usize;
        let rs1 = bits!(word,19;15) as usize;
        let rs2 = bits!(word,24;20) as usize;
        let imm = imm_gen::immediate(word);
        let rs1_val = self.x[rs1];
        let rs2_val = self.x[rs2];
        let signals = control_unit(opcode).ok_or(ExecError::UnsupportedOpcode {
            opcode,
            pc: self.pc,
        })?;

        // Execute
        let op_b = if signals.alu_src { imm } else { rs2_val };
        let function =
            alu_control(signals.alu_op, funct7, funct3).ok_or(ExecError::UnresolvedAluOp {
                opcode,
                funct3,
                funct7,
                pc: self.pc,
            })?;
        let AluOutput { result, zero } = function.evaluate(rs1_val, op_b);

        // Memory access
        if signals.mem_write {
            self.data_mem
                .write_doubleword(result, rs2_val)
                .map_err(|access| ExecError::AddressOutOfRange {
                    address: access.address,
                    pc: self.pc,
                })?;
        }
        if signals.mem_to_reg {
            let loaded = self.data_mem.read_doubleword(result).map_err(|access| {
                ExecError::AddressOutOfRange {
                    address: access.address,
                    pc: self.pc,
                }
            })?;
            self.x[rd] = loaded;
        }

        // Write-back
        if signals.reg_write && !signals.mem_to_reg {
            self.x[rd] = result;
        }

        // PC update: the branch immediate already carries the byte offset
        if signals.branch && zero {
            self.pc = self.pc.wrapping_add(imm as u64);
        } else {
            self.pc += 4;
        }

        self.clk += 1;

        if self.pc > last_address {
            Ok(TickStatus::Halted)
        } else {
            Ok(TickStatus::Running)
        }
    }

    /// Ticks until the terminal check fires or the budget runs out.
    /// Returns whether the run halted within `max_ticks`.
    pub fn run_to_halt(
        &mut self,
        instr_mem: &InstructionMemory,
        max_ticks: u64,
    ) -> Result<bool, ExecError> {
        for _ in 0..max_ticks {
            if self.tick(instr_mem)? == TickStatus::Halted {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}
