use strum::{EnumIter, EnumString};

use super::{Instruction, InstructionBuildError};

/// The instruction subset understood by the datapath.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Mnemonic {
    ADD,
    SUB,
    AND,
    OR,
    ADDI,
    SLLI,
    LD,
    SD,
    BEQ,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionFormat {
    R,
    I,
    S,
    B,
}

/// Fixed encoding fields of one mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstructionDefinition {
    pub format: InstructionFormat,
    pub opcode: u8,
    pub funct3: Option<u8>,
    pub funct7: Option<u8>,
}

/// Variable encoding fields supplied per instruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct Operands {
    pub rd: u32,
    pub rs1: u32,
    pub rs2: u32,
    pub imm: i32,
}

impl Mnemonic {
    pub fn definition(self) -> InstructionDefinition {
        match self {
            Mnemonic::ADD => InstructionDefinition {
                format: InstructionFormat::R,
                opcode: 0b0110011,
                funct3: Some(0b000),
                funct7: Some(0b0000000),
            },
            Mnemonic::SUB => InstructionDefinition {
                format: InstructionFormat::R,
                opcode: 0b0110011,
                funct3: Some(0b000),
                funct7: Some(0b0100000),
            },
            Mnemonic::AND => InstructionDefinition {
                format: InstructionFormat::R,
                opcode: 0b0110011,
                funct3: Some(0b111),
                funct7: Some(0b0000000),
            },
            Mnemonic::OR => InstructionDefinition {
                format: InstructionFormat::R,
                opcode: 0b0110011,
                funct3: Some(0b110),
                funct7: Some(0b0000000),
            },
            Mnemonic::ADDI => InstructionDefinition {
                format: InstructionFormat::I,
                opcode: 0b0010011,
                funct3: Some(0b000),
                funct7: None,
            },
            Mnemonic::SLLI => InstructionDefinition {
                format: InstructionFormat::I,
                opcode: 0b0010011,
                funct3: Some(0b001),
                funct7: None,
            },
            Mnemonic::LD => InstructionDefinition {
                format: InstructionFormat::I,
                opcode: 0b0000011,
                funct3: Some(0b011),
                funct7: None,
            },
            Mnemonic::SD => InstructionDefinition {
                format: InstructionFormat::S,
                opcode: 0b0100011,
                funct3: Some(0b011),
                funct7: None,
            },
            Mnemonic::BEQ => InstructionDefinition {
                format: InstructionFormat::B,
                opcode: 0b1100011,
                funct3: Some(0b000),
                funct7: None,
            },
        }
    }

    pub fn build(self, operands: Operands) -> Result<Instruction, InstructionBuildError> {
        Instruction::try_from_def_operands(self.definition(), operands)
    }
}
