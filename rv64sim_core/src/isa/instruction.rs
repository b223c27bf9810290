use super::{InstructionDefinition, InstructionFormat, Operands};
use crate::{bitmask, bits};

/// A 32-bit encoded instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    word: u32,
}

#[derive(Debug)]
pub struct InstructionBuildError {
    pub error_message: String,
    pub error_type: InstructionBuildErrorType,
}

#[derive(Debug)]
pub enum InstructionBuildErrorType {
    InvalidOpcode,
    InvalidRd,
    InvalidFunct3,
    InvalidRs1,
    InvalidRs2,
    InvalidFunct7,
    InvalidImm,
}

impl Instruction {
    #[allow(clippy::too_many_arguments)]
    pub fn try_build(
        format: InstructionFormat,
        opcode: u32,
        rd: u32,
        funct3: u32,
        rs1: u32,
        rs2: u32,
        funct7: u32,
        imm: i32,
    ) -> Result<Instruction, InstructionBuildError> {
        if opcode != bits!(opcode,6;0) {
            Err(InstructionBuildError {
                error_message: format!("Opcode {opcode:#05x} is out of range."),
                error_type: InstructionBuildErrorType::InvalidOpcode,
            })
        } else if rd != bits!(rd,4;0) {
            Err(InstructionBuildError {
                error_message: format!("Rd {rd:#05x} is out of range."),
                error_type: InstructionBuildErrorType::InvalidRd,
            })
        } else if funct3 != bits!(funct3,2;0) {
            Err(InstructionBuildError {
                error_message: format!("Funct3 {funct3:#05x} is out of range."),
                error_type: InstructionBuildErrorType::InvalidFunct3,
            })
        } else if rs1 != bits!(rs1,4;0) {
            Err(InstructionBuildError {
                error_message: format!("Rs1 {rs1:#05x} is out of range."),
                error_type: InstructionBuildErrorType::InvalidRs1,
            })
        } else if rs2 != bits!(rs2,4;0) {
            Err(InstructionBuildError {
                error_message: format!("Rs2 {rs2:#05x} is out of range."),
                error_type: InstructionBuildErrorType::InvalidRs2,
            })
        } else if funct7 != bits!(funct7,6;0) {
            Err(InstructionBuildError {
                error_message: format!("Funct7 {funct7:#05x} is out of range."),
                error_type: InstructionBuildErrorType::InvalidFunct7,
            })
        } else {
            let word = match format {
                InstructionFormat::R => {
                    if imm != 0 {
                        Err(InstructionBuildError {
                            error_message: "Unexpected operand immediate for R type instruction."
                                .into(),
                            error_type: InstructionBuildErrorType::InvalidImm,
                        })
                    } else {
                        Self::encode_r(opcode, rd, funct3, rs1, rs2, funct7)
                    }
                }
                InstructionFormat::I => {
                    if rs2 != 0 {
                        Err(InstructionBuildError {
                            error_message: "Unexpected operand rs2 for I type instruction.".into(),
                            error_type: InstructionBuildErrorType::InvalidRs2,
                        })
                    } else if opcode == 0b0010011 && funct3 == 0b001 {
                        // SLLI keeps its shift amount in imm[5:0]; the bits
                        // above it must stay clear
                        if !(0..=63).contains(&imm) {
                            Err(InstructionBuildError {
                                error_message: format!(
                                    "Shift amount {imm} is out of range (0 to 63)."
                                ),
                                error_type: InstructionBuildErrorType::InvalidImm,
                            })
                        } else {
                            Self::encode_i(opcode, rd, funct3, rs1, imm)
                        }
                    } else {
                        Self::encode_i(opcode, rd, funct3, rs1, imm)
                    }
                }
                InstructionFormat::S => {
                    if rd != 0 {
                        Err(InstructionBuildError {
                            error_message: "Unexpected operand rd for S type instruction.".into(),
                            error_type: InstructionBuildErrorType::InvalidRd,
                        })
                    } else {
                        Self::encode_s(opcode, funct3, rs1, rs2, imm)
                    }
                }
                InstructionFormat::B => {
                    if rd != 0 {
                        Err(InstructionBuildError {
                            error_message: "Unexpected operand rd for B type instruction.".into(),
                            error_type: InstructionBuildErrorType::InvalidRd,
                        })
                    } else {
                        Self::encode_b(opcode, funct3, rs1, rs2, imm)
                    }
                }
            }?;
            Ok(Self { word })
        }
    }

    pub fn try_from_def_operands(
        def: InstructionDefinition,
        operands: Operands,
    ) -> Result<Instruction, InstructionBuildError> {
        Instruction::try_build(
            def.format,
            def.opcode as u32,
            operands.rd,
            def.funct3.unwrap_or_default() as u32,
            operands.rs1,
            operands.rs2,
            def.funct7.unwrap_or_default() as u32,
            operands.imm,
        )
    }

    pub fn from_raw(word: u32) -> Instruction {
        Self { word }
    }

    fn encode_r(
        opcode: u32,
        rd: u32,
        funct3: u32,
        rs1: u32,
        rs2: u32,
        funct7: u32,
    ) -> Result<u32, InstructionBuildError> {
        Ok((funct7 << 25) | (rs2 << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode)
    }

    fn encode_i(
        opcode: u32,
        rd: u32,
        funct3: u32,
        rs1: u32,
        imm: i32,
    ) -> Result<u32, InstructionBuildError> {
        if !((imm == bits!(imm,11;0)) || (imm & bitmask!(31;11) == bitmask!(31;11))) {
            Err(InstructionBuildError {
                error_message: format!(
                    "Immediate {imm:#05x} is out of range for I type instruction."
                ),
                error_type: InstructionBuildErrorType::InvalidImm,
            })
        } else {
            let imm: u32 = imm as u32;
            Ok((imm << 20) | (rs1 << 15) | (funct3 << 12) | (rd << 7) | opcode)
        }
    }

    fn encode_s(
        opcode: u32,
        funct3: u32,
        rs1: u32,
        rs2: u32,
        imm: i32,
    ) -> Result<u32, InstructionBuildError> {
        if !((imm == bits!(imm,11;0)) || (imm & bitmask!(31;11) == bitmask!(31;11))) {
            Err(InstructionBuildError {
                error_message: format!(
                    "Immediate {imm:#05x} is out of range for S type instruction."
                ),
                error_type: InstructionBuildErrorType::InvalidImm,
            })
        } else {
            let imm: u32 = imm as u32;
            Ok((bits!(imm,11;5) << 25)
                | (rs2 << 20)
                | (rs1 << 15)
                | (funct3 << 12)
                | (bits!(imm,4;0) << 7)
                | opcode)
        }
    }

    fn encode_b(
        opcode: u32,
        funct3: u32,
        rs1: u32,
        rs2: u32,
        imm: i32,
    ) -> Result<u32, InstructionBuildError> {
        if !((imm == bits!(imm,12;0)) || (imm & bitmask!(31;12) == bitmask!(31;12))) {
            Err(InstructionBuildError {
                error_message: format!(
                    "Immediate {imm:#05x} is out of range for B type instruction."
                ),
                error_type: InstructionBuildErrorType::InvalidImm,
            })
        } else if imm & 1 != 0 {
            Err(InstructionBuildError {
                error_message: format!(
                    "Immediate {imm:#05x} must be 2-byte aligned for B type instruction."
                ),
                error_type: InstructionBuildErrorType::InvalidImm,
            })
        } else {
            let imm: u32 = imm as u32;
            Ok((bits!(imm, 12) << 31)
                | (bits!(imm,10;5) << 25)
                | (rs2 << 20)
                | (rs1 << 15)
                | (funct3 << 12)
                | (bits!(imm,4;1) << 8)
                | (bits!(imm, 11) << 7)
                | opcode)
        }
    }

    pub fn raw(&self) -> u32 {
        self.word
    }

    pub fn opcode(&self) -> u8 {
        bits!(self.word,6;0) as u8
    }

    pub fn rd(&self) -> u8 {
        bits!(self.word, 7, 5) as u8
    }

    pub fn rs1(&self) -> u8 {
        bits!(self.word, 15, 5) as u8
    }

    pub fn rs2(&self) -> u8 {
        bits!(self.word, 20, 5) as u8
    }

    pub fn funct3(&self) -> u8 {
        bits!(self.word, 12, 3) as u8
    }

    pub fn funct7(&self) -> u8 {
        bits!(self.word, 25, 7) as u8
    }
}
