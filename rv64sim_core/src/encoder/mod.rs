mod encoder_error;
mod program;

#[cfg(test)]
mod tests;

pub use encoder_error::{EncoderError, SkippedLine};
pub use program::{EncodedInstruction, EncodedProgram, IMEM_SIZE, InstructionMemory};

use std::str::FromStr;

use crate::isa::{Instruction, InstructionDefinition, InstructionFormat, Mnemonic, Operands};

/// Encodes a trace into an instruction store. Lines with an unrecognized
/// mnemonic are reported and skipped; any other malformed line is a
/// collected error and encoding fails.
pub fn encode_trace(source: &str) -> Result<EncodedProgram, Vec<EncoderError>> {
    let mut errors = Vec::new();
    let mut encoded = EncodedProgram::new();

    for (line_idx, raw_line) in source.lines().enumerate() {
        let line_number = line_idx + 1;
        let line = clean_line(raw_line);
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        let Some(&head) = parts.first() else {
            continue;
        };

        let Ok(mnemonic) = Mnemonic::from_str(head) else {
            encoded.skipped.push(SkippedLine {
                line_number,
                mnemonic: head.to_string(),
            });
            continue;
        };

        match parse_instruction(mnemonic, &parts) {
            Ok(instruction) => match encoded.instruction_memory.push(instruction.raw()) {
                Some(address) => {
                    encoded.source_map.insert(address, line_number);
                }
                None => {
                    errors.push(EncoderError::new(
                        format!("Instruction store is full ({IMEM_SIZE} instructions)."),
                        line_number,
                        0,
                        line.len(),
                    ));
                    break;
                }
            },
            Err(e) => {
                // Try to point at the part of the line that caused the error
                let error_part = if e.contains("register") {
                    parts.iter().find(|&&p| p.starts_with('x'))
                } else if e.contains("immediate") || e.contains("offset") || e.contains("amount") {
                    parts.last()
                } else {
                    Some(&parts[0])
                };

                let (column, width) = if let Some(part) = error_part {
                    (line.find(part).unwrap_or(0), part.len())
                } else {
                    (0, line.len())
                };

                errors.push(EncoderError::new(e, line_number, column, width));
            }
        }
    }

    if errors.is_empty() {
        Ok(encoded)
    } else {
        Err(errors)
    }
}

fn clean_line(line: &str) -> String {
    match line.split('#').next() {
        Some(l) => l.trim().to_string(),
        None => String::new(),
    }
}

fn parse_instruction(mnemonic: Mnemonic, parts: &[&str]) -> Result<Instruction, String> {
    let def = mnemonic.definition();
    match def.format {
        InstructionFormat::R => parse_r_type(parts, def),
        InstructionFormat::I => parse_i_type(parts, def),
        InstructionFormat::S => parse_s_type(parts, def),
        InstructionFormat::B => parse_b_type(parts, def),
    }
}

fn build(def: InstructionDefinition, operands: Operands) -> Result<Instruction, String> {
    Instruction::try_from_def_operands(def, operands).map_err(|e| e.error_message)
}

fn parse_r_type(parts: &[&str], def: InstructionDefinition) -> Result<Instruction, String> {
    if parts.len() != 4 {
        return Err(format!(
            "R-type instruction '{}' requires 3 registers (rd, rs1, rs2), got {} operands",
            parts[0],
            parts.len() - 1
        ));
    }

    let operands = Operands {
        rd: parse_register(parts[1]).map_err(|e| format!("Invalid destination register: {}", e))?,
        rs1: parse_register(parts[2])
            .map_err(|e| format!("Invalid first source register: {}", e))?,
        rs2: parse_register(parts[3])
            .map_err(|e| format!("Invalid second source register: {}", e))?,
        imm: 0,
    };
    build(def, operands)
}

fn parse_i_type(parts: &[&str], def: InstructionDefinition) -> Result<Instruction, String> {
    if def.opcode == 0b0000011 {
        return parse_load(parts, def);
    }

    if parts.len() != 4 {
        return Err(format!(
            "I-type instruction '{}' requires a destination register, source register, and immediate value, got {} operands",
            parts[0],
            parts.len() - 1
        ));
    }

    let imm = parse_immediate(parts[3]).map_err(|e| format!("Invalid immediate value: {}", e))?;
    if def.funct3 == Some(0b001) {
        // slli takes a shift amount instead of a full immediate
        if !(0..=63).contains(&imm) {
            return Err(format!("Shift amount {} is out of range (0 to 63)", imm));
        }
    } else if !(-2048..=2047).contains(&imm) {
        return Err(format!(
            "Immediate value {} is out of range (-2048 to 2047)",
            imm
        ));
    }

    let operands = Operands {
        rd: parse_register(parts[1]).map_err(|e| format!("Invalid destination register: {}", e))?,
        rs1: parse_register(parts[2]).map_err(|e| format!("Invalid source register: {}", e))?,
        imm,
        ..Default::default()
    };
    build(def, operands)
}

fn parse_load(parts: &[&str], def: InstructionDefinition) -> Result<Instruction, String> {
    if parts.len() != 3 {
        return Err(format!(
            "Load instruction '{}' requires a destination register and memory address, got {} operands",
            parts[0],
            parts.len() - 1
        ));
    }

    let (offset, base) =
        parse_mem_address(parts[2]).map_err(|e| format!("Invalid memory address: {}", e))?;

    let operands = Operands {
        rd: parse_register(parts[1]).map_err(|e| format!("Invalid destination register: {}", e))?,
        rs1: base,
        imm: offset,
        ..Default::default()
    };
    build(def, operands)
}

fn parse_s_type(parts: &[&str], def: InstructionDefinition) -> Result<Instruction, String> {
    if parts.len() != 3 {
        return Err(format!(
            "Store instruction '{}' requires a source register and memory address, got {} operands",
            parts[0],
            parts.len() - 1
        ));
    }

    let (offset, base) =
        parse_mem_address(parts[2]).map_err(|e| format!("Invalid memory address: {}", e))?;

    let operands = Operands {
        rs1: base,
        rs2: parse_register(parts[1]).map_err(|e| format!("Invalid source register: {}", e))?,
        imm: offset,
        ..Default::default()
    };
    build(def, operands)
}

fn parse_b_type(parts: &[&str], def: InstructionDefinition) -> Result<Instruction, String> {
    if parts.len() != 4 {
        return Err(format!(
            "Branch instruction '{}' requires two source registers and a byte offset, got {} operands",
            parts[0],
            parts.len() - 1
        ));
    }

    let offset =
        parse_immediate(parts[3]).map_err(|e| format!("Invalid branch offset: {}", e))?;
    if offset & 1 != 0 {
        return Err(format!("Branch offset {} must be 2-byte aligned", offset));
    }
    if !(-4096..=4094).contains(&offset) {
        return Err(format!(
            "Branch offset {} is out of range (-4096 to 4094)",
            offset
        ));
    }

    let operands = Operands {
        rs1: parse_register(parts[1])
            .map_err(|e| format!("Invalid first source register: {}", e))?,
        rs2: parse_register(parts[2])
            .map_err(|e| format!("Invalid second source register: {}", e))?,
        imm: offset,
        ..Default::default()
    };
    build(def, operands)
}

fn parse_mem_address(addr: &str) -> Result<(i32, u32), String> {
    let parts: Vec<&str> = addr
        .split(|c| c == '(' || c == ')')
        .filter(|s| !s.is_empty())
        .collect();

    if parts.len() != 2 {
        return Err(format!(
            "Memory address must be in format 'offset(register)', got: {}",
            addr
        ));
    }

    let offset = parse_immediate(parts[0])?;
    if !(-2048..=2047).contains(&offset) {
        return Err(format!(
            "Memory offset {} is out of range (-2048 to 2047)",
            offset
        ));
    }

    let reg = parse_register(parts[1])?;

    Ok((offset, reg))
}

// index == position in this table; x8 also answers to "fp"
const ABI_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

fn parse_register(reg: &str) -> Result<u32, String> {
    let reg = reg.trim().to_lowercase();

    if let Some(index) = ABI_NAMES.iter().position(|&name| name == reg) {
        return Ok(index as u32);
    }
    if reg == "fp" {
        return Ok(8);
    }

    if let Some(number) = reg.strip_prefix('x') {
        match number.parse::<u32>() {
            Ok(index) if index < 32 => return Ok(index),
            _ => return Err(format!("Invalid register number (must be 0-31): {}", reg)),
        }
    }

    Err(format!("Invalid register name: {}", reg))
}

fn parse_immediate(value: &str) -> Result<i32, String> {
    let value = value.trim();
    let (is_negative, value) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let magnitude = if let Some(hex) = value.strip_prefix("0x") {
        i32::from_str_radix(hex, 16)
            .map_err(|_| format!("Invalid hexadecimal immediate value: {}", value))?
    } else {
        value
            .parse::<i32>()
            .map_err(|_| format!("Invalid decimal immediate value: {}", value))?
    };

    Ok(if is_negative { -magnitude } else { magnitude })
}
