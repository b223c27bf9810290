mod definitions;
mod instruction;

pub use definitions::{InstructionDefinition, InstructionFormat, Mnemonic, Operands};
pub use instruction::{Instruction, InstructionBuildError, InstructionBuildErrorType};
