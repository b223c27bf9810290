use crate::{bitmask, bits};

/// Extracts the sign-extended immediate for an encoded word, picking the
/// format by opcode. Opcodes with no immediate yield 0.
pub fn immediate(word: u32) -> i64 {
    match bits!(word,6;0) {
        // I-type: imm[11:0] in word[31:20]
        0b0000011 | 0b0010011 => {
            ((bits!(word, 31) * bitmask!(31;11)) | bits!(word,30;20)) as i32 as i64
        }
        // S-type: imm[11:5] in word[31:25], imm[4:0] in word[11:7]
        0b0100011 => {
            ((bits!(word, 31) * bitmask!(31;11)) | (bits!(word,30;25) << 5) | bits!(word,11;7))
                as i32 as i64
        }
        // SB-type: imm[12|10:5|4:1|11] in word[31|30:25|11:8|7], low bit
        // implicitly zero
        0b1100011 => {
            ((bits!(word, 31) * bitmask!(31;12))
                | (bits!(word, 7) << 11)
                | (bits!(word,30;25) << 5)
                | (bits!(word,11;8) << 1)) as i32 as i64
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{Mnemonic, Operands};

    fn word_for(mnemonic: Mnemonic, operands: Operands) -> u32 {
        mnemonic.build(operands).unwrap().raw()
    }

    #[test]
    fn i_type_immediates_sign_extend() {
        let positive = word_for(Mnemonic::ADDI, Operands {
            rd: 1,
            rs1: 0,
            imm: 2047,
            ..Default::default()
        });
        assert_eq!(immediate(positive), 2047);

        let negative = word_for(Mnemonic::ADDI, Operands {
            rd: 1,
            rs1: 0,
            imm: -1,
            ..Default::default()
        });
        assert_eq!(immediate(negative), -1);

        let load = word_for(Mnemonic::LD, Operands {
            rd: 3,
            rs1: 1,
            imm: -2048,
            ..Default::default()
        });
        assert_eq!(immediate(load), -2048);
    }

    #[test]
    fn s_type_immediates_reassemble_split_fields() {
        for imm in [0, 1, 42, 2047, -1, -42, -2048] {
            let word = word_for(Mnemonic::SD, Operands {
                rs1: 1,
                rs2: 2,
                imm,
                ..Default::default()
            });
            assert_eq!(immediate(word), imm as i64);
        }
    }

    #[test]
    fn sb_type_immediates_keep_low_bit_clear() {
        for imm in [8, -8, 4094, -4096, 2, -2] {
            let word = word_for(Mnemonic::BEQ, Operands {
                rs1: 1,
                rs2: 1,
                imm,
                ..Default::default()
            });
            let extracted = immediate(word);
            assert_eq!(extracted, imm as i64);
            assert_eq!(extracted & 1, 0);
        }
    }

    #[test]
    fn immediates_are_deterministic() {
        let word = word_for(Mnemonic::ADDI, Operands {
            rd: 5,
            rs1: 5,
            imm: -77,
            ..Default::default()
        });
        assert_eq!(immediate(word), immediate(word));
    }

    #[test]
    fn other_opcodes_have_no_immediate() {
        let r_type = word_for(Mnemonic::ADD, Operands {
            rd: 1,
            rs1: 2,
            rs2: 3,
            ..Default::default()
        });
        assert_eq!(immediate(r_type), 0);
        assert_eq!(immediate(0b0110111), 0); // lui is outside the subset
    }
}
