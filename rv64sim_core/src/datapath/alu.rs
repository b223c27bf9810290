use super::control::AluOp;

/// Concrete operation resolved by the ALU control unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluFunction {
    Add,
    Sub,
    And,
    Or,
    Sll,
}

/// ALU result plus the zero flag that drives branch decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOutput {
    pub result: i64,
    pub zero: bool,
}

impl AluFunction {
    pub fn evaluate(self, a: i64, b: i64) -> AluOutput {
        let result = match self {
            AluFunction::Add => a.wrapping_add(b),
            AluFunction::Sub => a.wrapping_sub(b),
            AluFunction::And => a & b,
            AluFunction::Or => a | b,
            // shift amount is the low 6 bits of operand 2
            AluFunction::Sll => a << (b & 0x3F),
        };
        AluOutput {
            result,
            zero: result == 0,
        }
    }
}

/// Refines the coarse ALU operation class into a concrete operation.
/// Combinations with no table entry resolve to `None`.
pub fn alu_control(alu_op: AluOp, funct7: u8, funct3: u8) -> Option<AluFunction> {
    match (alu_op, funct7, funct3) {
        // loads and stores always add base and offset
        (AluOp::MemAddr, _, _) => Some(AluFunction::Add),
        // equality comparison through the subtraction zero flag
        (AluOp::Branch, _, _) => Some(AluFunction::Sub),
        (AluOp::Arith, 0b0000000, 0b000) => Some(AluFunction::Add),
        (AluOp::Arith, 0b0100000, 0b000) => Some(AluFunction::Sub),
        (AluOp::Arith, 0b0000000, 0b111) => Some(AluFunction::And),
        (AluOp::Arith, 0b0000000, 0b110) => Some(AluFunction::Or),
        // slli: the shift amount spills into the low funct7 bit
        (AluOp::Arith, _, 0b001) => Some(AluFunction::Sll),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alu_results_and_zero_flag() {
        assert_eq!(
            AluFunction::Add.evaluate(5, 3),
            AluOutput {
                result: 8,
                zero: false
            }
        );
        assert_eq!(
            AluFunction::Add.evaluate(-3, 3),
            AluOutput {
                result: 0,
                zero: true
            }
        );
        assert_eq!(
            AluFunction::Sub.evaluate(5, 5),
            AluOutput {
                result: 0,
                zero: true
            }
        );
        assert_eq!(AluFunction::And.evaluate(6, 3).result, 2);
        assert_eq!(AluFunction::Or.evaluate(6, 3).result, 7);
        assert_eq!(AluFunction::Sll.evaluate(1, 4).result, 16);
    }

    #[test]
    fn shift_amount_uses_low_six_bits() {
        assert_eq!(AluFunction::Sll.evaluate(1, 64).result, 1);
        assert_eq!(AluFunction::Sll.evaluate(1, 63 | 64).result, i64::MIN);
    }

    #[test]
    fn arith_table_resolves() {
        assert_eq!(alu_control(AluOp::Arith, 0, 0), Some(AluFunction::Add));
        assert_eq!(alu_control(AluOp::Arith, 32, 0), Some(AluFunction::Sub));
        assert_eq!(alu_control(AluOp::Arith, 0, 7), Some(AluFunction::And));
        assert_eq!(alu_control(AluOp::Arith, 0, 6), Some(AluFunction::Or));
        assert_eq!(alu_control(AluOp::Arith, 0, 1), Some(AluFunction::Sll));
        assert_eq!(alu_control(AluOp::Arith, 1, 1), Some(AluFunction::Sll));
    }

    #[test]
    fn address_and_branch_classes_resolve_unconditionally() {
        assert_eq!(alu_control(AluOp::MemAddr, 0x55, 0b101), Some(AluFunction::Add));
        assert_eq!(alu_control(AluOp::Branch, 0, 0), Some(AluFunction::Sub));
    }

    #[test]
    fn unmatched_combinations_do_not_resolve() {
        assert_eq!(alu_control(AluOp::Arith, 0, 0b010), None); // slt
        assert_eq!(alu_control(AluOp::Arith, 0, 0b100), None); // xor
        assert_eq!(alu_control(AluOp::Arith, 0b0100000, 0b110), None);
    }
}
