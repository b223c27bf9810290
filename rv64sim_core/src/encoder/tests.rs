use std::fmt::Write;

use super::{IMEM_SIZE, encode_trace};

#[test]
fn known_traces_encode_field_exactly() {
    let program = encode_trace(
        "addi x5, x0, 10\n\
         add x7, x5, x6\n\
         ld x3, 0(x1)\n\
         sd x2, 0(x1)\n\
         beq x1, x1, 8\n\
         slli x1, x2, 63\n",
    )
    .unwrap();

    let words: Vec<u32> = program
        .instruction_memory
        .entries()
        .iter()
        .map(|entry| entry.word)
        .collect();
    assert_eq!(
        words,
        vec![
            0x00A00293, // addi x5, x0, 10
            0x006283B3, // add x7, x5, x6
            0x0000B183, // ld x3, 0(x1)
            0x0020B023, // sd x2, 0(x1)
            0x00108463, // beq x1, x1, 8
            0x03F11093, // slli x1, x2, 63
        ]
    );
}

#[test]
fn addresses_advance_by_four() {
    let program = encode_trace("addi x1, x0, 1\naddi x2, x0, 2\naddi x3, x0, 3\n").unwrap();
    let addresses: Vec<u64> = program
        .instruction_memory
        .entries()
        .iter()
        .map(|entry| entry.address)
        .collect();
    assert_eq!(addresses, vec![0, 4, 8]);
    assert_eq!(program.instruction_memory.last_address(), Some(8));
}

#[test]
fn fetch_checks_alignment_and_range() {
    let program = encode_trace("addi x1, x0, 1\naddi x2, x0, 2\n").unwrap();
    let instr_mem = &program.instruction_memory;
    assert_eq!(instr_mem.fetch(0), Some(0x00100093));
    assert!(instr_mem.fetch(4).is_some());
    assert_eq!(instr_mem.fetch(2), None);
    assert_eq!(instr_mem.fetch(8), None);
}

#[test]
fn abi_register_names_match_numeric_names() {
    let abi = encode_trace("add a0, s0, t0\nsd ra, -8(sp)\naddi fp, fp, 16\n").unwrap();
    let numeric = encode_trace("add x10, x8, x5\nsd x1, -8(x2)\naddi x8, x8, 16\n").unwrap();
    assert_eq!(
        abi.instruction_memory.entries(),
        numeric.instruction_memory.entries()
    );
}

#[test]
fn mnemonics_are_case_insensitive() {
    let upper = encode_trace("ADDI x1, x0, 3\nADD x2, x1, x1\n").unwrap();
    let lower = encode_trace("addi x1, x0, 3\nadd x2, x1, x1\n").unwrap();
    assert_eq!(
        upper.instruction_memory.entries(),
        lower.instruction_memory.entries()
    );
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let program = encode_trace(
        "# setup\n\
         \n\
         addi x1, x0, 1 # trailing comment\n\
         \n",
    )
    .unwrap();
    assert_eq!(program.instruction_memory.len(), 1);
    assert_eq!(program.source_map.get_by_left(&0), Some(&3));
}

#[test]
fn unknown_mnemonics_are_skipped_not_fatal() {
    let program = encode_trace(
        "mul x1, x2, x3\n\
         addi x1, x0, 1\n\
         jal x1, 16\n",
    )
    .unwrap();

    assert_eq!(program.instruction_memory.len(), 1);
    assert_eq!(program.instruction_memory.last_address(), Some(0));
    assert_eq!(program.source_map.get_by_left(&0), Some(&2));

    let skipped: Vec<(usize, &str)> = program
        .skipped
        .iter()
        .map(|s| (s.line_number, s.mnemonic.as_str()))
        .collect();
    assert_eq!(skipped, vec![(1, "mul"), (3, "jal")]);
}

#[test]
fn malformed_lines_collect_errors() {
    let errors = encode_trace(
        "addi x1, x0, 5000\n\
         add x1, x2\n\
         addi x99, x0, 1\n\
         beq x1, x2, 7\n\
         ld x1, 0[x2]\n",
    )
    .unwrap_err();

    assert_eq!(errors.len(), 5);
    assert_eq!(errors[0].line_number, 1);
    assert!(errors[0].error_message.contains("out of range"));
    assert!(errors[1].error_message.contains("requires 3 registers"));
    assert!(errors[2].error_message.contains("register"));
    assert!(errors[3].error_message.contains("2-byte aligned"));
    assert!(errors[4].error_message.contains("offset(register)"));
}

#[test]
fn shift_amounts_are_bounded() {
    assert!(encode_trace("slli x1, x2, 63\n").is_ok());
    assert!(encode_trace("slli x1, x2, 64\n").is_err());
    assert!(encode_trace("slli x1, x2, -1\n").is_err());
}

#[test]
fn hex_immediates_are_accepted() {
    let hex = encode_trace("addi x1, x0, 0x10\nld x2, 0x8(x1)\n").unwrap();
    let dec = encode_trace("addi x1, x0, 16\nld x2, 8(x1)\n").unwrap();
    assert_eq!(
        hex.instruction_memory.entries(),
        dec.instruction_memory.entries()
    );
}

#[test]
fn store_capacity_is_enforced() {
    let mut source = String::new();
    for _ in 0..IMEM_SIZE {
        writeln!(source, "addi x1, x1, 1").unwrap();
    }
    assert!(encode_trace(&source).is_ok());

    writeln!(source, "addi x1, x1, 1").unwrap();
    let errors = encode_trace(&source).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line_number, IMEM_SIZE + 1);
    assert!(errors[0].error_message.contains("full"));
}

#[test]
fn empty_trace_encodes_to_empty_store() {
    let program = encode_trace("").unwrap();
    assert!(program.instruction_memory.is_empty());
    assert_eq!(program.instruction_memory.last_address(), None);
}
