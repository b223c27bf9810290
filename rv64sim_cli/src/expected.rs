use std::collections::HashMap;
use std::path::Path;

use color_eyre::eyre::{WrapErr, bail};
use serde::{Deserialize, Serialize};

use rv64sim_core::datapath::Core;

/// Expected final machine state: register values and single memory
/// bytes, both as big-endian hex strings.
///
/// ```json
/// {
///     "registers": { "7": "000000000000001e" },
///     "data_memory": { "0000000000000064": "2a" }
/// }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExpectedState {
    #[serde(default)]
    pub registers: HashMap<u8, HexValue>,
    #[serde(default)]
    pub data_memory: HashMap<HexValue, HexByte>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct HexValue {
    #[serde(with = "hex::serde")]
    pub value: [u8; 8],
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct HexByte {
    #[serde(with = "hex::serde")]
    pub value: [u8; 1],
}

/// Compares the halted core against the expected-state document and
/// reports every mismatch. Any mismatch is a non-zero exit.
pub fn check_final_state(core: &Core, path: &Path) -> color_eyre::Result<()> {
    let file = std::fs::File::open(path)
        .wrap_err_with(|| format!("cannot open expected-state file {}", path.display()))?;
    let expected: ExpectedState = serde_json::from_reader(file)
        .wrap_err_with(|| format!("malformed expected-state file {}", path.display()))?;

    let mut mismatches = 0;

    for (&reg, data) in &expected.registers {
        if reg >= 32 {
            println!("register x{reg} does not exist");
            mismatches += 1;
            continue;
        }
        let want = i64::from_be_bytes(data.value);
        let actual = core.x[reg as usize];
        if actual != want {
            println!("register x{reg}: expected {want}, got {actual}");
            mismatches += 1;
        }
    }

    for (addr, data) in &expected.data_memory {
        let address = u64::from_be_bytes(addr.value);
        match core.data_mem.byte(address) {
            Some(actual) if actual == data.value[0] => {}
            Some(actual) => {
                println!(
                    "memory byte {address}: expected {:02x}, got {actual:02x}",
                    data.value[0]
                );
                mismatches += 1;
            }
            None => {
                println!("memory byte {address} is outside data memory");
                mismatches += 1;
            }
        }
    }

    if mismatches > 0 {
        bail!("{mismatches} mismatch(es) against {}", path.display());
    }
    println!("Final state matches {}", path.display());
    Ok(())
}
