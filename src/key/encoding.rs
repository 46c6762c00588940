//! Order-preserving key encoding
//!
//! Flattens a `Key` into one byte string whose byte order equals the key's
//! component-wise order, so shard files can index keys as plain bytes.
//!
//! ```text
//! component := ( byte != 0x00 | 0x00 0xFF )* 0x00 0x01
//! key       := component(row) component(family) component(qualifier)
//! ```
//!
//! The terminator `00 01` sorts below every escaped or literal byte, so a
//! component that is a prefix of another sorts first.

use crate::error::{FiMergeError, Result};

use super::Key;

const ESCAPE: u8 = 0xFF;
const TERMINATOR: u8 = 0x01;

/// Encode a key into its sortable byte form
pub fn encode_sort_key(key: &Key) -> Vec<u8> {
    let len = key.row().len() + key.column_family().len() + key.column_qualifier().len() + 6;
    let mut out = Vec::with_capacity(len);
    for component in [key.row(), key.column_family(), key.column_qualifier()] {
        for &byte in component {
            out.push(byte);
            if byte == 0x00 {
                out.push(ESCAPE);
            }
        }
        out.push(0x00);
        out.push(TERMINATOR);
    }
    out
}

/// Decode bytes produced by [`encode_sort_key`]
pub fn decode_sort_key(bytes: &[u8]) -> Result<Key> {
    let mut components: Vec<Vec<u8>> = Vec::with_capacity(3);
    let mut current = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        if byte != 0x00 {
            current.push(byte);
            pos += 1;
            continue;
        }

        match bytes.get(pos + 1) {
            Some(&ESCAPE) => current.push(0x00),
            Some(&TERMINATOR) => {
                if components.len() == 3 {
                    return Err(FiMergeError::Corruption(
                        "sort key has more than three components".to_string(),
                    ));
                }
                components.push(std::mem::take(&mut current));
            }
            other => {
                return Err(FiMergeError::Corruption(format!(
                    "invalid escape {:?} at offset {} in sort key",
                    other, pos
                )));
            }
        }
        pos += 2;
    }

    if components.len() != 3 || !current.is_empty() {
        return Err(FiMergeError::Corruption(format!(
            "sort key has {} complete components, expected 3",
            components.len()
        )));
    }

    let column_qualifier = components.pop().unwrap_or_default();
    let column_family = components.pop().unwrap_or_default();
    let row = components.pop().unwrap_or_default();
    Ok(Key::new(row, column_family, column_qualifier))
}
