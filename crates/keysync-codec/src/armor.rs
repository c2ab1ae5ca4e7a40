// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Base64 armour for DER blobs as OTR clients write them into config files.
//
// Clients are sloppy: line breaks, stray spaces and dropped padding all show
// up in the wild, so decoding normalises before handing off to `base64`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use keysync_core::error::{KeysyncError, Result};

/// Standard base64 with padding and no line breaks.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 text, ignoring whitespace and repairing missing padding.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let mut compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    while compact.ends_with('=') {
        compact.pop();
    }
    match compact.len() % 4 {
        // One leftover character can never encode a whole byte.
        1 => {
            return Err(KeysyncError::malformed(format!(
                "base64 text of {} significant characters cannot be decoded",
                compact.len()
            )));
        }
        2 => compact.push_str("=="),
        3 => compact.push('='),
        _ => {}
    }
    Ok(STANDARD.decode(compact)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"\x30\x03\x02\x01\x07";
        assert_eq!(decode(&encode(data)).unwrap(), data);
    }

    #[test]
    fn tolerates_whitespace_and_missing_padding() {
        // "MAMCAQc=" is the armoured form of 30 03 02 01 07.
        assert_eq!(decode("MAMC\n AQc").unwrap(), [0x30, 0x03, 0x02, 0x01, 0x07]);
        assert_eq!(decode("MAMCAQc=").unwrap(), [0x30, 0x03, 0x02, 0x01, 0x07]);
    }

    #[test]
    fn rejects_impossible_length() {
        assert!(matches!(decode("MAMCA"), Err(KeysyncError::MalformedEncoding(_))));
    }

    #[test]
    fn rejects_invalid_alphabet() {
        assert!(matches!(decode("MA*CAQc="), Err(KeysyncError::Base64(_))));
    }
}
