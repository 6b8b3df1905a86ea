//! Call payload encoder and result decoder.
//!
//! Only the handful of fixed-shape encodings the probes need: a 4-byte
//! selector followed by 32-byte words, and the decoding of a single numeric
//! word or a dynamic `string` return value.
//!
//! # Usage
//! ```
//! use chainprobe_core::codec::{self, Token};
//!
//! let data = codec::encode_call(
//!     codec::selectors::BALANCE_OF,
//!     &[Token::Address("0x1234567890123456789012345678901234567890")],
//! );
//! assert_eq!(data.len(), 2 + 8 + 64);
//! assert_eq!(codec::decode_numeric("0x0de0b6b3a7640000"), 1e18);
//! ```

pub use alloy_primitives::U256;

use crate::error::DecodeError;

/// Function selectors used by the built-in probes.
pub mod selectors {
    /// `balanceOf(address)` — ERC20, ERC721, ERC4337 EntryPoint, ERC4626 shares.
    pub const BALANCE_OF: &str = "0x70a08231";
    /// `balanceOf(address,uint256)` — ERC1155.
    pub const BALANCE_OF_TOKEN: &str = "0x00fdd58e";
    /// `convertToAssets(uint256)` — ERC4626.
    pub const CONVERT_TO_ASSETS: &str = "0x07a2d13a";
    /// `symbol()`.
    pub const SYMBOL: &str = "0x95d89b41";
    /// `latestAnswer()` — Chainlink aggregator.
    pub const LATEST_ANSWER: &str = "0x50d25bcd";
    /// `getReserves()` — Uniswap V2 pair.
    pub const GET_RESERVES: &str = "0x0902f1ac";
}

/// Hex characters in one 32-byte ABI word.
pub const WORD_HEX_LEN: usize = 64;

/// A single call argument, encoded as one 32-byte word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A 20-byte address, with or without `0x`.
    Address(&'a str),
    /// An unsigned integer of up to 256 bits.
    Uint(U256),
    /// An already hex-encoded word (e.g. a previous call's result).
    Word(&'a str),
}

impl Token<'_> {
    fn encode(&self) -> String {
        match self {
            Self::Address(address) => left_pad(strip_hex_prefix(address)),
            Self::Uint(value) => left_pad(&format!("{value:x}")),
            Self::Word(word) => {
                let word = strip_hex_prefix(word);
                if word.is_empty() {
                    left_pad("0")
                } else {
                    left_pad(word)
                }
            }
        }
    }
}

/// Build `0x` + selector + one word per argument.
///
/// Arguments are left-padded with zero nibbles to 64 hex characters; longer
/// values are passed through untouched.
pub fn encode_call(selector: &str, args: &[Token<'_>]) -> String {
    let mut data = String::with_capacity(10 + args.len() * WORD_HEX_LEN);
    data.push_str("0x");
    data.push_str(strip_hex_prefix(selector));
    for arg in args {
        data.push_str(&arg.encode());
    }
    data
}

/// Interpret a hex string as an unsigned big integer and convert it to `f64`.
///
/// Unparsable input (empty, non-hex characters) yields `0.0` instead of an
/// error. Callers that need to tell a real zero from a garbage response must
/// validate the string themselves.
pub fn decode_numeric(hex_str: &str) -> f64 {
    let digits = strip_hex_prefix(hex_str.trim());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return 0.0;
    }

    let digits = digits.trim_start_matches('0');
    // Up to 32 nibbles fit in a u128 and convert with a single rounding.
    let split = digits.len().min(32);
    let (head, tail) = digits.split_at(split);
    let mut value = match u128::from_str_radix(head, 16) {
        Ok(v) => v as f64,
        Err(_) => 0.0,
    };
    for nibble in tail.bytes() {
        let digit = (nibble as char).to_digit(16).unwrap_or(0);
        value = value * 16.0 + f64::from(digit);
    }
    value
}

/// Decode a dynamic ABI `string` return value.
///
/// Layout: word 0 is the offset, word 1 the byte length, then the data.
/// Shorter buffers (e.g. `bytes32` symbols) and buffers whose length word
/// does not fit fall back to the whole buffer with NUL bytes and whitespace
/// trimmed. Only invalid hex is an error.
pub fn decode_abi_string(hex_str: &str) -> Result<String, DecodeError> {
    let bytes = hex::decode(strip_hex_prefix(hex_str))?;

    if bytes.len() < 64 {
        return Ok(trim_padding(&bytes));
    }

    match declared_length(&bytes[32..64]) {
        Some(len) if len > 0 && len <= bytes.len() - 64 => {
            Ok(String::from_utf8_lossy(&bytes[64..64 + len]).into_owned())
        }
        _ => Ok(trim_padding(&bytes)),
    }
}

/// Split a multi-word return value into its 32-byte words (without `0x`).
///
/// A trailing partial word is returned as-is.
pub fn split_words(hex_str: &str) -> Vec<&str> {
    let digits = strip_hex_prefix(hex_str);
    let mut words = Vec::with_capacity(digits.len() / WORD_HEX_LEN + 1);
    let mut rest = digits;
    while !rest.is_empty() {
        let at = rest.len().min(WORD_HEX_LEN);
        let (word, tail) = rest.split_at(at);
        words.push(word);
        rest = tail;
    }
    words
}

/// Remove a leading `0x` / `0X`.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn left_pad(hex_digits: &str) -> String {
    format!("{hex_digits:0>width$}", width = WORD_HEX_LEN)
}

/// Read a big-endian length word; `None` if it does not fit in a `usize`.
fn declared_length(word: &[u8]) -> Option<usize> {
    let (high, low) = word.split_at(word.len() - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(buf)).ok()
}

fn trim_padding(bytes: &[u8]) -> String {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| *b != 0).map_or(start, |i| i + 1);
    String::from_utf8_lossy(&bytes[start..end]).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYMBOL_USDC_VAULT: &str = "0x0000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000000b73555344432d5661756c74000000000000000000000000000000000000000000";

    #[test]
    fn encode_balance_of() {
        let data = encode_call(
            selectors::BALANCE_OF,
            &[Token::Address("0x1234567890123456789012345678901234567890")],
        );
        assert_eq!(
            data,
            "0x70a082310000000000000000000000001234567890123456789012345678901234567890"
        );
    }

    #[test]
    fn encode_address_preserves_case() {
        let data = encode_call(
            selectors::BALANCE_OF,
            &[Token::Address("0xBEEF01735c132Ada46AA9aA4c54623cAA92A64CB")],
        );
        assert!(data.ends_with("BEEF01735c132Ada46AA9aA4c54623cAA92A64CB"));
    }

    #[test]
    fn encode_balance_of_token() {
        let data = encode_call(
            selectors::BALANCE_OF_TOKEN,
            &[
                Token::Address("0x1111111111111111111111111111111111111111"),
                Token::Uint(U256::from(255u64)),
            ],
        );
        assert!(data.starts_with("0x00fdd58e"));
        assert_eq!(data.len(), 10 + 128);
        assert!(data.ends_with(&format!("{}ff", "0".repeat(62))));
    }

    #[test]
    fn encode_uint_wider_than_u64() {
        let id = U256::from(u64::MAX) + U256::from(1u64);
        assert_eq!(Token::Uint(id).encode(), format!("{}10000000000000000", "0".repeat(47)));
        assert_eq!(Token::Uint(U256::MAX).encode(), "f".repeat(64));
    }

    #[test]
    fn encode_no_args() {
        assert_eq!(encode_call(selectors::SYMBOL, &[]), "0x95d89b41");
    }

    #[test]
    fn word_is_repadded_not_truncated() {
        assert_eq!(Token::Word("0x1").encode(), format!("{}1", "0".repeat(63)));
        assert_eq!(Token::Word("0x").encode(), "0".repeat(64));
        let long = "f".repeat(66);
        assert_eq!(Token::Word(&long).encode(), long);
    }

    #[test]
    fn numeric_one_ether() {
        assert_eq!(decode_numeric("0x0de0b6b3a7640000"), 1_000_000_000_000_000_000.0);
        assert_eq!(
            decode_numeric("0x0000000000000000000000000000000000000000000000000de0b6b3a7640000"),
            1e18
        );
    }

    #[test]
    fn numeric_small_values() {
        assert_eq!(decode_numeric("0x0a"), 10.0);
        assert_eq!(decode_numeric("0x0"), 0.0);
        assert_eq!(decode_numeric("0x773594c0"), 2_000_000_192.0);
    }

    #[test]
    fn numeric_full_width_word_is_finite() {
        let max = format!("0x{}", "f".repeat(64));
        let v = decode_numeric(&max);
        assert!(v.is_finite());
        assert!((v - 2f64.powi(256)).abs() / 2f64.powi(256) < 1e-12);
    }

    #[test]
    fn numeric_oversized_word() {
        // 33-byte result, as some nodes return for large vault conversions
        let v = decode_numeric("0x0000000000000000000000000000000000000000000000152d02c7e14af6800000");
        assert_eq!(v, 1e23);
    }

    // Malformed numeric responses silently become zero; this keeps parity with
    // the exporter's long-standing behaviour.
    #[test]
    fn numeric_garbage_is_zero() {
        assert_eq!(decode_numeric(""), 0.0);
        assert_eq!(decode_numeric("0x"), 0.0);
        assert_eq!(decode_numeric("0xzz"), 0.0);
        assert_eq!(decode_numeric("not a number"), 0.0);
    }

    #[test]
    fn abi_string_standard() {
        assert_eq!(decode_abi_string(SYMBOL_USDC_VAULT).unwrap(), "sUSDC-Vault");
    }

    #[test]
    fn abi_string_short_buffer_is_trimmed() {
        // bytes32-style symbol: "MKR" right-padded with NULs
        let hex = format!("0x4d4b52{}", "00".repeat(29));
        assert_eq!(decode_abi_string(&hex).unwrap(), "MKR");
    }

    #[test]
    fn abi_string_bad_length_falls_back() {
        // length word claims 0xff bytes but only one word of data follows
        let hex = format!(
            "0x{}{}{}",
            format!("{:0>64}", "20"),
            format!("{:0>64}", "ff"),
            format!("{:0<64}", "455448")
        );
        let decoded = decode_abi_string(&hex).unwrap();
        assert!(decoded.ends_with("ETH"));
    }

    #[test]
    fn abi_string_zero_length_falls_back() {
        let hex = format!("0x{}{}", "00".repeat(32), "00".repeat(32));
        assert_eq!(decode_abi_string(&hex).unwrap(), "");
    }

    #[test]
    fn abi_string_invalid_hex_errors() {
        assert!(decode_abi_string("0xnothex").is_err());
        assert!(decode_abi_string("0x123").is_err());
    }

    #[test]
    fn split_reserves() {
        let hex = "0x0000000000000000000000000000000000000000000000000de0b6b3a76400000000000000000000000000000000000000000000000000000de0b6b3a7640000";
        let words = split_words(hex);
        assert_eq!(words.len(), 2);
        assert_eq!(decode_numeric(words[0]), decode_numeric(words[1]));
    }

    #[test]
    fn split_partial_word() {
        assert_eq!(split_words("0x"), Vec::<&str>::new());
        assert_eq!(split_words("0xabc"), vec!["abc"]);
    }
}
