// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC GlobalId
//!
//! A 128-bit GUID compressed to 22 characters of the IFC base-64 alphabet.
//! The first character carries the top 2 bits, the remaining 21 carry 6 bits
//! each.

use std::fmt;

use uuid::Uuid;

use crate::error::{Error, Result};

const ALPHABET: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Compressed IFC GlobalId
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId([u8; 22]);

impl GlobalId {
    /// Fresh random GlobalId
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self::from_u128(uuid.as_u128())
    }

    pub fn from_u128(value: u128) -> Self {
        let mut out = [0u8; 22];
        out[0] = ALPHABET[(value >> 126) as usize];
        for (i, slot) in out[1..].iter_mut().enumerate() {
            let shift = 120 - 6 * i;
            *slot = ALPHABET[((value >> shift) & 0x3f) as usize];
        }
        GlobalId(out)
    }

    /// Parse a 22-character GlobalId
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 22 {
            return Err(Error::InvalidGlobalId(s.to_string()));
        }
        let mut value: u128 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            let digit = ALPHABET
                .iter()
                .position(|&c| c == b)
                .ok_or_else(|| Error::InvalidGlobalId(s.to_string()))? as u128;
            if i == 0 && digit > 3 {
                return Err(Error::InvalidGlobalId(s.to_string()));
            }
            value = (value << 6) | digit;
        }
        Ok(Self::from_u128(value))
    }

    pub fn to_u128(&self) -> u128 {
        self.0.iter().fold(0u128, |acc, &b| {
            let digit = ALPHABET.iter().position(|&c| c == b).unwrap_or(0) as u128;
            (acc << 6) | digit
        })
    }

    pub fn as_str(&self) -> &str {
        // Every byte comes from ALPHABET, which is ASCII
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl Default for GlobalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlobalId({})", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(GlobalId::from_u128(0).as_str(), "0000000000000000000000");
        assert_eq!(GlobalId::from_u128(u128::MAX).as_str(), "3$$$$$$$$$$$$$$$$$$$$$");
        assert_eq!(GlobalId::from_u128(1).as_str(), "0000000000000000000001");
        assert_eq!(GlobalId::from_u128(64).as_str(), "0000000000000000000010");
    }

    #[test]
    fn test_parse_round_trip() {
        let id = GlobalId::new();
        assert_eq!(id.as_str().len(), 22);
        let parsed = GlobalId::parse(id.as_str()).unwrap();
        assert_eq!(parsed, id);

        let uuid = Uuid::new_v4();
        assert_eq!(GlobalId::from_uuid(uuid).to_u128(), uuid.as_u128());
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(GlobalId::parse("short").is_err());
        assert!(GlobalId::parse("4$$$$$$$$$$$$$$$$$$$$$").is_err());
        assert!(GlobalId::parse("000000000000000000000!").is_err());
    }

    #[test]
    fn test_unique() {
        let a = GlobalId::new();
        let b = GlobalId::new();
        assert_ne!(a, b);
    }
}
