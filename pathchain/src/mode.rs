/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs;

use crate::error::ChainError;

/// Raw rwx bits for one class (user/group/other), still shifted into their
/// final position within a `u32` mode value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeBits(pub u32);

impl ModeBits {
    /// Parses a 1-3 digit octal mode string, left-zero-padding short forms
    /// exactly as `chmod`'s own octal parser does (`"7"` means `"007"`, not a
    /// shift into higher bits).
    pub fn from_octal_str(s: &str) -> Result<Self, ChainError> {
        if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(ChainError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid octal mode",
            )));
        }
        let padded = format!("{s:0>3}");
        let value = u32::from_str_radix(&padded, 8).map_err(|_| {
            ChainError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "invalid octal mode",
            ))
        })?;
        Ok(ModeBits(value))
    }

    /// Parses a symbolic `rwx`-style string. Preserves the original quirk where
    /// `'w'` only ever sets the user and group write bits, never other's.
    pub fn from_rwx_str(s: &str) -> Result<Self, ChainError> {
        let mut bits = 0u32;
        for c in s.chars() {
            bits |= match c {
                'r' => 0o444,
                'w' => 0o220,
                'x' => 0o111,
                _ => {
                    return Err(ChainError::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "invalid symbolic mode",
                    )))
                }
            };
        }
        Ok(ModeBits(bits))
    }
}

/// How a parsed [`ModeBits`] combines with a file's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeOp {
    /// `=`: the parsed bits become the mode outright.
    Reset,
    /// `-`: XOR with the current mode. Ported as-is from the original, which
    /// toggles rather than clears the named bits.
    Remove,
    /// `+`: OR with the current mode.
    Append,
}

pub fn apply_symbolic(current: u32, parsed: ModeBits, op: ModeOp) -> u32 {
    match op {
        ModeOp::Reset => parsed.0,
        ModeOp::Remove => current ^ parsed.0,
        ModeOp::Append => current | parsed.0,
    }
}

pub fn type_char(file_type: &fs::FileType) -> char {
    if file_type.is_dir() {
        'd'
    } else if file_type.is_symlink() {
        'l'
    } else {
        '-'
    }
}

/// Renders the permission portion of an `ls -l` line, e.g. `rwxr-xr--`.
pub fn rwx_string(mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    FLAGS
        .iter()
        .map(|(mask, ch)| if mode & mask != 0 { *ch } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octal_parsing_left_zero_pads_short_forms() {
        assert_eq!(ModeBits::from_octal_str("7").unwrap().0, 0o007);
        assert_eq!(ModeBits::from_octal_str("75").unwrap().0, 0o075);
        assert_eq!(ModeBits::from_octal_str("755").unwrap().0, 0o755);
    }

    #[test]
    fn octal_parsing_rejects_bad_input() {
        assert!(ModeBits::from_octal_str("").is_err());
        assert!(ModeBits::from_octal_str("8").is_err());
        assert!(ModeBits::from_octal_str("7777").is_err());
    }

    #[test]
    fn rwx_parsing_write_bit_skips_other() {
        let bits = ModeBits::from_rwx_str("w").unwrap();
        assert_eq!(bits.0, 0o220);
        assert_eq!(bits.0 & 0o002, 0);
    }

    #[test]
    fn rwx_parsing_combines_flags() {
        let bits = ModeBits::from_rwx_str("rx").unwrap();
        assert_eq!(bits.0, 0o444 | 0o111);
    }

    #[test]
    fn remove_op_is_xor_not_and_not() {
        let current = 0o755;
        let parsed = ModeBits(0o700);
        assert_eq!(apply_symbolic(current, parsed, ModeOp::Remove), current ^ 0o700);
    }

    #[test]
    fn append_and_reset_behave_as_expected() {
        assert_eq!(apply_symbolic(0o644, ModeBits(0o100), ModeOp::Append), 0o744);
        assert_eq!(apply_symbolic(0o644, ModeBits(0o755), ModeOp::Reset), 0o755);
    }

    #[test]
    fn rwx_string_renders_all_nine_bits() {
        assert_eq!(rwx_string(0o754), "rwxr-xr--");
        assert_eq!(rwx_string(0o000), "---------");
    }
}
