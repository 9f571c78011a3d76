//! # Options
//!
//! Name/value pairs carried by requests and option acknowledgements
//! (RFC 2347), and the ordered set that holds them.
//!
//! On the wire an option is two NUL-terminated strings back to back:
//!
//! ```text
//! [name...\0][value...\0]
//! ```
//!
//! An [`OptionSet`] is simply those pairs concatenated. Names compare
//! case-insensitively; inserting a name that is already present replaces the
//! value in place, so a later `blksize` never creates a second competing
//! entry and insertion order is stable.

use crate::core::wire::{encode_str, find_nul, str_len, text_from_wire};
use crate::error::constants::{
    ERR_EMPTY_OPTION_NAME, ERR_OPTION_NAME_UNTERMINATED, ERR_OPTION_VALUE_UNTERMINATED,
    FIELD_OPTION,
};
use crate::error::{CodecError, Result};
use std::fmt;

/// Transfer size option (RFC 2349)
pub const OPT_TSIZE: &str = "tsize";
/// Block size option (RFC 2348)
pub const OPT_BLKSIZE: &str = "blksize";
/// Retransmission timeout option in seconds (RFC 2349)
pub const OPT_TIMEOUT: &str = "timeout";

/// A single negotiated option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TftpOption {
    name: String,
    value: String,
}

impl TftpOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Option whose value is the decimal form of `value`.
    pub fn with_number(name: impl Into<String>, value: u64) -> Self {
        Self::new(name, value.to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_number(&mut self, value: u64) {
        self.value = value.to_string();
    }

    /// Case-insensitive name comparison
    #[inline]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Value parsed as a decimal prefix; 0 when empty or non-numeric.
    /// Saturates at `u64::MAX`.
    pub fn as_u64(&self) -> u64 {
        parse_decimal_prefix(&self.value)
    }

    /// Same as [`as_u64`](Self::as_u64), saturating at `u32::MAX`.
    pub fn as_u32(&self) -> u32 {
        u32::try_from(self.as_u64()).unwrap_or(u32::MAX)
    }

    pub fn encoded_len(&self) -> usize {
        str_len(&self.name) + str_len(&self.value)
    }

    /// Write `name\0value\0` into `buf`.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        if self.name.is_empty() {
            return Err(CodecError::Malformed(ERR_EMPTY_OPTION_NAME));
        }
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(CodecError::too_small(needed, buf.len()));
        }

        let mut off = encode_str(&self.name, buf)?;
        off += encode_str(&self.value, &mut buf[off..])?;
        Ok(off)
    }

    /// Read one option from the front of `buf`.
    ///
    /// # Errors
    /// - `Truncated` when `buf` is empty
    /// - `Malformed` when the name is empty, either terminator is missing or
    ///   either string is not UTF-8
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        if buf.is_empty() {
            return Err(CodecError::Truncated(FIELD_OPTION));
        }

        let name_end =
            find_nul(buf).ok_or(CodecError::Malformed(ERR_OPTION_NAME_UNTERMINATED))?;
        if name_end == 0 {
            return Err(CodecError::Malformed(ERR_EMPTY_OPTION_NAME));
        }

        let rest = &buf[name_end + 1..];
        let value_end =
            find_nul(rest).ok_or(CodecError::Malformed(ERR_OPTION_VALUE_UNTERMINATED))?;

        let option = Self {
            name: text_from_wire(&buf[..name_end])?,
            value: text_from_wire(&rest[..value_end])?,
        };
        Ok((option, name_end + 1 + value_end + 1))
    }
}

impl fmt::Display for TftpOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Permissive decimal parse in the style of C's `strtoull`: skips leading
/// whitespace and one `+`, reads digits until the first non-digit.
fn parse_decimal_prefix(text: &str) -> u64 {
    let trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, d| {
            acc.saturating_mul(10).saturating_add(u64::from(d - b'0'))
        })
}

/// Ordered, case-insensitively keyed collection of options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<TftpOption>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TftpOption> {
        self.entries.iter()
    }

    /// Insert `option`, replacing the value of an existing entry with the
    /// same name (keeping its position and spelling) or appending.
    pub fn insert(&mut self, option: TftpOption) {
        match self.find_mut(option.name()) {
            Some(existing) => existing.value = option.value,
            None => self.entries.push(option),
        }
    }

    pub fn insert_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(TftpOption::new(name, value));
    }

    pub fn insert_number(&mut self, name: impl Into<String>, value: u64) {
        self.insert(TftpOption::with_number(name, value));
    }

    pub fn find(&self, name: &str) -> Option<&TftpOption> {
        self.entries.iter().find(|o| o.is_named(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut TftpOption> {
        self.entries.iter_mut().find(|o| o.is_named(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Remove and return the entry with this name, preserving the order of
    /// the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<TftpOption> {
        let idx = self.entries.iter().position(|o| o.is_named(name))?;
        Some(self.entries.remove(idx))
    }

    pub fn encoded_len(&self) -> usize {
        self.entries.iter().map(TftpOption::encoded_len).sum()
    }

    /// Concatenate every option in insertion order. All-or-nothing: the
    /// first option that does not fit fails the whole encode.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let needed = self.encoded_len();
        if buf.len() < needed {
            return Err(CodecError::too_small(needed, buf.len()));
        }

        let mut off = 0;
        for option in &self.entries {
            off += option.encode(&mut buf[off..])?;
        }
        Ok(off)
    }

    /// Decode options until `buf` is exhausted. An empty `buf` is the
    /// "no options" case and succeeds with nothing consumed.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        let mut set = Self::new();
        let mut off = 0;
        while off < buf.len() {
            let (option, used) = TftpOption::decode(&buf[off..])?;
            off += used;
            set.insert(option);
        }
        Ok((set, off))
    }
}

impl<'a> IntoIterator for &'a OptionSet {
    type Item = &'a TftpOption;
    type IntoIter = std::slice::Iter<'a, TftpOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for OptionSet {
    type Item = TftpOption;
    type IntoIter = std::vec::IntoIter<TftpOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Extend<TftpOption> for OptionSet {
    fn extend<I: IntoIterator<Item = TftpOption>>(&mut self, iter: I) {
        for option in iter {
            self.insert(option);
        }
    }
}

impl FromIterator<TftpOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = TftpOption>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
