//! Embedded id-to-name dictionary.
//!
//! The game obfuscates field names into 16-bit identifier tokens. The table
//! mapping them back ships with the decoder as a binary blob: a little-endian
//! `u16` count, then per entry `u16 id | u8 length | length bytes of name`.
use std::sync::LazyLock;

use log::debug;
use rustc_hash::FxHashMap;

use crate::token::TokenId;

static DATA: &[u8] = include_bytes!("tokens.bin");

static TABLE: LazyLock<FxHashMap<u16, &'static str>> = LazyLock::new(|| {
    let table = parse(DATA);
    debug!("loaded {} token names", table.len());
    table
});

fn parse(data: &'static [u8]) -> FxHashMap<u16, &'static str> {
    let Some((count, mut data)) = read_u16(data) else {
        return FxHashMap::default();
    };
    let mut table =
        FxHashMap::with_capacity_and_hasher(count as usize, Default::default());
    while let Some((id, rest)) = read_u16(data) {
        let Some((&len, rest)) = rest.split_first() else {
            break;
        };
        if rest.len() < len as usize {
            break;
        }
        let (name, rest) = rest.split_at(len as usize);
        if let Ok(name) = std::str::from_utf8(name) {
            table.insert(id, name);
        }
        data = rest;
    }
    table
}

fn read_u16(data: &[u8]) -> Option<(u16, &[u8])> {
    match data {
        [a, b, rest @ ..] => Some((u16::from_le_bytes([*a, *b]), rest)),
        _ => None,
    }
}

/// Canonical name for an identifier token, or the empty string if unknown.
pub fn get(id: TokenId) -> &'static str {
    TABLE.get(&id.0).copied().unwrap_or("")
}

/// Canonical name for an identifier token, if present.
pub fn lookup(id: TokenId) -> Option<&'static str> {
    TABLE.get(&id.0).copied()
}

/* vim: textwidth=80
 */
