//! Token model for the binary save stream.
//!
//! Every token starts with a 16-bit little-endian kind id. Thirteen ids are
//! reserved for structural markers and primitives; every other id is an
//! identifier token naming a field through the embedded dictionary.
use std::borrow::Cow;

/// 16-bit token kind id as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub u16);

impl TokenId {
    /// Reserved sentinel. Never produced by a correct stream.
    pub const INVALID: TokenId = TokenId(0x0000);
    /// `=` between a key and its value.
    pub const EQUAL: TokenId = TokenId(0x0001);
    /// `{` opening a container.
    pub const OPEN: TokenId = TokenId(0x0003);
    /// `}` closing a container.
    pub const CLOSE: TokenId = TokenId(0x0004);
    /// 32-bit signed integer.
    pub const I32: TokenId = TokenId(0x000c);
    /// Fixed-point float, stored as i32 thousandths.
    pub const F32: TokenId = TokenId(0x000d);
    /// Single byte boolean.
    pub const BOOL: TokenId = TokenId(0x000e);
    /// Length-prefixed quoted string.
    pub const QUOTED: TokenId = TokenId(0x000f);
    /// 32-bit unsigned integer.
    pub const U32: TokenId = TokenId(0x0014);
    /// Length-prefixed unquoted string.
    pub const UNQUOTED: TokenId = TokenId(0x0017);
    /// Fixed-point float, stored as i64 in units of 1/32768.
    pub const F64: TokenId = TokenId(0x0167);
    /// 64-bit unsigned integer.
    pub const U64: TokenId = TokenId(0x029c);
    /// 64-bit signed integer.
    pub const I64: TokenId = TokenId(0x0317);

    /// True if this id is not one of the reserved kinds, and thus names a
    /// field through the dictionary.
    pub fn is_id(self) -> bool {
        !matches!(
            self,
            TokenId::INVALID
                | TokenId::EQUAL
                | TokenId::OPEN
                | TokenId::CLOSE
                | TokenId::I32
                | TokenId::F32
                | TokenId::BOOL
                | TokenId::QUOTED
                | TokenId::U32
                | TokenId::UNQUOTED
                | TokenId::F64
                | TokenId::U64
                | TokenId::I64
        )
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            TokenId::INVALID => write!(f, "invalid"),
            TokenId::EQUAL => write!(f, "="),
            TokenId::OPEN => write!(f, "{{"),
            TokenId::CLOSE => write!(f, "}}"),
            TokenId::I32 => write!(f, "i32"),
            TokenId::F32 => write!(f, "f32"),
            TokenId::BOOL => write!(f, "bool"),
            TokenId::QUOTED => write!(f, "quoted"),
            TokenId::U32 => write!(f, "u32"),
            TokenId::UNQUOTED => write!(f, "unquoted"),
            TokenId::F64 => write!(f, "f64"),
            TokenId::U64 => write!(f, "u64"),
            TokenId::I64 => write!(f, "i64"),
            TokenId(n) => write!(f, "<{n}>"),
        }
    }
}

/// One decoded token.
///
/// String payloads are raw bytes, borrowed from the reader's scratch buffer
/// when they come straight off the wire. A token must be copied (see
/// [`Token::into_owned`]) before the next read if it is to outlive it.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// `{`
    Open,
    /// `}`
    Close,
    /// `=`
    Equal,
    /// Boolean.
    Bool(bool),
    /// 32-bit unsigned integer.
    U32(u32),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit unsigned integer.
    U64(u64),
    /// 64-bit signed integer.
    I64(i64),
    /// Fixed-point 32-bit float, already scaled.
    F32(f32),
    /// Fixed-point 64-bit float, already scaled and truncated to 1e-5.
    F64(f64),
    /// Quoted string payload, verbatim bytes.
    Quoted(Cow<'a, [u8]>),
    /// Unquoted string payload, verbatim bytes.
    Unquoted(Cow<'a, [u8]>),
    /// Identifier token, resolvable through the dictionary.
    Id(TokenId),
}

impl<'a> Token<'a> {
    /// The kind id of this token.
    pub fn id(&self) -> TokenId {
        match self {
            Token::Open => TokenId::OPEN,
            Token::Close => TokenId::CLOSE,
            Token::Equal => TokenId::EQUAL,
            Token::Bool(_) => TokenId::BOOL,
            Token::U32(_) => TokenId::U32,
            Token::I32(_) => TokenId::I32,
            Token::U64(_) => TokenId::U64,
            Token::I64(_) => TokenId::I64,
            Token::F32(_) => TokenId::F32,
            Token::F64(_) => TokenId::F64,
            Token::Quoted(_) => TokenId::QUOTED,
            Token::Unquoted(_) => TokenId::UNQUOTED,
            Token::Id(id) => *id,
        }
    }

    /// Copy any borrowed payload, detaching the token from the reader.
    pub fn into_owned(self) -> Token<'static> {
        match self {
            Token::Quoted(s) => Token::Quoted(Cow::Owned(s.into_owned())),
            Token::Unquoted(s) => Token::Unquoted(Cow::Owned(s.into_owned())),
            Token::Open => Token::Open,
            Token::Close => Token::Close,
            Token::Equal => Token::Equal,
            Token::Bool(v) => Token::Bool(v),
            Token::U32(v) => Token::U32(v),
            Token::I32(v) => Token::I32(v),
            Token::U64(v) => Token::U64(v),
            Token::I64(v) => Token::I64(v),
            Token::F32(v) => Token::F32(v),
            Token::F64(v) => Token::F64(v),
            Token::Id(id) => Token::Id(id),
        }
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::Open => write!(f, "{{"),
            Token::Close => write!(f, "}}"),
            Token::Equal => write!(f, "="),
            Token::Bool(v) => write!(f, "{v}"),
            Token::U32(v) => write!(f, "{v}"),
            Token::I32(v) => write!(f, "{v}"),
            Token::U64(v) => write!(f, "{v}"),
            Token::I64(v) => write!(f, "{v}"),
            Token::F32(v) => write!(f, "{v}"),
            Token::F64(v) => write!(f, "{v}"),
            Token::Quoted(s) => write!(f, "{:?}", String::from_utf8_lossy(s)),
            Token::Unquoted(s) => write!(f, "{}", String::from_utf8_lossy(s)),
            Token::Id(id) => write!(f, "{id}"),
        }
    }
}

/* vim: textwidth=80
 */
