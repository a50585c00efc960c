//! Streaming token reader for the binary wire format.
//!
//! Construction consumes the seven byte magic (`HOI4bin`). After that the
//! reader hands out one token per call, keeping a byte offset that counts
//! from the end of the header. String payloads live in an internal scratch
//! buffer that is reused on every read.
use std::borrow::Cow;
use std::io::{self, Read};

use log::debug;

use crate::token::{Token, TokenId};
use crate::{Error, Result};

const HEADER_BIN: &[u8; 7] = b"HOI4bin";
const HEADER_TXT: &[u8; 7] = b"HOI4txt";

/// Lexer over a byte stream of tokens.
pub struct TokenReader<'r> {
    r: Box<dyn Read + 'r>,
    scratch: Vec<u8>,
    offset: u64,
}

/// Fully decoded token with the string payload left in the scratch buffer.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RawToken {
    Open,
    Close,
    Equal,
    Bool(bool),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Quoted,
    Unquoted,
    Id(TokenId),
}

impl<'r> TokenReader<'r> {
    /// Open a reader over a byte stream, consuming and checking the header.
    pub fn new(r: impl Read + 'r) -> Result<Self> {
        let mut r: Box<dyn Read + 'r> = Box::new(r);
        let mut magic = [0u8; 7];
        match r.read_exact(&mut magic) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(Error::UnknownHeader);
            }
            Err(e) => return Err(e.into()),
        }
        match &magic {
            HEADER_BIN => {
                debug!("binary save header");
                Ok(Self {
                    r,
                    scratch: Vec::new(),
                    offset: 0,
                })
            }
            HEADER_TXT => Err(Error::Unimplemented),
            _ => Err(Error::UnknownHeader),
        }
    }

    /// Bytes consumed since the header.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Decode the next token. Returns [`Error::Eof`] at a clean end of
    /// stream; a short read mid-token is an I/O error.
    pub fn read_token(&mut self) -> Result<Token<'_>> {
        let raw = self.advance()?;
        Ok(self.bind(raw))
    }

    /// Consume the next token without materializing its payload.
    pub fn skip_token(&mut self) -> Result<TokenId> {
        let id = TokenId(self.read_id()?);
        match id {
            TokenId::U32 | TokenId::I32 | TokenId::F32 => self.discard(4)?,
            TokenId::U64 | TokenId::I64 | TokenId::F64 => self.discard(8)?,
            TokenId::BOOL => self.discard(1)?,
            TokenId::QUOTED | TokenId::UNQUOTED => {
                let len = self.read_u16()?;
                self.discard(u64::from(len))?;
            }
            _ => {}
        }
        Ok(id)
    }

    pub(crate) fn advance(&mut self) -> Result<RawToken> {
        let id = TokenId(self.read_id()?);
        Ok(match id {
            TokenId::OPEN => RawToken::Open,
            TokenId::CLOSE => RawToken::Close,
            TokenId::EQUAL => RawToken::Equal,
            TokenId::U32 => RawToken::U32(self.read_u32()?),
            TokenId::I32 => RawToken::I32(self.read_u32()? as i32),
            TokenId::U64 => RawToken::U64(self.read_u64()?),
            TokenId::I64 => RawToken::I64(self.read_u64()? as i64),
            TokenId::BOOL => RawToken::Bool(self.read_u8()? != 0),
            TokenId::F32 => {
                let i = self.read_u32()? as i32;
                RawToken::F32(i as f32 / 1000.0)
            }
            TokenId::F64 => {
                // Stored in units of 1/32768, truncated to five decimals.
                let i = self.read_u64()? as i64;
                RawToken::F64((i as f64 / 32768.0 * 100_000.0).floor() / 100_000.0)
            }
            TokenId::QUOTED => {
                self.read_string()?;
                RawToken::Quoted
            }
            TokenId::UNQUOTED => {
                self.read_string()?;
                RawToken::Unquoted
            }
            other => RawToken::Id(other),
        })
    }

    pub(crate) fn bind(&self, raw: RawToken) -> Token<'_> {
        match raw {
            RawToken::Open => Token::Open,
            RawToken::Close => Token::Close,
            RawToken::Equal => Token::Equal,
            RawToken::Bool(v) => Token::Bool(v),
            RawToken::U32(v) => Token::U32(v),
            RawToken::I32(v) => Token::I32(v),
            RawToken::U64(v) => Token::U64(v),
            RawToken::I64(v) => Token::I64(v),
            RawToken::F32(v) => Token::F32(v),
            RawToken::F64(v) => Token::F64(v),
            RawToken::Quoted => Token::Quoted(Cow::Borrowed(&self.scratch)),
            RawToken::Unquoted => Token::Unquoted(Cow::Borrowed(&self.scratch)),
            RawToken::Id(id) => Token::Id(id),
        }
    }

    /// Read the two byte kind id. A clean end of stream here, and only
    /// here, is [`Error::Eof`].
    fn read_id(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        let mut n = 0;
        while n < buf.len() {
            match self.r.read(&mut buf[n..]) {
                Ok(0) if n == 0 => return Err(Error::Eof),
                Ok(0) => {
                    return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
                }
                Ok(k) => n += k,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.offset += 2;
        Ok(u16::from_le_bytes(buf))
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.r.read_exact(buf)?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_string(&mut self) -> Result<()> {
        let len = self.read_u16()? as usize;
        self.scratch.resize(len, 0);
        self.r.read_exact(&mut self.scratch)?;
        self.offset += len as u64;
        Ok(())
    }

    fn discard(&mut self, n: u64) -> Result<()> {
        let copied = io::copy(&mut (&mut self.r).take(n), &mut io::sink())?;
        if copied < n {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        self.offset += n;
        Ok(())
    }
}

/* vim: textwidth=80
 */
