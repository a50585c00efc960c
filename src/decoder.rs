//! Decoder state and cursor views over the token stream.
//!
//! The state wraps the reader in a synthetic outer frame: the first token it
//! delivers is always Open and the last is always Close, neither of which is
//! on the wire. The whole save thus decodes like one anonymous record and
//! the binding layer needs no special case for the braceless top level.
use std::io::Read;

use crate::peeker::Peeker;
use crate::reader::{RawToken, TokenReader};
use crate::token::{Token, TokenId};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    PreOpen,
    Normal,
    PostClose,
}

/// Shared decoding state: the reader, the synthetic frame automaton, the
/// running depth and the peek push-back buffer.
///
/// Exactly one state exists per decode. All reading goes through [`Decoder`]
/// views handed out by [`DecoderState::decoder`].
pub struct DecoderState<'r> {
    pub(crate) reader: TokenReader<'r>,
    /// LIFO push-back of (token, post-read offset) pairs, filled by a
    /// closing [`Peeker`].
    pub(crate) replay: Vec<(Token<'static>, u64)>,
    pub(crate) offset: u64,
    pub(crate) depth: u32,
    mode: Mode,
}

impl<'r> DecoderState<'r> {
    /// Open a decoder over a byte stream. Reads exactly the header.
    pub fn new(r: impl Read + 'r) -> Result<Self> {
        Ok(Self {
            reader: TokenReader::new(r)?,
            replay: Vec::new(),
            offset: 0,
            depth: 0,
            mode: Mode::PreOpen,
        })
    }

    /// The root view over this state.
    pub fn decoder(&mut self) -> Decoder<'_, 'r> {
        Decoder {
            state: self,
            min_depth: 0,
            end_of_object: false,
        }
    }

    fn bump(&mut self, id: TokenId) {
        match id {
            TokenId::OPEN => self.depth += 1,
            TokenId::CLOSE => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }

    /// Next token plus the depth after it. The push-back buffer is served
    /// first; its entries restore the offset recorded at their original
    /// read.
    pub(crate) fn read_token(&mut self) -> Result<(Token<'_>, u32)> {
        if let Some((t, off)) = self.replay.pop() {
            self.offset = off;
            self.bump(t.id());
            let depth = self.depth;
            return Ok((t, depth));
        }
        match self.mode {
            Mode::PreOpen => {
                self.mode = Mode::Normal;
                self.depth += 1;
                self.offset = self.reader.offset();
                Ok((Token::Open, self.depth))
            }
            Mode::Normal => {
                let raw = match self.reader.advance() {
                    Ok(raw) => raw,
                    Err(Error::Eof) => {
                        self.mode = Mode::PostClose;
                        self.depth = self.depth.saturating_sub(1);
                        self.offset = self.reader.offset();
                        return Ok((Token::Close, self.depth));
                    }
                    Err(e) => return Err(e),
                };
                self.offset = self.reader.offset();
                match raw {
                    RawToken::Open => self.depth += 1,
                    RawToken::Close => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
                Ok((self.reader.bind(raw), self.depth))
            }
            Mode::PostClose => Err(Error::Eof),
        }
    }

    pub(crate) fn skip_token(&mut self) -> Result<(TokenId, u32)> {
        if let Some((t, off)) = self.replay.pop() {
            self.offset = off;
            let id = t.id();
            self.bump(id);
            return Ok((id, self.depth));
        }
        match self.mode {
            Mode::PreOpen => {
                self.mode = Mode::Normal;
                self.depth += 1;
                self.offset = self.reader.offset();
                Ok((TokenId::OPEN, self.depth))
            }
            Mode::Normal => match self.reader.skip_token() {
                Ok(id) => {
                    self.offset = self.reader.offset();
                    self.bump(id);
                    Ok((id, self.depth))
                }
                Err(Error::Eof) => {
                    self.mode = Mode::PostClose;
                    self.depth = self.depth.saturating_sub(1);
                    self.offset = self.reader.offset();
                    Ok((TokenId::CLOSE, self.depth))
                }
                Err(e) => Err(e),
            },
            Mode::PostClose => Err(Error::Eof),
        }
    }
}

/// Cursor over a [`DecoderState`].
///
/// A view with `min_depth == 0` spans the whole stream. A sub-view handed
/// out by [`Decoder::value`] is pinned: once the shared depth falls below
/// its pin it latches and every further read yields
/// [`Error::EndOfObject`] — the normal way a container decode loop ends.
pub struct Decoder<'a, 'r> {
    state: &'a mut DecoderState<'r>,
    min_depth: u32,
    end_of_object: bool,
}

/// Shape of the next logical value, as probed by [`Decoder::peek_kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A single atomic token.
    Value,
    /// A container without key/value structure.
    Array,
    /// A container of `key = value` pairs.
    Map,
}

impl Kind {
    /// True for the two container shapes.
    pub fn is_object(self) -> bool {
        matches!(self, Kind::Array | Kind::Map)
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Kind::Value => write!(f, "value"),
            Kind::Array => write!(f, "array"),
            Kind::Map => write!(f, "map"),
        }
    }
}

impl<'a, 'r> Decoder<'a, 'r> {
    /// Byte offset just past the most recently consumed token.
    pub fn offset(&self) -> u64 {
        self.state.offset
    }

    /// Count of currently unclosed Opens, including the synthetic frame.
    pub fn depth(&self) -> u32 {
        self.state.depth
    }

    /// Read one token.
    pub fn read_token(&mut self) -> Result<Token<'_>> {
        if self.min_depth == 0 {
            let (t, _) = self.state.read_token()?;
            return Ok(t);
        }
        if self.end_of_object {
            return Err(Error::EndOfObject);
        }
        // A failed read leaves the depth untouched, so capturing it up
        // front covers both arms below.
        let depth_on_error = self.state.depth;
        match self.state.read_token() {
            Ok((t, depth)) => {
                if depth < self.min_depth {
                    self.end_of_object = true;
                    Err(Error::EndOfObject)
                } else {
                    Ok(t)
                }
            }
            Err(e) => {
                if depth_on_error < self.min_depth {
                    self.end_of_object = true;
                    Err(Error::EndOfObject)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Consume one token without materializing its payload.
    pub fn skip_token(&mut self) -> Result<TokenId> {
        if self.min_depth == 0 {
            let (id, _) = self.state.skip_token()?;
            return Ok(id);
        }
        if self.end_of_object {
            return Err(Error::EndOfObject);
        }
        match self.state.skip_token() {
            Ok((id, depth)) => {
                if depth < self.min_depth {
                    self.end_of_object = true;
                    Err(Error::EndOfObject)
                } else {
                    Ok(id)
                }
            }
            Err(e) => {
                if self.state.depth < self.min_depth {
                    self.end_of_object = true;
                    Err(Error::EndOfObject)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Append every remaining token of this view to `buf` (cleared first).
    /// End of object and end of file terminate without error.
    pub fn read_all(&mut self, buf: &mut Vec<Token<'static>>) -> Result<()> {
        buf.clear();
        loop {
            match self.read_token() {
                Ok(t) => buf.push(t.into_owned()),
                Err(e) if e.is_end() => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    /// Discard every remaining token of this view.
    pub fn skip_all(&mut self) -> Result<()> {
        loop {
            match self.skip_token() {
                Ok(_) => {}
                Err(e) if e.is_end() => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    /// Enter a container value. The next token must be Open; it is consumed
    /// and the returned sub-view is pinned at the new depth.
    pub fn value(&mut self) -> Result<Decoder<'_, 'r>> {
        let bad = match self.read_token()? {
            Token::Open => None,
            t => Some(t.id().to_string()),
        };
        if let Some(token) = bad {
            return Err(Error::Syntax {
                token,
                offset: self.offset(),
            });
        }
        let min_depth = self.state.depth;
        Ok(Decoder {
            state: &mut *self.state,
            min_depth,
            end_of_object: false,
        })
    }

    /// Advance past one complete logical value: a single token for atoms,
    /// everything up to the matching Close for containers.
    pub fn skip_value(&mut self) -> Result<()> {
        if !matches!(self.read_token()?, Token::Open) {
            return Ok(());
        }
        let min_depth = self.state.depth;
        let mut sub = Decoder {
            state: &mut *self.state,
            min_depth,
            end_of_object: false,
        };
        sub.skip_all()
    }

    /// Open a look-ahead session. While the peeker lives the decoder is
    /// inaccessible; dropping it rewinds everything it consumed.
    pub fn peek(&mut self) -> Peeker<'_, 'r> {
        Peeker::new(&mut *self.state)
    }

    /// Probe the shape of the next logical value without consuming it.
    pub fn peek_kind(&mut self) -> Result<Kind> {
        let mut p = self.peek();
        if !matches!(p.read_token()?, Token::Open) {
            return Ok(Kind::Value);
        }
        p.skip_token()?;
        if matches!(p.read_token()?, Token::Equal) {
            Ok(Kind::Map)
        } else {
            Ok(Kind::Array)
        }
    }
}

/* vim: textwidth=80
 */
