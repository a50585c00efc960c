//! The decode capability and its scalar implementations.
//!
//! A decode is recursive descent: every [`Decode`] implementation consumes
//! exactly one logical value from the decoder. Read errors propagate
//! untouched; a token of the wrong kind or a lossy narrowing becomes a
//! semantic error carrying the target type's name and the post-token
//! offset.
use std::io::Read;

use crate::checked;
use crate::date::Date;
use crate::decoder::{Decoder, DecoderState};
use crate::token::Token;
use crate::tokens;
use crate::{Error, Result};

/// A value that can decode itself from a save.
///
/// Implemented for primitives, strings, dates and the containers in
/// [`crate::collections`]; implemented for records with
/// `#[derive(hoi4save_macros::Decode)]`.
pub trait Decode {
    /// Consume one logical value from the decoder into `self`.
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()>;
}

/// Decode a whole save from a byte slice.
pub fn from_slice<T: Decode + Default>(data: &[u8]) -> Result<T> {
    from_reader(data)
}

/// Decode a whole save from a byte stream.
///
/// A failed decode leaves no guarantees about the target; it is returned
/// only on success.
pub fn from_reader<'r, T: Decode + Default>(r: impl Read + 'r) -> Result<T> {
    let mut state = DecoderState::new(r)?;
    let mut dec = state.decoder();
    let mut out = T::default();
    out.decode(&mut dec)?;
    Ok(out)
}

fn fail<T>(offset: u64, source: Error) -> Error {
    Error::Semantic {
        ty: std::any::type_name::<T>(),
        offset,
        source: Box::new(source),
    }
}

impl Decode for bool {
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
        let r = match dec.read_token()? {
            Token::Bool(v) => Ok(v),
            t => Err(Error::unexpected(&t)),
        };
        match r {
            Ok(v) => {
                *self = v;
                Ok(())
            }
            Err(e) => Err(fail::<Self>(dec.offset(), e)),
        }
    }
}

macro_rules! impl_decode_int {
    ($($ty:ty),* $(,)?) => {$(
        impl Decode for $ty {
            fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
                let r = match dec.read_token()? {
                    Token::U32(v) => checked::cast(v),
                    Token::U64(v) => checked::cast(v),
                    Token::I32(v) => checked::cast(v),
                    Token::I64(v) => checked::cast(v),
                    Token::F32(v) => checked::cast(v),
                    Token::F64(v) => checked::cast(v),
                    t => Err(Error::unexpected(&t)),
                };
                match r {
                    Ok(v) => {
                        *self = v;
                        Ok(())
                    }
                    Err(e) => Err(fail::<Self>(dec.offset(), e)),
                }
            }
        }
    )*};
}
impl_decode_int![u8, u16, u32, u64, usize, i8, i16, i32, i64, isize];

macro_rules! impl_decode_float {
    ($($ty:ty),* $(,)?) => {$(
        impl Decode for $ty {
            fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
                let r = match dec.read_token()? {
                    Token::U32(v) => Ok(v as $ty),
                    Token::U64(v) => Ok(v as $ty),
                    Token::I32(v) => Ok(v as $ty),
                    Token::I64(v) => Ok(v as $ty),
                    Token::F32(v) => Ok(v as $ty),
                    Token::F64(v) => Ok(v as $ty),
                    t => Err(Error::unexpected(&t)),
                };
                match r {
                    Ok(v) => {
                        *self = v;
                        Ok(())
                    }
                    Err(e) => Err(fail::<Self>(dec.offset(), e)),
                }
            }
        }
    )*};
}
impl_decode_float![f32, f64];

impl Decode for String {
    /// Accepts both string kinds directly. An identifier token resolves
    /// through the dictionary, falling back to its `<N>` rendering.
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
        let r = match dec.read_token()? {
            Token::Quoted(s) | Token::Unquoted(s) => {
                Ok(String::from_utf8_lossy(&s).into_owned())
            }
            Token::Id(id) if id.is_id() => Ok(match tokens::lookup(id) {
                Some(name) => name.to_string(),
                None => id.to_string(),
            }),
            t => Err(Error::unexpected(&t)),
        };
        match r {
            Ok(v) => {
                *self = v;
                Ok(())
            }
            Err(e) => Err(fail::<Self>(dec.offset(), e)),
        }
    }
}

impl Decode for Date {
    /// Accepts a packed binary date in any numeric kind, or the textual
    /// form in a quoted string.
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
        let r = match dec.read_token()? {
            Token::U32(v) => checked::cast(v).and_then(Date::from_binary),
            Token::U64(v) => checked::cast(v).and_then(Date::from_binary),
            Token::I32(v) => Date::from_binary(v),
            Token::I64(v) => checked::cast(v).and_then(Date::from_binary),
            Token::F32(v) => checked::cast(v).and_then(Date::from_binary),
            Token::F64(v) => checked::cast(v).and_then(Date::from_binary),
            Token::Quoted(s) => String::from_utf8_lossy(&s).parse(),
            t => Err(Error::unexpected(&t)),
        };
        match r {
            Ok(v) => {
                *self = v;
                Ok(())
            }
            Err(e) => Err(fail::<Self>(dec.offset(), e)),
        }
    }
}

/* vim: textwidth=80
 */
