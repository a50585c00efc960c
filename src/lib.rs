#![warn(missing_docs)]
/*! Decoder for Hearts of Iron IV binary save files.

A save is a length-prefixed little-endian container holding a hierarchical
key/value tree. Field names are obfuscated into 16-bit identifier tokens;
this crate maps them back through an embedded dictionary and decodes the
tree into user-defined records.

# Architecture overview

Data flows strictly bytes → tokens → decoder frames → typed values:

```text
   [ TokenReader: header + wire framing ]
                  ↓
 [ DecoderState: synthetic outer frame, ]
 [ depth tracking, peek push-back       ]
                  ↓
 [ Decoder views: sub-documents, skip,  ]
 [ kind probe                           ]
                  ↓
 [ Decode impls: primitives, strings,   ]
 [ dates, collections, derived records  ]
```

The whole save is treated as one anonymous `{ ... }` record: the decoder
synthesizes an Open before the first wire token and a Close at end of
stream, so the top level decodes like any other container.

# Example

```
use hoi4save::Date;

#[derive(Debug, Default, hoi4save_macros::Decode)]
struct Save {
    player: String,
    date: Date,
}

// "HOI4bin" followed by `player="FRA"`. 0x1000 is the dictionary id
// of "player".
let mut data = b"HOI4bin".to_vec();
data.extend_from_slice(&[0x00, 0x10]); // player
data.extend_from_slice(&[0x01, 0x00]); // =
data.extend_from_slice(&[0x0f, 0x00, 0x03, 0x00]); // quoted, length 3
data.extend_from_slice(b"FRA");

let save: Save = hoi4save::from_slice(&data)?;
assert_eq!(save.player, "FRA");
# Ok::<(), hoi4save::Error>(())
```

Records are declared with `#[derive(hoi4save_macros::Decode)]`. Field names
bind to wire keys directly, `#[hoi4(rename = "...")]` overrides the key, and
`#[hoi4(flatten)]` embeds another record's fields in place.
 */

pub mod checked;
pub mod collections;
pub mod date;
pub mod de;
pub mod decoder;
pub mod peeker;
pub mod reader;
pub mod record;
pub mod token;
pub mod tokens;

pub use crate::collections::{Duplicated, MultiMap};
pub use crate::date::{Date, DateFormat};
pub use crate::de::{Decode, from_reader, from_slice};
pub use crate::decoder::{Decoder, DecoderState, Kind};
pub use crate::peeker::Peeker;
pub use crate::reader::TokenReader;
pub use crate::token::{Token, TokenId};

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Decoding error.
///
/// [`Error::Eof`] and [`Error::EndOfObject`] are loop-termination signals:
/// a clean end of stream, and the normal end of a sub-document. Neither
/// escapes a well-formed decode as a failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Propagated unchanged from the underlying stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input does not start with a recognized seven byte magic.
    #[error("unknown header")]
    UnknownHeader,

    /// The input is a text format save, which this crate does not parse.
    #[error("text format saves are unimplemented")]
    Unimplemented,

    /// Clean end of the token stream.
    #[error("end of file")]
    Eof,

    /// Normal termination of a sub-document view.
    #[error("end of object")]
    EndOfObject,

    /// A structural position held the wrong kind of token.
    #[error("unexpected token {token} after offset {offset}")]
    Syntax {
        /// Rendering of the offending token's kind.
        token: String,
        /// Byte offset just past the offending token.
        offset: u64,
    },

    /// A token kind that the requested target cannot absorb.
    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    /// Numeric narrowing lost information.
    #[error("out of range")]
    OutOfRange,

    /// A textual date did not match the grammar or failed validation.
    #[error("invalid date {0:?}")]
    InvalidDate(String),

    /// A packed binary date did not unpack to a valid calendar value.
    #[error("invalid binary date {0}")]
    InvalidBinaryDate(i32),

    /// Type-directed failure, wrapping the underlying cause.
    #[error("cannot decode into {ty}: {source} at offset {offset}")]
    Semantic {
        /// Name of the target type.
        ty: &'static str,
        /// Byte offset just past the token that failed to bind.
        offset: u64,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// True for the two loop-termination signals.
    pub fn is_end(&self) -> bool {
        matches!(self, Error::Eof | Error::EndOfObject)
    }

    pub(crate) fn unexpected(token: &Token<'_>) -> Error {
        Error::UnexpectedToken(token.id().to_string())
    }
}
/* vim: textwidth=80
 */
