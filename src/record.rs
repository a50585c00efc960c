//! Record binding: compiled per-record field dispatch.
//!
//! A record type describes its fields positionally. From that description a
//! dispatch table — wire key to path of field indices — is compiled once per
//! type and cached process-wide. Decoding walks `key = value` pairs,
//! routing known keys through the table and skipping unknown values whole.
use std::any::TypeId;
use std::sync::LazyLock;

use dashmap::DashMap;
use log::trace;
use rustc_hash::FxHashMap;

use crate::de::Decode;
use crate::decoder::Decoder;
use crate::{Error, Result};

/// Compiled dispatch table: wire key to a path of field indices.
pub type FieldTable = FxHashMap<&'static str, Box<[u32]>>;

/// Declaration-order description of one field.
pub enum FieldSpec {
    /// A named field bound to `name` on the wire.
    Field {
        /// Wire key, after any rename.
        name: &'static str,
    },
    /// An embedded sub-record whose fields are spliced in at this position.
    Embedded {
        /// The sub-record's own field list.
        fields: fn() -> &'static [FieldSpec],
    },
}

/// Mutable access to one positional field.
pub enum FieldMut<'a> {
    /// A decodable leaf.
    Value(&'a mut dyn Decode),
    /// An embedded sub-record to traverse further.
    Embedded(&'a mut dyn Record),
}

/// A decodable aggregate with positional fields.
///
/// Implemented by `#[derive(hoi4save_macros::Decode)]`. The contract
/// between [`Record::fields`] and [`Record::field_mut`] is positional: index
/// `i` in the field list must resolve to the same field in the accessor,
/// with `FieldSpec::Embedded` paired with [`FieldMut::Embedded`].
pub trait Record: Decode {
    /// Field descriptions in declaration order.
    fn fields() -> &'static [FieldSpec]
    where
        Self: Sized;

    /// Access the field at a declaration-order index.
    fn field_mut(&mut self, index: usize) -> FieldMut<'_>;
}

static TABLES: LazyLock<DashMap<TypeId, &'static FieldTable>> =
    LazyLock::new(DashMap::new);

/// The dispatch table for `T`, compiled on first use.
///
/// Concurrent first uses may compile twice; the table is a pure function of
/// the type, so the last writer wins.
pub fn field_table<T: Record + 'static>() -> &'static FieldTable {
    let key = TypeId::of::<T>();
    if let Some(table) = TABLES.get(&key) {
        return *table;
    }
    let mut table = FieldTable::default();
    compile(T::fields(), &mut Vec::new(), &mut table);
    let table: &'static FieldTable = Box::leak(Box::new(table));
    TABLES.insert(key, table);
    table
}

fn compile(fields: &[FieldSpec], path: &mut Vec<u32>, table: &mut FieldTable) {
    for (index, spec) in fields.iter().enumerate() {
        path.push(index as u32);
        match spec {
            FieldSpec::Field { name } => {
                table.insert(*name, path.as_slice().into());
            }
            FieldSpec::Embedded { fields } => compile(fields(), path, table),
        }
        path.pop();
    }
}

fn locate<'a>(record: &'a mut dyn Record, path: &[u32]) -> &'a mut dyn Decode {
    let Some((&first, rest)) = path.split_first() else {
        panic!("empty field path");
    };
    match (record.field_mut(first as usize), rest) {
        (FieldMut::Value(value), []) => value,
        (FieldMut::Embedded(inner), rest) if !rest.is_empty() => locate(inner, rest),
        _ => panic!("field table does not match record shape"),
    }
}

/// Decode `{ key = value ... }` into `target`.
///
/// Known keys route to the matching field's own decoder; unknown keys have
/// their value skipped whole. This is the body behind every derived
/// [`Decode`] implementation.
pub fn decode_record<T: Record + 'static>(
    target: &mut T,
    dec: &mut Decoder<'_, '_>,
) -> Result<()> {
    let table = field_table::<T>();
    let mut sub = dec.value()?;
    let r: Result<()> = loop {
        let mut key = String::new();
        if let Err(e) = key.decode(&mut sub) {
            break Err(e);
        }
        if let Err(e) = sub.skip_token() {
            break Err(e);
        }
        match table.get(key.as_str()) {
            None => {
                trace!("skipping unknown field {key}");
                if let Err(e) = sub.skip_value() {
                    break Err(e);
                }
            }
            Some(path) => {
                let field = locate(&mut *target, path.as_ref());
                if let Err(e) = field.decode(&mut sub) {
                    break Err(e);
                }
            }
        }
    };
    match r {
        Err(Error::EndOfObject) => Ok(()),
        r => r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecoderState;

    #[derive(Debug, Default, PartialEq)]
    struct Inner {
        user: String,
        id: u32,
    }

    impl Decode for Inner {
        fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
            decode_record(self, dec)
        }
    }

    impl Record for Inner {
        fn fields() -> &'static [FieldSpec] {
            &[
                FieldSpec::Field { name: "user" },
                FieldSpec::Field { name: "id" },
            ]
        }
        fn field_mut(&mut self, index: usize) -> FieldMut<'_> {
            match index {
                0 => FieldMut::Value(&mut self.user),
                1 => FieldMut::Value(&mut self.id),
                _ => panic!("field index out of range"),
            }
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Outer {
        player: String,
        inner: Inner,
        leader: bool,
    }

    impl Decode for Outer {
        fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
            decode_record(self, dec)
        }
    }

    impl Record for Outer {
        fn fields() -> &'static [FieldSpec] {
            const FIELDS: &[FieldSpec] = &[
                FieldSpec::Field { name: "player" },
                FieldSpec::Embedded {
                    fields: <Inner as Record>::fields,
                },
                FieldSpec::Field {
                    name: "country_leader",
                },
            ];
            FIELDS
        }
        fn field_mut(&mut self, index: usize) -> FieldMut<'_> {
            match index {
                0 => FieldMut::Value(&mut self.player),
                1 => FieldMut::Embedded(&mut self.inner),
                2 => FieldMut::Value(&mut self.leader),
                _ => panic!("field index out of range"),
            }
        }
    }

    #[test]
    fn table_paths_flatten_embedded_fields() {
        let table = field_table::<Outer>();
        assert_eq!(table["player"].as_ref(), &[0]);
        assert_eq!(table["user"].as_ref(), &[1, 0]);
        assert_eq!(table["id"].as_ref(), &[1, 1]);
        assert_eq!(table["country_leader"].as_ref(), &[2]);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn table_is_cached() {
        let a: *const FieldTable = field_table::<Outer>();
        let b: *const FieldTable = field_table::<Outer>();
        assert_eq!(a, b);
    }

    #[test]
    fn dispatch_routes_and_skips() -> Result<()> {
        // player="FRA" user="x" difficulty={ 1 2 } id=9 country_leader=yes
        let mut data = b"HOI4bin".to_vec();
        data.extend_from_slice(&[0x00, 0x10, 0x01, 0x00]);
        data.extend_from_slice(&[0x0f, 0x00, 0x03, 0x00, b'F', b'R', b'A']);
        data.extend_from_slice(&[0x08, 0x10, 0x01, 0x00]);
        data.extend_from_slice(&[0x0f, 0x00, 0x01, 0x00, b'x']);
        // `difficulty` is not a field of Outer; its container is skipped.
        data.extend_from_slice(&[0x04, 0x10, 0x01, 0x00, 0x03, 0x00]);
        data.extend_from_slice(&[0x14, 0x00, 0x01, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x14, 0x00, 0x02, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x04, 0x00]);
        data.extend_from_slice(&[0x0a, 0x10, 0x01, 0x00]);
        data.extend_from_slice(&[0x14, 0x00, 0x09, 0x00, 0x00, 0x00]);
        data.extend_from_slice(&[0x09, 0x10, 0x01, 0x00, 0x0e, 0x00, 0x01]);

        let mut state = DecoderState::new(std::io::Cursor::new(data))?;
        let mut dec = state.decoder();
        let mut out = Outer::default();
        out.decode(&mut dec)?;
        assert_eq!(
            out,
            Outer {
                player: "FRA".into(),
                inner: Inner {
                    user: "x".into(),
                    id: 9,
                },
                leader: true,
            }
        );
        Ok(())
    }

    #[test]
    fn empty_record_decodes_to_defaults() -> Result<()> {
        let mut state = DecoderState::new(&b"HOI4bin"[..])?;
        let mut dec = state.decoder();
        let mut out = Outer::default();
        out.decode(&mut dec)?;
        assert_eq!(out, Outer::default());
        Ok(())
    }
}
/* vim: textwidth=80
 */
