//! Container bindings: sequences, maps and collecting lists.
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::ops::{Deref, DerefMut};

use crate::de::Decode;
use crate::decoder::Decoder;
use crate::{Error, Result};

impl<T: Decode + Default> Decode for Vec<T> {
    /// Decodes one container value, appending one element per entry.
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
        let mut sub = dec.value()?;
        let r: Result<()> = loop {
            let mut elem = T::default();
            if let Err(e) = elem.decode(&mut sub) {
                break Err(e);
            }
            self.push(elem);
        };
        match r {
            Err(Error::EndOfObject) => Ok(()),
            r => r,
        }
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: From<String> + Eq + Hash,
    V: Decode + Default,
    S: BuildHasher,
{
    /// Decodes `{ key = value ... }`. On a duplicate key the last entry
    /// wins.
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
        let mut sub = dec.value()?;
        self.clear();
        let r: Result<()> = loop {
            let mut key = String::new();
            if let Err(e) = key.decode(&mut sub) {
                break Err(e);
            }
            // The token between key and value is Equal by contract.
            if let Err(e) = sub.skip_token() {
                break Err(e);
            }
            let mut elem = V::default();
            if let Err(e) = elem.decode(&mut sub) {
                break Err(e);
            }
            self.insert(K::from(key), elem);
        };
        match r {
            Err(Error::EndOfObject) => Ok(()),
            r => r,
        }
    }
}

/// Map keeping every value seen for a key, in wire order.
#[derive(Debug, Clone)]
pub struct MultiMap<K, V>(pub HashMap<K, Vec<V>>);

impl<K, V> Default for MultiMap<K, V> {
    fn default() -> Self {
        MultiMap(HashMap::new())
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for MultiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K, V> Deref for MultiMap<K, V> {
    type Target = HashMap<K, Vec<V>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K, V> DerefMut for MultiMap<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K, V> Decode for MultiMap<K, V>
where
    K: From<String> + Eq + Hash,
    V: Decode + Default,
{
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
        let mut sub = dec.value()?;
        self.0.clear();
        let r: Result<()> = loop {
            let mut key = String::new();
            if let Err(e) = key.decode(&mut sub) {
                break Err(e);
            }
            if let Err(e) = sub.skip_token() {
                break Err(e);
            }
            let mut elem = V::default();
            if let Err(e) = elem.decode(&mut sub) {
                break Err(e);
            }
            self.0.entry(K::from(key)).or_default().push(elem);
        };
        match r {
            Err(Error::EndOfObject) => Ok(()),
            r => r,
        }
    }
}

/// Collecting list for a repeated record field.
///
/// Unlike `Vec<T>`, each occurrence of the field's key contributes exactly
/// one element; the container braces belong to the element, not the list.
#[derive(Debug, Clone, PartialEq)]
pub struct Duplicated<T>(pub Vec<T>);

impl<T> Default for Duplicated<T> {
    fn default() -> Self {
        Duplicated(Vec::new())
    }
}

impl<T> Deref for Duplicated<T> {
    type Target = Vec<T>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Duplicated<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Decode + Default> Decode for Duplicated<T> {
    fn decode(&mut self, dec: &mut Decoder<'_, '_>) -> Result<()> {
        let mut elem = T::default();
        elem.decode(dec)?;
        self.0.push(elem);
        Ok(())
    }
}

/* vim: textwidth=80
 */
