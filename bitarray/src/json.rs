//! JSON encoding.
//!
//! A [BitArray] is a JSON string holding its [core::fmt::Display] form, one `x` or `_` per bit.
//! Absence is the JSON `null`, which serde produces for `Option::<BitArray>::None`.
//!
//! [unmarshal_json] only accepts the exact bytes [marshal_json] produces: no surrounding
//! whitespace and no escape sequences inside the string.

use crate::{BitArray, Error};
use core::fmt::{self, Formatter};
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use tracing::debug;

impl Serialize for BitArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct BitArrayVisitor;

impl Visitor<'_> for BitArrayVisitor {
    type Value = BitArray;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("a non-empty string of 'x' and '_' characters")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for BitArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(BitArrayVisitor)
    }
}

/// Encodes `array` as JSON: `null` for `None`, otherwise a quoted string of `x` and `_`.
pub fn marshal_json(array: Option<&BitArray>) -> Result<Vec<u8>, Error> {
    Ok(serde_json::to_vec(&array)?)
}

/// Decodes the output of [marshal_json].
pub fn unmarshal_json(bz: &[u8]) -> Result<Option<BitArray>, Error> {
    if bz == b"null" {
        return Ok(None);
    }

    let Some(inner) = bz.strip_prefix(b"\"").and_then(|rest| rest.strip_suffix(b"\"")) else {
        debug!(len = bz.len(), "bit array json is not a quoted string");
        return Err(Error::NotQuoted);
    };
    let text = core::str::from_utf8(inner).map_err(|err| {
        debug!(len = bz.len(), ?err, "bit array json is not utf-8");
        Error::Utf8(err)
    })?;
    text.parse().map(Some).map_err(|err| {
        debug!(len = bz.len(), ?err, "invalid bit array json");
        err
    })
}
