use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{
    de::{self, SeqAccess, Visitor},
    Deserializer,
};

struct Base64Visitor;

impl<'de> Visitor<'de> for Base64Visitor {
    type Value = Vec<u8>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("base64 encoded string")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        STANDARD.decode(s).map_err(|e| {
            let e = anyhow::anyhow!(e).context("Invalid base64 binary value");
            de::Error::custom(format!("{e:#}"))
        })
    }
}

struct Base64SetVisitor;

impl<'de> Visitor<'de> for Base64SetVisitor {
    type Value = Vec<Vec<u8>>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("list of base64 encoded strings")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(encoded) = seq.next_element::<String>()? {
            values.push(Base64Visitor.visit_str::<A::Error>(&encoded)?);
        }
        Ok(values)
    }
}

pub fn base64_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(Base64Visitor)
}

pub fn base64_bytes_set<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_seq(Base64SetVisitor)
}
