use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{ser::SerializeSeq, Serializer};

pub fn base64_bytes<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&STANDARD.encode(value))
}

pub fn base64_bytes_set<S>(values: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        seq.serialize_element(&STANDARD.encode(value))?;
    }
    seq.end()
}
