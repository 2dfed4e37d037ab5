//! Tolerant decoding of list responses.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use atlas_core::Result;

/// List endpoints answer with a bare array, a `{"data": [...]}` wrapper, or
/// a single object when there is exactly one record.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListPayload<T> {
    Many(Vec<T>),
    Wrapped { data: Vec<T> },
    One(T),
}

/// Decode a list body. An empty body or `null` is an empty list.
pub(crate) fn decode_list<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let payload: Option<ListPayload<T>> = serde_json::from_slice(body)?;
    Ok(match payload {
        Some(ListPayload::Many(items)) | Some(ListPayload::Wrapped { data: items }) => items,
        Some(ListPayload::One(item)) => vec![item],
        None => Vec::new(),
    })
}
