use crate::error::{StorageError, StorageErrorExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// On-disk compression applied after encoding.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    fn compress(self, data: Vec<u8>) -> Vec<u8> {
        match self {
            Self::None => data,
            Self::Lz4 => lz4_flex::compress_prepend_size(&data),
        }
    }

    fn decompress(self, data: &[u8]) -> Result<Cow<'_, [u8]>, StorageError> {
        match self {
            Self::None => Ok(Cow::Borrowed(data)),
            Self::Lz4 => lz4_flex::decompress_size_prepended(data)
                .map(Cow::Owned)
                .context("Lz4 decompression failed"),
        }
    }
}

pub(crate) fn encode<T: Serialize>(value: &T, compression: Compression) -> Result<Vec<u8>, StorageError> {
    let bytes = postcard::to_stdvec(value).context("Encoding record")?;
    Ok(compression.compress(bytes))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8], compression: Compression) -> Result<T, StorageError> {
    let raw = compression.decompress(bytes)?;
    postcard::from_bytes(&raw).context("Decoding record")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lz4_shrinks_repetitive_payloads() {
        let payload = vec!["ENROLLED".to_owned(); 256];
        let plain = encode(&payload, Compression::None).unwrap();
        let packed = encode(&payload, Compression::Lz4).unwrap();
        assert!(packed.len() < plain.len());

        let back: Vec<String> = decode(&packed, Compression::Lz4).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn corrupt_lz4_frame_is_reported() {
        let err = decode::<String>(&[0x10, 0, 0, 0, 0xff], Compression::Lz4).unwrap_err();
        assert_eq!(err.kind(), "Decompress");
    }
}
