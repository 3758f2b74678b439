//! Codec - 値と文字列表現の相互変換
//!
//! Registry はエンコード形式を知りません。呼び出し側が操作ごとに
//! `Codec<T>` を渡し、Registry はそれを保持しません。
//!
//! # 提供する実装
//! - [`JsonCodec`]: serde_json によるシリアライズ
//! - [`TextCodec`]: `Display` / `FromStr` による変換（`1` ↔ `"1"`）
//! - [`FnCodec`]: encode / decode の関数ペアから作る Codec

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{BoxError, CodecError};

/// Codec は T と文字列の相互変換を提供する
///
/// `decode(encode(x))` が x と等価になることは実装側の責任で、
/// Registry は検査しません。
///
/// # 使用例
/// ```ignore
/// struct Upper;
///
/// impl Codec<String> for Upper {
///     fn encode(&self, value: &String) -> Result<String, CodecError> {
///         Ok(value.to_uppercase())
///     }
///     fn decode(&self, data: &str) -> Result<String, CodecError> {
///         Ok(data.to_lowercase())
///     }
/// }
/// ```
pub trait Codec<T> {
    fn encode(&self, value: &T) -> Result<String, CodecError>;
    fn decode(&self, data: &str) -> Result<T, CodecError>;
}

impl<T, C: Codec<T> + ?Sized> Codec<T> for &C {
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        (**self).encode(value)
    }

    fn decode(&self, data: &str) -> Result<T, CodecError> {
        (**self).decode(data)
    }
}

/// JsonCodec は serde_json で T を JSON 文字列に変換する
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JsonCodec")
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        serde_json::to_string(value).map_err(CodecError::encode)
    }

    fn decode(&self, data: &str) -> Result<T, CodecError> {
        serde_json::from_str(data).map_err(CodecError::decode)
    }
}

/// TextCodec は `Display` で encode し `FromStr` で decode する
pub struct TextCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> TextCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TextCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TextCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TextCodec")
    }
}

impl<T> Codec<T> for TextCodec<T>
where
    T: fmt::Display + FromStr,
    T::Err: Into<BoxError>,
{
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        Ok(value.to_string())
    }

    fn decode(&self, data: &str) -> Result<T, CodecError> {
        data.parse().map_err(CodecError::decode)
    }
}

/// FnCodec は encode / decode のクロージャから Codec を作る
///
/// ```ignore
/// let codec = FnCodec::new(
///     |v: &u8| Ok(format!("{v:02x}")),
///     |s: &str| u8::from_str_radix(s, 16).map_err(CodecError::decode),
/// );
/// ```
pub struct FnCodec<T, E, D> {
    encode: E,
    decode: D,
    _marker: PhantomData<fn() -> T>,
}

impl<T, E, D> FnCodec<T, E, D>
where
    E: Fn(&T) -> Result<String, CodecError>,
    D: Fn(&str) -> Result<T, CodecError>,
{
    pub fn new(encode: E, decode: D) -> Self {
        Self {
            encode,
            decode,
            _marker: PhantomData,
        }
    }
}

impl<T, E, D> Codec<T> for FnCodec<T, E, D>
where
    E: Fn(&T) -> Result<String, CodecError>,
    D: Fn(&str) -> Result<T, CodecError>,
{
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        (self.encode)(value)
    }

    fn decode(&self, data: &str) -> Result<T, CodecError> {
        (self.decode)(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        name: String,
        size: u32,
    }

    #[test]
    fn json_codec_encodes_structs() {
        let codec = JsonCodec::<Widget>::new();
        let widget = Widget {
            name: "bolt".to_string(),
            size: 3,
        };

        let encoded = codec.encode(&widget).unwrap();
        assert_eq!(encoded, r#"{"name":"bolt","size":3}"#);
        assert_eq!(codec.decode(&encoded).unwrap(), widget);
    }

    #[test]
    fn json_codec_reports_decode_failures() {
        let codec = JsonCodec::<Widget>::new();
        let err = codec.decode("{not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[rstest]
    #[case::zero(0, "0")]
    #[case::positive(42, "42")]
    #[case::negative(-7, "-7")]
    fn text_codec_uses_display(#[case] value: i64, #[case] expected: &str) {
        let codec = TextCodec::<i64>::new();
        assert_eq!(codec.encode(&value).unwrap(), expected);
        assert_eq!(codec.decode(expected).unwrap(), value);
    }

    #[rstest]
    #[case::empty("")]
    #[case::word("forty-two")]
    #[case::float("1.5")]
    fn text_codec_rejects_garbage(#[case] data: &str) {
        let codec = TextCodec::<i64>::new();
        assert!(matches!(codec.decode(data), Err(CodecError::Decode(_))));
    }

    #[test]
    fn fn_codec_calls_its_closures() {
        let codec = FnCodec::new(
            |v: &u8| Ok(format!("{v:02x}")),
            |s: &str| u8::from_str_radix(s, 16).map_err(CodecError::decode),
        );

        assert_eq!(codec.encode(&255).unwrap(), "ff");
        assert_eq!(codec.decode("0a").unwrap(), 10);
    }

    #[test]
    fn fn_codec_can_fail_on_encode() {
        let codec = FnCodec::new(
            |_: &u8| Err(CodecError::encode("read-only")),
            |s: &str| s.parse::<u8>().map_err(CodecError::decode),
        );

        let err = codec.encode(&1).unwrap_err();
        assert_eq!(err.to_string(), "encode failed: read-only");
    }

    #[test]
    fn codec_by_reference() {
        fn roundtrip<C: Codec<i32>>(codec: C) -> i32 {
            let encoded = codec.encode(&5).unwrap();
            codec.decode(&encoded).unwrap()
        }

        let codec = TextCodec::<i32>::new();
        assert_eq!(roundtrip(&codec), 5);
    }
}
