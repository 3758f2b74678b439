//! Errors - Registry / Holder / Codec のエラー型
//!
//! # 分類
//! - **DuplicateIdentifier**: 既に登録済みの identifier への登録
//! - **Load**: producer の失敗（そのまま伝播）
//! - **Codec**: encode / decode の失敗（そのまま伝播）
//!
//! 未登録の identifier の参照はエラーではなく `Ok(None)` で表現します。

use thiserror::Error;

/// Caller 由来のエラーを運ぶための型消去されたエラー
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// LoadError は reference Holder の producer が返した失敗
///
/// Display / source は producer のエラーをそのまま返します。
#[derive(Debug, Error)]
#[error(transparent)]
pub struct LoadError(BoxError);

impl LoadError {
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self(source.into())
    }

    /// 元のエラーを取り出す
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

/// CodecError は Codec の encode / decode 失敗
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(BoxError),

    #[error("decode failed: {0}")]
    Decode(BoxError),
}

impl CodecError {
    pub fn encode(source: impl Into<BoxError>) -> Self {
        Self::Encode(source.into())
    }

    pub fn decode(source: impl Into<BoxError>) -> Self {
        Self::Decode(source.into())
    }
}

/// RegistryError は Registry の操作エラー
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("identifier '{0}' is already registered")]
    DuplicateIdentifier(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_identifier_message_names_the_id() {
        let err = RegistryError::DuplicateIdentifier("alpha".to_string());
        assert_eq!(err.to_string(), "identifier 'alpha' is already registered");
    }

    #[test]
    fn load_error_is_transparent() {
        let load = LoadError::new("disk on fire");
        assert_eq!(load.to_string(), "disk on fire");

        let err = RegistryError::from(load);
        assert_eq!(err.to_string(), "disk on fire");
    }

    #[test]
    fn load_error_gives_back_the_original() {
        let load = LoadError::new(std::io::Error::other("nope"));
        let inner = load.into_inner();
        let io = inner.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.to_string(), "nope");
    }

    #[test]
    fn codec_error_names_the_direction() {
        let parse = "x".parse::<i32>().unwrap_err();
        let err = RegistryError::from(CodecError::decode(parse.clone()));

        assert_eq!(err.to_string(), format!("decode failed: {parse}"));
    }
}
