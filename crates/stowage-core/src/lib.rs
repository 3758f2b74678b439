//! stowage-core
//!
//! 文字列 identifier で値を登録・取得する、インメモリの汎用 Registry。
//!
//! # モジュール構成
//! - **holder**: 値の即時 (direct) / 遅延 (reference) 保持
//! - **codec**: 値と文字列の相互変換（Codec trait, JsonCodec, TextCodec, FnCodec）
//! - **registry**: identifier → Holder の管理と一括 serialize / deserialize
//! - **error**: RegistryError, LoadError, CodecError
//!
//! Registry は単一スレッド・同期実行です。複数スレッドから使う場合は
//! 呼び出し側で同期してください。

pub mod codec;
pub mod error;
pub mod holder;
pub mod registry;

pub use self::codec::{Codec, FnCodec, JsonCodec, TextCodec};
pub use self::error::{BoxError, CodecError, LoadError, RegistryError};
pub use self::holder::{Holder, HolderKind, Producer};
pub use self::registry::Registry;
