//! Holder - 値を即時 (direct) または遅延 (reference) で保持する箱
//!
//! # 二つのモード
//! - **Direct**: 構築時に値を受け取る。producer は存在しない
//! - **Reference**: producer だけを保持し、最初の `get()` で一度だけ呼び出す
//!
//! # Loaded フラグ
//! キャッシュは `OnceCell<T>` で、T 自身の「空」とは独立しています。
//! producer が `None` や空文字列を返しても「ロード済み」として扱い、
//! producer を再度呼び出すことはありません。
//! 失敗した producer の結果はキャッシュされず、次の `get()` で再試行されます。

use std::cell::{OnceCell, RefCell};
use std::fmt;

use tracing::debug;

use crate::error::{BoxError, LoadError};

/// 引数なしで値を生成する関数（Reference Holder 用）
pub type Producer<T> = Box<dyn FnMut() -> Result<T, LoadError>>;

/// Holder のモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderKind {
    Direct,
    Reference,
}

enum Slot<T> {
    Direct(T),
    Reference {
        producer: RefCell<Producer<T>>,
        cache: OnceCell<T>,
    },
}

/// 一つの値を即時または遅延で保持する
///
/// # 使用例
/// ```ignore
/// let eager = Holder::direct(7);
/// let lazy = Holder::reference(|| expensive_lookup());
///
/// assert!(!lazy.is_loaded());
/// let value = lazy.get()?; // ここで初めて producer が呼ばれる
/// ```
pub struct Holder<T> {
    slot: Slot<T>,
}

impl<T> Holder<T> {
    pub fn direct(value: T) -> Self {
        Self {
            slot: Slot::Direct(value),
        }
    }

    /// 失敗しない producer から Reference Holder を作る。producer はまだ呼ばれない。
    pub fn reference<F>(mut producer: F) -> Self
    where
        F: FnMut() -> T + 'static,
        T: 'static,
    {
        Self::from_producer(Box::new(move || Ok(producer())))
    }

    /// 失敗しうる producer から Reference Holder を作る
    pub fn try_reference<F, E>(mut producer: F) -> Self
    where
        F: FnMut() -> Result<T, E> + 'static,
        E: Into<BoxError>,
        T: 'static,
    {
        Self::from_producer(Box::new(move || producer().map_err(LoadError::new)))
    }

    fn from_producer(producer: Producer<T>) -> Self {
        Self {
            slot: Slot::Reference {
                producer: RefCell::new(producer),
                cache: OnceCell::new(),
            },
        }
    }

    pub fn kind(&self) -> HolderKind {
        match self.slot {
            Slot::Direct(_) => HolderKind::Direct,
            Slot::Reference { .. } => HolderKind::Reference,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.kind() == HolderKind::Direct
    }

    /// Direct Holder は常に true
    pub fn is_loaded(&self) -> bool {
        self.peek().is_some()
    }

    /// ロード済みの値を返す。producer は呼ばない。
    pub fn peek(&self) -> Option<&T> {
        match &self.slot {
            Slot::Direct(value) => Some(value),
            Slot::Reference { cache, .. } => cache.get(),
        }
    }

    /// 値を返す。未ロードの Reference Holder はここで producer を呼ぶ。
    ///
    /// # Panics
    /// producer の中から同じ Holder の `get()` を呼ぶと panic します。
    pub fn get(&self) -> Result<&T, LoadError> {
        match &self.slot {
            Slot::Direct(value) => Ok(value),
            Slot::Reference { producer, cache } => {
                if let Some(value) = cache.get() {
                    return Ok(value);
                }

                let value = {
                    let mut producer = producer.borrow_mut();
                    let load = &mut **producer;
                    load()
                };
                match value {
                    Ok(value) => {
                        debug!("reference holder loaded");
                        Ok(cache.get_or_init(|| value))
                    }
                    Err(e) => {
                        debug!(error = %e, "reference holder failed to load");
                        Err(e)
                    }
                }
            }
        }
    }

    /// 値の所有権を取り出す（未ロードなら producer を呼ぶ）
    pub fn into_inner(self) -> Result<T, LoadError> {
        match self.slot {
            Slot::Direct(value) => Ok(value),
            Slot::Reference { producer, cache } => match cache.into_inner() {
                Some(value) => Ok(value),
                None => {
                    let mut producer = producer.into_inner();
                    producer()
                }
            },
        }
    }
}

impl<T: fmt::Display> fmt::Display for Holder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Slot::Direct(value) => write!(f, "Direct Holder [value={value}]"),
            Slot::Reference { cache, .. } => {
                write!(f, "Reference Holder [loaded={}]", cache.get().is_some())
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Holder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Holder")
            .field("kind", &self.kind())
            .field("value", &self.peek())
            .finish()
    }
}
