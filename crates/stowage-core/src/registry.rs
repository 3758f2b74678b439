//! Registry - identifier → Holder の登録と管理
//!
//! # 保証
//! - identifier は一意。重複登録は `RegistryError::DuplicateIdentifier` で失敗し、
//!   既存のエントリは上書きされない
//! - 未登録の identifier の参照・削除はエラーではなく `Ok(None)`
//! - producer / codec の失敗はそのまま呼び出し側に伝播する
//!
//! # serialize / deserialize の非対称性
//! - `serialize_all` は Registry の全エントリを読む
//! - `deserialize_all` は Registry の状態を読みも書きもしない（バッチ decode のみ）
//! - Registry に登録したい場合は `deserialize_and_register` を使う

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use tracing::{debug, warn};

use crate::codec::Codec;
use crate::error::{BoxError, RegistryError};
use crate::holder::Holder;

/// Registry は identifier ごとに一つの Holder を所有する
///
/// # 使用例
/// ```ignore
/// let mut registry = Registry::new();
/// registry.register_direct("a", 1)?;
/// registry.register_reference("b", || load_from_somewhere())?;
///
/// let codec = TextCodec::<i32>::new();
/// let encoded = registry.serialize_all(&codec)?;
/// ```
pub struct Registry<T> {
    entries: HashMap<String, Holder<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 値をそのまま登録する（Direct Holder）
    pub fn register_direct(&mut self, id: impl Into<String>, value: T) -> Result<(), RegistryError> {
        self.insert(id.into(), Holder::direct(value))
    }

    /// producer を登録する（Reference Holder）。producer はここでは呼ばれない。
    pub fn register_reference<F>(
        &mut self,
        id: impl Into<String>,
        producer: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> T + 'static,
        T: 'static,
    {
        self.insert(id.into(), Holder::reference(producer))
    }

    /// 失敗しうる producer を登録する
    pub fn try_register_reference<F, E>(
        &mut self,
        id: impl Into<String>,
        producer: F,
    ) -> Result<(), RegistryError>
    where
        F: FnMut() -> Result<T, E> + 'static,
        E: Into<BoxError>,
        T: 'static,
    {
        self.insert(id.into(), Holder::try_reference(producer))
    }

    fn insert(&mut self, id: String, holder: Holder<T>) -> Result<(), RegistryError> {
        match self.entries.entry(id) {
            Entry::Occupied(occupied) => {
                warn!(id = %occupied.key(), "identifier already registered");
                Err(RegistryError::DuplicateIdentifier(occupied.key().clone()))
            }
            Entry::Vacant(vacant) => {
                debug!(id = %vacant.key(), kind = ?holder.kind(), "registered");
                vacant.insert(holder);
                Ok(())
            }
        }
    }

    /// 値を取得する。未ロードの Reference Holder はここでロードされる。
    pub fn get(&self, id: &str) -> Result<Option<&T>, RegistryError> {
        let Some(holder) = self.entries.get(id) else {
            return Ok(None);
        };
        Ok(Some(holder.get()?))
    }

    /// エントリの Holder を参照する（ロードはしない）
    pub fn holder(&self, id: &str) -> Option<&Holder<T>> {
        self.entries.get(id)
    }

    /// エントリを削除して値を返す
    ///
    /// 未ロードの Reference Holder はここでロードされます。
    /// ロードに失敗した場合でもエントリは削除済みです。
    pub fn remove(&mut self, id: &str) -> Result<Option<T>, RegistryError> {
        let Some(holder) = self.entries.remove(id) else {
            return Ok(None);
        };
        debug!(id, "removed");
        Ok(Some(holder.into_inner()?))
    }

    /// 全エントリを encode する
    ///
    /// 戻り値は集合なので、同じ文字列に encode された複数のエントリは一つにまとまり、
    /// identifier との対応も失われます。
    pub fn serialize_all<C>(&self, codec: &C) -> Result<HashSet<String>, RegistryError>
    where
        C: Codec<T> + ?Sized,
    {
        let mut serialized = HashSet::with_capacity(self.entries.len());
        for holder in self.entries.values() {
            let value = holder.get()?;
            serialized.insert(codec.encode(value)?);
        }
        debug!(
            entries = self.entries.len(),
            encoded = serialized.len(),
            "serialized all entries"
        );
        Ok(serialized)
    }

    /// decode した値を Direct Holder として登録する
    ///
    /// 重複チェックは decode より先に行うので、重複時に codec は呼ばれません。
    pub fn deserialize_and_register<C>(
        &mut self,
        id: impl Into<String>,
        data: &str,
        codec: &C,
    ) -> Result<(), RegistryError>
    where
        C: Codec<T> + ?Sized,
    {
        let id = id.into();
        if self.entries.contains_key(&id) {
            warn!(id = %id, "identifier already registered");
            return Err(RegistryError::DuplicateIdentifier(id));
        }
        let value = codec.decode(data)?;
        self.insert(id, Holder::direct(value))
    }

    /// 文字列の集合をまとめて decode する。Registry には何も登録しない。
    pub fn deserialize_all<C, I>(&self, codec: &C, data: I) -> Result<HashSet<T>, RegistryError>
    where
        C: Codec<T> + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
        T: Eq + Hash,
    {
        let mut deserialized = HashSet::new();
        for encoded in data {
            deserialized.insert(codec.decode(encoded.as_ref())?);
        }
        debug!(decoded = deserialized.len(), "deserialized batch");
        Ok(deserialized)
    }

    /// 登録済み identifier のスナップショット
    pub fn all_ids(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        debug!(entries = self.entries.len(), "cleared");
        self.entries.clear();
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
