//! 缓存层
//!
//! 目前只缓存由 Bearer 凭证解析出的调用方身份，避免每个请求都访问用户目录服务。

pub mod object_cache;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::config::AppConfig;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    ExistsButNoValue,
}

impl<T> CacheResult<T> {
    pub fn found(self) -> Option<T> {
        match self {
            CacheResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// 字符串键值缓存
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 在 [`ObjectCache`] 之上按 JSON 存取任意类型
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> CacheResult<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(raw) => match serde_json::from_str(&raw) {
            Ok(value) => CacheResult::Found(value),
            Err(e) => {
                tracing::warn!("Discarding undecodable cache entry {}: {}", key, e);
                cache.remove(key).await;
                CacheResult::ExistsButNoValue
            }
        },
        CacheResult::NotFound => CacheResult::NotFound,
        CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => cache.insert_raw(key, raw).await,
        Err(e) => tracing::warn!("Failed to encode cache entry {}: {}", key, e),
    }
}

/// 按配置创建缓存实例
pub fn create_object_cache() -> Arc<dyn ObjectCache> {
    let config = AppConfig::get();
    Arc::new(object_cache::moka::MokaCacheWrapper::new(
        config.cache.max_capacity,
        config.cache.identity_ttl,
    ))
}
