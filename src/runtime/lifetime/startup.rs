use crate::cache::{ObjectCache, create_object_cache};
use crate::clients::{HttpDirectory, Mailer, UserDirectory};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub directory: Arc<dyn UserDirectory>,
    pub mailer: Arc<Mailer>,
}

/// 准备服务器启动的上下文
/// 包括存储、身份缓存以及用户目录和邮件客户端
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let cache = create_object_cache();
    warn!(
        "Identity cache initialized (ttl {}s, capacity {})",
        config.cache.identity_ttl, config.cache.max_capacity
    );

    let directory: Arc<dyn UserDirectory> = Arc::new(HttpDirectory::from_config()?);
    warn!("User directory client targets {}", config.directory.url);

    let mailer = Arc::new(Mailer::from_config()?);
    if config.notifications_enabled() {
        warn!("Email notifications enabled");
    } else {
        warn!("Email notifications disabled");
    }

    Ok(StartupContext {
        storage,
        cache,
        directory,
        mailer,
    })
}
