use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;

use pronounce_backend::catalog::Catalog;
use pronounce_backend::config::{Config, PracticeConfig, RateLimitConfig, WorkerConfig};
use pronounce_backend::routes::build_router;
use pronounce_backend::state::AppState;
use pronounce_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

fn test_config(temp_dir: &TempDir, api_limit: u64) -> Config {
    // 直接构造 Config，避免 set_var 在并行测试中互相干扰
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: temp_dir
            .path()
            .join("pronounce-test.sled")
            .to_string_lossy()
            .to_string(),
        jwt_secret: format!("integration-test-jwt-secret-{}", uuid::Uuid::new_v4()),
        cors_origin: "http://localhost:3001".to_string(),
        trust_proxy: false,
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: api_limit,
        },
        worker: WorkerConfig {
            is_leader: false,
            cutoffs_refresh_cron: "0 */15 * * * *".to_string(),
        },
        practice: PracticeConfig::default(),
    }
}

async fn spawn_with(api_limit: u64, catalog: Catalog, migrate: bool) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(&temp_dir, api_limit);

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    if migrate {
        store.run_migrations().expect("run migrations");
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(store, Arc::new(catalog), &config, shutdown_tx);
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_app() -> TestApp {
    spawn_with(1000, Catalog::builtin().expect("builtin catalog"), true).await
}

pub async fn spawn_test_app_with_limit(api_limit: u64) -> TestApp {
    spawn_with(api_limit, Catalog::builtin().expect("builtin catalog"), true).await
}

/// 自定义词表时跳过迁移，迁移会写入内置词表的单词评分
pub async fn spawn_test_app_with_catalog(catalog: Catalog) -> TestApp {
    spawn_with(1000, catalog, false).await
}
