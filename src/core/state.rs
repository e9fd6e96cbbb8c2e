use std::sync::Arc;

use anyhow::Context;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::bookings::BookingEngine;
use crate::core::Config;
use crate::db::DbService;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是前台节点的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | engine | Arc<BookingEngine> | 预订引擎（命令处理单点） |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// 预订引擎
    pub engine: Arc<BookingEngine>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 方法代替
    pub fn new(config: Config, db: Surreal<Db>, engine: Arc<BookingEngine>) -> Self {
        Self { config, db, engine }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/frontdesk.db)
    /// 3. 预订引擎 (仓储注入一次，运行期不再解析)
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config
            .ensure_work_dir_structure()
            .context("Failed to create work directory structure")?;

        let db_path = config.database_dir().join("frontdesk.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .context("Failed to initialize database")?;
        let db = db_service.db;

        let engine = Arc::new(BookingEngine::with_db(db.clone()));

        Ok(Self::new(config.clone(), db, engine))
    }

    /// 初始化内存态服务器 (测试/临时运行)
    pub async fn initialize_in_memory(config: &Config) -> anyhow::Result<Self> {
        let db_service = DbService::memory()
            .await
            .context("Failed to initialize in-memory database")?;
        let db = db_service.db;
        let engine = Arc::new(BookingEngine::with_db(db.clone()));
        Ok(Self::new(config.clone(), db, engine))
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
