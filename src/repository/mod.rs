// ==========================================
// 金属拉拔排产系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod machine_material_repo;
pub mod machine_repo;
pub mod material_repo;
pub mod pd_plan_repo;
pub mod so_item_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use machine_material_repo::MachineMaterialRepository;
pub use machine_repo::MachineRepository;
pub use material_repo::MaterialRepository;
pub use pd_plan_repo::PdPlanRepository;
pub use so_item_repo::SoItemRepository;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// PlanningRepositories - 排产仓储聚合
// ==========================================
// 一次调用共享同一个数据库连接
pub struct PlanningRepositories {
    pub machine: MachineRepository,
    pub material: MaterialRepository,
    pub machine_material: MachineMaterialRepository,
    pub so_item: SoItemRepository,
    pub pd_plan: PdPlanRepository,
}

impl PlanningRepositories {
    /// 基于共享连接创建全部仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            machine: MachineRepository::new(conn.clone()),
            material: MaterialRepository::new(conn.clone()),
            machine_material: MachineMaterialRepository::new(conn.clone()),
            so_item: SoItemRepository::new(conn.clone()),
            pd_plan: PdPlanRepository::new(conn),
        }
    }
}
