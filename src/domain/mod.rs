// ==========================================
// 金属拉拔排产系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod machine;
pub mod material;
pub mod order;
pub mod plan;

// 重导出核心类型
pub use machine::{Machine, MachineMaterial};
pub use material::Material;
pub use order::PendingJob;
pub use plan::PlanRow;
