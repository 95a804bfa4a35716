// ==========================================
// 金属拉拔排产系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 短周期生产计划（一次调用产出一份完整计划）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 求解层 - CP 模型与求解器接口
pub mod solver;

// 引擎层 - 排产管线（工期计算/规划/日历展开/编排）
pub mod engine;

// 配置层 - 常量与运行设置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Machine, MachineMaterial, Material, PendingJob, PlanRow};

// 引擎
pub use engine::{
    DurationCalculator, PlanSummary, Planner, PlanningError, PlanningOrchestrator,
    PlanningResult, ProductionRate, Scheduler,
};

// 求解层
pub use solver::{
    AssignedInterval, CandidateInterval, CpModel, CpSolution, CpSolver, DispatchSolver,
    SolverConfig, SolverError,
};

// 配置
pub use config::{DbConfig, Settings, Stage};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "金属拉拔排产系统";
