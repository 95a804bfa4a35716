// ==========================================
// 金属拉拔排产系统 - 引擎层错误类型
// ==========================================
// 分类: 配置 / 数据 / 求解 / 日历展开 / 持久化 / 空计划
// 约束: 组级失败在编排器内捕获记录；
//       只有持久化失败与全组失败向调用方传播
// ==========================================

use thiserror::Error;

use crate::config::ConfigError;
use crate::repository::RepositoryError;
use crate::solver::SolverError;

/// 排产管线错误类型
#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("数据错误: {0}")]
    Data(String),

    #[error("求解失败: {0}")]
    Solver(#[from] SolverError),

    #[error("日历展开失败: {0}")]
    Schedule(String),

    #[error("计划持久化失败: {0}")]
    Persist(#[from] RepositoryError),

    #[error("所有机台组均未产出计划行")]
    EmptyPlan,
}

/// Result 类型别名
pub type PlanningResult<T> = Result<T, PlanningError>;
