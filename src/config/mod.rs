// ==========================================
// 金属拉拔排产系统 - 配置层
// ==========================================
// 职责: 排产常量与启动期运行设置
// 约束: 设置在启动期构造一次，之后只读传递
// ==========================================

pub mod constants;
pub mod settings;

pub use constants::{
    DEFAULT_RUN_TIME_LIMIT, IRON_DENSITY, MACHINE_GROUP, OT, OVERTIME_HOUR_INTERVAL, TIME_SCALE,
    WEIGHT_OF_ADJUSTMENT_TIME, WEIGHT_OF_TARDY_JOB, WORKING_HOUR_INTERVAL,
};
pub use settings::{ConfigError, DbConfig, Settings, Stage};
