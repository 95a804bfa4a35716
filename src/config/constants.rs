// ==========================================
// 金属拉拔排产系统 - 排产常量
// ==========================================
// 职责: 求解与日历展开共用的实现常量
// 约束: 求解器一律以时间单位计；墙钟时间一律以分钟计
// ==========================================

/// 每个时间单位对应的分钟数
///
/// 求解器中所有 start/end/size 均为该单位的整数倍。
pub const TIME_SCALE: i64 = 15;

/// 铁密度（kg/mm³），线径驱动机台的产率推算依据
pub const IRON_DENSITY: f64 = 7.85e-6;

/// 求解时间上限默认值（秒）
pub const DEFAULT_RUN_TIME_LIMIT: u64 = 60;

/// 目标函数权重：机台调整（空转）时间
pub const WEIGHT_OF_ADJUSTMENT_TIME: i64 = 1;

/// 目标函数权重：交期延误
pub const WEIGHT_OF_TARDY_JOB: i64 = 10;

/// 默认是否按加班模式排产
pub const OT: bool = false;

/// 机台类型分组
///
/// 每组独立建模求解；组内机台共享候选任务集。
pub const MACHINE_GROUP: &[&[i64]] = &[&[1, 2], &[3, 4], &[5]];

/// 常规工作时段（当日内，按顺序展开）
pub const WORKING_HOUR_INTERVAL: &[(&str, &str)] = &[("08:00", "12:00"), ("13:00", "17:00")];

/// 加班时段（OT 模式下追加在常规时段之后）
pub const OVERTIME_HOUR_INTERVAL: &[(&str, &str)] = &[("17:30", "20:30")];
