// ==========================================
// 金属拉拔排产系统 - 生产计划领域模型
// ==========================================
// 用途: 排产结果行（pd_plan 表），整表事务性替换
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// PlanRow - 计划明细行
// ==========================================
// 一行对应某机台上一个连续生产片段；
// 同一求解区间可能因工作时段边界被切成多行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRow {
    pub so_id: i64,                    // 销售订单号
    pub mat_id: i64,                   // 材料
    pub res_volume: f64,               // 本次排产前的可排产量（kg）
    pub batch_volume: f64,             // 本片段产出量（kg）
    pub remaining_volume: f64,         // 本片段后的滚动余量（kg，2 位小数）
    pub start_timestamp: NaiveDateTime, // 片段开始
    pub end_timestamp: NaiveDateTime,   // 片段结束
    pub machine_id: i64,               // 机台
}
