// ==========================================
// 金属拉拔排产系统 - 销售订单领域模型
// ==========================================
// 用途: 待排产任务（so ⋈ so_item 派生视图的一行）
// 约束: 过滤后保证 res_draft_volume > 0 且占比 > 3%
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PendingJob - 待排产订单项
// ==========================================
// 体积字段均为 kg：
//   res_volume       = sale_volume - sent_volume
//   res_draft_volume = sale_volume - sent_volume - draft_volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingJob {
    pub so_id: i64,            // 销售订单号
    pub mat_id: i64,           // 材料
    pub sale_volume: f64,      // 订单总量
    pub sent_volume: f64,      // 已发货量
    pub res_volume: f64,       // 剩余量
    pub draft_volume: f64,     // 已列入草案计划的量
    pub res_draft_volume: f64, // 本次可排产量
    pub so_pub_date: NaiveDate, // 订单发布日期（交期推算基准）
}
