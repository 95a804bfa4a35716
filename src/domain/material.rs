// ==========================================
// 金属拉拔排产系统 - 材料领域模型
// ==========================================
// 用途: 主数据只读输入（material_master 表）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Material - 材料主数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub mat_id: i64,   // 材料唯一标识
    pub mat_size: f64, // 线径（mm）
}
