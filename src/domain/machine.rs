// ==========================================
// 金属拉拔排产系统 - 机台领域模型
// ==========================================
// 用途: 主数据只读输入（machine_master / machine_material 表）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Machine - 机台主数据
// ==========================================
// 两种产率口径：
// - machine_weight_hour > 0 时按小时定额（kg/h）
// - 否则按线径驱动（速度倍率 × 截面积推算）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub machine_id: i64,          // 机台唯一标识
    pub machine_type_id: i64,     // 机台类型（分组求解依据）
    pub machine_weight_hour: f64, // 小时定额产量（kg/h，0 表示线径驱动）
    pub machine_spd_mul: f64,     // 速度倍率（线径驱动机台）
    pub machine_change_time: i64, // 换料调整时间（分钟）
}

impl Machine {
    /// 是否按小时定额产量计算工期
    pub fn is_weight_rated(&self) -> bool {
        self.machine_weight_hour > 0.0
    }
}

// ==========================================
// MachineMaterial - 机台↔材料兼容关系
// ==========================================
// 任务只能排到其材料在此表中登记的机台上
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineMaterial {
    pub machine_id: i64, // 机台
    pub mat_id: i64,     // 可加工的材料
}
