// ==========================================
// 金属拉拔排产系统 - 工期/批量计算器
// ==========================================
// 职责: 在 (机台, 材料) 兼容对上做双向换算
//       剩余量 → 整数时间单位（向上取整，保证排期不被低估）
//       时间单位 → 产出量（不取整）
// 两种产率口径合并为一个带标签的枚举
// ==========================================

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use crate::config::{IRON_DENSITY, TIME_SCALE};
use crate::domain::{Machine, MachineMaterial, Material};

// ==========================================
// ProductionRate - 机台产率口径
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductionRate {
    /// 按小时定额产量（kg/h）
    WeightRated { kg_per_hour: f64 },
    /// 线径驱动：速度倍率 × 截面积推算出的单位产量（kg/时间单位）
    DiameterDriven { kg_per_unit: f64 },
}

// ==========================================
// DurationCalculator - 工期/批量计算器
// ==========================================
// 索引一次构建，按 id 查询
pub struct DurationCalculator {
    machines: HashMap<i64, Machine>,
    materials: HashMap<i64, Material>,
    compatible: HashSet<(i64, i64)>,
}

impl DurationCalculator {
    pub fn new(machines: &[Machine], materials: &[Material], pairs: &[MachineMaterial]) -> Self {
        Self {
            machines: machines
                .iter()
                .map(|m| (m.machine_id, m.clone()))
                .collect(),
            materials: materials.iter().map(|m| (m.mat_id, m.clone())).collect(),
            compatible: pairs
                .iter()
                .map(|p| (p.machine_id, p.mat_id))
                .collect(),
        }
    }

    /// (机台, 材料) 是否登记为兼容
    pub fn is_compatible(&self, machine_id: i64, mat_id: i64) -> bool {
        self.compatible.contains(&(machine_id, mat_id))
    }

    /// 兼容对的产率口径；不兼容或主数据缺失返回 None
    fn rate(&self, machine_id: i64, mat_id: i64) -> Option<ProductionRate> {
        if !self.is_compatible(machine_id, mat_id) {
            return None;
        }

        let machine = self.machines.get(&machine_id)?;
        let material = self.materials.get(&mat_id)?;

        if machine.is_weight_rated() {
            Some(ProductionRate::WeightRated {
                kg_per_hour: machine.machine_weight_hour,
            })
        } else {
            let diameter = material.mat_size / 1000.0;
            let kg_per_unit = IRON_DENSITY * machine.machine_spd_mul * PI * diameter * diameter
                / 4.0
                * 60.0
                * TIME_SCALE as f64;

            Some(ProductionRate::DiameterDriven { kg_per_unit })
        }
    }

    /// 剩余量（kg）→ 整数时间单位，向上取整
    pub fn calculate_duration(&self, machine_id: i64, mat_id: i64, pending_volume: f64) -> Option<i64> {
        match self.rate(machine_id, mat_id)? {
            ProductionRate::WeightRated { kg_per_hour } => {
                Some((pending_volume / kg_per_hour * 60.0 / TIME_SCALE as f64).ceil() as i64)
            }
            ProductionRate::DiameterDriven { kg_per_unit } => {
                Some((pending_volume / kg_per_unit).ceil() as i64)
            }
        }
    }

    /// 时间单位 → 产出量（kg），不取整
    pub fn calculate_weight(&self, machine_id: i64, mat_id: i64, time_units: i64) -> Option<f64> {
        match self.rate(machine_id, mat_id)? {
            ProductionRate::WeightRated { kg_per_hour } => {
                Some(time_units as f64 * TIME_SCALE as f64 / 60.0 * kg_per_hour)
            }
            ProductionRate::DiameterDriven { kg_per_unit } => {
                Some(time_units as f64 * kg_per_unit)
            }
        }
    }
}
