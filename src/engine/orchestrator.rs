// ==========================================
// 金属拉拔排产系统 - 排产编排器
// ==========================================
// 职责: 驱动一次完整排产调用
//       主数据 → 任务过滤 → 逐机台组规划/展开 → 事务性落库
// 红线: 组级失败就地记录并继续下一组；
//       只有持久化失败与全组失败向调用方传播
// ==========================================

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::Duration;
use rusqlite::Connection;
use tracing::{error, info};

use crate::config::{Settings, Stage, MACHINE_GROUP, TIME_SCALE};
use crate::domain::{Machine, MachineMaterial, PendingJob};
use crate::engine::duration::DurationCalculator;
use crate::engine::error::{PlanningError, PlanningResult};
use crate::engine::planner::Planner;
use crate::engine::scheduler::Scheduler;
use crate::repository::PlanningRepositories;
use crate::solver::{CpSolver, SolverConfig};

/// 交期 = 订单发布日期 + 固定交付周期（天）
const DELIVERY_PERIOD_DAYS: i64 = 14;

// ==========================================
// PlanSummary - 一次排产调用的结果摘要
// ==========================================
#[derive(Debug, Clone)]
pub struct PlanSummary {
    /// 落库的计划行数
    pub rows_written: usize,
    /// 各组目标函数值之和
    pub objective_value: i64,
    /// 未纳入本次计划的订单（升序去重）
    pub non_processed_job: Vec<i64>,
}

// ==========================================
// PlanningOrchestrator - 排产编排器
// ==========================================
pub struct PlanningOrchestrator<S: CpSolver> {
    repositories: PlanningRepositories,
    solver: S,
    settings: Settings,
}

impl<S: CpSolver> PlanningOrchestrator<S> {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - conn: 整次调用共享的数据库连接
    /// - solver: 求解引擎
    /// - settings: 启动期构造的运行设置
    pub fn new(conn: Arc<Mutex<Connection>>, solver: S, settings: Settings) -> Self {
        Self {
            repositories: PlanningRepositories::new(conn),
            solver,
            settings,
        }
    }

    /// 执行一次完整排产
    pub fn generate_production_plan(&self) -> PlanningResult<PlanSummary> {
        let machines = self
            .repositories
            .machine
            .list_all()
            .map_err(|e| PlanningError::Data(e.to_string()))?;
        let materials = self
            .repositories
            .material
            .list_all()
            .map_err(|e| PlanningError::Data(e.to_string()))?;
        let machine_material = self
            .repositories
            .machine_material
            .list_all()
            .map_err(|e| PlanningError::Data(e.to_string()))?;

        let pending_jobs = self
            .repositories
            .so_item
            .list_pending_jobs()
            .map_err(|e| PlanningError::Data(e.to_string()))?;
        info!(total = pending_jobs.len(), "待排产任务总数");

        let (pending_jobs, mut non_processed_job) =
            filter_pending_jobs(pending_jobs, &machine_material);
        info!(total = pending_jobs.len(), "过滤后的待排产任务数");

        let duration_calculator = DurationCalculator::new(&machines, &materials, &machine_material);

        let working_hours = self.settings.active_working_hours();
        let units_per_day = time_units_per_working_day(&working_hours);
        let start_working_date = self.settings.start_working_date();

        let solver_config = SolverConfig {
            time_limit: StdDuration::from_secs(self.settings.run_time_limit),
            log_search: self.settings.stage == Stage::Dev,
        };

        let mut all_rows = Vec::new();
        let mut objective_value = 0i64;

        info!("------------------------------------------------");

        for machine_types in MACHINE_GROUP {
            info!(machine_types = ?machine_types, "选择机台类型组");

            // 组内机台与可加工材料
            let relevant_machines: Vec<&Machine> = machines
                .iter()
                .filter(|m| machine_types.contains(&m.machine_type_id))
                .collect();
            let machine_ids: Vec<i64> =
                relevant_machines.iter().map(|m| m.machine_id).collect();
            let relevant_mats: HashSet<i64> = machine_material
                .iter()
                .filter(|p| machine_ids.contains(&p.machine_id))
                .map(|p| p.mat_id)
                .collect();

            // 组内任务子集，重新编号为 0..n-1
            let selected_jobs: Vec<PendingJob> = pending_jobs
                .iter()
                .filter(|j| relevant_mats.contains(&j.mat_id))
                .cloned()
                .collect();

            info!(machines = machine_ids.len(), jobs = selected_jobs.len(), "组规模");

            if selected_jobs.is_empty() {
                info!("本组没有可排产任务，跳过");
                continue;
            }

            let due_time_units: Vec<Option<i64>> = selected_jobs
                .iter()
                .map(|job| due_time_unit(job, start_working_date, units_per_day))
                .collect();
            let setup_time_units: Vec<i64> = relevant_machines
                .iter()
                .map(|m| div_ceil(m.machine_change_time, TIME_SCALE))
                .collect();

            let planner = Planner::new(
                &selected_jobs,
                &machine_ids,
                &duration_calculator,
                &due_time_units,
                &setup_time_units,
            );

            let outcome = match planner.generate(&self.solver, &solver_config) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(machine_types = ?machine_types, error = %e, "机台类型组规划失败");
                    non_processed_job.extend(selected_jobs.iter().map(|j| j.so_id));
                    continue;
                }
            };

            // 组内没有候选机台的任务记为未处理
            non_processed_job.extend(
                outcome
                    .unassignable_jobs
                    .iter()
                    .map(|&j| selected_jobs[j].so_id),
            );

            let scheduler = Scheduler::new(
                &outcome.solution,
                &selected_jobs,
                &machine_ids,
                &duration_calculator,
                start_working_date,
                working_hours.clone(),
                &self.settings.holidays,
            );

            match scheduler.expand() {
                Ok(rows) => {
                    objective_value += outcome.objective_value;
                    all_rows.extend(rows);
                }
                Err(e) => {
                    error!(machine_types = ?machine_types, error = %e, "机台类型组日历展开失败");
                    non_processed_job.extend(selected_jobs.iter().map(|j| j.so_id));
                    continue;
                }
            }

            info!("------------------------------------------------");
        }

        if all_rows.is_empty() {
            error!("所有机台组排产均失败");
            return Err(PlanningError::EmptyPlan);
        }

        info!("排产成功，写入计划 ...");
        let rows_written = self.repositories.pd_plan.replace_plan(&all_rows)?;
        info!(rows_written, "计划写入成功");

        non_processed_job.sort_unstable();
        non_processed_job.dedup();

        info!(objective_value, "整体目标函数值");
        info!(non_processed = ?non_processed_job, "未纳入本次计划的订单");

        Ok(PlanSummary {
            rows_written,
            objective_value,
            non_processed_job,
        })
    }
}

// ==========================================
// 纯函数：任务过滤与交期换算
// ==========================================

/// 待排产任务过滤
///
/// 先把全部 so_id 记入未处理清单，过滤通过的再移除：
/// - res_draft_volume > 0
/// - res_draft_volume / sale_volume > 0.03（剔除过小残量）
/// - 材料在兼容表中登记过
pub fn filter_pending_jobs(
    pending_jobs: Vec<PendingJob>,
    machine_material: &[MachineMaterial],
) -> (Vec<PendingJob>, Vec<i64>) {
    let mut non_processed: Vec<i64> = pending_jobs.iter().map(|j| j.so_id).collect();

    let known_mats: HashSet<i64> = machine_material.iter().map(|p| p.mat_id).collect();

    let survivors: Vec<PendingJob> = pending_jobs
        .into_iter()
        .filter(|job| {
            job.res_draft_volume > 0.0
                && job.res_draft_volume / job.sale_volume > 0.03
                && known_mats.contains(&job.mat_id)
        })
        .collect();

    for job in &survivors {
        if let Some(pos) = non_processed.iter().position(|&so_id| so_id == job.so_id) {
            non_processed.remove(pos);
        }
    }

    (survivors, non_processed)
}

/// 每工作日的时间单位数 = Σ ⌈时段分钟数 / TIME_SCALE⌉
pub fn time_units_per_working_day(working_hours: &[(chrono::NaiveTime, chrono::NaiveTime)]) -> i64 {
    working_hours
        .iter()
        .map(|&(start, end)| {
            let minutes = (end - start).num_minutes();
            div_ceil(minutes, TIME_SCALE)
        })
        .sum()
}

/// 任务交期（时间单位）
///
/// 截止日 = 发布日 + 交付周期；
/// due = (截止日 − 起始工作日 + 1 天) × 每日时间单位数，非正则不限交期。
pub fn due_time_unit(
    job: &PendingJob,
    start_working_date: chrono::NaiveDate,
    units_per_day: i64,
) -> Option<i64> {
    let deadline = job.so_pub_date + Duration::days(DELIVERY_PERIOD_DAYS);
    let due_days = (deadline - start_working_date).num_days() + 1;

    if due_days > 0 {
        Some(due_days * units_per_day)
    } else {
        None
    }
}

fn div_ceil(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1).div_euclid(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn job(so_id: i64, mat_id: i64, sale: f64, res_draft: f64) -> PendingJob {
        PendingJob {
            so_id,
            mat_id,
            sale_volume: sale,
            sent_volume: 0.0,
            res_volume: sale,
            draft_volume: sale - res_draft,
            res_draft_volume: res_draft,
            so_pub_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_filter_drops_nonpositive_and_tiny_and_unknown() {
        let pairs = vec![MachineMaterial { machine_id: 1, mat_id: 101 }];
        let jobs = vec![
            job(1, 101, 100.0, 50.0),  // 通过
            job(2, 101, 100.0, -5.0),  // 残量非正
            job(3, 101, 1000.0, 20.0), // 占比 2% ≤ 3%
            job(4, 999, 100.0, 50.0),  // 材料未登记
        ];

        let (survivors, non_processed) = filter_pending_jobs(jobs, &pairs);

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].so_id, 1);
        assert_eq!(non_processed, vec![2, 3, 4]);
    }

    #[test]
    fn test_time_units_per_working_day() {
        let windows = vec![
            (
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            ),
            (
                NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            ),
        ];

        // 两段各 240 分钟 → 各 16 单位
        assert_eq!(time_units_per_working_day(&windows), 32);
    }

    #[test]
    fn test_due_time_unit_positive_and_expired() {
        let j = job(1, 101, 100.0, 50.0);

        // 发布 2024-01-01，截止 2024-01-15；起始 2024-01-02 → 14 天
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(due_time_unit(&j, start, 32), Some(14 * 32));

        // 起始晚于截止 → 不限交期
        let late_start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(due_time_unit(&j, late_start, 32), None);
    }
}
