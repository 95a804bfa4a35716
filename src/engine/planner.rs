// ==========================================
// 金属拉拔排产系统 - 规划器
// ==========================================
// 职责: 把一组 (任务, 机台) 转成 CP 模型并交给求解引擎
// 模型: 每个兼容对一个固定尺寸的可选区间变量；
//       每任务恰好在场一次；每机台带换料过渡矩阵的 no-overlap；
//       目标 = 调整时间 × W_adj + 交期延误 × W_tardy
// 边界: 组内没有任何候选机台的任务不进模型，
//       由编排器记入未处理清单
// ==========================================

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::{WEIGHT_OF_ADJUSTMENT_TIME, WEIGHT_OF_TARDY_JOB};
use crate::domain::PendingJob;
use crate::engine::duration::DurationCalculator;
use crate::engine::error::PlanningResult;
use crate::solver::{AssignedInterval, CandidateInterval, CpModel, CpSolution, CpSolver, SolverConfig};

// ==========================================
// PlanOutcome - 规划结果
// ==========================================
#[derive(Debug)]
pub struct PlanOutcome {
    /// 求解结果（任务编号已映射回组内编号）
    pub solution: CpSolution,
    /// 任务 → 完工时间单位
    pub end_time_unit_dict: HashMap<usize, i64>,
    /// 目标函数总值
    pub objective_value: i64,
    /// 交期延误分量（按完工时间反算）
    pub tardy_objective_value: i64,
    /// 调整时间分量（总值 − 延误分量）
    pub adjustment_objective_value: i64,
    /// 组内没有候选机台的任务（组内编号）
    pub unassignable_jobs: Vec<usize>,
}

// ==========================================
// Planner - 规划器
// ==========================================
pub struct Planner<'a> {
    pending_jobs: &'a [PendingJob],
    machine_ids: &'a [i64],
    duration_calculator: &'a DurationCalculator,
    /// 任务 → 交期（时间单位；None 为不限）
    due_time_units: &'a [Option<i64>],
    /// 机台 → 换料调整时间（时间单位）
    setup_time_units: &'a [i64],
}

impl<'a> Planner<'a> {
    pub fn new(
        pending_jobs: &'a [PendingJob],
        machine_ids: &'a [i64],
        duration_calculator: &'a DurationCalculator,
        due_time_units: &'a [Option<i64>],
        setup_time_units: &'a [i64],
    ) -> Self {
        Self {
            pending_jobs,
            machine_ids,
            duration_calculator,
            due_time_units,
            setup_time_units,
        }
    }

    /// 构建 CP 模型
    ///
    /// # 返回
    /// - 模型（任务编号为模型内编号）
    /// - 模型编号 → 组内编号 映射
    /// - 无候选机台的任务（组内编号）
    fn build_model(&self) -> (CpModel, Vec<usize>, Vec<usize>) {
        // 先按组内编号探测候选区间
        let mut candidates_per_job: Vec<Vec<(usize, i64)>> =
            vec![Vec::new(); self.pending_jobs.len()];

        for (job_idx, job) in self.pending_jobs.iter().enumerate() {
            for (machine_idx, &machine_id) in self.machine_ids.iter().enumerate() {
                let duration = self.duration_calculator.calculate_duration(
                    machine_id,
                    job.mat_id,
                    job.res_draft_volume,
                );

                if let Some(duration) = duration {
                    if duration > 0 {
                        candidates_per_job[job_idx].push((machine_idx, duration));
                    }
                }
            }
        }

        let model_jobs: Vec<usize> = (0..self.pending_jobs.len())
            .filter(|&j| !candidates_per_job[j].is_empty())
            .collect();
        let unassignable_jobs: Vec<usize> = (0..self.pending_jobs.len())
            .filter(|&j| candidates_per_job[j].is_empty())
            .collect();

        let mut model = CpModel::new(
            "production_planning",
            model_jobs.len(),
            self.machine_ids.len(),
            WEIGHT_OF_ADJUSTMENT_TIME,
            WEIGHT_OF_TARDY_JOB,
        );
        model.setup_time = self.setup_time_units.to_vec();

        for (model_idx, &job_idx) in model_jobs.iter().enumerate() {
            model.job_material[model_idx] = self.pending_jobs[job_idx].mat_id;
            model.due_time_unit[model_idx] = self.due_time_units[job_idx];

            for &(machine_idx, duration) in &candidates_per_job[job_idx] {
                model.add_interval(CandidateInterval {
                    job: model_idx,
                    machine: machine_idx,
                    size: duration,
                });
            }
        }

        (model, model_jobs, unassignable_jobs)
    }

    /// 建模并求解
    ///
    /// # 返回
    /// - `Ok(PlanOutcome)`: 求解成功
    /// - `Err`: 求解失败（由编排器按组回收）
    pub fn generate<S: CpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> PlanningResult<PlanOutcome> {
        info!("开始规划 ...");

        let (model, model_jobs, unassignable_jobs) = self.build_model();

        debug!(
            jobs = model.n_jobs,
            machines = model.n_machines,
            interval_vars = model.interval_count(),
            unassignable = unassignable_jobs.len(),
            "CP 模型构建完成"
        );

        let solution = solver.solve(&model, config)?;

        // 任务编号映射回组内编号
        let intervals: Vec<AssignedInterval> = solution
            .intervals
            .iter()
            .map(|itv| AssignedInterval {
                job: model_jobs[itv.job],
                machine: itv.machine,
                start: itv.start,
                end: itv.end,
            })
            .collect();

        let solution = CpSolution {
            intervals,
            objective_value: solution.objective_value,
        };

        let end_time_unit_dict = solution.end_time_unit_dict();

        // 按完工时间反算延误分量；调整分量取差值
        let tardy_time_units: i64 = end_time_unit_dict
            .iter()
            .filter_map(|(&job_idx, &end)| {
                self.due_time_units[job_idx]
                    .filter(|&due| due > 0)
                    .map(|due| (end - due).max(0))
            })
            .sum();
        let tardy_objective_value = tardy_time_units * WEIGHT_OF_TARDY_JOB;
        let adjustment_objective_value = solution.objective_value - tardy_objective_value;

        info!("规划成功");
        info!(objective_value = solution.objective_value, "目标函数值");
        info!(tardy_objective_value, "交期延误分量");
        info!(adjustment_objective_value, "调整时间分量");

        Ok(PlanOutcome {
            objective_value: solution.objective_value,
            end_time_unit_dict,
            tardy_objective_value,
            adjustment_objective_value,
            unassignable_jobs,
            solution,
        })
    }
}
