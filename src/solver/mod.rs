// ==========================================
// 金属拉拔排产系统 - 求解层
// ==========================================
// 职责: 把排产问题表达为 CP 模型数据，并通过
//       单一 CpSolver 接口对接具体求解引擎
// 模型: 每个 (任务, 机台) 兼容对一个可选区间变量，
//       每台机台一个带换料过渡矩阵的序列
// ==========================================

pub mod dispatch;

pub use dispatch::DispatchSolver;

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

// ==========================================
// CandidateInterval - 候选区间变量
// ==========================================
// 可选（求解器可置为缺席），尺寸固定为该任务在该机台上的工期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateInterval {
    pub job: usize,     // 任务编号（组内 0..n_jobs）
    pub machine: usize, // 机台编号（组内 0..n_machines）
    pub size: i64,      // 工期（时间单位）
}

// ==========================================
// CpModel - 排产 CP 模型
// ==========================================
#[derive(Debug, Clone)]
pub struct CpModel {
    pub name: String,
    pub n_jobs: usize,
    pub n_machines: usize,
    /// 全部候选区间（不兼容对没有对应项）
    pub intervals: Vec<CandidateInterval>,
    /// 任务 → 材料（换料过渡矩阵依据）
    pub job_material: Vec<i64>,
    /// 任务 → 交期（时间单位；None 或 ≤0 视为不限交期）
    pub due_time_unit: Vec<Option<i64>>,
    /// 机台 → 换料调整时间（时间单位）
    pub setup_time: Vec<i64>,
    /// 目标函数权重：调整（空转）时间
    pub weight_adjustment: i64,
    /// 目标函数权重：交期延误
    pub weight_tardy: i64,
}

impl CpModel {
    pub fn new(
        name: impl Into<String>,
        n_jobs: usize,
        n_machines: usize,
        weight_adjustment: i64,
        weight_tardy: i64,
    ) -> Self {
        Self {
            name: name.into(),
            n_jobs,
            n_machines,
            intervals: Vec::new(),
            job_material: vec![0; n_jobs],
            due_time_unit: vec![None; n_jobs],
            setup_time: vec![0; n_machines],
            weight_adjustment,
            weight_tardy,
        }
    }

    pub fn add_interval(&mut self, interval: CandidateInterval) {
        self.intervals.push(interval);
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// 任务 j 的全部候选区间
    pub fn candidates_of(&self, job: usize) -> impl Iterator<Item = &CandidateInterval> {
        self.intervals.iter().filter(move |itv| itv.job == job)
    }

    /// 在机台 m 上持有候选区间的任务（升序）
    pub fn jobs_on_machine(&self, machine: usize) -> Vec<usize> {
        let mut jobs: Vec<usize> = self
            .intervals
            .iter()
            .filter(|itv| itv.machine == machine)
            .map(|itv| itv.job)
            .collect();
        jobs.sort_unstable();
        jobs.dedup();
        jobs
    }

    /// 机台 m 上从任务 a 切换到任务 b 的过渡时间（时间单位）
    ///
    /// 同材料为 0，否则为该机台的换料调整时间。
    pub fn transition_time(&self, machine: usize, from_job: usize, to_job: usize) -> i64 {
        if self.job_material[from_job] == self.job_material[to_job] {
            0
        } else {
            self.setup_time[machine]
        }
    }

    /// 机台 m 的换料过渡矩阵
    ///
    /// 仅对在 m 上持有候选区间的任务构造（方阵，行列同序）；
    /// 候选任务数不足 2 时返回 None，退化为普通 no-overlap。
    pub fn setup_matrix(&self, machine: usize) -> Option<Vec<Vec<i64>>> {
        let jobs = self.jobs_on_machine(machine);
        if jobs.len() < 2 {
            return None;
        }

        let matrix = jobs
            .iter()
            .map(|&a| {
                jobs.iter()
                    .map(|&b| self.transition_time(machine, a, b))
                    .collect()
            })
            .collect();

        Some(matrix)
    }

    /// 计算一组已赋值区间的目标函数值
    ///
    /// 调整分量: 每台机台上按 start 排序后相邻区间的间隔之和（末位无后继不计）。
    /// 延误分量: 每个在场区间 max(0, end - due)，无交期或交期 ≤0 不计。
    pub fn evaluate(&self, intervals: &[AssignedInterval]) -> i64 {
        let mut adjustment = 0;
        for machine in 0..self.n_machines {
            let mut on_machine: Vec<&AssignedInterval> = intervals
                .iter()
                .filter(|itv| itv.machine == machine)
                .collect();
            on_machine.sort_by_key(|itv| itv.start);

            for pair in on_machine.windows(2) {
                adjustment += pair[1].start - pair[0].end;
            }
        }

        let mut tardiness = 0;
        for itv in intervals {
            if let Some(due) = self.due_time_unit[itv.job] {
                if due > 0 {
                    tardiness += (itv.end - due).max(0);
                }
            }
        }

        adjustment * self.weight_adjustment + tardiness * self.weight_tardy
    }
}

// ==========================================
// CpSolution - 求解结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AssignedInterval {
    pub job: usize,
    pub machine: usize,
    pub start: i64, // 时间单位
    pub end: i64,   // 时间单位
}

#[derive(Debug, Clone)]
pub struct CpSolution {
    /// 在场区间（每个任务恰好一个）
    pub intervals: Vec<AssignedInterval>,
    pub objective_value: i64,
}

impl CpSolution {
    /// 任务 → 完工时间单位
    pub fn end_time_unit_dict(&self) -> HashMap<usize, i64> {
        self.intervals
            .iter()
            .map(|itv| (itv.job, itv.end))
            .collect()
    }

    /// 机台 m 上的在场区间，按 start 升序
    pub fn intervals_on_machine(&self, machine: usize) -> Vec<&AssignedInterval> {
        let mut on_machine: Vec<&AssignedInterval> = self
            .intervals
            .iter()
            .filter(|itv| itv.machine == machine)
            .collect();
        on_machine.sort_by_key(|itv| itv.start);
        on_machine
    }
}

// ==========================================
// SolverConfig / CpSolver - 求解引擎接口
// ==========================================
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// 求解时间上限
    pub time_limit: Duration,
    /// 是否输出搜索日志
    pub log_search: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(crate::config::DEFAULT_RUN_TIME_LIMIT),
            log_search: false,
        }
    }
}

/// 求解引擎接口
///
/// 实现方必须满足的解契约：
/// - 每个任务恰好在一台机台上在场
/// - 同机台区间两两不重叠，且相邻间隔 ≥ 过渡时间
/// - objective_value 与 CpModel::evaluate 一致
pub trait CpSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> Result<CpSolution, SolverError>;
}

/// 求解层错误类型
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("任务 {0} 在本组内没有任何候选机台")]
    NoCandidate(usize),

    #[error("求解超时，未找到可行解")]
    TimeLimitExceeded,

    #[error("模型无可行解: {0}")]
    Infeasible(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_job_model() -> CpModel {
        let mut model = CpModel::new("test", 2, 2, 1, 10);
        model.job_material = vec![101, 102];
        model.setup_time = vec![2, 3];
        model.add_interval(CandidateInterval { job: 0, machine: 0, size: 4 });
        model.add_interval(CandidateInterval { job: 1, machine: 0, size: 2 });
        model.add_interval(CandidateInterval { job: 1, machine: 1, size: 2 });
        model
    }

    #[test]
    fn test_transition_time_same_material_is_zero() {
        let mut model = two_job_model();
        assert_eq!(model.transition_time(0, 0, 1), 2);

        model.job_material[1] = 101;
        assert_eq!(model.transition_time(0, 0, 1), 0);
    }

    #[test]
    fn test_setup_matrix_square_over_machine_jobs() {
        let model = two_job_model();

        // 机台 0 上有任务 0 和 1
        let matrix = model.setup_matrix(0).unwrap();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0], vec![0, 2]);
        assert_eq!(matrix[1], vec![2, 0]);

        // 机台 1 上只有任务 1，退化为普通 no-overlap
        assert!(model.setup_matrix(1).is_none());
    }

    #[test]
    fn test_evaluate_weights_adjustment_and_tardiness() {
        let mut model = two_job_model();
        model.due_time_unit = vec![Some(3), None];

        let intervals = vec![
            AssignedInterval { job: 0, machine: 0, start: 0, end: 4 },
            AssignedInterval { job: 1, machine: 0, start: 6, end: 8 },
        ];

        // 调整 = 6-4 = 2；延误 = 任务0 超期 1（任务1 无交期不计）
        assert_eq!(model.evaluate(&intervals), 2 * 1 + 1 * 10);
    }

    #[test]
    fn test_end_time_unit_dict() {
        let solution = CpSolution {
            intervals: vec![
                AssignedInterval { job: 0, machine: 0, start: 0, end: 4 },
                AssignedInterval { job: 1, machine: 1, start: 0, end: 2 },
            ],
            objective_value: 0,
        };

        let ends = solution.end_time_unit_dict();
        assert_eq!(ends[&0], 4);
        assert_eq!(ends[&1], 2);
    }
}
