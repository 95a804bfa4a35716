// ==========================================
// 金属拉拔排产系统 - 内置派工求解器
// ==========================================
// 策略: 最早交期优先（EDD）列表排产；每个任务落到
//       加权增量成本（调整 + 延误）最小的机台队尾
// 定位: CpSolver 契约的内置实现，可被外部引擎替换
// ==========================================

use std::time::Instant;

use tracing::debug;

use crate::solver::{
    AssignedInterval, CpModel, CpSolution, CpSolver, SolverConfig, SolverError,
};

// ==========================================
// DispatchSolver - EDD 列表排产求解器
// ==========================================
#[derive(Debug, Default)]
pub struct DispatchSolver;

impl DispatchSolver {
    pub fn new() -> Self {
        Self
    }
}

/// 单机台时间线：已排区间按追加序排列
struct MachineLane {
    last_job: Option<usize>,
    end: i64,
}

impl CpSolver for DispatchSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> Result<CpSolution, SolverError> {
        let started = Instant::now();

        // 任务按交期升序（无交期或 ≤0 视为不限，排最后；同序按编号稳定）
        let mut order: Vec<usize> = (0..model.n_jobs).collect();
        order.sort_by_key(|&job| {
            (
                model.due_time_unit[job].filter(|&due| due > 0).unwrap_or(i64::MAX),
                job,
            )
        });

        let mut lanes: Vec<MachineLane> = (0..model.n_machines)
            .map(|_| MachineLane { last_job: None, end: 0 })
            .collect();
        let mut intervals: Vec<AssignedInterval> = Vec::with_capacity(model.n_jobs);

        for job in order {
            if started.elapsed() >= config.time_limit {
                return Err(SolverError::TimeLimitExceeded);
            }

            let due = model.due_time_unit[job].filter(|&d| d > 0);

            // 在候选机台中选加权增量成本最小者；平手取完工更早、机台编号更小
            let mut best: Option<(i64, i64, usize, i64)> = None;
            for candidate in model.candidates_of(job) {
                let lane = &lanes[candidate.machine];
                let transition = match lane.last_job {
                    Some(prev) => model.transition_time(candidate.machine, prev, job),
                    None => 0,
                };

                let start = lane.end + transition;
                let end = start + candidate.size;
                let tardy = due.map(|d| (end - d).max(0)).unwrap_or(0);
                let cost = model.weight_adjustment * transition + model.weight_tardy * tardy;

                let key = (cost, end, candidate.machine, start);
                if best.map(|b| key < (b.0, b.1, b.2, b.3)).unwrap_or(true) {
                    best = Some(key);
                }
            }

            let (_, end, machine, start) = best.ok_or(SolverError::NoCandidate(job))?;

            lanes[machine].last_job = Some(job);
            lanes[machine].end = end;
            intervals.push(AssignedInterval { job, machine, start, end });
        }

        let objective_value = model.evaluate(&intervals);

        if config.log_search {
            debug!(
                model = %model.name,
                jobs = model.n_jobs,
                machines = model.n_machines,
                objective_value,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "派工求解完成"
            );
        }

        Ok(CpSolution {
            intervals,
            objective_value,
        })
    }
}
