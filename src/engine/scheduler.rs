// ==========================================
// 金属拉拔排产系统 - 日历展开调度器
// ==========================================
// 职责: 把求解器的抽象时间单位时间线展开成墙钟时间片段
// 规则:
// - 逐机台独立展开，片段不跨工作时段边界
// - 区间间的换料间隔以 job_id = -1 占位片段落到日历上
// - 日推进跳过假日；起始工作日若为假日同样先跳过
// - 回算每片段产出量与滚动余量
// ==========================================

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info};

use crate::config::TIME_SCALE;
use crate::domain::{PendingJob, PlanRow};
use crate::engine::duration::DurationCalculator;
use crate::engine::error::{PlanningError, PlanningResult};
use crate::solver::CpSolution;

/// 占位片段的任务标记（换料时间）
const SETUP_JOB_ID: i64 = -1;

// ==========================================
// 内部结构
// ==========================================

/// 待展开的求解区间（墙钟分钟口径）
struct PendingInterval {
    job: usize,
    remaining_minutes: i64,
    remaining_setup_minutes: i64,
}

/// 已落到日历上的片段
struct TimeSegment {
    start: NaiveDateTime,
    end: NaiveDateTime,
    /// 组内任务编号；SETUP_JOB_ID 表示换料占位
    job_id: i64,
}

// ==========================================
// Scheduler - 日历展开调度器
// ==========================================
pub struct Scheduler<'a> {
    solution: &'a CpSolution,
    pending_jobs: &'a [PendingJob],
    machine_ids: &'a [i64],
    duration_calculator: &'a DurationCalculator,
    start_working_date: NaiveDate,
    working_hours: Vec<(NaiveTime, NaiveTime)>,
    holidays: HashSet<String>,
}

impl<'a> Scheduler<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        solution: &'a CpSolution,
        pending_jobs: &'a [PendingJob],
        machine_ids: &'a [i64],
        duration_calculator: &'a DurationCalculator,
        start_working_date: NaiveDate,
        working_hours: Vec<(NaiveTime, NaiveTime)>,
        holidays: &[String],
    ) -> Self {
        Self {
            solution,
            pending_jobs,
            machine_ids,
            duration_calculator,
            start_working_date,
            working_hours,
            holidays: holidays.iter().cloned().collect(),
        }
    }

    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date.format("%Y-%m-%d").to_string())
    }

    /// 机台 m 的求解区间 → 待展开队列（含换料间隔）
    ///
    /// 第 i 个区间（i>0）的换料分钟数 = (start_i − end_{i−1}) × TIME_SCALE；
    /// 首个区间没有换料间隔。
    fn build_pending_intervals(&self, machine_idx: usize) -> Vec<PendingInterval> {
        let on_machine = self.solution.intervals_on_machine(machine_idx);

        let mut pending = Vec::with_capacity(on_machine.len());
        for (i, itv) in on_machine.iter().enumerate() {
            let setup_minutes = if i > 0 {
                (itv.start - on_machine[i - 1].end) * TIME_SCALE
            } else {
                0
            };

            pending.push(PendingInterval {
                job: itv.job,
                remaining_minutes: (itv.end - itv.start) * TIME_SCALE,
                remaining_setup_minutes: setup_minutes,
            });
        }

        pending
    }

    /// 把一台机台的待展开队列铺到工作日历上
    fn expand_machine(&self, mut pending: Vec<PendingInterval>) -> Vec<TimeSegment> {
        let mut segments: Vec<TimeSegment> = Vec::new();

        let mut work_date = self.start_working_date;
        while self.is_holiday(work_date) {
            work_date += Duration::days(1);
        }

        let mut processed = 0;
        while processed < pending.len() {
            'window: for &(window_start, window_end_t) in &self.working_hours {
                let window_end = work_date.and_time(window_end_t);
                let mut use_default_start = true;

                while processed < pending.len() {
                    let mut start_time = if use_default_start {
                        work_date.and_time(window_start)
                    } else {
                        // 同一时段内紧接上一片段
                        segments.last().map(|s| s.end).unwrap_or_else(|| work_date.and_time(window_start))
                    };

                    // 先消耗换料时间
                    if pending[processed].remaining_setup_minutes > 0 {
                        let with_setup =
                            start_time + Duration::minutes(pending[processed].remaining_setup_minutes);

                        if with_setup > window_end {
                            // 换料吃满本时段：落占位片段，余量按溢出分钟扣减
                            segments.push(TimeSegment {
                                start: start_time,
                                end: window_end,
                                job_id: SETUP_JOB_ID,
                            });
                            pending[processed].remaining_setup_minutes -=
                                ceil_minutes_between(window_end, with_setup);
                            continue 'window;
                        }

                        start_time = with_setup;
                        pending[processed].remaining_setup_minutes = 0;
                    }

                    let slot_minutes = ceil_minutes_between(start_time, window_end);
                    let remaining = pending[processed].remaining_minutes;
                    let job_id = pending[processed].job as i64;

                    if remaining > slot_minutes {
                        // 吃满本时段，跨到下一时段继续
                        segments.push(TimeSegment {
                            start: start_time,
                            end: window_end,
                            job_id,
                        });
                        pending[processed].remaining_minutes -= slot_minutes;
                        continue 'window;
                    } else if remaining == slot_minutes {
                        segments.push(TimeSegment {
                            start: start_time,
                            end: window_end,
                            job_id,
                        });
                        pending[processed].remaining_minutes -= slot_minutes;
                        processed += 1;
                        continue 'window;
                    } else {
                        // 时段未用尽：同一时段内接着排下一个区间
                        segments.push(TimeSegment {
                            start: start_time,
                            end: start_time + Duration::minutes(remaining),
                            job_id,
                        });
                        pending[processed].remaining_minutes = 0;
                        processed += 1;
                        use_default_start = false;
                    }
                }
            }

            // 当日时段耗尽：推进到下一个非假日
            loop {
                work_date += Duration::days(1);
                if !self.is_holiday(work_date) {
                    break;
                }
            }
        }

        segments
    }

    /// 展开全部机台并回算产出量与滚动余量
    ///
    /// # 返回
    /// 计划明细行，按 (机台, 开始时间) 顺序
    pub fn expand(&self) -> PlanningResult<Vec<PlanRow>> {
        info!("开始日历展开 ...");

        let mut rows: Vec<PlanRow> = Vec::new();

        for (machine_idx, &machine_id) in self.machine_ids.iter().enumerate() {
            let pending = self.build_pending_intervals(machine_idx);
            if pending.is_empty() {
                continue;
            }

            let segments = self.expand_machine(pending);
            debug!(machine_id, segments = segments.len(), "机台展开完成");

            for segment in &segments {
                if segment.job_id == SETUP_JOB_ID {
                    continue;
                }

                let job = &self.pending_jobs[segment.job_id as usize];

                // 片段分钟数 → 整时间单位（向下取整）→ 产出量
                let segment_minutes = (segment.end - segment.start).num_minutes();
                let time_units = segment_minutes / TIME_SCALE;
                let batch_volume = self
                    .duration_calculator
                    .calculate_weight(machine_id, job.mat_id, time_units)
                    .ok_or_else(|| {
                        PlanningError::Schedule(format!(
                            "机台 {} 与材料 {} 不兼容，无法回算产出量",
                            machine_id, job.mat_id
                        ))
                    })?;

                rows.push(PlanRow {
                    so_id: job.so_id,
                    mat_id: job.mat_id,
                    res_volume: job.res_draft_volume,
                    batch_volume,
                    remaining_volume: 0.0,
                    start_timestamp: segment.start,
                    end_timestamp: segment.end,
                    machine_id,
                });
            }
        }

        apply_remaining_volume(&mut rows);

        info!(rows = rows.len(), "日历展开成功");

        Ok(rows)
    }
}

/// 按 (机台, 开始时间) 顺序对同 (so_id, mat_id) 连续行做滚动余量
///
/// 首行余量 = res_volume − batch_volume，之后逐行递减；
/// 键变化时重置。滚动以未舍入值进行，落库值保留 2 位小数。
fn apply_remaining_volume(rows: &mut [PlanRow]) {
    let mut last_key: Option<(i64, i64)> = None;
    let mut last_remaining = 0.0;

    for row in rows.iter_mut() {
        let key = (row.so_id, row.mat_id);
        let remaining = if last_key == Some(key) {
            last_remaining - row.batch_volume
        } else {
            row.res_volume - row.batch_volume
        };

        row.remaining_volume = (remaining * 100.0).round() / 100.0;
        last_remaining = remaining;
        last_key = Some(key);
    }
}

/// 两时刻间的分钟数，向上取整
fn ceil_minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let seconds = (end - start).num_seconds();
    (seconds + 59).div_euclid(60)
}
