// ==========================================
// 金属拉拔排产系统 - 运行设置
// ==========================================
// 职责: 启动期一次性构造的运行配置（起始工作日/假日/OT/求解时限）
// 约束: 构造后作为不可变值显式传递，不做全局可变状态
// ==========================================

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_RUN_TIME_LIMIT, OT, OVERTIME_HOUR_INTERVAL, WORKING_HOUR_INTERVAL,
};

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("日期格式错误: {0}（应为 YYYY-MM-DD）")]
    InvalidDate(String),

    #[error("时段格式错误: {0}（应为 HH:MM）")]
    InvalidTimeWindow(String),

    #[error("数据库配置不完整: 缺少 {0}")]
    IncompleteDbConfig(&'static str),

    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("解析配置文件失败: {0}")]
    Json(#[from] serde_json::Error),
}

// ==========================================
// Stage - 运行阶段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prod,
    Dev,
}

// ==========================================
// DbConfig - 数据库连接配置 (dbconfig.json)
// ==========================================
// 四个键全部必填；嵌入式引擎以 database 作为文件路径
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
}

impl DbConfig {
    /// 从 JSON 文件加载并校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: DbConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.user.is_empty() {
            return Err(ConfigError::IncompleteDbConfig("user"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::IncompleteDbConfig("password"));
        }
        if self.host.is_empty() {
            return Err(ConfigError::IncompleteDbConfig("host"));
        }
        if self.database.is_empty() {
            return Err(ConfigError::IncompleteDbConfig("database"));
        }
        Ok(())
    }
}

// ==========================================
// Settings - 运行设置
// ==========================================
#[derive(Debug, Clone)]
pub struct Settings {
    pub stage: Stage,
    /// 起始工作时刻（起始工作日 + 首个常规时段开始时间）
    pub start_working_hour: NaiveDateTime,
    /// 求解时间上限（秒）
    pub run_time_limit: u64,
    /// 假日列表（YYYY-MM-DD）
    pub holidays: Vec<String>,
    /// 是否追加加班时段
    pub ot: bool,
    regular_windows: Vec<(NaiveTime, NaiveTime)>,
    overtime_windows: Vec<(NaiveTime, NaiveTime)>,
}

impl Settings {
    /// 构造默认设置：起始工作日为明日，时段表取自常量
    pub fn new(stage: Stage) -> Result<Self, ConfigError> {
        let regular_windows = parse_hour_intervals(WORKING_HOUR_INTERVAL)?;
        let overtime_windows = parse_hour_intervals(OVERTIME_HOUR_INTERVAL)?;

        let first_window_start = regular_windows[0].0;
        let tomorrow = Local::now().date_naive() + Duration::days(1);

        Ok(Self {
            stage,
            start_working_hour: tomorrow.and_time(first_window_start),
            run_time_limit: DEFAULT_RUN_TIME_LIMIT,
            holidays: Vec::new(),
            ot: OT,
            regular_windows,
            overtime_windows,
        })
    }

    /// 修改起始工作日（YYYY-MM-DD，时刻保持首个时段开始时间）
    pub fn set_start_working_date(&mut self, date_str: &str) -> Result<(), ConfigError> {
        let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
            .map_err(|_| ConfigError::InvalidDate(date_str.to_string()))?;

        self.start_working_hour = date.and_time(self.regular_windows[0].0);
        Ok(())
    }

    /// 追加假日（逗号分隔的 YYYY-MM-DD 列表，逐项校验）
    pub fn add_holidays(&mut self, list: &str) -> Result<(), ConfigError> {
        let mut parsed = Vec::new();
        for item in list.split(',') {
            let item = item.trim();
            NaiveDate::parse_from_str(item, "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidDate(item.to_string()))?;
            parsed.push(item.to_string());
        }

        self.holidays.extend(parsed);
        Ok(())
    }

    /// 起始工作日（日期部分）
    pub fn start_working_date(&self) -> NaiveDate {
        self.start_working_hour.date()
    }

    /// 当前生效的工作时段表（常规，OT 模式下追加加班时段）
    pub fn active_working_hours(&self) -> Vec<(NaiveTime, NaiveTime)> {
        let mut windows = self.regular_windows.clone();
        if self.ot {
            windows.extend(self.overtime_windows.iter().copied());
        }
        windows
    }
}

/// 解析 "HH:MM" 时段常量表
fn parse_hour_intervals(
    intervals: &[(&str, &str)],
) -> Result<Vec<(NaiveTime, NaiveTime)>, ConfigError> {
    intervals
        .iter()
        .map(|(start, end)| {
            let start_t = NaiveTime::parse_from_str(start, "%H:%M")
                .map_err(|_| ConfigError::InvalidTimeWindow(start.to_string()))?;
            let end_t = NaiveTime::parse_from_str(end, "%H:%M")
                .map_err(|_| ConfigError::InvalidTimeWindow(end.to_string()))?;
            Ok((start_t, end_t))
        })
        .collect()
}
