// ==========================================
// 金属拉拔排产系统 - 控制台主入口
// ==========================================
// 流程: 加载 dbconfig.json → 交互确认起始日/假日/OT →
//       执行排产管线 → 落库并输出摘要
// ==========================================

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::{debug, error, info};

use wire_drawing_aps::config::{DbConfig, Settings, Stage};
use wire_drawing_aps::engine::PlanningOrchestrator;
use wire_drawing_aps::solver::DispatchSolver;
use wire_drawing_aps::{db, logging, APP_NAME, VERSION};

// ==========================================
// 命令行参数
// ==========================================
#[derive(Parser)]
#[command(name = "wire-drawing-aps", version, about = "金属拉拔排产系统")]
struct Cli {
    /// 以调试模式运行（日志级别 debug）
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(cli.debug);

    let stage = if cli.debug { Stage::Dev } else { Stage::Prod };
    if stage == Stage::Dev {
        debug!("以调试模式运行");
    }

    info!("==================================================");
    info!("{} v{}", APP_NAME, VERSION);
    info!("==================================================");

    match run(stage) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = ?e, "失败详情");
            error!("生成生产计划失败");
            error!("程序异常退出");
            ExitCode::FAILURE
        }
    }
}

fn run(stage: Stage) -> anyhow::Result<()> {
    let mut settings = Settings::new(stage)?;

    info!("连接数据库 ...");
    let db_config = DbConfig::load("dbconfig.json")?;
    let conn = db::open_database(&db_config)?;
    info!("数据库连接成功");

    info!("------------------------------------------------");
    info!("开始生产排产");
    info!("默认起始工作日: {}", settings.start_working_date());

    configure_start_date(&mut settings)?;
    info!("------------------------------------------------");
    configure_holidays(&mut settings)?;
    info!("------------------------------------------------");
    configure_overtime(&mut settings)?;

    let orchestrator = PlanningOrchestrator::new(
        Arc::new(Mutex::new(conn)),
        DispatchSolver::new(),
        settings,
    );

    let summary = orchestrator.generate_production_plan()?;

    info!("------------------------------------------------");
    info!(
        rows = summary.rows_written,
        objective_value = summary.objective_value,
        "生产计划已生成"
    );

    Ok(())
}

// ==========================================
// 交互确认
// ==========================================

/// 读取一行控制台输入
fn prompt(message: &str) -> io::Result<String> {
    print!(">>>{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// 是否修改起始工作日（Y/n），是则循环读取到合法日期为止
fn configure_start_date(settings: &mut Settings) -> io::Result<()> {
    loop {
        match prompt("是否修改起始工作日 (Y/n): ")?.as_str() {
            "Y" => {
                let mut format_wrong = false;
                loop {
                    let message = if format_wrong {
                        "请按 YYYY-MM-DD 格式输入日期: "
                    } else {
                        "输入起始工作日 (YYYY-MM-DD): "
                    };

                    match settings.set_start_working_date(&prompt(message)?) {
                        Ok(()) => break,
                        Err(e) => {
                            debug!(error = %e, "日期解析失败");
                            info!("日期格式错误");
                            format_wrong = true;
                        }
                    }
                }

                info!("新的起始工作日: {}", settings.start_working_date());
                return Ok(());
            }
            "n" => return Ok(()),
            _ => error!("请输入有效的选项"),
        }
    }
}

/// 未来两周内是否有假日（Y/n），是则循环读取到合法日期列表为止
fn configure_holidays(settings: &mut Settings) -> io::Result<()> {
    loop {
        match prompt("未来两周内是否有假日 (Y/n): ")?.as_str() {
            "Y" => {
                let mut format_wrong = false;
                loop {
                    let message = if format_wrong {
                        "请按 (YYYY-MM-DD,YYYY-MM-DD) 格式输入假日: "
                    } else {
                        "输入假日列表 (YYYY-MM-DD,YYYY-MM-DD): "
                    };

                    match settings.add_holidays(&prompt(message)?) {
                        Ok(()) => break,
                        Err(e) => {
                            debug!(error = %e, "假日解析失败");
                            info!("日期格式错误");
                            format_wrong = true;
                        }
                    }
                }

                info!("假日列表: {}", settings.holidays.join(", "));
                return Ok(());
            }
            "n" => return Ok(()),
            _ => error!("请输入有效的选项"),
        }
    }
}

/// 是否按加班模式排产（Y/n）
fn configure_overtime(settings: &mut Settings) -> io::Result<()> {
    loop {
        match prompt("是否按加班模式排产 (Y/n): ")?.as_str() {
            "Y" => {
                settings.ot = true;
                info!("工作时段已包含加班时间");
                return Ok(());
            }
            "n" => return Ok(()),
            _ => error!("请输入有效的选项"),
        }
    }
}
