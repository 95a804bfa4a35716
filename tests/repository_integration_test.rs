// ==========================================
// 仓储层集成测试
// ==========================================
// 测试目标: 主数据读取、待排产视图口径、计划事务替换
// ==========================================

mod helpers;

use chrono::NaiveDateTime;
use helpers::test_data_builder::*;
use wire_drawing_aps::domain::PlanRow;
use wire_drawing_aps::repository::PlanningRepositories;

fn timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn plan_row(so_id: i64, start: &str, end: &str) -> PlanRow {
    PlanRow {
        so_id,
        mat_id: 101,
        res_volume: 100.0,
        batch_volume: 60.0,
        remaining_volume: 40.0,
        start_timestamp: timestamp(start),
        end_timestamp: timestamp(end),
        machine_id: 11,
    }
}

// ==========================================
// 测试用例 1: 主数据读取
// ==========================================

#[test]
fn test_master_data_round_trip() {
    let conn = create_test_connection();
    insert_machine(&conn, 11, 1, 60.0, 0.0, 30);
    insert_machine(&conn, 21, 3, 0.0, 1.5, 45);
    insert_material(&conn, 101, 5.0);
    insert_compatibility(&conn, 11, 101);

    let repos = PlanningRepositories::new(conn);

    let machines = repos.machine.list_all().unwrap();
    assert_eq!(machines.len(), 2);
    assert!(machines[0].is_weight_rated());
    assert!(!machines[1].is_weight_rated());
    assert_eq!(machines[1].machine_spd_mul, 1.5);

    let materials = repos.material.list_all().unwrap();
    assert_eq!(materials.len(), 1);
    assert_eq!(materials[0].mat_size, 5.0);

    let pairs = repos.machine_material.list_all().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].machine_id, pairs[0].mat_id), (11, 101));
}

// ==========================================
// 测试用例 2: 待排产视图口径
// ==========================================

#[test]
fn test_pending_job_view_volumes() {
    let conn = create_test_connection();
    insert_sales_order(&conn, 1, 1, "2024-01-01");
    insert_so_item(&conn, 1, 101, 100.0);

    // 未关闭发货 30 kg 计入；已关闭（status 90）发货 50 kg 不计入
    insert_delivery(&conn, 501, 1, 10, 101, 30.0);
    insert_delivery(&conn, 502, 1, 90, 101, 50.0);

    // 草案计划 20 kg
    insert_draft_plan_item(&conn, 701, 101, 1, 20.0);

    let repos = PlanningRepositories::new(conn);
    let jobs = repos.so_item.list_pending_jobs().unwrap();

    assert_eq!(jobs.len(), 1);
    let job = &jobs[0];
    assert_eq!(job.so_id, 1);
    assert_eq!(job.mat_id, 101);
    assert!((job.sent_volume - 30.0).abs() < 1e-9, "已关闭发货单不应计入");
    assert!((job.res_volume - 70.0).abs() < 1e-9);
    assert!((job.draft_volume - 20.0).abs() < 1e-9);
    assert!((job.res_draft_volume - 50.0).abs() < 1e-9);
}

#[test]
fn test_closed_sales_orders_are_excluded() {
    let conn = create_test_connection();
    insert_sales_order(&conn, 1, 1, "2024-01-01");
    insert_so_item(&conn, 1, 101, 100.0);
    insert_sales_order(&conn, 2, 9, "2024-01-01");
    insert_so_item(&conn, 2, 101, 100.0);

    let repos = PlanningRepositories::new(conn);
    let jobs = repos.so_item.list_pending_jobs().unwrap();

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].so_id, 1);
}

// ==========================================
// 测试用例 3: 计划整表替换
// ==========================================

#[test]
fn test_replace_plan_overwrites_previous_plan() {
    let conn = create_test_connection();
    let repos = PlanningRepositories::new(conn.clone());

    let first = vec![
        plan_row(1, "2024-01-02 08:00:00", "2024-01-02 09:00:00"),
        plan_row(2, "2024-01-02 09:00:00", "2024-01-02 10:00:00"),
    ];
    assert_eq!(repos.pd_plan.replace_plan(&first).unwrap(), 2);
    assert_eq!(repos.pd_plan.count_plan_rows().unwrap(), 2);

    let second = vec![plan_row(3, "2024-01-03 08:00:00", "2024-01-03 09:00:00")];
    assert_eq!(repos.pd_plan.replace_plan(&second).unwrap(), 1);
    assert_eq!(repos.pd_plan.count_plan_rows().unwrap(), 1);

    // 时间戳按 YYYY-MM-DD HH:MM:SS 落库
    let stored: (i64, String) = conn
        .lock()
        .unwrap()
        .query_row(
            "SELECT so_id, start_timestamp FROM pd_plan",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(stored, (3, "2024-01-03 08:00:00".to_string()));
}

#[test]
fn test_replace_plan_failure_keeps_previous_plan() {
    let conn = create_test_connection();
    let repos = PlanningRepositories::new(conn.clone());

    let first = vec![
        plan_row(1, "2024-01-02 08:00:00", "2024-01-02 09:00:00"),
        plan_row(2, "2024-01-02 09:00:00", "2024-01-02 10:00:00"),
    ];
    repos.pd_plan.replace_plan(&first).unwrap();

    // 人为制造写入失败：so_id = 999 的行触发中止
    conn.lock()
        .unwrap()
        .execute_batch(
            r#"CREATE TRIGGER pd_plan_guard BEFORE INSERT ON pd_plan
               WHEN NEW.so_id = 999
               BEGIN SELECT RAISE(ABORT, 'forced failure'); END;"#,
        )
        .unwrap();

    let bad = vec![
        plan_row(3, "2024-01-03 08:00:00", "2024-01-03 09:00:00"),
        plan_row(999, "2024-01-03 09:00:00", "2024-01-03 10:00:00"),
    ];
    assert!(repos.pd_plan.replace_plan(&bad).is_err());

    // 事务回滚后旧计划完整保留
    assert_eq!(repos.pd_plan.count_plan_rows().unwrap(), 2);
    let so_ids: Vec<i64> = conn
        .lock()
        .unwrap()
        .prepare("SELECT so_id FROM pd_plan ORDER BY so_id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(so_ids, vec![1, 2]);
}

// ==========================================
// 测试用例 4: 文件库连接初始化
// ==========================================

#[test]
fn test_open_sqlite_connection_on_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("plan.db");

    let conn = wire_drawing_aps::db::open_sqlite_connection(db_path.to_str().unwrap()).unwrap();
    conn.execute_batch(SCHEMA_SQL).unwrap();
    conn.execute(
        "INSERT INTO material_master (mat_id, mat_size) VALUES (101, 5.0)",
        [],
    )
    .unwrap();

    let size: f64 = conn
        .query_row(
            "SELECT mat_size FROM material_master WHERE mat_id = 101",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(size, 5.0);
}
