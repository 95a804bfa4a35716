// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

use wire_drawing_aps::config::{Settings, Stage};

/// 测试库表结构（与生产库对齐）
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE machine_master (
    machine_id          INTEGER PRIMARY KEY,
    machine_type_id     INTEGER NOT NULL,
    machine_weight_hour REAL    NOT NULL DEFAULT 0,
    machine_spd_mul     REAL    NOT NULL DEFAULT 0,
    machine_change_time INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE material_master (
    mat_id   INTEGER PRIMARY KEY,
    mat_size REAL    NOT NULL
);

CREATE TABLE machine_material (
    machine_id INTEGER NOT NULL,
    mat_id     INTEGER NOT NULL,
    PRIMARY KEY (machine_id, mat_id)
);

CREATE TABLE so (
    so_id        INTEGER PRIMARY KEY,
    so_status_id INTEGER NOT NULL DEFAULT 0,
    so_pub_date  TEXT    NOT NULL
);

CREATE TABLE so_item (
    so_id       INTEGER NOT NULL,
    mat_id      INTEGER NOT NULL,
    sale_volume REAL    NOT NULL
);

CREATE TABLE do_order (
    do_id        INTEGER PRIMARY KEY,
    so_id        INTEGER NOT NULL,
    do_status_id INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE do_item (
    do_id          INTEGER NOT NULL,
    mat_id         INTEGER NOT NULL,
    weight_deliver REAL    NOT NULL
);

CREATE TABLE draft_do_item (
    pd_item_id INTEGER NOT NULL
);

CREATE TABLE pd_item (
    pd_item_id INTEGER PRIMARY KEY,
    result_id  INTEGER NOT NULL,
    so_id      INTEGER NOT NULL,
    pd_weight  REAL    NOT NULL
);

CREATE TABLE pd_plan (
    so_id            INTEGER NOT NULL,
    mat_id           INTEGER NOT NULL,
    res_volume       REAL    NOT NULL,
    start_timestamp  TEXT    NOT NULL,
    end_timestamp    TEXT    NOT NULL,
    machine_id       INTEGER NOT NULL,
    pd_plan_pub_date TEXT    NOT NULL,
    batch_volume     REAL    NOT NULL,
    remaining_volume REAL    NOT NULL
);
"#;

/// 创建内存库并建表
pub fn create_test_connection() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().expect("打开内存库失败");
    conn.execute_batch(SCHEMA_SQL).expect("建表失败");
    Arc::new(Mutex::new(conn))
}

/// 固定起始工作日的测试设置
pub fn test_settings(start_date: &str) -> Settings {
    let mut settings = Settings::new(Stage::Dev).expect("构造设置失败");
    settings
        .set_start_working_date(start_date)
        .expect("设置起始工作日失败");
    settings
}

// ==========================================
// 主数据写入
// ==========================================

pub fn insert_machine(
    conn: &Arc<Mutex<Connection>>,
    machine_id: i64,
    machine_type_id: i64,
    machine_weight_hour: f64,
    machine_spd_mul: f64,
    machine_change_time: i64,
) {
    conn.lock()
        .unwrap()
        .execute(
            r#"INSERT INTO machine_master (
                machine_id, machine_type_id, machine_weight_hour,
                machine_spd_mul, machine_change_time
            ) VALUES (?, ?, ?, ?, ?)"#,
            params![
                machine_id,
                machine_type_id,
                machine_weight_hour,
                machine_spd_mul,
                machine_change_time
            ],
        )
        .expect("写入机台失败");
}

pub fn insert_material(conn: &Arc<Mutex<Connection>>, mat_id: i64, mat_size: f64) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO material_master (mat_id, mat_size) VALUES (?, ?)",
            params![mat_id, mat_size],
        )
        .expect("写入材料失败");
}

pub fn insert_compatibility(conn: &Arc<Mutex<Connection>>, machine_id: i64, mat_id: i64) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO machine_material (machine_id, mat_id) VALUES (?, ?)",
            params![machine_id, mat_id],
        )
        .expect("写入兼容关系失败");
}

// ==========================================
// 订单与缓冲写入
// ==========================================

pub fn insert_sales_order(
    conn: &Arc<Mutex<Connection>>,
    so_id: i64,
    so_status_id: i64,
    so_pub_date: &str,
) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO so (so_id, so_status_id, so_pub_date) VALUES (?, ?, ?)",
            params![so_id, so_status_id, so_pub_date],
        )
        .expect("写入销售订单失败");
}

pub fn insert_so_item(conn: &Arc<Mutex<Connection>>, so_id: i64, mat_id: i64, sale_volume: f64) {
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO so_item (so_id, mat_id, sale_volume) VALUES (?, ?, ?)",
            params![so_id, mat_id, sale_volume],
        )
        .expect("写入订单项失败");
}

/// 写入一张发货单及其明细
pub fn insert_delivery(
    conn: &Arc<Mutex<Connection>>,
    do_id: i64,
    so_id: i64,
    do_status_id: i64,
    mat_id: i64,
    weight_deliver: f64,
) {
    let conn = conn.lock().unwrap();
    conn.execute(
        "INSERT INTO do_order (do_id, so_id, do_status_id) VALUES (?, ?, ?)",
        params![do_id, so_id, do_status_id],
    )
    .expect("写入发货单失败");
    conn.execute(
        "INSERT INTO do_item (do_id, mat_id, weight_deliver) VALUES (?, ?, ?)",
        params![do_id, mat_id, weight_deliver],
    )
    .expect("写入发货明细失败");
}

/// 写入一条草案计划明细
pub fn insert_draft_plan_item(
    conn: &Arc<Mutex<Connection>>,
    pd_item_id: i64,
    mat_id: i64,
    so_id: i64,
    pd_weight: f64,
) {
    let conn = conn.lock().unwrap();
    conn.execute(
        "INSERT INTO pd_item (pd_item_id, result_id, so_id, pd_weight) VALUES (?, ?, ?, ?)",
        params![pd_item_id, mat_id, so_id, pd_weight],
    )
    .expect("写入草案计划项失败");
    conn.execute(
        "INSERT INTO draft_do_item (pd_item_id) VALUES (?)",
        params![pd_item_id],
    )
    .expect("写入草案关联失败");
}
