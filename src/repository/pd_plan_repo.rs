use crate::domain::PlanRow;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Local;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// PdPlanRepository - 生产计划仓储
// ==========================================
// 红线: 计划整表替换必须在单事务内完成，
//       失败回滚后旧计划保持完整
// ==========================================
pub struct PdPlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PdPlanRepository {
    /// 创建新的PdPlanRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 以新计划整表替换旧计划（delete + insert，单事务）
    ///
    /// # 参数
    /// - `rows`: 新计划明细行
    ///
    /// # 返回
    /// - `Ok(usize)`: 写入的行数
    /// - `Err`: 事务失败（已回滚，旧计划保持不变）
    pub fn replace_plan(&self, rows: &[PlanRow]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;

        let pub_date = Local::now()
            .naive_local()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM pd_plan", [])?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO pd_plan (
                       so_id, mat_id, res_volume, start_timestamp, end_timestamp,
                       machine_id, pd_plan_pub_date, batch_volume, remaining_volume
                   ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )?;

            for row in rows {
                stmt.execute(params![
                    row.so_id,
                    row.mat_id,
                    row.res_volume,
                    row.start_timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    row.end_timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    row.machine_id,
                    &pub_date,
                    row.batch_volume,
                    row.remaining_volume,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(rows.len())
    }

    /// 读取当前计划行数（测试与校验用）
    pub fn count_plan_rows(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pd_plan", [], |row| row.get(0))?;

        Ok(count)
    }
}
