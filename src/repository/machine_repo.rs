use crate::domain::Machine;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// MachineRepository - 机台主数据仓储
// ==========================================
pub struct MachineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineRepository {
    /// 创建新的MachineRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部机台主数据
    ///
    /// # 返回
    /// - `Ok(Vec<Machine>)`: 机台列表，按machine_id升序
    /// - `Err`: 数据库错误
    pub fn list_all(&self) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT machine_id, machine_type_id, machine_weight_hour,
                      machine_spd_mul, machine_change_time
               FROM machine_master
               ORDER BY machine_id"#,
        )?;

        let machines = stmt
            .query_map([], |row| {
                Ok(Machine {
                    machine_id: row.get(0)?,
                    machine_type_id: row.get(1)?,
                    machine_weight_hour: row.get(2)?,
                    machine_spd_mul: row.get(3)?,
                    machine_change_time: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<Machine>, _>>()?;

        Ok(machines)
    }
}
