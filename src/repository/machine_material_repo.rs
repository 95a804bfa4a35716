use crate::domain::MachineMaterial;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// MachineMaterialRepository - 机台材料兼容关系仓储
// ==========================================
pub struct MachineMaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineMaterialRepository {
    /// 创建新的MachineMaterialRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部兼容关系
    pub fn list_all(&self) -> RepositoryResult<Vec<MachineMaterial>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT machine_id, mat_id
               FROM machine_material"#,
        )?;

        let pairs = stmt
            .query_map([], |row| {
                Ok(MachineMaterial {
                    machine_id: row.get(0)?,
                    mat_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<MachineMaterial>, _>>()?;

        Ok(pairs)
    }
}
