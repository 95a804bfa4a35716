use crate::domain::Material;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// MaterialRepository - 材料主数据仓储
// ==========================================
pub struct MaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialRepository {
    /// 创建新的MaterialRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部材料主数据
    pub fn list_all(&self) -> RepositoryResult<Vec<Material>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT mat_id, mat_size
               FROM material_master
               ORDER BY mat_id"#,
        )?;

        let materials = stmt
            .query_map([], |row| {
                Ok(Material {
                    mat_id: row.get(0)?,
                    mat_size: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<Material>, _>>()?;

        Ok(materials)
    }
}
