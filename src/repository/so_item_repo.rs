use crate::domain::PendingJob;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// SoItemRepository - 待排产订单项仓储
// ==========================================
// 派生视图: so ⋈ so_item ⋈ 发货缓冲 ⋈ 草案计划缓冲
// 口径:
//   sent_volume      = 未关闭发货单（do_status_id < 90）的累计发货量
//   draft_volume     = 草案计划（draft_do_item ⋈ pd_item）的累计排产量
//   res_draft_volume = sale_volume - sent_volume - draft_volume
// ==========================================
pub struct SoItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SoItemRepository {
    /// 创建新的SoItemRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取全部待排产订单项（so_status_id < 9）
    pub fn list_pending_jobs(&self) -> RepositoryResult<Vec<PendingJob>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT
                   so.so_id,
                   so_item.mat_id,
                   so_item.sale_volume,
                   COALESCE(do_buffer.weight, 0) AS sent_volume,
                   so_item.sale_volume - COALESCE(do_buffer.weight, 0) AS res_volume,
                   COALESCE(draft_buffer.weight, 0) AS draft_volume,
                   so_item.sale_volume - COALESCE(do_buffer.weight, 0)
                       - COALESCE(draft_buffer.weight, 0) AS res_draft_volume,
                   so.so_pub_date
               FROM so_item
               LEFT JOIN so
                   ON so.so_id = so_item.so_id
               LEFT JOIN (
                   SELECT do_item.mat_id, do_order.so_id, SUM(do_item.weight_deliver) AS weight
                   FROM do_item
                   LEFT JOIN do_order
                       ON do_order.do_id = do_item.do_id
                   WHERE do_order.do_status_id < 90
                   GROUP BY do_item.mat_id, do_order.so_id
               ) do_buffer
                   ON so_item.mat_id = do_buffer.mat_id
                   AND so_item.so_id = do_buffer.so_id
               LEFT JOIN (
                   SELECT result_id, so_id, SUM(pd_weight) AS weight
                   FROM draft_do_item
                   INNER JOIN pd_item USING (pd_item_id)
                   GROUP BY result_id, so_id
               ) draft_buffer
                   ON so_item.mat_id = draft_buffer.result_id
                   AND so_item.so_id = draft_buffer.so_id
               WHERE so.so_status_id < 9"#,
        )?;

        let jobs = stmt
            .query_map([], |row| {
                Ok(PendingJob {
                    so_id: row.get(0)?,
                    mat_id: row.get(1)?,
                    sale_volume: row.get(2)?,
                    sent_volume: row.get(3)?,
                    res_volume: row.get(4)?,
                    draft_volume: row.get(5)?,
                    res_draft_volume: row.get(6)?,
                    so_pub_date: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<PendingJob>, _>>()?;

        Ok(jobs)
    }
}
