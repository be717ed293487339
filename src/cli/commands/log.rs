use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::{Column, Table};

pub async fn handle(print: bool, limit: usize, cfg: &Config) -> AppResult<()> {
    if !print {
        return Ok(());
    }

    let pool = DbPool::open_initialized(&cfg.database)?;
    let rows = log::recent(&pool.conn, limit)?;
    if rows.is_empty() {
        info("Internal log is empty.");
        return Ok(());
    }

    header("Internal log");
    let mut table = Table::new(vec![
        Column::new("ID", 3),
        Column::new("DATE", 19),
        Column::new("OPERATION", 9),
        Column::new("TARGET", 6),
        Column::new("MESSAGE", 7),
    ]);
    for r in rows {
        // RFC3339 with offset; seconds precision is enough here.
        let date: String = r.date.chars().take(19).collect();
        table.add_row(vec![r.id.to_string(), date, r.operation, r.target, r.message]);
    }
    print!("{}", table.render());
    Ok(())
}
