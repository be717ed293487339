use crate::cli::commands::open_session;
use crate::config::Config;
use crate::core::scope::RosterScope;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::formatting::minutes_or_dash;
use crate::utils::table::{Column, Table};
use crate::utils::time::short_display;

pub async fn handle(dept: Option<i64>, user: Option<i64>, json: bool, cfg: &Config) -> AppResult<()> {
    let scope = match (dept, user) {
        (Some(dept_id), _) => RosterScope::School { dept_id },
        (None, Some(user_id)) => RosterScope::SelfOnly { user_id },
        (None, None) => RosterScope::All,
    };

    let session = open_session(cfg, cfg.operator())?;
    session.load_scoped_roster(scope).await?;
    let roster = session.roster();

    if json {
        let out = serde_json::to_string_pretty(&roster).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if roster.is_empty() {
        info("No eligible volunteers in this scope.");
        return Ok(());
    }

    let now = session.now();
    header(format!("Roster ({} volunteers)", roster.len()));
    let mut table = Table::new(vec![
        Column::new("ID", 4),
        Column::new("NAME", 10),
        Column::new("ROLE", 5),
        Column::new("STATUS", 6),
        Column::new("IN", 5),
        Column::new("OUT", 5),
        Column::new("TOTAL", 5),
    ]);
    for e in &roster {
        let last_out = e.check_out_time().or(e.last_check_out_time());
        let shown_in = e.check_in_time().or(e.last_check_in_time());
        table.add_row(vec![
            e.user_id().to_string(),
            e.display_name().to_string(),
            e.role().as_str().to_string(),
            e.status().label().to_string(),
            short_display(shown_in, now),
            short_display(last_out, now),
            minutes_or_dash(e.total_minutes()),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
