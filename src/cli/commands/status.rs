use crate::cli::commands::open_session;
use crate::config::Config;
use crate::core::duration::{WorkHours, format_duration};
use crate::core::session::ResyncOutcome;
use crate::errors::{AppResult, AttendanceError};
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{colorize_optional, colorize_status};
use crate::utils::formatting::minutes_or_dash;
use crate::utils::time::short_display;

pub async fn handle(user_id: i64, cfg: &Config) -> AppResult<()> {
    let session = open_session(cfg, cfg.operator())?;
    session.load_roster(&[user_id]).await;

    match session.expand(user_id).await {
        Ok(ResyncOutcome::Corrected { from, to }) => {
            warning(format!("Displayed status corrected from {} to {}.", from, to))
        }
        Ok(ResyncOutcome::Unavailable) => {
            warning("Attendance service unavailable; showing the last known state.")
        }
        Ok(_) => {}
        Err(e) => return Err(e.into()),
    }

    let Some(entry) = session.entry(user_id) else {
        return Err(AttendanceError::UnknownVolunteer(user_id).into());
    };
    let now = session.now();

    header(format!("{} (#{})", entry.display_name(), entry.user_id()));
    println!("Role        : {}", entry.role().as_str());
    println!("Status      : {}", colorize_status(entry.status()));
    match entry.check_in_time() {
        Some(start) => {
            println!("Checked in  : {}", short_display(Some(start), now));
            println!(
                "Session     : {}",
                format_duration(entry.current_session_minutes(now))
            );
        }
        None => {
            println!(
                "Last in     : {}",
                colorize_optional(&short_display(entry.last_check_in_time(), now))
            );
            println!(
                "Last out    : {}",
                colorize_optional(&short_display(entry.last_check_out_time(), now))
            );
            if let (Some(start), Some(end)) = (entry.last_check_in_time(), entry.last_check_out_time())
                && start <= end
            {
                println!("Last session: {}", WorkHours::between(start, Some(end), now).display);
            }
        }
    }
    println!("Total       : {}", colorize_optional(&minutes_or_dash(entry.total_minutes())));

    if !entry.status().is_checked_in() && entry.last_check_in_time().is_none() {
        info("No attendance recorded yet.");
    }
    Ok(())
}
