use crate::cli::commands::open_session;
use crate::cli::parser::AttendanceArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::{OperationKind, Operator};
use crate::ui::messages;

/// Handle `checkin` and `checkout`.
///
/// The roster row is loaded first so the operation starts from the
/// backend's current state. Absorbed outcomes (already in the requested
/// state, operation in progress) are reported and exit successfully.
pub async fn handle(kind: OperationKind, args: &AttendanceArgs, cfg: &Config) -> AppResult<()> {
    let operator = Operator::new(
        args.operator_id.unwrap_or(cfg.operator_id),
        args.operator_name
            .clone()
            .unwrap_or_else(|| cfg.operator_name.clone()),
    );
    let session = open_session(cfg, operator)?;
    session.load_roster(&[args.user_id]).await;

    let who = session
        .entry(args.user_id)
        .map(|e| e.display_name().to_string())
        .unwrap_or_else(|| format!("User {}", args.user_id));

    let result = match kind {
        OperationKind::CheckIn => session.check_in(args.user_id).await,
        OperationKind::CheckOut => session.check_out(args.user_id).await,
    };

    match result {
        Ok(done) => {
            messages::outcome(&who, &done);
            Ok(())
        }
        Err(e) if e.is_silent() => {
            messages::absorbed(&e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
