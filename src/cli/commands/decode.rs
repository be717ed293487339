use crate::core::decoder::decode_activity_token;
use crate::errors::AppResult;
use crate::ui::messages::success;
use tracing::debug;

pub async fn handle(token: &str) -> AppResult<()> {
    let activity = decode_activity_token(token)?;
    debug!(token, activity = activity.get(), "activity token decoded");
    success(format!("Activity id: {}", activity));
    Ok(())
}
