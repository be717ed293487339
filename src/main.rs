//! vattend main entrypoint.

use vattend::errors::AppError;
use vattend::run;
use vattend::ui::messages;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        match &e {
            AppError::Attendance(err) => {
                messages::error(err.user_message());
                if let Some(recovery) = err.recovery() {
                    messages::info(messages::recovery_hint(recovery));
                }
            }
            AppError::Decode(err) => messages::error(err.user_message()),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}
