use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};

pub async fn handle(print_config: bool, cfg: &Config) -> AppResult<()> {
    if !print_config {
        info("Nothing to do. Use `vattend config --print` to show the configuration.");
        return Ok(());
    }

    let path = Config::config_file();
    header(format!("Configuration ({})", path.display()));
    if !path.exists() {
        info("No configuration file found, showing defaults.");
    }
    let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
    print!("{}", yaml);
    Ok(())
}
