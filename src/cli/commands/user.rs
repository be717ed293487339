use crate::cli::commands::open_authority;
use crate::cli::parser::UserCommand;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::{Profile, Role, RoleAssignment};
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub async fn handle(action: &UserCommand, cfg: &Config) -> AppResult<()> {
    match action {
        UserCommand::Add {
            user_id,
            name,
            legal_name,
            nick_name,
            dept,
            roles,
            admin,
        } => {
            if let Some(bad) = roles.iter().find(|k| Role::from_key(k).is_none()) {
                return Err(AppError::InvalidRole(bad.clone()));
            }

            let profile = Profile {
                user_id: *user_id,
                user_name: name.clone(),
                legal_name: legal_name.clone(),
                nick_name: nick_name.clone(),
                dept_id: *dept,
            };
            let assignment = RoleAssignment::new(*admin, roles.clone());

            let authority = open_authority(cfg)?;
            authority.add_user(&profile, &assignment)?;

            match assignment.eligible_role() {
                Some(role) => success(format!(
                    "User {} ({}) registered as {}.",
                    profile.user_id,
                    profile.display_name(),
                    role.as_str()
                )),
                None => info(format!(
                    "User {} ({}) registered without an eligible role; not shown on the roster.",
                    profile.user_id,
                    profile.display_name()
                )),
            }
            Ok(())
        }
        UserCommand::List => {
            let authority = open_authority(cfg)?;
            let users = authority.with_pool(|pool| crate::db::queries::list_users(&pool.conn))?;
            if users.is_empty() {
                info("No users registered.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("USER", 8),
                Column::new("DEPT", 4),
            ]);
            for u in &users {
                table.add_row(vec![
                    u.user_id.to_string(),
                    u.user_name.clone(),
                    u.dept_id.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                ]);
            }
            print!("{}", table.render());
            Ok(())
        }
    }
}
