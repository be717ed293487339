use clap::{ArgAction, Args, Parser, Subcommand};

/// Command-line interface definition for vattend
/// Volunteer attendance check-in/check-out backed by SQLite
#[derive(Parser)]
#[command(
    name = "vattend",
    version = env!("CARGO_PKG_VERSION"),
    about = "Volunteer attendance: roster, check-in and check-out with state reconciliation",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Increase diagnostic output on stderr (-v info, -vv debug)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Decode the activity id carried by a scanned QR token
    Decode {
        /// 32-character lowercase hex token
        token: String,
    },

    /// Manage registered users
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Build and print the attendance roster
    Roster {
        /// Only users of this department
        #[arg(long = "dept", conflicts_with = "user")]
        dept: Option<i64>,

        /// Only this user
        #[arg(long = "user")]
        user: Option<i64>,

        /// Print the roster as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Check a volunteer in
    Checkin(AttendanceArgs),

    /// Check a volunteer out
    Checkout(AttendanceArgs),

    /// Show the current status of one volunteer
    Status {
        user_id: i64,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", default_value_t = 50, help = "Maximum number of rows")]
        limit: usize,
    },
}

#[derive(Args, Clone)]
pub struct AttendanceArgs {
    pub user_id: i64,

    /// Operator id recorded with the submission (default from config)
    #[arg(long = "operator-id")]
    pub operator_id: Option<i64>,

    /// Operator name recorded with the submission (default from config)
    #[arg(long = "operator-name")]
    pub operator_name: Option<String>,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user
    Add {
        user_id: i64,

        /// Login name
        #[arg(long = "name")]
        name: String,

        #[arg(long = "legal-name")]
        legal_name: Option<String>,

        #[arg(long = "nick-name")]
        nick_name: Option<String>,

        #[arg(long = "dept")]
        dept: Option<i64>,

        /// Role key (manage, part_manage, staff, admin); repeatable
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Grant the administrator flag
        #[arg(long = "admin")]
        admin: bool,
    },

    /// List registered users
    List,
}
