use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::{Decision, Ident, NewRoom, RoomType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod digest;
mod pages;
mod poll;
mod session;
#[cfg(test)]
mod testing;
mod ui;
mod views;

use pages::{admin, auth, rooms, student, Context, Navigation};

#[derive(Parser)]
#[command(name = "hostel")]
#[command(about = "Student hostel client - rooms, housing applications and admin approvals")]
#[command(version = env!("HOSTEL_VERSION"))]
struct Cli {
    /// API base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List rooms
    Rooms {
        /// Only rooms that are available
        #[arg(long)]
        available: bool,
        #[arg(long)]
        building: Option<String>,
        #[arg(long)]
        room_type: Option<String>,
    },
    /// Login and open the matching dashboard
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a student account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        student_id: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Student dashboard
    Dashboard {
        /// Keep refreshing the application list until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
    /// Apply for housing
    Apply {
        #[arg(long)]
        building: String,
        #[arg(long)]
        room_type: String,
        /// YYYY-MM-DD
        #[arg(long)]
        move_in_date: String,
        #[arg(long, default_value = "")]
        requirements: String,
    },
    /// Admin pages and actions
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Check an input against a SHA-256 hex digest
    Digest {
        input: String,
        /// Expected hex digest
        #[arg(long)]
        expect: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Stats, applications, rooms and recent activity
    Dashboard,
    /// Show one application
    Application { id: Ident },
    /// Approve a pending application
    Approve { id: Ident },
    /// Reject a pending application
    Reject { id: Ident },
    /// Show one room
    Room { id: Ident },
    /// List students
    Students,
    /// Add a room to the inventory
    AddRoom {
        #[arg(long)]
        room_number: String,
        #[arg(long)]
        building: String,
        #[arg(long)]
        floor: String,
        /// single, double or suite
        #[arg(long)]
        room_type: RoomType,
        #[arg(long)]
        capacity: u32,
    },
    /// Assign an available room to a student
    AssignRoom {
        room_id: Ident,
        /// Student id; picked from a list when omitted
        #[arg(long)]
        student: Option<Ident>,
        /// YYYY-MM-DD
        #[arg(long)]
        move_in_date: String,
    },
    /// Delete a room
    DeleteRoom {
        room_id: Ident,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, poll_interval)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Show all configuration
    Show,
    /// Get the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hostel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { action } => return handle_config_command(action),
        Commands::Digest { input, expect } => {
            handle_digest(&input, expect.as_deref());
            return Ok(());
        }
        _ => {}
    }

    let config = config::Config::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config: {}", e);
        config::Config::default()
    });
    let base_url = cli.api_url.unwrap_or_else(|| config.api.base_url.clone());

    let ctx = Context {
        api: api::ApiClient::new(&base_url)?,
        sessions: session::SessionStore::open_default()?,
        poll_interval: config.dashboard.poll_interval(),
    };
    tracing::debug!(
        "Using API at {} with session file {:?}",
        ctx.api.base_url(),
        ctx.sessions.path()
    );
    let mut terminal = ui::Terminal;
    let ui: &mut dyn ui::Ui = &mut terminal;

    let nav = match cli.command {
        Commands::Rooms {
            available,
            building,
            room_type,
        } => {
            let filter = rooms::RoomFilter {
                available_only: available,
                building,
                room_type,
            };
            rooms::list(&ctx, ui, &filter).await?
        }
        Commands::Login { email, password } => {
            auth::login(&ctx, ui, auth::LoginForm { email, password }).await?
        }
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
            student_id,
            phone,
            address,
        } => {
            let form = auth::RegisterForm {
                name,
                email,
                password,
                confirm_password,
                student_id,
                phone,
                address,
            };
            auth::register(&ctx, ui, form).await?
        }
        Commands::Logout => auth::logout(&ctx, ui)?,
        Commands::Whoami => auth::whoami(&ctx, ui),
        Commands::Dashboard { watch: false } => student::dashboard(&ctx, ui).await?,
        Commands::Dashboard { watch: true } => {
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl-C: {}", e);
                }
            };
            student::watch(&ctx, ui, shutdown).await?
        }
        Commands::Apply {
            building,
            room_type,
            move_in_date,
            requirements,
        } => {
            let form = student::ApplicationForm {
                preferred_building: building,
                preferred_room_type: room_type,
                move_in_date,
                special_requirements: requirements,
            };
            student::apply(&ctx, ui, form).await?
        }
        Commands::Admin { action } => handle_admin_command(&ctx, ui, action).await?,
        Commands::Config { .. } | Commands::Digest { .. } => Navigation::Stay,
    };

    pages::follow(&ctx, ui, nav).await
}

async fn handle_admin_command(
    ctx: &Context,
    ui: &mut dyn ui::Ui,
    action: AdminAction,
) -> Result<Navigation> {
    match action {
        AdminAction::Dashboard => admin::dashboard(ctx, ui).await,
        AdminAction::Application { id } => admin::view_application(ctx, ui, &id).await,
        AdminAction::Approve { id } => admin::review(ctx, ui, &id, Decision::Approve).await,
        AdminAction::Reject { id } => admin::review(ctx, ui, &id, Decision::Reject).await,
        AdminAction::Room { id } => admin::view_room(ctx, ui, &id).await,
        AdminAction::Students => admin::list_students(ctx, ui).await,
        AdminAction::AddRoom {
            room_number,
            building,
            floor,
            room_type,
            capacity,
        } => {
            let room = NewRoom::new(room_number, building, floor, room_type, capacity);
            admin::add_room(ctx, ui, room).await
        }
        AdminAction::AssignRoom {
            room_id,
            student,
            move_in_date,
        } => admin::assign_room(ctx, ui, &room_id, student, move_in_date).await,
        AdminAction::DeleteRoom { room_id, yes } => admin::delete_room(ctx, ui, &room_id, yes).await,
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = config::Config::load().unwrap_or_default();
            config.set(&key, &value)?;
            config.save()?;
            println!("Configuration saved");
        }
        ConfigAction::Get { key } => {
            let config = config::Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Show => {
            let config = config::Config::load()?;
            println!("api_url: {}", config.api.base_url);
            println!("poll_interval: {}", config.dashboard.poll_interval_secs);
        }
        ConfigAction::Path => {
            let path = config::Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn handle_digest(input: &str, expect: Option<&str>) {
    let computed = digest::sha256_hex(input);
    println!("{}", computed);
    if let Some(expected) = expect {
        if digest::matches(input, expected) {
            println!("\x1b[32m✓ Digest matches\x1b[0m");
        } else {
            println!("\x1b[31m✗ Digest does not match\x1b[0m");
        }
    }
}
