use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use ourstreet_auth::{AuthError, Authenticator};
use ourstreet_config::{load as load_config, AppConfig};
use ourstreet_database::{
    initialize_database, CreateIssueRequest, IssueRepository, IssueStatus, SqlitePool, UserRole,
};
use ourstreet_runtime::{shutdown_signal, telemetry, BackendServices};
use sqlx::Row;
use tokio::net::TcpListener;
use tracing::{info, warn};

const DEMO_PASSWORD: &str = "ourstreet-demo";

#[derive(Parser)]
#[command(name = "ourstreet")]
#[command(about = "OurStreet civic issue backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
    /// Seed the database with demo accounts and issues
    SeedData,
    /// Print users and issues stored in the database
    DumpData,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(&config).await,
        Commands::Migrate => migrate(&config).await,
        Commands::SeedData => seed_data(&config).await,
        Commands::DumpData => dump_data(&config).await,
    }
}

async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    info!("starting OurStreet backend");

    let services = BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")?;
    let app = services.router();

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = initialize_database(&config.database)
        .await
        .context("database migrations failed")?;
    pool.close().await;

    info!(database = %config.database.url, "database schema is up to date");
    Ok(())
}

async fn seed_data(config: &AppConfig) -> anyhow::Result<()> {
    info!("seeding database with demo data");

    let services = BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")?;
    let authenticator = services.state.authenticator();

    let resident = ensure_account(authenticator, "Demo Resident", "resident@ourstreet.local").await?;
    let admin = ensure_account(authenticator, "Demo Admin", "admin@ourstreet.local").await?;

    sqlx::query("UPDATE users SET role = ? WHERE id = ?")
        .bind(UserRole::Admin.as_str())
        .bind(admin)
        .execute(&services.db_pool)
        .await
        .context("failed to promote demo admin")?;

    let issues = IssueRepository::new(services.db_pool.clone());
    if !issues
        .find_by_user_id(resident)
        .await
        .context("failed to read demo issues")?
        .is_empty()
    {
        println!("Demo issues already present, skipping");
        return Ok(());
    }

    let now = Utc::now();
    let seeds = [
        ("Pothole on Market Road", "roads", IssueStatus::Open, 2),
        ("Streetlight out near school", "lighting", IssueStatus::InProgress, 26),
        ("Overflowing garbage bin", "sanitation", IssueStatus::Resolved, 72),
        ("Broken footpath tiles", "roads", IssueStatus::Closed, 240),
    ];

    for (title, category, status, hours_ago) in seeds {
        issues
            .create(
                resident,
                &CreateIssueRequest {
                    title: title.to_string(),
                    description: format!("{title} reported during seeding"),
                    category: category.to_string(),
                    status,
                    latitude: Some(15.4909),
                    longitude: Some(73.8278),
                    address: Some("Panaji, Goa".to_string()),
                    image_url: None,
                    created_at: Some(now - Duration::hours(hours_ago)),
                },
            )
            .await
            .with_context(|| format!("failed to insert demo issue `{title}`"))?;
    }

    println!("Database seeded with demo data:");
    println!("- resident@ourstreet.local / {DEMO_PASSWORD}");
    println!("- admin@ourstreet.local / {DEMO_PASSWORD} (admin)");
    println!("- {} issues", seeds.len());
    println!("Run 'dump-data' to see the inserted data");

    Ok(())
}

async fn ensure_account(authenticator: &Authenticator, name: &str, email: &str) -> anyhow::Result<i64> {
    match authenticator
        .register_with_password(Some(name), email, DEMO_PASSWORD)
        .await
    {
        Ok(user) => Ok(user.id),
        Err(AuthError::UserExists) => {
            warn!(%email, "demo account already exists");
            let outcome = authenticator
                .login_with_password(email, DEMO_PASSWORD)
                .await
                .with_context(|| format!("existing account {email} does not use the demo password"))?;
            Ok(outcome.user.id)
        }
        Err(err) => Err(err).with_context(|| format!("failed to create demo account {email}")),
    }
}

async fn dump_data(config: &AppConfig) -> anyhow::Result<()> {
    let pool = initialize_database(&config.database)
        .await
        .context("failed to open database")?;

    dump_users(&pool).await?;
    dump_issues(&pool).await?;
    Ok(())
}

async fn dump_users(pool: &SqlitePool) -> anyhow::Result<()> {
    let users = sqlx::query(
        "SELECT id, public_id, name, email, role, created_at FROM users ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch users")?;

    println!("=== USERS ===");
    if users.is_empty() {
        println!("No users found in database");
        return Ok(());
    }

    println!(
        "{:<5} {:<26} {:<20} {:<30} {:<8} {:<25}",
        "ID", "Public ID", "Name", "Email", "Role", "Created At"
    );
    println!("{}", "-".repeat(118));
    for user in users {
        let name: Option<String> = user.get("name");
        println!(
            "{:<5} {:<26} {:<20} {:<30} {:<8} {:<25}",
            user.get::<i64, _>("id"),
            user.get::<String, _>("public_id"),
            name.as_deref().unwrap_or("NULL"),
            user.get::<String, _>("email"),
            user.get::<String, _>("role"),
            user.get::<String, _>("created_at"),
        );
    }
    Ok(())
}

async fn dump_issues(pool: &SqlitePool) -> anyhow::Result<()> {
    let issues = sqlx::query(
        "SELECT public_id, user_id, title, category, status, upvotes, created_at FROM issues ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch issues")?;

    println!("\n=== ISSUES ===");
    if issues.is_empty() {
        println!("No issues found in database");
        return Ok(());
    }

    println!(
        "{:<26} {:<8} {:<32} {:<12} {:<12} {:<7} {:<25}",
        "Public ID", "User ID", "Title", "Category", "Status", "Votes", "Created At"
    );
    println!("{}", "-".repeat(128));
    for issue in issues {
        println!(
            "{:<26} {:<8} {:<32} {:<12} {:<12} {:<7} {:<25}",
            issue.get::<String, _>("public_id"),
            issue.get::<i64, _>("user_id"),
            issue.get::<String, _>("title"),
            issue.get::<String, _>("category"),
            issue.get::<String, _>("status"),
            issue.get::<i64, _>("upvotes"),
            issue.get::<String, _>("created_at"),
        );
    }
    Ok(())
}
