pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod models;
pub mod services;

pub use config::Config;
use db::Store;
use models::admin::{PermissionSet, Role};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "serve" | "-s" | "--serve" => serve(config).await,

        "init" => {
            if config::Config::create_default_if_missing()? {
                println!("Created config.toml");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }

        "admin" => {
            if args.len() < 3 {
                println!("Usage: vitrine admin create <email> <password> <name> [role]");
                return Ok(());
            }
            match args[2].as_str() {
                "create" => {
                    if args.len() < 6 {
                        println!("Usage: vitrine admin create <email> <password> <name> [role]");
                        return Ok(());
                    }
                    let role = args.get(6).map_or("editor", String::as_str);
                    cmd_create_admin(&config, &args[3], &args[4], &args[5], role).await
                }
                other => {
                    println!("Unknown admin subcommand: {}", other);
                    Ok(())
                }
            }
        }

        "help" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        other => {
            println!("Unknown command: {}", other);
            print_help();
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    info!("Vitrine v{} starting...", env!("CARGO_PKG_VERSION"));

    let state = api::create_app_state_from_config(config.clone()).await?;
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn cmd_create_admin(
    config: &Config,
    email: &str,
    password: &str,
    name: &str,
    role: &str,
) -> anyhow::Result<()> {
    let Some(role) = Role::parse(role) else {
        println!("Unknown role '{role}'. Use super-admin, admin or editor.");
        return Ok(());
    };

    let store = Store::new(&config.general.database_path).await?;

    if store.find_admin_by_email(email).await?.is_some() {
        println!("An admin with email {email} already exists");
        return Ok(());
    }

    let permissions = if role == Role::SuperAdmin {
        PermissionSet::all()
    } else {
        PermissionSet::default()
    };

    let admin = store
        .create_admin(
            email,
            password,
            name,
            role,
            permissions,
            Some(&config.security),
        )
        .await?;

    println!("Created {} admin {} ({})", admin.role, admin.name, admin.email);
    Ok(())
}

fn print_help() {
    println!("Vitrine - Marketing site backend with an admin CMS");
    println!();
    println!("USAGE:");
    println!("  vitrine <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Run the HTTP API server");
    println!("  init              Create default config file");
    println!("  admin create <email> <password> <name> [role]");
    println!("                    Provision an admin account (role: super-admin, admin, editor)");
    println!("  help              Show this help message");
    println!();
    println!("EXAMPLES:");
    println!("  vitrine init                                  # Write config.toml");
    println!("  vitrine admin create a@b.com secret123 Ada    # Create an editor");
    println!("  vitrine serve                                 # Start the API");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml; set VITRINE_JWT_SECRET in the environment or .env");
}
