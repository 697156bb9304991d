//! studio-api: Query and control a MosDynamic studio
//!
//! Usage:
//!   studio-api app-data                  # Show application data
//!   studio-api tasks                     # List queued/running tasks
//!   studio-api cancel [KEYS...]          # Cancel all background tasks
//!   studio-api refresh-cache <APP>       # Refresh an app's publish cache
//!
//! The studio address and session come from studio.json, --studio-address /
//! --session, or STUDIO_ADDRESS / STUDIO_PSDEVSLNSYS.

use clap::Parser;
use serde_json::Value;
use std::sync::Arc;
use studio_service_api::cli::{format_task_line, StudioArgs, StudioCommand};
use studio_service_api::{HttpTransport, ServiceApiError, ServiceApiService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let args = StudioArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_service_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let session = match config.session() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{} (use --studio-address / --session or studio.json)", e);
            std::process::exit(2);
        }
    };
    let transport = match HttpTransport::from_config(&config) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let service = ServiceApiService::new(session, Arc::new(transport));
    tracing::debug!("Using studio at {}", service.session().studio_address());

    if let Err(e) = run(&service, &args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(service: &ServiceApiService, args: &StudioArgs) -> Result<(), ServiceApiError> {
    match &args.command {
        StudioCommand::AppData => {
            let data = if args.strict {
                service.try_get_app_data().await?
            } else {
                service.get_app_data().await
            };
            if args.json {
                print_json(&Value::Object(data));
            } else if data.is_empty() {
                println!("No application data");
            } else {
                for (key, value) in &data {
                    println!("{}: {}", key, value);
                }
            }
        }
        StudioCommand::Tasks => {
            let tasks = if args.strict {
                service.try_get_system_run().await?
            } else {
                service.get_system_run().await
            };
            if args.json {
                print_json(&Value::Array(tasks.into_iter().map(Value::Object).collect()));
            } else if tasks.is_empty() {
                println!("No running tasks");
            } else {
                println!("{} running task(s):", tasks.len());
                for task in &tasks {
                    println!("  {}", format_task_line(task));
                }
            }
        }
        StudioCommand::Cancel { keys } => {
            let cancelled = if args.strict {
                service.try_cancel_system_run(keys.as_slice()).await?
            } else {
                service.cancel_system_run(keys.as_slice()).await
            };
            if args.json {
                print_json(&serde_json::json!({ "cancelled": cancelled }));
            } else if cancelled {
                println!("Cancelled all background tasks");
            } else {
                println!("Cancel request was not accepted");
            }
        }
        StudioCommand::RefreshCache { app } => {
            let refreshed = if args.strict {
                service.try_refresh_app_cache(app).await?
            } else {
                service.refresh_app_cache(app).await
            };
            if args.json {
                print_json(&serde_json::json!({ "app": app, "refreshed": refreshed }));
            } else if refreshed {
                println!("Refreshed publish cache for {}", app);
            } else {
                println!("Publish cache for {} was not refreshed", app);
            }
        }
    }
    Ok(())
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}
