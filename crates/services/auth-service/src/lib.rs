//! Auth Service Library
//!
//! This crate provides registration, login and JWT token lifecycle via gRPC.
//! Users are persisted with sea-orm; access and refresh tokens are signed with
//! independent secrets.

pub mod config;
pub mod grpc;
pub mod infra;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::info;

use crate::config::AuthServiceConfig;
use crate::grpc::AuthGrpcService;
use crate::infra::{Database, Persistence};
use crate::service::{Authenticator, TokenService};

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &AuthServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run the gRPC server with the given configuration.
pub async fn run_server(config: AuthServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    // Initialize database
    let db = Database::connect(&config.database).await?;
    db.ping().await?;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    // Create token and auth services
    let tokens = Arc::new(TokenService::new(&config.jwt));
    let auth_service = Arc::new(Authenticator::new(uow, tokens));

    // Create gRPC service
    let grpc_service = AuthGrpcService::new(auth_service);

    // Build address
    let addr: SocketAddr = config.service.addr().parse()?;
    info!("{} listening on {}", config.service.service_name, addr);

    // Run server
    Server::builder()
        .add_service(proto::AuthServiceServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}
