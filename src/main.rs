use std::io::Error;
use std::sync::Arc;

use poem::{Server, listener::TcpListener};
use sqlx::postgres::PgPoolOptions;
use tokio::main;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    application::{
        services::{
            activation::ActivationMilestoneNotifier, clock::SystemClock,
            scheduler::MessageScheduler,
        },
        usecases::run_sweep::RunSweepUseCase,
    },
    config::Config,
    infrastructure::{
        batch::{BatchTriggerConfig, RemoteBatchTrigger},
        messaging::postgres_chat::PostgresChatDelivery,
        repositories::{
            in_memory::InMemoryMilestoneMarkRepository,
            postgres::{PostgresAdminDirectory, PostgresScheduleRepository},
        },
    },
    presentation::http::{build_app, endpoints::root::ApiState},
};

mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;

#[main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::try_parse().map_err(Error::other)?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(Error::other)?;

    let clock = Arc::new(SystemClock);
    let schedules = PostgresScheduleRepository::new(pool.clone());
    let admins = PostgresAdminDirectory::new(pool.clone());
    let chat = PostgresChatDelivery::new(pool);
    let marks = Arc::new(InMemoryMilestoneMarkRepository::new());

    let scheduler = Arc::new(MessageScheduler::new(
        schedules,
        chat.clone(),
        clock.clone(),
    ));
    let milestone_notifier = Arc::new(ActivationMilestoneNotifier::new(
        chat, admins, marks, clock,
    ));

    let remote_trigger = config.batch_endpoint_url.clone().map(|endpoint_url| {
        RemoteBatchTrigger::new(BatchTriggerConfig {
            endpoint_url,
            service_key: config.batch_service_key.clone(),
        })
    });
    let sweep_usecase = Arc::new(RunSweepUseCase::new(scheduler.clone(), remote_trigger));

    let state = Arc::new(ApiState {
        scheduler,
        sweep_usecase,
        milestone_notifier,
        batch_service_key: config.batch_service_key.clone(),
    });

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);
    info!("starting server at {server_url}");

    let app = build_app(state, &server_url);

    Server::new(TcpListener::bind(format!("localhost:{}", config.port)))
        .run(app)
        .await
}
