use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

mod agents;
mod artifacts;
mod config;
mod controllers;
mod db;
mod dispatch;
mod error;
mod metrics;
mod orchestrator;
mod scheduler;
mod tasks;

use agents::AgentRegistry;
use artifacts::FileArtifactSink;
use config::Config;
use db::Database;
use dispatch::DispatchPolicy;
use orchestrator::Orchestrator;
use scheduler::{Scheduler, SchedulerConfig};
use tasks::TaskStore;

pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub artifacts: Arc<FileArtifactSink>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Agent/archetype definitions live in the config directory
    // Check ./config first, then ../config (for running from a subdirectory)
    let config_dir = if std::path::Path::new("./config").exists() {
        std::path::Path::new("./config")
    } else if std::path::Path::new("../config").exists() {
        std::path::Path::new("../config")
    } else {
        panic!("Config directory not found in ./config or ../config");
    };
    log::info!("Using config directory: {:?}", config_dir);

    let config = Config::from_env();
    let port = config.port;

    // Refuse to start on a bad or empty roster - dispatch over zero agents
    // is meaningless
    log::info!("Loading agent registry");
    let registry = Arc::new(
        AgentRegistry::load(config_dir).expect("Failed to load agent registry"),
    );

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    log::info!("Initializing orchestrator");
    let store = TaskStore::new(db.clone());
    let sink = Arc::new(FileArtifactSink::new(&config.artifacts_dir));
    let orchestrator = Arc::new(Orchestrator::new(
        registry.clone(),
        DispatchPolicy::default(),
        store,
        sink.clone(),
    ));

    // Start the heartbeat scheduler (a no-op unless configured)
    let scheduler_config = SchedulerConfig {
        heartbeat_interval_minutes: config.heartbeat_interval_minutes,
        ..SchedulerConfig::default()
    };
    let scheduler = Arc::new(Scheduler::new(orchestrator.clone(), scheduler_config));
    let (scheduler_shutdown_tx, scheduler_shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = Arc::clone(&scheduler);
    tokio::spawn(async move {
        scheduler_handle.start(scheduler_shutdown_rx).await;
    });

    log::info!("Starting SINCOR server on port {}", port);

    let orch = orchestrator.clone();
    let artifacts = sink.clone();
    let result = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                orchestrator: Arc::clone(&orch),
                artifacts: Arc::clone(&artifacts),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::tasks::config)
            .configure(controllers::status::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await;

    // stop the heartbeat before exiting
    let _ = scheduler_shutdown_tx.send(());
    result
}
