mod app;
mod buffer;
mod config;
mod logger;
mod plotter;
mod polling;
mod pose;
mod service;
mod types;

use std::time::Duration;
use dotenv::dotenv;
use eframe::egui;
use log::{error, info};

use app::{DashboardApp, SessionController};
use config::ConfigManager;
use service::{DemoPoseService, HttpPoseService, PoseService};

fn main() {
    dotenv().ok();
    logger::init_logger();
    info!("Application starting");

    let config = match ConfigManager::discover() {
        Ok(config) => {
            if config.config_path().is_none() {
                info!("Set POSE_DASHBOARD_CONFIG or add config.toml to change the defaults");
            }
            config
        }
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.get_config().runtime.worker_threads)
        .thread_name("pose-io")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let demo = std::env::args().any(|arg| arg == "--demo");
    let result = if demo {
        info!("Running against the built-in demo pose service");
        run_dashboard(DemoPoseService::default(), config, runtime.handle().clone())
    } else {
        match HttpPoseService::new(&config.get_config().service) {
            Ok(service) => {
                info!("Pose service at {}", config.get_config().service.base_url);
                run_dashboard(service, config, runtime.handle().clone())
            }
            Err(e) => {
                error!("Failed to build HTTP client: {}", e);
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }

    info!("GUI closed, shutting down runtime");
    runtime.shutdown_timeout(Duration::from_secs(3));
}

fn run_dashboard<S: PoseService>(
    service: S,
    config: ConfigManager,
    runtime: tokio::runtime::Handle,
) -> Result<(), eframe::Error> {
    let window = config.get_config().window.clone();
    let controller = SessionController::new(service, runtime, config.get_config());

    let options = eframe::NativeOptions {
        vsync: window.vsync,
        viewport: egui::ViewportBuilder::default()
            .with_title(window.title.clone())
            .with_inner_size([window.width, window.height])
            .with_resizable(window.resizable),
        ..Default::default()
    };

    eframe::run_native(
        &window.title,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(controller, config)))),
    )
}
