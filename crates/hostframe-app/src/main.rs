mod app_state;
mod cli;
mod dialogs;
mod host;

use hostframe_bridge::{apps, AppRegistry, WindowOptions};
use hostframe_common::HostframeError;
use hostframe_config::HostframeConfig;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

const DEFAULT_LOG_DIRECTIVE: &str = "hostframe=info";

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        eprintln!("\n--- Hostframe crashed ---");
        eprintln!("{info}");
        eprintln!("-------------------------\n");
        default_hook(info);
    }));
}

fn load_config(args: &cli::Args) -> (HostframeConfig, Option<HostframeError>) {
    let loaded = match &args.config {
        Some(path) => hostframe_config::load_from_path(path)
            .and_then(|config| hostframe_config::validate(&config).map(|()| config)),
        None => hostframe_config::load_config(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(e) => (HostframeConfig::default(), Some(e.into())),
    }
}

fn init_logging(directive: &str) {
    let directive = directive
        .parse::<Directive>()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse::<Directive>());
    let filter = match directive {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Applications this host can launch, configured from `config`.
fn build_registry(config: &HostframeConfig) -> hostframe_common::Result<AppRegistry> {
    let window = WindowOptions {
        id: format!("{}Window", apps::IFRAME_DEMO),
        title: config.window.title.clone(),
        width: config.window.width,
        height: config.window.height,
        x: config.window.x,
        y: config.window.y,
    };
    let mut registry = AppRegistry::new();
    apps::register_iframe_demo(&mut registry, window, config.app.resource.clone())?;
    Ok(registry)
}

fn main() {
    install_panic_hook();

    let args = cli::parse();

    // Logging needs the config's level, so load first and report afterwards.
    let (config, config_error) = load_config(&args);
    let directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.directive());
    init_logging(&directive);

    tracing::info!("Hostframe v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let registry = match build_registry(&config) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("Failed to register applications: {e}");
            return;
        }
    };

    if args.list_apps {
        for name in registry.names() {
            println!("{name}");
        }
        return;
    }

    let launch = args.app.clone().unwrap_or_else(|| config.app.launch.clone());
    if !registry.contains(&launch) {
        tracing::error!("Unknown application: {launch} (available: {})", registry.names().join(", "));
        return;
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return;
        }
    };
    let mut app = app_state::HostframeApp::new(&config, registry, launch);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
