use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use udasecurity::{
    CameraImage, ConsoleStatusListener, ControlPanel, DirectoryImageSource, EventBus,
    EventBusListener, EventFilter, EventReceiver, KeyboardControl, SecurityConfig,
    SecurityController, SecurityEvent, StatusListener,
};

#[derive(Parser, Debug)]
#[command(name = "udasecurity")]
#[command(about = "Home security controller with cat-aware camera scanning")]
#[command(version)]
#[command(long_about = "A home security controller that tracks arming state and sensor \
activation, escalates alarms, and scans camera frames for cats. Runs an interactive \
keyboard console by default.")]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "udasecurity.toml",
        help = "Path to TOML configuration file"
    )]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Print the current security status and exit
    #[arg(long, help = "Print arming status, alarm status and sensors, then exit")]
    status: bool,

    /// Scan a single image file for a cat and exit
    #[arg(long, value_name = "PATH", help = "Process one image file and exit")]
    scan: Option<String>,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("# UdaSecurity Configuration File");
        println!();
        println!("{}", SecurityConfig::default().to_toml()?);
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting UdaSecurity v{}", env!("CARGO_PKG_VERSION"));

    let config = match SecurityConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("✗ Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if args.validate_config {
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let controller = SecurityController::from_config(&config).map_err(|e| {
        error!("Failed to initialize security controller: {}", e);
        e
    })?;

    let console: Arc<dyn StatusListener> = Arc::new(ConsoleStatusListener::stdout());
    controller.add_status_listener(Arc::clone(&console));

    if let Some(path) = &args.scan {
        let image = CameraImage::open(path)?;
        controller.process_image(&image)?;
        println!(
            "Cat {} in {}",
            if controller.cat_detected() { "detected" } else { "not detected" },
            path
        );
        return Ok(());
    }

    if args.status {
        print_status(&controller);
        return Ok(());
    }

    run_console(&config, controller).await
}

async fn run_console(config: &SecurityConfig, controller: SecurityController) -> Result<()> {
    let event_bus = EventBus::new(config.system.event_bus_capacity);
    controller.add_status_listener(Arc::new(EventBusListener::new(event_bus.clone())));

    let mut shutdown_receiver = EventReceiver::new(
        event_bus.subscribe(),
        EventFilter::EventTypes(vec!["shutdown_requested"]),
        "main".to_string(),
    );
    let mut activity_receiver = EventReceiver::new(
        event_bus.subscribe(),
        EventFilter::All,
        "activity_log".to_string(),
    );

    tokio::spawn(async move {
        while let Ok(event) = activity_receiver.recv().await {
            info!(event = event.event_type(), at = %event.timestamp(), "{}", event.description());
        }
    });

    print_status(&controller);

    let panel = ControlPanel::new(
        controller,
        DirectoryImageSource::new(&config.camera.image_dir, config.camera.blank_resolution),
        event_bus.clone(),
    );
    let keyboard = KeyboardControl::new();
    let keyboard_task = keyboard.start(panel);

    tokio::select! {
        event = shutdown_receiver.recv() => {
            if let Ok(SecurityEvent::ShutdownRequested { reason, .. }) = event {
                info!("Shutting down: {}", reason);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    keyboard.stop().await?;
    if let Err(e) = keyboard_task.await {
        warn!("Keyboard task ended abnormally: {}", e);
    }

    info!("UdaSecurity stopped");
    Ok(())
}

fn print_status(controller: &SecurityController) {
    let alarm = controller.alarm_status();
    let arming = controller.arming_status();

    println!("Arming: {}", arming.description());
    println!("Alarm:  {}", alarm.description());

    let sensors = controller.sensors();
    println!("Sensors: {} of {} active", sensors.active_count(), sensors.len());
    for (index, sensor) in sensors.iter().enumerate() {
        println!("  [{}] {}", index + 1, sensor);
    }
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("udasecurity={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}
