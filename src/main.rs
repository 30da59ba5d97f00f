// ABOUTME: Main entry point for the ckl checklist runner and its container wrapper

use anyhow::{Context, Result};
use ckl::app::{App, EventHandler};
use ckl::cli::{Cli, Commands, ImageCommand};
use ckl::components::LayoutComponent;
use ckl::config::AppConfig;
use ckl::docker::{BuildOptions, ContainerManager, ImageBuilder, RunOptions};
use ckl::session::clear_sessions;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    if let Some(Commands::Image(command)) = cli.command {
        let config = init(cli.config.as_deref())?;
        return run_image_command(command, &config).await;
    }

    // Usage errors exit before a config is read or a log file is created
    let Some(path) = cli.path_to_checklist else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "the following required arguments were not provided:\n  <PATH_TO_CHECKLIST>")
            .exit();
    };

    let config = init(cli.config.as_deref())?;
    run_checklist(&path, cli.clear_sessions, &config)?;
    Ok(0)
}

fn init(config_path: Option<&Path>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    setup_logging(&config.log_file);
    setup_panic_handler();
    Ok(config)
}

fn run_checklist(path: &Path, clear: bool, config: &AppConfig) -> Result<()> {
    if clear {
        clear_sessions(&config.sessions_root)
            .with_context(|| format!("Failed to clear {}", config.sessions_root.display()))?;
    }

    // Load before touching the terminal so errors print normally
    let mut app = App::load(path, config)?;
    info!("Running checklist {}", path.display());

    let mut layout = LayoutComponent::new();
    run_tui(&mut app, &mut layout)
}

fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    if !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("ckl needs an interactive terminal"));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(app, layout, &mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    app: &mut App,
    layout: &mut LayoutComponent,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.state.page_size = LayoutComponent::page_size(terminal.size()?.height);
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            return Ok(());
        }
    }
}

async fn run_image_command(command: ImageCommand, config: &AppConfig) -> Result<i32> {
    let docker = &config.docker;
    match command {
        ImageCommand::Build {
            no_cache,
            pull,
            tag,
            context,
        } => {
            let tag = tag.unwrap_or_else(|| docker.image.clone());
            let builder = ImageBuilder::new(docker.host.as_deref()).await?;
            let options = BuildOptions {
                context_path: context,
                dockerfile: docker.dockerfile.clone(),
                no_cache,
                pull,
            };

            let (tx, mut rx) = mpsc::channel::<String>(100);
            let printer = tokio::spawn(async move {
                while let Some(line) = rx.recv().await {
                    println!("{line}");
                }
            });
            let result = builder.build_image(&tag, &options, Some(tx)).await;
            let _ = printer.await;
            result?;

            println!("Built image {tag}");
            Ok(0)
        }
        ImageCommand::Shell { clear_sessions } => {
            launch(config, Some(vec![docker.shell.clone()]), clear_sessions).await
        }
        ImageCommand::Run { clear_sessions, args } => {
            let command = if args.is_empty() {
                None
            } else {
                Some(std::iter::once("ckl".to_string()).chain(args).collect())
            };
            launch(config, command, clear_sessions).await
        }
    }
}

async fn launch(config: &AppConfig, command: Option<Vec<String>>, clear: bool) -> Result<i32> {
    let host_dir: PathBuf = std::env::current_dir().context("Failed to read current directory")?;
    if clear {
        let sessions = host_dir.join(&config.sessions_root);
        clear_sessions(&sessions).with_context(|| format!("Failed to clear {}", sessions.display()))?;
    }

    let options = RunOptions {
        image: config.docker.image.clone(),
        name: config.docker.container_name.clone(),
        host_dir,
        mount_path: config.docker.mount_path.clone(),
        command,
        interactive: io::stdin().is_terminal(),
    };

    let manager = ContainerManager::new(config.docker.host.as_deref()).await?;
    let exit_code = manager.run(&options).await?;
    Ok(i32::try_from(exit_code).unwrap_or(1))
}

fn setup_logging(log_file: &Path) {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    if let Some(dir) = log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        let _ = std::fs::create_dir_all(dir);
    }

    // Logging is best effort; the TUI owns stdout and stderr
    let Ok(file) = OpenOptions::new().create(true).append(true).open(log_file) else {
        return;
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false), // No ANSI colors in log file
        )
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "ckl=info".into()))
        .try_init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Please check the logs for more details.");
    }));
}
