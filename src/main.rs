//! Kiosk binary entry point.
//!
//! Parses the command line, resolves the layered configuration, applies the
//! Chromium command line, optionally starts the local file server, and then
//! drives the window lifecycle until the window closes or a shutdown signal
//! arrives.

use std::process;
use std::sync::Arc;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio::signal;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kiosk_browser::chrome::{apply_command_line, RecordingCommandLine};
use kiosk_browser::config::{parse_port, CliArgs, ResolvedConfig, SettingsStore};
use kiosk_browser::serve::LocalServer;
use kiosk_browser::window::{resolve_target_url, EventOutcome, HeadlessBackend, WindowLauncher};
use kiosk_browser::{fatal, NAME, VERSION};

/// Build the CLI command parser.
fn build_cli() -> Command {
    let toggle = |name: &'static str, short: Option<char>, help: &'static str| {
        let mut arg = Arg::new(name).long(name).help(help).action(ArgAction::SetTrue);
        if let Some(short) = short {
            arg = arg.short(short);
        }
        arg
    };
    let negation = |name: &'static str, positive: &'static str| {
        Arg::new(name)
            .long(name)
            .hide(true)
            .action(ArgAction::SetTrue)
            .conflicts_with(positive)
    };

    Command::new(NAME)
        .version(VERSION)
        .about("Full-screen kiosk wrapper around an embedded Chromium runtime")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (repeatable)")
                .action(ArgAction::Count),
        )
        .arg(toggle("dev", Some('d'), "Open the developer tools on startup"))
        .arg(negation("no-dev", "dev"))
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Chromium remote debugging port (0 disables)")
                .value_parser(parse_port),
        )
        .arg(toggle("cursor", Some('c'), "Keep the mouse cursor visible"))
        .arg(negation("no-cursor", "cursor"))
        .arg(toggle("menu", Some('m'), "Show the application menu"))
        .arg(negation("no-menu", "menu"))
        .arg(toggle("kiosk", Some('k'), "Lock the window into kiosk mode"))
        .arg(negation("no-kiosk", "kiosk"))
        .arg(toggle(
            "always-on-top",
            Some('T'),
            "Keep the window above all others",
        ))
        .arg(negation("no-always-on-top", "always-on-top"))
        .arg(toggle(
            "fullscreen",
            Some('f'),
            "Span the window across the whole virtual desktop",
        ))
        .arg(negation("no-fullscreen", "fullscreen"))
        .arg(toggle(
            "integration",
            Some('i'),
            "Expose the runtime integration API to pages",
        ))
        .arg(negation("no-integration", "integration"))
        .arg(toggle(
            "localhost",
            Some('l'),
            "Map every hostname to 127.0.0.1",
        ))
        .arg(negation("no-localhost", "localhost"))
        .arg(
            Arg::new("zoom")
                .short('z')
                .long("zoom")
                .value_name("FACTOR")
                .help("Page zoom factor")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("URL to load instead of the home page"),
        )
        .arg(
            Arg::new("serve")
                .short('s')
                .long("serve")
                .value_name("DIR")
                .help("Serve this directory over a local HTTP server")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(toggle(
            "transparent",
            Some('t'),
            "Frameless window with a transparent background",
        ))
        .arg(negation("no-transparent", "transparent"))
        .arg(
            Arg::new("retry")
                .long("retry")
                .value_name("SECONDS")
                .help("Reload this many seconds after a page load failure (0 disables)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("preload")
                .long("preload")
                .value_name("FILE")
                .help("Script injected into every page before it loads")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("append-chrome-switch")
                .long("append-chrome-switch")
                .value_name("SWITCH")
                .help("Extra Chromium switch, e.g. --append-chrome-switch=--disable-gpu")
                .action(ArgAction::Append)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("append-chrome-argument")
                .long("append-chrome-argument")
                .value_name("ARG")
                .help("Extra Chromium positional argument")
                .action(ArgAction::Append)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("use-minimal-chrome-cli")
                .long("use-minimal-chrome-cli")
                .help("Skip the bundled default Chromium switches")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("target")
                .value_name("URL")
                .help("URL or file to open (overrides --url)"),
        )
}

/// Parse CLI matches into the resolver's input struct. Booleans are
/// tri-state: `--flag` forces on, `--no-flag` forces off, absence falls
/// through to the settings store.
fn parse_cli_args(matches: &ArgMatches) -> CliArgs {
    let toggle = |name: &str| -> Option<bool> {
        if matches.get_flag(name) {
            Some(true)
        } else if matches.get_flag(&format!("no-{name}")) {
            Some(false)
        } else {
            None
        }
    };
    let appended = |name: &str| -> Vec<String> {
        matches
            .get_many::<String>(name)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    };

    let verbose = matches.get_count("verbose");

    CliArgs {
        verbose: (verbose > 0).then_some(verbose),
        dev: toggle("dev"),
        port: matches.get_one::<u16>("port").copied(),
        cursor: toggle("cursor"),
        menu: toggle("menu"),
        kiosk: toggle("kiosk"),
        always_on_top: toggle("always-on-top"),
        fullscreen: toggle("fullscreen"),
        integration: toggle("integration"),
        localhost: toggle("localhost"),
        zoom: matches.get_one::<f64>("zoom").copied(),
        url: matches.get_one::<String>("url").cloned(),
        serve: matches.get_one::<std::path::PathBuf>("serve").cloned(),
        transparent: toggle("transparent"),
        retry_secs: matches.get_one::<u64>("retry").copied(),
        preload: matches.get_one::<std::path::PathBuf>("preload").cloned(),
        append_chrome_switches: appended("append-chrome-switch"),
        append_chrome_arguments: appended("append-chrome-argument"),
        use_minimal_chrome_cli: matches.get_flag("use-minimal-chrome-cli"),
        positional_url: matches.get_one::<String>("target").cloned(),
    }
}

/// Initialize the tracing/logging subsystem from the resolved verbosity.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("tower_http=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Load the settings store and resolve the configuration, or exit with the
/// usage text. Configuration errors are user errors, not runtime faults.
fn resolve_or_usage(args: &CliArgs) -> ResolvedConfig {
    let resolved = SettingsStore::open_default()
        .and_then(|store| ResolvedConfig::resolve(args, &store));

    match resolved {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {err}", NAME);
            eprintln!("{}", build_cli().render_usage());
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let cli_args = parse_cli_args(&matches);

    let config = Arc::new(resolve_or_usage(&cli_args));
    init_tracing(config.verbose);
    debug!(?config, "resolved configuration");

    // The runtime command line freezes before the first window exists.
    let mut command_line = RecordingCommandLine::new();
    apply_command_line(
        config.use_minimal_chrome_cli,
        &config.append_switches,
        &config.append_arguments,
        &mut command_line,
    );
    for switch in command_line.switches() {
        debug!(%switch, "chromium switch");
    }

    let server = if config.serve_active() {
        // serve_active implies a validated directory.
        let root = config.serve.as_deref().unwrap_or_else(|| {
            fatal::exit_with("serve activated without a directory", &"missing path")
        });
        match LocalServer::start(root).await {
            Ok(server) => {
                info!(port = server.port(), root = %root.display(), "local server started");
                Some(server)
            }
            Err(err) => fatal::exit_with("failed to start local server", &err),
        }
    } else {
        None
    };
    let url_prefix = server.as_ref().map(LocalServer::url_prefix).unwrap_or("");

    let target = match resolve_target_url(&config, url_prefix) {
        Ok(target) => target,
        Err(err) => fatal::exit_with("cannot resolve start URL", &err),
    };

    let backend = HeadlessBackend::default();
    let mut events = backend
        .take_events()
        .unwrap_or_else(|| fatal::exit_with("window event channel unavailable", &"already taken"));

    let launcher = match WindowLauncher::launch(&backend, Arc::clone(&config), &target).await {
        Ok(launcher) => launcher,
        Err(err) => fatal::exit_with("failed to create window", &err),
    };

    #[cfg(unix)]
    {
        // SIGUSR1 toggles the developer tools on a running kiosk.
        let window = launcher.window();
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            let Ok(mut sigusr1) = signal(SignalKind::user_defined1()) else {
                return;
            };
            while sigusr1.recv().await.is_some() {
                info!("SIGUSR1 received, toggling developer tools");
                window.toggle_dev_tools();
            }
        });
    }

    info!(url = %target, "kiosk running");
    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                if launcher.handle_event(event) == EventOutcome::Exit {
                    info!("window closed, exiting");
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_parse() {
        let matches = build_cli()
            .try_get_matches_from(["kiosk", "-k", "-f", "-T", "-d"])
            .unwrap();
        let args = parse_cli_args(&matches);

        assert_eq!(args.kiosk, Some(true));
        assert_eq!(args.fullscreen, Some(true));
        assert_eq!(args.always_on_top, Some(true));
        assert_eq!(args.dev, Some(true));
        assert_eq!(args.menu, None);
    }

    #[test]
    fn negations_force_off_and_conflict() {
        let matches = build_cli()
            .try_get_matches_from(["kiosk", "--no-fullscreen", "--no-menu"])
            .unwrap();
        let args = parse_cli_args(&matches);
        assert_eq!(args.fullscreen, Some(false));
        assert_eq!(args.menu, Some(false));

        assert!(build_cli()
            .try_get_matches_from(["kiosk", "--kiosk", "--no-kiosk"])
            .is_err());
    }

    #[test]
    fn verbosity_counts_occurrences() {
        let matches = build_cli().try_get_matches_from(["kiosk", "-vv"]).unwrap();
        assert_eq!(parse_cli_args(&matches).verbose, Some(2));

        let matches = build_cli().try_get_matches_from(["kiosk"]).unwrap();
        assert_eq!(parse_cli_args(&matches).verbose, None);
    }

    #[test]
    fn port_is_range_checked_at_parse_time() {
        let matches = build_cli()
            .try_get_matches_from(["kiosk", "--port", "8315"])
            .unwrap();
        assert_eq!(parse_cli_args(&matches).port, Some(8315));

        assert!(build_cli()
            .try_get_matches_from(["kiosk", "--port", "65536"])
            .is_err());
        assert!(build_cli()
            .try_get_matches_from(["kiosk", "--port", "abc"])
            .is_err());
    }

    #[test]
    fn chrome_switches_accept_hyphen_values() {
        let matches = build_cli()
            .try_get_matches_from([
                "kiosk",
                "--append-chrome-switch=--disable-gpu",
                "--append-chrome-switch=--log-level=0",
                "--append-chrome-argument=trailing",
            ])
            .unwrap();
        let args = parse_cli_args(&matches);

        assert_eq!(
            args.append_chrome_switches,
            vec!["--disable-gpu", "--log-level=0"]
        );
        assert_eq!(args.append_chrome_arguments, vec!["trailing"]);
    }

    #[test]
    fn positional_target_and_url_flag_coexist() {
        let matches = build_cli()
            .try_get_matches_from(["kiosk", "-u", "https://flag.example", "https://pos.example"])
            .unwrap();
        let args = parse_cli_args(&matches);

        assert_eq!(args.url.as_deref(), Some("https://flag.example"));
        assert_eq!(args.positional_url.as_deref(), Some("https://pos.example"));
    }

    #[test]
    fn zoom_and_retry_parse_as_numbers() {
        let matches = build_cli()
            .try_get_matches_from(["kiosk", "-z", "1.5", "--retry", "10"])
            .unwrap();
        let args = parse_cli_args(&matches);

        assert_eq!(args.zoom, Some(1.5));
        assert_eq!(args.retry_secs, Some(10));
    }

    #[test]
    fn minimal_chrome_cli_is_a_plain_flag() {
        let matches = build_cli()
            .try_get_matches_from(["kiosk", "--use-minimal-chrome-cli"])
            .unwrap();
        assert!(parse_cli_args(&matches).use_minimal_chrome_cli);
    }
}
