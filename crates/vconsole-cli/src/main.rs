// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::ApiRuntime;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use vconsole_api::{Client, ClientOptions, Session};
use vconsole_app::{ConsoleState, LogNotifier, LoginForm, NoticeLog, Notifier, Role};
use vconsole_tui::UiOptions;

const DEMO_SEED: u64 = 42;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `vconsole --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    if let Some(phone) = &options.login_phone {
        logging::init_stderr_logging()?;
        return login(&config, phone);
    }

    if options.check_only {
        logging::init_stderr_logging()?;
        return check(&config, options.demo);
    }

    logging::init_file_logging(&config.log_file()?)?;

    // Held until the UI exits; dropping it stops the demo server.
    let demo = if options.demo {
        Some(vconsole_testkit::demo_backend(DEMO_SEED).context("start demo backend")?)
    } else {
        None
    };
    let (base_url, session) = match &demo {
        Some(backend) => (backend.base_url().to_owned(), demo_session()?),
        None => (config.base_url().to_owned(), required_session(&config)?),
    };
    log::info!("console backend {base_url}");

    let notices = Arc::new(NoticeLog::new());
    let client = build_client(&config, &base_url, Some(session), notices.clone())?;
    let mut runtime = ApiRuntime::new(client, notices, config.page_size())?;
    let mut state = ConsoleState::new(config.default_tab()?);
    vconsole_tui::run_app(
        &mut state,
        &mut runtime,
        UiOptions {
            slice_query_results: config.slice_query_results(),
        },
    )
}

fn build_client(
    config: &Config,
    base_url: &str,
    session: Option<Session>,
    notifier: Arc<dyn Notifier>,
) -> Result<Client> {
    let mut options = ClientOptions::new(base_url);
    options.timeout = config.timeout()?;
    options.session = session;
    Client::new(options, notifier).with_context(|| {
        format!("invalid [server] config; fix base_url ({base_url}) or timeout")
    })
}

fn demo_session() -> Result<Session> {
    Session::new("demo", Some(Role::SuperAdmin))
}

fn required_session(config: &Config) -> Result<Session> {
    config.session()?.ok_or_else(|| {
        anyhow!(
            "session token is required -- run `vconsole --login <phone>`, then set [session] token or VCONSOLE_TOKEN and retry"
        )
    })
}

/// Validates config and confirms the backend accepts the session.
fn check(config: &Config, demo: bool) -> Result<()> {
    let demo_backend = if demo {
        Some(vconsole_testkit::demo_backend(DEMO_SEED).context("start demo backend")?)
    } else {
        None
    };
    let (base_url, session) = match &demo_backend {
        Some(backend) => (backend.base_url().to_owned(), demo_session()?),
        None => (config.base_url().to_owned(), required_session(config)?),
    };

    let client = build_client(config, &base_url, Some(session), Arc::new(LogNotifier))?;
    let profile = client.user_profile().with_context(|| {
        format!("backend {base_url} rejected the check -- verify [server] base_url and the session token")
    })?;
    println!(
        "signed in as {} ({}) at {}",
        profile.name,
        profile.role.label(),
        base_url
    );
    Ok(())
}

/// Signs in with an SMS code and prints the session token for the config.
fn login(config: &Config, phone: &str) -> Result<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        bail!("--login requires a phone number");
    }

    let client = build_client(config, config.base_url(), None, Arc::new(LogNotifier))?;
    client.send_sms_code(phone).context("send sign-in code")?;

    print!("code sent to {phone}; enter it: ");
    io::stdout().flush().context("flush stdout")?;
    let mut code = String::new();
    io::stdin()
        .lock()
        .read_line(&mut code)
        .context("read sign-in code from stdin")?;

    client.login(&LoginForm {
        phone: phone.to_owned(),
        code: code.trim().to_owned(),
    })?;
    let session = client.session().ok_or_else(|| {
        anyhow!("backend accepted the code but sent no session cookie -- sign in through the browser and copy the Authorization cookie")
    })?;

    println!("token = \"{}\"", session.token);
    if let Some(role) = session.role {
        println!("role = \"{}\"", role.label());
    }
    println!("# put these under [session] in {}", config_hint());
    Ok(())
}

fn config_hint() -> String {
    Config::default_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|_| "your config file".to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    login_phone: Option<String>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        login_phone: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--login" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--login requires a phone number"))?;
                options.login_phone = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    if options.demo && options.login_phone.is_some() {
        bail!("--demo and --login cannot be combined; the demo backend needs no sign-in");
    }

    Ok(options)
}

fn print_help() {
    println!("vconsole -- volunteer activity admin console");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --login <phone>          Sign in with an SMS code and print the session token");
    println!("  --demo                   Browse a seeded in-process demo backend");
    println!("  --check                  Validate config and confirm the backend accepts the session");
    println!("  --help                   Show this help");
}
