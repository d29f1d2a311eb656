use std::{io, path::PathBuf, process::ExitCode};

use {
    clap::Parser,
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    varsubst_core::{
        Destination, SubstError, ValuesFormat, load_template, load_values, substitute, unresolved,
        write_output,
    },
};

#[derive(Parser)]
#[command(
    name = "varsubst",
    version,
    about = "Replace ${name} placeholders in a template with values from a flat mapping"
)]
struct Cli {
    /// Path to the template file.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Path to the values file (flat key/value mapping).
    #[arg(short, long)]
    values: Option<PathBuf>,

    /// Path to the output file. If omitted, the result is printed.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Values file format (yaml, json, toml). Defaults to the file extension.
    #[arg(long)]
    format: Option<ValuesFormat>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // stdout is reserved for the rendered text and diagnostics.
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (Some(template_path), Some(values_path)) = (non_empty(cli.template), non_empty(cli.values))
    else {
        return Err(SubstError::Usage.into());
    };

    let template = load_template(&template_path)?;
    let vars = load_values(&values_path, cli.format)?;

    let missing = unresolved(&template, &vars);
    if !missing.is_empty() {
        debug!(keys = ?missing, "leaving placeholders unresolved");
    }

    let rendered = substitute(&template, &vars);
    let dest = Destination::from(non_empty(cli.output));
    write_output(&dest, &rendered, &mut io::stdout().lock())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_telemetry(&cli);

    debug!(version = env!("CARGO_PKG_VERSION"), "varsubst starting");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e}");
            ExitCode::FAILURE
        },
    }
}
