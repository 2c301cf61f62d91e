use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "commit_grid=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = commit_grid::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
