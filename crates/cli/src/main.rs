use clap::Parser;

use legwork::Cli;

fn main() {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = cli.execute() {
        eprintln!("Error: {err:#}");
        // A failed subprocess propagates its own exit status; everything
        // else reports 1.
        let code = err
            .downcast_ref::<legwork_core::Error>()
            .map(legwork_core::Error::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
