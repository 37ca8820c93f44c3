use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Fall back to the bundled sample feed for whichever path is not given.
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/data");
    let args = issue_index::example_apps::with_default_feed_paths(
        std::env::args().skip(1).collect(),
        &data_dir,
    );
    issue_index::example_apps::run_issue_index_report(args.into_iter())
}
