use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the stderr tracing layer.
///
/// `--verbose` forces `vmbatch=debug`; otherwise `RUST_LOG` is combined with
/// `vmbatch=warn` so the prompts stay readable.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("vmbatch=debug")
    } else {
        EnvFilter::from_default_env()
            .add_directive("vmbatch=warn".parse().expect("valid log directive"))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}
