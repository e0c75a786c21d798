//! logkit demo
//!
//! Parses `log.*` flags (or a TOML options file), installs the process-wide
//! logger and engine, then logs through every surface of the facade.
//!
//! ```text
//! logkit-demo --log.format=json --log.level=debug
//! logkit-demo --config log.toml --watch
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;

use logkit::options::{load_options, OptionsWatcher};
use logkit::{field, global, kvs, Context, Options};

#[derive(Parser)]
#[command(name = "logkit-demo")]
#[command(about = "Exercise the logkit facade from the command line", long_about = None)]
struct Cli {
    #[command(flatten)]
    log: Options,

    /// TOML options file; replaces the log.* flags when given
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep running and reload the options file when it changes
    #[arg(short, long, requires = "config")]
    watch: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let opts = match &cli.config {
        Some(path) => load_options(path)?,
        None => {
            cli.log.validate()?;
            cli.log.clone()
        }
    };

    global::init(&opts)?;
    opts.build()?;

    tracing::info!(options = %opts, "logkit-demo v0.1.0 starting");

    let request_id = uuid::Uuid::new_v4();
    let ctx = Context::new()
        .with_request_id(request_id.to_string())
        .with_execution_id(1);
    let ctx = global::with_name("demo").with_context(&ctx);

    let logger = global::from_context(Some(&ctx)).l(&ctx);
    logger.info(
        "Handling request",
        &[field::string("path", "/v1/users"), field::uint("attempt", 1)],
    );
    logger.infow(
        "Request served",
        &kvs!["status", 200, "took", Duration::from_micros(12_500)],
    );
    logger.v(1).infof(format_args!("cache hit ratio {:.2}", 0.93));
    logger
        .with_name("db")
        .warnw("Slow query", &kvs!["table", "users", "ms", 812]);

    global::errorf(format_args!("upstream {} unreachable", "billing"));
    global::flush();

    if cli.watch {
        if let Some(path) = &cli.config {
            let _watcher = OptionsWatcher::new(path).run()?;
            for tick in 0u64.. {
                global::v(1).infow("Heartbeat", &kvs!["tick", tick]);
                global::info("Waiting for options changes", &[]);
                thread::sleep(Duration::from_secs(2));
            }
        }
    }

    tracing::info!("Shutdown complete");
    global::flush();
    Ok(())
}
