//! Structured, leveled logging facade.
//!
//! # Data Flow
//! ```text
//! Options (defaults / clap flags / TOML file)
//!     → Logger::new          explicit handle
//!     → global::init         process-wide default logger
//!     → Options::build       process-wide engine behind `tracing` and `log`
//!
//! Logger call
//!     → level check (engine)
//!     → fields: typed, formatted message, or loose key-value pairs
//!     → encoder (console or JSON)
//!     → sinks (stdout, stderr, files, any MakeWriter)
//! ```
//!
//! # Example
//! ```no_run
//! use logkit::{field, kvs, Logger, Options};
//!
//! let opts = Options { format: "json".into(), ..Options::default() };
//! let logger = Logger::new(Some(&opts))?.with_name("api");
//! logger.info("listening", &[field::uint("port", 8080)]);
//! logger.warnw("slow request", &kvs!["path", "/v1/users", "ms", 812]);
//! logger.v(1).infof(format_args!("cache warmed in {}ms", 42));
//! # Ok::<(), logkit::LogError>(())
//! ```

pub mod context;
pub mod encoders;
pub mod engine;
pub mod error;
pub mod field;
pub mod global;
pub mod logger;
pub mod options;

pub use context::{from_context, Context};
pub use engine::{Engine, Level};
pub use error::{LogError, ValidationError, ValidationErrors};
pub use field::{Arg, Field, Value};
pub use global::init;
pub use logger::{InfoLog, LevelWriter, Logger};
pub use options::Options;
