//! Instrumented report recording.
//!
//! Register report steps on a [`Dashboard`], dispatch them, and each
//! top-level dispatch becomes a titled section of an HTML report holding
//! the step's source excerpt, its printed text, its returned values, any
//! failure and the figure it left open.
//!
//! ```
//! use dash_report::{Args, Dashboard, DashboardConfig, ReportStep, Signature};
//!
//! let mut dash = Dashboard::new(DashboardConfig::new().with_title("Demo")).unwrap();
//! dash.register(ReportStep::new(
//!     Signature::new("add").param("x").optional("y", 2),
//!     |d, args| {
//!         let sum = args.get_i64("x")? + args.get_i64("y")?;
//!         d.print(format!("sum is {sum}"));
//!         Ok(())
//!     },
//! ))
//! .unwrap();
//!
//! dash.dispatch("add", &Args::new().arg(5)).unwrap();
//! let html = dash.show();
//! assert!(html.contains("add(x=5, y=2)"));
//! assert!(html.contains("sum is 7"));
//! ```

pub mod assets;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod figures;
pub mod invocation;
pub mod output;
pub mod recorder;
pub mod signature;
pub mod source;
pub mod step;

pub use assets::{AssetInjector, StyleDirectory};
pub use config::{DashboardConfig, FailurePolicy};
pub use dashboard::{format_failure, format_panic, Dashboard};
pub use error::{ReportError, Result, StepError, StepResult};
pub use figures::FigureBackend;
pub use invocation::{parse_value, Invocation};
pub use output::{OutputDispatcher, OutputProbe, Renderable};
pub use recorder::ReportRecorder;
pub use signature::{Args, BoundArgs, Param, Signature};
pub use source::clean_source;
pub use step::{ReportStep, StepHandler, StepRegistry};
