// src/lib.rs

//! bistro-flow: a small asynchronous step-pipeline engine.
//!
//! A pipeline is an ordered list of named steps. Each step has three handler
//! phases (`before`, `on`, `after`); handlers share one `ContextData<T>` and
//! decide whether the pipeline continues or stops. A type-keyed `Registry`
//! holds one pipeline per context type so request handlers can dispatch by
//! the data they build.
//!
//! ```ignore
//! let mut p = Pipeline::<MyCtx, MyError>::new(&[("load", false, None), ("save", false, None)]);
//! p.on_root("load", |ctx| Box::pin(async move { Ok::<_, MyError>(PipelineControl::Continue) }));
//! p.on_root("save", |ctx| Box::pin(async move { Ok::<_, MyError>(PipelineControl::Continue) }));
//! let result = p.run(ContextData::new(MyCtx::default())).await?;
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::error::{FlowError, FlowResult};
pub use crate::pipeline::Pipeline;
pub use crate::registry::Registry;
