//! Pipeline driver module - run summary model and driver service.

mod pipeline_model;
mod pipeline_service;


pub use pipeline_model::{FailureBreakdown, RunSummary};
pub use pipeline_service::PipelineService;
