// src/core/control.rs

//! Flow signals returned by handlers and the outcome of a full run.

/// Returned by a handler to let the pipeline go on or halt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt now. No further handlers of this step or later steps run.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was skipped) without a handler stopping the run.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
