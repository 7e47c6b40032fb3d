// tests/common/mod.rs
#![allow(dead_code)]

use bistro_flow::{ContextData, FlowError, Handler, PipelineControl};
use once_cell::sync::Lazy;

/// A kitchen ticket: how much is wanted, how much is on the shelf, and the
/// labels of every handler that touched it.
#[derive(Clone, Debug, Default)]
pub struct Ticket {
  pub wanted: i32,
  pub shelf: i32,
  pub reserved: i32,
  pub trail: Vec<&'static str>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KitchenError {
  /// Engine failures, kept as their display text.
  #[error("engine: {0}")]
  Engine(String),

  #[error("shelf has {have}, ticket wants {wanted}")]
  Short { wanted: i32, have: i32 },

  #[error("ticket rejected: {0}")]
  Rejected(String),
}

impl From<FlowError> for KitchenError {
  fn from(err: FlowError) -> Self {
    KitchenError::Engine(err.to_string())
  }
}

pub fn ticket(wanted: i32, shelf: i32) -> ContextData<Ticket> {
  ContextData::new(Ticket {
    wanted,
    shelf,
    ..Default::default()
  })
}

pub fn trail(ctx: &ContextData<Ticket>) -> Vec<&'static str> {
  ctx.read().trail.clone()
}

/// Appends `label` to the trail and answers with `control`.
pub fn mark(label: &'static str, control: PipelineControl) -> Handler<Ticket, KitchenError> {
  Box::new(move |ctx: ContextData<Ticket>| {
    Box::pin(async move {
      ctx.write().trail.push(label);
      Ok(control)
    })
  })
}

/// Moves `wanted` from the shelf to `reserved`, or stops the run when the
/// shelf is short.
pub fn reserve() -> Handler<Ticket, KitchenError> {
  Box::new(|ctx: ContextData<Ticket>| {
    Box::pin(async move {
      let mut t = ctx.write();
      t.trail.push("reserve");
      if t.shelf < t.wanted {
        return Ok(PipelineControl::Stop);
      }
      t.shelf -= t.wanted;
      t.reserved += t.wanted;
      Ok(PipelineControl::Continue)
    })
  })
}

/// Fails with `Short` when the shelf cannot cover the ticket.
pub fn insist() -> Handler<Ticket, KitchenError> {
  Box::new(|ctx: ContextData<Ticket>| {
    Box::pin(async move {
      let (wanted, have) = {
        let mut t = ctx.write();
        t.trail.push("insist");
        (t.wanted, t.shelf)
      };
      if have < wanted {
        return Err(KitchenError::Short { wanted, have });
      }
      Ok(PipelineControl::Continue)
    })
  })
}

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

pub fn init_tracing() {
  Lazy::force(&TRACING);
}
