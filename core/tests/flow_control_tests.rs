// tests/flow_control_tests.rs
mod common;

use bistro_flow::{Pipeline, PipelineControl::*, PipelineResult};
use common::*;
use serial_test::serial;
use std::sync::Arc;

fn kitchen() -> Pipeline<Ticket, KitchenError> {
  let mut p = Pipeline::new(&[("check", false, None), ("reserve", false, None), ("plate", false, None)]);
  p.on_root("check", mark("check", Continue));
  p.on_root("reserve", reserve());
  p.on_root("plate", mark("plate", Continue));
  p
}

#[tokio::test]
#[serial]
async fn every_step_runs_when_nothing_stops() {
  init_tracing();
  let ctx = ticket(2, 5);

  let result = kitchen().run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Completed);
  assert_eq!(trail(&ctx), ["check", "reserve", "plate"]);
  let t = ctx.read();
  assert_eq!((t.shelf, t.reserved), (3, 2));
}

#[tokio::test]
#[serial]
async fn stop_ends_the_run_without_touching_later_steps() {
  init_tracing();
  let ctx = ticket(9, 5);

  let result = kitchen().run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Stopped);
  assert_eq!(trail(&ctx), ["check", "reserve"]);
  let t = ctx.read();
  assert_eq!((t.shelf, t.reserved), (5, 0));
}

#[tokio::test]
#[serial]
async fn stop_from_before_skips_the_rest_of_the_step() {
  init_tracing();
  let mut p = kitchen();
  p.before_root("reserve", mark("closed", Stop));
  p.after_root("reserve", mark("after reserve", Continue));
  let ctx = ticket(1, 5);

  assert_eq!(p.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(trail(&ctx), ["check", "closed"]);
  assert_eq!(ctx.read().reserved, 0);
}

#[tokio::test]
#[serial]
async fn phases_run_before_on_after_and_handlers_in_registration_order() {
  init_tracing();
  let mut p = Pipeline::<Ticket, KitchenError>::new(&[("plate", false, None)]);
  p.after_root("plate", mark("wipe", Continue));
  p.on_root("plate", mark("sauce", Continue));
  p.before_root("plate", mark("warm", Continue));
  p.on_root("plate", mark("garnish", Continue));
  let ctx = ticket(0, 0);

  p.run(ctx.clone()).await.unwrap();

  assert_eq!(trail(&ctx), ["warm", "sauce", "garnish", "wipe"]);
}

#[tokio::test]
#[serial]
async fn skip_condition_sees_what_earlier_steps_wrote() {
  init_tracing();
  let mut p = Pipeline::<Ticket, KitchenError>::new(&[
    ("reserve", false, None),
    (
      "restock",
      false,
      Some(Arc::new(|ctx: bistro_flow::ContextData<Ticket>| ctx.read().shelf > 0)),
    ),
  ]);
  p.on_root("reserve", reserve());
  p.on_root("restock", mark("restock", Continue));

  let plenty = ticket(1, 3);
  p.run(plenty.clone()).await.unwrap();
  assert_eq!(trail(&plenty), ["reserve"]);

  let emptied = ticket(3, 3);
  p.run(emptied.clone()).await.unwrap();
  assert_eq!(trail(&emptied), ["reserve", "restock"]);
}

#[tokio::test]
#[serial]
async fn optional_step_without_handlers_is_passed_over() {
  init_tracing();
  let mut p = Pipeline::<Ticket, KitchenError>::new(&[
    ("check", false, None),
    ("notify_waiter", true, None),
    ("plate", false, None),
  ]);
  p.on_root("check", mark("check", Continue));
  p.on_root("plate", mark("plate", Continue));
  let ctx = ticket(0, 0);

  assert_eq!(p.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(trail(&ctx), ["check", "plate"]);
}

#[tokio::test]
#[serial]
async fn a_pipeline_can_be_run_many_times_concurrently() {
  init_tracing();
  let p = Arc::new(kitchen());
  let runs: Vec<_> = (1..=4)
    .map(|wanted| {
      let p = p.clone();
      tokio::spawn(async move {
        let ctx = ticket(wanted, 3);
        let result = p.run(ctx.clone()).await.unwrap();
        let reserved = ctx.read().reserved;
        (result, reserved)
      })
    })
    .collect();

  let mut outcomes = Vec::new();
  for run in runs {
    outcomes.push(run.await.unwrap());
  }
  assert_eq!(
    outcomes,
    [
      (PipelineResult::Completed, 1),
      (PipelineResult::Completed, 2),
      (PipelineResult::Completed, 3),
      (PipelineResult::Stopped, 0),
    ]
  );
}

#[test]
fn step_names_follow_the_definition() {
  assert_eq!(kitchen().step_names(), ["check", "reserve", "plate"]);
}

#[test]
#[should_panic(expected = "step 'dessert' is not defined")]
fn handlers_for_undeclared_steps_are_a_setup_error() {
  kitchen().on_root("dessert", mark("dessert", Continue));
}
