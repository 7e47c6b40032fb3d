use bistro_flow::{ContextData, FlowError, Pipeline, PipelineControl, Registry};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tokio::runtime::Runtime;

#[derive(Clone, Debug, Default)]
struct BenchContext {
  counter: u64,
}

fn build_pipeline(num_steps: usize) -> Pipeline<BenchContext, FlowError> {
  let names: Vec<String> = (0..num_steps).map(|i| format!("step_{}", i)).collect();
  let defs: Vec<(&str, bool, Option<bistro_flow::SkipCondition<BenchContext>>)> =
    names.iter().map(|n| (n.as_str(), false, None)).collect();
  let mut pipeline = Pipeline::new(&defs);
  for name in &names {
    pipeline.on_root(name, |ctx: ContextData<BenchContext>| {
      Box::pin(async move {
        ctx.write().counter += 1;
        Ok::<_, FlowError>(PipelineControl::Continue)
      })
    });
  }
  pipeline
}

fn bench_pipeline_run(c: &mut Criterion) {
  let rt = Runtime::new().expect("tokio runtime");
  let mut group = c.benchmark_group("pipeline_run");
  for num_steps in [1usize, 4, 16] {
    let pipeline = build_pipeline(num_steps);
    group.bench_with_input(BenchmarkId::from_parameter(num_steps), &num_steps, |b, _| {
      b.to_async(&rt).iter(|| async {
        pipeline.run(ContextData::new(BenchContext::default())).await.expect("run")
      })
    });
  }
  group.finish();
}

fn bench_registry_dispatch(c: &mut Criterion) {
  let rt = Runtime::new().expect("tokio runtime");
  let registry = Registry::<FlowError>::new();
  registry.register_pipeline(build_pipeline(4));
  c.bench_function("registry_dispatch_4_steps", |b| {
    b.to_async(&rt).iter(|| async {
      registry.run(ContextData::new(BenchContext::default())).await.expect("run")
    })
  });
}

criterion_group!(benches, bench_pipeline_run, bench_registry_dispatch);
criterion_main!(benches);
