use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizij_stroke_core::{
    Config, Execution, KernelConfig, LaunchConfig, Stroke, StrokeAnimator,
};
use vizij_test_fixtures::procedural;

fn animator(execution: Execution) -> StrokeAnimator {
    let cfg = Config {
        kernel: KernelConfig {
            execution,
            ..KernelConfig::default()
        },
        ..Config::default()
    };
    let mut anim = StrokeAnimator::new(cfg).unwrap();
    anim.set_canvas(1920.0, 1080.0);
    let circle = Stroke::from_xy(procedural::circle([0.0, 0.0], 100.0, 100)).unwrap();
    let eight = Stroke::from_xy(procedural::figure_eight([0.0, 0.0], 120.0, 100)).unwrap();
    anim.load_stroke(0, &circle).unwrap();
    anim.load_stroke(1, &eight).unwrap();
    for i in 0..anim.config().max_slots {
        let x = (i % 32) as f32 * 60.0;
        let y = (i / 32) as f32 * 34.0;
        let launch = LaunchConfig::new(0, 1, (i % 10) as f32 / 10.0, 4.0)
            .at(x, y)
            .with_scale(0.25);
        anim.add_animation(launch).unwrap();
    }
    anim
}

fn criterion_benchmark(c: &mut Criterion) {
    for (label, execution) in [("parallel", Execution::Parallel), ("serial", Execution::Serial)] {
        let mut anim = animator(execution);
        let mut t = 1.0f64;
        c.bench_function(&format!("frame 1024x1024 {label}"), |b| {
            b.iter(|| {
                // Small steps keep every slot inside its 4s window.
                t += 1e-5;
                let frame = anim.frame(black_box(t));
                black_box(frame.transforms.len());
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
