use approx::assert_relative_eq;
use vizij_stroke_core::kernel::device_to_canvas;
use vizij_stroke_core::{
    normalize_stroke, phaser, Config, Execution, FrameParams, InstanceTransform, KernelConfig,
    LaunchRecord, RevealDirection, RevealKernel, Stroke, StrokeBank, StrokeError,
};
use vizij_test_fixtures::procedural;

const N: usize = 64;
const K: usize = 4;

fn config(kernel: KernelConfig) -> Config {
    Config {
        point_count: N,
        bank_capacity: 2,
        max_slots: K,
        kernel,
        ..Config::default()
    }
}

/// Row 0: circle of radius 100 around the origin. Row 1: 200px square.
fn bank() -> StrokeBank {
    let mut bank = StrokeBank::new(2, N);
    let circle = Stroke::from_xy(procedural::circle([0.0, 0.0], 100.0, 256)).unwrap();
    let square = Stroke::from_xy(procedural::square([-100.0, -100.0], 200.0)).unwrap();
    bank.upload_normalized(0, &normalize_stroke(&circle, N).unwrap())
        .unwrap();
    bank.upload_normalized(1, &normalize_stroke(&square, N).unwrap())
        .unwrap();
    bank
}

fn params() -> FrameParams {
    FrameParams {
        current_time: 0.0,
        canvas_width: 800.0,
        canvas_height: 600.0,
        max_slots: K as f32,
        delta_time: 0.0,
        _padding: [0.0; 3],
    }
}

fn record(a: usize, b: usize, t: f32, phase: f32) -> LaunchRecord {
    LaunchRecord {
        stroke_a: a as f32,
        stroke_b: b as f32,
        interpolation_t: t,
        total_duration: 1.0,
        elapsed_time: phase,
        start_x: 400.0,
        start_y: 300.0,
        scale: 1.0,
        active: 1.0,
        phase,
        ..LaunchRecord::INACTIVE
    }
}

fn run(kernel: &RevealKernel, records: &[LaunchRecord], bank: &StrokeBank) -> Vec<InstanceTransform> {
    let mut out = vec![InstanceTransform::default(); kernel.unit_count()];
    kernel.dispatch(&params(), records, bank, &mut out);
    out
}

/// it should be monotone in phase and fully revealed at phase 1
#[test]
fn phaser_is_monotone_and_saturates() {
    for edge in [0.1, 0.5, 1.0, 2.0] {
        for i in 0..=20 {
            let progress = i as f32 / 20.0;
            assert_eq!(phaser(1.0, progress, edge), 1.0);
            let mut prev = 0.0;
            for j in 0..=50 {
                let v = phaser(j as f32 / 50.0, progress, edge);
                assert!((0.0..=1.0).contains(&v));
                assert!(v >= prev);
                prev = v;
            }
        }
    }
}

/// it should cull every point of an inactive slot and of a phase-0 slot
#[test]
fn inactive_and_unstarted_slots_are_culled() {
    let bank = bank();
    let kernel = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    let mut records = vec![LaunchRecord::INACTIVE; K];
    records[1] = record(0, 0, 0.0, 0.0);
    let out = run(&kernel, &records, &bank);
    assert!(out.iter().all(InstanceTransform::is_culled));
}

/// it should place every point of a fully revealed circle on the circle
#[test]
fn full_reveal_places_points_on_circle() {
    let bank = bank();
    let kernel = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    let mut records = vec![LaunchRecord::INACTIVE; K];
    records[2] = record(0, 0, 0.0, 1.0);
    let out = run(&kernel, &records, &bank);

    let aspect = 800.0 / 600.0;
    for (global, t) in out.iter().enumerate() {
        if global / N != 2 {
            assert!(t.is_culled());
            continue;
        }
        assert!(!t.is_culled());
        let [x, y] = device_to_canvas(t.translation(), 800.0, 600.0);
        let r = ((x - 400.0).powi(2) + (y - 300.0).powi(2)).sqrt();
        assert_relative_eq!(r, 100.0, epsilon = 0.5);

        let size = 0.005 * 0.9999;
        let [sx, sy] = t.scale();
        assert_relative_eq!(sy, size, epsilon = 1e-6);
        assert_relative_eq!(sx, size / aspect, epsilon = 1e-6);
    }
}

/// it should morph between rows by interpolation_t
#[test]
fn blends_circle_into_square() {
    let bank = bank();
    let kernel = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    let records = vec![record(0, 1, 0.5, 1.0); K];
    let out = run(&kernel, &records, &bank);

    let params = params();
    for point in 0..N {
        let u = point as f32 / N as f32;
        let a = bank.sample(0, u);
        let b = bank.sample(1, u);
        let want = [400.0 + (a[0] + b[0]) * 0.5, 300.0 + (a[1] + b[1]) * 0.5];
        let got = device_to_canvas(
            out[N + point].translation(),
            params.canvas_width,
            params.canvas_height,
        );
        assert_relative_eq!(got[0], want[0], epsilon = 1e-2);
        assert_relative_eq!(got[1], want[1], epsilon = 1e-2);
    }
    // Square corner at t=1 lands on (-100,-100) relative to the start point.
    let pure_square = run(&kernel, &vec![record(1, 1, 1.0, 1.0); K], &bank);
    let corner = device_to_canvas(pure_square[0].translation(), 800.0, 600.0);
    assert_relative_eq!(corner[0], 300.0, epsilon = 1e-2);
    assert_relative_eq!(corner[1], 200.0, epsilon = 1e-2);
}

/// it should reveal the stroke start first by default and the end first on request
#[test]
fn reveal_direction_controls_which_end_leads() {
    let bank = bank();
    let records = vec![record(0, 0, 0.0, 0.25); K];

    let from_start = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    let out = run(&from_start, &records, &bank);
    assert!(!out[0].is_culled());
    assert!(out[N - 1].is_culled());
    for point in 0..N {
        let progress = point as f32 / N as f32;
        assert_eq!(out[point].is_culled(), 0.5 - progress <= 1e-4, "point {point}");
    }

    let from_end = RevealKernel::new(&config(KernelConfig {
        direction: RevealDirection::FromEnd,
        ..KernelConfig::default()
    }))
    .unwrap();
    let out = run(&from_end, &records, &bank);
    assert!(out[0].is_culled());
    assert!(!out[N - 1].is_culled());
}

/// it should grow markers as phase advances
#[test]
fn marker_size_tracks_reveal() {
    let bank = bank();
    let kernel = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    let mut prev = vec![0.0f32; N];
    for step in 0..=10 {
        let phase = step as f32 / 10.0;
        let out = run(&kernel, &vec![record(0, 0, 0.0, phase); K], &bank);
        for point in 0..N {
            let size = out[point].scale()[1];
            assert!(size >= prev[point]);
            prev[point] = size;
        }
    }
}

/// it should honour a per-launch edge width carried in the record
#[test]
fn record_edge_width_overrides_default() {
    let bank = bank();
    let kernel = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    let mut narrow = record(0, 0, 0.0, 0.5);
    narrow.reserved1 = 0.1;
    let records = vec![
        record(0, 0, 0.0, 0.5),
        narrow,
        LaunchRecord::INACTIVE,
        LaunchRecord::INACTIVE,
    ];
    let out = run(&kernel, &records, &bank);

    // Point at progress 0.25: e=1 gives reveal 0.75, e=0.1 saturates.
    let p = N / 4;
    assert_relative_eq!(out[p].scale()[1], 0.005 * 0.75, epsilon = 1e-6);
    assert_relative_eq!(out[N + p].scale()[1], 0.005 * 0.9999, epsilon = 1e-6);
}

/// it should give identical results for parallel and serial dispatch
#[test]
fn parallel_matches_serial() {
    let bank = bank();
    let parallel = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    let serial = RevealKernel::new(&config(KernelConfig {
        execution: Execution::Serial,
        ..KernelConfig::default()
    }))
    .unwrap();
    let records = vec![
        record(0, 1, 0.3, 0.2),
        LaunchRecord::INACTIVE,
        record(1, 0, 0.9, 0.7),
        record(1, 1, 0.0, 1.0),
    ];
    let a = run(&parallel, &records, &bank);
    let b = run(&serial, &records, &bank);
    assert_eq!(a, b);

    for global in [0, N + 3, 2 * N + 17, 4 * N - 1] {
        assert_eq!(parallel.evaluate(global, &records, &bank, &params()), a[global]);
    }
}

/// it should refuse a bank whose rows are not N wide
#[test]
fn bank_width_is_checked_at_init() {
    let kernel = RevealKernel::new(&config(KernelConfig::default())).unwrap();
    assert!(kernel.check_bank(&bank()).is_ok());
    let err = kernel.check_bank(&StrokeBank::new(2, N / 2)).unwrap_err();
    assert!(matches!(err, StrokeError::ConfigMismatch { what: "point_count", .. }));
}
