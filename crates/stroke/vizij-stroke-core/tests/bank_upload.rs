use vizij_stroke_core::{normalize_stroke, Stroke, StrokeBank, StrokeError};
use vizij_test_fixtures::procedural;

const N: usize = 16;

fn row(x: f32) -> Vec<[f32; 2]> {
    (0..N).map(|i| [x, i as f32]).collect()
}

/// it should round-trip uploaded rows byte for byte
#[test]
fn upload_then_read_back() {
    let mut bank = StrokeBank::new(3, N);
    let circle = Stroke::from_xy(procedural::circle([5.0, 5.0], 2.0, 32)).unwrap();
    let normalized = normalize_stroke(&circle, N).unwrap();
    bank.upload_normalized(2, &normalized).unwrap();

    assert_eq!(bank.get_stroke_data(2).unwrap(), normalized.to_xy().as_slice());
    assert!(bank.is_occupied(2));
    assert!(!bank.is_occupied(0));
    assert_eq!(bank.take_dirty_rows(), Some(2..3));
    assert_eq!(bank.take_dirty_rows(), None);

    let floats: &[f32] = bytemuck::cast_slice(bank.rows_as_bytes(2..3));
    assert_eq!(floats.len(), N * 2);
    assert_eq!(floats[0], normalized.points()[0].x);
}

/// it should reject bad rows and leave the table untouched
#[test]
fn invalid_uploads_change_nothing() {
    let mut bank = StrokeBank::new(2, N);
    bank.upload_stroke(0, &row(1.0)).unwrap();
    let revision = bank.revision();
    bank.take_dirty_rows();

    assert!(matches!(
        bank.upload_stroke(2, &row(9.0)),
        Err(StrokeError::IndexOutOfRange {
            index: 2,
            capacity: 2
        })
    ));
    assert!(matches!(
        bank.upload_stroke(0, &row(9.0)[..N - 1]),
        Err(StrokeError::PointCountMismatch {
            expected: N,
            actual: 15
        })
    ));
    let mut bad = row(9.0);
    bad[3][1] = f32::NAN;
    assert!(matches!(
        bank.upload_stroke(0, &bad),
        Err(StrokeError::InvalidNormalizedStroke { .. })
    ));

    assert_eq!(bank.get_stroke_data(0).unwrap(), row(1.0).as_slice());
    assert_eq!(bank.revision(), revision);
    assert_eq!(bank.take_dirty_rows(), None);
    assert!(bank.get_stroke_data(5).is_err());
}

/// it should apply a batch as one revision with a merged dirty range
#[test]
fn batch_upload_skips_bad_entries() {
    let mut bank = StrokeBank::new(8, N);
    let good_a = row(1.0);
    let good_b = row(2.0);
    let short = row(3.0)[..4].to_vec();
    let batch: Vec<(usize, &[[f32; 2]])> = vec![
        (5, good_a.as_slice()),
        (1, good_b.as_slice()),
        (3, short.as_slice()),
        (9, good_a.as_slice()),
    ];
    let report = bank.upload_strokes(batch);

    assert_eq!(report.uploaded, vec![5, 1]);
    assert_eq!(report.skipped.len(), 2);
    assert!(!report.is_clean());
    assert_eq!(bank.revision(), 1);
    assert_eq!(bank.take_dirty_rows(), Some(1..6));
    assert!(!bank.is_occupied(3));
    assert_eq!(bank.get_stroke_data(1).unwrap(), good_b.as_slice());
}

/// it should zero cleared rows and mark them dirty
#[test]
fn clear_marks_rows_dirty() {
    let mut bank = StrokeBank::new(4, N);
    bank.upload_stroke(3, &row(4.0)).unwrap();
    bank.take_dirty_rows();
    bank.clear_stroke(3).unwrap();
    assert!(!bank.is_occupied(3));
    assert!(bank.get_stroke_data(3).unwrap().iter().all(|p| *p == [0.0, 0.0]));
    assert_eq!(bank.take_dirty_rows(), Some(3..4));

    bank.upload_stroke(0, &row(4.0)).unwrap();
    bank.clear_all();
    assert!(!bank.is_occupied(0));
    assert_eq!(bank.take_dirty_rows(), Some(0..4));
}
