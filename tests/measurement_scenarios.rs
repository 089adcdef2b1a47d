//! End-to-end measurement scenarios on a canonical standing pose.

use body_measure::{
    assess_pose, measure, BodyMeasurements, EngineConfig, ImageFrame, Landmark, Landmarks,
    Measurement, MeasurementEngine, MeasurementInput, MeasurementRange, Point, SegmentationMask,
    ThighSource, POSE_SLOT_COUNT,
};
use rand::prelude::*;

const WIDTH: u32 = 1080;
const HEIGHT: u32 = 1920;
const SUBJECT_CM: f32 = 175.0;

fn frame() -> ImageFrame {
    ImageFrame::new(WIDTH, HEIGHT)
}

/// Front-facing subject, arms hanging, feet slightly apart.
/// The subject's left side appears on the right half of the image.
fn canonical_pose() -> Landmarks {
    use Landmark::*;

    let points = [
        (Nose, 0.5, 0.10),
        (LeftEyeInner, 0.52, 0.09),
        (LeftEye, 0.5417, 0.09),
        (LeftEyeOuter, 0.56, 0.09),
        (RightEyeInner, 0.48, 0.09),
        (RightEye, 0.4583, 0.09),
        (RightEyeOuter, 0.44, 0.09),
        (LeftEar, 0.58, 0.095),
        (RightEar, 0.42, 0.095),
        (MouthLeft, 0.52, 0.12),
        (MouthRight, 0.48, 0.12),
        (LeftShoulder, 0.6667, 0.22),
        (RightShoulder, 0.3333, 0.22),
        (LeftElbow, 0.6667, 0.36),
        (RightElbow, 0.3333, 0.36),
        (LeftWrist, 0.6667, 0.50),
        (RightWrist, 0.3333, 0.50),
        (LeftPinky, 0.67, 0.53),
        (RightPinky, 0.33, 0.53),
        (LeftIndex, 0.665, 0.535),
        (RightIndex, 0.335, 0.535),
        (LeftThumb, 0.66, 0.52),
        (RightThumb, 0.34, 0.52),
        (LeftHip, 0.6333, 0.46),
        (RightHip, 0.3667, 0.46),
        (LeftKnee, 0.6333, 0.68),
        (RightKnee, 0.3667, 0.68),
        (LeftAnkle, 0.6333, 0.90),
        (RightAnkle, 0.3667, 0.90),
        (LeftHeel, 0.63, 0.91),
        (RightHeel, 0.37, 0.91),
        (LeftFootIndex, 0.65, 0.92),
        (RightFootIndex, 0.35, 0.92),
    ];

    let mut landmarks = Landmarks::missing();
    for (landmark, x, y) in points {
        landmarks.set(landmark, Point::new(x, y));
    }
    landmarks
}

/// Centered rectangular person region covering columns [324, 756).
fn centered_mask(width: u32, height: u32) -> SegmentationMask {
    let left = width * 3 / 10;
    let right = width * 7 / 10;
    SegmentationMask::from_fn(width, height, |x, _| {
        if x >= left && x < right {
            1.0
        } else {
            0.0
        }
    })
}

/// Nose at 0.10, lowest foot landmark at 0.92.
fn expected_cm_per_px() -> f32 {
    SUBJECT_CM / ((0.92 - 0.10) * HEIGHT as f32)
}

fn assert_in_range(m: &BodyMeasurements, config: &EngineConfig) {
    for kind in Measurement::ALL {
        let v = m.get(kind);
        let range = config.ranges.get(kind);
        assert!(
            v == 0.0 || range.contains(v),
            "{} = {} outside [{}, {}]",
            kind.label(),
            v,
            range.min,
            range.max
        );
    }
}

#[test]
fn canonical_pose_without_mask() {
    let pose = canonical_pose();
    let m = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));

    println!("{:?}", m);
    assert!((m.shoulder_width - 40.0).abs() < 0.5);
    assert!((m.arm_length - 59.8).abs() < 0.5);
    assert!((m.leg_length - 93.9).abs() < 0.5);
    assert!((m.hip_width - 32.0).abs() < 0.5);
    assert!((m.upper_body_length - 79.0).abs() < 0.5);
    assert!((m.lower_body_length - 93.9).abs() < 0.5);
    assert!((m.neck_width - 10.0).abs() < 0.5);

    // Hip proportion: |hip - center| * 1.5 * 2, i.e. 1.5x hip width
    assert!((m.thigh_width - 48.0).abs() < 0.5);
    assert_eq!(m.thigh_source, ThighSource::HipProportion);

    assert_eq!(m.computed_count(), Measurement::COUNT);
    assert_in_range(&m, &EngineConfig::default());
}

#[test]
fn canonical_pose_with_mask_scans_edges() {
    let pose = canonical_pose();
    let mask = centered_mask(WIDTH, HEIGHT);
    let input = MeasurementInput::new(&pose, frame(), SUBJECT_CM).with_mask(&mask);
    let m = measure(&input);

    // Centerline pixel is inside the region, so each thigh spans from the
    // centerline to the region border: 216 px on one side, 215 on the other.
    let expected = 215.5 * expected_cm_per_px();
    assert!(
        (m.thigh_width - expected).abs() < 0.05,
        "thigh {} expected {}",
        m.thigh_width,
        expected
    );
    assert_eq!(m.thigh_source, ThighSource::MaskScan);

    // The mask does not affect keypoint measurements.
    let without = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));
    for kind in Measurement::GEOMETRIC {
        assert_eq!(m.get(kind), without.get(kind));
    }
}

#[test]
fn zero_height_fails_calibration() {
    let pose = canonical_pose();
    let mask = centered_mask(WIDTH, HEIGHT);
    let input = MeasurementInput::new(&pose, frame(), 0.0).with_mask(&mask);

    assert_eq!(measure(&input).to_array(), [0.0; Measurement::COUNT]);
    assert!(MeasurementEngine::default().try_measure(&input).is_err());
}

#[test]
fn implausible_height_fails_calibration() {
    let pose = canonical_pose();
    let m = measure(&MeasurementInput::new(&pose, frame(), 301.0));
    assert!(m.is_empty());
}

#[test]
fn missing_nose_fails_calibration() {
    let mut pose = canonical_pose();
    pose.set(Landmark::Nose, Point::missing());
    let m = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));
    assert!(m.is_empty());
}

#[test]
fn empty_frame_fails_calibration() {
    let pose = canonical_pose();
    let input = MeasurementInput::new(&pose, ImageFrame::new(WIDTH, 0), SUBJECT_CM);
    assert!(measure(&input).is_empty());
}

#[test]
fn only_shoulders_and_hips() {
    use Landmark::*;

    // Nose and foot landmarks stay: without them there is no scale at all.
    let full = canonical_pose();
    let mut pose = Landmarks::missing();
    for l in [
        Nose,
        LeftShoulder,
        RightShoulder,
        LeftHip,
        RightHip,
        LeftHeel,
        RightHeel,
        LeftFootIndex,
        RightFootIndex,
    ] {
        pose.set(l, full.get(l));
    }

    let m = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));
    assert!(m.shoulder_width > 0.0);
    assert!(m.hip_width > 0.0);
    assert_eq!(m.arm_length, 0.0);
    assert_eq!(m.leg_length, 0.0);
    assert_eq!(m.neck_width, 0.0);
    assert_eq!(m.lower_body_length, 0.0);
    assert_eq!(m.thigh_width, 0.0);
    assert_eq!(m.thigh_source, ThighSource::Unavailable);

    // The nose is now the highest landmark: (0.46 - 0.10) of the frame height.
    let expected = 0.36 * HEIGHT as f32 * expected_cm_per_px();
    assert!((m.upper_body_length - expected).abs() < 0.05);
}

#[test]
fn implausible_shoulder_width_is_rejected_alone() {
    let canonical = canonical_pose();
    let baseline = measure(&MeasurementInput::new(&canonical, frame(), SUBJECT_CM));

    // 0.75 of the frame width is about 90 cm at this scale.
    let mut pose = canonical_pose();
    pose.set(Landmark::LeftShoulder, Point::new(0.875, 0.22));
    pose.set(Landmark::RightShoulder, Point::new(0.125, 0.22));
    let m = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));

    assert_eq!(m.shoulder_width, 0.0);
    assert_eq!(m.hip_width, baseline.hip_width);
    assert_eq!(m.leg_length, baseline.leg_length);
    assert_eq!(m.neck_width, baseline.neck_width);
    assert_eq!(m.upper_body_length, baseline.upper_body_length);
    assert_eq!(m.lower_body_length, baseline.lower_body_length);
    assert_eq!(m.thigh_width, baseline.thigh_width);
}

#[test]
fn mismatched_mask_falls_back_to_geometry() {
    let pose = canonical_pose();
    let small = centered_mask(100, 100);

    let input = MeasurementInput::new(&pose, frame(), SUBJECT_CM);
    let without = measure(&input);
    let with_small = measure(&input.with_mask(&small));

    assert_eq!(with_small, without);
    assert_eq!(with_small.thigh_source, ThighSource::HipProportion);
    assert!(with_small.thigh_width > 0.0);
}

#[test]
fn missing_landmark_zeroes_dependent_measurement() {
    use Landmark::*;

    let cases: &[(Measurement, &[Landmark])] = &[
        (Measurement::ShoulderWidth, &[LeftShoulder, RightShoulder]),
        (
            Measurement::ArmLength,
            &[
                LeftShoulder,
                LeftElbow,
                LeftWrist,
                RightShoulder,
                RightElbow,
                RightWrist,
            ],
        ),
        (
            Measurement::LegLength,
            &[
                LeftHip,
                LeftKnee,
                LeftAnkle,
                RightHip,
                RightKnee,
                RightAnkle,
            ],
        ),
        (Measurement::HipWidth, &[LeftHip, RightHip]),
        (Measurement::UpperBodyLength, &[LeftHip, RightHip]),
        (
            Measurement::LowerBodyLength,
            &[LeftHip, RightHip, LeftAnkle, RightAnkle],
        ),
        (Measurement::NeckWidth, &[LeftEye, RightEye]),
        (Measurement::ThighWidth, &[LeftHip, RightHip]),
    ];

    for (kind, required) in cases {
        for &landmark in *required {
            for bad in [
                Point::missing(),
                Point::new(1.2, 0.5),
                Point::new(0.5, -0.01),
            ] {
                let mut pose = canonical_pose();
                pose.set(landmark, bad);
                let m = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));
                assert_eq!(
                    m.get(*kind),
                    0.0,
                    "{} should be zero without {:?}",
                    kind.label(),
                    landmark
                );
            }
        }
    }
}

#[test]
fn thigh_uses_remaining_leg() {
    let mut pose = canonical_pose();
    pose.set(Landmark::LeftKnee, Point::missing());
    let m = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));
    assert!(m.thigh_width > 0.0);

    pose.set(Landmark::RightKnee, Point::missing());
    let m = measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM));
    assert_eq!(m.thigh_width, 0.0);
}

#[test]
fn doubling_height_doubles_every_measurement() {
    // Open ranges so both runs report every slot.
    let mut config = EngineConfig::default();
    let open = MeasurementRange::new(0.0, 1.0e6);
    config.ranges.shoulder_width = open;
    config.ranges.arm_length = open;
    config.ranges.leg_length = open;
    config.ranges.hip_width = open;
    config.ranges.upper_body_length = open;
    config.ranges.lower_body_length = open;
    config.ranges.neck_width = open;
    config.ranges.thigh_width = open;
    let engine = MeasurementEngine::new(config);

    let pose = canonical_pose();
    let mask = centered_mask(WIDTH, HEIGHT);
    let single = MeasurementInput::new(&pose, frame(), 150.0).with_mask(&mask);
    let double = MeasurementInput::new(&pose, frame(), 300.0).with_mask(&mask);
    let single = engine.measure(&single);
    let double = engine.measure(&double);

    for kind in Measurement::ALL {
        assert!(single.get(kind) > 0.0, "{} not computed", kind.label());
        assert_eq!(double.get(kind), 2.0 * single.get(kind), "{}", kind.label());
    }
}

#[test]
fn repeated_calls_are_identical() {
    let pose = canonical_pose();
    let mask = centered_mask(WIDTH, HEIGHT);
    let engine = MeasurementEngine::default();
    let input = MeasurementInput::new(&pose, frame(), SUBJECT_CM).with_mask(&mask);

    let first = engine.measure(&input);
    for _ in 0..5 {
        assert_eq!(engine.measure(&input), first);
    }
}

#[test]
fn concurrent_calls_agree() {
    let pose = canonical_pose();
    let mask = centered_mask(WIDTH, HEIGHT);
    let engine = MeasurementEngine::default();
    let input = MeasurementInput::new(&pose, frame(), SUBJECT_CM).with_mask(&mask);
    let expected = engine.measure(&input);

    std::thread::scope(|scope| {
        let run = || engine.measure(&input);
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(run)).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn jittered_poses_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(0x1234_5678);
    let config = EngineConfig::default();
    let base = canonical_pose();
    for _ in 0..200 {
        let mut pose = base.clone();
        for l in Landmark::ALL {
            let p = base.get(l);
            // Up to +-0.15 per axis, occasionally pushing points out of frame.
            let jitter = Point::new(rng.gen_range(-0.15..0.15), rng.gen_range(-0.15..0.15));
            pose.set(l, p + jitter);
        }
        let height = rng.gen_range(100.0..250.0);
        let m = measure(&MeasurementInput::new(&pose, frame(), height));
        assert_in_range(&m, &config);
    }
}

#[test]
fn detector_slots_measure_like_named_landmarks() {
    let pose = canonical_pose();
    let mut slots: Vec<Point> = pose.points().to_vec();
    slots.resize(POSE_SLOT_COUNT, Point::new(0.5, 0.5));

    let from_slots = Landmarks::from_slots(&slots).unwrap();
    assert_eq!(from_slots, pose);
    assert_eq!(
        measure(&MeasurementInput::new(&from_slots, frame(), SUBJECT_CM)),
        measure(&MeasurementInput::new(&pose, frame(), SUBJECT_CM))
    );
}

#[test]
fn canonical_pose_is_full_body() {
    let assessment = assess_pose(&canonical_pose());
    assert!(assessment.has_person);
    assert!(assessment.is_full_body);
    assert_eq!(assessment.confidence, 1.0);
}
