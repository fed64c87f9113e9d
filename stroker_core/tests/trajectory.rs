use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;
use stroker_core::trajectory::preview;
use stroker_core::{
    AxisRange, AxisRanges, GeneratorKind, MotionParams, StrokerError, Trajectory, TrajectoryCfg,
};

fn params(speed: u32) -> MotionParams {
    MotionParams {
        top: 95,
        bottom: 5,
        back: 17,
        forth: 83,
        speed,
    }
}

#[rstest]
fn every_kind_runs_a_thousand_frames(
    #[values(
        GeneratorKind::Costumed,
        GeneratorKind::FullStrokeWithRoll,
        GeneratorKind::FullStrokeWithPitch,
        GeneratorKind::LongStroke1,
        GeneratorKind::LongStroke2,
        GeneratorKind::WildSpeed,
        GeneratorKind::Tempest
    )]
    kind: GeneratorKind,
    #[values(0, 1, 180, 5000)] speed: u32,
) {
    let mut rng = StdRng::seed_from_u64(99);
    let ranges = AxisRanges::default();
    let traj = Trajectory::build(kind, &params(speed), &ranges, TrajectoryCfg::default(), &mut rng)
        .expect("valid parameters");
    let mut count = 0;
    for frame in traj.take(1000) {
        let longest = frame
            .instructions()
            .iter()
            .map(|i| i.duration_ms)
            .max()
            .expect("frames carry instructions");
        assert_eq!(frame.duration_ms(), longest);
        assert!(frame.duration_ms() > 0);
        for ins in frame.instructions() {
            assert!(
                (0..=999).contains(&ins.value),
                "{kind}: {} out of range",
                ins
            );
        }
        count += 1;
    }
    assert_eq!(count, 1000);
}

#[rstest]
#[case(GeneratorKind::FullStrokeWithRoll)]
#[case(GeneratorKind::Tempest)]
#[case(GeneratorKind::Costumed)]
fn zero_span_stroke_fails_at_construction(#[case] kind: GeneratorKind) {
    let mut rng = StdRng::seed_from_u64(1);
    let p = MotionParams {
        top: 60,
        bottom: 60,
        ..params(200)
    };
    let err = Trajectory::build(kind, &p, &AxisRanges::default(), TrajectoryCfg::default(), &mut rng)
        .expect_err("zero span");
    assert!(matches!(err, StrokerError::Domain(_)));

    // distinct percentages collapsing onto one absolute value
    let flat = AxisRanges::uniform(AxisRange::new(500, 500));
    let err = Trajectory::build(kind, &params(200), &flat, TrajectoryCfg::default(), &mut rng)
        .expect_err("collapsed range");
    assert!(matches!(err, StrokerError::Domain(_)));
}

#[test]
fn out_of_range_secondary_extent_is_rejected() {
    let mut rng = StdRng::seed_from_u64(1);
    let p = MotionParams {
        forth: 120,
        ..params(200)
    };
    let err = Trajectory::build(
        GeneratorKind::LongStroke1,
        &p,
        &AxisRanges::default(),
        TrajectoryCfg::default(),
        &mut rng,
    )
    .expect_err("forth out of range");
    assert!(matches!(err, StrokerError::Domain(_)));
}

#[test]
fn preview_renders_tcode_lines() {
    let mut rng = StdRng::seed_from_u64(5);
    let frames = preview(
        GeneratorKind::FullStrokeWithPitch,
        &params(200),
        &AxisRanges::default(),
        TrajectoryCfg::default(),
        &mut rng,
        3,
    )
    .expect("valid");
    assert_eq!(frames.len(), 3);
    let first = frames[0].to_string();
    assert!(first.starts_with("L0949I300 R2"), "got {first}");
    assert!(frames[1].to_string().ends_with("I50"));
}

#[test]
fn same_seed_same_costumed_stream() {
    let run = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        preview(
            GeneratorKind::Costumed,
            &params(150),
            &AxisRanges::default(),
            TrajectoryCfg::default(),
            &mut rng,
            50,
        )
        .expect("valid")
    };
    assert_eq!(run(8), run(8));
}
