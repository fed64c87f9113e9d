#![no_main]
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::StdRng;
use stroker_core::{GeneratorKind, MotionParams, Settings, Trajectory};

fuzz_target!(|data: &str| {
    // Arbitrary TOML must never panic the loader; a config that validates must
    // also never panic a generator, only fail with a typed error.
    let Ok(cfg) = stroker_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let settings = Settings::from(&cfg);
    let params = MotionParams {
        top: 100,
        bottom: 0,
        back: 50,
        forth: 50,
        speed: 1,
    };
    let mut rng = StdRng::seed_from_u64(0);
    for kind in GeneratorKind::ALL {
        if let Ok(traj) =
            Trajectory::build(kind, &params, &settings.ranges, settings.trajectory, &mut rng)
        {
            for frame in traj.take(64) {
                let _ = frame.encode();
            }
        }
    }
});
