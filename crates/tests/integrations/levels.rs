use level::{Level, LogLevels, MAX_SAFE_INTEGER};

#[test]
fn set_succeeds_only_for_safe_non_negative_integers() {
    let candidates: [(f64, bool); 8] = [
        (0.0, true),
        (31.0, true),
        (MAX_SAFE_INTEGER as f64, true),
        (-1.0, false),
        (0.25, false),
        (f64::NAN, false),
        (f64::INFINITY, false),
        (MAX_SAFE_INTEGER as f64 * 4.0, false),
    ];

    for (candidate, valid) in candidates {
        let mut level = Level::new(LogLevels::WARN);
        let before = level.get();
        assert_eq!(level.set(candidate), valid, "candidate {candidate}");
        if !valid {
            assert_eq!(level.get(), before, "candidate {candidate}");
        }
    }
}

#[test]
fn enable_then_disable_restores_empty_mask() {
    for shift in 0..53 {
        let bit = 1u64 << shift;
        let mut level = Level::new(LogLevels::NONE);
        assert!(level.enable(bit));
        assert!(level.disable(bit));
        assert_eq!(level.get(), LogLevels::NONE);
    }
}

#[test]
fn bits_beyond_safe_range_are_rejected() {
    let mut level = Level::new(LogLevels::NONE);
    assert!(!level.enable(1u64 << 53));
    assert_eq!(level.get(), LogLevels::NONE);
}
