#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use cryptstream_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        let mut c = TelemetryCounters::default();
        c.add_data(100, 112);
        c.add_data(16, 32);
        c.add_terminator();
        c.add_persisted();
        c.add_deduplicated();
        c
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(5));
        timer.add_stage_time(Stage::Read, Duration::from_millis(1));
        timer.add_stage_time(Stage::Encrypt, Duration::from_millis(2));
        timer.finish();
        timer
    }

    #[test]
    fn counters_accumulate() {
        let c = make_counters();
        assert_eq!(c.units_data, 2);
        assert_eq!(c.units_terminator, 1);
        assert_eq!(c.bytes_plaintext, 116);
        assert_eq!(c.bytes_ciphertext, 144);
        assert_eq!(c.padding_bytes(), 28);
    }

    #[test]
    fn merge_and_add_assign_agree() {
        let mut merged = make_counters();
        merged.merge(&make_counters());

        let mut added = make_counters();
        added += make_counters();

        assert_eq!(merged, added);
        assert_eq!(merged.units_data, 4);
        assert_eq!(merged.blobs_deduplicated, 2);
    }

    #[test]
    fn stage_times_accumulate_and_merge() {
        let mut a = StageTimes::default();
        a.add(Stage::Persist, Duration::from_millis(3));
        a.add(Stage::Persist, Duration::from_millis(4));
        assert_eq!(a.get(Stage::Persist), Duration::from_millis(7));
        assert_eq!(a.get(Stage::Describe), Duration::ZERO);

        let mut b = StageTimes::default();
        b.add(Stage::Persist, Duration::from_millis(1));
        b.add(Stage::Digest, Duration::from_millis(2));
        a.merge(&b);

        assert_eq!(a.get(Stage::Persist), Duration::from_millis(8));
        assert_eq!(a.total(), Duration::from_millis(10));
        assert!(a.has_all(&[Stage::Persist, Stage::Digest]));
        assert!(!a.has_all(&[Stage::Read]));
        assert!(a.summary().starts_with("read=0.00ms encrypt=0.00ms digest=2.00ms"));
    }

    #[test]
    fn snapshot_copies_counters_and_timings() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());

        assert_eq!(snapshot.units_data, 2);
        assert_eq!(snapshot.blobs_persisted, 1);
        assert!(snapshot.elapsed >= Duration::from_millis(5));
        assert_eq!(snapshot.total_stage_time(), Duration::from_millis(3));
        assert!(snapshot.has_all_stages(&[Stage::Read, Stage::Encrypt]));
        assert!(snapshot.throughput_plaintext_bytes_per_sec > 0.0);
        assert!(snapshot.sanity_check());
    }

    #[test]
    fn sanity_check_catches_unpersisted_units() {
        let mut c = make_counters();
        c.add_data(10, 16);
        let snapshot = TelemetrySnapshot::from(&c, &make_timer());
        assert!(!snapshot.sanity_check());
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["units_data"], 2);
        assert_eq!(json["bytes_ciphertext"], 144);
        assert!(json["stage_times"]["times"]["Encrypt"].is_object());
    }
}
