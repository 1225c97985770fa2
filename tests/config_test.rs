use almanac::EventKind;
use almanac::config::{ConfigFile, SearchBudget};
use almanac::ephemeris::MeanElementEphemeris;
use almanac::error::AlmanacError;
use almanac::search::{NoProgress, ScanDriver};

const CONFIG: &str = r#"
[search]
max_windows = 500
timeout = "5m"

[events.new_moon]
step = "3h"
guard_band = "20d"

[events.solstice_summer]
derivative_offset = "2h"
"#;

#[test]
fn test_config_overrides_reach_the_driver() {
    let file = ConfigFile::parse(CONFIG).unwrap();
    let known = EventKind::slugs();

    let mut budget = SearchBudget::default();
    file.apply_budget(&mut budget);
    assert_eq!(budget.max_windows, 500);
    assert_eq!(budget.timeout.map(|d| d.as_secs()), Some(300));

    let kind = EventKind::NewMoon;
    let mut scan = kind.default_scan();
    file.overrides_for(kind.slug(), &known)
        .unwrap()
        .expect("new_moon section")
        .apply(&mut scan);
    assert_eq!(scan.step, 3 * 3600);
    assert_eq!(scan.guard_band, 20 * 86_400);

    let ephemeris = MeanElementEphemeris;
    let event = kind.descriptor(&ephemeris, scan);
    let seq = ScanDriver::new(&event)
        .with_budget(budget)
        .run(0, 12, &mut NoProgress)
        .unwrap();
    assert_eq!(seq.len(), 12);
    for pair in seq.timestamps.windows(2) {
        assert!(pair[1] - pair[0] > 20 * 86_400);
    }

    assert!(file.overrides_for("apogee", &known).unwrap().is_none());
}

#[test]
fn test_unknown_event_section_rejected() {
    let file = ConfigFile::parse("[events.blue_moon]\nstep = \"1h\"\n").unwrap();
    let err = file
        .overrides_for("new_moon", &EventKind::slugs())
        .unwrap_err();
    assert!(matches!(err, AlmanacError::Config(_)));
}

#[test]
fn test_unknown_field_rejected() {
    assert!(matches!(
        ConfigFile::parse("[search]\nmax_window = 3\n"),
        Err(AlmanacError::ConfigFile(_))
    ));
}

#[test]
fn test_tiny_budget_reports_unreachable() {
    let file = ConfigFile::parse("[search]\nmax_windows = 2\n").unwrap();
    let mut budget = SearchBudget::default();
    file.apply_budget(&mut budget);

    let ephemeris = MeanElementEphemeris;
    let kind = EventKind::EquinoxVernal;
    let event = kind.descriptor(&ephemeris, kind.default_scan());
    let err = ScanDriver::new(&event)
        .with_budget(budget)
        .run(0, 10, &mut NoProgress)
        .unwrap_err();
    match err {
        AlmanacError::TargetUnreachable {
            found,
            requested,
            windows,
            ..
        } => {
            assert_eq!(requested, 10);
            assert_eq!(windows, 2);
            assert!(found < 10);
        }
        other => panic!("unexpected error: {}", other),
    }
}
