use posture_guard::calibration::{CalibrationStore, PoseKind, DEFAULT_CALIBRATION_FRAMES};
use posture_guard::classifier::{PostureIssue, Severity, Strategy};
use posture_guard::landmarks::{DetectorFrame, Landmark, LandmarkSet};
use posture_guard::monitor::{
    MonitorConfig, MonitorEvent, PostureListener, PostureState, SessionMonitor, SlouchEvent,
};
use posture_guard::{FileStorage, ManualClock, MemoryStorage, PostureError, PostureMetrics};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct Events {
    slouches: Rc<RefCell<Vec<(usize, SlouchEvent)>>>,
    corrections: Rc<RefCell<Vec<usize>>>,
    frame: Rc<RefCell<usize>>,
}

impl PostureListener for Events {
    fn on_slouch_detected(&mut self, event: &SlouchEvent) {
        let frame = *self.frame.borrow();
        self.slouches.borrow_mut().push((frame, event.clone()));
    }

    fn on_posture_corrected(&mut self) {
        let frame = *self.frame.borrow();
        self.corrections.borrow_mut().push(frame);
    }
}

fn metrics(head_shoulder_ratio: f64, torso_angle: f64) -> PostureMetrics {
    PostureMetrics {
        head_shoulder_ratio,
        shoulder_asymmetry: 0.02,
        torso_angle,
        neck_angle: 20.0,
        forward_lean: 0.1,
        shoulder_width: 0.25,
        timestamp_ms: 0,
    }
}

fn calibrate<S: posture_guard::ProfileStorage>(
    store: &mut CalibrationStore<S>,
    pose: PoseKind,
    m: PostureMetrics,
) {
    store.begin(pose);
    let mut last = None;
    for _ in 0..DEFAULT_CALIBRATION_FRAMES {
        last = store.add_frame(Some(&m));
    }
    assert!(last.unwrap().finished);
}

#[test]
fn calibrated_session_alerts_once_and_corrects_once() {
    let good = metrics(0.30, 5.0);
    let slouched = metrics(0.45, 25.0);

    let mut store = CalibrationStore::new(MemoryStorage::new(), "ana");
    calibrate(&mut store, PoseKind::Good, good);
    calibrate(&mut store, PoseKind::Slouched, slouched);
    assert!(store.is_complete());
    assert_eq!(store.profile().good_posture, Some(good));

    let clock = ManualClock::new(0);
    let events = Events::default();
    let mut monitor = SessionMonitor::with_clock(
        MonitorConfig::with_strategy(Strategy::Calibrated),
        clock.clone(),
    );
    monitor.set_calibration(Some(store.profile().clone()));
    monitor.add_listener(events.clone());
    monitor.start().unwrap();

    for i in 1..=150 {
        *events.frame.borrow_mut() = i;
        clock.advance(100);
        monitor.process_metrics(&slouched).unwrap();
    }

    {
        let slouches = events.slouches.borrow();
        assert_eq!(slouches.len(), 1);
        let (frame, event) = &slouches[0];
        assert_eq!(*frame, 100);
        assert_eq!(event.severity, Severity::Severe);
        assert_eq!(
            event.issues,
            vec![PostureIssue::ForwardHead, PostureIssue::TorsoTilt]
        );
        assert!(event.deviation > 60.0);
        assert_eq!(event.duration_ms, 99 * 100);
    }

    for i in 151..=160 {
        *events.frame.borrow_mut() = i;
        monitor.process_metrics(&good).unwrap();
    }

    assert_eq!(*events.corrections.borrow(), vec![160]);
    assert_eq!(events.slouches.borrow().len(), 1);

    let stats = monitor.stats();
    assert_eq!(stats.alert_count, 1);
    assert_eq!(stats.state, PostureState::Good);
    assert_eq!(stats.total_frames, 160);
    assert_eq!(stats.posture_quality, 6.3);
}

#[test]
fn calibrated_monitoring_refuses_to_start_without_profile() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CalibrationStore::new(FileStorage::new(dir.path()).unwrap(), "ana");

    assert!(matches!(
        store.load("ana"),
        Err(PostureError::ProfileNotFound { .. })
    ));

    let mut monitor = SessionMonitor::new(MonitorConfig::with_strategy(Strategy::Both));
    monitor.set_calibration(None);
    assert!(matches!(
        monitor.start(),
        Err(PostureError::CalibrationIncomplete)
    ));
    assert!(!monitor.is_running());
    assert_eq!(monitor.stats().total_frames, 0);
    assert_eq!(monitor.stats().state, PostureState::Good);
}

#[test]
fn saved_profile_survives_reload_from_disk() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = CalibrationStore::new(FileStorage::new(dir.path()).unwrap(), "ana")
            .with_required_frames(DEFAULT_CALIBRATION_FRAMES);
        calibrate(&mut store, PoseKind::Good, metrics(0.30, 5.0));
        calibrate(&mut store, PoseKind::Slouched, metrics(0.45, 25.0));
        store.save().unwrap();
    }

    let mut store = CalibrationStore::new(FileStorage::new(dir.path()).unwrap(), "someone");
    assert!(store.load("bob").is_err());
    let profile = store.load("ana").unwrap().clone();
    assert!(profile.is_complete());

    let mut monitor = SessionMonitor::new(MonitorConfig::with_strategy(Strategy::Calibrated));
    monitor.set_calibration(Some(profile));
    assert!(monitor.start().is_ok());
}

fn seated(head_drop: f64, timestamp_ms: u64) -> DetectorFrame {
    // Ears sink towards the shoulders and forward as the user slouches
    DetectorFrame::Landmarks(LandmarkSet {
        nose: Some(Landmark::new(0.5, 0.30 + head_drop, -0.30 - head_drop)),
        left_shoulder: Some(Landmark::new(0.40, 0.50, -0.10 - head_drop)),
        right_shoulder: Some(Landmark::new(0.60, 0.50, -0.10 - head_drop)),
        left_hip: Some(Landmark::new(0.42, 0.90, 0.0)),
        right_hip: Some(Landmark::new(0.58, 0.90, 0.0)),
        left_ear: Some(Landmark::new(0.45, 0.28 + head_drop, -0.20)),
        right_ear: Some(Landmark::new(0.55, 0.28 + head_drop, -0.20)),
        timestamp_ms,
    })
}

#[test]
fn drift_session_detects_sustained_slouch_from_landmarks() {
    let clock = ManualClock::new(0);
    let config = MonitorConfig {
        required_slouch_frames: Some(20),
        required_good_frames: Some(5),
        ..MonitorConfig::with_strategy(Strategy::BaselineDrift)
    };
    let mut monitor = SessionMonitor::with_clock(config, clock.clone());
    monitor.start().unwrap();

    let mut t = 0;
    let mut events = Vec::new();
    let mut step = |monitor: &mut SessionMonitor, frame: DetectorFrame| {
        t += 100;
        clock.set(t);
        if let Some(outcome) = monitor.process_frame(&frame) {
            if let Some(event) = outcome.event {
                events.push(event);
            }
        }
    };

    for _ in 0..30 {
        step(&mut monitor, seated(0.0, 0));
    }
    // Nobody in view for a while
    for _ in 0..10 {
        step(&mut monitor, DetectorFrame::NoPerson { timestamp_ms: 0 });
    }
    for _ in 0..25 {
        step(&mut monitor, seated(0.12, 0));
    }
    for _ in 0..5 {
        step(&mut monitor, seated(0.0, 0));
    }

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], MonitorEvent::SlouchDetected(_)));
    assert_eq!(events[1], MonitorEvent::PostureCorrected);

    let stats = monitor.stats();
    assert_eq!(stats.total_frames, 60);
    assert_eq!(stats.alert_count, 1);
}
