use super::config::MonitorConfig;
use super::events::{
    BaselineSource, DriftCheckEvent, FrameOutcome, MonitorEvent, PostureListener, SlouchEvent,
};
use super::state::{posture_quality, MonitorState, PostureState, SessionStats};
use crate::calibration::{check_drift, CalibrationProfile};
use crate::classifier::{PostureClassifier, Verdict};
use crate::clock::{Clock, SystemClock};
use crate::error::PostureError;
use crate::landmarks::DetectorFrame;
use crate::metrics::{MetricsExtractor, PostureMetrics};

/// Debounces per-frame verdicts into slouch/correction events for one user
pub struct SessionMonitor {
    config: MonitorConfig,
    extractor: MetricsExtractor,
    classifier: PostureClassifier,
    calibration: Option<CalibrationProfile>,
    session_baseline: Option<PostureMetrics>,
    state: MonitorState,
    running: bool,
    listeners: Vec<Box<dyn PostureListener>>,
    clock: Box<dyn Clock>,
}

impl SessionMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    pub fn with_clock(config: MonitorConfig, clock: impl Clock + 'static) -> Self {
        Self {
            extractor: MetricsExtractor::new(config.min_visibility),
            classifier: PostureClassifier::new(config.strategy, config.classifier),
            calibration: None,
            session_baseline: None,
            state: MonitorState::default(),
            running: false,
            listeners: Vec::new(),
            clock: Box::new(clock),
            config,
        }
    }

    /// Provide the calibration profile used by calibrated strategies
    pub fn set_calibration(&mut self, profile: Option<CalibrationProfile>) {
        self.calibration = profile;
    }

    pub fn add_listener(&mut self, listener: impl PostureListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Begin a new session
    ///
    /// Refuses to start, leaving all state untouched, when the strategy
    /// needs a calibration profile that is missing or incomplete.
    pub fn start(&mut self) -> Result<(), PostureError> {
        let strategy = self.classifier.strategy();
        let calibrated = self
            .calibration
            .as_ref()
            .map_or(false, CalibrationProfile::is_complete);

        if strategy.needs_calibration() && !calibrated {
            tracing::warn!("Cannot start {:?} monitoring without a complete calibration", strategy);
            return Err(PostureError::CalibrationIncomplete);
        }

        self.state = MonitorState::new(self.clock.now_ms());
        self.session_baseline = None;
        self.running = true;

        tracing::info!(
            "Monitoring started: strategy={:?}, slouch_frames={}, good_frames={}",
            strategy,
            self.config.slouch_frames(),
            self.config.good_frames()
        );
        Ok(())
    }

    /// Halt frame processing; safe to call at any time
    pub fn stop(&mut self) {
        if self.running {
            tracing::info!("Monitoring stopped after {} frames", self.state.total_frames);
            self.state.stopped_at_ms = Some(self.clock.now_ms());
        }
        self.running = false;
        self.session_baseline = None;
    }

    /// Forget the current streaks and session baseline without emitting events
    pub fn reset_session(&mut self) {
        tracing::info!("Resetting posture session");
        self.state.reset_streaks(self.clock.now_ms());
        self.session_baseline = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn session_baseline(&self) -> Option<&PostureMetrics> {
        self.session_baseline.as_ref()
    }

    /// Process one detector frame
    ///
    /// Frames are skipped (returning `None`, with no state change) while
    /// stopped, when nobody is in view, or when the landmarks are unusable.
    pub fn process_frame(&mut self, frame: &DetectorFrame) -> Option<FrameOutcome> {
        if !self.running {
            return None;
        }

        let landmarks = match frame {
            DetectorFrame::NoPerson { .. } => {
                tracing::debug!("No person detected, skipping frame");
                return None;
            }
            DetectorFrame::Landmarks(landmarks) => landmarks,
        };

        match self.extractor.extract(landmarks) {
            Ok(metrics) => self.process_metrics(&metrics),
            Err(e) => {
                tracing::debug!("Skipping frame: {}", e);
                None
            }
        }
    }

    /// Process metrics that were extracted elsewhere
    pub fn process_metrics(&mut self, metrics: &PostureMetrics) -> Option<FrameOutcome> {
        if !self.running {
            return None;
        }

        let _span = tracing::debug_span!("process_frame", frame = self.state.total_frames).entered();

        if self.classifier.strategy().uses_session_baseline() && self.session_baseline.is_none() {
            tracing::info!("Captured session baseline");
            tracing::debug!("Session baseline: {:?}", metrics);
            self.session_baseline = Some(*metrics);
        }

        let good_posture = self
            .calibration
            .as_ref()
            .and_then(|profile| profile.good_posture.as_ref());
        let verdict =
            self.classifier
                .classify(metrics, good_posture, self.session_baseline.as_ref())?;

        let now = self.clock.now_ms();
        let event = self.apply_verdict(&verdict, now);
        let drift_check = self.maybe_check_drift(metrics, now);

        Some(FrameOutcome {
            verdict,
            event,
            drift_check,
        })
    }

    fn apply_verdict(&mut self, verdict: &Verdict, now: u64) -> Option<MonitorEvent> {
        let state = &mut self.state;
        state.total_frames += 1;

        if verdict.slouching {
            state.slouch_frames += 1;
            state.good_streak = 0;
            if state.slouch_streak == 0 {
                state.slouch_started_ms = Some(now);
            }
            state.slouch_streak = state.slouch_streak.saturating_add(1);

            if state.slouch_streak >= self.config.slouch_frames()
                && state.posture == PostureState::Good
            {
                state.posture = PostureState::Slouched;
                state.alert_count += 1;

                let event = SlouchEvent {
                    issues: verdict.issues.clone(),
                    severity: verdict.severity,
                    duration_ms: now.saturating_sub(state.slouch_started_ms.unwrap_or(now)),
                    deviation: verdict.deviation,
                    at_ms: now,
                };

                tracing::info!("Slouch detected: {}", verdict);
                for listener in &mut self.listeners {
                    listener.on_slouch_detected(&event);
                }
                return Some(MonitorEvent::SlouchDetected(event));
            }
        } else {
            state.good_frames += 1;
            state.slouch_streak = 0;
            state.slouch_started_ms = None;
            state.good_streak = state.good_streak.saturating_add(1);

            if state.good_streak >= self.config.good_frames()
                && state.posture == PostureState::Slouched
            {
                state.posture = PostureState::Good;

                tracing::info!("Posture corrected");
                for listener in &mut self.listeners {
                    listener.on_posture_corrected();
                }
                return Some(MonitorEvent::PostureCorrected);
            }
        }

        None
    }

    fn maybe_check_drift(&mut self, metrics: &PostureMetrics, now: u64) -> Option<DriftCheckEvent> {
        let interval_ms = self.config.drift_check_interval().as_millis() as u64;
        if now.saturating_sub(self.state.last_drift_check_ms) < interval_ms {
            return None;
        }
        self.state.last_drift_check_ms = now;

        let calibrated = self
            .calibration
            .as_ref()
            .and_then(|profile| profile.good_posture.as_ref());
        let (baseline, source) = match calibrated {
            Some(good) => (Some(good), BaselineSource::Calibration),
            None => (self.session_baseline.as_ref(), BaselineSource::Session),
        };

        let event = DriftCheckEvent {
            report: check_drift(baseline, metrics, self.config.drift_tolerance),
            source,
            at_ms: now,
        };

        tracing::info!("Drift check ({:?}): {}", source, event.report);
        for listener in &mut self.listeners {
            listener.on_drift_check(&event);
        }
        Some(event)
    }

    pub fn stats(&self) -> SessionStats {
        let end_ms = self
            .state
            .stopped_at_ms
            .unwrap_or_else(|| self.clock.now_ms());
        let elapsed_ms = self
            .state
            .session_start_ms
            .map_or(0, |start| end_ms.saturating_sub(start));

        SessionStats {
            duration_minutes: elapsed_ms / 60_000,
            posture_quality: posture_quality(self.state.good_frames, self.state.total_frames),
            alert_count: self.state.alert_count,
            state: self.state.posture,
            total_frames: self.state.total_frames,
            good_frames: self.state.good_frames,
            slouch_frames: self.state.slouch_frames,
        }
    }
}
