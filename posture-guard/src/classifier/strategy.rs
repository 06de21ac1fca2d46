use super::baseline::classify_drift;
use super::calibrated::classify_calibrated;
use super::config::ClassifierConfig;
use super::types::{Strategy, Verdict};
use crate::metrics::PostureMetrics;

/// Applies the configured strategy to one frame
#[derive(Debug, Clone)]
pub struct PostureClassifier {
    strategy: Strategy,
    config: ClassifierConfig,
}

impl PostureClassifier {
    pub fn new(strategy: Strategy, config: ClassifierConfig) -> Self {
        Self { strategy, config }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Classify `current` against whichever baselines the strategy uses
    ///
    /// Returns `None` when a baseline the strategy depends on is missing.
    pub fn classify(
        &self,
        current: &PostureMetrics,
        calibrated: Option<&PostureMetrics>,
        session: Option<&PostureMetrics>,
    ) -> Option<Verdict> {
        let calibrated_verdict =
            || calibrated.map(|good| classify_calibrated(current, good, &self.config.calibrated));
        let drift_verdict =
            || session.map(|baseline| classify_drift(current, baseline, &self.config.drift));

        match self.strategy {
            Strategy::Calibrated => calibrated_verdict(),
            Strategy::BaselineDrift => drift_verdict(),
            Strategy::Both => match (calibrated_verdict(), drift_verdict()) {
                (Some(a), Some(b)) => Some(combine(a, b)),
                (a, b) => a.or(b),
            },
        }
    }
}

/// Either verdict flags slouching; severity comes from the calibrated
/// comparison whenever it fires
fn combine(calibrated: Verdict, drift: Verdict) -> Verdict {
    let slouching = calibrated.slouching || drift.slouching;

    let mut issues = calibrated.issues.clone();
    for issue in &drift.issues {
        if !issues.contains(issue) {
            issues.push(*issue);
        }
    }

    let lead = if calibrated.slouching || !drift.slouching {
        &calibrated
    } else {
        &drift
    };

    Verdict {
        slouching,
        severity: lead.severity,
        deviation: lead.deviation,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{PostureIssue, Severity};

    fn good() -> PostureMetrics {
        PostureMetrics {
            head_shoulder_ratio: 0.30,
            shoulder_asymmetry: 0.02,
            torso_angle: 4.0,
            neck_angle: 20.0,
            forward_lean: 0.10,
            shoulder_width: 0.25,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_missing_baseline_gives_no_verdict() {
        let classifier = PostureClassifier::new(Strategy::Calibrated, ClassifierConfig::default());
        assert!(classifier.classify(&good(), None, Some(&good())).is_none());

        let classifier = PostureClassifier::new(Strategy::BaselineDrift, ClassifierConfig::default());
        assert!(classifier.classify(&good(), Some(&good()), None).is_none());

        let classifier = PostureClassifier::new(Strategy::Both, ClassifierConfig::default());
        assert!(classifier.classify(&good(), None, None).is_none());
    }

    #[test]
    fn test_both_is_or_of_verdicts() {
        let classifier = PostureClassifier::new(Strategy::Both, ClassifierConfig::default());

        // Session started already slouched: only the calibrated comparison fires
        let mut session = good();
        session.head_shoulder_ratio = 0.45;
        session.torso_angle = 12.0;
        let current = session;

        let verdict = classifier
            .classify(&current, Some(&good()), Some(&session))
            .unwrap();
        assert!(verdict.slouching);
        assert_eq!(verdict.severity, Severity::Severe);
        assert!(verdict.issues.contains(&PostureIssue::ForwardHead));
    }

    #[test]
    fn test_both_uses_drift_severity_when_only_drift_fires() {
        let classifier = PostureClassifier::new(Strategy::Both, ClassifierConfig::default());

        // Calibrated profile matches the slouch; the session baseline does not
        let mut slouched = good();
        slouched.head_shoulder_ratio = 0.42;
        slouched.neck_angle = 28.0;

        let verdict = classifier
            .classify(&slouched, Some(&slouched), Some(&good()))
            .unwrap();
        assert!(verdict.slouching);
        assert_eq!(
            verdict.issues,
            vec![PostureIssue::ForwardHead, PostureIssue::HeadTilt]
        );
        // 40% + 40% change from the session baseline
        assert!((verdict.deviation - 80.0).abs() < 1e-6);
        assert_eq!(verdict.severity, Severity::Moderate);
    }

    #[test]
    fn test_both_issues_are_merged_without_duplicates() {
        let a = Verdict {
            slouching: false,
            severity: Severity::Mild,
            deviation: 10.0,
            issues: vec![PostureIssue::ForwardHead],
        };
        let b = Verdict {
            slouching: false,
            severity: Severity::Mild,
            deviation: 30.0,
            issues: vec![PostureIssue::ForwardHead, PostureIssue::ForwardLean],
        };

        let merged = combine(a, b);
        assert!(!merged.slouching);
        assert_eq!(merged.deviation, 10.0);
        assert_eq!(
            merged.issues,
            vec![PostureIssue::ForwardHead, PostureIssue::ForwardLean]
        );
    }
}
