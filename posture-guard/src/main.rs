use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use posture_guard::calibration::{
    CalibrationStore, PoseKind, DEFAULT_CALIBRATION_FRAMES, GUIDED_CALIBRATION_FRAMES,
};
use posture_guard::landmarks::{DetectorFrame, FrameSource, JsonlReplay};
use posture_guard::metrics::MetricsExtractor;
use posture_guard::monitor::{
    DriftCheckEvent, MonitorConfig, PostureListener, Sensitivity, SessionMonitor, SlouchEvent,
};
use posture_guard::{FileStorage, ManualClock, PostureError, Strategy};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the saved calibration profile
    #[arg(long, default_value = "calibration")]
    profile_dir: PathBuf,

    /// Identity the calibration profile belongs to
    #[arg(short, long, default_value = "default")]
    identity: String,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a reference posture from a landmark recording (JSON Lines)
    Calibrate {
        /// Recorded detector output
        recording: PathBuf,

        /// Posture held during the recording
        #[arg(long, value_enum)]
        pose: PoseKind,

        /// Frames to average [default: 60, or 180 with --guided]
        #[arg(long)]
        frames: Option<usize>,

        /// Collect the longer pass used by the guided calibration flow
        #[arg(long, conflicts_with = "frames")]
        guided: bool,
    },

    /// Replay a landmark recording through the slouch monitor
    Monitor {
        /// Recorded detector output
        recording: PathBuf,

        /// Monitor configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overrides the configured strategy
        #[arg(long, value_enum)]
        strategy: Option<Strategy>,

        /// Overrides the configured sensitivity
        #[arg(long, value_enum)]
        sensitivity: Option<Sensitivity>,
    },

    /// Delete the saved calibration profile
    Clear,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Posture guard starting");

    let storage = FileStorage::new(&args.profile_dir).with_context(|| {
        format!(
            "Failed to open profile directory {}",
            args.profile_dir.display()
        )
    })?;
    let mut store = CalibrationStore::new(storage, args.identity.as_str());

    match args.command {
        Command::Calibrate {
            recording,
            pose,
            frames,
            guided,
        } => {
            let mut store = store.with_required_frames(calibration_frames(frames, guided));
            run_calibration(&mut store, &args.identity, &recording, pose)
        }
        Command::Monitor {
            recording,
            config,
            strategy,
            sensitivity,
        } => {
            let mut config = match config {
                Some(path) => MonitorConfig::load(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => MonitorConfig::default(),
            };
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if let Some(sensitivity) = sensitivity {
                config.sensitivity = sensitivity;
            }

            run_monitor(&mut store, &args.identity, &recording, config)
        }
        Command::Clear => {
            store.clear();
            Ok(())
        }
    }
}

fn calibration_frames(frames: Option<usize>, guided: bool) -> usize {
    match (frames, guided) {
        (Some(frames), _) => frames,
        (None, true) => GUIDED_CALIBRATION_FRAMES,
        (None, false) => DEFAULT_CALIBRATION_FRAMES,
    }
}

fn run_calibration(
    store: &mut CalibrationStore<FileStorage>,
    identity: &str,
    recording: &Path,
    pose: PoseKind,
) -> Result<()> {
    // Keep the other pose if one was saved before
    match store.load(identity) {
        Ok(_) => {}
        Err(PostureError::ProfileNotFound { .. }) => {
            tracing::info!("No saved calibration for '{}', starting fresh", identity)
        }
        Err(e) => return Err(e).context("Failed to load calibration"),
    }

    let mut source = JsonlReplay::open(recording)?;
    let extractor = MetricsExtractor::default();
    store.begin(pose);

    let mut finished = false;
    while let Some(frame) = source.next_frame()? {
        let metrics = match &frame {
            DetectorFrame::Landmarks(landmarks) => extractor.extract(landmarks).ok(),
            DetectorFrame::NoPerson { .. } => None,
        };

        if let Some(progress) = store.add_frame(metrics.as_ref()) {
            tracing::debug!("Calibration {:.0}%", progress.percent);
            if progress.finished {
                finished = true;
                break;
            }
        }
    }

    if !finished {
        tracing::warn!(
            "Recording ended at {:.0}% of the calibration window",
            store.progress()
        );
        if store.finish().is_err() {
            bail!("No usable frames in {}", recording.display());
        }
    }

    store.save().context("Failed to save calibration")?;

    if store.is_complete() {
        tracing::info!("Calibration complete for '{}'", identity);
    } else {
        tracing::info!(
            "Calibrated {} posture; the other pose is still missing",
            pose
        );
    }
    Ok(())
}

fn run_monitor(
    store: &mut CalibrationStore<FileStorage>,
    identity: &str,
    recording: &Path,
    config: MonitorConfig,
) -> Result<()> {
    let calibration = match store.load(identity) {
        Ok(profile) => Some(profile.clone()),
        Err(PostureError::ProfileNotFound { .. }) if !config.strategy.needs_calibration() => {
            tracing::info!("No calibration found, using session baseline only");
            None
        }
        Err(e) => return Err(e).context("Calibrated monitoring needs a saved calibration"),
    };

    let mut source = JsonlReplay::open(recording)?;

    // Monitor time follows the recording, not the wall clock. Frames without
    // a timestamp read as 0 and must not rewind it.
    let clock = ManualClock::new(0);
    let mut monitor = SessionMonitor::with_clock(config, clock.clone());
    monitor.set_calibration(calibration);
    monitor.add_listener(AlertLog);

    let Some(first) = source.next_frame()? else {
        tracing::warn!("Recording {} is empty", recording.display());
        return Ok(());
    };
    clock.advance_to(first.timestamp_ms());
    monitor
        .start()
        .context("Failed to start monitoring; run `calibrate` for both poses first")?;

    let mut next = Some(first);
    while let Some(frame) = next {
        clock.advance_to(frame.timestamp_ms());
        monitor.process_frame(&frame);

        // Log stats every 100 frames
        if source.frames_read() % 100 == 0 {
            let stats = monitor.stats();
            tracing::info!(
                "Frame {}: quality={:.1}%, alerts={}, state={}",
                source.frames_read(),
                stats.posture_quality,
                stats.alert_count,
                stats.state
            );
        }

        next = source.next_frame()?;
    }

    monitor.stop();

    let stats = monitor.stats();
    tracing::info!(
        "Session: {} min, {} frames scored, quality={:.1}%, alerts={}",
        stats.duration_minutes,
        stats.total_frames,
        stats.posture_quality,
        stats.alert_count
    );
    Ok(())
}

/// Reports monitor events through the log
struct AlertLog;

impl PostureListener for AlertLog {
    fn on_slouch_detected(&mut self, event: &SlouchEvent) {
        tracing::warn!(
            "Slouching for {:.1}s ({}, deviation {:.1}): {}",
            event.duration_ms as f64 / 1000.0,
            event.severity,
            event.deviation,
            event.reasons().join(", ")
        );
    }

    fn on_posture_corrected(&mut self) {
        tracing::info!("Posture corrected");
    }

    fn on_drift_check(&mut self, event: &DriftCheckEvent) {
        if event.report.needs_recalibration() {
            tracing::warn!("Baseline drift: {}", event.report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrate_frames(argv: &[&str]) -> usize {
        let args = Args::try_parse_from(argv).unwrap();
        match args.command {
            Command::Calibrate { frames, guided, .. } => calibration_frames(frames, guided),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_calibrate_frame_counts() {
        let base = ["posture-guard", "calibrate", "rec.jsonl", "--pose", "good"];
        assert_eq!(calibrate_frames(&base), DEFAULT_CALIBRATION_FRAMES);

        let mut guided = base.to_vec();
        guided.push("--guided");
        assert_eq!(calibrate_frames(&guided), GUIDED_CALIBRATION_FRAMES);

        let mut explicit = base.to_vec();
        explicit.extend(["--frames", "90"]);
        assert_eq!(calibrate_frames(&explicit), 90);
    }

    #[test]
    fn test_guided_conflicts_with_frames() {
        let argv = [
            "posture-guard",
            "calibrate",
            "rec.jsonl",
            "--pose",
            "slouched",
            "--guided",
            "--frames",
            "90",
        ];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
