//! Amplitude telemetry for the call indicator.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Map a raw SDK volume onto `[0, 1]`, lifting quiet levels and compressing loud ones.
pub fn normalize_volume(raw: f32) -> f32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0.0;
    }
    (raw.sqrt() * 2.5).min(1.0)
}

/// Anything that can report live input and output volume.
pub trait VolumeSource: Send + Sync + 'static {
    fn input_volume(&self) -> f32;
    fn output_volume(&self) -> f32;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeLevels {
    pub input: f32,
    pub output: f32,
}

impl VolumeLevels {
    pub fn sample(source: &dyn VolumeSource) -> Self {
        Self {
            input: normalize_volume(source.input_volume()),
            output: normalize_volume(source.output_volume()),
        }
    }
}

/// Polls a [`VolumeSource`] on a fixed interval and publishes normalized levels.
pub struct VolumeMonitor {
    levels: watch::Receiver<VolumeLevels>,
    task: JoinHandle<()>,
}

impl VolumeMonitor {
    pub fn spawn(source: Arc<dyn VolumeSource>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(VolumeLevels::default());
        let period = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let levels = VolumeLevels::sample(source.as_ref());
                trace!(input = levels.input, output = levels.output, "volume sample");
                if tx.send(levels).is_err() {
                    break;
                }
            }
        });

        Self { levels: rx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<VolumeLevels> {
        self.levels.clone()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for VolumeMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Fixed {
        input: AtomicU32,
        output: f32,
    }

    impl VolumeSource for Fixed {
        fn input_volume(&self) -> f32 {
            f32::from_bits(self.input.load(Ordering::SeqCst))
        }

        fn output_volume(&self) -> f32 {
            self.output
        }
    }

    #[test]
    fn normalization_is_bounded() {
        assert_eq!(normalize_volume(0.0), 0.0);
        assert_eq!(normalize_volume(-1.0), 0.0);
        assert_eq!(normalize_volume(f32::NAN), 0.0);
        assert_eq!(normalize_volume(1.0), 1.0);
        assert_eq!(normalize_volume(25.0), 1.0);
        assert!((normalize_volume(0.04) - 0.5).abs() < 1e-6);
        assert!(normalize_volume(0.01) > 0.01);
    }

    #[test]
    fn normalization_is_monotonic() {
        let samples: Vec<f32> = (0..=100).map(|i| normalize_volume(i as f32 / 100.0)).collect();
        assert!(samples.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn monitor_publishes_latest_levels() {
        let source = Arc::new(Fixed {
            input: AtomicU32::new(0.04f32.to_bits()),
            output: 0.0,
        });
        let monitor = VolumeMonitor::spawn(source.clone(), Duration::from_millis(50));
        let mut levels = monitor.subscribe();

        levels.changed().await.unwrap();
        assert!((levels.borrow().input - 0.5).abs() < 1e-6);

        source.input.store(1.0f32.to_bits(), Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        levels.changed().await.unwrap();
        assert_eq!(levels.borrow().input, 1.0);

        monitor.stop();
    }
}
