use std::time::{Duration, Instant};

/// Stopwatch with an optional time limit.
#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
    elapsed_time: Duration,
    running: bool,
    time_limit: Option<Duration>,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            elapsed_time: Duration::ZERO,
            running: true,
            time_limit: None,
        }
    }
}

impl Timer {
    /// Returns a running timer with the given time limit.
    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self {
            time_limit: Some(time_limit),
            ..Default::default()
        }
    }

    /// Starts or resumes the timer.
    pub fn start(&mut self) {
        if !self.running {
            self.start = Instant::now();
            self.running = true;
        }
    }

    /// Pauses the timer.
    pub fn stop(&mut self) {
        if self.running {
            self.elapsed_time += self.start.elapsed();
            self.running = false;
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        if self.running {
            self.elapsed_time + self.start.elapsed()
        } else {
            self.elapsed_time
        }
    }

    /// Returns the remaining time, if there is a time limit.
    pub fn remaining(&self) -> Option<Duration> {
        self.time_limit
            .map(|time_limit| time_limit.saturating_sub(self.elapsed()))
    }

    /// Returns whether the time limit is reached.
    pub fn check_time_limit(&self) -> bool {
        self.remaining().is_some_and(|remaining| remaining.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_limit() {
        let timer = Timer::default();

        assert_eq!(timer.remaining(), None);
        assert!(!timer.check_time_limit());
    }

    #[test]
    fn test_zero_limit_is_reached() {
        let timer = Timer::with_time_limit(Duration::ZERO);

        assert_eq!(timer.remaining(), Some(Duration::ZERO));
        assert!(timer.check_time_limit());
    }

    #[test]
    fn test_generous_limit_is_not_reached() {
        let timer = Timer::with_time_limit(Duration::from_secs(3600));

        assert!(!timer.check_time_limit());
        assert!(timer.remaining().unwrap() > Duration::from_secs(3500));
    }

    #[test]
    fn test_stopped_timer_does_not_advance() {
        let mut timer = Timer::default();
        timer.stop();
        let elapsed = timer.elapsed();

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.elapsed(), elapsed);

        timer.start();
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() > elapsed);
    }
}
