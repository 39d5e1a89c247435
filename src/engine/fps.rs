/// Rolling frame-rate average over a fixed window of frames.
///
/// All durations are milliseconds. A window of `n` frames with durations
/// `d_1..d_n` yields `1000 * n / sum(d_i)` frames per second.
#[derive(Debug, Clone)]
pub struct FpsMeter {
    window: u32,
    samples: u32,
    total_ms: f64,
    average: f64,
}

impl FpsMeter {
    pub fn new(window: u32, initial_average: f64) -> Self {
        FpsMeter {
            window: window.max(1),
            samples: 0,
            total_ms: 0.0,
            average: initial_average,
        }
    }

    /// Adds one frame duration. Returns the new average when this sample
    /// completes a window.
    pub fn record(&mut self, frame_ms: f64) -> Option<f64> {
        self.samples += 1;
        self.total_ms += frame_ms;
        if self.samples < self.window {
            return None;
        }

        let completed = if self.total_ms > 0.0 {
            let average = 1000.0 * f64::from(self.samples) / self.total_ms;
            self.average = average;
            Some(average)
        } else {
            // zero-length window, keep the previous figure
            None
        };
        self.reset();
        completed
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    /// Drops the partially filled window, the last average is kept.
    pub fn reset(&mut self) {
        self.samples = 0;
        self.total_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn average_is_frames_over_total_time() {
        let durations = [30.0, 40.0, 35.5, 28.25];
        let mut meter = FpsMeter::new(durations.len() as u32, 30.0);

        let mut result = None;
        for d in durations {
            result = meter.record(d);
        }

        let expected = 1000.0 * 4.0 / durations.iter().sum::<f64>();
        assert_relative_eq!(result.unwrap(), expected, epsilon = 1e-9);
        assert_relative_eq!(meter.average(), expected, epsilon = 1e-9);
    }

    #[test]
    fn keeps_initial_average_until_window_completes() {
        let mut meter = FpsMeter::new(3, 30.0);
        assert_eq!(meter.record(10.0), None);
        assert_eq!(meter.record(10.0), None);
        assert_relative_eq!(meter.average(), 30.0);
    }

    #[test]
    fn window_restarts_after_each_average() {
        let mut meter = FpsMeter::new(2, 30.0);
        meter.record(50.0);
        assert_relative_eq!(meter.record(50.0).unwrap(), 20.0);

        meter.record(25.0);
        assert_relative_eq!(meter.record(25.0).unwrap(), 40.0);
    }

    #[test]
    fn zero_length_window_is_ignored() {
        let mut meter = FpsMeter::new(2, 60.0);
        meter.record(0.0);
        assert_eq!(meter.record(0.0), None);
        assert_relative_eq!(meter.average(), 60.0);
    }
}
