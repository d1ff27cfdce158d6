//! Latency report printed at the end of a query run.

use std::io::{self, Write};
use std::time::Duration;

/// Per-trial timings of one completed query run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatencyReport {
    timings: Vec<Duration>,
}

impl LatencyReport {
    pub fn new(timings: Vec<Duration>) -> Self {
        LatencyReport { timings }
    }

    pub fn timings(&self) -> &[Duration] {
        &self.timings
    }

    /// Whole milliseconds of each trial, truncated.
    pub fn trial_millis(&self) -> impl Iterator<Item = u128> + '_ {
        self.timings.iter().map(Duration::as_millis)
    }

    /// Floor of the mean of [`Self::trial_millis`], 0 for an empty report.
    pub fn average_millis(&self) -> u128 {
        if self.timings.is_empty() {
            return 0;
        }
        self.trial_millis().sum::<u128>() / self.timings.len() as u128
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for millis in self.trial_millis() {
            writeln!(out, "{}ms", millis)?;
        }
        writeln!(out, "Avg response: {}ms", self.average_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_is_floor_of_whole_millis() {
        let report = LatencyReport::new(vec![
            Duration::from_micros(3_900),
            Duration::from_millis(4),
            Duration::from_micros(10_999),
        ]);
        assert_eq!(report.trial_millis().collect::<Vec<_>>(), vec![3, 4, 10]);
        // (3 + 4 + 10) / 3 = 5.67
        assert_eq!(report.average_millis(), 5);
    }

    #[test]
    fn prints_each_trial_then_average() {
        let report = LatencyReport::new(vec![Duration::from_millis(12), Duration::from_millis(7)]);
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "12ms\n7ms\nAvg response: 9ms\n"
        );
    }

    #[test]
    fn empty_report_averages_to_zero() {
        assert_eq!(LatencyReport::default().average_millis(), 0);
    }
}
