use serde::{Deserialize, Serialize};

/// Failure messages beyond this many are counted but not kept.
pub const MAX_RECORDED_FAILURES: usize = 64;

/// Tally of verification checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub total:    u64,
    pub failed:   u64,
    /// First [`MAX_RECORDED_FAILURES`] failure descriptions, in order.
    pub failures: Vec<String>,
}

impl VerificationReport {
    pub fn passed(&self) -> u64 {
        self.total - self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn pass(&mut self) {
        self.total += 1;
    }

    pub fn fail(&mut self, legend: String) {
        self.total += 1;
        self.failed += 1;
        tracing::warn!(check = self.total, "{legend}");
        if self.failures.len() < MAX_RECORDED_FAILURES {
            self.failures.push(legend);
        }
    }

    /// Record one check; `legend` is only built when the check fails.
    pub fn check<F: FnOnce() -> String>(&mut self, passed: bool, legend: F) {
        if passed {
            self.pass();
        } else {
            self.fail(legend());
        }
    }

    /// Summary line for display.
    pub fn summary(&self) -> String {
        format!(
            "Total tests : {}  passed : {}  failed : {}",
            self.total,
            self.passed(),
            self.failed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_counting_past_the_message_cap() {
        let mut report = VerificationReport::default();
        for i in 0..200 {
            report.check(i % 2 == 0, || format!("odd {i}"));
        }
        assert_eq!(report.total, 200);
        assert_eq!(report.failed, 100);
        assert_eq!(report.passed(), 100);
        assert_eq!(report.failures.len(), MAX_RECORDED_FAILURES);
        assert_eq!(report.failures[0], "odd 1");
        assert_eq!(report.summary(), "Total tests : 200  passed : 100  failed : 100");
    }

    #[test]
    fn serializes_as_json() {
        let mut report = VerificationReport::default();
        report.pass();
        report.fail("bad byte".into());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["failures"][0], "bad byte");
    }
}
