use crate::printer;
use colored::*;

/// Exit code when every probe passed.
pub const EXIT_ALL_PASSED: i32 = 0;
/// Exit code when some, but not all, probes failed.
pub const EXIT_SOME_FAILED: i32 = 1;
/// Exit code when every probe failed.
pub const EXIT_ALL_FAILED: i32 = 2;
/// Exit code when the run was interrupted, whatever had finished.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Result of running one probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Name of the probe.
    pub name: &'static str,
    pub passed: bool,
}

impl Outcome {
    pub fn new(name: &'static str, passed: bool) -> Self {
        Self { name, passed }
    }
}

/// Outcomes of a run, in execution order.
#[derive(Debug, Default)]
pub struct Summary {
    pub outcomes: Vec<Outcome>,
}

impl Summary {
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn exit_code(&self) -> i32 {
        match self.passed() {
            p if p == self.total() => EXIT_ALL_PASSED,
            0 => EXIT_ALL_FAILED,
            _ => EXIT_SOME_FAILED,
        }
    }

    /// Generate the colorized summary table and verdict.
    pub fn report_str(&self) -> String {
        let mut buf = String::with_capacity(500);
        buf.push('\n');
        buf.push_str(&printer::rule());
        buf.push('\n');
        buf.push_str("📊 Test Results Summary:\n");
        buf.push_str(&printer::rule());
        buf.push('\n');

        for Outcome { name, passed } in &self.outcomes {
            let status = if *passed {
                "✓ PASS".green()
            } else {
                "❌ FAIL".red()
            };
            buf.push_str(&format!("{:<20} {}\n", name, status));
        }

        buf.push_str(&printer::rule());
        buf.push('\n');
        buf.push_str(&format!(
            "Tests passed: {}/{}\n\n",
            self.passed(),
            self.total()
        ));

        let verdict = match self.exit_code() {
            EXIT_ALL_PASSED => "🎉 All tests passed! PiCar-X is fully functional."
                .green()
                .bold(),
            EXIT_ALL_FAILED => {
                "❌ All tests failed. Please check your PiCar-X installation."
                    .red()
                    .bold()
            }
            _ => format!(
                "⚠️  {} test(s) failed. Check connections and configuration.",
                self.total() - self.passed()
            )
            .yellow()
            .bold(),
        };
        buf.push_str(&verdict.to_string());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(results: &[bool]) -> Summary {
        let mut summary = Summary::default();
        for (i, passed) in results.iter().enumerate() {
            let name = ["a", "b", "c", "d"][i];
            summary.push(Outcome::new(name, *passed));
        }
        summary
    }

    #[test]
    fn exit_code_follows_pass_count() {
        assert_eq!(summary(&[true, true, true, true]).exit_code(), 0);
        assert_eq!(summary(&[true, false, true, true]).exit_code(), 1);
        assert_eq!(summary(&[false, false, false, true]).exit_code(), 1);
        assert_eq!(summary(&[false, false, false, false]).exit_code(), 2);
    }

    #[test]
    fn passed_counts_true_outcomes() {
        let s = summary(&[true, false, true, false]);
        assert_eq!(s.passed(), 2);
        assert_eq!(s.total(), 4);
    }

    #[test]
    fn report_lists_outcomes_in_order() {
        colored::control::set_override(false);
        let report = summary(&[true, false, true, true]).report_str();
        let a = report.find("a                    ✓ PASS").unwrap();
        let b = report.find("b                    ❌ FAIL").unwrap();
        assert!(a < b);
        assert!(report.contains("Tests passed: 3/4"));
        assert!(report.contains("1 test(s) failed"));
    }
}
