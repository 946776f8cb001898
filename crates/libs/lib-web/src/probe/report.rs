//! # Probe Report
//!
//! Per-case outcomes and per-boundary tallies.

use std::collections::BTreeMap;
use std::fmt;

use lib_core::Boundary;

/// Result of one probe case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub name: String,
    pub boundary: Boundary,
    pub target: String,
    /// Status of every response received, in send order
    pub statuses: Vec<u16>,
    pub violations: Vec<String>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl ProbeReport {
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn violation_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.violations.len()).sum()
    }

    pub fn by_boundary(&self) -> BTreeMap<Boundary, Tally> {
        let mut tallies = BTreeMap::new();
        for outcome in &self.outcomes {
            let tally: &mut Tally = tallies.entry(outcome.boundary).or_default();
            if outcome.passed() {
                tally.passed += 1;
            } else {
                tally.failed += 1;
            }
        }
        tallies
    }

    pub fn outcome(&self, name: &str) -> Option<&CaseOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<24} {:>6} {:>6}", "boundary", "pass", "fail")?;
        for (boundary, tally) in self.by_boundary() {
            writeln!(f, "{:<24} {:>6} {:>6}", boundary.as_str(), tally.passed, tally.failed)?;
        }
        for outcome in self.failures() {
            writeln!(f, "FAIL [{}] {} ({})", outcome.boundary, outcome.name, outcome.target)?;
            for violation in &outcome.violations {
                writeln!(f, "  - {violation}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, boundary: Boundary, violations: &[&str]) -> CaseOutcome {
        CaseOutcome {
            name: name.to_string(),
            boundary,
            target: "GET /x".to_string(),
            statuses: vec![200],
            violations: violations.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_tallies() {
        let report = ProbeReport {
            outcomes: vec![
                outcome("a", Boundary::Authentication, &[]),
                outcome("b", Boundary::Authentication, &["status 200 not accepted"]),
                outcome("c", Boundary::Sanitization, &["server fault 500", "stack trace"]),
            ],
        };
        assert!(!report.is_clean());
        assert_eq!(report.violation_count(), 3);
        assert_eq!(report.failures().count(), 2);

        let tallies = report.by_boundary();
        assert_eq!(tallies[&Boundary::Authentication], Tally { passed: 1, failed: 1 });
        assert_eq!(tallies[&Boundary::Sanitization], Tally { passed: 0, failed: 1 });

        let text = report.to_string();
        assert!(text.contains("FAIL [sanitization] c"));
        assert!(text.contains("  - server fault 500"));
    }
}
