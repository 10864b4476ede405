//! Selecting which probes to run.
use super::Probe;
use crate::errors::PicarError;
use regex::Regex;

/// The probes of one run, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub probes: Vec<Probe>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            probes: Probe::ALL.to_vec(),
        }
    }
}

impl Plan {
    /// Keep probes matching `include` and not matching `exclude`. A filter
    /// matches a probe if it matches either its summary name or its key.
    pub fn with_filters(
        mut self,
        include: Option<&Regex>,
        exclude: Option<&Regex>,
    ) -> Result<Self, PicarError> {
        let matches =
            |re: &Regex, p: &Probe| re.is_match(p.name()) || re.is_match(p.key());
        self.probes.retain(|p| {
            include.map(|inc| matches(inc, p)).unwrap_or(true)
                && !exclude.map(|ex| matches(ex, p)).unwrap_or(false)
        });
        if self.probes.is_empty() {
            return Err(PicarError(
                "No probes left to run after applying the filters.".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(s: &str) -> Regex {
        Regex::new(s).unwrap()
    }

    #[test]
    fn no_filters_runs_everything_in_order() {
        let plan = Plan::default().with_filters(None, None).unwrap();
        assert_eq!(
            plan.probes,
            vec![Probe::Chassis, Probe::Camera, Probe::Audio, Probe::Servo]
        );
    }

    #[test]
    fn include_matches_names_and_keys() {
        let plan = Plan::default()
            .with_filters(Some(&re("^(Camera|servo)$")), None)
            .unwrap();
        assert_eq!(plan.probes, vec![Probe::Camera, Probe::Servo]);
    }

    #[test]
    fn exclude_wins_over_include() {
        let plan = Plan::default()
            .with_filters(Some(&re("a")), Some(&re("Audio")))
            .unwrap();
        assert_eq!(plan.probes, vec![Probe::Chassis, Probe::Camera]);
    }

    #[test]
    fn empty_selection_is_an_error() {
        assert!(Plan::default()
            .with_filters(Some(&re("nothing")), None)
            .is_err());
    }
}
