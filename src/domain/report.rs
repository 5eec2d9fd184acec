use super::matrix::Matrix;
use super::value_objects::SolutionStatus;
use std::fmt;

/// Which defining equation a solver's values failed to reproduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InconsistencyKind {
    Objective,
    ZoneDemand { zone: usize },
    CenterCapacity { center: usize },
    ClosedCenterFlow { center: usize },
    ForcedOpen { center: usize },
}

/// Warning-level signal: reported values disagree with the model beyond tolerance
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionInconsistency {
    pub kind: InconsistencyKind,
    pub expected: f64,
    pub actual: f64,
}

impl fmt::Display for SolutionInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            InconsistencyKind::Objective => write!(
                f,
                "reported objective {} differs from recomputed cost {}",
                self.actual, self.expected
            ),
            InconsistencyKind::ZoneDemand { zone } => write!(
                f,
                "zone {} receives {} but demands {}",
                zone + 1,
                self.actual,
                self.expected
            ),
            InconsistencyKind::CenterCapacity { center } => write!(
                f,
                "center {} ships {} above its capacity {}",
                center + 1,
                self.actual,
                self.expected
            ),
            InconsistencyKind::ClosedCenterFlow { center } => write!(
                f,
                "closed center {} ships {}",
                center + 1,
                self.actual
            ),
            InconsistencyKind::ForcedOpen { center } => {
                write!(f, "pre-opened center {} reported closed", center + 1)
            }
        }
    }
}

/// Domain view of an optimal assignment
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionDetails {
    /// Objective value as reported by the solver
    pub objective_value: f64,
    pub open: Vec<bool>,
    pub flows: Matrix,
    pub opening_cost_total: f64,
    pub transport_cost_total: f64,
    pub center_outbound: Vec<f64>,
    pub zone_inbound: Vec<f64>,
}

/// Result of interpreting a solve against its instance
///
/// `details` is only present when `status` is [`SolutionStatus::Optimal`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionReport {
    pub label: String,
    pub status: SolutionStatus,
    pub details: Option<SolutionDetails>,
    pub warnings: Vec<SolutionInconsistency>,
    pub message: String,
}

impl SolutionReport {
    pub fn without_details(
        label: impl Into<String>,
        status: SolutionStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            status,
            details: None,
            warnings: Vec::new(),
            message: message.into(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    pub fn objective_value(&self) -> Option<f64> {
        self.details.as_ref().map(|d| d.objective_value)
    }

    /// 0-based indices of open centers, empty when there are no details
    pub fn open_centers(&self) -> Vec<usize> {
        self.details
            .as_ref()
            .map(|d| {
                d.open
                    .iter()
                    .enumerate()
                    .filter(|(_, &open)| open)
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }
}

impl fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.label.is_empty() { "instance" } else { &self.label };
        writeln!(f, "=== {} ===", title)?;
        writeln!(f, "Status: {}", self.status)?;

        let Some(details) = &self.details else {
            return writeln!(f, "{}", self.message);
        };

        writeln!(f, "Objective: {:.2}", details.objective_value)?;
        writeln!(f)?;
        writeln!(f, "Centers:")?;
        for (i, open) in details.open.iter().enumerate() {
            writeln!(
                f,
                "  CD{}: {}",
                i + 1,
                if *open { "open" } else { "closed" }
            )?;
        }

        writeln!(f)?;
        write!(f, "{:>7}", "")?;
        for j in 0..details.flows.cols() {
            write!(f, "{:>9}", format!("CC{}", j + 1))?;
        }
        writeln!(f, "{:>9}", "Total")?;
        for i in 0..details.flows.rows() {
            write!(f, "{:>7}", format!("CD{}:", i + 1))?;
            for value in details.flows.row(i) {
                write!(f, "{:>9.1}", value)?;
            }
            writeln!(f, "{:>9.1}", details.center_outbound[i])?;
        }
        write!(f, "{:>7}", "In:")?;
        for value in &details.zone_inbound {
            write!(f, "{:>9.1}", value)?;
        }
        writeln!(f)?;

        writeln!(f)?;
        writeln!(f, "Opening cost:   {:.2}", details.opening_cost_total)?;
        writeln!(f, "Transport cost: {:.2}", details.transport_cost_total)?;

        for warning in &self.warnings {
            writeln!(f, "warning: {}", warning)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SolutionReport {
        SolutionReport {
            label: "demo".to_string(),
            status: SolutionStatus::Optimal,
            details: Some(SolutionDetails {
                objective_value: 12.0,
                open: vec![true, false, true],
                flows: Matrix::zeros(3, 1),
                opening_cost_total: 10.0,
                transport_cost_total: 2.0,
                center_outbound: vec![0.0; 3],
                zone_inbound: vec![0.0],
            }),
            warnings: Vec::new(),
            message: String::new(),
        }
    }

    #[test]
    fn test_open_centers() {
        assert_eq!(report().open_centers(), vec![0, 2]);
        assert_eq!(report().objective_value(), Some(12.0));
    }

    #[test]
    fn test_without_details_has_no_fields() {
        let report =
            SolutionReport::without_details("x", SolutionStatus::Infeasible, "no solution");
        assert!(report.open_centers().is_empty());
        assert_eq!(report.objective_value(), None);
        assert!(report.to_string().contains("Infeasible"));
    }

    #[test]
    fn test_display_mentions_decisions() {
        let text = report().to_string();
        assert!(text.contains("CD2: closed"));
        assert!(text.contains("Transport cost: 2.00"));
    }
}
