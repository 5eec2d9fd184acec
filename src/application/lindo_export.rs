// External-format exporter: LINDO-style plain text model
//
// Works straight off the instance data, never off a DecisionModel, so a model
// can be handed to an external tool without solving anything here.
//
// Flow variables are named X{center}{zone} with no separator. Above 9 centers
// or zones the names become ambiguous (X111 is 1→11 or 11→1); consumers of
// this format depend on the names, so the format is kept and a warning logged.

use crate::domain::{check_centers, ProblemInstance, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Maximum width of an objective line
pub const MAX_LINE_WIDTH: usize = 60;

pub const OPEN_PREFIX: &str = "Y";
pub const FLOW_PREFIX: &str = "X";

pub fn open_name(center: usize) -> String {
    format!("{}{}", OPEN_PREFIX, center + 1)
}

pub fn flow_name(center: usize, zone: usize) -> String {
    format!("{}{}{}", FLOW_PREFIX, center + 1, zone + 1)
}

pub struct LindoExporter;

impl LindoExporter {
    /// Render `instance` as LINDO text
    ///
    /// `pre_opened_override`, when given, replaces the instance's own set of
    /// pre-opened centers for this export only.
    pub fn export(
        instance: &ProblemInstance,
        pre_opened_override: Option<&BTreeSet<usize>>,
        label: &str,
    ) -> Result<String> {
        let pre_opened = match pre_opened_override {
            Some(centers) => {
                check_centers(centers, instance.num_centers())?;
                centers
            }
            None => instance.pre_opened(),
        };

        let n = instance.num_centers();
        let m = instance.num_zones();
        if n > 9 || m > 9 {
            warn!(
                centers = n,
                zones = m,
                "flow variable names are ambiguous above 9 centers or zones"
            );
        }

        let mut lines: Vec<String> = vec![
            format!("! {}", label),
            "! Capacitated facility location model".to_string(),
            String::new(),
            "MIN".to_string(),
        ];
        lines.extend(wrap_terms(&objective_terms(instance)));

        lines.push(String::new());
        lines.push("SUBJECT TO".to_string());
        lines.push(String::new());

        lines.push("! Capacity constraints".to_string());
        for i in 0..n {
            let flows: Vec<String> = (0..m).map(|j| flow_name(i, j)).collect();
            lines.push(format!(
                "{} - {} {} <= 0",
                flows.join(" + "),
                number(instance.capacity(i)),
                open_name(i)
            ));
        }
        lines.push(String::new());

        lines.push("! Demand constraints".to_string());
        for j in 0..m {
            let flows: Vec<String> = (0..n).map(|i| flow_name(i, j)).collect();
            lines.push(format!("{} = {}", flows.join(" + "), number(instance.demand(j))));
        }
        lines.push(String::new());

        if !pre_opened.is_empty() {
            lines.push("! Pre-opened centers".to_string());
            for &i in pre_opened {
                lines.push(format!("{} = 1", open_name(i)));
            }
        }

        lines.push(String::new());
        lines.push("END".to_string());
        lines.push(String::new());

        lines.push("INT".to_string());
        lines.extend((0..n).map(open_name));

        debug!(label, lines = lines.len(), "exported LINDO model");

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }

    /// Export and write to `path`
    pub fn export_to_file<P: AsRef<Path>>(
        path: P,
        instance: &ProblemInstance,
        pre_opened_override: Option<&BTreeSet<usize>>,
        label: &str,
    ) -> Result<()> {
        let text = Self::export(instance, pre_opened_override, label)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn objective_terms(instance: &ProblemInstance) -> Vec<String> {
    let mut terms = Vec::new();

    for i in 0..instance.num_centers() {
        let cost = instance.opening_cost(i);
        if cost != 0.0 {
            terms.push(format!("{} {}", number(cost), open_name(i)));
        }
    }
    for i in 0..instance.num_centers() {
        for j in 0..instance.num_zones() {
            let cost = instance.transport_cost(i, j);
            if cost != 0.0 {
                terms.push(format!("{} {}", number(cost), flow_name(i, j)));
            }
        }
    }

    // LINDO rejects an empty MIN section
    if terms.is_empty() {
        terms.push(format!("0 {}", flow_name(0, 0)));
    }
    terms
}

/// Join terms with " + ", starting a "+ " continuation line whenever the
/// next term would push the current line past [`MAX_LINE_WIDTH`]
fn wrap_terms(terms: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for term in terms {
        if current.is_empty() {
            current.push_str(term);
        } else if current.len() + term.len() + 3 > MAX_LINE_WIDTH {
            lines.push(std::mem::take(&mut current));
            current = format!("+ {}", term);
        } else {
            current.push_str(" + ");
            current.push_str(term);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shortest decimal form: 500000, 12.5
fn number(value: f64) -> String {
    format!("{}", value)
}
