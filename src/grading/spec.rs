use serde::Serialize;

use super::error::{GradingError, Result};

// ---------------------------------------------------------------------------
// Grammar: "Label:Number,Label:Number,..."
// ---------------------------------------------------------------------------

/// Split a grade spec into ordered `(label, value)` pairs.
///
/// Pairs keep the order in which they were written and repeated labels are
/// kept as-is. Whitespace around labels and values is ignored.
pub fn parse_pairs(spec: &str) -> Result<Vec<(String, f64)>> {
    if spec.trim().is_empty() {
        return Err(GradingError::MalformedSpec("spec is empty".into()));
    }

    spec.split(',')
        .enumerate()
        .map(|(i, pair)| {
            let mut parts = pair.split(':');
            let (label, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(label), Some(value), None) => (label.trim(), value.trim()),
                _ => {
                    return Err(GradingError::MalformedSpec(format!(
                        "pair {i} ('{pair}') must contain exactly one ':'"
                    )))
                }
            };

            if label.is_empty() {
                return Err(GradingError::MalformedSpec(format!(
                    "pair {i} ('{pair}') has an empty label"
                )));
            }

            let value = value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    GradingError::MalformedSpec(format!(
                        "pair {i}: '{value}' is not a finite number"
                    ))
                })?;

            Ok((label.to_string(), value))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ThresholdTable
// ---------------------------------------------------------------------------

/// Ordered grade → minimum score cutoffs. Order is significant: the first
/// entry whose cutoff is met wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    entries: Vec<(String, f64)>,
}

impl ThresholdTable {
    pub fn parse(spec: &str) -> Result<Self> {
        Ok(Self {
            entries: parse_pairs(spec)?,
        })
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }
}

// ---------------------------------------------------------------------------
// DistributionTable
// ---------------------------------------------------------------------------

/// Ordered grade → cohort share. Shares are weights; they are normalised by
/// their total and need not add up to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionTable {
    entries: Vec<(String, f64)>,
}

impl DistributionTable {
    pub fn parse(spec: &str) -> Result<Self> {
        let entries = parse_pairs(spec)?;
        if let Some((label, share)) = entries.iter().find(|(_, share)| *share < 0.0) {
            return Err(GradingError::InvalidDistribution(format!(
                "share for '{label}' is negative ({share})"
            )));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// Sum of all shares.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, share)| share).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_thresholds_in_order() {
        let table = ThresholdTable::parse("A:90,B:80,C:70,D:60,F:50").unwrap();
        assert_eq!(
            table.entries(),
            &[
                ("A".to_string(), 90.0),
                ("B".to_string(), 80.0),
                ("C".to_string(), 70.0),
                ("D".to_string(), 60.0),
                ("F".to_string(), 50.0),
            ]
        );
    }

    #[test]
    fn keeps_repeated_labels() {
        let pairs = parse_pairs("A:90,A:80").unwrap();
        assert_eq!(pairs, vec![("A".into(), 90.0), ("A".into(), 80.0)]);
    }

    #[test]
    fn trims_whitespace() {
        let pairs = parse_pairs(" A : 90 , B+:85.5").unwrap();
        assert_eq!(pairs, vec![("A".into(), 90.0), ("B+".into(), 85.5)]);
    }

    #[test]
    fn rejects_bad_grammar() {
        for bad in ["", "   ", "A90", "A:90:1", "A:ninety", "A:90,", ":90", "A:NaN", "A:inf"] {
            assert!(
                matches!(parse_pairs(bad), Err(GradingError::MalformedSpec(_))),
                "expected MalformedSpec for {bad:?}"
            );
        }
    }

    #[test]
    fn distribution_rejects_negative_share() {
        assert!(matches!(
            DistributionTable::parse("A:50,B:-10"),
            Err(GradingError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn distribution_total() {
        let dist = DistributionTable::parse("A:20,B:30,C:30,D:15,F:5").unwrap();
        assert_eq!(dist.total(), 100.0);
    }
}
