//! Property-based tests for the grading engine.

use proptest::prelude::*;

use rusty_grades::grading::{
    assign_absolute, assign_by_quota, assign_zscore_bands, count_by_grade, grade,
    DistributionTable, GradingError, GradingPolicy, GradingRequest, ScoreSet, ThresholdTable,
    DEFAULT_GRADE,
};

const ZSCORE_LABELS: [&str; 11] = ["A*", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D", "F"];

fn scores_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50.0f64..150.0, 1..60)
}

#[test]
fn documented_absolute_example() {
    let table = ThresholdTable::parse("A:90,B:80,C:70,D:60,F:50").unwrap();
    let scores = ScoreSet::new(vec![95.0, 85.0, 72.0, 55.0, 10.0]);
    let labels = assign_absolute(&scores, &table).unwrap();
    assert_eq!(labels.labels(), &["A", "B", "C", "F", "F"]);
}

#[test]
fn documented_quota_example() {
    let scores: ScoreSet = (1..=10).map(|i| f64::from(i) * 7.0).collect();
    let dist = DistributionTable::parse("A:20,B:30,C:30,D:15,F:5").unwrap();
    let labels = assign_by_quota(&scores, &dist).unwrap();
    assert_eq!(
        labels.labels(),
        &["A", "A", "B", "B", "B", "C", "C", "C", "D", "F"]
    );
}

#[test]
fn empty_input_is_rejected_everywhere() {
    let empty = ScoreSet::default();
    let table = ThresholdTable::parse("A:90").unwrap();
    let dist = DistributionTable::parse("A:100").unwrap();
    assert_eq!(assign_absolute(&empty, &table), Err(GradingError::EmptyScoreSet));
    assert_eq!(assign_zscore_bands(&empty), Err(GradingError::EmptyScoreSet));
    assert_eq!(assign_by_quota(&empty, &dist), Err(GradingError::EmptyScoreSet));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// One label per score, drawn from the table or the default grade.
    #[test]
    fn absolute_labels_come_from_table(scores in scores_strategy()) {
        let table = ThresholdTable::parse("A:90,B:80,C:70,D:60").unwrap();
        let assignment = assign_absolute(&ScoreSet::new(scores.clone()), &table).unwrap();
        prop_assert_eq!(assignment.len(), scores.len());
        for label in assignment.labels() {
            prop_assert!(table.contains_label(label) || label == DEFAULT_GRADE);
        }
    }

    /// Identical scores always land in the middle band.
    #[test]
    fn zero_variance_is_all_b(value in -1.0e6f64..1.0e6, n in 1usize..40) {
        let assignment = assign_zscore_bands(&ScoreSet::new(vec![value; n])).unwrap();
        prop_assert!(assignment.labels().iter().all(|l| l == "B"));
    }

    /// Z-score bands never skip a score and only use known labels.
    #[test]
    fn zscore_labels_are_known(scores in scores_strategy()) {
        let assignment = assign_zscore_bands(&ScoreSet::new(scores.clone())).unwrap();
        prop_assert_eq!(assignment.len(), scores.len());
        for label in assignment.labels() {
            prop_assert!(ZSCORE_LABELS.contains(&label.as_str()));
            prop_assert_ne!(label.as_str(), "F");
        }
    }

    /// A higher score never gets a lower band than a lower score.
    #[test]
    fn zscore_is_monotonic(scores in scores_strategy()) {
        let assignment = assign_zscore_bands(&ScoreSet::new(scores.clone())).unwrap();
        let rank = |label: &str| ZSCORE_LABELS.iter().position(|l| *l == label).unwrap();
        for i in 0..scores.len() {
            for j in 0..scores.len() {
                if scores[i] > scores[j] {
                    prop_assert!(rank(&assignment.labels()[i]) <= rank(&assignment.labels()[j]));
                }
            }
        }
    }

    /// Quota slices go low-to-high in distribution order.
    #[test]
    fn quota_follows_ascending_rank(scores in scores_strategy()) {
        let dist = DistributionTable::parse("A:20,B:30,C:30,D:15,F:5").unwrap();
        let assignment = assign_by_quota(&ScoreSet::new(scores.clone()), &dist).unwrap();
        let order = ["A", "B", "C", "D", "F"];
        let rank = |label: &str| order.iter().position(|l| *l == label).unwrap();
        for i in 0..scores.len() {
            for j in 0..scores.len() {
                if scores[i] < scores[j] {
                    prop_assert!(rank(&assignment.labels()[i]) <= rank(&assignment.labels()[j]));
                }
            }
        }
    }

    /// Grade counts always add back up to the number of scores.
    #[test]
    fn counts_sum_to_total(scores in scores_strategy()) {
        let n = scores.len();
        for policy in [
            GradingPolicy::Absolute(ThresholdTable::parse("A:90,B:80,C:70").unwrap()),
            GradingPolicy::ZScoreBands,
            GradingPolicy::Quota(DistributionTable::parse("A:1,B:2,C:3").unwrap()),
        ] {
            let request = GradingRequest::new(policy).with_scores(ScoreSet::new(scores.clone()));
            let outcome = grade(&request).unwrap();
            prop_assert_eq!(count_by_grade(&outcome.assignment).total(), n);
            prop_assert_eq!(outcome.statistics.summary.count, n);
        }
    }
}
