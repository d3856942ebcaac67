//! End-to-end pipeline tests over single sentences.

use chrono::NaiveDate;
use onset::extraction::{evaluate, Relation};
use onset::{segment, Category, DocumentAnnotation, Role, TemporalAnnotator};

fn annotate(text: &str) -> DocumentAnnotation {
    let annotator = TemporalAnnotator::default();
    annotator.annotate(text, &segment(text), "test-doc")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dates_of(annotation: &DocumentAnnotation) -> Vec<NaiveDate> {
    annotation
        .expressions
        .iter()
        .filter_map(|e| e.resolution.date())
        .collect()
}

#[test]
fn test_written_date_round_trip() {
    let annotation = annotate("The patient was vaccinated on march 30, 2017.");
    assert_eq!(dates_of(&annotation), vec![date(2017, 3, 30)]);
}

#[test]
fn test_compact_date_with_confidence() {
    let annotation = annotate("Admitted 13NOV2011 with fever.");
    let expr = &annotation.expressions[0];
    assert_eq!(expr.resolution.date(), Some(date(2011, 11, 13)));
    assert_eq!(expr.confidence, 1.0);
    assert_eq!(expr.category, Category::Date);
}

#[test]
fn test_two_digit_year_century() {
    let annotation = annotate("Symptoms noted 3Apr11 per chart.");
    assert_eq!(dates_of(&annotation), vec![date(2011, 4, 3)]);
}

#[test]
fn test_compact_range_split() {
    let text = "Treatment course ran 28JUL05-12AUG06 overall.";
    let annotation = annotate(text);
    assert_eq!(dates_of(&annotation), vec![date(2005, 7, 28), date(2006, 8, 12)]);

    // Both halves carry full confidence and their own spans.
    for expr in &annotation.expressions {
        assert_eq!(expr.confidence, 1.0);
    }
    let first = &annotation.expressions[0];
    let second = &annotation.expressions[1];
    assert_eq!(&text[first.start..=first.end], "28JUL05");
    assert_eq!(&text[second.start..=second.end], "12AUG06");
}

#[test]
fn test_compound_day_split() {
    let annotation = annotate("Doses given 2 and 5 Dec 2019 at the clinic.");
    assert_eq!(dates_of(&annotation), vec![date(2019, 12, 2), date(2019, 12, 5)]);
}

#[test]
fn test_classifier_categories_end_to_end() {
    let categories = |text: &str| -> Vec<Category> {
        annotate(text).expressions.iter().map(|e| e.category).collect()
    };

    assert!(categories("Medication taken every week since onset.").contains(&Category::Frq));
    assert!(categories("Fever persisted for 3 weeks after that.").contains(&Category::Dur));
    assert!(categories("Symptoms began 3 weeks ago at home.").contains(&Category::Rel));
    assert!(categories("Completed a 3 week treatment without issue.").contains(&Category::Other));
    assert!(categories("Follow-up on March 3 went well.").contains(&Category::Date));
}

#[test]
fn test_age_spans_are_ignored_role() {
    let annotation = annotate("A 77 year old woman presented with rash.");
    let age = annotation
        .expressions
        .iter()
        .find(|e| e.category == Category::Age)
        .expect("age span");
    assert_eq!(age.role, Role::Ignore);
}

#[test]
fn test_merger_invariant_holds_end_to_end() {
    let annotation = annotate(
        "Seen march 30, 2017 then again 3 days later, with fever for 2 weeks from 7/28 on.",
    );
    let exprs = &annotation.expressions;
    for (i, a) in exprs.iter().enumerate() {
        for b in exprs.iter().skip(i + 1) {
            if a.sentence_index == b.sentence_index {
                assert!(
                    a.end < b.start || b.end < a.start,
                    "overlap between {:?} and {:?}",
                    a.text,
                    b.text
                );
            }
        }
    }
}

#[test]
fn test_relative_evaluator_examples() {
    assert_eq!(
        evaluate("3 days", Relation::After, date(2020, 1, 1)),
        date(2020, 1, 4)
    );
    assert_eq!(
        evaluate("a year and a half", Relation::Before, date(2020, 1, 1)),
        date(2018, 7, 3)
    );
}

#[test]
fn test_output_is_ordered_by_start() {
    let annotation =
        annotate("First 7/28 then march 30, 2017 and finally 3 days ago it resolved.");
    let starts: Vec<usize> = annotation.expressions.iter().map(|e| e.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn test_json_round_trip() {
    let annotation = annotate("Vaccinated on 13NOV2011, recovered fully.");
    let json = serde_json::to_string(&annotation).unwrap();
    let back: DocumentAnnotation = serde_json::from_str(&json).unwrap();
    assert_eq!(back.expressions.len(), annotation.expressions.len());
    assert_eq!(back.expressions[0].resolution, annotation.expressions[0].resolution);
}
