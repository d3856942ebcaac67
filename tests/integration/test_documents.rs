//! Multi-sentence document tests for the context carrier and clinical
//! idiom handling.

use chrono::NaiveDate;
use onset::{segment, Category, DocumentAnnotation, TemporalAnnotator};

fn annotate(text: &str) -> DocumentAnnotation {
    TemporalAnnotator::default().annotate(text, &segment(text), "test-doc")
}

fn annotate_with_reference(text: &str, reference: NaiveDate) -> DocumentAnnotation {
    TemporalAnnotator::with_reference_date(reference).annotate(text, &segment(text), "test-doc")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn find_text<'a>(annotation: &'a DocumentAnnotation, needle: &str) -> &'a onset::TimeExpression {
    annotation
        .expressions
        .iter()
        .find(|e| e.text.eq_ignore_ascii_case(needle))
        .unwrap_or_else(|| panic!("no span {:?} in {:?}", needle, annotation.expressions))
}

#[test]
fn test_year_completed_by_same_sentence_lookahead() {
    // The September mention and the fully-dated March mention share a
    // sentence: the year comes from lookahead, not document state.
    let text = "Fever began in September and was reported March 3, 2020 by the parent.";
    let annotation = annotate(text);
    let september = find_text(&annotation, "September");
    assert_eq!(september.resolution.date(), Some(date(2020, 9, 1)));
}

#[test]
fn test_year_completed_by_rolling_document_state() {
    // The dated mention is in an earlier sentence, so lookahead finds
    // nothing and the rolling year applies.
    let text = "The event was reported March 3, 2020. Fever began in September per the parent.";
    let annotation = annotate(text);
    let september = find_text(&annotation, "September");
    assert_eq!(september.resolution.date(), Some(date(2020, 9, 1)));
}

#[test]
fn test_reference_date_seeds_rolling_state() {
    let text = "Fever began in September per the parent.";
    let annotation = annotate_with_reference(text, date(2021, 6, 15));
    let september = find_text(&annotation, "September");
    assert_eq!(september.resolution.date(), Some(date(2021, 9, 1)));
}

#[test]
fn test_unresolved_partial_survives_without_context() {
    let text = "Fever began in September per the parent.";
    let annotation = annotate(text);
    let september = find_text(&annotation, "September");
    assert_eq!(september.resolution.date(), None);
    let partial = september.resolution.partial().expect("partial triple");
    assert_eq!(partial.month, Some(9));
    assert_eq!(partial.year, None);
}

#[test]
fn test_rolling_state_moves_forward_across_sentences() {
    // The second partial picks up the most recent year, not the first.
    let text = "Seen June 1, 2018 initially. Seen again March 3, 2020 later. \
                Final visit in September as planned.";
    let annotation = annotate(text);
    let september = find_text(&annotation, "September");
    assert_eq!(september.resolution.date(), Some(date(2020, 9, 1)));
}

#[test]
fn test_hospital_day_idioms_are_relative() {
    let text = "Extubated on POD 2. Discharged home on day 3 after observation.";
    let annotation = annotate(text);

    let pod = find_text(&annotation, "POD 2");
    assert_eq!(pod.category, Category::Rel);

    let day3 = find_text(&annotation, "day 3");
    assert_eq!(day3.category, Category::Rel);
}

#[test]
fn test_reference_year_completes_ddmon() {
    let text = "Vaccinated 13NOV and discharged soon after.";
    let annotation = annotate_with_reference(text, date(2011, 1, 1));
    let compact = find_text(&annotation, "13NOV");
    assert_eq!(compact.resolution.date(), Some(date(2011, 11, 13)));
    assert_eq!(compact.confidence, 0.8);
}

#[test]
fn test_dropped_spans_counted_per_document() {
    // A lot-number lookalike fails every resolution strategy.
    let text = "Dispensed lot 1/45 without incident.";
    let annotation = annotate(text);
    assert_eq!(annotation.metadata.dropped_spans, 1);
    assert!(annotation.expressions.is_empty());
}

#[test]
fn test_sentence_indices_recorded() {
    let text = "Seen March 3, 2020 first. Then 3 days later all was well.";
    let annotation = annotate(text);
    let march = find_text(&annotation, "March 3, 2020");
    let later = find_text(&annotation, "3 days later");
    assert_eq!(march.sentence_index, 0);
    assert_eq!(later.sentence_index, 1);
}
