mod common;

use common::fixtures::*;
use common::{TestResult, generate_pdf, test_renderer};

#[test]
fn test_batch_plans_by_volume() -> TestResult {
    let renderer = test_renderer();
    for (count, size, batches) in [(10, 20, 1), (75, 18, 5), (150, 15, 10)] {
        let plan = renderer.layout(&request("en", count))?.plan;
        assert_eq!((plan.batch_size, plan.batch_count), (size, batches), "{} rows", count);
    }
    Ok(())
}

#[test]
fn test_multi_batch_structure() -> TestResult {
    let summary = test_renderer().layout(&request("en", 75))?.summary();
    assert_eq!(summary.transaction_tables, 5);
    assert_eq!(summary.transaction_rows, 75);
    assert_eq!(summary.captions, 5);
    assert_eq!(summary.page_breaks, 4);
    Ok(())
}

#[test]
fn test_single_batch_has_no_captions_or_breaks() -> TestResult {
    let summary = test_renderer().layout(&request("en", 10))?.summary();
    assert_eq!(summary.transaction_tables, 1);
    assert_eq!(summary.captions, 0);
    assert_eq!(summary.page_breaks, 0);
    Ok(())
}

#[test]
fn test_every_page_has_a_true_page_footer() -> TestResult {
    let pdf = generate_pdf(&request("en", 75))?;

    assert_pdf_min_pages!(pdf, 5);
    let total = pdf.page_count();
    assert_eq!(pdf.report.page_count, total);
    for page in 1..=total {
        let text = pdf.page_text(page as u32);
        assert!(
            text.contains(&format!("Page {} of {}", page, total)),
            "page {} footer missing from:\n{}",
            page,
            text
        );
        assert!(text.contains("Statement Date: 31-Mar-2025"));
    }
    Ok(())
}

#[test]
fn test_batch_captions_are_rendered() -> TestResult {
    let pdf = generate_pdf(&request("en", 150))?;
    assert_pdf_min_pages!(pdf, 10);
    // Batch captions count batches, not physical pages.
    assert_pdf_contains_text!(pdf, "Page 10 of 10");
    Ok(())
}

#[test]
fn test_transactions_keep_input_order() -> TestResult {
    let pdf = generate_pdf(&request("en", 75))?;
    let text = common::pdf_assertions::extract_text(&pdf.doc);

    let positions: Vec<usize> = (0..75)
        .map(|i| text.find(&format!("Merchant {:03}", i)).expect("every row is rendered"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

#[test]
fn test_long_table_repeats_its_header() -> TestResult {
    // One batch of 20 rows does not fit below the summary on page one.
    let pdf = generate_pdf(&request("en", 20))?;
    assert_eq!(pdf.report.blocks.transaction_tables, 1);
    assert_pdf_min_pages!(pdf, 2);

    let second = pdf.page_text(2);
    assert!(second.contains("Description"), "header missing on continuation:\n{}", second);
    assert!(!second.contains("Cardholder Information"));
    Ok(())
}

#[test]
fn test_empty_statement_still_renders() -> TestResult {
    let pdf = generate_pdf(&request("en", 0))?;
    assert_pdf_page_count!(pdf, 1);
    assert_eq!(pdf.report.plan.batch_count, 1);
    assert_eq!(pdf.report.blocks.transaction_rows, 0);
    Ok(())
}
