mod common;

use common::fixtures::*;
use common::{TestResult, expect_layout_error, generate_pdf, test_renderer};
use statement_render::{RenderError, RendererBuilder, StatementRequest};

#[test]
fn test_nan_amount_names_the_record() {
    let mut request = request("en", 30);
    request.transactions[7].amount = f64::NAN;

    let err = expect_layout_error(generate_pdf(&request));
    assert!(matches!(err, RenderError::Layout { .. }));
    assert_eq!(err.record_index(), Some(7));
}

#[test]
fn test_infinite_summary_field_fails_layout() {
    let mut request = request("en", 3);
    request.statement.new_balance = f64::INFINITY;

    let err = expect_layout_error(generate_pdf(&request));
    assert_eq!(err.record_index(), None);
    assert!(err.to_string().contains("new_balance"), "{}", err);
}

#[test]
fn test_failed_render_publishes_nothing() -> TestResult {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("statement.pdf");
    let mut request = request("en", 60);
    request.transactions[59].amount = f64::NEG_INFINITY;

    let result = test_renderer().render_to_path(&request, &target);
    assert!(matches!(result, Err(RenderError::Layout { record_index: Some(59), .. })));
    assert!(!target.exists());
    assert_eq!(std::fs::read_dir(dir.path())?.count(), 0, "temporary output should be removed");
    Ok(())
}

#[test]
fn test_failed_render_leaves_existing_target_untouched() -> TestResult {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("statement.pdf");
    std::fs::write(&target, b"previous statement")?;
    let mut request = request("en", 2);
    request.transactions[0].amount = f64::NAN;

    assert!(test_renderer().render_to_path(&request, &target).is_err());
    assert_eq!(std::fs::read(&target)?, b"previous statement");
    Ok(())
}

#[test]
fn test_failed_render_writes_nothing_to_the_sink() {
    let mut request = request("en", 5);
    request.transactions[4].amount = f64::NAN;

    let mut sink = Vec::new();
    assert!(test_renderer().render_to_writer(&request, &mut sink).is_err());
    assert!(sink.is_empty());
}

/// A destination that takes `remaining` bytes and then refuses writes.
struct ClosingPipe {
    received: Vec<u8>,
    remaining: usize,
}

impl std::io::Write for ClosingPipe {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.remaining == 0 {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "reader went away"));
        }
        let taken = buf.len().min(self.remaining);
        self.received.extend_from_slice(&buf[..taken]);
        self.remaining -= taken;
        Ok(taken)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_destination_closing_mid_copy_is_an_assembly_error() {
    let mut pipe = ClosingPipe {
        received: Vec::new(),
        remaining: 100,
    };
    let result = test_renderer().render_to_writer(&request("en", 5), &mut pipe);

    match result {
        Err(RenderError::Assembly { operation, source }) => {
            assert_eq!(operation, "copy_output");
            assert_eq!(source.kind(), std::io::ErrorKind::BrokenPipe);
        }
        other => panic!("expected an assembly error, got {:?}", other),
    }
    assert_eq!(pipe.received.len(), 100);
    assert!(pipe.received.starts_with(b"%PDF-1.7"));
}

#[test]
fn test_failure_ends_every_timer() {
    let renderer = test_renderer();
    let mut request = request("en", 40);
    request.transactions[25].amount = f64::NAN;

    assert!(renderer.render(&request).is_err());
    assert_eq!(renderer.monitor().in_flight_count(), 0);
}

#[test]
fn test_malformed_request_json() {
    let err = StatementRequest::from_json(r#"{"cardholder": {}}"#).map_err(RenderError::from);
    assert!(matches!(err, Err(RenderError::Json(_))));
}

#[test]
fn test_override_for_unknown_language_is_rejected() {
    let result = RendererBuilder::new()
        .with_language_overrides_json(r#"{"fr": {"labels": {}}}"#)
        .build();
    assert!(matches!(result, Err(RenderError::Config(_))));
}

#[test]
fn test_missing_override_file_is_rejected() {
    let result = RendererBuilder::new()
        .with_language_overrides("/no/such/overrides.json")
        .build();
    assert!(matches!(result, Err(RenderError::Config(_))));
}

#[test]
fn test_zero_batch_size_is_rejected() {
    assert!(matches!(
        RendererBuilder::new().with_batch_size(0).build(),
        Err(RenderError::Config(_))
    ));
}
