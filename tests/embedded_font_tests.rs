mod common;

use common::fixtures::*;
use common::pdf_assertions::extract_font_subtypes;
use common::{TestResult, render_pdf};
use statement_render::fonts::LANGUAGE_FAMILIES;
use statement_render::{FontRegistry, RendererBuilder, StatementRenderer};
use std::sync::Arc;

/// Regular and bold DejaVu Sans from the system, registered under every
/// statement family name. `None` when the machine has no DejaVu Sans.
fn dejavu_database() -> Option<fontdb::Database> {
    let mut system = fontdb::Database::new();
    system.load_system_fonts();
    let faces: Vec<fontdb::FaceInfo> = system
        .faces()
        .filter(|face| face.families.first().is_some_and(|(name, _)| name == "DejaVu Sans"))
        .filter(|face| face.style == fontdb::Style::Normal && face.stretch == fontdb::Stretch::Normal)
        .filter(|face| face.weight == fontdb::Weight::NORMAL || face.weight == fontdb::Weight::BOLD)
        .cloned()
        .collect();
    if faces.is_empty() {
        return None;
    }

    let mut db = fontdb::Database::new();
    for (_, family) in LANGUAGE_FAMILIES {
        for face in &faces {
            let mut renamed = face.clone();
            renamed.families = vec![(family.to_string(), fontdb::Language::English_UnitedStates)];
            db.push_face_info(renamed);
        }
    }
    Some(db)
}

fn embedded_renderer() -> Option<StatementRenderer> {
    let Some(db) = dejavu_database() else {
        eprintln!("DejaVu Sans is not installed; skipping embedded font test.");
        return None;
    };
    let registry = FontRegistry::from_database(&db);
    RendererBuilder::new()
        .with_font_registry(Arc::new(registry))
        .with_deterministic(true)
        .build()
        .ok()
}

#[test]
fn test_embedded_faces_replace_builtin_fonts() -> TestResult {
    let Some(renderer) = embedded_renderer() else {
        return Ok(());
    };
    assert!(renderer.registry().degradations().is_empty());
    assert!(renderer.registry().faces().count() >= LANGUAGE_FAMILIES.len());

    let pdf = render_pdf(&renderer, &request("en", 8))?;
    assert!(pdf.report.degradations.is_empty());
    let subtypes = extract_font_subtypes(&pdf.doc);
    assert!(subtypes.iter().any(|s| s == "Type0"), "{:?}", subtypes);
    assert!(subtypes.iter().any(|s| s == "CIDFontType2"), "{:?}", subtypes);
    assert!(!subtypes.iter().any(|s| s == "Type1"), "{:?}", subtypes);
    assert_pdf_has_font!(pdf, "DejaVuSans");
    Ok(())
}

#[test]
fn test_embedded_text_is_extractable() -> TestResult {
    let Some(renderer) = embedded_renderer() else {
        return Ok(());
    };
    let pdf = render_pdf(&renderer, &request("en", 3))?;

    assert_pdf_contains_text!(pdf, "Jane Roe");
    assert_pdf_contains_text!(pdf, "Credit Card Statement");
    // The rupee sign is outside WinAnsi and only survives through an embedded face.
    assert_pdf_contains_text!(pdf, "₹ 13,840.00");
    assert_pdf_contains_text!(pdf, "Page 1 of 1");
    Ok(())
}

#[test]
fn test_shaped_languages_keep_every_row_with_embedded_faces() -> TestResult {
    let Some(renderer) = embedded_renderer() else {
        return Ok(());
    };
    for language in ["ta", "hi"] {
        let laid_out = renderer.layout(&request(language, 45))?;
        assert_eq!(laid_out.summary().transaction_rows, 45, "language {}", language);
        assert!(laid_out.degradations.is_empty(), "language {}", language);

        let pdf = render_pdf(&renderer, &request(language, 45))?;
        assert_eq!(pdf.page_count(), pdf.report.page_count);
        assert!(extract_font_subtypes(&pdf.doc).iter().any(|s| s == "Type0"));
        assert_pdf_contains_text!(pdf, "Jane Roe");
    }
    Ok(())
}
