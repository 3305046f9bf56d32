use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(DiagnosticKind::UnboundRelation).emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.codes(), vec![304]);
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnsupportedIndex)
        .message("title")
        .emit();

    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.code(), 105);
    assert_eq!(diag.message(), "SRU diagnostic 16: Index title is not supported.");
}

#[test]
fn whole_sentence_templates() {
    assert_eq!(
        DiagnosticKind::UnknownQueryElement.message(Some("Unknown operator '=='.")),
        "Unknown operator '=='."
    );
    assert_eq!(
        DiagnosticKind::EmptyQuery.message(Some("term")),
        "SRU diagnostic 27: An empty term is unsupported."
    );
    assert_eq!(
        DiagnosticKind::MalformedQuery.message(Some("unbalanced `(`.")),
        "The query could not be parsed: unbalanced `(`."
    );
}

#[test]
fn unsupported_elements_outside_sru() {
    let sru = DiagnosticKind::UnsupportedQueryElement;
    let plain = DiagnosticKind::UnsupportedFeature;
    assert_eq!(sru.code(), plain.code());
    assert_eq!(
        sru.message(Some("Layer morph is unsupported.")),
        "SRU diagnostic 48: Layer morph is unsupported."
    );
    assert_eq!(
        plain.message(Some("Meta constraints are unsupported.")),
        "Meta constraints are unsupported."
    );
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(DiagnosticKind::DateLikeString).emit();

    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn partition_keeps_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(DiagnosticKind::DateLikeString).emit();
    diagnostics.report(DiagnosticKind::MissingVersion).emit();
    diagnostics.report(DiagnosticKind::UnsupportedVersion).message("2.0").emit();

    let (errors, warnings) = diagnostics.partition();
    assert_eq!(errors.codes(), vec![309, 309]);
    assert_eq!(warnings.codes(), vec![312]);
}

#[test]
fn extend_appends() {
    let mut first = Diagnostics::new();
    first.report(DiagnosticKind::EmptyQuery).emit();
    let mut second = Diagnostics::new();
    second.report(DiagnosticKind::UndefinedVariable).message("#3").emit();

    first.extend(second);
    assert_eq!(first.codes(), vec![301, 310]);
    assert!(first.contains(DiagnosticKind::UndefinedVariable));
}

#[test]
fn printer_plain() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnsupportedQueryElement)
        .message("Qualifier malt is unsupported.")
        .emit();
    diagnostics.report(DiagnosticKind::DateLikeString).emit();

    insta::assert_snapshot!(diagnostics.render(), @r"
    error[306]: SRU diagnostic 48: Qualifier malt is unsupported.
    warning[312]: The collection query contains a value that looks like a date and an operator that is only defined for strings.
    ");
}

#[test]
fn printer_with_query() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(DiagnosticKind::MissingVersion).emit();

    let out = diagnostics.printer().language("fcsql").query("[text=\"Mann\"]").render();
    insta::assert_snapshot!(out, @r#"
    error[309]: SRU diagnostic 7: Version number is missing.
      --> fcsql: [text="Mann"]
    "#);
}
