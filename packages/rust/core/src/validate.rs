//! Whole-build lexeme validation.
//!
//! Every record is checked and every violation collected before failing, so a
//! single run reports all problems across all documents.

use tracing::warn;

use docbuild_shared::{
    DOCS_LINK_PREFIX, LexemeContext, LexemeRecord, LexemeViolation, LexemeViolations,
    ViolationKind,
};

/// Check every record; `Err` carries all violations in record order.
pub fn validate(lexemes: &[LexemeRecord]) -> Result<(), LexemeViolations> {
    let violations = collect_violations(lexemes);
    if violations.is_empty() {
        return Ok(());
    }

    warn!(
        violations = violations.len(),
        lexemes = lexemes.len(),
        "lexeme validation failed"
    );
    Err(LexemeViolations(violations))
}

/// All violations, per record in check order: h1, link, context.
pub fn collect_violations(lexemes: &[LexemeRecord]) -> Vec<LexemeViolation> {
    let mut violations = Vec::new();

    for (index, lexeme) in lexemes.iter().enumerate() {
        if lexeme.h1_inner_text.as_deref().is_none_or(str::is_empty) {
            violations.push(LexemeViolation {
                index,
                kind: ViolationKind::MissingH1 {
                    link: lexeme.link.clone(),
                },
            });
        }

        if !lexeme.link.starts_with(DOCS_LINK_PREFIX) {
            violations.push(LexemeViolation {
                index,
                kind: ViolationKind::InvalidLink {
                    link: lexeme.link.clone(),
                },
            });
        }

        if lexeme.context.parse::<LexemeContext>().is_err() {
            violations.push(LexemeViolation {
                index,
                kind: ViolationKind::InvalidContext {
                    context: lexeme.context.clone(),
                },
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbuild_shared::HtmlElementType;

    fn valid() -> LexemeRecord {
        LexemeRecord {
            version: "1.x".into(),
            context: "framework".into(),
            link: "/docs/1.x/routing#params".into(),
            html_element_type: HtmlElementType::P,
            inner_text: "Route params".into(),
            h1_inner_text: Some("Routing".into()),
            h2_inner_text: Some("Params".into()),
            h3_inner_text: None,
            h4_inner_text: None,
            h5_inner_text: None,
        }
    }

    #[test]
    fn valid_records_pass() {
        assert!(validate(&[valid(), valid()]).is_ok());
        assert!(validate(&[]).is_ok());
    }

    #[test]
    fn reports_every_invalid_record() {
        let mut missing_h1 = valid();
        missing_h1.h1_inner_text = None;
        let mut bad_link = valid();
        bad_link.link = "/guide/routing".into();

        let err = validate(&[missing_h1, valid(), bad_link]).unwrap_err();
        let message = err.to_string();

        let lines: Vec<_> = message.lines().filter(|l| l.starts_with("Lexeme ")).collect();
        assert_eq!(lines.len(), 2, "{message}");
        assert!(message.starts_with("Lexeme validation failed:\n"));
        assert_eq!(lines[0], "Lexeme 0: Missing h1_inner_text (link: /docs/1.x/routing#params)");
        assert_eq!(lines[1], "Lexeme 2: Link must start with /docs/ (got: /guide/routing)");
    }

    #[test]
    fn one_record_can_fail_every_check_in_order() {
        let mut record = valid();
        record.h1_inner_text = Some(String::new());
        record.link = "docs/1.x/routing".into();
        record.context = "plugin".into();

        let violations = collect_violations(&[record]);
        assert_eq!(
            violations,
            vec![
                LexemeViolation {
                    index: 0,
                    kind: ViolationKind::MissingH1 { link: "docs/1.x/routing".into() },
                },
                LexemeViolation {
                    index: 0,
                    kind: ViolationKind::InvalidLink { link: "docs/1.x/routing".into() },
                },
                LexemeViolation {
                    index: 0,
                    kind: ViolationKind::InvalidContext { context: "plugin".into() },
                },
            ]
        );
    }

    #[test]
    fn context_check_is_case_sensitive() {
        let mut record = valid();
        record.context = "Global".into();
        let err = validate(&[record]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Lexeme validation failed:\n\
             Lexeme 0: Invalid context value (got: Global, expected one of: framework, library, global)"
        );
    }
}
