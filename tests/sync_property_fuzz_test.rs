//! Property tests over randomly generated screen/print field sets.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use form_field_sync::FormDocument;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct FieldCase {
    initial: String,
    typed: String,
    has_target: bool,
}

fn field_cases() -> impl Strategy<Value = BTreeMap<String, FieldCase>> {
    prop::collection::btree_map(
        "[a-z]{1,8}",
        ("[a-z0-9]{0,10}", "[a-z0-9]{0,10}", any::<bool>()).prop_map(
            |(initial, typed, has_target)| FieldCase {
                initial,
                typed,
                has_target,
            },
        ),
        1..8,
    )
}

fn build_document(fields: &BTreeMap<String, FieldCase>) -> String {
    let mut html = String::from("<div id='screen'>\n");
    for (name, case) in fields {
        let _ = writeln!(
            html,
            "<input id='s-{name}' name='p_{name}' type='text' value='{}'>",
            case.initial
        );
    }
    // Underscore keeps this name out of the generated [a-z]+ namespace.
    html.push_str("<input id='un_synced' name='un_synced' type='text' value='stray'>\n");
    html.push_str("</div>\n<div id='print'>\n");
    for (name, case) in fields {
        if case.has_target {
            // Targets carry the same value attribute so the narrowed rule
            // built from the source's value attribute still finds them.
            let _ = writeln!(
                html,
                "<input id='t-{name}' name='{name}' type='text' value='{}'>",
                case.initial
            );
        }
    }
    html.push_str("<input id='t-un_synced' name='un_synced' type='text'>\n</div>\n");
    html
}

proptest! {
    #[test]
    fn every_prefixed_field_lands_in_its_target(fields in field_cases()) {
        let html = build_document(&fields);
        let mut doc = FormDocument::from_html(&html).unwrap();
        doc.set_warn_stderr(false);

        for (name, case) in &fields {
            doc.type_text(&format!("s-{name}"), &case.typed).unwrap();
        }

        doc.sync_fields("screen", "print", "p_").unwrap();

        for (name, case) in &fields {
            if case.has_target {
                prop_assert_eq!(doc.value(&format!("t-{name}")).unwrap(), case.typed.clone());
            }
        }
    }

    #[test]
    fn one_warning_per_source_field_without_a_target(fields in field_cases()) {
        let html = build_document(&fields);
        let mut doc = FormDocument::from_html(&html).unwrap();
        doc.set_warn_stderr(false);

        doc.sync_fields("screen", "print", "p_").unwrap();

        let unmatched = fields.values().filter(|case| !case.has_target).count();
        prop_assert_eq!(doc.take_warnings().len(), unmatched);
    }

    #[test]
    fn fields_without_the_prefix_stay_untouched(fields in field_cases()) {
        let html = build_document(&fields);
        let mut doc = FormDocument::from_html(&html).unwrap();
        doc.set_warn_stderr(false);

        doc.sync_fields("screen", "print", "p_").unwrap();
        prop_assert_eq!(doc.value("t-un_synced").unwrap(), "");
    }

    #[test]
    fn resync_after_no_edits_changes_nothing(fields in field_cases()) {
        let html = build_document(&fields);
        let mut doc = FormDocument::from_html(&html).unwrap();
        doc.set_warn_stderr(false);

        doc.sync_fields("screen", "print", "p_").unwrap();
        let first: Vec<_> = fields
            .iter()
            .filter(|(_, case)| case.has_target)
            .map(|(name, _)| doc.value(&format!("t-{name}")).unwrap())
            .collect();

        doc.sync_fields("screen", "print", "p_").unwrap();
        let second: Vec<_> = fields
            .iter()
            .filter(|(_, case)| case.has_target)
            .map(|(name, _)| doc.value(&format!("t-{name}")).unwrap())
            .collect();

        prop_assert_eq!(first, second);
    }
}
