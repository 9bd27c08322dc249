//! End-to-end scenario over a realistic membership form: fill the screen
//! side, synchronize, and check the print preview rendering.

use form_field_sync::{Error, FormDocument, Result};

const MEMBERSHIP_FORM: &str = r#"
<!DOCTYPE html>
<html>
<head>
  <title>Membership application</title>
  <style>.print-only { display: none; }</style>
</head>
<body>
  <form id="application">
    <fieldset>
      <legend>Applicant</legend>
      <p>Full name
      <p><input id="name" name="p_name" type="text" value="">
      <p>Membership tier
      <p>
        <input id="tier-basic" name="p_tier" type="radio" value="basic" checked> Basic
        <input id="tier-gold" name="p_tier" type="radio" value="gold"> Gold
      <p>
        <input id="newsletter" name="p_newsletter" type="checkbox"> Monthly newsletter
      <p>Branch
      <p>
        <select id="branch" name="p_branch">
          <option value="north">North office</option>
          <option value="south" selected>South office</option>
        </select>
      <p>Remarks
      <p><textarea id="remarks" name="p_remarks"></textarea>
    </fieldset>
  </form>

  <div id="print-preview" class="print-only">
    <input id="pr-name" name="name" type="text">
    <input id="pr-tier-basic" name="tier" type="radio" value="basic">
    <input id="pr-tier-gold" name="tier" type="radio" value="gold">
    <input id="pr-newsletter" name="newsletter" type="checkbox">
    <input id="pr-branch" name="branch" type="text">
    <textarea id="pr-remarks" name="remarks"></textarea>
  </div>
</body>
</html>
"#;

#[test]
fn filled_form_is_mirrored_into_the_print_preview() -> Result<()> {
    let mut doc = FormDocument::from_html(MEMBERSHIP_FORM)?;

    doc.type_text("name", "Ada Lovelace")?;
    doc.set_checked("tier-gold", true)?;
    doc.set_checked("newsletter", true)?;
    doc.select_option("branch", "north")?;
    doc.type_text("remarks", "prefers email contact")?;

    doc.sync_fields("application", "print-preview", "p_")?;

    doc.assert_value("pr-name", "Ada Lovelace")?;
    doc.assert_checked("pr-tier-basic", false)?;
    doc.assert_checked("pr-tier-gold", true)?;
    doc.assert_checked("pr-newsletter", true)?;
    doc.assert_value("pr-branch", "north")?;
    doc.assert_value("pr-remarks", "prefers email contact")?;
    assert!(doc.take_warnings().is_empty());
    Ok(())
}

#[test]
fn defaults_are_mirrored_without_any_interaction() -> Result<()> {
    let mut doc = FormDocument::from_html(MEMBERSHIP_FORM)?;

    doc.sync_fields("application", "print-preview", "p_")?;

    doc.assert_value("pr-name", "")?;
    doc.assert_checked("pr-tier-basic", true)?;
    doc.assert_checked("pr-tier-gold", false)?;
    doc.assert_checked("pr-newsletter", false)?;
    doc.assert_value("pr-branch", "south")?;
    doc.assert_value("pr-remarks", "")?;
    Ok(())
}

#[test]
fn corrections_on_screen_overwrite_the_preview_on_resync() -> Result<()> {
    let mut doc = FormDocument::from_html(MEMBERSHIP_FORM)?;

    doc.type_text("name", "Ada Lovelac")?;
    doc.sync_fields("application", "print-preview", "p_")?;
    doc.assert_value("pr-name", "Ada Lovelac")?;

    doc.type_text("name", "Ada Lovelace")?;
    doc.set_checked("tier-gold", true)?;
    doc.sync_fields("application", "print-preview", "p_")?;

    doc.assert_value("pr-name", "Ada Lovelace")?;
    doc.assert_checked("pr-tier-basic", false)?;
    doc.assert_checked("pr-tier-gold", true)?;
    Ok(())
}

#[test]
fn preview_with_a_missing_field_warns_but_keeps_going() -> Result<()> {
    let html = r#"
        <form id="application">
          <input id="name" name="p_name" type="text" value="">
          <input id="phone" name="p_phone" type="text" value="">
        </form>
        <div id="print-preview">
          <input id="pr-phone" name="phone" type="text">
        </div>
        "#;

    let mut doc = FormDocument::from_html(html)?;
    doc.set_warn_stderr(false);
    doc.type_text("name", "Grace")?;
    doc.type_text("phone", "555-0100")?;
    doc.sync_fields("application", "print-preview", "p_")?;

    doc.assert_value("pr-phone", "555-0100")?;
    let warnings = doc.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("input[type=text][name=name]"));
    Ok(())
}

#[test]
fn preview_container_must_exist() -> Result<()> {
    let mut doc = FormDocument::from_html(MEMBERSHIP_FORM)?;
    let result = doc.sync_fields("application", "no-such-preview", "p_");
    assert_eq!(
        result,
        Err(Error::ContainerNotFound("no-such-preview".into()))
    );
    Ok(())
}
