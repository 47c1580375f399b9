use super::*;
use std::fs;
use tempfile::TempDir;

fn write_doc(dir: &Path, name: &str, raw: &str) {
    fs::write(dir.join(name), raw).expect("write doc");
}

fn ticket_raw(id: u64) -> String {
    format!("---\nid: {id}\ntitle: t\n---\n\nbody\n")
}

#[test]
fn well_formed_directory_yields_no_issues() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "1.md", &ticket_raw(1));
    write_doc(tmp.path(), "2.md", &ticket_raw(2));

    let issues = validate(tmp.path(), None).expect("validate");
    assert!(issues.is_empty());
}

#[test]
fn duplicates_flag_every_holder_and_first_keeps_its_id() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "a.md", &ticket_raw(5));
    write_doc(tmp.path(), "b.md", &ticket_raw(5));

    let issues = validate(tmp.path(), None).expect("validate");
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].file, "a.md");
    assert_eq!(issues[0].fixed_id, 5);
    assert_eq!(issues[0].fixed_slug, "5");
    assert_eq!(issues[1].file, "b.md");
    assert_eq!(issues[1].fixed_id, 1);
    assert_eq!(issues[1].fixed_slug, "1");
}

#[test]
fn missing_id_takes_smallest_unclaimed() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "1.md", &ticket_raw(1));
    write_doc(tmp.path(), "x.md", "---\ntitle: no id\n---\n\nbody\n");

    let issues = validate(tmp.path(), None).expect("validate");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].file, "x.md");
    assert_eq!(issues[0].current_id, 0);
    assert_eq!(issues[0].fixed_id, 2);
    assert_eq!(issues[0].fixed_slug, "2");
}

#[test]
fn prefix_mismatch_keeps_a_legitimate_id() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "7.md", &ticket_raw(7));

    let issues = validate(tmp.path(), Some("PROJ")).expect("validate");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].current_slug, "7");
    assert_eq!(issues[0].fixed_id, 7);
    assert_eq!(issues[0].fixed_slug, "PROJ-7");
}

#[test]
fn assignment_skips_ids_reserved_by_good_tickets() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "1.md", &ticket_raw(1));
    write_doc(tmp.path(), "3.md", &ticket_raw(3));
    write_doc(tmp.path(), "a.md", "---\ntitle: first\n---\n\n");
    write_doc(tmp.path(), "b.md", "---\ntitle: second\n---\n\n");

    let issues = validate(tmp.path(), None).expect("validate");
    assert_eq!(issues.len(), 2);
    // 1 and 3 are reserved; the two missing-id tickets get 2 and 4.
    assert_eq!(issues[0].file, "a.md");
    assert_eq!(issues[0].fixed_id, 2);
    assert_eq!(issues[1].file, "b.md");
    assert_eq!(issues[1].fixed_id, 4);
}

#[test]
fn malformed_yaml_reads_as_missing_id() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "bad.md", "---\nid: [unclosed\n---\n\nbody\n");

    let issues = validate(tmp.path(), None).expect("validate");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].current_id, 0);
    assert_eq!(issues[0].fixed_id, 1);
}

#[test]
fn non_numeric_id_is_reported_missing() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "odd.md", "---\nid: soon\n---\n\nbody\n");

    let issues = validate(tmp.path(), None).expect("validate");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].current_id, 0);
    assert_eq!(issues[0].fixed_id, 1);
    assert_eq!(issues[0].current_slug, "odd");
}
