use super::*;
use crate::frontmatter::{decode, id_field};
use std::fs;
use tempfile::TempDir;

fn write_doc(dir: &Path, name: &str, raw: &str) {
    fs::write(dir.join(name), raw).expect("write doc");
}

fn read_doc(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).expect("read doc")
}

#[test]
fn duplicate_repair_is_deterministic() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "a.md", "---\nid: 5\ntitle: first\n---\n\none\n");
    write_doc(tmp.path(), "b.md", "---\nid: 5\ntitle: second\n---\n\ntwo\n");

    let applied = fix(tmp.path(), None).expect("fix");
    assert_eq!(applied.len(), 2);

    // Listing-order-first file keeps id 5; the second takes the smallest
    // unclaimed id.
    let five = decode(&read_doc(tmp.path(), "5.md"));
    assert_eq!(id_field(&five.meta), 5);
    assert!(five.body.contains("one"));

    let one = decode(&read_doc(tmp.path(), "1.md"));
    assert_eq!(id_field(&one.meta), 1);
    assert!(one.body.contains("two"));

    assert!(!tmp.path().join("a.md").exists());
    assert!(!tmp.path().join("b.md").exists());
}

#[test]
fn fixed_filename_colliding_with_another_broken_file_loses_nothing() {
    let tmp = TempDir::new().expect("tempdir");
    // 1.md keeps its id 5 and must move to 5.md, which is currently occupied
    // by the id-less ticket that will itself move to 1.md.
    write_doc(tmp.path(), "1.md", "---\nid: 5\ntitle: keep\n---\n\nfive-body\n");
    write_doc(tmp.path(), "5.md", "---\ntitle: stray\n---\n\nstray-body\n");

    let applied = fix(tmp.path(), None).expect("fix");
    assert_eq!(applied.len(), 2);

    let five = decode(&read_doc(tmp.path(), "5.md"));
    assert_eq!(id_field(&five.meta), 5);
    assert!(five.body.contains("five-body"));

    let one = decode(&read_doc(tmp.path(), "1.md"));
    assert_eq!(id_field(&one.meta), 1);
    assert!(one.body.contains("stray-body"));

    assert!(validate(tmp.path(), None).expect("revalidate").is_empty());
}

#[test]
fn missing_id_gets_assigned_and_renamed() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "x.md", "---\ntitle: stray\n---\n\nnotes\n");

    let applied = fix(tmp.path(), None).expect("fix");
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].fixed_id, 1);

    let repaired = decode(&read_doc(tmp.path(), "1.md"));
    assert_eq!(id_field(&repaired.meta), 1);
    assert!(!tmp.path().join("x.md").exists());
}

#[test]
fn prefix_mismatch_renames_without_changing_id() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "7.md", "---\nid: 7\ntitle: keep\n---\n\nbody\n");

    let applied = fix(tmp.path(), Some("PROJ")).expect("fix");
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].fixed_id, 7);
    assert_eq!(applied[0].fixed_slug, "PROJ-7");

    let repaired = decode(&read_doc(tmp.path(), "PROJ-7.md"));
    assert_eq!(id_field(&repaired.meta), 7);
    assert!(!tmp.path().join("7.md").exists());
}

#[test]
fn fix_is_idempotent() {
    let tmp = TempDir::new().expect("tempdir");
    write_doc(tmp.path(), "a.md", "---\nid: 2\n---\n\nbody\n");
    write_doc(tmp.path(), "b.md", "---\nid: 2\n---\n\nbody\n");

    let first = fix(tmp.path(), None).expect("fix");
    assert!(!first.is_empty());

    let second = fix(tmp.path(), None).expect("fix");
    assert!(second.is_empty());

    let third = validate(tmp.path(), None).expect("validate");
    assert!(third.is_empty());
}

#[test]
fn repair_preserves_body_of_undecodable_documents() {
    let tmp = TempDir::new().expect("tempdir");
    let broken = "---\nid: [unclosed\n---\n\nimportant notes\n";
    write_doc(tmp.path(), "bad.md", broken);

    let applied = fix(tmp.path(), None).expect("fix");
    assert_eq!(applied.len(), 1);

    let repaired = decode(&read_doc(tmp.path(), "1.md"));
    assert_eq!(id_field(&repaired.meta), 1);
    // The unparseable original text survives in the body.
    assert!(repaired.body.contains("important notes"));
    assert!(repaired.body.contains("id: [unclosed"));
}
