//! Compiled-state cache layout and lifecycle tests.

use assert_fs::prelude::*;
use dbtdiff_core::{
    cache::MANIFEST_FILE,
    types::{Variant, WorkflowIdentity},
    StateCache,
};
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case(WorkflowIdentity::reference("abc1234", Variant::default()), "target/main/default/abc1234")]
#[case(WorkflowIdentity::reference("abc1234", Variant::from("prod")), "target/main/prod/abc1234")]
#[case(WorkflowIdentity::local("deadbeef", Variant::default()), "target/local/default/deadbeef")]
#[case(WorkflowIdentity::local("deadbeef", Variant::from("dev")), "target/local/dev/deadbeef")]
fn path_layout_is_stable(#[case] identity: WorkflowIdentity, #[case] relative: &str) {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let cache = StateCache::new(project.path());
    assert_eq!(cache.path_for(&identity), project.path().join(relative));
}

#[test]
fn directory_without_manifest_is_not_a_hit() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let cache = StateCache::new(project.path());
    let path = cache.path_for(&WorkflowIdentity::reference("abc1234", Variant::default()));

    cache.ensure_directory(&path).expect("ensure");
    assert!(path.is_dir());
    assert!(!cache.exists(&path), "empty dir must not count as cached");

    std::fs::write(path.join("run_results.json"), "{}").expect("write");
    assert!(!cache.exists(&path), "only manifest.json marks validity");

    std::fs::write(path.join(MANIFEST_FILE), "{}").expect("write");
    assert!(cache.exists(&path));
}

#[test]
fn ensure_directory_is_idempotent() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let cache = StateCache::new(project.path());
    let path = cache.path_for(&WorkflowIdentity::local("cafebabe", Variant::default()));

    cache.ensure_directory(&path).expect("first");
    std::fs::write(path.join(MANIFEST_FILE), "{}").expect("write");
    cache.ensure_directory(&path).expect("second");

    project
        .child("target/local/default/cafebabe/manifest.json")
        .assert(predicate::path::exists());
}

#[test]
fn discard_partial_removes_directory_tree() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let cache = StateCache::new(project.path());
    let path = cache.path_for(&WorkflowIdentity::reference("abc1234", Variant::default()));

    cache.ensure_directory(&path.join("compiled")).expect("ensure");
    std::fs::write(path.join("compiled").join("orders.sql"), "select 1").expect("write");

    cache.discard_partial(&path).expect("discard");
    project
        .child("target/main/default/abc1234")
        .assert(predicate::path::missing());
    project
        .child("target/main/default")
        .assert(predicate::path::is_dir());
}

#[test]
fn discard_partial_on_missing_path_is_noop() {
    let project = assert_fs::TempDir::new().expect("tempdir");
    let cache = StateCache::new(project.path());
    let path = cache.path_for(&WorkflowIdentity::local("nothing", Variant::default()));
    cache.discard_partial(&path).expect("noop");
}
