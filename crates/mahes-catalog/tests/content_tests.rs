//! Integration tests for catalog loading from disk and the reference content.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeSet;
use std::io::Write as _;

use mahes_catalog::{Catalog, CatalogError};
use mahes_types::{ItemEffect, Region};

#[test]
fn reference_ids_are_unique_and_ordered_by_region() {
    let catalog = Catalog::reference().expect("reference catalog");
    let ids: BTreeSet<_> = catalog.questions().iter().map(|q| q.id.clone()).collect();
    assert_eq!(ids.len(), catalog.len());

    // Regions appear in progression order in the content file.
    let regions: Vec<Region> = catalog.questions().iter().map(|q| q.region).collect();
    let mut sorted = regions.clone();
    sorted.sort();
    assert_eq!(regions, sorted);
}

#[test]
fn reference_questions_all_have_hints_and_a_correct_option() {
    let catalog = Catalog::reference().expect("reference catalog");
    for question in catalog.questions() {
        assert!(!question.hints.is_empty(), "{} has no hints", question.id);
        assert!(
            question.options.iter().any(|o| o.is_correct),
            "{} has no correct option",
            question.id
        );
    }
}

#[test]
fn reference_content_awards_special_items() {
    let catalog = Catalog::reference().expect("reference catalog");
    let specials: Vec<String> = catalog
        .questions()
        .iter()
        .flat_map(|q| q.options.iter())
        .filter_map(|o| match &o.effect.item {
            ItemEffect::Special(name) => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert!(specials.contains(&String::from("lighthouse_key")));
}

#[test]
fn from_file_loads_custom_content() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r"
regions:
  - region: pulau_awan
    title: Cloud Island
    description: Custom
questions:
  - id: c1
    region: pulau_awan
    type: trivia
    title: C1
    question: One?
    options:
      - {{ id: a, text: A, effect: {{ score: 1, karma: 1 }} }}
  - id: c2
    region: hutan_biru
    type: trivia
    title: C2
    question: Two?
    options:
      - {{ id: a, text: A, effect: {{ score: 1, karma: 1 }} }}
  - id: c3
    region: kota_tepi_laut
    type: trivia
    title: C3
    question: Three?
    time_limit: 15
    options:
      - {{ id: a, text: A, effect: {{ score: 1, karma: 1 }} }}
"
    )
    .expect("write content");

    let catalog = Catalog::from_file(file.path()).expect("custom catalog");
    assert_eq!(catalog.len(), 3);
    assert_eq!(
        catalog.region_info(Region::PulauAwan).expect("info").title,
        "Cloud Island"
    );
    let q3 = &catalog.questions()[2];
    assert_eq!(q3.time_limit_secs, 15);
    assert_eq!(catalog.questions()[0].time_limit_secs, 60);
}

#[test]
fn from_file_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = Catalog::from_file(&dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(CatalogError::Io { .. })));
}
