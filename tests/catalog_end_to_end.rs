//! End-to-end behaviour of a built catalog: linking, queries and facets.

use metacat::builder::builder::CatalogBuilder;
use metacat::core::catalog::Catalog;
use metacat::core::config::CatalogConfig;
use metacat::core::types::FieldValue;
use metacat::ingest::raw::RawRecord;
use metacat::query::ast::Condition;
use metacat::schema::schema::CatalogLayout;
use metacat::search::facets::FacetValue;
use serde_json::json;

fn ids(records: &[&metacat::core::types::Record]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

fn minimal_catalog() -> Catalog {
    let mut builder = CatalogBuilder::new(CatalogLayout::default(), CatalogConfig::default()).unwrap();
    builder
        .add_records("study", vec![RawRecord::new("S1")])
        .unwrap()
        .add_records("project", vec![RawRecord::new("P1").part_of("S1")])
        .unwrap()
        .add_records("sample", vec![RawRecord::new("B1").part_of("P1")])
        .unwrap();
    builder.build().unwrap()
}

fn habitat_catalog() -> Catalog {
    let samples = [
        ("B1", "soil", "P1", 5),
        ("B2", "soil", "P1", 15),
        ("B3", "water", "P2", 25),
        ("B4", "soil", "P2", 35),
        ("B5", "water", "P1", 45),
    ]
    .iter()
    .map(|(id, habitat, project, depth)| {
        RawRecord::new(*id)
            .part_of(project)
            .annotate("habitat", json!(habitat))
            .annotate("depth", json!(depth))
    })
    .collect::<Vec<_>>();

    let mut builder = CatalogBuilder::new(CatalogLayout::default(), CatalogConfig::default()).unwrap();
    builder
        .add_records("study", vec![RawRecord::new("S1").named("Soil study")])
        .unwrap()
        .add_records(
            "project",
            vec![RawRecord::new("P1").part_of("S1"), RawRecord::new("P2").part_of("S1")],
        )
        .unwrap()
        .add_records("sample", samples)
        .unwrap()
        .add_records(
            "data_object",
            vec![RawRecord::new("D1").part_of("P1"), RawRecord::new("D2").part_of("P3")],
        )
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn minimal_chain_is_linked_both_ways() {
    let catalog = minimal_catalog();

    let study = catalog.get("study", "S1").unwrap().unwrap();
    let project = catalog.get("project", "P1").unwrap().unwrap();
    assert_eq!(study.ids("project_id"), vec!["P1"]);
    assert_eq!(project.ids("sample_id"), vec!["B1"]);
    assert_eq!(study.ids("sample_id"), vec!["B1"]);

    let hits = catalog
        .query("sample", &[Condition::eq("project_id", "P1")])
        .unwrap();
    assert_eq!(ids(&hits), vec!["B1"]);
}

#[test]
fn grandchildren_inherit_the_grandparent_reference() {
    let catalog = habitat_catalog();
    for sample in catalog.collection("sample").unwrap().records() {
        let project_id = sample.text("project_id").unwrap();
        let project = catalog.get("project", project_id).unwrap().unwrap();
        assert_eq!(sample.text("study_id"), project.text("study_id"));
    }
    let study = catalog.get("study", "S1").unwrap().unwrap();
    assert_eq!(study.ids("sample_id"), vec!["B1", "B2", "B3", "B4", "B5"]);
    assert_eq!(study.ids("data_object_id"), vec!["D1"]);
}

#[test]
fn unresolved_parents_are_counted_not_fatal() {
    let catalog = habitat_catalog();
    let orphan = catalog.get("data_object", "D2").unwrap().unwrap();
    assert_eq!(orphan.text("study_id"), Some("None"));
    assert!(orphan.ids("sample_id").is_empty());
    assert_eq!(catalog.stats().total_unresolved(), 1);
}

#[test]
fn siblings_link_samples_and_data_objects() {
    let catalog = habitat_catalog();
    let d1 = catalog.get("data_object", "D1").unwrap().unwrap();
    assert_eq!(d1.ids("sample_id"), vec!["B1", "B2", "B5"]);
    let b3 = catalog.get("sample", "B3").unwrap().unwrap();
    assert!(b3.ids("data_object_id").is_empty());
}

#[test]
fn empty_conditions_return_everything_in_order() {
    let catalog = habitat_catalog();
    let all = catalog.query("sample", &[]).unwrap();
    assert_eq!(ids(&all), vec!["B1", "B2", "B3", "B4", "B5"]);
    assert_eq!(catalog.count("sample").unwrap(), 5);
}

#[test]
fn same_field_conditions_union() {
    let catalog = habitat_catalog();
    let soil = catalog.query("sample", &[Condition::eq("project_id", "P1")]).unwrap();
    let water = catalog.query("sample", &[Condition::eq("project_id", "P2")]).unwrap();
    let both = catalog
        .query(
            "sample",
            &[Condition::eq("project_id", "P1"), Condition::eq("project_id", "P2")],
        )
        .unwrap();
    assert_eq!(both.len(), soil.len() + water.len());
}

#[test]
fn different_field_conditions_intersect() {
    let catalog = habitat_catalog();
    let hits = catalog
        .query(
            "sample",
            &[Condition::eq("habitat", "soil"), Condition::ge("depth", 15.0)],
        )
        .unwrap();
    assert_eq!(ids(&hits), vec!["B2", "B4"]);
}

#[test]
fn queries_are_repeatable() {
    let catalog = habitat_catalog();
    let conditions = vec![Condition::lt("depth", 30.0), Condition::eq("habitat", "water")];
    let first = ids(&catalog.query("sample", &conditions).unwrap());
    let second = ids(&catalog.query("sample", &conditions).unwrap());
    assert_eq!(first, second);
    assert_eq!(first, vec!["B3"]);
}

#[test]
fn membership_queries_on_link_lists() {
    let catalog = habitat_catalog();
    let hits = catalog.query("project", &[Condition::eq("sample_id", "B4")]).unwrap();
    assert_eq!(ids(&hits), vec!["P2"]);
}

#[test]
fn habitat_facet_counts() {
    let catalog = habitat_catalog();
    let summary = catalog.facet_summary("sample", "habitat", &[]).unwrap();
    assert_eq!(
        summary,
        vec![
            FacetValue { value: FieldValue::text("soil"), all: 3, count: 3 },
            FacetValue { value: FieldValue::text("water"), all: 2, count: 2 },
        ]
    );
}

#[test]
fn selecting_a_facet_value_does_not_change_its_own_counts() {
    let catalog = habitat_catalog();
    let other = vec![Condition::eq("project_id", "P1")];
    let mut selected = other.clone();
    selected.push(Condition::eq("habitat", "soil"));

    let baseline = catalog.facet_summary("sample", "habitat", &other).unwrap();
    let with_selection = catalog.facet_summary("sample", "habitat", &selected).unwrap();
    assert_eq!(baseline, with_selection);
    assert_eq!(
        baseline.iter().map(|f| f.count).collect::<Vec<_>>(),
        vec![2, 1]
    );
}

#[test]
fn facet_all_sums_to_records_with_the_field() {
    let catalog = habitat_catalog();
    let summary = catalog.facet_summary("data_object", "project_id", &[]).unwrap();
    let total: usize = summary.iter().map(|f| f.all).sum();
    assert_eq!(total, 2);
    assert!(catalog.facet_summary("sample", "ph", &[]).unwrap().is_empty());
}

#[test]
fn cached_facets_match_uncached() {
    let catalog = habitat_catalog();
    let conditions = vec![Condition::eq("project_id", "P2")];
    let direct = catalog.facet_summary("sample", "habitat", &conditions).unwrap();
    let cached = catalog.cached_facet_summary("sample", "habitat", &conditions).unwrap();
    let again = catalog
        .cached_facet_summary(
            "sample",
            "habitat",
            &[Condition::eq("habitat", "water"), Condition::eq("project_id", "P2")],
        )
        .unwrap();
    assert_eq!(direct, cached);
    assert_eq!(direct, again);
    assert_eq!(catalog.cache_stats().hit_count, 1);
}

#[test]
fn cached_facets_tell_infinity_from_nan() {
    let catalog = habitat_catalog();
    for bound in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
        let conditions = [Condition::lt("depth", bound)];
        assert_eq!(
            catalog.cached_facet_summary("sample", "habitat", &conditions).unwrap(),
            catalog.facet_summary("sample", "habitat", &conditions).unwrap(),
            "depth < {}",
            bound
        );
    }
    assert_eq!(catalog.cache_stats().hit_count, 0);
}

#[test]
fn selecting_a_facet_value_returns_its_all_count() {
    let mut builder = CatalogBuilder::new(CatalogLayout::default(), CatalogConfig::default()).unwrap();
    builder
        .add_records(
            "sample",
            vec![
                RawRecord::new("B1").annotate("flag", json!(true)),
                RawRecord::new("B2").annotate("flag", json!("true")),
                RawRecord::new("B3").annotate("flag", json!(3)),
                RawRecord::new("B4").annotate("flag", json!("3.0")),
            ],
        )
        .unwrap();
    let catalog = builder.build().unwrap();

    let summary = catalog.facet_summary("sample", "flag", &[]).unwrap();
    assert_eq!(summary.len(), 3);
    for facet in summary {
        let selected = [Condition::eq("flag", facet.value.clone())];
        assert_eq!(catalog.query("sample", &selected).unwrap().len(), facet.all);
    }
}

#[test]
fn parallel_facets_match_sequential() {
    let catalog = habitat_catalog();
    let fields = ["habitat", "project_id", "depth"];
    let parallel = catalog.facet_summaries("sample", &fields, &[]).unwrap();
    for (field, summary) in fields.iter().zip(parallel) {
        assert_eq!(summary, catalog.facet_summary("sample", field, &[]).unwrap());
    }
}

#[test]
fn primitive_fields_exclude_link_lists() {
    let catalog = habitat_catalog();
    let fields = catalog.fields("sample").unwrap();
    let primitive = catalog.primitive_fields("sample").unwrap();
    assert!(fields.contains("data_object_id"));
    assert!(!primitive.contains("data_object_id"));
    for name in ["id", "habitat", "depth", "project_id", "study_id", "open_in_gold"] {
        assert!(primitive.contains(name), "missing {}", name);
    }
}

#[test]
fn types_keep_layout_order() {
    let catalog = habitat_catalog();
    let names: Vec<_> = catalog.types().iter().map(|t| t.as_str()).collect();
    assert_eq!(names, vec!["study", "project", "sample", "data_object"]);
}
