/// Catalog browsing demo
///
/// Builds a small study/project/sample/data_object catalog and walks
/// through the read API:
/// - Type and field discovery
/// - Filtered queries (OR within a field, AND across fields)
/// - Facet summaries, parallel and cached
/// - Build statistics

use metacat::builder::builder::CatalogBuilder;
use metacat::core::config::CatalogConfig;
use metacat::ingest::raw::RawRecord;
use metacat::query::ast::Condition;
use metacat::schema::schema::CatalogLayout;
use serde_json::json;
use std::collections::HashMap;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   metacat - Catalog Browsing Demo             ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Build the catalog
    println!("Step 1: BUILD - Loading records...");
    let mut builder = CatalogBuilder::new(CatalogLayout::default(), CatalogConfig::default())?;
    builder
        .add_records("study", vec![
            RawRecord::new("Gs0110115").named("Wetland soil"),
            RawRecord::new("Gs0112340").named("Lake sediment"),
        ])?
        .add_records("project", vec![
            RawRecord::new("Gp0108335").part_of("Gs0110115"),
            RawRecord::new("Gp0108336").part_of("Gs0110115"),
            RawRecord::new("Gp0127621").part_of("Gs0112340"),
        ])?
        .add_records("sample", vec![
            sample("Gb0110115", "Gp0108335", "soil", 12.0),
            sample("Gb0110116", "Gp0108335", "soil", 30.0),
            sample("Gb0110117", "Gp0108336", "wetland", 5.0),
            sample("Gb0127621", "Gp0127621", "sediment", 250.0),
            sample("Gb0127622", "Gp0127621", "freshwater", 2.0),
        ])?
        .add_records("data_object", vec![
            RawRecord::new("7-4290").part_of("Gp0108335"),
            RawRecord::new("7-4291").part_of("Gp0127621"),
        ])?;

    let mut rows = HashMap::new();
    rows.insert("Gs0110115".to_string(), json!({
        "proposal_title": "Carbon cycling in wetland soils",
        "principal_investigator_name": "Grace Hopper",
    }));
    builder.supplement_json("study", rows)?;

    let catalog = builder.build()?;
    println!("  Loaded {} records\n", catalog.stats().total_records());

    // Step 2: Discovery
    println!("Step 2: DISCOVER - Types and fields...");
    for entity in catalog.types() {
        let fields: Vec<_> = catalog.primitive_fields(entity.as_str())?.into_iter().collect();
        println!("  {:<12} {:>3} records, facetable: {}", entity, catalog.count(entity.as_str())?, fields.join(", "));
    }
    println!();

    // Step 3: Queries
    println!("Step 3: QUERY - Filtering samples...");
    let soil_or_wetland = [
        Condition::eq("habitat", "soil"),
        Condition::eq("habitat", "wetland"),
    ];
    println!("  habitat = soil OR wetland: {} results", catalog.query("sample", &soil_or_wetland)?.len());

    let shallow_soil = [
        Condition::eq("habitat", "soil"),
        Condition::lt("depth", 20.0),
    ];
    println!("  habitat = soil AND depth < 20: {} results", catalog.query("sample", &shallow_soil)?.len());

    let has_sample = [Condition::eq("sample_id", "Gb0127621")];
    for project in catalog.query("project", &has_sample)? {
        println!("  project containing Gb0127621: {}", project.id);
    }

    let study = catalog.get("study", "Gs0110115")?;
    if let Some(study) = study {
        println!("  {}: {}", study.id, study.name().unwrap_or("-"));
        println!("    {}", study.description().unwrap_or("-"));
    }
    println!();

    // Step 4: Facets
    println!("Step 4: FACETS - Summaries under habitat = soil...");
    let conditions = [Condition::eq("habitat", "soil")];
    let fields = ["habitat", "project_id", "study_id"];
    let summaries = catalog.facet_summaries("sample", &fields, &conditions)?;
    for (field, summary) in fields.iter().zip(summaries) {
        println!("  {}:", field);
        for facet in summary {
            println!("    {:<12} all={} count={}", facet.value, facet.all, facet.count);
        }
    }

    catalog.cached_facet_summary("sample", "habitat", &conditions)?;
    catalog.cached_facet_summary("sample", "habitat", &conditions)?;
    let cache = catalog.cache_stats();
    println!("  cache hit rate: {:.0}%\n", cache.hit_rate() * 100.0);

    // Step 5: Statistics
    println!("Step 5: STATS - Build report...");
    let stats = catalog.stats();
    for link in &stats.links {
        println!("  {:<36} linked={} unresolved={}", link.step, link.linked, link.unresolved);
    }
    println!("  build time: {}ms", stats.build_ms);

    println!("\nDone!");
    Ok(())
}

fn sample(id: &str, project: &str, habitat: &str, depth: f64) -> RawRecord {
    RawRecord::new(id)
        .part_of(project)
        .annotate("habitat", json!(habitat))
        .annotate("depth", json!(depth))
        .annotate("collection_date", json!("15-JUN-16 12.00.00.000000000 AM"))
}
