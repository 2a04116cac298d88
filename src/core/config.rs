#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// chrono formats tried in order for `*date*` annotations
    pub date_formats: Vec<String>,

    // Derived external link
    pub link_field: String,
    pub link_template: Option<String>,  // `{type}` and `{id}` are substituted

    pub reject_duplicate_ids: bool,

    // Supplementary dataset keys
    pub supplement_title_key: String,         // overrides `name`
    pub supplement_investigator_key: String,  // composed into `description`

    pub facet_cache_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            date_formats: vec![
                "%d-%b-%y %I.%M.%S%.f %p".to_string(),   // 15-JUN-16 12.00.00.000000000 AM
                "%Y-%m-%dT%H:%M:%S%.fZ".to_string(),
                "%Y-%m-%d".to_string(),
            ],
            link_field: "open_in_gold".to_string(),
            link_template: Some("https://gold.jgi.doe.gov/{type}?id={id}".to_string()),
            reject_duplicate_ids: true,
            supplement_title_key: "proposal_title".to_string(),
            supplement_investigator_key: "principal_investigator_name".to_string(),
            facet_cache_capacity: 256,
        }
    }
}
