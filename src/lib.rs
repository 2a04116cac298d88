pub mod core;
pub mod schema;
pub mod ingest;
pub mod builder;
pub mod query;
pub mod search;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                          METACAT STRUCT ARCHITECTURE                          │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── INGEST LAYER ────────────────────────────────┐
│                                                                              │
│  ┌──────────────────────┐  ┌────────────────────┐  ┌──────────────────────┐  │
│  │ struct RawRecord     │  │ struct Annotation  │  │ fn load_dir          │  │
│  │ • id: String         │  │ • has_characteristic│ │ • <type>.json        │  │
│  │ • name, description  │  │ • has_raw_value    │  │ • <type>_annotations │  │
│  │ • part_of: Vec       │  └────────────────────┘  │ • <type>_additional  │  │
│  │ • annotations: Vec   │                          └──────────────────────┘  │
│  └──────────────────────┘  fn normalize: RawRecord → Record (dates → millis)  │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── BUILDER LAYER ────────────────────────────────┐
│                                                                              │
│  ┌────────────────────────────────────────────────────────────────────────┐  │
│  │ struct CatalogBuilder                                                   │  │
│  │ • layout: CatalogLayout   // entity graph + link steps                  │  │
│  │ • config: CatalogConfig                                                  │  │
│  │ • staged: HashMap<EntityType, Vec<Record>>                               │  │
│  │ • supplements: Vec<(EntityType, SupplementRows)>                         │  │
│  │                                                                          │  │
│  │ build(): index → Link::Children → Link::Transitive → Link::Siblings      │  │
│  │          → link template → supplements → Catalog                          │  │
│  └────────────────────────────────────────────────────────────────────────┘  │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── CORE LAYER ──────────────────────────────────┐
│                                                                              │
│  ┌────────────────────────────┐  ┌──────────────────┐  ┌──────────────────┐  │
│  │ struct Catalog (read-only) │  │ struct Collection│  │ struct Record    │  │
│  │ • collections: HashMap     │  │ • records: Vec   │  │ • id: String     │  │
│  │ • types: Vec<EntityType>   │  │ • by_id: HashMap │  │ • fields:        │  │
│  │ • stats: CatalogStats      │  └──────────────────┘  │   BTreeMap<String│  │
│  │ • cache: FacetCache        │                        │   , FieldValue>  │  │
│  └────────────────────────────┘  ┌──────────────────┐  └──────────────────┘  │
│                                  │ enum FieldValue  │                        │
│                                  │ • Boolean • Number • Text • List • Object │
│                                  └──────────────────┘                        │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── QUERY / SEARCH ───────────────────────────────┐
│                                                                              │
│  ┌─────────────────────┐  ┌──────────────────────┐  ┌─────────────────────┐  │
│  │ struct Condition    │  │ struct RecordMatcher │  │ fn facet_summary    │  │
│  │ • field: String     │  │ • groups by field:   │  │ → Vec<FacetValue>   │  │
│  │ • op: Operator      │  │   AND across fields, │  │   { value, all,     │  │
│  │ • value: FieldValue │  │   OR within a field  │  │     count }         │  │
│  └─────────────────────┘  └──────────────────────┘  └─────────────────────┘  │
│                                                                              │
│  ┌─────────────────────────────────┐  fn facet_summaries: rayon fan-out      │
│  │ struct FacetCache (lru, Mutex)  │                                         │
│  └─────────────────────────────────┘                                         │
└──────────────────────────────────────────────────────────────────────────────┘
*/
