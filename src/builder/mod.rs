pub mod builder;
pub mod links;
pub mod enrich;
