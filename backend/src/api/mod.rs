mod schema;
mod song;

pub use schema::{build_schema, CatalogSchema, MutationRoot, QueryRoot, SharedStore};
