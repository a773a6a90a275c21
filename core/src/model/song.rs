use serde::{Deserialize, Serialize};

/// One catalog entry. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub cover_image: Option<String>,
}
