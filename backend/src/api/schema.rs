use std::sync::{Arc, Mutex};

use async_graphql::{Context, EmptySubscription, Object, Result, Schema, ID};

use catalog_core::store::CatalogStore;

use super::song::SongObject;

/// Store handle shared with the transport layer. The store itself is not
/// concurrency-aware, so every resolver goes through this lock.
pub type SharedStore = Arc<Mutex<CatalogStore>>;

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(store: SharedStore) -> CatalogSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All songs in insertion order.
    async fn songs(&self, ctx: &Context<'_>) -> Result<Option<Vec<Option<SongObject>>>> {
        let store = ctx.data::<SharedStore>()?.lock().unwrap();
        Ok(Some(
            store
                .list()
                .iter()
                .cloned()
                .map(|s| Some(SongObject::from(s)))
                .collect(),
        ))
    }

    /// Single song by id. Unknown ids resolve to null, not an error.
    async fn song(&self, ctx: &Context<'_>, id: ID) -> Result<Option<SongObject>> {
        let store = ctx.data::<SharedStore>()?.lock().unwrap();
        Ok(store.get_by_id(id.as_str()).cloned().map(SongObject::from))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Appends a song and returns it with the assigned id. Argument
    /// validation happens before this runs; a rejected request never
    /// touches the store.
    async fn add_song(
        &self,
        ctx: &Context<'_>,
        title: String,
        artist: String,
        year: i32,
        cover_image: Option<String>,
    ) -> Result<Option<SongObject>> {
        let mut store = ctx.data::<SharedStore>()?.lock().unwrap();
        let song = store.append(title, artist, year, cover_image).clone();
        Ok(Some(SongObject::from(song)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_schema() -> (CatalogSchema, SharedStore) {
        let store: SharedStore = Arc::new(Mutex::new(CatalogStore::seeded()));
        (build_schema(store.clone()), store)
    }

    #[tokio::test]
    async fn test_songs_query_lists_seeded_in_order() {
        let (schema, _) = seeded_schema();
        let rsp = schema.execute("{ songs { id title artist year } }").await;
        assert!(rsp.errors.is_empty(), "{:?}", rsp.errors);

        let data = rsp.data.into_json().unwrap();
        let songs = data["songs"].as_array().unwrap();
        assert_eq!(songs.len(), 3);
        assert_eq!(songs[0]["title"], "Bohemian Rhapsody");
        assert_eq!(songs[1]["title"], "Imagine");
        assert_eq!(songs[2]["title"], "Hotel California");
        assert_eq!(songs[2]["id"], "3");
    }

    #[tokio::test]
    async fn test_song_by_id() {
        let (schema, _) = seeded_schema();
        let rsp = schema
            .execute(r#"{ song(id: "2") { title artist year coverImage } }"#)
            .await;
        assert!(rsp.errors.is_empty());

        let data = rsp.data.into_json().unwrap();
        assert_eq!(data["song"]["title"], "Imagine");
        assert_eq!(data["song"]["artist"], "John Lennon");
        assert_eq!(data["song"]["year"], 1971);
        assert_eq!(
            data["song"]["coverImage"],
            "https://upload.wikimedia.org/wikipedia/en/6/69/ImagineCover.jpg"
        );
    }

    #[tokio::test]
    async fn test_song_unknown_id_is_null_not_error() {
        let (schema, _) = seeded_schema();
        let rsp = schema.execute(r#"{ song(id: "99") { title } }"#).await;
        assert!(rsp.errors.is_empty());

        let data = rsp.data.into_json().unwrap();
        assert_eq!(data["song"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_add_song_returns_next_id() {
        let (schema, store) = seeded_schema();
        let rsp = schema
            .execute(
                r#"mutation {
                    addSong(title: "Yesterday", artist: "The Beatles", year: 1965) {
                        id title coverImage
                    }
                }"#,
            )
            .await;
        assert!(rsp.errors.is_empty(), "{:?}", rsp.errors);

        let data = rsp.data.into_json().unwrap();
        assert_eq!(data["addSong"]["id"], "4");
        assert_eq!(data["addSong"]["title"], "Yesterday");
        assert_eq!(data["addSong"]["coverImage"], serde_json::Value::Null);

        let store = store.lock().unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.list().last().unwrap().title, "Yesterday");
    }

    #[tokio::test]
    async fn test_add_song_missing_required_is_rejected() {
        let (schema, store) = seeded_schema();
        let rsp = schema
            .execute(r#"mutation { addSong(title: "No Artist", year: 2000) { id } }"#)
            .await;
        assert!(!rsp.errors.is_empty());
        assert_eq!(store.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_add_song_mistyped_argument_is_rejected() {
        let (schema, store) = seeded_schema();
        let rsp = schema
            .execute(
                r#"mutation { addSong(title: "Bad Year", artist: "Nobody", year: "nineteen") { id } }"#,
            )
            .await;
        assert!(!rsp.errors.is_empty());
        assert_eq!(store.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_add_song_with_variables_wire_format() {
        // Same request shape the browser client posts.
        let (schema, _) = seeded_schema();
        let req: async_graphql::Request = serde_json::from_value(serde_json::json!({
            "query": "mutation AddSong($title: String!, $artist: String!, $year: Int!, $coverImage: String) { addSong(title: $title, artist: $artist, year: $year, coverImage: $coverImage) { id coverImage } }",
            "variables": {
                "title": "Yesterday",
                "artist": "The Beatles",
                "year": 1965
            }
        }))
        .unwrap();
        let rsp = schema.execute(req).await;
        assert!(rsp.errors.is_empty(), "{:?}", rsp.errors);

        let data = rsp.data.into_json().unwrap();
        assert_eq!(data["addSong"]["id"], "4");
        assert_eq!(data["addSong"]["coverImage"], serde_json::Value::Null);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_add_song_ids_stay_unique() {
        let (schema, store) = seeded_schema();
        let mut handles = Vec::new();
        for i in 0..16 {
            let schema = schema.clone();
            handles.push(tokio::spawn(async move {
                let rsp = schema
                    .execute(format!(
                        r#"mutation {{ addSong(title: "t{}", artist: "a", year: 2000) {{ id }} }}"#,
                        i
                    ))
                    .await;
                assert!(rsp.errors.is_empty(), "{:?}", rsp.errors);
                rsp.data.into_json().unwrap()["addSong"]["id"]
                    .as_str()
                    .unwrap()
                    .to_string()
            }));
        }

        let mut ids = std::collections::HashSet::new();
        for h in handles {
            ids.insert(h.await.unwrap());
        }
        assert_eq!(ids.len(), 16);
        assert_eq!(store.lock().unwrap().len(), 3 + 16);
    }

    #[tokio::test]
    async fn test_sdl_nullability() {
        let (schema, _) = seeded_schema();
        let sdl = schema.sdl();
        assert!(sdl.contains("songs: [Song]"));
        assert!(sdl.contains("song(id: ID!): Song"));
        assert!(sdl.contains(
            "addSong(title: String!, artist: String!, year: Int!, coverImage: String): Song"
        ));
        assert!(sdl.contains("coverImage: String\n"));
        assert!(sdl.contains("year: Int!"));
    }
}
