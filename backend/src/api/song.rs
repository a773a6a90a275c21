use async_graphql::{Object, ID};

use catalog_core::model::Song;

/// GraphQL view over the core record. Output nullability mirrors the
/// contract: everything required except `coverImage`.
pub struct SongObject(Song);

impl From<Song> for SongObject {
    fn from(song: Song) -> Self {
        Self(song)
    }
}

#[Object(name = "Song")]
impl SongObject {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn artist(&self) -> &str {
        &self.0.artist
    }

    async fn year(&self) -> i32 {
        self.0.year
    }

    async fn cover_image(&self) -> Option<&str> {
        self.0.cover_image.as_deref()
    }
}
