use tracing::debug;

use crate::model::Song;

/// In-memory holder of the ordered song sequence.
///
/// Ids are handed out from an explicit counter so the observable sequence
/// stays "1", "2", "3", ... in insertion order. Songs are never mutated or
/// removed once appended. Not safe for concurrent mutation on its own;
/// callers that share a store wrap it in a lock.
#[derive(Debug)]
pub struct CatalogStore {
    songs: Vec<Song>,
    next_id: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            songs: Vec::new(),
            next_id: 1,
        }
    }

    /// The three records the demo catalog ships with.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.append(
            "Bohemian Rhapsody",
            "Queen",
            1975,
            Some("https://upload.wikimedia.org/wikipedia/en/9/9f/Bohemian_Rhapsody.png".to_string()),
        );
        store.append(
            "Imagine",
            "John Lennon",
            1971,
            Some("https://upload.wikimedia.org/wikipedia/en/6/69/ImagineCover.jpg".to_string()),
        );
        store.append(
            "Hotel California",
            "Eagles",
            1976,
            Some("https://upload.wikimedia.org/wikipedia/en/4/49/Hotelcalifornia.jpg".to_string()),
        );
        store
    }

    /// All songs in insertion order.
    pub fn list(&self) -> &[Song] {
        &self.songs
    }

    /// Exact match on `id`. Absent is a normal result, not an error.
    pub fn get_by_id(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    /// Appends a new song and returns it, id assigned from the counter.
    pub fn append(
        &mut self,
        title: impl Into<String>,
        artist: impl Into<String>,
        year: i32,
        cover_image: Option<String>,
    ) -> &Song {
        let song = Song {
            id: self.next_id.to_string(),
            title: title.into(),
            artist: artist.into(),
            year,
            cover_image,
        };
        self.next_id += 1;
        debug!("append song {}: {}", song.id, song.title);
        self.songs.push(song);
        self.songs.last().unwrap()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}
