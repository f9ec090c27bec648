use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tabled::Tabled;

/// Fields a `--name-template` may reference.
pub const TEMPLATE_FIELDS: [&str; 11] = [
    "id",
    "track",
    "title",
    "artist",
    "album_name",
    "song_id",
    "album_id",
    "location",
    "url",
    "lyric",
    "pic",
];

/// A single track as returned by the playlist API.
///
/// `url` and `position` are derived later: `url` by decoding `location`,
/// `position` by the track position cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub title: String,
    pub location: String,
    pub lyric: Option<String>,
    pub pic: Option<String>,
    pub artist: String,
    pub album_name: String,
    pub song_id: String,
    pub album_id: String,
    pub url: Option<String>,
    pub position: Option<TrackPosition>,
}

impl Track {
    /// Looks up a template field by name.
    ///
    /// Returns `None` for names outside [`TEMPLATE_FIELDS`]. Known fields that
    /// are not populated yet render as an empty string.
    pub fn field(&self, name: &str) -> Option<String> {
        let position = self.position.unwrap_or_default();
        let value = match name {
            "id" => position.id(),
            "track" => position.number(),
            "title" => self.title.clone(),
            "artist" => self.artist.clone(),
            "album_name" => self.album_name.clone(),
            "song_id" => self.song_id.clone(),
            "album_id" => self.album_id.clone(),
            "location" => self.location.clone(),
            "url" => self.url.clone().unwrap_or_default(),
            "lyric" => self.lyric.clone().unwrap_or_default(),
            "pic" => self.pic.clone().unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}

/// Ordinal of a song within its album. `0/0` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackPosition {
    pub track: u32,
    pub count: u32,
}

impl TrackPosition {
    /// `TRCK`-style value, e.g. `3/12`.
    pub fn number(&self) -> String {
        format!("{}/{}", self.track, self.count)
    }

    /// Track ordinal zero-padded to two digits, e.g. `03`.
    pub fn id(&self) -> String {
        format!("{:02}", self.track)
    }
}

/// Body of a `/song/playlist` answer.
///
/// `status` is `true` or `1` on success; anything else means the list does
/// not exist or is not visible.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub data: Option<PlaylistData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistData {
    // `null` when the list has no tracks
    #[serde(rename = "trackList", default)]
    pub track_list: Option<Vec<RawTrack>>,
}

/// Track entry as sent by the API, before HTML unescaping.
///
/// Ids arrive as numbers or strings and are read as strings either way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTrack {
    #[serde(default, deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub location: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub lyric: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pic: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub artist: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub album_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub song_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub album_id: String,
}

/// Body of a `/song/gethqsong` answer. `location` is empty when no
/// high-quality copy exists.
#[derive(Debug, Clone, Deserialize)]
pub struct VipLocationResponse {
    pub location: String,
}

/// One row of the track overview printed before downloading.
#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "song id")]
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl From<&Track> for TrackTableRow {
    fn from(track: &Track) -> Self {
        TrackTableRow {
            song_id: track.song_id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album_name.clone(),
        }
    }
}

/// IDs come back as strings from some endpoints and as numbers from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
