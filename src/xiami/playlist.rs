use serde_json::Value;

use crate::{
    types::{PlaylistResponse, RawTrack, Track},
    warning,
    xiami::{ListKind, XiamiClient},
};

/// Parses a playlist API response into tracks.
///
/// Never fails: a malformed body, a falsy `status`, or a missing/`null`
/// `trackList` all produce an empty list. Text fields are HTML-unescaped and
/// empty `lyric`/`pic` values become `None`.
pub fn parse_playlist(body: &str) -> Vec<Track> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let response: PlaylistResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warning!("Malformed playlist response: {}", e);
            return Vec::new();
        }
    };

    if !is_truthy(&response.status) {
        return Vec::new();
    }

    response
        .data
        .and_then(|data| data.track_list)
        .unwrap_or_default()
        .into_iter()
        .map(Track::from)
        .collect()
}

/// Fetches and parses the track list behind a playlist API URL.
pub fn get_playlist(client: &XiamiClient, url: &str) -> Vec<Track> {
    parse_playlist(&client.get_text(url))
}

/// Full track list of an album, in album order.
pub fn get_album(client: &XiamiClient, album_id: &str) -> Vec<Track> {
    get_playlist(client, &ListKind::Album.url(client.base_url(), album_id))
}

impl From<RawTrack> for Track {
    fn from(raw: RawTrack) -> Self {
        Track {
            title: unescape(&raw.title),
            location: unescape(&raw.location),
            lyric: non_empty(unescape(&raw.lyric)),
            pic: non_empty(unescape(&raw.pic)),
            artist: unescape(&raw.artist),
            album_name: unescape(&raw.album_name),
            song_id: unescape(&raw.song_id),
            album_id: unescape(&raw.album_id),
            url: None,
            position: None,
        }
    }
}

fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
