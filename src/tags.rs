//! ID3 tagging of downloaded tracks.
//!
//! Cover art and lyrics are fetched from the URLs in the track record, then
//! written together with the text frames as an ID3v2.4 tag. An existing tag
//! in the file is kept and extended.

use std::path::Path;

use id3::{
    Tag, TagLike, Version,
    frame::{Content, Lyrics, Picture, PictureType},
};

use crate::{Res, info, types::Track, utils, xiami::XiamiClient};

/// Media fetched for a track before it gets tagged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMedia {
    pub lyrics: Option<String>,
    pub cover: Vec<u8>,
}

/// Fetches cover and lyrics, then tags `path`.
///
/// Unless `keep_timetag` is set, LRC time tags are stripped from the lyrics;
/// lyrics without any time tag are kept as they are.
pub fn add_id3_tag(
    client: &XiamiClient,
    path: &Path,
    track: &Track,
    keep_timetag: bool,
) -> Res<()> {
    info!("Tagging...");

    let mut media = TagMedia::default();

    if let Some(pic) = &track.pic {
        info!("Getting album cover...");
        media.cover = client.get_bytes(&utils::album_image_url(pic, None));
    }

    if let Some(lyric_url) = &track.lyric {
        info!("Getting lyrics...");
        media.lyrics = Some(prepare_lyrics(client.get_text(lyric_url), keep_timetag));
    }

    let tag = write_tags(path, track, &media)?;
    for frame in tag.frames() {
        info!("{}={}", frame.id(), describe(frame.content()));
    }

    Ok(())
}

/// Converts fetched LRC text into the lyrics stored in the tag.
pub fn prepare_lyrics(lyric: String, keep_timetag: bool) -> String {
    if keep_timetag {
        return lyric;
    }

    let text = utils::lrc_to_txt(&lyric);
    if text.is_empty() { lyric } else { text }
}

/// Writes the track's frames into `path` and returns the resulting tag.
pub fn write_tags(path: &Path, track: &Track, media: &TagMedia) -> Res<Tag> {
    // an unreadable or missing tag is replaced by a fresh one
    let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());

    if let Some(lyrics) = media.lyrics.as_deref().filter(|l| !l.trim().is_empty()) {
        let _ = tag.remove("USLT");
        let _ = tag.add_frame(Lyrics {
            lang: "und".to_string(),
            description: "Lyrics".to_string(),
            text: lyrics.to_string(),
        });
    }

    tag.set_text("TRCK", track.position.unwrap_or_default().number());
    tag.set_title(track.title.clone());
    tag.set_album(track.album_name.clone());
    tag.set_artist(track.artist.clone());

    if !media.cover.is_empty() {
        let _ = tag.remove("APIC");
        let _ = tag.add_frame(Picture {
            mime_type: "image/jpeg".to_string(),
            picture_type: PictureType::CoverFront,
            description: "Cover".to_string(),
            data: media.cover.clone(),
        });
    }

    tag.write_to_path(path, Version::Id3v24)?;
    Ok(tag)
}

fn describe(content: &Content) -> String {
    match content {
        Content::Text(text) => text.clone(),
        Content::Lyrics(lyrics) => format!("{} line(s)", lyrics.text.lines().count()),
        Content::Picture(picture) => {
            format!("{} ({} bytes)", picture.mime_type, picture.data.len())
        }
        _ => String::new(),
    }
}
