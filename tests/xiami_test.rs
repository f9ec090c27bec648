use xiamidl::xiami::{
    ListKind, RequestConfig,
    auth::{member_auth_from_set_cookie, session_cookie},
    build_url_list, login_url,
    playlist::parse_playlist,
    vip_location_url,
};

const BASE: &str = "http://www.xiami.com";

#[test]
fn test_parse_playlist_full_track() {
    let body = r#"{
        "status": true,
        "data": {
            "trackList": [{
                "title": "Rock &amp; Roll",
                "location": "3adgbecf",
                "lyric": "",
                "pic": "http://img.xiami.net/images/album/img23/123/4561_1.jpg",
                "artist": "A &lt;B&gt;",
                "album_name": "Best &#39;Of&#39;",
                "song_id": 1771234567,
                "album_id": "2100",
                "length": 215
            }]
        }
    }"#;

    let tracks = parse_playlist(body);
    assert_eq!(tracks.len(), 1);

    let track = &tracks[0];
    assert_eq!(track.title, "Rock & Roll");
    assert_eq!(track.location, "3adgbecf");
    assert_eq!(track.lyric, None);
    assert_eq!(
        track.pic.as_deref(),
        Some("http://img.xiami.net/images/album/img23/123/4561_1.jpg")
    );
    assert_eq!(track.artist, "A <B>");
    assert_eq!(track.album_name, "Best 'Of'");
    assert_eq!(track.song_id, "1771234567");
    assert_eq!(track.album_id, "2100");
    assert_eq!(track.url, None);
    assert_eq!(track.position, None);
}

#[test]
fn test_parse_playlist_keeps_order() {
    let body = r#"{"status": 1, "data": {"trackList": [
        {"title": "one", "song_id": "1", "lyric": "http://lrc/1.lrc"},
        {"title": "two", "song_id": "2"},
        {"title": "three", "song_id": "3"}
    ]}}"#;

    let tracks = parse_playlist(body);
    let titles: Vec<&str> = tracks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
    assert_eq!(tracks[0].lyric.as_deref(), Some("http://lrc/1.lrc"));

    // missing fields default to empty
    assert_eq!(tracks[1].location, "");
    assert_eq!(tracks[1].pic, None);
}

#[test]
fn test_parse_playlist_empty_results() {
    // Empty or null track list
    assert!(parse_playlist(r#"{"status": true, "data": {"trackList": []}}"#).is_empty());
    assert!(parse_playlist(r#"{"status": true, "data": {"trackList": null}}"#).is_empty());
    assert!(parse_playlist(r#"{"status": true, "data": {}}"#).is_empty());
    assert!(parse_playlist(r#"{"status": true}"#).is_empty());

    // Falsy status
    assert!(
        parse_playlist(r#"{"status": false, "data": {"trackList": [{"title": "x"}]}}"#)
            .is_empty()
    );
    assert!(parse_playlist(r#"{"data": {"trackList": [{"title": "x"}]}}"#).is_empty());
}

#[test]
fn test_parse_playlist_malformed_payloads() {
    assert!(parse_playlist("").is_empty());
    assert!(parse_playlist("   ").is_empty());
    assert!(parse_playlist("<html>503 Service Unavailable</html>").is_empty());
    assert!(parse_playlist(r#"{"status": true, "data": {"trackList": "oops"}}"#).is_empty());
    assert!(parse_playlist("[1, 2, 3]").is_empty());
}

#[test]
fn test_list_kind_urls() {
    assert_eq!(
        ListKind::Song.url(BASE, 1771234567),
        "http://www.xiami.com/song/playlist/id/1771234567/object_name/default/object_id/0/cat/json"
    );
    assert_eq!(
        ListKind::Album.url(BASE, 2100),
        "http://www.xiami.com/song/playlist/id/2100/type/1/cat/json"
    );
    assert_eq!(
        ListKind::Playlist.url(BASE, "42"),
        "http://www.xiami.com/song/playlist/id/42/type/3/cat/json"
    );
}

#[test]
fn test_build_url_list() {
    let urls = build_url_list(ListKind::Album, BASE, &[3, 1, 2]);
    assert_eq!(urls.len(), 3);
    assert!(urls[0].contains("/id/3/"));
    assert!(urls[1].contains("/id/1/"));
    assert!(urls[2].contains("/id/2/"));

    assert!(build_url_list(ListKind::Song, BASE, &[]).is_empty());
}

#[test]
fn test_vip_urls() {
    assert_eq!(
        vip_location_url(BASE, "1771234567"),
        "http://www.xiami.com/song/gethqsong/sid/1771234567"
    );
    assert_eq!(login_url(BASE), "http://www.xiami.com/web/login");
}

#[test]
fn test_member_auth_from_set_cookie() {
    let header = "member_auth=abc123; path=/; domain=.xiami.com, t_sign_auth=1; path=/";
    assert_eq!(member_auth_from_set_cookie(header).as_deref(), Some("abc123"));

    let header = "_xiamitoken=deadbeef; path=/, member_auth=xyz; path=/";
    assert_eq!(member_auth_from_set_cookie(header).as_deref(), Some("xyz"));

    assert_eq!(member_auth_from_set_cookie("foo=bar; path=/"), None);
    assert_eq!(member_auth_from_set_cookie("member_auth=; path=/"), None);
}

#[test]
fn test_session_cookie() {
    assert_eq!(session_cookie("abc"), "member_auth=abc; t_sign_auth=1");
}

#[test]
fn test_request_config_headers() {
    let request = RequestConfig::new("UA/1.0", "http://www.xiami.com/song/play");

    let pairs = request.pairs();
    assert_eq!(
        pairs,
        vec![
            ("User-Agent", "UA/1.0".to_string()),
            ("Referer", "http://www.xiami.com/song/play".to_string()),
        ]
    );
    assert!(request.header_map().unwrap().get("cookie").is_none());

    let request = request.with_cookie(session_cookie("abc"));
    let pairs = request.pairs();
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[2], ("Cookie", "member_auth=abc; t_sign_auth=1".to_string()));

    let headers = request.header_map().unwrap();
    assert_eq!(headers.get("user-agent").unwrap(), "UA/1.0");
    assert_eq!(headers.get("cookie").unwrap(), "member_auth=abc; t_sign_auth=1");
}

#[test]
fn test_request_config_rejects_invalid_header_values() {
    let request = RequestConfig::new("UA\nInjected: 1", "http://www.xiami.com/song/play");
    assert!(request.header_map().is_err());
}
