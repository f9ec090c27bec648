use reqwest::{
    blocking::Client,
    header::{REFERER, SET_COOKIE, USER_AGENT},
    redirect::Policy,
};

use crate::{
    Res,
    types::VipLocationResponse,
    xiami::{XiamiClient, location::decode_location, login_url, vip_location_url},
};

/// Logs in a VIP account and returns the `Cookie` header value for the session.
///
/// The login endpoint answers with a redirect carrying the `member_auth`
/// cookie, so redirects are not followed here.
///
/// # Errors
///
/// Fails on network errors or when the response carries no `member_auth`
/// cookie (wrong credentials).
pub fn vip_login(client: &XiamiClient, email: &str, password: &str) -> Res<String> {
    let http = Client::builder().redirect(Policy::none()).build()?;
    let url = login_url(client.base_url());

    let response = http
        .post(&url)
        .header(USER_AGENT, client.request().user_agent.as_str())
        .header(REFERER, url.as_str())
        .form(&[
            ("email", email),
            ("password", password),
            ("LoginButton", "登录"),
        ])
        .send()?;

    let member_auth = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(member_auth_from_set_cookie)
        .ok_or("login failed: no member_auth cookie in response")?;

    Ok(session_cookie(&member_auth))
}

/// Cookie header value for an authenticated session.
pub fn session_cookie(member_auth: &str) -> String {
    format!("member_auth={member_auth}; t_sign_auth=1")
}

/// Extracts the `member_auth` value from a `Set-Cookie` header.
///
/// Several cookies may be folded into one header, separated by `,`.
pub fn member_auth_from_set_cookie(header: &str) -> Option<String> {
    header
        .split([';', ','])
        .map(str::trim)
        .filter_map(|part| part.strip_prefix("member_auth="))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Asks for the high-quality location of a song. Needs a VIP session cookie.
///
/// # Errors
///
/// Fails on network errors, and when the answer carries no decodable
/// location (no high-quality copy exists). Callers keep the regular
/// location in that case.
pub fn vip_location(client: &XiamiClient, song_id: &str) -> Res<String> {
    let response: VipLocationResponse = client
        .get(&vip_location_url(client.base_url(), song_id))?
        .json()?;
    decode_location(&response.location)?;
    Ok(response.location)
}
