use std::{
    collections::BTreeMap,
    fmt,
    io::{self, BufRead, Write},
};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{TEMPLATE_FIELDS, Track};

static LRC_TIME_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\d{2}:\d{2}\.\d{2}\]").expect("valid regex"));

static IMAGE_SIZE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+)_\d(\..+)$").expect("valid regex"));

/// Characters that are not allowed in file or folder names.
pub const UNSAFE_FILENAME_CHARS: [char; 10] = ['\\', '/', ':', '*', '?', '<', '>', '|', '"', '\''];

/// Replaces every character of [`UNSAFE_FILENAME_CHARS`] with `_`.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Strips LRC time tags and returns the lyric lines in time order.
///
/// Lines without a `[mm:ss.xx]` tag are dropped. A line carrying several tags
/// is emitted once per tag; when two lines share a tag the later one wins.
pub fn lrc_to_txt(lrc: &str) -> String {
    let mut lyrics: BTreeMap<String, String> = BTreeMap::new();

    // `\n`, `\r\n` and lone `\r` all end a line
    for line in lrc.split(['\n', '\r']).filter(|line| !line.is_empty()) {
        let text = LRC_TIME_TAG.replace_all(line, "");
        for tag in LRC_TIME_TAG.find_iter(line) {
            lyrics.insert(tag.as_str().to_string(), text.to_string());
        }
    }

    // zero-padded tags sort lexicographically in time order
    lyrics.values().map(|line| format!("{line}\n")).collect()
}

/// Rewrites an album cover URL to a specific size.
///
/// Xiami cover URLs end in `_<digit>.<ext>`; dropping the suffix yields the
/// largest image, `Some(size)` swaps in another size variant. URLs without
/// the suffix are returned unchanged.
pub fn album_image_url(basic: &str, size: Option<u32>) -> String {
    let replacement = match size {
        Some(size) => format!("${{1}}_{size}${{2}}"),
        None => "${1}${2}".to_string(),
    };
    IMAGE_SIZE_SUFFIX
        .replace(basic, replacement.as_str())
        .into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// File name template with `{field}` placeholders.
///
/// Fields are validated against [`TEMPLATE_FIELDS`] when parsed, `{{` and `}}`
/// produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl NameTemplate {
    pub fn render(&self, track: &Track) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Field(name) => track.field(name).unwrap_or_default(),
            })
            .collect()
    }
}

impl fmt::Display for NameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Parses a `--name-template` value.
///
/// Used as a clap value parser, so errors are plain strings.
pub fn parse_name_template(s: &str) -> Result<NameTemplate, String> {
    if s.trim().is_empty() {
        return Err("name template cannot be empty".to_string());
    }

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(format!("unterminated field '{{{name}' in template")),
                    }
                }
                if !TEMPLATE_FIELDS.contains(&name.as_str()) {
                    return Err(format!(
                        "unknown field '{name}' in template (expected one of: {})",
                        TEMPLATE_FIELDS.join(", ")
                    ));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(name));
            }
            '}' => return Err("single '}' encountered in template".to_string()),
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(NameTemplate {
        source: s.to_string(),
        segments,
    })
}

/// Asks a yes/no question on the terminal.
///
/// An empty answer selects `default`. If the terminal cannot be read the
/// default is returned as well.
pub fn query_yes_no(question: &str, default: bool) -> bool {
    let stdin = io::stdin();
    let stdout = io::stdout();
    query_yes_no_from(stdin.lock(), stdout.lock(), question, default).unwrap_or(default)
}

/// Same as [`query_yes_no`] with explicit input and output.
pub fn query_yes_no_from<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    question: &str,
    default: bool,
) -> io::Result<bool> {
    let choices = if default { "[Y/n]" } else { "[y/N]" };

    loop {
        write!(output, "{question} {choices} ")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(default);
        }

        match answer.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}
