//! Small text clean-up helpers shared by the extractors.

use std::sync::LazyLock;

use log::warn;
use quoted_printable::ParseMode;
use regex::Regex;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Soft line breaks, encoded `=` signs and UTF-8 lead/continuation byte
/// pairs. Plain HTML carries none of these.
static RE_QP_ARTEFACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"=(?:\r?\n|3D|[C-F][0-9A-F]=[89AB][0-9A-F])").unwrap()
});

/// Decodes HTML that still carries its quoted-printable transfer encoding.
/// HTML without quoted-printable artefacts is returned unchanged.
pub fn decode_quoted_printable(html: &str) -> String {
    if !RE_QP_ARTEFACT.is_match(html) {
        return html.to_string();
    }
    match quoted_printable::decode(html.as_bytes(), ParseMode::Robust) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("Leaving quoted-printable HTML undecoded: {}", e);
            html.to_string()
        }
    }
}

/// Decodes named and numeric character references. Non-breaking spaces
/// become plain spaces.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).replace('\u{a0}', " ")
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an HTML fragment, entities decoded and whitespace
/// collapsed.
pub fn text_content(fragment: &str) -> String {
    let stripped = RE_TAG.replace_all(fragment, " ");
    collapse_whitespace(&decode_entities(&stripped))
}

/// Removes sentence punctuation a subject line may end with.
pub fn trim_subject_value(value: &str) -> String {
    collapse_whitespace(value.trim().trim_end_matches(['.', '!']))
}
