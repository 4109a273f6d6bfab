//! Marker codec for interceptable playlist URLs.
//!
//! # Responsibilities
//! - Mark a URL as interceptable by prepending the marker character
//! - Strip the marker to recover the canonical URL
//! - Classify schemes (or whole URLs) as marked/unmarked
//!
//! # Design Decisions
//! - Only the first character counts; a marker elsewhere is ignored
//! - Decoding an unmarked URL is a pass-through, not an error
//! - The codec is a `Copy` value so snapshots can embed it freely

/// Marker used when the configuration does not name one.
pub const DEFAULT_MARKER: char = 'u';

/// Encodes and decodes the interception marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlCodec {
    marker: char,
}

impl UrlCodec {
    /// Create a codec for the given marker character.
    pub fn new(marker: char) -> Self {
        Self { marker }
    }

    /// The marker character.
    pub fn marker(&self) -> char {
        self.marker
    }

    /// Prepend the marker to `url`.
    pub fn encode(&self, url: &str) -> String {
        let mut marked = String::with_capacity(url.len() + self.marker.len_utf8());
        marked.push(self.marker);
        marked.push_str(url);
        marked
    }

    /// Strip one leading marker from `url`, or return it unchanged.
    pub fn decode<'a>(&self, url: &'a str) -> &'a str {
        url.strip_prefix(self.marker).unwrap_or(url)
    }

    /// Returns true if the first character of `scheme_or_url` is the marker.
    pub fn is_marked(&self, scheme_or_url: &str) -> bool {
        scheme_or_url.starts_with(self.marker)
    }
}

impl Default for UrlCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

/// Extract the scheme of `url` (everything before the first `:`).
///
/// Returns `None` unless the candidate matches
/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
pub fn scheme_of(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reverses_encode() {
        let codec = UrlCodec::default();
        for s in ["", "u", "http://example.com/a.m3u8", "uuu", "ünïcode://x"] {
            assert_eq!(codec.decode(&codec.encode(s)), s);
        }
    }

    #[test]
    fn test_decode_passes_unmarked_through() {
        let codec = UrlCodec::default();
        assert_eq!(codec.decode("https://example.com/seg.ts"), "https://example.com/seg.ts");
        assert_eq!(codec.decode(""), "");
    }

    #[test]
    fn test_decode_strips_only_one_marker() {
        let codec = UrlCodec::default();
        assert_eq!(codec.decode("uuhttp://x"), "uhttp://x");
    }

    #[test]
    fn test_is_marked_first_character_only() {
        let codec = UrlCodec::default();
        assert!(codec.is_marked("u"));
        assert!(codec.is_marked("uhttps"));
        assert!(!codec.is_marked(""));
        assert!(!codec.is_marked("https"));
        // Marker present, but not first.
        assert!(!codec.is_marked("hu"));
        assert!(!codec.is_marked("Uhttps"));
    }

    #[test]
    fn test_custom_multibyte_marker() {
        let codec = UrlCodec::new('λ');
        let marked = codec.encode("http://example.com");
        assert_eq!(marked, "λhttp://example.com");
        assert!(codec.is_marked(&marked));
        assert_eq!(codec.decode(&marked), "http://example.com");
    }

    #[test]
    fn test_scheme_of() {
        assert_eq!(scheme_of("uhttps://cdn.example.com/master.m3u8"), Some("uhttps"));
        assert_eq!(scheme_of("u:"), Some("u"));
        assert_eq!(scheme_of("a+b-c.d://x"), Some("a+b-c.d"));
        assert_eq!(scheme_of("//no-scheme"), None);
        assert_eq!(scheme_of(":empty"), None);
        assert_eq!(scheme_of("1abc://x"), None);
        assert_eq!(scheme_of("no colon"), None);
    }
}
