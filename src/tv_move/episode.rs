//! Filename normalization and episode metadata extraction.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// The canonical separator character in a normalized name.
pub const SEPARATOR: char = '.';

/// Whitespace, parentheses and brackets all act as separators in raw filenames.
static RE_SEPARATOR_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s()\[\]]").expect("Failed to compile separator regex"));

static RE_SEPARATOR_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("Failed to compile separator run regex"));

/// Season and episode marker like `S03E04` with a separator on both sides.
/// Capture group 1 is the season number.
pub(crate) static RE_SEASON_EPISODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[Ss]([0-9]{1,2})[Ee][0-9]{1,2}\.").expect("Failed to compile season regex")
});

/// Release year between two separators.
/// A year at the very start or end of the name is not treated as a marker.
static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(19[0-9]{2}|20[0-9]{2})\.").expect("Failed to compile year regex"));

static RE_RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([0-9]+p)\b").expect("Failed to compile resolution regex"));

static RE_CODEC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(x26[45])\b").expect("Failed to compile codec regex"));

/// Show name and season parsed from an episode filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeInfo {
    /// Show name with separators rendered as spaces.
    pub show_name: String,
    /// Season number, always in the range 0..=99.
    pub season: u8,
}

/// Optional quality tags parsed from a filename. Only used for filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxiliaryInfo {
    pub resolution: Option<String>,
    pub codec: Option<String>,
}

/// Reason why episode metadata could not be extracted from a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionError {
    /// No `SxxEyy` marker in the name.
    NoSeasonMarker,
    /// Nothing left before the year or season marker.
    EmptyShowName,
}

/// Canonicalize separators in a raw filename.
///
/// Every whitespace character and every `(`, `)`, `[`, `]` is replaced with a dot,
/// and any run of consecutive dots is collapsed into one.
///
/// ```rust
/// use tvsort::tv_move::normalize;
///
/// assert_eq!(normalize("The Wire (2002) S01E01 [1080p].mkv"), "The.Wire.2002.S01E01.1080p.mkv");
/// assert_eq!(normalize("Show..Name.S01E01"), "Show.Name.S01E01");
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
    let replaced = RE_SEPARATOR_CHARS.replace_all(name, ".");
    RE_SEPARATOR_RUNS.replace_all(&replaced, ".").into_owned()
}

/// Strip the extension from a filename.
/// A leading dot is not treated as an extension separator.
fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if index > 0 => &filename[..index],
        _ => filename,
    }
}

/// Replace separators with spaces and trim the result.
fn separators_to_spaces(name: &str) -> String {
    name.split(SEPARATOR)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl EpisodeInfo {
    /// Parse show name and season from a filename that includes the extension.
    ///
    /// The show name is everything before the release year if one is present,
    /// otherwise everything before the season marker.
    /// Preferring the year is a tie-break rule for names like `Show.2021.S01E01`,
    /// not a complete parser of every naming convention.
    ///
    /// # Errors
    /// Returns an error if the name has no season marker or the show name would be empty.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let stem = normalize(strip_extension(filename));

        let season_captures = RE_SEASON_EPISODE
            .captures(&stem)
            .ok_or(ExtractionError::NoSeasonMarker)?;
        let season_match = season_captures.get(0).ok_or(ExtractionError::NoSeasonMarker)?;
        let season = season_captures
            .get(1)
            .and_then(|number| number.as_str().parse::<u8>().ok())
            .ok_or(ExtractionError::NoSeasonMarker)?;

        let name_end = RE_YEAR
            .find(&stem)
            .map_or_else(|| season_match.start(), |year| year.start());

        let show_name = separators_to_spaces(&stem[..name_end]);
        if show_name.is_empty() {
            return Err(ExtractionError::EmptyShowName);
        }

        Ok(Self { show_name, season })
    }

    /// Two-digit zero-padded season label, for example `S03`.
    #[must_use]
    pub fn season_label(&self) -> String {
        format!("S{:02}", self.season)
    }
}

impl AuxiliaryInfo {
    /// Find resolution and codec tags anywhere in the filename.
    /// Missing tags are simply `None`.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let name = normalize(filename);
        let resolution = RE_RESOLUTION
            .captures(&name)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string());
        let codec = RE_CODEC
            .captures(&name)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string());

        Self { resolution, codec }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSeasonMarker => write!(f, "no season marker"),
            Self::EmptyShowName => write!(f, "empty show name"),
        }
    }
}

impl fmt::Display for EpisodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.show_name, self.season_label())
    }
}


#[cfg(test)]
mod extract_tests {
    use super::*;

    #[test]
    fn title_with_year() {
        let info = EpisodeInfo::from_filename("Invasion.2021.S03E04.1080p.x265-ELiTE.mkv").unwrap();
        assert_eq!(info.show_name, "Invasion");
        assert_eq!(info.season, 3);
        assert_eq!(info.season_label(), "S03");
    }

    #[test]
    fn multi_word_title_with_year() {
        let info = EpisodeInfo::from_filename("The.Last.of.Us.2023.S01E09.720p.WEB.mkv").unwrap();
        assert_eq!(info.show_name, "The Last of Us");
        assert_eq!(info.season_label(), "S01");
    }

    #[test]
    fn tag_order_after_season_does_not_matter() {
        let names = [
            "Severance.2022.S02E01.2160p.x265.mkv",
            "Severance.2022.S02E01.x265.2160p.mkv",
            "Severance.2022.S02E01.WEB-DL.DDP5.1.Atmos.mkv",
            "Severance (2022) S02E01 [WEB].mkv",
        ];
        for name in names {
            let info = EpisodeInfo::from_filename(name).unwrap();
            assert_eq!(info.show_name, "Severance", "{name}");
            assert_eq!(info.season_label(), "S02", "{name}");
        }
    }

    #[test]
    fn title_without_year() {
        let info = EpisodeInfo::from_filename("Breaking.Bad.S05E14.1080p.mkv").unwrap();
        assert_eq!(info.show_name, "Breaking Bad");
        assert_eq!(info.season_label(), "S05");
    }

    #[test]
    fn spaces_and_brackets() {
        let info = EpisodeInfo::from_filename("The Wire (2002) S01E01 [1080p].mkv").unwrap();
        assert_eq!(info.show_name, "The Wire");
        assert_eq!(info.season_label(), "S01");
    }

    #[test]
    fn lowercase_marker() {
        let info = EpisodeInfo::from_filename("fargo.s04e02.720p.mkv").unwrap();
        assert_eq!(info.show_name, "fargo");
        assert_eq!(info.season_label(), "S04");
    }

    #[test]
    fn season_marker_at_end_of_stem_is_not_bounded() {
        assert_eq!(
            EpisodeInfo::from_filename("Dark.S03E08.mkv"),
            Err(ExtractionError::NoSeasonMarker)
        );
        assert_eq!(
            EpisodeInfo::from_filename("Dark (2017) S03E08.srt"),
            Err(ExtractionError::NoSeasonMarker)
        );
    }

    #[test]
    fn season_marker_at_start_of_name_is_not_bounded() {
        assert_eq!(
            EpisodeInfo::from_filename("S01E01.1080p.mkv"),
            Err(ExtractionError::NoSeasonMarker)
        );
    }

    #[test]
    fn single_digit_season_is_zero_padded() {
        let info = EpisodeInfo::from_filename("Show.S7E1.720p.mkv").unwrap();
        assert_eq!(info.season, 7);
        assert_eq!(info.season_label(), "S07");
    }

    #[test]
    fn season_zero_and_ninety_nine() {
        assert_eq!(EpisodeInfo::from_filename("Show.S00E01.720p.mkv").unwrap().season_label(), "S00");
        assert_eq!(EpisodeInfo::from_filename("Show.S99E01.720p.mkv").unwrap().season_label(), "S99");
    }

    #[test]
    fn three_digit_season_is_not_a_marker() {
        assert_eq!(
            EpisodeInfo::from_filename("Show.S100E01.mkv"),
            Err(ExtractionError::NoSeasonMarker)
        );
    }

    #[test]
    fn marker_must_be_separator_bounded() {
        assert_eq!(
            EpisodeInfo::from_filename("ShowS01E01.mkv"),
            Err(ExtractionError::NoSeasonMarker)
        );
        assert_eq!(
            EpisodeInfo::from_filename("Show.S01E01x.mkv"),
            Err(ExtractionError::NoSeasonMarker)
        );
    }

    #[test]
    fn no_season_marker() {
        assert_eq!(
            EpisodeInfo::from_filename("Some.Movie.2019.1080p.mkv"),
            Err(ExtractionError::NoSeasonMarker)
        );
    }

    #[test]
    fn empty_show_name() {
        assert_eq!(
            EpisodeInfo::from_filename("[S01E01] 1080p.mkv"),
            Err(ExtractionError::EmptyShowName)
        );
        assert_eq!(
            EpisodeInfo::from_filename("(2019) S01E01 1080p.mkv"),
            Err(ExtractionError::EmptyShowName)
        );
    }

    #[test]
    fn year_as_title_at_start_is_kept() {
        let info = EpisodeInfo::from_filename("1923.S01E01.720p.mkv").unwrap();
        assert_eq!(info.show_name, "1923");
    }

    #[test]
    fn year_after_title_number() {
        let info = EpisodeInfo::from_filename("9-1-1.2018.S06E01.720p.mkv").unwrap();
        assert_eq!(info.show_name, "9-1-1");
    }

    #[test]
    fn extension_is_not_part_of_name() {
        let info = EpisodeInfo::from_filename("Show.Name.S01E02.en.srt").unwrap();
        assert_eq!(info.show_name, "Show Name");
    }

    #[test]
    fn display_format() {
        let info = EpisodeInfo::from_filename("Show.Name.S01E02.1080p.mkv").unwrap();
        assert_eq!(info.to_string(), "Show Name S01");
        assert_eq!(ExtractionError::NoSeasonMarker.to_string(), "no season marker");
        assert_eq!(ExtractionError::EmptyShowName.to_string(), "empty show name");
    }
}

#[cfg(test)]
mod auxiliary_tests {
    use super::*;

    #[test]
    fn finds_resolution_and_codec() {
        let info = AuxiliaryInfo::from_filename("Invasion.2021.S03E04.1080p.x265-ELiTE.mkv");
        assert_eq!(info.resolution.as_deref(), Some("1080p"));
        assert_eq!(info.codec.as_deref(), Some("x265"));
    }

    #[test]
    fn finds_tags_in_brackets() {
        let info = AuxiliaryInfo::from_filename("The Wire (2002) S01E01 [720p] [X264].mkv");
        assert_eq!(info.resolution.as_deref(), Some("720p"));
        assert_eq!(info.codec.as_deref(), Some("X264"));
    }

    #[test]
    fn missing_tags() {
        let info = AuxiliaryInfo::from_filename("Show.S01E01.WEB.mkv");
        assert_eq!(info, AuxiliaryInfo::default());
    }

    #[test]
    fn other_codecs_are_ignored() {
        let info = AuxiliaryInfo::from_filename("Show.S01E01.2160p.HEVC.x266.mkv");
        assert_eq!(info.resolution.as_deref(), Some("2160p"));
        assert_eq!(info.codec, None);
    }
}
