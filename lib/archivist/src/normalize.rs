//! Turns raw episode descriptions into canonical tracklist text.
//!
//! The pipeline is a fixed sequence of small rewrites over the whole
//! description. Each stage is a pure function that leaves anything it does not
//! recognise untouched, so arbitrary prose passes through without loss.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::{Captures, Regex};

use crate::corrections::Corrections;

static RE_TRACKLIST_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A\s*(?:tracklist:\s*)+").unwrap());
static RE_DASH_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+-[ \t\u{00A0}]+").unwrap());
static RE_TAG_MISSPELLING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\s*(track|classic|record)\s+of\s+the\s+motnh\s*\]").unwrap()
});
static RE_TAG_ANY_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*([a-z]+)\s+of\s+the\s+month\s*\]").unwrap());
// <n> <artist> - <title> (<parenthetical>)? [<remainder>
static RE_TRACK_WITH_BRACKET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(.+?)\s+-\s+(.+?)(?:\s+\(([^()]*)\))?\s*\[(.*)$").unwrap()
});
static RE_TRACK_PLAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(.+?)\s+-\s+(.+)$").unwrap());
static RE_TRAILING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*\S)\s*(\[[A-Z]+ OF THE MONTH\])$").unwrap());
static RE_FEATURING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bft\b\.?").unwrap());
static RE_BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

/// Parentheticals containing any of these stay outside the quoted title.
const REMIX_KEYWORDS: &[&str] = &[
    "remix",
    "mix",
    "rework",
    "edit",
    "version",
    "dub",
    "remaster",
    "update",
    "bootleg",
    "mashup",
    "vip",
    "rmx",
    "respray",
    "reprint",
    "straight from dat",
    "new v",
];

/// Run the full pipeline. Empty input gives empty output.
pub fn normalize(raw: &str, corrections: &Corrections) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let text = unify_line_endings(raw);
    let text = strip_tracklist_prefix(&text);
    let text = fix_straight_from_dat(&text);
    let text = normalize_dash_spacing(&text);
    let text = fix_tag_misspelling(&text);
    let text = uppercase_tags(&text);
    let text = format_bracketed_tracks(&text);
    let text = format_plain_tracks(&text);
    let text = promote_tags(&text);
    let text = corrections.apply(&text);
    let text = collapse_blank_lines(&text);
    text.trim().to_string()
}

/// Apply `rewrite` to every line; `None` keeps the line as it was.
fn map_lines<F>(text: &str, rewrite: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    text.split('\n')
        .map(|line| rewrite(line).unwrap_or_else(|| line.to_string()))
        .join("\n")
}

pub fn unify_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn strip_tracklist_prefix(text: &str) -> String {
    RE_TRACKLIST_PREFIX.replace(text, "").into_owned()
}

pub fn fix_straight_from_dat(text: &str) -> String {
    text.replace("(Straight From DAT )", "(Straight From DAT)")
}

pub fn normalize_dash_spacing(text: &str) -> String {
    RE_DASH_SPACING.replace_all(text, " - ").into_owned()
}

pub fn fix_tag_misspelling(text: &str) -> String {
    RE_TAG_MISSPELLING
        .replace_all(text, "[${1} OF THE MONTH]")
        .into_owned()
}

pub fn uppercase_tags(text: &str) -> String {
    RE_TAG_ANY_CASE
        .replace_all(text, |caps: &Captures| {
            format!("[{} OF THE MONTH]", caps[1].to_uppercase())
        })
        .into_owned()
}

/// Collapse whitespace and spell featuring credits as `ft.`.
pub fn normalize_artist(artist: &str) -> String {
    let collapsed = artist.split_whitespace().join(" ");
    RE_FEATURING.replace_all(&collapsed, "ft.").into_owned()
}

pub fn is_remix_marker(parenthetical: &str) -> bool {
    let lower = parenthetical.to_lowercase();
    REMIX_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn quoted(title: &str) -> &str {
    title.trim().trim_matches('"').trim()
}

/// A dash-spacing pass can leave a hyphenated word split as `Foo- - -Bar`,
/// which parses as artist `Foo-` and title `-Bar ...`. Rejoin the halves and
/// look for the real separator further on.
fn split_compound(artist: &str, title: &str) -> Option<(String, String)> {
    if !(artist.ends_with('-') && title.starts_with('-')) {
        return Some((artist.to_string(), title.to_string()));
    }
    let joined = format!(
        "{}-{}",
        artist.trim_end_matches('-'),
        title.trim_start_matches('-')
    );
    let (artist, title) = joined.split_once(" - ")?;
    Some((artist.to_string(), title.to_string()))
}

fn format_bracketed_track(line: &str) -> Option<String> {
    let caps = RE_TRACK_WITH_BRACKET.captures(line)?;
    let number = &caps[1];
    let (artist, title) = split_compound(&caps[2], &caps[3])?;
    let artist = normalize_artist(&artist);
    let title = quoted(&title);
    let remainder = &caps[5];

    let formatted = match caps.get(4).map(|m| m.as_str().trim()) {
        Some(paren) if is_remix_marker(paren) => {
            format!("{number}. {artist} - \"{title}\" ({paren}) [{remainder}")
        }
        Some(paren) => format!("{number}. {artist} - \"{title} ({paren})\" [{remainder}"),
        None => format!("{number}. {artist} - \"{title}\" [{remainder}"),
    };
    Some(formatted)
}

pub fn format_bracketed_tracks(text: &str) -> String {
    map_lines(text, format_bracketed_track)
}

fn format_plain_track(line: &str) -> Option<String> {
    // Lines with a bracket after the separator belong to the bracketed stage;
    // the pattern itself rejects `<n>.` so formatted lines never match again.
    if line.contains('"') || RE_TRACK_WITH_BRACKET.is_match(line) {
        return None;
    }
    let caps = RE_TRACK_PLAIN.captures(line)?;
    Some(format!(
        "{}. {} - \"{}\"",
        &caps[1],
        normalize_artist(&caps[2]),
        caps[3].trim()
    ))
}

pub fn format_plain_tracks(text: &str) -> String {
    map_lines(text, format_plain_track)
}

fn promote_tag(line: &str) -> Option<String> {
    let caps = RE_TRAILING_TAG.captures(line.trim())?;
    Some(format!("\n{}\n{}\n", &caps[2], caps[1].trim()))
}

/// Move a trailing `[... OF THE MONTH]` tag onto its own line above the track.
pub fn promote_tags(text: &str) -> String {
    map_lines(text, promote_tag)
}

pub fn collapse_blank_lines(text: &str) -> String {
    RE_BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "Tracklist:\r\n\
        1 Kyau & Albert - Are You Fine? (Extended Mix) [TRACK OF THE MONTH]\r\n\
        2 Above  &  Beyond ft Zoe Johnston   -   Love Is Not Enough (Kyay & Albert Remix)\r\n\
        3 Ferry Corsten - Punk (Straight From DAT ) [classic of the motnh]\r\n\
        4 Markus Schulz - Destiny (Part 1) [Coldharbour]";

    const EXPECTED: &str = "[TRACK OF THE MONTH]\n\
        1. Kyau & Albert - \"Are You Fine?\" (Extended Mix)\n\
        \n\
        2. Above & Beyond ft. Zoe Johnston - \"Love Is Not Enough (Kyau & Albert Remix)\"\n\
        \n\
        [CLASSIC OF THE MONTH]\n\
        3. Ferry Corsten - \"Punk\" (Straight From DAT)\n\
        \n\
        4. Markus Schulz - \"Destiny (Part 1)\" [Coldharbour]";

    fn kyau() -> Corrections {
        Corrections::from_pairs([("Kyay", "Kyau")]).unwrap()
    }

    #[test]
    fn full_pipeline() {
        assert_eq!(normalize(RAW, &kyau()), EXPECTED);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let once = normalize(RAW, &kyau());
        assert_eq!(normalize(&once, &kyau()), once);
    }

    #[test]
    fn empty_description_is_empty_body() {
        assert_eq!(normalize("", &Corrections::empty()), "");
        assert_eq!(normalize("  \n ", &Corrections::empty()), "");
    }

    #[test]
    fn prose_passes_through() {
        let text = "Thanks for listening!\nSee you next month.";
        assert_eq!(normalize(text, &Corrections::empty()), text);
    }

    #[test]
    fn track_of_the_month_is_promoted() {
        let out = normalize(
            "1 DJ Foo - Bar Baz (Extended Mix) [TRACK OF THE MONTH]",
            &Corrections::empty(),
        );
        assert_eq!(
            out,
            "[TRACK OF THE MONTH]\n1. DJ Foo - \"Bar Baz\" (Extended Mix)"
        );
    }

    #[test]
    fn strips_prefix_case_insensitively() {
        assert_eq!(strip_tracklist_prefix("TRACKLIST:   \n1 a"), "1 a");
        assert_eq!(strip_tracklist_prefix("My Tracklist: x"), "My Tracklist: x");
    }

    #[test]
    fn fixes_straight_from_dat_spacing() {
        assert_eq!(
            fix_straight_from_dat("Punk (Straight From DAT )"),
            "Punk (Straight From DAT)"
        );
    }

    #[test]
    fn dash_spacing() {
        assert_eq!(normalize_dash_spacing("A  -\tB"), "A - B");
        assert_eq!(normalize_dash_spacing("Jay-Z - Song"), "Jay-Z - Song");
        assert_eq!(normalize_dash_spacing("A -B"), "A -B");
        assert_eq!(normalize_dash_spacing("A\n-\nB"), "A\n-\nB");
    }

    #[test]
    fn tag_spelling_and_case() {
        assert_eq!(
            fix_tag_misspelling("x [Record Of The Motnh]"),
            "x [Record OF THE MONTH]"
        );
        assert_eq!(uppercase_tags("x [Record OF THE MONTH]"), "x [RECORD OF THE MONTH]");
        assert_eq!(uppercase_tags("x [track of the month]"), "x [TRACK OF THE MONTH]");
        assert_eq!(uppercase_tags("x [Anjunabeats]"), "x [Anjunabeats]");
    }

    #[test]
    fn featuring_is_normalized() {
        assert_eq!(normalize_artist("Foo  ft   Bar"), "Foo ft. Bar");
        assert_eq!(normalize_artist("Foo Ft. Bar"), "Foo ft. Bar");
        assert_eq!(normalize_artist("Left Soft"), "Left Soft");
    }

    #[test]
    fn remix_markers() {
        assert!(is_remix_marker("Extended Mix"));
        assert!(is_remix_marker("Kyau & Albert RMX"));
        assert!(is_remix_marker("straight from dat"));
        assert!(is_remix_marker("New Vocal"));
        assert!(is_remix_marker("VIP"));
        assert!(!is_remix_marker("Part 1"));
        assert!(!is_remix_marker("Intro"));
    }

    #[test]
    fn non_remix_parenthetical_folds_into_title() {
        assert_eq!(
            format_bracketed_tracks("7 Solarstone - Seven Cities (Interlude) [Black Hole]"),
            "7. Solarstone - \"Seven Cities (Interlude)\" [Black Hole]"
        );
    }

    #[test]
    fn bracketed_track_without_parenthetical() {
        assert_eq!(
            format_bracketed_tracks("12 Kyau & Albert - Velvet Morning [TRACK OF THE MONTH]"),
            "12. Kyau & Albert - \"Velvet Morning\" [TRACK OF THE MONTH]"
        );
    }

    #[test]
    fn innermost_parenthetical_before_bracket_is_classified() {
        assert_eq!(
            format_bracketed_tracks("3 A - Song (Part 2) (Club Mix) [Label]"),
            "3. A - \"Song (Part 2)\" (Club Mix) [Label]"
        );
    }

    #[test]
    fn compound_dash_is_rejoined() {
        assert_eq!(
            format_bracketed_tracks("5 Re- - -Set - Fade Away [Label]"),
            "5. Re-Set - \"Fade Away\" [Label]"
        );
        // No separator left after rejoining: nothing to split, line kept.
        assert_eq!(
            format_bracketed_tracks("5 Re- - -Set [Label]"),
            "5 Re- - -Set [Label]"
        );
    }

    #[test]
    fn plain_track_lines() {
        assert_eq!(
            format_plain_tracks("2 Foo  ft Bar - Baz  "),
            "2. Foo ft. Bar - \"Baz\""
        );
        assert_eq!(
            format_plain_tracks("2. Foo - \"Baz\""),
            "2. Foo - \"Baz\""
        );
        assert_eq!(format_plain_tracks("2 Foo - Baz [x"), "2 Foo - Baz [x");
        assert_eq!(format_plain_tracks("No number - here"), "No number - here");
        assert_eq!(
            format_plain_tracks("3 Artist [NL] - Title"),
            "3. Artist [NL] - \"Title\""
        );
    }

    #[test]
    fn bracket_inside_artist_is_still_a_track() {
        let once = normalize("1 [Unknown] - Intro", &Corrections::empty());
        assert_eq!(once, "1. [Unknown] - \"Intro\"");
        assert_eq!(normalize(&once, &Corrections::empty()), once);
    }

    #[test]
    fn promote_tag_layout() {
        assert_eq!(
            promote_tags("a\n1. A - \"B\" [CLASSIC OF THE MONTH]  \nb"),
            "a\n\n[CLASSIC OF THE MONTH]\n1. A - \"B\"\n\nb"
        );
        assert_eq!(
            promote_tags("[TRACK OF THE MONTH]\n1. A - \"B\""),
            "[TRACK OF THE MONTH]\n1. A - \"B\""
        );
    }

    #[test]
    fn blank_runs_collapse() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n \n\t\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn corrections_run_after_formatting() {
        let corrections = Corrections::from_pairs([("\"Are You Fine?\"", "\"Are You Fine\"")])
            .unwrap();
        assert_eq!(
            normalize("1 Kyau & Albert - Are You Fine? [Euphonic]", &corrections),
            "1. Kyau & Albert - \"Are You Fine\" [Euphonic]"
        );
    }
}
