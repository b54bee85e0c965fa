use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structural unit kinds recognized in Halachic texts
///
/// `Paragraph` is not matched by any pattern; it labels chunks from the
/// blank-line fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Chapter ("פרק")
    Perek,
    /// Column of a code ("סימן")
    Siman,
    /// Single law, marked by a lone Hebrew letter with a dot
    Halacha,
    /// Clause within a siman ("סעיף")
    Seif,
    /// Sub-annotation of a commentary ("ס\"ק")
    SimanKatan,
    /// Fallback unit when no structure is detected
    Paragraph,
}

impl SectionKind {
    /// Hierarchy level; lower = more general (outer) unit
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Perek => 0,
            Self::Siman => 1,
            Self::Halacha => 2,
            Self::Seif => 3,
            Self::SimanKatan => 4,
            Self::Paragraph => 5,
        }
    }

    /// Human-readable kind label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perek => "perek",
            Self::Siman => "siman",
            Self::Halacha => "halacha",
            Self::Seif => "seif",
            Self::SimanKatan => "siman_katan",
            Self::Paragraph => "paragraph",
        }
    }
}

/// Heading patterns in scan order, all anchored to line starts.
///
/// Scan order is the tie-break for markers at the same offset; it is not
/// the hierarchy order (Seif is scanned before Halacha).
static STRUCTURE_PATTERNS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    [
        (SectionKind::Perek, r"(?m)^\s*פרק\s+[א-ת]{1,4}\s*$"),
        (SectionKind::Siman, r"(?m)^\s*סימן\s+[א-ת]{1,4}"),
        (SectionKind::Seif, r"(?m)^\s*סעיף\s+[א-ת]{1,4}"),
        (SectionKind::Halacha, r"(?m)^\s*\.?[א-ת]{1,3}\.\s*$"),
        // The quote in ס"ק may also be a gershayim (U+05F4) or geresh (U+05F3)
        (SectionKind::SimanKatan, r#"(?m)^\s*ס["״׳]{1,2}ק\s+[א-ת]{1,4}"#),
    ]
    .into_iter()
    .map(|(kind, pattern)| {
        (
            kind,
            Regex::new(pattern).expect("structure patterns are valid regexes"),
        )
    })
    .collect()
});

/// A detected structural heading, prior to tree assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Marker {
    pub kind: SectionKind,
    pub title: String,
    pub position: usize,
}

impl Marker {
    pub(crate) fn level(&self) -> u8 {
        self.kind.level()
    }
}

/// Scan raw text for structural heading markers
///
/// Matches every pattern across the whole text and returns markers sorted
/// by byte offset. The sort is stable, so markers at the same offset keep
/// pattern scan order. Pure function; no markers means the caller must fall
/// back to paragraph chunking.
pub(crate) fn scan_markers(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();

    for (kind, pattern) in STRUCTURE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            markers.push(Marker {
                kind: *kind,
                title: clean_title(m.as_str()),
                position: m.start(),
            });
        }
    }

    markers.sort_by_key(|marker| marker.position);
    markers
}

/// Strip surrounding whitespace and stray dots from a matched heading
fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_end_matches('.')
        .trim_start_matches('.')
        .trim()
        .to_string()
}

/// A structural section detected within a document
///
/// Sections form a forest: a perek holds halachot, a siman holds seifim.
/// `text` is the span from this section's heading up to the next marker at
/// any level, so a parent's own text is only chunked when it has no
/// subsections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub text: String,
    pub char_start: usize,
    pub char_end: usize,
    pub level: u8,
    pub subsections: Vec<Section>,
}

/// Build a nested section forest from position-sorted markers
///
/// Stack-based: a marker at level N closes every open section at level
/// >= N, then attaches under the remaining stack top (or becomes a new
/// root). Levels are strictly decreasing down the stack, which closes
/// siblings and deeper sections in one pass.
pub(crate) fn build_section_tree(markers: &[Marker], text: &str) -> Vec<Section> {
    let mut roots: Vec<Section> = Vec::new();
    let mut stack: Vec<Section> = Vec::new();

    for (i, marker) in markers.iter().enumerate() {
        let start = marker.position;
        let end = markers
            .get(i + 1)
            .map_or(text.len(), |next| next.position);

        let section = Section {
            kind: marker.kind,
            title: marker.title.clone(),
            text: text[start..end].trim().to_string(),
            char_start: start,
            char_end: end,
            level: marker.level(),
            subsections: Vec::new(),
        };

        while stack
            .last()
            .is_some_and(|top| top.level >= section.level)
        {
            close_top(&mut stack, &mut roots);
        }

        stack.push(section);
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

/// Pop the deepest open section and attach it to its parent or the roots
fn close_top(stack: &mut Vec<Section>, roots: &mut Vec<Section>) {
    if let Some(closed) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.subsections.push(closed),
            None => roots.push(closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kind_levels_are_ordered() {
        assert!(SectionKind::Perek.level() < SectionKind::Siman.level());
        assert!(SectionKind::Siman.level() < SectionKind::Halacha.level());
        assert!(SectionKind::Halacha.level() < SectionKind::Seif.level());
        assert!(SectionKind::Seif.level() < SectionKind::SimanKatan.level());
        assert!(SectionKind::SimanKatan.level() < SectionKind::Paragraph.level());
    }

    #[test]
    fn test_scan_finds_siman_and_seif() {
        let text = "סימן א\nסעיף א\nתוכן ראשון\nסעיף ב\nתוכן שני";
        let markers = scan_markers(text);

        let kinds: Vec<SectionKind> = markers.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::Siman, SectionKind::Seif, SectionKind::Seif]
        );
        assert!(markers.windows(2).all(|w| w[0].position <= w[1].position));
    }

    #[test]
    fn test_scan_perek_requires_bare_heading_line() {
        let markers = scan_markers("פרק א\nתוכן");
        assert_eq!(markers[0].kind, SectionKind::Perek);

        // Trailing content on the same line is not a perek heading
        let markers = scan_markers("פרק א ועוד דברים\nתוכן");
        assert!(markers.iter().all(|m| m.kind != SectionKind::Perek));
    }

    #[test]
    fn test_scan_halacha_title_is_cleaned() {
        let markers = scan_markers("ב.\nתוכן ההלכה");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, SectionKind::Halacha);
        assert_eq!(markers[0].title, "ב");
    }

    #[test]
    fn test_scan_siman_katan_variants() {
        for quote in ['"', '\u{05F4}', '\u{05F3}'] {
            let text = format!("ס{quote}ק א ביאור ההלכה");
            let markers = scan_markers(&text);
            assert_eq!(markers.len(), 1, "quote {quote:?} not matched");
            assert_eq!(markers[0].kind, SectionKind::SimanKatan);
        }
    }

    #[test]
    fn test_scan_no_markers_in_plain_text() {
        assert!(scan_markers("סתם טקסט חופשי בלי שום כותרות").is_empty());
        assert!(scan_markers("").is_empty());
    }

    #[test]
    fn test_tree_nests_seifim_under_siman() {
        let text = "סימן א\nסעיף א\nתוכן ראשון\nסעיף ב\nתוכן שני";
        let roots = build_section_tree(&scan_markers(text), text);

        assert_eq!(roots.len(), 1);
        let siman = &roots[0];
        assert_eq!(siman.kind, SectionKind::Siman);
        assert_eq!(siman.title, "סימן א");
        assert_eq!(siman.text, "סימן א");
        assert_eq!(siman.subsections.len(), 2);
        assert_eq!(siman.subsections[0].text, "סעיף א\nתוכן ראשון");
        assert_eq!(siman.subsections[1].text, "סעיף ב\nתוכן שני");
    }

    #[test]
    fn test_tree_same_level_markers_become_siblings() {
        let text = "סימן א\nתוכן הסימן הראשון\nסימן ב\nתוכן הסימן השני";
        let roots = build_section_tree(&scan_markers(text), text);

        assert_eq!(roots.len(), 2);
        assert!(roots[0].subsections.is_empty());
        assert!(roots[1].subsections.is_empty());
    }

    #[test]
    fn test_tree_deep_marker_before_shallow_resumes() {
        // A seif may open the document; a later siman must not nest under it
        let text = "סעיף א\nתוכן פתיחה\nסימן ב\nסעיף ב\nתוכן";
        let roots = build_section_tree(&scan_markers(text), text);

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].kind, SectionKind::Seif);
        assert_eq!(roots[1].kind, SectionKind::Siman);
        assert_eq!(roots[1].subsections.len(), 1);
    }

    #[test]
    fn test_tree_new_perek_closes_whole_branch() {
        let text = "פרק א\nסימן א\nסעיף א\nתוכן\nפרק ב\nתוכן אחר";
        let roots = build_section_tree(&scan_markers(text), text);

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].kind, SectionKind::Perek);
        assert_eq!(roots[1].kind, SectionKind::Perek);
        assert_eq!(roots[0].subsections.len(), 1);
        assert_eq!(roots[0].subsections[0].subsections.len(), 1);
        assert!(roots[1].subsections.is_empty());
    }

    #[test]
    fn test_tree_single_marker_spans_to_document_end() {
        let text = "סימן א\nכל שאר התוכן עד סוף המסמך";
        let markers = scan_markers(text);
        let roots = build_section_tree(&markers, text);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].char_start, 0);
        assert_eq!(roots[0].char_end, text.len());
        assert!(roots[0].subsections.is_empty());
    }

    #[test]
    fn test_tree_empty_markers_yield_empty_forest() {
        assert!(build_section_tree(&[], "טקסט כלשהו").is_empty());
    }

    #[test]
    fn test_section_span_bounds_are_ordered() {
        let text = "סימן א\nסעיף א\nתוכן\nסימן ב\nתוכן";
        let roots = build_section_tree(&scan_markers(text), text);

        fn walk(sections: &[Section]) {
            for section in sections {
                assert!(section.char_start < section.char_end);
                walk(&section.subsections);
            }
        }
        walk(&roots);
    }
}
