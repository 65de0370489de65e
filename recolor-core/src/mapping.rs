use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Brand migration table: Tailwind greens to the new brand blues, plus the
/// status reds/blues and a handful of hard-coded hex values.
///
/// Pairs are applied top to bottom. Broad keys such as `green-600` and
/// `green-50` must stay below every specific key that contains them.
const BRAND_MIGRATION: &[(&str, &str)] = &[
    // Tailwind green (old brand) -> brand blue
    ("bg-green-100", "bg-[#CFE3FA]"),
    ("bg-green-500", "bg-[#004FFE]"),
    ("bg-green-600", "bg-[#004FFE]"),
    // Must follow bg-green-500/600, it is a prefix of both.
    ("bg-green-50", "bg-[#F5F8FC]"),
    ("text-green-100", "text-[#CFE3FA]"),
    ("text-green-500", "text-[#004FFE]"),
    ("text-green-600", "text-[#004FFE]"),
    ("border-green-100", "border-[#CFE3FA]"),
    ("border-green-500", "border-[#004FFE]"),
    // Tailwind red -> status red
    ("bg-red-500", "bg-[#E53935]"),
    ("bg-red-400", "bg-[#E53935]"),
    ("text-red-500", "text-[#E53935]"),
    ("text-red-400", "text-[#E53935]"),
    ("border-red-500", "border-[#E53935]"),
    // Tailwind blue -> status blue
    ("bg-blue-500", "bg-[#1E88E5]"),
    ("bg-blue-400", "bg-[#1E88E5]"),
    ("text-blue-500", "text-[#1E88E5]"),
    ("text-blue-400", "text-[#1E88E5]"),
    ("border-blue-500", "border-[#1E88E5]"),
    ("bg-blue-100", "bg-[#E8F0FF]"),
    ("bg-blue-50", "bg-[#E8F0FF]"),
    // Remaining shades
    ("#93c5fd", "#1E88E5"),
    ("#fca5a5", "#E53935"),
    ("hover:bg-red-600", "hover:bg-[#E53935]"),
    ("hover:bg-blue-600", "hover:bg-[#1E88E5]"),
    ("text-green-800", "text-[#004FFE]"),
    ("text-green-700", "text-[#004FFE]"),
    ("bg-green-200", "bg-[#CFE3FA]"),
    ("green-600", "#004FFE"),
    // Residual greens
    ("#E8F3EF", "#F5F8FC"),
    ("#40856C", "#004FFE"),
    ("#247054", "#051960"),
    ("#CDE79D", "#E8F0FF"),
    ("#8DBA9C", "#1E88E5"),
    ("#68B297", "#3082F5"),
    ("green-50", "blue-50"),
    ("green-200", "blue-200"),
    ("green-900", "blue-900"),
    ("lime-100", "blue-100"),
    ("border-green-50", "border-blue-50"),
];

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("replacement #{index} has an empty search string")]
    EmptyKey { index: usize },

    #[error("line {line}: expected `old<TAB>new`, found no tab")]
    MissingTab { line: usize },

    #[error("line {line}: empty search string")]
    EmptyKeyOnLine { line: usize },

    #[error("replacement #{index} contains a tab or line break")]
    ControlCharacter { index: usize },

    #[error("line {line}: expected exactly one tab between old and new")]
    ControlCharacterOnLine { line: usize },

    #[error("failed to read mapping file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mapping file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<MappingError>,
    },
}

/// A single literal substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub old: String,
    pub new: String,
}

impl Replacement {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Ordered list of literal substitutions.
///
/// Pairs are kept exactly in the order they were given. Keys may overlap,
/// and an earlier pair consumes text before a later pair can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Mapping {
    pairs: Vec<Replacement>,
}

/// Result of running a mapping over a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub text: String,
    /// Occurrences replaced by each pair, indexed like the mapping
    pub counts: Vec<usize>,
}

impl Applied {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Mapping {
    pub fn new(pairs: Vec<Replacement>) -> Result<Self, MappingError> {
        if let Some(index) = pairs.iter().position(|r| r.old.is_empty()) {
            return Err(MappingError::EmptyKey { index });
        }
        if let Some(index) = pairs
            .iter()
            .position(|r| has_control_character(&r.old) || has_control_character(&r.new))
        {
            return Err(MappingError::ControlCharacter { index });
        }
        Ok(Self { pairs })
    }

    /// Build from borrowed string pairs, in order
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(old, new)| Replacement::new(old, new))
                .collect(),
        )
    }

    /// The brand migration table shipped with the tool
    pub fn builtin() -> Self {
        Self {
            pairs: BRAND_MIGRATION
                .iter()
                .map(|(old, new)| Replacement::new(*old, *new))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Replacement> {
        self.pairs.iter()
    }

    /// Apply every pair in sequence, each one replacing all non-overlapping
    /// occurrences in the output of the previous one.
    pub fn apply(&self, text: &str) -> Applied {
        let mut current = text.to_string();
        let mut counts = Vec::with_capacity(self.pairs.len());

        for pair in &self.pairs {
            let count = current.matches(pair.old.as_str()).count();
            if count > 0 {
                current = current.replace(pair.old.as_str(), &pair.new);
            }
            counts.push(count);
        }

        Applied {
            text: current,
            counts,
        }
    }

    /// Parse `old<TAB>new` lines.
    ///
    /// Lines without a tab are skipped when blank or starting with `#`. Any
    /// line with a tab is a pair, so hex colors and whitespace work as keys.
    pub fn from_tsv_str(input: &str) -> Result<Self, MappingError> {
        let mut pairs = Vec::new();

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if !line.contains('\t') && (line.trim().is_empty() || line.starts_with('#')) {
                continue;
            }

            let Some((old, new)) = line.split_once('\t') else {
                return Err(MappingError::MissingTab { line: line_no });
            };

            if old.is_empty() {
                return Err(MappingError::EmptyKeyOnLine { line: line_no });
            }

            if has_control_character(old) || has_control_character(new) {
                return Err(MappingError::ControlCharacterOnLine { line: line_no });
            }

            pairs.push(Replacement::new(old, new));
        }

        Ok(Self { pairs })
    }

    pub fn load_tsv(path: &Path) -> Result<Self, MappingError> {
        let content = fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_tsv_str(&content).map_err(|e| MappingError::Parse {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for pair in &self.pairs {
            out.push_str(&pair.old);
            out.push('\t');
            out.push_str(&pair.new);
            out.push('\n');
        }
        out
    }
}

/// Characters that would break the `old<TAB>new` line format
fn has_control_character(s: &str) -> bool {
    s.contains(['\t', '\n', '\r'])
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a Replacement;
    type IntoIter = std::slice::Iter<'a, Replacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_all_occurrences() {
        let mapping = Mapping::from_pairs([("foo", "bar")]).unwrap();
        let applied = mapping.apply("foo foo foofoo");
        assert_eq!(applied.text, "bar bar barbar");
        assert_eq!(applied.counts, vec![4]);
    }

    #[test]
    fn test_apply_earlier_pair_wins() {
        let mapping = Mapping::from_pairs([("bg-green-600", "X"), ("green-600", "Y")]).unwrap();
        let applied = mapping.apply("bg-green-600");
        assert_eq!(applied.text, "X");
        assert_eq!(applied.counts, vec![1, 0]);
    }

    #[test]
    fn test_apply_chains_outputs() {
        // Second pair sees the output of the first
        let mapping = Mapping::from_pairs([("a", "b"), ("b", "c")]).unwrap();
        assert_eq!(mapping.apply("ab").text, "cc");
    }

    #[test]
    fn test_apply_non_overlapping_scan() {
        let mapping = Mapping::from_pairs([("aa", "b")]).unwrap();
        let applied = mapping.apply("aaa");
        assert_eq!(applied.text, "ba");
        assert_eq!(applied.total(), 1);
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = Mapping::from_pairs([("ok", "x"), ("", "y")]).unwrap_err();
        assert!(matches!(err, MappingError::EmptyKey { index: 1 }));
    }

    #[test]
    fn test_builtin_keeps_broad_keys_after_specific_ones() {
        let mapping = Mapping::builtin();
        let position = |key: &str| mapping.iter().position(|r| r.old == key).unwrap();

        assert!(position("bg-green-600") < position("green-600"));
        assert!(position("bg-green-500") < position("bg-green-50"));
        assert!(position("bg-green-600") < position("bg-green-50"));
        assert!(position("bg-green-50") < position("green-50"));
    }

    #[test]
    fn test_builtin_scenarios() {
        let mapping = Mapping::builtin();

        assert_eq!(
            mapping
                .apply("<div class=\"bg-green-500 text-red-400\">")
                .text,
            "<div class=\"bg-[#004FFE] text-[#E53935]\">"
        );
        assert_eq!(
            mapping.apply("body { color: #93c5fd; }").text,
            "body { color: #1E88E5; }"
        );
        assert_eq!(mapping.apply("bg-green-50").text, "bg-[#F5F8FC]");
        assert_eq!(mapping.apply("ring-green-600").text, "ring-#004FFE");
        assert_eq!(mapping.apply("from-green-50").text, "from-blue-50");
    }

    #[test]
    fn test_from_tsv_str() {
        let input = "# header\n\nbg-green-500\tbg-[#004FFE]\r\ngreen-600\t#004FFE\nstrip\t\n";
        let mapping = Mapping::from_tsv_str(input).unwrap();

        let pairs: Vec<_> = mapping
            .iter()
            .map(|r| (r.old.as_str(), r.new.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("bg-green-500", "bg-[#004FFE]"),
                ("green-600", "#004FFE"),
                ("strip", ""),
            ]
        );
    }

    #[test]
    fn test_from_tsv_str_hex_keys_are_not_comments() {
        let mapping = Mapping::from_tsv_str("# colors\n#93c5fd\t#1E88E5\n").unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.iter().next().unwrap().old, "#93c5fd");
    }

    #[test]
    fn test_from_tsv_str_rejects_extra_tabs() {
        let err = Mapping::from_tsv_str("ok\tfine\na\tb\tc\n").unwrap_err();
        assert!(matches!(err, MappingError::ControlCharacterOnLine { line: 2 }));
    }

    #[test]
    fn test_new_rejects_tabs_and_line_breaks() {
        let err = Mapping::from_pairs([("ok", "fine"), ("a\tb", "c")]).unwrap_err();
        assert!(matches!(err, MappingError::ControlCharacter { index: 1 }));

        let err = Mapping::from_pairs([("a", "b\nc")]).unwrap_err();
        assert!(matches!(err, MappingError::ControlCharacter { index: 0 }));

        let err = Mapping::from_pairs([("a\r", "b")]).unwrap_err();
        assert!(matches!(err, MappingError::ControlCharacter { index: 0 }));
    }

    #[test]
    fn test_tsv_round_trip_keeps_whitespace_keys_and_empty_values() {
        let mapping = Mapping::from_pairs([("  ", ""), (" x ", " y "), ("#fff", "#fafafa")]).unwrap();
        let parsed = Mapping::from_tsv_str(&mapping.to_tsv()).unwrap();
        assert_eq!(parsed, mapping);
    }

    #[test]
    fn test_from_tsv_str_errors_name_the_line() {
        let err = Mapping::from_tsv_str("a\tb\nno tab here\n").unwrap_err();
        assert!(matches!(err, MappingError::MissingTab { line: 2 }));
        assert_eq!(
            err.to_string(),
            "line 2: expected `old<TAB>new`, found no tab"
        );

        let err = Mapping::from_tsv_str("\tvalue\n").unwrap_err();
        assert!(matches!(err, MappingError::EmptyKeyOnLine { line: 1 }));
    }

    #[test]
    fn test_tsv_round_trip_of_builtin() {
        let builtin = Mapping::builtin();
        let parsed = Mapping::from_tsv_str(&builtin.to_tsv()).unwrap();
        assert_eq!(parsed, builtin);
    }

    #[test]
    fn test_load_tsv_missing_file() {
        let err = Mapping::load_tsv(Path::new("/definitely/not/here.tsv")).unwrap_err();
        assert!(matches!(err, MappingError::Io { .. }));
        assert!(err.to_string().contains("failed to read mapping file"));
    }
}
