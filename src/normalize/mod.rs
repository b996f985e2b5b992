//! Label normalization
//!
//! Attribute phrases are extracted per employee and vary in wording for the
//! same concept. A fixed synonym table maps known variants onto one
//! canonical label so they collapse into a single attribute node. Matching
//! is exact: variants missing from the table stay distinct.

use std::collections::HashMap;

/// Characters replaced by `_` in id slugs besides whitespace
const MIDDLE_DOTS: [char; 3] = ['·', '・', '･'];

/// Built-in synonym table: surface variant -> canonical label.
///
/// A canonical label must never appear as a key, and a key must never be a
/// possible slug (lowercase, no spaces) of some other label; both would
/// break idempotence of `normalize_for_id`.
const SYNONYMS: &[(&str, &str)] = &[
    // Growth
    ("自己成長", "成長"),
    ("成長意欲", "成長"),
    ("継続的な成長", "成長"),
    ("成長志向", "成長"),
    // Teamwork
    ("チームワーク", "協調性"),
    ("チームでの協働", "協調性"),
    ("協働", "協調性"),
    ("Teamwork", "協調性"),
    // Communication
    ("コミュニケーション力", "コミュニケーション"),
    ("コミュニケーション能力", "コミュニケーション"),
    ("対話力", "コミュニケーション"),
    // Problem solving
    ("問題解決力", "問題解決"),
    ("課題解決", "問題解決"),
    ("課題解決力", "問題解決"),
    // Leadership
    ("リーダーシップ力", "リーダーシップ"),
    ("Leadership", "リーダーシップ"),
    // Customer focus
    ("顧客志向", "顧客第一"),
    ("お客様第一", "顧客第一"),
    ("顧客中心", "顧客第一"),
    // Integrity
    ("誠実さ", "誠実"),
    ("誠実性", "誠実"),
    // Challenge
    ("新しいことへの挑戦", "挑戦"),
    ("チャレンジ", "挑戦"),
    ("チャレンジ精神", "挑戦"),
    // Learning
    ("学習", "学び"),
    ("継続的な学習", "学び"),
    // AI / ML
    ("ジェネレーティブAI", "生成AI"),
    ("Generative AI", "生成AI"),
    ("GenAI", "生成AI"),
    ("Machine Learning", "機械学習"),
    ("ML", "機械学習"),
    // Cloud and tooling
    ("Amazon Web Services", "AWS"),
    ("Google Cloud", "GCP"),
    ("Google Cloud Platform", "GCP"),
    ("Microsoft Azure", "Azure"),
    ("K8s", "Kubernetes"),
    ("JS", "JavaScript"),
    ("TS", "TypeScript"),
    ("Golang", "Go"),
];

/// Canonicalizes attribute labels and derives node-id slugs
///
/// Built once per run and passed by reference; the table is never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct LabelNormalizer {
    synonyms: HashMap<String, String>,
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelNormalizer {
    /// Normalizer with the built-in synonym table
    pub fn new() -> Self {
        Self::with_synonyms(
            SYNONYMS
                .iter()
                .map(|(variant, canonical)| (variant.to_string(), canonical.to_string())),
        )
    }

    /// Normalizer with exactly the given table
    pub fn with_synonyms<I>(synonyms: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        LabelNormalizer {
            synonyms: synonyms.into_iter().collect(),
        }
    }

    /// Add entries on top of the current table; later entries win.
    ///
    /// Entries are not checked here; see `conflict`.
    pub fn extend<I>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.synonyms.extend(synonyms);
        self
    }

    /// First table entry that would make normalization non-idempotent.
    ///
    /// Two shapes are rejected: a canonical label that is itself a variant
    /// (a chain), and a variant that is the slug of some other label (the
    /// slug would then normalize again).
    pub fn conflict(&self) -> Option<String> {
        let mut keys: Vec<&String> = self.synonyms.keys().collect();
        keys.sort();

        for variant in keys {
            let canonical = &self.synonyms[variant];
            if canonical != variant && self.synonyms.contains_key(canonical) {
                return Some(format!(
                    "{:?} maps to {:?}, which is itself mapped to {:?}",
                    variant, canonical, self.synonyms[canonical]
                ));
            }
            if reachable_as_slug(variant) {
                return Some(format!(
                    "{:?} is the id slug of other labels (e.g. {:?})",
                    variant,
                    variant.to_uppercase()
                ));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }

    /// Iterate over (variant, canonical) entries
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.synonyms.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical label; the input itself when not in the table
    pub fn normalize_label<'a>(&'a self, label: &'a str) -> &'a str {
        self.synonyms
            .get(label)
            .map(String::as_str)
            .unwrap_or(label)
    }

    /// Node-id slug: canonical label with whitespace and middle dots
    /// replaced by `_`, lowercased
    pub fn normalize_for_id(&self, label: &str) -> String {
        slug_chars(self.normalize_label(label))
    }

    /// Canonical labels of `items`, deduplicated, first-seen order.
    /// Blank labels are dropped and surrounding whitespace is trimmed.
    pub fn canonical_set(&self, items: &[String]) -> Vec<String> {
        let mut seen = Vec::with_capacity(items.len());
        for item in items {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                continue;
            }
            let canonical = self.normalize_label(trimmed);
            if !seen.iter().any(|s: &String| s == canonical) {
                seen.push(canonical.to_string());
            }
        }
        seen
    }
}

fn slug_chars(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_whitespace() || MIDDLE_DOTS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .to_lowercase()
}

/// Whether some label other than `key` slugs to `key`: it must already be
/// in slug form and contain a character with another preimage (a cased
/// letter, or `_` from whitespace).
fn reachable_as_slug(key: &str) -> bool {
    slug_chars(key) == key
        && key
            .chars()
            .any(|c| c == '_' || c.to_uppercase().ne(std::iter::once(c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label_hit_and_miss() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(normalizer.normalize_label("自己成長"), "成長");
        assert_eq!(normalizer.normalize_label("成長"), "成長");
        assert_eq!(normalizer.normalize_label("Amazon Web Services"), "AWS");
        assert_eq!(normalizer.normalize_label("インフラ設計"), "インフラ設計");
        // exact match only
        assert_eq!(normalizer.normalize_label("自己成長 "), "自己成長 ");
        assert_eq!(normalizer.normalize_label("amazon web services"), "amazon web services");
    }

    #[test]
    fn test_normalize_for_id() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(normalizer.normalize_for_id("AWS"), "aws");
        assert_eq!(normalizer.normalize_for_id("Amazon Web Services"), "aws");
        assert_eq!(normalizer.normalize_for_id("Site Reliability"), "site_reliability");
        assert_eq!(normalizer.normalize_for_id("UI・UX"), "ui_ux");
        assert_eq!(normalizer.normalize_for_id("A·B\tC"), "a_b_c");
        assert_eq!(normalizer.normalize_for_id("A•B"), "a•b");
        assert_eq!(normalizer.normalize_for_id("自己成長"), "成長");
    }

    #[test]
    fn test_synonyms_share_node_id() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(
            normalizer.normalize_for_id("自己成長"),
            normalizer.normalize_for_id("成長意欲")
        );
        assert_eq!(
            normalizer.normalize_for_id("K8s"),
            normalizer.normalize_for_id("Kubernetes")
        );
    }

    #[test]
    fn test_idempotence_over_table() {
        let normalizer = LabelNormalizer::new();
        let mut samples: Vec<String> = Vec::new();
        for (variant, canonical) in normalizer.entries() {
            for s in [variant, canonical] {
                samples.push(s.to_string());
                samples.push(s.to_lowercase());
                samples.push(s.to_uppercase());
                samples.push(s.replace(' ', "_"));
            }
        }
        samples.extend(
            ["インフラ設計", "Site Reliability", "UI・UX", "", "  "]
                .iter()
                .map(|s| s.to_string()),
        );

        for sample in &samples {
            let label = normalizer.normalize_label(sample);
            assert_eq!(normalizer.normalize_label(label), label, "label {:?}", sample);

            let slug = normalizer.normalize_for_id(sample);
            assert_eq!(normalizer.normalize_for_id(&slug), slug, "slug {:?}", sample);
        }
    }

    #[test]
    fn test_canonicals_are_not_keys() {
        let normalizer = LabelNormalizer::new();
        for (_, canonical) in normalizer.entries() {
            assert_eq!(normalizer.normalize_label(canonical), canonical);
        }
    }

    #[test]
    fn test_builtin_table_has_no_conflict() {
        assert_eq!(LabelNormalizer::new().conflict(), None);
    }

    #[test]
    fn test_conflicting_extensions() {
        let chain = LabelNormalizer::new().extend([
            ("Rustlang".to_string(), "Rust".to_string()),
            ("Rust".to_string(), "Rust言語".to_string()),
        ]);
        assert!(chain.conflict().unwrap().contains("Rustlang"));

        let slug_key = LabelNormalizer::new().extend([("rust".to_string(), "Rust言語".to_string())]);
        assert!(slug_key.conflict().is_some());

        let spaced = LabelNormalizer::new().extend([("site_reliability".to_string(), "SRE".to_string())]);
        assert!(spaced.conflict().is_some());

        let fine = LabelNormalizer::new().extend([
            ("Rustlang".to_string(), "Rust".to_string()),
            ("ラスト".to_string(), "Rust".to_string()),
        ]);
        assert_eq!(fine.conflict(), None);
    }

    #[test]
    fn test_canonical_set_dedupes_in_order() {
        let normalizer = LabelNormalizer::new();
        let items: Vec<String> = ["自己成長", "AWS", "成長", " AWS ", "", "成長意欲", "Go"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(normalizer.canonical_set(&items), vec!["成長", "AWS", "Go"]);
    }

    #[test]
    fn test_custom_table() {
        let normalizer = LabelNormalizer::with_synonyms([("Rustlang".to_string(), "Rust".to_string())]);
        assert_eq!(normalizer.len(), 1);
        assert_eq!(normalizer.normalize_label("Rustlang"), "Rust");
        assert_eq!(normalizer.normalize_label("自己成長"), "自己成長");

        let extended = LabelNormalizer::new().extend([("自己研鑽".to_string(), "成長".to_string())]);
        assert_eq!(extended.normalize_label("自己研鑽"), "成長");
        assert_eq!(extended.normalize_label("自己成長"), "成長");
    }
}
