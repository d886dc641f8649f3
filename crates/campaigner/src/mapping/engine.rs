use log::debug;
use serde::Serialize;

use crate::template::SlotPlan;

use super::targets::{ColumnMapping, ContactField, TargetKey};

/// Minimum score for an automatic assignment. Anything below stays
/// unmapped for manual completion.
const SCORE_THRESHOLD: f64 = 0.4;

/// One automatic assignment, kept for operator review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub target: TargetKey,
    pub column: String,
    pub score: f64,
}

/// Outcome summary: how much of the mapping the engine filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingSummary {
    pub total_targets: usize,
    pub mapped: usize,
    /// Required targets (only `phone`) that could not be mapped.
    pub unmapped_required: Vec<TargetKey>,
    pub assignments: Vec<Assignment>,
}

/// A proposed column mapping plus its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingProposal {
    pub mapping: ColumnMapping,
    pub summary: MappingSummary,
}

/// Proposes a column mapping for the given source columns.
///
/// Contact fields are assigned first, then header/body/button slots in
/// schema order; each column is used at most once. Deterministic: identical
/// inputs always produce the identical proposal.
pub fn auto_map(
    headers: &[String],
    fields: &[ContactField],
    plan: &SlotPlan,
) -> MappingProposal {
    let columns: Vec<NormalizedColumn> = headers
        .iter()
        .map(|h| NormalizedColumn {
            original: h.clone(),
            normalized: normalize(h),
        })
        .collect();

    let targets = build_targets(fields, plan);
    let total_targets = targets.len();

    let mut mapping = ColumnMapping::new();
    let mut assignments = Vec::new();
    let mut used = vec![false; columns.len()];

    for target in &targets {
        let mut best: Option<(usize, f64)> = None;
        for (i, column) in columns.iter().enumerate() {
            if used[i] || column.normalized.is_empty() {
                continue;
            }
            let score = target.score(&column.normalized);
            // Strictly-greater keeps the earliest column on ties.
            if score >= SCORE_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }

        if let Some((i, score)) = best {
            used[i] = true;
            debug!(
                "auto-map: {} -> '{}' (score {:.2})",
                target.key, columns[i].original, score
            );
            mapping.set(target.key.clone(), columns[i].original.clone());
            assignments.push(Assignment {
                target: target.key.clone(),
                column: columns[i].original.clone(),
                score,
            });
        }
    }

    let unmapped_required = targets
        .iter()
        .filter(|t| t.required && mapping.get(&t.key).is_none())
        .map(|t| t.key.clone())
        .collect();

    let summary = MappingSummary {
        total_targets,
        mapped: assignments.len(),
        unmapped_required,
        assignments,
    };

    MappingProposal { mapping, summary }
}

struct NormalizedColumn {
    original: String,
    normalized: String,
}

struct MappingTarget {
    key: TargetKey,
    required: bool,
    keywords: Vec<String>,
}

impl MappingTarget {
    fn score(&self, column: &str) -> f64 {
        self.keywords
            .iter()
            .map(|keyword| keyword_score(keyword, column))
            .fold(0.0, f64::max)
    }
}

/// Builds the ordered target list: contact fields first (required ones
/// ahead of optional ones), then slots in schema order.
fn build_targets(fields: &[ContactField], plan: &SlotPlan) -> Vec<MappingTarget> {
    let mut targets = Vec::new();

    let mut ordered_fields: Vec<&ContactField> = fields.iter().collect();
    ordered_fields.sort_by_key(|f| !f.required);

    for field in ordered_fields {
        let key = field.target_key();
        let mut keywords = vec![normalize(&field.key), normalize(&field.label)];
        keywords.extend(builtin_synonyms(&key).iter().map(|s| s.to_string()));
        targets.push(MappingTarget {
            required: field.required,
            keywords: dedup(keywords),
            key,
        });
    }

    for (kind, names, build) in [
        ("header", &plan.header, TargetKey::Header as fn(usize) -> TargetKey),
        ("body", &plan.body, TargetKey::Body as fn(usize) -> TargetKey),
        ("button", &plan.button, TargetKey::Button as fn(usize) -> TargetKey),
    ] {
        for (i, name) in names.iter().enumerate() {
            let mut keywords = Vec::new();
            if let Some(name) = name {
                keywords.push(normalize(name));
            }
            keywords.push(format!("{}{}", kind, i + 1));
            keywords.push(format!("param{}", i + 1));
            keywords.push(format!("var{}", i + 1));
            targets.push(MappingTarget {
                key: build(i),
                required: false,
                keywords: dedup(keywords),
            });
        }
    }

    targets
}

fn builtin_synonyms(key: &TargetKey) -> &'static [&'static str] {
    match key {
        TargetKey::Phone => &["phone", "mobile", "msisdn", "whatsapp", "number", "tel", "cell"],
        TargetKey::Fullname => &["fullname", "name", "firstname", "contactname"],
        TargetKey::Email => &["email", "mail", "emailaddress"],
        _ => &[],
    }
}

fn dedup(mut keywords: Vec<String>) -> Vec<String> {
    keywords.retain(|k| !k.is_empty());
    let mut seen = Vec::new();
    for k in keywords {
        if !seen.contains(&k) {
            seen.push(k);
        }
    }
    seen
}

/// Lowercases and strips everything but ASCII alphanumerics, so that
/// "Phone Number", "phone_number" and "phone-number" all compare equal.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Scores a normalized column against one keyword: exact match wins,
/// containment is strong, otherwise bigram similarity.
fn keyword_score(keyword: &str, column: &str) -> f64 {
    if keyword == column {
        return 1.0;
    }
    if column.contains(keyword) || keyword.contains(column) {
        let (shorter, longer) = if keyword.len() < column.len() {
            (keyword.len(), column.len())
        } else {
            (column.len(), keyword.len())
        };
        // Containment of a one-letter fragment is meaningless.
        if shorter >= 3 {
            return 0.6 + 0.2 * (shorter as f64 / longer as f64);
        }
    }
    bigram_similarity(keyword, column)
}

/// Sorensen-Dice coefficient over character bigrams.
fn bigram_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let bigrams = |s: &[char]| -> Vec<(char, char)> {
        s.windows(2).map(|w| (w[0], w[1])).collect()
    };

    let a_bigrams = bigrams(&a);
    let mut b_bigrams = bigrams(&b);

    let mut matches = 0usize;
    for bigram in &a_bigrams {
        if let Some(pos) = b_bigrams.iter().position(|x| x == bigram) {
            b_bigrams.remove(pos);
            matches += 1;
        }
    }

    (2.0 * matches as f64) / (a_bigrams.len() + b.len() - 1) as f64
}
