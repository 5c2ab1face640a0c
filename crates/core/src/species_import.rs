//! Pure logic for importing the species checklist into the taxonomy.
//!
//! This module has no DB or I/O. It provides:
//!
//! - Column layout of the semicolon-separated checklist export
//! - Row cleaning and validation ([`parse_row`]) with typed skip reasons
//! - German genus-name pluralization ([`pluralize_genus_german`])
//! - Synonym abbreviation expansion and edibility mapping
//! - A per-rank name cache and the run report used by the importer

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::species::Edibility;
use crate::taxonomy::TaxonRank;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Header lines at the top of the checklist export.
pub const DEFAULT_SKIP_LINES: usize = 2;

/// Field delimiter of the checklist export.
pub const DELIMITER: u8 = b';';

pub const COL_STATUS: usize = 0;
pub const COL_GENUS: usize = 1;
pub const COL_SPECIES: usize = 2;
pub const COL_SYNONYMS: usize = 34;
pub const COL_GERMAN_NAMES: usize = 35;
pub const COL_EDIBILITY: usize = 39;
pub const COL_FAMILY: usize = 41;
pub const COL_ORDER: usize = 42;
pub const COL_CLASS: usize = 43;
pub const COL_DIVISION: usize = 44;

/// Placement marker for taxa of uncertain position; such rows are skipped.
pub const INCERTAE_SEDIS: &str = "Incertae sedis";

/// Status codes accepted by the importer (case-insensitive).
pub const ACCEPTED_STATUSES: &[&str] = &["r", "k"];

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Why a checklist row was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Genus or species epithet is empty.
    MissingName,
    /// Placed in an "Incertae sedis" taxon at some rank.
    IncertaeSedis,
    /// No usable German common name.
    MissingGermanName,
    /// Status column is not one of the accepted codes.
    InvalidStatus,
    /// Division, class, order or family is empty.
    IncompleteTaxonomy,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::IncertaeSedis => "incertae_sedis",
            Self::MissingGermanName => "missing_german_name",
            Self::InvalidStatus => "invalid_status",
            Self::IncompleteTaxonomy => "incomplete_taxonomy",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned, validated checklist row ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// `"<Genus> <epithet>"`.
    pub scientific_name: String,
    /// First German common name of the species.
    pub german_name: String,
    /// Plural German genus name derived from `german_name`, possibly empty.
    pub genus_german: String,
    /// Synonyms with genus/species abbreviations expanded, possibly empty.
    pub synonyms: String,
    pub edibility: Edibility,
    pub division: String,
    pub class: String,
    pub order: String,
    pub family: String,
    pub genus: String,
}

impl ImportRow {
    /// Name of the taxon this row belongs to at `rank`.
    pub fn taxon_name(&self, rank: TaxonRank) -> &str {
        match rank {
            TaxonRank::Division => &self.division,
            TaxonRank::Class => &self.class,
            TaxonRank::Order => &self.order,
            TaxonRank::Family => &self.family,
            TaxonRank::Genus => &self.genus,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Clean and validate one checklist row.
///
/// Missing columns are treated as empty strings, so short rows are skipped
/// with a reason instead of failing.
pub fn parse_row<S: AsRef<str>>(fields: &[S]) -> Result<ImportRow, SkipReason> {
    let field = |idx: usize| fields.get(idx).map(|s| s.as_ref()).unwrap_or("");

    let status = strip_chars(field(COL_STATUS), &['*', '"']);
    let genus = strip_chars(field(COL_GENUS), &['*']);
    let species = strip_chars(field(COL_SPECIES), &['*']);
    let synonyms = clean_synonyms(field(COL_SYNONYMS));
    let names = strip_chars(field(COL_GERMAN_NAMES), &['"', '*']);
    let edibility = field(COL_EDIBILITY).trim();
    let family = field(COL_FAMILY).trim();
    let order = field(COL_ORDER).trim();
    let class = field(COL_CLASS).trim();
    let division = field(COL_DIVISION).trim();

    if genus.is_empty() || species.is_empty() {
        return Err(SkipReason::MissingName);
    }

    if [family, order, class, division]
        .iter()
        .any(|taxon| taxon.contains(INCERTAE_SEDIS))
    {
        return Err(SkipReason::IncertaeSedis);
    }

    let german_name = names
        .split(',')
        .map(str::trim)
        .find(|n| !n.is_empty())
        .unwrap_or("")
        .to_string();

    let genus_german = genus_german_name(&german_name);

    if german_name.is_empty() || german_name == "-" {
        return Err(SkipReason::MissingGermanName);
    }
    if !is_accepted_status(&status) {
        return Err(SkipReason::InvalidStatus);
    }

    if [family, order, class, division].iter().any(|t| t.is_empty()) {
        return Err(SkipReason::IncompleteTaxonomy);
    }

    let synonyms = expand_synonym_abbreviations(&synonyms, &genus, &species);

    Ok(ImportRow {
        scientific_name: format!("{genus} {species}"),
        german_name,
        genus_german,
        synonyms,
        edibility: map_edibility(edibility),
        division: division.to_string(),
        class: class.to_string(),
        order: order.to_string(),
        family: family.to_string(),
        genus,
    })
}

fn strip_chars(value: &str, chars: &[char]) -> String {
    value.replace(chars, "").trim().to_string()
}

/// Strip markers, a leading `=` and a trailing `?` from the synonyms column.
fn clean_synonyms(raw: &str) -> String {
    let stripped = raw.replace('*', "");
    let without_eq = match stripped.strip_prefix('=') {
        Some(rest) => rest.trim_start(),
        None => stripped.as_str(),
    };
    let without_q = without_eq.strip_suffix('?').unwrap_or(without_eq);
    without_q.trim().to_string()
}

fn is_accepted_status(status: &str) -> bool {
    !status.is_empty()
        && !status.contains('(')
        && ACCEPTED_STATUSES.contains(&status.to_lowercase().as_str())
}

/// Plural German genus name from the last hyphenated part of a species name.
///
/// `"Wiesen-Champignon"` yields `"Champignon"`; a name without a hyphen
/// yields an empty string.
pub fn genus_german_name(german_name: &str) -> String {
    let parts: Vec<&str> = german_name
        .split('-')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [_, .., last] => pluralize_genus_german(last),
        _ => String::new(),
    }
}

/// A single letter followed by a dot at the start of a word, e.g. `A.`.
static ABBREVIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\p{L})\.").expect("valid regex"));

/// Replace `G.` / `s.` abbreviations with the full genus / epithet.
///
/// Only abbreviations at the start of a word are expanded, so
/// `"Agaricus"`-style words containing the initial are left alone. When both
/// names share an initial the genus wins.
pub fn expand_synonym_abbreviations(synonyms: &str, genus: &str, species: &str) -> String {
    if synonyms.is_empty() {
        return String::new();
    }
    let genus_initial = genus.chars().next();
    let species_initial = species.chars().next();
    ABBREVIATION_RE
        .replace_all(synonyms, |caps: &Captures| {
            let initial = caps[1].chars().next();
            if initial == genus_initial {
                genus.to_string()
            } else if initial == species_initial {
                species.to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Map the German edibility label onto [`Edibility`].
pub fn map_edibility(label: &str) -> Edibility {
    match label.trim().to_lowercase().as_str() {
        "essbar" => Edibility::Edible,
        "giftig" => Edibility::Poisonous,
        "ungeniessbar" | "ungeniessbar/schwach giftig" => Edibility::Inedible,
        _ => Edibility::Unknown,
    }
}

// ---------------------------------------------------------------------------
// German pluralization
// ---------------------------------------------------------------------------

/// Suffixes whose plural simply appends a letter.
const APPEND_RULES: &[(&str, &str)] = &[
    ("pilz", "e"),
    ("ling", "e"),
    ("lorchel", "n"),
    ("morchel", "n"),
];

/// Suffixes whose plural rewrites the suffix (umlaut and ending).
const REWRITE_RULES: &[(&str, &str)] = &[
    ("kopf", "köpfe"),
    ("hut", "hüte"),
    ("fuss", "füsse"),
    ("schwamm", "schwämme"),
    ("blatt", "blätter"),
    ("zahn", "zähne"),
    ("bovist", "boviste"),
    ("keule", "keulen"),
];

/// Loan word ending in `e` that keeps its singular form.
const INVARIANT_E_WORDS: &[&str] = &["Shiitake"];

/// Pluralize a German genus common name (`"Täubling"` -> `"Täublinge"`).
///
/// Multi-word names are not pluralized and yield an empty string. Unknown
/// endings are returned unchanged.
pub fn pluralize_genus_german(word: &str) -> String {
    if word.contains(' ') {
        return String::new();
    }

    let lower = word.to_lowercase();

    for (suffix, append) in APPEND_RULES {
        if lower.ends_with(suffix) {
            return format!("{word}{append}");
        }
    }

    if !INVARIANT_E_WORDS.contains(&word) && lower.ends_with('e') {
        return format!("{word}n");
    }

    for (suffix, plural) in REWRITE_RULES {
        if lower.ends_with(suffix) {
            let stem = drop_last_chars(word, suffix.chars().count());
            return format!("{stem}{plural}");
        }
    }

    word.to_string()
}

fn drop_last_chars(word: &str, n: usize) -> &str {
    let keep = word.chars().count().saturating_sub(n);
    match word.char_indices().nth(keep) {
        Some((idx, _)) => &word[..idx],
        None => word,
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Memo of taxa already resolved during an import run, keyed by rank and name.
#[derive(Debug, Default)]
pub struct TaxonCache {
    entries: HashMap<TaxonRank, HashMap<String, DbId>>,
    hits: u64,
    misses: u64,
}

impl TaxonCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a taxon id, recording a hit or miss.
    pub fn get(&mut self, rank: TaxonRank, name: &str) -> Option<DbId> {
        let found = self
            .entries
            .get(&rank)
            .and_then(|names| names.get(name))
            .copied();
        match found {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        found
    }

    pub fn insert(&mut self, rank: TaxonRank, name: &str, id: DbId) {
        self.entries
            .entry(rank)
            .or_default()
            .insert(name.to_string(), id);
    }

    pub fn len(&self, rank: TaxonRank) -> usize {
        self.entries.get(&rank).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(HashMap::is_empty)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Counters accumulated over one import run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub rows_read: u64,
    pub species_created: u64,
    pub species_duplicate: u64,
    pub rows_failed: u64,
    pub genera_updated: u64,
    pub skipped: BTreeMap<SkipReason, u64>,
    pub taxa_created: BTreeMap<TaxonRank, u64>,
}

impl ImportReport {
    pub fn record_skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_default() += 1;
    }

    pub fn record_taxon_created(&mut self, rank: TaxonRank) {
        *self.taxa_created.entry(rank).or_default() += 1;
    }

    pub fn rows_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    pub fn taxa_created_for(&self, rank: TaxonRank) -> u64 {
        self.taxa_created.get(&rank).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Build a 45-column row with the given values placed at their columns.
    fn row(values: &[(usize, &str)]) -> Vec<String> {
        let mut fields = vec![String::new(); COL_DIVISION + 1];
        for (idx, value) in values {
            fields[*idx] = value.to_string();
        }
        fields
    }

    fn valid_row() -> Vec<String> {
        row(&[
            (COL_STATUS, "r"),
            (COL_GENUS, "Agaricus"),
            (COL_SPECIES, "campestris"),
            (COL_SYNONYMS, "= Psalliota c.?"),
            (COL_GERMAN_NAMES, "\"Wiesen-Champignon, Feld-Egerling\""),
            (COL_EDIBILITY, "essbar"),
            (COL_FAMILY, "Agaricaceae"),
            (COL_ORDER, "Agaricales"),
            (COL_CLASS, "Agaricomycetes"),
            (COL_DIVISION, "Basidiomycota"),
        ])
    }

    // -- pluralization ------------------------------------------------------

    #[test]
    fn plural_appends_e_for_pilz_and_ling() {
        assert_eq!(pluralize_genus_german("Schwefelpilz"), "Schwefelpilze");
        assert_eq!(pluralize_genus_german("Täubling"), "Täublinge");
    }

    #[test]
    fn plural_appends_n_for_morels_and_e_endings() {
        assert_eq!(pluralize_genus_german("Morchel"), "Morcheln");
        assert_eq!(pluralize_genus_german("Lorchel"), "Lorcheln");
        assert_eq!(pluralize_genus_german("Tramete"), "Trameten");
        assert_eq!(pluralize_genus_german("Keule"), "Keulen");
    }

    #[test]
    fn shiitake_is_invariant() {
        assert_eq!(pluralize_genus_german("Shiitake"), "Shiitake");
    }

    #[test]
    fn plural_rewrites_umlaut_suffixes() {
        assert_eq!(pluralize_genus_german("Kahlkopf"), "Kahlköpfe");
        assert_eq!(pluralize_genus_german("Schirmhut"), "Schirmhüte");
        assert_eq!(pluralize_genus_german("Rauhfuss"), "Rauhfüsse");
        assert_eq!(pluralize_genus_german("Saftschwamm"), "Saftschwämme");
        assert_eq!(pluralize_genus_german("Stachelbart"), "Stachelbart");
        assert_eq!(pluralize_genus_german("Eichenblatt"), "Eichenblätter");
        assert_eq!(pluralize_genus_german("Stoppelzahn"), "Stoppelzähne");
        assert_eq!(pluralize_genus_german("Riesenbovist"), "Riesenboviste");
    }

    #[test]
    fn plural_of_bare_suffix_is_lowercase() {
        assert_eq!(pluralize_genus_german("Kopf"), "köpfe");
    }

    #[test]
    fn plural_keeps_non_ascii_stem_intact() {
        assert_eq!(pluralize_genus_german("Grünkopf"), "Grünköpfe");
    }

    #[test]
    fn plural_unknown_ending_is_unchanged() {
        assert_eq!(pluralize_genus_german("Champignon"), "Champignon");
    }

    #[test]
    fn plural_of_multi_word_name_is_empty() {
        assert_eq!(pluralize_genus_german("Falscher Pfifferling"), "");
    }

    #[test]
    fn genus_name_needs_a_hyphen() {
        assert_eq!(genus_german_name("Wiesen-Champignon"), "Champignon");
        assert_eq!(genus_german_name("Grüner Knollenblätterpilz"), "");
        assert_eq!(genus_german_name("Fliegenpilz"), "");
        assert_eq!(genus_german_name("Echter-Reizker-"), "Reizker");
    }

    // -- row parsing --------------------------------------------------------

    #[test]
    fn parses_a_valid_row() {
        let parsed = parse_row(&valid_row()).expect("row should import");
        assert_eq!(parsed.scientific_name, "Agaricus campestris");
        assert_eq!(parsed.german_name, "Wiesen-Champignon");
        assert_eq!(parsed.genus_german, "Champignon");
        assert_eq!(parsed.synonyms, "Psalliota campestris");
        assert_eq!(parsed.edibility, Edibility::Edible);
        assert_eq!(parsed.taxon_name(TaxonRank::Division), "Basidiomycota");
        assert_eq!(parsed.taxon_name(TaxonRank::Genus), "Agaricus");
    }

    #[test]
    fn strips_markers_from_names() {
        let mut fields = valid_row();
        fields[COL_STATUS] = "\"R*\"".into();
        fields[COL_GENUS] = "*Agaricus".into();
        fields[COL_SPECIES] = "campestris*".into();
        let parsed = parse_row(&fields).expect("row should import");
        assert_eq!(parsed.scientific_name, "Agaricus campestris");
    }

    #[test]
    fn skips_missing_epithet() {
        let mut fields = valid_row();
        fields[COL_SPECIES] = " * ".into();
        assert_matches!(parse_row(&fields), Err(SkipReason::MissingName));
    }

    #[test]
    fn skips_incertae_sedis_at_any_rank() {
        let mut fields = valid_row();
        fields[COL_ORDER] = "Incertae sedis".into();
        assert_matches!(parse_row(&fields), Err(SkipReason::IncertaeSedis));
    }

    #[test]
    fn skips_rows_without_german_name() {
        let mut fields = valid_row();
        fields[COL_GERMAN_NAMES] = "-".into();
        assert_matches!(parse_row(&fields), Err(SkipReason::MissingGermanName));

        fields[COL_GERMAN_NAMES] = " , ".into();
        assert_matches!(parse_row(&fields), Err(SkipReason::MissingGermanName));
    }

    #[test]
    fn skips_unaccepted_status() {
        for status in ["", "x", "(r)", "rk"] {
            let mut fields = valid_row();
            fields[COL_STATUS] = status.into();
            assert_matches!(
                parse_row(&fields),
                Err(SkipReason::InvalidStatus),
                "status {:?}",
                status
            );
        }
    }

    #[test]
    fn accepts_uppercase_k_status() {
        let mut fields = valid_row();
        fields[COL_STATUS] = "K".into();
        assert!(parse_row(&fields).is_ok());
    }

    #[test]
    fn skips_incomplete_taxonomy() {
        let mut fields = valid_row();
        fields[COL_CLASS] = "".into();
        assert_matches!(parse_row(&fields), Err(SkipReason::IncompleteTaxonomy));
    }

    #[test]
    fn short_rows_are_skipped_not_panicking() {
        let fields = vec!["r".to_string(), "Agaricus".to_string()];
        assert_matches!(parse_row(&fields), Err(SkipReason::MissingName));
    }

    // -- helpers ------------------------------------------------------------

    #[test]
    fn edibility_labels() {
        assert_eq!(map_edibility("Essbar"), Edibility::Edible);
        assert_eq!(map_edibility("giftig"), Edibility::Poisonous);
        assert_eq!(map_edibility("ungeniessbar"), Edibility::Inedible);
        assert_eq!(
            map_edibility("ungeniessbar/schwach giftig"),
            Edibility::Inedible
        );
        assert_eq!(map_edibility("tödlich"), Edibility::Unknown);
        assert_eq!(map_edibility(""), Edibility::Unknown);
    }

    #[test]
    fn synonym_expansion_only_at_word_start() {
        let expanded =
            expand_synonym_abbreviations("A. arvensis, Ag. c.", "Agaricus", "campestris");
        assert_eq!(expanded, "Agaricus arvensis, Ag. campestris");
    }

    #[test]
    fn synonym_expansion_handles_every_abbreviation() {
        let expanded = expand_synonym_abbreviations(
            "B. aereus, B. e. var. pinophilus, Xerocomus b.",
            "Boletus",
            "edulis",
        );
        assert_eq!(expanded, "Boletus aereus, Boletus edulis var. pinophilus, Xerocomus b.");

        let expanded =
            expand_synonym_abbreviations("Leccinum s. (Bull.) Gray", "Leccinum", "scabrum");
        assert_eq!(expanded, "Leccinum scabrum (Bull.) Gray");

        assert_eq!(expand_synonym_abbreviations("", "Boletus", "edulis"), "");
    }

    #[test]
    fn synonym_column_cleanup() {
        assert_eq!(clean_synonyms("=  Boletus edulis?"), "Boletus edulis");
        assert_eq!(clean_synonyms("*Boletus*"), "Boletus");
        assert_eq!(clean_synonyms(""), "");
    }

    // -- cache & report -----------------------------------------------------

    #[test]
    fn cache_tracks_hits_per_rank() {
        let mut cache = TaxonCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get(TaxonRank::Genus, "Boletus"), None);

        cache.insert(TaxonRank::Genus, "Boletus", 7);
        assert_eq!(cache.get(TaxonRank::Genus, "Boletus"), Some(7));
        assert_eq!(cache.get(TaxonRank::Family, "Boletus"), None);

        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(TaxonRank::Genus), 1);
    }

    #[test]
    fn report_counts_skips_and_taxa() {
        let mut report = ImportReport::default();
        report.record_skip(SkipReason::InvalidStatus);
        report.record_skip(SkipReason::InvalidStatus);
        report.record_skip(SkipReason::MissingName);
        report.record_taxon_created(TaxonRank::Genus);

        assert_eq!(report.rows_skipped(), 3);
        assert_eq!(report.skipped[&SkipReason::InvalidStatus], 2);
        assert_eq!(report.taxa_created_for(TaxonRank::Genus), 1);
        assert_eq!(report.taxa_created_for(TaxonRank::Division), 0);
    }
}
