//! Search engine - immutable in-memory full-text index over catalog records / 搜索引擎
//!
//! The index is built once from the full record list and never updated.
//! Matching per query term / 每个查询词的匹配方式：
//! - exact term / 精确匹配
//! - prefix (partial terms) / 前缀匹配
//! - fuzzy (edit distance, proportional to term length) / 模糊匹配
//!
//! Scoring is BM25 per field, scaled by the field boost and the match weight.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::schema::{Field, IndexOptions, IndexStats, SearchHit};
use super::tokenizer::{levenshtein_distance, normalize, tokenize, tokenize_query};
use crate::catalog::Record;

const BM25_K1: f32 = 1.2;
const BM25_B: f32 = 0.7;
const PREFIX_WEIGHT: f32 = 0.375;
const FUZZY_WEIGHT: f32 = 0.45;

/// Inverted index entry / 倒排索引条目
#[derive(Debug, Clone)]
struct PostingEntry {
    doc: usize,
    field: Field,
    term_frequency: u32,
}

/// Catalog index / 目录索引
pub struct CatalogIndex {
    /// Inverted index: token -> postings, ordered for prefix scans / 倒排索引
    inverted_index: BTreeMap<String, Vec<PostingEntry>>,
    /// Token count per document and field / 每个文档各字段的词数
    field_lengths: Vec<[u32; Field::COUNT]>,
    avg_field_lengths: [f32; Field::COUNT],
    /// Normalized titles, for exact title detection / 规范化标题
    titles: Vec<String>,
    options: IndexOptions,
    stats: IndexStats,
}

impl CatalogIndex {
    /// Build the index from the full record list / 从全部记录构建索引
    pub fn build(records: &[Record], options: IndexOptions) -> Self {
        let mut inverted_index: BTreeMap<String, Vec<PostingEntry>> = BTreeMap::new();
        let mut field_lengths = Vec::with_capacity(records.len());
        let mut titles = Vec::with_capacity(records.len());

        for (doc, record) in records.iter().enumerate() {
            let mut lengths = [0u32; Field::COUNT];
            let variables = record.variables_text();

            for field in Field::ALL {
                let text = match field {
                    Field::Title => record.title.as_str(),
                    Field::Abstract => record.abstract_text.as_str(),
                    Field::Variables => variables.as_str(),
                };
                let tokens = tokenize(text);
                lengths[field.slot()] = tokens.len() as u32;

                let mut frequencies: HashMap<String, u32> = HashMap::new();
                for token in tokens {
                    *frequencies.entry(token).or_default() += 1;
                }
                for (token, term_frequency) in frequencies {
                    inverted_index.entry(token).or_default().push(PostingEntry {
                        doc,
                        field,
                        term_frequency,
                    });
                }
            }

            field_lengths.push(lengths);
            titles.push(normalize(&record.title));
        }

        let mut avg_field_lengths = [0f32; Field::COUNT];
        if !records.is_empty() {
            for field in Field::ALL {
                let total: u32 = field_lengths.iter().map(|l| l[field.slot()]).sum();
                avg_field_lengths[field.slot()] = total as f32 / records.len() as f32;
            }
        }

        let stats = IndexStats {
            document_count: records.len(),
            term_count: inverted_index.len(),
            built_at: Some(chrono::Utc::now().timestamp()),
        };
        tracing::info!(
            "Catalog index built: {} documents, {} terms",
            stats.document_count,
            stats.term_count
        );

        Self {
            inverted_index,
            field_lengths,
            avg_field_lengths,
            titles,
            options,
            stats,
        }
    }

    /// Get index statistics / 获取索引统计信息
    pub fn stats(&self) -> IndexStats {
        self.stats.clone()
    }

    pub fn document_count(&self) -> usize {
        self.field_lengths.len()
    }

    /// Search the index / 搜索
    ///
    /// Hits are deduplicated per record and ordered by exact title match,
    /// then descending score, then load position.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query_tokens = tokenize_query(query);
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scores: HashMap<usize, f32> = HashMap::new();
        for token in &query_tokens {
            for (term, weight) in self.matching_terms(token) {
                let Some(postings) = self.inverted_index.get(term) else {
                    continue;
                };
                for posting in postings {
                    let score = weight * self.options.boost(posting.field) * self.field_score(posting, postings);
                    *scores.entry(posting.doc).or_default() += score;
                }
            }
        }

        let normalized_query = normalize(query);
        let mut hits: Vec<SearchHit> = scores
            .into_iter()
            .map(|(doc, score)| SearchHit {
                doc,
                score,
                exact_title: self.titles[doc] == normalized_query,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.exact_title
                .cmp(&a.exact_title)
                .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
                .then_with(|| a.doc.cmp(&b.doc))
        });
        hits
    }

    /// Index terms matched by one query token, with their best match weight / 匹配的索引词
    ///
    /// Ordered by term so that score accumulation is reproducible.
    fn matching_terms<'a>(&'a self, token: &str) -> BTreeMap<&'a str, f32> {
        let mut matches: BTreeMap<&'a str, f32> = BTreeMap::new();
        let mut offer = |term: &'a str, weight: f32| {
            let best = matches.entry(term).or_insert(weight);
            if weight > *best {
                *best = weight;
            }
        };

        let token_len = token.chars().count();

        // 精确匹配
        if let Some((term, _)) = self.inverted_index.get_key_value(token) {
            offer(term.as_str(), 1.0);
        }

        // 前缀匹配
        if self.options.prefix {
            let candidates = self
                .inverted_index
                .range::<str, _>((std::ops::Bound::Excluded(token), std::ops::Bound::Unbounded))
                .take_while(|(term, _)| term.starts_with(token));
            for (term, _) in candidates {
                let extra = term.chars().count().saturating_sub(token_len) as f32;
                let weight = PREFIX_WEIGHT * token_len as f32 / (token_len as f32 + 0.3 * extra);
                offer(term.as_str(), weight);
            }
        }

        // 模糊匹配
        let max_distance = self.options.max_distance(token_len);
        if max_distance > 0 {
            for term in self.inverted_index.keys() {
                if term.chars().count().abs_diff(token_len) > max_distance {
                    continue;
                }
                let distance = levenshtein_distance(token, term);
                if distance > 0 && distance <= max_distance {
                    let weight = FUZZY_WEIGHT * token_len as f32 / (token_len + distance) as f32;
                    offer(term.as_str(), weight);
                }
            }
        }

        matches
    }

    /// BM25 contribution of one posting / 单条倒排记录的 BM25 得分
    fn field_score(&self, posting: &PostingEntry, postings: &[PostingEntry]) -> f32 {
        let slot = posting.field.slot();
        let docs_with_term = postings.iter().filter(|p| p.field == posting.field).count() as f32;
        let total_docs = self.document_count() as f32;
        let idf = (1.0 + (total_docs - docs_with_term + 0.5) / (docs_with_term + 0.5)).ln();

        let tf = posting.term_frequency as f32;
        let length = self.field_lengths[posting.doc][slot] as f32;
        let avg_length = self.avg_field_lengths[slot].max(1.0);
        let tf_norm = tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * length / avg_length));

        idf * tf_norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn record(id: &str, title: &str, abstract_text: &str, vars: &[&str]) -> Record {
        let variables: Map<String, Value> = vars.iter().map(|v| (v.to_string(), json!({}))).collect();
        Record {
            id: id.to_string(),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            variables,
            realm: "atmos".to_string(),
            name: id.to_string(),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("tg_mean", "Mean Temperature", "Mean of daily mean temperature.", &["tas"]),
            record("tx_max", "Maximum temperature", "Maximum of daily maximum temperature.", &["tasmax"]),
            record("prcptot", "Total precipitation", "Total accumulated precipitation.", &["pr"]),
            record("snd_max", "Maximum snow depth", "Maximum of daily snow depth.", &["snd"]),
        ]
    }

    fn ids(index: &CatalogIndex, records: &[Record], query: &str) -> Vec<String> {
        index.search(query).iter().map(|h| records[h.doc].id.clone()).collect()
    }

    #[test]
    fn test_index_and_search() {
        let records = sample();
        let index = CatalogIndex::build(&records, IndexOptions::default());

        assert_eq!(index.document_count(), 4);
        assert_eq!(ids(&index, &records, "precipitation"), vec!["prcptot"]);
        assert!(index.search("xyz_nomatch").is_empty());
        assert!(index.search("").is_empty());
    }

    #[test]
    fn test_hits_are_deduplicated() {
        let records = sample();
        let index = CatalogIndex::build(&records, IndexOptions::default());

        // "maximum" appears in title and abstract of two records
        let hits = index.search("maximum maximum");
        let mut docs: Vec<usize> = hits.iter().map(|h| h.doc).collect();
        docs.sort_unstable();
        docs.dedup();
        assert_eq!(docs.len(), hits.len());
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_prefix_match() {
        let records = sample();
        let index = CatalogIndex::build(&records, IndexOptions::default());
        assert_eq!(ids(&index, &records, "precip"), vec!["prcptot"]);

        let no_prefix = CatalogIndex::build(&records, IndexOptions { prefix: false, ..IndexOptions::default() });
        assert!(no_prefix.search("precip").is_empty());
    }

    #[test]
    fn test_variables_field_is_searchable() {
        let records = sample();
        let index = CatalogIndex::build(&records, IndexOptions::default());
        assert_eq!(ids(&index, &records, "snd"), vec!["snd_max"]);
        // prefix of "tasmax" also matches through "tas"
        let tas = ids(&index, &records, "tas");
        assert_eq!(tas.len(), 2);
        assert_eq!(tas[0], "tg_mean");
    }

    #[test]
    fn test_fuzzy_match() {
        let records = sample();
        let index = CatalogIndex::build(&records, IndexOptions::default());
        let found = ids(&index, &records, "precipitatoon");
        assert_eq!(found, vec!["prcptot"]);

        let strict = CatalogIndex::build(&records, IndexOptions { fuzzy: 0.0, ..IndexOptions::default() });
        assert!(strict.search("precipitatoon").is_empty());
    }

    #[test]
    fn test_exact_title_ranks_first() {
        let records = vec![
            record("long", "Mean Temperature of the Warmest Quarter", "Mean temperature mean temperature.", &[]),
            record("short", "Mean Temperature", "Daily values.", &[]),
        ];
        let index = CatalogIndex::build(&records, IndexOptions::default());
        let hits = index.search("mean temperature");
        assert_eq!(records[hits[0].doc].id, "short");
        assert!(hits[0].exact_title);
        assert!(!hits[1].exact_title);
    }

    #[test]
    fn test_title_outweighs_abstract() {
        let records = vec![
            record("in_abstract", "Frost days", "Number of days with snow cover.", &[]),
            record("in_title", "Snow days", "Number of days.", &[]),
        ];
        let index = CatalogIndex::build(&records, IndexOptions::default());
        assert_eq!(ids(&index, &records, "snow"), vec!["in_title", "in_abstract"]);
    }

    #[test]
    fn test_equal_scores_keep_load_order() {
        let records = vec![
            record("b", "Frost days", "", &[]),
            record("a", "Frost days", "", &[]),
        ];
        let index = CatalogIndex::build(&records, IndexOptions::default());
        assert_eq!(ids(&index, &records, "frost"), vec!["b", "a"]);
    }

    #[test]
    fn test_empty_catalog() {
        let index = CatalogIndex::build(&[], IndexOptions::default());
        assert_eq!(index.stats().document_count, 0);
        assert!(index.search("anything").is_empty());
    }
}
