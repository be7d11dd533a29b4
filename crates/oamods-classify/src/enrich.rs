//! Append Swepub subject codes to an existing MODS collection.
//!
//! Records are matched to `<mods>` nodes by DOI. A record without a DOI
//! falls back to the node at its own position, provided that node carries
//! no DOI of its own. The XML file is rewritten once, after every record
//! has been tried.

use std::path::Path;

use anyhow::Result;
use indicatif::ProgressBar;

use oamods_mods::{Element, xml};
use oamods_openalex::WorkRecord;

use crate::client::Classifier;

/// Counts from one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub classified: usize,
    pub no_abstract: usize,
    pub unmatched: usize,
    pub failed: usize,
}

/// `<subject lang="eng" authority="hsv" xlink:href="<code>"/>`
pub fn subject_element(code: &str) -> Element {
    Element::new("subject")
        .attr("lang", "eng")
        .attr("authority", "hsv")
        .attr("xlink:href", code)
}

/// Lower-cased DOI identifier of a `<mods>` node
fn mods_doi(mods: &Element) -> Option<String> {
    mods.children_named("identifier")
        .find(|id| id.get_attr("type") == Some("doi"))
        .map(|id| id.text().trim().to_ascii_lowercase())
        .filter(|doi| !doi.is_empty())
}

/// Target `<mods>` index for each work, in work order
fn match_records(works: &[WorkRecord], mods_dois: &[Option<String>]) -> Vec<Option<usize>> {
    works
        .iter()
        .enumerate()
        .map(|(position, work)| match work.doi() {
            Some(doi) => {
                let doi = doi.to_ascii_lowercase();
                mods_dois.iter().position(|d| d.as_deref() == Some(doi.as_str()))
            }
            None => mods_dois
                .get(position)
                .filter(|d| d.is_none())
                .map(|_| position),
        })
        .collect()
}

/// Classify every work with an abstract and append subjects to `root`.
///
/// Per-record failures are logged and counted, never returned.
pub fn enrich_collection<C: Classifier>(
    works: &[WorkRecord],
    root: &mut Element,
    classifier: &C,
    pb: &ProgressBar,
) -> EnrichSummary {
    let mods_dois: Vec<Option<String>> = root.children_named("mods").map(mods_doi).collect();
    if mods_dois.len() != works.len() {
        log::warn!(
            "{} records but {} <mods> elements, matching by DOI where possible",
            works.len(),
            mods_dois.len()
        );
    }
    let targets = match_records(works, &mods_dois);

    let mut summary = EnrichSummary::default();
    let mut subjects: Vec<(usize, String)> = Vec::new();
    pb.set_length(works.len() as u64);

    for (work, target) in works.iter().zip(targets) {
        pb.set_message(work.short_id().to_string());
        pb.inc(1);

        let Some(abstract_text) = work.abstract_text() else {
            log::debug!("{}: no abstract, skipping", work.short_id());
            summary.no_abstract += 1;
            continue;
        };
        let Some(index) = target else {
            log::warn!("No <mods> element matches '{}'", work.title());
            summary.unmatched += 1;
            continue;
        };

        match classifier.classify(&abstract_text, work.title()) {
            Ok(code) => {
                log::debug!("{}: subject {code}", work.short_id());
                subjects.push((index, code));
                summary.classified += 1;
            }
            Err(e) => {
                log::error!(
                    "Error fetching classification for title '{}': {e}",
                    work.title()
                );
                summary.failed += 1;
            }
        }
    }

    let mut mods_nodes: Vec<&mut Element> =
        root.elements_mut().filter(|e| e.name == "mods").collect();
    for (index, code) in subjects {
        mods_nodes[index].push(subject_element(&code));
    }
    summary
}

/// Load records and XML, enrich, and rewrite `xml_path` in place
pub fn enrich_file<C: Classifier>(
    records_path: &Path,
    xml_path: &Path,
    classifier: &C,
    pb: &ProgressBar,
) -> Result<EnrichSummary> {
    let works = oamods_openalex::load_records(records_path)?;
    let mut root = xml::read_file(xml_path)?;

    let summary = enrich_collection(&works, &mut root, classifier, pb);

    xml::write_file(xml_path, &root)?;
    log::info!(
        "Updated XML file saved to {} ({} classified, {} without abstract, {} failed, {} unmatched)",
        xml_path.display(),
        summary.classified,
        summary.no_abstract,
        summary.failed,
        summary.unmatched
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use oamods_mods::{LookupTables, Transformer};

    use crate::client::ClassifyError;

    /// Returns a fixed code, or fails for titles containing "fail"
    struct StubClassifier {
        calls: RefCell<Vec<String>>,
    }

    impl StubClassifier {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn classify(&self, abstract_text: &str, title: &str) -> Result<String, ClassifyError> {
            self.calls.borrow_mut().push(abstract_text.to_string());
            if title.contains("fail") {
                Err(ClassifyError::NoSuggestions)
            } else {
                Ok(format!("code-{title}"))
            }
        }
    }

    fn works(json: &str) -> Vec<WorkRecord> {
        serde_json::from_str(json).unwrap()
    }

    fn subjects(mods: &Element) -> Vec<String> {
        mods.children_named("subject")
            .map(|s| s.get_attr("xlink:href").unwrap().to_string())
            .collect()
    }

    #[test]
    fn subject_attributes() {
        let subject = subject_element("10205");
        assert_eq!(subject.get_attr("lang"), Some("eng"));
        assert_eq!(subject.get_attr("authority"), Some("hsv"));
        assert_eq!(subject.get_attr("xlink:href"), Some("10205"));
    }

    #[test]
    fn records_without_abstract_are_never_classified() {
        let works = works(
            r#"[
                {"title": "a", "abstract_inverted_index": {}},
                {"title": "b", "abstract_inverted_index": null},
                {"title": "c"}
            ]"#,
        );
        let tables = LookupTables::builtin();
        let mut root = Transformer::new(&tables).collection(&works);
        let stub = StubClassifier::new();

        let summary = enrich_collection(&works, &mut root, &stub, &ProgressBar::hidden());

        assert_eq!(summary.no_abstract, 3);
        assert!(stub.calls.borrow().is_empty());
        assert!(root.children_named("mods").all(|m| subjects(m).is_empty()));
    }

    #[test]
    fn abstract_is_keys_in_order() {
        let works = works(
            r#"[{"title": "t", "abstract_inverted_index": {"beta": [1], "alpha": [0, 2]}}]"#,
        );
        let tables = LookupTables::builtin();
        let mut root = Transformer::new(&tables).collection(&works);
        let stub = StubClassifier::new();

        enrich_collection(&works, &mut root, &stub, &ProgressBar::hidden());
        assert_eq!(*stub.calls.borrow(), ["beta alpha"]);
    }

    #[test]
    fn failure_skips_only_that_record() {
        let works = works(
            r#"[
                {"title": "fail me", "abstract_inverted_index": {"x": [0]}},
                {"title": "ok", "abstract_inverted_index": {"y": [0]}}
            ]"#,
        );
        let tables = LookupTables::builtin();
        let mut root = Transformer::new(&tables).collection(&works);

        let summary =
            enrich_collection(&works, &mut root, &StubClassifier::new(), &ProgressBar::hidden());

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.classified, 1);
        let mods: Vec<_> = root.children_named("mods").collect();
        assert!(subjects(mods[0]).is_empty());
        assert_eq!(subjects(mods[1]), ["code-ok"]);
    }

    #[test]
    fn matches_by_doi_not_position() {
        let tables = LookupTables::builtin();
        let transformer = Transformer::new(&tables);
        let in_xml_order = works(
            r#"[
                {"title": "first", "doi": "https://doi.org/10.1/A"},
                {"title": "second", "doi": "https://doi.org/10.1/b"}
            ]"#,
        );
        let mut root = transformer.collection(&in_xml_order);

        let reordered = works(
            r#"[
                {"title": "second", "doi": "https://doi.org/10.1/b", "abstract_inverted_index": {"s": [0]}},
                {"title": "first", "doi": "https://doi.org/10.1/a", "abstract_inverted_index": {"f": [0]}}
            ]"#,
        );
        let summary =
            enrich_collection(&reordered, &mut root, &StubClassifier::new(), &ProgressBar::hidden());

        assert_eq!(summary.classified, 2);
        let mods: Vec<_> = root.children_named("mods").collect();
        assert_eq!(subjects(mods[0]), ["code-first"]);
        assert_eq!(subjects(mods[1]), ["code-second"]);
    }

    #[test]
    fn doi_less_record_uses_position() {
        let works = works(
            r#"[
                {"title": "with doi", "doi": "https://doi.org/10.1/a"},
                {"title": "no doi", "abstract_inverted_index": {"w": [0]}}
            ]"#,
        );
        let tables = LookupTables::builtin();
        let mut root = Transformer::new(&tables).collection(&works);

        enrich_collection(&works, &mut root, &StubClassifier::new(), &ProgressBar::hidden());
        let mods: Vec<_> = root.children_named("mods").collect();
        assert_eq!(subjects(mods[1]), ["code-no doi"]);
    }

    #[test]
    fn unmatched_records_are_counted() {
        let tables = LookupTables::builtin();
        let mut root = Transformer::new(&tables)
            .collection(&works(r#"[{"doi": "https://doi.org/10.1/a"}]"#));
        let extra = works(
            r#"[
                {"title": "x", "doi": "https://doi.org/10.9/zzz", "abstract_inverted_index": {"a": [0]}},
                {"title": "y", "abstract_inverted_index": {"b": [0]}}
            ]"#,
        );
        let stub = StubClassifier::new();
        let summary = enrich_collection(&extra, &mut root, &stub, &ProgressBar::hidden());

        assert_eq!(summary.unmatched, 2);
        assert!(stub.calls.borrow().is_empty());
    }
}
