//! Records file in, MODS collection file out

use std::path::Path;

use tempfile::TempDir;

use oamods_mods::{Element, LookupTables, transform_file, xml};

const FIXTURE: &str = r#"[
  {
    "id": "https://openalex.org/W1",
    "doi": "https://doi.org/10.1145/3770501.3770517",
    "title": "Learning to Rank: A Survey.",
    "publication_year": 2025,
    "language": "en",
    "type_crossref": "journal-article",
    "authorships": [
      {
        "author": {"display_name": "Anna Maria Svensson", "orcid": "https://orcid.org/0000-0002-1825-0097"},
        "institutions": [{"display_name": "Malmö University", "country_code": "SE"}]
      }
    ],
    "primary_location": {
      "is_oa": false,
      "landing_page_url": "https://doi.org/10.1145/3770501.3770517",
      "source": {
        "display_name": "ACM Computing Surveys",
        "host_organization_name": "Association for Computing Machinery",
        "issn_l": "0360-0300"
      }
    },
    "biblio": {"volume": "58", "issue": "2", "first_page": "1", "last_page": "35"},
    "ids": {"openalex": "https://openalex.org/W1"},
    "abstract_inverted_index": {"Ranking": [0], "matters": [1]}
  },
  {
    "id": "https://openalex.org/W2",
    "doi": null,
    "title": "Edge inference at scale",
    "publication_year": 2024,
    "language": {"lang": "sv"},
    "type_crossref": "proceedings-article",
    "authorships": [
      {"author": {"display_name": "Prince"}, "institutions": []}
    ],
    "primary_location": {
      "is_oa": true,
      "landing_page_url": "https://proceedings.example.org/edge",
      "source": null
    },
    "biblio": {"volume": null, "issue": null, "first_page": null, "last_page": null},
    "abstract_inverted_index": null
  }
]"#;

fn transform_fixture(dir: &TempDir) -> (String, Element) {
    let input = dir.path().join("openalex_records.json");
    let output = dir.path().join("openalex.xml");
    std::fs::write(&input, FIXTURE).unwrap();

    let summary = transform_file(&input, &output, &LookupTables::builtin()).unwrap();
    assert_eq!(summary.records, 2);

    let text = std::fs::read_to_string(&output).unwrap();
    let root = xml::parse_document(&text).unwrap();
    (text, root)
}

fn genre_texts(mods: &Element) -> Vec<String> {
    mods.children_named("genre").map(|g| g.text()).collect()
}

#[test]
fn two_records_two_mods() {
    let dir = TempDir::new().unwrap();
    let (text, root) = transform_fixture(&dir);

    assert!(text.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(text.contains(r#"xmlns="http://www.loc.gov/mods/v3""#));
    assert_eq!(root.name, "modsCollection");
    assert_eq!(root.children_named("mods").count(), 2);
}

#[test]
fn genre_sets_per_record() {
    let dir = TempDir::new().unwrap();
    let (_, root) = transform_fixture(&dir);
    let mods: Vec<_> = root.children_named("mods").collect();

    assert_eq!(
        genre_texts(mods[0]),
        ["refereed", "article", "art", "Article in journal", "article"]
    );
    assert_eq!(
        genre_texts(mods[1]),
        [
            "refereed",
            "conferencePaper",
            "kon",
            "Conference paper",
            "proceeding",
            "publishedPaper"
        ]
    );
}

#[test]
fn location_only_on_record_without_doi() {
    let dir = TempDir::new().unwrap();
    let (_, root) = transform_fixture(&dir);
    let mods: Vec<_> = root.children_named("mods").collect();

    assert!(mods[0].child("location").is_none());
    let url = mods[1].child("location").unwrap().child("url").unwrap();
    assert_eq!(url.get_attr("note"), Some("free"));
    assert_eq!(url.text(), "https://proceedings.example.org/edge");
}

#[test]
fn journal_record_fields() {
    let dir = TempDir::new().unwrap();
    let (_, root) = transform_fixture(&dir);
    let first = root.child("mods").unwrap();

    let info = first.child("titleInfo").unwrap();
    assert_eq!(info.get_attr("lang"), Some("eng"));
    assert_eq!(info.child("title").unwrap().text(), "Learning to Rank");
    assert_eq!(info.child("subTitle").unwrap().text(), "A Survey");

    let ids: Vec<_> = first
        .children_named("identifier")
        .map(|i| i.text())
        .collect();
    assert_eq!(ids, ["10.1145/3770501.3770517", "0360-0300"]);

    assert_eq!(
        first
            .child("originInfo")
            .unwrap()
            .child("publisher")
            .unwrap()
            .text(),
        "Association for Computing Machinery"
    );
    assert!(first.child("note").is_none());

    let name = first.child("name").unwrap();
    assert_eq!(
        name.child("affiliation").unwrap().text(),
        "Malmö University, Sweden"
    );
}

#[test]
fn proceedings_record_fields() {
    let dir = TempDir::new().unwrap();
    let (_, root) = transform_fixture(&dir);
    let second = root.children_named("mods").nth(1).unwrap();

    assert_eq!(
        second
            .child("language")
            .unwrap()
            .child("languageTerm")
            .unwrap()
            .text(),
        "swe"
    );
    let parts: Vec<_> = second
        .child("name")
        .unwrap()
        .children_named("namePart")
        .map(|p| p.text())
        .collect();
    assert_eq!(parts, ["Prince", ""]);
    assert!(second.child("identifier").is_none());
    assert!(second.child("note").is_none());
}

#[test]
fn missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.xml");
    let err = transform_file(
        Path::new("/nonexistent/openalex_records.json"),
        &output,
        &LookupTables::builtin(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("was not found"));
    assert!(!output.exists());
}
