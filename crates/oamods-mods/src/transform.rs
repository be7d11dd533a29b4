//! OpenAlex work → MODS 3.7 record mapping

use std::path::{Path, PathBuf};

use anyhow::Result;

use oamods_openalex::WorkRecord;
use oamods_openalex::work::{Authorship, Institution};

use crate::tables::LookupTables;
use crate::xml::{self, Element};

pub const MODS_NS: &str = "http://www.loc.gov/mods/v3";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const MODS_VERSION: &str = "3.7";
pub const MODS_SCHEMA_LOCATION: &str =
    "http://www.loc.gov/mods/v3 http://www.loc.gov/standards/mods/v3/mods-3-7.xsd";

const ORCID_PREFIX: &str = "https://orcid.org/";
const EDITED_BOOK: &str = "edited-book";
const JOURNAL_ARTICLE: &str = "journal-article";

/// Split a display name into (family, given).
///
/// The last whitespace-separated token is the family name; everything
/// before it is the given name.
pub fn split_name(display_name: &str) -> (String, String) {
    let parts: Vec<&str> = display_name.split_whitespace().collect();
    match parts.split_last() {
        Some((family, given)) => (family.to_string(), given.join(" ")),
        None => (String::new(), String::new()),
    }
}

fn strip_trailing_period(s: &str) -> &str {
    s.strip_suffix('.').unwrap_or(s)
}

/// Split a title into (title, subtitle) at the first colon.
///
/// Both parts are trimmed and lose one trailing period each.
pub fn split_title(title: &str) -> (String, Option<String>) {
    match title.split_once(':') {
        Some((main, sub)) => (
            strip_trailing_period(main.trim()).to_string(),
            Some(strip_trailing_period(sub.trim()).to_string()),
        ),
        None => (strip_trailing_period(title).to_string(), None),
    }
}

/// Maps work records to MODS using a borrowed set of lookup tables
pub struct Transformer<'a> {
    tables: &'a LookupTables,
}

impl<'a> Transformer<'a> {
    pub fn new(tables: &'a LookupTables) -> Self {
        Self { tables }
    }

    /// `<modsCollection>` with one `<mods>` per work, in input order
    pub fn collection(&self, works: &[WorkRecord]) -> Element {
        let mut root = Element::new("modsCollection")
            .attr("xmlns", MODS_NS)
            .attr("xmlns:xlink", XLINK_NS)
            .attr("xmlns:xsi", XSI_NS);
        for work in works {
            root.push(self.record(work));
        }
        root
    }

    /// A single `<mods>` record
    pub fn record(&self, work: &WorkRecord) -> Element {
        let type_crossref = work.type_crossref();
        let mut mods = Element::new("mods")
            .attr("version", MODS_VERSION)
            .attr("xsi:schemaLocation", MODS_SCHEMA_LOCATION);

        for genre in self.tables.genres(type_crossref) {
            let mut el = Element::new("genre")
                .attr("authority", genre.authority)
                .attr("type", genre.kind);
            if let Some(lang) = genre.lang {
                el = el.attr("lang", lang);
            }
            mods.push(el.with_text(genre.text));
        }

        let role = if type_crossref == EDITED_BOOK {
            "edt"
        } else {
            "aut"
        };
        for authorship in &work.authorships {
            mods.push(self.name(authorship, role));
        }

        let language = self.tables.language(work.language_code());
        mods.push(title_info(work.title(), language));
        mods.push(
            Element::new("language").with_child(
                Element::new("languageTerm")
                    .attr("type", "code")
                    .attr("authority", "iso639-2b")
                    .with_text(language),
            ),
        );

        mods.push(origin_info(work));
        mods.push(
            Element::new("physicalDescription").with_child(
                Element::new("form")
                    .attr("authority", "marcform")
                    .with_text("electronic"),
            ),
        );

        if let Some(doi) = work.doi() {
            mods.push(identifier("doi", doi));
        }
        if let Some(pmid) = work.pmid() {
            mods.push(identifier("pmid", pmid));
        }
        if let Some(issn) = work.issn_l() {
            mods.push(identifier("issn", issn));
        }

        // "none" suppresses the identifier but still counts as a DOI here
        if !work.has_raw_doi() {
            let mut url = Element::new("url").attr("displayLabel", "Fulltext");
            if work.is_oa() {
                url = url.attr("note", "free");
            }
            mods.push(Element::new("location").with_child(url.with_text(work.landing_page_url())));
        }

        mods.push(related_item(work));

        if type_crossref == JOURNAL_ARTICLE && !has_volume_or_issue(work) {
            mods.push(
                Element::new("note")
                    .attr("type", "publicationStatus")
                    .attr("lang", "eng")
                    .with_text("Epub ahead of print"),
            );
        }

        mods
    }

    fn name(&self, authorship: &Authorship, role: &str) -> Element {
        let author = authorship.author.as_ref();
        let display_name = author
            .and_then(|a| a.display_name.as_deref())
            .unwrap_or("");
        let (family, given) = split_name(display_name);

        let mut name = Element::new("name")
            .attr("type", "personal")
            .with_child(
                Element::new("namePart")
                    .attr("type", "family")
                    .with_text(family),
            )
            .with_child(
                Element::new("namePart")
                    .attr("type", "given")
                    .with_text(given),
            )
            .with_child(
                Element::new("role").with_child(
                    Element::new("roleTerm")
                        .attr("type", "code")
                        .attr("authority", "marcrelator")
                        .with_text(role),
                ),
            )
            .with_child(
                Element::new("affiliation").with_text(self.affiliation(&authorship.institutions)),
            );

        if let Some(orcid) = author
            .and_then(|a| a.orcid.as_deref())
            .filter(|o| !o.is_empty())
        {
            let id = orcid.strip_prefix(ORCID_PREFIX).unwrap_or(orcid);
            name.push(Element::new("description").with_text(format!("orcid.org={id}")));
        }
        name
    }

    /// `"Inst A, Sweden; Inst B, Norway"`
    fn affiliation(&self, institutions: &[Institution]) -> String {
        institutions
            .iter()
            .filter_map(|inst| {
                let display_name = inst.display_name.as_deref().filter(|n| !n.is_empty())?;
                let code = inst.country_code.as_deref().unwrap_or("");
                let country = self.tables.country(code).unwrap_or_else(|| {
                    log::warn!("Country code '{code}' not found in country table");
                    code
                });
                Some(format!("{display_name}, {country}"))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn title_info(title: &str, language: &str) -> Element {
    let (main, sub) = split_title(title);
    let mut info = Element::new("titleInfo")
        .attr("lang", language)
        .with_child(Element::new("title").with_text(main));
    if let Some(sub) = sub {
        info.push(Element::new("subTitle").with_text(sub));
    }
    info
}

fn origin_info(work: &WorkRecord) -> Element {
    let year = work
        .publication_year
        .map(|y| y.to_string())
        .unwrap_or_default();
    let mut origin = Element::new("originInfo").with_child(Element::new("dateIssued").with_text(year));
    if let Some(publisher) = work
        .source()
        .and_then(|s| s.host_organization_name.as_deref())
        .filter(|p| !p.is_empty())
    {
        origin.push(Element::new("publisher").with_text(publisher));
    }
    origin
}

fn identifier(kind: &str, value: &str) -> Element {
    Element::new("identifier").attr("type", kind).with_text(value)
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn has_volume_or_issue(work: &WorkRecord) -> bool {
    work.biblio.as_ref().is_some_and(|b| {
        non_empty(b.volume.as_ref()).is_some() || non_empty(b.issue.as_ref()).is_some()
    })
}

/// `<relatedItem type="host">` with host title, ISSN, volume/issue and pages
fn related_item(work: &WorkRecord) -> Element {
    let mut related = Element::new("relatedItem").attr("type", "host");

    if let Some(host_title) = work
        .source()
        .and_then(|s| s.display_name.as_deref())
        .filter(|t| !t.is_empty())
    {
        related.push(Element::new("titleInfo").with_child(Element::new("title").with_text(host_title)));
    }
    if let Some(issn) = work.issn_l() {
        related.push(identifier("issn", issn));
    }

    let mut part = Element::new("part");
    let biblio = work.biblio.as_ref();
    for (kind, value) in [
        ("volume", biblio.and_then(|b| non_empty(b.volume.as_ref()))),
        ("issue", biblio.and_then(|b| non_empty(b.issue.as_ref()))),
    ] {
        if let Some(value) = value {
            part.push(
                Element::new("detail")
                    .attr("type", kind)
                    .with_child(Element::new("number").with_text(value)),
            );
        }
    }

    let first = biblio.and_then(|b| non_empty(b.first_page.as_ref()));
    let last = biblio.and_then(|b| non_empty(b.last_page.as_ref()));
    if first.is_some() || last.is_some() {
        let mut extent = Element::new("extent");
        if let Some(start) = first {
            extent.push(Element::new("start").with_text(start));
        }
        if let Some(end) = last {
            extent.push(Element::new("end").with_text(end));
        }
        part.push(extent);
    }

    related.push(part);
    related
}

/// Summary of a transform run
#[derive(Debug, Clone)]
pub struct TransformSummary {
    pub records: usize,
    pub output: PathBuf,
}

/// Read a records file, write the MODS collection to `output`.
///
/// Fails if `input` does not exist or is not a JSON array of works.
pub fn transform_file(
    input: &Path,
    output: &Path,
    tables: &LookupTables,
) -> Result<TransformSummary> {
    let works = oamods_openalex::load_records(input)?;
    let root = Transformer::new(tables).collection(&works);
    xml::write_file(output, &root)?;
    log::info!("XML file saved to {} ({} records)", output.display(), works.len());
    Ok(TransformSummary {
        records: works.len(),
        output: output.to_path_buf(),
    })
}
