//! Lookup tables driving the MODS mapping.
//!
//! The built-in tables are static data. [`LookupTables`] bundles them into
//! one immutable value that the transformer borrows, so callers (and tests)
//! can extend or replace any of them without touching global state.

use rustc_hash::FxHashMap;

/// Language code for anything the table cannot resolve
pub const UNDEFINED_LANGUAGE: &str = "und";

/// One `<genre>` element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
    pub authority: &'static str,
    /// Value of the `type` attribute
    pub kind: &'static str,
    pub lang: Option<&'static str>,
    pub text: &'static str,
}

const fn genre(authority: &'static str, kind: &'static str, text: &'static str) -> Genre {
    Genre {
        authority,
        kind,
        lang: None,
        text,
    }
}

const fn genre_eng(authority: &'static str, kind: &'static str, text: &'static str) -> Genre {
    Genre {
        authority,
        kind,
        lang: Some("eng"),
        text,
    }
}

/// Genre set emitted for a group of Crossref types
#[derive(Debug)]
pub struct GenreRule {
    pub types: &'static [&'static str],
    pub genres: &'static [Genre],
}

/// DiVA / Swepub / KEV genre sets by `type_crossref`
pub static GENRE_RULES: &[GenreRule] = &[
    GenreRule {
        types: &["journal-article"],
        genres: &[
            genre("diva", "contentTypeCode", "refereed"),
            genre("diva", "publicationTypeCode", "article"),
            genre("svep", "publicationType", "art"),
            genre_eng("diva", "publicationType", "Article in journal"),
            genre_eng("kev", "publicationType", "article"),
        ],
    },
    GenreRule {
        types: &["proceedings-article"],
        genres: &[
            genre("diva", "contentTypeCode", "refereed"),
            genre("diva", "publicationTypeCode", "conferencePaper"),
            genre("svep", "publicationType", "kon"),
            genre_eng("diva", "publicationType", "Conference paper"),
            genre_eng("kev", "publicationType", "proceeding"),
            genre("diva", "publicationSubTypeCode", "publishedPaper"),
        ],
    },
    GenreRule {
        types: &["book-chapter", "book-part"],
        genres: &[
            genre("diva", "contentTypeCode", "science"),
            genre("diva", "publicationTypeCode", "chapter"),
            genre("svep", "publicationType", "kap"),
            genre_eng("diva", "publicationType", "Chapter in book"),
            genre_eng("kev", "publicationType", "bookitem"),
        ],
    },
    GenreRule {
        types: &["book", "monograph", "book-set"],
        genres: &[
            genre("diva", "contentTypeCode", "science"),
            genre("diva", "publicationTypeCode", "book"),
            genre("svep", "publicationType", "bok"),
            genre_eng("diva", "publicationType", "Book"),
            genre_eng("kev", "publicationType", "book"),
        ],
    },
    GenreRule {
        types: &["report"],
        genres: &[
            genre("diva", "contentTypeCode", "science"),
            genre("diva", "publicationTypeCode", "report"),
            genre("svep", "publicationType", "rap"),
            genre_eng("diva", "publicationType", "Report"),
            genre_eng("kev", "publicationType", "book"),
        ],
    },
    GenreRule {
        types: &["edited-book"],
        genres: &[
            genre("diva", "contentTypeCode", "science"),
            genre("diva", "publicationTypeCode", "collection"),
            genre("svep", "publicationType", "sam"),
            genre_eng("diva", "publicationType", "Collection (editor)"),
            genre_eng("kev", "publicationType", "book"),
        ],
    },
    GenreRule {
        types: &["posted-content"],
        genres: &[
            genre("diva", "contentTypeCode", "science"),
            genre("diva", "publicationTypeCode", "manuscript"),
            genre("svep", "publicationType", "vet"),
            genre_eng("diva", "publicationType", "Manuscript (preprint)"),
            genre_eng("kev", "publicationType", "preprint"),
        ],
    },
];

/// Genre set for any type not covered by [`GENRE_RULES`]
pub static FALLBACK_GENRES: &[Genre] = &[
    genre("diva", "contentTypeCode", "science"),
    genre("diva", "publicationTypeCode", "vet"),
    genre("svep", "publicationType", "ovr"),
    genre_eng("diva", "publicationType", "Other"),
];

/// ISO 639-1 -> ISO 639-2/B
pub static LANGUAGE_CODES: &[(&str, &str)] = &[
    ("en", "eng"),
    ("sv", "swe"),
    ("da", "dan"),
    ("de", "ger"),
    ("fr", "fre"),
    ("es", "spa"),
    ("it", "ita"),
    ("zh", "chi"),
    ("ru", "rus"),
    ("ja", "jpn"),
    ("no", "nor"),
    ("nl", "dut"),
    ("pt", "por"),
    ("fi", "fin"),
];

/// ISO 3166-1 alpha-2 -> English country name
pub static COUNTRY_NAMES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("SE", "Sweden"),
    ("GB", "United Kingdom"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("IT", "Italy"),
    ("ES", "Spain"),
    ("CN", "China"),
    ("JP", "Japan"),
    ("IN", "India"),
    ("BR", "Brazil"),
    ("RU", "Russia"),
    ("ZA", "South Africa"),
    ("DK", "Denmark"),
    ("NO", "Norway"),
    ("FI", "Finland"),
    ("NL", "Netherlands"),
    ("PT", "Portugal"),
    ("AU", "Australia"),
    ("CA", "Canada"),
    ("KR", "South Korea"),
    ("MX", "Mexico"),
    ("TR", "Turkey"),
    ("PL", "Poland"),
    ("BE", "Belgium"),
    ("AT", "Austria"),
    ("CH", "Switzerland"),
    ("IE", "Ireland"),
    ("NZ", "New Zealand"),
    ("HR", "Croatia"),
    ("CZ", "Czech Republic"),
    ("HU", "Hungary"),
    ("CL", "Chile"),
    ("JO", "Jordan"),
    ("UA", "Ukraine"),
    ("GR", "Greece"),
    ("EE", "Estonia"),
    ("SA", "Saudi Arabia"),
    ("MY", "Malaysia"),
    ("ET", "Ethiopia"),
    ("SG", "Singapore"),
    ("BD", "Bangladesh"),
    ("IR", "Iran"),
];

/// Immutable set of lookup tables used by one transform run
#[derive(Debug, Clone)]
pub struct LookupTables {
    languages: FxHashMap<String, String>,
    countries: FxHashMap<String, String>,
    genre_rules: &'static [GenreRule],
    fallback_genres: &'static [Genre],
}

impl LookupTables {
    /// Tables built from explicit data
    pub fn new<L, C>(
        languages: L,
        countries: C,
        genre_rules: &'static [GenreRule],
        fallback_genres: &'static [Genre],
    ) -> Self
    where
        L: IntoIterator<Item = (String, String)>,
        C: IntoIterator<Item = (String, String)>,
    {
        Self {
            languages: languages
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            countries: countries
                .into_iter()
                .map(|(k, v)| (k.to_ascii_uppercase(), v))
                .collect(),
            genre_rules,
            fallback_genres,
        }
    }

    /// The built-in tables
    pub fn builtin() -> Self {
        let owned = |pairs: &[(&str, &str)]| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|&(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        Self::new(
            owned(LANGUAGE_CODES),
            owned(COUNTRY_NAMES),
            GENRE_RULES,
            FALLBACK_GENRES,
        )
    }

    /// Add or override language mappings
    pub fn with_languages(mut self, extra: impl IntoIterator<Item = (String, String)>) -> Self {
        self.languages
            .extend(extra.into_iter().map(|(k, v)| (k.to_ascii_lowercase(), v)));
        self
    }

    /// Add or override country mappings
    pub fn with_countries(mut self, extra: impl IntoIterator<Item = (String, String)>) -> Self {
        self.countries
            .extend(extra.into_iter().map(|(k, v)| (k.to_ascii_uppercase(), v)));
        self
    }

    /// ISO 639-2/B code, or `und` when missing or unknown
    pub fn language(&self, code: Option<&str>) -> &str {
        code.and_then(|c| self.languages.get(&c.to_ascii_lowercase()))
            .map_or(UNDEFINED_LANGUAGE, String::as_str)
    }

    /// Country name for an alpha-2 code
    pub fn country(&self, code: &str) -> Option<&str> {
        self.countries
            .get(&code.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Genre set for a Crossref type, falling back to the generic set
    pub fn genres(&self, type_crossref: &str) -> &'static [Genre] {
        self.genre_rules
            .iter()
            .find(|rule| rule.types.contains(&type_crossref))
            .map_or(self.fallback_genres, |rule| rule.genres)
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        Self::builtin()
    }
}
