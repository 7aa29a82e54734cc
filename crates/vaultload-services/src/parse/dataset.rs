//! Dataset metadata (`metadata/dataset.xml`, DDM)
//!
//! Only the fields that determine the expected dataset are read: the access
//! category, availability and creation dates from `ddm:profile`, and the first
//! URI-typed `dcterms:license`.

use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use vaultload_core::models::AccessCategory;
use vaultload_core::{VaultError, VaultResult};

use super::xml_error;

const DOCUMENT: &str = "dataset.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetMetadata {
    pub access_category: AccessCategory,
    /// `ddm:available`
    pub available: Option<NaiveDate>,
    /// `ddm:created`, as written
    pub created: Option<String>,
    /// Explicit license URI, if any
    pub license: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    AccessRights,
    Available,
    Created,
    License,
}

/// `xsi:type` ending in `URI`, e.g. `dcterms:URI`
fn is_uri_typed(element: &BytesStart<'_>) -> VaultResult<bool> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| xml_error(DOCUMENT, e))?;
        if attr.key.local_name().as_ref() == b"type" {
            let value = attr.unescape_value().map_err(|e| xml_error(DOCUMENT, e))?;
            return Ok(value.trim().ends_with("URI"));
        }
    }
    Ok(false)
}

/// Accepts `YYYY-MM-DD` with an optional time part, `YYYY-MM` and `YYYY`.
pub fn parse_ddm_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d") {
        return Some(date);
    }
    value
        .parse::<i32>()
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
}

impl DatasetMetadata {
    pub fn parse(xml: &str) -> VaultResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut in_profile = false;
        let mut current: Option<Field> = None;
        let mut access_category = None;
        let mut available = None;
        let mut created = None;
        let mut license = None;

        loop {
            match reader.read_event().map_err(|e| xml_error(DOCUMENT, e))? {
                Event::Start(e) => {
                    current = match e.local_name().as_ref() {
                        b"profile" => {
                            in_profile = true;
                            None
                        }
                        b"accessRights" if in_profile => Some(Field::AccessRights),
                        b"available" if in_profile => Some(Field::Available),
                        b"created" if in_profile => Some(Field::Created),
                        b"license" if license.is_none() && is_uri_typed(&e)? => {
                            Some(Field::License)
                        }
                        _ => None,
                    };
                }
                Event::Text(t) => {
                    if let Some(field) = current {
                        let text = t.unescape().map_err(|e| xml_error(DOCUMENT, e))?;
                        let value = text.trim();
                        match field {
                            Field::AccessRights => {
                                access_category = Some(
                                    value
                                        .parse::<AccessCategory>()
                                        .map_err(|e| xml_error(DOCUMENT, e))?,
                                );
                            }
                            Field::Available => {
                                available = parse_ddm_date(value);
                                if available.is_none() {
                                    tracing::warn!(value, "Unparseable ddm:available");
                                }
                            }
                            Field::Created => created = Some(value.to_string()),
                            Field::License => license = Some(value.to_string()),
                        }
                    }
                }
                Event::End(e) => {
                    if e.local_name().as_ref() == b"profile" {
                        in_profile = false;
                    }
                    current = None;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let access_category = access_category.ok_or_else(|| {
            VaultError::Parse(format!("{}: no ddm:accessRights in ddm:profile", DOCUMENT))
        })?;

        Ok(DatasetMetadata {
            access_category,
            available,
            created,
            license,
        })
    }

    /// Year of `ddm:created`
    pub fn citation_year(&self) -> Option<String> {
        self.created
            .as_deref()
            .and_then(|created| created.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ddm:DDM xmlns:ddm="http://easy.dans.knaw.nl/schemas/md/ddm/"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <ddm:profile>
        <dc:title xmlns:dc="http://purl.org/dc/elements/1.1/">Test &amp; title</dc:title>
        <ddm:created>2016-11-12</ddm:created>
        <ddm:available>2032-01-31</ddm:available>
        <ddm:audience>D24000</ddm:audience>
        <ddm:accessRights>REQUEST_PERMISSION</ddm:accessRights>
    </ddm:profile>
    <ddm:dcmiMetadata>
        <dcterms:accessRights>Free text about access</dcterms:accessRights>
        <dcterms:created>1999</dcterms:created>
        <dcterms:license>Some prose license</dcterms:license>
        <dcterms:license xsi:type="dcterms:URI">http://creativecommons.org/licenses/by/4.0</dcterms:license>
        <dcterms:license xsi:type="dcterms:URI">http://example.org/second</dcterms:license>
    </ddm:dcmiMetadata>
</ddm:DDM>"#;

    #[test]
    fn test_parse_profile_and_license() {
        let metadata = DatasetMetadata::parse(DDM).unwrap();
        assert_eq!(metadata.access_category, AccessCategory::RequestPermission);
        assert_eq!(metadata.available, NaiveDate::from_ymd_opt(2032, 1, 31));
        assert_eq!(metadata.created.as_deref(), Some("2016-11-12"));
        assert_eq!(metadata.citation_year().as_deref(), Some("2016"));
        assert_eq!(
            metadata.license.as_deref(),
            Some("http://creativecommons.org/licenses/by/4.0")
        );
    }

    #[test]
    fn test_parse_without_license() {
        let xml = r#"<ddm:DDM xmlns:ddm="http://easy.dans.knaw.nl/schemas/md/ddm/">
            <ddm:profile><ddm:accessRights>OPEN_ACCESS</ddm:accessRights></ddm:profile>
        </ddm:DDM>"#;
        let metadata = DatasetMetadata::parse(xml).unwrap();
        assert_eq!(metadata.access_category, AccessCategory::OpenAccess);
        assert_eq!(metadata.license, None);
        assert_eq!(metadata.available, None);
        assert_eq!(metadata.citation_year(), None);
    }

    #[test]
    fn test_missing_access_rights_is_rejected() {
        let xml = r#"<ddm:DDM xmlns:ddm="http://easy.dans.knaw.nl/schemas/md/ddm/">
            <ddm:profile><ddm:created>2016</ddm:created></ddm:profile>
        </ddm:DDM>"#;
        assert!(DatasetMetadata::parse(xml).is_err());
    }

    #[test]
    fn test_unknown_access_category_is_rejected() {
        let xml = r#"<ddm:DDM xmlns:ddm="http://easy.dans.knaw.nl/schemas/md/ddm/">
            <ddm:profile><ddm:accessRights>EVERYBODY</ddm:accessRights></ddm:profile>
        </ddm:DDM>"#;
        assert!(DatasetMetadata::parse(xml).is_err());
    }

    #[test]
    fn test_malformed_xml_is_rejected() {
        assert!(DatasetMetadata::parse("<ddm:DDM><ddm:profile></ddm:DDM>").is_err());
    }

    #[test]
    fn test_parse_ddm_date_variants() {
        assert_eq!(
            parse_ddm_date("2016-11-13T00:41:11.000+01:00"),
            NaiveDate::from_ymd_opt(2016, 11, 13)
        );
        assert_eq!(parse_ddm_date("2016-11"), NaiveDate::from_ymd_opt(2016, 11, 1));
        assert_eq!(parse_ddm_date("2016"), NaiveDate::from_ymd_opt(2016, 1, 1));
        assert_eq!(parse_ddm_date("soon"), None);
    }
}
