use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::HashMap;
use vaultload_core::models::{FileAccessRights, FileRights};
use vaultload_core::{VaultError, VaultResult};

use super::xml_error;

const DOCUMENT: &str = "files.xml";

#[derive(Debug, Clone, Copy)]
enum Field {
    AccessibleTo,
    VisibleTo,
}

fn filepath(element: &BytesStart<'_>) -> VaultResult<String> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| xml_error(DOCUMENT, e))?;
        if attr.key.local_name().as_ref() == b"filepath" {
            let value = attr.unescape_value().map_err(|e| xml_error(DOCUMENT, e))?;
            return Ok(value.trim().to_string());
        }
    }
    Err(VaultError::Parse(format!(
        "{}: file element without filepath",
        DOCUMENT
    )))
}

/// Explicit rights per payload path from `metadata/files.xml`.
///
/// Paths without `accessibleToRights` or `visibleToRights` still get an entry,
/// with those fields unset. Empty input gives an empty map.
pub fn parse_file_rights(xml: &str) -> VaultResult<HashMap<String, FileRights>> {
    let mut rights = HashMap::new();
    if xml.trim().is_empty() {
        return Ok(rights);
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current_file: Option<(String, FileRights)> = None;
    let mut current_field: Option<Field> = None;

    loop {
        match reader.read_event().map_err(|e| xml_error(DOCUMENT, e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"file" => current_file = Some((filepath(&e)?, FileRights::default())),
                b"accessibleToRights" if current_file.is_some() => {
                    current_field = Some(Field::AccessibleTo)
                }
                b"visibleToRights" if current_file.is_some() => {
                    current_field = Some(Field::VisibleTo)
                }
                _ => current_field = None,
            },
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"file" {
                    rights.insert(filepath(&e)?, FileRights::default());
                }
            }
            Event::Text(t) => {
                if let (Some(field), Some((_, file_rights))) = (current_field, current_file.as_mut())
                {
                    let text = t.unescape().map_err(|e| xml_error(DOCUMENT, e))?;
                    let value = text
                        .parse::<FileAccessRights>()
                        .map_err(|e| xml_error(DOCUMENT, e))?;
                    match field {
                        Field::AccessibleTo => file_rights.accessible_to = Some(value),
                        Field::VisibleTo => file_rights.visible_to = Some(value),
                    }
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"file" {
                    if let Some((path, file_rights)) = current_file.take() {
                        rights.insert(path, file_rights);
                    }
                }
                current_field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(rights)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<files xmlns:dcterms="http://purl.org/dc/terms/"
       xmlns="http://easy.dans.knaw.nl/schemas/bag/metadata/files/">
    <file filepath="data/a.txt">
        <dcterms:format>text/plain</dcterms:format>
        <accessibleToRights>RESTRICTED_REQUEST</accessibleToRights>
        <visibleToRights>KNOWN</visibleToRights>
    </file>
    <file filepath="data/b &amp; c.pdf">
        <dcterms:format>application/pdf</dcterms:format>
    </file>
    <file filepath="data/empty.bin"/>
</files>"#;

    #[test]
    fn test_parse_file_rights() {
        let rights = parse_file_rights(FILES_XML).unwrap();
        assert_eq!(rights.len(), 3);
        assert_eq!(
            rights["data/a.txt"],
            FileRights {
                accessible_to: Some(FileAccessRights::RestrictedRequest),
                visible_to: Some(FileAccessRights::Known),
                embargo_date: None,
            }
        );
        assert_eq!(rights["data/b & c.pdf"], FileRights::default());
        assert_eq!(rights["data/empty.bin"], FileRights::default());
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_file_rights("").unwrap().is_empty());
        assert!(parse_file_rights("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_file_without_filepath_is_rejected() {
        assert!(parse_file_rights("<files><file></file></files>").is_err());
    }

    #[test]
    fn test_unknown_rights_value_is_rejected() {
        let xml = r#"<files><file filepath="data/a.txt">
            <accessibleToRights>EVERYONE</accessibleToRights>
        </file></files>"#;
        assert!(parse_file_rights(xml).is_err());
    }
}
