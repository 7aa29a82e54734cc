//! Documents as served by the bag index and bag store

use chrono::DateTime;
use uuid::Uuid;
use vaultload_core::models::BagInfo;

pub fn bag_info(bag_id: Uuid, base_id: Uuid, doi: &str, created: &str) -> BagInfo {
    BagInfo {
        bag_id,
        base_id,
        doi: doi.to_string(),
        created: DateTime::parse_from_rfc3339(created).unwrap(),
    }
}

/// Bag index response for `info`
pub fn index_entry(info: &BagInfo) -> String {
    serde_json::json!({ "result": { "bag-info": info } }).to_string()
}

pub fn sequence(members: &[Uuid]) -> String {
    members
        .iter()
        .map(|id| format!("{}\n", id))
        .collect()
}

/// `bag-info.txt` naming `account` as depositor
pub fn bag_info_txt(account: &str) -> String {
    format!(
        "Payload-Oxum: 1234.2\nBagging-Date: 2017-04-05\nEASY-User-Account: {}\nCreated: 2017-04-05T12:00:00.000+02:00\n",
        account
    )
}

/// Dataset metadata with the given `ddm:accessRights` and optional `ddm:available`
pub fn ddm(access_category: &str, available: Option<&str>) -> String {
    let available = available
        .map(|date| format!("<ddm:available>{}</ddm:available>", date))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ddm:DDM xmlns:ddm="http://easy.dans.knaw.nl/schemas/md/ddm/" xmlns:dc="http://purl.org/dc/elements/1.1/">
    <ddm:profile>
        <dc:title>Fixture</dc:title>
        <ddm:created>2017-04-05</ddm:created>
        {}
        <ddm:accessRights>{}</ddm:accessRights>
    </ddm:profile>
</ddm:DDM>"#,
        available, access_category
    )
}

/// `files.xml` listing `paths`; a `Some` rights value becomes `accessibleToRights`
pub fn files_xml(files: &[(&str, Option<&str>)]) -> String {
    let body: String = files
        .iter()
        .map(|(path, accessible_to)| match accessible_to {
            Some(rights) => format!(
                r#"<file filepath="{}"><accessibleToRights>{}</accessibleToRights></file>"#,
                path, rights
            ),
            None => format!(r#"<file filepath="{}"/>"#, path),
        })
        .collect();
    format!(
        r#"<files xmlns="http://easy.dans.knaw.nl/schemas/bag/metadata/files/">{}</files>"#,
        body
    )
}

/// SHA-1 manifest with a made-up checksum per path
pub fn manifest(paths: &[&str]) -> String {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| format!("{:040x}  {}\n", i + 1, path))
        .collect()
}
