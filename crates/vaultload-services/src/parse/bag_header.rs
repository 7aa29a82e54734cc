use uuid::Uuid;
use vaultload_core::{VaultError, VaultResult};

/// Key of the `bag-info.txt` line naming the depositor account
pub const ACCOUNT_FIELD: &str = "EASY-User-Account";

/// Depositor account from the first `EASY-User-Account` line of `bag-info.txt`
pub fn parse_depositor(bag_id: Uuid, bag_info_txt: &str) -> VaultResult<String> {
    bag_info_txt
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == ACCOUNT_FIELD)
        .map(|(_, value)| value.trim().to_string())
        .ok_or(VaultError::MissingHeaderField {
            bag_id,
            field: ACCOUNT_FIELD,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAG_INFO: &str = "Payload-Oxum: 1.2\r\n\
        Bagging-Date: 2016-11-13\r\n\
        EASY-User-Account: user001\r\n\
        EASY-User-Account: someone-else\r\n\
        Created: 2016-11-13T00:41:11.000+01:00\r\n";

    #[test]
    fn test_first_account_line_wins() {
        assert_eq!(parse_depositor(Uuid::nil(), BAG_INFO).unwrap(), "user001");
    }

    #[test]
    fn test_missing_account_is_fatal() {
        let err = parse_depositor(Uuid::nil(), "Payload-Oxum: 1.2\n").unwrap_err();
        assert!(matches!(
            err,
            VaultError::MissingHeaderField {
                field: ACCOUNT_FIELD,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_header_is_fatal() {
        assert!(parse_depositor(Uuid::nil(), "").is_err());
    }
}
