use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who may download or see a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileAccessRights {
    Anonymous,
    Known,
    RestrictedGroup,
    RestrictedRequest,
    None,
}

impl FileAccessRights {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileAccessRights::Anonymous => "ANONYMOUS",
            FileAccessRights::Known => "KNOWN",
            FileAccessRights::RestrictedGroup => "RESTRICTED_GROUP",
            FileAccessRights::RestrictedRequest => "RESTRICTED_REQUEST",
            FileAccessRights::None => "NONE",
        }
    }
}

impl fmt::Display for FileAccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileAccessRights {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ANONYMOUS" => Ok(FileAccessRights::Anonymous),
            "KNOWN" => Ok(FileAccessRights::Known),
            "RESTRICTED_GROUP" => Ok(FileAccessRights::RestrictedGroup),
            "RESTRICTED_REQUEST" => Ok(FileAccessRights::RestrictedRequest),
            "NONE" => Ok(FileAccessRights::None),
            other => Err(format!("unknown file access rights: {}", other)),
        }
    }
}

/// Dataset-level access category from `ddm:accessRights`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessCategory {
    OpenAccess,
    OpenAccessForRegisteredUsers,
    GroupAccess,
    RequestPermission,
    NoAccess,
}

impl AccessCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessCategory::OpenAccess => "OPEN_ACCESS",
            AccessCategory::OpenAccessForRegisteredUsers => "OPEN_ACCESS_FOR_REGISTERED_USERS",
            AccessCategory::GroupAccess => "GROUP_ACCESS",
            AccessCategory::RequestPermission => "REQUEST_PERMISSION",
            AccessCategory::NoAccess => "NO_ACCESS",
        }
    }

    /// File access implied by the category for files without explicit rights
    pub fn default_accessible_to(&self) -> FileAccessRights {
        match self {
            AccessCategory::OpenAccess => FileAccessRights::Anonymous,
            AccessCategory::OpenAccessForRegisteredUsers => FileAccessRights::Known,
            AccessCategory::GroupAccess => FileAccessRights::RestrictedGroup,
            AccessCategory::RequestPermission => FileAccessRights::RestrictedRequest,
            AccessCategory::NoAccess => FileAccessRights::None,
        }
    }
}

impl fmt::Display for AccessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "OPEN_ACCESS" => Ok(AccessCategory::OpenAccess),
            "OPEN_ACCESS_FOR_REGISTERED_USERS" => Ok(AccessCategory::OpenAccessForRegisteredUsers),
            "GROUP_ACCESS" => Ok(AccessCategory::GroupAccess),
            "REQUEST_PERMISSION" => Ok(AccessCategory::RequestPermission),
            "NO_ACCESS" => Ok(AccessCategory::NoAccess),
            other => Err(format!("unknown access category: {}", other)),
        }
    }
}

/// Access and visibility of one file; `None` fields are unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRights {
    pub accessible_to: Option<FileAccessRights>,
    pub visible_to: Option<FileAccessRights>,
    pub embargo_date: Option<NaiveDate>,
}

impl FileRights {
    /// Fill every unset field from `defaults`. Set fields are kept.
    pub fn apply_defaults(&self, defaults: &FileRights) -> FileRights {
        FileRights {
            accessible_to: self.accessible_to.or(defaults.accessible_to),
            visible_to: self.visible_to.or(defaults.visible_to),
            embargo_date: self.embargo_date.or(defaults.embargo_date),
        }
    }
}
