use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Server-assigned handle for an uploaded file.
///
/// Serialized as a bare integer; as a JSON object key it appears as a
/// string-encoded integer, which serde_json handles transparently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub i64);

/// Destination folder for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub i64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FileId)
    }
}

impl FromStr for FolderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FolderId)
    }
}

impl From<i64> for FileId {
    fn from(value: i64) -> Self {
        FileId(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_file_id_as_json_key() {
        let parsed: HashMap<FileId, bool> = serde_json::from_str(r#"{"101": true, "102": false}"#).unwrap();
        assert_eq!(parsed.get(&FileId(101)), Some(&true));
        assert_eq!(parsed.get(&FileId(102)), Some(&false));
    }

    #[test]
    fn test_parse_and_display() {
        let id: FileId = " 42 ".parse().unwrap();
        assert_eq!(id, FileId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<FileId>().is_err());
        assert_eq!("7".parse::<FolderId>().unwrap().to_string(), "7");
    }
}
