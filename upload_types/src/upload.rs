use serde::{Deserialize, Serialize};

use crate::{FileId, FolderId};

/// One entry of the upload response. Only `id` is guaranteed; other fields
/// the server sends are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: FileId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
}
