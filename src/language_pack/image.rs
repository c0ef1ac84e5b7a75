use serde::{Deserialize, Serialize};

/// Image record as stored by the image registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Create/update payload handed to the image registry.
///
/// `name` stays `None` when the language pack never set one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDict {
    pub name: Option<String>,
    pub tags: Vec<String>,
}
