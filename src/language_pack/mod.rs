//! Language pack records and their image-tag encoding.
//!
//! A language pack lives in the image registry as an ordinary image whose
//! tags carry its fields (see [`tag`] for the micro-format):
//! - [`LanguagePack::from_image`] parses an [`Image`] into a record,
//! - [`LanguagePack::as_image_dict`] turns a record back into the
//!   [`ImageDict`] payload the registry expects.
//!
//! Compiler and runtime versions come back sorted and de-duplicated; every
//! other populated field round-trips unchanged. Records that could not
//! round-trip (an attribute key, build tool type or OS name containing
//! `::`) are refused by the encoder.

pub mod image;
pub mod tag;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub use image::{Image, ImageDict};
pub use tag::{Tag, TagError};

/// Resource type reported for every decoded language pack
pub const RESOURCE_TYPE: &str = "language_pack";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub version: String,
}

impl BuildTool {
    pub fn new(tool_type: &str, version: &str) -> Self {
        Self {
            tool_type: tool_type.to_string(),
            version: version.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsPlatform {
    #[serde(rename = "OS")]
    pub os: String,
    pub version: String,
}

/// A language pack as seen by API clients.
///
/// Every field is optional: `None` means "unset" and is never encoded.
/// `uri`, `resource_type`, `status`, `tags`, `project_id` and `user_id` are
/// informational and do not take part in the tag encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguagePack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_pack_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_versions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_versions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_implementation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_tool_chain: Option<Vec<BuildTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_platform: Option<OsPlatform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
}

impl LanguagePack {
    /// Decode a language pack from an image record.
    ///
    /// Tags outside the `solum::lp` namespace, unknown categories and
    /// malformed tags are skipped so newer images still decode.
    pub fn from_image(image: &Image, host_url: &str) -> Self {
        let mut compiler_versions = BTreeSet::new();
        let mut runtime_versions = BTreeSet::new();
        let mut build_tool_chain = Vec::new();
        let mut attributes = BTreeMap::new();

        let mut lp = LanguagePack {
            uuid: Some(image.id.clone()),
            uri: Some(format!(
                "{}/v1/language_packs/{}",
                host_url.trim_end_matches('/'),
                image.id
            )),
            resource_type: Some(RESOURCE_TYPE.to_string()),
            name: image.name.clone(),
            status: image.status.clone(),
            tags: Some(image.tags.clone()),
            ..Default::default()
        };

        for raw in &image.tags {
            let tag = match raw.parse::<Tag>() {
                Ok(tag) => tag,
                Err(err @ TagError::ForeignNamespace(_)) => {
                    trace!("Skipping tag: {}", err);
                    continue;
                }
                Err(err) => {
                    debug!("Skipping tag on image {}: {}", image.id, err);
                    continue;
                }
            };

            match tag {
                Tag::Namespace => {}
                Tag::Type(value) => lp.language_pack_type = Some(value),
                Tag::Description(value) => lp.description = Some(value),
                Tag::CompilerVersion(value) => {
                    compiler_versions.insert(value);
                }
                Tag::RuntimeVersion(value) => {
                    runtime_versions.insert(value);
                }
                Tag::Implementation(value) => lp.language_implementation = Some(value),
                Tag::BuildTool { tool_type, version } => {
                    build_tool_chain.push(BuildTool { tool_type, version })
                }
                Tag::OsPlatform { os, version } => lp.os_platform = Some(OsPlatform { os, version }),
                Tag::Attribute { key, value } => {
                    attributes.insert(key, value);
                }
            }
        }

        if !compiler_versions.is_empty() {
            lp.compiler_versions = Some(compiler_versions.into_iter().collect());
        }
        if !runtime_versions.is_empty() {
            lp.runtime_versions = Some(runtime_versions.into_iter().collect());
        }
        if !build_tool_chain.is_empty() {
            lp.build_tool_chain = Some(build_tool_chain);
        }
        if !attributes.is_empty() {
            lp.attributes = Some(attributes);
        }

        lp
    }

    /// Typed tags for every set field, namespace marker first
    pub fn to_tags(&self) -> Result<Vec<Tag>, TagError> {
        let mut tags = vec![Tag::Namespace];

        if let Some(value) = &self.language_pack_type {
            tags.push(Tag::Type(value.clone()));
        }
        if let Some(value) = &self.description {
            tags.push(Tag::Description(value.clone()));
        }
        for version in self.compiler_versions.iter().flatten() {
            tags.push(Tag::CompilerVersion(version.clone()));
        }
        for version in self.runtime_versions.iter().flatten() {
            tags.push(Tag::RuntimeVersion(version.clone()));
        }
        if let Some(value) = &self.language_implementation {
            tags.push(Tag::Implementation(value.clone()));
        }
        for tool in self.build_tool_chain.iter().flatten() {
            tags.push(Tag::BuildTool {
                tool_type: tool.tool_type.clone(),
                version: tool.version.clone(),
            });
        }
        if let Some(platform) = &self.os_platform {
            tags.push(Tag::OsPlatform {
                os: platform.os.clone(),
                version: platform.version.clone(),
            });
        }
        for (key, value) in self.attributes.iter().flatten() {
            tags.push(Tag::Attribute {
                key: key.clone(),
                value: value.clone(),
            });
        }

        for tag in &tags {
            tag.check()?;
        }
        Ok(tags)
    }

    /// Encode into the payload stored by the image registry
    pub fn as_image_dict(&self) -> Result<ImageDict, TagError> {
        Ok(ImageDict {
            name: self.name.clone(),
            tags: self.to_tags()?.iter().map(Tag::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::tag::*;
    use super::*;

    fn image_sample() -> Image {
        Image {
            id: "bc68cd73".to_string(),
            name: Some("nodeus".to_string()),
            status: Some("active".to_string()),
            tags: [
                "solum::lp::type::fake_type",
                "solum::lp::description::a fake description",
                "solum::lp::compiler_version::1.3",
                "solum::lp::compiler_version::1.4",
                "solum::lp::compiler_version::1.5",
                "solum::lp::runtime_version::1.4",
                "solum::lp::runtime_version::1.5",
                "solum::lp::runtime_version::1.6",
                "solum::lp::implementation::Sun",
                "solum::lp::build_tool::maven::3.0",
                "solum::lp::build_tool::ant::2.1",
                "solum::lp::os_platform::Ubuntu::12.04",
                "solum::lp::attribute::attr1key::attr1value",
                "solum::lp::attribute::attr2key::attr2value",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            self_link: Some("/v2/images/bc68cd73".to_string()),
        }
    }

    fn lp_sample() -> LanguagePack {
        let mut attributes = BTreeMap::new();
        attributes.insert("attr1key".to_string(), "attr1value".to_string());
        attributes.insert("attr2key".to_string(), "attr2value".to_string());

        LanguagePack {
            name: Some("fake_name".to_string()),
            description: Some("A test to create language_pack".to_string()),
            project_id: Some("project_id".to_string()),
            user_id: Some("user_id".to_string()),
            language_implementation: Some("Sun".to_string()),
            language_pack_type: Some("Java".to_string()),
            compiler_versions: Some(vec!["1.3".into(), "1.4".into(), "1.5".into()]),
            runtime_versions: Some(vec!["1.5".into(), "1.6".into(), "1.7".into()]),
            os_platform: Some(OsPlatform {
                os: "Ubuntu".to_string(),
                version: "12.04".to_string(),
            }),
            build_tool_chain: Some(vec![
                BuildTool::new("maven", "3.0"),
                BuildTool::new("ant", "2.1"),
            ]),
            attributes: Some(attributes),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_image() {
        let lp = LanguagePack::from_image(&image_sample(), "fake_host_url");

        assert_eq!(lp.name.as_deref(), Some("nodeus"));
        assert_eq!(lp.description.as_deref(), Some("a fake description"));
        assert_eq!(lp.language_pack_type.as_deref(), Some("fake_type"));
        assert_eq!(lp.uuid.as_deref(), Some("bc68cd73"));
        assert_eq!(
            lp.uri.as_deref(),
            Some("fake_host_url/v1/language_packs/bc68cd73")
        );
        assert_eq!(lp.resource_type.as_deref(), Some("language_pack"));
        assert_eq!(lp.status.as_deref(), Some("active"));
        assert_eq!(
            lp.compiler_versions,
            Some(vec!["1.3".to_string(), "1.4".to_string(), "1.5".to_string()])
        );
        assert_eq!(
            lp.runtime_versions,
            Some(vec!["1.4".to_string(), "1.5".to_string(), "1.6".to_string()])
        );
        assert_eq!(lp.language_implementation.as_deref(), Some("Sun"));

        let tools = lp.build_tool_chain.unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].tool_type, "maven");
        assert_eq!(tools[0].version, "3.0");
        assert_eq!(tools[1].tool_type, "ant");

        assert_eq!(
            lp.os_platform,
            Some(OsPlatform {
                os: "Ubuntu".to_string(),
                version: "12.04".to_string()
            })
        );

        let attributes = lp.attributes.unwrap();
        assert_eq!(attributes.get("attr1key").map(String::as_str), Some("attr1value"));
        assert_eq!(attributes.get("attr2key").map(String::as_str), Some("attr2value"));
    }

    #[test]
    fn test_from_image_sorts_and_dedups_versions() {
        let mut image = image_sample();
        image.tags = vec![
            "solum::lp".to_string(),
            "solum::lp::compiler_version::1.5".to_string(),
            "solum::lp::compiler_version::1.3".to_string(),
            "solum::lp::compiler_version::1.5".to_string(),
            "solum::lp::compiler_version::1.4".to_string(),
        ];

        let lp = LanguagePack::from_image(&image, "http://host");
        assert_eq!(
            lp.compiler_versions,
            Some(vec!["1.3".to_string(), "1.4".to_string(), "1.5".to_string()])
        );
        assert_eq!(lp.runtime_versions, None);
    }

    #[test]
    fn test_from_image_skips_malformed_and_unknown_tags() {
        let mut image = image_sample();
        image.tags = vec![
            "solum::lp".to_string(),
            "some::other::tag".to_string(),
            "solum::lp::type".to_string(),
            "solum::lp::build_tool::maven".to_string(),
            "solum::lp::future_field::whatever".to_string(),
            "solum::lp::os_platform::Ubuntu::12.04".to_string(),
            "solum::lp::os_platform::Fedora::20".to_string(),
        ];

        let lp = LanguagePack::from_image(&image, "http://host/");
        assert_eq!(lp.language_pack_type, None);
        assert_eq!(lp.build_tool_chain, None);
        assert_eq!(lp.uri.as_deref(), Some("http://host/v1/language_packs/bc68cd73"));
        assert_eq!(
            lp.os_platform,
            Some(OsPlatform {
                os: "Fedora".to_string(),
                version: "20".to_string()
            })
        );
    }

    #[test]
    fn test_as_image_dict() {
        let lp = lp_sample();
        let image_dict = lp.as_image_dict().unwrap();
        let tags = &image_dict.tags;

        assert_eq!(image_dict.name, lp.name);
        assert_eq!(tags[0], NAMESPACE);
        assert!(tags.contains(&format!("{}Java", TYPE)));
        assert!(tags.contains(&format!("{}A test to create language_pack", DESCRIPTION)));
        for version in ["1.3", "1.4", "1.5"] {
            assert!(tags.contains(&format!("{}{}", COMPILER_VERSION, version)));
        }
        for version in ["1.5", "1.6", "1.7"] {
            assert!(tags.contains(&format!("{}{}", RUNTIME_VERSION, version)));
        }
        assert!(tags.contains(&format!("{}Sun", IMPLEMENTATION)));
        assert!(tags.contains(&format!("{}maven::3.0", BUILD_TOOL)));
        assert!(tags.contains(&format!("{}ant::2.1", BUILD_TOOL)));
        assert!(tags.contains(&format!("{}Ubuntu::12.04", OS_PLATFORM)));
        assert!(tags.contains(&format!("{}attr1key::attr1value", ATTRIBUTE)));
        assert!(tags.contains(&format!("{}attr2key::attr2value", ATTRIBUTE)));
        assert!(!tags.iter().any(|t| t.contains("project_id")));
    }

    #[test]
    fn test_as_image_dict_tag_order() {
        let tags = lp_sample().as_image_dict().unwrap().tags;
        assert_eq!(
            tags,
            vec![
                "solum::lp",
                "solum::lp::type::Java",
                "solum::lp::description::A test to create language_pack",
                "solum::lp::compiler_version::1.3",
                "solum::lp::compiler_version::1.4",
                "solum::lp::compiler_version::1.5",
                "solum::lp::runtime_version::1.5",
                "solum::lp::runtime_version::1.6",
                "solum::lp::runtime_version::1.7",
                "solum::lp::implementation::Sun",
                "solum::lp::build_tool::maven::3.0",
                "solum::lp::build_tool::ant::2.1",
                "solum::lp::os_platform::Ubuntu::12.04",
                "solum::lp::attribute::attr1key::attr1value",
                "solum::lp::attribute::attr2key::attr2value",
            ]
        );
    }

    #[test]
    fn test_as_image_dict_unset() {
        let image_dict = LanguagePack::default().as_image_dict().unwrap();
        assert_eq!(
            image_dict,
            ImageDict {
                name: None,
                tags: vec!["solum::lp".to_string()],
            }
        );
    }

    #[test]
    fn test_decode_then_encode_keeps_tag_set() {
        let image = image_sample();
        let lp = LanguagePack::from_image(&image, "http://host");
        let mut reencoded = lp.as_image_dict().unwrap().tags;
        reencoded.retain(|t| t != NAMESPACE);

        let mut original = image.tags.clone();
        original.sort();
        reencoded.sort();
        assert_eq!(original, reencoded);
    }

    #[test]
    fn test_compiler_versions_come_back_sorted_unique() {
        let lp = LanguagePack {
            compiler_versions: Some(vec!["1.5".into(), "1.3".into(), "1.4".into(), "1.3".into()]),
            ..Default::default()
        };
        let image = Image {
            id: "abc".to_string(),
            name: None,
            status: None,
            tags: lp.as_image_dict().unwrap().tags,
            self_link: None,
        };

        let decoded = LanguagePack::from_image(&image, "");
        assert_eq!(
            decoded.compiler_versions,
            Some(vec!["1.3".to_string(), "1.4".to_string(), "1.5".to_string()])
        );
    }

    #[test]
    fn test_as_image_dict_refuses_lossy_fields() {
        let mut attributes = BTreeMap::new();
        attributes.insert("a::b".to_string(), "c".to_string());
        let lp = LanguagePack {
            attributes: Some(attributes),
            ..lp_sample()
        };
        assert_eq!(
            lp.as_image_dict(),
            Err(TagError::AmbiguousKey {
                category: "attribute".to_string(),
                value: "a::b".to_string()
            })
        );

        let lp = LanguagePack {
            build_tool_chain: Some(vec![BuildTool::new("mvn::x", "3.0")]),
            ..lp_sample()
        };
        assert!(matches!(
            lp.as_image_dict(),
            Err(TagError::AmbiguousKey { category, .. }) if category == "build_tool"
        ));

        let lp = LanguagePack {
            os_platform: Some(OsPlatform {
                os: "Ubuntu::LTS".to_string(),
                version: "12.04".to_string(),
            }),
            ..lp_sample()
        };
        assert!(lp.to_tags().is_err());
    }

    #[test]
    fn test_second_part_may_contain_separator() {
        let mut attributes = BTreeMap::new();
        attributes.insert("url".to_string(), "http://x::y".to_string());
        let lp = LanguagePack {
            attributes: Some(attributes.clone()),
            build_tool_chain: Some(vec![BuildTool::new("maven", "3.0::beta")]),
            ..Default::default()
        };
        let image = Image {
            id: "abc".to_string(),
            name: None,
            status: None,
            tags: lp.as_image_dict().unwrap().tags,
            self_link: None,
        };

        let decoded = LanguagePack::from_image(&image, "");
        assert_eq!(decoded.attributes, Some(attributes));
        assert_eq!(
            decoded.build_tool_chain,
            Some(vec![BuildTool::new("maven", "3.0::beta")])
        );
    }

    #[test]
    fn test_language_pack_json_shape() {
        let lp: LanguagePack = serde_json::from_value(serde_json::json!({
            "name": "fake_name",
            "project_id": "project_id",
            "build_tool_chain": [{"type": "maven", "version": "3.0"}],
            "os_platform": {"OS": "Ubuntu", "version": "12.04"}
        }))
        .unwrap();

        assert_eq!(lp.name.as_deref(), Some("fake_name"));
        assert_eq!(lp.build_tool_chain, Some(vec![BuildTool::new("maven", "3.0")]));
        assert_eq!(lp.os_platform.as_ref().map(|p| p.os.as_str()), Some("Ubuntu"));

        let value = serde_json::to_value(&lp).unwrap();
        assert_eq!(value["os_platform"]["OS"], "Ubuntu");
        assert!(value.get("description").is_none());
    }
}
