/*!
 * JSON snapshots of a bean tree, loaded into a `MemoryServer`
 *
 * A snapshot lists beans with an optional parent. Loading fills in the
 * `Parent` and `Children` attributes the tree navigation relies on, using
 * the null object name for the root's parent.
 */

use amx_core_interface::{Descriptor, ObjectName, Value, NULL_OBJECT_NAME};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{AmxError, Result};
use crate::system::{MemoryBean, MemoryServer};

/// One bean in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeanSnapshot {
    pub object_name: ObjectName,

    #[serde(default)]
    pub class_name: String,

    #[serde(default)]
    pub description: String,

    /// Containing bean; `None` for the root
    #[serde(default)]
    pub parent: Option<ObjectName>,

    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,

    /// Attributes that reject writes
    #[serde(default)]
    pub read_only: Vec<String>,

    #[serde(default)]
    pub descriptor: Descriptor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub beans: Vec<BeanSnapshot>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| AmxError::Snapshot {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Build a `MemoryServer` holding every bean of the snapshot.
    ///
    /// `Name` defaults to the `name` key property (or `type` when there is no
    /// `name`). `Parent` and `Children` are derived from the `parent` links
    /// unless the snapshot sets them explicitly; children keep snapshot order.
    pub fn into_server(self, source: &Path) -> Result<MemoryServer> {
        let mut seen = HashSet::new();
        for bean in &self.beans {
            if !seen.insert(bean.object_name.clone()) {
                return Err(AmxError::Snapshot {
                    path: source.to_path_buf(),
                    reason: format!("duplicate bean {}", bean.object_name),
                });
            }
        }

        let mut children: HashMap<ObjectName, Vec<Value>> = HashMap::new();
        for bean in &self.beans {
            if let Some(parent) = &bean.parent {
                if !seen.contains(parent) {
                    warn!(
                        "Bean {} names unknown parent {}; it will not be listed as a child",
                        bean.object_name, parent
                    );
                    continue;
                }
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(Value::ObjectName(bean.object_name.clone()));
            }
        }

        let server = MemoryServer::new();
        for snap in self.beans {
            let mut bean =
                MemoryBean::new(snap.class_name.as_str()).description(snap.description.as_str());

            for (name, value) in snap.attributes.iter() {
                bean = if snap.read_only.contains(name) {
                    bean.read_only_attribute(name.as_str(), value.clone())
                } else {
                    bean.attribute(name.as_str(), value.clone())
                };
            }

            if !snap.attributes.contains_key("Name") {
                let default_name = snap
                    .object_name
                    .key_property("name")
                    .or_else(|| snap.object_name.key_property("type"))
                    .unwrap_or_default();
                bean = bean.read_only_attribute("Name", default_name);
            }
            if !snap.attributes.contains_key("Parent") {
                let parent = snap.parent.clone().unwrap_or_else(|| NULL_OBJECT_NAME.clone());
                bean = bean.read_only_attribute("Parent", parent);
            }
            if !snap.attributes.contains_key("Children") {
                let kids = children.remove(&snap.object_name).unwrap_or_default();
                bean = bean.read_only_attribute("Children", Value::Array(kids));
            }

            for (field, value) in snap.descriptor.iter() {
                bean = bean.field(field, value.clone());
            }

            server.insert(snap.object_name, bean);
        }

        info!("Loaded {} beans from {}", server.len(), source.display());
        Ok(server)
    }
}

/// Load a snapshot file straight into a server
pub fn load_server(path: &Path) -> Result<MemoryServer> {
    Snapshot::from_file(path)?.into_server(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amx_core_interface::MBeanConnection;

    fn on(s: &str) -> ObjectName {
        ObjectName::new(s).unwrap()
    }

    const SAMPLE: &str = r#"{
        "beans": [
            {
                "object_name": "amx:pp=,type=domain-root",
                "class_name": "DomainRoot"
            },
            {
                "object_name": "amx:pp=/,type=cache,name=cache-0",
                "class_name": "Cache",
                "parent": "amx:pp=,type=domain-root",
                "attributes": { "Size": { "int": 128 } },
                "descriptor": { "amx.group": { "string": "monitoring" } }
            },
            {
                "object_name": "amx:pp=/,type=pool",
                "parent": "amx:pp=,type=domain-root"
            }
        ]
    }"#;

    fn sample() -> MemoryServer {
        let snapshot: Snapshot = serde_json::from_str(SAMPLE).unwrap();
        snapshot.into_server(Path::new("sample.json")).unwrap()
    }

    #[tokio::test]
    async fn test_links_are_derived() {
        let server = sample();
        let root = on("amx:pp=,type=domain-root");

        let parent = server.get_attribute(&root, "Parent").await.unwrap();
        assert!(parent.is_null_reference());

        let kids = server.get_attribute(&root, "Children").await.unwrap();
        assert_eq!(
            kids,
            Value::Array(vec![
                Value::ObjectName(on("amx:pp=/,type=cache,name=cache-0")),
                Value::ObjectName(on("amx:pp=/,type=pool")),
            ])
        );
    }

    #[tokio::test]
    async fn test_default_names() {
        let server = sample();

        let cache = server
            .get_attribute(&on("amx:pp=/,type=cache,name=cache-0"), "Name")
            .await
            .unwrap();
        assert_eq!(cache, Value::from("cache-0"));

        let pool = server.get_attribute(&on("amx:pp=/,type=pool"), "Name").await.unwrap();
        assert_eq!(pool, Value::from("pool"));
    }

    #[tokio::test]
    async fn test_descriptor_and_attributes_kept() {
        let server = sample();
        let info = server
            .get_info(&on("amx:pp=/,type=cache,name=cache-0"))
            .await
            .unwrap();

        assert_eq!(info.class_name, "Cache");
        assert!(info.attribute("Size").unwrap().writable);
        assert!(!info.attribute("Parent").unwrap().writable);
        assert_eq!(
            info.descriptor.field_value("amx.group"),
            Some(&Value::from("monitoring"))
        );
    }

    #[test]
    fn test_duplicate_beans_rejected() {
        let snapshot = Snapshot {
            beans: vec![
                serde_json::from_str(r#"{ "object_name": "amx:type=a" }"#).unwrap(),
                serde_json::from_str(r#"{ "object_name": "amx:type=a" }"#).unwrap(),
            ],
        };
        let err = snapshot.into_server(Path::new("dup.json")).unwrap_err();
        assert!(matches!(err, AmxError::Snapshot { .. }));
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_server(&path).unwrap_err();
        assert!(matches!(err, AmxError::Snapshot { .. }));
    }
}
