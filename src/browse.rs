/*!
 * Tree walks and table rendering on top of `AmxClient`
 */

use amx_connect::{AmxClient, AmxMBean};
use amx_core_interface::{AttributeList, MBeanInfo, ObjectName, Value};
use comfy_table::{Cell, Color, Table};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::cli_style::{bool_cell, create_table, header_cell};
use crate::error::{AmxError, Result};

/// One line of a tree walk
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEntry {
    pub depth: usize,
    pub object_name: ObjectName,
    pub name: String,
}

/// Depth-first walk from `root`, visiting children in reported order.
///
/// Beans deeper than `max_depth` are not visited. A bean reached a second
/// time (a cycle in the remote tree) is skipped with a warning.
pub async fn walk_tree(root: &AmxClient, max_depth: usize) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root.clone(), 0usize)];

    while let Some((bean, depth)) = stack.pop() {
        if !visited.insert(bean.object_name().clone()) {
            warn!("{} reached twice; skipping", bean.object_name());
            continue;
        }

        debug!("Visiting {} at depth {}", bean.object_name(), depth);
        entries.push(TreeEntry {
            depth,
            object_name: bean.object_name().clone(),
            name: bean.name().await?,
        });

        if depth < max_depth {
            let children = bean.children().await?;
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }

    Ok(entries)
}

/// Indented text form of a tree walk
pub fn render_tree(entries: &[TreeEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}{}  ({})", "  ".repeat(e.depth), e.name, e.object_name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn attribute_table(attributes: &AttributeList) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        header_cell("Attribute"),
        header_cell("Type"),
        header_cell("Value"),
    ]);

    for attribute in attributes {
        table.add_row(vec![
            Cell::new(&attribute.name),
            Cell::new(attribute.value.type_name()).fg(Color::DarkGrey),
            Cell::new(attribute.value.to_string()),
        ]);
    }

    table
}

/// Descriptor fields, sorted by name
pub fn meta_table(meta: &HashMap<String, Value>) -> Table {
    let mut table = create_table();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);

    let mut fields: Vec<_> = meta.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    for (name, value) in fields {
        table.add_row(vec![Cell::new(name), Cell::new(value.to_string())]);
    }

    table
}

pub fn info_table(info: &MBeanInfo) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        header_cell("Member"),
        header_cell("Kind"),
        header_cell("Type"),
        header_cell("Writable"),
    ]);

    for attribute in &info.attributes {
        table.add_row(vec![
            Cell::new(&attribute.name),
            Cell::new("attribute"),
            Cell::new(&attribute.type_name),
            bool_cell(attribute.writable),
        ]);
    }
    for operation in &info.operations {
        let params: Vec<_> = operation
            .signature
            .iter()
            .map(|p| format!("{}: {}", p.name, p.type_name))
            .collect();
        table.add_row(vec![
            Cell::new(format!("{}({})", operation.name, params.join(", "))),
            Cell::new("operation"),
            Cell::new(&operation.return_type),
            Cell::new("-").fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Parse a command-line value.
///
/// Accepts plain JSON scalars and arrays: `5`, `2.5`, `true`, `null`,
/// `"text"`, `[1, 2]`. JSON objects, at the top level or inside arrays, must
/// be in tagged form (`{"int": 5}`, `{"object_name": "amx:type=x"}`). Bare
/// words that are not JSON are taken as strings.
pub fn parse_value(input: &str) -> Result<Value> {
    match serde_json::from_str::<serde_json::Value>(input) {
        Ok(json) => from_json(json).map_err(|reason| AmxError::InvalidValue {
            input: input.to_string(),
            reason,
        }),
        Err(_) => Ok(Value::String(input.to_string())),
    }
}

fn from_json(json: serde_json::Value) -> std::result::Result<Value, String> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float))
            .ok_or_else(|| format!("number {} is out of range", n)),
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(from_json)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::Array),
        object @ serde_json::Value::Object(_) => serde_json::from_value::<Value>(object)
            .map_err(|e| format!("not a tagged value: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::{MemoryBean, MemoryServer};
    use amx_core_interface::{Attribute, NULL_OBJECT_NAME};
    use std::sync::Arc;

    fn on(s: &str) -> ObjectName {
        ObjectName::new(s).unwrap()
    }

    fn node(name: &str, parent: Option<&str>, children: &[&str]) -> MemoryBean {
        MemoryBean::new("Node")
            .attribute("Name", name)
            .attribute(
                "Parent",
                parent.map(on).unwrap_or_else(|| NULL_OBJECT_NAME.clone()),
            )
            .attribute(
                "Children",
                Value::Array(children.iter().map(|c| Value::ObjectName(on(c))).collect()),
            )
    }

    fn tree() -> AmxClient {
        let server = MemoryServer::new();
        server.insert(on("amx:type=root"), node("root", None, &["amx:type=a", "amx:type=b"]));
        server.insert(on("amx:type=a"), node("a", Some("amx:type=root"), &["amx:type=a1"]));
        server.insert(on("amx:type=a1"), node("a1", Some("amx:type=a"), &[]));
        server.insert(on("amx:type=b"), node("b", Some("amx:type=root"), &[]));
        AmxClient::new(Arc::new(server), on("amx:type=root"))
    }

    #[tokio::test]
    async fn test_walk_is_depth_first_in_order() {
        let entries = walk_tree(&tree(), 16).await.unwrap();
        let lines: Vec<_> = entries.iter().map(|e| (e.depth, e.name.as_str())).collect();
        assert_eq!(lines, vec![(0, "root"), (1, "a"), (2, "a1"), (1, "b")]);

        let rendered = render_tree(&entries);
        assert_eq!(rendered.lines().nth(2), Some("    a1  (amx:type=a1)"));
    }

    #[tokio::test]
    async fn test_walk_respects_depth() {
        let entries = walk_tree(&tree(), 1).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.depth <= 1));
    }

    #[tokio::test]
    async fn test_walk_survives_cycles() {
        let server = MemoryServer::new();
        server.insert(on("amx:type=x"), node("x", None, &["amx:type=y"]));
        server.insert(on("amx:type=y"), node("y", Some("amx:type=x"), &["amx:type=x"]));
        let root = AmxClient::new(Arc::new(server), on("amx:type=x"));

        let entries = walk_tree(&root, 16).await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_walk_reports_missing_child() {
        let server = MemoryServer::new();
        server.insert(on("amx:type=x"), node("x", None, &["amx:type=gone"]));
        let root = AmxClient::new(Arc::new(server), on("amx:type=x"));

        let err = walk_tree(&root, 16).await.unwrap_err();
        assert!(matches!(err, AmxError::RemoteAccess(_)));
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("5").unwrap(), Value::Int(5));
        assert_eq!(parse_value("2.5").unwrap(), Value::Float(2.5));
        assert_eq!(parse_value("true").unwrap(), Value::Bool(true));
        assert_eq!(parse_value("null").unwrap(), Value::Null);
        assert_eq!(parse_value("\"text\"").unwrap(), Value::from("text"));
        assert_eq!(parse_value("\"null\"").unwrap(), Value::from("null"));
        assert_eq!(parse_value("\"int\"").unwrap(), Value::from("int"));
        assert_eq!(parse_value("hot").unwrap(), Value::from("hot"));
        assert_eq!(
            parse_value("[1, \"a\"]").unwrap(),
            Value::Array(vec![Value::Int(1), Value::from("a")])
        );
        assert_eq!(
            parse_value(r#"{"object_name": "amx:type=x"}"#).unwrap(),
            Value::ObjectName(on("amx:type=x"))
        );
        assert_eq!(
            parse_value(r#"[{"object_name": "amx:type=x"}, null]"#).unwrap(),
            Value::Array(vec![Value::ObjectName(on("amx:type=x")), Value::Null])
        );
        assert_eq!(parse_value(r#"{"string": "null"}"#).unwrap(), Value::from("null"));
        assert!(parse_value(r#"{"size": 1}"#).is_err());
    }

    #[test]
    fn test_tables_render() {
        let attrs = vec![Attribute::new("Size", 3i64)];
        let rendered = attribute_table(&attrs).to_string();
        assert!(rendered.contains("Size") && rendered.contains("int"));

        let meta = HashMap::from([("amx.group".to_string(), Value::from("monitoring"))]);
        assert!(meta_table(&meta).to_string().contains("monitoring"));
    }
}
