//! End-to-end tests: snapshot -> MemoryServer -> AmxClient
//!
//! These tests load the demo snapshot shipped in `demos/` and drive it only
//! through the public proxy API.

use amx::browse::{render_tree, walk_tree};
use amx::snapshot::{load_server, Snapshot};
use amx::{AmxClient, AmxMBean, InvokeError, MBeanConnection, MemoryBean, MemoryServer};
use amx_core_interface::{Attribute, ConnectionError, Impact, ObjectName, Value, NULL_OBJECT_NAME};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const ROOT: &str = "amx:pp=,type=domain-root";
const CACHE: &str = "amx:pp=/,type=cache,name=cache-0";

fn demo_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join("beans.json")
}

fn demo_connection() -> Arc<dyn MBeanConnection> {
    Arc::new(load_server(&demo_path()).unwrap())
}

fn on(s: &str) -> ObjectName {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_name_of_cache() {
    let cache = AmxClient::new(demo_connection(), on(CACHE));
    assert_eq!(cache.name().await.unwrap(), "cache-0");
}

#[tokio::test]
async fn test_root_parent_is_none() {
    let root = AmxClient::new(demo_connection(), on(ROOT));
    assert!(root.parent().await.unwrap().is_none());
}

#[tokio::test]
async fn test_children_in_snapshot_order() {
    let conn = demo_connection();
    let root = AmxClient::new(conn.clone(), on(ROOT));

    let children = root.children().await.unwrap();
    let names: Vec<_> = children.iter().map(|c| c.object_name().clone()).collect();
    assert_eq!(
        names,
        vec![on(CACHE), on("amx:pp=/,type=thread-pool,name=http")]
    );
    assert!(children.iter().all(|c| Arc::ptr_eq(c.connection(), &conn)));
}

#[tokio::test]
async fn test_demo_tree_renders() {
    let root = AmxClient::new(demo_connection(), on(ROOT));
    let entries = walk_tree(&root, 8).await.unwrap();

    assert_eq!(entries.len(), 4);
    let rendered = render_tree(&entries);
    let first_lines: Vec<_> = rendered.lines().take(3).collect();
    assert_eq!(
        first_lines,
        vec![
            "domain-root  (amx:pp=,type=domain-root)",
            "  cache-0  (amx:pp=/,type=cache,name=cache-0)",
            "    eviction-policy  (amx:pp=/cache[cache-0],type=eviction-policy)",
        ]
    );
}

#[tokio::test]
async fn test_write_then_read_back() {
    let cache = AmxClient::new(demo_connection(), on(CACHE));

    cache.set_attribute("Size", 256i64).await.unwrap();
    assert_eq!(cache.get_attribute("Size").await.unwrap(), Value::Int(256));

    let applied = cache
        .set_attributes(vec![
            Attribute::new("Enabled", false),
            Attribute::new("HitRatio", 1.0),
        ])
        .await
        .unwrap();
    assert_eq!(applied, vec![Attribute::new("Enabled", false)]);

    let read = cache
        .get_attributes(&["Enabled".to_string(), "HitRatio".to_string()])
        .await
        .unwrap();
    assert_eq!(read[0].value, Value::Bool(false));
    assert_eq!(read[1].value, Value::Float(0.93));
}

#[tokio::test]
async fn test_read_only_write_is_wrapped() {
    let cache = AmxClient::new(demo_connection(), on(CACHE));

    let err = cache.set_attribute("HitRatio", 0.5).await.unwrap_err();
    assert!(matches!(
        err.connection_error(),
        Some(ConnectionError::InvalidAttributeValue { .. })
    ));
}

#[tokio::test]
async fn test_meta_of_root() {
    let root = AmxClient::new(demo_connection(), on(ROOT));
    let meta = root.meta().await.unwrap();

    assert_eq!(meta.get("amx.isSingleton"), Some(&Value::Bool(true)));
    assert_eq!(meta.get("amx.group"), Some(&Value::from("monitoring")));
}

#[tokio::test]
async fn test_invoke_against_memory_server() {
    let server = MemoryServer::new();
    server.insert(
        on(CACHE),
        MemoryBean::new("Cache")
            .attribute("Name", "cache-0")
            .attribute("Parent", NULL_OBJECT_NAME.clone())
            .operation("clear", &[], "int", Impact::Action, |_| Ok(Value::Int(12)))
            .operation("fail", &[], "void", Impact::Action, |_| {
                Err("disk full".to_string())
            }),
    );
    let cache = AmxClient::new(Arc::new(server), on(CACHE));

    assert_eq!(
        cache.invoke("clear", vec![], vec![]).await.unwrap(),
        Value::Int(12)
    );
    assert!(matches!(
        cache.invoke("fail", vec![], vec![]).await,
        Err(InvokeError::Operation(ConnectionError::MBean(_)))
    ));
    assert!(matches!(
        cache.invoke("missing", vec![], vec![]).await,
        Err(InvokeError::Reflection(_))
    ));

    let gone = AmxClient::new(cache.connection().clone(), on("amx:type=gone"));
    assert!(matches!(
        gone.invoke("clear", vec![], vec![]).await,
        Err(InvokeError::Access(_))
    ));
}

#[test]
fn test_demo_snapshot_parses() {
    let snapshot = Snapshot::from_file(&demo_path()).unwrap();
    assert_eq!(snapshot.beans.len(), 4);
    assert!(snapshot.beans[0].parent.is_none());
}
