//! Flat record form of the outline for external stores.
//!
//! A tree is sent as one upsert record per node, linked to its parent and to
//! its preceding sibling by id, and removals as one delete op per node. The
//! tracker remembers the last record each node was successfully submitted
//! with, so only nodes that actually changed are sent again.

use crate::error::StoreError;
use crate::item::{Item, ItemId};
use crate::navigation::NodeContext;
use crate::path::Path;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

fn default_expand() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
/// One node as stored remotely.
pub struct UpsertRecord {
    /// Node id.
    pub id: String,
    /// Node text.
    pub content: String,
    /// Parent id; `None` marks the document root.
    pub parent: Option<String>,
    /// Preceding sibling id; `None` marks a first child.
    pub previous: Option<String>,
    /// Opaque data owned by the store, passed through untouched.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Whether the node's children are shown.
    #[serde(default = "default_expand")]
    pub expand: bool,
}

impl UpsertRecord {
    #[must_use]
    /// The record for `item`, linked to the parent and preceding sibling named by `context`.
    pub fn from_item(item: &Item, context: &NodeContext) -> Self {
        Self {
            id: item.id.to_string(),
            content: item.text.clone(),
            parent: context.parent_id.as_ref().map(ToString::to_string),
            previous: context.previous_id.as_ref().map(ToString::to_string),
            metadata: serde_json::Map::new(),
            expand: item.expand,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Removal of exactly one node; children are sent separately.
pub struct DeleteOp {
    /// Id of the removed node.
    pub id: String,
}

#[must_use]
/// One record per node of `root`, in document order.
pub fn flatten(root: &Item) -> Vec<UpsertRecord> {
    let context = NodeContext::start(&Path::root());
    let mut records = vec![UpsertRecord::from_item(root, &context)];
    flatten_children(root, &context, &mut records);
    records
}

fn flatten_children(parent: &Item, context: &NodeContext, records: &mut Vec<UpsertRecord>) {
    for (index, child) in parent.children.iter().enumerate() {
        let child_context = context.child(parent, index);
        records.push(UpsertRecord::from_item(child, &child_context));
        flatten_children(child, &child_context, records);
    }
}

/// Rebuild a tree from a batch of records.
///
/// Siblings are ordered by following `previous` links from the one whose
/// `previous` is empty or names no sibling. Records the chain never reaches
/// are appended in input order, and records that hang off no path from the
/// root are dropped; both cases are logged.
///
/// # Errors
///
/// Fails when the batch has no root, several roots, or a record whose parent
/// is not in the batch.
pub fn build_tree(records: &[UpsertRecord]) -> Result<Item, StoreError> {
    let roots: Vec<&UpsertRecord> = records.iter().filter(|r| r.parent.is_none()).collect();
    let root = match roots.as_slice() {
        [] => return Err(StoreError::NoRoot),
        [root] => *root,
        many => return Err(StoreError::ManyRoots(many.iter().map(|r| r.id.clone()).collect())),
    };

    let ids: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
    let mut buckets: HashMap<&str, Vec<&UpsertRecord>> = HashMap::new();
    for record in records {
        if let Some(parent) = record.parent.as_deref() {
            if !ids.contains(parent) {
                return Err(StoreError::UnknownParent {
                    id: record.id.clone(),
                    parent: parent.to_string(),
                });
            }
            buckets.entry(parent).or_default().push(record);
        }
    }

    let mut visited = HashSet::new();
    let tree = build_node(root, &buckets, &mut visited);
    if visited.len() < records.len() {
        warn!(
            "{} record(s) are not reachable from root `{}` and were dropped",
            records.len() - visited.len(),
            root.id
        );
    }
    Ok(tree)
}

fn build_node<'a>(
    record: &'a UpsertRecord,
    buckets: &HashMap<&str, Vec<&'a UpsertRecord>>,
    visited: &mut HashSet<&'a str>,
) -> Item {
    visited.insert(record.id.as_str());
    let siblings = buckets
        .get(record.id.as_str())
        .map(|bucket| order_siblings(&record.id, bucket))
        .unwrap_or_default();
    let mut children = Vec::with_capacity(siblings.len());
    for child in siblings {
        if !visited.contains(child.id.as_str()) {
            children.push(build_node(child, buckets, visited));
        }
    }
    Item {
        id: ItemId::from(record.id.as_str()),
        text: record.content.clone(),
        children,
        expand: record.expand,
    }
}

fn order_siblings<'a>(parent: &str, bucket: &[&'a UpsertRecord]) -> Vec<&'a UpsertRecord> {
    let in_bucket: HashSet<&str> = bucket.iter().map(|r| r.id.as_str()).collect();
    let mut after: HashMap<&str, &'a UpsertRecord> = HashMap::new();
    let mut head = None;
    for &record in bucket {
        match record.previous.as_deref() {
            Some(previous) if in_bucket.contains(previous) => {
                after.entry(previous).or_insert(record);
            }
            _ => {
                head.get_or_insert(record);
            }
        }
    }

    let mut ordered = Vec::with_capacity(bucket.len());
    let mut placed = HashSet::new();
    let mut current = head;
    while let Some(record) = current {
        if !placed.insert(record.id.as_str()) {
            break;
        }
        ordered.push(record);
        current = after.get(record.id.as_str()).copied();
    }
    if ordered.len() < bucket.len() {
        warn!(
            "children of `{parent}` do not form one sibling chain; {} appended in input order",
            bucket.len() - ordered.len()
        );
        ordered.extend(
            bucket
                .iter()
                .copied()
                .filter(|r| !placed.contains(r.id.as_str())),
        );
    }
    ordered
}

#[derive(Clone, Debug, Default, PartialEq)]
/// What has to be sent to bring the store in line with a tree.
pub struct Changes {
    /// New or modified nodes.
    pub upserts: Vec<UpsertRecord>,
    /// Nodes that were submitted before and are gone now.
    pub deletes: Vec<DeleteOp>,
}

impl Changes {
    #[must_use]
    /// Whether nothing needs sending.
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
/// Last successfully submitted record per node id.
pub struct SyncTracker {
    submitted: HashMap<String, UpsertRecord>,
}

impl SyncTracker {
    #[must_use]
    /// A tracker that considers `records` already stored, e.g. right after a load.
    pub fn from_records(records: &[UpsertRecord]) -> Self {
        Self {
            submitted: records.iter().map(|r| (r.id.clone(), r.clone())).collect(),
        }
    }

    #[must_use]
    /// Upserts for every node whose record differs from the submitted one and
    /// deletes for every submitted node no longer in `root`.
    ///
    /// Store-owned metadata of known nodes is carried over.
    pub fn changes(&self, root: &Item) -> Changes {
        let mut current = HashSet::new();
        let mut upserts = Vec::new();
        for mut record in flatten(root) {
            if let Some(previous) = self.submitted.get(&record.id) {
                record.metadata.clone_from(&previous.metadata);
                if *previous == record {
                    current.insert(record.id);
                    continue;
                }
            }
            current.insert(record.id.clone());
            upserts.push(record);
        }
        let mut deletes: Vec<DeleteOp> = self
            .submitted
            .keys()
            .filter(|id| !current.contains(*id))
            .map(|id| DeleteOp { id: id.clone() })
            .collect();
        deletes.sort_by(|a, b| a.id.cmp(&b.id));
        Changes { upserts, deletes }
    }

    /// Record that `records` reached the store.
    pub fn mark_upserted(&mut self, records: &[UpsertRecord]) {
        for record in records {
            self.submitted.insert(record.id.clone(), record.clone());
        }
    }

    /// Record that `ops` reached the store.
    pub fn mark_deleted(&mut self, ops: &[DeleteOp]) {
        for op in ops {
            self.submitted.remove(&op.id);
        }
    }

    #[must_use]
    /// Number of nodes known to be stored.
    pub fn len(&self) -> usize {
        self.submitted.len()
    }

    #[must_use]
    /// Whether nothing is known to be stored.
    pub fn is_empty(&self) -> bool {
        self.submitted.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/sync.rs"]
mod tests;
