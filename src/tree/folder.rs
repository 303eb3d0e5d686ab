//! Folder tree model and its document representation

use crate::accessor::SEPARATOR;
use crate::error::AccessError;
use crate::secret::{
    is_placeholder, is_scalar, value_kind, LeafPayload, LeafSecret, ATTACHED_SECRET_KEY,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Node of the tree: a nested folder or a leaf secret
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Folder(Folder),
    Leaf(LeafSecret),
}

/// One level of the namespace
///
/// The store may hold a secret `k` next to a folder `k/`. The folder then owns
/// the key and the secret is kept as the folder's attached secret.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folder {
    entries: BTreeMap<String, Node>,
    secret: Option<LeafSecret>,
}

impl Folder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of document entries: child keys plus the attached secret
    pub fn len(&self) -> usize {
        self.entries.len() + usize::from(self.secret.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Child folder under `key`, if that key holds a folder
    pub fn folder(&self, key: &str) -> Option<&Folder> {
        match self.entries.get(key) {
            Some(Node::Folder(folder)) => Some(folder),
            _ => None,
        }
    }

    /// Leaf under `key`, if that key holds a leaf
    pub fn leaf(&self, key: &str) -> Option<&LeafSecret> {
        match self.entries.get(key) {
            Some(Node::Leaf(secret)) => Some(secret),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Secret stored under the same name as this folder
    pub fn attached_secret(&self) -> Option<&LeafSecret> {
        self.secret.as_ref()
    }

    /// Number of leaves in this folder and every folder below it
    pub fn leaf_count(&self) -> usize {
        let own = usize::from(self.secret.is_some());
        own + self
            .entries
            .values()
            .map(|node| match node {
                Node::Folder(folder) => folder.leaf_count(),
                Node::Leaf(_) => 1,
            })
            .sum::<usize>()
    }

    /// Store a leaf under `key`.
    ///
    /// A folder already holding the key keeps it and the leaf becomes its
    /// attached secret.
    pub fn insert_leaf(&mut self, key: impl Into<String>, secret: LeafSecret) {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(Node::Folder(folder)) => folder.secret = Some(secret),
            _ => {
                self.entries.insert(key, Node::Leaf(secret));
            }
        }
    }

    /// Store a subtree under `key` with union semantics.
    ///
    /// Whatever already occupies the slot is copied into the new subtree
    /// before it takes the slot: folder entries are merged, pre-existing ones
    /// winning on collisions, and a leaf becomes the attached secret.
    pub fn insert_folder(&mut self, key: impl Into<String>, mut subtree: Folder) {
        let key = key.into();
        match self.entries.remove(&key) {
            Some(Node::Folder(existing)) => subtree.absorb(existing),
            Some(Node::Leaf(secret)) => subtree.secret = Some(secret),
            None => {}
        }
        self.entries.insert(key, Node::Folder(subtree));
    }

    /// Union `existing` into `self`; entries of `existing` win on collisions
    fn absorb(&mut self, existing: Folder) {
        if existing.secret.is_some() {
            self.secret = existing.secret;
        }
        for (key, old) in existing.entries {
            match (self.entries.remove(&key), old) {
                (Some(Node::Folder(mut new)), Node::Folder(old)) => {
                    new.absorb(old);
                    self.entries.insert(key, Node::Folder(new));
                }
                (Some(Node::Folder(mut new)), Node::Leaf(secret)) => {
                    new.secret = Some(secret);
                    self.entries.insert(key, Node::Folder(new));
                }
                (Some(Node::Leaf(secret)), Node::Folder(mut old)) => {
                    if old.secret.is_none() {
                        old.secret = Some(secret);
                    }
                    self.entries.insert(key, Node::Folder(old));
                }
                (_, old) => {
                    self.entries.insert(key, old);
                }
            }
        }
    }

    /// Nest `subtree` under the given root segments.
    ///
    /// Every segment but the last adds one level of nesting. If the last
    /// segment is the empty root sentinel the subtree itself is returned, so
    /// no empty-string key appears at the top.
    pub fn wrap(segments: &[String], subtree: Folder) -> Folder {
        let Some((last, parents)) = segments.split_last() else {
            return subtree;
        };

        let mut node = if last.is_empty() {
            subtree
        } else {
            let mut folder = Folder::new();
            folder.insert_folder(last.clone(), subtree);
            folder
        };

        for segment in parents.iter().rev() {
            let mut parent = Folder::new();
            parent.insert_folder(segment.clone(), node);
            node = parent;
        }
        node
    }

    /// Document representation: nested objects, leaves as field maps and the
    /// attached secret under [`ATTACHED_SECRET_KEY`]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(secret) = &self.secret {
            map.insert(ATTACHED_SECRET_KEY.to_string(), secret.to_value());
        }
        for (key, node) in &self.entries {
            let value = match node {
                Node::Folder(folder) => folder.to_value(),
                Node::Leaf(secret) => secret.to_value(),
            };
            map.insert(key.clone(), value);
        }
        Value::Object(map)
    }

    /// Parse a document produced by [`Folder::to_value`] or written by hand.
    ///
    /// Every top-level key is a node. Below the top, an object is a folder
    /// when it has the attached-secret key, holds another object, or holds
    /// nothing but placeholders; any other object is a leaf field map. The
    /// empty string is a redacted leaf. Errors name the store path of the
    /// offending node.
    pub fn from_value(value: Value) -> Result<Folder, AccessError> {
        match value {
            Value::Object(map) => folder_from_map("", map),
            Value::Null => Ok(Folder::new()),
            other => Err(AccessError::malformed(
                "",
                format!("document root must be a mapping, found {}", value_kind(&other)),
            )),
        }
    }
}

fn folder_from_map(path: &str, map: Map<String, Value>) -> Result<Folder, AccessError> {
    let mut folder = Folder::new();
    for (key, child) in map {
        if key == ATTACHED_SECRET_KEY {
            folder.secret = Some(leaf_from_value(path, child)?);
            continue;
        }
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", path, SEPARATOR, key)
        };
        folder.entries.insert(key, node_from_value(&child_path, child)?);
    }
    Ok(folder)
}

fn is_folder_map(map: &Map<String, Value>) -> bool {
    map.contains_key(ATTACHED_SECRET_KEY)
        || map.values().any(Value::is_object)
        || (!map.is_empty() && map.values().all(is_placeholder))
}

fn node_from_value(path: &str, value: Value) -> Result<Node, AccessError> {
    match value {
        Value::Object(map) if is_folder_map(&map) => Ok(Node::Folder(folder_from_map(path, map)?)),
        other => Ok(Node::Leaf(leaf_from_value(path, other)?)),
    }
}

fn leaf_from_value(path: &str, value: Value) -> Result<LeafSecret, AccessError> {
    match value {
        ref v if is_placeholder(v) => Ok(LeafSecret::Redacted),
        Value::Object(map) => match map.iter().find(|(_, v)| !is_scalar(v)) {
            Some((key, v)) => Err(AccessError::malformed(
                path,
                format!("field {} holds {}", key, value_kind(v)),
            )),
            None => Ok(LeafPayload::from_fields(path, map)?.into()),
        },
        other => Err(AccessError::malformed(
            path,
            format!("expected a folder or secret mapping, found {}", value_kind(&other)),
        )),
    }
}

impl Serialize for Folder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Folder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Folder::from_value(value).map_err(D::Error::custom)
    }
}
