//! Carving connected sub-schemas out of a target schema.
//!
//! A target schema is decomposed over several sessions. Each session selects
//! one connected region: every newly selected path must lie below every
//! current member or above every current member. Paths committed by earlier
//! sessions are passed in and can no longer be chosen.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, error, trace};

use crate::error::SelectionError;
use crate::json_schema::JsonSchema;
use crate::path::SchemaPath;
use crate::traverse::{has_array_ancestor, innermost_items_mut, schema_node, schema_paths};

/// The materialized result of a selection session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubSchemaSelection {
    /// Standalone schema rooted at `target_path`.
    pub json_schema: JsonSchema,
    pub target_path: SchemaPath,
    /// The session paths the schema was built from.
    pub paths: Vec<SchemaPath>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Selecting,
}

/// The member of `paths` that is an ancestor-or-self of every other member.
fn common_root<'a, I>(paths: I) -> Option<&'a SchemaPath>
where
    I: Iterator<Item = &'a SchemaPath> + Clone,
{
    paths
        .clone()
        .find(|candidate| paths.clone().all(|path| candidate.is_prefix_of(path)))
}

/// A member that is a prefix of every other member cannot be deselected once
/// there are at least this many others.
const MIN_ORPHANED_MEMBERS: usize = 3;

/// Session paths all come from `target_paths`, so this never fires for a
/// selector driven through its public API.
fn broken_invariant(path: &SchemaPath, message: &str) {
    error!(%path, "{message}");
}

/// An empty container with the same array nesting as `node`.
fn empty_like(node: &JsonSchema) -> JsonSchema {
    match node.items.as_deref().filter(|_| node.is_array()) {
        Some(items) => JsonSchema::array_of(empty_like(items)),
        None if node.is_array() => JsonSchema::empty_array(),
        None => JsonSchema::empty_object(),
    }
}

/// Copy of `node` without its expandable properties. Arrays prune their items.
fn prune(node: &JsonSchema) -> JsonSchema {
    let scalar = |child: &JsonSchema| !child.is_expandable();

    let properties = node.properties.as_ref().map(|properties| {
        properties
            .iter()
            .filter(|(_, child)| !child.is_expandable())
            .map(|(key, child)| (key.clone(), child.clone()))
            .collect::<IndexMap<_, _>>()
    });
    let required = node.required.as_ref().map(|required| {
        required
            .iter()
            .filter(|key| node.property(key).is_none_or(scalar))
            .cloned()
            .collect()
    });

    JsonSchema {
        schema_type: node.schema_type,
        properties,
        required,
        items: node.items.as_deref().map(|items| Box::new(prune(items))),
        keywords: node.keywords.clone(),
    }
}

#[derive(Debug, Clone)]
pub struct SchemaSelector {
    target: JsonSchema,
    target_paths: IndexSet<SchemaPath>,
    selected_paths: IndexSet<SchemaPath>,
    session_paths: IndexSet<SchemaPath>,
}

impl SchemaSelector {
    /// Start a selector over a private copy of `target`.
    pub fn new(target: &JsonSchema) -> Self {
        let target = target.clone();
        let target_paths = schema_paths(&target);
        Self {
            target,
            target_paths,
            selected_paths: IndexSet::new(),
            session_paths: IndexSet::new(),
        }
    }

    /// Paths committed by earlier sessions.
    pub fn with_prior_selections<I>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = SchemaPath>,
    {
        self.selected_paths.extend(paths);
        self
    }

    /// Seed the session. Each path goes through [`SchemaSelector::select`].
    pub fn with_initial<I>(mut self, paths: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = SchemaPath>,
    {
        let mut paths: Vec<_> = paths.into_iter().collect();
        // Shallow first so the seed can always be re-rooted.
        paths.sort_by_key(SchemaPath::depth);
        for path in &paths {
            self.select(path)?;
        }
        Ok(self)
    }

    pub fn target(&self) -> &JsonSchema {
        &self.target
    }

    pub fn target_paths(&self) -> &IndexSet<SchemaPath> {
        &self.target_paths
    }

    pub fn selected_paths(&self) -> &IndexSet<SchemaPath> {
        &self.selected_paths
    }

    pub fn session_paths(&self) -> &IndexSet<SchemaPath> {
        &self.session_paths
    }

    pub fn state(&self) -> SessionState {
        if self.session_paths.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Selecting
        }
    }

    pub fn has_selected_in_session(&self, path: &SchemaPath) -> bool {
        self.session_paths.contains(path)
    }

    pub fn has_selected_before(&self, path: &SchemaPath) -> bool {
        self.selected_paths.contains(path)
    }

    /// The member every other session path descends from.
    pub fn session_root(&self) -> Option<&SchemaPath> {
        common_root(self.session_paths.iter())
    }

    /// Below every member, or above every member. Vacuously true when empty.
    fn is_connected(&self, path: &SchemaPath) -> bool {
        self.session_paths.iter().all(|member| member.is_prefix_of(path))
            || self.session_paths.iter().all(|member| path.is_prefix_of(member))
    }

    pub fn select(&mut self, path: &SchemaPath) -> Result<(), SelectionError> {
        if !self.target_paths.contains(path) {
            return Err(SelectionError::InvalidPath { path: path.clone() });
        }
        if self.selected_paths.contains(path) {
            return Err(SelectionError::AlreadySelected { path: path.clone() });
        }
        if self.session_paths.contains(path) {
            trace!(%path, "already selected in session");
            return Ok(());
        }
        if !self.is_connected(path) {
            return Err(SelectionError::DisconnectedSelection { path: path.clone() });
        }
        debug!(%path, "select");
        self.session_paths.insert(path.clone());
        Ok(())
    }

    /// Replace the session with every path not committed earlier.
    pub fn select_all(&mut self) {
        self.session_paths = self
            .target_paths
            .iter()
            .filter(|path| !self.selected_paths.contains(*path))
            .cloned()
            .collect();
        debug!(count = self.session_paths.len(), "select all");
    }

    pub fn deselect(&mut self, path: &SchemaPath) -> Result<(), SelectionError> {
        if !self.session_paths.contains(path) {
            return Err(SelectionError::NotSelected { path: path.clone() });
        }
        let others: Vec<&SchemaPath> = self.session_paths.iter().filter(|p| *p != path).collect();
        if others.len() >= MIN_ORPHANED_MEMBERS && others.iter().all(|p| path.is_prefix_of(p)) {
            return Err(SelectionError::CommonParentRemoval { path: path.clone() });
        }
        debug!(%path, "deselect");
        self.session_paths.shift_remove(path);
        Ok(())
    }

    /// Flip `path` in the session. Paths committed earlier are left alone.
    pub fn toggle(&mut self, path: &SchemaPath) -> Result<(), SelectionError> {
        if self.has_selected_before(path) {
            trace!(%path, "toggle of committed path ignored");
            return Ok(());
        }
        if self.has_selected_in_session(path) {
            self.deselect(path)
        } else {
            self.select(path)
        }
    }

    pub fn clear(&mut self) {
        debug!("clear session");
        self.session_paths.clear();
    }

    /// Every target path is covered by an earlier session or this one.
    pub fn is_complete(&self) -> bool {
        self.remaining_paths().next().is_none()
    }

    /// Target paths nobody has selected yet.
    pub fn remaining_paths(&self) -> impl Iterator<Item = &SchemaPath> {
        self.target_paths.iter().filter(|path| {
            !self.selected_paths.contains(*path) && !self.session_paths.contains(*path)
        })
    }

    /// The path the selection is rooted at: the session root, or the deepest
    /// path shared by all members when `select_all` left several subtrees.
    fn selection_base(&self) -> Option<SchemaPath> {
        if let Some(root) = self.session_root() {
            return Some(root.clone());
        }
        let mut members = self.session_paths.iter();
        let first = members.next()?.segments();
        let shared = members.fold(first, |shared, member| {
            let len = shared
                .iter()
                .zip(member.segments())
                .take_while(|(a, b)| a == b)
                .count();
            &shared[..len]
        });
        Some(SchemaPath(shared.to_vec()))
    }

    /// Build the schema for the current session, or `None` if nothing is selected.
    pub fn get_selection(&self) -> Option<SubSchemaSelection> {
        let base = self.selection_base()?;
        let base_node = match schema_node(&self.target, &base) {
            Ok(node) => node,
            Err(error) => {
                broken_invariant(&base, &error.to_string());
                return None;
            }
        };
        let mut schema = if self.session_paths.contains(&base) {
            prune(base_node)
        } else {
            empty_like(base_node)
        };

        let mut rest: Vec<&SchemaPath> =
            self.session_paths.iter().filter(|p| **p != base).collect();
        rest.sort_by_key(|path| path.depth());

        for path in rest {
            match schema_node(&self.target, path) {
                Ok(node) => self.splice(&mut schema, &base, path, prune(node)),
                Err(error) => broken_invariant(path, &error.to_string()),
            }
        }

        if has_array_ancestor(&self.target, &base) {
            schema = JsonSchema::array_of(schema);
        }

        Some(SubSchemaSelection {
            json_schema: schema,
            target_path: base,
            paths: self.session_paths.iter().cloned().collect(),
        })
    }

    /// Insert `node` into `schema`, which is rooted at `base`, at the place
    /// `path` names in the target.
    fn splice(
        &self,
        schema: &mut JsonSchema,
        base: &SchemaPath,
        path: &SchemaPath,
        node: JsonSchema,
    ) {
        let Some(relative) = path.strip_prefix(base) else {
            broken_invariant(path, "session path outside the selection base");
            return;
        };
        let (Some(key), Some(parent)) = (relative.last(), relative.parent()) else {
            trace!(%path, "nothing to splice at the base");
            return;
        };

        let mut cursor = schema;
        let mut absolute = base.clone();
        for segment in parent.segments() {
            absolute = absolute.child(segment.clone());
            let container = innermost_items_mut(cursor);
            if !container.is_object() {
                broken_invariant(&absolute, "selection cannot hold properties here");
                return;
            }
            let intermediate = schema_node(&self.target, &absolute)
                .map(empty_like)
                .unwrap_or_else(|_| JsonSchema::empty_object());
            cursor = container
                .properties
                .get_or_insert_with(IndexMap::new)
                .entry(segment.clone())
                .or_insert(intermediate);
        }

        let container = innermost_items_mut(cursor);
        if !container.is_object() {
            broken_invariant(path, "selection cannot hold properties here");
            return;
        }
        container
            .properties
            .get_or_insert_with(IndexMap::new)
            .insert(key.to_string(), node);
        let required = container.required.get_or_insert_with(Vec::new);
        if !required.iter().any(|k| k == key) {
            required.push(key.to_string());
        }
    }
}
