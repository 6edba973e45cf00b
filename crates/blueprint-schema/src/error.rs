use crate::path::SchemaPath;

/// Errors raised while resolving or editing a schema tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid path `{path}`: {reason}")]
    InvalidPath {
        path: SchemaPath,
        reason: InvalidPathReason,
    },

    #[error("Property `{path}` not found")]
    PropertyNotFound { path: SchemaPath },

    #[error("The schema root cannot be added, renamed or removed")]
    RootNotAddressable,

    #[error("Cannot rename `{path}` to `{key}`: a sibling with that key already exists")]
    DuplicateKey { path: SchemaPath, key: String },

    #[error("Invalid value for `{field}` in patch: {message}")]
    InvalidPatch { field: String, message: String },
}

/// Why a path could not be walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPathReason {
    #[error("`{0}` node cannot hold properties")]
    NotExpandable(crate::SchemaType),
    #[error("segment is missing")]
    Missing,
}

/// Errors raised by [`crate::SchemaSelector`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Path `{path}` does not exist in target schema")]
    InvalidPath { path: SchemaPath },

    #[error("Path `{path}` was already selected in a previous session")]
    AlreadySelected { path: SchemaPath },

    #[error("Path `{path}` is not connected to the current selection")]
    DisconnectedSelection { path: SchemaPath },

    #[error("Path `{path}` is not selected")]
    NotSelected { path: SchemaPath },

    #[error("Path `{path}` is the common parent of the selection and cannot be removed")]
    CommonParentRemoval { path: SchemaPath },
}
