// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data structures and related facilities for representing resources in the
//! external API
//!
//! The contents here are all HTTP-agnostic.  For how errors surface over
//! HTTP, see [`error`].

mod error;
pub use error::*;

use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FormatResult;

// The type aliases below exist primarily to ensure consistency among return
// types for functions in the `Labeld` application and its `DataStore`.

/// Result of a create operation for the specified type
pub type CreateResult<T> = Result<T, Error>;
/// Result of a delete operation for the specified type
pub type DeleteResult = Result<(), Error>;
/// Result of a list operation that returns a vector
pub type ListResultVec<T> = Result<Vec<T>, Error>;
/// Result of a lookup operation for the specified type
pub type LookupResult<T> = Result<T, Error>;
/// Result of an update operation for the specified type
pub type UpdateResult<T> = Result<T, Error>;

/// Identifies a type of API resource
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum ResourceType {
    Fleet,
    Project,
    Label,
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(
            f,
            "{}",
            match self {
                ResourceType::Fleet => "fleet",
                ResourceType::Project => "project",
                ResourceType::Label => "label",
            }
        )
    }
}

/// Scope of a label: usable across the whole registry or owned by a single
/// project
///
/// The scope determines both where the label may be applied and who may
/// manage it.  It is fixed at creation time.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LabelScope {
    /// usable everywhere; managed by fleet administrators
    Global,
    /// usable within one project; managed by that project's administrators
    Project,
}

impl Display for LabelScope {
    fn fmt(&self, f: &mut Formatter) -> FormatResult {
        write!(
            f,
            "{}",
            match self {
                LabelScope::Global => "global",
                LabelScope::Project => "project",
            }
        )
    }
}
