// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Params define the request bodies of API endpoints for creating or updating
//! resources.

use gantry_common::api::external::LabelScope;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

/// Create-time parameters for a [`Label`](crate::db::model::Label)
///
/// Structural validation (required fields, scope/project consistency) happens
/// after deserialization, so every field that can legally be omitted is an
/// `Option` here.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct LabelCreate {
    /// name of the label, unique among labels sharing its scope
    pub name: String,
    /// free-form description
    pub description: Option<String>,
    /// display color, e.g. "#9b0d54"
    pub color: Option<String>,
    /// scope of the label, fixed at creation time
    pub scope: Option<LabelScope>,
    /// the owning project; required exactly when `scope` is `"project"`
    pub project_id: Option<i64>,
}

/// Updateable properties of a [`Label`](crate::db::model::Label)
///
/// `scope` and `project_id` may be supplied but must match the stored values.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct LabelUpdate {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub scope: Option<LabelScope>,
    pub project_id: Option<i64>,
}

/// Query parameters selecting which labels to list
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct LabelSelector {
    /// which scope to list labels from (required)
    pub scope: Option<LabelScope>,
    /// the project whose labels to list; required when `scope` is
    /// `"project"`, ignored otherwise
    pub project_id: Option<i64>,
    /// restrict the list to labels whose name contains this substring
    pub name: Option<String>,
}
