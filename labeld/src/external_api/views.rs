// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Views are response bodies, most of which are public lenses onto DB models.

use crate::db::model;
use chrono::DateTime;
use chrono::Utc;
use gantry_common::api::external::LabelScope;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

/// Client view of a [`Label`](crate::db::model::Label)
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub scope: LabelScope,
    /// set exactly when `scope` is `"project"`
    pub project_id: Option<i64>,
    pub time_created: DateTime<Utc>,
    pub time_modified: DateTime<Utc>,
}

impl From<model::Label> for Label {
    fn from(label: model::Label) -> Label {
        Label {
            id: label.id,
            name: label.name,
            description: label.description,
            color: label.color,
            scope: label.scope,
            project_id: label.project_id,
            time_created: label.time_created,
            time_modified: label.time_modified,
        }
    }
}

/// Identifier of a newly created [`Label`]
///
/// Create returns just the id; clients fetch the full record with a
/// subsequent read.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct LabelId {
    pub id: i64,
}

impl From<model::Label> for LabelId {
    fn from(label: model::Label) -> LabelId {
        LabelId { id: label.id }
    }
}
