// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structures stored in the datastore and their validated construction
//!
//! The validating constructors here ([`IncompleteLabel::new()`] and
//! [`LabelUpdate::new()`]) are the checks that run on request payloads before
//! anything touches the datastore.  They're purely structural: whether the
//! caller is allowed to make the change and whether a referenced project
//! exists are checked elsewhere.

use crate::external_api::params;
use chrono::DateTime;
use chrono::Utc;
use gantry_common::api::external::Error;
use gantry_common::api::external::LabelScope;
use gantry_common::api::external::ResourceType;
use uuid::Uuid;

/// Describes a label within the datastore
#[derive(Clone, Debug)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub scope: LabelScope,
    /// set exactly when `scope` is [`LabelScope::Project`]
    pub project_id: Option<i64>,
    pub time_created: DateTime<Utc>,
    pub time_modified: DateTime<Utc>,
}

impl Label {
    pub fn new(id: i64, new_label: IncompleteLabel) -> Label {
        let now = Utc::now();
        Label {
            id,
            name: new_label.name,
            description: new_label.description,
            color: new_label.color,
            scope: new_label.scope,
            project_id: new_label.project_id,
            time_created: now,
            time_modified: now,
        }
    }
}

/// Describes a validated set of label fields that have not yet been assigned
/// an id
#[derive(Clone, Debug)]
pub struct IncompleteLabel {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub scope: LabelScope,
    pub project_id: Option<i64>,
}

impl IncompleteLabel {
    /// Validates a create request payload
    pub fn new(params: &params::LabelCreate) -> Result<IncompleteLabel, Error> {
        validate_label_name(&params.name)?;

        let scope = params.scope.ok_or_else(|| {
            Error::invalid_value("scope", "must be \"global\" or \"project\"")
        })?;

        let project_id = match scope {
            LabelScope::Global => {
                // Project id 0 is treated as unset, for clients that always
                // send the field.
                if params.project_id.unwrap_or(0) != 0 {
                    return Err(Error::invalid_value(
                        "project_id",
                        "must not be set for a global label",
                    ));
                }
                None
            }
            LabelScope::Project => {
                let project_id = params.project_id.unwrap_or(0);
                if project_id <= 0 {
                    return Err(Error::invalid_value(
                        "project_id",
                        "must be a positive integer for a project-scoped \
                         label",
                    ));
                }
                Some(project_id)
            }
        };

        Ok(IncompleteLabel {
            name: params.name.clone(),
            description: params.description.clone(),
            color: params.color.clone(),
            scope,
            project_id,
        })
    }
}

/// Describes a validated update to a label's mutable fields
#[derive(Clone, Debug)]
pub struct LabelUpdate {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl LabelUpdate {
    /// Validates an update request payload against the stored record
    ///
    /// The mutable fields follow the same structural rules as for create.
    /// `scope` and `project_id` are immutable: the payload may repeat the
    /// stored values (or omit them) but may not change them.
    pub fn new(
        params: &params::LabelUpdate,
        stored: &Label,
    ) -> Result<LabelUpdate, Error> {
        validate_label_name(&params.name)?;

        if let Some(scope) = params.scope {
            if scope != stored.scope {
                return Err(Error::invalid_value(
                    "scope",
                    "cannot be changed after creation",
                ));
            }
        }

        // As on create, project id 0 is treated as unset.
        let requested_project = params.project_id.filter(|&id| id != 0);
        match (requested_project, stored.project_id) {
            (None, _) => (),
            (Some(requested), Some(current)) if requested == current => (),
            _ => {
                return Err(Error::invalid_value(
                    "project_id",
                    "cannot be changed after creation",
                ));
            }
        }

        Ok(LabelUpdate {
            name: params.name.clone(),
            description: params.description.clone(),
            color: params.color.clone(),
        })
    }
}

fn validate_label_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(Error::invalid_value("name", "cannot be empty"));
    }
    Ok(())
}

/// Describes a project within the datastore
///
/// Labeld does not manage projects itself.  This is the subset of project
/// state needed to scope labels and role assignments.
#[derive(Clone, Debug)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

/// Describes the assignment of a built-in role on a resource to some identity
#[derive(Clone, Debug)]
pub struct RoleAssignment {
    pub identity_id: Uuid,
    pub resource_type: ResourceType,
    pub resource_id: i64,
    pub role_name: String,
}
