// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primary interface for reading and writing label service state
//!
//! All durable state lives in process memory behind one mutex.  Each public
//! method is atomic with respect to the others.  In particular, the
//! uniqueness check for label creation and the insert itself happen under a
//! single lock acquisition, so two concurrent creates of the same
//! `(name, scope, project)` tuple cannot both succeed.  The lock is never
//! held across an `.await`.
//!
//! Like everything else that acts on behalf of a request, these methods take
//! an [`OpContext`] and check authorization themselves before touching any
//! table.

use crate::authz;
use crate::context::OpContext;
use crate::db::fixed_data::role_builtin::BUILTIN_ROLES;
use crate::db::model::IncompleteLabel;
use crate::db::model::Label;
use crate::db::model::LabelUpdate;
use crate::db::model::Project;
use crate::db::model::RoleAssignment;
use chrono::Utc;
use gantry_common::api::external::CreateResult;
use gantry_common::api::external::DeleteResult;
use gantry_common::api::external::Error;
use gantry_common::api::external::LabelScope;
use gantry_common::api::external::ListResultVec;
use gantry_common::api::external::LookupResult;
use gantry_common::api::external::LookupType;
use gantry_common::api::external::ResourceType;
use gantry_common::api::external::UpdateResult;
use gantry_common::bail_unless;
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

pub struct DataStore {
    data: Mutex<Tables>,
}

/// The tables behind the [`DataStore`] lock
///
/// Label and project ids are assigned here, sequentially from 1, so id 0
/// never identifies a record.
struct Tables {
    labels: BTreeMap<i64, Label>,
    projects: BTreeMap<i64, Project>,
    role_assignments: Vec<RoleAssignment>,
    next_label_id: i64,
    next_project_id: i64,
}

impl Tables {
    /// Insert a label, enforcing the uniqueness constraint
    fn label_insert(&mut self, new_label: IncompleteLabel) -> CreateResult<Label> {
        if self.labels.values().any(|label| {
            label.name == new_label.name
                && label.scope == new_label.scope
                && label.project_id == new_label.project_id
        }) {
            return Err(Error::ObjectAlreadyExists {
                type_name: ResourceType::Label,
                object_name: new_label.name,
            });
        }

        let id = self.next_label_id;
        self.next_label_id += 1;
        let label = Label::new(id, new_label);
        self.labels.insert(id, label.clone());
        Ok(label)
    }
}

impl DataStore {
    /// Construct an empty datastore
    ///
    /// The built-in role assignments are not part of the initial state.  They
    /// get loaded by [`crate::app::Labeld::load_builtin_data()`] when the
    /// service starts up.
    pub fn new() -> DataStore {
        DataStore {
            data: Mutex::new(Tables {
                labels: BTreeMap::new(),
                projects: BTreeMap::new(),
                role_assignments: Vec::new(),
                next_label_id: 1,
                next_project_id: 1,
            }),
        }
    }

    /// Fetch a label by id, along with the authz resource describing it
    ///
    /// The authz resource reflects the label's stored scope, so callers can
    /// use it to authorize actions against the right parent.
    pub async fn label_lookup(
        &self,
        opctx: &OpContext,
        label_id: i64,
    ) -> LookupResult<(authz::Label, Label)> {
        let label = {
            let data = self.data.lock().unwrap();
            data.labels.get(&label_id).cloned().ok_or_else(|| {
                Error::not_found_by_id(ResourceType::Label, label_id)
            })?
        };
        let authz_label = label_authz(&label)?;
        opctx.authorize(authz::Action::Read, &authz_label).await?;
        Ok((authz_label, label))
    }

    /// Create a global-scope label
    pub async fn label_create_global(
        &self,
        opctx: &OpContext,
        new_label: IncompleteLabel,
    ) -> CreateResult<Label> {
        bail_unless!(
            new_label.scope == LabelScope::Global
                && new_label.project_id.is_none(),
            "label_create_global() on non-global label {:?}",
            new_label
        );
        opctx.authorize(authz::Action::CreateChild, &authz::FLEET).await?;

        let mut data = self.data.lock().unwrap();
        data.label_insert(new_label)
    }

    /// Create a label scoped to the given project
    ///
    /// Fails with `ObjectNotFound` if the project does not exist.  That check
    /// is made under the same lock acquisition as the insert.
    pub async fn label_create_in_project(
        &self,
        opctx: &OpContext,
        authz_project: &authz::Project,
        new_label: IncompleteLabel,
    ) -> CreateResult<Label> {
        bail_unless!(
            new_label.scope == LabelScope::Project
                && new_label.project_id == Some(authz_project.id()),
            "label_create_in_project() project mismatch for label {:?}",
            new_label
        );
        opctx.authorize(authz::Action::CreateChild, authz_project).await?;

        let mut data = self.data.lock().unwrap();
        if !data.projects.contains_key(&authz_project.id()) {
            return Err(Error::not_found_by_id(
                ResourceType::Project,
                authz_project.id(),
            ));
        }
        data.label_insert(new_label)
    }

    /// List global-scope labels in id order, optionally filtered to names
    /// containing `name_filter`
    pub async fn labels_list_global(
        &self,
        opctx: &OpContext,
        name_filter: Option<&str>,
    ) -> ListResultVec<Label> {
        opctx.authorize(authz::Action::ListChildren, &authz::FLEET).await?;

        let data = self.data.lock().unwrap();
        Ok(data
            .labels
            .values()
            .filter(|label| label.scope == LabelScope::Global)
            .filter(|label| name_matches(label, name_filter))
            .cloned()
            .collect())
    }

    /// List a project's labels in id order, optionally filtered to names
    /// containing `name_filter`
    ///
    /// A project with no labels (including a project that doesn't exist) just
    /// produces an empty list.
    pub async fn labels_list_in_project(
        &self,
        opctx: &OpContext,
        authz_project: &authz::Project,
        name_filter: Option<&str>,
    ) -> ListResultVec<Label> {
        opctx.authorize(authz::Action::ListChildren, authz_project).await?;

        let data = self.data.lock().unwrap();
        Ok(data
            .labels
            .values()
            .filter(|label| {
                label.scope == LabelScope::Project
                    && label.project_id == Some(authz_project.id())
            })
            .filter(|label| name_matches(label, name_filter))
            .cloned()
            .collect())
    }

    /// Apply a validated update to a label's mutable fields
    pub async fn label_update(
        &self,
        opctx: &OpContext,
        authz_label: &authz::Label,
        update: LabelUpdate,
    ) -> UpdateResult<()> {
        opctx.authorize(authz::Action::Modify, authz_label).await?;

        let mut data = self.data.lock().unwrap();
        let label =
            data.labels.get_mut(&authz_label.id()).ok_or_else(|| {
                Error::not_found_by_id(ResourceType::Label, authz_label.id())
            })?;
        label.name = update.name;
        label.description = update.description;
        label.color = update.color;
        label.time_modified = Utc::now();
        Ok(())
    }

    /// Delete a label
    ///
    /// This is a hard delete.  A subsequent delete of the same id fails with
    /// `ObjectNotFound`.
    pub async fn label_delete(
        &self,
        opctx: &OpContext,
        authz_label: &authz::Label,
    ) -> DeleteResult {
        opctx.authorize(authz::Action::Delete, authz_label).await?;

        let mut data = self.data.lock().unwrap();
        data.labels.remove(&authz_label.id()).ok_or_else(|| {
            Error::not_found_by_id(ResourceType::Label, authz_label.id())
        })?;
        Ok(())
    }

    /// Create a project
    ///
    /// Projects are managed elsewhere in the control plane.  This exists so
    /// that a deployment (or a test) can mirror the projects that labels will
    /// be scoped to.
    pub async fn project_create(
        &self,
        opctx: &OpContext,
        name: &str,
    ) -> CreateResult<Project> {
        opctx.authorize(authz::Action::CreateChild, &authz::FLEET).await?;

        let mut data = self.data.lock().unwrap();
        let id = data.next_project_id;
        data.next_project_id += 1;
        let project = Project { id, name: name.to_string() };
        data.projects.insert(id, project.clone());
        Ok(project)
    }

    /// Grant a built-in role on a resource to the given identity
    pub async fn role_grant(
        &self,
        opctx: &OpContext,
        identity_id: Uuid,
        resource_type: ResourceType,
        resource_id: i64,
        role_name: &str,
    ) -> Result<(), Error> {
        // Only built-in roles can be granted.
        bail_unless!(
            BUILTIN_ROLES.iter().any(|role| {
                role.resource_type == resource_type
                    && role.role_name == role_name
            }),
            "attempt to grant unknown role {:?} on {:?}",
            role_name,
            resource_type
        );

        match resource_type {
            ResourceType::Fleet => {
                opctx.authorize(authz::Action::Modify, &authz::FLEET).await?;
            }
            ResourceType::Project => {
                let authz_project = authz::FLEET.project(
                    resource_id,
                    LookupType::ById(resource_id),
                );
                opctx.authorize(authz::Action::Modify, &authz_project).await?;
            }
            // No built-in roles exist for labels, so the check above has
            // already failed.
            ResourceType::Label => {
                return Err(Error::internal_error(
                    "roles cannot be granted on labels",
                ));
            }
        }

        let mut data = self.data.lock().unwrap();
        let already_granted = data.role_assignments.iter().any(|assignment| {
            assignment.identity_id == identity_id
                && assignment.resource_type == resource_type
                && assignment.resource_id == resource_id
                && assignment.role_name == role_name
        });
        if !already_granted {
            data.role_assignments.push(RoleAssignment {
                identity_id,
                resource_type,
                resource_id,
                role_name: role_name.to_string(),
            });
        }
        Ok(())
    }

    /// Return the roles that `identity_id` has been granted on the given
    /// resource
    ///
    /// This is used by the authz machinery itself while loading roles, so
    /// unlike the other methods here it must not call
    /// [`OpContext::authorize()`].
    pub async fn role_asgn_list_for(
        &self,
        _opctx: &OpContext,
        identity_id: Uuid,
        resource_type: ResourceType,
        resource_id: i64,
    ) -> ListResultVec<RoleAssignment> {
        let data = self.data.lock().unwrap();
        Ok(data
            .role_assignments
            .iter()
            .filter(|assignment| {
                assignment.identity_id == identity_id
                    && assignment.resource_type == resource_type
                    && assignment.resource_id == resource_id
            })
            .cloned()
            .collect())
    }
}

// Constructs the authz resource describing `label`, based on its stored
// scope.
fn label_authz(label: &Label) -> Result<authz::Label, Error> {
    match label.scope {
        LabelScope::Global => {
            Ok(authz::FLEET.label(label.id, LookupType::ById(label.id)))
        }
        LabelScope::Project => {
            let project_id = label.project_id.ok_or_else(|| {
                Error::internal_error(&format!(
                    "project-scoped label {} has no project id",
                    label.id
                ))
            })?;
            Ok(authz::FLEET
                .project(project_id, LookupType::ById(project_id))
                .label(label.id, LookupType::ById(label.id)))
        }
    }
}

fn name_matches(label: &Label, name_filter: Option<&str>) -> bool {
    name_filter.map_or(true, |needle| label.name.contains(needle))
}
