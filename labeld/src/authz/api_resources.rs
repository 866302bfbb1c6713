// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authz types for resources in the API hierarchy
//!
//! The general pattern is that for each resource that shows up in the API, we
//! have a struct here describing just enough about it to make an
//! authorization decision: its id, how it was looked up (for error
//! reporting), and how it hangs off its parent.  These are cheap to construct
//! and clone and do not borrow from the datastore.

use super::actor::AnyActor;
use super::context::AuthorizedResource;
use super::context::Authz;
use super::roles::load_roles_for_resource;
use super::roles::load_roles_for_resource_tree;
use super::roles::RoleSet;
use super::Action;
use crate::authn;
use crate::context::OpContext;
use crate::db::fixed_data::role_builtin::FLEET_ADMIN;
use crate::db::fixed_data::role_builtin::PROJECT_ADMIN;
use crate::db::fixed_data::FLEET_ID;
use crate::db::DataStore;
use futures::future::BoxFuture;
use futures::FutureExt;
use gantry_common::api::external::Error;
use gantry_common::api::external::LookupType;
use gantry_common::api::external::ResourceType;

/// Describes an authz resource that corresponds to an API resource in the
/// hierarchy (e.g., a Project or a Label)
///
/// Implementing this trait together with [`ApiResourceError`] provides an
/// implementation of [`AuthorizedResource`].
pub trait ApiResource: Clone + Send + Sync + 'static {
    /// If roles can be granted directly on this resource, returns the
    /// resource type and id used to look up those role assignments
    fn db_resource(&self) -> Option<(ResourceType, i64)>;

    /// If this resource has a parent whose roles can confer access to it,
    /// returns the parent
    fn parent(&self) -> Option<&dyn AuthorizedResource>;

    /// Evaluates the policy: returns whether `actor` (with its roles already
    /// loaded) may take `action` on this resource
    fn has_permission(&self, actor: &AnyActor, action: Action) -> bool;
}

/// Describes how to generate a "not found" error for an authz resource
pub trait ApiResourceError {
    /// Returns an error as though this resource were "not found"
    fn not_found(&self) -> Error;
}

impl<T: ApiResource + ApiResourceError> AuthorizedResource for T {
    fn load_roles<'a, 'b, 'c, 'd, 'e, 'f>(
        &'a self,
        opctx: &'b OpContext,
        datastore: &'c DataStore,
        authn: &'d authn::Context,
        roleset: &'e mut RoleSet,
    ) -> BoxFuture<'f, Result<(), Error>>
    where
        'a: 'f,
        'b: 'f,
        'c: 'f,
        'd: 'f,
        'e: 'f,
    {
        load_roles_for_resource_tree(self, opctx, datastore, authn, roleset)
            .boxed()
    }

    fn is_allowed(&self, actor: &AnyActor, action: Action) -> bool {
        self.has_permission(actor, action)
    }

    fn on_unauthorized(
        &self,
        authz: &Authz,
        error: Error,
        actor: AnyActor,
        action: Action,
    ) -> Error {
        if action == Action::Read {
            return self.not_found();
        }

        // If the actor failed an authz check, and they can't even read this
        // resource, then we should produce a 404 rather than a 401/403.
        if authz.is_allowed(&actor, Action::Read, self) {
            error
        } else {
            self.not_found()
        }
    }
}

/// Represents the whole Gantry deployment ("fleet") for authz purposes
///
/// This object is used for authorization checks on fleet-wide resources
/// (like global-scope labels) by passing it as the `resource` argument to
/// [`crate::context::OpContext::authorize()`].  You don't construct a `Fleet`
/// yourself -- use the global [`FLEET`].
#[derive(Clone, Copy, Debug)]
pub struct Fleet;

/// Singleton representing the [`Fleet`] itself for authz purposes
pub const FLEET: Fleet = Fleet;

impl Eq for Fleet {}
impl PartialEq for Fleet {
    fn eq(&self, _: &Self) -> bool {
        // There is only one Fleet.
        true
    }
}

impl Fleet {
    /// Returns an authz resource representing a child Project
    pub fn project(&self, project_id: i64, lookup_type: LookupType) -> Project {
        Project { project_id, lookup_type }
    }

    /// Returns an authz resource representing a global-scope Label
    pub fn label(&self, label_id: i64, lookup_type: LookupType) -> Label {
        Label { parent: LabelParent::Fleet, label_id, lookup_type }
    }
}

impl AuthorizedResource for Fleet {
    fn load_roles<'a, 'b, 'c, 'd, 'e, 'f>(
        &'a self,
        opctx: &'b OpContext,
        datastore: &'c DataStore,
        authn: &'d authn::Context,
        roleset: &'e mut RoleSet,
    ) -> BoxFuture<'f, Result<(), Error>>
    where
        'a: 'f,
        'b: 'f,
        'c: 'f,
        'd: 'f,
        'e: 'f,
    {
        load_roles_for_resource(
            opctx,
            datastore,
            authn,
            ResourceType::Fleet,
            FLEET_ID,
            roleset,
        )
        .boxed()
    }

    fn is_allowed(&self, actor: &AnyActor, action: Action) -> bool {
        match action {
            // Anybody (even an unauthenticated client) can read fleet-wide
            // resources and list their children.
            Action::Read | Action::ListChildren => true,
            Action::CreateChild | Action::Modify | Action::Delete => {
                actor.authn_actor().map_or(false, |actor| {
                    actor.has_role_resource(
                        ResourceType::Fleet,
                        FLEET_ID,
                        FLEET_ADMIN.role_name,
                    )
                })
            }
        }
    }

    fn on_unauthorized(
        &self,
        _: &Authz,
        error: Error,
        _: AnyActor,
        _: Action,
    ) -> Error {
        // The Fleet is visible to everyone, so there's no masking to do.
        error
    }
}

/// Represents a [`crate::db::model::Project`] for authz purposes
///
/// This object is used for authorization checks on a Project or its labels by
/// passing it as the `resource` argument to
/// [`crate::context::OpContext::authorize()`].  Construct one with
/// [`Fleet::project()`].
#[derive(Clone, Debug)]
pub struct Project {
    project_id: i64,
    lookup_type: LookupType,
}

impl Eq for Project {}
impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.project_id == other.project_id
    }
}

impl Project {
    pub fn id(&self) -> i64 {
        self.project_id
    }

    /// Returns an authz resource representing a Label scoped to this Project
    pub fn label(&self, label_id: i64, lookup_type: LookupType) -> Label {
        Label {
            parent: LabelParent::Project(self.clone()),
            label_id,
            lookup_type,
        }
    }
}

impl ApiResource for Project {
    fn db_resource(&self) -> Option<(ResourceType, i64)> {
        Some((ResourceType::Project, self.project_id))
    }

    fn parent(&self) -> Option<&dyn AuthorizedResource> {
        Some(&FLEET)
    }

    fn has_permission(&self, actor: &AnyActor, action: Action) -> bool {
        match action {
            // Project membership is not required to read a project or list
            // its labels.
            Action::Read | Action::ListChildren => true,
            Action::CreateChild | Action::Modify | Action::Delete => {
                actor.authn_actor().map_or(false, |actor| {
                    actor.has_role_resource(
                        ResourceType::Fleet,
                        FLEET_ID,
                        FLEET_ADMIN.role_name,
                    ) || actor.has_role_resource(
                        ResourceType::Project,
                        self.project_id,
                        PROJECT_ADMIN.role_name,
                    )
                })
            }
        }
    }
}

impl ApiResourceError for Project {
    fn not_found(&self) -> Error {
        self.lookup_type.clone().into_not_found(ResourceType::Project)
    }
}

/// Represents a [`crate::db::model::Label`] for authz purposes
///
/// This object is used for authorization checks on a Label by passing it as
/// the `resource` argument to
/// [`crate::context::OpContext::authorize()`].  Construct one with
/// [`Fleet::label()`] (global scope) or [`Project::label()`] (project scope).
#[derive(Clone, Debug)]
pub struct Label {
    parent: LabelParent,
    label_id: i64,
    lookup_type: LookupType,
}

/// The scope that owns a [`Label`] for authz purposes
#[derive(Clone, Debug)]
enum LabelParent {
    Fleet,
    Project(Project),
}

impl Label {
    pub fn id(&self) -> i64 {
        self.label_id
    }
}

impl ApiResource for Label {
    fn db_resource(&self) -> Option<(ResourceType, i64)> {
        // Roles cannot be granted directly on a label.
        None
    }

    fn parent(&self) -> Option<&dyn AuthorizedResource> {
        match &self.parent {
            LabelParent::Fleet => Some(&FLEET),
            LabelParent::Project(project) => Some(project),
        }
    }

    fn has_permission(&self, actor: &AnyActor, action: Action) -> bool {
        match action {
            // Anybody can read a label.
            Action::Read | Action::ListChildren => true,
            Action::CreateChild | Action::Modify | Action::Delete => {
                // Mutating a label requires the same permission on the scope
                // that owns it.
                match &self.parent {
                    LabelParent::Fleet => FLEET.is_allowed(actor, action),
                    LabelParent::Project(project) => {
                        project.has_permission(actor, action)
                    }
                }
            }
        }
    }
}

impl ApiResourceError for Label {
    fn not_found(&self) -> Error {
        self.lookup_type.clone().into_not_found(ResourceType::Label)
    }
}
