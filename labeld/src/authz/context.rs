// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Guts of the authorization subsystem

use super::actor::AnyActor;
use super::roles::RoleSet;
use super::Action;
use crate::authn;
use crate::context::OpContext;
use crate::db::DataStore;
use futures::future::BoxFuture;
use gantry_common::api::external::Error;
use std::sync::Arc;

/// Server-wide authorization context
///
/// This object is constructed once at startup and shared by all requests.
/// There is currently no configurable state here: the policy itself is
/// defined by each resource type's [`AuthorizedResource::is_allowed`] hook.
pub struct Authz {}

impl Authz {
    pub fn new() -> Authz {
        Authz {}
    }

    /// Returns whether `actor` (with its roles already loaded) is allowed to
    /// take `action` on `resource`
    pub fn is_allowed<R>(
        &self,
        actor: &AnyActor,
        action: Action,
        resource: &R,
    ) -> bool
    where
        R: AuthorizedResource + ?Sized,
    {
        resource.is_allowed(actor, action)
    }
}

/// Operation-specific authorization context
///
/// This is the primary external interface for the authorization subsystem,
/// through the [`Context::authorize()`] function.  See the [`crate::authz`]
/// module documentation for more background.
pub struct Context {
    authn: Arc<authn::Context>,
    authz: Arc<Authz>,
    datastore: Arc<DataStore>,
}

impl Context {
    pub fn new(
        authn: Arc<authn::Context>,
        authz: Arc<Authz>,
        datastore: Arc<DataStore>,
    ) -> Context {
        Context { authn, authz, datastore }
    }

    /// Check whether the actor performing this request is authorized for
    /// `action` on `resource`.
    pub async fn authorize<Resource>(
        &self,
        opctx: &OpContext,
        action: Action,
        resource: &Resource,
    ) -> Result<(), Error>
    where
        Resource: AuthorizedResource,
    {
        let mut roles = RoleSet::new();
        resource
            .load_roles(opctx, &self.datastore, &self.authn, &mut roles)
            .await?;
        debug!(opctx.log, "roles"; "roles" => ?roles);

        let actor = AnyActor::new(&self.authn, roles);
        if self.authz.is_allowed(&actor, action, resource) {
            return Ok(());
        }

        let error = if actor.authenticated() {
            Error::Forbidden
        } else {
            // If the request was not authenticated, produce a 401
            // ("Unauthorized") instead of a 403 ("Forbidden").
            Error::Unauthenticated {
                internal_message: String::from(
                    "authorization failed for unauthenticated request",
                ),
            }
        };

        Err(resource.on_unauthorized(&self.authz, error, actor, action))
    }
}

/// Represents anything that can be the subject of an authorization check
///
/// This is implemented for all of the API resource types (see
/// [`super::api_resources`]) plus the synthetic [`super::Fleet`] at the root
/// of the hierarchy.
pub trait AuthorizedResource: Send + Sync + 'static {
    /// Find all roles for the actor described in `authn` that might be used
    /// to make an authorization decision on `self` (a resource)
    ///
    /// You can imagine that this function would first find roles that are
    /// explicitly associated with this resource in the datastore.  Then it
    /// would also find roles for the parent resource, since, for example,
    /// an admin of a project should also be able to modify the labels scoped
    /// to it.  This process continues up the hierarchy.
    ///
    /// That's how this works for most resources.  There are other kinds of
    /// resources (like the Fleet itself) that aren't part of the usual
    /// hierarchy.  For those, the behavior is different.
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
        'e: 'f;

    /// Returns whether `actor` (with its roles loaded into it) is allowed to
    /// take `action` on this resource
    fn is_allowed(&self, actor: &AnyActor, action: Action) -> bool;

    /// Invoked on authz failure to determine the final authz result
    ///
    /// This is used for cases where we want to change the error result on
    /// failure, e.g., return a "not found" rather than a "forbidden" so that
    /// an unauthorized caller cannot tell whether the resource exists.
    fn on_unauthorized(
        &self,
        authz: &Authz,
        error: Error,
        actor: AnyActor,
        action: Action,
    ) -> Error;
}
