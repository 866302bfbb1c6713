// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fetching roles for an authenticated actor
//!
//! For important background, see the [`crate::authz`] module documentation.
//!
//! By the time we get here, we already know what actor is performing the
//! request and what action they're trying to perform on what resource.
//! Before evaluating the policy, we load _all_ of the actor's roles that
//! could possibly affect the decision into a [`RoleSet`].  In practice, that
//! means that if they're trying to modify a label in a project, we'll fetch
//! any roles they have on that project and any roles they have on the fleet.
//! This is done by [`load_roles_for_resource_tree`], which walks up the
//! resource hierarchy via each resource's `parent()`.
//!
//! Once the roles are loaded, evaluating the policy is a synchronous
//! operation on the in-memory [`RoleSet`].  We could instead look up specific
//! roles while evaluating the policy, but loading them all up front keeps the
//! number of datastore queries bounded by the depth of the hierarchy.

use super::api_resources::ApiResource;
use super::context::AuthorizedResource;
use crate::authn;
use crate::context::OpContext;
use crate::db::DataStore;
use gantry_common::api::external::Error;
use gantry_common::api::external::ResourceType;
use std::collections::BTreeSet;

/// A set of roles attached to a particular actor
///
/// This is used to pre-fetch all of the roles that an actor has on various
/// resources so that the policy can be evaluated without blocking.  For more
/// on the built-in roles themselves, see
/// [`crate::db::fixed_data::role_builtin`].
#[derive(Clone, Debug)]
pub struct RoleSet {
    roles: BTreeSet<(ResourceType, i64, String)>,
}

impl RoleSet {
    pub fn new() -> RoleSet {
        RoleSet { roles: BTreeSet::new() }
    }

    pub fn has_role(
        &self,
        resource_type: ResourceType,
        resource_id: i64,
        role_name: &str,
    ) -> bool {
        self.roles.contains(&(
            resource_type,
            resource_id,
            role_name.to_string(),
        ))
    }

    fn insert(
        &mut self,
        resource_type: ResourceType,
        resource_id: i64,
        role_name: &str,
    ) {
        self.roles.insert((
            resource_type,
            resource_id,
            String::from(role_name),
        ));
    }
}

/// Load all roles that the actor in `authn` has on `resource` or any of the
/// resources it hangs off of (e.g., its project or the fleet)
pub async fn load_roles_for_resource_tree<R>(
    resource: &R,
    opctx: &OpContext,
    datastore: &DataStore,
    authn: &authn::Context,
    roleset: &mut RoleSet,
) -> Result<(), Error>
where
    R: ApiResource,
{
    // If roles can be assigned directly on this resource, load the actor's
    // roles on it.
    if let Some((resource_type, resource_id)) = resource.db_resource() {
        load_roles_for_resource(
            opctx,
            datastore,
            authn,
            resource_type,
            resource_id,
            roleset,
        )
        .await?;
    }

    // If the resource has a parent, the actor's roles on the parent might
    // grant them access to this resource.  We have to fetch those, too.  This
    // process continues up the hierarchy to the fleet.
    //
    // (In general, there could be another resource with _any_ kind of
    // relationship to this one that grants the actor a role that grants
    // access to this resource.  In practice, we only use "parent".)
    if let Some(parent) = resource.parent() {
        parent.load_roles(opctx, datastore, authn, roleset).await?;
    }

    Ok(())
}

/// Load the roles that the actor in `authn` has been explicitly granted on
/// the resource identified by `resource_type` and `resource_id`
pub async fn load_roles_for_resource(
    opctx: &OpContext,
    datastore: &DataStore,
    authn: &authn::Context,
    resource_type: ResourceType,
    resource_id: i64,
    roleset: &mut RoleSet,
) -> Result<(), Error> {
    // If the request is unauthenticated, there's nothing to fetch.
    if let Some(actor) = authn.actor() {
        trace!(opctx.log, "loading roles";
            "actor_id" => actor.id.to_string(),
            "resource_type" => ?resource_type,
            "resource_id" => resource_id,
        );

        let roles = datastore
            .role_asgn_list_for(opctx, actor.id, resource_type, resource_id)
            .await?;

        // Add each role to the output roleset.
        for role_asgn in roles {
            roleset.insert(resource_type, resource_id, &role_asgn.role_name);
        }
    }

    Ok(())
}
