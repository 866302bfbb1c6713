// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Actor-related types used in the authorization subsystem

use super::roles::RoleSet;
use crate::authn;
use crate::db::fixed_data::user_builtin::USER_DB_INIT;
use crate::db::fixed_data::FLEET_ID;
use gantry_common::api::external::ResourceType;
use uuid::Uuid;

/// Represents the actor performing a request for authorization purposes
///
/// This may be an authenticated actor or not.  The policy hooks on each
/// resource decide what unauthenticated actors can do.
#[derive(Clone, Debug)]
pub struct AnyActor {
    authenticated: bool,
    actor_id: Option<Uuid>,
    roles: RoleSet,
}

impl AnyActor {
    pub fn new(authn: &authn::Context, roles: RoleSet) -> AnyActor {
        let actor = authn.actor();
        AnyActor {
            authenticated: actor.is_some(),
            actor_id: actor.map(|a| a.id),
            roles,
        }
    }

    pub fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// Returns the authenticated actor, if the request was authenticated
    pub fn authn_actor(&self) -> Option<AuthenticatedActor> {
        self.actor_id.map(|actor_id| AuthenticatedActor {
            actor_id,
            roles: self.roles.clone(),
        })
    }
}

/// Represents an authenticated [`AnyActor`] for authorization purposes
#[derive(Clone, Debug)]
pub struct AuthenticatedActor {
    actor_id: Uuid,
    roles: RoleSet,
}

impl AuthenticatedActor {
    /// Returns whether this actor has the given role for the given resource
    pub fn has_role_resource(
        &self,
        resource_type: ResourceType,
        resource_id: i64,
        role: &str,
    ) -> bool {
        // This rule is used to bootstrap the rest of the built-in role
        // assignments: the "db-init" user gets to grant the other built-in
        // roles before any roles exist in the datastore.
        (resource_type == ResourceType::Fleet
            && resource_id == FLEET_ID
            && role == "admin"
            && self.actor_id == USER_DB_INIT.id)
            || self.roles.has_role(resource_type, resource_id, role)
    }
}
