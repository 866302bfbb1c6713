// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Authorization subsystem
//!
//! ## Authorization basics
//!
//! Our external authorization policy is expressed in terms of role-based
//! access control (RBAC), meaning that an *actor* can perform an *action* on
//! a *resource* if the actor is associated with a *role* on the resource that
//! grants *permissions* for the action.  Let's unpack that.
//!
//! - **actor** is a built-in user or a user provisioned in the registry.
//! - **resource** is usually an API resource, like a Project or a Label.
//! - **action** is one of a handful of things like "modify", "delete", or
//!   "create a child resource".  Actions are nearly the same as
//!   **permissions**.  The set of actions is fixed by the system.
//! - **role** is just a set of permissions.  Only built-in roles are
//!   supported.
//!
//! The **policy** determines what roles grant what permissions.  This is
//! baked into the service (each resource type's policy hook) and cannot be
//! changed at runtime.
//!
//! The policy defines rules saying things like:
//!
//! - anybody, even an unauthenticated client, can read a Label
//! - for Projects, the "admin" role is required to create, modify, or delete
//!   the labels scoped to that Project; the "developer" and "guest" roles are
//!   not enough
//! - Projects have a "parent" relationship with the Fleet, such that someone
//!   with the "admin" role on the Fleet automatically gets the "admin" role
//!   on every Project
//!
//! To make these concrete, suppose we have a Project "paste-deploys" and two
//! users: "valentina", who has been granted the "admin" role on the Fleet,
//! and "devon", who has been granted the "developer" role on Project
//! "paste-deploys".  Both users can list and read the Project's labels (so
//! can anyone).  Only Valentina can create or delete them: her Fleet role
//! confers the Project "admin" role, while Devon's "developer" role grants
//! read access that they already had.
//!
//! So to determine if someone has access, we wind up checking for a variety
//! of roles on several different objects (the resource itself, then its
//! parents up to the Fleet).  The `roles` submodule handles collecting those;
//! each resource type's `is_allowed` hook evaluates the policy against the
//! collected set.

mod actor;
pub use actor::AnyActor;
pub use actor::AuthenticatedActor;

mod api_resources;
pub use api_resources::*;

mod context;
pub use context::AuthorizedResource;
pub use context::Authz;
pub use context::Context;

mod roles;
pub use roles::RoleSet;

/// Describes an action being authorized
///
/// There's currently just one enum of actions for all of our resources.  We
/// could define the actions per-resource instead, but that currently seems
/// like more trouble than it's worth.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Read,
    ListChildren,
    CreateChild,
    Modify,
    Delete,
}
