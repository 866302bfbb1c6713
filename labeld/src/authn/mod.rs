// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authentication facilities
//!
//! Every operation in the label service has an associated
//! authentication/authorization context that describes who (or what) is doing
//! the operation and what privileges they have.
//!
//! This module includes generic, HTTP-agnostic facilities for representing who
//! or what is authenticated and why an authentication attempt failed.
//!
//! The [`external`] submodule provides an [`external::Authenticator`] interface
//! that authenticates requests using configurable external authentication
//! mechanisms.
//!
//! Other operations may not be associated with HTTP requests at all (like
//! datastore seeding or background work), but we still want them to carry
//! information about what's authenticated and what privileges it has.  Those
//! paths construct the same [`Context`] struct through the `internal_*`
//! constructors below.

pub mod external;

pub use crate::db::fixed_data::user_builtin::USER_DB_INIT;
pub use crate::db::fixed_data::user_builtin::USER_TEST_PRIVILEGED;
pub use crate::db::fixed_data::user_builtin::USER_TEST_UNPRIVILEGED;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Describes how the actor performing the current operation is authenticated
///
/// This is HTTP-agnostic.  Subsystems in the label service could create
/// contexts for purposes unrelated to HTTP (e.g., background jobs).
#[derive(Debug)]
pub struct Context {
    /// Describes whether the user is authenticated and provides more
    /// information that's specific to whether they're authenticated or not
    kind: Kind,

    /// List of authentication schemes tried
    ///
    /// If `kind` is `Kind::Unauthenticated`, then none of these schemes found
    /// any credentials to verify.  Otherwise, whether authentication succeeded
    /// or failed, it was the last scheme in this list that was responsible for
    /// the final determination.
    schemes_tried: Vec<SchemeName>,
}

impl Context {
    /// Returns the authenticated actor, if any
    pub fn actor(&self) -> Option<&Actor> {
        self.actor_required().ok()
    }

    /// Returns the authenticated actor if present or an Unauthenticated error
    /// otherwise
    pub fn actor_required(
        &self,
    ) -> Result<&Actor, gantry_common::api::external::Error> {
        match &self.kind {
            Kind::Authenticated(Details { actor }) => Ok(actor),
            Kind::Unauthenticated => {
                Err(gantry_common::api::external::Error::Unauthenticated {
                    internal_message: "Actor required".to_string(),
                })
            }
        }
    }

    /// Returns the list of schemes tried, in order
    ///
    /// This should generally *not* be exposed to clients.
    pub fn schemes_tried(&self) -> &[SchemeName] {
        &self.schemes_tried
    }

    /// Returns an unauthenticated context for use internally
    pub fn internal_unauthenticated() -> Context {
        Context { kind: Kind::Unauthenticated, schemes_tried: vec![] }
    }

    /// Returns an authenticated context for startup datastore seeding and
    /// other internal provisioning
    pub fn internal_db_init() -> Context {
        Context::context_for_actor(USER_DB_INIT.id)
    }

    fn context_for_actor(actor_id: Uuid) -> Context {
        Context {
            kind: Kind::Authenticated(Details {
                actor: Actor { id: actor_id },
            }),
            schemes_tried: Vec::new(),
        }
    }

    /// Returns an authenticated context for a special testing user
    // Ideally this would only be exposed under `#[cfg(test)]`, but it's used
    // by `OpContext::for_tests()`.
    pub fn privileged_test_user() -> Context {
        Context::context_for_actor(USER_TEST_PRIVILEGED.id)
    }

    /// Returns an authenticated context for the special unprivileged user
    /// (for testing only)
    #[cfg(test)]
    pub fn unprivileged_test_user() -> Context {
        Context::for_test_user(USER_TEST_UNPRIVILEGED.id)
    }

    /// Returns an authenticated context for the specific user. Not marked
    /// as #[cfg(test)] so that this is available in integration tests.
    pub fn for_test_user(actor_id: Uuid) -> Context {
        Context::context_for_actor(actor_id)
    }
}


/// Describes whether the user is authenticated and provides more information
/// that's specific to whether they're authenticated (or not)
#[derive(Clone, Debug, Deserialize, Serialize)]
enum Kind {
    /// Client successfully authenticated
    Authenticated(Details),
    /// Client did not attempt to authenticate
    Unauthenticated,
}

/// Describes the actor that was authenticated
///
/// This could eventually include other information used during authorization,
/// like a remote IP, the time of authentication, etc.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Details {
    /// the actor performing the request
    actor: Actor,
}

/// Who is performing an operation
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Actor {
    pub id: Uuid,
}

/// Label for a particular authentication scheme (used in log messages and
/// internal error messages)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SchemeName(&'static str);
NewtypeDisplay! { () pub struct SchemeName(&'static str); }

/// Describes why authentication failed
///
/// This should usually *not* be exposed to end users because it can leak
/// information that makes it easier to exploit the system.  There are two
/// purposes for these codes:
///
/// 1. So that we have specific information in the logs (and maybe in the future
///    in user-visible diagnostic interfaces) for engineers or support to
///    diagnose the authentication failure after it's happened.
///
/// 2. To facilitate conversion to the appropriate [`dropshot::HttpError`] error
///    type.  This will generally have a lot less information to avoid leaking
///    information to attackers, but it's still useful to distinguish between
///    400 and 401/403, for example.
#[derive(Debug, thiserror::Error)]
#[error("authentication failed (tried schemes: {schemes_tried:?})")]
pub struct Error {
    /// list of authentication schemes that were tried
    schemes_tried: Vec<SchemeName>,
    /// why authentication failed
    #[source]
    reason: Reason,
}

#[derive(Debug, thiserror::Error)]
pub enum Reason {
    /// The authn credentials are syntactically invalid
    #[error("bad authentication credentials: {source:#}")]
    BadFormat {
        #[source]
        source: anyhow::Error,
    },

    /// We did not find the actor that was attempting to authenticate
    #[error("unknown actor {actor:?}")]
    UnknownActor { actor: String },

    /// The credentials were syntactically valid, but semantically invalid
    /// (e.g., a cryptographic signature did not match)
    #[error("bad credentials for actor {actor:?}: {source:#}")]
    BadCredentials {
        actor: Actor,
        #[source]
        source: anyhow::Error,
    },
}

impl From<Error> for dropshot::HttpError {
    fn from(authn_error: Error) -> Self {
        match authn_error.reason {
            e @ Reason::BadFormat { .. } => {
                dropshot::HttpError::for_bad_request(None, format!("{:#}", e))
            }
            // The HTTP short summary of this status code is "Unauthorized", but
            // the code describes an authentication failure, not an
            // authorization one.  This applies to cases where the request was
            // missing credentials but needs them (which we can't know here) or
            // cases where the credentials were invalid.  See RFC 7235.
            // TODO Add a WWW-Authenticate header.  We probably want to provide
            // this on all requests, since different creds can always change the
            // behavior.
            e @ Reason::UnknownActor { .. }
            | e @ Reason::BadCredentials { .. } => dropshot::HttpError::from(
                gantry_common::api::external::Error::Unauthenticated {
                    internal_message: format!("{:#}", e),
                },
            ),
        }
    }
}
