// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared state used by API request handlers

use crate::app::Labeld;
use crate::authn;
use crate::authn::external::spoof::HttpAuthnSpoof;
use crate::authn::external::HttpAuthnScheme;
use crate::authz;
use crate::authz::AuthorizedResource;
use crate::config;
use crate::config::Config;
use crate::db::DataStore;
use gantry_common::api::external::Error;
use slog::Logger;
use std::fmt::Debug;
use std::sync::Arc;

/// Shared state available to all API request handlers
pub struct ServerContext {
    /// reference to the underlying label service
    pub labeld: Arc<Labeld>,
    /// debug log
    pub log: Logger,
    /// authenticator for external HTTP requests
    pub external_authn: authn::external::Authenticator<Arc<ServerContext>>,
}

impl ServerContext {
    /// Create a new context with the given log.  This creates the underlying
    /// service state as well.
    pub fn new(log: Logger, config: &Config) -> Arc<ServerContext> {
        let schemes = config
            .authn_schemes_external
            .iter()
            .map::<Box<dyn HttpAuthnScheme<Arc<ServerContext>>>, _>(|name| {
                match name {
                    config::SchemeName::Spoof => Box::new(HttpAuthnSpoof),
                }
            })
            .collect::<Vec<_>>();
        let external_authn = authn::external::Authenticator::new(schemes);

        Arc::new(ServerContext {
            labeld: Labeld::new_with_id(
                config.id,
                log.new(o!("component" => "labeld")),
            ),
            log,
            external_authn,
        })
    }
}

/// Provides general facilities scoped to whatever operation the service is
/// currently doing
///
/// Every operation the service performs happens on behalf of some actor,
/// whether that's an external client or the service itself (e.g., when
/// loading built-in data at startup).  The OpContext carries the resolved
/// authentication context, the interface for making authorization checks,
/// and a logger annotated with information about the operation.
pub struct OpContext {
    pub log: Logger,
    pub authn: Arc<authn::Context>,

    authz: authz::Context,
}

impl OpContext {
    /// Build an OpContext for an external API request, authenticating the
    /// request in the process
    ///
    /// If authentication fails (as opposed to the request simply carrying no
    /// credentials), this fails with the corresponding HTTP error.
    pub async fn for_external_api(
        rqctx: &dropshot::RequestContext<Arc<ServerContext>>,
    ) -> Result<OpContext, dropshot::HttpError> {
        let apictx = rqctx.context();
        let authn = Arc::new(apictx.external_authn.authn_request(rqctx).await?);
        let log = if let Some(actor) = authn.actor() {
            rqctx.log.new(o!(
                "authenticated" => true,
                "actor" => format!("{:?}", actor),
            ))
        } else {
            rqctx.log.new(o!("authenticated" => false))
        };

        let labeld = &apictx.labeld;
        let authz = authz::Context::new(
            Arc::clone(&authn),
            Arc::clone(labeld.authz()),
            Arc::clone(labeld.datastore()),
        );
        Ok(OpContext { log, authn, authz })
    }

    /// Build an OpContext for an operation the service performs on its own,
    /// rather than on behalf of an external request
    pub fn for_background(
        log: Logger,
        authz: Arc<authz::Authz>,
        authn: authn::Context,
        datastore: Arc<DataStore>,
    ) -> OpContext {
        let authn = Arc::new(authn);
        let authz = authz::Context::new(Arc::clone(&authn), authz, datastore);
        OpContext { log, authn, authz }
    }

    /// Build an OpContext for use in tests, authenticated as the privileged
    /// test user
    pub fn for_tests(log: Logger, datastore: Arc<DataStore>) -> OpContext {
        let authn = Arc::new(authn::Context::privileged_test_user());
        let authz = authz::Context::new(
            Arc::clone(&authn),
            Arc::new(authz::Authz::new()),
            datastore,
        );
        OpContext { log, authn, authz }
    }

    /// Check whether the actor performing this operation is authorized for
    /// `action` on `resource`.
    pub async fn authorize<Resource>(
        &self,
        action: authz::Action,
        resource: &Resource,
    ) -> Result<(), Error>
    where
        Resource: AuthorizedResource + Debug,
    {
        let result = self.authz.authorize(self, action, resource).await;
        debug!(self.log, "authorize result";
            "action" => ?action,
            "resource" => ?*resource,
            "result" => ?result,
        );
        result
    }
}
