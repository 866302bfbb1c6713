// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authentication for requests to the external HTTP API

use crate::authn;
use async_trait::async_trait;
use authn::Reason;
use dropshot::RequestContext;

pub mod spoof;

/// Authenticates incoming HTTP requests using schemes intended for use by the
/// external API
///
/// (This will eventually support something like HTTP signatures or OAuth.  For
/// now, only a dummy scheme is supported.)
pub struct Authenticator<T> {
    allowed_schemes: Vec<Box<dyn HttpAuthnScheme<T>>>,
}

impl<T> Authenticator<T>
where
    T: Send + Sync + 'static,
{
    /// Build a new authenticator that allows only the specified schemes
    pub fn new(
        allowed_schemes: impl IntoIterator<Item = Box<dyn HttpAuthnScheme<T>>>,
    ) -> Authenticator<T> {
        Authenticator {
            allowed_schemes: allowed_schemes.into_iter().collect(),
        }
    }

    /// Authenticate an incoming HTTP request
    pub async fn authn_request(
        &self,
        rqctx: &RequestContext<T>,
    ) -> Result<authn::Context, authn::Error> {
        let log = &rqctx.log;
        let request = &rqctx.request;
        let ctx: &T = rqctx.context();
        self.authn_request_generic(ctx, log, request).await
    }

    /// Authenticate an incoming HTTP request (dropshot-agnostic)
    pub async fn authn_request_generic(
        &self,
        ctx: &T,
        log: &slog::Logger,
        request: &dropshot::RequestInfo,
    ) -> Result<authn::Context, authn::Error> {
        // For debuggability, keep track of the schemes that we've tried.
        let mut schemes_tried = Vec::with_capacity(self.allowed_schemes.len());
        for scheme_impl in &self.allowed_schemes {
            let scheme_name = scheme_impl.name();
            trace!(log, "authn: trying {:?}", scheme_name);
            schemes_tried.push(scheme_name);
            let result = scheme_impl.authn(ctx, log, request).await;
            match result {
                SchemeResult::Failed(reason) => {
                    return Err(authn::Error { reason, schemes_tried })
                }
                SchemeResult::Authenticated(details) => {
                    return Ok(authn::Context {
                        kind: authn::Kind::Authenticated(details),
                        schemes_tried,
                    })
                }
                SchemeResult::NotRequested => (),
            }
        }

        Ok(authn::Context {
            kind: authn::Kind::Unauthenticated,
            schemes_tried,
        })
    }
}

/// Implements a particular HTTP authentication scheme
#[async_trait]
pub trait HttpAuthnScheme<T>: std::fmt::Debug + Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Returns the (unique) name for this scheme (for observability)
    fn name(&self) -> authn::SchemeName;

    /// Locate credentials in the HTTP request and attempt to verify them
    async fn authn(
        &self,
        ctx: &T,
        log: &slog::Logger,
        request: &dropshot::RequestInfo,
    ) -> SchemeResult;
}

/// Result returned by a particular authentication scheme
#[derive(Debug)]
pub enum SchemeResult {
    /// The client is not trying to use this authn scheme
    NotRequested,
    /// The client successfully authenticated
    Authenticated(super::Details),
    /// The client tried and failed to authenticate
    Failed(Reason),
}
