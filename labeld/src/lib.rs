// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Library interface to labeld, the label service of the Gantry registry
//! control plane

// We only use rustdoc for internal documentation, including private items, so
// it's expected that we'll have links to private items in the docs.
#![allow(rustdoc::private_intra_doc_links)]

pub mod app; // Public for documentation examples
pub mod authn;
pub mod authz;
pub mod config; // Public for testing
pub mod context; // Public for documentation examples
pub mod db;
pub mod external_api; // Public for testing

pub use app::Labeld;
pub use config::Config;
pub use context::ServerContext;
use external_api::http_entrypoints::external_api;
use gantry_common::FileKv;
use slog::Logger;
use std::sync::Arc;

#[macro_use]
extern crate slog;

#[macro_use]
extern crate newtype_derive;

/// Run the OpenAPI generator for the external API, which emits the OpenAPI
/// spec to stdout.
pub fn run_openapi_external() -> Result<(), String> {
    external_api()
        .openapi("Gantry Label API", "0.0.1")
        .description("API for managing labels in the Gantry registry")
        .write(&mut std::io::stdout())
        .map_err(|e| e.to_string())
}

/// Packages up a [`Labeld`], running its external HTTP API server
pub struct Server {
    /// shared state used by API request handlers
    pub apictx: Arc<ServerContext>,
    /// dropshot server for the external API
    pub http_server_external: dropshot::HttpServer<Arc<ServerContext>>,
}

impl Server {
    /// Start a labeld server.
    pub async fn start(
        config: &Config,
        log: &Logger,
    ) -> Result<Server, String> {
        let log = log.new(o!("name" => config.id.to_string()));
        info!(log, "setting up labeld server");

        let ctxlog = log.new(o!("component" => "ServerContext"));
        let apictx = ServerContext::new(ctxlog, config);

        // The role assignments loaded here are what make the authz policy
        // enforceable, so do not accept requests until this has finished.
        apictx
            .labeld
            .load_builtin_data()
            .await
            .map_err(|error| format!("loading builtin data: {}", error))?;

        let server_starter_external = dropshot::HttpServerStarter::new(
            &config.dropshot_external,
            external_api(),
            Arc::clone(&apictx),
            &log.new(o!("component" => "dropshot_external")),
        )
        .map_err(|error| format!("initializing external server: {}", error))?;
        let http_server_external = server_starter_external.start();

        Ok(Server { apictx, http_server_external })
    }

    pub fn apictx(&self) -> &Arc<ServerContext> {
        &self.apictx
    }

    /// Wait for the server to shut down
    ///
    /// Note that this doesn't initiate a graceful shutdown, so if you call
    /// this immediately after calling `start()`, the program will block
    /// indefinitely or until something else initiates a graceful shutdown.
    pub async fn wait_for_finish(self) -> Result<(), String> {
        self.http_server_external.await
    }
}

/// Run an instance of the [Server].
pub async fn run_server(config: &Config) -> Result<(), String> {
    let base_logger = config
        .log
        .to_logger("labeld")
        .map_err(|message| format!("initializing logger: {}", message))?;
    let log = base_logger.new(o!(FileKv));
    let server = Server::start(config, &log).await?;
    server.wait_for_finish().await
}
