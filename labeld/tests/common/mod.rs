// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared integration testing facilities

pub mod http_testing;

use camino::Utf8Path;
use dropshot::test_util::ClientTestContext;
use dropshot::test_util::LogContext;
use gantry_labeld::context::OpContext;
use gantry_labeld::db::model::Project;
use slog::o;
use std::sync::Arc;
use uuid::Uuid;

pub struct LabeldTestContext {
    pub external_client: ClientTestContext,
    pub server: gantry_labeld::Server,
    pub logctx: LogContext,
}

impl LabeldTestContext {
    pub async fn teardown(self) {
        self.server.http_server_external.close().await.unwrap();
        self.logctx.cleanup_successful();
    }
}

pub fn load_test_config() -> gantry_labeld::Config {
    // The test config is located relative to the directory this file is in.
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    let config_file_path = manifest_dir.join("tests/config.test.toml");
    gantry_labeld::Config::from_file(&config_file_path)
        .expect("failed to load config.test.toml")
}

pub async fn test_setup(test_name: &str) -> LabeldTestContext {
    let config = load_test_config();
    let logctx = LogContext::new(test_name, &config.log);
    let log = &logctx.log;

    let server = gantry_labeld::Server::start(&config, log)
        .await
        .expect("failed to start labeld server");
    let external_client = ClientTestContext::new(
        server.http_server_external.local_addr(),
        logctx.log.new(o!("component" => "external client test context")),
    );

    LabeldTestContext { external_client, server, logctx }
}

/// Returns an OpContext for creating test fixtures directly through the
/// application, authenticated as the privileged built-in user
///
/// Projects (and grants of project roles) are provisioned by other parts of
/// the control plane, not through the external label API, so tests seed them
/// this way.
pub fn opctx_for_fixtures(cptestctx: &LabeldTestContext) -> OpContext {
    let labeld = &cptestctx.server.apictx.labeld;
    OpContext::for_tests(
        cptestctx.logctx.log.new(o!("component" => "test fixtures")),
        Arc::clone(labeld.datastore()),
    )
}

pub async fn create_project(
    cptestctx: &LabeldTestContext,
    name: &str,
) -> Project {
    let labeld = &cptestctx.server.apictx.labeld;
    let opctx = opctx_for_fixtures(cptestctx);
    labeld
        .project_create(&opctx, name)
        .await
        .expect("failed to create test project")
}

pub async fn grant_project_role(
    cptestctx: &LabeldTestContext,
    project_id: i64,
    user_id: Uuid,
    role_name: &str,
) {
    let labeld = &cptestctx.server.apictx.labeld;
    let opctx = opctx_for_fixtures(cptestctx);
    labeld
        .project_role_grant(&opctx, user_id, project_id, role_name)
        .await
        .expect("failed to grant test project role");
}
