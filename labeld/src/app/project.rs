// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projects that labels are scoped to
//!
//! Labeld is not the system of record for projects.  These operations exist
//! so that a deployment can mirror the projects (and per-project role grants)
//! that project-scoped labels refer to.  They are not exposed through the
//! external API.

use crate::context::OpContext;
use crate::db;
use gantry_common::api::external::CreateResult;
use gantry_common::api::external::Error;
use gantry_common::api::external::ResourceType;
use uuid::Uuid;

impl super::Labeld {
    pub async fn project_create(
        &self,
        opctx: &OpContext,
        name: &str,
    ) -> CreateResult<db::model::Project> {
        self.db_datastore.project_create(opctx, name).await
    }

    /// Grant a built-in project role to `identity_id` on the given project
    pub async fn project_role_grant(
        &self,
        opctx: &OpContext,
        identity_id: Uuid,
        project_id: i64,
        role_name: &str,
    ) -> Result<(), Error> {
        self.db_datastore
            .role_grant(
                opctx,
                identity_id,
                ResourceType::Project,
                project_id,
                role_name,
            )
            .await
    }
}
