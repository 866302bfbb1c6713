// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Label management
//!
//! The order of the checks in each operation here is part of the external
//! interface: which failure a doubly-bad request reports is fixed.  Briefly:
//! mutating operations check authentication first; create validates its
//! payload before authorization; update and delete authorize only after the
//! label has been found; and update validates its payload last of all.

use crate::authz;
use crate::context::OpContext;
use crate::db;
use crate::external_api::params;
use gantry_common::api::external::CreateResult;
use gantry_common::api::external::DeleteResult;
use gantry_common::api::external::Error;
use gantry_common::api::external::LabelScope;
use gantry_common::api::external::ListResultVec;
use gantry_common::api::external::LookupResult;
use gantry_common::api::external::LookupType;
use gantry_common::api::external::UpdateResult;

/// Label ids are store-assigned positive integers.  Clients send 0 (or
/// garbage that parses to a non-positive value) often enough that it gets its
/// own error before we go looking for the record.
fn validate_label_id(label_id: i64) -> Result<(), Error> {
    if label_id <= 0 {
        return Err(Error::invalid_value(
            "label_id",
            "must be a positive integer",
        ));
    }
    Ok(())
}

impl super::Labeld {
    pub async fn label_create(
        &self,
        opctx: &OpContext,
        new_label: &params::LabelCreate,
    ) -> CreateResult<db::model::Label> {
        opctx.authn.actor_required()?;
        let new_label = db::model::IncompleteLabel::new(new_label)?;
        match new_label.scope {
            LabelScope::Global => {
                self.db_datastore.label_create_global(opctx, new_label).await
            }
            LabelScope::Project => {
                // IncompleteLabel guarantees a project id for this scope.
                let project_id = new_label.project_id.ok_or_else(|| {
                    Error::internal_error(
                        "validated project-scoped label has no project id",
                    )
                })?;
                let authz_project = authz::FLEET
                    .project(project_id, LookupType::ById(project_id));
                self.db_datastore
                    .label_create_in_project(opctx, &authz_project, new_label)
                    .await
            }
        }
    }

    pub async fn label_fetch(
        &self,
        opctx: &OpContext,
        label_id: i64,
    ) -> LookupResult<db::model::Label> {
        validate_label_id(label_id)?;
        let (.., db_label) =
            self.db_datastore.label_lookup(opctx, label_id).await?;
        Ok(db_label)
    }

    /// List labels within one scope, optionally filtered by name substring
    ///
    /// Listing a nonexistent project's labels is not an error; the list is
    /// just empty.
    pub async fn labels_list(
        &self,
        opctx: &OpContext,
        selector: &params::LabelSelector,
    ) -> ListResultVec<db::model::Label> {
        let scope = selector.scope.ok_or_else(|| {
            Error::invalid_request("label scope is required")
        })?;
        match scope {
            LabelScope::Global => {
                self.db_datastore
                    .labels_list_global(opctx, selector.name.as_deref())
                    .await
            }
            LabelScope::Project => {
                let project_id = selector.project_id.unwrap_or(0);
                if project_id <= 0 {
                    return Err(Error::invalid_value(
                        "project_id",
                        "must be a positive integer when listing \
                         project-scoped labels",
                    ));
                }
                let authz_project = authz::FLEET
                    .project(project_id, LookupType::ById(project_id));
                self.db_datastore
                    .labels_list_in_project(
                        opctx,
                        &authz_project,
                        selector.name.as_deref(),
                    )
                    .await
            }
        }
    }

    pub async fn label_update(
        &self,
        opctx: &OpContext,
        label_id: i64,
        new_params: &params::LabelUpdate,
    ) -> UpdateResult<()> {
        opctx.authn.actor_required()?;
        validate_label_id(label_id)?;
        let (authz_label, db_label) =
            self.db_datastore.label_lookup(opctx, label_id).await?;
        // Authorize before looking at the payload.  An unauthorized caller
        // learns that the label exists (reads are open to everyone anyway)
        // but nothing about whether their update would have been accepted.
        opctx.authorize(authz::Action::Modify, &authz_label).await?;
        let update = db::model::LabelUpdate::new(new_params, &db_label)?;
        self.db_datastore.label_update(opctx, &authz_label, update).await
    }

    pub async fn label_delete(
        &self,
        opctx: &OpContext,
        label_id: i64,
    ) -> DeleteResult {
        opctx.authn.actor_required()?;
        validate_label_id(label_id)?;
        let (authz_label, ..) =
            self.db_datastore.label_lookup(opctx, label_id).await?;
        self.db_datastore.label_delete(opctx, &authz_label).await
    }
}
