// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handler functions (entrypoints) for external HTTP APIs

use super::params;
use super::views;
use crate::context::OpContext;
use crate::ServerContext;
use dropshot::endpoint;
use dropshot::ApiDescription;
use dropshot::HttpError;
use dropshot::HttpResponseCreated;
use dropshot::HttpResponseOk;
use dropshot::Path;
use dropshot::Query;
use dropshot::RequestContext;
use dropshot::TypedBody;
use http::Response;
use http::StatusCode;
use hyper::Body;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

type LabeldApiDescription = ApiDescription<Arc<ServerContext>>;

/// Returns a description of the external labeld API
pub fn external_api() -> LabeldApiDescription {
    fn register_endpoints(
        api: &mut LabeldApiDescription,
    ) -> Result<(), String> {
        api.register(labels_get)?;
        api.register(labels_post)?;
        api.register(labels_get_label)?;
        api.register(labels_delete_label)?;
        api.register(labels_put_label)?;
        Ok(())
    }

    let mut api = LabeldApiDescription::new();
    if let Err(err) = register_endpoints(&mut api) {
        panic!("failed to register entrypoints: {}", err);
    }
    api
}

// API ENDPOINT FUNCTION NAMING CONVENTIONS
//
// HTTP resources are grouped within some collection.  For the label
// collection:
//
//   GET    /api/labels            (list the labels in the collection)
//   POST   /api/labels            (create a label in the collection)
//   GET    /api/labels/{label_id} (look up a label in the collection)
//   PUT    /api/labels/{label_id} (update a label in the collection)
//   DELETE /api/labels/{label_id} (delete a label in the collection)
//
// There's a naming convention for the functions that implement these API
// entry points.  When operating on the collection itself, we use:
//
//    {collection_path}_{verb}
//
// For operations on items within the collection, we use:
//
//    {collection_path}_{verb}_{object}
//
// Note that these function names end up in the generated OpenAPI spec as the
// operationId for each endpoint, and therefore represent a contract with
// clients.  Client generators use operationId to name API methods, so
// changing a function name is a breaking change from a client perspective.

/// List labels
///
/// Returns the labels in one scope, in ascending id order.  `scope` is
/// required; `project_id` selects the project when `scope` is `"project"`;
/// `name` restricts the list to labels whose name contains the given
/// substring.
#[endpoint {
    method = GET,
    path = "/api/labels",
}]
async fn labels_get(
    rqctx: RequestContext<Arc<ServerContext>>,
    query_params: Query<params::LabelSelector>,
) -> Result<HttpResponseOk<Vec<views::Label>>, HttpError> {
    let apictx = rqctx.context();
    let labeld = &apictx.labeld;
    let opctx = OpContext::for_external_api(&rqctx).await?;
    let query = query_params.into_inner();
    let labels = labeld
        .labels_list(&opctx, &query)
        .await?
        .into_iter()
        .map(|l| l.into())
        .collect();
    Ok(HttpResponseOk(labels))
}

/// Create a label
///
/// Creates a new label in the requested scope and returns its id.  The name
/// must be unique among labels sharing the same scope (and project, for
/// project-scoped labels).
#[endpoint {
    method = POST,
    path = "/api/labels",
}]
async fn labels_post(
    rqctx: RequestContext<Arc<ServerContext>>,
    new_label: TypedBody<params::LabelCreate>,
) -> Result<HttpResponseCreated<views::LabelId>, HttpError> {
    let apictx = rqctx.context();
    let labeld = &apictx.labeld;
    let opctx = OpContext::for_external_api(&rqctx).await?;
    let label =
        labeld.label_create(&opctx, &new_label.into_inner()).await?;
    Ok(HttpResponseCreated(label.into()))
}

/// Path parameters for label requests
#[derive(Deserialize, JsonSchema)]
struct LabelPathParam {
    /// id assigned to the label when it was created
    label_id: i64,
}

/// Get a label
///
/// Retrieves the details of the label with the given id.
#[endpoint {
    method = GET,
    path = "/api/labels/{label_id}",
}]
async fn labels_get_label(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<LabelPathParam>,
) -> Result<HttpResponseOk<views::Label>, HttpError> {
    let apictx = rqctx.context();
    let labeld = &apictx.labeld;
    let path = path_params.into_inner();
    let opctx = OpContext::for_external_api(&rqctx).await?;
    let label = labeld.label_fetch(&opctx, path.label_id).await?;
    Ok(HttpResponseOk(label.into()))
}

/// Delete a label
///
/// Permanently deletes the label with the given id.  Deleting the same id
/// again reports that the label was not found.
#[endpoint {
    method = DELETE,
    path = "/api/labels/{label_id}",
}]
async fn labels_delete_label(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<LabelPathParam>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let labeld = &apictx.labeld;
    let path = path_params.into_inner();
    let opctx = OpContext::for_external_api(&rqctx).await?;
    labeld.label_delete(&opctx, path.label_id).await?;
    // Established clients of this API expect a bare 200 here rather than a
    // 204.
    Ok(Response::builder().status(StatusCode::OK).body(Body::empty())?)
}

/// Update a label
///
/// Updates the label's mutable fields (name, description, color).  The scope
/// and owning project are fixed at creation time; the payload may repeat the
/// stored values but may not change them.
#[endpoint {
    method = PUT,
    path = "/api/labels/{label_id}",
}]
async fn labels_put_label(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<LabelPathParam>,
    updated_label: TypedBody<params::LabelUpdate>,
) -> Result<Response<Body>, HttpError> {
    let apictx = rqctx.context();
    let labeld = &apictx.labeld;
    let path = path_params.into_inner();
    let opctx = OpContext::for_external_api(&rqctx).await?;
    labeld
        .label_update(&opctx, path.label_id, &updated_label.into_inner())
        .await?;
    // See labels_delete_label() on the response code.
    Ok(Response::builder().status(StatusCode::OK).body(Body::empty())?)
}
