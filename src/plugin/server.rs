//! # Request Dispatch
//!
//! Routes a [`Request`] to the provider, resource or data source it names and
//! converts every failure into diagnostics on the [`Response`].

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, Instrument};

use super::diagnostics::Diagnostic;
use super::protocol::{Request, Response};
use super::schema::ProviderSchema;
use super::{DataSource, ProviderService, Resource};

/// Full schema of the provider, its resources and data sources
pub fn provider_schema<P: ProviderService>(provider: &P) -> ProviderSchema {
    let prefix = provider.type_name();
    ProviderSchema {
        provider: provider.schema(),
        resource_schemas: provider
            .resources()
            .iter()
            .map(|r| (format!("{prefix}_{}", r.type_suffix()), r.schema()))
            .collect(),
        data_source_schemas: provider
            .data_sources()
            .iter()
            .map(|d| (format!("{prefix}_{}", d.type_suffix()), d.schema()))
            .collect(),
    }
}

fn find_resource<P: ProviderService>(
    provider: &P,
    type_name: &str,
) -> Result<Box<dyn Resource<P::Client>>, Response> {
    let prefix = provider.type_name();
    provider
        .resources()
        .into_iter()
        .find(|r| format!("{prefix}_{}", r.type_suffix()) == type_name)
        .ok_or_else(|| {
            Response::error(Diagnostic::error(
                "Unknown resource type",
                format!("The provider {prefix:?} does not support resource type {type_name:?}."),
            ))
        })
}

fn find_data_source<P: ProviderService>(
    provider: &P,
    type_name: &str,
) -> Result<Box<dyn DataSource<P::Client>>, Response> {
    let prefix = provider.type_name();
    provider
        .data_sources()
        .into_iter()
        .find(|d| format!("{prefix}_{}", d.type_suffix()) == type_name)
        .ok_or_else(|| {
            Response::error(Diagnostic::error(
                "Unknown data source type",
                format!("The provider {prefix:?} does not support data source {type_name:?}."),
            ))
        })
}

async fn configure<P: ProviderService>(
    provider: &P,
    provider_config: &Value,
    terraform_version: Option<&str>,
) -> Result<P::Client, Response> {
    let diags = provider.schema().validate(provider_config);
    if diags.has_error() {
        return Err(Response::diagnostics(diags));
    }
    provider
        .configure(provider_config, terraform_version)
        .await
        .map_err(Response::diagnostics)
}

/// Handle a single request
pub async fn handle<P: ProviderService>(provider: &P, request: Request) -> Response {
    let operation = request.operation();
    let span = tracing::info_span!("provider.operation", operation);
    let response = dispatch(provider, request).instrument(span).await;
    if response.has_error() {
        info!(
            operation,
            diagnostics = response.diagnostics.len(),
            "operation finished with errors"
        );
    } else {
        debug!(operation, "operation finished");
    }
    response
}

async fn dispatch<P: ProviderService>(provider: &P, request: Request) -> Response {
    match run(provider, request).await {
        Ok(response) | Err(response) => response,
    }
}

/// Early exits carry their diagnostics as the `Err` response
async fn run<P: ProviderService>(provider: &P, request: Request) -> Result<Response, Response> {
    let response = match request {
        Request::GetSchema => Response::schema(provider_schema(provider)),
        Request::ValidateProviderConfig { config } => {
            Response::diagnostics(provider.schema().validate(&config))
        }
        Request::ValidateResourceConfig { type_name, config } => {
            let resource = find_resource(provider, &type_name)?;
            Response::diagnostics(resource.schema().validate(&config))
        }
        Request::ValidateDataSourceConfig { type_name, config } => {
            let data_source = find_data_source(provider, &type_name)?;
            Response::diagnostics(data_source.schema().validate(&config))
        }
        Request::Create {
            type_name,
            provider_config,
            terraform_version,
            planned_state,
        } => {
            let resource = find_resource(provider, &type_name)?;
            check_planned(resource.as_ref(), &planned_state)?;
            let client = configure(provider, &provider_config, terraform_version.as_deref()).await?;
            match resource.create(&client, planned_state).await {
                Ok(state) => Response::state(state),
                Err(e) => Response::error(e.to_diagnostic(&format!("Error creating {type_name}"))),
            }
        }
        Request::Read {
            type_name,
            provider_config,
            terraform_version,
            current_state,
        } => {
            let resource = find_resource(provider, &type_name)?;
            let client = configure(provider, &provider_config, terraform_version.as_deref()).await?;
            match resource.read(&client, current_state).await {
                Ok(Some(state)) => Response::state(state),
                Ok(None) => {
                    info!(type_name = %type_name, "remote object is gone, removing from state");
                    Response::removed()
                }
                Err(e) => Response::error(e.to_diagnostic(&format!("Error reading {type_name}"))),
            }
        }
        Request::Update {
            type_name,
            provider_config,
            terraform_version,
            prior_state,
            planned_state,
        } => {
            let resource = find_resource(provider, &type_name)?;
            check_planned(resource.as_ref(), &planned_state)?;
            let client = configure(provider, &provider_config, terraform_version.as_deref()).await?;
            match resource.update(&client, prior_state, planned_state).await {
                Ok(state) => Response::state(state),
                Err(e) => Response::error(e.to_diagnostic(&format!("Error updating {type_name}"))),
            }
        }
        Request::Delete {
            type_name,
            provider_config,
            terraform_version,
            current_state,
        } => {
            let resource = find_resource(provider, &type_name)?;
            let client = configure(provider, &provider_config, terraform_version.as_deref()).await?;
            match resource.delete(&client, current_state).await {
                Ok(()) => Response::removed(),
                Err(e) => Response::error(e.to_diagnostic(&format!("Error deleting {type_name}"))),
            }
        }
        Request::Import {
            type_name,
            provider_config,
            terraform_version,
            id,
        } => {
            let resource = find_resource(provider, &type_name)?;
            let client = configure(provider, &provider_config, terraform_version.as_deref()).await?;
            match resource.import(&client, &id).await {
                Ok(Some(state)) => Response::state(state),
                Ok(None) => Response::error(Diagnostic::error(
                    format!("Error importing {type_name}"),
                    format!("Cannot import non-existent remote object {id:?}."),
                )),
                Err(e) => Response::error(e.to_diagnostic(&format!("Error importing {type_name}"))),
            }
        }
        Request::ReadDataSource {
            type_name,
            provider_config,
            terraform_version,
            config,
        } => {
            let data_source = find_data_source(provider, &type_name)?;
            let diags = data_source.schema().validate(&config);
            if diags.has_error() {
                return Err(Response::diagnostics(diags));
            }
            let client = configure(provider, &provider_config, terraform_version.as_deref()).await?;
            match data_source.read(&client, config).await {
                Ok(state) => Response::state(state),
                Err(e) => Response::error(e.to_diagnostic(&format!("Error reading {type_name}"))),
            }
        }
    };
    Ok(response)
}

fn check_planned<C: Send + Sync>(
    resource: &dyn Resource<C>,
    planned_state: &Value,
) -> Result<(), Response> {
    let diags = resource.schema().validate_planned(planned_state);
    if diags.has_error() {
        return Err(Response::diagnostics(diags));
    }
    Ok(())
}

/// Read one request from `input`, handle it, and write the response to `output`
///
/// A request that cannot be parsed is answered with an error diagnostic rather than
/// failing the process, so the engine always receives a response.
pub async fn serve<P, R, W>(provider: &P, mut input: R, mut output: W) -> Result<()>
where
    P: ProviderService,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .await
        .context("Failed to read request")?;

    let response = match serde_json::from_str::<Request>(&raw) {
        Ok(request) => handle(provider, request).await,
        Err(e) => Response::error(Diagnostic::error("Invalid request", e.to_string())),
    };

    let mut body = serde_json::to_vec(&response).context("Failed to encode response")?;
    body.push(b'\n');
    output
        .write_all(&body)
        .await
        .context("Failed to write response")?;
    output.flush().await.context("Failed to flush response")?;
    Ok(())
}
