// Platform operations. Each one builds a request, sends it through the
// `ApiClient` and maps the envelope's `data` to a named result. The only
// local checks are the ones needed to build a request at all; everything
// else is left for the server to reject.

use crate::api::{ApiClient, Request, Transport, Upload};
use crate::auth::CredentialStore;
use crate::error::{Error, Result};
use crate::types::{
    Account, App, DatabaseDump, Deployment, EnvEntry, EnvVar, ImageDeployment, Instance, Logs,
    ProvisionedResource, ResourceId, Rollback,
};
use reqwest::Method;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Smallest replica count `scale` accepts.
pub const MIN_REPLICAS: i32 = 1;

/// Exchange email and password for an account and persist it.
pub fn authenticate<T: Transport>(
    api: &ApiClient<T>,
    store: &CredentialStore,
    email: &str,
    password: &str,
) -> Result<Account> {
    let request = Request::new(Method::POST, "/account/authenticate")
        .json(json!({ "email": email, "password": password }));
    let account = api.call::<Account>(request)?.data;
    if account.account_token.is_empty() {
        return Err(Error::Server(
            "authentication failed: server returned no account token".to_string(),
        ));
    }
    store.save(&account)?;
    Ok(account)
}

/// Create an app; the server picks a name when `name` is empty.
pub fn create_app<T: Transport>(api: &ApiClient<T>, name: Option<&str>) -> Result<App> {
    let request =
        Request::new(Method::POST, "/me/apps").json(json!({ "name": name.unwrap_or_default() }));
    Ok(api.call::<App>(request)?.data)
}

pub fn read_logs<T: Transport>(api: &ApiClient<T>, app_name: &str) -> Result<String> {
    let request = Request::new(Method::GET, format!("/apps/logs/{}", app_name));
    Ok(api.call::<Logs>(request)?.data.logs)
}

/// Upload a built binary as a multipart form.
pub fn deploy_binary<T: Transport>(
    api: &ApiClient<T>,
    app_name: &str,
    binary: &Path,
) -> Result<Deployment> {
    let upload = Upload {
        fields: vec![("app_name".to_string(), app_name.to_string())],
        file_field: "bin".to_string(),
        file_path: binary.to_path_buf(),
    };
    let request = Request::new(Method::POST, "/apps/deploy").upload(upload);
    Ok(api.call::<Deployment>(request)?.data)
}

pub fn deploy_image<T: Transport>(
    api: &ApiClient<T>,
    app_name: &str,
    image_url: &str,
) -> Result<ImageDeployment> {
    let request = Request::new(Method::POST, "/apps/docker/deploy")
        .json(json!({ "app_name": app_name, "docker_url": image_url }));
    Ok(api.call::<ImageDeployment>(request)?.data)
}

pub fn rollback<T: Transport>(api: &ApiClient<T>, app_name: &str, version: &str) -> Result<Rollback> {
    let request =
        Request::new(Method::PUT, format!("/apps/rollback/{}", app_name)).query("version", version);
    let env = api.call::<ImageDeployment>(request)?;
    Ok(Rollback {
        message: env.message,
        version: env.data.version,
    })
}

/// Scale to `replicas` instances. Counts below `MIN_REPLICAS` are rejected
/// before anything is sent.
pub fn scale<T: Transport>(api: &ApiClient<T>, app_name: &str, replicas: i32) -> Result<String> {
    if replicas < MIN_REPLICAS {
        return Err(Error::InvalidArgument(format!(
            "invalid instance count. Instance should be at least {}",
            MIN_REPLICAS
        )));
    }
    let request =
        Request::new(Method::GET, format!("/apps/scale/{}", app_name)).query("replicas", replicas);
    Ok(api.call::<Value>(request)?.message)
}

pub fn list_instances<T: Transport>(api: &ApiClient<T>, app_name: &str) -> Result<Vec<Instance>> {
    let request = Request::new(Method::GET, format!("/apps/ps/{}", app_name));
    Ok(api.call::<Vec<Instance>>(request)?.data)
}

pub fn provision_resource<T: Transport>(
    api: &ApiClient<T>,
    app_name: &str,
    resource: &str,
) -> Result<ProvisionedResource> {
    let request = Request::new(Method::POST, format!("/apps/resource/new/{}", app_name))
        .query("name", resource);
    let env = api.call::<ResourceId>(request)?;
    Ok(ProvisionedResource {
        message: env.message,
        id: env.data.id,
    })
}

pub fn remove_resource<T: Transport>(
    api: &ApiClient<T>,
    app_name: &str,
    resource: &str,
) -> Result<String> {
    let request = Request::new(Method::DELETE, format!("/apps/resource/remove/{}", app_name))
        .query("name", resource);
    Ok(api.call::<Value>(request)?.message)
}

pub fn add_domain<T: Transport>(api: &ApiClient<T>, app_name: &str, domain: &str) -> Result<String> {
    let request = Request::new(Method::POST, "/apps/domain/new")
        .json(json!({ "app_name": app_name, "domain": domain }));
    api.call::<Value>(request)?;
    Ok("domain added successfully".to_string())
}

pub fn remove_domain<T: Transport>(
    api: &ApiClient<T>,
    app_name: &str,
    domain: &str,
) -> Result<String> {
    let request = Request::new(Method::DELETE, "/apps/domain/remove")
        .json(json!({ "app_name": app_name, "domain": domain }));
    api.call::<Value>(request)?;
    Ok("domain removed successfully".to_string())
}

pub fn list_env<T: Transport>(api: &ApiClient<T>, app_name: &str) -> Result<Vec<EnvEntry>> {
    let request = Request::new(Method::GET, format!("/apps/configs/{}", app_name));
    Ok(api.call::<Vec<EnvEntry>>(request)?.data)
}

/// Parse `KEY=VALUE` arguments. Splits on the first `=`, so values may
/// contain `=`; keys may not be empty.
pub fn parse_env_pairs<S: AsRef<str>>(args: &[S]) -> Result<Vec<EnvVar>> {
    if args.is_empty() {
        return Err(Error::InvalidArgument(
            "no environment variables given, expected KEY=VALUE".to_string(),
        ));
    }
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((key, value)) if !key.is_empty() => Ok(EnvVar {
                    key: key.to_string(),
                    value: value.to_string(),
                }),
                _ => Err(Error::InvalidArgument(format!(
                    "invalid env format: {}, expected format is KEY=VALUE. run 'hostgo env set KEY1=VALUE1 KEY2=VALUE2 ...'",
                    arg
                ))),
            }
        })
        .collect()
}

/// Set variables from `KEY=VALUE` arguments. Every argument is checked
/// before the request is sent.
pub fn set_env<T: Transport, S: AsRef<str>>(
    api: &ApiClient<T>,
    app_name: &str,
    args: &[S],
) -> Result<String> {
    let vars = parse_env_pairs(args)?;
    let request = Request::new(Method::POST, format!("/apps/configs/{}", app_name))
        .json(serde_json::to_value(&vars)?);
    Ok(api.call::<Value>(request)?.message)
}

pub fn unset_env<T: Transport, S: AsRef<str>>(
    api: &ApiClient<T>,
    app_name: &str,
    keys: &[S],
) -> Result<String> {
    if keys.is_empty() {
        return Err(Error::InvalidArgument(
            "no environment variable keys given".to_string(),
        ));
    }
    let keys: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
    let request =
        Request::new(Method::DELETE, format!("/apps/configs/unset/{}", app_name)).json(json!(keys));
    let message = api.call::<Value>(request)?.message;
    if message.is_empty() {
        Ok("operation successful".to_string())
    } else {
        Ok(message)
    }
}

/// Download a database dump into `{dir}/{app}-{resource}.sql`.
pub fn dump_database<T: Transport>(
    api: &ApiClient<T>,
    app_name: &str,
    resource: &str,
    dir: &Path,
) -> Result<DatabaseDump> {
    let request = Request::new(Method::GET, format!("/apps/resource/dump/{}", app_name))
        .query("res", resource);
    let bytes = api.call_raw(request)?;
    let path = dir.join(format!("{}-{}.sql", app_name, resource));
    fs::write(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote database dump");
    Ok(DatabaseDump {
        path,
        bytes: bytes.len(),
    })
}
