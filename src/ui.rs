// UI layer: one flow per command. Each flow loads what it needs (credentials,
// project config), shows a spinner while the operation runs and prints the
// result. Errors are returned to `main`, which prints them and exits.

use crate::api::ApiClient;
use crate::artifact;
use crate::auth::CredentialStore;
use crate::ops;
use crate::project::{self, ProjectConfig};
use crate::types::{EnvEntry, Instance};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::warn;

/// Everything an app-scoped command needs: an authenticated client and the
/// app bound to the working directory.
struct Session {
    api: ApiClient,
    project: ProjectConfig,
    dir: PathBuf,
}

impl Session {
    fn open() -> Result<Self> {
        let account = CredentialStore::new()?.load()?;
        let dir = std::env::current_dir()?;
        let project = ProjectConfig::load(&dir)?;
        let api = ApiClient::from_env(Some(&account))?;
        Ok(Session { api, project, dir })
    }

    fn app(&self) -> &str {
        &self.project.app_name
    }
}

/// Spinner shown while a request is in flight.
fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(200));
    spinner
}

/// Run `f` behind a spinner labelled `message`, ending with `message done`
/// on success and clearing the line on failure.
fn working<T>(message: &str, f: impl FnOnce() -> crate::error::Result<T>) -> Result<T> {
    let spinner = spinner(message);
    let result = f();
    match &result {
        Ok(_) => spinner.finish_with_message(format!("{}done", message)),
        Err(_) => spinner.finish_and_clear(),
    }
    Ok(result?)
}

pub fn login() -> Result<()> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    let password: String = Password::new().with_prompt("Password").interact()?;

    let store = CredentialStore::new()?;
    let api = ApiClient::from_env(None)?;
    let account = working("Authenticating...", || {
        ops::authenticate(&api, &store, &email, &password)
    })?;
    println!("Success. Authenticated as: {}\n", account.email.green());
    Ok(())
}

pub fn create(name: Option<&str>) -> Result<()> {
    let account = CredentialStore::new()?.load()?;
    let api = ApiClient::from_env(Some(&account))?;
    let dir = std::env::current_dir()?;

    let app = working("creating app...", || ops::create_app(&api, name))?;
    ProjectConfig::new(&app.app_name).save(&dir)?;
    let git_url = match project::add_git_remote(&dir, &app.app_name) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(error = %e, "could not add git remote");
            None
        }
    };

    println!("\n===");
    println!("created app {}", app.app_name.as_str().green());
    println!("access url: {}", app.access_url.as_str().green());
    if let Some(url) = git_url {
        println!("git url: {}", url.green());
    }
    println!();
    Ok(())
}

pub fn deploy_binary() -> Result<()> {
    let session = Session::open()?;
    let binary = working("packing app...", || {
        artifact::build_binary(&session.dir, session.app())
    })?;

    let started = Instant::now();
    let deployment = working("creating deployment...", || {
        ops::deploy_binary(&session.api, session.app(), binary.path())
    })?;
    drop(binary);

    println!("====");
    println!(
        "{}",
        format!(
            "Deployment updated! | {} | {}:{}",
            deployment.access_url,
            session.app(),
            deployment.version
        )
        .green()
    );
    println!(
        "Operation took: {}\n",
        format!("{:.2}secs", started.elapsed().as_secs_f64()).green()
    );
    Ok(())
}

pub fn deploy_image(image: &str) -> Result<()> {
    let session = Session::open()?;
    let deployment = working("creating deployment...", || {
        ops::deploy_image(&session.api, session.app(), image)
    })?;
    println!(
        "Deployment updated: {}",
        format!("{} | {}", deployment.address, deployment.version).green()
    );
    Ok(())
}

pub fn logs() -> Result<()> {
    let session = Session::open()?;
    let logs = working("fetching logs...", || ops::read_logs(&session.api, session.app()))?;
    print!("====\n\n");
    println!("{}", logs);
    Ok(())
}

pub fn scale(instances: i32) -> Result<()> {
    let session = Session::open()?;
    let message = working("working...", || {
        ops::scale(&session.api, session.app(), instances)
    })?;
    println!("{}", message.green());
    Ok(())
}

pub fn ps() -> Result<()> {
    let session = Session::open()?;
    let instances = working("working...", || {
        ops::list_instances(&session.api, session.app())
    })?;
    print_instances(&instances);
    Ok(())
}

fn print_instances(instances: &[Instance]) {
    println!("ID\t\tNAME\t\tSTATUS\t\tSTARTED");
    for i in instances {
        println!("{}\t\t{}\t\t{}\t\t{}", i.id, i.name, i.status, i.started);
    }
    println!();
}

pub fn rollback(version: &str) -> Result<()> {
    let session = Session::open()?;
    let result = working("working...", || {
        ops::rollback(&session.api, session.app(), version)
    })?;
    println!("{}", format!("{} | {}", result.message, result.version).green());
    Ok(())
}

pub fn add_domain(domain: &str) -> Result<()> {
    let session = Session::open()?;
    let message = working(&format!("adding domain {}...", domain), || {
        ops::add_domain(&session.api, session.app(), domain)
    })?;
    println!("{}", message.green());
    Ok(())
}

pub fn remove_domain(domain: &str) -> Result<()> {
    let session = Session::open()?;
    let message = working(&format!("removing domain {}...", domain), || {
        ops::remove_domain(&session.api, session.app(), domain)
    })?;
    println!("{}", message.green());
    Ok(())
}

pub fn provision_resource(name: &str) -> Result<()> {
    let session = Session::open()?;
    let resource = working(&format!("adding {}...", name), || {
        ops::provision_resource(&session.api, session.app(), name)
    })?;
    println!("{}", format!("{} | {}", resource.message, resource.id).green());
    Ok(())
}

pub fn remove_resource(name: &str) -> Result<()> {
    let session = Session::open()?;
    let message = working(&format!("removing {}...", name), || {
        ops::remove_resource(&session.api, session.app(), name)
    })?;
    println!("{}", message.green());
    Ok(())
}

pub fn dump_database(name: &str) -> Result<()> {
    let session = Session::open()?;
    let dump = working("working...", || {
        ops::dump_database(&session.api, session.app(), name, &session.dir)
    })?;
    println!(
        "{}",
        format!("database successfully dumped to {}.", dump.path.display()).green()
    );
    Ok(())
}

pub fn list_env() -> Result<()> {
    let session = Session::open()?;
    let envs = working("working...", || ops::list_env(&session.api, session.app()))?;
    print_envs(&envs);
    Ok(())
}

fn print_envs(envs: &[EnvEntry]) {
    println!("Total envs: {}", envs.len());
    for e in envs {
        println!("{}={}", e.env_key, e.env_value);
    }
}

pub fn set_env(pairs: &[String]) -> Result<()> {
    // Reject bad arguments before touching credentials or the network.
    ops::parse_env_pairs(pairs)?;
    let session = Session::open()?;
    let message = working("setting env...", || {
        ops::set_env(&session.api, session.app(), pairs)
    })?;
    println!("{}\n", message.green());
    Ok(())
}

pub fn unset_env(keys: &[String]) -> Result<()> {
    let session = Session::open()?;
    let message = working("working...", || {
        ops::unset_env(&session.api, session.app(), keys)
    })?;
    println!("\n{}\n", message.green());
    Ok(())
}
