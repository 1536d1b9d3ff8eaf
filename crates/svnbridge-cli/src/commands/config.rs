//! Config command - inspect the effective configuration.

use crate::context::Context;
use crate::output::{self, json, table::kv_table};
use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;
use svnbridge_config::{Severity, SvnEnvVar, Validator};

/// Arguments for the config command
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the merged configuration; passwords are never shown
    Show,

    /// Check the merged configuration for problems
    Validate {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Show where configuration is read from
    Paths,
}

#[derive(Debug, Serialize)]
struct IssueReport<'a> {
    severity: &'static str,
    code: &'static str,
    field: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

const fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

/// Run the config command
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.action {
        ConfigAction::Show => show(ctx),
        ConfigAction::Validate { strict } => validate(ctx, strict),
        ConfigAction::Paths => paths(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let config = ctx.config();
    if json::is_enabled() {
        json::print_success(config);
        return Ok(());
    }

    let dash = || "-".to_string();
    let repositories = config
        .repositories
        .iter()
        .flatten()
        .map(|r| format!("{}={}", r.name, r.remote_path))
        .collect::<Vec<_>>()
        .join(", ");
    let layout = config.layout.as_ref().map_or_else(dash, |l| {
        match (&l.branch, &l.tag) {
            (Some(branch), _) => format!("branch {branch}"),
            (None, Some(tag)) => format!("tag {tag}"),
            (None, None) => "trunk".to_string(),
        }
    });

    kv_table([
        (
            "repository-url",
            config.repository_url.clone().unwrap_or_else(dash),
        ),
        ("username", config.username.clone().unwrap_or_else(dash)),
        (
            "password",
            if config.password.is_some() { "(hidden)" } else { "-" }.to_string(),
        ),
        (
            "svn-exe-path",
            config
                .svn_exe_path
                .as_ref()
                .map_or_else(dash, |p| p.display().to_string()),
        ),
        (
            "workspace-root",
            config
                .workspace_root
                .as_ref()
                .map_or_else(dash, |p| p.display().to_string()),
        ),
        (
            "additional-arguments",
            config.additional_arguments.clone().unwrap_or_else(dash),
        ),
        (
            "repositories",
            if repositories.is_empty() { dash() } else { repositories },
        ),
        ("layout", layout),
    ])
    .print();
    Ok(())
}

fn validate(ctx: &Context, strict: bool) -> Result<()> {
    let result = Validator::new().strict(strict).validate(ctx.config());

    if json::is_enabled() {
        let issues: Vec<IssueReport<'_>> = result
            .issues
            .iter()
            .map(|i| IssueReport {
                severity: severity_name(i.severity),
                code: i.code,
                field: &i.field,
                message: &i.message,
                hint: i.hint.as_deref(),
            })
            .collect();
        json::print_success(&issues);
    } else {
        for issue in &result.issues {
            let text = format!("{}: {}", issue.field, issue.message);
            match issue.severity {
                Severity::Error => output::error(&text),
                Severity::Warning => output::warning(&text),
                Severity::Info => output::info(&text),
            }
            if let Some(hint) = &issue.hint {
                output::dim(&format!("  hint: {hint}"));
            }
        }
        if !result.has_errors() {
            output::success("configuration is valid");
        }
    }

    result.into_result()?;
    Ok(())
}

fn paths(ctx: &Context) -> Result<()> {
    let loader = ctx.loader();
    let global = loader
        .global_config_path()
        .map_or_else(|| "-".to_string(), |p| p.display().to_string());
    let project = loader.project_config_path().display().to_string();
    let env: Vec<String> = SvnEnvVar::ALL
        .iter()
        .map(|v| {
            if v.is_secret() {
                format!("{} (secret)", v.as_str())
            } else {
                v.as_str().to_string()
            }
        })
        .collect();

    if json::is_enabled() {
        #[derive(Serialize)]
        struct Paths<'a> {
            global: &'a str,
            project: &'a str,
            environment: &'a [String],
        }
        json::print_success(Paths {
            global: &global,
            project: &project,
            environment: &env,
        });
        return Ok(());
    }

    kv_table([
        ("global", global),
        ("project", project),
        ("environment", env.join(", ")),
    ])
    .print();
    Ok(())
}
