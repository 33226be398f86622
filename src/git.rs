use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::gateway::{ExecOptions, Gateway, GatewayError, GitCommandResult, GitRequest};

pub const USER_NAME_KEY: &str = "user.name";
pub const USER_EMAIL_KEY: &str = "user.email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSource {
    Unstaged,
    Staged,
    LastCommit,
}

impl DiffSource {
    pub fn cycle(self) -> Self {
        match self {
            Self::Unstaged => Self::Staged,
            Self::Staged => Self::LastCommit,
            Self::LastCommit => Self::Unstaged,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unstaged => "Unstaged",
            Self::Staged => "Staged",
            Self::LastCommit => "Last commit",
        }
    }

    pub fn args(self) -> Vec<String> {
        match self {
            Self::Unstaged => args(&["diff", "--no-color", "--no-ext-diff"]),
            Self::Staged => args(&["diff", "--cached", "--no-color", "--no-ext-diff"]),
            Self::LastCommit => args(&["show", "--no-color", "--no-ext-diff", "HEAD"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    pub name: String,
    pub fetch_url: String,
    pub push_url: String,
}

pub fn git_available(gateway: &Gateway) -> bool {
    gateway
        .execute(&["--version"], &ExecOptions::default())
        .map(|result| result.success())
        .unwrap_or(false)
}

/// Nonzero from `rev-parse --git-dir` means "not a repository", not a failure.
pub fn is_repository(gateway: &Gateway, dir: &Path) -> Result<bool, GatewayError> {
    gateway
        .execute(&["rev-parse", "--git-dir"], &ExecOptions::in_dir(dir))
        .map(|result| result.success())
}

pub fn repo_root(gateway: &Gateway, cwd: &Path) -> Result<PathBuf> {
    let result = gateway
        .execute(&["rev-parse", "--show-toplevel"], &ExecOptions::in_dir(cwd))
        .context("failed to run `git rev-parse --show-toplevel`")?;

    if !result.success() {
        bail!(
            "`{}` is not inside a git repository: {}",
            cwd.display(),
            failure_detail(&result)
        );
    }

    let root = result.stdout.trim().to_owned();
    if root.is_empty() {
        bail!("git reported an empty repo root");
    }

    Ok(PathBuf::from(root))
}

pub fn diff_request(repo_root: &Path, source: DiffSource) -> GitRequest {
    GitRequest::single(source.args(), ExecOptions::in_dir(repo_root))
}

pub fn remotes_request(repo_root: &Path) -> GitRequest {
    GitRequest::single(args(&["remote", "-v"]), ExecOptions::in_dir(repo_root))
}

pub fn config_get_args(key: &str) -> Vec<String> {
    args(&["config", "--global", key])
}

pub fn config_set_args(key: &str, value: &str) -> Vec<String> {
    let mut argv = args(&["config", "--global", key]);
    argv.push(value.to_owned());
    argv
}

pub fn stash_push_args(message: &str) -> Vec<String> {
    let message = message.trim();
    if message.is_empty() {
        return args(&["stash", "push"]);
    }

    let mut argv = args(&["stash", "push", "-m"]);
    argv.push(message.to_owned());
    argv
}

/// An unset key makes `git config` exit nonzero; that reads as empty.
pub fn config_value(result: &GitCommandResult) -> String {
    if result.success() {
        result.stdout.trim().to_owned()
    } else {
        String::new()
    }
}

pub fn parse_remotes(raw: &str) -> Vec<GitRemote> {
    let mut remotes: Vec<GitRemote> = Vec::new();

    for line in raw.lines() {
        let Some((name, rest)) = line.split_once('\t') else {
            continue;
        };
        let (url, direction) = match rest.rsplit_once(' ') {
            Some((url, direction)) if direction.starts_with('(') => (url, direction),
            _ => (rest, "(fetch)"),
        };

        let idx = match remotes.iter().position(|remote| remote.name == name) {
            Some(idx) => idx,
            None => {
                remotes.push(GitRemote {
                    name: name.to_owned(),
                    fetch_url: String::new(),
                    push_url: String::new(),
                });
                remotes.len() - 1
            }
        };
        let remote = &mut remotes[idx];

        match direction {
            "(push)" => remote.push_url = url.to_owned(),
            _ => remote.fetch_url = url.to_owned(),
        }
    }

    for remote in &mut remotes {
        if remote.push_url.is_empty() {
            remote.push_url = remote.fetch_url.clone();
        }
    }

    remotes
}

pub fn failure_detail(result: &GitCommandResult) -> String {
    let stderr = result.stderr.trim();
    if stderr.is_empty() {
        format!("git exited with status {}", result.exit_code)
    } else {
        stderr.to_owned()
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| (*part).to_owned()).collect()
}
