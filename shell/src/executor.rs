/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::env;
use std::ffi::CString;
use std::fs::OpenOptions;
use std::os::fd::{AsRawFd, OwnedFd};

use anyhow::{bail, Context};
use glob::glob;
use log::info;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{close, dup2, execv, fork, pipe, ForkResult};
use pathchain::canonicalize;
use pathchain::perm::is_directory_read_permitted;

use crate::context::ShellContext;
use crate::parser::{Pipeline, SimpleCommand};

/// `cd` is the one builtin that must run in the shell's own process, since a
/// forked child's working directory change would never be visible to the
/// parent.
fn run_cd(ctx: &ShellContext, argv: &[String]) -> anyhow::Result<()> {
    if argv.len() > 2 {
        bail!("cd: too many arguments");
    }
    let target = argv
        .get(1)
        .cloned()
        .unwrap_or_else(|| ctx.home_dir.display().to_string());

    let chain = canonicalize(&target);
    let tail = chain.tail_index();
    if !chain.exists(tail) {
        bail!("cd: {target}: No such file or directory");
    }
    if !chain.is_directory(tail) {
        bail!("cd: {target}: Not a directory");
    }
    if !is_directory_read_permitted(&chain, tail) {
        bail!("cd: {target}: Permission denied");
    }

    env::set_current_dir(chain.real_path(tail)).with_context(|| format!("cd: {target}: No such file or directory"))
}

/// Expands `~`/`~/...` on every token, then globs each token against the
/// filesystem; a token with no match is passed through literally (GLOB_NOCHECK).
fn expand_argv(ctx: &ShellContext, argv: &[String]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(argv.len());
    for raw in argv.iter() {
        let token = ctx.expand_tilde(raw);
        if token.starts_with('-') {
            expanded.push(token);
            continue;
        }
        match glob(&token) {
            Ok(paths) => {
                let matches: Vec<String> = paths
                    .filter_map(Result::ok)
                    .map(|p| p.display().to_string())
                    .collect();
                if matches.is_empty() {
                    expanded.push(token);
                } else {
                    expanded.extend(matches);
                }
            }
            Err(_) => expanded.push(token),
        }
    }
    expanded
}

fn open_redirect_target(
    ctx: &ShellContext,
    command: &SimpleCommand,
) -> anyhow::Result<Option<std::fs::File>> {
    let Some(redirect) = &command.stdout_redirect else {
        return Ok(None);
    };
    let target = ctx.expand_tilde(&redirect.target);
    let matches: Vec<_> = glob(&target).ok().map(|p| p.filter_map(Result::ok).collect()).unwrap_or_default();
    if matches.len() > 1 {
        bail!("ambiguous redirect");
    }
    let path = matches.into_iter().next().unwrap_or_else(|| target.clone().into());

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(redirect.append)
        .truncate(!redirect.append)
        .open(&path)
        .with_context(|| format!("{}: cannot open for writing", path.display()))?;
    Ok(Some(file))
}

/// Execs `command` in place of the calling process. Assumes fd 0/1 have
/// already been wired up by the caller; never returns on success.
fn exec_child(ctx: &ShellContext, command: &SimpleCommand) -> ! {
    let argv = expand_argv(ctx, &command.argv);
    let Some(program) = argv.first() else {
        std::process::exit(0);
    };
    // locate_application already confirms the candidate is a file the caller
    // may execute; anything else is treated exactly like a lookup failure.
    let Some(path) = ctx.locate_application(program) else {
        eprintln!("{program}: command not found");
        std::process::exit(1);
    };

    let cpath = CString::new(path.to_string_lossy().as_bytes()).unwrap();
    let cargv: Vec<CString> = argv.iter().map(|a| CString::new(a.as_bytes()).unwrap()).collect();
    match execv(&cpath, &cargv) {
        Ok(_) => unreachable!(),
        Err(err) => {
            eprintln!("{program}: {err}");
            std::process::exit(1);
        }
    }
}

/// Forks one child per pipeline stage, wiring each stage's stdout to the
/// next one's stdin via `pipe()`, and waits for every child before returning.
pub fn exec_pipeline(ctx: &ShellContext, pipeline: &Pipeline) -> anyhow::Result<()> {
    if pipeline.stages.len() == 1 {
        let stage = &pipeline.stages[0];
        if stage.argv.first().map(String::as_str) == Some("cd") {
            return run_cd(ctx, &stage.argv);
        }
    }

    let mut heredocs: Vec<Option<String>> = Vec::with_capacity(pipeline.stages.len());
    for stage in &pipeline.stages {
        if let Some(delim) = &stage.heredoc_delimiter {
            let stdin = std::io::stdin();
            let mut locked = stdin.lock();
            heredocs.push(Some(crate::reader::read_heredoc(&mut locked, delim)?));
        } else {
            heredocs.push(None);
        }
    }

    let n = pipeline.stages.len();
    let mut pipes: Vec<(OwnedFd, OwnedFd)> = Vec::new();
    for _ in 0..n.saturating_sub(1) {
        pipes.push(pipe()?);
    }

    let mut children = Vec::with_capacity(n);
    for (i, stage) in pipeline.stages.iter().enumerate() {
        let stdin_fd = if i > 0 { Some(pipes[i - 1].0.as_raw_fd()) } else { None };
        let stdout_fd = if i + 1 < n { Some(pipes[i].1.as_raw_fd()) } else { None };
        let redirect_file = if i + 1 == n { open_redirect_target(ctx, stage)? } else { None };

        match unsafe { fork()? } {
            ForkResult::Parent { child } => children.push(child),
            ForkResult::Child => {
                if let Some(fd) = stdin_fd {
                    dup2(fd, 0).ok();
                }
                if let Some(fd) = stdout_fd {
                    dup2(fd, 1).ok();
                }
                // Every pipe fd must be closed in the child once dup2() has copied
                // the ones it needs onto 0/1: execve() only drops fds marked
                // close-on-exec, and a reader further down the pipeline will never
                // see EOF while some other child still holds a write end open.
                for (read_end, write_end) in &pipes {
                    close(read_end.as_raw_fd()).ok();
                    close(write_end.as_raw_fd()).ok();
                }
                if let Some(content) = &heredocs[i] {
                    // Spool to a throwaway file rather than a second pipe: spawning a
                    // writer thread after fork() is unsound, and the heredoc body was
                    // already fully read by the parent above.
                    let path = env::temp_dir().join(format!("shell-heredoc-{}", std::process::id()));
                    if std::fs::write(&path, content.as_bytes()).is_ok() {
                        if let Ok(file) = std::fs::File::open(&path) {
                            dup2(file.as_raw_fd(), 0).ok();
                        }
                        std::fs::remove_file(&path).ok();
                    }
                }
                if let Some(file) = &redirect_file {
                    dup2(file.as_raw_fd(), 1).ok();
                }
                info!("exec stage {} argv={:?}", i, stage.argv);
                exec_child(ctx, stage);
            }
        }
    }

    drop(pipes);

    let mut last_status = 0;
    for child in children {
        match waitpid(child, None)? {
            WaitStatus::Exited(_, code) => last_status = code,
            WaitStatus::Signaled(_, _, _) => last_status = 128,
            _ => {}
        }
    }
    if last_status != 0 {
        info!("pipeline exited with status {last_status}");
    }
    Ok(())
}
