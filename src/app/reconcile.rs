//! Content reconciliation engine
//!
//! Merges a desired file set into a project's current file set under a
//! collision strategy and pushes the result. The merge itself is a pure
//! function over owned file lists; each step produces a new sequence rather
//! than mutating a shared one, so "current" and "result" never alias.
//!
//! Ground truth is always fetched uncached: a stale local cache must never
//! influence a merge decision.

use std::collections::HashSet;

use tracing::debug;

use crate::app::content::{GetContentOptions, ProjectContentService};
use crate::app::envelope::{ErrorInfo, ResponseEnvelope};
use crate::app::models::{CollisionStrategy, File, FileKey};
use crate::constants::files;
use crate::errors::ConfigResult;

/// Options for one reconcile run
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// How colliding identities are resolved
    pub strategy: CollisionStrategy,
    /// Discard current non-manifest files; the result is the desired set alone
    pub clear: bool,
    /// Prefer the current (remote) manifest over the desired one
    pub keep_manifest: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        // Abort is the conservative default: nothing is overwritten unless
        // the caller picked a strategy that says so.
        Self {
            strategy: CollisionStrategy::Abort,
            clear: false,
            keep_manifest: false,
        }
    }
}

/// Outcome of a pure merge step
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    /// The merged file list, manifest already re-appended
    Merged(Vec<File>),
    /// Abort strategy found colliding identities; nothing was merged
    Collision(Vec<FileKey>),
}

/// Merges desired files into a project's current files and pushes the result
#[derive(Debug, Clone)]
pub struct ContentReconciler {
    content: ProjectContentService,
}

impl ContentReconciler {
    /// Create a reconciler over a content service
    pub fn new(content: ProjectContentService) -> Self {
        Self { content }
    }

    /// Reconcile `desired` into the project's current content
    ///
    /// Fetches current content uncached, merges under `options.strategy`,
    /// and sends the result. Failures of the authoritative fetch are
    /// returned verbatim; an Abort collision is returned as a failed
    /// envelope (with the `collision` field set and every colliding
    /// identity named in the extended detail), not as an error, so the
    /// caller can retry with a different strategy.
    pub async fn push(
        &self,
        script_id: &str,
        desired: Vec<File>,
        options: &ReconcileOptions,
    ) -> ConfigResult<ResponseEnvelope> {
        let fetch_options = GetContentOptions {
            no_cache: true,
            ..Default::default()
        };
        let current_envelope = self.content.get_content(script_id, &fetch_options).await?;
        if !current_envelope.success {
            return Ok(current_envelope);
        }

        let current = match parse_files(&current_envelope) {
            Ok(files) => files,
            Err(envelope) => return Ok(*envelope),
        };

        debug!(
            "reconciling {} desired file(s) into {} current file(s) with strategy {}",
            desired.len(),
            current.len(),
            options.strategy
        );

        match merge_file_sets(current, desired, options) {
            MergeOutcome::Merged(merged) => self.content.update_content(script_id, &merged).await,
            MergeOutcome::Collision(collisions) => {
                Ok(collision_envelope(options.strategy, &collisions))
            }
        }
    }
}

/// Merge `desired` into `current` under the given options
///
/// Manifest handling is invariant across strategies: at most one manifest is
/// extracted from each side before the merge, the winner (per
/// `keep_manifest`) is re-appended exactly once afterwards, and manifests
/// never participate in collision logic. When neither side carries a
/// manifest, none is appended.
pub fn merge_file_sets(
    current: Vec<File>,
    desired: Vec<File>,
    options: &ReconcileOptions,
) -> MergeOutcome {
    let mut current = current;
    let mut desired = desired;
    let current_manifest = extract_manifest(&mut current);
    let desired_manifest = extract_manifest(&mut desired);
    let manifest = if options.keep_manifest {
        current_manifest.or(desired_manifest)
    } else {
        desired_manifest.or(current_manifest)
    };

    let mut merged = if options.clear {
        desired
    } else {
        // A no-op write is not a collision and must not be sent
        let desired: Vec<File> = desired
            .into_iter()
            .filter(|d| !current.iter().any(|c| c.same_content(d)))
            .collect();

        match options.strategy {
            CollisionStrategy::Abort => {
                let collisions: Vec<FileKey> = desired
                    .iter()
                    .filter(|d| contains_key(&current, &d.key()))
                    .map(File::key)
                    .collect();
                if !collisions.is_empty() {
                    return MergeOutcome::Collision(collisions);
                }
                let mut merged = current;
                merged.extend(desired);
                merged
            }
            CollisionStrategy::Replace => {
                let desired_keys: HashSet<FileKey> = desired.iter().map(File::key).collect();
                let mut merged: Vec<File> = current
                    .into_iter()
                    .filter(|c| !desired_keys.contains(&c.key()))
                    .collect();
                merged.extend(desired);
                merged
            }
            CollisionStrategy::Skip => {
                let current_keys: HashSet<FileKey> = current.iter().map(File::key).collect();
                let mut merged = current;
                merged.extend(
                    desired
                        .into_iter()
                        .filter(|d| !current_keys.contains(&d.key())),
                );
                merged
            }
            CollisionStrategy::Rename => {
                let mut merged = current;
                for mut file in desired {
                    if contains_key(&merged, &file.key()) {
                        file.name = fresh_name(&merged, &file);
                    }
                    merged.push(file);
                }
                merged
            }
        }
    };

    if let Some(manifest) = manifest {
        merged.push(manifest);
    }
    MergeOutcome::Merged(merged)
}

/// Remove and return the manifest from a working set, if present
fn extract_manifest(files: &mut Vec<File>) -> Option<File> {
    files
        .iter()
        .position(File::is_manifest)
        .map(|index| files.remove(index))
}

fn contains_key(files: &[File], key: &FileKey) -> bool {
    files.iter().any(|f| f.key() == *key)
}

/// Derive a `_N`-suffixed name unique among the accumulating result
///
/// N starts at 0 and increments until the candidate identity is unused.
fn fresh_name(placed: &[File], file: &File) -> String {
    let mut n = 0usize;
    loop {
        let candidate = format!("{}{}{}", file.name, files::RENAME_SEPARATOR, n);
        let taken = placed
            .iter()
            .any(|f| f.name == candidate && f.file_type == file.file_type);
        if !taken {
            return candidate;
        }
        n += 1;
    }
}

/// Parse the file list out of a content envelope
///
/// A payload this library cannot type (missing list, unknown file type on
/// the wire) is reported as a failed envelope so it travels as data like
/// every other remote-side problem.
fn parse_files(envelope: &ResponseEnvelope) -> Result<Vec<File>, Box<ResponseEnvelope>> {
    let Some(list) = envelope.data.get("files") else {
        return Ok(Vec::new());
    };
    serde_json::from_value(list.clone()).map_err(|e| {
        Box::new(ResponseEnvelope::error(
            envelope.code,
            ErrorInfo::new(format!("unexpected content payload: {e}")),
        ))
    })
}

/// Build the failed envelope for an Abort collision
fn collision_envelope(strategy: CollisionStrategy, collisions: &[FileKey]) -> ResponseEnvelope {
    let details: Vec<String> = collisions.iter().map(ToString::to_string).collect();
    let message = format!(
        "Merge aborted: {} file(s) already exist in the project: {}",
        details.len(),
        details.join(", ")
    );
    let mut envelope = ResponseEnvelope::error(409, ErrorInfo::with_details(message, details));
    envelope.collision = Some(strategy.as_str().to_string());
    envelope
}
