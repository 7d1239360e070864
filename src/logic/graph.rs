use std::collections::{BTreeSet, HashMap, HashSet};

use itertools::Itertools;

use crate::error::AppError;
use crate::model::{CommitEdge, CommitGraph, CommitInfo, CommitNode};
use crate::vcs::{Vcs, Workspace};

/// Per-node cap on the changed-file listing, keeping payloads bounded.
pub const MAX_CHANGED_FILES: usize = 20;

pub struct GraphBuilder;

impl GraphBuilder {
    /// Build the commit DAG across every branch of the current checkout.
    pub fn build<V: Vcs>(vcs: &V, workspace: &Workspace) -> Result<CommitGraph, AppError> {
        if !workspace.is_initialized() {
            return Err(AppError::NotInitialized);
        }
        let workdir = workspace.path();

        // Refresh remote-tracking refs so membership reflects the current
        // upstream branch set.
        vcs.fetch_prune(workdir).map_err(AppError::GraphBuild)?;
        let refs = vcs.branch_refs(workdir).map_err(AppError::GraphBuild)?;

        // Adjacency cache keyed by hash. The membership pass visits a
        // commit once per containing branch but reads it from the backend
        // once overall.
        let mut commits: HashMap<String, CommitInfo> = HashMap::new();
        let mut membership: HashMap<String, BTreeSet<String>> = HashMap::new();

        for branch in &refs {
            let mut visited: HashSet<String> = HashSet::new();
            let mut pending = vec![branch.tip.clone()];
            while let Some(sha) = pending.pop() {
                if !visited.insert(sha.clone()) {
                    continue;
                }
                let parents = match commits.get(&sha) {
                    Some(info) => info.parents.clone(),
                    None => match vcs.lookup_commit(workdir, &sha) {
                        Ok(info) => {
                            let parents = info.parents.clone();
                            commits.insert(sha.clone(), info);
                            parents
                        }
                        Err(e) => {
                            // A shallow clone lists parent ids past the
                            // fetch boundary without their objects. The
                            // walk ends there; the child keeps its edge.
                            log::debug!("Ancestry walk stopped at {}: {:#}", sha, e);
                            continue;
                        }
                    },
                };
                membership.entry(sha).or_default().insert(branch.name.clone());
                pending.extend(parents);
            }
        }

        // Emit every commit reachable from the union of all tips exactly
        // once, with one edge per parent.
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut emitted: HashSet<String> = HashSet::new();
        let mut pending: Vec<String> = refs.iter().map(|r| r.tip.clone()).unique().collect();
        while let Some(sha) = pending.pop() {
            if !emitted.insert(sha.clone()) {
                continue;
            }
            let info = match commits.get(&sha) {
                Some(info) => info,
                None => continue, // parent past the fetch boundary, edge only
            };
            // A failed diff stat degrades to an empty file list instead of
            // aborting the build.
            let files = match vcs.changed_files(workdir, &sha, MAX_CHANGED_FILES) {
                Ok(files) => files,
                Err(e) => {
                    log::warn!("Skipping changed-file listing for {}: {:#}", sha, e);
                    Vec::new()
                }
            };
            let branches = membership
                .get(&sha)
                .map(|names| names.iter().cloned().collect())
                .unwrap_or_default();
            nodes.push(CommitNode {
                sha: info.sha.clone(),
                author: info.author.clone(),
                date: info.date,
                message: info.message.clone(),
                branches,
                is_merge: info.parents.len() > 1,
                files,
            });
            for parent in &info.parents {
                edges.push(CommitEdge {
                    from: sha.clone(),
                    to: parent.clone(),
                });
                pending.push(parent.clone());
            }
        }

        log::info!("Commit graph built: {} nodes, {} edges", nodes.len(), edges.len());
        Ok(CommitGraph { nodes, edges })
    }
}
