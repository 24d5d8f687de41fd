//! Version-chain reconstruction from `parentAdId` links.
//!
//! Every asset belongs to exactly one chain: a singleton upload is its own
//! chain, a re-uploaded asset points at the version it supersedes. Stored
//! data is not always clean, so the builder tolerates dangling parents and
//! parent cycles instead of trusting the invariant.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use greenlight_core::model::Asset;

/// One version chain, ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// The parentless ancestor the chain hangs off.
    pub root_id: String,
    /// Every member, ordered by `(version, id)` ascending.
    pub member_ids: Vec<String>,
    /// The newest version: the member no other asset names as parent.
    pub terminal_id: String,
}

impl Chain {
    /// Members superseded by the terminal version.
    #[must_use]
    pub fn superseded_ids(&self) -> impl Iterator<Item = &str> {
        self.member_ids
            .iter()
            .filter(|id| **id != self.terminal_id)
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.member_ids.len() == 1
    }
}

/// Group `assets` into version chains.
///
/// Roots are assets with no `parentAdId`, or whose parent id no longer
/// exists in the group (logged and treated as a root). Assets reachable
/// from no root at all sit on a parent cycle; the member with the smallest
/// id is promoted to root so the traversal always terminates.
#[must_use]
pub fn build_chains(assets: &[Asset]) -> Vec<Chain> {
    let by_id: BTreeMap<&str, &Asset> = assets.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for asset in assets {
        if let Some(parent) = asset.parent_id.as_deref() {
            if by_id.contains_key(parent) {
                children.entry(parent).or_default().push(asset.id.as_str());
            }
        }
    }

    let mut roots: Vec<&str> = Vec::new();
    for asset in assets {
        match asset.parent_id.as_deref() {
            None => roots.push(asset.id.as_str()),
            Some(parent) if !by_id.contains_key(parent) => {
                warn!(
                    asset = asset.id.as_str(),
                    parent, "parentAdId points at a missing asset, treating as chain root"
                );
                roots.push(asset.id.as_str());
            }
            Some(_) => {}
        }
    }

    let mut assigned: BTreeSet<&str> = BTreeSet::new();
    let mut chains: Vec<Chain> = roots
        .into_iter()
        .filter_map(|root| collect_chain(root, &children, &by_id, &mut assigned))
        .collect();

    // Anything still unassigned hangs off a parent cycle.
    loop {
        let Some(stranded) = assets
            .iter()
            .map(|a| a.id.as_str())
            .find(|id| !assigned.contains(id))
        else {
            break;
        };
        warn!(
            asset = stranded,
            "parent chain contains a cycle, promoting to chain root"
        );
        if let Some(chain) = collect_chain(stranded, &children, &by_id, &mut assigned) {
            chains.push(chain);
        }
    }

    chains
}

fn collect_chain<'a>(
    root: &'a str,
    children: &BTreeMap<&str, Vec<&'a str>>,
    by_id: &BTreeMap<&str, &Asset>,
    assigned: &mut BTreeSet<&'a str>,
) -> Option<Chain> {
    if !assigned.insert(root) {
        return None;
    }
    let mut members = vec![root];
    let mut queue = vec![root];
    while let Some(current) = queue.pop() {
        if let Some(next) = children.get(current) {
            for child in next {
                if assigned.insert(child) {
                    members.push(child);
                    queue.push(child);
                }
            }
        }
    }

    let version_of = |id: &str| by_id.get(id).map_or(1, |asset| asset.version);
    members.sort_by(|a, b| (version_of(a), *a).cmp(&(version_of(b), *b)));

    // The terminal is a member with no child inside the chain. Branched
    // chains can have several candidates; the newest by (version, id) wins.
    let terminal = members
        .iter()
        .filter(|id| children.get(**id).is_none_or(Vec::is_empty))
        .max_by_key(|id| (version_of(id), **id))
        .copied()
        .unwrap_or(root);

    Some(Chain {
        root_id: root.to_string(),
        member_ids: members.iter().map(ToString::to_string).collect(),
        terminal_id: terminal.to_string(),
    })
}
