//! Concurrent member lookups for one pool.
//!
//! Lookups run on a bounded `buffer_unordered` stream polled by the calling
//! task, which is also the only place nodes get attached. The stream is
//! drained before `add_members` returns.

use super::builder::TreeBuilder;
use super::label::Label;
use super::root::{attach_resource, record_of};
use super::sink::{NodeContent, NodeId, NodeKind, Placeholder, TreeSink};
use super::{MemberOrder, worker_count};
use crate::openstack::{self, IdRef, Member, ResourceClient};
use futures_util::stream::{self, StreamExt};
use log::{debug, warn};

/// Result of one member lookup
enum MemberOutcome {
    Found(Member),
    Missing(String),
    Failed { id: String, message: String },
}

impl MemberOutcome {
    fn from_lookup(member_id: &str, result: openstack::Result<Option<Member>>) -> Self {
        match result {
            Ok(Some(member)) => MemberOutcome::Found(member),
            Ok(None) => MemberOutcome::Missing(member_id.to_string()),
            Err(e) => MemberOutcome::Failed {
                id: member_id.to_string(),
                message: e.to_string(),
            },
        }
    }
}

impl<C: ResourceClient, S: TreeSink> TreeBuilder<'_, C, S> {
    /// Look up every member of a pool concurrently and attach the results
    ///
    /// A failed lookup becomes an error placeholder and never affects its
    /// siblings.
    pub async fn add_members(&mut self, parent: NodeId, pool_id: &str, members: &[IdRef]) {
        let workers = worker_count(self.options.max_workers, members.len());
        debug!(
            "Fetching {} members of pool {} with {} workers",
            members.len(),
            pool_id,
            workers
        );

        let progress = self.sink.progress(
            &format!("Getting member details for pool {}", pool_id),
            members.len() as u64,
        );

        let client = self.client;
        let mut lookups = stream::iter(members.iter().enumerate())
            .map(|(index, member)| async move {
                let result = client.find_member(&member.id, pool_id).await;
                (index, MemberOutcome::from_lookup(&member.id, result))
            })
            .buffer_unordered(workers);

        let mut pending = Vec::new();
        while let Some((index, outcome)) = lookups.next().await {
            progress.advance();
            match self.options.member_order {
                MemberOrder::Completion => self.attach_member(parent, outcome),
                MemberOrder::Input => pending.push((index, outcome)),
            }
        }

        pending.sort_by_key(|(index, _)| *index);
        for (_, outcome) in pending {
            self.attach_member(parent, outcome);
        }
    }

    fn attach_member(&mut self, parent: NodeId, outcome: MemberOutcome) {
        match outcome {
            MemberOutcome::Found(member) => {
                let content = NodeContent {
                    kind: NodeKind::Member,
                    label: Label::member(&member, &*self.sink),
                    record: record_of(&member),
                };
                attach_resource(self.sink, parent, content, self.options.details);
            }
            MemberOutcome::Missing(id) => {
                debug!("Member {} not found", id);
                self.sink
                    .attach_placeholder(parent, &Placeholder::missing_member(&id));
            }
            MemberOutcome::Failed { id, message } => {
                warn!("Failed to retrieve member {}: {}", id, message);
                self.sink
                    .attach_placeholder(parent, &Placeholder::failed_member(&id, &message));
            }
        }
    }
}
