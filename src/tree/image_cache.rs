//! Image id → name memoization shared by every amphora tree in a run.

use crate::openstack::{self, ResourceClient};
use log::{debug, trace};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Process-lifetime cache of image names
///
/// Entries are only ever added. Ids that Glance does not return are not
/// remembered and will be asked for again on the next miss.
#[derive(Debug, Default)]
pub struct ImageNameCache {
    names: Mutex<HashMap<String, String>>,
}

impl ImageNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `image_ids` to names, fetching the uncached ones in one batch
    ///
    /// The returned map holds only requested ids that have a name. The lock
    /// is held across the batch lookup, so concurrent callers never fetch
    /// the same id twice.
    pub async fn resolve<C: ResourceClient>(
        &self,
        client: &C,
        image_ids: &[String],
    ) -> openstack::Result<HashMap<String, String>> {
        let mut names = self.names.lock().await;

        let mut missing: Vec<String> = Vec::new();
        for id in image_ids {
            if !names.contains_key(id) && !missing.contains(id) {
                missing.push(id.clone());
            }
        }

        if missing.is_empty() {
            trace!("Image cache hit for {:?}", image_ids);
        } else {
            debug!("Image cache miss, looking up {:?}", missing);
            for image in client.list_images(&missing).await? {
                if let Some(name) = image.name {
                    names.entry(image.id).or_insert(name);
                }
            }
        }

        Ok(image_ids
            .iter()
            .filter_map(|id| names.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }

    pub async fn len(&self) -> usize {
        self.names.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.names.lock().await.is_empty()
    }
}
