mod common;

use common::{FakeCloud, RecordingSink, load_balancer};
use openstack_lb_info::tree::{AmphoraTreeBuilder, ImageNameCache, NodeKind};
use std::sync::atomic::Ordering;
use std::time::Duration;

fn two_amphorae_sharing_an_image() -> FakeCloud {
    let mut cloud = FakeCloud::new();
    cloud.add_amphora("lb-1", "a-1", Some("img-1"), Some("srv-1"));
    cloud.add_amphora("lb-1", "a-2", Some("img-1"), Some("srv-2"));
    cloud.add_server("srv-1", "amphora-small", "compute-01");
    cloud.add_server("srv-2", "amphora-small", "compute-02");
    cloud.add_image("img-1", "amphora-x64-haproxy");
    cloud
}

#[tokio::test]
async fn shared_image_is_looked_up_once() {
    let cloud = two_amphorae_sharing_an_image();
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
        .display(&load_balancer("lb-1", &[]))
        .await
        .unwrap();

    assert_eq!(cloud.image_batches(), vec![vec!["img-1".to_string()]]);
    assert_eq!(cloud.server_lookups.load(Ordering::SeqCst), 2);

    let root = sink.only_tree();
    assert_eq!(root.kind, Some(NodeKind::LoadBalancer));
    assert_eq!(
        root.child_texts(),
        vec![
            "amphora: a-1 MASTER <ALLOCATED> lb_network_ip:172.16.0.4 img:amphora-x64-haproxy server:srv-1 vm_flavor:amphora-small compute host:(compute-01)",
            "amphora: a-2 MASTER <ALLOCATED> lb_network_ip:172.16.0.4 img:amphora-x64-haproxy server:srv-2 vm_flavor:amphora-small compute host:(compute-02)",
        ]
    );
}

#[tokio::test]
async fn image_cache_is_shared_across_load_balancers() {
    let mut cloud = two_amphorae_sharing_an_image();
    cloud.add_amphora("lb-2", "a-3", Some("img-1"), Some("srv-1"));
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    for lb in ["lb-1", "lb-2"] {
        AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
            .display(&load_balancer(lb, &[]))
            .await
            .unwrap();
    }

    assert_eq!(sink.trees.len(), 2);
    assert_eq!(cloud.image_batches().len(), 1);
    assert_eq!(images.len().await, 1);
}

#[tokio::test]
async fn different_images_are_batched_together() {
    let mut cloud = FakeCloud::new();
    cloud.add_amphora("lb-1", "a-1", Some("img-1"), None);
    cloud.add_amphora("lb-1", "a-2", Some("img-2"), None);
    cloud.add_image("img-1", "focal");
    cloud.add_image("img-2", "jammy");
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
        .display(&load_balancer("lb-1", &[]))
        .await
        .unwrap();

    assert_eq!(
        cloud.image_batches(),
        vec![vec!["img-1".to_string(), "img-2".to_string()]]
    );
    let texts = sink.only_tree().child_texts();
    assert!(texts[0].contains("img:focal"));
    assert!(texts[1].contains("img:jammy"));
}

#[tokio::test]
async fn missing_server_and_image_show_not_available() {
    let mut cloud = FakeCloud::new();
    cloud.add_amphora("lb-1", "a-1", Some("img-gone"), Some("srv-gone"));
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
        .display(&load_balancer("lb-1", &[]))
        .await
        .unwrap();

    let amphora = &sink.only_tree().children[0];
    assert_eq!(amphora.kind, Some(NodeKind::Amphora));
    assert!(amphora.text.contains("img:N/A"));
    assert!(amphora.text.contains("server:N/A"));
    assert!(amphora.text.contains("vm_flavor:N/A"));
    assert!(amphora.text.contains("compute host:(N/A)"));
    assert!(amphora.record["server_details"].is_null());
    assert_eq!(amphora.record["image_name"], "N/A");

    // Unknown images are not remembered
    assert!(images.is_empty().await);
    assert_eq!(cloud.image_batches(), vec![vec!["img-gone".to_string()]]);
}

#[tokio::test]
async fn missing_image_is_asked_for_once_per_load_balancer() {
    let mut cloud = FakeCloud::new();
    cloud.add_amphora("lb-1", "a-1", Some("img-x"), None);
    cloud.add_amphora("lb-1", "a-2", Some("img-x"), None);
    cloud.add_amphora("lb-2", "a-3", Some("img-x"), None);
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
        .display(&load_balancer("lb-1", &[]))
        .await
        .unwrap();
    assert_eq!(cloud.image_batches(), vec![vec!["img-x".to_string()]]);

    let texts = sink.trees[0].1.child_texts();
    assert_eq!(texts.len(), 2);
    assert!(texts.iter().all(|text| text.contains("img:N/A")));

    // Not remembered, so the next load balancer asks again
    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
        .display(&load_balancer("lb-2", &[]))
        .await
        .unwrap();
    assert_eq!(cloud.image_batches().len(), 2);
}

#[tokio::test]
async fn amphora_without_compute_id_skips_server_lookup() {
    let mut cloud = FakeCloud::new();
    cloud.add_amphora("lb-1", "a-1", None, None);
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
        .display(&load_balancer("lb-1", &[]))
        .await
        .unwrap();

    assert_eq!(cloud.server_lookups.load(Ordering::SeqCst), 0);
    assert!(cloud.image_batches().is_empty());
    assert!(sink.only_tree().children[0].text.contains("server:N/A"));
}

#[tokio::test]
async fn lb_without_amphorae_renders_bare_root() {
    let cloud = FakeCloud::new();
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, false)
        .display(&load_balancer("lb-1", &[]))
        .await
        .unwrap();

    assert!(sink.only_tree().children.is_empty());
}

#[tokio::test]
async fn amphora_details_cover_amphora_attributes_only() {
    let cloud = two_amphorae_sharing_an_image();
    let images = ImageNameCache::new();
    let mut sink = RecordingSink::new();

    AmphoraTreeBuilder::new(&cloud, &mut sink, &images, true)
        .display(&load_balancer("lb-1", &[]))
        .await
        .unwrap();

    let amphora = &sink.only_tree().children[0];
    let keys: Vec<&str> = amphora
        .details
        .iter()
        .filter_map(|line| line.split_once(": ").map(|(k, _)| k))
        .collect();

    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
    assert!(keys.contains(&"compute_id"));
    assert!(keys.contains(&"image_id"));
    assert!(!keys.contains(&"image_name"));
    assert!(!keys.contains(&"server_details"));
    assert_eq!(
        amphora.record["server_details"]["compute_host"],
        "compute-01"
    );
}

#[tokio::test]
async fn concurrent_resolves_fetch_each_image_once() {
    let mut cloud = FakeCloud::new();
    cloud.add_image("img-1", "focal");
    cloud.image_delay = Duration::from_millis(20);
    let images = ImageNameCache::new();
    let ids = vec!["img-1".to_string()];

    let (first, second) = tokio::join!(images.resolve(&cloud, &ids), images.resolve(&cloud, &ids));

    assert_eq!(first.unwrap().get("img-1").map(String::as_str), Some("focal"));
    assert_eq!(second.unwrap().get("img-1").map(String::as_str), Some("focal"));
    assert_eq!(cloud.image_batches().len(), 1);
}

#[tokio::test]
async fn resolve_deduplicates_and_restricts_to_requested_ids() {
    let mut cloud = FakeCloud::new();
    cloud.add_image("img-1", "focal");
    cloud.add_image("img-2", "jammy");
    let images = ImageNameCache::new();

    let ids = vec!["img-1".to_string(), "img-1".to_string(), "img-2".to_string()];
    let names = images.resolve(&cloud, &ids).await.unwrap();
    assert_eq!(names.len(), 2);
    assert_eq!(
        cloud.image_batches(),
        vec![vec!["img-1".to_string(), "img-2".to_string()]]
    );

    let names = images.resolve(&cloud, &["img-2".to_string()]).await.unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names["img-2"], "jammy");
    assert_eq!(cloud.image_batches().len(), 1);
}
