use std::path::Path;

use crate::{
    cli,
    config::Config,
    management::LikedSnapshot,
    spotify::{
        client::{LibraryApi, TrackSource},
        tracks::{self, LIKED_PAGE_SIZE},
    },
    success, warning,
};

pub async fn backup(config: &Config, dir: &Path) {
    let manager = cli::token_manager(config);
    let client = cli::connect(config, &manager).await;
    backup_with(&client, dir).await;
}

pub(crate) async fn backup_with(api: &dyn LibraryApi, dir: &Path) {
    let pb = cli::spinner("Fetching liked songs for backup...");
    let liked = tracks::fetch_tracks(api, &TrackSource::Liked, LIKED_PAGE_SIZE, Some(&pb)).await;
    pb.finish_and_clear();
    cli::report_partial("liked songs", &liked);

    if liked.items.is_empty() {
        warning!("No liked songs found");
        return;
    }

    let snapshot = LikedSnapshot::new(liked.items);
    match snapshot.persist(dir).await {
        Ok(path) => success!(
            "Backed up {} songs to {}",
            snapshot.count(),
            path.display()
        ),
        Err(e) => warning!("Failed to write backup: {}", e),
    }
}
