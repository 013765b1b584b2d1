use tabled::Table;

use crate::{
    cli,
    config::Config,
    info,
    spotify::{
        client::{LibraryApi, TrackSource},
        tracks::{self, LIKED_PAGE_SIZE},
    },
    success, utils, warning,
};

pub async fn liked(config: &Config, limit: usize) {
    let manager = cli::token_manager(config);
    let client = cli::connect(config, &manager).await;
    liked_with(&client, limit).await;
}

/// Shows the first `limit` liked songs in the order the service lists them.
pub(crate) async fn liked_with(api: &dyn LibraryApi, limit: usize) {
    let pb = cli::spinner("Fetching liked songs...");
    let liked = tracks::fetch_tracks(api, &TrackSource::Liked, LIKED_PAGE_SIZE, Some(&pb)).await;
    pb.finish_and_clear();
    cli::report_partial("liked songs", &liked);

    if liked.items.is_empty() {
        warning!("No liked songs found");
        return;
    }
    success!("Found {} liked songs", liked.items.len());

    let shown = limit.min(liked.items.len());
    println!(
        "{}",
        Table::new(utils::track_table_rows(&liked.items[..shown]))
    );
    if liked.items.len() > shown {
        info!("... and {} more songs", liked.items.len() - shown);
    }
}
