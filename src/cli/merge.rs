use tabled::Table;

use crate::{
    cli,
    config::Config,
    info, reconcile, success,
    spotify::{
        client::{LibraryApi, TrackSource},
        playlist,
        tracks::{self, LIKED_PAGE_SIZE, PLAYLIST_PAGE_SIZE},
    },
    types::{PlaylistRef, TrackRecord},
    utils, warning,
};

pub async fn merge(config: &Config, playlist_id: Option<String>, assume_yes: bool) {
    let manager = cli::token_manager(config);
    let client = cli::connect(config, &manager).await;
    merge_with(&client, playlist_id, assume_yes, &cli::confirm).await;
}

/// One synchronous merge pass against an authorized API.
///
/// Liked songs are sorted oldest first before the difference is taken, so
/// the missing songs are written newest first whatever order the service
/// listed them in. `confirm` is asked before anything is written unless
/// `assume_yes` is set and the target playlist was listed completely.
pub async fn merge_with(
    api: &dyn LibraryApi,
    playlist_id: Option<String>,
    assume_yes: bool,
    confirm: &dyn Fn(&str) -> bool,
) {
    let user = match api.current_user().await {
        Ok(user) => user,
        Err(e) => {
            warning!("Failed to retrieve user info: {}", e);
            return;
        }
    };
    success!("Logged in as: {}", user.label());

    let Some(mut liked) = fetch_liked(api).await else {
        return;
    };
    reconcile::sort_oldest_first(&mut liked);

    let pb = cli::spinner("Fetching your playlists...");
    let playlists = playlist::fetch_playlists(api, &user.id).await;
    pb.finish_and_clear();
    cli::report_partial("playlists", &playlists);

    let target = match playlist_id {
        Some(id) => match playlists.items.into_iter().find(|p| p.id == id) {
            Some(p) if p.editable => p,
            Some(p) => {
                warning!("Playlist '{}' is not editable by you", p.name);
                return;
            }
            None => {
                warning!("Playlist {} not found among your playlists", id);
                return;
            }
        },
        None => match select_playlist(&playlists.items) {
            Some(p) => p,
            None => {
                warning!("No playlist selected");
                return;
            }
        },
    };
    info!("Selected playlist: {}", target.name);

    let pb = cli::spinner("Fetching songs from target playlist...");
    let target_tracks = tracks::fetch_tracks(
        api,
        &TrackSource::Playlist(target.id.clone()),
        PLAYLIST_PAGE_SIZE,
        Some(&pb),
    )
    .await;
    pb.finish_and_clear();
    cli::report_partial("playlist songs", &target_tracks);
    success!("Found {} songs in target playlist", target_tracks.items.len());

    let missing = reconcile::reconcile(&liked, &target_tracks.items);
    if missing.is_empty() {
        success!("All liked songs are already in '{}'!", target.name);
        return;
    }

    info!(
        "Songs to add to '{}' (newest first): {}",
        target.name,
        missing.len()
    );
    if !crate::is_quiet() {
        println!("{}", Table::new(utils::track_table_rows(&missing)));
    }

    // A partial target listing may make already present songs look missing.
    let must_confirm = !assume_yes || !target_tracks.is_complete();
    if must_confirm
        && !confirm(&format!(
            "Add {} songs to '{}'?",
            missing.len(),
            target.name
        ))
    {
        warning!("Operation cancelled");
        return;
    }

    commit(api, &target, &missing).await;
}

async fn fetch_liked(api: &dyn LibraryApi) -> Option<Vec<TrackRecord>> {
    let pb = cli::spinner("Fetching your liked songs...");
    let liked = tracks::fetch_tracks(api, &TrackSource::Liked, LIKED_PAGE_SIZE, Some(&pb)).await;
    pb.finish_and_clear();
    cli::report_partial("liked songs", &liked);

    if liked.items.is_empty() {
        warning!("No liked songs found");
        return None;
    }
    success!("Found {} liked songs", liked.items.len());
    Some(liked.items)
}

async fn commit(api: &dyn LibraryApi, target: &PlaylistRef, missing: &[TrackRecord]) {
    let uris = reconcile::uris(missing);
    let chunks = uris.len().div_ceil(playlist::MAX_URIS_PER_REQUEST);

    let pb = cli::spinner("Adding songs to playlist...");
    let result = playlist::commit(api, &target.id, &uris).await;
    pb.finish_and_clear();

    match result {
        Ok(_) => success!(
            "Added {} songs to '{}', newest first",
            missing.len(),
            target.name
        ),
        Err(e) => warning!(
            "Failed to add songs: {}. {} of {} batches were applied; run merge again to add the rest.",
            e,
            e.committed_chunks(),
            chunks
        ),
    }
}

/// Lets the user pick one of the editable playlists by number.
///
/// Invalid input is answered with a new prompt; `None` when there is
/// nothing to pick or no terminal to read from.
pub(crate) fn select_playlist(playlists: &[PlaylistRef]) -> Option<PlaylistRef> {
    let editable: Vec<PlaylistRef> = playlists.iter().filter(|p| p.editable).cloned().collect();
    if editable.is_empty() {
        warning!("No editable playlists available");
        return None;
    }

    println!("{}", Table::new(utils::playlist_table_rows(&editable)));

    loop {
        let input = cli::prompt("Select playlist number")?;
        match utils::parse_selection(&input, editable.len()) {
            Ok(idx) => return Some(editable[idx].clone()),
            Err(e) => warning!("{}. Try again.", e),
        }
    }
}
