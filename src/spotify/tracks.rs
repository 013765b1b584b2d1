use indicatif::ProgressBar;

use crate::{
    error::FetchError,
    spotify::client::{LibraryApi, TrackSource},
    types::TrackRecord,
};

/// Page size of the liked-songs listing (the service maximum there).
pub const LIKED_PAGE_SIZE: u32 = 50;

/// Page size of the playlist-tracks listing.
pub const PLAYLIST_PAGE_SIZE: u32 = 100;

/// Items gathered from a paginated listing.
///
/// When `partial` is set the listing stopped early and `items` is only a
/// lower bound of the remote collection.
#[derive(Debug)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub partial: Option<FetchError>,
}

impl<T> Fetched<T> {
    pub fn is_complete(&self) -> bool {
        self.partial.is_none()
    }

    pub(crate) fn stopped(items: Vec<T>, cause: FetchError) -> Self {
        let collected = items.len();
        Self {
            items,
            partial: Some(FetchError::PartialResult {
                collected,
                cause: Box::new(cause),
            }),
        }
    }
}

/// Pages through a track listing until the service reports no next page.
///
/// Pages are requested at offsets `0`, `page_size`, `2 * page_size`, ...
/// and their records are concatenated in the order the service lists them.
///
/// # Arguments
///
/// * `api` - the remote library
/// * `source` - liked songs or the tracks of one playlist
/// * `page_size` - [`LIKED_PAGE_SIZE`] or [`PLAYLIST_PAGE_SIZE`]
/// * `progress` - optional spinner whose message shows the running count
///
/// # Returns
///
/// A [`Fetched`] with the normalized records. Entries that are `null`, have
/// no track (withdrawn from the catalogue) or have no URI (local files) are
/// skipped without affecting the rest of the page.
///
/// # Error Handling
///
/// The fetch never fails as a whole. The first failing page ends it, and
/// the records collected so far come back with
/// [`FetchError::PartialResult`] describing how many were collected and why
/// it stopped.
///
/// # Example
///
/// ```
/// let liked = fetch_tracks(&client, &TrackSource::Liked, LIKED_PAGE_SIZE, None).await;
/// if !liked.is_complete() {
///     warning!("Only {} liked songs could be fetched", liked.items.len());
/// }
/// ```
pub async fn fetch_tracks(
    api: &dyn LibraryApi,
    source: &TrackSource,
    page_size: u32,
    progress: Option<&ProgressBar>,
) -> Fetched<TrackRecord> {
    let mut tracks: Vec<TrackRecord> = Vec::new();
    let mut offset = 0;

    loop {
        let page = match api.tracks_page(source, offset, page_size).await {
            Ok(page) => page,
            Err(e) => return Fetched::stopped(tracks, e.into()),
        };

        let received = page.items.len();
        tracks.extend(
            page.items
                .into_iter()
                .flatten()
                .filter_map(|item| item.into_record()),
        );

        if let Some(pb) = progress {
            pb.set_message(format!("Fetched {} tracks...", tracks.len()));
        }

        if page.next.is_none() || received == 0 {
            break;
        }
        offset += page_size;
    }

    Fetched {
        items: tracks,
        partial: None,
    }
}
