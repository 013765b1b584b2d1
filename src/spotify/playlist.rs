use crate::{
    error::{ApiError, WriteError},
    spotify::{client::LibraryApi, tracks::Fetched},
    types::PlaylistRef,
};

/// Hard ceiling of URIs per "add tracks" call.
pub const MAX_URIS_PER_REQUEST: usize = 100;

/// Page size of the "my playlists" listing.
pub const PLAYLISTS_PAGE_SIZE: u32 = 50;

/// Lists the user's playlists, deriving `editable` against `user_id`.
///
/// Follows the same degradation rule as the track fetch: a failing page
/// returns what was listed before it.
pub async fn fetch_playlists(api: &dyn LibraryApi, user_id: &str) -> Fetched<PlaylistRef> {
    let mut playlists: Vec<PlaylistRef> = Vec::new();
    let mut offset = 0;

    loop {
        let page = match api.playlists_page(offset, PLAYLISTS_PAGE_SIZE).await {
            Ok(page) => page,
            Err(e) => return Fetched::stopped(playlists, e.into()),
        };

        let received = page.items.len();
        playlists.extend(
            page.items
                .into_iter()
                .flatten()
                .map(|p| p.into_ref(user_id)),
        );

        if page.next.is_none() || received == 0 {
            break;
        }
        offset += PLAYLISTS_PAGE_SIZE;
    }

    Fetched {
        items: playlists,
        partial: None,
    }
}

/// Appends `uris` to the playlist in chunks of [`MAX_URIS_PER_REQUEST`].
///
/// Chunks are written one after another in input order, so the first
/// chunk's tracks land before the second's.
///
/// # Returns
///
/// The number of chunks written, zero for an empty input.
///
/// # Errors
///
/// The first failing chunk stops the write with [`WriteError::ChunkFailure`]
/// (rejected by the service) or [`WriteError::ChunkTransport`] (not sent).
/// Chunks already applied stay applied; [`WriteError::committed_chunks`]
/// tells how many.
pub async fn commit(
    api: &dyn LibraryApi,
    playlist_id: &str,
    uris: &[String],
) -> Result<usize, WriteError> {
    let mut written = 0;

    for (index, chunk) in uris.chunks(MAX_URIS_PER_REQUEST).enumerate() {
        if let Err(e) = api.add_tracks(playlist_id, chunk).await {
            return Err(match e {
                ApiError::Status(status) => WriteError::ChunkFailure { status, index },
                ApiError::Transport(e) => WriteError::ChunkTransport {
                    index,
                    message: e.to_string(),
                },
                ApiError::Auth(e) => WriteError::ChunkTransport {
                    index,
                    message: e.to_string(),
                },
            });
        }
        written += 1;
    }

    Ok(written)
}
