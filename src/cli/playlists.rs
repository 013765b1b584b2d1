use tabled::Table;

use crate::{
    cli,
    config::Config,
    spotify::{client::LibraryApi, playlist},
    utils, warning,
};

pub async fn playlists(config: &Config) {
    let manager = cli::token_manager(config);
    let client = cli::connect(config, &manager).await;
    playlists_with(&client).await;
}

pub(crate) async fn playlists_with(api: &dyn LibraryApi) {
    let user = match api.current_user().await {
        Ok(user) => user,
        Err(e) => {
            warning!("Failed to retrieve user info: {}", e);
            return;
        }
    };

    let pb = cli::spinner("Fetching playlists...");
    let playlists = playlist::fetch_playlists(api, &user.id).await;
    pb.finish_and_clear();
    cli::report_partial("playlists", &playlists);

    if playlists.items.is_empty() {
        warning!("No playlists found");
        return;
    }

    println!(
        "{}",
        Table::new(utils::playlist_table_rows(&playlists.items))
    );
}
