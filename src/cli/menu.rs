use std::path::Path;

use colored::Colorize;

use crate::{
    cli::{
        self, backup::backup_with, liked::liked_with, merge::merge_with,
        playlists::playlists_with,
    },
    config::Config,
    error::UserInputError,
    success, warning,
};

const LIKED_PREVIEW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Merge,
    ViewLiked,
    ViewPlaylists,
    Backup,
    Reauthenticate,
    Exit,
}

impl MenuChoice {
    fn parse(input: &str) -> Result<Self, UserInputError> {
        match input.trim() {
            "1" => Ok(MenuChoice::Merge),
            "2" => Ok(MenuChoice::ViewLiked),
            "3" => Ok(MenuChoice::ViewPlaylists),
            "4" => Ok(MenuChoice::Backup),
            "5" => Ok(MenuChoice::Reauthenticate),
            "0" => Ok(MenuChoice::Exit),
            other => Err(UserInputError::InvalidSelection(other.to_string())),
        }
    }
}

fn print_menu() {
    println!("\n{}", "=== Spotify Liked Songs Merger ===".green().bold());
    println!("1. Merge liked songs into a playlist");
    println!("2. View liked songs");
    println!("3. View playlists");
    println!("4. Backup liked songs");
    println!("5. Re-authenticate");
    println!("0. Exit");
}

fn read_choice() -> Option<MenuChoice> {
    loop {
        let input = cli::prompt("Select option (0-5)")?;
        match MenuChoice::parse(&input) {
            Ok(choice) => return Some(choice),
            Err(e) => warning!("{}. Please select 0-5.", e),
        }
    }
}

/// Interactive loop over all operations until the user exits.
///
/// The client asks the token manager before every request, so the session
/// outlives the first access token and picks up a re-authorization.
pub async fn menu(config: &Config) {
    let manager = cli::token_manager(config);
    let client = cli::connect(config, &manager).await;

    loop {
        print_menu();
        let Some(choice) = read_choice() else {
            break;
        };

        match choice {
            MenuChoice::Merge => merge_with(&client, None, false, &cli::confirm).await,
            MenuChoice::ViewLiked => liked_with(&client, LIKED_PREVIEW).await,
            MenuChoice::ViewPlaylists => playlists_with(&client).await,
            MenuChoice::Backup => backup_with(&client, Path::new(".")).await,
            MenuChoice::Reauthenticate => {
                if let Err(e) = manager.authorize_interactively().await {
                    warning!("Re-authentication failed: {}", e);
                }
            }
            MenuChoice::Exit => break,
        }
    }

    success!("Goodbye!");
}
