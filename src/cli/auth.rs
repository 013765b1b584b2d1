use crate::{cli, config::Config, error, info, management::FileTokenStore};

pub async fn auth(config: &Config) {
    let manager = cli::token_manager(config);
    if let Err(e) = manager.authorize_interactively().await {
        error!("Authentication failed: {}", e);
    }
    info!(
        "Token stored in {}",
        FileTokenStore::default_location().path().display()
    );
}
