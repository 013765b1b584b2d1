use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};

use crate::{
    config::Config,
    error::AuthError,
    info,
    management::TokenStore,
    server::CallbackServer,
    success,
    types::{TokenRecord, TokenResponse},
    utils, warning,
};

/// Interval between two looks at the callback cell.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls before the interactive grant gives up.
pub const MAX_POLLS: u32 = 120;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Opens the authorization URL for the user.
pub type BrowserOpener = Arc<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

/// The token endpoint, for both grant types.
///
/// Implementations only talk to the endpoint; turning a response into a
/// persisted [`TokenRecord`] is left to [`TokenManager`].
///
/// # Errors
///
/// - [`AuthError::ExchangeFailed`] with the HTTP status when the endpoint
///   rejects the grant (expired code, revoked refresh token, bad client)
/// - [`AuthError::Transport`] when the endpoint cannot be reached
#[async_trait]
pub trait TokenGrant: Send + Sync {
    async fn exchange_code(&self, code: &str, verifier: &str)
    -> Result<TokenResponse, AuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError>;
}

/// [`TokenGrant`] against the Spotify accounts service.
///
/// Requests are form encoded. With a client secret configured the client
/// authenticates with HTTP basic auth; the PKCE verifier is sent either way.
pub struct SpotifyTokenGrant {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
}

impl SpotifyTokenGrant {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    async fn post_form(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let mut request = self.client.post(&self.token_url).form(form);
        if let Some(secret) = &self.client_secret {
            request = request.basic_auth(&self.client_id, Some(secret));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AuthError::ExchangeFailed(response.status().as_u16()));
        }

        Ok(response.json::<TokenResponse>().await?)
    }
}

#[async_trait]
impl TokenGrant for SpotifyTokenGrant {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        self.post_form(&[
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        self.post_form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
        ])
        .await
    }
}

/// Everything the browser handoff needs.
pub struct InteractiveAuth {
    server: Arc<CallbackServer>,
    auth_url: String,
    client_id: String,
    redirect_uri: String,
    scope: String,
    opener: BrowserOpener,
    poll_interval: Duration,
    max_polls: u32,
}

impl InteractiveAuth {
    pub fn new(config: &Config, server: Arc<CallbackServer>) -> Self {
        Self {
            server,
            auth_url: config.auth_url.clone(),
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            opener: Arc::new(|url: &str| webbrowser::open(url)),
            poll_interval: POLL_INTERVAL,
            max_polls: MAX_POLLS,
        }
    }

    pub fn with_opener(mut self, opener: BrowserOpener) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Builds the URL of the consent page.
    ///
    /// # Arguments
    ///
    /// * `code_challenge` - S256 challenge derived from the PKCE verifier
    ///   that will later be sent with the code exchange
    ///
    /// # Returns
    ///
    /// The configured authorization endpoint with `client_id`,
    /// `response_type=code`, `redirect_uri`, `scope`,
    /// `code_challenge_method=S256` and `code_challenge` as query
    /// parameters, percent-encoded.
    ///
    /// # Example
    ///
    /// ```
    /// let verifier = utils::generate_code_verifier();
    /// let url = interactive.authorization_url(&utils::generate_code_challenge(&verifier))?;
    /// webbrowser::open(url.as_str())?;
    /// ```
    pub fn authorization_url(&self, code_challenge: &str) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
            ],
        )
        .map_err(|e| AuthError::CallbackServer(format!("invalid authorization url: {}", e)))
    }

    /// Opens the consent page and waits for the redirect.
    ///
    /// Returns the authorization code and the PKCE verifier it must be
    /// exchanged with.
    ///
    /// # Authentication Flow
    ///
    /// 1. **PKCE Setup**: a fresh 128 character verifier and its challenge
    /// 2. **Server Start**: the callback server is bound (once per process)
    ///    and any code left from an earlier attempt is cleared
    /// 3. **Browser Launch**: the consent page is opened; when that fails
    ///    the URL is printed for the user to open manually
    /// 4. **Polling**: the handoff cell is checked every poll interval until
    ///    a code arrives or the poll budget is used up
    ///
    /// # Errors
    ///
    /// - [`AuthError::CallbackServer`] if the local address cannot be bound
    /// - [`AuthError::ConsentDenied`] if the redirect carried no code
    /// - [`AuthError::Timeout`] if no redirect arrived in time
    async fn obtain_code(&self) -> Result<(String, String), AuthError> {
        let verifier = utils::generate_code_verifier();
        let challenge = utils::generate_code_challenge(&verifier);
        let url = self.authorization_url(&challenge)?;

        self.server.start().await?;
        self.server.clear().await;

        info!("Opening browser for Spotify authorization...");
        if (self.opener)(url.as_str()).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                url
            );
        }

        info!("Waiting for the authorization redirect...");
        for _ in 0..self.max_polls {
            if let Some(code) = self.server.authorization_code().await {
                if code.is_empty() {
                    return Err(AuthError::ConsentDenied);
                }
                return Ok((code, verifier));
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(AuthError::Timeout)
    }
}

/// Hands out valid access tokens, however they have to be obtained.
///
/// Decision order: cached token still valid for at least 30 seconds, then
/// refresh-token grant, then (if allowed) the interactive browser flow.
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    grant: Arc<dyn TokenGrant>,
    interactive: Option<InteractiveAuth>,
    clock: Clock,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>, grant: Arc<dyn TokenGrant>) -> Self {
        Self {
            store,
            grant,
            interactive: None,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_interactive(mut self, interactive: InteractiveAuth) -> Self {
        self.interactive = Some(interactive);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns an access token that stays valid for at least another 30
    /// seconds.
    ///
    /// # Arguments
    ///
    /// * `interactive` - whether the browser flow may be started when the
    ///   stored token cannot be used or refreshed
    ///
    /// # Decision Order
    ///
    /// 1. **Cached**: the stored token expires more than 30 seconds from now
    ///    and is returned without a network call
    /// 2. **Refresh**: the stored refresh token is exchanged; the new record
    ///    is persisted, keeping the old refresh token when the response
    ///    carries none
    /// 3. **Interactive**: only when `interactive` is set, see
    ///    [`TokenManager::authorize_interactively`]
    ///
    /// # Error Handling
    ///
    /// - An unreadable token file is reported as a warning and treated as
    ///   missing
    /// - A failed refresh is reported as a warning and the next step is tried
    /// - Without a token and without `interactive`, the result is
    ///   [`AuthError::NoValidToken`]
    ///
    /// # Example
    ///
    /// ```
    /// let manager = TokenManager::new(store, grant).with_interactive(interactive);
    /// let token = manager.get_valid_access_token(true).await?;
    /// ```
    pub async fn get_valid_access_token(&self, interactive: bool) -> Result<String, AuthError> {
        let stored = match self.store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warning!("Ignoring unreadable token file: {}", e);
                None
            }
        };

        if let Some(record) = &stored {
            if record.is_valid_at((self.clock)()) {
                return Ok(record.access_token.clone());
            }

            if let Some(refresh_token) = &record.refresh_token {
                match self.grant.refresh(refresh_token).await {
                    Ok(response) => {
                        let record = TokenRecord::from_response(
                            response,
                            (self.clock)(),
                            Some(refresh_token.clone()),
                        );
                        self.store.save(&record).await?;
                        return Ok(record.access_token);
                    }
                    Err(e) => warning!("Token refresh failed: {}", e),
                }
            }
        }

        if !interactive {
            return Err(AuthError::NoValidToken);
        }

        self.authorize_interactively().await
    }

    /// Runs the authorization-code grant through the browser regardless of
    /// the stored token.
    ///
    /// The exchanged token replaces whatever was stored before, so clients
    /// sharing this manager use it from their next request on.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NoValidToken`] when no browser flow is configured
    /// - any error of the browser handoff or the code exchange
    /// - [`AuthError::Store`] when the new token cannot be persisted
    pub async fn authorize_interactively(&self) -> Result<String, AuthError> {
        let Some(interactive) = &self.interactive else {
            return Err(AuthError::NoValidToken);
        };

        let (code, verifier) = interactive.obtain_code().await?;
        let response = self.grant.exchange_code(&code, &verifier).await?;
        let record = TokenRecord::from_response(response, (self.clock)(), None);
        self.store.save(&record).await?;

        success!("Authorization successful!");
        Ok(record.access_token)
    }
}
