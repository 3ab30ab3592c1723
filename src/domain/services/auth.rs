#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::fs;
use std::path;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AppError;
use crate::domain::models::AuthState;
use crate::domain::models::User;
use crate::domain::models::UserRole;

#[derive(Debug, Serialize)]
struct LoginRequest {
    email: String,
    password: String,
}

// The login endpoint replies with a bare payload, unlike the rest of the API.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
    token: String,
}

#[derive(Debug, Deserialize)]
struct MeData {
    user: User,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    success: bool,
    data: Option<MeData>,
    #[serde(default)]
    error: Option<String>,
}

/// Bearer token persisted across runs so a restart does not force a fresh
/// login.
pub struct TokenStore {
    file_path: path::PathBuf,
}

impl Default for TokenStore {
    fn default() -> TokenStore {
        let mut file_path = Config::get(ConfigKey::TokenFile);
        if file_path.is_empty() {
            file_path = dirs::data_dir()
                .unwrap()
                .join("maildeck/auth_token")
                .to_string_lossy()
                .to_string();
        }

        return TokenStore {
            file_path: path::PathBuf::from(file_path),
        };
    }
}

impl TokenStore {
    pub fn new(file_path: path::PathBuf) -> TokenStore {
        return TokenStore { file_path };
    }

    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.file_path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        return Some(token.to_string());
    }

    pub fn save(&self, token: &str) -> Result<(), AppError> {
        let persist = |err: std::io::Error| return AppError::Persistence(err.to_string());

        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(persist)?;
            }
        }
        fs::write(&self.file_path, token).map_err(persist)?;

        return Ok(());
    }

    /// Clearing an absent token is not an error.
    pub fn clear(&self) -> Result<(), AppError> {
        if !self.file_path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.file_path)
            .map_err(|err| return AppError::Persistence(err.to_string()))?;

        return Ok(());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&AuthState) + Send>;

/// Single source of truth for who is signed in. Every state transition is
/// pushed to all subscribers, so the UI never polls. Responses that land
/// after a newer login or logout has started are discarded.
pub struct AuthService {
    url: String,
    timeout: String,
    tokens: TokenStore,
    state: AuthState,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
    epoch: u64,
}

impl Default for AuthService {
    fn default() -> AuthService {
        return AuthService {
            url: Config::get(ConfigKey::ApiUrl),
            timeout: Config::get(ConfigKey::RequestTimeout),
            tokens: TokenStore::default(),
            state: AuthState::default(),
            listeners: vec![],
            next_listener: 0,
            epoch: 0,
        };
    }
}

impl AuthService {
    pub fn state(&self) -> &AuthState {
        return &self.state;
    }

    pub fn token(&self) -> Option<String> {
        return self.tokens.load();
    }

    /// Registers a listener that fires on every state change. The returned id
    /// unsubscribes it again.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, listener));

        return SubscriptionId(id);
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| return *listener_id != id.0);
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    fn set_state(&mut self, state: AuthState) {
        self.state = state;
        self.notify();
    }

    fn request_timeout(&self) -> Duration {
        return Duration::from_millis(self.timeout.parse::<u64>().unwrap_or(30000));
    }

    /// Restores the session from the stored token. Without a token this
    /// resolves to signed-out immediately and makes no network call. With
    /// one, the token is verified against the API; any failure clears it.
    pub async fn check_auth_status(&mut self) {
        let Some(token) = self.tokens.load() else {
            self.set_state(AuthState::default());
            return;
        };

        self.set_state(AuthState {
            loading: true,
            ..self.state.clone()
        });

        let epoch = self.epoch;
        let res = reqwest::Client::new()
            .get(format!("{url}/api/users/me", url = self.url))
            .bearer_auth(&token)
            .timeout(self.request_timeout())
            .send()
            .await;
        if epoch != self.epoch {
            return;
        }

        let user = match res {
            Ok(res) if res.status().is_success() => match res.json::<MeResponse>().await {
                Ok(body) if body.success => body.data.map(|data| return data.user),
                Ok(body) => {
                    tracing::warn!(error = ?body.error, "Session check rejected");
                    None
                }
                Err(err) => {
                    tracing::warn!(error = ?err, "Malformed session check response");
                    None
                }
            },
            Ok(res) => {
                tracing::warn!(status = res.status().as_u16(), "Session check failed");
                None
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Session check failed");
                None
            }
        };

        if epoch != self.epoch {
            return;
        }

        if user.is_none() {
            if let Err(err) = self.tokens.clear() {
                tracing::warn!(error = ?err, "Failed to clear stale token");
            }
        }

        self.set_state(AuthState {
            user,
            loading: false,
            error: None,
        });
    }

    /// Signs in with email and password. Only administrators get a session:
    /// for any other role the credentials may be valid, but no token is
    /// stored and the state carries an authorization error instead. Returns
    /// whether a session was established.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.epoch += 1;
        self.set_state(AuthState {
            user: None,
            loading: true,
            error: None,
        });

        let res = reqwest::Client::new()
            .post(format!("{url}/api/users/login", url = self.url))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .timeout(self.request_timeout())
            .send()
            .await;

        let res = match res {
            Ok(res) if res.status().is_success() => res.json::<LoginResponse>().await,
            Ok(res) => {
                tracing::warn!(status = res.status().as_u16(), "Login rejected");
                self.set_state(AuthState {
                    user: None,
                    loading: false,
                    error: Some("Invalid email or password".to_string()),
                });
                return false;
            }
            Err(err) => {
                self.set_state(AuthState {
                    user: None,
                    loading: false,
                    error: Some(format!("Network error: {err}")),
                });
                return false;
            }
        };

        let body = match res {
            Ok(body) => body,
            Err(err) => {
                self.set_state(AuthState {
                    user: None,
                    loading: false,
                    error: Some(format!("Network error: {err}")),
                });
                return false;
            }
        };

        if body.user.role != UserRole::Admin {
            self.set_state(AuthState {
                user: None,
                loading: false,
                error: Some("Administrator access is required".to_string()),
            });
            return false;
        }

        if let Err(err) = self.tokens.save(&body.token) {
            tracing::warn!(error = ?err, "Failed to persist session token");
        }
        self.set_state(AuthState {
            user: Some(body.user),
            loading: false,
            error: None,
        });

        return true;
    }

    /// Ends the session. The server is told on a best-effort basis; local
    /// state and the stored token are cleared regardless of whether it
    /// answered.
    pub async fn logout(&mut self) {
        self.epoch += 1;

        if let Some(token) = self.tokens.load() {
            let res = reqwest::Client::new()
                .post(format!("{url}/api/users/logout", url = self.url))
                .bearer_auth(token)
                .timeout(self.request_timeout())
                .send()
                .await;
            if let Err(err) = res {
                tracing::warn!(error = ?err, "Logout request failed, clearing session anyway");
            }
        }

        if let Err(err) = self.tokens.clear() {
            tracing::warn!(error = ?err, "Failed to clear session token");
        }
        self.set_state(AuthState::default());
    }
}
