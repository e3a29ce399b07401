//! Tenant resolution.
//!
//! The owning secretariat id is looked up from an ordered chain of sources:
//! the signed-in user, the persisted session store, then the claims of the
//! session token. The first source yielding a usable id wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use serde_json::Value;
use tracing::{debug, warn};

use secretaria_core::{SecretariatId, SessionError};

use crate::config::SessionSection;
use crate::error::{ClientError, ClientResult};

/// Store key holding the selected secretariat id.
pub const TENANT_STORAGE_KEY: &str = "secretaria_id";

/// One place a tenant id may come from.
pub trait TenantSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// The id this source currently holds, if any.
    fn resolve(&self) -> Option<SecretariatId>;
}

/// Parse a raw candidate, logging ids that are present but unusable.
fn usable(source: &'static str, raw: &str) -> Option<SecretariatId> {
    match SecretariatId::parse(raw) {
        Ok(id) => Some(id),
        Err(err) => {
            debug!(source, error = %err, "ignoring unusable tenant id");
            None
        }
    }
}

// ============================================================================
// SIGNED-IN USER
// ============================================================================

/// Id of the authenticated user. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct SessionUserSource {
    user_id: Arc<RwLock<Option<String>>>,
}

impl SessionUserSource {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id: Arc::new(RwLock::new(user_id)),
        }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        *self.user_id.write().unwrap_or_else(|e| e.into_inner()) = Some(user_id.into());
    }

    pub fn sign_out(&self) {
        *self.user_id.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_id.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl TenantSource for SessionUserSource {
    fn name(&self) -> &'static str {
        "session_user"
    }

    fn resolve(&self) -> Option<SecretariatId> {
        self.user_id().and_then(|raw| usable(self.name(), &raw))
    }
}

// ============================================================================
// PERSISTED STORE
// ============================================================================

/// String key/value pairs persisted as a JSON object.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ClientResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(storage_error)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(storage_error)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(storage_error)?;
        }
        let contents = serde_json::to_string_pretty(entries).map_err(storage_error)?;
        std::fs::write(&self.path, contents).map_err(storage_error)
    }

    pub fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    /// Remove `key`. Returns whether it was present.
    pub fn remove(&self, key: &str) -> ClientResult<bool> {
        let mut entries = self.load()?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    pub fn tenant(&self) -> ClientResult<Option<SecretariatId>> {
        Ok(self
            .get(TENANT_STORAGE_KEY)?
            .and_then(|raw| usable("stored", &raw)))
    }

    pub fn set_tenant(&self, tenant: &SecretariatId) -> ClientResult<()> {
        self.set(TENANT_STORAGE_KEY, tenant.as_str())
    }

    pub fn clear_tenant(&self) -> ClientResult<bool> {
        self.remove(TENANT_STORAGE_KEY)
    }
}

fn storage_error(err: impl std::fmt::Display) -> ClientError {
    ClientError::Storage(err.to_string())
}

/// Reads `secretaria_id` from a [`SessionStore`]. Store failures count as absent.
#[derive(Debug, Clone)]
pub struct StoredTenantSource {
    store: SessionStore,
}

impl StoredTenantSource {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

impl TenantSource for StoredTenantSource {
    fn name(&self) -> &'static str {
        "stored"
    }

    fn resolve(&self) -> Option<SecretariatId> {
        match self.store.tenant() {
            Ok(tenant) => tenant,
            Err(err) => {
                warn!(path = %self.store.path().display(), error = %err, "session store unreadable");
                None
            }
        }
    }
}

// ============================================================================
// TOKEN CLAIMS
// ============================================================================

/// Reads `sub` (then `id`) from the session token payload.
///
/// The signature is not verified; the id only selects which secretariat's
/// data to request, and the backend authorises every call on its own.
#[derive(Debug, Clone)]
pub struct TokenClaimsSource {
    token: Option<String>,
    cookie_header: Option<String>,
    cookie_name: String,
}

impl TokenClaimsSource {
    pub fn new(
        token: Option<String>,
        cookie_header: Option<String>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            token,
            cookie_header,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn from_config(session: &SessionSection) -> Self {
        Self::new(
            session.token.clone(),
            session.cookie_header.clone(),
            session.token_cookie_name.clone(),
        )
    }

    fn raw_token(&self) -> Option<&str> {
        let explicit = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty());
        explicit.or_else(|| {
            self.cookie_header
                .as_deref()
                .and_then(|header| cookie_value(header, &self.cookie_name))
        })
    }
}

impl TenantSource for TokenClaimsSource {
    fn name(&self) -> &'static str {
        "token_claims"
    }

    fn resolve(&self) -> Option<SecretariatId> {
        let token = self.raw_token()?;
        match decode_claims(token) {
            Ok(claims) => {
                let raw = claim_id(&claims)?;
                usable(self.name(), &raw)
            }
            Err(reason) => {
                warn!(reason = %reason, "failed to decode session token");
                None
            }
        }
    }
}

/// Value of cookie `name` in a `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Decode the payload segment of a JWT without verifying it.
pub fn decode_claims(token: &str) -> Result<Value, String> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| "token has no payload segment".to_string())?;
    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| format!("invalid base64 payload: {}", e))?;
    serde_json::from_slice(&bytes).map_err(|e| format!("invalid JSON payload: {}", e))
}

/// `sub`, falling back to `id`. Numeric ids are accepted.
fn claim_id(claims: &Value) -> Option<String> {
    ["sub", "id"].iter().find_map(|field| match claims.get(*field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Ordered chain of [`TenantSource`]s.
#[derive(Default)]
pub struct TenantResolver {
    sources: Vec<Box<dyn TenantSource>>,
}

impl std::fmt::Debug for TenantResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantResolver")
            .field("sources", &self.source_names())
            .finish()
    }
}

impl TenantResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl TenantSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// The standard chain: signed-in user, stored id, token claims.
    pub fn from_config(session: &SessionSection, user: SessionUserSource) -> Self {
        Self::new()
            .with_source(user)
            .with_source(StoredTenantSource::new(SessionStore::new(
                session.storage_path.clone(),
            )))
            .with_source(TokenClaimsSource::from_config(session))
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self) -> Result<SecretariatId, SessionError> {
        for source in &self.sources {
            if let Some(tenant) = source.resolve() {
                debug!(source = source.name(), tenant = %tenant, "tenant resolved");
                return Ok(tenant);
            }
            debug!(source = source.name(), "tenant source empty, falling back");
        }
        warn!("no tenant id available from any source");
        Err(SessionError::MissingTenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_cookie_value() {
        let header = "theme=dark; nextauth.token=abc.def.ghi ; other=1";
        assert_eq!(cookie_value(header, "nextauth.token"), Some("abc.def.ghi"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("nextauth.token=", "nextauth.token"), None);
    }

    #[test]
    fn test_claims_prefer_sub_then_id() {
        let both = decode_claims(&token_with(r#"{"sub":"sec-1","id":"x"}"#)).unwrap();
        assert_eq!(claim_id(&both).as_deref(), Some("sec-1"));

        let only_id = decode_claims(&token_with(r#"{"id":42}"#)).unwrap();
        assert_eq!(claim_id(&only_id).as_deref(), Some("42"));

        let none = decode_claims(&token_with(r#"{"name":"Ana"}"#)).unwrap();
        assert_eq!(claim_id(&none), None);
    }

    #[test]
    fn test_malformed_token_is_absent() {
        let source = TokenClaimsSource::new(Some("not-a-jwt".into()), None, "nextauth.token");
        assert_eq!(source.resolve(), None);

        let source = TokenClaimsSource::new(Some("a.!!!.c".into()), None, "nextauth.token");
        assert_eq!(source.resolve(), None);
    }

    #[test]
    fn test_token_read_from_cookie_header() {
        let header = format!("nextauth.token={}", token_with(r#"{"sub":"sec-7"}"#));
        let source = TokenClaimsSource::new(None, Some(header), "nextauth.token");
        assert_eq!(source.resolve().unwrap().as_str(), "sec-7");
    }

    #[test]
    fn test_user_source_rejects_placeholders() {
        let user = SessionUserSource::new(Some("undefined".into()));
        assert_eq!(user.resolve(), None);
        user.sign_in("sec-2");
        assert_eq!(user.resolve().unwrap().as_str(), "sec-2");
        user.sign_out();
        assert_eq!(user.resolve(), None);
    }

    #[test]
    fn test_store_roundtrip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.tenant().unwrap(), None);
        assert!(!store.clear_tenant().unwrap());

        store.set_tenant(&SecretariatId::parse("sec-3").unwrap()).unwrap();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.tenant().unwrap().unwrap().as_str(), "sec-3");
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

        assert!(store.clear_tenant().unwrap());
        assert_eq!(store.tenant().unwrap(), None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_store_is_absent_for_resolver() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::new(&path);
        assert!(matches!(store.tenant(), Err(ClientError::Storage(_))));
        assert_eq!(StoredTenantSource::new(store).resolve(), None);
    }
}
