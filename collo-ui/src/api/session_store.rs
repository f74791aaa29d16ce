//! Session persistence
//!
//! The signed-in session lives in local storage so it survives reloads.
//! An entry that no longer parses counts as no session. An expired entry
//! is kept only while its refresh token can still renew it.

use collo::Session;

const SESSION_KEY: &str = "collo_session";

/// Renew this many seconds before the access token runs out
pub const REFRESH_MARGIN_SECS: i64 = 60;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// What a stored entry is good for at a given instant
#[derive(Debug, Clone, PartialEq)]
enum Stored {
    Live(Session),
    /// Expired, but the refresh token may still renew it
    Renewable(Session),
    Unusable,
}

fn classify(raw: &str, now: chrono::DateTime<chrono::Utc>) -> Stored {
    let session: Session = match serde_json::from_str(raw) {
        Ok(session) => session,
        Err(_) => return Stored::Unusable,
    };
    if session.access_token.is_empty() {
        Stored::Unusable
    } else if !session.is_expired_at(now) {
        Stored::Live(session)
    } else if session.refresh_token.is_some() {
        Stored::Renewable(session)
    } else {
        Stored::Unusable
    }
}

fn read_stored() -> Option<Stored> {
    let storage = storage()?;
    let raw = storage.get_item(SESSION_KEY).ok()??;
    let stored = classify(&raw, chrono::Utc::now());
    if stored == Stored::Unusable {
        let _ = storage.remove_item(SESSION_KEY);
    }
    Some(stored)
}

/// Read the stored session if its access token is still live
pub fn load_session() -> Option<Session> {
    match read_stored()? {
        Stored::Live(session) => Some(session),
        Stored::Renewable(_) | Stored::Unusable => None,
    }
}

/// Stored session whose token is expired or about to be, if it can be renewed
pub fn session_due_for_refresh() -> Option<Session> {
    match read_stored()? {
        Stored::Live(session) | Stored::Renewable(session)
            if needs_refresh(&session, chrono::Utc::now()) =>
        {
            Some(session)
        }
        _ => None,
    }
}

/// Whether `session` should be renewed at `now`
pub fn needs_refresh(session: &Session, now: chrono::DateTime<chrono::Utc>) -> bool {
    session.refresh_token.is_some()
        && session
            .expires_at
            .map(|exp| exp - now.timestamp() <= REFRESH_MARGIN_SECS)
            .unwrap_or(false)
}

pub fn store_session(session: &Session) {
    let Some(storage) = storage() else {
        return;
    };
    match serde_json::to_string(session) {
        Ok(json) => {
            let _ = storage.set_item(SESSION_KEY, &json);
        }
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to store session: {}", e).into());
        }
    }
}

pub fn clear_session() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(SESSION_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "8a1f6c2e-0000-4000-8000-000000000001";

    fn entry(expires_at: i64, refresh_token: Option<&str>) -> String {
        serde_json::json!({
            "access_token": "abc",
            "refresh_token": refresh_token,
            "expires_at": expires_at,
            "user": { "id": USER }
        })
        .to_string()
    }

    #[test]
    fn test_live_session() {
        match classify(&entry(4102444800, None), chrono::Utc::now()) {
            Stored::Live(session) => {
                assert_eq!(session.access_token, "abc");
                assert_eq!(session.user_id().to_string(), USER);
            }
            other => panic!("expected a live session, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_session_without_refresh_is_dropped() {
        assert_eq!(classify(&entry(1, None), chrono::Utc::now()), Stored::Unusable);
    }

    #[test]
    fn test_expired_session_with_refresh_is_kept() {
        assert!(matches!(
            classify(&entry(1, Some("def")), chrono::Utc::now()),
            Stored::Renewable(_)
        ));
    }

    #[test]
    fn test_garbage_is_dropped() {
        let now = chrono::Utc::now();
        assert_eq!(classify("not json", now), Stored::Unusable);
        let raw = format!(r#"{{"access_token":"","user":{{"id":"{}"}}}}"#, USER);
        assert_eq!(classify(&raw, now), Stored::Unusable);
    }

    #[test]
    fn test_refresh_due_near_expiry() {
        let now = chrono::Utc::now();
        let session = |expires_in: i64, refresh: Option<&str>| -> Session {
            serde_json::from_str(&entry(now.timestamp() + expires_in, refresh)).unwrap()
        };

        assert!(needs_refresh(&session(30, Some("def")), now));
        assert!(needs_refresh(&session(-600, Some("def")), now));
        assert!(!needs_refresh(&session(3600, Some("def")), now));
        assert!(!needs_refresh(&session(30, None), now));
    }
}
