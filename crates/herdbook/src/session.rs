//! Login session and page navigation state.

use std::fmt;

use database::User;
use thiserror::Error;

/// Pages a session can sit on. Mirrors the screens of the interactive shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Auth,
    Upload,
    Profile,
    Records,
}

impl Page {
    /// Parses a page name as typed in the shell.
    #[must_use]
    pub fn from_str(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "auth" => Some(Self::Auth),
            "upload" => Some(Self::Upload),
            "profile" => Some(Self::Profile),
            "records" => Some(Self::Records),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auth => "auth",
            Self::Upload => "upload",
            Self::Profile => "profile",
            Self::Records => "records",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("log in to open the {0} page")]
    LoginRequired(Page),
}

/// Tracks who is logged in and which page is showing.
///
/// All transitions go through the methods here; there is no other way to
/// change the current page.
pub struct Session {
    user: Option<User>,
    page: Page,
}

impl Session {
    /// Starts on the auth page with nobody logged in.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user: None,
            page: Page::Auth,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    /// Successful login lands on the upload page.
    pub fn login(&mut self, user: User) {
        self.user = Some(user);
        self.page = Page::Upload;
    }

    /// Anonymous entry: straight to upload with no user attached.
    pub fn skip(&mut self) {
        self.user = None;
        self.page = Page::Upload;
    }

    /// Clears the user and returns to the auth page.
    pub fn logout(&mut self) {
        self.user = None;
        self.page = Page::Auth;
    }

    /// Moves to `target` if the session is allowed there.
    ///
    /// Upload is open to everyone; profile and records need a logged-in
    /// user; navigating to auth is a logout.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::LoginRequired` when an anonymous session asks
    /// for the profile or records page.
    pub fn navigate(&mut self, target: Page) -> Result<(), SessionError> {
        match target {
            Page::Auth => {
                self.logout();
                Ok(())
            }
            Page::Upload => {
                self.page = Page::Upload;
                Ok(())
            }
            Page::Profile | Page::Records => {
                if self.user.is_none() {
                    return Err(SessionError::LoginRequired(target));
                }
                self.page = target;
                Ok(())
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 1,
            email: "farmer@example.com".to_string(),
            password_hash: "x".to_string(),
            name: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_new_session_is_anonymous_on_auth() {
        let session = Session::new();
        assert!(session.user().is_none());
        assert_eq!(session.page(), Page::Auth);
    }

    #[test]
    fn test_login_lands_on_upload() {
        let mut session = Session::new();
        session.login(test_user());
        assert_eq!(session.page(), Page::Upload);
        assert_eq!(session.user().map(|u| u.id), Some(1));
    }

    #[test]
    fn test_skip_enters_upload_without_user() {
        let mut session = Session::new();
        session.skip();
        assert_eq!(session.page(), Page::Upload);
        assert!(session.user().is_none());
    }

    #[test]
    fn test_logout_clears_user_and_returns_to_auth() {
        let mut session = Session::new();
        session.login(test_user());
        session.logout();
        assert!(session.user().is_none());
        assert_eq!(session.page(), Page::Auth);
    }

    #[test]
    fn test_protected_pages_require_login() {
        let mut session = Session::new();
        session.skip();

        assert_eq!(
            session.navigate(Page::Records),
            Err(SessionError::LoginRequired(Page::Records))
        );
        assert_eq!(
            session.navigate(Page::Profile),
            Err(SessionError::LoginRequired(Page::Profile))
        );
        assert_eq!(session.page(), Page::Upload);
    }

    #[test]
    fn test_logged_in_session_reaches_protected_pages() {
        let mut session = Session::new();
        session.login(test_user());

        assert_eq!(session.navigate(Page::Records), Ok(()));
        assert_eq!(session.page(), Page::Records);

        assert_eq!(session.navigate(Page::Profile), Ok(()));
        assert_eq!(session.page(), Page::Profile);
    }

    #[test]
    fn test_navigating_to_auth_logs_out() {
        let mut session = Session::new();
        session.login(test_user());

        assert_eq!(session.navigate(Page::Auth), Ok(()));
        assert!(session.user().is_none());
        assert_eq!(session.page(), Page::Auth);
    }

    #[test]
    fn test_page_names_round_trip() {
        for page in [Page::Auth, Page::Upload, Page::Profile, Page::Records] {
            assert_eq!(Page::from_str(&page.to_string()), Some(page));
        }
        assert_eq!(Page::from_str("UPLOAD"), Some(Page::Upload));
        assert_eq!(Page::from_str("dashboard"), None);
    }
}
