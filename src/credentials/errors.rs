//local shortcuts

//third-party shortcuts

//standard shortcuts


//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted by [`CredentialStore::authenticate()`](crate::CredentialStore::authenticate).
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AuthError
{
    /// Unknown username or wrong password.
    InvalidCredentials,
    /// The store could not answer.
    Unavailable(String),
}

impl std::fmt::Display for AuthError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "AuthError::");
        match self
        {
            AuthError::InvalidCredentials  => write!(f, "InvalidCredentials"),
            AuthError::Unavailable(reason) => write!(f, "Unavailable({})", reason),
        }
    }
}
impl std::error::Error for AuthError {}

//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted by [`CredentialStore::register()`](crate::CredentialStore::register).
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RegisterError
{
    /// An account with the username already exists.
    UsernameTaken,
    /// The store could not complete the registration.
    Unavailable(String),
}

impl std::fmt::Display for RegisterError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "RegisterError::");
        match self
        {
            RegisterError::UsernameTaken       => write!(f, "UsernameTaken"),
            RegisterError::Unavailable(reason) => write!(f, "Unavailable({})", reason),
        }
    }
}
impl std::error::Error for RegisterError {}

//-------------------------------------------------------------------------------------------------------------------

/// Errors emitted by [`CredentialStore::log_chat()`](crate::CredentialStore::log_chat).
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StoreError
{
    Unavailable(String),
}

impl std::fmt::Display for StoreError
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let _ = write!(f, "StoreError::");
        match self
        {
            StoreError::Unavailable(reason) => write!(f, "Unavailable({})", reason),
        }
    }
}
impl std::error::Error for StoreError {}

//-------------------------------------------------------------------------------------------------------------------
