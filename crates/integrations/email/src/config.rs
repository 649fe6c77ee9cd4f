use tracing::warn;

const DEFAULT_SERVER: &str = "smtp.gmail.com";
const DEFAULT_PORT: u16 = 587;

/// SMTP settings, read from the environment.
///
/// `EMAIL_USER` and `EMAIL_PASSWORD` are required; without both the mail
/// channel is considered disabled. The sender defaults to the user and the
/// admin recipient is optional.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
    pub admin_email: Option<String>,
}

impl MailConfig {
    /// Read the configuration from process environment variables. Returns
    /// `None` when the credentials are absent.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let user = lookup("EMAIL_USER").filter(|v| !v.is_empty())?;
        let password = lookup("EMAIL_PASSWORD").filter(|v| !v.is_empty())?;

        let server = lookup("SMTP_SERVER")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER.to_owned());
        let port = match lookup("SMTP_PORT").filter(|v| !v.is_empty()) {
            Some(raw) => match raw.parse() {
                Ok(port) => port,
                Err(_) => {
                    warn!(value = %raw, "SMTP_PORT no es un puerto válido, usando 587");
                    DEFAULT_PORT
                }
            },
            None => DEFAULT_PORT,
        };
        let from = lookup("EMAIL_FROM")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| user.clone());
        let admin_email = lookup("ADMIN_EMAIL").filter(|v| !v.is_empty());

        Some(Self {
            server,
            port,
            user,
            password,
            from,
            admin_email,
        })
    }
}
