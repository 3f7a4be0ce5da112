//! Contact form relay: validates a submission, reads the SMTP settings from the
//! environment and hands the composed mail to a [`Mailer`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::server::AppState;

pub const MISSING_FIELDS_MESSAGE: &str = "필수 항목이 누락되었습니다.";
pub const MAIL_CONFIG_MESSAGE: &str = "메일 서버 환경변수가 설정되지 않았습니다.";
pub const SEND_FAILED_MESSAGE: &str = "메일 전송 중 오류가 발생했습니다.";

const FROM_NAME: &str = "NAIN STUDIO 웹 문의";
const ANONYMOUS: &str = "무명";
const DEFAULT_PORT: u16 = 465;

/// A form submission. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl ContactPayload {
    /// Missing or malformed bodies become an empty submission.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    fn email(&self) -> &str {
        non_empty(&self.email).unwrap_or_default()
    }

    fn message(&self) -> &str {
        non_empty(&self.message).unwrap_or_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("email and message are required")]
    MissingFields,

    #[error("mail settings incomplete: {0}")]
    Config(String),

    #[error("mail relay failed: {0}")]
    Relay(#[source] anyhow::Error),
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            ContactError::MissingFields => StatusCode::BAD_REQUEST,
            ContactError::Config(_) | ContactError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the submitter gets to see.
    pub fn public_message(&self) -> &'static str {
        match self {
            ContactError::MissingFields => MISSING_FIELDS_MESSAGE,
            ContactError::Config(_) => MAIL_CONFIG_MESSAGE,
            ContactError::Relay(_) => SEND_FAILED_MESSAGE,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}

/// SMTP connection settings taken from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise.
    pub secure: bool,
    pub user: String,
    pub password: String,
    pub to: String,
}

impl SmtpSettings {
    pub fn from_env() -> Result<Self, ContactError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContactError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match get("SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ContactError::Config(format!("SMTP_PORT is not a port: {}", raw)))?,
            None => DEFAULT_PORT,
        };
        let secure = lookup("SMTP_SECURE").as_deref() != Some("false");

        let host = get("SMTP_HOST");
        let user = get("SMTP_USER");
        let password = get("SMTP_PASS");
        let to = get("TO_EMAIL").or_else(|| user.clone());

        let missing: Vec<&str> = [
            ("SMTP_HOST", host.is_none()),
            ("SMTP_USER", user.is_none()),
            ("SMTP_PASS", password.is_none()),
            ("TO_EMAIL", to.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        match (host, user, password, to) {
            (Some(host), Some(user), Some(password), Some(to)) => Ok(Self {
                host,
                port,
                secure,
                user,
                password,
                to,
            }),
            _ => Err(ContactError::Config(format!("missing {}", missing.join(", ")))),
        }
    }
}

/// A composed message, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl OutgoingMail {
    pub fn compose(payload: &ContactPayload, settings: &SmtpSettings) -> Self {
        let name = non_empty(&payload.name);
        let email = payload.email();
        let phone = non_empty(&payload.phone);
        let message = payload.message();

        let text = format!(
            "이름: {}\n이메일: {}\n연락처: {}\n\n메시지:\n{}",
            name.unwrap_or("-"),
            email,
            phone.unwrap_or("-"),
            message
        );
        let html = format!(
            concat!(
                "<div style=\"font-size:14px;line-height:1.7\">",
                "<p><b>이름:</b> {}</p>",
                "<p><b>이메일:</b> {}</p>",
                "<p><b>연락처:</b> {}</p>",
                "<hr/>",
                "<pre style=\"white-space:pre-wrap\">{}</pre>",
                "</div>"
            ),
            escape_html(name.unwrap_or("-")),
            escape_html(email),
            escape_html(phone.unwrap_or("-")),
            escape_html(message)
        );

        Self {
            from_name: FROM_NAME.to_string(),
            from_address: settings.user.clone(),
            to: settings.to.clone(),
            reply_to: is_plausible_email(email).then(|| email.to_string()),
            subject: format!("[NAIN STUDIO] 새 문의: {}", name.unwrap_or(ANONYMOUS)),
            text,
            html,
        }
    }
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a dot inside the domain,
/// and an address the mail builder accepts as a header value.
pub fn is_plausible_email(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let dotted = match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    };
    dotted && address.parse::<lettre::message::Mailbox>().is_ok()
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// An outgoing mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Check the connection and credentials before sending.
    async fn verify(&self) -> anyhow::Result<()>;

    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()>;
}

/// Opens a [`Mailer`] for one request's settings.
pub trait MailerFactory: Send + Sync {
    fn connect(&self, settings: &SmtpSettings) -> anyhow::Result<Box<dyn Mailer>>;
}

pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Validate, compose and deliver one submission.
pub async fn relay(
    payload: &ContactPayload,
    env: &EnvLookup,
    factory: &dyn MailerFactory,
) -> Result<(), ContactError> {
    if payload.email().is_empty() || payload.message().is_empty() {
        return Err(ContactError::MissingFields);
    }

    let settings = SmtpSettings::from_lookup(|key| env(key))?;
    let mail = OutgoingMail::compose(payload, &settings);

    let mailer = factory.connect(&settings).map_err(ContactError::Relay)?;
    mailer.verify().await.map_err(ContactError::Relay)?;
    mailer.send(&mail).await.map_err(ContactError::Relay)?;

    tracing::info!(to = %mail.to, reply_to = ?mail.reply_to, "contact submission relayed");
    Ok(())
}

pub async fn handle_contact(State(state): State<AppState>, body: Bytes) -> Response {
    let payload = ContactPayload::from_body(&body);
    match relay(&payload, &state.env, state.mailer.as_ref()).await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            match &err {
                ContactError::MissingFields => {
                    tracing::debug!("contact submission rejected: missing fields")
                }
                ContactError::Config(detail) => {
                    tracing::error!("contact relay not configured: {}", detail)
                }
                ContactError::Relay(source) => {
                    tracing::error!("contact relay failed: {:#}", source)
                }
            }
            err.into_response()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Records every call instead of talking to a server.
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub connects: Mutex<Vec<SmtpSettings>>,
        pub sent: Arc<Mutex<Vec<OutgoingMail>>>,
        pub fail_verify: bool,
    }

    struct Connection {
        sent: Arc<Mutex<Vec<OutgoingMail>>>,
        fail_verify: bool,
    }

    #[async_trait]
    impl Mailer for Connection {
        async fn verify(&self) -> anyhow::Result<()> {
            if self.fail_verify {
                anyhow::bail!("535 authentication failed");
            }
            Ok(())
        }

        async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    impl MailerFactory for RecordingMailer {
        fn connect(&self, settings: &SmtpSettings) -> anyhow::Result<Box<dyn Mailer>> {
            self.connects.lock().unwrap().push(settings.clone());
            Ok(Box::new(Connection {
                sent: self.sent.clone(),
                fail_verify: self.fail_verify,
            }))
        }
    }

    pub(crate) fn env_of(pairs: &[(&str, &str)]) -> EnvLookup {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(move |key: &str| map.get(key).cloned())
    }

    pub(crate) fn full_env() -> EnvLookup {
        env_of(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "studio@example.com"),
            ("SMTP_PASS", "secret"),
        ])
    }

    fn payload(email: &str, message: &str) -> ContactPayload {
        ContactPayload {
            email: Some(email.to_string()),
            message: Some(message.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_malformed_body_is_empty() {
        let payload = ContactPayload::from_body(b"{not json");
        assert!(payload.email.is_none());
        assert!(ContactPayload::from_body(b"").message.is_none());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = SmtpSettings::from_lookup(|k| full_env()(k)).unwrap();
        assert_eq!(settings.port, 465);
        assert!(settings.secure);
        assert_eq!(settings.to, "studio@example.com");
    }

    #[test]
    fn test_settings_overrides() {
        let env = env_of(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("SMTP_SECURE", "false"),
            ("SMTP_USER", "studio@example.com"),
            ("SMTP_PASS", "secret"),
            ("TO_EMAIL", "inbox@example.com"),
        ]);
        let settings = SmtpSettings::from_lookup(|k| env(k)).unwrap();
        assert_eq!(settings.port, 587);
        assert!(!settings.secure);
        assert_eq!(settings.to, "inbox@example.com");
    }

    #[test]
    fn test_only_literal_false_disables_tls() {
        for value in ["FALSE", "0", "no", ""] {
            let env = env_of(&[
                ("SMTP_HOST", "h"),
                ("SMTP_USER", "u@example.com"),
                ("SMTP_PASS", "p"),
                ("SMTP_SECURE", value),
            ]);
            assert!(SmtpSettings::from_lookup(|k| env(k)).unwrap().secure, "{value}");
        }
    }

    #[test]
    fn test_settings_missing_variable() {
        let env = env_of(&[("SMTP_HOST", "h"), ("SMTP_USER", "u@example.com")]);
        let err = SmtpSettings::from_lookup(|k| env(k)).unwrap_err();
        assert!(matches!(&err, ContactError::Config(d) if d.contains("SMTP_PASS")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let env = env_of(&[("SMTP_HOST", "h"), ("SMTP_USER", "u"), ("SMTP_PASS", "p"), ("SMTP_PORT", "smtp")]);
        assert!(matches!(
            SmtpSettings::from_lookup(|k| env(k)),
            Err(ContactError::Config(_))
        ));
    }

    #[test]
    fn test_plausible_email() {
        assert!(is_plausible_email("a@b.com"));
        assert!(is_plausible_email("first.last@mail.example.kr"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("a b@c.com"));
        assert!(!is_plausible_email("a@@b.com"));
        assert!(!is_plausible_email("@b.com"));
        assert!(!is_plausible_email("a@.com"));
        assert!(!is_plausible_email("a@b."));
        for header_breaking in ["a,b@c.com", "a<b@c.com", "a\"b@c.com", "a..b@c.com"] {
            assert!(!is_plausible_email(header_breaking), "{header_breaking}");
        }
    }

    #[tokio::test]
    async fn test_unusable_reply_address_still_delivers() {
        let mailer = RecordingMailer::default();
        relay(&payload("a,b@c.com", "hi"), &full_env(), &mailer)
            .await
            .unwrap();
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, None);
        assert!(sent[0].text.contains("a,b@c.com"));
        crate::smtp::build_message(&sent[0]).unwrap();
    }

    #[test]
    fn test_compose_escapes_html() {
        let settings = SmtpSettings::from_lookup(|k| full_env()(k)).unwrap();
        let mut submission = payload("not-an-address", "<script>x</script> & more");
        submission.name = Some("Kim \"K\"".to_string());
        let mail = OutgoingMail::compose(&submission, &settings);

        assert_eq!(mail.subject, "[NAIN STUDIO] 새 문의: Kim \"K\"");
        assert_eq!(mail.reply_to, None);
        assert!(mail.html.contains("&lt;script&gt;x&lt;/script&gt; &amp; more"));
        assert!(mail.html.contains("Kim &quot;K&quot;"));
        assert!(mail.text.contains("<script>x</script>"));
        assert!(mail.text.contains("연락처: -"));
    }

    #[test]
    fn test_compose_anonymous_subject() {
        let settings = SmtpSettings::from_lookup(|k| full_env()(k)).unwrap();
        let mail = OutgoingMail::compose(&payload("a@b.com", "hi"), &settings);
        assert_eq!(mail.subject, "[NAIN STUDIO] 새 문의: 무명");
        assert_eq!(mail.from_name, "NAIN STUDIO 웹 문의");
        assert_eq!(mail.from_address, "studio@example.com");
        assert_eq!(mail.reply_to.as_deref(), Some("a@b.com"));
    }

    #[tokio::test]
    async fn test_missing_fields_never_connect() {
        let mailer = RecordingMailer::default();
        let err = relay(&payload("", "hi"), &full_env(), &mailer)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(mailer.connects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_failure_is_generic() {
        let mailer = RecordingMailer {
            fail_verify: true,
            ..Default::default()
        };
        let err = relay(&payload("a@b.com", "hi"), &full_env(), &mailer)
            .await
            .unwrap_err();
        assert_eq!(err.public_message(), SEND_FAILED_MESSAGE);
        assert!(mailer.sent.lock().unwrap().is_empty());
    }
}
