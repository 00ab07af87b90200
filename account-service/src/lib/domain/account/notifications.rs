use crate::domain::account::models::EmailAddress;
use crate::domain::notification::Notification;

/// Email carrying the account verification link.
pub fn verification_email(
    to: &EmailAddress,
    public_url: &str,
    token: &str,
    valid_minutes: i64,
) -> Notification {
    let link = format!(
        "{}/auth/verification?token={}",
        public_url.trim_end_matches('/'),
        token
    );

    Notification {
        to: to.as_str().to_string(),
        subject: "Verify your account".to_string(),
        html_body: format!(
            "<p>Welcome! Please confirm your email address by clicking the link below.</p>\
             <p><a href=\"{link}\">Verify account</a></p>\
             <p>This link is valid for {valid_minutes} minutes.</p>"
        ),
    }
}

/// Email carrying the password reset link.
pub fn password_reset_email(
    to: &EmailAddress,
    public_url: &str,
    token: &str,
    valid_minutes: i64,
) -> Notification {
    let link = format!(
        "{}/auth/reset-password?token={}",
        public_url.trim_end_matches('/'),
        token
    );

    Notification {
        to: to.as_str().to_string(),
        subject: "Reset your password".to_string(),
        html_body: format!(
            "<p>We received a request to reset your password.</p>\
             <p><a href=\"{link}\">Reset password</a></p>\
             <p>This link is valid for {valid_minutes} minutes. \
             If you did not request a reset, you can ignore this email.</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_email_embeds_link() {
        let to = EmailAddress::new("alice@x.com".to_string()).unwrap();
        let mail = verification_email(&to, "http://localhost:3000/", "abc.def.ghi", 10);

        assert_eq!(mail.to, "alice@x.com");
        assert!(mail
            .html_body
            .contains("http://localhost:3000/auth/verification?token=abc.def.ghi"));
        assert!(mail.html_body.contains("10 minutes"));
    }

    #[test]
    fn test_reset_email_embeds_link() {
        let to = EmailAddress::new("alice@x.com".to_string()).unwrap();
        let mail = password_reset_email(&to, "https://app.example.com", "tok", 30);

        assert!(mail
            .html_body
            .contains("https://app.example.com/auth/reset-password?token=tok"));
        assert!(mail.html_body.contains("30 minutes"));
    }
}
