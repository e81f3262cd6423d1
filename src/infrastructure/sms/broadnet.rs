use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::info;
use url::form_urlencoded;

use crate::{application::usercases::message_queue::SmsSender, config::config_model::Sms};

const REQUEST_TIMEOUT_SECS: u64 = 30;

const MESSAGE_TYPE_LATIN: &str = "1";
const MESSAGE_TYPE_UNICODE: &str = "4";

/// HTTP client for the Broadnet SMS gateway. The gateway takes every field
/// as a query parameter on a GET request and reports failures in the
/// response body rather than the status code.
pub struct BroadnetClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    pass: String,
    sid: String,
}

impl BroadnetClient {
    pub fn new(config: &Sms) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: config.gateway_base_url.clone(),
            user: config.gateway_user.clone(),
            pass: config.gateway_pass.clone(),
            sid: config.gateway_sid.clone(),
        })
    }

    pub async fn send(&self, phones: &[String], text: &str) -> Result<String> {
        let url = build_dispatch_url(
            &self.base_url,
            &self.user,
            &self.pass,
            &self.sid,
            phones,
            text,
        );

        info!(recipients = phones.len(), "dispatching sms batch");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow!("sms gateway returned http {}: {}", status, body));
        }
        if body.trim_start().starts_with("ERROR") {
            return Err(anyhow!("sms gateway rejected the batch: {}", body));
        }

        Ok(body)
    }
}

#[async_trait]
impl SmsSender for BroadnetClient {
    async fn send(&self, phones: Vec<String>, text: String) -> Result<String> {
        BroadnetClient::send(self, &phones, &text).await
    }
}

fn build_dispatch_url(
    base_url: &str,
    user: &str,
    pass: &str,
    sid: &str,
    phones: &[String],
    text: &str,
) -> String {
    let encoded_text: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();

    format!(
        "{}?user={}&pass={}&sid={}&mno={}&type={}&text={}",
        base_url,
        user,
        pass,
        sid,
        phones.join(","),
        message_encoding_type(text),
        encoded_text,
    )
}

/// Latin messages go out as plain GSM text; anything carrying Arabic
/// characters has to be flagged as unicode or the gateway garbles it.
fn message_encoding_type(text: &str) -> &'static str {
    let has_arabic = text
        .chars()
        .any(|c| ('\u{0600}'..='\u{06FF}').contains(&c));

    if has_arabic {
        MESSAGE_TYPE_UNICODE
    } else {
        MESSAGE_TYPE_LATIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadnet_client_satisfies_the_sms_port() {
        fn assert_sender<T: SmsSender>() {}
        assert_sender::<BroadnetClient>();
    }

    #[test]
    fn latin_text_uses_type_one() {
        assert_eq!(message_encoding_type("Your parking fee is due"), "1");
    }

    #[test]
    fn arabic_text_uses_type_four() {
        assert_eq!(message_encoding_type("مرحبا Karim"), "4");
    }

    #[test]
    fn dispatch_url_joins_phones_and_encodes_text() {
        let phones = vec!["9613111222".to_string(), "9613999888".to_string()];
        let url = build_dispatch_url(
            "https://gateway.example.com/websmpp/websms",
            "acme",
            "secret",
            "PARKING",
            &phones,
            "fee due: 50",
        );

        assert_eq!(
            url,
            "https://gateway.example.com/websmpp/websms?user=acme&pass=secret&sid=PARKING\
             &mno=9613111222,9613999888&type=1&text=fee+due%3A+50"
        );
    }
}
