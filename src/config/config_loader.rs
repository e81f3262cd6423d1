use anyhow::{Ok, Result};

use super::config_model::{Auth, Database, DotEnvyConfig, Server, Sms};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let auth = Auth {
        jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
    };

    let sms = Sms {
        gateway_base_url: std::env::var("SMS_GATEWAY_BASE_URL")
            .expect("SMS_GATEWAY_BASE_URL is invalid"),
        gateway_user: std::env::var("SMS_GATEWAY_USER").expect("SMS_GATEWAY_USER is invalid"),
        gateway_pass: std::env::var("SMS_GATEWAY_PASS").expect("SMS_GATEWAY_PASS is invalid"),
        gateway_sid: std::env::var("SMS_GATEWAY_SID").expect("SMS_GATEWAY_SID is invalid"),
        country_code: std::env::var("SMS_COUNTRY_CODE").unwrap_or("961".to_string()),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        sms,
    })
}

pub fn get_auth_secret() -> Result<Auth> {
    dotenvy::dotenv().ok();

    Ok(Auth {
        jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
    })
}
