use serde::{Deserialize, Serialize};

/// sshd_config overrides. Unset options keep the image defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshdCustomization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_authentication: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_response_authentication: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_alive_interval: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit_root_login: Option<PermitRootLogin>,
}

/// `PermitRootLogin` takes either a boolean or one of sshd's keywords,
/// e.g. `"prohibit-password"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermitRootLogin {
    Bool(bool),
    Keyword(String),
}

impl SshdCustomization {
    /// The overridden options as sshd_config keyword and value pairs
    pub fn options(&self) -> Vec<(&'static str, String)> {
        let yes_no = |b: bool| String::from(if b { "yes" } else { "no" });
        let mut options = Vec::new();

        if let Some(b) = self.password_authentication {
            options.push(("PasswordAuthentication", yes_no(b)));
        }

        if let Some(b) = self.challenge_response_authentication {
            options.push(("ChallengeResponseAuthentication", yes_no(b)));
        }

        if let Some(n) = self.client_alive_interval {
            options.push(("ClientAliveInterval", n.to_string()));
        }

        match &self.permit_root_login {
            Some(PermitRootLogin::Bool(b)) => options.push(("PermitRootLogin", yes_no(*b))),
            Some(PermitRootLogin::Keyword(k)) => options.push(("PermitRootLogin", k.clone())),
            None => {}
        }

        options
    }
}
