use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::decode::{first_unknown_key, read_type};

const TYPE_CUSTOM: &str = "custom";
const TYPE_SATELLITE: &str = "satellite";
const TYPE_AAP: &str = "aap";

const COMMON_KEYS: [&str; 3] = ["type", "name", "ignore_failure"];
const CUSTOM_KEYS: [&str; 1] = ["contents"];
const SATELLITE_KEYS: [&str; 1] = ["command"];
const AAP_KEYS: [&str; 2] = ["job_template_url", "host_config_key"];

#[derive(Debug, Error)]
pub enum FirstbootError {
    #[error("unknown firstboot customization: missing or invalid type field")]
    UnknownType,

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("bad firstboot customization: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("missing command field for satellite firstboot customization")]
    MissingCommand,

    #[error("missing job_template_url or host_config_key field for aap firstboot customization")]
    MissingAapFields,
}

/// A firstboot script entry, kept as the undecoded field bag so that it is
/// written back exactly as it was read. Use [`select_union`](Self::select_union)
/// to get the typed script.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirstbootScriptCustomization {
    union: Map<String, Value>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstbootCommonCustomization {
    #[serde(rename = "type")]
    pub script_type: String,
    pub name: String,
    pub ignore_failure: bool,
}

/// Script contents are written out and run on first boot
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFirstbootCustomization {
    #[serde(flatten)]
    pub common: FirstbootCommonCustomization,
    pub contents: String,
}

/// Satellite registration command
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatelliteFirstbootCustomization {
    #[serde(flatten)]
    pub common: FirstbootCommonCustomization,
    pub command: String,
}

/// Ansible Automation Platform provisioning callback
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AapFirstbootCustomization {
    #[serde(flatten)]
    pub common: FirstbootCommonCustomization,
    pub job_template_url: String,
    pub host_config_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstbootScript {
    Custom(CustomFirstbootCustomization),
    Satellite(SatelliteFirstbootCustomization),
    Aap(AapFirstbootCustomization),
}

impl FirstbootScriptCustomization {
    /// Resolves the `type` field into one of the known script kinds,
    /// rejecting fields that belong to another kind.
    pub fn select_union(&self) -> Result<FirstbootScript, FirstbootError> {
        let script_type = read_type(&self.union).map_err(|_| FirstbootError::UnknownType)?;

        let own_keys: &[&str] = match script_type.as_str() {
            TYPE_CUSTOM => &CUSTOM_KEYS,
            TYPE_SATELLITE => &SATELLITE_KEYS,
            TYPE_AAP => &AAP_KEYS,
            _ => return Err(FirstbootError::UnknownType),
        };

        if let Some(field) = first_unknown_key(&self.union, &[&COMMON_KEYS, own_keys]) {
            return Err(FirstbootError::UnknownField(field.to_string()));
        }

        let value = Value::Object(self.union.clone());
        let script = match script_type.as_str() {
            TYPE_CUSTOM => FirstbootScript::Custom(serde_json::from_value(value)?),

            TYPE_SATELLITE => {
                let satellite: SatelliteFirstbootCustomization = serde_json::from_value(value)?;
                if satellite.command.is_empty() {
                    return Err(FirstbootError::MissingCommand);
                }

                FirstbootScript::Satellite(satellite)
            }

            _ => {
                let aap: AapFirstbootCustomization = serde_json::from_value(value)?;
                if aap.job_template_url.is_empty() || aap.host_config_key.is_empty() {
                    return Err(FirstbootError::MissingAapFields);
                }

                FirstbootScript::Aap(aap)
            }
        };

        debug!(script_type = %script_type, "selected firstboot script");

        Ok(script)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstbootCustomization {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<FirstbootScriptCustomization>,
}

impl FirstbootCustomization {
    /// Selects every script, failing on the first bad one
    pub fn validate(&self) -> Result<Vec<FirstbootScript>, FirstbootError> {
        self.scripts
            .iter()
            .map(FirstbootScriptCustomization::select_union)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AAP_URL: &str = "https://aap.example.com/api/v2/job_templates/9/callback/";

    fn from_json(s: &str) -> FirstbootScriptCustomization {
        serde_json::from_str(s).expect("failed to parse json")
    }

    fn from_toml(s: &str) -> FirstbootScriptCustomization {
        toml::from_str(s).expect("failed to parse toml")
    }

    #[test]
    fn test_json_verbatim() {
        let tests = vec![
            r#"{"type":"custom","name":"test","contents":"echo hello"}"#,
            r#"{"type":"satellite","name":"test","command":"echo hello"}"#,
            r#"{"type":"aap","name":"test","job_template_url":"https://aap.example.com/api/v2/job_templates/9/callback/"}"#,
            r#"{"type":"unknown","name":"test"}"#,
        ];

        for input in tests {
            let script = from_json(input);
            let encoded = serde_json::to_string(&script).expect("failed to encode json");
            assert_eq!(encoded, input);
        }
    }

    #[test]
    fn test_toml_matches_json() {
        let tests = vec![
            (
                "type = \"custom\"\nname = \"test\"\ncontents = \"echo hello\"",
                r#"{"type":"custom","name":"test","contents":"echo hello"}"#,
            ),
            (
                "type = \"unknown\"\nname = \"test\"",
                r#"{"type":"unknown","name":"test"}"#,
            ),
        ];

        for (toml_input, json_input) in tests {
            let script = from_toml(toml_input);
            assert_eq!(script, from_json(json_input));

            let encoded = toml::to_string(&script).expect("failed to encode toml");
            assert_eq!(from_toml(&encoded), script);
        }
    }

    #[test]
    fn test_select_union() {
        struct Test {
            case: &'static str,
            json: &'static str,
            toml: &'static str,
            expected: Result<FirstbootScript, &'static str>,
        }

        let tests = vec![
            Test {
                case: "err-bad-type",
                json: r#"{"type":"xxx"}"#,
                toml: r#"type = "xxx""#,
                expected: Err("unknown firstboot customization: missing or invalid type field"),
            },
            Test {
                case: "err-missing-type",
                json: "{}",
                toml: "",
                expected: Err("unknown firstboot customization: missing or invalid type field"),
            },
            Test {
                case: "err-non-string-type",
                json: r#"{"type":7}"#,
                toml: "type = 7",
                expected: Err("unknown firstboot customization: missing or invalid type field"),
            },
            Test {
                case: "err-custom-with-aap",
                json: r#"{"type":"custom","job_template_url":"https://aap.example.com/api/v2/job_templates/9/callback/"}"#,
                toml: "type = \"custom\"\njob_template_url = \"https://aap.example.com/api/v2/job_templates/9/callback/\"",
                expected: Err(r#"unknown field "job_template_url""#),
            },
            Test {
                case: "custom",
                json: r#"{"type":"custom","name":"test","contents":"echo hello"}"#,
                toml: "type = \"custom\"\nname = \"test\"\ncontents = \"echo hello\"",
                expected: Ok(FirstbootScript::Custom(CustomFirstbootCustomization {
                    common: FirstbootCommonCustomization {
                        script_type: "custom".into(),
                        name: "test".into(),
                        ignore_failure: false,
                    },
                    contents: "echo hello".into(),
                })),
            },
            Test {
                case: "custom-ignore-failure",
                json: r#"{"type":"custom","ignore_failure":true,"contents":"false"}"#,
                toml: "type = \"custom\"\nignore_failure = true\ncontents = \"false\"",
                expected: Ok(FirstbootScript::Custom(CustomFirstbootCustomization {
                    common: FirstbootCommonCustomization {
                        script_type: "custom".into(),
                        name: "".into(),
                        ignore_failure: true,
                    },
                    contents: "false".into(),
                })),
            },
            Test {
                case: "satellite",
                json: r#"{"type":"satellite","name":"test","command":"echo hello"}"#,
                toml: "type = \"satellite\"\nname = \"test\"\ncommand = \"echo hello\"",
                expected: Ok(FirstbootScript::Satellite(SatelliteFirstbootCustomization {
                    common: FirstbootCommonCustomization {
                        script_type: "satellite".into(),
                        name: "test".into(),
                        ignore_failure: false,
                    },
                    command: "echo hello".into(),
                })),
            },
            Test {
                case: "missing-satellite-command",
                json: r#"{"type":"satellite"}"#,
                toml: r#"type = "satellite""#,
                expected: Err("missing command field for satellite firstboot customization"),
            },
            Test {
                case: "aap",
                json: r#"{"type":"aap","host_config_key":"test","job_template_url":"https://aap.example.com/api/v2/job_templates/9/callback/"}"#,
                toml: "type = \"aap\"\nhost_config_key = \"test\"\njob_template_url = \"https://aap.example.com/api/v2/job_templates/9/callback/\"",
                expected: Ok(FirstbootScript::Aap(AapFirstbootCustomization {
                    common: FirstbootCommonCustomization {
                        script_type: "aap".into(),
                        ..Default::default()
                    },
                    job_template_url: AAP_URL.into(),
                    host_config_key: "test".into(),
                })),
            },
            Test {
                case: "missing-aap-host-config-key",
                json: r#"{"type":"aap","job_template_url":"https://aap.example.com/api/v2/job_templates/9/callback/"}"#,
                toml: "type = \"aap\"\njob_template_url = \"https://aap.example.com/api/v2/job_templates/9/callback/\"",
                expected: Err("missing job_template_url or host_config_key field for aap firstboot customization"),
            },
            Test {
                case: "missing-aap-fields",
                json: r#"{"type":"aap"}"#,
                toml: r#"type = "aap""#,
                expected: Err("missing job_template_url or host_config_key field for aap firstboot customization"),
            },
        ];

        for test in tests {
            let expected = test.expected.map_err(String::from);

            for script in [from_json(test.json), from_toml(test.toml)] {
                let actual = script.select_union().map_err(|err| err.to_string());
                assert_eq!(actual, expected, "unexpected result in case {}", test.case);
            }
        }
    }

    #[test]
    fn test_validate_scripts() {
        let firstboot: FirstbootCustomization = toml::from_str(
            r#"
            [[scripts]]
            type = "custom"
            contents = "echo hi"

            [[scripts]]
            type = "satellite"
            "#,
        )
        .expect("failed to parse toml");

        let err = firstboot.validate().expect_err("expected missing command");
        assert!(matches!(err, FirstbootError::MissingCommand));

        let firstboot = FirstbootCustomization {
            scripts: firstboot.scripts[..1].to_vec(),
        };
        assert_eq!(firstboot.validate().map(|scripts| scripts.len()).ok(), Some(1));
    }
}
