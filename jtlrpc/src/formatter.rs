use crate::config::Profile;
use colored::*;
use jtlrpc_core::{
    ClientError, ControllerResponse,
    model::{ConnectorIdentification, Features},
};
use std::fmt::Display;

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

pub struct ProfileList(pub Vec<Profile>);

pub struct GenericError<T: Display>(pub &'static str, pub T);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<serde_json::Value> for FormattedString {
    fn from(value: serde_json::Value) -> Self {
        FormattedString(serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string()))
    }
}

impl From<ClientError> for FormattedString {
    fn from(err: ClientError) -> Self {
        let title = match &err {
            ClientError::Response { .. } => "Connector Error:",
            ClientError::Authentication(_) => "Authentication Failed:",
            ClientError::Transport(_) => "Connection Error:",
            _ => "Request Failed:",
        };

        FormattedString(format!(
            "{} code={}\n\n'{}'",
            title.red().bold(),
            err.code(),
            err
        ))
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        FormattedString(format!("{}\n\n'{:#}'", "Error:".red().bold(), err))
    }
}

impl<T: Display> From<GenericError<T>> for FormattedString {
    fn from(GenericError(msg, err): GenericError<T>) -> Self {
        FormattedString(format!("{}:\n\n'{}'", msg.red().bold(), err))
    }
}

impl From<ControllerResponse> for FormattedString {
    fn from(response: ControllerResponse) -> Self {
        match response {
            ControllerResponse::Array(value) => FormattedString::from(value),
            ControllerResponse::Json(text) => FormattedString(text),
            ControllerResponse::Models(models) if models.is_empty() => {
                FormattedString("No entities returned.".yellow().to_string())
            }
            ControllerResponse::Models(models) => {
                let mut out = String::new();
                for model in models {
                    let identity = model
                        .identity()
                        .map(|id| format!(" [{:?}, {}]", id.endpoint, id.host))
                        .unwrap_or_default();
                    out.push_str(&format!(
                        "{}{}\n",
                        model.entity_type().type_name().cyan(),
                        identity.green()
                    ));

                    let fields = serde_json::to_string_pretty(model.fields()).unwrap_or_default();
                    out.push_str(&fields);
                    out.push_str("\n\n");
                }
                FormattedString(out.trim_end().to_string())
            }
        }
    }
}

impl From<Features> for FormattedString {
    fn from(features: Features) -> Self {
        let mark = |supported: bool| {
            if supported {
                "yes".green()
            } else {
                "no".red()
            }
        };

        let mut out = String::new();
        out.push_str("Entities:\n");
        for entity in features.entities() {
            out.push_str(&format!(
                "  - {} pull={} push={} delete={}\n",
                entity.name.cyan(),
                mark(entity.can_pull()),
                mark(entity.can_push()),
                mark(entity.can_delete())
            ));
        }

        out.push_str("Flags:\n");
        for (name, active) in features.flags() {
            out.push_str(&format!("  - {} {}\n", name.cyan(), mark(active)));
        }

        FormattedString(out.trim_end().to_string())
    }
}

impl From<ConnectorIdentification> for FormattedString {
    fn from(id: ConnectorIdentification) -> Self {
        let mut out = format!(
            "{} {} {}\n",
            id.platform_name.green().bold(),
            id.platform_version,
            format!("(protocol {})", id.protocol_version).dimmed()
        );
        out.push_str(&format!("  {} {}\n", "endpoint".cyan(), id.endpoint_version));
        out.push_str(&format!("  {} {}", "connector".cyan(), id.connector_version));

        if let Some(info) = id.server_info {
            out.push_str(&format!(
                "\n  {} {}",
                "server".cyan(),
                serde_json::to_string_pretty(&info).unwrap_or_default()
            ));
        }

        FormattedString(out)
    }
}

impl From<ProfileList> for FormattedString {
    fn from(ProfileList(profiles): ProfileList) -> Self {
        if profiles.is_empty() {
            return FormattedString("No profiles saved.".yellow().to_string());
        }

        let mut out = String::new();
        out.push_str("Saved Profiles:\n");
        for profile in profiles {
            out.push_str(&format!("  - {} {}\n", profile.name.green(), profile.url));
        }
        FormattedString(out.trim_end().to_string())
    }
}
