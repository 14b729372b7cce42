#[derive(Clone)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

pub struct ServerConfig {
    pub env: Env,
    pub database_url: String,
    /// Public base URL used in notification mails, e.g. `https://terrapp.es`.
    pub base_url: String,
    pub openai_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub sendgrid: Option<SendgridConfig>,
    /// When true, submitted comments start out `pending` until approved.
    pub moderate_comments: bool,
    /// Languages the generation pipeline translates each article into.
    pub translation_langs: Vec<String>,
}

pub struct SendgridConfig {
    pub api_key: String,
    pub sender: String,
}

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(e) => match e {
            std::env::VarError::NotPresent => Ok(None),
            std::env::VarError::NotUnicode(_) => Err(format!(
                "Could not get the environment variable `{key}` due to unicode error"
            )),
        },
    }
}

fn required_var(key: &str) -> String {
    match var(key) {
        Ok(Some(val)) => val,
        Ok(None) => {
            tracing::error!("Environment variable `{key}` is required");
            std::process::exit(1)
        }
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

/// Either all or none variables are set
fn all_or_none_vars(keys: Vec<&str>) -> Option<Vec<String>> {
    keys.iter().fold(None, |accum, k| match var(k) {
        Ok(Some(val)) => match accum {
            Some(mut l) => {
                l.push(val);
                Some(l)
            }
            None => Some(vec![val]),
        },
        _ => match accum {
            Some(_) => {
                tracing::error!(
                    "Environment variable `{k}` is required if variables {keys:?} are present"
                );
                None
            }
            None => None,
        },
    })
}

impl ServerConfig {
    pub fn new_from_env() -> Self {
        let sendgrid = all_or_none_vars(vec!["SENDGRID_API_KEY", "SENDGRID_SENDER"]).map(
            |mut vars| SendgridConfig {
                api_key: vars.remove(0),
                sender: vars.remove(0),
            },
        );

        let translation_langs = var("TRANSLATION_LANGS")
            .ok()
            .flatten()
            .unwrap_or_else(|| "en".into())
            .split(',')
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        ServerConfig {
            env: match var("ENVIRONMENT") {
                Ok(Some(env)) => match env.as_str() {
                    "dev" => Env::Dev,
                    "staging" => Env::Staging,
                    "production" => Env::Production,
                    _ => Env::Dev,
                },
                _ => Env::Dev,
            },
            database_url: required_var("DATABASE_URL"),
            base_url: var("BASE_URL")
                .ok()
                .flatten()
                .unwrap_or_else(|| "http://localhost:3000".into()),
            openai_api_key: var("OPENAI_API_KEY").ok().flatten(),
            tavily_api_key: var("TAVILY_API_KEY").ok().flatten(),
            sendgrid,
            moderate_comments: var("MODERATE_COMMENTS")
                .ok()
                .flatten()
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            translation_langs,
        }
    }
}
