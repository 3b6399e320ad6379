use thiserror::Error;

pub type Result<T> = std::result::Result<T, DigestError>;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Language model error: {0}")]
    Llm(String),
    #[error("Slack error: {0}")]
    Slack(String),
    #[error("gitinspector error: {0}")]
    Inspector(String),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

impl From<gix::object::commit::Error> for DigestError {
    fn from(err: gix::object::commit::Error) -> Self {
        DigestError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for DigestError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        DigestError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for DigestError {
    fn from(err: gix::objs::decode::Error) -> Self {
        DigestError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for DigestError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        DigestError::DiffTreeToTree(Box::new(err))
    }
}

impl From<gix::discover::Error> for DigestError {
    fn from(err: gix::discover::Error) -> Self {
        DigestError::GitDiscover(Box::new(err))
    }
}

impl From<ureq::Error> for DigestError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                DigestError::Http(format!("status {code}: {body}"))
            }
            ureq::Error::Transport(transport) => DigestError::Http(transport.to_string()),
        }
    }
}
