use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("skill level {0} is outside the 1..=10 range")]
    SkillLevelOutOfRange(u8),
    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),
    #[error("invalid url '{url}' in field '{field}': {source}")]
    InvalidUrl {
        field: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },
}
