use thiserror::Error;

/// Configuration problems. These are raised before any file is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("community set '{set}' is empty")]
    EmptyCommunitySet { set: &'static str },

    #[error("community sets are not configured")]
    MissingCommunities,

    #[error("topic name must not be empty")]
    EmptyTopicName,

    #[error("topic '{topic}' has no keywords")]
    EmptyKeywordList { topic: String },

    #[error("topic '{topic}' is declared more than once")]
    DuplicateTopic { topic: String },

    #[error("no topics configured")]
    NoTopics,

    #[error("no corpora selected")]
    NoCorpora,
}
