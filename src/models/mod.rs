//! 数据模型模块

pub mod analysis;
pub mod message;
pub mod statistics;

pub use analysis::{
    AnalysisResult, DimensionScores, FALLBACK_TYPE_CODE, TraitScores, TypeClassification,
};
pub use message::{InMemoryMessageSource, MessageRecord, MessageSource};
pub use statistics::{MessageStatistics, TimeBucket, TimeDistribution};
