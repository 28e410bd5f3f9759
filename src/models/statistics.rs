//! 消息统计数据模型

use serde::{Deserialize, Serialize};

/// 时间段（按本地小时划分）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeBucket {
    /// 早晨 [6, 12)
    #[serde(rename = "morning")]
    Morning,

    /// 下午 [12, 18)
    #[serde(rename = "afternoon")]
    Afternoon,

    /// 傍晚 [18, 23)
    #[serde(rename = "evening")]
    Evening,

    /// 夜晚（其余时段）
    #[serde(rename = "night")]
    Night,
}

impl TimeBucket {
    /// 固定枚举顺序（并列时取最靠前者）
    pub const ALL: [TimeBucket; 4] = [
        TimeBucket::Morning,
        TimeBucket::Afternoon,
        TimeBucket::Evening,
        TimeBucket::Night,
    ];

    /// 按本地小时归入时间段
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeBucket::Morning,
            12..=17 => TimeBucket::Afternoon,
            18..=22 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }
}

/// 四时段消息分布
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDistribution {
    /// 早晨消息数
    pub morning: u32,
    /// 下午消息数
    pub afternoon: u32,
    /// 傍晚消息数
    pub evening: u32,
    /// 夜晚消息数
    pub night: u32,
}

impl TimeDistribution {
    /// 读取指定时段的计数
    pub fn get(&self, bucket: TimeBucket) -> u32 {
        match bucket {
            TimeBucket::Morning => self.morning,
            TimeBucket::Afternoon => self.afternoon,
            TimeBucket::Evening => self.evening,
            TimeBucket::Night => self.night,
        }
    }

    /// 指定时段计数加一
    pub fn increment(&mut self, bucket: TimeBucket) {
        match bucket {
            TimeBucket::Morning => self.morning += 1,
            TimeBucket::Afternoon => self.afternoon += 1,
            TimeBucket::Evening => self.evening += 1,
            TimeBucket::Night => self.night += 1,
        }
    }

    /// 四时段计数之和
    pub fn total(&self) -> u32 {
        self.morning + self.afternoon + self.evening + self.night
    }

    /// 消息最多的时段，并列时取枚举顺序靠前者
    pub fn dominant(&self) -> TimeBucket {
        let mut best = TimeBucket::Morning;
        for bucket in TimeBucket::ALL {
            if self.get(bucket) > self.get(best) {
                best = bucket;
            }
        }
        best
    }
}

/// 消息统计信息
///
/// `positive_count` 与 `negative_count` 为保留字段，当前始终为 0，
/// 留作情感计数扩展点。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageStatistics {
    /// 消息总数
    pub total_count: u32,

    /// 平均消息长度（字符）
    pub avg_length: f64,

    /// 四时段消息分布
    pub time_distribution: TimeDistribution,

    /// 表情符号出现次数
    pub emoji_count: u32,

    /// 含 @ 提及的消息数
    pub mention_count: u32,

    /// 含问号的消息数
    pub question_count: u32,

    /// 积极关键词计数（保留）
    pub positive_count: u32,

    /// 消极关键词计数（保留）
    pub negative_count: u32,
}

impl MessageStatistics {
    /// 提及比例，总数为 0 时无定义
    pub fn mention_ratio(&self) -> Option<f64> {
        self.ratio(self.mention_count)
    }

    /// 表情比例，总数为 0 时无定义
    pub fn emoji_ratio(&self) -> Option<f64> {
        self.ratio(self.emoji_count)
    }

    /// 提问比例，总数为 0 时无定义
    pub fn question_ratio(&self) -> Option<f64> {
        self.ratio(self.question_count)
    }

    fn ratio(&self, count: u32) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(f64::from(count) / f64::from(self.total_count))
        }
    }
}
