/// 每个用户保留的最近练习单词数（用于避免立即重复）
pub const MAX_RECENT_WORDS: usize = 10;

/// 历史接口默认返回的最大尝试记录数
pub const MAX_HISTORY_ATTEMPTS: usize = 200;

/// 发布人群分位阈值所需的最少已评分用户数
pub const MIN_POPULATION_FOR_CUTOFFS: usize = 20;

/// 显示名称最大长度（字符）
pub const MAX_DISPLAY_NAME_CHARS: usize = 100;

/// 单词最大长度（字符）
pub const MAX_WORD_CHARS: usize = 64;

/// 转写文本最大长度（字符）
pub const MAX_TRANSCRIPT_CHARS: usize = 500;

/// API 请求体大小上限
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// 选词容差允许的上限，防止查询参数把窗口放大到失去意义
pub const MAX_SELECTION_TOLERANCE: f64 = 2000.0;
